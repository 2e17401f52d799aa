use super::App;
use crate::ui::Formatter;
use pyswitch_shim::Session;
use std::process::ExitCode;
use tabled::Tabled;

/// Show what `python` would resolve to in this shell, and why.
#[derive(Debug, clap::Args)]
pub struct Status {}

#[derive(Tabled)]
struct Line {
    key:   &'static str,
    value: String,
}

impl Status {
    pub fn run(self, app: &App) -> anyhow::Result<ExitCode> {
        let mut session = app.session();
        let lines = describe(&mut session);
        let table = Formatter {
            bare_rows: true,
            ..Default::default()
        }
        .build(lines);
        println!("{table}");
        Ok(ExitCode::SUCCESS)
    }
}

fn describe(session: &mut Session) -> Vec<Line> {
    let indicators = session.indicators();
    let detection = session.detect();
    let environment = match session.own_version(&detection) {
        Some(v) if detection.context.is_active() => format!("{} (python {v})", detection.context),
        _ => detection.context.to_string(),
    };

    let state = *session.state();
    let selected = match (state.selected(), state.build_mode()) {
        (Some(v), true) => format!("{v} (build mode)"),
        (Some(v), false) => v.to_string(),
        (None, _) => "none".to_string(),
    };
    let links = if state.symlink_managed() {
        session.publisher().dir().display().to_string()
    } else {
        "none".to_string()
    };
    let stale = match session.validate() {
        Ok(()) => None,
        Err(failure) => Some(failure.to_string()),
    };

    let mut lines = vec![
        Line {
            key:   "environment",
            value: environment,
        },
        Line {
            key:   "override",
            value: selected,
        },
        Line {
            key:   "links",
            value: links,
        },
        Line {
            key:   "bypass",
            value: if indicators.bypass { "on" } else { "off" }.to_string(),
        },
        Line {
            key:   "interpreters",
            value: session.registry().len().to_string(),
        },
    ];
    if let Some(stale) = stale {
        lines.push(Line {
            key:   "warning",
            value: stale,
        });
    }
    lines
}
