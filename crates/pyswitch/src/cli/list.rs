use super::App;
use crate::ui::Formatter;
use pyswitch_discovery::{InterpreterRecord, Registry};
use std::process::ExitCode;
use tabled::Tabled;

/// Show discovered interpreters, newest first.
#[derive(Debug, clap::Args)]
pub struct List {}

#[derive(Tabled)]
struct Row {
    #[tabled(rename = "")]
    mark:      &'static str,
    version:   String,
    path:      String,
    #[tabled(rename = "resolves to")]
    real_path: String,
}

impl List {
    pub fn run(self, app: &App) -> anyhow::Result<ExitCode> {
        let mut session = app.session();
        let selected = session.state().selected();
        let registry = session.registry();

        if registry.is_empty() {
            eprintln!("pyswitch: no Python 3 interpreters found");
            return Ok(ExitCode::SUCCESS);
        }

        let table = Formatter::default().build(rows(registry, |r| Some(r.version) == selected));
        println!("{table}");
        Ok(ExitCode::SUCCESS)
    }
}

fn rows(registry: &Registry, is_selected: impl Fn(&InterpreterRecord) -> bool) -> Vec<Row> {
    registry
        .iter()
        .rev()
        .map(|record| Row {
            mark:      if is_selected(record) { "*" } else { "" },
            version:   record.full_version().to_string(),
            path:      record.path.display().to_string(),
            real_path: record.real_path.display().to_string(),
        })
        .collect()
}
