use super::{App, print_exports, report};
use std::process::ExitCode;

/// Select the session's default interpreter and publish `python`/`python3`.
#[derive(Debug, clap::Args)]
pub struct Use {
    /// `3.12`, `python3.12` or `py3.12`.
    pub version: String,

    /// Also allow pip outside virtual environments.
    #[arg(long)]
    pub build: bool,
}

impl Use {
    pub fn run(self, app: &App) -> anyhow::Result<ExitCode> {
        let mut session = app.session();
        match session.set(&self.version, self.build) {
            Ok(exports) => {
                print_exports(&exports);
                let state = session.state();
                if let Some(version) = state.selected() {
                    let mode = if state.build_mode() { " (build mode)" } else { "" };
                    eprintln!("pyswitch: using python {version}{mode}");
                }
                Ok(ExitCode::SUCCESS)
            }
            Err(failure) => Ok(report(&failure)),
        }
    }
}
