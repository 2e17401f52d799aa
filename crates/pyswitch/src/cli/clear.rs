use super::{App, print_exports, report};
use std::process::ExitCode;

/// Drop the selected interpreter and build mode.
#[derive(Debug, clap::Args)]
pub struct Clear {
    /// Also remove the published `python`/`python3` links.
    #[arg(long)]
    pub remove_links: bool,
}

impl Clear {
    pub fn run(self, app: &App) -> anyhow::Result<ExitCode> {
        let mut session = app.session();
        let outcome = session.clear();
        print_exports(&outcome.exports);

        if !outcome.artifacts_pending {
            return Ok(ExitCode::SUCCESS);
        }
        if !self.remove_links {
            eprintln!(
                "pyswitch: links in {} were kept; run `pyswitch clear --remove-links` to remove them",
                session.publisher().dir().display()
            );
            return Ok(ExitCode::SUCCESS);
        }

        match session.remove_artifacts() {
            Ok(exports) => {
                print_exports(&exports);
                Ok(ExitCode::SUCCESS)
            }
            Err(failure) => Ok(report(&failure)),
        }
    }
}
