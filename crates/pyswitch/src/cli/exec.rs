use super::{App, report};
use anyhow::Context;
use pyswitch_platform::env::Export;
use pyswitch_shim::{Decision, ResolutionRequest};
use std::ffi::OsString;
use std::process::{Command, ExitCode, ExitStatus};

/// Resolve a `python`/`pip` command and run it.
#[derive(Debug, clap::Args)]
#[command(disable_help_flag = true)]
pub struct Exec {
    /// `python`, `python3`, `python3.12`, `pip`, `pip3` or `pip3.12`, then
    /// its arguments, passed through unchanged (a `--` included).
    #[arg(
        value_name = "COMMAND",
        required = true,
        num_args = 1..,
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub argv: Vec<OsString>,
}

impl Exec {
    pub fn run(self, app: &App) -> anyhow::Result<ExitCode> {
        let mut argv = self.argv.into_iter();
        let command = argv.next().context("missing command")?;
        let request = match ResolutionRequest::new(&command.to_string_lossy(), argv) {
            Ok(request) => request,
            Err(failure) => return Ok(report(&failure)),
        };

        let mut session = app.session();
        let decision = match session.resolve(&request) {
            Ok(decision) => decision,
            Err(failure) => return Ok(report(&failure)),
        };

        let status = spawn(&decision, &session.take_exports())?;
        Ok(ExitCode::from(exit_code(status)))
    }
}

fn spawn(decision: &Decision, exports: &[Export]) -> anyhow::Result<ExitStatus> {
    let mut cmd = Command::new(&decision.program);
    cmd.args(&decision.args);
    for export in exports {
        match export {
            Export::Set { name, value } => cmd.env(name, value),
            Export::Unset { name } => cmd.env_remove(name),
        };
    }

    tracing::debug!(program = %decision.program.display(), "spawning");
    cmd.status()
        .with_context(|| format!("failed to run {}", decision.program.display()))
}

/// The child's code; a signal death maps to `128 + signal` as shells do.
fn exit_code(status: ExitStatus) -> u8 {
    if let Some(code) = status.code() {
        return code as u8;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128u8.wrapping_add(signal as u8);
        }
    }
    1
}
