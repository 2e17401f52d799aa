//! Interpreter probing.
//!
//! A probe asks an executable about itself. It is the only place where
//! discovery spawns processes, and it has no timeout: a candidate that hangs
//! blocks the scan.

use pyswitch_platform::command::Command;
use std::path::Path;

const INTROSPECT_SCRIPT: &str = "import sys; print('%d.%d.%d' % sys.version_info[:3])";

pub trait Probe {
    /// Raw `--version` output, first non-empty line.
    fn banner(&self, exe: &Path) -> Option<String>;

    /// `major.minor.patch` as reported by the interpreter itself.
    fn introspect(&self, exe: &Path) -> Option<String>;
}

impl<P: Probe + ?Sized> Probe for &P {
    fn banner(&self, exe: &Path) -> Option<String> { (**self).banner(exe) }

    fn introspect(&self, exe: &Path) -> Option<String> { (**self).introspect(exe) }
}

/// Spawns the candidate directly.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommandProbe;

impl Probe for CommandProbe {
    fn banner(&self, exe: &Path) -> Option<String> {
        run(Command::new(exe).arg("--version"))
    }

    fn introspect(&self, exe: &Path) -> Option<String> {
        run(Command::new(exe).args(["-c", INTROSPECT_SCRIPT]))
    }
}

fn run(cmd: Command) -> Option<String> {
    let cmd = cmd
        .env_remove("PYTHONSTARTUP")
        .env_remove("PYTHONHOME")
        .env("PYTHONNOUSERSITE", "1");
    let program = cmd.program().to_string();
    match cmd.first_line() {
        Ok(line) => {
            tracing::trace!(%program, %line, "probe output");
            Some(line)
        }
        Err(err) => {
            tracing::debug!(%program, error = %err, "probe failed");
            None
        }
    }
}
