//! Binary lookup used by the policy.
//!
//! [`Locate`] is the only contract between the decision procedure and the
//! filesystem; [`PathLocator`] answers it from the session's `PATH`.

use pyswitch_context::EnvironmentContext;
use pyswitch_platform::env::Vars;
use std::path::{Path, PathBuf};

pub trait Locate {
    /// First `PATH` hit for `command` that is not a published artifact.
    fn unmanaged(&self, command: &str) -> Option<PathBuf>;

    /// `command` as provided by the active environment.
    fn in_environment(&self, ctx: &EnvironmentContext, command: &str) -> Option<PathBuf>;

    fn is_executable(&self, path: &Path) -> bool;
}

impl<L: Locate + ?Sized> Locate for &L {
    fn unmanaged(&self, command: &str) -> Option<PathBuf> { (**self).unmanaged(command) }

    fn in_environment(&self, ctx: &EnvironmentContext, command: &str) -> Option<PathBuf> {
        (**self).in_environment(ctx, command)
    }

    fn is_executable(&self, path: &Path) -> bool { (**self).is_executable(path) }
}

pub struct PathLocator<'a> {
    vars:    &'a Vars,
    managed: &'a [PathBuf],
}

impl<'a> PathLocator<'a> {
    pub fn new(vars: &'a Vars, managed: &'a [PathBuf]) -> Self { Self { vars, managed } }
}

impl Locate for PathLocator<'_> {
    fn unmanaged(&self, command: &str) -> Option<PathBuf> {
        self.vars.find_program(command, self.managed)
    }

    /// Venv and conda environments are searched under their root; poetry and
    /// pipenv only through `PATH`.
    fn in_environment(&self, ctx: &EnvironmentContext, command: &str) -> Option<PathBuf> {
        match ctx.bin_dir() {
            Some(_) => ctx.binary(command).filter(|p| self.is_executable(p)),
            None => self.unmanaged(command),
        }
    }

    fn is_executable(&self, path: &Path) -> bool { pyswitch_fs::is_executable(path) }
}
