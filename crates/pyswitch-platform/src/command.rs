use crate::error::{Error, Result};
use std::ffi::OsStr;
use std::path::Path;
use std::process::{Command as StdCommand, Output, Stdio};

/// Thin builder over [`std::process::Command`] that keeps the program name
/// around for error reporting.
#[derive(Debug)]
pub struct Command {
    inner:   StdCommand,
    program: String,
}

impl Command {
    pub fn new(program: impl AsRef<Path>) -> Self {
        let program = program.as_ref();
        Self {
            inner:   StdCommand::new(program),
            program: program.display().to_string(),
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.inner.arg(arg);
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.inner.args(args);
        self
    }

    pub fn env<K, V>(mut self, key: K, val: V) -> Self
    where
        K: AsRef<OsStr>,
        V: AsRef<OsStr>,
    {
        self.inner.env(key, val);
        self
    }

    pub fn env_remove(mut self, key: impl AsRef<OsStr>) -> Self {
        self.inner.env_remove(key);
        self
    }

    pub fn capture(mut self) -> Result<Output> {
        self.inner
            .stdin(Stdio::null())
            .output()
            .map_err(|e| Error::CommandFailed {
                cmd:    self.program.clone(),
                source: e,
            })
    }

    /// Run to completion and return the first non-empty line of stdout,
    /// falling back to stderr. Legacy interpreters print `--version` to
    /// stderr, so both streams count.
    pub fn first_line(self) -> Result<String> {
        let cmd = self.program.clone();
        let output = self.capture()?;
        if !output.status.success() {
            return Err(Error::CommandStatus {
                cmd,
                status: output.status,
            });
        }

        [&output.stdout, &output.stderr]
            .into_iter()
            .filter_map(|stream| {
                String::from_utf8_lossy(stream)
                    .lines()
                    .map(str::trim)
                    .find(|line| !line.is_empty())
                    .map(str::to_string)
            })
            .next()
            .ok_or(Error::EmptyOutput { cmd })
    }

    pub fn program(&self) -> &str { &self.program }
}
