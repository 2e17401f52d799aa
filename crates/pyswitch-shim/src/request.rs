use crate::{Failure, Result};
use once_cell::sync::Lazy;
use pyswitch_version::MajorMinor;
use regex::Regex;
use std::ffi::OsString;

static COMMAND_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?<tool>python|pip)(?:(?<major>[0-9]+)(?:\.(?<minor>[0-9]+))?)?$").unwrap()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    /// `python`
    InterpreterBare,
    /// `python3`
    InterpreterMajor(u64),
    /// `python3.12`
    InterpreterVersioned(MajorMinor),
    /// `pip`, `pip3`
    InstallerBare,
    /// `pip3.12`
    InstallerVersioned(MajorMinor),
}

impl CommandKind {
    pub fn parse(name: &str) -> Result<Self> {
        let invalid = || Failure::InvalidVersionFormat {
            input: name.to_string(),
        };
        let caps = COMMAND_REGEX.captures(name).ok_or_else(invalid)?;
        let major = caps
            .name("major")
            .map(|m| m.as_str().parse::<u64>())
            .transpose()
            .map_err(|_| invalid())?;
        let minor = caps
            .name("minor")
            .map(|m| m.as_str().parse::<u64>())
            .transpose()
            .map_err(|_| invalid())?;

        let versioned = major.zip(minor).map(|(major, minor)| MajorMinor::new(major, minor));
        Ok(match (&caps["tool"], versioned, major) {
            ("python", Some(v), _) => Self::InterpreterVersioned(v),
            ("python", None, Some(major)) => Self::InterpreterMajor(major),
            ("python", None, None) => Self::InterpreterBare,
            (_, Some(v), _) => Self::InstallerVersioned(v),
            (_, None, _) => Self::InstallerBare,
        })
    }

    pub fn is_installer(&self) -> bool {
        matches!(self, Self::InstallerBare | Self::InstallerVersioned(_))
    }

    pub fn version(&self) -> Option<MajorMinor> {
        match self {
            Self::InterpreterVersioned(v) | Self::InstallerVersioned(v) => Some(*v),
            _ => None,
        }
    }

    /// `python` or `pip`.
    pub fn generic_name(&self) -> &'static str {
        if self.is_installer() { "pip" } else { "python" }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionRequest {
    pub name:    String,
    pub command: CommandKind,
    pub args:    Vec<OsString>,
}

impl ResolutionRequest {
    pub fn new<I, S>(name: &str, args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        Ok(Self {
            name:    name.to_string(),
            command: CommandKind::parse(name)?,
            args:    args.into_iter().map(Into::into).collect(),
        })
    }

    /// `python -m pip ...`
    pub fn is_installer_module(&self) -> bool {
        self.args.first().is_some_and(|a| a == "-m") && self.args.get(1).is_some_and(|a| a == "pip")
    }

    /// Reaches the package installer, directly or through `-m pip`.
    pub fn reaches_installer(&self) -> bool {
        self.command.is_installer() || self.is_installer_module()
    }

    /// `-m pip <args>`, for running an installer through an interpreter.
    pub(crate) fn as_module_args(&self) -> Vec<OsString> {
        let mut args = vec![OsString::from("-m"), OsString::from("pip")];
        args.extend(self.args.iter().cloned());
        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_command_names() {
        assert_eq!(CommandKind::parse("python").unwrap(), CommandKind::InterpreterBare);
        assert_eq!(CommandKind::parse("python3").unwrap(), CommandKind::InterpreterMajor(3));
        assert_eq!(
            CommandKind::parse("python3.12").unwrap(),
            CommandKind::InterpreterVersioned(MajorMinor::new(3, 12))
        );
        assert_eq!(CommandKind::parse("pip").unwrap(), CommandKind::InstallerBare);
        assert_eq!(CommandKind::parse("pip3").unwrap(), CommandKind::InstallerBare);
        assert_eq!(
            CommandKind::parse("pip3.10").unwrap(),
            CommandKind::InstallerVersioned(MajorMinor::new(3, 10))
        );
    }

    #[test]
    fn test_parse_rejects_others() {
        for name in ["ruby", "python3.", "python3.12.1", "pip-3.12", "pythonw"] {
            assert_eq!(
                CommandKind::parse(name),
                Err(Failure::InvalidVersionFormat {
                    input: name.to_string()
                })
            );
        }
    }

    #[test]
    fn test_installer_module() {
        let req = ResolutionRequest::new("python", ["-m", "pip", "install", "rich"]).unwrap();
        assert!(req.is_installer_module());
        assert!(req.reaches_installer());

        let req = ResolutionRequest::new("python", ["-c", "-m pip"]).unwrap();
        assert!(!req.is_installer_module());

        let req = ResolutionRequest::new("python", ["-m", "venv", ".venv"]).unwrap();
        assert!(!req.reaches_installer());

        let req = ResolutionRequest::new("pip", ["list"]).unwrap();
        assert_eq!(
            req.as_module_args(),
            vec![OsString::from("-m"), OsString::from("pip"), OsString::from("list")]
        );
    }
}
