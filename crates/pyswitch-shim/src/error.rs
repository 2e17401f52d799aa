//! Resolution failures.

use pyswitch_version::MajorMinor;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Failure {
    #[error("python {requested} was not found (available: {})", list(.available))]
    VersionNotFound {
        requested: MajorMinor,
        available: Vec<MajorMinor>,
    },

    #[error("invalid version '{input}'")]
    InvalidVersionFormat { input: String },

    #[error("selected python {version} is no longer installed")]
    StaleOverride { version: MajorMinor },

    #[error("{}", pip_blocked(.override_version))]
    PipBlocked { override_version: Option<MajorMinor> },

    #[error("python{requested} requested, but the active environment provides python {actual}")]
    VersionMismatch {
        requested: MajorMinor,
        actual:    MajorMinor,
    },

    #[error("no default python interpreter is selected")]
    NoDefaultInterpreter { available: Vec<MajorMinor> },

    #[error("cannot publish {}: {reason}", .path.display())]
    PublishFailed { path: PathBuf, reason: String },
}

pub type Result<T> = std::result::Result<T, Failure>;

impl Failure {
    /// What the user can do about it.
    pub fn remediation(&self) -> String {
        match self {
            Self::VersionNotFound { available, .. } if available.is_empty() => {
                "No Python 3 interpreters were discovered. Install one, then run `pyswitch list`."
                    .to_string()
            }
            Self::VersionNotFound { available, .. } => format!(
                "Choose one of: {}. Run `pyswitch list` to see where each lives.",
                list(available)
            ),
            Self::InvalidVersionFormat { .. } => {
                "Use the major.minor form, for example `3.12` or `python3.12`.".to_string()
            }
            Self::StaleOverride { version } => format!(
                "Run `pyswitch clear`, then `pyswitch use <version>` again (python {version} went away)."
            ),
            Self::PipBlocked { override_version } => {
                let build = match override_version {
                    Some(v) => format!("pyswitch use {v} --build"),
                    None => "pyswitch use <version> --build".to_string(),
                };
                format!(
                    "Create and activate a virtual environment (`python -m venv .venv && . .venv/bin/activate`), \
                     or allow installs into the selected interpreter with `{build}`."
                )
            }
            Self::VersionMismatch { actual, .. } => format!(
                "Run `python` (python {actual}) inside this environment, or deactivate it first."
            ),
            Self::NoDefaultInterpreter { available } if available.is_empty() => {
                "Install Python 3, then select it with `pyswitch use <version>`.".to_string()
            }
            Self::NoDefaultInterpreter { available } => format!(
                "Select one with `pyswitch use <version>` (available: {}), or activate a virtual environment.",
                list(available)
            ),
            Self::PublishFailed { .. } => {
                "Check that the interpreter is executable and the link directory is writable."
                    .to_string()
            }
        }
    }
}

fn list(versions: &[MajorMinor]) -> String {
    if versions.is_empty() {
        return "none".to_string();
    }
    versions
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn pip_blocked(override_version: &Option<MajorMinor>) -> String {
    match override_version {
        Some(v) => format!("pip is blocked outside a virtual environment (selected python {v})"),
        None => "pip is blocked outside a virtual environment".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_messages() {
        let err = Failure::VersionNotFound {
            requested: MajorMinor::new(3, 7),
            available: vec![MajorMinor::new(3, 12), MajorMinor::new(3, 11)],
        };
        assert_eq!(err.to_string(), "python 3.7 was not found (available: 3.12, 3.11)");

        let err = Failure::PipBlocked {
            override_version: Some(MajorMinor::new(3, 12)),
        };
        assert!(err.to_string().contains("selected python 3.12"));
        assert!(err.remediation().contains("pyswitch use 3.12 --build"));
    }

    #[test]
    fn test_remediation_for_empty_registry() {
        let err = Failure::NoDefaultInterpreter { available: vec![] };
        assert!(err.remediation().starts_with("Install Python 3"));
    }
}
