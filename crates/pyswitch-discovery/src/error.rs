use std::path::PathBuf;
use thiserror::Error;

/// Reasons a candidate is dropped during a scan. These never leave the
/// crate as failures; [`crate::Scanner::scan`] logs and skips them.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{} is not a usable Python interpreter: {reason}", .path.display())]
    NotAPythonInterpreter { path: PathBuf, reason: String },

    #[error(transparent)]
    Fs(#[from] pyswitch_fs::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn rejected(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::NotAPythonInterpreter {
            path:   path.into(),
            reason: reason.into(),
        }
    }
}
