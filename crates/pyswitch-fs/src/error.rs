use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("path not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("permission denied: {}", .0.display())]
    PermissionDenied(PathBuf),

    #[error("symlink chain at {} exceeds {max} hops", .path.display())]
    TooManyLinks { path: PathBuf, max: usize },

    #[error("failed to read link {}: {source}", .path.display())]
    ReadLink {
        path:   PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path:   PathBuf,
        source: std::io::Error,
    },

    #[error("symlink not supported on this platform")]
    SymlinkNotSupported,
}

pub type Result<T> = std::result::Result<T, Error>;

pub fn from_io(path: impl Into<PathBuf>, err: std::io::Error) -> Error {
    let path = path.into();
    match err.kind() {
        std::io::ErrorKind::NotFound => Error::NotFound(path),
        std::io::ErrorKind::PermissionDenied => Error::PermissionDenied(path),
        _ => Error::Write { path, source: err },
    }
}
