use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("command failed: {cmd}, source: {source}")]
    CommandFailed { cmd: String, source: std::io::Error },

    #[error("command exited with {status}: {cmd}")]
    CommandStatus { cmd: String, status: std::process::ExitStatus },

    #[error("command produced no output: {cmd}")]
    EmptyOutput { cmd: String },
}
