//! Platform helpers for pyswitch.
//!
//! [`env::Vars`] is the session's view of its environment variables. It is a
//! snapshot that the engine reads and mutates through [`env::Export`]s; the
//! process environment itself is never written, so callers decide how to
//! apply the exports (print them for `eval`, or set them on a child).

pub use error::{Error, Result};

pub mod command;
pub mod dir;
pub mod env;
mod error;
