//! Interpreter discovery.
//!
//! [`Scanner::scan`] walks an ordered list of search roots, identifies every
//! usable Python 3 interpreter, and folds them into a [`Registry`] holding one
//! [`InterpreterRecord`] per major.minor series.
//!
//! Version identification prefers the file name (`python3.12`), then the
//! `--version` banner, then `sys.version_info` introspection. Probing goes
//! through the [`Probe`] trait so callers can substitute their own.
//!
//! When two candidates claim the same series, a candidate in the user-local
//! directory wins; otherwise the higher patch wins; otherwise the first one
//! seen is kept.

pub use error::{Error, Result};
pub use probe::{CommandProbe, Probe};
pub use registry::{InterpreterRecord, Registry};
pub use roots::{DEFAULT_SEARCH_ROOTS, SearchRoots};
pub use scan::Scanner;

mod error;
mod probe;
mod registry;
mod roots;
mod scan;
