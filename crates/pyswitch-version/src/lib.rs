//! Version parsing and ordering for Python interpreters.
//!
//! The primary key everywhere is the major.minor pair ([`MajorMinor`]).
//! A patch number is only carried by [`PythonVersion`] and is used for
//! tie-breaking between two interpreters of the same series.
//!
//! # Sources
//!
//! - **File name**: `python3.12` encodes an exact major.minor.
//! - **Banner**: `Python 3.12.1` as printed by `python --version`.
//! - **Introspection**: `3.12.1` as printed from `sys.version_info`.
//! - **User input**: `3.12`, `py3.12`, `python3.12`.

pub use self::version::{LEGACY_MAJOR, MajorMinor, PythonVersion, VersionError};

mod version;
