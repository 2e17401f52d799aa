//! Filesystem primitives used by discovery and the link publisher.
//!
//! - [`resolve_real_path`] follows a symlink chain with an explicit hop bound,
//!   so cyclic links surface as [`Error::TooManyLinks`] instead of hanging.
//! - [`atomic_symlink`] retargets a link through a temporary sibling and a
//!   rename, so readers never observe a missing link.
//! - [`is_executable`] checks a regular file with execute permission.

mod error;
mod exec;
mod link;

pub use error::{Error, Result, from_io};
pub use exec::is_executable;
pub use link::{MAX_LINK_HOPS, atomic_symlink, points_to, remove_link, resolve_real_path};
