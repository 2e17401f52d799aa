//! Interpreter resolution for `python`/`pip` shims.
//!
//! # Architecture
//!
//! A [`Session`] owns everything one shell session needs: the discovered
//! [`pyswitch_discovery::Registry`], the [`OverrideState`] set by the user,
//! and the [`Publisher`] for the `python`/`python3` links. Requests go
//! through [`Session::resolve`], which gathers inputs and hands them to the
//! pure [`policy::decide`].
//!
//! Nothing here writes to the process environment. State changes come back
//! as [`pyswitch_platform::env::Export`] values for the caller to apply.
//!
//! # Example
//!
//! ```
//! use pyswitch_shim::{CommandKind, ResolutionRequest};
//!
//! let req = ResolutionRequest::new("python3.12", ["-m", "pip", "list"]).unwrap();
//! assert!(matches!(req.command, CommandKind::InterpreterVersioned(_)));
//! assert!(req.is_installer_module());
//! ```

pub use error::{Failure, Result};
pub use locate::{Locate, PathLocator};
pub use policy::{Decision, Indicators, PolicyMarkers};
pub use publish::Publisher;
pub use request::{CommandKind, ResolutionRequest};
pub use session::{ClearOutcome, Session, SessionConfig};
pub use state::OverrideState;

mod error;
mod locate;
pub mod policy;
pub mod publish;
mod request;
mod session;
pub mod state;
