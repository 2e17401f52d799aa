//! Isolated environment detection.
//!
//! An isolated environment is recognised from its activation markers
//! (`VIRTUAL_ENV`, `CONDA_PREFIX`, `POETRY_ACTIVE`, `PIPENV_ACTIVE`) or, when
//! none is set, from the shape of the `python` found first on `PATH`.
//! Detection runs per request; only the environment's own version is cached.

pub use context::{EnvKind, EnvironmentContext};
pub use detect::{Detection, Detector};
pub use own_version::{VersionCache, read_pyvenv_cfg};

mod context;
mod detect;
mod own_version;
