//! The resolution decision procedure.
//!
//! [`decide`] is a pure function of its [`Inputs`]: it reads the registry,
//! the detected environment and the override state, and asks a [`Locate`]
//! implementation where binaries live. Precedence, highest first:
//!
//! 1. bypass: the unmanaged binary, as if pyswitch were not installed;
//! 2. an active environment;
//! 3. the selected override;
//! 4. the default, which is a failure.
//!
//! Installers (`pip`, `python -m pip`) outside an environment are refused
//! unless build mode is on.

use crate::request::{CommandKind, ResolutionRequest};
use crate::{Failure, Locate, OverrideState, Result};
use pyswitch_context::EnvironmentContext;
use pyswitch_discovery::Registry;
use pyswitch_platform::env::Vars;
use pyswitch_version::MajorMinor;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

pub const BYPASS_VAR: &str = "PYSWITCH_BYPASS";
pub const ALLOW_SYSTEM_VAR: &str = "PYSWITCH_ALLOW_SYSTEM";

pub const DEFAULT_AUTOMATION_VARS: &[&str] = &[
    "CI",
    "GITHUB_ACTIONS",
    "GITLAB_CI",
    "BUILDKITE",
    "JENKINS_URL",
    "TF_BUILD",
    "CLAUDECODE",
];

pub const DEFAULT_SANDBOX_VARS: &[&str] = &["container", "FLATPAK_ID", "SNAP", "PYSWITCH_SANDBOX"];

/// Variables whose presence switches the engine into bypass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyMarkers {
    pub automation: Vec<String>,
    pub sandbox:    Vec<String>,
}

impl Default for PolicyMarkers {
    fn default() -> Self {
        Self {
            automation: DEFAULT_AUTOMATION_VARS.iter().map(|s| s.to_string()).collect(),
            sandbox:    DEFAULT_SANDBOX_VARS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Indicators {
    pub bypass:       bool,
    pub allow_system: bool,
}

impl Indicators {
    pub fn from_vars(vars: &Vars, markers: &PolicyMarkers, interactive: bool) -> Self {
        let hit = |names: &[String]| names.iter().find(|n| vars.is_truthy(n)).cloned();

        let reason = if vars.is_truthy(BYPASS_VAR) {
            Some(BYPASS_VAR.to_string())
        } else if let Some(name) = hit(&markers.automation) {
            Some(name)
        } else if !interactive {
            Some("non-interactive".to_string())
        } else {
            hit(&markers.sandbox)
        };

        if let Some(reason) = &reason {
            tracing::debug!(%reason, "bypass active");
        }

        Self {
            bypass:       reason.is_some(),
            allow_system: vars.is_truthy(ALLOW_SYSTEM_VAR),
        }
    }
}

/// Run `program` with `args`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub program: PathBuf,
    pub args:    Vec<OsString>,
}

impl Decision {
    pub fn new(program: impl Into<PathBuf>, args: Vec<OsString>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

pub struct Inputs<'a> {
    pub request:     &'a ResolutionRequest,
    pub registry:    &'a Registry,
    pub context:     &'a EnvironmentContext,
    /// Own version of `context`; `None` when unknown or no environment.
    pub own_version: Option<MajorMinor>,
    pub state:       &'a OverrideState,
    pub indicators:  Indicators,
}

pub fn decide(inputs: &Inputs<'_>, locate: &dyn Locate) -> Result<Decision> {
    if inputs.indicators.bypass {
        return Ok(bypass(inputs, locate));
    }
    if inputs.context.is_active() {
        return in_environment(inputs, locate);
    }

    let Inputs {
        request,
        registry,
        state,
        ..
    } = inputs;

    if let Some(selected) = state.selected() {
        let stale = registry
            .get(&selected)
            .is_none_or(|r| !locate.is_executable(&r.path));
        if stale {
            return Err(Failure::StaleOverride { version: selected });
        }
    }

    if request.reaches_installer() && !state.build_mode() {
        return Err(Failure::PipBlocked {
            override_version: state.selected(),
        });
    }

    match request.command {
        CommandKind::InterpreterVersioned(v) => {
            Ok(Decision::new(&registered(registry, v)?.path, request.args.clone()))
        }
        CommandKind::InstallerVersioned(v) => {
            Ok(Decision::new(&registered(registry, v)?.path, request.as_module_args()))
        }
        CommandKind::InterpreterBare | CommandKind::InterpreterMajor(_) => {
            let python = selected_python(inputs)?;
            Ok(Decision::new(python, request.args.clone()))
        }
        CommandKind::InstallerBare => {
            let python = selected_python(inputs)?;
            Ok(Decision::new(python, request.as_module_args()))
        }
    }
}

fn registered(registry: &Registry, version: MajorMinor) -> Result<&pyswitch_discovery::InterpreterRecord> {
    registry.get(&version).ok_or_else(|| Failure::VersionNotFound {
        requested: version,
        available: registry.versions_descending(),
    })
}

/// The override's interpreter, or the default failure when none is
/// selected. `PYSWITCH_ALLOW_SYSTEM` does not change this outcome.
fn selected_python<'a>(inputs: &Inputs<'a>) -> Result<&'a Path> {
    let available = inputs.registry.versions_descending();
    match inputs.state.selected() {
        Some(v) => Ok(registered(inputs.registry, v)?.path.as_path()),
        None => {
            if inputs.indicators.allow_system {
                tracing::debug!("system interpreters allowed, but no default is selected");
            }
            Err(Failure::NoDefaultInterpreter { available })
        }
    }
}

fn bypass(inputs: &Inputs<'_>, locate: &dyn Locate) -> Decision {
    let request = inputs.request;
    if let Some(program) = locate.unmanaged(&request.name) {
        return Decision::new(program, request.args.clone());
    }
    if let Some(latest) = inputs.registry.latest() {
        tracing::debug!(command = %request.name, fallback = %latest.path.display(), "bypass fallback");
        let args = if request.command.is_installer() {
            request.as_module_args()
        } else {
            request.args.clone()
        };
        return Decision::new(&latest.path, args);
    }
    Decision::new(&request.name, request.args.clone())
}

fn in_environment(inputs: &Inputs<'_>, locate: &dyn Locate) -> Result<Decision> {
    let Inputs {
        request, context, ..
    } = inputs;
    let args = || request.args.clone();

    if let Some(exact) = locate.in_environment(context, &request.name) {
        return Ok(Decision::new(exact, args()));
    }

    let generic = request.command.generic_name();
    if let (Some(requested), Some(actual)) = (request.command.version(), inputs.own_version) {
        if requested != actual {
            return Err(Failure::VersionMismatch { requested, actual });
        }
    }

    let program = locate
        .in_environment(context, generic)
        .or_else(|| locate.unmanaged(&request.name))
        .unwrap_or_else(|| PathBuf::from(&request.name));
    Ok(Decision::new(program, args()))
}
