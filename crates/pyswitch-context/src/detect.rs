use crate::own_version::own_version;
use crate::{EnvKind, EnvironmentContext, VersionCache};
use pyswitch_discovery::{CommandProbe, Probe};
use pyswitch_platform::env::{Export, Vars};
use pyswitch_version::MajorMinor;
use std::path::{Path, PathBuf};

const MARKERS: &[(&str, EnvKind)] = &[
    ("VIRTUAL_ENV", EnvKind::Venv),
    ("CONDA_PREFIX", EnvKind::Conda),
    ("POETRY_ACTIVE", EnvKind::Poetry),
    ("PIPENV_ACTIVE", EnvKind::Pipenv),
];

/// Result of a detection pass. `export` is set when a venv was adopted from
/// `PATH` and `VIRTUAL_ENV` must be propagated by the calling layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    pub context: EnvironmentContext,
    pub export:  Option<Export>,
}

pub struct Detector<P = CommandProbe> {
    probe:   P,
    managed: Vec<PathBuf>,
}

impl Default for Detector<CommandProbe> {
    fn default() -> Self { Self::new(CommandProbe) }
}

impl<P: Probe> Detector<P> {
    pub fn new(probe: P) -> Self {
        Self {
            probe,
            managed: Vec::new(),
        }
    }

    /// Published artifacts, ignored by the `PATH` heuristic.
    pub fn managed(mut self, links: impl IntoIterator<Item = PathBuf>) -> Self {
        self.managed = links.into_iter().collect();
        self
    }

    pub fn detect(&self, vars: &mut Vars) -> Detection {
        for (marker, kind) in MARKERS {
            let Some(value) = vars.get(marker).filter(|v| !v.is_empty()) else {
                continue;
            };
            let root = match kind {
                EnvKind::Venv | EnvKind::Conda => Some(PathBuf::from(value)),
                _ => None,
            };
            tracing::debug!(%marker, kind = %kind, "environment marker present");
            return Detection {
                context: EnvironmentContext::new(*kind, root),
                export:  None,
            };
        }

        match self.venv_on_path(vars) {
            Some(root) => {
                tracing::debug!(root = %root.display(), "adopting virtual environment from PATH");
                let export = Export::set("VIRTUAL_ENV", root.display().to_string());
                vars.apply(&export);
                Detection {
                    context: EnvironmentContext::new(EnvKind::Venv, Some(root)),
                    export:  Some(export),
                }
            }
            None => Detection {
                context: EnvironmentContext::none(),
                export:  None,
            },
        }
    }

    /// Own version of the environment; `None` when unknown.
    pub fn own_version(
        &self,
        ctx: &EnvironmentContext,
        cache: &mut VersionCache,
    ) -> Option<MajorMinor> {
        own_version(ctx, cache, &self.probe)
    }

    fn venv_on_path(&self, vars: &Vars) -> Option<PathBuf> {
        let found = vars
            .find_program("python", &self.managed)
            .or_else(|| vars.find_program("python3", &self.managed))?;
        venv_root(&found)
    }
}

/// `<root>` for a `<root>/bin/python*` path whose root looks like a venv.
fn venv_root(exe: &Path) -> Option<PathBuf> {
    let name = exe.file_name()?.to_str()?;
    if !name.starts_with("python") {
        return None;
    }
    let bin = exe.parent()?;
    if bin.file_name()? != "bin" {
        return None;
    }
    let root = bin.parent()?;
    (bin.join("activate").is_file() && root.join("pyvenv.cfg").is_file()).then(|| root.to_path_buf())
}
