//! Layered configuration.
//!
//! Sources, lowest precedence first:
//!
//! 1. built-in defaults ([`Profile::default`]);
//! 2. `config.toml` under the user configuration directory, or an explicit file;
//! 3. `PYSWITCH_CONF_*` variables (`PYSWITCH_CONF_ARTIFACT_DIR=~/bin`).

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use pyswitch_discovery::{DEFAULT_SEARCH_ROOTS, SearchRoots};
use pyswitch_platform::dir::{expand_home, user_config, user_local_bin};
use pyswitch_shim::policy::{DEFAULT_AUTOMATION_VARS, DEFAULT_SANDBOX_VARS, PolicyMarkers};
use pyswitch_shim::SessionConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const ENV_PREFIX: &str = "PYSWITCH_CONF_";

#[derive(Debug, Error)]
pub enum Error {
    #[error("config file not found: {}", .0.display())]
    MissingFile(PathBuf),
    #[error(transparent)]
    Figment(#[from] figment::Error),
    #[error(transparent)]
    Toml(#[from] toml::ser::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    /// Replaces the built-in search roots.
    pub search_roots:       Vec<String>,
    /// Appended after `search_roots`.
    pub extra_search_roots: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_local_dir:     Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact_dir:       Option<String>,
    pub automation_vars:    Vec<String>,
    pub sandbox_vars:       Vec<String>,
}

impl Default for Profile {
    fn default() -> Self {
        let owned = |list: &[&str]| list.iter().map(|s| s.to_string()).collect();
        Self {
            search_roots:       owned(DEFAULT_SEARCH_ROOTS),
            extra_search_roots: Vec::new(),
            user_local_dir:     None,
            artifact_dir:       None,
            automation_vars:    owned(DEFAULT_AUTOMATION_VARS),
            sandbox_vars:       owned(DEFAULT_SANDBOX_VARS),
        }
    }
}

impl Profile {
    pub fn to_toml(&self) -> Result<String> { Ok(toml::to_string_pretty(self)?) }

    pub fn search_roots(&self) -> SearchRoots {
        SearchRoots::new(
            self.search_roots
                .iter()
                .chain(&self.extra_search_roots)
                .cloned(),
        )
    }

    /// `~` in directory settings expands to `home`. The artifact directory
    /// defaults to the user-local directory.
    pub fn session_config(&self, home: &Path, interactive: bool) -> SessionConfig {
        let user_local = self
            .user_local_dir
            .as_deref()
            .map(|d| expand_home(d, home))
            .unwrap_or_else(|| user_local_bin(home));
        let artifact_dir = self
            .artifact_dir
            .as_deref()
            .map(|d| expand_home(d, home))
            .unwrap_or_else(|| user_local.clone());

        SessionConfig {
            roots: self.search_roots(),
            home: home.to_path_buf(),
            user_local,
            artifact_dir,
            markers: PolicyMarkers {
                automation: self.automation_vars.clone(),
                sandbox:    self.sandbox_vars.clone(),
            },
            interactive,
        }
    }
}

/// `<user config>/pyswitch/config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    user_config().map(|dir| dir.join("pyswitch").join("config.toml"))
}

#[derive(Debug, Clone, Default)]
pub struct ProfileLoader {
    file:     Option<PathBuf>,
    explicit: bool,
}

impl ProfileLoader {
    pub fn new() -> Self {
        Self {
            file:     default_config_path(),
            explicit: false,
        }
    }

    /// Use `path` instead of the default location. Unlike the default file,
    /// it must exist.
    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self.explicit = true;
        self
    }

    pub fn figment(&self) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Profile::default()));
        if let Some(file) = &self.file {
            figment = figment.merge(Toml::file_exact(file));
        }
        figment.merge(Env::prefixed(ENV_PREFIX))
    }

    pub fn load(&self) -> Result<Profile> {
        if let Some(file) = self.file.as_ref().filter(|_| self.explicit) {
            if !file.is_file() {
                return Err(Error::MissingFile(file.clone()));
            }
        }
        let profile: Profile = self.figment().extract()?;
        tracing::debug!(file = ?self.file, "loaded profile");
        Ok(profile)
    }
}
