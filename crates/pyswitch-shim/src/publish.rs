//! Link publishing: the only filesystem writes the engine performs.

use crate::{Failure, Result};
use pyswitch_platform::env::Export;
use std::path::{Path, PathBuf};

pub const ARTIFACT_NAMES: &[&str] = &["python", "python3"];
pub const PYTHON_VAR: &str = "PYTHON";
pub const PYSWITCH_PYTHON_VAR: &str = "PYSWITCH_PYTHON";

/// Owns the `python`/`python3` links in one artifact directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Publisher {
    dir: PathBuf,
}

impl Publisher {
    pub fn new(dir: impl Into<PathBuf>) -> Self { Self { dir: dir.into() } }

    pub fn dir(&self) -> &Path { &self.dir }

    pub fn artifacts(&self) -> Vec<PathBuf> {
        ARTIFACT_NAMES.iter().map(|name| self.dir.join(name)).collect()
    }

    /// Retarget both links at `resolved` and export its path.
    pub fn publish(&self, resolved: &Path) -> Result<Vec<Export>> {
        let failed = |path: &Path, reason: String| Failure::PublishFailed {
            path: path.to_path_buf(),
            reason,
        };

        if !pyswitch_fs::is_executable(resolved) {
            return Err(failed(resolved, "not an executable file".to_string()));
        }
        let artifacts = self.artifacts();
        if artifacts.iter().any(|link| link == resolved) {
            return Err(failed(resolved, "target is one of the managed links".to_string()));
        }
        // Only symlinks are ever replaced.
        for link in &artifacts {
            if std::fs::symlink_metadata(link).is_ok_and(|meta| !meta.file_type().is_symlink()) {
                return Err(failed(link, "exists and is not a symlink".to_string()));
            }
        }
        std::fs::create_dir_all(&self.dir).map_err(|e| failed(&self.dir, e.to_string()))?;

        for link in artifacts {
            pyswitch_fs::atomic_symlink(resolved, &link).map_err(|e| failed(&link, e.to_string()))?;
            tracing::info!(link = %link.display(), target = %resolved.display(), "published link");
        }

        let value = resolved.display().to_string();
        Ok(vec![
            Export::set(PYTHON_VAR, value.clone()),
            Export::set(PYSWITCH_PYTHON_VAR, value),
        ])
    }

    /// Remove the links. With `expected`, only links still pointing there are
    /// touched; links retargeted by someone else are left in place.
    pub fn retract(&self, expected: Option<&Path>) -> Result<Vec<Export>> {
        for link in self.artifacts() {
            if expected.is_some_and(|target| !pyswitch_fs::points_to(&link, target)) {
                tracing::debug!(link = %link.display(), "link retargeted elsewhere; keeping");
                continue;
            }
            let removed = pyswitch_fs::remove_link(&link).map_err(|e| Failure::PublishFailed {
                path:   link.clone(),
                reason: e.to_string(),
            })?;
            if removed {
                tracing::info!(link = %link.display(), "removed link");
            }
        }
        Ok(vec![Export::unset(PYTHON_VAR), Export::unset(PYSWITCH_PYTHON_VAR)])
    }
}
