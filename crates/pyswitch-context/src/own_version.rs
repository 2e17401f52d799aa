use crate::{EnvKind, EnvironmentContext};
use once_cell::sync::Lazy;
use pyswitch_discovery::Probe;
use pyswitch_version::{MajorMinor, PythonVersion};
use regex::Regex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

static CFG_VERSION_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?<major>[0-9]+)\.(?<minor>[0-9]+)").unwrap());

/// Own versions of environments seen in this session, keyed by root.
/// A cached `None` means the version could not be determined.
#[derive(Debug, Clone, Default)]
pub struct VersionCache {
    entries: HashMap<PathBuf, Option<MajorMinor>>,
}

impl VersionCache {
    pub fn new() -> Self { Self::default() }

    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    pub(crate) fn get_or_insert_with(
        &mut self,
        root: &Path,
        compute: impl FnOnce() -> Option<MajorMinor>,
    ) -> Option<MajorMinor> {
        if let Some(hit) = self.entries.get(root) {
            tracing::debug!(root = %root.display(), "environment version cache hit");
            return *hit;
        }
        let version = compute();
        self.entries.insert(root.to_path_buf(), version);
        version
    }
}

/// Major.minor from the `version` (or `version_info`) line of a venv's
/// `pyvenv.cfg`.
pub fn read_pyvenv_cfg(root: &Path) -> Option<MajorMinor> {
    let text = std::fs::read_to_string(root.join("pyvenv.cfg")).ok()?;
    let mut fallback = None;

    for line in text.lines() {
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let parsed = CFG_VERSION_REGEX
            .captures(value.trim())
            .and_then(|c| Some(MajorMinor::new(c["major"].parse().ok()?, c["minor"].parse().ok()?)));
        match key.trim() {
            "version" => return parsed,
            "version_info" => fallback = fallback.or(parsed),
            _ => {}
        }
    }
    fallback
}

pub(crate) fn own_version<P: Probe>(
    ctx: &EnvironmentContext,
    cache: &mut VersionCache,
    probe: &P,
) -> Option<MajorMinor> {
    let root = ctx.root.as_deref()?;
    let introspect = |root: &Path| {
        probe
            .introspect(&root.join("bin").join("python"))
            .and_then(|t| PythonVersion::from_triple(&t).ok())
            .map(|v| v.series)
    };

    match ctx.kind {
        EnvKind::Venv => cache.get_or_insert_with(root, || {
            read_pyvenv_cfg(root).or_else(|| introspect(root))
        }),
        EnvKind::Conda => cache.get_or_insert_with(root, || introspect(root)),
        EnvKind::Poetry | EnvKind::Pipenv | EnvKind::None => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn test_pyvenv_cfg_version_line() {
        let root = tempdir().unwrap();
        std::fs::write(
            root.path().join("pyvenv.cfg"),
            "home = /usr/bin\ninclude-system-site-packages = false\nversion = 3.11.9\n",
        )
        .unwrap();
        assert_eq!(read_pyvenv_cfg(root.path()), Some(MajorMinor::new(3, 11)));
    }

    #[test]
    fn test_pyvenv_cfg_version_info_fallback() {
        let root = tempdir().unwrap();
        std::fs::write(
            root.path().join("pyvenv.cfg"),
            "home = /opt/bin\nversion_info = 3.12.4.final.0\n",
        )
        .unwrap();
        assert_eq!(read_pyvenv_cfg(root.path()), Some(MajorMinor::new(3, 12)));
    }

    #[test]
    fn test_pyvenv_cfg_missing_or_unversioned() {
        let root = tempdir().unwrap();
        assert_eq!(read_pyvenv_cfg(root.path()), None);
        std::fs::write(root.path().join("pyvenv.cfg"), "home = /usr/bin\n").unwrap();
        assert_eq!(read_pyvenv_cfg(root.path()), None);
    }
}
