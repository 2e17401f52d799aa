//! Search roots and their glob expansion.

use globset::Glob;
use pyswitch_platform::dir::expand_home;
use std::path::{Component, Path, PathBuf};

/// Scan order: user-local, home-level managers, vendor/package-manager
/// locations, system locations, custom install trees. Order only matters
/// for dedupe ties.
pub const DEFAULT_SEARCH_ROOTS: &[&str] = &[
    "~/.local/bin",
    "~/.pyenv/versions/*/bin",
    "~/.local/share/uv/python/*/bin",
    "~/.asdf/installs/python/*/bin",
    "/opt/homebrew/bin",
    "/opt/homebrew/opt/python@*/bin",
    "/usr/local/opt/python@*/bin",
    "/Library/Frameworks/Python.framework/Versions/*/bin",
    "/usr/local/bin",
    "/usr/bin",
    "/bin",
    "/opt/python*/bin",
    "/usr/local/python*/bin",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRoots {
    patterns: Vec<String>,
}

impl Default for SearchRoots {
    fn default() -> Self {
        Self::new(DEFAULT_SEARCH_ROOTS.iter().map(|s| s.to_string()))
    }
}

impl SearchRoots {
    pub fn new(patterns: impl IntoIterator<Item = String>) -> Self {
        Self {
            patterns: patterns.into_iter().collect(),
        }
    }

    pub fn push(mut self, pattern: impl Into<String>) -> Self {
        self.patterns.push(pattern.into());
        self
    }

    pub fn patterns(&self) -> &[String] { &self.patterns }

    /// Existing directories, in pattern order. Glob components match
    /// sorted directory entries; duplicates keep their first position.
    pub fn expand(&self, home: &Path) -> Vec<PathBuf> {
        let mut dirs: Vec<PathBuf> = Vec::new();
        for pattern in &self.patterns {
            for dir in expand_pattern(&expand_home(pattern, home)) {
                if !dirs.contains(&dir) {
                    dirs.push(dir);
                }
            }
        }
        dirs
    }
}

fn is_glob(component: &str) -> bool { component.contains(['*', '?', '[']) }

fn expand_pattern(pattern: &Path) -> Vec<PathBuf> {
    let mut bases = vec![PathBuf::new()];

    for component in pattern.components() {
        let part = match component {
            Component::Normal(part) => part.to_string_lossy(),
            other => {
                bases.iter_mut().for_each(|b| b.push(other.as_os_str()));
                continue;
            }
        };

        if !is_glob(&part) {
            bases.iter_mut().for_each(|b| b.push(&*part));
            continue;
        }

        let matcher = match Glob::new(&part) {
            Ok(glob) => glob.compile_matcher(),
            Err(err) => {
                tracing::debug!(pattern = %pattern.display(), error = %err, "invalid search root glob");
                return Vec::new();
            }
        };

        bases = bases
            .iter()
            .flat_map(|base| {
                let mut hits: Vec<PathBuf> = std::fs::read_dir(base)
                    .into_iter()
                    .flatten()
                    .flatten()
                    .filter(|entry| matcher.is_match(entry.file_name()))
                    .map(|entry| entry.path())
                    .collect();
                hits.sort();
                hits
            })
            .collect();
    }

    bases.into_iter().filter(|p| p.is_dir()).collect()
}
