use crate::{Error, InterpreterRecord, Probe, Registry, Result, SearchRoots};
use once_cell::sync::Lazy;
use pyswitch_fs::{MAX_LINK_HOPS, is_executable, resolve_real_path};
use pyswitch_version::{MajorMinor, PythonVersion};
use regex::Regex;
use std::path::{Path, PathBuf};

/// `python`, `python3`, `python3.12`, followed by whatever suffix the file
/// carries. A non-empty suffix marks a lookalike (`-config`, `w`, `t`, `-dbg`).
static NAME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^python(?:[0-9]+(?:\.[0-9]+)?)?(?<suffix>.*)$").unwrap());

pub struct Scanner<P> {
    roots:      SearchRoots,
    home:       PathBuf,
    user_local: PathBuf,
    managed:    Vec<PathBuf>,
    probe:      P,
}

impl<P: Probe> Scanner<P> {
    pub fn new(roots: SearchRoots, home: impl Into<PathBuf>, probe: P) -> Self {
        let home = home.into();
        Self {
            roots,
            user_local: pyswitch_platform::dir::user_local_bin(&home),
            home,
            managed: Vec::new(),
            probe,
        }
    }

    pub fn user_local(mut self, dir: impl Into<PathBuf>) -> Self {
        self.user_local = dir.into();
        self
    }

    /// Links owned by the publisher; never treated as candidates.
    pub fn managed(mut self, links: impl IntoIterator<Item = PathBuf>) -> Self {
        self.managed = links.into_iter().collect();
        self
    }

    pub fn scan(&self) -> Registry {
        let mut registry = Registry::new();

        for dir in self.roots.expand(&self.home) {
            for path in candidates(&dir) {
                if self.is_managed(&path) {
                    tracing::trace!(path = %path.display(), "skipping managed link");
                    continue;
                }
                match self.inspect(&path) {
                    Ok(record) => {
                        registry.offer(record, &self.user_local);
                    }
                    Err(err) => tracing::debug!(error = %err, "skipping candidate"),
                }
            }
        }

        tracing::debug!(found = registry.len(), "interpreter scan complete");
        registry
    }

    fn is_managed(&self, path: &Path) -> bool {
        self.managed.iter().any(|m| m == path) && path.is_symlink()
    }

    fn inspect(&self, path: &Path) -> Result<InterpreterRecord> {
        if !is_executable(path) {
            return Err(Error::rejected(path, "not executable"));
        }
        let real_path = resolve_real_path(path, MAX_LINK_HOPS)?;

        let banner = self.probe.banner(path);
        let reported = banner
            .as_deref()
            .and_then(|b| PythonVersion::from_banner(b).ok());

        let file_name = path.file_name().unwrap_or_default().to_string_lossy();
        let version = match MajorMinor::from_file_name(&file_name) {
            Some(series) => PythonVersion {
                series,
                patch: reported
                    .filter(|r| r.series == series)
                    .and_then(|r| r.patch),
            },
            None => match reported {
                Some(reported) => reported,
                None => self
                    .probe
                    .introspect(path)
                    .and_then(|t| PythonVersion::from_triple(&t).ok())
                    .ok_or_else(|| Error::rejected(path, "no version could be determined"))?,
            },
        };

        if version.is_legacy() {
            return Err(Error::rejected(
                path,
                format!("unsupported legacy version {}", version),
            ));
        }

        Ok(InterpreterRecord {
            version: version.series,
            patch: version.patch,
            path: path.to_path_buf(),
            real_path,
            banner,
        })
    }
}

/// Entries of `dir` that follow the interpreter naming convention, sorted
/// by name.
fn candidates(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut found: Vec<PathBuf> = entries
        .flatten()
        .filter(|entry| {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            match NAME_REGEX.captures(&name) {
                Some(caps) if caps["suffix"].is_empty() => true,
                Some(_) => {
                    tracing::trace!(%name, "skipping interpreter lookalike");
                    false
                }
                None => false,
            }
        })
        .map(|entry| entry.path())
        .collect();
    found.sort();
    found
}
