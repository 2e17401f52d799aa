use std::collections::BTreeMap;
use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// A change to a session variable that the calling layer must apply to the
/// real environment for it to reach subprocesses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Export {
    Set { name: String, value: String },
    Unset { name: String },
}

impl Export {
    pub fn set(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Set {
            name:  name.into(),
            value: value.into(),
        }
    }

    pub fn unset(name: impl Into<String>) -> Self { Self::Unset { name: name.into() } }

    pub fn name(&self) -> &str {
        match self {
            Self::Set { name, .. } | Self::Unset { name } => name,
        }
    }

    /// POSIX shell statement, suitable for `eval`.
    pub fn to_shell(&self) -> String {
        match self {
            Self::Set { name, value } => {
                format!("export {}='{}'", name, value.replace('\'', r"'\''"))
            }
            Self::Unset { name } => format!("unset {}", name),
        }
    }
}

/// Snapshot of the session's environment variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vars {
    map: BTreeMap<String, String>,
}

impl Vars {
    /// Capture the current process environment. Variables whose name or
    /// value is not valid UTF-8 are skipped.
    pub fn from_process() -> Self {
        let map = env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect();
        Self { map }
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            map: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> { self.map.get(name).map(String::as_str) }

    /// Present, non-empty, and not an explicit negative (`0`, `false`, `no`, `off`).
    pub fn is_truthy(&self, name: &str) -> bool {
        self.get(name).is_some_and(|v| {
            let v = v.trim();
            !v.is_empty()
                && !["0", "false", "no", "off"]
                    .iter()
                    .any(|neg| v.eq_ignore_ascii_case(neg))
        })
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.map.insert(name.into(), value.into());
    }

    pub fn remove(&mut self, name: &str) { self.map.remove(name); }

    pub fn apply(&mut self, export: &Export) {
        match export {
            Export::Set { name, value } => self.set(name.clone(), value.clone()),
            Export::Unset { name } => self.remove(name),
        }
    }

    /// `$HOME`, falling back to the platform's notion of the home directory.
    pub fn home(&self) -> Option<PathBuf> {
        self.get("HOME")
            .filter(|h| !h.is_empty())
            .map(PathBuf::from)
            .or_else(crate::dir::user_home)
    }

    /// First executable named `program` on this session's `PATH`, skipping
    /// any hit listed in `skip`.
    pub fn find_program(&self, program: &str, skip: &[PathBuf]) -> Option<PathBuf> {
        let path: OsString = self.get("PATH")?.into();
        let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("/"));
        let found = which::which_in_all(program, Some(path), cwd).ok()?;

        found.into_iter().find(|hit| {
            let skipped = skip.iter().any(|s| same_path(s, hit));
            if skipped {
                tracing::trace!(path = %hit.display(), "skipping managed path hit");
            }
            !skipped
        })
    }
}

fn same_path(a: &Path, b: &Path) -> bool {
    fn normalize(p: &Path) -> String { p.to_string_lossy().trim_end_matches('/').to_string() }
    normalize(a) == normalize(b)
}
