use pyswitch_version::{MajorMinor, PythonVersion};
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::path::{Path, PathBuf};

/// One discovered interpreter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterpreterRecord {
    pub version:   MajorMinor,
    pub patch:     Option<u64>,
    /// Path as found in the search root.
    pub path:      PathBuf,
    /// `path` with symlinks followed.
    pub real_path: PathBuf,
    pub banner:    Option<String>,
}

impl InterpreterRecord {
    pub fn full_version(&self) -> PythonVersion {
        PythonVersion {
            series: self.version,
            patch:  self.patch,
        }
    }

    pub fn is_in(&self, dir: &Path) -> bool { self.path.parent() == Some(dir) }
}

/// Deduplicated mapping from major.minor to interpreter. Iteration is
/// ascending by numeric `(major, minor)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registry {
    records: BTreeMap<MajorMinor, InterpreterRecord>,
}

impl Registry {
    pub fn new() -> Self { Self::default() }

    pub fn get(&self, version: &MajorMinor) -> Option<&InterpreterRecord> {
        self.records.get(version)
    }

    pub fn contains(&self, version: &MajorMinor) -> bool { self.records.contains_key(version) }

    pub fn versions(&self) -> Vec<MajorMinor> { self.records.keys().copied().collect() }

    pub fn versions_descending(&self) -> Vec<MajorMinor> {
        self.records.keys().rev().copied().collect()
    }

    pub fn latest(&self) -> Option<&InterpreterRecord> { self.records.values().next_back() }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &InterpreterRecord> { self.records.values() }

    pub fn len(&self) -> usize { self.records.len() }

    pub fn is_empty(&self) -> bool { self.records.is_empty() }

    /// Insert `candidate`, resolving a collision with an existing record of
    /// the same series. Returns whether the candidate was kept.
    pub fn offer(&mut self, candidate: InterpreterRecord, user_local: &Path) -> bool {
        match self.records.entry(candidate.version) {
            Entry::Vacant(slot) => {
                slot.insert(candidate);
                true
            }
            Entry::Occupied(mut slot) => {
                if supersedes(&candidate, slot.get(), user_local) {
                    tracing::debug!(
                        version = %candidate.version,
                        kept = %candidate.path.display(),
                        dropped = %slot.get().path.display(),
                        "replacing duplicate interpreter"
                    );
                    slot.insert(candidate);
                    true
                } else {
                    tracing::debug!(
                        version = %candidate.version,
                        kept = %slot.get().path.display(),
                        dropped = %candidate.path.display(),
                        "ignoring duplicate interpreter"
                    );
                    false
                }
            }
        }
    }
}

fn supersedes(candidate: &InterpreterRecord, existing: &InterpreterRecord, user_local: &Path) -> bool {
    match (candidate.is_in(user_local), existing.is_in(user_local)) {
        (true, false) => true,
        (_, true) => false,
        (false, false) => match (candidate.patch, existing.patch) {
            (Some(new), Some(old)) => new > old,
            _ => false,
        },
    }
}

impl<'a> IntoIterator for &'a Registry {
    type Item = &'a InterpreterRecord;
    type IntoIter = std::collections::btree_map::Values<'a, MajorMinor, InterpreterRecord>;

    fn into_iter(self) -> Self::IntoIter { self.records.values() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(path: &str, version: (u64, u64), patch: Option<u64>) -> InterpreterRecord {
        InterpreterRecord {
            version: MajorMinor::new(version.0, version.1),
            patch,
            path: PathBuf::from(path),
            real_path: PathBuf::from(path),
            banner: None,
        }
    }

    const LOCAL: &str = "/home/dev/.local/bin";

    #[test]
    fn test_versions_ascending_numeric() {
        let mut reg = Registry::new();
        for (minor, path) in [(9, "/a/python3.9"), (10, "/a/python3.10"), (2, "/a/python3.2")] {
            reg.offer(record(path, (3, minor), None), Path::new(LOCAL));
        }
        let shown: Vec<String> = reg.versions().iter().map(ToString::to_string).collect();
        assert_eq!(shown, vec!["3.2", "3.9", "3.10"]);
        assert_eq!(reg.latest().map(|r| r.version), Some(MajorMinor::new(3, 10)));
        assert_eq!(
            reg.versions_descending(),
            vec![MajorMinor::new(3, 10), MajorMinor::new(3, 9), MajorMinor::new(3, 2)]
        );
    }

    #[test]
    fn test_user_local_beats_higher_patch() {
        let mut reg = Registry::new();
        let local = Path::new(LOCAL);
        reg.offer(record("/usr/bin/python3.12", (3, 12), Some(8)), local);
        assert!(reg.offer(record("/home/dev/.local/bin/python3.12", (3, 12), Some(1)), local));
        assert!(!reg.offer(record("/opt/python3.12", (3, 12), Some(9)), local));
        assert!(!reg.offer(record("/home/dev/.local/bin/python3", (3, 12), Some(7)), local));

        let kept = reg.get(&MajorMinor::new(3, 12)).unwrap();
        assert_eq!(kept.path, PathBuf::from("/home/dev/.local/bin/python3.12"));
    }

    #[test]
    fn test_higher_patch_wins() {
        let mut reg = Registry::new();
        let local = Path::new(LOCAL);
        reg.offer(record("/usr/bin/python3.11", (3, 11), Some(11)), local);
        reg.offer(record("/opt/homebrew/bin/python3.11", (3, 11), Some(12)), local);
        reg.offer(record("/usr/local/bin/python3.11", (3, 11), Some(12)), local);

        let kept = reg.get(&MajorMinor::new(3, 11)).unwrap();
        assert_eq!(kept.path, PathBuf::from("/opt/homebrew/bin/python3.11"));
        assert_eq!(kept.full_version().to_string(), "3.11.12");
    }

    #[test]
    fn test_unknown_patch_keeps_first() {
        let mut reg = Registry::new();
        let local = Path::new(LOCAL);
        reg.offer(record("/usr/bin/python3.10", (3, 10), None), local);
        assert!(!reg.offer(record("/opt/python3.10", (3, 10), Some(4)), local));
        assert_eq!(reg.len(), 1);
        assert_eq!(
            reg.get(&MajorMinor::new(3, 10)).unwrap().path,
            PathBuf::from("/usr/bin/python3.10")
        );
    }
}
