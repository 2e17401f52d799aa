use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnvKind {
    None,
    Venv,
    Conda,
    Poetry,
    Pipenv,
}

impl EnvKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Venv => "venv",
            Self::Conda => "conda",
            Self::Poetry => "poetry",
            Self::Pipenv => "pipenv",
        }
    }
}

impl fmt::Display for EnvKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// The isolated environment active for a request, if any.
///
/// `root` is the venv directory or `CONDA_PREFIX`. Poetry and pipenv are
/// recognised from their markers alone and carry no root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentContext {
    pub kind: EnvKind,
    pub root: Option<PathBuf>,
}

impl EnvironmentContext {
    pub fn none() -> Self {
        Self {
            kind: EnvKind::None,
            root: None,
        }
    }

    pub fn new(kind: EnvKind, root: Option<PathBuf>) -> Self { Self { kind, root } }

    pub fn is_active(&self) -> bool { self.kind != EnvKind::None }

    /// `<root>/bin`, for environments that have a root.
    pub fn bin_dir(&self) -> Option<PathBuf> { self.root.as_deref().map(|r| r.join("bin")) }

    /// `<root>/bin/<name>` when it exists.
    pub fn binary(&self, name: &str) -> Option<PathBuf> {
        self.bin_dir()
            .map(|bin| bin.join(name))
            .filter(|p| p.exists())
    }
}

impl Default for EnvironmentContext {
    fn default() -> Self { Self::none() }
}

impl fmt::Display for EnvironmentContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.root {
            Some(root) => write!(f, "{} ({})", self.kind, root.display()),
            None => write!(f, "{}", self.kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_binary_requires_existing_file() {
        let root = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(root.path().join("bin")).unwrap();
        std::fs::write(root.path().join("bin/python"), "").unwrap();

        let ctx = EnvironmentContext::new(EnvKind::Venv, Some(root.path().to_path_buf()));
        assert_eq!(ctx.binary("python"), Some(root.path().join("bin/python")));
        assert_eq!(ctx.binary("python3.12"), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(EnvironmentContext::none().to_string(), "none");
        assert_eq!(
            EnvironmentContext::new(EnvKind::Conda, Some(PathBuf::from("/opt/conda"))).to_string(),
            "conda (/opt/conda)"
        );
        assert!(!EnvironmentContext::none().is_active());
        assert!(EnvironmentContext::new(EnvKind::Poetry, None).is_active());
    }
}
