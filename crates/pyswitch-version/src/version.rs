//! Version types and operations.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Python 2 is recognised only so it can be rejected.
pub const LEGACY_MAJOR: u64 = 2;

static MAJOR_MINOR_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?<major>[0-9]+)\.(?<minor>[0-9]+)$").unwrap());

static FILE_NAME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^python(?<major>[0-9]+)\.(?<minor>[0-9]+)$").unwrap());

static BANNER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^Python (?<major>[0-9]+)\.(?<minor>[0-9]+)(?:\.(?<patch>[0-9]+))?").unwrap()
});

static TRIPLE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?<major>[0-9]+)\.(?<minor>[0-9]+)(?:\.(?<patch>[0-9]+))?$").unwrap()
});

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionError {
    #[error("invalid version format: '{0}' (expected major.minor, e.g. 3.12)")]
    InvalidFormat(String),
    #[error("not a Python version banner: '{0}'")]
    NotPythonBanner(String),
    #[error("version component out of range: '{0}'")]
    OutOfRange(String),
}

/// A `major.minor` pair, ordered numerically (`3.9 < 3.10`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MajorMinor {
    pub major: u64,
    pub minor: u64,
}

impl MajorMinor {
    pub const fn new(major: u64, minor: u64) -> Self { Self { major, minor } }

    /// Strict `X.Y` parse.
    pub fn parse(s: &str) -> Result<Self, VersionError> {
        let caps = MAJOR_MINOR_REGEX
            .captures(s)
            .ok_or_else(|| VersionError::InvalidFormat(s.to_string()))?;
        Ok(Self {
            major: component(&caps, "major", s)?,
            minor: component(&caps, "minor", s)?,
        })
    }

    /// Normalize user input such as `python3.12`, `py3.12` or ` 3.12 `.
    pub fn normalize(input: &str) -> Result<Self, VersionError> {
        let trimmed = input.trim();
        let lower = trimmed.to_ascii_lowercase();
        let bare = lower
            .strip_prefix("python")
            .or_else(|| lower.strip_prefix("py"))
            .unwrap_or(&lower);

        Self::parse(bare).map_err(|_| VersionError::InvalidFormat(input.to_string()))
    }

    /// Exact `pythonX.Y` file names only; `python3` and `python` yield `None`.
    pub fn from_file_name(name: &str) -> Option<Self> {
        let caps = FILE_NAME_REGEX.captures(name)?;
        Some(Self {
            major: caps["major"].parse().ok()?,
            minor: caps["minor"].parse().ok()?,
        })
    }

    pub fn is_legacy(&self) -> bool { self.major == LEGACY_MAJOR }
}

impl std::str::FromStr for MajorMinor {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> { MajorMinor::parse(s) }
}

impl std::fmt::Display for MajorMinor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// A reported interpreter version; the patch is optional because some
/// banners (and all file names) omit it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PythonVersion {
    pub series: MajorMinor,
    pub patch:  Option<u64>,
}

impl PythonVersion {
    /// Parse a `--version` banner. Only banners starting with `Python ` are
    /// accepted; trailing text (`rc1`, `+`, build tags) is ignored.
    pub fn from_banner(banner: &str) -> Result<Self, VersionError> {
        let line = banner.trim();
        let caps = BANNER_REGEX
            .captures(line)
            .ok_or_else(|| VersionError::NotPythonBanner(line.to_string()))?;
        Self::from_captures(&caps, line)
    }

    /// Parse the `X.Y.Z` line printed from `sys.version_info`.
    pub fn from_triple(text: &str) -> Result<Self, VersionError> {
        let line = text.trim();
        let caps = TRIPLE_REGEX
            .captures(line)
            .ok_or_else(|| VersionError::InvalidFormat(line.to_string()))?;
        Self::from_captures(&caps, line)
    }

    fn from_captures(caps: &regex::Captures<'_>, src: &str) -> Result<Self, VersionError> {
        let patch = match caps.name("patch") {
            Some(p) => Some(
                p.as_str()
                    .parse()
                    .map_err(|_| VersionError::OutOfRange(src.to_string()))?,
            ),
            None => None,
        };
        Ok(Self {
            series: MajorMinor {
                major: component(caps, "major", src)?,
                minor: component(caps, "minor", src)?,
            },
            patch,
        })
    }

    pub fn is_legacy(&self) -> bool { self.series.is_legacy() }
}

impl std::fmt::Display for PythonVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.series)?;
        if let Some(patch) = self.patch {
            write!(f, ".{}", patch)?;
        }
        Ok(())
    }
}

fn component(caps: &regex::Captures<'_>, name: &str, src: &str) -> Result<u64, VersionError> {
    caps[name]
        .parse()
        .map_err(|_| VersionError::OutOfRange(src.to_string()))
}
