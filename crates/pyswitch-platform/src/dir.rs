//! User directories and `~` expansion.

use std::env;
use std::path::{Path, PathBuf};

pub fn user_home() -> Option<PathBuf> {
    home::home_dir()
}

/// - macOS: `~/Library/Application Support`
/// - others: `$XDG_CONFIG_HOME` or `~/.config`
pub fn user_config() -> Option<PathBuf> {
    #[cfg(target_os = "macos")]
    {
        user_home().map(|p| p.join("Library/Application Support"))
    }
    #[cfg(not(target_os = "macos"))]
    {
        env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| user_home().map(|p| p.join(".config")))
    }
}

/// `~/.local/bin`, the user-local directory that wins interpreter dedupe.
pub fn user_local_bin(home: &Path) -> PathBuf {
    home.join(".local").join("bin")
}

/// Replace a leading `~` (alone or followed by `/`) with `home`.
pub fn expand_home(pattern: &str, home: &Path) -> PathBuf {
    if pattern == "~" {
        return home.to_path_buf();
    }
    match pattern.strip_prefix("~/") {
        Some(rest) => home.join(rest),
        None => PathBuf::from(pattern),
    }
}
