use std::path::{Path, PathBuf};

use crate::{Error, Result, from_io};

/// Upper bound on symlink hops before a chain is treated as cyclic.
pub const MAX_LINK_HOPS: usize = 50;

/// Follow `path` through at most `max_hops` symlinks and return the first
/// non-link path. Relative link targets are resolved against the directory
/// containing the link.
pub fn resolve_real_path(path: impl AsRef<Path>, max_hops: usize) -> Result<PathBuf> {
    let start = path.as_ref();
    let mut current = start.to_path_buf();

    for _ in 0..=max_hops {
        let meta = std::fs::symlink_metadata(&current).map_err(|e| from_io(&current, e))?;
        if !meta.file_type().is_symlink() {
            return Ok(current);
        }

        let target = std::fs::read_link(&current).map_err(|e| Error::ReadLink {
            path:   current.clone(),
            source: e,
        })?;
        current = if target.is_absolute() {
            target
        } else {
            current
                .parent()
                .map(|parent| parent.join(&target))
                .unwrap_or(target)
        };
    }

    Err(Error::TooManyLinks {
        path: start.to_path_buf(),
        max:  max_hops,
    })
}

/// Point `link` at `target`, replacing whatever `link` was before.
#[cfg(unix)]
pub fn atomic_symlink(target: impl AsRef<Path>, link: impl AsRef<Path>) -> Result<()> {
    let target = target.as_ref();
    let link = link.as_ref();

    let file_name = link.file_name().unwrap_or_default().to_string_lossy();
    let tmp_link = link.with_file_name(format!(".{}.tmp", file_name));

    if std::fs::symlink_metadata(&tmp_link).is_ok() {
        std::fs::remove_file(&tmp_link).map_err(|e| from_io(&tmp_link, e))?;
    }

    std::os::unix::fs::symlink(target, &tmp_link).map_err(|e| Error::Write {
        path:   tmp_link.clone(),
        source: e,
    })?;
    std::fs::rename(&tmp_link, link).map_err(|e| Error::Write {
        path:   link.to_path_buf(),
        source: e,
    })
}

#[cfg(not(unix))]
pub fn atomic_symlink(_target: impl AsRef<Path>, _link: impl AsRef<Path>) -> Result<()> {
    Err(Error::SymlinkNotSupported)
}

/// `link` is a symlink whose immediate target is exactly `target`.
pub fn points_to(link: impl AsRef<Path>, target: impl AsRef<Path>) -> bool {
    std::fs::read_link(link.as_ref()).is_ok_and(|dest| dest == target.as_ref())
}

/// Remove `link` if it is a symlink. Returns whether anything was removed;
/// regular files are left alone.
pub fn remove_link(link: impl AsRef<Path>) -> Result<bool> {
    let link = link.as_ref();
    match std::fs::symlink_metadata(link) {
        Ok(meta) if meta.file_type().is_symlink() => {
            std::fs::remove_file(link).map_err(|e| from_io(link, e))?;
            Ok(true)
        }
        Ok(_) => Ok(false),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(from_io(link, e)),
    }
}
