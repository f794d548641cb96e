//! Path resolution utilities.
//!
//! Expands the `~` home-directory shorthand in declared destinations and turns
//! relative sources into absolute paths.

use std::path::{Path, PathBuf};

/// No way to determine the user's home directory.
#[derive(Clone, Debug, thiserror::Error)]
#[error("cannot determine absolute path to user's home directory")]
pub struct NoWayHome;

/// Determine absolute path to the user's home directory.
///
/// Does not check if the path returned actually exists.
///
/// # Errors
///
/// Returns [`NoWayHome`] if the home directory cannot be determined.
pub fn home_dir() -> Result<PathBuf, NoWayHome> {
    dirs::home_dir().ok_or(NoWayHome)
}

/// Expand a leading `~` using the current user's home directory.
///
/// Paths without the marker are returned unchanged.
///
/// # Errors
///
/// Returns [`NoWayHome`] if the path needs expansion but the home directory
/// cannot be determined.
pub fn expand_home(path: &str) -> Result<PathBuf, NoWayHome> {
    if !path.starts_with('~') {
        return Ok(PathBuf::from(path));
    }
    Ok(expand_home_with(path, &home_dir()?))
}

/// Expand a leading `~` against an explicit `home`.
///
/// `~` alone maps to `home`; `~/x` maps to `home/x`. Anything else after the
/// marker is joined onto `home` as-is, so `~x` becomes `home/x`.
#[must_use]
pub fn expand_home_with(path: &str, home: &Path) -> PathBuf {
    let Some(rest) = path.strip_prefix('~') else {
        return PathBuf::from(path);
    };
    let rest = rest.trim_start_matches(['/', '\\']);
    if rest.is_empty() {
        home.to_path_buf()
    } else {
        home.join(rest)
    }
}

/// Resolve `path` to an absolute path, relative to `base` when it is not
/// already absolute.
///
/// Purely lexical: the path does not need to exist and symlinks are not
/// followed.
///
/// # Errors
///
/// Returns an error if the path is empty or the joined path cannot be made
/// absolute.
pub fn absolutize(path: &Path, base: &Path) -> std::io::Result<PathBuf> {
    if path.as_os_str().is_empty() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "empty path",
        ));
    }
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    };
    std::path::absolute(joined)
}
