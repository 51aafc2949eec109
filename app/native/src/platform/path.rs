//! Path helpers for user-entered directories.

use std::path::{Path, PathBuf};

/// Expands a leading `~` to the user's home directory.
///
/// Leading and trailing whitespace is ignored; an empty string yields an
/// empty path. Everything else is returned unchanged.
#[must_use]
pub fn expand(path: &str) -> PathBuf {
    let path = path.trim();

    if path.is_empty() {
        return PathBuf::new();
    }

    PathBuf::from(shellexpand::tilde(path).as_ref())
}

/// Makes `path` absolute against the current working directory.
///
/// The OS wallpaper call needs an absolute path. Unlike `fs::canonicalize`
/// this does not add the `\\?\` prefix on Windows, which the wallpaper API
/// rejects. Falls back to the input if the working directory is unavailable.
#[must_use]
pub fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}
