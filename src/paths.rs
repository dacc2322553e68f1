//! Path expansion helpers shared by plan building and execution.
use std::path::{Path, PathBuf};

/// Expand a leading `~` component to the user's home directory.
///
/// Only `~` and `~/…` are expanded; `~user` forms are left untouched, as is
/// everything when the home directory cannot be determined.
#[must_use]
pub fn expand_home(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Ok(rest), Some(home)) if rest.as_os_str().is_empty() => home,
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}

/// Expand `~` and make the result absolute relative to the current directory.
///
/// The path is not canonicalized: symlinks and `..` components are kept.
#[must_use]
pub fn resolve(path: &Path) -> PathBuf {
    let expanded = expand_home(path);
    std::path::absolute(&expanded).unwrap_or(expanded)
}
