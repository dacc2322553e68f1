//! Filesystem operation abstractions for dependency injection.
//!
//! Provides the [`FileSystemOps`] trait so that plan building and plan
//! execution can be unit-tested without touching the real filesystem.
//! Production code uses [`SystemFileSystemOps`]; tests use `MockFileSystemOps`.

use std::path::{Path, PathBuf};

/// Abstraction over the filesystem queries and mutations used by plans.
pub trait FileSystemOps: Send + Sync + std::fmt::Debug {
    /// Returns `true` if `path` exists, following symlinks.
    fn exists(&self, path: &Path) -> bool;

    /// Returns `true` if any entry exists at `path`, including a dangling symlink.
    fn entry_exists(&self, path: &Path) -> bool;

    /// Read the target of the symbolic link at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` is not a symlink or cannot be read.
    fn read_link(&self, path: &Path) -> std::io::Result<PathBuf>;

    /// Create `path` and all missing ancestors.
    ///
    /// # Errors
    ///
    /// Returns an error if a directory cannot be created.
    fn create_dir_all(&self, path: &Path) -> std::io::Result<()>;

    /// Create a symbolic link at `link` pointing to `original`.
    ///
    /// # Errors
    ///
    /// Returns an error if the link cannot be created; an existing entry at
    /// `link` yields [`std::io::ErrorKind::AlreadyExists`].
    fn symlink(&self, original: &Path, link: &Path) -> std::io::Result<()>;
}

/// Production [`FileSystemOps`] implementation that delegates to [`std::fs`].
#[derive(Debug, Default)]
pub struct SystemFileSystemOps;

impl FileSystemOps for SystemFileSystemOps {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn entry_exists(&self, path: &Path) -> bool {
        path.symlink_metadata().is_ok()
    }

    fn read_link(&self, path: &Path) -> std::io::Result<PathBuf> {
        std::fs::read_link(path)
    }

    fn create_dir_all(&self, path: &Path) -> std::io::Result<()> {
        std::fs::create_dir_all(path)
    }

    #[cfg(unix)]
    fn symlink(&self, original: &Path, link: &Path) -> std::io::Result<()> {
        std::os::unix::fs::symlink(original, link)
    }

    #[cfg(windows)]
    fn symlink(&self, original: &Path, link: &Path) -> std::io::Result<()> {
        std::os::windows::fs::symlink_dir(original, link)
    }
}

/// Mock [`FileSystemOps`] for unit tests.
///
/// Pre-configure existing paths and symlinks with the builder-style methods.
/// Directories and links created through the trait are recorded and become
/// visible to later `exists` queries.
///
/// # Example
///
/// ```ignore
/// use clone_repos::operations::MockFileSystemOps;
///
/// let fs = MockFileSystemOps::new()
///     .with_existing("/repos/ttally")
///     .with_symlink("/tmp/ttally", "/repos/ttally");
/// ```
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MockFileSystemOps {
    existing: Vec<PathBuf>,
    symlinks: std::collections::HashMap<PathBuf, PathBuf>,
    symlink_error: Option<std::io::ErrorKind>,
    created_dirs: std::sync::Mutex<Vec<PathBuf>>,
    created_links: std::sync::Mutex<Vec<(PathBuf, PathBuf)>>,
}

#[cfg(test)]
#[allow(clippy::expect_used)]
impl MockFileSystemOps {
    /// Create an empty mock with nothing configured.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `path` as existing.
    #[must_use]
    pub fn with_existing(mut self, path: impl Into<PathBuf>) -> Self {
        let p = path.into();
        if !self.existing.contains(&p) {
            self.existing.push(p);
        }
        self
    }

    /// Register `path` as a symbolic link pointing to `target`.
    #[must_use]
    pub fn with_symlink(mut self, path: impl Into<PathBuf>, target: impl Into<PathBuf>) -> Self {
        self.symlinks.insert(path.into(), target.into());
        self
    }

    /// Make every [`FileSystemOps::symlink`] call fail with `kind`.
    #[must_use]
    pub const fn with_symlink_error(mut self, kind: std::io::ErrorKind) -> Self {
        self.symlink_error = Some(kind);
        self
    }

    /// Directories created through [`FileSystemOps::create_dir_all`].
    pub fn created_dirs(&self) -> Vec<PathBuf> {
        self.created_dirs
            .lock()
            .expect("mock created_dirs poisoned")
            .clone()
    }

    /// `(original, link)` pairs created through [`FileSystemOps::symlink`].
    pub fn created_links(&self) -> Vec<(PathBuf, PathBuf)> {
        self.created_links
            .lock()
            .expect("mock created_links poisoned")
            .clone()
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
impl FileSystemOps for MockFileSystemOps {
    fn exists(&self, path: &Path) -> bool {
        self.existing.iter().any(|p| p == path)
            || self
                .created_dirs
                .lock()
                .expect("mock created_dirs poisoned")
                .iter()
                .any(|p| p == path)
    }

    fn entry_exists(&self, path: &Path) -> bool {
        self.exists(path)
            || self.symlinks.contains_key(path)
            || self
                .created_links
                .lock()
                .expect("mock created_links poisoned")
                .iter()
                .any(|(_, link)| link == path)
    }

    fn read_link(&self, path: &Path) -> std::io::Result<PathBuf> {
        self.symlinks
            .get(path)
            .cloned()
            .ok_or_else(|| std::io::Error::from(std::io::ErrorKind::InvalidInput))
    }

    fn create_dir_all(&self, path: &Path) -> std::io::Result<()> {
        self.created_dirs
            .lock()
            .expect("mock created_dirs poisoned")
            .push(path.to_path_buf());
        Ok(())
    }

    fn symlink(&self, original: &Path, link: &Path) -> std::io::Result<()> {
        if let Some(kind) = self.symlink_error {
            return Err(std::io::Error::from(kind));
        }
        self.created_links
            .lock()
            .expect("mock created_links poisoned")
            .push((original.to_path_buf(), link.to_path_buf()));
        Ok(())
    }
}
