//! Symlink resource.
use anyhow::{Context as _, Result};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{Applicable, Resource, ResourceChange, ResourceState};
use crate::operations::FileSystemOps;

/// A link named after the repository inside a link directory.
#[derive(Debug)]
pub struct SymlinkResource<'a> {
    /// What the symlink points to (the cloned repository).
    pub source: PathBuf,
    /// Directory the link is created in.
    pub dir: PathBuf,
    /// Full path of the link: `dir / name`.
    pub link: PathBuf,
    fs_ops: &'a dyn FileSystemOps,
}

impl<'a> SymlinkResource<'a> {
    /// Create a new symlink resource for a link called `name` in `dir`.
    #[must_use]
    pub fn new(source: PathBuf, dir: PathBuf, name: &str, fs_ops: &'a dyn FileSystemOps) -> Self {
        let link = dir.join(name);
        Self {
            source,
            dir,
            link,
            fs_ops,
        }
    }
}

impl Applicable for SymlinkResource<'_> {
    fn description(&self) -> String {
        format!("{} -> {}", self.link.display(), self.source.display())
    }

    fn apply(&self) -> Result<ResourceChange> {
        match self.fs_ops.symlink(&self.source, &self.link) {
            Ok(()) => Ok(ResourceChange::Applied),
            // Something appeared at the link path after the state check.
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(ResourceChange::Skipped {
                reason: format!("{} already exists", self.link.display()),
            }),
            Err(e) => Err(e).with_context(|| format!("create link: {}", self.link.display())),
        }
    }
}

impl Resource for SymlinkResource<'_> {
    fn current_state(&self) -> Result<ResourceState> {
        if !self.fs_ops.exists(&self.dir) {
            return Ok(ResourceState::Invalid {
                reason: format!("directory '{}' does not exist", self.dir.display()),
            });
        }

        if !self.fs_ops.entry_exists(&self.link) {
            return Ok(ResourceState::Missing);
        }

        Ok(self.fs_ops.read_link(&self.link).map_or_else(
            |_| ResourceState::Incorrect {
                current: "not a symlink".to_string(),
            },
            |existing| {
                if same_path(&existing, &self.source) {
                    ResourceState::Correct
                } else {
                    ResourceState::Incorrect {
                        current: format!("points to {}", existing.display()),
                    }
                }
            },
        ))
    }
}

/// Compare two paths for equality, ignoring a trailing separator.
fn same_path(a: &Path, b: &Path) -> bool {
    a.components().eq(b.components())
}
