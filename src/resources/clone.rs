//! Git clone resource.
use anyhow::Result;
use std::ffi::OsStr;
use std::path::PathBuf;

use super::error::ResourceError;
use super::{Applicable, Resource, ResourceChange, ResourceState};
use crate::exec::Executor;
use crate::operations::FileSystemOps;

/// A repository checkout at a fixed path.
///
/// Present means "something exists at the target path"; an existing checkout
/// is never pulled or compared against the URL.
#[derive(Debug)]
pub struct GitCloneResource<'a> {
    /// Clone URL passed to `git clone`.
    pub url: String,
    /// Directory the repository is cloned into.
    pub target: PathBuf,
    executor: &'a dyn Executor,
    fs_ops: &'a dyn FileSystemOps,
}

impl<'a> GitCloneResource<'a> {
    /// Create a new clone resource.
    #[must_use]
    pub const fn new(
        url: String,
        target: PathBuf,
        executor: &'a dyn Executor,
        fs_ops: &'a dyn FileSystemOps,
    ) -> Self {
        Self {
            url,
            target,
            executor,
            fs_ops,
        }
    }
}

impl Applicable for GitCloneResource<'_> {
    fn description(&self) -> String {
        format!("{} -> {}", self.url, self.target.display())
    }

    fn apply(&self) -> Result<ResourceChange> {
        let result = self.executor.run_attached(
            None,
            "git",
            &[
                OsStr::new("clone"),
                OsStr::new(&self.url),
                self.target.as_os_str(),
            ],
        )?;
        if !result.success {
            return Err(ResourceError::failed("git clone", &result).into());
        }
        Ok(ResourceChange::Applied)
    }
}

impl Resource for GitCloneResource<'_> {
    fn current_state(&self) -> Result<ResourceState> {
        if self.fs_ops.exists(&self.target) {
            Ok(ResourceState::Correct)
        } else {
            Ok(ResourceState::Missing)
        }
    }
}
