use anyhow::Result;
use std::ffi::OsStr;
use std::path::PathBuf;

use super::error::ResourceError;
use super::{Applicable, ResourceChange};
use crate::exec::Executor;

/// A shell command run with `sh -c` inside a repository.
///
/// Commands have no observable state, so this only implements
/// [`Applicable`]: applying always runs the command.
#[derive(Debug)]
pub struct ShellCommandResource<'a> {
    /// The command line handed to `sh -c`.
    command: String,
    /// Working directory of the shell.
    dir: PathBuf,
    executor: &'a dyn Executor,
}

impl<'a> ShellCommandResource<'a> {
    /// Run `command` with `dir` as the working directory.
    #[must_use]
    pub const fn new(command: String, dir: PathBuf, executor: &'a dyn Executor) -> Self {
        Self {
            command,
            dir,
            executor,
        }
    }
}

impl Applicable for ShellCommandResource<'_> {
    fn description(&self) -> String {
        self.command.clone()
    }

    fn apply(&self) -> Result<ResourceChange> {
        let result = self.executor.run_attached(
            Some(&self.dir),
            "sh",
            &[OsStr::new("-c"), OsStr::new(&self.command)],
        )?;
        if !result.success {
            return Err(ResourceError::failed(&self.command, &result).into());
        }
        Ok(ResourceChange::Applied)
    }
}
