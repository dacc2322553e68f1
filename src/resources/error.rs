//! Typed error variants for resource operations.
//!
//! Resource code returns these variants; callers convert to
//! [`anyhow::Error`] via `?`.

use thiserror::Error;

use crate::exec::ExecResult;

/// Errors that arise from resource apply operations.
#[derive(Error, Debug)]
pub enum ResourceError {
    /// A command invoked by a resource exited non-zero.
    #[error("command '{program}' failed (exit {exit_code})")]
    ExecutionFailed {
        /// The program or shell command that was invoked.
        program: String,
        /// Exit code returned by the process, `-1` if killed by a signal.
        exit_code: i32,
    },
}

impl ResourceError {
    /// Build an [`ResourceError::ExecutionFailed`] from a finished process.
    #[must_use]
    pub fn failed(program: impl Into<String>, result: &ExecResult) -> Self {
        Self::ExecutionFailed {
            program: program.into(),
            exit_code: result.code.unwrap_or(-1),
        }
    }

    /// Exit code of the failed process.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::ExecutionFailed { exit_code, .. } => *exit_code,
        }
    }
}
