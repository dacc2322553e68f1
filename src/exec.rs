//! Process spawning behind an injectable [`Executor`] trait.
use anyhow::{Context, Result, bail};
use std::ffi::OsStr;
use std::path::Path;
use std::process::{Command, Output, Stdio};

/// Result of a command execution.
#[derive(Debug)]
pub struct ExecResult {
    /// Captured standard output (empty for attached commands).
    pub stdout: String,
    /// Captured standard error (empty for attached commands).
    pub stderr: String,
    /// Whether the process exited with status zero.
    pub success: bool,
    /// Exit code, `None` when the process was killed by a signal.
    pub code: Option<i32>,
}

impl From<Output> for ExecResult {
    fn from(output: Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
            code: output.status.code(),
        }
    }
}

/// Abstraction over process execution so tasks and resources can be tested
/// without spawning real programs.
pub trait Executor: Send + Sync + std::fmt::Debug {
    /// Run a command with captured output. Fails if the command exits non-zero.
    ///
    /// # Errors
    ///
    /// Returns an error if the program cannot be spawned or exits non-zero.
    fn run(&self, program: &str, args: &[&str]) -> Result<ExecResult>;

    /// Run a command with stdio inherited from this process and wait for it.
    ///
    /// The child runs in `dir` when given; the working directory of this
    /// process is never changed. A non-zero exit is reported through
    /// [`ExecResult::success`], not as an error.
    ///
    /// # Errors
    ///
    /// Returns an error only if the program cannot be spawned.
    fn run_attached(&self, dir: Option<&Path>, program: &str, args: &[&OsStr])
    -> Result<ExecResult>;

    /// Check if a program is available on `PATH`.
    fn which(&self, program: &str) -> bool;
}

/// [`Executor`] backed by [`std::process::Command`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemExecutor;

impl Executor for SystemExecutor {
    fn run(&self, program: &str, args: &[&str]) -> Result<ExecResult> {
        let output = Command::new(program)
            .args(args)
            .output()
            .with_context(|| format!("failed to execute: {program}"))?;
        let result = ExecResult::from(output);
        if !result.success {
            bail!(
                "{program} failed (exit {}): {}",
                result.code.unwrap_or(-1),
                result.stderr.trim()
            );
        }
        Ok(result)
    }

    fn run_attached(
        &self,
        dir: Option<&Path>,
        program: &str,
        args: &[&OsStr],
    ) -> Result<ExecResult> {
        let mut cmd = Command::new(program);
        cmd.args(args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        if let Some(dir) = dir {
            cmd.current_dir(dir);
        }
        let status = cmd.status().with_context(|| match dir {
            Some(dir) => format!("failed to execute: {program} in {}", dir.display()),
            None => format!("failed to execute: {program}"),
        })?;
        Ok(ExecResult {
            stdout: String::new(),
            stderr: String::new(),
            success: status.success(),
            code: status.code(),
        })
    }

    fn which(&self, program: &str) -> bool {
        which::which(program).is_ok()
    }
}
