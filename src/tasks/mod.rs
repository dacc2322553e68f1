//! Ordered per-repository steps and the executor that runs them.
pub mod clone;
pub mod context;
pub mod packages;
pub mod shell;
pub mod symlinks;

pub use context::Context;

use std::sync::Arc;

use anyhow::Result;

use crate::config::plan::RepoPlan;
use crate::logging::{Log, PrefixedLog};

/// Result of a step that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskResult {
    /// Step completed.
    Ok,
    /// Step had nothing to do, with the reason.
    Skipped(String),
}

/// What a failed step means for the rest of the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Log it and go on with the next step.
    Continue,
    /// Stop processing this repository.
    AbortRepository,
    /// Stop processing this and every later repository.
    HaltBatch,
}

/// A named step of a repository plan.
pub trait Task: Send + Sync {
    /// Human-readable step name, used as a log prefix.
    fn name(&self) -> &str;

    /// Whether the plan configures this step at all.
    fn should_run(&self, plan: &RepoPlan) -> bool;

    /// Execute the step.
    ///
    /// # Errors
    ///
    /// Returns an error if the step failed: an external program could not be
    /// spawned or exited non-zero, or a filesystem operation failed.
    fn run(&self, plan: &RepoPlan, ctx: &Context) -> Result<TaskResult>;

    /// How a failure of this step affects the rest of the run.
    ///
    /// Called after [`run`](Self::run) failed, so it may inspect what the
    /// failed step left behind.
    fn on_failure(&self, _plan: &RepoPlan, _ctx: &Context) -> FailurePolicy {
        FailurePolicy::Continue
    }
}

/// How executing one plan ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanOutcome {
    /// Every configured step ran; the named ones failed.
    Completed {
        /// Names of the steps that failed.
        failed_steps: Vec<String>,
    },
    /// The repository could not be cloned; no later step ran.
    Aborted {
        /// Why the clone step failed.
        reason: String,
    },
    /// A step failed in a way that stops the whole batch.
    Halted {
        /// The step that failed.
        step: String,
        /// Why it failed.
        reason: String,
    },
}

impl PlanOutcome {
    /// `true` when every configured step succeeded.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Completed { failed_steps } if failed_steps.is_empty())
    }

    /// `true` when no further repository should be processed.
    #[must_use]
    pub const fn halts_batch(&self) -> bool {
        matches!(self, Self::Halted { .. })
    }

    /// One-line description for the run summary; `None` on success.
    #[must_use]
    pub fn failure_message(&self) -> Option<String> {
        match self {
            Self::Completed { failed_steps } if failed_steps.is_empty() => None,
            Self::Completed { failed_steps } => Some(format!("failed: {}", failed_steps.join(", "))),
            Self::Aborted { reason } => Some(format!("aborted: {reason}")),
            Self::Halted { step, reason } => Some(format!("{step} failed, halting: {reason}")),
        }
    }
}

/// The steps of a plan, in execution order.
#[must_use]
pub fn plan_tasks() -> Vec<Box<dyn Task>> {
    vec![
        Box::new(clone::CloneRepository),
        Box::new(symlinks::LinkRepository),
        Box::new(shell::RunCommands::new(shell::CommandPhase::Preinstall)),
        Box::new(packages::InstallPackage),
        Box::new(shell::RunCommands::new(shell::CommandPhase::Postinstall)),
    ]
}

/// Execute every configured step of `plan` in order.
///
/// All output is prefixed with the repository name. Step failures are logged
/// here and never returned as errors.
pub fn execute_plan(plan: &RepoPlan, ctx: &Context) -> PlanOutcome {
    let log: Arc<dyn Log> = Arc::new(PrefixedLog::new(Arc::clone(&ctx.log), plan.name()));
    let ctx = ctx.with_log(log);
    let mut failed_steps = Vec::new();

    for task in plan_tasks() {
        if !task.should_run(plan) {
            ctx.log
                .debug(&format!("skipping step: {} (not configured)", task.name()));
            continue;
        }

        match task.run(plan, &ctx) {
            Ok(TaskResult::Ok) => {}
            Ok(TaskResult::Skipped(reason)) => {
                ctx.log.info(&format!("{}: skipped: {reason}", task.name()));
            }
            Err(e) => {
                let reason = format!("{e:#}");
                ctx.log.error(&format!("{}: {reason}", task.name()));
                match task.on_failure(plan, &ctx) {
                    FailurePolicy::Continue => failed_steps.push(task.name().to_string()),
                    FailurePolicy::AbortRepository => return PlanOutcome::Aborted { reason },
                    FailurePolicy::HaltBatch => {
                        return PlanOutcome::Halted {
                            step: task.name().to_string(),
                            reason,
                        };
                    }
                }
            }
        }
    }

    PlanOutcome::Completed { failed_steps }
}
