use std::sync::Arc;

use anyhow::{Result, bail};

use super::CommandSetup;
use crate::cli::Cli;
use crate::config::Config;
use crate::error::{CloneReposError, EnvironmentError};
use crate::exec::{Executor, SystemExecutor};
use crate::logging::{Log, Logger, TaskStatus};
use crate::operations::{FileSystemOps, SystemFileSystemOps};
use crate::resources::package::{EditableRegistry, SitePackagesRegistry};
use crate::tasks::{self, Context};

/// Run the clone command against the real system.
///
/// # Errors
///
/// Returns an error if `git` is missing, the base directory or config file
/// is unusable, or any repository failed.
pub fn run(cli: &Cli, log: &Arc<Logger>) -> Result<()> {
    let version = option_env!("CLONE_REPOS_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"));
    log.debug(&format!("clone-repos {version}"));

    let executor: Arc<dyn Executor> = Arc::new(SystemExecutor);
    let fs_ops: Arc<dyn FileSystemOps> = Arc::new(SystemFileSystemOps);
    let registry: Arc<dyn EditableRegistry> = Arc::new(SitePackagesRegistry::new(
        cli.python.clone(),
        Arc::clone(&executor),
    ));

    if !executor.which("git") {
        let missing = EnvironmentError::ToolNotFound("git".to_string());
        return Err(CloneReposError::from(missing).into());
    }

    let setup = CommandSetup::init(cli, &*fs_ops, log.as_ref())?;
    let ctx = Context {
        log: Arc::clone(log) as Arc<dyn Log>,
        executor,
        fs_ops,
        registry,
        python: cli.python.clone(),
        strict: cli.strict,
    };

    run_plans(&setup.config, &ctx);

    log.print_summary();

    if log.has_failures() {
        bail!(
            "{} of {} repositories failed",
            log.failure_count(),
            setup.config.entry_count()
        );
    }
    Ok(())
}

/// Execute every plan in file order and record one summary entry per
/// repository, including entries that failed to build.
///
/// After a batch halt the remaining repositories are recorded as skipped.
pub fn run_plans(config: &Config, ctx: &Context) {
    for error in &config.errors {
        ctx.log
            .record_task("invalid entry", TaskStatus::Failed, Some(&error.to_string()));
    }

    let mut halted_by: Option<String> = None;
    for plan in &config.plans {
        let name = plan.name();
        if let Some(by) = &halted_by {
            ctx.log.record_task(
                &name,
                TaskStatus::Skipped,
                Some(&format!("not run after {by} halted the batch")),
            );
            continue;
        }

        ctx.log.stage(&name);
        let outcome = tasks::execute_plan(plan, ctx);
        match outcome.failure_message() {
            None => ctx.log.record_task(&name, TaskStatus::Ok, None),
            Some(message) => ctx.log.record_task(&name, TaskStatus::Failed, Some(&message)),
        }
        if outcome.halts_batch() {
            halted_by = Some(name);
        }
    }
}
