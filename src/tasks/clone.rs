use anyhow::Result;

use super::{Context, FailurePolicy, Task, TaskResult};
use crate::config::plan::RepoPlan;
use crate::resources::clone::GitCloneResource;
use crate::resources::{Applicable as _, Resource as _};

/// Clone the repository into its target path unless something is already there.
#[derive(Debug)]
pub struct CloneRepository;

impl Task for CloneRepository {
    fn name(&self) -> &str {
        "clone"
    }

    fn should_run(&self, _plan: &RepoPlan) -> bool {
        true
    }

    fn run(&self, plan: &RepoPlan, ctx: &Context) -> Result<TaskResult> {
        let resource = GitCloneResource::new(
            plan.source_url().to_string(),
            plan.target_path(),
            &*ctx.executor,
            &*ctx.fs_ops,
        );

        if !resource.needs_change()? {
            ctx.log.debug(&format!(
                "already cloned: {}",
                resource.target.display()
            ));
            return Ok(TaskResult::Ok);
        }

        ctx.log.info(&format!("cloning {}", resource.description()));
        resource.apply()?;
        Ok(TaskResult::Ok)
    }

    /// Later steps need the checkout; a clone that left nothing behind stops
    /// the repository.
    fn on_failure(&self, plan: &RepoPlan, ctx: &Context) -> FailurePolicy {
        if ctx.fs_ops.exists(&plan.target_path()) {
            FailurePolicy::Continue
        } else {
            FailurePolicy::AbortRepository
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::path::Path;
    use std::sync::Arc;

    use super::*;
    use crate::config::test_helpers::plan;
    use crate::operations::MockFileSystemOps;
    use crate::resources::package::test_helpers::StaticRegistry;
    use crate::resources::test_helpers::MockExecutor;
    use crate::tasks::test_helpers::{RecordingLog, make_context_with};

    const URL: &str = "https://github.com/karlicoss/HPI";

    fn context(executor: &Arc<MockExecutor>, fs: MockFileSystemOps) -> (Context, Arc<RecordingLog>) {
        make_context_with(
            Arc::clone(executor),
            Arc::new(fs),
            Arc::new(StaticRegistry::default()),
            false,
        )
    }

    #[test]
    fn clones_missing_target() {
        let executor = Arc::new(MockExecutor::ok(""));
        let (ctx, log) = context(&executor, MockFileSystemOps::new());
        let result = CloneRepository.run(&plan(URL, "{}"), &ctx).unwrap();
        assert_eq!(result, TaskResult::Ok);
        let calls = executor.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].command, format!("git clone {URL} /repos/HPI"));
        assert!(calls[0].dir.is_none());
        assert_eq!(log.at("info"), [format!("cloning {URL} -> /repos/HPI")]);
    }

    #[test]
    fn dirname_changes_target() {
        let executor = Arc::new(MockExecutor::ok(""));
        let (ctx, _) = context(&executor, MockFileSystemOps::new());
        CloneRepository
            .run(&plan(URL, "dirname: hpi-fork"), &ctx)
            .unwrap();
        assert_eq!(executor.commands(), [format!("git clone {URL} /repos/hpi-fork")]);
    }

    #[test]
    fn existing_target_is_not_cloned() {
        let executor = Arc::new(MockExecutor::with_responses(Vec::new()));
        let fs = MockFileSystemOps::new().with_existing("/repos/HPI");
        let (ctx, log) = context(&executor, fs);
        let result = CloneRepository.run(&plan(URL, "{}"), &ctx).unwrap();
        assert_eq!(result, TaskResult::Ok);
        assert_eq!(executor.call_count(), 0);
        assert_eq!(log.at("debug"), ["already cloned: /repos/HPI"]);
    }

    #[test]
    fn failed_clone_is_error() {
        let executor = Arc::new(MockExecutor::fail());
        let (ctx, _) = context(&executor, MockFileSystemOps::new());
        let err = CloneRepository.run(&plan(URL, "{}"), &ctx).unwrap_err();
        assert_eq!(err.to_string(), "command 'git clone' failed (exit 1)");
    }

    #[test]
    fn failure_policy_depends_on_target() {
        let executor = Arc::new(MockExecutor::with_responses(Vec::new()));
        let p = plan(URL, "{}");

        let (ctx, _) = context(&executor, MockFileSystemOps::new());
        assert_eq!(
            CloneRepository.on_failure(&p, &ctx),
            FailurePolicy::AbortRepository
        );

        let fs = MockFileSystemOps::new().with_existing(Path::new("/repos/HPI"));
        let (ctx, _) = context(&executor, fs);
        assert_eq!(CloneRepository.on_failure(&p, &ctx), FailurePolicy::Continue);
    }
}
