use anyhow::Result;

use super::{Context, FailurePolicy, Task, TaskResult};
use crate::config::plan::{PackageInstallMode, RepoPlan};
use crate::resources::package::PipPackageResource;
use crate::resources::{Applicable as _, ResourceState};

/// Install the checkout as a Python package with pip.
///
/// Editable installs that the interpreter already knows about are left
/// alone; a plain install always runs.
#[derive(Debug)]
pub struct InstallPackage;

impl Task for InstallPackage {
    fn name(&self) -> &str {
        "pip install"
    }

    fn should_run(&self, plan: &RepoPlan) -> bool {
        plan.package_install_mode() != PackageInstallMode::None
    }

    fn run(&self, plan: &RepoPlan, ctx: &Context) -> Result<TaskResult> {
        let resource = PipPackageResource::new(
            plan.target_path(),
            plan.package_install_mode(),
            ctx.python.clone(),
            plan.allow_system_package_break(),
            &*ctx.executor,
        );

        if resource.mode.is_editable() {
            match ctx.registry.editable_paths() {
                Ok(installed) => match resource.state_from_installed(&installed) {
                    ResourceState::Correct => {
                        ctx.log.info(&format!(
                            "already installed in editable mode: {}",
                            resource.target.display()
                        ));
                        return Ok(TaskResult::Ok);
                    }
                    ResourceState::Invalid { reason } => return Ok(TaskResult::Skipped(reason)),
                    ResourceState::Missing | ResourceState::Incorrect { .. } => {}
                },
                Err(e) => ctx.log.warn(&format!(
                    "could not list editable installs, installing anyway: {e:#}"
                )),
            }
        }

        ctx.log.info(&format!("installing: {}", resource.description()));
        resource.apply()?;
        Ok(TaskResult::Ok)
    }

    /// With `--strict` a failed install stops the whole run.
    fn on_failure(&self, _plan: &RepoPlan, ctx: &Context) -> FailurePolicy {
        if ctx.strict {
            FailurePolicy::HaltBatch
        } else {
            FailurePolicy::Continue
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::test_helpers::plan;
    use crate::operations::MockFileSystemOps;
    use crate::resources::package::EditableRegistry;
    use crate::resources::package::test_helpers::StaticRegistry;
    use crate::resources::test_helpers::MockExecutor;
    use crate::tasks::test_helpers::{RecordingLog, make_context_with};

    const URL: &str = "https://github.com/seanbreckenridge/bleanser-fork";

    fn context(
        executor: &Arc<MockExecutor>,
        registry: StaticRegistry,
        strict: bool,
    ) -> (Context, Arc<RecordingLog>) {
        make_context_with(
            Arc::clone(executor),
            Arc::new(MockFileSystemOps::new()),
            Arc::new(registry) as Arc<dyn EditableRegistry>,
            strict,
        )
    }

    #[test]
    fn runs_only_when_configured() {
        assert!(!InstallPackage.should_run(&plan(URL, "{}")));
        assert!(InstallPackage.should_run(&plan(URL, "pip: install")));
        assert!(!InstallPackage.should_run(&plan(URL, "pip: bogus")));
    }

    #[test]
    fn plain_install_always_runs() {
        let executor = Arc::new(MockExecutor::ok(""));
        let registry = StaticRegistry::with_paths(["/repos/bleanser-fork"]);
        let (ctx, _) = context(&executor, registry, false);
        InstallPackage
            .run(&plan(URL, "pip: install"), &ctx)
            .unwrap();
        assert_eq!(
            executor.commands(),
            ["python3 -m pip install --user /repos/bleanser-fork"]
        );
    }

    #[test]
    fn registered_editable_is_not_reinstalled() {
        let executor = Arc::new(MockExecutor::with_responses(Vec::new()));
        let registry = StaticRegistry::with_paths(["/repos/bl-fork/src"]);
        let (ctx, log) = context(&executor, registry, false);
        let result = InstallPackage
            .run(&plan(URL, "pip: editable\ndirname: bl-fork"), &ctx)
            .unwrap();
        assert_eq!(result, TaskResult::Ok);
        assert_eq!(executor.call_count(), 0);
        assert_eq!(
            log.at("info"),
            ["already installed in editable mode: /repos/bl-fork"]
        );
    }

    #[test]
    fn unregistered_editable_is_installed() {
        let executor = Arc::new(MockExecutor::ok(""));
        let (ctx, _) = context(&executor, StaticRegistry::default(), false);
        InstallPackage
            .run(&plan(URL, "pip: editable_system"), &ctx)
            .unwrap();
        assert_eq!(
            executor.commands(),
            ["python3 -m pip install --editable /repos/bleanser-fork"]
        );
    }

    #[test]
    fn registry_failure_installs_anyway() {
        let executor = Arc::new(MockExecutor::ok(""));
        let (ctx, log) = context(&executor, StaticRegistry::failing(), false);
        InstallPackage
            .run(&plan(URL, "pip: editable"), &ctx)
            .unwrap();
        assert_eq!(executor.call_count(), 1);
        assert_eq!(
            log.at("warn"),
            ["could not list editable installs, installing anyway: registry unavailable"]
        );
    }

    #[test]
    fn failed_install_is_error() {
        let executor = Arc::new(MockExecutor::fail());
        let (ctx, _) = context(&executor, StaticRegistry::default(), false);
        let err = InstallPackage
            .run(&plan(URL, "pip: install"), &ctx)
            .unwrap_err();
        assert_eq!(err.to_string(), "command 'pip install' failed (exit 1)");
    }

    #[test]
    fn failure_policy_follows_strict() {
        let executor = Arc::new(MockExecutor::with_responses(Vec::new()));
        let p = plan(URL, "pip: install");
        let (lenient, _) = context(&executor, StaticRegistry::default(), false);
        let (strict, _) = context(&executor, StaticRegistry::default(), true);
        assert_eq!(InstallPackage.on_failure(&p, &lenient), FailurePolicy::Continue);
        assert_eq!(InstallPackage.on_failure(&p, &strict), FailurePolicy::HaltBatch);
    }
}
