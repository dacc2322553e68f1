use anyhow::Result;

use super::{Context, Task, TaskResult};
use crate::config::plan::RepoPlan;
use crate::paths;
use crate::resources::symlink::SymlinkResource;
use crate::resources::{Applicable as _, Resource as _, ResourceChange, ResourceState};

/// Link the checkout into the configured link directory.
///
/// The link directory must already exist, and an existing entry at the link
/// path is never replaced.
#[derive(Debug)]
pub struct LinkRepository;

impl Task for LinkRepository {
    fn name(&self) -> &str {
        "symlink"
    }

    fn should_run(&self, plan: &RepoPlan) -> bool {
        plan.symlink_target_dir().is_some()
    }

    fn run(&self, plan: &RepoPlan, ctx: &Context) -> Result<TaskResult> {
        let Some(dir) = plan.symlink_target_dir() else {
            return Ok(TaskResult::Skipped("no link directory configured".to_string()));
        };
        let resource = SymlinkResource::new(
            plan.target_path(),
            paths::resolve(dir),
            &plan.name(),
            &*ctx.fs_ops,
        );

        match resource.current_state()? {
            ResourceState::Invalid { reason } => return Ok(TaskResult::Skipped(reason)),
            ResourceState::Correct => {
                ctx.log
                    .info(&format!("already linked: {}", resource.link.display()));
                return Ok(TaskResult::Ok);
            }
            ResourceState::Incorrect { current } => {
                return Ok(TaskResult::Skipped(format!(
                    "{} already exists ({current})",
                    resource.link.display()
                )));
            }
            ResourceState::Missing => {}
        }

        match resource.apply()? {
            ResourceChange::Skipped { reason } => Ok(TaskResult::Skipped(reason)),
            ResourceChange::Applied | ResourceChange::AlreadyCorrect => {
                ctx.log.info(&format!("linked {}", resource.description()));
                Ok(TaskResult::Ok)
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::path::PathBuf;
    use std::sync::Arc;

    use super::*;
    use crate::config::test_helpers::plan;
    use crate::operations::MockFileSystemOps;
    use crate::resources::package::test_helpers::StaticRegistry;
    use crate::resources::test_helpers::MockExecutor;
    use crate::tasks::test_helpers::{RecordingLog, make_context_with};

    const URL: &str = "https://github.com/seanbreckenridge/ttally";

    fn context(fs: &Arc<MockFileSystemOps>) -> (Context, Arc<RecordingLog>) {
        make_context_with(
            Arc::new(MockExecutor::with_responses(Vec::new())),
            Arc::clone(fs),
            Arc::new(StaticRegistry::default()),
            false,
        )
    }

    #[test]
    fn runs_only_with_link_directory() {
        assert!(!LinkRepository.should_run(&plan(URL, "{}")));
        assert!(LinkRepository.should_run(&plan(URL, "symlink_to: /tmp")));
    }

    #[test]
    fn creates_link_named_after_repo() {
        let fs = Arc::new(MockFileSystemOps::new().with_existing("/tmp"));
        let (ctx, log) = context(&fs);
        let result = LinkRepository
            .run(&plan(URL, "symlink_to: /tmp"), &ctx)
            .unwrap();
        assert_eq!(result, TaskResult::Ok);
        assert_eq!(
            fs.created_links(),
            [(PathBuf::from("/repos/ttally"), PathBuf::from("/tmp/ttally"))]
        );
        assert_eq!(log.at("info"), ["linked /tmp/ttally -> /repos/ttally"]);
    }

    #[test]
    fn link_uses_dirname() {
        let fs = Arc::new(MockFileSystemOps::new().with_existing("/tmp"));
        let (ctx, _) = context(&fs);
        LinkRepository
            .run(&plan(URL, "symlink_to: /tmp\ndirname: tt"), &ctx)
            .unwrap();
        assert_eq!(
            fs.created_links(),
            [(PathBuf::from("/repos/tt"), PathBuf::from("/tmp/tt"))]
        );
    }

    #[test]
    fn missing_link_directory_is_skipped() {
        let fs = Arc::new(MockFileSystemOps::new());
        let (ctx, _) = context(&fs);
        let result = LinkRepository
            .run(&plan(URL, "symlink_to: /nowhere"), &ctx)
            .unwrap();
        assert_eq!(
            result,
            TaskResult::Skipped("directory '/nowhere' does not exist".to_string())
        );
        assert!(fs.created_links().is_empty());
        assert!(fs.created_dirs().is_empty(), "link directory must not be created");
    }

    #[test]
    fn existing_correct_link_is_kept() {
        let fs = Arc::new(
            MockFileSystemOps::new()
                .with_existing("/tmp")
                .with_symlink("/tmp/ttally", "/repos/ttally"),
        );
        let (ctx, log) = context(&fs);
        let result = LinkRepository
            .run(&plan(URL, "symlink_to: /tmp"), &ctx)
            .unwrap();
        assert_eq!(result, TaskResult::Ok);
        assert!(fs.created_links().is_empty());
        assert_eq!(log.at("info"), ["already linked: /tmp/ttally"]);
    }

    #[test]
    fn foreign_entry_is_never_replaced() {
        let fs = Arc::new(
            MockFileSystemOps::new()
                .with_existing("/tmp")
                .with_existing("/tmp/ttally"),
        );
        let (ctx, _) = context(&fs);
        let result = LinkRepository
            .run(&plan(URL, "symlink_to: /tmp"), &ctx)
            .unwrap();
        assert_eq!(
            result,
            TaskResult::Skipped("/tmp/ttally already exists (not a symlink)".to_string())
        );
        assert!(fs.created_links().is_empty());
    }

    #[test]
    fn race_with_existing_entry_is_skipped() {
        let fs = Arc::new(
            MockFileSystemOps::new()
                .with_existing("/tmp")
                .with_symlink_error(std::io::ErrorKind::AlreadyExists),
        );
        let (ctx, _) = context(&fs);
        let result = LinkRepository
            .run(&plan(URL, "symlink_to: /tmp"), &ctx)
            .unwrap();
        assert_eq!(
            result,
            TaskResult::Skipped("/tmp/ttally already exists".to_string())
        );
    }

    #[test]
    fn other_link_errors_fail() {
        let fs = Arc::new(
            MockFileSystemOps::new()
                .with_existing("/tmp")
                .with_symlink_error(std::io::ErrorKind::PermissionDenied),
        );
        let (ctx, _) = context(&fs);
        let err = LinkRepository
            .run(&plan(URL, "symlink_to: /tmp"), &ctx)
            .unwrap_err();
        assert!(err.to_string().contains("/tmp/ttally"));
    }
}
