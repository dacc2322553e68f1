use anyhow::{Result, bail};

use super::{Context, Task, TaskResult};
use crate::config::plan::RepoPlan;
use crate::resources::Applicable as _;
use crate::resources::shell::ShellCommandResource;

/// Which of the two command lists a [`RunCommands`] step runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandPhase {
    /// Before the package install.
    Preinstall,
    /// After the package install.
    Postinstall,
}

impl CommandPhase {
    const fn label(self) -> &'static str {
        match self {
            Self::Preinstall => "preinstall",
            Self::Postinstall => "postinstall",
        }
    }

    fn commands(self, plan: &RepoPlan) -> &[String] {
        match self {
            Self::Preinstall => plan.preinstall_commands(),
            Self::Postinstall => plan.postinstall_commands(),
        }
    }
}

/// Run a command list with `sh -c` inside the checkout, in order.
///
/// With `pipefail` set the first failing command ends the list. Otherwise
/// every command runs and the step fails if any of them did.
#[derive(Debug)]
pub struct RunCommands {
    phase: CommandPhase,
}

impl RunCommands {
    /// Create a step running the `phase` command list.
    #[must_use]
    pub const fn new(phase: CommandPhase) -> Self {
        Self { phase }
    }
}

impl Task for RunCommands {
    fn name(&self) -> &str {
        self.phase.label()
    }

    fn should_run(&self, plan: &RepoPlan) -> bool {
        !self.phase.commands(plan).is_empty()
    }

    fn run(&self, plan: &RepoPlan, ctx: &Context) -> Result<TaskResult> {
        let commands = self.phase.commands(plan);
        let dir = plan.target_path();
        let mut failed = 0usize;

        for (i, command) in commands.iter().enumerate() {
            let resource = ShellCommandResource::new(command.clone(), dir.clone(), &*ctx.executor);
            ctx.log.info(&format!("running: {}", resource.description()));

            if let Err(e) = resource.apply() {
                if plan.stop_on_step_failure() {
                    let remaining = commands.len() - i - 1;
                    if remaining > 0 {
                        return Err(e.context(format!(
                            "skipping {remaining} remaining {} command(s)",
                            self.phase.label()
                        )));
                    }
                    return Err(e);
                }
                ctx.log.error(&format!("{e:#}"));
                failed += 1;
            }
        }

        if failed > 0 {
            bail!("{failed} of {} commands failed", commands.len());
        }
        Ok(TaskResult::Ok)
    }
}
