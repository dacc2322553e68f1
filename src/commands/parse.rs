use std::path::PathBuf;

use anyhow::{Context as _, Result, bail};
use serde::Serialize;

use super::CommandSetup;
use crate::cli::Cli;
use crate::config::plan::RepoPlan;
use crate::logging::Logger;
use crate::operations::SystemFileSystemOps;

/// A plan together with its derived name and target path.
#[derive(Debug, Serialize)]
struct PlanView<'a> {
    name: String,
    target_path: PathBuf,
    #[serde(flatten)]
    plan: &'a RepoPlan,
}

/// Render plans as a pretty-printed JSON array, in file order.
///
/// # Errors
///
/// Returns an error if a plan cannot be serialized.
pub fn render_plans(plans: &[RepoPlan]) -> Result<String> {
    let views: Vec<PlanView<'_>> = plans
        .iter()
        .map(|plan| PlanView {
            name: plan.name(),
            target_path: plan.target_path(),
            plan,
        })
        .collect();
    serde_json::to_string_pretty(&views).context("serializing plans")
}

/// Print the resolved plans without running anything.
///
/// Per-entry `base` overrides are still created while building the plans.
///
/// # Errors
///
/// Returns an error if the base directory or config file is unusable, or
/// if any entry failed to build.
#[allow(clippy::print_stdout)]
pub fn run(cli: &Cli, log: &Logger) -> Result<()> {
    let setup = CommandSetup::init(cli, &SystemFileSystemOps, log)?;
    println!("{}", render_plans(&setup.config.plans)?);

    if !setup.config.errors.is_empty() {
        bail!(
            "{} of {} entries could not be parsed",
            setup.config.errors.len(),
            setup.config.entry_count()
        );
    }
    Ok(())
}
