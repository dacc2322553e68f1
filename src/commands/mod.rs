pub mod clone;
pub mod parse;

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};

use crate::cli::Cli;
use crate::config::{self, Config, LoadOptions};
use crate::error::{CloneReposError, EnvironmentError};
use crate::logging::Log;
use crate::operations::FileSystemOps;
use crate::paths;

/// Shared state produced by the common command setup sequence.
///
/// Resolves the base directory and config file path and loads every entry,
/// so that each command does not have to repeat the boilerplate.
#[derive(Debug)]
pub struct CommandSetup {
    /// Config file that was loaded.
    pub config_path: PathBuf,
    /// Default directory repositories are cloned under.
    pub base: PathBuf,
    /// Plans, warnings and per-entry errors.
    pub config: Config,
}

impl CommandSetup {
    /// Validate the base directory, then load and build the config file.
    ///
    /// Warnings and per-entry errors are logged here; per-entry errors stay
    /// in [`Config::errors`] for the caller to count.
    ///
    /// # Errors
    ///
    /// Returns an error if the base directory is missing or not a directory,
    /// or if the config file cannot be read or parsed.
    pub fn init(cli: &Cli, fs_ops: &dyn FileSystemOps, log: &dyn Log) -> Result<Self> {
        let base = resolve_base(&cli.base_repos)?;
        let config_path = cli
            .config_file
            .as_deref()
            .map_or_else(config::default_config_path, paths::resolve);

        log.stage("Loading configuration");
        log.debug(&format!("config file: {}", config_path.display()));
        log.debug(&format!("base directory: {}", base.display()));

        let opts = LoadOptions {
            base: base.clone(),
            allow_system_package_break: cli.break_system_packages,
        };
        let config = Config::load(&config_path, &opts, fs_ops)
            .map_err(CloneReposError::from)
            .with_context(|| format!("loading {}", config_path.display()))?;

        log.info(&format!(
            "loaded {} of {} repositories",
            config.plans.len(),
            config.entry_count()
        ));

        if !config.warnings.is_empty() {
            log.warn(&format!(
                "found {} configuration warning(s):",
                config.warnings.len()
            ));
            for warning in &config.warnings {
                log.warn(&format!(
                    "  {} [{}]: {}",
                    warning.source, warning.item, warning.message
                ));
            }
        }
        for error in &config.errors {
            log.error(&error.to_string());
        }

        Ok(Self {
            config_path,
            base,
            config,
        })
    }
}

/// Resolve the base directory and check that it exists.
///
/// # Errors
///
/// Returns [`EnvironmentError::BaseDirectory`] if the resolved path is not an
/// existing directory.
pub fn resolve_base(path: &Path) -> Result<PathBuf, CloneReposError> {
    let base = paths::resolve(path);
    if base.is_dir() {
        Ok(base)
    } else {
        Err(EnvironmentError::BaseDirectory {
            path: base.display().to_string(),
        }
        .into())
    }
}
