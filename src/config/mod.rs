pub mod options;
pub mod plan;
pub mod validation;
pub mod yaml_loader;

use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::operations::FileSystemOps;
use plan::{PlanBuilder, RepoPlan};
use validation::ValidationWarning;
use yaml_loader::{RawEntry, describe_value};

/// File name looked up in the config directory when none is given.
pub const CONFIG_FILE_NAME: &str = "clone-repos.yaml";

/// Settings that apply to every entry of a config file.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Default directory repositories are cloned under.
    pub base: PathBuf,
    /// Pass `--break-system-packages` to pip.
    pub allow_system_package_break: bool,
}

/// All plans built from a config file, in file order.
///
/// Entries that failed to build are kept in `errors` so the caller can
/// report them and still run the rest.
#[derive(Debug, Default)]
pub struct Config {
    /// Plans of the entries that built, in file order.
    pub plans: Vec<RepoPlan>,
    /// Non-fatal problems found while building and validating.
    pub warnings: Vec<ValidationWarning>,
    /// One error per entry that could not be built.
    pub errors: Vec<ConfigError>,
}

impl Config {
    /// Load and build every entry of the config file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed. Problems with
    /// individual entries are collected in [`Config::errors`] instead.
    pub fn load(
        path: &Path,
        opts: &LoadOptions,
        fs_ops: &dyn FileSystemOps,
    ) -> Result<Self, ConfigError> {
        let entries = yaml_loader::load_entries(path)?;
        Ok(Self::from_entries(entries, opts, fs_ops))
    }

    /// Build plans from already-parsed entries.
    #[must_use]
    pub fn from_entries(
        entries: Vec<RawEntry>,
        opts: &LoadOptions,
        fs_ops: &dyn FileSystemOps,
    ) -> Self {
        let builder = PlanBuilder::new(&opts.base, opts.allow_system_package_break, fs_ops);
        let mut config = Self::default();

        for entry in entries {
            let Some(url) = entry.url() else {
                config.errors.push(ConfigError::InvalidUrl {
                    key: describe_value(&entry.key),
                });
                continue;
            };
            match builder.build(url, Some(&entry.options)) {
                Ok(built) => {
                    config.warnings.extend(built.warnings);
                    config.plans.push(built.plan);
                }
                Err(e) => config.errors.push(e),
            }
        }

        config.warnings.extend(validation::validate_all(&config.plans));
        config
    }

    /// Number of entries in the file, built or not.
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.plans.len() + self.errors.len()
    }
}

/// Default config file location.
///
/// `$XDG_CONFIG_DIR/clone-repos.yaml` if that variable is set, otherwise
/// `~/.config/clone-repos.yaml`.
#[must_use]
pub fn default_config_path() -> PathBuf {
    let dir = std::env::var_os("XDG_CONFIG_DIR")
        .filter(|v| !v.is_empty())
        .map_or_else(
            || {
                dirs::home_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join(".config")
            },
            PathBuf::from,
        );
    dir.join(CONFIG_FILE_NAME)
}
