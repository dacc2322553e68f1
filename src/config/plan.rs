//! Per-repository plans and the builder that produces them from raw entries.
use serde::Serialize;
use serde_yaml::{Mapping, Value};
use std::path::{Path, PathBuf};
use url::Url;

use super::options::{self, OptionKey, Text};
use super::validation::ValidationWarning;
use super::yaml_loader::describe_value;
use crate::error::ConfigError;
use crate::operations::FileSystemOps;
use crate::paths;

/// How a cloned repository is registered as an installed Python package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PackageInstallMode {
    /// No package install.
    #[default]
    None,
    /// `pip install --user <target>`.
    Install,
    /// `pip install --user --editable <target>`.
    EditableUser,
    /// `pip install --editable <target>`, into the interpreter's site-packages.
    EditableSystem,
}

impl PackageInstallMode {
    /// Map a `pip` option value to a mode.
    #[must_use]
    pub fn from_choice(raw: &str) -> Option<Self> {
        match raw {
            "install" => Some(Self::Install),
            "editable" => Some(Self::EditableUser),
            "editable_system" => Some(Self::EditableSystem),
            _ => None,
        }
    }

    /// `true` for both editable modes.
    #[must_use]
    pub const fn is_editable(self) -> bool {
        matches!(self, Self::EditableUser | Self::EditableSystem)
    }
}

/// Everything needed to clone and set up one repository.
///
/// Built once by [`PlanBuilder`] and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepoPlan {
    base_dir: PathBuf,
    source_url: String,
    dir_name: Option<String>,
    symlink_target_dir: Option<PathBuf>,
    preinstall_commands: Vec<String>,
    postinstall_commands: Vec<String>,
    package_install_mode: PackageInstallMode,
    stop_on_step_failure: bool,
    allow_system_package_break: bool,
}

impl RepoPlan {
    /// Directory the checkout is placed under.
    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// URL handed to `git clone`.
    #[must_use]
    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    /// Configured directory name, if any.
    #[must_use]
    pub fn dir_name(&self) -> Option<&str> {
        self.dir_name.as_deref()
    }

    /// Directory to place a link to the clone in, as written in the config.
    ///
    /// `~` is expanded at execution time.
    #[must_use]
    pub fn symlink_target_dir(&self) -> Option<&Path> {
        self.symlink_target_dir.as_deref()
    }

    /// Commands run before the package install.
    #[must_use]
    pub fn preinstall_commands(&self) -> &[String] {
        &self.preinstall_commands
    }

    /// Commands run after the package install.
    #[must_use]
    pub fn postinstall_commands(&self) -> &[String] {
        &self.postinstall_commands
    }

    /// How the checkout is installed with pip.
    #[must_use]
    pub const fn package_install_mode(&self) -> PackageInstallMode {
        self.package_install_mode
    }

    /// Whether a failing command skips the rest of its command list.
    #[must_use]
    pub const fn stop_on_step_failure(&self) -> bool {
        self.stop_on_step_failure
    }

    /// Whether pip may break system packages.
    #[must_use]
    pub const fn allow_system_package_break(&self) -> bool {
        self.allow_system_package_break
    }

    /// Local directory name: `dir_name` if set, else derived from the URL.
    #[must_use]
    pub fn name(&self) -> String {
        self.dir_name
            .clone()
            .unwrap_or_else(|| name_from_url(&self.source_url))
    }

    /// Where the repository is cloned: `base_dir / name`.
    #[must_use]
    pub fn target_path(&self) -> PathBuf {
        self.base_dir.join(self.name())
    }
}

/// Last path segment of a clone URL, trailing slashes ignored.
///
/// Query strings and fragments are not part of the name. A `.git` suffix is
/// kept. scp-like addresses (`git@host:user/repo.git`) are handled too.
#[must_use]
pub fn name_from_url(url: &str) -> String {
    let path = Url::parse(url).map_or_else(
        |_| {
            url.split(['?', '#'])
                .next()
                .unwrap_or_default()
                .to_string()
        },
        |parsed| parsed.path().to_string(),
    );
    path.trim_end_matches('/')
        .rsplit(['/', ':'])
        .next()
        .unwrap_or_default()
        .to_string()
}

/// A built plan together with the warnings raised while building it.
#[derive(Debug)]
pub struct PlanBuild {
    /// The built plan.
    pub plan: RepoPlan,
    /// Unknown keys and other non-fatal problems in the entry.
    pub warnings: Vec<ValidationWarning>,
}

/// Turns raw config entries into [`RepoPlan`]s.
#[derive(Debug)]
pub struct PlanBuilder<'a> {
    default_base: &'a Path,
    allow_system_package_break: bool,
    fs_ops: &'a dyn FileSystemOps,
}

impl<'a> PlanBuilder<'a> {
    /// `default_base` is used for entries without a `base` override.
    #[must_use]
    pub const fn new(
        default_base: &'a Path,
        allow_system_package_break: bool,
        fs_ops: &'a dyn FileSystemOps,
    ) -> Self {
        Self {
            default_base,
            allow_system_package_break,
            fs_ops,
        }
    }

    /// Build the plan for one entry.
    ///
    /// A `base` override that does not exist is created before returning,
    /// but only once every option of the entry has been validated.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for an empty URL, a malformed list option,
    /// an unparseable `pipefail`, or when no directory name can be derived.
    pub fn build(&self, url: &str, raw: Option<&Value>) -> Result<PlanBuild, ConfigError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(ConfigError::InvalidUrl {
                key: format!("'{url}'"),
            });
        }

        let url_name = name_from_url(url);
        let label = if url_name.is_empty() { url } else { url_name.as_str() };
        let mut warnings = Vec::new();

        let empty = Mapping::new();
        let options = match raw {
            None | Some(Value::Null) => &empty,
            Some(Value::Mapping(map)) => map,
            Some(other) => {
                warnings.push(ValidationWarning::new(
                    label,
                    "options",
                    format!(
                        "expected a mapping of options, found '{}'; using defaults",
                        describe_value(other)
                    ),
                ));
                &empty
            }
        };

        let mut dir_name = None;
        let mut symlink_target_dir = None;
        let mut base = None;
        let mut preinstall_commands = Vec::new();
        let mut postinstall_commands = Vec::new();
        let mut package_install_mode = PackageInstallMode::None;
        let mut stop_on_step_failure = false;

        for (key, value) in options {
            let Some(option) = key.as_str().and_then(OptionKey::from_key) else {
                warnings.push(ValidationWarning::new(
                    label,
                    describe_value(key),
                    format!(
                        "unknown key '{}' with value '{}'",
                        describe_value(key),
                        describe_value(value)
                    ),
                ));
                continue;
            };

            match option {
                OptionKey::DirName => dir_name = text(label, option, value, &mut warnings),
                OptionKey::SymlinkTo => {
                    symlink_target_dir =
                        text(label, option, value, &mut warnings).map(PathBuf::from);
                }
                OptionKey::Base => base = text(label, option, value, &mut warnings),
                OptionKey::Preinstall => {
                    preinstall_commands = options::parse_text_list(label, option, value)?;
                }
                OptionKey::Postinstall => {
                    postinstall_commands = options::parse_text_list(label, option, value)?;
                }
                OptionKey::Pipefail => {
                    stop_on_step_failure = options::parse_flag(label, option, value)?;
                }
                OptionKey::Pip => {
                    package_install_mode = pip_mode(label, value, &mut warnings);
                }
            }
        }

        if dir_name.is_none() && url_name.is_empty() {
            return Err(ConfigError::UnnamedRepository {
                url: url.to_string(),
            });
        }

        let base_dir = match base {
            Some(raw_base) => self.ensure_base(label, &raw_base, &mut warnings),
            None => self.default_base.to_path_buf(),
        };

        Ok(PlanBuild {
            plan: RepoPlan {
                base_dir,
                source_url: url.to_string(),
                dir_name,
                symlink_target_dir,
                preinstall_commands,
                postinstall_commands,
                package_install_mode,
                stop_on_step_failure,
                allow_system_package_break: self.allow_system_package_break,
            },
            warnings,
        })
    }

    fn ensure_base(&self, label: &str, raw: &str, warnings: &mut Vec<ValidationWarning>) -> PathBuf {
        let base = paths::resolve(Path::new(raw));
        if !self.fs_ops.exists(&base) {
            warnings.push(ValidationWarning::new(
                label,
                OptionKey::Base.key(),
                format!("base directory '{}' does not exist, creating it", base.display()),
            ));
            if let Err(e) = self.fs_ops.create_dir_all(&base) {
                warnings.push(ValidationWarning::new(
                    label,
                    OptionKey::Base.key(),
                    format!("failed to create '{}': {e}", base.display()),
                ));
            }
        }
        base
    }
}

fn text(
    label: &str,
    option: OptionKey,
    value: &Value,
    warnings: &mut Vec<ValidationWarning>,
) -> Option<String> {
    match options::parse_text(value) {
        Text::Value(s) => Some(s),
        Text::Absent => None,
        Text::Malformed => {
            warnings.push(ValidationWarning::new(
                label,
                option.key(),
                format!(
                    "expected {}, found {}; ignoring",
                    option.shape(),
                    describe_value(value)
                ),
            ));
            None
        }
    }
}

fn pip_mode(label: &str, value: &Value, warnings: &mut Vec<ValidationWarning>) -> PackageInstallMode {
    if value.is_null() {
        return PackageInstallMode::None;
    }
    let mode = value
        .as_str()
        .map(str::trim)
        .and_then(PackageInstallMode::from_choice);
    mode.unwrap_or_else(|| {
        warnings.push(ValidationWarning::new(
            label,
            OptionKey::Pip.key(),
            format!(
                "unrecognized value '{}', expected {}; skipping package install",
                describe_value(value),
                OptionKey::Pip.shape()
            ),
        ));
        PackageInstallMode::None
    })
}
