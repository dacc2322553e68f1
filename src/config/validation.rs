use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use super::plan::RepoPlan;

/// A validation warning detected while building or checking plans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// The repository the warning is about (its URL-derived name).
    pub source: String,
    /// The option key or aspect that triggered the warning.
    pub item: String,
    /// Human-readable warning message.
    pub message: String,
}

impl ValidationWarning {
    /// Create a warning about `source`.
    #[must_use]
    pub fn new(
        source: impl Into<String>,
        item: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            item: item.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.source, self.message)
    }
}

/// Trait for checks that span more than one plan.
///
/// Per-entry problems are reported by the plan builder; validators look at
/// the whole batch.
pub trait ConfigValidator {
    /// Check the plans and return any warnings found.
    fn validate(&self, plans: &[RepoPlan]) -> Vec<ValidationWarning>;
}

/// Warns when two entries would clone into the same directory.
///
/// The later entry finds the earlier clone and silently skips its own.
#[derive(Debug, Default)]
pub struct TargetCollisionValidator;

impl ConfigValidator for TargetCollisionValidator {
    fn validate(&self, plans: &[RepoPlan]) -> Vec<ValidationWarning> {
        let mut seen: HashMap<PathBuf, &str> = HashMap::new();
        let mut warnings = Vec::new();

        for plan in plans {
            let target = plan.target_path();
            if let Some(first) = seen.get(&target) {
                warnings.push(ValidationWarning::new(
                    plan.name(),
                    "target",
                    format!(
                        "{} clones into {}, which {first} already uses",
                        plan.source_url(),
                        target.display()
                    ),
                ));
            } else {
                seen.insert(target, plan.source_url());
            }
        }

        warnings
    }
}

/// Warns about symlink directories that depend on the current directory.
#[derive(Debug, Default)]
pub struct SymlinkDirValidator;

impl ConfigValidator for SymlinkDirValidator {
    fn validate(&self, plans: &[RepoPlan]) -> Vec<ValidationWarning> {
        plans
            .iter()
            .filter_map(|plan| {
                let dir = plan.symlink_target_dir()?;
                let relative = dir.is_relative() && !dir.starts_with("~");
                relative.then(|| {
                    ValidationWarning::new(
                        plan.name(),
                        "symlink_to",
                        format!(
                            "'{}' is relative and will be resolved against the current directory",
                            dir.display()
                        ),
                    )
                })
            })
            .collect()
    }
}

/// Run all validators over the built plans.
#[must_use]
pub fn validate_all(plans: &[RepoPlan]) -> Vec<ValidationWarning> {
    let validators: Vec<Box<dyn ConfigValidator>> = vec![
        Box::new(TargetCollisionValidator),
        Box::new(SymlinkDirValidator),
    ];

    let mut all_warnings = Vec::new();
    for validator in validators {
        all_warnings.extend(validator.validate(plans));
    }

    all_warnings
}
