//! Idempotent resource primitives (check + apply pattern).
pub mod clone;
pub mod error;
pub mod package;
pub mod shell;
pub mod symlink;

use anyhow::Result;

/// Minimal interface for resources that can be described and applied.
///
/// Resources with no observable state (shell commands) implement only this
/// trait. Resources that can determine their own state implement the richer
/// [`Resource`] super-trait.
pub trait Applicable {
    /// Human-readable description of this resource.
    fn description(&self) -> String;

    /// Apply the resource change.
    ///
    /// # Errors
    ///
    /// Returns an error if the resource cannot be applied: the external
    /// program could not be spawned or exited non-zero, or an I/O operation
    /// failed.
    fn apply(&self) -> Result<ResourceChange>;
}

/// State of a resource (cloned directory, link, editable install).
///
/// # Examples
///
/// ```
/// use clone_repos::resources::ResourceState;
///
/// let missing = ResourceState::Missing;
/// let correct = ResourceState::Correct;
/// let wrong = ResourceState::Incorrect { current: "points to /other/path".into() };
/// let skip = ResourceState::Invalid { reason: "link directory is missing".into() };
///
/// assert_ne!(missing, correct);
/// assert_eq!(correct, ResourceState::Correct);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceState {
    /// Resource does not exist or is not present.
    Missing,
    /// Resource exists and matches the desired state.
    Correct,
    /// Something exists in the resource's place but does not match.
    Incorrect {
        /// What is there instead.
        current: String,
    },
    /// Resource cannot be applied.
    Invalid {
        /// Reason why the resource cannot be applied.
        reason: String,
    },
}

/// Result of applying a resource change.
///
/// # Examples
///
/// ```
/// use clone_repos::resources::ResourceChange;
///
/// let applied = ResourceChange::Applied;
/// let noop = ResourceChange::AlreadyCorrect;
/// let skipped = ResourceChange::Skipped { reason: "already linked".into() };
///
/// assert_eq!(applied, ResourceChange::Applied);
/// assert_ne!(applied, noop);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceChange {
    /// Resource was created or updated.
    Applied,
    /// Resource was already correct (no change needed).
    AlreadyCorrect,
    /// Resource was skipped.
    Skipped {
        /// Reason why the resource was skipped.
        reason: String,
    },
}

/// Unified interface for resources that can be checked and applied.
///
/// # Examples
///
/// ```ignore
/// // All resources follow the same check-then-apply pattern:
/// if resource.needs_change()? {
///     resource.apply()?;
/// }
/// ```
pub trait Resource: Applicable {
    /// Check the current state of the resource.
    ///
    /// # Errors
    ///
    /// Returns an error if the resource state cannot be determined.
    fn current_state(&self) -> Result<ResourceState>;

    /// Determine if the resource needs to be changed.
    ///
    /// Only [`ResourceState::Missing`] needs a change: nothing here ever
    /// replaces an existing entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the current state cannot be determined (propagates errors from
    /// `current_state()`).
    fn needs_change(&self) -> Result<bool> {
        Ok(matches!(self.current_state()?, ResourceState::Missing))
    }
}
