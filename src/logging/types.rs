//! Core logging types: summary entries, status, and the [`Log`] trait.

/// Per-repository result for summary reporting.
#[derive(Debug, Clone)]
pub struct TaskEntry {
    /// Repository name.
    pub name: String,
    /// Final status of the repository.
    pub status: TaskStatus,
    /// Optional detail message (e.g., skip reason or error description).
    pub message: Option<String>,
}

/// Status of a processed repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    /// Every step completed.
    Ok,
    /// The repository was not processed (e.g. the batch was halted first).
    Skipped,
    /// A step failed, the clone was aborted, or the entry could not be built.
    Failed,
}

/// Abstraction over logging backends.
///
/// [`Logger`](super::logger::Logger) writes through `tracing`;
/// [`PrefixedLog`](super::prefixed::PrefixedLog) wraps another `Log` and tags
/// every message with a repository name.
pub trait Log: Send + Sync {
    /// Log a stage header (major section).
    fn stage(&self, msg: &str);
    /// Log an informational message.
    fn info(&self, msg: &str);
    /// Log a debug message (may be suppressed on console).
    fn debug(&self, msg: &str);
    /// Log a warning message.
    fn warn(&self, msg: &str);
    /// Log an error message.
    fn error(&self, msg: &str);
    /// Record a repository result for the summary.
    fn record_task(&self, name: &str, status: TaskStatus, message: Option<&str>);
}
