use std::sync::Arc;

use crate::exec::Executor;
use crate::logging::Log;
use crate::operations::FileSystemOps;
use crate::resources::package::EditableRegistry;

/// Shared context for plan execution.
pub struct Context {
    /// Logger for output and summary recording.
    pub log: Arc<dyn Log>,
    /// Command executor (for testing or real system calls).
    pub executor: Arc<dyn Executor>,
    /// Filesystem operation abstraction (injectable for testing).
    pub fs_ops: Arc<dyn FileSystemOps>,
    /// Where editable installs are looked up.
    pub registry: Arc<dyn EditableRegistry>,
    /// Interpreter used to run pip.
    pub python: String,
    /// Whether a failed package install halts the remaining repositories.
    pub strict: bool,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("log", &"<dyn Log>")
            .field("executor", &"<dyn Executor>")
            .field("fs_ops", &"<dyn FileSystemOps>")
            .field("registry", &self.registry)
            .field("python", &self.python)
            .field("strict", &self.strict)
            .finish()
    }
}

impl Context {
    /// Return a copy of this context that logs through `log`.
    #[must_use]
    pub fn with_log(&self, log: Arc<dyn Log>) -> Self {
        Self {
            log,
            executor: Arc::clone(&self.executor),
            fs_ops: Arc::clone(&self.fs_ops),
            registry: Arc::clone(&self.registry),
            python: self.python.clone(),
            strict: self.strict,
        }
    }
}
