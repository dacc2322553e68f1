//! A [`Log`] wrapper that tags every message with a repository name.
use std::sync::Arc;

use super::types::{Log, TaskStatus};

/// Prefixes every message with `"<prefix>: "` before forwarding it.
///
/// Summary records are forwarded unchanged.
pub struct PrefixedLog {
    inner: Arc<dyn Log>,
    prefix: String,
}

impl std::fmt::Debug for PrefixedLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrefixedLog")
            .field("inner", &"<dyn Log>")
            .field("prefix", &self.prefix)
            .finish()
    }
}

impl PrefixedLog {
    /// Wrap `inner`, tagging messages with `prefix`.
    #[must_use]
    pub fn new(inner: Arc<dyn Log>, prefix: impl Into<String>) -> Self {
        Self {
            inner,
            prefix: prefix.into(),
        }
    }

    fn tag(&self, msg: &str) -> String {
        format!("{}: {msg}", self.prefix)
    }
}

impl Log for PrefixedLog {
    fn stage(&self, msg: &str) {
        self.inner.stage(&self.tag(msg));
    }

    fn info(&self, msg: &str) {
        self.inner.info(&self.tag(msg));
    }

    fn debug(&self, msg: &str) {
        self.inner.debug(&self.tag(msg));
    }

    fn warn(&self, msg: &str) {
        self.inner.warn(&self.tag(msg));
    }

    fn error(&self, msg: &str) {
        self.inner.error(&self.tag(msg));
    }

    fn record_task(&self, name: &str, status: TaskStatus, message: Option<&str>) {
        self.inner.record_task(name, status, message);
    }
}
