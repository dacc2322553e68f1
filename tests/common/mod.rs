// Shared helpers for integration tests.
//
// Provides fixture lookup, a tempdir-backed base directory, and a real-system
// execution context so each integration test can run plans in isolation.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use clone_repos::config::{Config, LoadOptions};
use clone_repos::exec::SystemExecutor;
use clone_repos::logging::{Log, TaskStatus};
use clone_repos::operations::SystemFileSystemOps;
use clone_repos::resources::package::EditableRegistry;
use clone_repos::tasks::Context;

/// Path of a file under `tests/data/`.
pub fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}

/// A registry that knows no editable installs.
#[derive(Debug, Default)]
pub struct NoEditables;

impl EditableRegistry for NoEditables {
    fn editable_paths(&self) -> anyhow::Result<HashSet<PathBuf>> {
        Ok(HashSet::new())
    }
}

/// A [`Log`] that keeps every message as `"<level> <message>"`.
#[derive(Debug, Default)]
pub struct CaptureLog {
    lines: Mutex<Vec<String>>,
}

impl CaptureLog {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().expect("log lines poisoned").clone()
    }

    fn push(&self, level: &str, msg: &str) {
        self.lines
            .lock()
            .expect("log lines poisoned")
            .push(format!("{level} {msg}"));
    }
}

impl Log for CaptureLog {
    fn stage(&self, msg: &str) {
        self.push("stage", msg);
    }
    fn info(&self, msg: &str) {
        self.push("info", msg);
    }
    fn debug(&self, msg: &str) {
        self.push("debug", msg);
    }
    fn warn(&self, msg: &str) {
        self.push("warn", msg);
    }
    fn error(&self, msg: &str) {
        self.push("error", msg);
    }
    fn record_task(&self, name: &str, status: TaskStatus, _message: Option<&str>) {
        self.push("record", &format!("{name} {status:?}"));
    }
}

/// An isolated base directory backed by a [`tempfile::TempDir`].
pub struct IntegrationTestContext {
    /// Directory repositories are cloned under.
    pub base: tempfile::TempDir,
}

impl IntegrationTestContext {
    pub fn new() -> Self {
        Self {
            base: tempfile::tempdir().expect("create temp dir"),
        }
    }

    pub fn base_path(&self) -> &Path {
        self.base.path()
    }

    /// Load a fixture with this context's base directory.
    pub fn load_fixture(&self, name: &str) -> Config {
        let opts = LoadOptions {
            base: self.base_path().to_path_buf(),
            allow_system_package_break: false,
        };
        Config::load(&fixture(name), &opts, &SystemFileSystemOps).expect("load config")
    }

    /// A context that runs real processes against the real filesystem.
    pub fn system_context(&self) -> (Context, Arc<CaptureLog>) {
        let log = Arc::new(CaptureLog::default());
        let ctx = Context {
            log: Arc::clone(&log) as Arc<dyn Log>,
            executor: Arc::new(SystemExecutor),
            fs_ops: Arc::new(SystemFileSystemOps),
            registry: Arc::new(NoEditables),
            python: "python3".to_string(),
            strict: false,
        };
        (ctx, log)
    }
}
