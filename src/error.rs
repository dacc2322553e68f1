//! Domain-specific error types for clone-repos.
//!
//! This module provides a structured error hierarchy using [`thiserror`].
//! The plan builder returns [`ConfigError`] and command setup returns
//! [`EnvironmentError`]; command handlers at the CLI boundary convert both
//! to [`anyhow::Error`] via the standard `?` operator.
//!
//! # Error hierarchy
//!
//! ```text
//! CloneReposError
//! ├── Config(ConfigError)  config file and per-entry option errors
//! └── Environment(EnvironmentError)  missing tools, unusable base directory
//! ```
//!
//! Step failures during plan execution are not represented here: they are
//! logged by the executor and never cross into the driver as errors.

use thiserror::Error;

/// Top-level error type for clone-repos.
#[derive(Error, Debug)]
pub enum CloneReposError {
    /// Configuration-related error (file parsing, option validation).
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Environment error detected before any repository is processed.
    #[error("Environment error: {0}")]
    Environment(#[from] EnvironmentError),
}

/// Errors that arise from loading the config file or building a plan.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A list option contains a non-string element, or is not a list at all.
    #[error("{repo}: while trying to parse '{key}' as a list of strings, found {value}")]
    InvalidList {
        /// Repository the option belongs to.
        repo: String,
        /// Option key (e.g. `preinstall`).
        key: String,
        /// Rendering of the whole malformed value.
        value: String,
    },

    /// A boolean option holds something other than a bool or "true"/"false".
    #[error("{repo}: could not parse '{key}' as a bool: {value}")]
    InvalidBool {
        /// Repository the option belongs to.
        repo: String,
        /// Option key (e.g. `pipefail`).
        key: String,
        /// Rendering of the offending value.
        value: String,
    },

    /// A top-level key is not a usable clone URL (empty or not a string).
    #[error("invalid repository key {key}: expected a non-empty clone URL")]
    InvalidUrl {
        /// Rendering of the offending key.
        key: String,
    },

    /// No directory name could be derived for the repository.
    #[error("{url}: cannot derive a directory name from the URL, set 'dirname'")]
    UnnamedRepository {
        /// The clone URL.
        url: String,
    },

    /// The config file's top level is not a mapping of URLs to options.
    #[error("{path}: expected a mapping of repository URLs to options")]
    NotAMapping {
        /// Path of the config file.
        path: String,
    },

    /// The config file is not valid YAML.
    #[error("failed to parse {path}: {source}")]
    Parse {
        /// Path of the config file.
        path: String,
        /// Underlying YAML error.
        source: serde_yaml::Error,
    },

    /// An I/O error occurred while reading the config file.
    #[error("IO error reading config file {path}: {source}")]
    Io {
        /// Path to the file that could not be read.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Errors about the environment the tool runs in.
#[derive(Error, Debug)]
pub enum EnvironmentError {
    /// A required external program is not on `PATH`.
    #[error("could not find '{0}' on your $PATH")]
    ToolNotFound(String),

    /// The base repository directory is missing or not a directory.
    #[error("base directory '{path}' does not exist or is not a directory")]
    BaseDirectory {
        /// The configured base directory.
        path: String,
    },
}
