//! Declarative repository cloner.
//!
//! Reads a YAML file mapping clone URLs to per-repository options, turns
//! every entry into a validated [`RepoPlan`](config::plan::RepoPlan), and
//! runs each plan in file order: clone, symlink, preinstall commands,
//! package install, postinstall commands.
//!
//! The public API is organised into four layers:
//!
//! - **[`config`]**: load the YAML file and build plans from its entries
//! - **[`resources`]**: idempotent `check + apply` primitives (clone, link, pip install)
//! - **[`tasks`]**: the ordered steps of a plan and the executor that runs them
//! - **[`commands`]**: top-level orchestration for running or printing plans
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod exec;
pub mod logging;
pub mod operations;
pub mod paths;
pub mod resources;
pub mod tasks;
