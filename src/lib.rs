//! Declarative dotfiles manager.
//!
//! Converges a machine to a YAML desired-state document: symbolic links,
//! git submodules and packages from apt, Homebrew and the Mac App Store.
//! Every stage is safe to re-run after a partial failure.
//!
//! The public API is organised into layers:
//!
//! - **[`config`]**: load, version-check and validate the document
//! - **[`resources`]**: idempotent primitives (symlink, submodule, apt source, package batch)
//! - **[`tasks`]**: one reconciler per resource kind, run in a fixed order
//! - **[`commands`]**: top-level subcommand orchestration (`apply`, `version`)
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod exec;
pub mod logging;
pub mod path;
pub mod platform;
pub mod resources;
pub mod tasks;
