//! Domain-specific error types for dotkeeper.
//!
//! Internal modules return typed errors while the binary converts them to
//! [`anyhow::Error`] at the CLI boundary via the standard `?` operator.
//!
//! # Error hierarchy
//!
//! ```text
//! DotkeeperError
//! ├── Config(ConfigError)             unreadable, unparseable or version-mismatched document
//! └── Stage { stage, ReconcileError }  the first reconciler that failed
//! ```

use std::path::PathBuf;

use thiserror::Error;

use crate::exec::ExecError;

/// Top-level error for one orchestrated run.
#[derive(Error, Debug)]
pub enum DotkeeperError {
    /// The desired-state document could not be loaded. Nothing was mutated.
    #[error("failed to load config file: {0}")]
    Config(#[from] ConfigError),

    /// A reconciler failed; earlier stages stay applied.
    #[error("{stage} failed: {source}")]
    Stage {
        /// Name of the stage that failed.
        stage: String,
        /// Underlying reconciler error.
        source: ReconcileError,
    },
}

/// Errors that arise while loading the desired-state document.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read (missing, permission denied, ...).
    #[error("cannot read config file {}: {source}", .path.display())]
    Read {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The content is not a structurally valid document.
    #[error("invalid config file {}: {source}", .path.display())]
    Parse {
        /// Path that was parsed.
        path: PathBuf,
        /// Underlying YAML error.
        source: serde_yaml::Error,
    },

    /// The version marker is present but has no numeric major component.
    #[error("invalid version marker '{0}': expected vMAJOR.MINOR.PATCH")]
    InvalidVersion(String),

    /// The document's major version differs from the tool's.
    #[error(
        "config file version ({config}) does not match CLI version ({tool}); major versions must match"
    )]
    VersionMismatch {
        /// Version marker declared by the document.
        config: String,
        /// Version of the running tool.
        tool: String,
    },

    /// A destination starts with `~` but the home directory is unknown.
    #[error(transparent)]
    NoHome(#[from] crate::path::NoWayHome),
}

/// Per-entry and precondition errors raised by the reconcilers.
///
/// Indices are 1-based positions in the declared sequence.
#[derive(Error, Debug)]
pub enum ReconcileError {
    /// The destination's parent directory could not be created.
    #[error("failed to create directory for symlink {index}: {source}")]
    DirectoryCreate {
        /// 1-based entry position.
        index: usize,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// An existing object at the destination could not be removed.
    #[error("failed to remove existing {} for symlink {index}: {source}", .path.display())]
    SymlinkRemove {
        /// 1-based entry position.
        index: usize,
        /// Destination path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The source could not be made absolute.
    #[error("failed to resolve source path {} for symlink {index}: {source}", .path.display())]
    PathResolve {
        /// 1-based entry position.
        index: usize,
        /// Declared source path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The link itself could not be created.
    #[error("failed to create symlink {index}: {source}")]
    SymlinkCreate {
        /// 1-based entry position.
        index: usize,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The working directory is not inside a git repository.
    #[error("current directory is not a git repository: {source}")]
    NotARepository {
        /// Failure of the status probe.
        source: ExecError,
    },

    /// `git submodule init` failed.
    #[error("failed to initialize submodule {path}: {source}")]
    SubmoduleInit {
        /// Declared submodule path.
        path: String,
        /// Underlying command failure.
        source: ExecError,
    },

    /// `git submodule update` failed.
    #[error("failed to update submodule {path}: {source}")]
    SubmoduleUpdate {
        /// Declared submodule path.
        path: String,
        /// Underlying command failure.
        source: ExecError,
    },

    /// A required external tool is not on `PATH`.
    #[error("{tool} command is not available: {hint}")]
    ToolUnavailable {
        /// Program that was looked up.
        tool: &'static str,
        /// How to get it.
        hint: &'static str,
    },

    /// An apt repository-source file could not be written.
    #[error("failed to write source file {}: {source}", .path.display())]
    SourceWrite {
        /// Declared source name.
        name: String,
        /// File that was written.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The package index refresh failed.
    #[error("failed to update {tool} package index: {source}")]
    IndexRefresh {
        /// Package manager that was refreshed.
        tool: &'static str,
        /// Underlying command failure.
        source: ExecError,
    },

    /// The batch package install failed.
    #[error("failed to install {tool} packages: {source}")]
    PackageInstall {
        /// Package manager that was invoked.
        tool: &'static str,
        /// Underlying command failure.
        source: ExecError,
    },

    /// A single App Store install failed.
    #[error("failed to install app ID {id}: {source}")]
    AppInstall {
        /// App Store identifier.
        id: String,
        /// Underlying command failure.
        source: ExecError,
    },
}
