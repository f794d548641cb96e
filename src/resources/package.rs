//! Package manager invocations.
//!
//! None of the supported managers needs an installed-state query: `apt-get
//! install`, `brew install` and `mas install` all leave already-installed
//! packages untouched, so re-running a batch is safe.
use std::fmt;

use crate::error::ReconcileError;
use crate::exec::{ExecError, Executor};

/// Supported package managers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    /// Debian-family packages (apt-get, via sudo).
    Apt,
    /// Homebrew formulae.
    Brew,
    /// Homebrew casks.
    BrewCask,
    /// Mac App Store applications (mas).
    Mas,
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Apt => write!(f, "apt"),
            Self::Brew => write!(f, "homebrew formula"),
            Self::BrewCask => write!(f, "homebrew cask"),
            Self::Mas => write!(f, "app store"),
        }
    }
}

/// A program and its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    /// Program to run.
    pub program: &'static str,
    /// Arguments, one per element.
    pub args: Vec<String>,
}

impl CommandLine {
    fn new(program: &'static str, args: &[&str]) -> Self {
        Self {
            program,
            args: args.iter().map(ToString::to_string).collect(),
        }
    }

    fn with(mut self, extra: &[String]) -> Self {
        self.args.extend(extra.iter().cloned());
        self
    }

    fn run(&self, executor: &dyn Executor) -> Result<(), ExecError> {
        let args: Vec<&str> = self.args.iter().map(String::as_str).collect();
        executor.run_streaming(self.program, &args).map(|_| ())
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

impl PackageManager {
    /// Program that must be on `PATH` for this manager to work.
    #[must_use]
    pub const fn tool(self) -> &'static str {
        match self {
            Self::Apt => "apt-get",
            Self::Brew | Self::BrewCask => "brew",
            Self::Mas => "mas",
        }
    }

    const fn hint(self) -> &'static str {
        match self {
            Self::Apt => "this feature is only supported on Debian-based systems",
            Self::Brew | Self::BrewCask => "install Homebrew first: https://brew.sh",
            Self::Mas => "install it with 'brew install mas'",
        }
    }

    /// Fail unless the manager's tool is on `PATH`.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError::ToolUnavailable`] when the lookup fails.
    pub fn ensure_available(self, executor: &dyn Executor) -> Result<(), ReconcileError> {
        if executor.which(self.tool()) {
            Ok(())
        } else {
            Err(ReconcileError::ToolUnavailable {
                tool: self.tool(),
                hint: self.hint(),
            })
        }
    }

    /// Index refresh command, if the manager has one.
    #[must_use]
    pub fn refresh_command(self) -> Option<CommandLine> {
        match self {
            Self::Apt => Some(CommandLine::new("sudo", &["apt-get", "update"])),
            Self::Brew | Self::BrewCask => Some(CommandLine::new("brew", &["update"])),
            Self::Mas => None,
        }
    }

    /// Install commands for `names`: one batch, or one per app for `mas`.
    #[must_use]
    pub fn install_commands(self, names: &[String]) -> Vec<CommandLine> {
        if names.is_empty() {
            return vec![];
        }
        match self {
            Self::Apt => vec![CommandLine::new("sudo", &["apt-get", "install", "-y"]).with(names)],
            Self::Brew => vec![CommandLine::new("brew", &["install"]).with(names)],
            Self::BrewCask => vec![CommandLine::new("brew", &["install", "--cask"]).with(names)],
            Self::Mas => names
                .iter()
                .map(|id| CommandLine::new("mas", &["install", id.as_str()]))
                .collect(),
        }
    }
}

/// Refresh the manager's package index.
///
/// # Errors
///
/// Returns [`ReconcileError::IndexRefresh`] if the refresh command fails.
pub fn refresh_index(manager: PackageManager, executor: &dyn Executor) -> Result<(), ReconcileError> {
    let Some(command) = manager.refresh_command() else {
        return Ok(());
    };
    command
        .run(executor)
        .map_err(|source| ReconcileError::IndexRefresh {
            tool: manager.tool(),
            source,
        })
}

/// Install `names`, stopping at the first failed command.
///
/// # Errors
///
/// Returns [`ReconcileError::PackageInstall`] for a failed batch, or
/// [`ReconcileError::AppInstall`] naming the App Store identifier that failed.
pub fn install_packages(
    manager: PackageManager,
    names: &[String],
    executor: &dyn Executor,
) -> Result<(), ReconcileError> {
    for (command, name) in manager.install_commands(names).iter().zip(names) {
        command.run(executor).map_err(|source| match manager {
            PackageManager::Mas => ReconcileError::AppInstall {
                id: name.clone(),
                source,
            },
            _ => ReconcileError::PackageInstall {
                tool: manager.tool(),
                source,
            },
        })?;
    }
    Ok(())
}
