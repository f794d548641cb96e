//! Git submodule resource.
use std::fmt;
use std::path::Path;

use crate::error::ReconcileError;
use crate::exec::{ExecError, Executor};

/// Verify `dir` is inside a git work tree by running `git status`.
///
/// # Errors
///
/// Returns [`ReconcileError::NotARepository`] if the probe fails.
pub fn ensure_repository(executor: &dyn Executor, dir: &Path) -> Result<(), ReconcileError> {
    executor
        .run_in(dir, "git", &["status"])
        .map(|_| ())
        .map_err(|source| ReconcileError::NotARepository { source })
}

/// A submodule checked out at `path` from `url`.
pub struct SubmoduleResource<'a> {
    /// Path relative to the repository root.
    pub path: String,
    /// Remote repository address.
    pub url: String,
    /// Repository root every git command runs in.
    dir: &'a Path,
    executor: &'a dyn Executor,
}

impl fmt::Debug for SubmoduleResource<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubmoduleResource")
            .field("path", &self.path)
            .field("url", &self.url)
            .field("dir", &self.dir)
            .field("executor", &"<dyn Executor>")
            .finish()
    }
}

impl<'a> SubmoduleResource<'a> {
    /// Create a new submodule resource.
    #[must_use]
    pub const fn new(path: String, url: String, dir: &'a Path, executor: &'a dyn Executor) -> Self {
        Self {
            path,
            url,
            dir,
            executor,
        }
    }

    /// Human-readable description of this submodule.
    #[must_use]
    pub fn description(&self) -> String {
        format!("{} ({})", self.path, self.url)
    }

    /// Register the submodule with `git submodule add -f`.
    ///
    /// Once the submodule is registered this fails on every run, so the
    /// caller decides whether to continue.
    ///
    /// # Errors
    ///
    /// Returns the [`ExecError`] reported by git.
    pub fn register(&self) -> Result<(), ExecError> {
        self.git(&["submodule", "add", "-f", self.url.as_str(), self.path.as_str()])
    }

    /// Initialise the submodule, then update it to the registered revision.
    ///
    /// # Errors
    ///
    /// - [`ReconcileError::SubmoduleInit`] if `git submodule init` fails.
    /// - [`ReconcileError::SubmoduleUpdate`] if `git submodule update` fails.
    pub fn sync(&self) -> Result<(), ReconcileError> {
        self.git(&["submodule", "init", self.path.as_str()])
            .map_err(|source| ReconcileError::SubmoduleInit {
                path: self.path.clone(),
                source,
            })?;

        self.git(&["submodule", "update", self.path.as_str()])
            .map_err(|source| ReconcileError::SubmoduleUpdate {
                path: self.path.clone(),
                source,
            })
    }

    fn git(&self, args: &[&str]) -> Result<(), ExecError> {
        self.executor.run_in(self.dir, "git", args).map(|_| ())
    }
}
