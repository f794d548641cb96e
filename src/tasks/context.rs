use std::path::PathBuf;
use std::sync::Arc;

use crate::config::Config;
use crate::exec::Executor;
use crate::logging::Log;
use crate::platform::Platform;
use crate::resources::apt_source::SOURCES_DIR;

/// Shared context for task execution.
pub struct Context {
    /// Desired-state document loaded for this run.
    pub config: Arc<Config>,
    /// Platform detected once by the orchestrator.
    pub platform: Platform,
    /// Logger for output and task recording.
    pub log: Arc<dyn Log>,
    /// Command executor (for testing or real system calls).
    pub executor: Arc<dyn Executor>,
    /// Working directory: symlink sources resolve against it and git runs
    /// inside it.
    pub cwd: PathBuf,
    /// Whether to perform a dry run (preview changes without applying).
    pub dry_run: bool,
    /// Directory apt source lists are written to.
    pub apt_sources_dir: PathBuf,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("config", &"<Config>")
            .field("platform", &self.platform)
            .field("log", &"<dyn Log>")
            .field("executor", &"<dyn Executor>")
            .field("cwd", &self.cwd)
            .field("dry_run", &self.dry_run)
            .field("apt_sources_dir", &self.apt_sources_dir)
            .finish()
    }
}

impl Context {
    /// Creates a new context for task execution.
    #[must_use]
    pub fn new(
        config: Arc<Config>,
        platform: Platform,
        log: Arc<dyn Log>,
        executor: Arc<dyn Executor>,
        cwd: PathBuf,
        dry_run: bool,
    ) -> Self {
        Self {
            config,
            platform,
            log,
            executor,
            cwd,
            dry_run,
            apt_sources_dir: PathBuf::from(SOURCES_DIR),
        }
    }

    /// Write apt source lists to `dir` instead of the system directory.
    #[must_use]
    pub fn with_apt_sources_dir(mut self, dir: PathBuf) -> Self {
        self.apt_sources_dir = dir;
        self
    }
}
