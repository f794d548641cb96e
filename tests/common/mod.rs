// Shared helpers for integration tests.
//
// Provides a temporary-directory-backed dotfiles repository with a
// `dotkeeper.yaml`, a fluent builder, and a recording executor so each
// integration test runs in isolation without real git or package tools.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use dotkeeper::commands::apply::{ApplyRequest, apply};
use dotkeeper::error::DotkeeperError;
use dotkeeper::exec::{ExecError, ExecResult, Executor};
use dotkeeper::logging::{Log, Logger};
use dotkeeper::platform::Platform;

/// Executor that records command lines and fails those starting with a
/// scripted prefix.
#[derive(Debug, Default)]
pub struct RecordingExecutor {
    calls: Mutex<Vec<String>>,
    failures: Vec<(String, String)>,
}

impl RecordingExecutor {
    /// Fail any command line starting with `prefix`, reporting `stderr`.
    pub fn fail_on(mut self, prefix: &str, stderr: &str) -> Self {
        self.failures.push((prefix.to_string(), stderr.to_string()));
        self
    }

    /// Command lines recorded so far, in order.
    pub fn commands(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock").clone()
    }

    fn record(&self, program: &str, args: &[&str]) -> Result<ExecResult, ExecError> {
        let line = std::iter::once(program)
            .chain(args.iter().copied())
            .collect::<Vec<_>>()
            .join(" ");
        self.calls.lock().expect("calls lock").push(line.clone());
        match self.failures.iter().find(|(p, _)| line.starts_with(p.as_str())) {
            Some((_, stderr)) => Err(ExecError::Failed {
                program: program.to_string(),
                code: Some(1),
                stderr: stderr.clone(),
            }),
            None => Ok(ExecResult::ok()),
        }
    }
}

impl Executor for RecordingExecutor {
    fn run_in(&self, _: &Path, program: &str, args: &[&str]) -> Result<ExecResult, ExecError> {
        self.record(program, args)
    }

    fn run_streaming(&self, program: &str, args: &[&str]) -> Result<ExecResult, ExecError> {
        self.record(program, args)
    }

    fn which(&self, _: &str) -> bool {
        true
    }
}

/// An isolated dotfiles repository backed by a [`tempfile::TempDir`].
///
/// Layout: `repo/` holds `dotkeeper.yaml` and link sources, `home/` stands in
/// for the user's home directory and `sources/` for the apt source list
/// directory.
pub struct IntegrationTestContext {
    /// Temporary directory containing the test layout.
    pub root: tempfile::TempDir,
    /// Platform handed to the orchestrator.
    pub platform: Platform,
}

impl IntegrationTestContext {
    /// Path to the repository (working directory of a run).
    pub fn repo(&self) -> PathBuf {
        self.root.path().join("repo")
    }

    /// Path standing in for the home directory.
    pub fn home(&self) -> PathBuf {
        self.root.path().join("home")
    }

    /// Path standing in for `/etc/apt/sources.list.d`.
    pub fn sources_dir(&self) -> PathBuf {
        self.root.path().join("sources")
    }

    /// Request that applies this repository's `dotkeeper.yaml`.
    pub fn request(&self, dry_run: bool) -> ApplyRequest {
        ApplyRequest {
            config_path: self.repo().join("dotkeeper.yaml"),
            cwd: self.repo(),
            home: Some(self.home()),
            platform: self.platform,
            dry_run,
            apt_sources_dir: Some(self.sources_dir()),
        }
    }

    /// Run the orchestrator against `executor`, returning the result and the
    /// logger holding the per-stage summary.
    pub fn apply(
        &self,
        executor: &Arc<RecordingExecutor>,
        dry_run: bool,
    ) -> (Result<(), DotkeeperError>, Arc<Logger>) {
        let log = Arc::new(Logger::new("integration-test"));
        let result = apply(
            &self.request(dry_run),
            &(Arc::clone(&log) as Arc<dyn Log>),
            Arc::clone(executor) as Arc<dyn Executor>,
        );
        (result, log)
    }
}

/// Fluent builder for [`IntegrationTestContext`].
pub struct TestContextBuilder {
    ctx: IntegrationTestContext,
}

impl TestContextBuilder {
    /// Begin building a context with empty `repo/`, `home/` and `sources/`
    /// directories and an empty document.
    pub fn new(platform: Platform) -> Self {
        let root = tempfile::tempdir().expect("create temp dir");
        let ctx = IntegrationTestContext { root, platform };
        for dir in [ctx.repo(), ctx.home(), ctx.sources_dir()] {
            std::fs::create_dir_all(dir).expect("create test dir");
        }
        std::fs::write(ctx.repo().join("dotkeeper.yaml"), "").expect("write empty config");
        Self { ctx }
    }

    /// Replace the repository's `dotkeeper.yaml`.
    pub fn with_config(self, content: &str) -> Self {
        std::fs::write(self.ctx.repo().join("dotkeeper.yaml"), content).expect("write config");
        self
    }

    /// Create a file inside the repository so links have a real target.
    pub fn with_source(self, relative: &str, content: &str) -> Self {
        let path = self.ctx.repo().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create source parent");
        }
        std::fs::write(path, content).expect("write source file");
        self
    }

    /// Create a file inside the fake home directory.
    pub fn with_home_file(self, relative: &str, content: &str) -> Self {
        let path = self.ctx.home().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create home parent");
        }
        std::fs::write(path, content).expect("write home file");
        self
    }

    /// Finish building and return the configured context.
    pub fn build(self) -> IntegrationTestContext {
        self.ctx
    }
}
