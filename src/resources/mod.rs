//! Idempotent resource primitives (check + apply pattern).
pub mod apt_source;
pub mod package;
pub mod submodule;
pub mod symlink;

use crate::error::ReconcileError;

/// Minimal interface for resources that can be described and applied.
pub trait Applicable {
    /// Human-readable description of this resource.
    fn description(&self) -> String;

    /// Converge the resource to its desired state.
    ///
    /// Applying twice yields the same final state; the second call never
    /// fails merely because the first one succeeded.
    ///
    /// # Errors
    ///
    /// Returns a [`ReconcileError`] naming the failed step.
    fn apply(&self) -> Result<ResourceChange, ReconcileError>;
}

/// State of a resource as observed before applying it.
///
/// # Examples
///
/// ```
/// use dotkeeper::resources::ResourceState;
///
/// let missing = ResourceState::Missing;
/// let wrong = ResourceState::Incorrect { current: "regular file".into() };
///
/// assert_ne!(missing, ResourceState::Correct);
/// assert_ne!(wrong, ResourceState::Missing);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceState {
    /// Nothing exists yet.
    Missing,
    /// Resource exists and already matches the desired state.
    Correct,
    /// Something exists but does not match the desired state.
    Incorrect {
        /// What is currently there.
        current: String,
    },
}

/// Result of applying a resource change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceChange {
    /// Resource was created from nothing.
    Applied,
    /// An existing object was removed and replaced.
    Replaced {
        /// What was there before.
        previous: String,
    },
}

/// Resources that can report their own state before being applied.
pub trait Resource: Applicable {
    /// Check the current state of the resource.
    fn current_state(&self) -> ResourceState;

    /// Whether applying would change anything.
    fn needs_change(&self) -> bool {
        self.current_state() != ResourceState::Correct
    }
}

/// Shared test helpers for resource and task unit tests.
#[cfg(test)]
pub mod test_helpers {
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;

    use crate::exec::{ExecError, ExecResult, Executor};

    /// One recorded invocation.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct Invocation {
        /// Working directory for `run_in` calls.
        pub dir: Option<PathBuf>,
        /// Program and arguments joined by single spaces.
        pub command: String,
    }

    /// Executor fake that records every invocation and fails the ones whose
    /// command line starts with a scripted prefix.
    ///
    /// `which` reports every tool as available unless it was marked missing.
    #[derive(Debug, Default)]
    pub struct RecordingExecutor {
        calls: Mutex<Vec<Invocation>>,
        failures: Vec<(String, String)>,
        missing: Vec<String>,
    }

    impl RecordingExecutor {
        /// An executor where every command succeeds.
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Fail any command line starting with `prefix`, reporting `stderr`.
        #[must_use]
        pub fn fail_on(mut self, prefix: &str, stderr: &str) -> Self {
            self.failures.push((prefix.to_string(), stderr.to_string()));
            self
        }

        /// Make `which(tool)` return `false`.
        #[must_use]
        pub fn without_tool(mut self, tool: &str) -> Self {
            self.missing.push(tool.to_string());
            self
        }

        /// Command lines recorded so far, in order.
        #[must_use]
        pub fn commands(&self) -> Vec<String> {
            self.invocations()
                .into_iter()
                .map(|i| i.command)
                .collect()
        }

        /// Full invocations recorded so far, in order.
        #[must_use]
        pub fn invocations(&self) -> Vec<Invocation> {
            self.calls.lock().map_or_else(|_| vec![], |g| g.clone())
        }

        fn record(
            &self,
            dir: Option<&Path>,
            program: &str,
            args: &[&str],
        ) -> Result<ExecResult, ExecError> {
            let command = std::iter::once(program)
                .chain(args.iter().copied())
                .collect::<Vec<_>>()
                .join(" ");
            let failure = self
                .failures
                .iter()
                .find(|(prefix, _)| command.starts_with(prefix.as_str()))
                .map(|(_, stderr)| stderr.clone());
            if let Ok(mut guard) = self.calls.lock() {
                guard.push(Invocation {
                    dir: dir.map(Path::to_path_buf),
                    command,
                });
            }
            match failure {
                Some(stderr) => Err(ExecError::Failed {
                    program: program.to_string(),
                    code: Some(1),
                    stderr,
                }),
                None => Ok(ExecResult::ok()),
            }
        }
    }

    impl Executor for RecordingExecutor {
        fn run_in(
            &self,
            dir: &Path,
            program: &str,
            args: &[&str],
        ) -> Result<ExecResult, ExecError> {
            self.record(Some(dir), program, args)
        }

        fn run_streaming(&self, program: &str, args: &[&str]) -> Result<ExecResult, ExecError> {
            self.record(None, program, args)
        }

        fn which(&self, program: &str) -> bool {
            !self.missing.iter().any(|m| m == program)
        }
    }
}
