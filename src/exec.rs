//! External command execution.
//!
//! Every reconciler that shells out (git, apt-get, brew, mas) goes through the
//! [`Executor`] trait so tests can substitute a fake that records invocations
//! and simulates failures without touching a real tool.
use std::path::Path;
use std::process::{Command, Output, Stdio};

use thiserror::Error;

/// Result of a command execution.
#[derive(Debug, Clone, Default)]
pub struct ExecResult {
    /// Captured standard output (empty when the output was streamed).
    pub stdout: String,
    /// Captured standard error (empty when the output was streamed).
    pub stderr: String,
    /// Whether the process exited with status zero.
    pub success: bool,
    /// Exit code, if the process was not terminated by a signal.
    pub code: Option<i32>,
}

impl ExecResult {
    /// A successful result with empty output.
    #[must_use]
    pub fn ok() -> Self {
        Self {
            success: true,
            code: Some(0),
            ..Self::default()
        }
    }
}

impl From<Output> for ExecResult {
    fn from(output: Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
            code: output.status.code(),
        }
    }
}

/// Errors raised while running an external program.
#[derive(Error, Debug)]
pub enum ExecError {
    /// The process could not be started at all.
    #[error("failed to execute {program}: {source}")]
    Spawn {
        /// Program that was invoked.
        program: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The process ran but exited non-zero.
    #[error("{program} failed (exit {}): {}", .code.unwrap_or(-1), .stderr.trim())]
    Failed {
        /// Program that was invoked.
        program: String,
        /// Exit code, `None` when killed by a signal.
        code: Option<i32>,
        /// Captured standard error (empty for streamed commands).
        stderr: String,
    },
}

impl ExecError {
    /// Diagnostic text reported by the failing tool, if any was captured.
    #[must_use]
    pub fn stderr(&self) -> &str {
        match self {
            Self::Failed { stderr, .. } => stderr,
            Self::Spawn { .. } => "",
        }
    }
}

/// Narrow interface over process execution.
pub trait Executor: Send + Sync {
    /// Run a command in a specific directory, capturing its output.
    ///
    /// # Errors
    ///
    /// Returns [`ExecError`] if the program cannot be spawned or exits non-zero.
    fn run_in(&self, dir: &Path, program: &str, args: &[&str]) -> Result<ExecResult, ExecError>;

    /// Run a command with stdout/stderr forwarded to the terminal.
    ///
    /// Used for long-running package manager invocations whose progress the
    /// user should see. Blocks until the child exits.
    ///
    /// # Errors
    ///
    /// Returns [`ExecError`] if the program cannot be spawned or exits non-zero.
    fn run_streaming(&self, program: &str, args: &[&str]) -> Result<ExecResult, ExecError>;

    /// Check if a program is available on `PATH`.
    fn which(&self, program: &str) -> bool;
}

/// Production [`Executor`] backed by [`std::process::Command`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemExecutor;

/// Execute a command and return the result, failing on non-zero exit.
fn execute_checked(mut cmd: Command, program: &str) -> Result<ExecResult, ExecError> {
    let output = cmd.output().map_err(|source| ExecError::Spawn {
        program: program.to_string(),
        source,
    })?;
    let result = ExecResult::from(output);
    if !result.success {
        return Err(ExecError::Failed {
            program: program.to_string(),
            code: result.code,
            stderr: result.stderr,
        });
    }
    Ok(result)
}

impl Executor for SystemExecutor {
    fn run_in(&self, dir: &Path, program: &str, args: &[&str]) -> Result<ExecResult, ExecError> {
        let mut cmd = Command::new(program);
        cmd.args(args).current_dir(dir);
        execute_checked(cmd, program)
    }

    fn run_streaming(&self, program: &str, args: &[&str]) -> Result<ExecResult, ExecError> {
        let status = Command::new(program)
            .args(args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|source| ExecError::Spawn {
                program: program.to_string(),
                source,
            })?;
        if !status.success() {
            return Err(ExecError::Failed {
                program: program.to_string(),
                code: status.code(),
                stderr: String::new(),
            });
        }
        Ok(ExecResult {
            success: true,
            code: status.code(),
            ..ExecResult::default()
        })
    }

    fn which(&self, program: &str) -> bool {
        which::which(program).is_ok()
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn run_in_captures_stdout() {
        let dir = tempfile::tempdir().unwrap();
        let result = SystemExecutor.run_in(dir.path(), "echo", &["hello"]).unwrap();
        assert!(result.success, "echo command should succeed");
        assert_eq!(result.stdout.trim(), "hello");
    }

    #[cfg(unix)]
    #[test]
    fn run_in_failure_reports_exit_code() {
        let dir = tempfile::tempdir().unwrap();
        let err = SystemExecutor.run_in(dir.path(), "false", &[]).unwrap_err();
        assert!(matches!(err, ExecError::Failed { code: Some(1), .. }));
        assert!(err.to_string().contains("exit 1"), "got: {err}");
    }

    #[cfg(unix)]
    #[test]
    fn run_in_failure_keeps_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let err = SystemExecutor
            .run_in(dir.path(), "sh", &["-c", "echo 'already exists' >&2; exit 128"])
            .unwrap_err();
        assert!(err.stderr().contains("already exists"));
        assert!(err.to_string().contains("exit 128"));
    }

    #[cfg(unix)]
    #[test]
    fn run_streaming_failure() {
        let err = SystemExecutor.run_streaming("false", &[]).unwrap_err();
        assert!(matches!(err, ExecError::Failed { .. }));
        assert_eq!(err.stderr(), "");
    }

    #[test]
    fn spawn_failure_for_missing_program() {
        let err = SystemExecutor
            .run_streaming("this-program-does-not-exist-12345", &[])
            .unwrap_err();
        assert!(matches!(err, ExecError::Spawn { .. }));
        assert!(err.to_string().contains("this-program-does-not-exist-12345"));
    }

    #[cfg(unix)]
    #[test]
    fn which_finds_known_program() {
        assert!(SystemExecutor.which("sh"), "sh should be found on Unix");
    }

    #[test]
    fn which_missing_program() {
        assert!(
            !SystemExecutor.which("this-program-does-not-exist-12345"),
            "non-existent program should not be found"
        );
    }

    #[cfg(unix)]
    #[test]
    fn run_in_uses_directory() {
        let dir = tempfile::tempdir().unwrap();
        let result = SystemExecutor.run_in(dir.path(), "pwd", &[]).unwrap();
        let reported = std::path::PathBuf::from(result.stdout.trim());
        assert_eq!(
            reported.canonicalize().unwrap(),
            dir.path().canonicalize().unwrap()
        );
    }
}
