//! Core logging types: stage entries, status, and the [`Log`] trait.

/// Stage result for summary reporting.
#[derive(Debug, Clone)]
pub struct TaskEntry {
    /// Human-readable stage name.
    pub name: String,
    /// Final status of the stage.
    pub status: TaskStatus,
    /// Optional detail message (e.g., skip reason or error description).
    pub message: Option<String>,
}

/// Status of a completed stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    /// Stage completed successfully.
    Ok,
    /// Stage does not apply to the current platform or has nothing to do.
    NotApplicable,
    /// Stage ran in dry-run mode; no changes were applied.
    DryRun,
    /// Stage failed; the run stopped here.
    Failed,
}

/// Abstraction over logging backends.
///
/// Task code logs through this trait so tests can inject a recording
/// implementation.
pub trait Log: Send + Sync {
    /// Log a stage header (major section).
    fn stage(&self, msg: &str);
    /// Log an informational message.
    fn info(&self, msg: &str);
    /// Log a debug message (may be suppressed on console).
    fn debug(&self, msg: &str);
    /// Log a warning message.
    fn warn(&self, msg: &str);
    /// Log an error message.
    fn error(&self, msg: &str);
    /// Log a dry-run action message.
    fn dry_run(&self, msg: &str);
    /// Record a stage result for the summary.
    fn record_task(&self, name: &str, status: TaskStatus, message: Option<&str>);
}
