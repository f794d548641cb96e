//! Named reconcilers, one per resource kind, run in a fixed order.
mod context;
pub mod packages;
pub mod submodules;
pub mod symlinks;

pub use context::Context;

use crate::error::{DotkeeperError, ReconcileError};
use crate::logging::TaskStatus;

/// Outcome of a task that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskResult {
    /// Task completed successfully.
    Ok,
    /// Task had nothing to do.
    Skipped(String),
    /// Task ran in dry-run mode.
    DryRun,
}

/// A named, executable task.
pub trait Task: Send + Sync {
    /// Human-readable task name, also used as the stage name in errors.
    fn name(&self) -> &'static str;

    /// Whether this task applies to the current platform.
    fn should_run(&self, ctx: &Context) -> bool;

    /// Execute the task.
    ///
    /// # Errors
    ///
    /// Returns the first [`ReconcileError`] hit; nothing after it is attempted.
    fn run(&self, ctx: &Context) -> Result<TaskResult, ReconcileError>;
}

/// The complete set of tasks run by the apply command, in execution order.
#[must_use]
pub fn all_apply_tasks() -> Vec<Box<dyn Task>> {
    vec![
        Box::new(symlinks::CreateSymlinks),
        Box::new(submodules::UpdateSubmodules),
        Box::new(packages::InstallAptPackages),
        Box::new(packages::InstallFormulae),
        Box::new(packages::InstallCasks),
        Box::new(packages::InstallAppStoreApps),
    ]
}

/// Execute a task, recording the result in the logger.
///
/// # Errors
///
/// Returns [`DotkeeperError::Stage`] naming the task if it failed.
pub fn execute(task: &dyn Task, ctx: &Context) -> Result<(), DotkeeperError> {
    if !task.should_run(ctx) {
        ctx.log
            .debug(&format!("skipping task: {} (not applicable)", task.name()));
        ctx.log
            .record_task(task.name(), TaskStatus::NotApplicable, None);
        return Ok(());
    }

    ctx.log.stage(task.name());

    match task.run(ctx) {
        Ok(TaskResult::Ok) => {
            ctx.log.record_task(task.name(), TaskStatus::Ok, None);
            Ok(())
        }
        Ok(TaskResult::Skipped(reason)) => {
            ctx.log.info(&format!("skipped: {reason}"));
            ctx.log
                .record_task(task.name(), TaskStatus::NotApplicable, Some(&reason));
            Ok(())
        }
        Ok(TaskResult::DryRun) => {
            ctx.log.record_task(task.name(), TaskStatus::DryRun, None);
            Ok(())
        }
        Err(source) => {
            // The error itself is reported once by the caller.
            ctx.log.debug(&format!("{} failed: {source}", task.name()));
            ctx.log
                .record_task(task.name(), TaskStatus::Failed, Some(&source.to_string()));
            Err(DotkeeperError::Stage {
                stage: task.name().to_string(),
                source,
            })
        }
    }
}
