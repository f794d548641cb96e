//! Git submodule reconciler.
use super::{Context, Task, TaskResult};
use crate::error::ReconcileError;
use crate::resources::submodule::{SubmoduleResource, ensure_repository};

/// Register, initialise and update every declared git submodule.
#[derive(Debug)]
pub struct UpdateSubmodules;

impl Task for UpdateSubmodules {
    fn name(&self) -> &'static str {
        "Initialize git submodules"
    }

    fn should_run(&self, _ctx: &Context) -> bool {
        true
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult, ReconcileError> {
        let submodules = &ctx.config.git_submodules;
        if submodules.is_empty() {
            return Ok(TaskResult::Skipped("no submodules declared".to_string()));
        }

        if !ctx.executor.which("git") {
            return Err(ReconcileError::ToolUnavailable {
                tool: "git",
                hint: "install git first",
            });
        }
        ensure_repository(ctx.executor.as_ref(), &ctx.cwd)?;
        ctx.log
            .debug(&format!("git repository found at {}", ctx.cwd.display()));

        for submodule in submodules {
            let resource = SubmoduleResource::new(
                submodule.path.clone(),
                submodule.url.clone(),
                &ctx.cwd,
                ctx.executor.as_ref(),
            );

            if ctx.dry_run {
                ctx.log
                    .dry_run(&format!("would add, init and update {}", resource.description()));
                continue;
            }

            match resource.register() {
                Ok(()) => ctx.log.info(&format!("added {}", resource.description())),
                Err(e) if e.stderr().contains("already exists") => {
                    ctx.log
                        .info(&format!("{} already registered", submodule.path));
                }
                Err(e) => ctx.log.warn(&format!(
                    "submodule add failed for {}, continuing: {}",
                    submodule.path,
                    e.stderr().trim()
                )),
            }
            resource.sync()?;
            ctx.log.debug(&format!("updated {}", submodule.path));
        }

        if ctx.dry_run {
            return Ok(TaskResult::DryRun);
        }
        Ok(TaskResult::Ok)
    }
}
