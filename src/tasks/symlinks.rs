//! Symlink reconciler.
use super::{Context, Task, TaskResult};
use crate::error::ReconcileError;
use crate::resources::symlink::SymlinkResource;
use crate::resources::{Applicable as _, Resource as _, ResourceChange, ResourceState};

/// Create every declared symlink, in order, stopping at the first failure.
#[derive(Debug)]
pub struct CreateSymlinks;

impl Task for CreateSymlinks {
    fn name(&self) -> &'static str {
        "Create symlinks"
    }

    fn should_run(&self, _ctx: &Context) -> bool {
        true
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult, ReconcileError> {
        let links = &ctx.config.symlinks;
        if links.is_empty() {
            return Ok(TaskResult::Skipped("no symlinks declared".to_string()));
        }

        for (i, link) in links.iter().enumerate() {
            let resource = SymlinkResource::new(
                i + 1,
                link.source.clone(),
                link.destination.clone(),
                ctx.cwd.clone(),
            );

            if ctx.dry_run {
                match resource.current_state() {
                    ResourceState::Correct => {
                        ctx.log
                            .debug(&format!("ok: {}", resource.description()));
                    }
                    ResourceState::Missing => {
                        ctx.log.dry_run(&format!("would link {}", resource.description()));
                    }
                    ResourceState::Incorrect { current } => {
                        ctx.log.dry_run(&format!(
                            "would replace {current} with link {}",
                            resource.description()
                        ));
                    }
                }
                continue;
            }

            match resource.apply()? {
                ResourceChange::Replaced { previous } if previous != "symlink" => {
                    ctx.log.warn(&format!(
                        "replaced {previous} at {}",
                        resource.destination.display()
                    ));
                }
                _ => {}
            }
            ctx.log.debug(&format!("linked {}", resource.description()));
        }

        if ctx.dry_run {
            return Ok(TaskResult::DryRun);
        }
        ctx.log.info(&format!("{} symlinks applied", links.len()));
        Ok(TaskResult::Ok)
    }
}
