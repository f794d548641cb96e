//! Package reconcilers for apt, Homebrew and the Mac App Store.
use super::{Context, Task, TaskResult};
use crate::error::ReconcileError;
use crate::resources::apt_source::AptSourceResource;
use crate::resources::package::{PackageManager, install_packages, refresh_index};
use crate::resources::{Applicable as _, Resource as _};

/// Refresh the index and install `names` with `manager`.
///
/// An empty list does nothing; in particular the tool is not looked up.
fn install_with(
    ctx: &Context,
    manager: PackageManager,
    names: &[String],
) -> Result<TaskResult, ReconcileError> {
    if names.is_empty() {
        return Ok(TaskResult::Skipped(format!("no {manager} packages declared")));
    }
    manager.ensure_available(ctx.executor.as_ref())?;
    ctx.log
        .debug(&format!("{} {manager} packages to install", names.len()));

    if ctx.dry_run {
        for command in manager.refresh_command().into_iter().chain(manager.install_commands(names)) {
            ctx.log.dry_run(&format!("would run: {command}"));
        }
        return Ok(TaskResult::DryRun);
    }

    refresh_index(manager, ctx.executor.as_ref())?;
    install_packages(manager, names, ctx.executor.as_ref())?;
    ctx.log
        .info(&format!("{} {manager} packages installed", names.len()));
    Ok(TaskResult::Ok)
}

/// Write apt sources, refresh the index and install apt packages.
#[derive(Debug)]
pub struct InstallAptPackages;

impl Task for InstallAptPackages {
    fn name(&self) -> &'static str {
        "Install apt packages"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        ctx.platform.supports_apt()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult, ReconcileError> {
        let apt = &ctx.config.apt;
        if apt.sources.is_empty() {
            return install_with(ctx, PackageManager::Apt, &apt.packages);
        }

        let manager = PackageManager::Apt;
        manager.ensure_available(ctx.executor.as_ref())?;

        let sources: Vec<_> = apt
            .sources
            .iter()
            .map(|s| {
                AptSourceResource::new(s.name.clone(), s.uri.clone(), ctx.apt_sources_dir.clone())
            })
            .collect();

        if ctx.dry_run {
            for source in sources.iter().filter(|s| s.needs_change()) {
                ctx.log
                    .dry_run(&format!("would write {}", source.description()));
            }
            for command in manager
                .refresh_command()
                .into_iter()
                .chain(manager.install_commands(&apt.packages))
            {
                ctx.log.dry_run(&format!("would run: {command}"));
            }
            return Ok(TaskResult::DryRun);
        }

        for source in &sources {
            source.apply()?;
            ctx.log.debug(&format!("wrote {}", source.description()));
        }
        refresh_index(manager, ctx.executor.as_ref())?;
        install_packages(manager, &apt.packages, ctx.executor.as_ref())?;
        ctx.log.info(&format!(
            "{} sources written, {} packages installed",
            sources.len(),
            apt.packages.len()
        ));
        Ok(TaskResult::Ok)
    }
}

/// Install Homebrew formulae.
#[derive(Debug)]
pub struct InstallFormulae;

impl Task for InstallFormulae {
    fn name(&self) -> &'static str {
        "Install Homebrew formulae"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        ctx.platform.supports_homebrew()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult, ReconcileError> {
        install_with(ctx, PackageManager::Brew, &ctx.config.homebrew.formulae)
    }
}

/// Install Homebrew casks.
#[derive(Debug)]
pub struct InstallCasks;

impl Task for InstallCasks {
    fn name(&self) -> &'static str {
        "Install Homebrew casks"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        ctx.platform.supports_homebrew()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult, ReconcileError> {
        install_with(ctx, PackageManager::BrewCask, &ctx.config.homebrew.casks)
    }
}

/// Install Mac App Store apps one at a time.
#[derive(Debug)]
pub struct InstallAppStoreApps;

impl Task for InstallAppStoreApps {
    fn name(&self) -> &'static str {
        "Install App Store apps"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        ctx.platform.supports_homebrew()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult, ReconcileError> {
        install_with(ctx, PackageManager::Mas, &ctx.config.mas.app_ids)
    }
}
