//! Command: converge the machine to the desired-state document.
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context as _, Result};

use crate::cli::{ApplyOpts, GlobalOpts};
use crate::config::Config;
use crate::error::DotkeeperError;
use crate::exec::{Executor, SystemExecutor};
use crate::logging::{Log, Logger};
use crate::platform::Platform;
use crate::tasks::{self, Context};

/// Everything one orchestrated run depends on besides the logger and executor.
#[derive(Debug, Clone)]
pub struct ApplyRequest {
    /// Desired-state document to load.
    pub config_path: PathBuf,
    /// Working directory for source resolution and git.
    pub cwd: PathBuf,
    /// Home directory used to expand `~` in destinations.
    pub home: Option<PathBuf>,
    /// Platform deciding which package reconcilers run.
    pub platform: Platform,
    /// Preview changes without applying them.
    pub dry_run: bool,
    /// Override for the apt source list directory.
    pub apt_sources_dir: Option<PathBuf>,
}

/// Run the apply command.
///
/// # Errors
///
/// Returns an error if the document cannot be loaded or any stage fails.
pub fn run(global: &GlobalOpts, opts: &ApplyOpts, log: &Arc<Logger>) -> Result<()> {
    let cwd = std::env::current_dir().context("cannot determine working directory")?;
    let config_path = super::resolve_config_path(
        opts.config_file.as_deref(),
        std::env::var_os(super::CONFIG_ENV),
        &cwd,
    );
    let request = ApplyRequest {
        config_path,
        cwd,
        home: crate::path::home_dir().ok(),
        platform: Platform::detect(),
        dry_run: global.dry_run,
        apt_sources_dir: None,
    };

    log.info(&format!("dotkeeper {}", super::display_version()));
    let result = apply(
        &request,
        &(Arc::clone(log) as Arc<dyn Log>),
        Arc::new(SystemExecutor),
    );
    log.print_summary();
    Ok(result?)
}

/// Load the document, then run every stage in order, stopping at the first
/// failure. Stages already completed stay applied.
///
/// # Errors
///
/// - [`DotkeeperError::Config`] if the document is rejected; nothing is mutated.
/// - [`DotkeeperError::Stage`] naming the first stage that failed.
pub fn apply(
    request: &ApplyRequest,
    log: &Arc<dyn Log>,
    executor: Arc<dyn Executor>,
) -> Result<(), DotkeeperError> {
    log.stage("Loading configuration");
    log.debug(&format!("config file: {}", request.config_path.display()));
    let config = Config::load_with_home(&request.config_path, request.home.as_deref())?;
    log.info(&format!(
        "loaded {} symlinks, {} submodules",
        config.symlinks.len(),
        config.git_submodules.len()
    ));
    log.debug(&format!(
        "platform: {} (debian family: {})",
        request.platform.os, request.platform.is_debian
    ));

    let warnings = config.validate();
    if !warnings.is_empty() {
        log.warn(&format!(
            "found {} configuration warning(s):",
            warnings.len()
        ));
        for warning in &warnings {
            log.warn(&format!(
                "  {} [{}]: {}",
                warning.section, warning.item, warning.message
            ));
        }
    }

    let mut ctx = Context::new(
        Arc::new(config),
        request.platform,
        Arc::clone(log),
        executor,
        request.cwd.clone(),
        request.dry_run,
    );
    if let Some(dir) = &request.apt_sources_dir {
        ctx = ctx.with_apt_sources_dir(dir.clone());
    }

    for task in tasks::all_apply_tasks() {
        tasks::execute(task.as_ref(), &ctx)?;
    }
    Ok(())
}
