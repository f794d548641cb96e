//! Top-level subcommand orchestration.
pub mod apply;
pub mod version;

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Environment variable naming the desired-state document.
pub const CONFIG_ENV: &str = "DOTKEEPER_CONFIG";

/// Document name looked up in the working directory by default.
pub const DEFAULT_CONFIG_FILE: &str = "dotkeeper.yaml";

/// Resolve the desired-state document path.
///
/// Precedence: an explicit `--config-file`, then `DOTKEEPER_CONFIG`, then
/// `dotkeeper.yaml` in `cwd`. Relative paths resolve against `cwd`.
#[must_use]
pub fn resolve_config_path(explicit: Option<&Path>, env: Option<OsString>, cwd: &Path) -> PathBuf {
    let chosen = explicit
        .map(Path::to_path_buf)
        .or_else(|| env.filter(|v| !v.is_empty()).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
    cwd.join(chosen)
}

/// Version string shown to the user; prefers the build-time git description.
#[must_use]
pub fn display_version() -> &'static str {
    option_env!("DOTKEEPER_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
}
