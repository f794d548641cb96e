//! Desired-state document: model, loading and version gate.
pub mod validation;
pub mod version;

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;

/// The parsed desired-state document.
///
/// Entry order inside every list is application order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Optional schema version marker, e.g. `v1.2.0`.
    #[serde(default)]
    pub version: Option<String>,
    /// Links to create, in order.
    #[serde(default)]
    pub symlinks: Vec<Symlink>,
    /// Submodules to register and check out, in order.
    #[serde(default)]
    pub git_submodules: Vec<Submodule>,
    /// Debian-family packages and extra sources.
    #[serde(default)]
    pub apt: AptConfig,
    /// Legacy flat package list, appended to `apt.packages` at load time.
    #[serde(default)]
    apt_packages: Vec<String>,
    /// Homebrew formulae and casks.
    #[serde(default)]
    pub homebrew: Homebrew,
    /// Mac App Store applications.
    #[serde(default)]
    pub mas: MasConfig,
}

/// A symlink to create: `destination` → absolute `source`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Symlink {
    /// Link target, resolved against the working directory at apply time.
    #[serde(rename = "src", alias = "source")]
    pub source: PathBuf,
    /// Where the link is created; `~` is expanded at load time.
    #[serde(rename = "dst", alias = "destination")]
    pub destination: PathBuf,
}

/// An external repository checked out at `path`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Submodule {
    /// Path relative to the repository root.
    pub path: String,
    /// Remote repository address.
    #[serde(default)]
    pub url: String,
}

/// Debian-family package section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AptConfig {
    /// Extra repository sources written before the index refresh.
    #[serde(default)]
    pub sources: Vec<AptSource>,
    /// Packages installed in one batch.
    #[serde(default)]
    pub packages: Vec<String>,
}

/// One extra apt repository, written to `<name>.list`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AptSource {
    /// File stem of the source list.
    pub name: String,
    /// Full `deb ...` line.
    pub uri: String,
}

/// Homebrew section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Homebrew {
    /// Formulae installed in one batch.
    #[serde(default)]
    pub formulae: Vec<String>,
    /// Casks installed in one batch.
    #[serde(default)]
    pub casks: Vec<String>,
}

/// Mac App Store section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MasConfig {
    /// App Store identifiers, installed one at a time.
    #[serde(default, deserialize_with = "app_ids")]
    pub app_ids: Vec<String>,
}

/// An App Store identifier written either as `"497799835"` or `497799835`.
#[derive(Deserialize)]
#[serde(untagged)]
enum AppId {
    Text(String),
    Number(u64),
}

fn app_ids<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let ids = Vec::<AppId>::deserialize(deserializer)?;
    Ok(ids
        .into_iter()
        .map(|id| match id {
            AppId::Text(text) => text,
            AppId::Number(number) => number.to_string(),
        })
        .collect())
}

impl Config {
    /// Load the document at `path`, validate its version against the running
    /// tool and expand `~` in every symlink destination.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::Read`] if the file cannot be read.
    /// - [`ConfigError::Parse`] if the content is not a valid document.
    /// - [`ConfigError::InvalidVersion`] / [`ConfigError::VersionMismatch`]
    ///   if the version marker is rejected.
    /// - [`ConfigError::NoHome`] if a destination uses `~` and the home
    ///   directory is unknown.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let home = crate::path::home_dir().ok();
        Self::load_with_home(path, home.as_deref())
    }

    /// Same as [`Config::load`] but with an explicit home directory.
    ///
    /// # Errors
    ///
    /// See [`Config::load`].
    pub fn load_with_home(path: &Path, home: Option<&Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::parse(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        version::validate(config.version.as_deref(), &version::Version::current())?;
        config.expand_destinations(home)?;
        Ok(config)
    }

    /// Parse YAML content without validating or expanding anything except
    /// folding the legacy `apt_packages` list into `apt.packages`.
    ///
    /// # Errors
    ///
    /// Returns the YAML error for structurally invalid content.
    pub fn parse(content: &str) -> Result<Self, serde_yaml::Error> {
        // An empty file is an empty document, not an error.
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let mut config: Self = serde_yaml::from_str(content)?;
        let legacy = std::mem::take(&mut config.apt_packages);
        config.apt.packages.extend(legacy);
        Ok(config)
    }

    fn expand_destinations(&mut self, home: Option<&Path>) -> Result<(), ConfigError> {
        for link in &mut self.symlinks {
            let Some(raw) = link.destination.to_str() else {
                continue;
            };
            if !raw.starts_with('~') {
                continue;
            }
            let home = home.ok_or(crate::path::NoWayHome)?;
            link.destination = crate::path::expand_home_with(raw, home);
        }
        Ok(())
    }
}
