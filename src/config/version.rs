//! Schema version gate.
//!
//! Only the major component of the document's `version` marker is
//! significant; it must equal the running tool's major version.
use std::fmt;

use crate::error::ConfigError;

/// A tool or document version. Only `major` takes part in comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Version {
    /// Major component.
    pub major: u64,
    /// Minor component (0 when absent).
    pub minor: u64,
    /// Patch component (0 when absent).
    pub patch: u64,
}

impl Version {
    /// The running tool's version, from the crate manifest.
    #[must_use]
    pub fn current() -> Self {
        // Cargo guarantees these are plain integers.
        Self {
            major: env!("CARGO_PKG_VERSION_MAJOR").parse().unwrap_or_default(),
            minor: env!("CARGO_PKG_VERSION_MINOR").parse().unwrap_or_default(),
            patch: env!("CARGO_PKG_VERSION_PATCH").parse().unwrap_or_default(),
        }
    }

    /// Parse a `vMAJOR.MINOR.PATCH`-like marker.
    ///
    /// The leading `v` is optional, minor and patch may be missing, and any
    /// pre-release or build suffix on the last component is ignored. Returns
    /// `None` when the major component is not a number.
    #[must_use]
    pub fn parse(marker: &str) -> Option<Self> {
        let trimmed = marker.trim();
        let bare = trimmed
            .strip_prefix(['v', 'V'])
            .unwrap_or(trimmed);
        let mut parts = bare.split('.');
        let major = parts.next()?.parse().ok()?;
        let mut component = || {
            parts
                .next()
                .map(|p| {
                    p.chars()
                        .take_while(char::is_ascii_digit)
                        .collect::<String>()
                        .parse()
                        .unwrap_or_default()
                })
                .unwrap_or_default()
        };
        let minor = component();
        let patch = component();
        Some(Self {
            major,
            minor,
            patch,
        })
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Check a document's version marker against the tool version.
///
/// A missing or empty marker skips the check so documents written before
/// versioning keep working.
///
/// # Errors
///
/// - [`ConfigError::InvalidVersion`] if the marker has no numeric major part.
/// - [`ConfigError::VersionMismatch`] if the major parts differ.
pub fn validate(marker: Option<&str>, tool: &Version) -> Result<(), ConfigError> {
    let Some(marker) = marker.filter(|m| !m.trim().is_empty()) else {
        return Ok(());
    };
    let declared =
        Version::parse(marker).ok_or_else(|| ConfigError::InvalidVersion(marker.to_string()))?;
    if declared.major != tool.major {
        return Err(ConfigError::VersionMismatch {
            config: marker.to_string(),
            tool: tool.to_string(),
        });
    }
    Ok(())
}
