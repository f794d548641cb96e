//! Operating system and distribution detection.
use std::fmt;
use std::path::Path;

/// Location of the os-release file used for distribution detection.
const OS_RELEASE: &str = "/etc/os-release";

/// Distribution IDs treated as Debian-family.
const DEBIAN_FAMILY: &[&str] = &["debian", "ubuntu"];

/// Detected operating system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Os {
    /// Any Linux distribution.
    Linux,
    /// macOS.
    MacOs,
    /// Anything else; no package reconciler applies.
    Other,
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linux => write!(f, "linux"),
            Self::MacOs => write!(f, "macos"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// Platform information for the current system.
///
/// Computed once per run and handed to every task, so reconcilers can be
/// tested against an injected platform instead of the real host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Platform {
    /// Operating system.
    pub os: Os,
    /// Whether the Linux distribution belongs to the Debian family.
    pub is_debian: bool,
}

impl Platform {
    /// Detect the current platform.
    #[must_use]
    pub fn detect() -> Self {
        let os = Self::detect_os();
        let is_debian = os == Os::Linux && Self::detect_debian(Path::new(OS_RELEASE));
        Self { os, is_debian }
    }

    /// Create a platform with explicit values.
    #[must_use]
    pub const fn new(os: Os, is_debian: bool) -> Self {
        Self { os, is_debian }
    }

    /// Whether the apt reconciler applies.
    #[must_use]
    pub fn supports_apt(&self) -> bool {
        self.os == Os::Linux && self.is_debian
    }

    /// Whether the Homebrew and App Store reconcilers apply.
    #[must_use]
    pub fn supports_homebrew(&self) -> bool {
        self.os == Os::MacOs
    }

    fn detect_os() -> Os {
        if cfg!(target_os = "linux") {
            Os::Linux
        } else if cfg!(target_os = "macos") {
            Os::MacOs
        } else {
            Os::Other
        }
    }

    fn detect_debian(path: &Path) -> bool {
        std::fs::read_to_string(path).is_ok_and(|content| is_debian_family(&content))
    }
}

/// Decide from os-release content whether the distribution is Debian-family.
///
/// Checks `ID` and the space-separated `ID_LIKE` list; values may be quoted.
#[must_use]
pub fn is_debian_family(os_release: &str) -> bool {
    os_release.lines().any(|line| {
        let Some((key, value)) = line.split_once('=') else {
            return false;
        };
        let value = value.trim().trim_matches(['"', '\'']);
        match key.trim() {
            "ID" => DEBIAN_FAMILY.contains(&value),
            "ID_LIKE" => value.split_whitespace().any(|id| DEBIAN_FAMILY.contains(&id)),
            _ => false,
        }
    })
}
