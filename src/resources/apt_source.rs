//! Apt repository source file resource.
use std::io;
use std::path::PathBuf;

use super::{Applicable, Resource, ResourceChange, ResourceState};
use crate::error::ReconcileError;

/// Directory apt reads extra source lists from.
pub const SOURCES_DIR: &str = "/etc/apt/sources.list.d";

/// A `<name>.list` file holding one repository line.
#[derive(Debug, Clone)]
pub struct AptSourceResource {
    /// Source name, used as the file stem.
    pub name: String,
    /// Repository line written to the file.
    pub uri: String,
    /// Directory the file is written to.
    pub dir: PathBuf,
}

impl AptSourceResource {
    /// Create a new apt source resource.
    #[must_use]
    pub const fn new(name: String, uri: String, dir: PathBuf) -> Self {
        Self { name, uri, dir }
    }

    /// Full path of the source list file.
    #[must_use]
    pub fn path(&self) -> PathBuf {
        self.dir.join(format!("{}.list", self.name))
    }

    fn content(&self) -> String {
        format!("{}\n", self.uri)
    }

    fn check_name(&self) -> io::Result<()> {
        if self.name.is_empty() || self.name.contains(['/', '\\']) || self.name == ".." {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid source name '{}'", self.name),
            ));
        }
        Ok(())
    }
}

impl Applicable for AptSourceResource {
    fn description(&self) -> String {
        format!("{} ({})", self.path().display(), self.uri)
    }

    fn apply(&self) -> Result<ResourceChange, ReconcileError> {
        let path = self.path();
        let previous = self.current_state();
        self.check_name()
            .and_then(|()| std::fs::write(&path, self.content()))
            .map_err(|source| ReconcileError::SourceWrite {
                name: self.name.clone(),
                path,
                source,
            })?;
        Ok(match previous {
            ResourceState::Missing | ResourceState::Correct => ResourceChange::Applied,
            ResourceState::Incorrect { current } => ResourceChange::Replaced { previous: current },
        })
    }
}

impl Resource for AptSourceResource {
    fn current_state(&self) -> ResourceState {
        match std::fs::read_to_string(self.path()) {
            Ok(existing) if existing == self.content() => ResourceState::Correct,
            Ok(existing) => ResourceState::Incorrect {
                current: existing.trim_end().to_string(),
            },
            Err(_) => ResourceState::Missing,
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    const DOCKER: &str = "deb [arch=amd64] https://download.docker.com/linux/ubuntu jammy stable";

    #[test]
    fn writes_uri_line_to_named_list() {
        let dir = tempfile::tempdir().unwrap();
        let r = AptSourceResource::new("docker".into(), DOCKER.into(), dir.path().to_path_buf());

        assert_eq!(r.current_state(), ResourceState::Missing);
        r.apply().unwrap();

        let written = std::fs::read_to_string(dir.path().join("docker.list")).unwrap();
        assert_eq!(written, format!("{DOCKER}\n"));
        assert_eq!(r.current_state(), ResourceState::Correct);
    }

    #[test]
    fn stale_content_is_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("docker.list"), "deb old\n").unwrap();
        let r = AptSourceResource::new("docker".into(), DOCKER.into(), dir.path().to_path_buf());

        let change = r.apply().unwrap();
        assert_eq!(
            change,
            ResourceChange::Replaced {
                previous: "deb old".to_string()
            }
        );
        assert_eq!(r.current_state(), ResourceState::Correct);
    }

    #[test]
    fn missing_directory_is_source_write_error() {
        let dir = tempfile::tempdir().unwrap();
        let r = AptSourceResource::new(
            "docker".into(),
            DOCKER.into(),
            dir.path().join("does-not-exist"),
        );
        let err = r.apply().unwrap_err();
        assert!(matches!(err, ReconcileError::SourceWrite { ref name, .. } if name == "docker"));
    }

    #[test]
    fn name_with_separator_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let r = AptSourceResource::new("../evil".into(), DOCKER.into(), dir.path().to_path_buf());
        let err = r.apply().unwrap_err();
        assert!(err.to_string().contains("invalid source name"));
    }
}
