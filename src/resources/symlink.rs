//! Symlink resource.
//!
//! Whatever sits at the destination is removed before the link is created,
//! including regular files and whole directories: the declared link always
//! wins.
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::{Applicable, Resource, ResourceChange, ResourceState};
use crate::error::ReconcileError;
use crate::path::absolutize;

/// A declared link at `destination` pointing to `source`.
#[derive(Debug, Clone)]
pub struct SymlinkResource {
    /// 1-based position in the declared sequence, used in errors.
    pub index: usize,
    /// Declared link target; relative paths resolve against `base`.
    pub source: PathBuf,
    /// Where the link is created.
    pub destination: PathBuf,
    /// Directory relative sources are resolved against.
    pub base: PathBuf,
}

impl SymlinkResource {
    /// Create a new symlink resource.
    #[must_use]
    pub const fn new(index: usize, source: PathBuf, destination: PathBuf, base: PathBuf) -> Self {
        Self {
            index,
            source,
            destination,
            base,
        }
    }

    fn resolved_source(&self) -> io::Result<PathBuf> {
        absolutize(&self.source, &self.base)
    }
}

impl Applicable for SymlinkResource {
    fn description(&self) -> String {
        format!("{} -> {}", self.destination.display(), self.source.display())
    }

    fn apply(&self) -> Result<ResourceChange, ReconcileError> {
        let index = self.index;

        if let Some(parent) = self.destination.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .map_err(|source| ReconcileError::DirectoryCreate { index, source })?;
        }

        // Resolved before anything at the destination is removed.
        let source = self
            .resolved_source()
            .map_err(|source| ReconcileError::PathResolve {
                index,
                path: self.source.clone(),
                source,
            })?;

        let previous = match fs::symlink_metadata(&self.destination) {
            Ok(meta) => {
                remove_existing(&self.destination, &meta).map_err(|source| {
                    ReconcileError::SymlinkRemove {
                        index,
                        path: self.destination.clone(),
                        source,
                    }
                })?;
                Some(describe(&meta))
            }
            Err(_) => None,
        };

        create_symlink(&source, &self.destination)
            .map_err(|source| ReconcileError::SymlinkCreate { index, source })?;

        Ok(previous.map_or(ResourceChange::Applied, |previous| {
            ResourceChange::Replaced { previous }
        }))
    }
}

impl Resource for SymlinkResource {
    fn current_state(&self) -> ResourceState {
        let Ok(meta) = fs::symlink_metadata(&self.destination) else {
            return ResourceState::Missing;
        };
        if !meta.file_type().is_symlink() {
            return ResourceState::Incorrect {
                current: describe(&meta),
            };
        }
        match (fs::read_link(&self.destination), self.resolved_source()) {
            (Ok(existing), Ok(source)) if existing == source => ResourceState::Correct,
            (Ok(existing), _) => ResourceState::Incorrect {
                current: format!("symlink to {}", existing.display()),
            },
            (Err(_), _) => ResourceState::Incorrect {
                current: "unreadable symlink".to_string(),
            },
        }
    }
}

fn describe(meta: &fs::Metadata) -> String {
    let kind = meta.file_type();
    if kind.is_symlink() {
        "symlink".to_string()
    } else if kind.is_dir() {
        "directory".to_string()
    } else {
        "regular file".to_string()
    }
}

/// Remove whatever is at `path` without following symlinks.
fn remove_existing(path: &Path, meta: &fs::Metadata) -> io::Result<()> {
    if meta.file_type().is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    }
}

/// Create a symlink at `link` pointing to `target`.
fn create_symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(all(test, unix))]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn resource(dir: &Path, source: &str, destination: &str) -> SymlinkResource {
        SymlinkResource::new(
            1,
            PathBuf::from(source),
            dir.join(destination),
            dir.join("repo"),
        )
    }

    #[test]
    fn description_shows_both_ends() {
        let r = SymlinkResource::new(
            1,
            PathBuf::from("bash/bashrc"),
            PathBuf::from("/home/u/.bashrc"),
            PathBuf::from("/repo"),
        );
        assert_eq!(r.description(), "/home/u/.bashrc -> bash/bashrc");
    }

    #[test]
    fn creates_link_to_absolute_source() {
        let dir = tempfile::tempdir().unwrap();
        let r = resource(dir.path(), "bash/bashrc", "home/.bashrc");

        assert_eq!(r.current_state(), ResourceState::Missing);
        assert_eq!(r.apply().unwrap(), ResourceChange::Applied);

        let target = fs::read_link(dir.path().join("home/.bashrc")).unwrap();
        assert_eq!(target, dir.path().join("repo/bash/bashrc"));
        assert!(target.is_absolute());
    }

    #[test]
    fn creates_missing_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let r = resource(dir.path(), "nvim", "home/.config/deep/nvim");
        r.apply().unwrap();
        assert!(dir.path().join("home/.config/deep").is_dir());
    }

    #[test]
    fn applying_twice_yields_same_link() {
        let dir = tempfile::tempdir().unwrap();
        let r = resource(dir.path(), "vimrc", ".vimrc");

        r.apply().unwrap();
        let first = fs::read_link(dir.path().join(".vimrc")).unwrap();
        assert_eq!(r.current_state(), ResourceState::Correct);

        let second_change = r.apply().unwrap();
        let second = fs::read_link(dir.path().join(".vimrc")).unwrap();
        assert_eq!(first, second);
        assert!(matches!(second_change, ResourceChange::Replaced { .. }));
    }

    #[test]
    fn regular_file_is_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let dst = dir.path().join(".gitconfig");
        fs::write(&dst, "user data").unwrap();
        let r = resource(dir.path(), "gitconfig", ".gitconfig");

        assert!(matches!(r.current_state(), ResourceState::Incorrect { .. }));
        let change = r.apply().unwrap();

        assert_eq!(
            change,
            ResourceChange::Replaced {
                previous: "regular file".to_string()
            }
        );
        assert!(fs::symlink_metadata(&dst).unwrap().file_type().is_symlink());
    }

    #[test]
    fn directory_is_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let dst = dir.path().join(".vim");
        fs::create_dir_all(dst.join("autoload")).unwrap();
        fs::write(dst.join("autoload/plug.vim"), "x").unwrap();
        let r = resource(dir.path(), "vim", ".vim");

        r.apply().unwrap();
        assert!(fs::symlink_metadata(&dst).unwrap().file_type().is_symlink());
    }

    #[test]
    fn dangling_link_is_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let dst = dir.path().join(".zshrc");
        std::os::unix::fs::symlink(dir.path().join("gone"), &dst).unwrap();
        let r = resource(dir.path(), "zshrc", ".zshrc");

        r.apply().unwrap();
        assert_eq!(fs::read_link(&dst).unwrap(), dir.path().join("repo/zshrc"));
    }

    #[test]
    fn link_to_other_source_is_incorrect() {
        let dir = tempfile::tempdir().unwrap();
        let dst = dir.path().join(".tmux.conf");
        std::os::unix::fs::symlink("/elsewhere", &dst).unwrap();
        let r = resource(dir.path(), "tmux.conf", ".tmux.conf");
        assert_eq!(
            r.current_state(),
            ResourceState::Incorrect {
                current: "symlink to /elsewhere".to_string()
            }
        );
    }

    #[test]
    fn absolute_source_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let r = resource(dir.path(), "/opt/shared/profile", ".profile");
        r.apply().unwrap();
        assert_eq!(
            fs::read_link(dir.path().join(".profile")).unwrap(),
            PathBuf::from("/opt/shared/profile")
        );
    }

    #[test]
    fn empty_source_is_path_resolve_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut r = resource(dir.path(), "", ".empty");
        r.index = 4;
        let err = r.apply().unwrap_err();
        assert!(matches!(err, ReconcileError::PathResolve { index: 4, .. }));
    }

    #[test]
    fn empty_source_keeps_existing_destination() {
        let dir = tempfile::tempdir().unwrap();
        let dst = dir.path().join(".bashrc");
        fs::write(&dst, "local edits").unwrap();
        let r = resource(dir.path(), "", ".bashrc");

        let err = r.apply().unwrap_err();

        assert!(matches!(err, ReconcileError::PathResolve { .. }));
        assert_eq!(fs::read_to_string(&dst).unwrap(), "local edits");
    }

    #[test]
    fn parent_blocked_by_file_is_directory_create_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("blocker"), "").unwrap();
        let mut r = resource(dir.path(), "x", "blocker/child/link");
        r.index = 2;
        let err = r.apply().unwrap_err();
        assert!(matches!(err, ReconcileError::DirectoryCreate { index: 2, .. }));
        assert!(err.to_string().contains("symlink 2"));
    }
}
