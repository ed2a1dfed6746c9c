//! Symlink lifecycle for locally sourced packages.
//!
//! The link at a package's install path is the only record that the package
//! is locally sourced; there is no separate metadata store. Creation stores
//! a relative target, recognition re-derives ownership from where the link
//! resolves, and removal touches the link entry only.

use log::debug;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::LocalSourceConfig;
use crate::package::is_valid_package;
use crate::runtime::{Runtime, has_literal_prefix, relative_link_target};

/// Filesystem-level symlink failure. Fatal for the affected package's
/// operation, isolated from the rest of the run, and never retried.
#[derive(Debug, Error)]
pub enum SymlinkError {
    #[error("Symlinking failed: {target:?} -> {link:?}")]
    Create {
        link: PathBuf,
        target: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("Failed to create parent directory {path:?}")]
    ParentDir {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("Failed to move symlink {from:?} -> {to:?}")]
    Relink {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("Failed to remove symlink {link:?}")]
    Unlink {
        link: PathBuf,
        #[source]
        source: anyhow::Error,
    },
}

pub struct LinkManager<'a, R: Runtime> {
    runtime: &'a R,
}

impl<'a, R: Runtime> LinkManager<'a, R> {
    pub fn new(runtime: &'a R) -> Self {
        Self { runtime }
    }

    /// Create the managed symlink at `install_path` pointing to `target`.
    ///
    /// The parent (vendor) directory is created first, recursively, so the
    /// very first package of a vendor can be linked into a tree that does
    /// not have the vendor subdirectory yet. The stored target is the
    /// shortest relative path from the install location, keeping the tree
    /// portable across clones with a different absolute root; when no
    /// relative path exists the absolute target is stored instead.
    pub fn link(&self, install_path: &Path, target: &Path) -> Result<(), SymlinkError> {
        self.ensure_parent_dir(install_path)?;

        let stored = relative_link_target(install_path, target)
            .unwrap_or_else(|| target.to_path_buf());
        debug!("Linking {:?} -> {:?}", install_path, stored);

        self.runtime
            .symlink(&stored, install_path)
            .map_err(|source| SymlinkError::Create {
                link: install_path.to_path_buf(),
                target: target.to_path_buf(),
                source,
            })
    }

    /// Move the link entry itself from `from` to `to`. The stored target is
    /// carried along unchanged; equal paths are a no-op.
    pub fn relink(&self, from: &Path, to: &Path) -> Result<(), SymlinkError> {
        if from == to {
            return Ok(());
        }

        self.ensure_parent_dir(to)?;
        debug!("Moving symlink {:?} -> {:?}", from, to);

        self.runtime
            .rename(from, to)
            .map_err(|source| SymlinkError::Relink {
                from: from.to_path_buf(),
                to: to.to_path_buf(),
                source,
            })
    }

    /// Remove the link entry only; the directory it points to is never
    /// touched.
    pub fn unlink(&self, install_path: &Path) -> Result<(), SymlinkError> {
        debug!("Unlinking {:?}", install_path);
        self.runtime
            .remove_symlink(install_path)
            .map_err(|source| SymlinkError::Unlink {
                link: install_path.to_path_buf(),
                source,
            })
    }

    /// Whether `install_path` is a symlink created by this system (or seems
    /// to be).
    ///
    /// Ownership is re-derived from the filesystem alone: the resolved
    /// target must equal a declared override path, or sit underneath one of
    /// the search directories by literal prefix — the same construction the
    /// resolver uses for candidates — and must still validate structurally.
    /// A foreign link that happens to resolve inside a configured source is
    /// indistinguishable from a managed one.
    pub fn is_managed_link(&self, install_path: &Path, config: &LocalSourceConfig) -> bool {
        if !self.runtime.is_symlink(install_path) {
            return false;
        }
        let Ok(resolved) = self.runtime.resolve_link(install_path) else {
            return false;
        };
        // Self-pointing entries are not links to a source
        if resolved == install_path {
            return false;
        }

        if config.is_override_target(&resolved) {
            return is_valid_package(self.runtime, &resolved);
        }

        for dir in config.search_dirs() {
            if has_literal_prefix(&resolved, dir) {
                return is_valid_package(self.runtime, &resolved);
            }
        }

        false
    }

    fn ensure_parent_dir(&self, path: &Path) -> Result<(), SymlinkError> {
        if let Some(parent) = path.parent() {
            if !self.runtime.exists(parent) {
                self.runtime
                    .create_dir_all(parent)
                    .map_err(|source| SymlinkError::ParentDir {
                        path: parent.to_path_buf(),
                        source,
                    })?;
            }
        }
        Ok(())
    }
}
