//! Installer variants and the delegate registry.
//!
//! The host's installer contract is the [`PackageInstaller`] trait.
//! [`DefaultInstaller`] owns materialized copies; [`LocalAwareInstaller`]
//! substitutes a symlink whenever a local source resolves and explicitly
//! delegates everything else.

mod default;
mod local;
mod registry;

pub use default::{DefaultInstaller, PackageFetcher};
pub use local::LocalAwareInstaller;
pub use registry::InstallerRegistry;

#[cfg(test)]
pub use default::MockPackageFetcher;

use anyhow::Result;
use std::path::PathBuf;

use crate::package::Package;

/// Host installer contract.
///
/// One implementation serves a family of package types; the host asks
/// `supports` before routing a lifecycle operation here.
#[cfg_attr(test, mockall::automock)]
pub trait PackageInstaller: Send + Sync {
    /// Whether this installer handles the given package type.
    fn supports(&self, package_type: &str) -> bool;

    /// Install path for a package under this installer's convention.
    fn install_path(&self, package: &Package) -> Result<PathBuf>;

    /// Materialize (or link) the package at its install path.
    fn install(&self, package: &Package) -> Result<()>;

    /// Transition an installed package from `initial` to `target`.
    fn update(&self, initial: &Package, target: &Package) -> Result<()>;

    /// Remove the installed artifact at the package's install path.
    fn remove(&self, package: &Package) -> Result<()>;
}
