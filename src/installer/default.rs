//! Materialized-copy installer.
//!
//! Owns the `<vendor_dir>/<vendor>/<name>` convention and the real
//! directory trees under it. The actual code transfer (download, extract)
//! stays with the host behind [`PackageFetcher`]; this type only drives it.

use anyhow::{Context, Result};
use log::debug;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::PackageInstaller;
use crate::package::Package;
use crate::runtime::Runtime;

/// Code-transfer primitive behind the default installer. The host wires its
/// download/extract machinery in here.
#[cfg_attr(test, mockall::automock)]
pub trait PackageFetcher: Send + Sync {
    /// Place the package's code at `dest`.
    fn fetch(&self, package: &Package, dest: &Path) -> Result<()>;
}

pub struct DefaultInstaller<R: Runtime> {
    runtime: Arc<R>,
    vendor_dir: PathBuf,
    package_type: String,
    fetcher: Arc<dyn PackageFetcher>,
}

impl<R: Runtime> DefaultInstaller<R> {
    pub fn new(
        runtime: Arc<R>,
        vendor_dir: impl Into<PathBuf>,
        package_type: impl Into<String>,
        fetcher: Arc<dyn PackageFetcher>,
    ) -> Self {
        Self {
            runtime,
            vendor_dir: vendor_dir.into(),
            package_type: package_type.into(),
            fetcher,
        }
    }
}

impl<R: Runtime + 'static> PackageInstaller for DefaultInstaller<R> {
    fn supports(&self, package_type: &str) -> bool {
        package_type == self.package_type
    }

    fn install_path(&self, package: &Package) -> Result<PathBuf> {
        Ok(self.vendor_dir.join(package.id.pretty_name()))
    }

    fn install(&self, package: &Package) -> Result<()> {
        let dest = self.install_path(package)?;
        if let Some(parent) = dest.parent() {
            self.runtime.create_dir_all(parent).with_context(|| {
                format!("Failed to create vendor directory for {}", package.id)
            })?;
        }

        debug!("Materializing {} {} at {:?}", package.id, package.version, dest);
        self.fetcher
            .fetch(package, &dest)
            .with_context(|| format!("Failed to fetch {}", package.id))
    }

    fn update(&self, initial: &Package, target: &Package) -> Result<()> {
        self.remove(initial)?;
        self.install(target)
    }

    fn remove(&self, package: &Package) -> Result<()> {
        let dest = self.install_path(package)?;
        debug!("Removing materialized copy of {} at {:?}", package.id, dest);
        self.runtime
            .remove_dir_all(&dest)
            .with_context(|| format!("Failed to remove {}", package.id))
    }
}
