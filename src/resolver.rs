//! Local source resolution.
//!
//! Decides whether a package can be satisfied from a local checkout and
//! where that checkout lives. `None` means the default installer owns the
//! operation.

use log::debug;
use std::path::PathBuf;

use crate::config::LocalSourceConfig;
use crate::package::{PackageId, is_valid_package};
use crate::runtime::Runtime;

pub struct PathResolver<'a, R: Runtime> {
    runtime: &'a R,
    config: &'a LocalSourceConfig,
}

impl<'a, R: Runtime> PathResolver<'a, R> {
    pub fn new(runtime: &'a R, config: &'a LocalSourceConfig) -> Self {
        Self { runtime, config }
    }

    /// Resolve the local source path for a package. First match wins: the
    /// vendor gate is checked before any path lookup, explicit overrides
    /// beat directory scanning, and search directories are scanned in
    /// declaration order.
    pub fn resolve(&self, id: &PackageId) -> Option<PathBuf> {
        if !self.config.is_vendor_allowed(&id.vendor) {
            debug!("Vendor \"{}\" not in local vendor list, skipping {}", id.vendor, id);
            return None;
        }

        // Overrides were validated when the configuration was built.
        if let Some(path) = self.config.override_for(&id.pretty_name()) {
            debug!("Using declared local path {:?} for {}", path, id);
            return Some(path.clone());
        }

        for dir in self.config.search_dirs() {
            let candidate = dir.join(id.pretty_name());
            if is_valid_package(self.runtime, &candidate) {
                debug!("Found local source for {} at {:?}", id, candidate);
                return Some(candidate);
            }
        }

        None
    }
}
