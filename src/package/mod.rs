//! Package identity and structural validation.
//!
//! The host registry hands lifecycle operations a [`Package`] descriptor;
//! this module owns the `vendor/name` identity type and the structural
//! check deciding whether a directory on disk counts as a package.

use anyhow::bail;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::runtime::Runtime;

/// Manifest marker file a directory must carry to count as a package.
pub const MANIFEST_FILE: &str = "composer.json";

/// Package identity: the `vendor/name` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageId {
    pub vendor: String,
    pub name: String,
}

impl PackageId {
    pub fn new(vendor: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            vendor: vendor.into(),
            name: name.into(),
        }
    }

    /// The full `vendor/name` form used in manifests and install layouts.
    pub fn pretty_name(&self) -> String {
        format!("{}/{}", self.vendor, self.name)
    }
}

impl FromStr for PackageId {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((vendor, name)) = s.split_once('/') else {
            bail!("Invalid package name '{}': expected 'vendor/name'", s);
        };
        if vendor.is_empty() || name.is_empty() || name.contains('/') {
            bail!("Invalid package name '{}': expected 'vendor/name'", s);
        }
        Ok(Self::new(vendor, name))
    }
}

impl fmt::Display for PackageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.vendor, self.name)
    }
}

/// A package descriptor as supplied by the host registry.
#[derive(Debug, Clone)]
pub struct Package {
    pub id: PackageId,
    /// Package type, used to look up the delegate installer.
    pub package_type: String,
    pub version: String,
}

impl Package {
    pub fn new(id: PackageId, package_type: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            id,
            package_type: package_type.into(),
            version: version.into(),
        }
    }
}

/// Structural package check: the path exists, is a directory, and carries the
/// manifest marker file. The manifest content is never parsed, so a directory
/// whose manifest declares a different name than the requested package still
/// passes.
pub fn is_valid_package<R: Runtime>(runtime: &R, path: &Path) -> bool {
    runtime.exists(path) && runtime.is_dir(path) && runtime.exists(&path.join(MANIFEST_FILE))
}
