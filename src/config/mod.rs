//! Configuration for local package resolution.
//!
//! The host project declares where local checkouts live under its extra
//! settings. [`ExtraSettings`] is the raw serde shape of that section;
//! [`LocalSourceConfig`] is the validated form consumed by the resolver and
//! the link manager. Configuration is built once per run and never mutated
//! afterwards.

use log::warn;
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::package::is_valid_package;
use crate::runtime::Runtime;
use crate::runtime::path::trim_trailing_separator;

/// Fatal configuration failure. Nothing has been mutated when this is
/// raised, so the run can abort cleanly.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A declared search directory does not exist.
    #[error("Local path not found: {0}")]
    LocalDirNotFound(PathBuf),

    /// The default search directory (parent of the working directory) could
    /// not be determined.
    #[error("Failed to determine default local directory")]
    WorkingDirUnavailable(#[source] anyhow::Error),
}

/// Settings understood under the host project's extra section. Unknown keys
/// belong to other tooling and are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExtraSettings {
    /// Directories scanned for local checkouts; a single string or a list.
    #[serde(rename = "local-dirs", default, deserialize_with = "string_or_list")]
    pub local_dirs: Option<Vec<String>>,

    /// Vendor allow-list restricting local resolution; a single string or a
    /// list.
    #[serde(
        rename = "local-vendors",
        default,
        deserialize_with = "string_or_list"
    )]
    pub local_vendors: Option<Vec<String>>,

    /// Per-package path overrides, keyed by `vendor/name`.
    #[serde(rename = "local-packages", default)]
    pub local_packages: BTreeMap<String, PathBuf>,
}

/// Accept either `"path"` or `["path", ...]`.
fn string_or_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    let value = Option::<OneOrMany>::deserialize(deserializer)?;
    Ok(value.map(|v| match v {
        OneOrMany::One(s) => vec![s],
        OneOrMany::Many(list) => list,
    }))
}

/// Validated, immutable configuration for local package resolution.
#[derive(Debug, Clone)]
pub struct LocalSourceConfig {
    search_dirs: Vec<PathBuf>,
    vendor_allow_list: Vec<String>,
    package_overrides: BTreeMap<String, PathBuf>,
}

impl LocalSourceConfig {
    /// Build a validated configuration from the host's extra settings.
    ///
    /// Every declared search directory must exist; a missing one aborts
    /// construction. When no directories are declared, the parent of the
    /// current working directory is used. Package overrides failing the
    /// structural check are dropped with a warning, and resolution falls
    /// back to directory scanning for those packages.
    pub fn from_extra<R: Runtime>(runtime: &R, extra: &ExtraSettings) -> Result<Self, ConfigError> {
        let declared = match &extra.local_dirs {
            Some(dirs) => dirs.iter().map(PathBuf::from).collect(),
            None => vec![default_search_dir(runtime)?],
        };

        let mut search_dirs = Vec::with_capacity(declared.len());
        for dir in declared {
            if !runtime.exists(&dir) {
                return Err(ConfigError::LocalDirNotFound(dir));
            }
            search_dirs.push(trim_trailing_separator(&dir));
        }

        let mut package_overrides = BTreeMap::new();
        for (name, path) in &extra.local_packages {
            let resolved = runtime
                .canonicalize(path)
                .unwrap_or_else(|_| path.clone());
            if !is_valid_package(runtime, &resolved) {
                warn!(
                    "Local path {:?} defined for package \"{}\" is not valid, using fallback",
                    path, name
                );
                continue;
            }
            package_overrides.insert(name.clone(), resolved);
        }

        Ok(Self {
            search_dirs,
            vendor_allow_list: extra.local_vendors.clone().unwrap_or_default(),
            package_overrides,
        })
    }

    /// Directories scanned for local checkouts, in declaration order.
    pub fn search_dirs(&self) -> &[PathBuf] {
        &self.search_dirs
    }

    /// Whether a vendor passes the allow-list gate. An empty list allows
    /// every vendor.
    pub fn is_vendor_allowed(&self, vendor: &str) -> bool {
        self.vendor_allow_list.is_empty()
            || self.vendor_allow_list.iter().any(|v| v == vendor)
    }

    /// Explicit override path for a full package name, if declared.
    pub fn override_for(&self, pretty_name: &str) -> Option<&PathBuf> {
        self.package_overrides.get(pretty_name)
    }

    /// Whether a resolved path equals one of the declared override paths.
    pub fn is_override_target(&self, path: &Path) -> bool {
        self.package_overrides.values().any(|p| p == path)
    }
}

fn default_search_dir<R: Runtime>(runtime: &R) -> Result<PathBuf, ConfigError> {
    let cwd = runtime
        .current_dir()
        .map_err(ConfigError::WorkingDirUnavailable)?;
    // dirname of the project root; the root itself when already at "/"
    Ok(cwd.parent().map(Path::to_path_buf).unwrap_or(cwd))
}
