//! Plugin activation.
//!
//! The host calls [`activate`] once at startup with the project's extra
//! settings (as a JSON value) and the delegate installer registry it built.
//! The returned coordinator is what the host registers as an installer; a
//! `None` means local resolution is switched off for the whole run and
//! every package goes through the default machinery.

use anyhow::{Context, Result};
use log::debug;
use std::sync::Arc;

use crate::config::{ExtraSettings, LocalSourceConfig};
use crate::installer::{InstallerRegistry, LocalAwareInstaller};
use crate::runtime::Runtime;

/// Environment variable disabling local package resolution for the run when
/// set to a non-empty value. Read once during activation.
pub const DISABLE_ENV: &str = "DEPLINK_DISABLE";

pub fn is_disabled<R: Runtime>(runtime: &R) -> bool {
    matches!(runtime.env_var(DISABLE_ENV), Ok(value) if !value.is_empty())
}

/// Build the local-aware installer from the host project's extra settings.
///
/// Fails fast on invalid configuration (a declared local directory that
/// does not exist) before anything has been mutated. Invalid per-package
/// overrides are dropped with a warning instead.
pub fn activate<R: Runtime + 'static>(
    runtime: Arc<R>,
    extra: &serde_json::Value,
    delegates: Arc<InstallerRegistry>,
) -> Result<Option<LocalAwareInstaller<R>>> {
    if is_disabled(runtime.as_ref()) {
        debug!("Local package resolution disabled via {}", DISABLE_ENV);
        return Ok(None);
    }

    let settings: ExtraSettings =
        serde_json::from_value(extra.clone()).context("Failed to parse extra settings")?;
    let config = LocalSourceConfig::from_extra(runtime.as_ref(), &settings)?;

    Ok(Some(LocalAwareInstaller::new(runtime, config, delegates)))
}
