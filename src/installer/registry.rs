//! Delegate installer lookup table.
//!
//! Built once at startup and injected wherever delegation is needed, so no
//! component has to reach into a shared mutable installation manager.

use std::collections::HashMap;
use std::sync::Arc;

use super::PackageInstaller;

pub struct InstallerRegistry {
    installers: HashMap<String, Arc<dyn PackageInstaller>>,
}

impl InstallerRegistry {
    pub fn new() -> Self {
        Self {
            installers: HashMap::new(),
        }
    }

    /// Register `installer` for a package type, replacing any previous
    /// entry for that type.
    pub fn register(
        &mut self,
        package_type: impl Into<String>,
        installer: Arc<dyn PackageInstaller>,
    ) {
        self.installers.insert(package_type.into(), installer);
    }

    /// Get the installer registered for a package type.
    pub fn get(&self, package_type: &str) -> Option<&Arc<dyn PackageInstaller>> {
        self.installers.get(package_type)
    }

    /// Whether any installer is registered for a package type.
    pub fn supports(&self, package_type: &str) -> bool {
        self.installers.contains_key(package_type)
    }

    pub fn len(&self) -> usize {
        self.installers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.installers.is_empty()
    }
}

impl Default for InstallerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::installer::MockPackageInstaller;

    #[test]
    fn test_registry_register_and_get() {
        let mut registry = InstallerRegistry::new();
        assert!(registry.is_empty());

        registry.register("library", Arc::new(MockPackageInstaller::new()));

        assert!(registry.supports("library"));
        assert!(!registry.supports("plugin"));
        assert_eq!(registry.len(), 1);
        assert!(registry.get("library").is_some());
        assert!(registry.get("plugin").is_none());
    }

    #[test]
    fn test_registry_register_replaces() {
        let mut registry = InstallerRegistry::new();
        registry.register("library", Arc::new(MockPackageInstaller::new()));
        registry.register("library", Arc::new(MockPackageInstaller::new()));

        assert_eq!(registry.len(), 1);
    }
}
