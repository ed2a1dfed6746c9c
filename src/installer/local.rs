//! Local-aware installation coordinator.
//!
//! Decides per lifecycle call whether a package is served by a local
//! checkout. If so, the install path becomes a managed symlink; otherwise
//! the operation is delegated, explicitly, to the installer registered for
//! the package's type. The decision is re-derived from the on-disk state on
//! every call; there is no cached record of which installs are links.

use anyhow::{Context, Result, anyhow};
use log::{debug, info};
use std::path::PathBuf;
use std::sync::Arc;

use super::{InstallerRegistry, PackageInstaller};
use crate::config::LocalSourceConfig;
use crate::linker::LinkManager;
use crate::package::Package;
use crate::resolver::PathResolver;
use crate::runtime::Runtime;

pub struct LocalAwareInstaller<R: Runtime> {
    runtime: Arc<R>,
    config: LocalSourceConfig,
    delegates: Arc<InstallerRegistry>,
}

impl<R: Runtime> LocalAwareInstaller<R> {
    pub fn new(
        runtime: Arc<R>,
        config: LocalSourceConfig,
        delegates: Arc<InstallerRegistry>,
    ) -> Self {
        Self {
            runtime,
            config,
            delegates,
        }
    }

    pub fn config(&self) -> &LocalSourceConfig {
        &self.config
    }

    fn delegate(&self, package: &Package) -> Result<&Arc<dyn PackageInstaller>> {
        self.delegates.get(&package.package_type).ok_or_else(|| {
            anyhow!(
                "No installer registered for package type \"{}\"",
                package.package_type
            )
        })
    }

    fn resolve_local(&self, package: &Package) -> Option<PathBuf> {
        PathResolver::new(self.runtime.as_ref(), &self.config).resolve(&package.id)
    }
}

impl<R: Runtime + 'static> PackageInstaller for LocalAwareInstaller<R> {
    fn supports(&self, package_type: &str) -> bool {
        self.delegates.supports(package_type)
    }

    /// The delegate's install path, made absolute against the working
    /// directory when the host convention reports a relative path.
    fn install_path(&self, package: &Package) -> Result<PathBuf> {
        let path = self.delegate(package)?.install_path(package)?;
        if path.is_absolute() {
            return Ok(path);
        }
        let cwd = self
            .runtime
            .current_dir()
            .with_context(|| format!("Failed to resolve install path for {}", package.id))?;
        Ok(cwd.join(path))
    }

    fn install(&self, package: &Package) -> Result<()> {
        let Some(local) = self.resolve_local(package) else {
            debug!("No local source for {}, delegating install", package.id);
            return self.delegate(package)?.install(package);
        };

        info!(
            "Installing {} (as a symbolic link of {})",
            package.id,
            local.display()
        );
        let install_path = self.install_path(package)?;
        LinkManager::new(self.runtime.as_ref())
            .link(&install_path, &local)
            .with_context(|| format!("Failed to install {} from local source", package.id))?;
        Ok(())
    }

    fn update(&self, initial: &Package, target: &Package) -> Result<()> {
        let initial_path = self.install_path(initial)?;
        let linker = LinkManager::new(self.runtime.as_ref());

        if linker.is_managed_link(&initial_path, &self.config) {
            let target_path = self.install_path(target)?;
            if initial_path != target_path {
                debug!(
                    "Moving local symlink of {} to {:?}",
                    target.id, target_path
                );
                linker
                    .relink(&initial_path, &target_path)
                    .with_context(|| format!("Failed to update {}", target.id))?;
            }
            // Identical paths need no filesystem action; the link already
            // points at the local source.
            return Ok(());
        }

        self.delegate(target)?.update(initial, target)
    }

    fn remove(&self, package: &Package) -> Result<()> {
        let install_path = self.install_path(package)?;
        let linker = LinkManager::new(self.runtime.as_ref());

        if linker.is_managed_link(&install_path, &self.config) {
            info!("Removing local symlink of {}", package.id);
            linker
                .unlink(&install_path)
                .with_context(|| format!("Failed to remove {}", package.id))?;
            return Ok(());
        }

        self.delegate(package)?.remove(package)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExtraSettings;
    use crate::installer::MockPackageInstaller;
    use crate::package::PackageId;
    use crate::runtime::MockRuntime;
    use mockall::predicate::{always, eq};

    fn package(name: &str) -> Package {
        Package::new(name.parse::<PackageId>().unwrap(), "library", "1.0.0")
    }

    // Config with one (mock-existing) search dir and an allow-list that
    // gates everything but "acme".
    fn gated_config(runtime: &mut MockRuntime) -> LocalSourceConfig {
        runtime.expect_exists().times(1).returning(|_| true);
        let extra = ExtraSettings {
            local_dirs: Some(vec!["/work".to_string()]),
            local_vendors: Some(vec!["acme".to_string()]),
            ..Default::default()
        };
        LocalSourceConfig::from_extra(runtime, &extra).unwrap()
    }

    fn registry_with(installer: MockPackageInstaller) -> Arc<InstallerRegistry> {
        let mut registry = InstallerRegistry::new();
        registry.register("library", Arc::new(installer));
        Arc::new(registry)
    }

    #[test]
    fn test_supports_mirrors_registry() {
        let mut runtime = MockRuntime::new();
        let config = gated_config(&mut runtime);

        let installer = LocalAwareInstaller::new(
            Arc::new(runtime),
            config,
            registry_with(MockPackageInstaller::new()),
        );

        assert!(installer.supports("library"));
        assert!(!installer.supports("plugin"));
    }

    #[test]
    fn test_install_delegates_when_no_local_source() {
        let mut runtime = MockRuntime::new();
        let config = gated_config(&mut runtime);

        // Vendor gate rejects "other", so no filesystem lookups happen and
        // the delegate owns the install.
        let mut delegate = MockPackageInstaller::new();
        delegate
            .expect_install()
            .with(always())
            .times(1)
            .returning(|_| Ok(()));

        let installer =
            LocalAwareInstaller::new(Arc::new(runtime), config, registry_with(delegate));

        installer.install(&package("other/widget")).unwrap();
    }

    #[test]
    fn test_install_fails_without_delegate_for_type() {
        let mut runtime = MockRuntime::new();
        let config = gated_config(&mut runtime);

        let installer = LocalAwareInstaller::new(
            Arc::new(runtime),
            config,
            Arc::new(InstallerRegistry::new()),
        );

        let err = installer.install(&package("other/widget")).unwrap_err();
        assert!(err.to_string().contains("No installer registered"));
    }

    #[test]
    fn test_install_path_absolutized_against_cwd() {
        let mut runtime = MockRuntime::new();
        let config = gated_config(&mut runtime);
        runtime
            .expect_current_dir()
            .returning(|| Ok(PathBuf::from("/home/user/project")));

        let mut delegate = MockPackageInstaller::new();
        delegate
            .expect_install_path()
            .returning(|_| Ok(PathBuf::from("vendor/acme/widget")));

        let installer =
            LocalAwareInstaller::new(Arc::new(runtime), config, registry_with(delegate));

        assert_eq!(
            installer.install_path(&package("acme/widget")).unwrap(),
            PathBuf::from("/home/user/project/vendor/acme/widget")
        );
    }

    #[test]
    fn test_update_delegates_when_not_a_managed_link() {
        let mut runtime = MockRuntime::new();
        let config = gated_config(&mut runtime);
        runtime
            .expect_is_symlink()
            .with(eq(PathBuf::from("/project/vendor/acme/widget")))
            .returning(|_| false);

        let mut delegate = MockPackageInstaller::new();
        delegate
            .expect_install_path()
            .returning(|_| Ok(PathBuf::from("/project/vendor/acme/widget")));
        delegate
            .expect_update()
            .with(always(), always())
            .times(1)
            .returning(|_, _| Ok(()));

        let installer =
            LocalAwareInstaller::new(Arc::new(runtime), config, registry_with(delegate));

        let initial = package("acme/widget");
        let target = Package::new(initial.id.clone(), "library", "2.0.0");
        installer.update(&initial, &target).unwrap();
    }

    #[test]
    fn test_remove_delegates_when_not_a_managed_link() {
        let mut runtime = MockRuntime::new();
        let config = gated_config(&mut runtime);
        runtime.expect_is_symlink().returning(|_| false);

        let mut delegate = MockPackageInstaller::new();
        delegate
            .expect_install_path()
            .returning(|_| Ok(PathBuf::from("/project/vendor/acme/widget")));
        delegate
            .expect_remove()
            .with(always())
            .times(1)
            .returning(|_| Ok(()));

        let installer =
            LocalAwareInstaller::new(Arc::new(runtime), config, registry_with(delegate));

        installer.remove(&package("acme/widget")).unwrap();
    }
}
