use std::path::{Path, PathBuf};

use crate::core::errors::{RentalError, Result};
use crate::registry::registry::CURRENT_SCHEMA_VERSION;
use crate::registry::Registry;
use crate::storage::{registry_warnings, StorageBackend};

/// Metadata describing the outcome of a load operation.
#[derive(Debug, Clone)]
pub struct LoadMetadata {
    pub warnings: Vec<String>,
    pub schema_version: u8,
}

/// Facade that coordinates registry state, persistence, and backups.
pub struct RegistryManager {
    current: Option<Registry>,
    current_name: Option<String>,
    current_path: Option<PathBuf>,
    storage: Box<dyn StorageBackend>,
}

impl RegistryManager {
    pub fn new(storage: Box<dyn StorageBackend>) -> Self {
        Self {
            current: None,
            current_name: None,
            current_path: None,
            storage,
        }
    }

    pub fn storage(&self) -> &dyn StorageBackend {
        self.storage.as_ref()
    }

    pub fn current(&self) -> Option<&Registry> {
        self.current.as_ref()
    }

    pub fn current_mut(&mut self) -> Option<&mut Registry> {
        self.current.as_mut()
    }

    pub fn current_name(&self) -> Option<&str> {
        self.current_name.as_deref()
    }

    pub fn current_path(&self) -> Option<&Path> {
        self.current_path.as_deref()
    }

    pub fn set_current(
        &mut self,
        registry: Registry,
        path: Option<PathBuf>,
        name: Option<String>,
    ) {
        self.current = Some(registry);
        self.current_path = path;
        self.current_name = name;
    }

    pub fn clear_name(&mut self) {
        self.current_name = None;
    }

    pub fn with_current<T>(&self, f: impl FnOnce(&Registry) -> T) -> Result<T> {
        self.current
            .as_ref()
            .map(f)
            .ok_or(RentalError::RegistryNotLoaded)
    }

    pub fn with_current_mut<T>(&mut self, f: impl FnOnce(&mut Registry) -> T) -> Result<T> {
        self.current
            .as_mut()
            .map(f)
            .ok_or(RentalError::RegistryNotLoaded)
    }

    pub fn load(&mut self, name: &str) -> Result<LoadMetadata> {
        let registry = self.storage.load(name)?;
        self.ensure_schema_support(registry.schema_version)?;
        let path = self.storage.registry_path(name);
        tracing::debug!(registry = name, path = %path.display(), "registry loaded");
        let metadata = LoadMetadata {
            warnings: registry_warnings(&registry),
            schema_version: registry.schema_version,
        };
        self.set_current(registry, Some(path), Some(name.to_string()));
        Ok(metadata)
    }

    pub fn load_from_path(&mut self, path: &Path) -> Result<LoadMetadata> {
        let registry = self.storage.load_from_path(path)?;
        self.ensure_schema_support(registry.schema_version)?;
        let metadata = LoadMetadata {
            warnings: registry_warnings(&registry),
            schema_version: registry.schema_version,
        };
        self.set_current(registry, Some(path.to_path_buf()), None);
        Ok(metadata)
    }

    pub fn save(&mut self) -> Result<PathBuf> {
        let snapshot = self
            .current
            .clone()
            .ok_or(RentalError::RegistryNotLoaded)?;
        if let Some(name) = self.current_name.clone() {
            self.storage.save(&snapshot, &name)?;
            let path = self.storage.registry_path(&name);
            self.current_path = Some(path.clone());
            Ok(path)
        } else if let Some(path) = self.current_path.clone() {
            self.storage.save_to_path(&snapshot, &path)?;
            Ok(path)
        } else {
            Err(RentalError::Storage(
                "unable to determine save target for current registry".into(),
            ))
        }
    }

    pub fn save_as(&mut self, name: &str) -> Result<PathBuf> {
        let snapshot = self
            .current
            .clone()
            .ok_or(RentalError::RegistryNotLoaded)?;
        self.storage.save(&snapshot, name)?;
        let path = self.storage.registry_path(name);
        tracing::debug!(registry = name, path = %path.display(), "registry saved");
        self.current_name = Some(name.to_string());
        self.current_path = Some(path.clone());
        Ok(path)
    }

    pub fn backup(&self, note: Option<&str>) -> Result<()> {
        let name = self
            .current_name
            .as_deref()
            .ok_or_else(|| RentalError::Storage("current registry has no name to back up".into()))?;
        let registry = self
            .current
            .as_ref()
            .ok_or(RentalError::RegistryNotLoaded)?;
        self.storage.backup(registry, name, note)
    }

    pub fn list_backups(&self, name: &str) -> Result<Vec<String>> {
        self.storage.list_backups(name)
    }

    pub fn restore_backup(&mut self, name: &str, backup_name: &str) -> Result<LoadMetadata> {
        let registry = self.storage.restore(name, backup_name)?;
        self.ensure_schema_support(registry.schema_version)?;
        let path = self.storage.registry_path(name);
        let metadata = LoadMetadata {
            warnings: registry_warnings(&registry),
            schema_version: registry.schema_version,
        };
        self.set_current(registry, Some(path), Some(name.to_string()));
        Ok(metadata)
    }

    fn ensure_schema_support(&self, version: u8) -> Result<()> {
        if version > CURRENT_SCHEMA_VERSION {
            return Err(RentalError::Storage(format!(
                "registry schema version {} is newer than this build supports ({})",
                version, CURRENT_SCHEMA_VERSION
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::JsonStorage;
    use tempfile::TempDir;

    fn manager_with_temp_dir() -> (RegistryManager, TempDir) {
        let temp = TempDir::new().expect("temp dir");
        let storage =
            JsonStorage::new(Some(temp.path().to_path_buf()), None).expect("json storage");
        (RegistryManager::new(Box::new(storage)), temp)
    }

    #[test]
    fn save_requires_a_loaded_registry() {
        let (mut manager, _guard) = manager_with_temp_dir();
        let err = manager.save().expect_err("save must fail with no registry");
        assert!(matches!(err, RentalError::RegistryNotLoaded));
    }

    #[test]
    fn save_as_then_load_roundtrips() {
        let temp = TempDir::new().expect("temp dir");
        let storage =
            JsonStorage::new(Some(temp.path().to_path_buf()), None).expect("json storage");
        let mut manager = RegistryManager::new(Box::new(storage.clone()));
        manager.set_current(Registry::new("Depot"), None, None);
        manager.save_as("depot").expect("save registry");

        let mut fresh = RegistryManager::new(Box::new(storage));
        let metadata = fresh.load("depot").expect("load registry");
        assert!(metadata.warnings.is_empty());
        assert_eq!(fresh.with_current(|r| r.name.clone()).unwrap(), "Depot");
    }

    #[test]
    fn newer_schema_versions_are_rejected() {
        let (mut manager, _guard) = manager_with_temp_dir();
        let mut registry = Registry::new("Depot");
        registry.schema_version = CURRENT_SCHEMA_VERSION + 1;
        manager.set_current(registry, None, None);
        manager.save_as("depot").expect("save");

        let err = manager.load("depot").expect_err("load must fail");
        assert!(matches!(err, RentalError::Storage(_)));
    }
}
