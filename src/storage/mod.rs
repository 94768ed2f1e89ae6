pub mod json_backend;

use std::path::{Path, PathBuf};

use crate::{core::errors::RentalError, registry::Registry};

pub type Result<T> = std::result::Result<T, RentalError>;

/// Abstraction over persistence backends capable of storing registries
/// and snapshots.
pub trait StorageBackend: Send + Sync {
    fn save(&self, registry: &Registry, name: &str) -> Result<()>;
    fn load(&self, name: &str) -> Result<Registry>;
    fn registry_path(&self, name: &str) -> PathBuf;
    fn list_registries(&self) -> Result<Vec<String>>;
    fn list_backups(&self, name: &str) -> Result<Vec<String>>;
    fn backup(&self, registry: &Registry, name: &str, note: Option<&str>) -> Result<()>;
    fn restore(&self, name: &str, backup_name: &str) -> Result<Registry>;

    /// Optional helpers for ad-hoc file operations. Default
    /// implementations forward to the managed JSON format.
    fn save_to_path(&self, registry: &Registry, path: &Path) -> Result<()> {
        json_backend::save_registry_to_path(registry, path)
    }

    fn load_from_path(&self, path: &Path) -> Result<Registry> {
        json_backend::load_registry_from_path(path)
    }
}

pub use json_backend::{registry_warnings, JsonStorage};
