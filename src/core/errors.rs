use std::result::Result as StdResult;

use thiserror::Error;

use crate::registry::lifecycle::LifecycleError;

pub type Result<T> = StdResult<T, RentalError>;

/// Unified error type for core/domain/storage layers.
#[derive(Debug, Error)]
pub enum RentalError {
    #[error("Registry not loaded")]
    RegistryNotLoaded,
    #[error("Client not found: {0}")]
    ClientNotFound(String),
    #[error("Equipment not found: {0}")]
    EquipmentNotFound(String),
    #[error("Rental not found: {0}")]
    RentalNotFound(String),
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Invalid transition: {0}")]
    Lifecycle(#[from] LifecycleError),
    #[error("Operation blocked: {0}")]
    Conflict(String),
    #[error("Persistence error: {0}")]
    Storage(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<std::io::Error> for RentalError {
    fn from(err: std::io::Error) -> Self {
        RentalError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for RentalError {
    fn from(err: serde_json::Error) -> Self {
        RentalError::Storage(err.to_string())
    }
}
