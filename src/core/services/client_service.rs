//! Business logic helpers for managing clients.

use uuid::Uuid;

use crate::core::errors::RentalError;
use crate::core::services::ServiceResult;
use crate::domain::Client;
use crate::registry::Registry;

/// Provides validated CRUD helpers for registry clients.
pub struct ClientService;

impl ClientService {
    /// Adds a new client and returns its identifier.
    pub fn add(registry: &mut Registry, client: Client) -> ServiceResult<Uuid> {
        Self::validate(&client)?;
        Ok(registry.add_client(client))
    }

    /// Replaces the stored fields of the client identified by `id`.
    pub fn edit(registry: &mut Registry, id: Uuid, mut changes: Client) -> ServiceResult<()> {
        Self::validate(&changes)?;
        changes.id = id;
        let client = registry
            .client_mut(id)
            .ok_or_else(|| RentalError::ClientNotFound(id.to_string()))?;
        changes.created_at = client.created_at;
        *client = changes;
        registry.touch();
        Ok(())
    }

    /// Removes a client, refusing while any of their rentals is active.
    pub fn remove(registry: &mut Registry, id: Uuid) -> ServiceResult<Client> {
        if registry
            .active_rentals()
            .any(|rental| rental.client_id == id)
        {
            return Err(RentalError::Conflict(
                "client still has active rentals".into(),
            ));
        }
        registry
            .remove_client(id)
            .ok_or_else(|| RentalError::ClientNotFound(id.to_string()))
    }

    /// Returns a snapshot of the registry's clients.
    pub fn list(registry: &Registry) -> Vec<&Client> {
        registry.clients.iter().collect()
    }

    fn validate(client: &Client) -> ServiceResult<()> {
        if client.name.trim().is_empty() {
            return Err(RentalError::Validation("client name cannot be empty".into()));
        }
        if client.phone.trim().is_empty() {
            return Err(RentalError::Validation(
                "client phone cannot be empty".into(),
            ));
        }
        Ok(())
    }
}
