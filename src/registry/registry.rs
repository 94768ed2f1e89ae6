use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Client, Equipment, Receivable, Rental};

pub const CURRENT_SCHEMA_VERSION: u8 = 1;

/// One company's book: clients, equipment inventory, rental contracts,
/// and their receivables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registry {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub clients: Vec<Client>,
    #[serde(default)]
    pub equipment: Vec<Equipment>,
    #[serde(default)]
    pub rentals: Vec<Rental>,
    #[serde(default)]
    pub receivables: Vec<Receivable>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default = "Registry::schema_version_default")]
    pub schema_version: u8,
}

impl Registry {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            clients: Vec::new(),
            equipment: Vec::new(),
            rentals: Vec::new(),
            receivables: Vec::new(),
            created_at: now,
            updated_at: now,
            schema_version: CURRENT_SCHEMA_VERSION,
        }
    }

    pub fn add_client(&mut self, client: Client) -> Uuid {
        let id = client.id;
        self.clients.push(client);
        self.touch();
        id
    }

    pub fn add_equipment(&mut self, equipment: Equipment) -> Uuid {
        let id = equipment.id;
        self.equipment.push(equipment);
        self.touch();
        id
    }

    pub fn add_rental(&mut self, rental: Rental) -> Uuid {
        let id = rental.id;
        self.rentals.push(rental);
        self.touch();
        id
    }

    pub fn add_receivable(&mut self, receivable: Receivable) -> Uuid {
        let id = receivable.id;
        self.receivables.push(receivable);
        self.touch();
        id
    }

    pub fn client(&self, id: Uuid) -> Option<&Client> {
        self.clients.iter().find(|client| client.id == id)
    }

    pub fn client_mut(&mut self, id: Uuid) -> Option<&mut Client> {
        self.clients.iter_mut().find(|client| client.id == id)
    }

    pub fn equipment(&self, id: Uuid) -> Option<&Equipment> {
        self.equipment.iter().find(|item| item.id == id)
    }

    pub fn equipment_mut(&mut self, id: Uuid) -> Option<&mut Equipment> {
        self.equipment.iter_mut().find(|item| item.id == id)
    }

    pub fn rental(&self, id: Uuid) -> Option<&Rental> {
        self.rentals.iter().find(|rental| rental.id == id)
    }

    pub fn rental_mut(&mut self, id: Uuid) -> Option<&mut Rental> {
        self.rentals.iter_mut().find(|rental| rental.id == id)
    }

    /// Replaces the stored rental with the same id. Returns false when
    /// the rental is unknown.
    pub fn replace_rental(&mut self, updated: Rental) -> bool {
        match self.rentals.iter_mut().find(|rental| rental.id == updated.id) {
            Some(slot) => {
                *slot = updated;
                self.touch();
                true
            }
            None => false,
        }
    }

    pub fn remove_client(&mut self, id: Uuid) -> Option<Client> {
        let index = self.clients.iter().position(|client| client.id == id)?;
        let removed = self.clients.remove(index);
        self.touch();
        Some(removed)
    }

    pub fn remove_equipment(&mut self, id: Uuid) -> Option<Equipment> {
        let index = self.equipment.iter().position(|item| item.id == id)?;
        let removed = self.equipment.remove(index);
        self.touch();
        Some(removed)
    }

    pub fn remove_rental(&mut self, id: Uuid) -> Option<Rental> {
        let index = self.rentals.iter().position(|rental| rental.id == id)?;
        let removed = self.rentals.remove(index);
        self.touch();
        Some(removed)
    }

    /// Drops every receivable of `rental_id` and returns how many were
    /// removed.
    pub fn remove_receivables_for(&mut self, rental_id: Uuid) -> usize {
        let before = self.receivables.len();
        self.receivables
            .retain(|receivable| receivable.rental_id != rental_id);
        let removed = before - self.receivables.len();
        if removed > 0 {
            self.touch();
        }
        removed
    }

    pub fn receivables_for(&self, rental_id: Uuid) -> Vec<&Receivable> {
        self.receivables
            .iter()
            .filter(|receivable| receivable.rental_id == rental_id)
            .collect()
    }

    /// Newest still-open receivable of a rental (highest renewal number).
    pub fn latest_open_receivable_mut(&mut self, rental_id: Uuid) -> Option<&mut Receivable> {
        self.receivables
            .iter_mut()
            .filter(|receivable| receivable.rental_id == rental_id && receivable.is_open())
            .max_by_key(|receivable| receivable.renewal_number)
    }

    pub fn active_rentals(&self) -> impl Iterator<Item = &Rental> {
        self.rentals.iter().filter(|rental| rental.is_active())
    }

    pub fn rental_count(&self) -> usize {
        self.rentals.len()
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn schema_version_default() -> u8 {
        CURRENT_SCHEMA_VERSION
    }
}
