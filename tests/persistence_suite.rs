//! Storage backend behavior through the `StorageBackend` trait and the
//! `RegistryManager` facade.

mod common;

use tempfile::TempDir;

use common::{create_rental, seeded_registry};
use rental_core::core::registry_manager::RegistryManager;
use rental_core::core::services::RentalService;
use rental_core::domain::PaymentStatus;
use rental_core::storage::{JsonStorage, StorageBackend};

fn storage_in(temp: &TempDir) -> JsonStorage {
    JsonStorage::new(Some(temp.path().to_path_buf()), Some(3)).expect("storage root")
}

#[test]
fn registry_roundtrips_with_rentals_and_receivables() {
    let temp = TempDir::new().unwrap();
    let storage = storage_in(&temp);

    let (mut registry, client_id, equipment_id) = seeded_registry();
    let rental_id = create_rental(&mut registry, client_id, equipment_id);
    storage.save(&registry, "depot").unwrap();

    let loaded = storage.load("depot").unwrap();
    assert_eq!(loaded.clients.len(), 1);
    assert_eq!(loaded.equipment.len(), 1);
    assert_eq!(loaded.rental_count(), 1);
    let receivables = loaded.receivables_for(rental_id);
    assert_eq!(receivables.len(), 1);
    assert_eq!(receivables[0].status, PaymentStatus::Pending);
}

#[test]
fn resaving_keeps_a_backup_of_the_previous_file() {
    let temp = TempDir::new().unwrap();
    let storage = storage_in(&temp);

    let (mut registry, client_id, equipment_id) = seeded_registry();
    storage.save(&registry, "depot").unwrap();
    create_rental(&mut registry, client_id, equipment_id);
    storage.save(&registry, "depot").unwrap();

    let backups = storage.list_backups("depot").unwrap();
    assert!(!backups.is_empty(), "overwriting must snapshot the old file");
}

#[test]
fn retention_caps_the_number_of_backups() {
    let temp = TempDir::new().unwrap();
    let storage = storage_in(&temp);

    let (registry, _, _) = seeded_registry();
    storage.save(&registry, "depot").unwrap();
    for index in 0..6 {
        storage
            .backup(&registry, "depot", Some(&format!("note{index}")))
            .unwrap();
    }

    let backups = storage.list_backups("depot").unwrap();
    assert!(
        backups.len() <= 3,
        "expected pruning to retention, got {}",
        backups.len()
    );
}

#[test]
fn manager_restores_the_backed_up_state() {
    let temp = TempDir::new().unwrap();
    let storage = storage_in(&temp);
    let mut manager = RegistryManager::new(Box::new(storage));

    let (registry, client_id, equipment_id) = seeded_registry();
    manager.set_current(registry, None, None);
    manager.save_as("depot").unwrap();
    manager.backup(Some("before changes")).unwrap();

    // Mutate and persist: one rental plus its receivable appear.
    manager
        .with_current_mut(|registry| {
            create_rental(registry, client_id, equipment_id);
        })
        .unwrap();
    manager.save().unwrap();

    let backups = manager.list_backups("depot").unwrap();
    let oldest = backups.last().unwrap().clone();
    let metadata = manager.restore_backup("depot", &oldest).unwrap();
    assert!(metadata.warnings.is_empty());
    assert_eq!(manager.with_current(|r| r.rental_count()).unwrap(), 0);
}

#[test]
fn load_surfaces_integrity_warnings() {
    let temp = TempDir::new().unwrap();
    let storage = storage_in(&temp);
    let mut manager = RegistryManager::new(Box::new(storage));

    let (mut registry, client_id, equipment_id) = seeded_registry();
    let rental_id = create_rental(&mut registry, client_id, equipment_id);
    // Hand-edit the book the way an import would: drop the client.
    registry.remove_client(client_id);
    let _ = rental_id;

    manager.set_current(registry, None, None);
    manager.save_as("depot").unwrap();

    let metadata = manager.load("depot").unwrap();
    assert!(metadata
        .warnings
        .iter()
        .any(|warning| warning.contains("unknown client")));
}

#[test]
fn rentals_saved_mid_lifecycle_resume_where_they_left_off() {
    let temp = TempDir::new().unwrap();
    let storage = storage_in(&temp);

    let (mut registry, client_id, equipment_id) = seeded_registry();
    let rental_id = create_rental(&mut registry, client_id, equipment_id);
    let now = chrono::Utc::now();
    RentalService::mark_delivered(&mut registry, rental_id, now).unwrap();
    storage.save(&registry, "depot").unwrap();

    let mut loaded = storage.load("depot").unwrap();
    RentalService::mark_paid(&mut loaded, rental_id, now).unwrap();
    let finalized = RentalService::mark_collected(&mut loaded, rental_id, now).unwrap();
    assert!(finalized.is_finalized());
}
