//! Business logic helpers for the equipment inventory.

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::core::errors::RentalError;
use crate::core::services::ServiceResult;
use crate::domain::Equipment;
use crate::registry::{availability, Registry};

/// Provides validated CRUD helpers for equipment items.
pub struct EquipmentService;

impl EquipmentService {
    /// Adds an inventory item and returns its identifier.
    pub fn add(registry: &mut Registry, equipment: Equipment) -> ServiceResult<Uuid> {
        Self::validate(&equipment)?;
        Ok(registry.add_equipment(equipment))
    }

    /// Replaces the stored fields of the item identified by `id`.
    pub fn edit(registry: &mut Registry, id: Uuid, mut changes: Equipment) -> ServiceResult<()> {
        Self::validate(&changes)?;
        changes.id = id;
        let item = registry
            .equipment_mut(id)
            .ok_or_else(|| RentalError::EquipmentNotFound(id.to_string()))?;
        changes.created_at = item.created_at;
        *item = changes;
        registry.touch();
        Ok(())
    }

    /// Removes an item, refusing while it is attached to an active rental.
    pub fn remove(registry: &mut Registry, id: Uuid) -> ServiceResult<Equipment> {
        if availability::is_rented(id, &registry.rentals) {
            return Err(RentalError::Conflict(
                "equipment is attached to an active rental".into(),
            ));
        }
        registry
            .remove_equipment(id)
            .ok_or_else(|| RentalError::EquipmentNotFound(id.to_string()))
    }

    /// Returns a snapshot of the inventory.
    pub fn list(registry: &Registry) -> Vec<&Equipment> {
        registry.equipment.iter().collect()
    }

    /// Items currently free to attach to a new rental: not referenced by
    /// any active contract and carrying at least one period price.
    pub fn available_for_rental(registry: &Registry) -> Vec<&Equipment> {
        let rented = availability::rented_equipment_ids(&registry.rentals);
        registry
            .equipment
            .iter()
            .filter(|item| item.is_rentable() && !rented.contains(&item.id))
            .collect()
    }

    fn validate(equipment: &Equipment) -> ServiceResult<()> {
        if equipment.name.trim().is_empty() {
            return Err(RentalError::Validation(
                "equipment name cannot be empty".into(),
            ));
        }
        let prices = [
            equipment.daily_price,
            equipment.weekly_price,
            equipment.biweekly_price,
            equipment.monthly_price,
        ];
        if prices.iter().flatten().any(|price| *price <= Decimal::ZERO) {
            return Err(RentalError::Validation(
                "period prices must be greater than zero".into(),
            ));
        }
        if let Some(cost) = equipment.purchase_cost {
            if cost < Decimal::ZERO {
                return Err(RentalError::Validation(
                    "purchase cost cannot be negative".into(),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Client, LifecycleState, Period, Rental};
    use chrono::NaiveDate;

    fn registry_with_rented_item() -> (Registry, Uuid) {
        let mut registry = Registry::new("Inventory");
        let client_id = registry.add_client(Client::new("Acme", "555-0100"));
        let equipment_id = registry.add_equipment(
            Equipment::new("Scissor lift").with_price(Period::Weekly, Decimal::from(400)),
        );
        registry.add_rental(Rental::new(
            client_id,
            vec![equipment_id],
            Period::Weekly,
            Decimal::from(400),
            NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 4, 8).unwrap(),
        ));
        (registry, equipment_id)
    }

    #[test]
    fn add_rejects_non_positive_prices() {
        let mut registry = Registry::new("Inventory");
        let equipment = Equipment::new("Mixer").with_price(Period::Daily, Decimal::ZERO);
        let err = EquipmentService::add(&mut registry, equipment)
            .expect_err("zero price must fail");
        assert!(matches!(err, RentalError::Validation(_)));
    }

    #[test]
    fn removal_is_blocked_while_rented() {
        let (mut registry, equipment_id) = registry_with_rented_item();
        let err = EquipmentService::remove(&mut registry, equipment_id)
            .expect_err("removal must be blocked");
        assert!(matches!(err, RentalError::Conflict(_)));
    }

    #[test]
    fn removal_succeeds_after_the_rental_finalizes() {
        let (mut registry, equipment_id) = registry_with_rented_item();
        registry.rentals[0].lifecycle = LifecycleState::Finalized;
        let removed = EquipmentService::remove(&mut registry, equipment_id)
            .expect("removal must succeed");
        assert_eq!(removed.id, equipment_id);
    }

    #[test]
    fn available_for_rental_excludes_rented_and_unpriced_items() {
        let (mut registry, rented_id) = registry_with_rented_item();
        let unpriced_id = registry.add_equipment(Equipment::new("Bare frame"));
        let free_id = registry.add_equipment(
            Equipment::new("Generator").with_price(Period::Daily, Decimal::from(80)),
        );

        let available: Vec<Uuid> = EquipmentService::available_for_rental(&registry)
            .iter()
            .map(|item| item.id)
            .collect();
        assert!(available.contains(&free_id));
        assert!(!available.contains(&rented_id));
        assert!(!available.contains(&unpriced_id));
    }
}
