use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use rental_core::core::services::{ClientService, EquipmentService, RentalDraft, RentalService};
use rental_core::domain::{Client, Equipment, Period};
use rental_core::registry::Registry;

pub fn seeded_registry() -> (Registry, Uuid, Uuid) {
    let mut registry = Registry::new("Depot");
    let client_id = ClientService::add(&mut registry, Client::new("Acme", "555-0100"))
        .expect("client is valid");
    let mut equipment = Equipment::new("Concrete mixer")
        .with_price(Period::Monthly, Decimal::from(500));
    equipment.purchase_cost = Some(Decimal::from(300));
    let equipment_id =
        EquipmentService::add(&mut registry, equipment).expect("equipment is valid");
    (registry, client_id, equipment_id)
}

pub fn monthly_draft(client_id: Uuid, equipment_ids: Vec<Uuid>) -> RentalDraft {
    RentalDraft {
        client_id,
        equipment_ids,
        period: Period::Monthly,
        amount: Decimal::from(500),
        start_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        expected_end_date: NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
        invoice_required: None,
        payment_due_date: None,
        notes: None,
    }
}

pub fn create_rental(registry: &mut Registry, client_id: Uuid, equipment_id: Uuid) -> Uuid {
    RentalService::create(registry, monthly_draft(client_id, vec![equipment_id]))
        .expect("draft is valid")
}
