//! End-to-end flows through the service layer over one registry.

mod common;

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;

use common::{create_rental, monthly_draft, seeded_registry};
use rental_core::core::errors::RentalError;
use rental_core::core::services::{EquipmentService, RentalService, ReportService};
use rental_core::domain::{LifecycleState, PaymentStatus};
use rental_core::registry::{is_rented, DueStatus};

fn fixed_now() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 15, 10, 0, 0).unwrap()
}

#[test]
fn contract_walks_from_creation_to_finalization() {
    let (mut registry, client_id, equipment_id) = seeded_registry();
    let rental_id = create_rental(&mut registry, client_id, equipment_id);

    assert!(is_rented(equipment_id, &registry.rentals));
    assert!(matches!(
        EquipmentService::remove(&mut registry, equipment_id),
        Err(RentalError::Conflict(_))
    ));

    RentalService::mark_delivered(&mut registry, rental_id, fixed_now()).unwrap();
    RentalService::mark_paid(&mut registry, rental_id, fixed_now()).unwrap();
    let finalized =
        RentalService::mark_collected(&mut registry, rental_id, fixed_now()).unwrap();

    assert_eq!(finalized.lifecycle, LifecycleState::Finalized);
    assert!(!is_rented(equipment_id, &registry.rentals));
    EquipmentService::remove(&mut registry, equipment_id)
        .expect("equipment is free after finalization");
}

#[test]
fn renewal_cycles_keep_receivables_in_step() {
    let (mut registry, client_id, equipment_id) = seeded_registry();
    let rental_id = create_rental(&mut registry, client_id, equipment_id);

    RentalService::mark_paid(&mut registry, rental_id, fixed_now()).unwrap();
    let first_end = registry.rental(rental_id).unwrap().expected_end_date;

    let second_end = first_end + Duration::days(30);
    RentalService::renew(
        &mut registry,
        rental_id,
        second_end,
        Some(Decimal::from(600)),
        fixed_now(),
    )
    .unwrap();
    let third_end = second_end + Duration::days(30);
    RentalService::renew(&mut registry, rental_id, third_end, None, fixed_now()).unwrap();

    let rental = registry.rental(rental_id).unwrap();
    assert_eq!(rental.renewal_count, 2);
    assert_eq!(rental.amount, Decimal::from(600));
    assert_eq!(rental.payment, PaymentStatus::Pending);

    let mut receivables = registry.receivables_for(rental_id);
    receivables.sort_by_key(|receivable| receivable.renewal_number);
    assert_eq!(receivables.len(), 3);
    assert_eq!(receivables[0].status, PaymentStatus::Paid);
    assert_eq!(receivables[1].amount, Decimal::from(600));
    assert!(receivables[2].is_open());
    assert_eq!(receivables[2].due_date, third_end);
}

#[test]
fn removing_a_rental_cascades_and_frees_equipment() {
    let (mut registry, client_id, equipment_id) = seeded_registry();
    let rental_id = create_rental(&mut registry, client_id, equipment_id);
    let next_end = registry.rental(rental_id).unwrap().expected_end_date + Duration::days(30);
    RentalService::renew(&mut registry, rental_id, next_end, None, fixed_now()).unwrap();

    let (_, dropped) = RentalService::remove(&mut registry, rental_id).unwrap();
    assert_eq!(dropped, 2);
    assert!(registry.receivables.is_empty());
    assert!(!is_rented(equipment_id, &registry.rentals));
}

#[test]
fn revenue_report_accumulates_over_paid_cycles() {
    let (mut registry, client_id, equipment_id) = seeded_registry();

    // First contract: paid and closed out.
    let first = create_rental(&mut registry, client_id, equipment_id);
    RentalService::mark_delivered(&mut registry, first, fixed_now()).unwrap();
    RentalService::mark_paid(&mut registry, first, fixed_now()).unwrap();
    RentalService::mark_collected(&mut registry, first, fixed_now()).unwrap();

    // Second contract on the same item, paid in a later month.
    let mut draft = monthly_draft(client_id, vec![equipment_id]);
    draft.amount = Decimal::from(600);
    draft.start_date = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
    draft.expected_end_date = NaiveDate::from_ymd_opt(2024, 4, 30).unwrap();
    let second = RentalService::create(&mut registry, draft).unwrap();
    let april = Utc.with_ymd_and_hms(2024, 4, 20, 10, 0, 0).unwrap();
    RentalService::mark_paid(&mut registry, second, april).unwrap();

    let report = ReportService::equipment_report(&registry, equipment_id, None, None).unwrap();
    assert_eq!(report.total_revenue, Decimal::from(1100));
    assert_eq!(report.profit, Decimal::from(800));
    assert_eq!(report.months.len(), 2);

    let march_only =
        ReportService::equipment_report(&registry, equipment_id, Some(3), Some(2024)).unwrap();
    assert_eq!(march_only.filtered_revenue, Decimal::from(500));
    assert_eq!(march_only.profit, Decimal::from(800));
}

#[test]
fn due_classification_tracks_the_calendar() {
    let (mut registry, client_id, equipment_id) = seeded_registry();
    let rental_id = create_rental(&mut registry, client_id, equipment_id);
    let end = registry.rental(rental_id).unwrap().expected_end_date;

    let far_before = end - Duration::days(10);
    let close_before = end - Duration::days(2);
    let after = end + Duration::days(1);

    let status_of = |registry: &rental_core::registry::Registry, day| {
        RentalService::classify_all(registry, day, 3)
            .into_iter()
            .find(|(id, _)| *id == rental_id)
            .map(|(_, status)| status)
            .unwrap()
    };

    assert_eq!(status_of(&registry, far_before), DueStatus::Normal);
    assert_eq!(status_of(&registry, close_before), DueStatus::NearDue);
    assert_eq!(status_of(&registry, after), DueStatus::Overdue);

    // Once finalized the contract leaves the urgency report entirely.
    RentalService::mark_delivered(&mut registry, rental_id, fixed_now()).unwrap();
    RentalService::mark_paid(&mut registry, rental_id, fixed_now()).unwrap();
    RentalService::mark_collected(&mut registry, rental_id, fixed_now()).unwrap();
    assert_eq!(status_of(&registry, after), DueStatus::Normal);
}
