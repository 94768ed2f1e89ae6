//! Revenue and profit reporting per equipment item.

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::core::errors::RentalError;
use crate::core::services::ServiceResult;
use crate::domain::PaymentStatus;
use crate::registry::{revenue, MonthKey, PaidEntry, Registry};

/// Aggregated view of one equipment item's paid rentals.
///
/// `profit` always reflects the unfiltered total minus the one-time
/// purchase cost; a month filter narrows `entries`/`filtered_revenue`
/// only. The cost is sunk, not apportioned per month.
#[derive(Debug, Clone)]
pub struct EquipmentReport {
    pub equipment_id: Uuid,
    pub equipment_name: String,
    pub purchase_cost: Option<Decimal>,
    pub months: Vec<MonthKey>,
    pub entries: Vec<PaidEntry>,
    pub filtered_revenue: Decimal,
    pub total_revenue: Decimal,
    pub profit: Decimal,
}

pub struct ReportService;

impl ReportService {
    pub fn equipment_report(
        registry: &Registry,
        equipment_id: Uuid,
        month: Option<u32>,
        year: Option<i32>,
    ) -> ServiceResult<EquipmentReport> {
        let equipment = registry
            .equipment(equipment_id)
            .ok_or_else(|| RentalError::EquipmentNotFound(equipment_id.to_string()))?;

        let paid: Vec<PaidEntry> = registry
            .rentals
            .iter()
            .filter(|rental| {
                rental.payment == PaymentStatus::Paid
                    && rental.references_equipment(equipment_id)
            })
            .map(|rental| PaidEntry {
                rental_id: rental.id,
                client_name: registry
                    .client(rental.client_id)
                    .map(|client| client.name.clone())
                    .unwrap_or_else(|| "Unknown client".into()),
                amount: rental.amount,
                effective_date: revenue::effective_date(rental),
            })
            .collect();

        let months = revenue::available_months(&paid);
        let total_revenue = revenue::total_revenue(&paid);
        let entries = revenue::filter_by_month(&paid, month, year);
        let filtered_revenue = revenue::total_revenue(&entries);
        let profit = revenue::profit(total_revenue, equipment.purchase_cost);

        Ok(EquipmentReport {
            equipment_id,
            equipment_name: equipment.name.clone(),
            purchase_cost: equipment.purchase_cost,
            months,
            entries,
            filtered_revenue,
            total_revenue,
            profit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Client, Equipment, Period, Rental};
    use chrono::{NaiveDate, TimeZone, Utc};

    fn paid_rental(
        client_id: Uuid,
        equipment_id: Uuid,
        amount: i64,
        paid_year: i32,
        paid_month: u32,
    ) -> Rental {
        let mut rental = Rental::new(
            client_id,
            vec![equipment_id],
            Period::Monthly,
            Decimal::from(amount),
            NaiveDate::from_ymd_opt(paid_year, paid_month, 1).unwrap(),
            NaiveDate::from_ymd_opt(paid_year, paid_month, 28).unwrap(),
        );
        rental.payment = PaymentStatus::Paid;
        rental.payment_date = Some(
            Utc.with_ymd_and_hms(paid_year, paid_month, 15, 10, 0, 0)
                .unwrap(),
        );
        rental
    }

    fn seeded() -> (Registry, Uuid) {
        let mut registry = Registry::new("Reports");
        let client_id = registry.add_client(Client::new("Acme", "555-0100"));
        let mut equipment = Equipment::new("Mixer").with_price(Period::Monthly, Decimal::from(500));
        equipment.purchase_cost = Some(Decimal::from(300));
        let equipment_id = registry.add_equipment(equipment);
        registry.add_rental(paid_rental(client_id, equipment_id, 500, 2024, 1));
        registry.add_rental(paid_rental(client_id, equipment_id, 600, 2024, 2));
        (registry, equipment_id)
    }

    #[test]
    fn report_totals_revenue_and_profit() {
        let (registry, equipment_id) = seeded();
        let report =
            ReportService::equipment_report(&registry, equipment_id, None, None).unwrap();
        assert_eq!(report.total_revenue, Decimal::from(1100));
        assert_eq!(report.profit, Decimal::from(800));
        assert_eq!(report.entries.len(), 2);
        assert_eq!(report.months.len(), 2);
        assert_eq!(report.entries[0].client_name, "Acme");
    }

    #[test]
    fn month_filter_narrows_revenue_but_not_profit() {
        let (registry, equipment_id) = seeded();
        let report =
            ReportService::equipment_report(&registry, equipment_id, Some(2), Some(2024))
                .unwrap();
        assert_eq!(report.entries.len(), 1);
        assert_eq!(report.filtered_revenue, Decimal::from(600));
        // Profit stays anchored to the unfiltered total.
        assert_eq!(report.total_revenue, Decimal::from(1100));
        assert_eq!(report.profit, Decimal::from(800));
    }

    #[test]
    fn pending_rentals_are_excluded() {
        let (mut registry, equipment_id) = seeded();
        let client_id = registry.clients[0].id;
        let mut pending = paid_rental(client_id, equipment_id, 900, 2024, 3);
        pending.payment = PaymentStatus::Pending;
        pending.payment_date = None;
        registry.add_rental(pending);

        let report =
            ReportService::equipment_report(&registry, equipment_id, None, None).unwrap();
        assert_eq!(report.total_revenue, Decimal::from(1100));
    }
}
