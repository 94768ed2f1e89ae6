//! Orchestrates rental contracts: creation, lifecycle transitions, and
//! the receivables that mirror each billing cycle.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::core::errors::RentalError;
use crate::core::services::ServiceResult;
use crate::domain::{PaymentStatus, Period, Receivable, Rental};
use crate::registry::{alerts::DueStatus, availability, lifecycle, Registry};

/// Input for a new rental contract.
#[derive(Debug, Clone)]
pub struct RentalDraft {
    pub client_id: Uuid,
    pub equipment_ids: Vec<Uuid>,
    pub period: Period,
    pub amount: Decimal,
    pub start_date: NaiveDate,
    pub expected_end_date: NaiveDate,
    /// Defaults to the client's own invoice preference when absent.
    pub invoice_required: Option<bool>,
    pub payment_due_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

pub struct RentalService;

impl RentalService {
    /// Creates a contract plus its initial receivable (cycle 0).
    pub fn create(registry: &mut Registry, draft: RentalDraft) -> ServiceResult<Uuid> {
        let client = registry
            .client(draft.client_id)
            .ok_or_else(|| RentalError::ClientNotFound(draft.client_id.to_string()))?;
        let invoice_required = draft.invoice_required.unwrap_or(client.requires_invoice);

        if draft.equipment_ids.is_empty() {
            return Err(RentalError::Validation(
                "select at least one equipment item".into(),
            ));
        }
        for equipment_id in &draft.equipment_ids {
            let item = registry
                .equipment(*equipment_id)
                .ok_or_else(|| RentalError::EquipmentNotFound(equipment_id.to_string()))?;
            if !item.is_rentable() {
                return Err(RentalError::Validation(format!(
                    "`{}` has no period price configured",
                    item.name
                )));
            }
            if availability::is_rented(*equipment_id, &registry.rentals) {
                return Err(RentalError::Conflict(format!(
                    "`{}` is already attached to an active rental",
                    item.name
                )));
            }
        }
        if draft.expected_end_date < draft.start_date {
            return Err(RentalError::Validation(
                "expected end date cannot precede the start date".into(),
            ));
        }
        if draft.amount <= Decimal::ZERO {
            return Err(RentalError::Validation(
                "rental amount must be greater than zero".into(),
            ));
        }

        let mut rental = Rental::new(
            draft.client_id,
            draft.equipment_ids,
            draft.period,
            draft.amount,
            draft.start_date,
            draft.expected_end_date,
        );
        rental.invoice_required = invoice_required;
        rental.payment_due_date =
            Some(draft.payment_due_date.unwrap_or(draft.expected_end_date));
        rental.notes = draft.notes;

        let due_date = rental.payment_due_date.unwrap_or(rental.expected_end_date);
        let receivable = Receivable::new(rental.id, 0, rental.amount, due_date);
        let rental_id = registry.add_rental(rental);
        registry.add_receivable(receivable);
        Ok(rental_id)
    }

    /// Sum of the period prices of the selected items, used as the
    /// default amount suggestion.
    pub fn suggested_amount(
        registry: &Registry,
        equipment_ids: &[Uuid],
        period: Period,
    ) -> Option<Decimal> {
        let mut total = Decimal::ZERO;
        let mut priced = false;
        for equipment_id in equipment_ids {
            if let Some(price) = registry
                .equipment(*equipment_id)
                .and_then(|item| item.price_for(period))
            {
                total += price;
                priced = true;
            }
        }
        priced.then_some(total)
    }

    /// Settles the current cycle and the matching open receivable.
    pub fn mark_paid(
        registry: &mut Registry,
        rental_id: Uuid,
        now: DateTime<Utc>,
    ) -> ServiceResult<Rental> {
        let updated = Self::apply(registry, rental_id, |rental| {
            lifecycle::mark_paid(rental, now)
        })?;
        if let Some(open) = registry.latest_open_receivable_mut(rental_id) {
            open.status = PaymentStatus::Paid;
            open.paid_at = Some(now);
        }
        Ok(updated)
    }

    pub fn schedule_delivery(
        registry: &mut Registry,
        rental_id: Uuid,
        date: NaiveDate,
    ) -> ServiceResult<Rental> {
        Self::apply(registry, rental_id, |rental| {
            lifecycle::schedule_delivery(rental, date)
        })
    }

    pub fn mark_delivered(
        registry: &mut Registry,
        rental_id: Uuid,
        now: DateTime<Utc>,
    ) -> ServiceResult<Rental> {
        Self::apply(registry, rental_id, |rental| {
            lifecycle::mark_delivered(rental, now)
        })
    }

    pub fn mark_collected(
        registry: &mut Registry,
        rental_id: Uuid,
        now: DateTime<Utc>,
    ) -> ServiceResult<Rental> {
        Self::apply(registry, rental_id, |rental| {
            lifecycle::mark_collected(rental, now)
        })
    }

    pub fn mark_invoice_issued(
        registry: &mut Registry,
        rental_id: Uuid,
    ) -> ServiceResult<Rental> {
        Self::apply(registry, rental_id, lifecycle::mark_invoice_issued)
    }

    /// Extends the contract and opens the next billing cycle's
    /// receivable.
    pub fn renew(
        registry: &mut Registry,
        rental_id: Uuid,
        new_end_date: NaiveDate,
        new_amount: Option<Decimal>,
        now: DateTime<Utc>,
    ) -> ServiceResult<Rental> {
        let updated = Self::apply(registry, rental_id, |rental| {
            lifecycle::renew(rental, new_end_date, new_amount, now)
        })?;
        let receivable = Receivable::new(
            rental_id,
            updated.renewal_count,
            updated.amount,
            new_end_date,
        );
        registry.add_receivable(receivable);
        Ok(updated)
    }

    /// Removes a contract and cascades over its receivables. Returns the
    /// removed rental and how many receivables went with it.
    pub fn remove(registry: &mut Registry, rental_id: Uuid) -> ServiceResult<(Rental, usize)> {
        let removed = registry
            .remove_rental(rental_id)
            .ok_or_else(|| RentalError::RentalNotFound(rental_id.to_string()))?;
        let dropped = registry.remove_receivables_for(rental_id);
        Ok((removed, dropped))
    }

    /// Urgency bucket of every contract as of `today`.
    pub fn classify_all(
        registry: &Registry,
        today: NaiveDate,
        window_days: i64,
    ) -> Vec<(Uuid, DueStatus)> {
        registry
            .rentals
            .iter()
            .map(|rental| {
                (
                    rental.id,
                    DueStatus::classify_with_window(rental, today, window_days),
                )
            })
            .collect()
    }

    fn apply(
        registry: &mut Registry,
        rental_id: Uuid,
        transition: impl FnOnce(&Rental) -> Result<Rental, lifecycle::LifecycleError>,
    ) -> ServiceResult<Rental> {
        let rental = registry
            .rental(rental_id)
            .ok_or_else(|| RentalError::RentalNotFound(rental_id.to_string()))?;
        let updated = transition(rental)?;
        registry.replace_rental(updated.clone());
        Ok(updated)
    }
}
