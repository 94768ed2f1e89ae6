//! Pure transition functions for the rental contract state machine.
//!
//! Every function takes the current record and returns a new one (or a
//! typed error); the caller persists the result. A contract finalizes
//! exactly when payment and collection are both complete, and only as a
//! side effect of whichever of `mark_paid`/`mark_collected` completes
//! the pair, never retroactively.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::domain::rental::{
    CollectionStatus, DeliveryStatus, LifecycleState, PaymentStatus, Rental,
};

/// A rejected lifecycle transition. Always a user-facing validation
/// outcome, never a fatal condition.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LifecycleError {
    #[error("rental is finalized and no longer accepts changes")]
    Finalized,
    #[error("payment is already settled")]
    AlreadyPaid,
    #[error("equipment was already delivered")]
    AlreadyDelivered,
    #[error("equipment was already collected")]
    AlreadyCollected,
    #[error("collection requires the equipment to be delivered first")]
    NotDelivered,
    #[error("rental does not require an invoice")]
    InvoiceNotRequired,
    #[error("invoice was already issued")]
    InvoiceAlreadyIssued,
    #[error("renewal end date {proposed} does not extend the current end date {current}")]
    EndDateNotExtended {
        proposed: NaiveDate,
        current: NaiveDate,
    },
    #[error("renewal amount must be greater than zero")]
    NonPositiveAmount,
}

fn ensure_active(rental: &Rental) -> Result<(), LifecycleError> {
    if rental.lifecycle == LifecycleState::Finalized {
        return Err(LifecycleError::Finalized);
    }
    Ok(())
}

/// Settles the current billing cycle.
///
/// Re-marking an already-paid rental is rejected (not a silent no-op) so
/// the caller can surface an honest message. Finalizes the contract when
/// collection already happened.
pub fn mark_paid(rental: &Rental, now: DateTime<Utc>) -> Result<Rental, LifecycleError> {
    ensure_active(rental)?;
    if rental.payment == PaymentStatus::Paid {
        return Err(LifecycleError::AlreadyPaid);
    }
    let mut next = rental.clone();
    next.payment = PaymentStatus::Paid;
    next.payment_date = Some(now);
    if next.collection == CollectionStatus::Collected {
        next.lifecycle = LifecycleState::Finalized;
    }
    Ok(next)
}

/// Books a delivery date without touching the delivered state.
pub fn schedule_delivery(rental: &Rental, date: NaiveDate) -> Result<Rental, LifecycleError> {
    ensure_active(rental)?;
    if rental.delivery == DeliveryStatus::Delivered {
        return Err(LifecycleError::AlreadyDelivered);
    }
    let mut next = rental.clone();
    next.delivery = DeliveryStatus::Scheduled;
    next.scheduled_delivery_date = Some(date);
    Ok(next)
}

/// Records the hand-over to the client. Never affects the lifecycle.
pub fn mark_delivered(rental: &Rental, now: DateTime<Utc>) -> Result<Rental, LifecycleError> {
    ensure_active(rental)?;
    if rental.delivery == DeliveryStatus::Delivered {
        return Err(LifecycleError::AlreadyDelivered);
    }
    let mut next = rental.clone();
    next.delivery = DeliveryStatus::Delivered;
    next.delivered_at = Some(now);
    Ok(next)
}

/// Records the equipment coming back. Requires a prior delivery; the UI
/// hides the action otherwise, but the invariant is defended here too.
/// Finalizes the contract when payment is already settled.
pub fn mark_collected(rental: &Rental, now: DateTime<Utc>) -> Result<Rental, LifecycleError> {
    ensure_active(rental)?;
    if rental.delivery != DeliveryStatus::Delivered {
        return Err(LifecycleError::NotDelivered);
    }
    if rental.collection == CollectionStatus::Collected {
        return Err(LifecycleError::AlreadyCollected);
    }
    let mut next = rental.clone();
    next.collection = CollectionStatus::Collected;
    next.collected_at = Some(now);
    if next.payment == PaymentStatus::Paid {
        next.lifecycle = LifecycleState::Finalized;
    }
    Ok(next)
}

/// Flags the required invoice as issued. No lifecycle effect.
pub fn mark_invoice_issued(rental: &Rental) -> Result<Rental, LifecycleError> {
    ensure_active(rental)?;
    if !rental.invoice_required {
        return Err(LifecycleError::InvoiceNotRequired);
    }
    if rental.invoice_issued {
        return Err(LifecycleError::InvoiceAlreadyIssued);
    }
    let mut next = rental.clone();
    next.invoice_issued = true;
    Ok(next)
}

/// Extends the contract into its next billing cycle.
///
/// The payment axis resets to `Pending` unconditionally: a renewal opens
/// a new unpaid cycle regardless of the prior cycle's state. Delivery,
/// collection, and the lifecycle are untouched. The caller is expected to
/// open the matching receivable.
pub fn renew(
    rental: &Rental,
    new_end_date: NaiveDate,
    new_amount: Option<Decimal>,
    now: DateTime<Utc>,
) -> Result<Rental, LifecycleError> {
    ensure_active(rental)?;
    if new_end_date < rental.expected_end_date {
        return Err(LifecycleError::EndDateNotExtended {
            proposed: new_end_date,
            current: rental.expected_end_date,
        });
    }
    if let Some(amount) = new_amount {
        if amount <= Decimal::ZERO {
            return Err(LifecycleError::NonPositiveAmount);
        }
    }
    let mut next = rental.clone();
    next.expected_end_date = new_end_date;
    if let Some(amount) = new_amount {
        next.amount = amount;
    }
    next.payment = PaymentStatus::Pending;
    next.payment_date = None;
    next.payment_due_date = Some(new_end_date);
    next.renewal_count += 1;
    next.last_renewed_at = Some(now);
    Ok(next)
}
