use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::Identifiable;
use crate::domain::rental::PaymentStatus;

/// One billing cycle of a rental: the initial term is cycle 0, each
/// renewal appends the next one. Removing a rental removes all of its
/// receivables.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Receivable {
    pub id: Uuid,
    pub rental_id: Uuid,
    /// 0 for the initial term, then the renewal count that opened it.
    pub renewal_number: u32,
    pub amount: Decimal,
    pub due_date: NaiveDate,
    pub status: PaymentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Receivable {
    pub fn new(rental_id: Uuid, renewal_number: u32, amount: Decimal, due_date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            rental_id,
            renewal_number,
            amount,
            due_date,
            status: PaymentStatus::Pending,
            paid_at: None,
            created_at: Utc::now(),
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self.status, PaymentStatus::Pending)
    }
}

impl Identifiable for Receivable {
    fn id(&self) -> Uuid {
        self.id
    }
}
