use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::*;
use crate::domain::period::Period;

/// One rental contract linking a client and one or more equipment items
/// for a priced period.
///
/// Payment, delivery, and collection are independent status axes; the
/// overall `lifecycle` is maintained exclusively by the transition
/// functions in `registry::lifecycle` and is never set directly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Rental {
    pub id: Uuid,
    pub client_id: Uuid,
    pub equipment_ids: Vec<Uuid>,
    pub amount: Decimal,
    pub period: Period,
    pub start_date: NaiveDate,
    pub expected_end_date: NaiveDate,

    pub payment: PaymentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_due_date: Option<NaiveDate>,

    pub delivery: DeliveryStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_delivery_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivered_at: Option<DateTime<Utc>>,

    pub collection: CollectionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collected_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub invoice_required: bool,
    #[serde(default)]
    pub invoice_issued: bool,

    pub lifecycle: LifecycleState,

    #[serde(default)]
    pub renewal_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_renewed_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Rental {
    pub fn new(
        client_id: Uuid,
        equipment_ids: Vec<Uuid>,
        period: Period,
        amount: Decimal,
        start_date: NaiveDate,
        expected_end_date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            client_id,
            equipment_ids,
            amount,
            period,
            start_date,
            expected_end_date,
            payment: PaymentStatus::Pending,
            payment_date: None,
            payment_due_date: None,
            delivery: DeliveryStatus::NotScheduled,
            scheduled_delivery_date: None,
            delivered_at: None,
            collection: CollectionStatus::NotCollected,
            collected_at: None,
            invoice_required: false,
            invoice_issued: false,
            lifecycle: LifecycleState::Active,
            renewal_count: 0,
            last_renewed_at: None,
            notes: None,
            created_at: Utc::now(),
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self.lifecycle, LifecycleState::Active)
    }

    pub fn is_finalized(&self) -> bool {
        matches!(self.lifecycle, LifecycleState::Finalized)
    }

    pub fn references_equipment(&self, equipment_id: Uuid) -> bool {
        self.equipment_ids.contains(&equipment_id)
    }
}

impl Identifiable for Rental {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Displayable for Rental {
    fn display_label(&self) -> String {
        format!(
            "{} {} -> {} ({:?})",
            self.period.label(),
            self.start_date,
            self.expected_end_date,
            self.lifecycle
        )
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PaymentStatus {
    Pending,
    Paid,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DeliveryStatus {
    NotScheduled,
    Scheduled,
    Delivered,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CollectionStatus {
    NotCollected,
    Collected,
}

/// Overall contract state. `Finalized` is terminal and is only reached
/// when both payment and collection are complete.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum LifecycleState {
    Active,
    Finalized,
}
