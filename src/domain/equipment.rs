use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::*;
use crate::domain::period::Period;

/// An inventory item offered for rental.
///
/// Each item carries up to four period prices; an item is only rentable
/// once at least one of them is configured.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Equipment {
    pub id: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Serial numbers or asset tags of the physical units.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub asset_tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchase_cost: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daily_price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weekly_price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub biweekly_price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Equipment {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            category: None,
            asset_tags: Vec::new(),
            purchase_cost: None,
            daily_price: None,
            weekly_price: None,
            biweekly_price: None,
            monthly_price: None,
            notes: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_price(mut self, period: Period, price: Decimal) -> Self {
        self.set_price(period, Some(price));
        self
    }

    pub fn set_price(&mut self, period: Period, price: Option<Decimal>) {
        match period {
            Period::Daily => self.daily_price = price,
            Period::Weekly => self.weekly_price = price,
            Period::Biweekly => self.biweekly_price = price,
            Period::Monthly => self.monthly_price = price,
        }
    }

    /// Price configured for `period`, if any.
    pub fn price_for(&self, period: Period) -> Option<Decimal> {
        match period {
            Period::Daily => self.daily_price,
            Period::Weekly => self.weekly_price,
            Period::Biweekly => self.biweekly_price,
            Period::Monthly => self.monthly_price,
        }
    }

    /// Periods with a configured price, in canonical order.
    pub fn available_periods(&self) -> Vec<Period> {
        Period::CANONICAL
            .iter()
            .copied()
            .filter(|period| self.price_for(*period).is_some())
            .collect()
    }

    /// First priced period in canonical order, used as the default
    /// suggestion when the item is offered for selection.
    pub fn first_available_price(&self) -> Option<(Period, Decimal)> {
        Period::CANONICAL
            .iter()
            .copied()
            .find_map(|period| self.price_for(period).map(|price| (period, price)))
    }

    /// An item can only be attached to a new rental once it has at least
    /// one period price.
    pub fn is_rentable(&self) -> bool {
        self.first_available_price().is_some()
    }
}

impl Identifiable for Equipment {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl NamedEntity for Equipment {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Displayable for Equipment {
    fn display_label(&self) -> String {
        match &self.category {
            Some(category) => format!("{} [{}]", self.name, category),
            None => self.name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn priced(daily: Option<i64>, weekly: Option<i64>, monthly: Option<i64>) -> Equipment {
        let mut equipment = Equipment::new("Scaffolding tower");
        equipment.daily_price = daily.map(Decimal::from);
        equipment.weekly_price = weekly.map(Decimal::from);
        equipment.monthly_price = monthly.map(Decimal::from);
        equipment
    }

    #[test]
    fn available_periods_keep_canonical_order() {
        let equipment = priced(None, Some(180), Some(600));
        assert_eq!(
            equipment.available_periods(),
            vec![Period::Weekly, Period::Monthly]
        );
    }

    #[test]
    fn first_available_price_prefers_earliest_period() {
        let equipment = priced(Some(50), Some(180), Some(600));
        assert_eq!(
            equipment.first_available_price(),
            Some((Period::Daily, Decimal::from(50)))
        );
    }

    #[test]
    fn price_for_is_absent_when_not_configured() {
        let equipment = priced(Some(50), None, None);
        assert_eq!(equipment.price_for(Period::Weekly), None);
        assert_eq!(equipment.price_for(Period::Daily), Some(Decimal::from(50)));
    }

    #[test]
    fn item_without_prices_is_not_rentable() {
        let equipment = priced(None, None, None);
        assert!(!equipment.is_rentable());
        assert!(priced(None, None, Some(600)).is_rentable());
    }
}
