//! Per-equipment revenue and profit aggregation over paid rentals.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::rental::Rental;

/// A paid rental flattened for reporting: the client name rides along as
/// presentation data only.
#[derive(Debug, Clone, PartialEq)]
pub struct PaidEntry {
    pub rental_id: Uuid,
    pub client_name: String,
    pub amount: Decimal,
    pub effective_date: NaiveDate,
}

/// Month/year bucket of the revenue filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthKey {
    pub month: u32,
    pub year: i32,
}

impl MonthKey {
    pub fn label(&self) -> String {
        format!("{:02}/{}", self.month, self.year)
    }
}

/// Date a payment counts towards. Records without a recorded payment
/// date fall back to the expected end date so they are not silently
/// excluded from the aggregation.
pub fn effective_date(rental: &Rental) -> NaiveDate {
    rental
        .payment_date
        .map(|stamp| stamp.date_naive())
        .unwrap_or(rental.expected_end_date)
}

pub fn total_revenue(entries: &[PaidEntry]) -> Decimal {
    entries
        .iter()
        .fold(Decimal::ZERO, |acc, entry| acc + entry.amount)
}

/// Months with at least one paid entry, newest first.
pub fn available_months(entries: &[PaidEntry]) -> Vec<MonthKey> {
    let buckets: BTreeSet<(i32, u32)> = entries
        .iter()
        .map(|entry| (entry.effective_date.year(), entry.effective_date.month()))
        .collect();
    buckets
        .into_iter()
        .rev()
        .map(|(year, month)| MonthKey { month, year })
        .collect()
}

/// Entries whose effective date matches the given month/year; `None`
/// means "all" on either component.
pub fn filter_by_month(
    entries: &[PaidEntry],
    month: Option<u32>,
    year: Option<i32>,
) -> Vec<PaidEntry> {
    entries
        .iter()
        .filter(|entry| {
            month.map_or(true, |m| entry.effective_date.month() == m)
                && year.map_or(true, |y| entry.effective_date.year() == y)
        })
        .cloned()
        .collect()
}

/// Profit is revenue minus the one-time purchase cost. The cost is a sunk
/// value and is never apportioned per month; callers pass the UNFILTERED
/// revenue here even when a month filter is active.
pub fn profit(total_revenue: Decimal, purchase_cost: Option<Decimal>) -> Decimal {
    total_revenue - purchase_cost.unwrap_or(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Period;
    use chrono::{TimeZone, Utc};

    fn entry(amount: i64, year: i32, month: u32, day: u32) -> PaidEntry {
        PaidEntry {
            rental_id: Uuid::new_v4(),
            client_name: "Acme".into(),
            amount: Decimal::from(amount),
            effective_date: NaiveDate::from_ymd_opt(year, month, day).unwrap(),
        }
    }

    #[test]
    fn total_revenue_sums_amounts_and_is_zero_when_empty() {
        let entries = vec![entry(500, 2024, 1, 10), entry(600, 2024, 2, 5)];
        assert_eq!(total_revenue(&entries), Decimal::from(1100));
        assert_eq!(total_revenue(&[]), Decimal::ZERO);
    }

    #[test]
    fn profit_subtracts_the_purchase_cost() {
        let entries = vec![entry(500, 2024, 1, 10), entry(600, 2024, 2, 5)];
        let revenue = total_revenue(&entries);
        assert_eq!(profit(revenue, Some(Decimal::from(300))), Decimal::from(800));
        assert_eq!(profit(revenue, None), Decimal::from(1100));
    }

    #[test]
    fn available_months_dedupe_and_sort_newest_first() {
        let entries = vec![
            entry(100, 2023, 12, 1),
            entry(100, 2024, 2, 10),
            entry(100, 2024, 2, 20),
            entry(100, 2024, 1, 5),
        ];
        let months = available_months(&entries);
        assert_eq!(
            months,
            vec![
                MonthKey { month: 2, year: 2024 },
                MonthKey { month: 1, year: 2024 },
                MonthKey { month: 12, year: 2023 },
            ]
        );
    }

    #[test]
    fn month_filter_matches_effective_dates() {
        let entries = vec![
            entry(500, 2024, 1, 10),
            entry(600, 2024, 2, 5),
            entry(700, 2023, 2, 5),
        ];
        let february_2024 = filter_by_month(&entries, Some(2), Some(2024));
        assert_eq!(february_2024.len(), 1);
        assert_eq!(february_2024[0].amount, Decimal::from(600));

        let any_february = filter_by_month(&entries, Some(2), None);
        assert_eq!(any_february.len(), 2);

        let everything = filter_by_month(&entries, None, None);
        assert_eq!(everything.len(), 3);
    }

    #[test]
    fn effective_date_falls_back_to_the_expected_end() {
        let mut rental = Rental::new(
            Uuid::new_v4(),
            vec![Uuid::new_v4()],
            Period::Monthly,
            Decimal::from(500),
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
        );
        assert_eq!(
            effective_date(&rental),
            NaiveDate::from_ymd_opt(2024, 3, 31).unwrap()
        );

        rental.payment_date = Some(Utc.with_ymd_and_hms(2024, 3, 20, 9, 0, 0).unwrap());
        assert_eq!(
            effective_date(&rental),
            NaiveDate::from_ymd_opt(2024, 3, 20).unwrap()
        );
    }
}
