use chrono::NaiveDate;

use crate::domain::rental::Rental;

/// Days before the expected end date at which a contract starts counting
/// as near-due.
pub const ALERT_WINDOW_DAYS: i64 = 3;

/// Urgency bucket of a rental relative to a reference date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueStatus {
    Normal,
    NearDue,
    Overdue,
}

impl DueStatus {
    /// Classifies against the default alert window.
    pub fn classify(rental: &Rental, reference: NaiveDate) -> DueStatus {
        Self::classify_with_window(rental, reference, ALERT_WINDOW_DAYS)
    }

    /// Finalized contracts carry no urgency; otherwise the bucket follows
    /// the whole-day distance to the expected end date.
    pub fn classify_with_window(
        rental: &Rental,
        reference: NaiveDate,
        window_days: i64,
    ) -> DueStatus {
        if rental.is_finalized() {
            return DueStatus::Normal;
        }
        let diff_days = rental
            .expected_end_date
            .signed_duration_since(reference)
            .num_days();
        if diff_days < 0 {
            DueStatus::Overdue
        } else if diff_days <= window_days {
            DueStatus::NearDue
        } else {
            DueStatus::Normal
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DueStatus::Normal => "on schedule",
            DueStatus::NearDue => "near due",
            DueStatus::Overdue => "overdue",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LifecycleState, Period, Rental};
    use chrono::Duration;
    use rust_decimal::Decimal;
    use uuid::Uuid;

    fn rental_ending(end: NaiveDate) -> Rental {
        Rental::new(
            Uuid::new_v4(),
            vec![Uuid::new_v4()],
            Period::Weekly,
            Decimal::from(100),
            end - Duration::days(7),
            end,
        )
    }

    #[test]
    fn past_due_date_is_overdue() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        let rental = rental_ending(today - Duration::days(1));
        assert_eq!(DueStatus::classify(&rental, today), DueStatus::Overdue);
    }

    #[test]
    fn due_today_counts_as_near_due() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        let rental = rental_ending(today);
        assert_eq!(DueStatus::classify(&rental, today), DueStatus::NearDue);
    }

    #[test]
    fn window_boundary_is_inclusive() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        let at_window = rental_ending(today + Duration::days(ALERT_WINDOW_DAYS));
        assert_eq!(DueStatus::classify(&at_window, today), DueStatus::NearDue);

        let past_window = rental_ending(today + Duration::days(ALERT_WINDOW_DAYS + 1));
        assert_eq!(DueStatus::classify(&past_window, today), DueStatus::Normal);
    }

    #[test]
    fn finalized_rentals_are_always_normal() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        let mut rental = rental_ending(today - Duration::days(10));
        rental.lifecycle = LifecycleState::Finalized;
        assert_eq!(DueStatus::classify(&rental, today), DueStatus::Normal);
    }

    #[test]
    fn custom_window_widens_the_near_due_band() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        let rental = rental_ending(today + Duration::days(6));
        assert_eq!(DueStatus::classify(&rental, today), DueStatus::Normal);
        assert_eq!(
            DueStatus::classify_with_window(&rental, today, 7),
            DueStatus::NearDue
        );
    }
}
