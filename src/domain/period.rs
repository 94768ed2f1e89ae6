use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Billing cadence of a rental contract.
///
/// The variant order here is the canonical presentation order; pricing
/// lookups and pickers must preserve it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Period {
    Daily,
    Weekly,
    Biweekly,
    Monthly,
}

impl Period {
    /// All periods in canonical order.
    pub const CANONICAL: [Period; 4] = [
        Period::Daily,
        Period::Weekly,
        Period::Biweekly,
        Period::Monthly,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Period::Daily => "Daily",
            Period::Weekly => "Weekly",
            Period::Biweekly => "Biweekly",
            Period::Monthly => "Monthly",
        }
    }

    /// Nominal cycle length in days, used to suggest renewal end dates.
    pub fn approx_days(&self) -> i64 {
        match self {
            Period::Daily => 1,
            Period::Weekly => 7,
            Period::Biweekly => 15,
            Period::Monthly => 30,
        }
    }

    /// Suggested end of the next cycle starting at `from`.
    pub fn next_cycle_end(&self, from: NaiveDate) -> NaiveDate {
        from + Duration::days(self.approx_days())
    }

    pub fn parse(token: &str) -> Option<Period> {
        match token.trim().to_ascii_lowercase().as_str() {
            "daily" | "day" => Some(Period::Daily),
            "weekly" | "week" => Some(Period::Weekly),
            "biweekly" | "fortnight" => Some(Period::Biweekly),
            "monthly" | "month" => Some(Period::Monthly),
            _ => None,
        }
    }
}
