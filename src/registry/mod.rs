pub mod alerts;
pub mod availability;
pub mod lifecycle;
pub mod registry;
pub mod revenue;

pub use alerts::{DueStatus, ALERT_WINDOW_DAYS};
pub use availability::{is_rented, rented_equipment_ids};
pub use lifecycle::LifecycleError;
pub use registry::Registry;
pub use revenue::{MonthKey, PaidEntry};
