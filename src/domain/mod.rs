pub mod client;
pub mod common;
pub mod equipment;
pub mod period;
pub mod receivable;
pub mod rental;

pub use client::Client;
pub use equipment::Equipment;
pub use period::Period;
pub use receivable::Receivable;
pub use rental::{
    CollectionStatus, DeliveryStatus, LifecycleState, PaymentStatus, Rental,
};
