pub mod client_service;
pub mod equipment_service;
pub mod rental_service;
pub mod report_service;

pub use client_service::ClientService;
pub use equipment_service::EquipmentService;
pub use rental_service::{RentalDraft, RentalService};
pub use report_service::{EquipmentReport, ReportService};

use crate::core::errors::RentalError;

pub type ServiceResult<T> = Result<T, RentalError>;
