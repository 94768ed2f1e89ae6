#![doc(test(attr(deny(warnings))))]

//! Rental Core offers the contract lifecycle, pricing, and billing
//! primitives that power equipment-rental management workflows and CLIs.

pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod registry;
pub mod storage;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        crate::core::utils::init_tracing();
        tracing::info!("Rental Core tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
    }
}
