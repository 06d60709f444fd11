//! Spendbook records personal expenses in a local JSON document and reports
//! totals, monthly spend and per-category breakdowns from a command shell.

pub mod cli;
pub mod errors;
pub mod utils;

pub use spendbook_config;
pub use spendbook_core;
pub use spendbook_domain;
pub use spendbook_storage_json;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!(version = env!("CARGO_PKG_VERSION"), "spendbook tracing initialized");
    });
}
