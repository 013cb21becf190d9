//! Event system for the harvest engine's outbound notifications
//!
//! Publishes per-field, per-record and end-of-run events to whatever relay
//! subscribes, with lock-free metrics on delivery.

// Sub-modules
pub mod bus;
pub mod errors;
pub mod metrics;
pub mod types;

// Re-exports for public API
pub use bus::HarvestEventBus;
pub use errors::EventBusError;
pub use metrics::EventBusMetrics;
pub use types::{HarvestEvent, ShutdownReason};
