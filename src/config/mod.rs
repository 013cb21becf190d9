//! Configuration for harvest runs
//!
//! Split into the core types, the typestate builder, and default-resolving
//! getters.

pub mod builder;
pub mod getters;
pub mod types;

pub use builder::{DEFAULT_OVERLAY_PATH, HarvestConfigBuilder};
pub use types::{HarvestConfig, SelectorSet};
