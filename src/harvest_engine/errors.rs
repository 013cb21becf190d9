//! Error taxonomy for the harvest engine
//!
//! `FetchFailure` covers the per-entry contact fetch; every variant is
//! recovered locally into the record's `error_reason` and never aborts the
//! run. `HarvestError` is the top-level error for run setup and fatal loop
//! faults.

use thiserror::Error;

/// Terminal failure of one contact-info fetch.
///
/// Display strings double as the record's `error_reason` and are kept
/// stable; downstream consumers match on them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchFailure {
    /// The secondary view could not be opened.
    #[error("Failed to open new tab. Ensure pop-ups are allowed.")]
    PopupBlocked,

    /// The secondary view disappeared between polls.
    #[error("Tab closed prematurely")]
    ViewClosedPrematurely,

    /// An anti-automation challenge or login interstitial was detected.
    #[error("CAPTCHA or login required")]
    ChallengeDetected,

    /// The polling budget ran out before the panel rendered.
    #[error("Contact section not found after click")]
    SectionNotFound,

    /// Unexpected fault while evaluating the overlay.
    #[error("{0}")]
    ExtractionException(String),
}

/// Top-level error for harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Browser error
    #[error("Browser error: {0}")]
    Browser(String),

    /// A run is already in flight; exactly one run may be active at a time
    #[error("A harvest run is already active")]
    RunActive,
}
