//! Event type definitions for the harvest notification system
//!
//! These are the fire-and-forget outbound messages the engine publishes
//! while a run is in flight. Subscribers (notification relays, UIs) are
//! external; no response is ever expected.

use serde::{Deserialize, Serialize};

use crate::records::ProfileSummary;

/// Reason for event bus shutdown
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ShutdownReason {
    /// Run finished normally
    RunCompleted,
    /// Run stopped on a fatal error (partial results were still published)
    Error(String),
    /// Close command from the control surface
    Closed,
}

/// Events emitted during a harvest run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum HarvestEvent {
    /// Emitted once per accepted contact-info pair, immediately upon
    /// extraction from the overlay panel.
    SingleFieldScraped {
        key: String,
        value: String,
        timestamp: chrono::DateTime<chrono::Utc>,
    },
    /// Emitted once per completed record.
    ProfileScraped {
        summary: ProfileSummary,
        timestamp: chrono::DateTime<chrono::Utc>,
    },
    /// Emitted once at run completion, normal or partial-on-error, with the
    /// full accumulated projection.
    AllProfilesScraped {
        profiles: Vec<ProfileSummary>,
        timestamp: chrono::DateTime<chrono::Utc>,
    },
    /// Signals that the event bus is shutting down
    ///
    /// Subscribers should exit their event loops when receiving this event.
    Shutdown {
        reason: ShutdownReason,
        timestamp: chrono::DateTime<chrono::Utc>,
    },
}

/// Helper functions for creating common events
impl HarvestEvent {
    /// Create a `SingleFieldScraped` event
    #[must_use]
    pub fn single_field_scraped(key: String, value: String) -> Self {
        Self::SingleFieldScraped {
            key,
            value,
            timestamp: chrono::Utc::now(),
        }
    }

    /// Create a `ProfileScraped` event
    #[must_use]
    pub fn profile_scraped(summary: ProfileSummary) -> Self {
        Self::ProfileScraped {
            summary,
            timestamp: chrono::Utc::now(),
        }
    }

    /// Create an `AllProfilesScraped` event
    #[must_use]
    pub fn all_profiles_scraped(profiles: Vec<ProfileSummary>) -> Self {
        Self::AllProfilesScraped {
            profiles,
            timestamp: chrono::Utc::now(),
        }
    }

    /// Create a `Shutdown` event
    #[must_use]
    pub fn shutdown(reason: ShutdownReason) -> Self {
        Self::Shutdown {
            reason,
            timestamp: chrono::Utc::now(),
        }
    }
}
