//! Core configuration types for harvest runs
//!
//! This module contains the main `HarvestConfig` struct and the selector set
//! describing where the listing, overlay and contact panel live in the
//! rendered markup.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

/// Selector set for the rendering surface.
///
/// Every query the engine performs against a page goes through one of these
/// strings, so pointing the harvester at a differently-structured listing is
/// a configuration change, not a code change. Defaults target the profile
/// search listing the tool was built for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectorSet {
    /// One listing entry in document order.
    pub entry: String,
    /// Attribute on the entry root carrying the stable identifier.
    pub urn_attr: String,
    /// Anchor holding the detail-page address.
    pub profile_link: String,
    /// Thumbnail image; its alt text is the name source.
    pub thumbnail: String,
    pub full_name: String,
    /// Connection-tier badge text.
    pub connection_badge: String,
    pub premium_badge: String,
    pub job_title: String,
    pub location: String,
    /// Non-disabled next-page control.
    pub next_page: String,
    /// Markers indicating an anti-automation challenge or forced login.
    pub challenge_markers: String,
    /// Control that must be activated to reveal the contact panel.
    pub disclosure_control: String,
    /// Contact panel, primary then fallback.
    pub panel_primary: String,
    pub panel_fallback: String,
    /// One contact-type sub-block inside the panel.
    pub contact_block: String,
    /// Header label inside a sub-block.
    pub contact_header: String,
}

impl Default for SelectorSet {
    fn default() -> Self {
        Self {
            entry: "li > div[data-chameleon-result-urn]".to_string(),
            urn_attr: "data-chameleon-result-urn".to_string(),
            profile_link: "a[data-test-app-aware-link]".to_string(),
            thumbnail: ".presence-entity__image".to_string(),
            full_name: ".entity-result__title span[aria-hidden=\"true\"]".to_string(),
            connection_badge: ".entity-result__badge-text span[aria-hidden=\"true\"]".to_string(),
            premium_badge: ".entity-result__badge--premium".to_string(),
            job_title: ".t-14.t-black.t-normal".to_string(),
            location: ".t-14.t-normal:not(.t-black)".to_string(),
            next_page: ".artdeco-pagination__button--next:not([disabled])".to_string(),
            challenge_markers: ".checkpoint-container, #login".to_string(),
            disclosure_control: "#top-card-text-details-contact-info".to_string(),
            panel_primary: ".pv-profile-section__section-info.section-info".to_string(),
            panel_fallback: ".pv-contact-info".to_string(),
            contact_block: ".pv-contact-info__contact-type".to_string(),
            contact_header: ".pv-contact-info__header".to_string(),
        }
    }
}

/// Main configuration struct for a harvest run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarvestConfig {
    /// Address of the listing page the run starts on.
    pub(crate) start_url: String,
    pub(crate) headless: bool,
    /// Path appended to a detail address to reach the contact overlay.
    pub(crate) overlay_path: String,
    /// Overlay polling interval in milliseconds. Default: 300.
    pub(crate) poll_interval_ms: Option<u64>,
    /// Polling tick budget before the fetch times out. Default: 16.
    pub(crate) max_poll_attempts: Option<u32>,
    /// Cap on disclosure click attempts. Default: 3.
    ///
    /// Prevents repeated-click side effects when the first click already
    /// succeeded but the panel render is merely slow.
    pub(crate) max_click_attempts: Option<u32>,
    /// Delay after every fetch, success or failure, in milliseconds.
    /// Throttles request rate regardless of outcome. Default: 1000.
    pub(crate) post_fetch_delay_ms: Option<u64>,
    /// Settle delay after the listing (re)renders, in milliseconds.
    /// Default: 2000.
    pub(crate) render_settle_ms: Option<u64>,
    /// Settle delay after activating the next-page control, in
    /// milliseconds. Default: 3000.
    pub(crate) navigation_settle_ms: Option<u64>,
    /// Substrings marking a contact key or value as scraping noise.
    pub(crate) junk_markers: Vec<String>,
    pub(crate) selectors: SelectorSet,

    /// Chrome user data directory for browser profile isolation.
    #[serde(skip)]
    pub(crate) chrome_data_dir: Option<PathBuf>,

    /// Optional event bus for publishing harvest events
    ///
    /// When set, the engine publishes `HarvestEvent` updates to this bus.
    #[serde(skip)]
    pub(crate) event_bus: Option<Arc<crate::harvest_events::HarvestEventBus>>,
}

impl HarvestConfig {
    /// Attach an event bus for real-time harvest events
    #[must_use]
    pub fn with_event_bus(mut self, bus: Arc<crate::harvest_events::HarvestEventBus>) -> Self {
        self.event_bus = Some(bus);
        self
    }

    /// Get the event bus if attached
    #[must_use]
    pub fn event_bus(&self) -> Option<&Arc<crate::harvest_events::HarvestEventBus>> {
        self.event_bus.as_ref()
    }

    /// Set the Chrome user data directory for browser profile isolation
    #[must_use]
    pub fn with_chrome_data_dir(mut self, dir: PathBuf) -> Self {
        self.chrome_data_dir = Some(dir);
        self
    }

    /// Get the Chrome user data directory if configured
    #[must_use]
    pub fn chrome_data_dir(&self) -> Option<&PathBuf> {
        self.chrome_data_dir.as_ref()
    }
}
