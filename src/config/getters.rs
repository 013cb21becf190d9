//! Getter methods for `HarvestConfig`
//!
//! Accessors resolve optional knobs to their documented defaults so callers
//! never see a half-configured value.

use std::time::Duration;

use super::types::{HarvestConfig, SelectorSet};

impl HarvestConfig {
    #[must_use]
    pub fn start_url(&self) -> &str {
        &self.start_url
    }

    #[must_use]
    pub fn headless(&self) -> bool {
        self.headless
    }

    #[must_use]
    pub fn overlay_path(&self) -> &str {
        &self.overlay_path
    }

    /// Overlay polling interval. Default: 300 ms.
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.unwrap_or(300))
    }

    /// Polling tick budget. Default: 16 ticks.
    #[must_use]
    pub fn max_poll_attempts(&self) -> u32 {
        self.max_poll_attempts.unwrap_or(16)
    }

    /// Disclosure click attempt cap. Default: 3.
    #[must_use]
    pub fn max_click_attempts(&self) -> u32 {
        self.max_click_attempts.unwrap_or(3)
    }

    /// Post-terminal throttle delay. Default: 1000 ms.
    #[must_use]
    pub fn post_fetch_delay(&self) -> Duration {
        Duration::from_millis(self.post_fetch_delay_ms.unwrap_or(1000))
    }

    /// Listing render settle delay. Default: 2000 ms.
    #[must_use]
    pub fn render_settle(&self) -> Duration {
        Duration::from_millis(self.render_settle_ms.unwrap_or(2000))
    }

    /// Post-pagination navigation settle delay. Default: 3000 ms.
    #[must_use]
    pub fn navigation_settle(&self) -> Duration {
        Duration::from_millis(self.navigation_settle_ms.unwrap_or(3000))
    }

    #[must_use]
    pub fn junk_markers(&self) -> &[String] {
        &self.junk_markers
    }

    #[must_use]
    pub fn selectors(&self) -> &SelectorSet {
        &self.selectors
    }
}
