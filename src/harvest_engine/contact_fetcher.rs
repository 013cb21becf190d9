//! Per-entry contact-info retrieval state machine
//!
//! Opens a secondary view at the entry's detail address, polls on a fixed
//! interval for the panel to become revealable, clicks the disclosure
//! control at most a capped number of times, extracts key/value pairs, and
//! returns a result-or-failure. The attempt cap bounds every fetch in time;
//! the render completing is not synchronously observable, so polling is the
//! only option.

use anyhow::Result;
use log::{debug, warn};
use std::collections::BTreeMap;
use std::sync::Arc;

use super::clock::Clock;
use super::errors::FetchFailure;
use crate::config::HarvestConfig;
use crate::entry_parser::{self, CompiledSelectors};
use crate::harvest_events::HarvestEvent;
use crate::page_surface::{DisclosureState, OverlayOpener, OverlaySurface, PanelSnapshot};

/// Transient value returned by one fetch. Never carries both a mapping and
/// a failure.
#[derive(Debug, Clone, PartialEq)]
pub enum ContactFetchResult {
    Success {
        contact_info: BTreeMap<String, String>,
        raw: String,
    },
    Failure {
        reason: FetchFailure,
        /// Partial panel text, only ever non-empty on a structural timeout.
        raw: String,
    },
}

impl ContactFetchResult {
    fn failure(reason: FetchFailure) -> Self {
        Self::Failure {
            reason,
            raw: String::new(),
        }
    }
}

/// What one poll tick observed.
enum TickOutcome {
    Continue,
    Challenge,
    Panel(PanelSnapshot),
}

/// Bounded-time fetcher for the contact overlay. Exactly one state machine
/// is active at a time; the page harvester drives entries sequentially.
pub struct ContactInfoFetcher {
    config: HarvestConfig,
    selectors: CompiledSelectors,
    clock: Arc<dyn Clock>,
}

impl ContactInfoFetcher {
    #[must_use]
    pub fn new(config: HarvestConfig, selectors: CompiledSelectors, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            selectors,
            clock,
        }
    }

    /// Fetch contact info for one detail address.
    ///
    /// Always returns within the polling budget plus the post-terminal
    /// throttle delay, which applies regardless of outcome.
    pub async fn fetch(&self, opener: &dyn OverlayOpener, detail_url: &str) -> ContactFetchResult {
        let result = self.run(opener, detail_url).await;
        self.clock.sleep(self.config.post_fetch_delay()).await;
        result
    }

    async fn run(&self, opener: &dyn OverlayOpener, detail_url: &str) -> ContactFetchResult {
        // Opening
        let overlay_url = overlay_url(detail_url, self.config.overlay_path());
        let overlay = match opener.open(&overlay_url).await {
            Ok(overlay) => overlay,
            Err(e) => {
                warn!("Secondary view blocked for {detail_url}: {e}");
                return ContactFetchResult::failure(FetchFailure::PopupBlocked);
            }
        };

        // Polling
        let mut clicked = false;
        let mut click_attempts = 0u32;
        for tick in 0..self.config.max_poll_attempts() {
            self.clock.sleep(self.config.poll_interval()).await;

            if overlay.is_closed().await {
                debug!("Secondary view closed externally for {detail_url} (tick {tick})");
                return ContactFetchResult::failure(FetchFailure::ViewClosedPrematurely);
            }

            match self
                .poll_tick(overlay.as_ref(), &mut clicked, &mut click_attempts)
                .await
            {
                Ok(TickOutcome::Continue) => {}
                Ok(TickOutcome::Challenge) => {
                    warn!("Challenge or login detected for {detail_url}");
                    close_overlay(overlay.as_ref()).await;
                    return ContactFetchResult::failure(FetchFailure::ChallengeDetected);
                }
                Ok(TickOutcome::Panel(snapshot)) => {
                    // Extracting
                    let contact_info = self.extract(&snapshot).await;
                    close_overlay(overlay.as_ref()).await;
                    return ContactFetchResult::Success {
                        contact_info,
                        raw: snapshot.raw_text,
                    };
                }
                Err(e) => {
                    warn!("Error evaluating secondary view for {detail_url}: {e:#}");
                    close_overlay(overlay.as_ref()).await;
                    return ContactFetchResult::failure(FetchFailure::ExtractionException(
                        format!("{e:#}"),
                    ));
                }
            }
        }

        // Timeout: the panel never rendered. Capture whatever text is
        // readable before giving up.
        warn!("Contact section not found for {detail_url} after {} ticks", self.config.max_poll_attempts());
        let raw = match overlay.contact_panel().await {
            Ok(Some(snapshot)) => snapshot.raw_text,
            _ => String::new(),
        };
        close_overlay(overlay.as_ref()).await;
        ContactFetchResult::Failure {
            reason: FetchFailure::SectionNotFound,
            raw,
        }
    }

    /// One poll tick, evaluated in order: challenge marker, disclosure
    /// click, panel presence.
    async fn poll_tick(
        &self,
        overlay: &dyn OverlaySurface,
        clicked: &mut bool,
        click_attempts: &mut u32,
    ) -> Result<TickOutcome> {
        if overlay.challenge_present().await? {
            return Ok(TickOutcome::Challenge);
        }

        if !*clicked && *click_attempts < self.config.max_click_attempts() {
            match overlay.disclosure_state().await? {
                DisclosureState::Visible => {
                    overlay.click_disclosure().await?;
                    *clicked = true;
                    *click_attempts += 1;
                    debug!("Disclosure control clicked (attempt {click_attempts})");
                }
                // A present-but-hidden control still consumes an attempt;
                // the cap bounds interaction with a control that never
                // becomes clickable.
                DisclosureState::Hidden => {
                    *click_attempts += 1;
                }
                DisclosureState::Absent => {}
            }
        }

        if let Some(snapshot) = overlay.contact_panel().await? {
            return Ok(TickOutcome::Panel(snapshot));
        }

        Ok(TickOutcome::Continue)
    }

    /// Parse the panel and publish one event per accepted pair.
    async fn extract(&self, snapshot: &PanelSnapshot) -> BTreeMap<String, String> {
        let pairs = entry_parser::parse_contact_panel(
            &snapshot.html,
            &self.selectors,
            self.config.junk_markers(),
        );

        let mut contact_info = BTreeMap::new();
        for (key, value) in pairs {
            if let Some(bus) = self.config.event_bus() {
                let event = HarvestEvent::single_field_scraped(key.clone(), value.clone());
                if let Err(e) = bus.publish(event).await {
                    debug!("Failed to publish SingleFieldScraped event: {e}");
                }
            }
            contact_info.insert(key, value);
        }
        contact_info
    }
}

/// Join a detail address with the overlay path, tolerating a trailing slash
/// on the address.
#[must_use]
pub fn overlay_url(detail_url: &str, overlay_path: &str) -> String {
    let base = detail_url.trim_end_matches('/');
    format!("{base}{overlay_path}")
}

async fn close_overlay(overlay: &dyn OverlaySurface) {
    if let Err(e) = overlay.close().await {
        debug!("Overlay close failed: {e:#}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlay_url_joins_without_double_slash() {
        assert_eq!(
            overlay_url("https://example.com/in/ada/", "/overlay/contact-info/"),
            "https://example.com/in/ada/overlay/contact-info/"
        );
        assert_eq!(
            overlay_url("https://example.com/in/ada", "/overlay/contact-info/"),
            "https://example.com/in/ada/overlay/contact-info/"
        );
    }
}
