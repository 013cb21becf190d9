//! Listing pagination loop
//!
//! Walks the listing page by page until no enabled next-page control
//! remains, delegating each page to the page harvester. On a fatal error
//! the accumulated records survive; partial results are published when any
//! exist.

use anyhow::Result;
use log::{error, info};
use std::sync::Arc;

use super::clock::Clock;
use super::page_harvester::PageHarvester;
use super::progress::ProgressReporter;
use super::session::{HarvestPhase, HarvestSession};
use crate::config::HarvestConfig;
use crate::harvest_events::HarvestEvent;
use crate::page_surface::{ListingSurface, OverlayOpener};
use crate::records::ProfileSummary;

/// Drives the whole run across listing pages.
pub struct PaginationController<'a> {
    config: &'a HarvestConfig,
    clock: Arc<dyn Clock>,
}

impl<'a> PaginationController<'a> {
    #[must_use]
    pub fn new(config: &'a HarvestConfig, clock: Arc<dyn Clock>) -> Self {
        Self { config, clock }
    }

    /// Run the pagination loop to completion.
    ///
    /// The session phase ends up `Done` or `Errored`; either way the records
    /// accumulated so far stay in the session. The full-run event carries
    /// every accumulated record on success, and on error only when at least
    /// one record exists.
    pub async fn run(
        &self,
        listing: &dyn ListingSurface,
        opener: &dyn OverlayOpener,
        harvester: &PageHarvester<'_>,
        session: &mut HarvestSession,
        progress: &dyn ProgressReporter,
    ) -> Result<(), anyhow::Error> {
        let outcome = self
            .paginate(listing, opener, harvester, session, progress)
            .await;

        match outcome {
            Ok(()) => {
                session.finish(HarvestPhase::Done);
                self.publish_all(session).await;
                progress.report_completed(session.total_scraped(), session.vip_scraped());
                Ok(())
            }
            Err(e) => {
                session.finish(HarvestPhase::Errored);
                error!("Harvest stopped on error: {e:#}");
                if !session.records().is_empty() {
                    self.publish_all(session).await;
                }
                progress.report_error(&format!("{e:#}"));
                Err(e)
            }
        }
    }

    async fn paginate(
        &self,
        listing: &dyn ListingSurface,
        opener: &dyn OverlayOpener,
        harvester: &PageHarvester<'_>,
        session: &mut HarvestSession,
        progress: &dyn ProgressReporter,
    ) -> Result<()> {
        let mut page = 1usize;
        loop {
            progress.report_page_started(page);
            info!("Harvesting listing page {page}");

            // Scrolling first forces lazily rendered entries in; a scroll
            // failure is not worth aborting the page over.
            if let Err(e) = listing.scroll_to_bottom().await {
                log::debug!("Listing scroll failed: {e:#}");
            }
            self.clock.sleep(self.config.render_settle()).await;

            harvester
                .harvest_page(listing, opener, session, progress)
                .await?;

            self.clock.sleep(self.config.render_settle()).await;
            if listing.advance_page().await? {
                self.clock.sleep(self.config.navigation_settle()).await;
                page += 1;
            } else {
                info!("No further pages after page {page}");
                return Ok(());
            }
        }
    }

    async fn publish_all(&self, session: &HarvestSession) {
        if let Some(bus) = self.config.event_bus() {
            let profiles: Vec<ProfileSummary> = session
                .records()
                .iter()
                .map(ProfileSummary::from_record)
                .collect();
            if let Err(e) = bus
                .publish(HarvestEvent::all_profiles_scraped(profiles))
                .await
            {
                log::debug!("Failed to publish AllProfilesScraped event: {e}");
            }
        }
    }
}
