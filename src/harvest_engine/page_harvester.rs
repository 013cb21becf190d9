//! Single listing-page harvester
//!
//! Enumerates the entries currently rendered on the listing, parses each
//! into a record, runs the contact fetch for entries that resolved a detail
//! address, and appends the completed records to the session in document
//! order.

use anyhow::Result;
use log::{debug, info};

use super::contact_fetcher::{ContactFetchResult, ContactInfoFetcher};
use super::progress::ProgressReporter;
use super::session::HarvestSession;
use crate::config::HarvestConfig;
use crate::entry_parser::{self, CompiledSelectors};
use crate::harvest_events::HarvestEvent;
use crate::page_surface::{ListingSurface, OverlayOpener};
use crate::records::ProfileSummary;

/// Harvests the entries of one listing page into the session.
pub struct PageHarvester<'a> {
    config: &'a HarvestConfig,
    selectors: &'a CompiledSelectors,
    fetcher: &'a ContactInfoFetcher,
}

impl<'a> PageHarvester<'a> {
    #[must_use]
    pub fn new(
        config: &'a HarvestConfig,
        selectors: &'a CompiledSelectors,
        fetcher: &'a ContactInfoFetcher,
    ) -> Self {
        Self {
            config,
            selectors,
            fetcher,
        }
    }

    /// Harvest every entry currently on the listing.
    ///
    /// Entries are processed strictly sequentially; a record is appended
    /// exactly once, after its contact fetch (if any) resolved.
    ///
    /// # Errors
    ///
    /// Fails only when the listing itself cannot be enumerated; per-entry
    /// contact failures are recorded on the entry and never abort the page.
    pub async fn harvest_page(
        &self,
        listing: &dyn ListingSurface,
        opener: &dyn OverlayOpener,
        session: &mut HarvestSession,
        progress: &dyn ProgressReporter,
    ) -> Result<()> {
        let fragments = listing.entry_fragments().await?;
        debug!("Listing rendered {} entries", fragments.len());

        for fragment in &fragments {
            let mut record = entry_parser::parse_entry(fragment, self.selectors);

            // VIP status is decided from listing data alone, before any
            // contact fetch can fail.
            let vip = record.is_vip();
            if vip {
                session.count_vip();
            }

            if record.profile_url.is_empty() {
                debug!("Entry without detail address, skipping contact fetch");
            } else {
                match self.fetcher.fetch(opener, &record.profile_url).await {
                    ContactFetchResult::Success { contact_info, raw } => {
                        record.contact_info = contact_info;
                        record.contact_info_raw = raw;
                    }
                    ContactFetchResult::Failure { reason, raw } => {
                        record.contact_info_error = true;
                        record.error_reason = reason.to_string();
                        record.contact_info_raw = raw;
                    }
                }

                if let Some(bus) = self.config.event_bus() {
                    let summary = ProfileSummary::from_record(&record);
                    if let Err(e) = bus.publish(HarvestEvent::profile_scraped(summary)).await {
                        debug!("Failed to publish ProfileScraped event: {e}");
                    }
                }
            }

            session.push(record);
            progress.report_record_scraped(session.total_scraped(), session.vip_scraped());
        }

        info!(
            "Page harvested: {} total, {} VIP so far",
            session.total_scraped(),
            session.vip_scraped()
        );
        Ok(())
    }
}
