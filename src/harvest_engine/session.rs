//! Process-wide accumulator for one harvest run
//!
//! `HarvestSession` holds the ordered record list, the running counters the
//! status widget reads, and the run phase. Exactly one run may be active at
//! a time; the inbound control commands (start, restart, download) map to
//! the methods here.

use serde::{Deserialize, Serialize};

use super::errors::HarvestError;
use crate::export::{self, ExportError};
use crate::records::ProfileRecord;

/// Phase of the current run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HarvestPhase {
    #[default]
    Idle,
    Scraping,
    Done,
    Errored,
}

/// Accumulator for one harvest run
///
/// Created on the start command, mutated only by the pagination loop and
/// page harvester on the single logical thread, reset on restart.
#[derive(Debug, Default)]
pub struct HarvestSession {
    records: Vec<ProfileRecord>,
    total_scraped: usize,
    vip_scraped: usize,
    phase: HarvestPhase,
}

impl HarvestSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start command: transition Idle → Scraping
    ///
    /// # Errors
    ///
    /// Returns `HarvestError::RunActive` when a run is already in flight.
    pub fn begin(&mut self) -> Result<(), HarvestError> {
        if self.phase == HarvestPhase::Scraping {
            return Err(HarvestError::RunActive);
        }
        self.phase = HarvestPhase::Scraping;
        Ok(())
    }

    /// Mark the run finished, normally or on a fatal loop error
    pub fn finish(&mut self, phase: HarvestPhase) {
        self.phase = phase;
    }

    /// Restart command: clear records and counters, back to Idle
    pub fn reset(&mut self) {
        self.records.clear();
        self.total_scraped = 0;
        self.vip_scraped = 0;
        self.phase = HarvestPhase::Idle;
    }

    /// Append a completed record. Records are immutable once appended.
    pub fn push(&mut self, record: ProfileRecord) {
        self.records.push(record);
        self.total_scraped += 1;
    }

    /// Count one VIP entry (first-degree or premium-badged)
    pub fn count_vip(&mut self) {
        self.vip_scraped += 1;
    }

    /// Download command: serialize the accumulated records
    ///
    /// # Errors
    ///
    /// Returns `ExportError::EmptyInput` when nothing has been harvested;
    /// the control surface shows this to the user instead of writing an
    /// empty file.
    pub fn export(&self) -> Result<String, ExportError> {
        export::export(&self.records)
    }

    #[must_use]
    pub fn records(&self) -> &[ProfileRecord] {
        &self.records
    }

    #[must_use]
    pub fn into_records(self) -> Vec<ProfileRecord> {
        self.records
    }

    #[must_use]
    pub fn total_scraped(&self) -> usize {
        self.total_scraped
    }

    #[must_use]
    pub fn vip_scraped(&self) -> usize {
        self.vip_scraped
    }

    #[must_use]
    pub fn phase(&self) -> HarvestPhase {
        self.phase
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_rejects_second_concurrent_run() {
        let mut session = HarvestSession::new();
        assert!(session.begin().is_ok());
        assert_eq!(session.phase(), HarvestPhase::Scraping);
        assert!(matches!(session.begin(), Err(HarvestError::RunActive)));
    }

    #[test]
    fn reset_clears_records_and_counters() {
        let mut session = HarvestSession::new();
        session.begin().unwrap();
        session.push(ProfileRecord::default());
        session.count_vip();
        session.finish(HarvestPhase::Done);

        session.reset();
        assert_eq!(session.total_scraped(), 0);
        assert_eq!(session.vip_scraped(), 0);
        assert!(session.records().is_empty());
        assert_eq!(session.phase(), HarvestPhase::Idle);
    }

    #[test]
    fn export_of_empty_session_is_surfaced() {
        let session = HarvestSession::new();
        assert!(matches!(session.export(), Err(ExportError::EmptyInput)));
    }

    #[test]
    fn begin_allowed_again_after_finish() {
        let mut session = HarvestSession::new();
        session.begin().unwrap();
        session.finish(HarvestPhase::Errored);
        assert!(session.begin().is_ok());
    }
}
