pub mod browser_setup;
pub mod config;
pub mod entry_parser;
pub mod export;
pub mod harvest_engine;
pub mod harvest_events;
pub mod page_surface;
pub mod records;

pub use browser_setup::{find_browser_executable, launch_browser};
pub use config::{HarvestConfig, HarvestConfigBuilder, SelectorSet};
pub use entry_parser::CompiledSelectors;
pub use export::{ExportError, export_filename};
pub use harvest_engine::{
    ContactFetchResult, ContactInfoFetcher, FetchFailure, HarvestError, HarvestPhase,
    HarvestSession, LogProgress, NoOpProgress, PageHarvester, PaginationController,
    ProgressReporter, run_harvest,
};
pub use harvest_events::{HarvestEvent, HarvestEventBus, ShutdownReason};
pub use records::{ProfileRecord, ProfileSummary};

/// Run a harvest with default (log-based) progress reporting and return the
/// finished session.
///
/// # Errors
///
/// Fails on configuration, browser launch or initial navigation errors;
/// mid-run failures end the session in the `Errored` phase instead, keeping
/// the records accumulated so far.
pub async fn harvest(config: HarvestConfig) -> Result<HarvestSession, HarvestError> {
    harvest_engine::run_harvest(config, &LogProgress).await
}
