//! Harvest engine
//!
//! Orchestrates one full run: launch the browser, open the listing, walk
//! the pages, fetch contact overlays per entry, and accumulate records in
//! the session. The engine drives the rendering surface only through the
//! capability traits in `page_surface`.

// Sub-modules
pub mod clock;
pub mod contact_fetcher;
pub mod errors;
pub mod page_harvester;
pub mod pagination;
pub mod progress;
pub mod session;

// Re-exports for public API
pub use clock::{Clock, TokioClock};
pub use contact_fetcher::{ContactFetchResult, ContactInfoFetcher};
pub use errors::{FetchFailure, HarvestError};
pub use page_harvester::PageHarvester;
pub use pagination::PaginationController;
pub use progress::{LogProgress, NoOpProgress, ProgressReporter};
pub use session::{HarvestPhase, HarvestSession};

use anyhow::Context;
use log::{info, warn};
use std::sync::Arc;

use crate::browser_setup::launch_browser;
use crate::config::HarvestConfig;
use crate::entry_parser::CompiledSelectors;
use crate::harvest_events::ShutdownReason;
use crate::page_surface::{ChromiumListing, ChromiumOverlayOpener};

/// Run a full harvest against a live browser.
///
/// Returns the finished session whether the pagination loop completed or
/// stopped on an error partway; `session.phase()` distinguishes the two and
/// partially accumulated records survive either way.
///
/// # Errors
///
/// Fails outright only before any harvesting happens: invalid selectors, a
/// run already active, browser launch or initial navigation failure.
pub async fn run_harvest<P: ProgressReporter>(
    config: HarvestConfig,
    progress: &P,
) -> Result<HarvestSession, HarvestError> {
    progress.report_initializing();

    let selectors = CompiledSelectors::compile(config.selectors())?;
    let mut session = HarvestSession::new();
    session.begin()?;

    let ephemeral_profile = config.chrome_data_dir().is_none();
    let (browser, handler_task, user_data_dir) =
        launch_browser(config.headless(), config.chrome_data_dir().cloned())
            .await
            .map_err(|e| HarvestError::Browser(format!("{e:#}")))?;
    progress.report_browser_launched();

    let browser = Arc::new(browser);

    let run_result = {
        let page = match open_listing(&browser, config.start_url()).await {
            Ok(page) => page,
            Err(e) => {
                shutdown_browser(browser, handler_task, &user_data_dir, ephemeral_profile).await;
                return Err(HarvestError::Browser(format!("{e:#}")));
            }
        };

        let listing = ChromiumListing::new(page, config.selectors().clone());
        let opener = ChromiumOverlayOpener::new(Arc::clone(&browser), config.selectors().clone());
        let clock: Arc<dyn Clock> = Arc::new(TokioClock);

        let fetcher = ContactInfoFetcher::new(config.clone(), selectors.clone(), Arc::clone(&clock));
        let harvester = PageHarvester::new(&config, &selectors, &fetcher);
        let controller = PaginationController::new(&config, clock);

        controller
            .run(&listing, &opener, &harvester, &mut session, progress)
            .await
    };

    if let Some(bus) = config.event_bus() {
        let reason = match &run_result {
            Ok(()) => ShutdownReason::RunCompleted,
            Err(e) => ShutdownReason::Error(format!("{e:#}")),
        };
        bus.shutdown(reason).await;
    }

    shutdown_browser(browser, handler_task, &user_data_dir, ephemeral_profile).await;

    info!(
        "Harvest finished: {} records ({} VIP), phase {:?}",
        session.total_scraped(),
        session.vip_scraped(),
        session.phase()
    );
    Ok(session)
}

async fn open_listing(
    browser: &chromiumoxide::Browser,
    start_url: &str,
) -> anyhow::Result<chromiumoxide::Page> {
    let page = browser
        .new_page(start_url)
        .await
        .with_context(|| format!("Failed to open listing page {start_url}"))?;
    page.wait_for_navigation()
        .await
        .context("Listing page failed to finish navigating")?;
    Ok(page)
}

/// Tear the browser down and reclaim the ephemeral profile directory.
/// A user-supplied profile directory is never deleted.
async fn shutdown_browser(
    browser: Arc<chromiumoxide::Browser>,
    handler_task: tokio::task::JoinHandle<()>,
    user_data_dir: &std::path::Path,
    ephemeral_profile: bool,
) {
    handler_task.abort();
    if let Err(e) = handler_task.await
        && !e.is_cancelled()
    {
        warn!("Browser handler task failed during abort: {e}");
    }

    match Arc::try_unwrap(browser) {
        Ok(mut browser) => {
            if let Err(e) = browser.close().await {
                warn!("Failed to close browser: {e}");
            }
            if let Err(e) = browser.wait().await {
                warn!("Failed to wait for browser exit: {e}");
            }
        }
        Err(_) => {
            warn!("Browser still referenced at shutdown, skipping close");
        }
    }

    if ephemeral_profile && let Err(e) = std::fs::remove_dir_all(user_data_dir) {
        warn!("Failed to clean up browser profile directory: {e}");
    }
}
