//! Progress reporting abstraction for harvest operations
//!
//! Defines the `ProgressReporter` trait for lifecycle event reporting.
//! The floating status widget is an external collaborator; the engine only
//! pushes counters and phase changes through this seam.

/// Trait for reporting harvest progress at key lifecycle events
///
/// Implementations can send updates to channels, log to console, update UI,
/// etc. The same engine drives both silent and progress-reporting callers.
pub trait ProgressReporter: Send + Sync {
    /// Report that browser initialization has started
    fn report_initializing(&self);

    /// Report that the browser has launched successfully
    fn report_browser_launched(&self);

    /// Report that harvesting of a listing page has started
    fn report_page_started(&self, page: usize);

    /// Report updated counters after each record
    fn report_record_scraped(&self, total: usize, vip: usize);

    /// Report that the run has completed successfully
    fn report_completed(&self, total: usize, vip: usize);

    /// Report an error that occurred during harvesting
    fn report_error(&self, error: &str);
}

/// Progress reporter that does nothing
///
/// Used by callers that don't need progress updates. All methods are no-ops
/// and will be inlined away by the compiler.
#[derive(Debug, Clone, Copy)]
pub struct NoOpProgress;

impl ProgressReporter for NoOpProgress {
    #[inline(always)]
    fn report_initializing(&self) {}

    #[inline(always)]
    fn report_browser_launched(&self) {}

    #[inline(always)]
    fn report_page_started(&self, _page: usize) {}

    #[inline(always)]
    fn report_record_scraped(&self, _total: usize, _vip: usize) {}

    #[inline(always)]
    fn report_completed(&self, _total: usize, _vip: usize) {}

    #[inline(always)]
    fn report_error(&self, _error: &str) {}
}

/// Progress reporter that writes to the log
///
/// Stands in for the status widget when running from the command line.
#[derive(Debug, Clone, Copy)]
pub struct LogProgress;

impl ProgressReporter for LogProgress {
    fn report_initializing(&self) {
        log::info!("Initializing browser");
    }

    fn report_browser_launched(&self) {
        log::info!("Browser launched");
    }

    fn report_page_started(&self, page: usize) {
        log::info!("Harvesting page {page}");
    }

    fn report_record_scraped(&self, total: usize, vip: usize) {
        log::info!("Profiles scraped: {total} (VIP: {vip})");
    }

    fn report_completed(&self, total: usize, vip: usize) {
        log::info!("Harvest complete: {total} profiles ({vip} VIP)");
    }

    fn report_error(&self, error: &str) {
        log::error!("Harvest error: {error}");
    }
}
