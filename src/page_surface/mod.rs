//! Narrow page-inspection capability seam
//!
//! The orchestration engine never touches a rendering surface directly; it
//! goes through these traits (query, read, click, close). The chromiumoxide
//! implementation drives a real browser; tests drive the engine against
//! fakes.

// Sub-modules
pub mod chromium;
pub mod js_scripts;

pub use chromium::{ChromiumListing, ChromiumOverlayOpener};

use anyhow::Result;
use async_trait::async_trait;

/// Presence and visibility of the disclosure control on the overlay.
///
/// The click-attempt counter advances whenever the control is present, even
/// while it is still hidden; only a visible control actually gets clicked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisclosureState {
    Absent,
    Hidden,
    Visible,
}

/// Snapshot of the contact panel once it has rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelSnapshot {
    /// Outer HTML of the panel, for structured extraction.
    pub html: String,
    /// Trimmed text content, kept as the unparsed fallback.
    pub raw_text: String,
}

/// The main listing page.
#[async_trait]
pub trait ListingSurface: Send + Sync {
    /// Best-effort scroll to the bottom of the listing. Errors are ignored
    /// by the caller.
    async fn scroll_to_bottom(&self) -> Result<()>;

    /// Outer HTML of each listing entry, in document order.
    async fn entry_fragments(&self) -> Result<Vec<String>>;

    /// Activate the non-disabled next-page control.
    ///
    /// Returns `Ok(false)` when no such control exists; its absence is the
    /// sole loop-termination condition of the pagination controller.
    async fn advance_page(&self) -> Result<bool>;
}

/// The secondary view opened to reach contact information.
#[async_trait]
pub trait OverlaySurface: Send + Sync {
    /// Whether the view was closed externally. A closed view is a terminal
    /// failure for the next poll tick; this probe itself never errors.
    async fn is_closed(&self) -> bool;

    /// Whether a challenge or login marker is present.
    async fn challenge_present(&self) -> Result<bool>;

    /// State of the disclosure control.
    async fn disclosure_state(&self) -> Result<DisclosureState>;

    /// Dispatch a click to the disclosure control.
    async fn click_disclosure(&self) -> Result<()>;

    /// Snapshot of the contact panel, `None` while it has not rendered.
    async fn contact_panel(&self) -> Result<Option<PanelSnapshot>>;

    /// Close the view. Idempotent.
    async fn close(&self) -> Result<()>;
}

/// Opens secondary views. Opening is the only way a fetch begins; a refusal
/// maps to the popup-blocked failure.
#[async_trait]
pub trait OverlayOpener: Send + Sync {
    async fn open(&self, url: &str) -> Result<Box<dyn OverlaySurface>>;
}
