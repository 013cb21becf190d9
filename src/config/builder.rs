//! Type-safe builder for `HarvestConfig` using the typestate pattern
//!
//! The start address is the one required field; the typestate makes it
//! impossible to build without it. Everything else has documented defaults.

use std::marker::PhantomData;
use std::path::PathBuf;

use super::types::{HarvestConfig, SelectorSet};
use crate::harvest_engine::HarvestError;

/// Default overlay path appended to a detail address.
pub const DEFAULT_OVERLAY_PATH: &str = "/overlay/contact-info/";

// Type states for the builder
pub struct WithStartUrl;

pub struct HarvestConfigBuilder<State = ()> {
    pub(crate) start_url: Option<String>,
    pub(crate) headless: bool,
    pub(crate) overlay_path: String,
    pub(crate) poll_interval_ms: Option<u64>,
    pub(crate) max_poll_attempts: Option<u32>,
    pub(crate) max_click_attempts: Option<u32>,
    pub(crate) post_fetch_delay_ms: Option<u64>,
    pub(crate) render_settle_ms: Option<u64>,
    pub(crate) navigation_settle_ms: Option<u64>,
    pub(crate) junk_markers: Vec<String>,
    pub(crate) selectors: SelectorSet,
    pub(crate) chrome_data_dir: Option<PathBuf>,
    pub(crate) _phantom: PhantomData<State>,
}

impl Default for HarvestConfigBuilder<()> {
    fn default() -> Self {
        Self {
            start_url: None,
            headless: true,
            overlay_path: DEFAULT_OVERLAY_PATH.to_string(),
            poll_interval_ms: Some(300),
            max_poll_attempts: Some(16),
            max_click_attempts: Some(3),
            post_fetch_delay_ms: Some(1000),
            render_settle_ms: Some(2000),
            navigation_settle_ms: Some(3000),
            junk_markers: vec!["s_profile".to_string()],
            selectors: SelectorSet::default(),
            chrome_data_dir: None,
            _phantom: PhantomData,
        }
    }
}

impl HarvestConfig {
    /// Create a builder for configuring a `HarvestConfig` with a fluent interface
    #[must_use]
    pub fn builder() -> HarvestConfigBuilder<()> {
        HarvestConfigBuilder::default()
    }
}

impl HarvestConfigBuilder<()> {
    /// Set the listing address the run starts on (required)
    pub fn start_url(self, url: impl Into<String>) -> HarvestConfigBuilder<WithStartUrl> {
        HarvestConfigBuilder {
            start_url: Some(url.into()),
            headless: self.headless,
            overlay_path: self.overlay_path,
            poll_interval_ms: self.poll_interval_ms,
            max_poll_attempts: self.max_poll_attempts,
            max_click_attempts: self.max_click_attempts,
            post_fetch_delay_ms: self.post_fetch_delay_ms,
            render_settle_ms: self.render_settle_ms,
            navigation_settle_ms: self.navigation_settle_ms,
            junk_markers: self.junk_markers,
            selectors: self.selectors,
            chrome_data_dir: self.chrome_data_dir,
            _phantom: PhantomData,
        }
    }
}

impl<State> HarvestConfigBuilder<State> {
    #[must_use]
    pub fn headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    #[must_use]
    pub fn overlay_path(mut self, path: impl Into<String>) -> Self {
        self.overlay_path = path.into();
        self
    }

    #[must_use]
    pub fn poll_interval_ms(mut self, ms: u64) -> Self {
        self.poll_interval_ms = Some(ms);
        self
    }

    #[must_use]
    pub fn max_poll_attempts(mut self, attempts: u32) -> Self {
        self.max_poll_attempts = Some(attempts);
        self
    }

    #[must_use]
    pub fn max_click_attempts(mut self, attempts: u32) -> Self {
        self.max_click_attempts = Some(attempts);
        self
    }

    #[must_use]
    pub fn post_fetch_delay_ms(mut self, ms: u64) -> Self {
        self.post_fetch_delay_ms = Some(ms);
        self
    }

    #[must_use]
    pub fn render_settle_ms(mut self, ms: u64) -> Self {
        self.render_settle_ms = Some(ms);
        self
    }

    #[must_use]
    pub fn navigation_settle_ms(mut self, ms: u64) -> Self {
        self.navigation_settle_ms = Some(ms);
        self
    }

    #[must_use]
    pub fn junk_markers(mut self, markers: Vec<String>) -> Self {
        self.junk_markers = markers;
        self
    }

    #[must_use]
    pub fn selectors(mut self, selectors: SelectorSet) -> Self {
        self.selectors = selectors;
        self
    }

    #[must_use]
    pub fn chrome_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.chrome_data_dir = Some(dir.into());
        self
    }
}

impl HarvestConfigBuilder<WithStartUrl> {
    /// Validate and build the final configuration
    ///
    /// # Errors
    ///
    /// Returns `HarvestError::Config` when the start address does not parse
    /// as an absolute URL or a timing knob is zero.
    pub fn build(self) -> Result<HarvestConfig, HarvestError> {
        let start_url = self
            .start_url
            .ok_or_else(|| HarvestError::Config("start_url is required".to_string()))?;

        url::Url::parse(&start_url)
            .map_err(|e| HarvestError::Config(format!("invalid start_url `{start_url}`: {e}")))?;

        if self.poll_interval_ms == Some(0) {
            return Err(HarvestError::Config(
                "poll_interval_ms must be non-zero".to_string(),
            ));
        }
        if self.max_poll_attempts == Some(0) {
            return Err(HarvestError::Config(
                "max_poll_attempts must be non-zero".to_string(),
            ));
        }

        Ok(HarvestConfig {
            start_url,
            headless: self.headless,
            overlay_path: self.overlay_path,
            poll_interval_ms: self.poll_interval_ms,
            max_poll_attempts: self.max_poll_attempts,
            max_click_attempts: self.max_click_attempts,
            post_fetch_delay_ms: self.post_fetch_delay_ms,
            render_settle_ms: self.render_settle_ms,
            navigation_settle_ms: self.navigation_settle_ms,
            junk_markers: self.junk_markers,
            selectors: self.selectors,
            chrome_data_dir: self.chrome_data_dir,
            event_bus: None,
        })
    }
}
