//! Chromiumoxide-backed page surfaces
//!
//! Drives the real rendering surface through JS evaluation over CDP. All
//! selector knowledge comes from the configured `SelectorSet`; the engine
//! above this layer never sees a CSS selector.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chromiumoxide::Page;
use chromiumoxide::browser::Browser;
use log::debug;
use serde::Deserialize;
use std::sync::Arc;

use super::js_scripts;
use super::{DisclosureState, ListingSurface, OverlayOpener, OverlaySurface, PanelSnapshot};
use crate::config::SelectorSet;

/// The main listing page, backed by a live browser tab.
pub struct ChromiumListing {
    page: Page,
    selectors: SelectorSet,
}

impl ChromiumListing {
    #[must_use]
    pub fn new(page: Page, selectors: SelectorSet) -> Self {
        Self { page, selectors }
    }
}

#[async_trait]
impl ListingSurface for ChromiumListing {
    async fn scroll_to_bottom(&self) -> Result<()> {
        self.page
            .evaluate(js_scripts::SCROLL_TO_BOTTOM_SCRIPT)
            .await
            .context("Failed to scroll listing")?;
        Ok(())
    }

    async fn entry_fragments(&self) -> Result<Vec<String>> {
        let script = js_scripts::entry_fragments_script(&self.selectors.entry);
        let js_result = self
            .page
            .evaluate(script)
            .await
            .context("Failed to execute entry enumeration script")?;

        let fragments: Vec<String> = js_result
            .into_value()
            .context("Failed to parse entry fragments from JS result")?;
        Ok(fragments)
    }

    async fn advance_page(&self) -> Result<bool> {
        let script = js_scripts::advance_page_script(&self.selectors.next_page);
        let js_result = self
            .page
            .evaluate(script)
            .await
            .context("Failed to execute pagination script")?;

        let advanced: bool = js_result
            .into_value()
            .context("Failed to parse pagination result")?;
        Ok(advanced)
    }
}

/// Opens contact overlays as fresh browser tabs.
pub struct ChromiumOverlayOpener {
    browser: Arc<Browser>,
    selectors: SelectorSet,
}

impl ChromiumOverlayOpener {
    #[must_use]
    pub fn new(browser: Arc<Browser>, selectors: SelectorSet) -> Self {
        Self { browser, selectors }
    }
}

#[async_trait]
impl OverlayOpener for ChromiumOverlayOpener {
    async fn open(&self, url: &str) -> Result<Box<dyn OverlaySurface>> {
        let page = self
            .browser
            .new_page(url)
            .await
            .with_context(|| format!("Failed to open secondary view for {url}"))?;

        Ok(Box::new(ChromiumOverlay {
            page,
            selectors: self.selectors.clone(),
        }))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PanelEval {
    html: String,
    raw_text: String,
}

/// A contact overlay backed by a live tab.
pub struct ChromiumOverlay {
    page: Page,
    selectors: SelectorSet,
}

#[async_trait]
impl OverlaySurface for ChromiumOverlay {
    async fn is_closed(&self) -> bool {
        // Evaluation failing on the liveness probe means the tab is gone.
        self.page.evaluate(js_scripts::LIVENESS_SCRIPT).await.is_err()
    }

    async fn challenge_present(&self) -> Result<bool> {
        let script = js_scripts::challenge_script(&self.selectors.challenge_markers);
        let js_result = self
            .page
            .evaluate(script)
            .await
            .context("Failed to execute challenge detection script")?;

        let present: bool = js_result
            .into_value()
            .context("Failed to parse challenge detection result")?;
        Ok(present)
    }

    async fn disclosure_state(&self) -> Result<DisclosureState> {
        let script = js_scripts::disclosure_state_script(&self.selectors.disclosure_control);
        let js_result = self
            .page
            .evaluate(script)
            .await
            .context("Failed to execute disclosure probe script")?;

        let state: String = js_result
            .into_value()
            .context("Failed to parse disclosure probe result")?;
        Ok(match state.as_str() {
            "visible" => DisclosureState::Visible,
            "hidden" => DisclosureState::Hidden,
            _ => DisclosureState::Absent,
        })
    }

    async fn click_disclosure(&self) -> Result<()> {
        let script = js_scripts::click_disclosure_script(&self.selectors.disclosure_control);
        self.page
            .evaluate(script)
            .await
            .context("Failed to dispatch disclosure click")?;
        Ok(())
    }

    async fn contact_panel(&self) -> Result<Option<PanelSnapshot>> {
        let script = js_scripts::contact_panel_script(
            &self.selectors.panel_primary,
            &self.selectors.panel_fallback,
        );
        let js_result = self
            .page
            .evaluate(script)
            .await
            .context("Failed to execute contact panel snapshot script")?;

        let snapshot: Option<PanelEval> = js_result
            .into_value()
            .context("Failed to parse contact panel snapshot")?;
        Ok(snapshot.map(|p| PanelSnapshot {
            html: p.html,
            raw_text: p.raw_text,
        }))
    }

    async fn close(&self) -> Result<()> {
        if let Err(e) = self.page.clone().close().await {
            debug!("Overlay close returned error (tab may already be gone): {e}");
        }
        Ok(())
    }
}
