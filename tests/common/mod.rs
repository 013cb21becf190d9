//! Test utilities and fakes for the profile-harvest test suite

use anyhow::{Result, bail};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use profile_harvest::harvest_engine::Clock;
use profile_harvest::page_surface::{
    DisclosureState, ListingSurface, OverlayOpener, OverlaySurface, PanelSnapshot,
};

/// Clock that never waits; it records the requested sleep schedule instead.
#[derive(Debug, Default)]
pub struct ManualClock {
    sleeps: Mutex<Vec<Duration>>,
}

impl ManualClock {
    #[allow(dead_code)]
    pub fn new() -> Self {
        Self::default()
    }

    #[allow(dead_code)]
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }

    #[allow(dead_code)]
    pub fn sleep_count(&self) -> usize {
        self.sleeps.lock().unwrap().len()
    }
}

#[async_trait]
impl Clock for ManualClock {
    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
    }
}

/// Scripted contact overlay.
///
/// Tick-indexed knobs compare against per-method call counters, so a value
/// of `Some(0)` triggers on the first poll tick.
#[derive(Debug, Default)]
pub struct FakeOverlay {
    pub closed_at_tick: Option<u32>,
    pub challenge_at_tick: Option<u32>,
    /// One state per `disclosure_state` call; exhausted means absent.
    pub disclosure_states: Mutex<VecDeque<DisclosureState>>,
    /// Panel returned once `contact_panel` has been called this many times.
    pub panel_ready_after: u32,
    pub panel: Option<PanelSnapshot>,

    pub clicks: AtomicU32,
    pub disclosure_probes: AtomicU32,
    pub closed: AtomicBool,
    pub is_closed_calls: AtomicU32,
    pub challenge_calls: AtomicU32,
    pub panel_calls: AtomicU32,
}

impl FakeOverlay {
    /// Overlay whose panel is ready immediately.
    #[allow(dead_code)]
    pub fn ready(html: &str, raw_text: &str) -> Self {
        Self {
            panel: Some(PanelSnapshot {
                html: html.to_string(),
                raw_text: raw_text.to_string(),
            }),
            ..Self::default()
        }
    }

    /// Overlay whose panel never renders.
    #[allow(dead_code)]
    pub fn never_ready() -> Self {
        Self::default()
    }

    #[allow(dead_code)]
    pub fn with_disclosure(self, states: Vec<DisclosureState>) -> Self {
        *self.disclosure_states.lock().unwrap() = states.into();
        self
    }
}

pub struct SharedOverlay(pub Arc<FakeOverlay>);

#[async_trait]
impl OverlaySurface for SharedOverlay {
    async fn is_closed(&self) -> bool {
        let call = self.0.is_closed_calls.fetch_add(1, Ordering::SeqCst);
        self.0.closed_at_tick.is_some_and(|t| call >= t)
    }

    async fn challenge_present(&self) -> Result<bool> {
        let call = self.0.challenge_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.0.challenge_at_tick.is_some_and(|t| call >= t))
    }

    async fn disclosure_state(&self) -> Result<DisclosureState> {
        self.0.disclosure_probes.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .0
            .disclosure_states
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(DisclosureState::Absent))
    }

    async fn click_disclosure(&self) -> Result<()> {
        self.0.clicks.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn contact_panel(&self) -> Result<Option<PanelSnapshot>> {
        let call = self.0.panel_calls.fetch_add(1, Ordering::SeqCst);
        if call >= self.0.panel_ready_after {
            Ok(self.0.panel.clone())
        } else {
            Ok(None)
        }
    }

    async fn close(&self) -> Result<()> {
        self.0.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

/// Opener that hands out pre-scripted overlays in order.
#[derive(Default)]
pub struct FakeOpener {
    overlays: Mutex<VecDeque<Arc<FakeOverlay>>>,
    pub refuse: bool,
    pub opened_urls: Mutex<Vec<String>>,
}

impl FakeOpener {
    #[allow(dead_code)]
    pub fn new(overlays: Vec<Arc<FakeOverlay>>) -> Self {
        Self {
            overlays: Mutex::new(overlays.into()),
            refuse: false,
            opened_urls: Mutex::new(Vec::new()),
        }
    }

    #[allow(dead_code)]
    pub fn refusing() -> Self {
        Self {
            refuse: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl OverlayOpener for FakeOpener {
    async fn open(&self, url: &str) -> Result<Box<dyn OverlaySurface>> {
        if self.refuse {
            bail!("window.open returned null");
        }
        self.opened_urls.lock().unwrap().push(url.to_string());
        let overlay = self
            .overlays
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Arc::new(FakeOverlay::never_ready()));
        Ok(Box::new(SharedOverlay(overlay)))
    }
}

/// Listing with a fixed sequence of pages of entry fragments.
#[derive(Default)]
pub struct FakeListing {
    pages: Vec<Vec<String>>,
    index: AtomicUsize,
    pub scrolls: AtomicU32,
    /// Page index whose enumeration fails, simulating a mid-run fault.
    pub fail_on_page: Option<usize>,
}

impl FakeListing {
    #[allow(dead_code)]
    pub fn new(pages: Vec<Vec<String>>) -> Self {
        Self {
            pages,
            ..Self::default()
        }
    }

    #[allow(dead_code)]
    pub fn failing_on_page(pages: Vec<Vec<String>>, page: usize) -> Self {
        Self {
            pages,
            fail_on_page: Some(page),
            ..Self::default()
        }
    }
}

#[async_trait]
impl ListingSurface for FakeListing {
    async fn scroll_to_bottom(&self) -> Result<()> {
        self.scrolls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn entry_fragments(&self) -> Result<Vec<String>> {
        let index = self.index.load(Ordering::SeqCst);
        if self.fail_on_page == Some(index) {
            bail!("listing enumeration failed");
        }
        Ok(self.pages.get(index).cloned().unwrap_or_default())
    }

    async fn advance_page(&self) -> Result<bool> {
        let index = self.index.load(Ordering::SeqCst);
        if index + 1 < self.pages.len() {
            self.index.store(index + 1, Ordering::SeqCst);
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

/// Listing entry fragment in the shape the default selectors expect.
#[allow(dead_code)]
pub fn entry_fragment(urn: &str, name: &str, degree: &str, profile_url: &str) -> String {
    let link = if profile_url.is_empty() {
        String::new()
    } else {
        format!(r#"<a data-test-app-aware-link href="{profile_url}"></a>"#)
    };
    format!(
        r#"<div data-chameleon-result-urn="{urn}">
          {link}
          <span class="entity-result__title"><span aria-hidden="true">{name}</span></span>
          <span class="entity-result__badge-text"><span aria-hidden="true">{degree}</span></span>
          <div class="t-14 t-black t-normal">Engineer</div>
          <div class="t-14 t-normal">London</div>
        </div>"#
    )
}

/// Contact panel fragment with an email link and a phone span.
#[allow(dead_code)]
pub fn contact_panel_fragment(email: &str, phone: &str) -> String {
    format!(
        r#"<section class="pv-contact-info">
          <div class="pv-contact-info__contact-type">
            <h3 class="pv-contact-info__header">Email</h3>
            <a href="mailto:{email}">{email}</a>
          </div>
          <div class="pv-contact-info__contact-type">
            <h3 class="pv-contact-info__header">Phone</h3>
            <span>{phone}</span>
          </div>
        </section>"#
    )
}
