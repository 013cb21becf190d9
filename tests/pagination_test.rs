//! Pagination loop semantics: page walking, counters, partial results and
//! run-completion events.

mod common;

use common::{FakeListing, FakeOpener, FakeOverlay, ManualClock, contact_panel_fragment, entry_fragment};
use std::sync::Arc;
use std::time::Duration;

use profile_harvest::harvest_engine::{
    ContactInfoFetcher, HarvestPhase, HarvestSession, NoOpProgress, PageHarvester,
    PaginationController,
};
use profile_harvest::{CompiledSelectors, HarvestConfig, HarvestEvent, HarvestEventBus};

fn test_config(bus: Option<Arc<HarvestEventBus>>) -> HarvestConfig {
    let config = HarvestConfig::builder()
        .start_url("https://example.com/search/results/people/")
        .build()
        .unwrap();
    match bus {
        Some(bus) => config.with_event_bus(bus),
        None => config,
    }
}

async fn run(
    config: &HarvestConfig,
    clock: Arc<ManualClock>,
    listing: &FakeListing,
    opener: &FakeOpener,
) -> (HarvestSession, Result<(), anyhow::Error>) {
    let selectors = CompiledSelectors::compile(config.selectors()).unwrap();
    let fetcher = ContactInfoFetcher::new(config.clone(), selectors.clone(), clock.clone());
    let harvester = PageHarvester::new(config, &selectors, &fetcher);
    let controller = PaginationController::new(config, clock);

    let mut session = HarvestSession::new();
    session.begin().unwrap();
    let outcome = controller
        .run(listing, opener, &harvester, &mut session, &NoOpProgress)
        .await;
    (session, outcome)
}

fn drain(receiver: &mut tokio::sync::broadcast::Receiver<HarvestEvent>) -> Vec<HarvestEvent> {
    let mut events = Vec::new();
    while let Ok(event) = receiver.try_recv() {
        events.push(event);
    }
    events
}

#[tokio::test]
async fn test_single_page_run_counts_and_publishes() {
    let bus = Arc::new(HarvestEventBus::new(64));
    let mut events = bus.subscribe();
    let config = test_config(Some(Arc::clone(&bus)));
    let clock = Arc::new(ManualClock::new());

    let listing = FakeListing::new(vec![vec![
        entry_fragment("urn:li:member:1", "Ada Lovelace", "1st", "https://example.com/in/ada"),
        entry_fragment("urn:li:member:2", "Charles Babbage", "2nd", ""),
    ]]);
    let panel = contact_panel_fragment("ada@example.com", "+44 123");
    let opener = FakeOpener::new(vec![Arc::new(FakeOverlay::ready(&panel, "raw"))]);

    let (session, outcome) = run(&config, clock, &listing, &opener).await;
    assert!(outcome.is_ok());
    assert_eq!(session.phase(), HarvestPhase::Done);
    assert_eq!(session.total_scraped(), 2);
    assert_eq!(session.vip_scraped(), 1);
    assert!(session.vip_scraped() <= session.total_scraped());

    // The address-less entry never triggered a contact fetch.
    assert_eq!(opener.opened_urls.lock().unwrap().len(), 1);

    let records = session.records();
    assert_eq!(records[0].contact_info.get("email").unwrap(), "ada@example.com");
    assert!(!records[0].contact_info_error);
    assert!(records[1].contact_info.is_empty());
    assert!(!records[1].contact_info_error);

    let events = drain(&mut events);
    let profile_scraped: Vec<_> = events
        .iter()
        .filter(|e| matches!(e, HarvestEvent::ProfileScraped { .. }))
        .collect();
    assert_eq!(profile_scraped.len(), 1);

    let all = events
        .iter()
        .find_map(|e| match e {
            HarvestEvent::AllProfilesScraped { profiles, .. } => Some(profiles),
            _ => None,
        })
        .expect("run completion event missing");
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].email, "ada@example.com");
    assert_eq!(all[1].email, "");
}

#[tokio::test]
async fn test_multi_page_run_walks_until_next_control_disappears() {
    let config = test_config(None);
    let clock = Arc::new(ManualClock::new());

    let listing = FakeListing::new(vec![
        vec![entry_fragment("urn:li:member:1", "A", "2nd", "")],
        vec![entry_fragment("urn:li:member:2", "B", "2nd", "")],
        vec![entry_fragment("urn:li:member:3", "C", "1st", "")],
    ]);
    let opener = FakeOpener::default();

    let (session, outcome) = run(&config, Arc::clone(&clock), &listing, &opener).await;
    assert!(outcome.is_ok());
    assert_eq!(session.total_scraped(), 3);
    assert_eq!(session.vip_scraped(), 1);

    // One navigation settle per page transition.
    let settles = clock
        .sleeps()
        .iter()
        .filter(|d| **d == Duration::from_millis(3000))
        .count();
    assert_eq!(settles, 2);
    // Each page is scrolled before harvesting.
    assert_eq!(listing.scrolls.load(std::sync::atomic::Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_mid_run_failure_keeps_partial_records() {
    let bus = Arc::new(HarvestEventBus::new(64));
    let mut events = bus.subscribe();
    let config = test_config(Some(bus));
    let clock = Arc::new(ManualClock::new());

    let listing = FakeListing::failing_on_page(
        vec![
            vec![entry_fragment("urn:li:member:1", "A", "1st", "")],
            vec![entry_fragment("urn:li:member:2", "B", "2nd", "")],
        ],
        1,
    );
    let opener = FakeOpener::default();

    let (session, outcome) = run(&config, clock, &listing, &opener).await;
    assert!(outcome.is_err());
    assert_eq!(session.phase(), HarvestPhase::Errored);
    assert_eq!(session.total_scraped(), 1);
    assert_eq!(session.records().len(), 1);

    // Partial results are still published.
    let events = drain(&mut events);
    let all = events
        .iter()
        .find_map(|e| match e {
            HarvestEvent::AllProfilesScraped { profiles, .. } => Some(profiles),
            _ => None,
        })
        .expect("partial results should be published");
    assert_eq!(all.len(), 1);
}

#[tokio::test]
async fn test_failure_with_nothing_harvested_publishes_nothing() {
    let bus = Arc::new(HarvestEventBus::new(64));
    let mut events = bus.subscribe();
    let config = test_config(Some(bus));
    let clock = Arc::new(ManualClock::new());

    let listing = FakeListing::failing_on_page(vec![vec![]], 0);
    let opener = FakeOpener::default();

    let (session, outcome) = run(&config, clock, &listing, &opener).await;
    assert!(outcome.is_err());
    assert_eq!(session.phase(), HarvestPhase::Errored);
    assert!(session.records().is_empty());
    assert!(drain(&mut events).is_empty());
}

#[tokio::test]
async fn test_fetch_failure_is_recorded_on_the_entry_not_the_run() {
    let config = test_config(None);
    let clock = Arc::new(ManualClock::new());

    let listing = FakeListing::new(vec![vec![entry_fragment(
        "urn:li:member:1",
        "Ada Lovelace",
        "1st",
        "https://example.com/in/ada",
    )]]);
    // Panel never renders: the fetch times out but the run succeeds.
    let opener = FakeOpener::new(vec![Arc::new(FakeOverlay::never_ready())]);

    let (session, outcome) = run(&config, clock, &listing, &opener).await;
    assert!(outcome.is_ok());
    assert_eq!(session.phase(), HarvestPhase::Done);

    let record = &session.records()[0];
    assert!(record.contact_info_error);
    assert_eq!(record.error_reason, "Contact section not found after click");
    assert!(record.contact_info.is_empty());
}
