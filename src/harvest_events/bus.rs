//! Event bus implementation for publishing and subscribing to harvest events
//!
//! The bus carries the engine's fire-and-forget notifications. Publishing is
//! best-effort: a publish failure is recorded in the metrics and logged by
//! the caller, never treated as fatal to the run.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::broadcast;

use super::errors::EventBusError;
use super::metrics::EventBusMetrics;
use super::types::{HarvestEvent, ShutdownReason};

/// Event bus for publishing and subscribing to harvest events
#[derive(Debug)]
pub struct HarvestEventBus {
    sender: broadcast::Sender<HarvestEvent>,
    metrics: EventBusMetrics,
    shutdown_flag: Arc<AtomicBool>,
}

impl HarvestEventBus {
    /// Create a new event bus with the specified capacity
    ///
    /// # Arguments
    /// * `capacity` - Maximum number of events that can be buffered
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            metrics: EventBusMetrics::new(),
            shutdown_flag: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Get current metrics
    ///
    /// Individual counter reads are atomic; for a consistent view across
    /// all counters use `metrics().snapshot()`.
    #[must_use]
    pub fn metrics(&self) -> &EventBusMetrics {
        &self.metrics
    }

    /// Subscribe to all events
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<HarvestEvent> {
        let receiver = self.sender.subscribe();
        self.metrics.update_subscriber_count(self.sender.receiver_count());
        receiver
    }

    /// Number of currently active subscribers
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Whether any subscriber is attached
    #[must_use]
    pub fn has_subscribers(&self) -> bool {
        self.sender.receiver_count() > 0
    }

    /// Whether the bus has been shut down
    #[must_use]
    pub fn is_shutdown(&self) -> bool {
        self.shutdown_flag.load(Ordering::Acquire)
    }

    /// Publish an event to all subscribers
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of active subscribers that received the event
    /// * `Err(EventBusError)` - If publishing failed
    pub async fn publish(&self, event: HarvestEvent) -> Result<usize, EventBusError> {
        if self.is_shutdown() {
            self.metrics.increment_failed();
            return Err(EventBusError::Shutdown);
        }

        if let Ok(subscriber_count) = self.sender.send(event) {
            self.metrics.increment_published();
            self.metrics.update_subscriber_count(subscriber_count);
            Ok(subscriber_count)
        } else {
            self.metrics.increment_dropped();
            log::debug!("Published event but no active subscribers");
            Err(EventBusError::NoSubscribers)
        }
    }

    /// Shut the bus down, broadcasting a final `Shutdown` event
    ///
    /// Subscribers should exit their receive loops on seeing it. Further
    /// publishes return `EventBusError::Shutdown`.
    pub async fn shutdown(&self, reason: ShutdownReason) {
        if self.shutdown_flag.swap(true, Ordering::AcqRel) {
            return; // already shut down
        }
        let event = HarvestEvent::shutdown(reason);
        if self.sender.send(event).is_err() {
            log::debug!("Shutdown event had no subscribers");
        }
    }
}
