//! Injected scheduler dependency for time-based suspension
//!
//! All fixed delays and polling intervals in the engine go through `Clock`,
//! so tests can substitute a manual implementation and assert on the sleep
//! schedule instead of waiting on real time.

use async_trait::async_trait;
use std::time::Duration;

/// Source of time-based suspension for the engine.
#[async_trait]
pub trait Clock: Send + Sync {
    /// Suspend the current logical thread of control for `duration`.
    async fn sleep(&self, duration: Duration);
}

/// Clock backed by the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

#[async_trait]
impl Clock for TokioClock {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
