use std::{fmt::Debug, time::Duration};

use async_trait::async_trait;
use tokio::{sync::Mutex, time::Instant};
use tracing::debug;

/// Paces outbound calls to the generation service.
#[async_trait]
pub trait RateGovernor: Send + Sync + Debug {
    /// Wait until the next call may be issued
    async fn acquire(&self);

    /// Mark the call issued after the last `acquire` as finished
    async fn complete(&self) {}
}

/// Enforces a minimum pause between the end of one call and the start of the next.
///
/// The first acquisition never waits. Without a `complete`, the interval
/// counts from the previous acquisition instead.
#[derive(Debug)]
pub struct MinIntervalGovernor {
    interval: Duration,
    last: Mutex<Option<Instant>>,
}

impl MinIntervalGovernor {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: Mutex::new(None),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

#[async_trait]
impl RateGovernor for MinIntervalGovernor {
    async fn acquire(&self) {
        let mut last = self.last.lock().await;
        if let Some(previous) = *last {
            let ready_at = previous + self.interval;
            if ready_at > Instant::now() {
                debug!(
                    target: "itinerary::pipeline",
                    wait_ms = (ready_at - Instant::now()).as_millis() as u64,
                    "pacing generation call"
                );
                tokio::time::sleep_until(ready_at).await;
            }
        }
        *last = Some(Instant::now());
    }

    async fn complete(&self) {
        *self.last.lock().await = Some(Instant::now());
    }
}

/// No pacing at all; for tests and local fakes.
#[derive(Debug, Default, Clone, Copy)]
pub struct Unthrottled;

#[async_trait]
impl RateGovernor for Unthrottled {
    async fn acquire(&self) {}
}
