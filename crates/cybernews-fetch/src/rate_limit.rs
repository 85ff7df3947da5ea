//! Per-domain request spacing.
//!
//! Each domain owns its own async slot holding the instant of its last
//! request. A caller locks the slot, sleeps out whatever remains of the
//! minimum interval, stamps the slot, and releases it, so two requests to the
//! same domain can never both observe a stale timestamp. Different domains
//! never wait on each other.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::time::Instant;

use crate::normalize::domain_of;

/// Floor applied to the configured rate so a zero or negative value cannot
/// produce an infinite interval.
const MIN_RPS: f64 = 0.001;

type Slot = Arc<tokio::sync::Mutex<Option<Instant>>>;

#[derive(Debug)]
pub struct DomainRateLimiter {
    min_interval: Duration,
    slots: Mutex<HashMap<String, Slot>>,
}

impl DomainRateLimiter {
    /// Creates a limiter allowing at most `rps` requests per second per domain.
    #[must_use]
    pub fn new(rps: f64) -> Self {
        Self {
            min_interval: Duration::from_secs_f64(1.0 / rps.max(MIN_RPS)),
            slots: Mutex::new(HashMap::new()),
        }
    }

    #[must_use]
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    fn slot(&self, domain: &str) -> Slot {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(slots.entry(domain.to_owned()).or_default())
    }

    /// Suspends until a request to `url`'s domain is allowed, then records
    /// the request as happening now.
    pub async fn wait_for(&self, url: &str) {
        let domain = domain_of(url);
        let slot = self.slot(&domain);
        let mut last = slot.lock().await;

        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.min_interval {
                let remaining = self.min_interval.saturating_sub(elapsed);
                tracing::debug!(
                    domain = %domain,
                    wait_ms = u64::try_from(remaining.as_millis()).unwrap_or(u64::MAX),
                    "rate limiting request"
                );
                tokio::time::sleep(remaining).await;
            }
        }

        *last = Some(Instant::now());
    }
}

impl Default for DomainRateLimiter {
    /// 0.5 requests per second, i.e. one request every two seconds per domain.
    fn default() -> Self {
        Self::new(0.5)
    }
}
