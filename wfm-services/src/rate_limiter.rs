//! Shared rate limiter for market API calls
//!
//! Spaces out requests so that at most one is admitted per configured
//! interval, no matter how many batch tasks are waiting.

use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::Duration,
};

use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, trace};

/// Rate limiter that enforces a minimum delay between admissions
///
/// ## Reservation-Based Scheduling
///
/// Each caller of `acquire()` reserves a distinct future slot while holding
/// the lock, then sleeps until that slot outside the lock. Two callers can
/// never be handed the same slot, so admissions stay at least `min_interval`
/// apart under any amount of contention. Slot order follows lock order, which
/// is not necessarily call order.
#[derive(Debug)]
pub struct RateLimiter {
    /// When the next admission may happen; `None` until the first caller
    next_available: Mutex<Option<Instant>>,
    min_interval: Duration,
    /// Name for logging purposes
    name: String,
    total_requests: AtomicU64,
    waited_requests: AtomicU64,
}

impl RateLimiter {
    /// Create a new rate limiter admitting one caller per `min_interval`
    pub fn new(min_interval: Duration, name: &str) -> Self {
        Self {
            next_available: Mutex::new(None),
            min_interval,
            name: name.to_string(),
            total_requests: AtomicU64::new(0),
            waited_requests: AtomicU64::new(0),
        }
    }

    /// Wait for the next admission slot
    pub async fn acquire(&self) {
        let request_num = self.total_requests.fetch_add(1, Ordering::Relaxed) + 1;

        let slot = {
            let mut next_available = self.next_available.lock().await;
            let now = Instant::now();

            let slot = match *next_available {
                Some(next) if next > now => next,
                _ => now,
            };
            *next_available = Some(slot + self.min_interval);
            slot
        };

        let wait = slot.saturating_duration_since(Instant::now());
        if wait.is_zero() {
            trace!("[RATE_LIMITER:{}] #{} admitted immediately", self.name, request_num);
            return;
        }

        self.waited_requests.fetch_add(1, Ordering::Relaxed);
        debug!(
            "[RATE_LIMITER:{}] #{} queued, waiting {:?}",
            self.name, request_num, wait
        );

        tokio::time::sleep_until(slot).await;
    }

    /// Get statistics about this rate limiter (for debugging)
    pub fn stats(&self) -> RateLimiterStats {
        RateLimiterStats {
            total_requests: self.total_requests.load(Ordering::Relaxed),
            waited_requests: self.waited_requests.load(Ordering::Relaxed),
            min_interval: self.min_interval,
            name: self.name.clone(),
        }
    }
}

/// Statistics about rate limiter usage
#[derive(Debug, Clone)]
pub struct RateLimiterStats {
    pub total_requests: u64,
    pub waited_requests: u64,
    pub min_interval: Duration,
    pub name: String,
}
