//! Per-key request rate limiting.
//!
//! Keyed by the base32 text of the requester's public key, not the network
//! address: the quota is tied to the provable identity. Consulted after
//! signature verification (a forger cannot drain someone else's quota) and
//! before any record-store I/O.

use std::num::NonZeroU32;
use std::time::Duration;

use governor::clock::{Clock, DefaultClock};
use governor::middleware::NoOpMiddleware;
use governor::state::keyed::DashMapStateStore;
use governor::{Quota, RateLimiter};

/// Keyed rate limiter: at most `max_requests` per key per `window`.
///
/// Backed by governor's keyed GCRA state. Cells replenish one per full
/// `window`, so no trailing window of that length ever admits more than
/// `max_requests` from one key, however the arrivals are spaced.
pub struct KeyRateLimiter<C: Clock = DefaultClock> {
    limiter: RateLimiter<String, DashMapStateStore<String>, C, NoOpMiddleware<C::Instant>>,
}

impl KeyRateLimiter {
    /// Limiter on the system clock.
    #[must_use]
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self::with_clock(max_requests, window, &DefaultClock::default())
    }
}

impl<C: Clock + Clone> KeyRateLimiter<C> {
    /// Limiter on an injected clock, for tests.
    #[must_use]
    pub fn with_clock(max_requests: u32, window: Duration, clock: &C) -> Self {
        let burst = NonZeroU32::new(max_requests).unwrap_or(NonZeroU32::MIN);
        let quota = Quota::with_period(window.max(Duration::from_millis(1)))
            .expect("nonzero window")
            .allow_burst(burst);
        Self {
            limiter: RateLimiter::dashmap_with_clock(quota, clock.clone()),
        }
    }

    /// Record an attempt for `key`; returns true when the cap is reached
    /// and the request must be rejected.
    pub fn check(&self, key: &str) -> bool {
        self.limiter.check_key(&key.to_string()).is_err()
    }
}
