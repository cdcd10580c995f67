//! Call pacing.
//!
//! VK limits user-scoped tokens to 3 requests per second. A `Session` asks
//! its limiter for permission before every call, so bulk commands get the
//! spacing without sleeping at the call site.

use std::thread;
use std::time::{Duration, Instant};

use tracing::trace;

/// Minimum spacing between calls made with a user token.
pub const USER_TOKEN_INTERVAL: Duration = Duration::from_millis(500);

pub trait RateLimiter {
    /// Block until the next call may start.
    fn acquire(&mut self);
}

/// Never waits.
#[derive(Debug, Default, Clone, Copy)]
pub struct Unthrottled;

impl RateLimiter for Unthrottled {
    fn acquire(&mut self) {}
}

/// Fixed-interval gate: consecutive acquisitions return at least `interval`
/// apart. The first acquisition never waits.
#[derive(Debug, Clone)]
pub struct IntervalGate {
    interval: Duration,
    last: Option<Instant>,
}

impl IntervalGate {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// How long an acquisition at `now` would have to wait.
    fn delay_at(&self, now: Instant) -> Duration {
        match self.last {
            Some(last) => self.interval.saturating_sub(now.saturating_duration_since(last)),
            None => Duration::ZERO,
        }
    }
}

impl Default for IntervalGate {
    fn default() -> Self {
        Self::new(USER_TOKEN_INTERVAL)
    }
}

impl RateLimiter for IntervalGate {
    fn acquire(&mut self) {
        let delay = self.delay_at(Instant::now());
        if !delay.is_zero() {
            trace!(?delay, "rate limit");
            thread::sleep(delay);
        }
        self.last = Some(Instant::now());
    }
}
