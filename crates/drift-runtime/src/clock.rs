#![forbid(unsafe_code)]

//! Monotonic time sources.

use std::time::Duration;

/// Monotonic time since the clock's origin.
pub trait Clock {
    fn now(&self) -> Duration;

    /// [`Clock::now`] in fractional milliseconds.
    fn now_ms(&self) -> f64 {
        self.now().as_nanos() as f64 / 1_000_000.0
    }
}

/// Host-driven clock: time only moves when told to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeterministicClock {
    now: Duration,
}

impl DeterministicClock {
    /// Create a clock starting at `0`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now: Duration::ZERO,
        }
    }

    /// Set current monotonic time.
    pub fn set(&mut self, now: Duration) {
        self.now = now;
    }

    /// Set current time from a host timestamp in milliseconds
    /// (e.g. `requestAnimationFrame`'s argument). Values that are not a
    /// representable non-negative duration are ignored.
    pub fn set_ms(&mut self, now_ms: f64) {
        if let Ok(now) = Duration::try_from_secs_f64(now_ms / 1000.0) {
            self.now = now;
        }
    }

    /// Advance monotonic time by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.now = self.now.saturating_add(dt);
    }
}

impl Clock for DeterministicClock {
    fn now(&self) -> Duration {
        self.now
    }
}

/// Wall clock backed by `web_time::Instant`, which maps to
/// `performance.now()` on wasm and `std::time::Instant` elsewhere.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: web_time::Instant,
}

impl SystemClock {
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: web_time::Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}
