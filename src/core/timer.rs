//! Fixed-Step Tick Gate
//!
//! Decides whether enough wall-clock time has passed for the next tick.
//! Missed ticks are skipped, never replayed in a burst.

use std::time::{Duration, Instant};

/// Gate allowing one tick per `interval`.
#[derive(Clone, Debug)]
pub struct FixedStepTimer {
    interval: Duration,
    last_tick: Option<Instant>,
}

impl FixedStepTimer {
    /// Create a timer for the given tick interval.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_tick: None,
        }
    }

    /// Interval between ticks.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Returns true (and consumes the slot) when a tick may run at `now`.
    ///
    /// The first poll always succeeds. Early polls are no-ops.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.last_tick {
            Some(last) if now.saturating_duration_since(last) < self.interval => false,
            _ => {
                self.last_tick = Some(now);
                true
            }
        }
    }

    /// Forget the last tick so the next poll fires immediately.
    pub fn reset(&mut self) {
        self.last_tick = None;
    }
}
