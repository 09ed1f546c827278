//! Wall-clock pacing for real-time runs.
//!
//! The reactor itself has no notion of time; a tick is a tick. Real-time
//! drivers use a [`TickClock`] to decide when the next tick is due.

use std::time::{Duration, Instant};

use crate::error::{DriverError, DriverResult};

/// Tick rate configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickRate {
    period: Duration,
}

impl TickRate {
    /// Create a tick rate from ticks per second (must be positive).
    pub fn from_tps(tps: f64) -> DriverResult<Self> {
        if !(tps.is_finite() && tps > 0.0) {
            return Err(DriverError::InvalidConfig {
                what: "ticks_per_second must be positive",
            });
        }
        Ok(Self {
            period: Duration::from_secs_f64(1.0 / tps),
        })
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn tps(&self) -> f64 {
        1.0 / self.period.as_secs_f64()
    }
}

/// Tracks when the next tick should run.
#[derive(Debug, Clone)]
pub struct TickClock {
    pub rate: TickRate,
    pub next_tick: Instant,
}

impl TickClock {
    /// The first tick is due one period after `now`.
    pub fn new(rate: TickRate, now: Instant) -> Self {
        Self {
            rate,
            next_tick: now + rate.period,
        }
    }

    pub fn should_tick(&self, now: Instant) -> bool {
        now >= self.next_tick
    }

    /// Schedule the following tick. A clock that fell more than one period
    /// behind resyncs to `now` instead of bursting to catch up.
    pub fn advance(&mut self, now: Instant) {
        self.next_tick += self.rate.period;
        if self.next_tick + self.rate.period < now {
            self.next_tick = now + self.rate.period;
        }
    }

    pub fn reset(&mut self, now: Instant) {
        self.next_tick = now + self.rate.period;
    }

    pub fn time_until_tick(&self, now: Instant) -> Duration {
        self.next_tick.saturating_duration_since(now)
    }
}
