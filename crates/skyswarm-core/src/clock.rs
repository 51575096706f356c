//! Frame counter for the simulation.
//!
//! The tick number is the engine's only notion of time. It starts at 0 and
//! counts completed ticks, saturating rather than wrapping at `u64::MAX`.
//! Event timestamps are taken from the wall clock, not derived from ticks.

use chrono::Utc;

/// Counts completed ticks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameClock {
    tick: u64,
}

impl FrameClock {
    /// A clock at tick 0.
    pub const fn new() -> Self {
        Self { tick: 0 }
    }

    /// Record one completed tick and return the new tick number.
    pub const fn advance(&mut self) -> u64 {
        self.tick = self.tick.saturating_add(1);
        self.tick
    }

    /// Number of completed ticks.
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Current wall-clock time in Unix milliseconds.
    pub fn now_millis() -> i64 {
        Utc::now().timestamp_millis()
    }
}
