//! Operator control state for a running frame loop.
//!
//! Shared between the frame loop and whatever drives it (the binary's
//! Ctrl-C handler, tests). The operator can pause/resume, change the frame
//! interval, and request a clean stop without touching the engine itself.
//!
//! All hot-path fields are atomics so the loop never takes a lock to check
//! them.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, Notify};

/// Reason why the frame loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimulationEndReason {
    /// Reached the configured `max_ticks` limit.
    MaxTicksReached,
    /// An operator issued a stop command.
    OperatorStop,
}

/// Shared operator control state, usually held in an `Arc`.
#[derive(Debug)]
pub struct OperatorState {
    /// Whether the loop is currently paused.
    paused: AtomicBool,

    /// Wakes the loop when resumed.
    resume_notify: Notify,

    /// Whether a stop has been requested.
    stop_requested: AtomicBool,

    /// Current frame interval in milliseconds (runtime-adjustable).
    tick_interval_ms: AtomicU64,

    /// Maximum number of ticks (0 = unlimited).
    max_ticks: u64,

    /// Reason the loop ended, if it has.
    end_reason: Mutex<Option<SimulationEndReason>>,
}

impl OperatorState {
    /// Create operator state with the given frame interval and tick limit.
    pub fn new(tick_interval_ms: u64, max_ticks: u64) -> Self {
        Self {
            paused: AtomicBool::new(false),
            resume_notify: Notify::new(),
            stop_requested: AtomicBool::new(false),
            tick_interval_ms: AtomicU64::new(tick_interval_ms),
            max_ticks,
            end_reason: Mutex::new(None),
        }
    }

    // -----------------------------------------------------------------------
    // Pause / Resume
    // -----------------------------------------------------------------------

    /// Check whether the loop is paused.
    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Acquire)
    }

    /// Pause the loop. It sleeps until resumed.
    pub fn pause(&self) {
        self.paused.store(true, Ordering::Release);
    }

    /// Resume the loop and wake it.
    pub fn resume(&self) {
        self.paused.store(false, Ordering::Release);
        self.resume_notify.notify_one();
    }

    /// Wait until the loop is no longer paused or a stop is requested.
    pub async fn wait_if_paused(&self) {
        while self.paused.load(Ordering::Acquire) && !self.is_stop_requested() {
            self.resume_notify.notified().await;
        }
    }

    // -----------------------------------------------------------------------
    // Stop
    // -----------------------------------------------------------------------

    /// Request a clean stop. Also wakes a paused loop so it can exit.
    pub fn request_stop(&self) {
        self.stop_requested.store(true, Ordering::Release);
        self.resume_notify.notify_one();
    }

    /// Check whether a stop has been requested.
    pub fn is_stop_requested(&self) -> bool {
        self.stop_requested.load(Ordering::Acquire)
    }

    /// Record the reason the loop ended.
    pub async fn set_end_reason(&self, reason: SimulationEndReason) {
        let mut guard = self.end_reason.lock().await;
        *guard = Some(reason);
    }

    /// The reason the loop ended, if it has.
    pub async fn end_reason(&self) -> Option<SimulationEndReason> {
        *self.end_reason.lock().await
    }

    // -----------------------------------------------------------------------
    // Frame interval
    // -----------------------------------------------------------------------

    /// Current frame interval in milliseconds.
    pub fn tick_interval_ms(&self) -> u64 {
        self.tick_interval_ms.load(Ordering::Acquire)
    }

    /// Set the frame interval, returning the previous one.
    ///
    /// Zero runs frames back to back.
    pub fn set_tick_interval_ms(&self, ms: u64) -> u64 {
        self.tick_interval_ms.swap(ms, Ordering::AcqRel)
    }

    // -----------------------------------------------------------------------
    // Boundaries
    // -----------------------------------------------------------------------

    /// Returns `true` if `max_ticks > 0` and `current_tick >= max_ticks`.
    pub const fn tick_limit_reached(&self, current_tick: u64) -> bool {
        self.max_ticks > 0 && current_tick >= self.max_ticks
    }

    /// The configured tick limit (0 = unlimited).
    pub const fn max_ticks(&self) -> u64 {
        self.max_ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_limit_zero_is_unlimited() {
        let op = OperatorState::new(16, 0);
        assert!(!op.tick_limit_reached(u64::MAX));
    }

    #[test]
    fn tick_limit_reached_at_max() {
        let op = OperatorState::new(16, 10);
        assert!(!op.tick_limit_reached(9));
        assert!(op.tick_limit_reached(10));
    }

    #[test]
    fn pause_and_resume_toggle() {
        let op = OperatorState::new(16, 0);
        op.pause();
        assert!(op.is_paused());
        op.resume();
        assert!(!op.is_paused());
    }

    #[test]
    fn interval_swap_returns_previous() {
        let op = OperatorState::new(16, 0);
        assert_eq!(op.set_tick_interval_ms(0), 16);
        assert_eq!(op.tick_interval_ms(), 0);
    }

    #[tokio::test]
    async fn stop_wakes_paused_waiter() {
        let op = std::sync::Arc::new(OperatorState::new(16, 0));
        op.pause();
        let waiter = {
            let op = std::sync::Arc::clone(&op);
            tokio::spawn(async move { op.wait_if_paused().await })
        };
        tokio::task::yield_now().await;
        op.request_stop();
        let joined = tokio::time::timeout(std::time::Duration::from_secs(1), waiter).await;
        assert!(joined.is_ok());
    }

    #[tokio::test]
    async fn end_reason_round_trip() {
        let op = OperatorState::new(16, 0);
        assert_eq!(op.end_reason().await, None);
        op.set_end_reason(SimulationEndReason::OperatorStop).await;
        assert_eq!(op.end_reason().await, Some(SimulationEndReason::OperatorStop));
    }
}
