//! Frame loop with operator controls.
//!
//! [`run_simulation`] drives an engine at the operator's frame interval,
//! with support for:
//!
//! - **Bounded runs**: stop after `max_ticks`
//! - **Pause/resume**: the operator can halt and continue the loop
//! - **Variable frame rate**: the interval is adjustable at runtime
//! - **Operator stop**: clean exit on request (Ctrl-C in the binary)
//!
//! After every tick a [`FrameCallback`] sees the summary and the read-only
//! agent state. This is where a renderer hooks in.

use std::sync::Arc;

use tracing::info;

use crate::engine::{SimulationEngine, TickSummary};
use crate::operator::{OperatorState, SimulationEndReason};
use crate::random::RandomSource;
use crate::world::Agent;

/// Result of a frame-loop run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationResult {
    /// Why the loop ended.
    pub end_reason: SimulationEndReason,
    /// Ticks executed by this run.
    pub total_ticks: u64,
    /// Notable events emitted during this run.
    pub events_emitted: u64,
}

/// Callback invoked after each frame.
pub trait FrameCallback: Send {
    /// Called with the summary of the tick that just ran and the current swarm.
    fn on_frame(&mut self, summary: &TickSummary, agents: &[Agent]);
}

/// A callback that does nothing.
pub struct NoOpCallback;

impl FrameCallback for NoOpCallback {
    fn on_frame(&mut self, _summary: &TickSummary, _agents: &[Agent]) {}
}

/// Run the frame loop until the tick limit is reached or a stop is requested.
pub async fn run_simulation<R: RandomSource>(
    engine: &mut SimulationEngine<R>,
    operator: &Arc<OperatorState>,
    callback: &mut dyn FrameCallback,
) -> SimulationResult {
    let mut total_ticks: u64 = 0;
    let mut events_emitted: u64 = 0;

    info!(
        max_ticks = operator.max_ticks(),
        tick_interval_ms = operator.tick_interval_ms(),
        schema_ready = engine.schema_ready(),
        "Simulation starting"
    );

    loop {
        // --- Check pause ---
        if operator.is_paused() {
            info!("Simulation paused, waiting for resume...");
            operator.wait_if_paused().await;
            info!("Simulation resumed");
        }

        // --- Check stop request (before tick) ---
        if operator.is_stop_requested() {
            info!("Operator stop requested");
            return finish(
                operator,
                SimulationEndReason::OperatorStop,
                total_ticks,
                events_emitted,
            )
            .await;
        }

        // --- Execute tick ---
        let summary = engine.tick();
        total_ticks = total_ticks.saturating_add(1);
        if summary.event.is_some() {
            events_emitted = events_emitted.saturating_add(1);
        }

        // --- Notify callback ---
        callback.on_frame(&summary, engine.agents());

        // --- Check tick limit (after tick) ---
        if operator.tick_limit_reached(summary.tick) {
            info!(
                tick = summary.tick,
                max_ticks = operator.max_ticks(),
                "Tick limit reached"
            );
            return finish(
                operator,
                SimulationEndReason::MaxTicksReached,
                total_ticks,
                events_emitted,
            )
            .await;
        }

        // --- Sleep for frame interval ---
        let interval_ms = operator.tick_interval_ms();
        if interval_ms > 0 {
            tokio::time::sleep(tokio::time::Duration::from_millis(interval_ms)).await;
        } else {
            tokio::task::yield_now().await;
        }
    }
}

async fn finish(
    operator: &OperatorState,
    end_reason: SimulationEndReason,
    total_ticks: u64,
    events_emitted: u64,
) -> SimulationResult {
    operator.set_end_reason(end_reason).await;
    SimulationResult {
        end_reason,
        total_ticks,
        events_emitted,
    }
}

/// Log the end of a run.
pub fn log_simulation_end(result: &SimulationResult) {
    info!(
        reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        events_emitted = result.events_emitted,
        "Simulation ended"
    );
}
