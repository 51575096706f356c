//! Frame callback that publishes the latest swarm snapshot.
//!
//! After each tick the callback refreshes a shared [`FrameSnapshot`] that a
//! renderer (or anything else) can read without touching the engine, and
//! periodically logs a one-line flock summary.

use std::sync::Arc;

use skyswarm_core::flocking::mean_heading;
use skyswarm_core::world::{Agent, to_vector3};
use skyswarm_core::{FrameCallback, TickSummary};
use skyswarm_types::FrameSnapshot;
use tokio::sync::RwLock;
use tracing::debug;

/// Callback that mirrors every frame into a shared snapshot.
pub struct SnapshotCallback {
    latest: Arc<RwLock<FrameSnapshot>>,
    max_speed: f32,
    log_every: u64,
}

impl SnapshotCallback {
    /// Mirror frames into `latest`, logging a summary every `log_every` ticks
    /// (0 disables the summary).
    pub const fn new(latest: Arc<RwLock<FrameSnapshot>>, max_speed: f32, log_every: u64) -> Self {
        Self {
            latest,
            max_speed,
            log_every,
        }
    }
}

impl FrameCallback for SnapshotCallback {
    fn on_frame(&mut self, summary: &TickSummary, agents: &[Agent]) {
        // try_write keeps the frame loop from blocking on a slow reader; a
        // skipped frame is replaced by the next one.
        if let Ok(mut snap) = self.latest.try_write() {
            snap.tick = summary.tick;
            snap.agents.clear();
            snap.agents.extend(agents.iter().map(Agent::snapshot));
        }

        if summary.tick.checked_rem(self.log_every) == Some(0) {
            let heading = to_vector3(mean_heading(agents, self.max_speed));
            debug!(
                tick = summary.tick,
                out_of_bounds = summary.out_of_bounds,
                heading_x = heading.x,
                heading_y = heading.y,
                heading_z = heading.z,
                "Frame summary"
            );
        }
    }
}
