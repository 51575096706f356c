//! Synthetic notable events.
//!
//! Each tick the engine rolls once against the configured probability. A
//! successful roll only produces an event when the publishing side has
//! reported its schema ready. The roll happens either way, so the random
//! stream (and therefore the flock) evolves identically whether or not a
//! publisher is attached.

use glam::Vec3;
use skyswarm_types::{NotableEvent, NotableEventKind};

use crate::random::RandomSource;
use crate::world::Agent;

/// Exclusive upper bound of the random nonce attached to each event.
pub const NONCE_RANGE: u32 = 1_000_000;

/// Roll the per-tick event trigger.
///
/// Always consumes exactly one random value.
pub fn roll_trigger(rng: &mut dyn RandomSource, probability: f32, schema_ready: bool) -> bool {
    let hit = rng.chance(probability);
    hit && schema_ready
}

/// Pick one drone and one kind uniformly and build the event record.
///
/// Returns `None` for an empty population.
pub fn synthesize(
    agents: &[Agent],
    rng: &mut dyn RandomSource,
    timestamp_ms: i64,
) -> Option<NotableEvent> {
    if agents.is_empty() {
        return None;
    }
    let agent = agents.get(rng.index(agents.len()))?;
    let kind = NotableEventKind::ALL
        .get(rng.index(NotableEventKind::ALL.len()))
        .copied()?;
    let message = describe(kind, agent.position, rng);
    Some(NotableEvent {
        event_type: kind,
        message,
        timestamp: timestamp_ms,
        drone_id: agent.id.clone(),
        nonce: u64::from(rng.below(NONCE_RANGE)),
    })
}

/// Human-readable message for `kind`, with randomized kind-specific content.
pub fn describe(kind: NotableEventKind, position: Vec3, rng: &mut dyn RandomSource) -> String {
    match kind {
        NotableEventKind::CollisionAvoided => {
            format!(
                "Rerouting to avoid obstacle at {:.1}, {:.1}",
                position.x, position.z
            )
        }
        NotableEventKind::PackageDelivered => {
            format!("Delivery confirmed at sector {}", rng.below(10))
        }
        NotableEventKind::BatteryLow => {
            format!("Battery level at {}%. Returning to base.", rng.below(20))
        }
        NotableEventKind::NetworkLatency => {
            format!(
                "Latency spike detected: {}ms",
                rng.below(100).saturating_add(50)
            )
        }
        NotableEventKind::BlockSync => {
            format!("Consensus reached on Block #{}", rng.below(1_000_000))
        }
    }
}
