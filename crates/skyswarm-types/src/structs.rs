//! Records exchanged between the engine and its external collaborators.
//!
//! The renderer reads [`FrameSnapshot`]s, the UI log and the publisher
//! consume [`NotableEvent`]s, and the publisher reports back with
//! [`PublishReceipt`]s. None of these types carry behaviour.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::NotableEventKind;
use crate::ids::DroneId;

/// Field layout of the drone event schema used by the publishing collaborator.
pub const DRONE_EVENT_SCHEMA: &str =
    "string eventType, string message, uint64 timestamp, string droneId, uint256 nonce";

/// A plain 3D vector in world units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Vector3 {
    /// East-west axis.
    pub x: f32,
    /// Altitude.
    pub y: f32,
    /// North-south axis.
    pub z: f32,
}

impl Vector3 {
    /// Construct a vector from its components.
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// Read-only view of one drone, as consumed by the renderer each frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct AgentSnapshot {
    /// Stable drone identifier.
    pub id: DroneId,
    /// Current position.
    pub position: Vector3,
    /// Current velocity (the renderer orients the model along it).
    pub velocity: Vector3,
}

/// Read-only view of the whole swarm after a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct FrameSnapshot {
    /// Number of ticks completed when the snapshot was taken.
    pub tick: u64,
    /// One entry per drone, in population order.
    pub agents: Vec<AgentSnapshot>,
}

/// A synthetic notable event emitted by the engine for one drone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct NotableEvent {
    /// What happened.
    pub event_type: NotableEventKind,
    /// Human-readable description.
    pub message: String,
    /// Wall-clock time of emission, in Unix milliseconds.
    pub timestamp: i64,
    /// The drone the event is about.
    pub drone_id: DroneId,
    /// Random nonce in `[0, 1_000_000)` keeping otherwise equal records distinct.
    pub nonce: u64,
}

impl NotableEvent {
    /// Format the event as a single UI log line: `[AGENT-07] message`.
    pub fn log_line(&self) -> String {
        format!("[{}] {}", self.drone_id, self.message)
    }
}

/// Confirmation that a notable event was accepted by the publishing collaborator.
///
/// Carried on a separate notification channel for UI display only; the
/// engine never waits on or reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct PublishReceipt {
    /// Transaction identifier reported by the publisher.
    pub hash: String,
    /// Kind of the published event.
    pub event_type: NotableEventKind,
    /// Drone the published event was about.
    pub drone_id: DroneId,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_event() -> NotableEvent {
        NotableEvent {
            event_type: NotableEventKind::BatteryLow,
            message: String::from("Battery level at 12%. Returning to base."),
            timestamp: 1_700_000_000_000,
            drone_id: DroneId::from_index(4),
            nonce: 42,
        }
    }

    #[test]
    fn event_uses_camel_case_wire_names() {
        let value = serde_json::to_value(sample_event()).unwrap_or_default();
        assert_eq!(value["eventType"], "BATTERY_LOW");
        assert_eq!(value["droneId"], "AGENT-04");
        assert_eq!(value["timestamp"], 1_700_000_000_000_i64);
        assert_eq!(value["nonce"], 42);
    }

    #[test]
    fn log_line_prefixes_drone_id() {
        assert_eq!(
            sample_event().log_line(),
            "[AGENT-04] Battery level at 12%. Returning to base."
        );
    }

    #[test]
    fn schema_lists_every_event_field() {
        for field in ["eventType", "message", "timestamp", "droneId", "nonce"] {
            assert!(DRONE_EVENT_SCHEMA.contains(field), "missing {field}");
        }
    }
}
