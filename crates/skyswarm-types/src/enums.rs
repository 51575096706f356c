//! Enumeration types for the Skyswarm simulation.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// The kind of a synthetic notable event surfaced by the engine.
///
/// Serialized in `SCREAMING_SNAKE_CASE` (`COLLISION_AVOIDED`, ...) so the
/// wire form matches the `eventType` string of the drone event schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export, export_to = "bindings/")]
pub enum NotableEventKind {
    /// A drone rerouted around a building.
    CollisionAvoided,
    /// A drone completed a delivery.
    PackageDelivered,
    /// A drone is heading home on low battery.
    BatteryLow,
    /// The drone network saw a latency spike.
    NetworkLatency,
    /// The drone network agreed on a new block.
    BlockSync,
}

impl NotableEventKind {
    /// Every kind, in the order used for uniform selection.
    pub const ALL: [Self; 5] = [
        Self::CollisionAvoided,
        Self::PackageDelivered,
        Self::BatteryLow,
        Self::NetworkLatency,
        Self::BlockSync,
    ];

    /// The wire name of this kind.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CollisionAvoided => "COLLISION_AVOIDED",
            Self::PackageDelivered => "PACKAGE_DELIVERED",
            Self::BatteryLow => "BATTERY_LOW",
            Self::NetworkLatency => "NETWORK_LATENCY",
            Self::BlockSync => "BLOCK_SYNC",
        }
    }
}

impl core::fmt::Display for NotableEventKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_name_matches_as_str() {
        for kind in NotableEventKind::ALL {
            let json = serde_json::to_string(&kind).unwrap_or_default();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
    }

    #[test]
    fn parses_wire_name() {
        let kind: Option<NotableEventKind> = serde_json::from_str("\"BLOCK_SYNC\"").ok();
        assert_eq!(kind, Some(NotableEventKind::BlockSync));
    }
}
