//! Type-safe identifier wrappers.
//!
//! Drones carry a human-readable [`DroneId`] (`AGENT-07`) that is assigned
//! once at engine construction and never changes. Notification-bus
//! subscriptions carry a [`SubscriptionId`] backed by a UUID v7 so that
//! subscribe/unsubscribe pairs can be correlated in logs.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Prefix used for every drone identifier.
pub const DRONE_ID_PREFIX: &str = "AGENT-";

/// Stable, human-readable identifier of one simulated drone.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(transparent)]
#[ts(export, export_to = "bindings/")]
pub struct DroneId(String);

impl DroneId {
    /// Build the identifier for the drone at `index` in the population.
    ///
    /// Indices are zero-padded to two digits, so index 7 becomes `AGENT-07`
    /// and index 123 becomes `AGENT-123`.
    pub fn from_index(index: usize) -> Self {
        Self(format!("{DRONE_ID_PREFIX}{index:02}"))
    }

    /// Wrap an arbitrary identifier string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for DroneId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<DroneId> for String {
    fn from(id: DroneId) -> Self {
        id.0
    }
}

/// Identifier of a notification-bus subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct SubscriptionId(pub Uuid);

impl SubscriptionId {
    /// Create a new identifier using UUID v7 (time-ordered).
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Return the inner [`Uuid`] value.
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for SubscriptionId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for SubscriptionId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drone_ids_are_zero_padded() {
        assert_eq!(DroneId::from_index(0).as_str(), "AGENT-00");
        assert_eq!(DroneId::from_index(7).as_str(), "AGENT-07");
        assert_eq!(DroneId::from_index(49).as_str(), "AGENT-49");
        assert_eq!(DroneId::from_index(123).as_str(), "AGENT-123");
    }

    #[test]
    fn drone_id_serializes_as_plain_string() {
        let json = serde_json::to_string(&DroneId::from_index(3)).ok();
        assert_eq!(json.as_deref(), Some("\"AGENT-03\""));
    }

    #[test]
    fn subscription_ids_are_unique() {
        assert_ne!(SubscriptionId::new(), SubscriptionId::new());
    }
}
