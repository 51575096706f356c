//! Shared type definitions for the Skyswarm simulation.
//!
//! This crate is the single source of truth for the records the engine
//! hands to its external collaborators (renderer, UI log, publisher).
//! Types flow downstream to `TypeScript` via `ts-rs` for the dashboard.
//!
//! # Modules
//!
//! - [`ids`] -- Drone and subscription identifiers
//! - [`enums`] -- Notable event kinds
//! - [`structs`] -- Snapshots, notable events, and publish receipts

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::NotableEventKind;
pub use ids::{DRONE_ID_PREFIX, DroneId, SubscriptionId};
pub use structs::{
    AgentSnapshot, DRONE_EVENT_SCHEMA, FrameSnapshot, NotableEvent, PublishReceipt, Vector3,
};
