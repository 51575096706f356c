//! Flocking engine, notable-event emission, and frame loop for Skyswarm.
//!
//! The [`SimulationEngine`] owns a fixed population of drones and a static
//! set of buildings and advances them one discrete step per
//! [`tick`](SimulationEngine::tick). Occasionally it surfaces a synthetic
//! notable event on its [`EventBus`]; everything downstream of that bus
//! (UI log, publisher) is a collaborator, not part of the engine.
//!
//! # Modules
//!
//! - [`clock`] -- Frame counter and wall-clock timestamps.
//! - [`config`] -- Configuration loading from `skyswarm-config.yaml` and
//!   the flocking constants.
//! - [`engine`] -- [`SimulationEngine`] and the per-tick pipeline.
//! - [`event_log`] -- Bounded rolling display log.
//! - [`events`] -- Publish/subscribe notification buses.
//! - [`flocking`] -- Alignment, cohesion, separation, and avoidance.
//! - [`notable`] -- Event trigger roll and event synthesis.
//! - [`operator`] -- Pause/resume/stop controls for the frame loop.
//! - [`publish`] -- Bridge from the event bus to a publishing collaborator.
//! - [`random`] -- Injectable random source.
//! - [`runner`] -- The async frame loop.
//! - [`spatial`] -- Neighbor indices.
//! - [`steering`] -- Steering vector helpers.
//! - [`world`] -- Drones, buildings, and world bounds.

pub mod clock;
pub mod config;
pub mod engine;
pub mod event_log;
pub mod events;
pub mod flocking;
pub mod notable;
pub mod operator;
pub mod publish;
pub mod random;
pub mod runner;
pub mod spatial;
pub mod steering;
pub mod world;

pub use config::{FlockingParams, NeighborIndexKind, SimulationConfig};
pub use engine::{SimulationEngine, TickSummary};
pub use event_log::EventLog;
pub use events::{
    EventBus, NotableEventSubscription, NotificationBus, ReceiptBus, ReceiptSubscription,
    Subscription,
};
pub use operator::{OperatorState, SimulationEndReason};
pub use publish::{EventPublisher, PublishError, PublishStats, spawn_publisher};
pub use random::{RandomSource, SeededRandom};
pub use runner::{FrameCallback, NoOpCallback, SimulationResult, run_simulation};
pub use world::{Agent, Obstacle, WorldBounds};
