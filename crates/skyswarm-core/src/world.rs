//! Drones, buildings, and the world volume they share.
//!
//! The population and the building set are created once, at engine
//! construction, and never grow or shrink afterwards.

use glam::Vec3;
use skyswarm_types::{AgentSnapshot, DroneId, Vector3};

use crate::config::FlockingParams;
use crate::random::RandomSource;

/// One simulated drone.
#[derive(Debug, Clone, PartialEq)]
pub struct Agent {
    /// Stable identifier, assigned at creation.
    pub id: DroneId,
    /// Current position.
    pub position: Vec3,
    /// Current velocity.
    pub velocity: Vec3,
    /// Per-tick scratch accumulator; zero between ticks.
    pub acceleration: Vec3,
}

impl Agent {
    /// A drone at `position` moving with `velocity` and no pending acceleration.
    pub const fn new(id: DroneId, position: Vec3, velocity: Vec3) -> Self {
        Self {
            id,
            position,
            velocity,
            acceleration: Vec3::ZERO,
        }
    }

    /// Advance one step: move along the current velocity, then apply and
    /// clear the accumulated acceleration, capping speed at `max_speed`.
    pub fn integrate(&mut self, max_speed: f32) {
        self.position += self.velocity;
        self.velocity = (self.velocity + self.acceleration).clamp_length_max(max_speed);
        self.acceleration = Vec3::ZERO;
    }

    /// Read-only view for the renderer.
    pub fn snapshot(&self) -> AgentSnapshot {
        AgentSnapshot {
            id: self.id.clone(),
            position: to_vector3(self.position),
            velocity: to_vector3(self.velocity),
        }
    }
}

/// A static, ground-projected building.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    /// Ground position (`y = 0`).
    pub position: Vec3,
}

impl Obstacle {
    /// A building at `position`.
    pub const fn new(position: Vec3) -> Self {
        Self { position }
    }
}

/// The axis-aligned flight volume and its soft-boundary policy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldBounds {
    /// X/Z half-extent.
    pub margin: f32,
    /// Lower edge of the flight band.
    pub min_altitude: f32,
    /// Upper edge of the flight band.
    pub max_altitude: f32,
    /// Velocity nudge per violated axis.
    pub turn_factor: f32,
}

impl WorldBounds {
    /// Bounds described by the given parameters.
    pub fn from_params(params: &FlockingParams) -> Self {
        Self {
            margin: params.margin(),
            min_altitude: params.min_altitude,
            max_altitude: params.max_altitude,
            turn_factor: params.turn_factor,
        }
    }

    /// Whether `position` lies inside the volume (edges included).
    pub fn contains(&self, position: Vec3) -> bool {
        position.x.abs() <= self.margin
            && position.z.abs() <= self.margin
            && (self.min_altitude..=self.max_altitude).contains(&position.y)
    }

    /// Nudge `agent`'s velocity toward the interior on every violated axis.
    ///
    /// Returns whether any axis was out of bounds. Position is never
    /// touched; the drone turns back over the following ticks.
    pub fn contain(&self, agent: &mut Agent) -> bool {
        let pos = agent.position;
        let mut nudge = Vec3::ZERO;
        if pos.x < -self.margin {
            nudge.x += self.turn_factor;
        }
        if pos.x > self.margin {
            nudge.x -= self.turn_factor;
        }
        if pos.z < -self.margin {
            nudge.z += self.turn_factor;
        }
        if pos.z > self.margin {
            nudge.z -= self.turn_factor;
        }
        if pos.y < self.min_altitude {
            nudge.y += self.turn_factor;
        }
        if pos.y > self.max_altitude {
            nudge.y -= self.turn_factor;
        }
        agent.velocity += nudge;
        nudge != Vec3::ZERO
    }
}

/// Place `params.drone_count` drones uniformly over the X/Z extent and the
/// spawn altitude band, each with a small random horizontal velocity.
pub fn spawn_agents(params: &FlockingParams, rng: &mut dyn RandomSource) -> Vec<Agent> {
    let spawn_band = params.spawn_max_altitude - params.spawn_min_altitude;
    (0..params.drone_count)
        .map(|i| {
            let position = Vec3::new(
                (rng.unit() - 0.5) * params.world_size,
                params.spawn_min_altitude + rng.unit() * spawn_band,
                (rng.unit() - 0.5) * params.world_size,
            );
            let velocity = Vec3::new(
                (rng.unit() - 0.5) * params.max_speed,
                0.0,
                (rng.unit() - 0.5) * params.max_speed,
            );
            Agent::new(DroneId::from_index(i), position, velocity)
        })
        .collect()
}

/// Scatter `params.obstacle_count` buildings on the ground over the central
/// `obstacle_spread` fraction of the world.
pub fn spawn_obstacles(params: &FlockingParams, rng: &mut dyn RandomSource) -> Vec<Obstacle> {
    let extent = params.world_size * params.obstacle_spread;
    (0..params.obstacle_count)
        .map(|_| {
            let x = (rng.unit() - 0.5) * extent;
            let z = (rng.unit() - 0.5) * extent;
            Obstacle::new(Vec3::new(x, 0.0, z))
        })
        .collect()
}

/// Convert an engine vector into its wire form.
pub const fn to_vector3(v: Vec3) -> Vector3 {
    Vector3::new(v.x, v.y, v.z)
}
