//! The flocking pass: alignment, cohesion, separation, and building avoidance.
//!
//! [`steering_for`] reads the *pre-step* state of the whole population and
//! never mutates it, so the engine can compute every drone's acceleration
//! before integrating any of them.

use glam::Vec3;

use crate::config::FlockingParams;
use crate::spatial::NeighborIndex;
use crate::steering::{set_length, steer};
use crate::world::{Agent, Obstacle};

/// Breakdown of one drone's steering for a single tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SteeringForces {
    /// Pull toward the neighbors' mean heading.
    pub alignment: Vec3,
    /// Pull toward the neighbors' mean position.
    pub cohesion: Vec3,
    /// Push away from close neighbors (unweighted).
    pub separation: Vec3,
    /// Push away from nearby buildings (unweighted).
    pub avoidance: Vec3,
    /// Number of drones within the perception radius.
    pub neighbors: usize,
}

impl SteeringForces {
    /// The weighted sum that becomes the drone's acceleration.
    pub fn total(&self, params: &FlockingParams) -> Vec3 {
        self.alignment
            + self.cohesion
            + self.separation * params.separation_weight
            + self.avoidance * params.avoidance_weight
    }
}

/// Read-only inputs shared by every drone's steering computation in a tick.
#[derive(Debug, Clone, Copy)]
pub struct FlockContext<'a> {
    /// The whole population, pre-step.
    pub agents: &'a [Agent],
    /// Every building.
    pub obstacles: &'a [Obstacle],
    /// Index over `agents` positions, rebuilt this tick.
    pub agent_index: &'a dyn NeighborIndex,
    /// Index over `obstacles` positions, built once.
    pub obstacle_index: &'a dyn NeighborIndex,
    /// Flocking constants.
    pub params: &'a FlockingParams,
}

/// Compute the steering forces acting on `agents[idx]`.
///
/// `scratch` is reused between calls to avoid per-drone allocations.
/// Returns zero forces if `idx` is out of range.
#[allow(clippy::cast_precision_loss)]
pub fn steering_for(
    ctx: &FlockContext<'_>,
    idx: usize,
    scratch: &mut Vec<usize>,
) -> SteeringForces {
    let Some(agent) = ctx.agents.get(idx) else {
        return SteeringForces::default();
    };
    let params = ctx.params;

    let mut velocity_sum = Vec3::ZERO;
    let mut position_sum = Vec3::ZERO;
    let mut repulsion_sum = Vec3::ZERO;
    let mut count: usize = 0;

    ctx.agent_index
        .candidates(agent.position, params.perception_radius, scratch);
    for &other_idx in scratch.iter() {
        if other_idx == idx {
            continue;
        }
        let Some(other) = ctx.agents.get(other_idx) else {
            continue;
        };
        let d = agent.position.distance(other.position);
        if d >= params.perception_radius {
            continue;
        }
        velocity_sum += other.velocity;
        position_sum += other.position;
        // Coincident drones have no repulsion direction.
        if d < params.separation_distance && d > 0.0 {
            repulsion_sum += (agent.position - other.position) / d;
        }
        count = count.saturating_add(1);
    }

    let mut forces = SteeringForces {
        neighbors: count,
        ..SteeringForces::default()
    };

    if count > 0 {
        let n = count as f32;
        forces.alignment = steer(
            velocity_sum / n,
            agent.velocity,
            params.max_speed,
            params.max_force,
        );
        forces.cohesion = steer(
            position_sum / n - agent.position,
            agent.velocity,
            params.max_speed,
            params.max_force,
        );
        forces.separation = steer(
            repulsion_sum / n,
            agent.velocity,
            params.max_speed,
            params.max_force,
        );
    }

    let mut avoidance_sum = Vec3::ZERO;
    ctx.obstacle_index
        .candidates(agent.position, params.obstacle_radius, scratch);
    for &obstacle_idx in scratch.iter() {
        let Some(obstacle) = ctx.obstacles.get(obstacle_idx) else {
            continue;
        };
        let d = agent.position.distance(obstacle.position);
        if d < params.obstacle_radius && d > 0.0 {
            avoidance_sum += (agent.position - obstacle.position) / d;
        }
    }
    if avoidance_sum.length_squared() > 0.0 {
        forces.avoidance = steer(
            avoidance_sum,
            agent.velocity,
            params.max_speed,
            params.max_force * params.avoidance_force_scale,
        );
    }

    forces
}

/// The flock's mean heading scaled to full speed, or zero for a still flock.
///
/// Diagnostic helper for the frame log.
pub fn mean_heading(agents: &[Agent], max_speed: f32) -> Vec3 {
    let sum: Vec3 = agents.iter().map(|a| a.velocity).sum();
    set_length(sum, max_speed)
}
