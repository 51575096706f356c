//! The simulation engine: owns the swarm and advances it one frame at a time.
//!
//! # Tick order
//!
//! 1. Rebuild the neighbor index from the pre-step positions.
//! 2. Compute every drone's steering acceleration against that snapshot.
//! 3. Integrate every drone (move, accelerate, cap speed).
//! 4. Apply the soft boundary nudge. The nudge is added after the speed
//!    cap, so a drone outside the volume may exceed `max_speed` by up to
//!    `turn_factor` per violated axis.
//! 5. Roll the event trigger and, if it fires while the schema is ready,
//!    publish one notable event on the event bus.
//!
//! No step blocks or fails. Publishing on the bus is fire-and-forget.

use glam::Vec3;
use skyswarm_types::{FrameSnapshot, NotableEvent};
use tracing::{debug, info};

use crate::clock::FrameClock;
use crate::config::{FlockingParams, NeighborIndexKind, P_EVENT, ParamsError};
use crate::events::EventBus;
use crate::flocking::{FlockContext, steering_for};
use crate::notable;
use crate::random::{RandomSource, SeededRandom};
use crate::spatial::{NeighborIndex, build_index};
use crate::world::{Agent, Obstacle, WorldBounds, spawn_agents, spawn_obstacles};

/// What happened during one tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickSummary {
    /// The tick number that just completed (1 for the first tick).
    pub tick: u64,
    /// The notable event emitted this tick, if any.
    pub event: Option<NotableEvent>,
    /// Drones that received a boundary nudge this tick.
    pub out_of_bounds: usize,
}

/// Fixed-population flocking simulation.
///
/// Not internally synchronized: callers must not tick the same engine from
/// two places at once.
#[derive(Debug)]
pub struct SimulationEngine<R: RandomSource = SeededRandom> {
    agents: Vec<Agent>,
    obstacles: Vec<Obstacle>,
    params: FlockingParams,
    bounds: WorldBounds,
    rng: R,
    agent_index: Box<dyn NeighborIndex>,
    obstacle_index: Box<dyn NeighborIndex>,
    clock: FrameClock,
    events: EventBus,
    event_probability: f32,
    schema_ready: bool,
    // Per-tick scratch buffers, kept to avoid reallocating every frame.
    positions: Vec<Vec3>,
    accelerations: Vec<Vec3>,
    candidates: Vec<usize>,
}

impl<R: RandomSource> SimulationEngine<R> {
    /// Build a randomly laid out world using brute-force neighbor queries.
    pub fn new(params: FlockingParams, rng: R) -> Result<Self, ParamsError> {
        Self::with_index(params, rng, NeighborIndexKind::BruteForce)
    }

    /// Build a randomly laid out world using the given neighbor index.
    ///
    /// Drones are placed first, then buildings, both drawn from `rng`.
    pub fn with_index(
        params: FlockingParams,
        mut rng: R,
        kind: NeighborIndexKind,
    ) -> Result<Self, ParamsError> {
        params.validate()?;
        let agents = spawn_agents(&params, &mut rng);
        let obstacles = spawn_obstacles(&params, &mut rng);
        Ok(Self::assemble(agents, obstacles, params, rng, kind))
    }

    /// Build a world from an explicit layout.
    ///
    /// Any pending acceleration on the given agents is discarded.
    pub fn from_parts(
        agents: Vec<Agent>,
        obstacles: Vec<Obstacle>,
        params: FlockingParams,
        rng: R,
    ) -> Result<Self, ParamsError> {
        params.validate()?;
        let agents = agents
            .into_iter()
            .map(|agent| Agent {
                acceleration: Vec3::ZERO,
                ..agent
            })
            .collect();
        Ok(Self::assemble(
            agents,
            obstacles,
            params,
            rng,
            NeighborIndexKind::BruteForce,
        ))
    }

    fn assemble(
        agents: Vec<Agent>,
        obstacles: Vec<Obstacle>,
        params: FlockingParams,
        rng: R,
        kind: NeighborIndexKind,
    ) -> Self {
        let agent_index = build_index(kind, params.perception_radius);
        let mut obstacle_index = build_index(kind, params.obstacle_radius);
        let obstacle_positions: Vec<Vec3> = obstacles.iter().map(|o| o.position).collect();
        obstacle_index.rebuild(&obstacle_positions);

        info!(
            drones = agents.len(),
            obstacles = obstacles.len(),
            neighbor_index = ?kind,
            "Simulation engine constructed"
        );

        let n = agents.len();
        Self {
            bounds: WorldBounds::from_params(&params),
            agents,
            obstacles,
            params,
            rng,
            agent_index,
            obstacle_index,
            clock: FrameClock::new(),
            events: EventBus::default(),
            event_probability: P_EVENT,
            schema_ready: false,
            positions: Vec::with_capacity(n),
            accelerations: Vec::with_capacity(n),
            candidates: Vec::with_capacity(n),
        }
    }

    /// Replace the per-tick event probability. Values are clamped to `[0, 1]`.
    #[must_use]
    pub fn with_event_probability(mut self, probability: f32) -> Self {
        self.event_probability = if probability.is_nan() {
            0.0
        } else {
            probability.clamp(0.0, 1.0)
        };
        self
    }

    /// Advance the whole world by one step.
    pub fn tick(&mut self) -> TickSummary {
        self.positions.clear();
        self.positions.extend(self.agents.iter().map(|a| a.position));
        self.agent_index.rebuild(&self.positions);

        let ctx = FlockContext {
            agents: &self.agents,
            obstacles: &self.obstacles,
            agent_index: self.agent_index.as_ref(),
            obstacle_index: self.obstacle_index.as_ref(),
            params: &self.params,
        };
        self.accelerations.clear();
        for idx in 0..self.agents.len() {
            let forces = steering_for(&ctx, idx, &mut self.candidates);
            self.accelerations.push(forces.total(&self.params));
        }

        let max_speed = self.params.max_speed;
        let mut out_of_bounds: usize = 0;
        for (agent, &acceleration) in self.agents.iter_mut().zip(&self.accelerations) {
            agent.acceleration = acceleration;
            agent.integrate(max_speed);
            if self.bounds.contain(agent) {
                out_of_bounds = out_of_bounds.saturating_add(1);
            }
        }

        let tick = self.clock.advance();
        let event = self.maybe_emit(tick);

        debug!(tick, out_of_bounds, emitted = event.is_some(), "tick complete");
        TickSummary {
            tick,
            event,
            out_of_bounds,
        }
    }

    fn maybe_emit(&mut self, tick: u64) -> Option<NotableEvent> {
        if !notable::roll_trigger(&mut self.rng, self.event_probability, self.schema_ready) {
            return None;
        }
        let event = notable::synthesize(&self.agents, &mut self.rng, FrameClock::now_millis())?;
        let receivers = self.events.publish(event.clone());
        info!(
            tick,
            drone_id = %event.drone_id,
            event_type = %event.event_type,
            receivers,
            "Notable event emitted"
        );
        Some(event)
    }

    /// Every drone, in creation order.
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    /// Every building.
    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    /// Read-only view of the swarm for the renderer.
    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot {
            tick: self.clock.tick(),
            agents: self.agents.iter().map(Agent::snapshot).collect(),
        }
    }

    /// The flight volume.
    pub const fn bounds(&self) -> &WorldBounds {
        &self.bounds
    }

    /// The flocking constants this engine was built with.
    pub const fn params(&self) -> &FlockingParams {
        &self.params
    }

    /// The bus notable events are published on.
    pub const fn events(&self) -> &EventBus {
        &self.events
    }

    /// Per-tick event probability.
    pub const fn event_probability(&self) -> f32 {
        self.event_probability
    }

    /// Allow or suppress event emission.
    pub fn set_schema_ready(&mut self, ready: bool) {
        if ready != self.schema_ready {
            info!(schema_ready = ready, "Event schema readiness changed");
        }
        self.schema_ready = ready;
    }

    /// Whether events may currently be emitted.
    pub const fn schema_ready(&self) -> bool {
        self.schema_ready
    }

    /// Number of completed ticks.
    pub const fn tick_count(&self) -> u64 {
        self.clock.tick()
    }
}
