//! Configuration loading and typed config structures for the Skyswarm simulation.
//!
//! The canonical configuration lives in `skyswarm-config.yaml` next to the
//! binary. Every field has a default matching the standard flocking
//! constants, so an empty or missing file yields the standard 50-drone
//! city. Configuration is consumed once, when the engine is constructed.

use std::path::Path;

use serde::Deserialize;

/// Number of drones in the swarm.
pub const DRONE_COUNT: usize = 50;
/// Horizontal extent of the world; drones are confined to `±WORLD_SIZE / 2` on X/Z.
pub const WORLD_SIZE: f32 = 200.0;
/// Upper bound on drone speed, in world units per tick.
pub const MAX_SPEED: f32 = 0.8;
/// Upper bound on a single steering force.
pub const MAX_FORCE: f32 = 0.03;
/// Distance within which drones align with and cohere to each other.
pub const PERCEPTION_RADIUS: f32 = 20.0;
/// Distance within which drones repel each other.
pub const SEPARATION_DISTANCE: f32 = 8.0;
/// Distance within which buildings repel drones.
pub const OBSTACLE_RADIUS: f32 = 25.0;
/// Lower edge of the flight band.
pub const MIN_ALTITUDE: f32 = 10.0;
/// Upper edge of the flight band.
pub const MAX_ALTITUDE: f32 = 60.0;
/// Velocity nudge applied per axis when a drone is out of bounds.
pub const TURN_FACTOR: f32 = 0.05;
/// Per-tick probability of surfacing a notable event.
pub const P_EVENT: f32 = 0.005;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The configured flocking parameters are unusable.
    #[error("invalid flocking parameters: {source}")]
    Params {
        /// The underlying validation error.
        #[from]
        source: ParamsError,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// A flocking parameter failed validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {reason}")]
pub struct ParamsError {
    /// Name of the offending parameter.
    pub field: &'static str,
    /// What is wrong with it.
    pub reason: &'static str,
}

/// Top-level simulation configuration.
///
/// Mirrors the structure of `skyswarm-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SimulationConfig {
    /// World-level settings (name, seed, frame pacing).
    #[serde(default)]
    pub world: WorldConfig,

    /// Flocking constants and world layout.
    #[serde(default)]
    pub flock: FlockingParams,

    /// Notable-event settings.
    #[serde(default)]
    pub events: EventsConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SimulationConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// `SKYSWARM_SEED`, when set to an integer, overrides `world.seed`.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string and validate it.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.world.apply_env_overrides();
        config.flock.validate()?;
        if !(0.0..=1.0).contains(&config.events.probability) {
            return Err(ParamsError {
                field: "events.probability",
                reason: "must lie in [0, 1]",
            }
            .into());
        }
        Ok(config)
    }
}

/// Which neighbor index the engine uses for its per-tick queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NeighborIndexKind {
    /// Scan every drone for every drone.
    #[default]
    BruteForce,
    /// Bucket drones into a uniform 3D grid.
    UniformGrid,
}

/// World-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorldConfig {
    /// Human-readable simulation name.
    #[serde(default = "default_world_name")]
    pub name: String,

    /// Random seed for reproducibility (`None` draws from OS entropy).
    #[serde(default)]
    pub seed: Option<u64>,

    /// Real-time milliseconds per tick.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Maximum number of ticks before the loop ends (0 = unlimited).
    #[serde(default)]
    pub max_ticks: u64,

    /// Neighbor query strategy.
    #[serde(default)]
    pub neighbor_index: NeighborIndexKind,
}

impl WorldConfig {
    /// Override the seed with `SKYSWARM_SEED` when it is set to an integer.
    pub fn apply_env_overrides(&mut self) {
        if let Some(seed) = std::env::var("SKYSWARM_SEED")
            .ok()
            .and_then(|val| val.trim().parse::<u64>().ok())
        {
            self.seed = Some(seed);
        }
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            name: default_world_name(),
            seed: None,
            tick_interval_ms: default_tick_interval_ms(),
            max_ticks: 0,
            neighbor_index: NeighborIndexKind::default(),
        }
    }
}

/// Flocking constants and world layout.
///
/// Defaults describe the standard swarm: 50 drones, 20 buildings, a
/// 200-unit square city, and a `[10, 60]` flight band.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FlockingParams {
    /// Number of drones created at construction.
    #[serde(default = "default_drone_count")]
    pub drone_count: usize,

    /// Horizontal extent of the world.
    #[serde(default = "default_world_size")]
    pub world_size: f32,

    /// Maximum drone speed.
    #[serde(default = "default_max_speed")]
    pub max_speed: f32,

    /// Maximum magnitude of one steering force.
    #[serde(default = "default_max_force")]
    pub max_force: f32,

    /// Alignment/cohesion neighborhood radius.
    #[serde(default = "default_perception_radius")]
    pub perception_radius: f32,

    /// Separation neighborhood radius.
    #[serde(default = "default_separation_distance")]
    pub separation_distance: f32,

    /// Obstacle avoidance radius.
    #[serde(default = "default_obstacle_radius")]
    pub obstacle_radius: f32,

    /// Lower edge of the flight band.
    #[serde(default = "default_min_altitude")]
    pub min_altitude: f32,

    /// Upper edge of the flight band.
    #[serde(default = "default_max_altitude")]
    pub max_altitude: f32,

    /// Per-axis velocity nudge toward the interior when out of bounds.
    #[serde(default = "default_turn_factor")]
    pub turn_factor: f32,

    /// Weight of the separation force in the total acceleration.
    #[serde(default = "default_separation_weight")]
    pub separation_weight: f32,

    /// Weight of the avoidance force in the total acceleration.
    #[serde(default = "default_avoidance_weight")]
    pub avoidance_weight: f32,

    /// Avoidance force limit, as a multiple of `max_force`.
    #[serde(default = "default_avoidance_force_scale")]
    pub avoidance_force_scale: f32,

    /// Number of buildings placed at construction.
    #[serde(default = "default_obstacle_count")]
    pub obstacle_count: usize,

    /// Fraction of the world extent buildings are scattered over.
    #[serde(default = "default_obstacle_spread")]
    pub obstacle_spread: f32,

    /// Lowest initial drone altitude.
    #[serde(default = "default_spawn_min_altitude")]
    pub spawn_min_altitude: f32,

    /// Highest initial drone altitude.
    #[serde(default = "default_spawn_max_altitude")]
    pub spawn_max_altitude: f32,
}

impl Default for FlockingParams {
    fn default() -> Self {
        Self {
            drone_count: default_drone_count(),
            world_size: default_world_size(),
            max_speed: default_max_speed(),
            max_force: default_max_force(),
            perception_radius: default_perception_radius(),
            separation_distance: default_separation_distance(),
            obstacle_radius: default_obstacle_radius(),
            min_altitude: default_min_altitude(),
            max_altitude: default_max_altitude(),
            turn_factor: default_turn_factor(),
            separation_weight: default_separation_weight(),
            avoidance_weight: default_avoidance_weight(),
            avoidance_force_scale: default_avoidance_force_scale(),
            obstacle_count: default_obstacle_count(),
            obstacle_spread: default_obstacle_spread(),
            spawn_min_altitude: default_spawn_min_altitude(),
            spawn_max_altitude: default_spawn_max_altitude(),
        }
    }
}

impl FlockingParams {
    /// Half the horizontal world extent: the X/Z boundary.
    pub fn margin(&self) -> f32 {
        self.world_size / 2.0
    }

    /// Check that every parameter is finite and in range.
    pub fn validate(&self) -> Result<(), ParamsError> {
        let positive = [
            ("world_size", self.world_size),
            ("max_speed", self.max_speed),
            ("max_force", self.max_force),
            ("perception_radius", self.perception_radius),
            ("separation_distance", self.separation_distance),
            ("obstacle_radius", self.obstacle_radius),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ParamsError {
                    field,
                    reason: "must be finite and positive",
                });
            }
        }

        let non_negative = [
            ("turn_factor", self.turn_factor),
            ("separation_weight", self.separation_weight),
            ("avoidance_weight", self.avoidance_weight),
            ("avoidance_force_scale", self.avoidance_force_scale),
            ("min_altitude", self.min_altitude),
            ("spawn_min_altitude", self.spawn_min_altitude),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ParamsError {
                    field,
                    reason: "must be finite and non-negative",
                });
            }
        }

        if self.drone_count == 0 {
            return Err(ParamsError {
                field: "drone_count",
                reason: "must be at least 1",
            });
        }
        if !self.max_altitude.is_finite() || self.max_altitude <= self.min_altitude {
            return Err(ParamsError {
                field: "max_altitude",
                reason: "must be greater than min_altitude",
            });
        }
        if !self.spawn_max_altitude.is_finite() || self.spawn_max_altitude < self.spawn_min_altitude
        {
            return Err(ParamsError {
                field: "spawn_max_altitude",
                reason: "must not be below spawn_min_altitude",
            });
        }
        if !(0.0..=1.0).contains(&self.obstacle_spread) {
            return Err(ParamsError {
                field: "obstacle_spread",
                reason: "must lie in [0, 1]",
            });
        }
        Ok(())
    }
}

/// Notable-event settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EventsConfig {
    /// Per-tick probability of surfacing a notable event.
    #[serde(default = "default_event_probability")]
    pub probability: f32,

    /// Number of lines the rolling event log keeps.
    #[serde(default = "default_log_capacity")]
    pub log_capacity: usize,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            probability: default_event_probability(),
            log_capacity: default_log_capacity(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error) used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions (serde default requires named functions)
// ---------------------------------------------------------------------------

fn default_world_name() -> String {
    "Skyswarm City".to_owned()
}

const fn default_tick_interval_ms() -> u64 {
    16
}

const fn default_drone_count() -> usize {
    DRONE_COUNT
}

const fn default_world_size() -> f32 {
    WORLD_SIZE
}

const fn default_max_speed() -> f32 {
    MAX_SPEED
}

const fn default_max_force() -> f32 {
    MAX_FORCE
}

const fn default_perception_radius() -> f32 {
    PERCEPTION_RADIUS
}

const fn default_separation_distance() -> f32 {
    SEPARATION_DISTANCE
}

const fn default_obstacle_radius() -> f32 {
    OBSTACLE_RADIUS
}

const fn default_min_altitude() -> f32 {
    MIN_ALTITUDE
}

const fn default_max_altitude() -> f32 {
    MAX_ALTITUDE
}

const fn default_turn_factor() -> f32 {
    TURN_FACTOR
}

const fn default_separation_weight() -> f32 {
    1.5
}

const fn default_avoidance_weight() -> f32 {
    2.0
}

const fn default_avoidance_force_scale() -> f32 {
    2.0
}

const fn default_obstacle_count() -> usize {
    20
}

const fn default_obstacle_spread() -> f32 {
    0.8
}

const fn default_spawn_min_altitude() -> f32 {
    20.0
}

const fn default_spawn_max_altitude() -> f32 {
    40.0
}

const fn default_event_probability() -> f32 {
    P_EVENT
}

const fn default_log_capacity() -> usize {
    5
}

fn default_log_level() -> String {
    "info".to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_standard_constants() {
        let config = SimulationConfig::default();
        assert_eq!(config.flock.drone_count, 50);
        assert_eq!(config.flock.obstacle_count, 20);
        assert!((config.flock.margin() - 100.0).abs() < f32::EPSILON);
        assert!((config.events.probability - 0.005).abs() < f32::EPSILON);
        assert_eq!(config.events.log_capacity, 5);
        assert_eq!(config.world.neighbor_index, NeighborIndexKind::BruteForce);
        assert!(config.flock.validate().is_ok());
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r#"
world:
  name: "Test City"
  seed: 123
  tick_interval_ms: 33
  max_ticks: 500
  neighbor_index: uniform_grid

flock:
  drone_count: 12
  max_speed: 1.2
  perception_radius: 15.0
  obstacle_count: 4

events:
  probability: 0.25
  log_capacity: 8

logging:
  level: "debug"
"#;

        let config = SimulationConfig::parse(yaml);
        assert!(config.is_ok(), "{config:?}");
        let config = config.ok().unwrap_or_default();

        assert_eq!(config.world.name, "Test City");
        assert_eq!(config.world.tick_interval_ms, 33);
        assert_eq!(config.world.max_ticks, 500);
        assert_eq!(config.world.neighbor_index, NeighborIndexKind::UniformGrid);
        assert_eq!(config.flock.drone_count, 12);
        assert_eq!(config.flock.obstacle_count, 4);
        assert!((config.flock.perception_radius - 15.0).abs() < f32::EPSILON);
        // Unspecified flock fields keep their defaults.
        assert!((config.flock.max_force - MAX_FORCE).abs() < f32::EPSILON);
        assert_eq!(config.events.log_capacity, 8);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn shipped_config_matches_defaults() {
        let config = SimulationConfig::parse(include_str!("../../../skyswarm-config.yaml"));
        assert!(config.is_ok(), "{config:?}");
        let config = config.ok().unwrap_or_default();
        assert_eq!(config.flock, FlockingParams::default());
        assert_eq!(config.events, EventsConfig::default());
        assert_eq!(config.world.neighbor_index, NeighborIndexKind::BruteForce);
    }

    #[test]
    fn parse_empty_yaml() {
        let config = SimulationConfig::parse("");
        assert!(config.is_ok());
    }

    #[test]
    fn rejects_inverted_altitude_band() {
        let yaml = "flock:\n  min_altitude: 50.0\n  max_altitude: 20.0\n";
        let err = SimulationConfig::parse(yaml).err();
        assert!(matches!(err, Some(ConfigError::Params { .. })), "{err:?}");
    }

    #[test]
    fn rejects_non_positive_speed() {
        let params = FlockingParams {
            max_speed: 0.0,
            ..FlockingParams::default()
        };
        let err = params.validate().err();
        assert_eq!(err.map(|e| e.field), Some("max_speed"));
    }

    #[test]
    fn rejects_out_of_range_probability() {
        let err = SimulationConfig::parse("events:\n  probability: 1.5\n").err();
        assert!(matches!(err, Some(ConfigError::Params { .. })), "{err:?}");
    }

    #[test]
    fn rejects_malformed_yaml() {
        let err = SimulationConfig::parse("world: [unclosed").err();
        assert!(matches!(err, Some(ConfigError::Yaml { .. })), "{err:?}");
    }
}
