//! Startup configuration.
//!
//! Every section falls back to the defaults in `constants`, so a config
//! file only needs the values it changes.

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::{ConfigError, ConfigResult};

/// Top-level configuration for a simulation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BroodConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    /// Initial time scale (1.0 = normal).
    pub time_scale: f64,
    pub patrol: PatrolConfig,
    pub population: PopulationConfig,
    pub nest: NestConfig,
}

/// Waypoint dwell and arrival tuning shared by every patrolling entity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct PatrolConfig {
    pub wait_secs: f64,
    pub tolerance: f64,
}

/// Population coordinator tuning.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct PopulationConfig {
    pub proximity: f64,
    pub max_population: u32,
    pub interval_secs: f64,
    pub jitter_radius: f64,
}

/// Nest tuning.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct NestConfig {
    pub respawn_secs: f64,
    pub initial_spawn: u32,
    pub spawn_radius: f64,
    pub escalation_odds: u32,
    pub max_health: f64,
}

impl Default for BroodConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            time_scale: 1.0,
            patrol: PatrolConfig::default(),
            population: PopulationConfig::default(),
            nest: NestConfig::default(),
        }
    }
}

impl Default for PatrolConfig {
    fn default() -> Self {
        Self {
            wait_secs: PATROL_WAIT_SECS,
            tolerance: PATROL_TOLERANCE,
        }
    }
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            proximity: SPAWNER_PROXIMITY,
            max_population: SPAWNER_MAX_POPULATION,
            interval_secs: SPAWNER_INTERVAL_SECS,
            jitter_radius: SPAWNER_JITTER_RADIUS,
        }
    }
}

impl Default for NestConfig {
    fn default() -> Self {
        Self {
            respawn_secs: NEST_RESPAWN_SECS,
            initial_spawn: NEST_INITIAL_SPAWN,
            spawn_radius: NEST_SPAWN_RADIUS,
            escalation_odds: NEST_ESCALATION_ODDS,
            max_health: DEFAULT_MAX_HEALTH,
        }
    }
}

impl BroodConfig {
    /// Parse a JSON document and validate it.
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let config: BroodConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the simulation cannot run with.
    pub fn validate(&self) -> ConfigResult<()> {
        if !(0.0..=4.0).contains(&self.time_scale) {
            return Err(invalid("time_scale", "must be within 0.0..=4.0"));
        }
        if self.patrol.wait_secs < 0.0 {
            return Err(invalid("patrol.wait_secs", "must not be negative"));
        }
        if self.patrol.tolerance < 0.0 {
            return Err(invalid("patrol.tolerance", "must not be negative"));
        }
        if self.population.interval_secs <= 0.0 {
            return Err(invalid("population.interval_secs", "must be positive"));
        }
        if self.population.proximity <= 0.0 {
            return Err(invalid("population.proximity", "must be positive"));
        }
        if self.population.jitter_radius < 0.0 {
            return Err(invalid("population.jitter_radius", "must not be negative"));
        }
        if self.nest.respawn_secs <= 0.0 {
            return Err(invalid("nest.respawn_secs", "must be positive"));
        }
        if self.nest.spawn_radius < 0.0 {
            return Err(invalid("nest.spawn_radius", "must not be negative"));
        }
        if self.nest.escalation_odds == 0 {
            return Err(invalid("nest.escalation_odds", "must be at least 1"));
        }
        if self.nest.max_health <= 0.0 {
            return Err(invalid("nest.max_health", "must be positive"));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.to_string(),
    }
}
