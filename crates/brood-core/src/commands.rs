//! External commands sent to the simulation.
//!
//! Commands are queued and processed at the next tick boundary.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::Position;

/// All possible inputs from outside the simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SimCommand {
    // --- Player ---
    /// Place the player. Replaces any previous player entity.
    SpawnPlayer { position: Position },
    /// Teleport the player (stand-in for first-person movement).
    MovePlayer { position: Position },
    /// Melee strike by the player against a target within reach.
    PlayerStrike { target_id: u64 },

    // --- Combat ---
    /// Apply damage from an unspecified source.
    DamageEntity { entity_id: u64, amount: f64 },
    /// Arm pursuit on a single hostile entity.
    ActivateAggro { entity_id: u64 },

    // --- World setup ---
    /// Place a hostile entity directly.
    SpawnEnemy {
        variant: EnemyVariant,
        position: Position,
    },
    /// Place a nest with the configured parameters.
    SpawnNest { position: Position },
    /// Add a population coordinator anchored at a point.
    AddSpawner { anchor: Position },
    /// Add a named patrol waypoint.
    AddPatrolMarker { name: String, position: Position },
    /// Remove a patrol waypoint by name.
    RemovePatrolMarker { name: String },

    // --- Simulation control ---
    /// Set time scale (1.0 = normal, clamped to 0.0..=4.0).
    SetTimeScale { scale: f64 },
    /// Pause the simulation.
    Pause,
    /// Resume the simulation.
    Resume,
}
