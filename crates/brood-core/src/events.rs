//! Events emitted by the simulation for logging, audio and UI feedback.
//!
//! Entity ids are the raw bits of the ECS entity handle.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::Position;

/// Something observable that happened during a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SimEvent {
    /// A hostile entity entered the world.
    Spawned {
        entity_id: u64,
        variant: EnemyVariant,
        origin: SpawnOrigin,
        position: Position,
    },
    /// A controller changed behavior state.
    StateChanged {
        entity_id: u64,
        from: EnemyState,
        to: EnemyState,
    },
    /// A waypoint vanished mid-patrol; the entity gave up patrolling.
    PatrolAborted { entity_id: u64, waypoint: String },
    /// A nest was hit and armed every registered controller.
    AlarmRaised { nest_id: u64, newly_armed: u32 },
    /// A hostile landed a hit on the player.
    Attack {
        attacker_id: u64,
        target_id: u64,
        damage: f64,
    },
    /// Something died. `killer_id` is absent when the source is unknown.
    Died {
        entity_id: u64,
        killer_id: Option<u64>,
    },
    /// A dying entity summoned a stronger, pre-armed replacement.
    Escalated {
        from_id: u64,
        spawned_id: u64,
        variant: EnemyVariant,
    },
    /// A nest's health reached zero.
    NestDestroyed { nest_id: u64 },
}
