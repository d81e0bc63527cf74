//! ECS components for hecs entities.
//!
//! Components are plain data structs with no methods.
//! Game logic lives in systems and in the brood-ai crate, not components.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::Position;

/// Marks an entity as a hostile creature.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Hostile {
    pub variant: EnemyVariant,
    pub origin: SpawnOrigin,
}

/// Marks the player entity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Player;

/// Hit points of anything that can be damaged.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Health {
    pub current: f64,
    pub max: f64,
}

/// Horizontal orientation, updated when an entity turns to face a target.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Facing {
    /// Yaw in radians (0 = North, clockwise).
    pub yaw: f64,
}

/// Straight-line navigation state driven by the movement system.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct NavAgent {
    /// Current goal, if any.
    pub destination: Option<Position>,
    /// While stopped the agent keeps its goal but does not move.
    pub stopped: bool,
    /// Meters per second.
    pub speed: f64,
    /// Distance from the goal at which the agent counts as arrived.
    pub stopping_distance: f64,
}

/// A named patrol waypoint placed in the world.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatrolMarker {
    pub name: String,
}

/// Stationary spawner that raises the alarm when hit.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Nest {
    pub respawn_secs: f64,
    pub initial_spawn: u32,
    pub spawn_radius: f64,
    /// One in this many spawns is the escalation-capable variant.
    pub escalation_odds: u32,
    /// Seconds accumulated toward the next timed spawn.
    pub timer_secs: f64,
    /// Set once health reaches zero. Never cleared.
    pub destroyed: bool,
}

/// A dead hostile waiting out its grace period before despawn.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Corpse {
    pub remaining_secs: f64,
}
