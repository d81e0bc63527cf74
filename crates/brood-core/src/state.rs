//! Simulation snapshot — the complete visible state produced after each tick.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::SimEvent;
use crate::types::{Position, SimTime};

/// Complete simulation state handed to observers after each tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimSnapshot {
    pub time: SimTime,
    pub phase: SimPhase,
    pub player: Option<PlayerView>,
    pub enemies: Vec<EnemyView>,
    pub nests: Vec<NestView>,
    pub markers: Vec<MarkerView>,
    pub population: PopulationView,
    pub events: Vec<SimEvent>,
}

/// The player as seen by the simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerView {
    pub entity_id: u64,
    pub position: Position,
    pub health: f64,
}

/// A hostile entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyView {
    pub entity_id: u64,
    pub variant: EnemyVariant,
    pub origin: SpawnOrigin,
    pub state: EnemyState,
    pub position: Position,
    pub health: f64,
    /// Yaw in radians (0 = North, clockwise).
    pub facing: f64,
    /// Index of the waypoint being walked to or dwelt at.
    pub waypoint_index: Option<usize>,
}

/// A nest that has not yet been removed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NestView {
    pub entity_id: u64,
    pub position: Position,
    pub health: f64,
    pub destroyed: bool,
}

/// A patrol waypoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkerView {
    pub name: String,
    pub position: Position,
}

/// Registry and population counters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PopulationView {
    /// Live coordinator-spawned entities.
    pub live: u32,
    /// Controllers currently registered for alarm broadcast.
    pub registered: u32,
    /// Number of population coordinators.
    pub spawners: u32,
}
