//! Errors returned by engine operations.
//!
//! None of these stop the simulation; the engine logs rejected commands
//! and carries on with the tick.

use thiserror::Error;

/// Simulation operation error types.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    /// No live entity has this id.
    #[error("entity not found: {0}")]
    UnknownEntity(u64),
    /// The entity exists but has no health.
    #[error("entity {0} cannot take damage")]
    NotDamageable(u64),
    /// The entity exists but has no behavior controller.
    #[error("entity {0} is not a hostile creature")]
    NotHostile(u64),
    /// Damage must be a finite, non-negative amount.
    #[error("invalid damage amount: {0}")]
    InvalidDamage(f64),
    /// An operation needed the player before one was spawned.
    #[error("no player in the world")]
    PlayerMissing,
    /// A player strike was aimed past melee reach.
    #[error("target {target} out of reach: distance {distance:.2}, reach {reach:.2}")]
    OutOfReach {
        target: u64,
        distance: f64,
        reach: f64,
    },
    /// Marker names identify waypoints and must be unique.
    #[error("patrol marker `{0}` already exists")]
    DuplicateMarker(String),
    /// No marker with this name.
    #[error("patrol marker `{0}` not found")]
    UnknownMarker(String),
}

/// Result type for simulation operations.
pub type SimResult<T> = Result<T, SimError>;

/// Raw id used in commands, events and snapshots.
pub fn entity_id(entity: hecs::Entity) -> u64 {
    entity.to_bits().get()
}

/// Resolve a raw id back to a live entity.
pub fn resolve_entity(world: &hecs::World, id: u64) -> SimResult<hecs::Entity> {
    hecs::Entity::from_bits(id)
        .filter(|entity| world.contains(*entity))
        .ok_or(SimError::UnknownEntity(id))
}
