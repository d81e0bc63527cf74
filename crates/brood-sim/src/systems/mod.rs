//! ECS systems that operate on the simulation world each tick.
//!
//! Systems are free functions over `&mut World` (or `&World` for read-only).
//! Per-entity state lives in components; the engine owns the rest and
//! passes it in explicitly.

pub mod cleanup;
pub mod combat;
pub mod enemy_ai;
pub mod movement;
pub mod nest;
pub mod population;
pub mod snapshot;
