//! Simulation engine for BROOD.
//!
//! Owns the hecs ECS world, runs systems at a fixed tick rate,
//! and produces SimSnapshots for observers.

pub mod directory;
pub mod engine;
pub mod error;
pub mod locator;
pub mod systems;
pub mod world_setup;

pub use brood_core as core;
pub use engine::SimulationEngine;
pub use error::{SimError, SimResult};
