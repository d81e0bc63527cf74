//! Capabilities the controller relies on but does not implement.
//!
//! Movement execution, damage bookkeeping and waypoint placement belong to
//! the host simulation. The controller only issues commands and reads
//! progress through these traits.

use std::collections::HashMap;

use brood_core::components::Health;
use brood_core::types::Position;

/// Something that can walk an entity to a point.
pub trait MovementAgent {
    /// Head for `point`. Replaces any previous destination.
    fn set_destination(&mut self, point: Position);
    /// Halt (`true`) or resume (`false`) without dropping the destination.
    fn set_stopped(&mut self, stopped: bool);
    /// Whether a complete path to the destination exists.
    fn is_path_complete(&self) -> bool;
    /// Distance left along the path, in meters.
    fn remaining_distance(&self) -> f64;
    /// Distance from the goal at which the agent stops on its own.
    fn stopping_distance(&self) -> f64;
}

/// Published exactly once, by the hit that takes health to zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeathNotice {
    /// Raw id of whoever dealt the killing blow, if known.
    pub killer: Option<u64>,
}

/// Something that can be hurt.
pub trait CombatTarget {
    /// Apply damage. A no-op when already at or below zero health.
    fn take_damage(&mut self, amount: f64, source: Option<u64>) -> Option<DeathNotice>;
    /// Current health.
    fn health(&self) -> f64;

    fn is_dead(&self) -> bool {
        self.health() <= 0.0
    }
}

/// Resolves patrol marker names to their current positions.
pub trait WaypointLookup {
    /// `None` once the marker has been removed.
    fn resolve(&self, name: &str) -> Option<Position>;
}

impl CombatTarget for Health {
    fn take_damage(&mut self, amount: f64, source: Option<u64>) -> Option<DeathNotice> {
        if self.current <= 0.0 {
            return None;
        }
        self.current -= amount;
        if self.current <= 0.0 {
            Some(DeathNotice { killer: source })
        } else {
            None
        }
    }

    fn health(&self) -> f64 {
        self.current
    }
}

impl WaypointLookup for HashMap<String, Position> {
    fn resolve(&self, name: &str) -> Option<Position> {
        self.get(name).copied()
    }
}
