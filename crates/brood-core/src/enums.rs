//! Enumeration types used throughout the simulation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Behavior state of a hostile entity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyState {
    /// No usable patrol route. Only an arm signal leaves this state.
    #[default]
    Idle,
    /// Walking toward the current waypoint.
    Patrolling,
    /// Dwelling at a waypoint.
    Waiting,
    /// Armed and closing on the player.
    Pursuing,
    /// Armed and within reach of the player.
    Attacking,
    /// Killed. No further transitions.
    Dead,
}

impl EnemyState {
    /// Whether the pursuit latch has been set for an entity in this state.
    pub fn is_armed(self) -> bool {
        matches!(self, EnemyState::Pursuing | EnemyState::Attacking)
    }
}

impl fmt::Display for EnemyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Hostile entity archetype. Behavior differences are carried by
/// the matching behavior profile, not by the variant itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyVariant {
    /// Patrols and waits for an alarm.
    #[default]
    Standard,
    /// Weak nest spawn that summons a broodmother when killed.
    Hatchling,
    /// Stronger variant summoned by a dying hatchling.
    Broodmother,
    /// Arms itself when the player walks into its detection radius.
    Sentry,
}

impl fmt::Display for EnemyVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Which source created a hostile entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpawnOrigin {
    /// Population coordinator (counted against the cap).
    Coordinator,
    /// Nest burst or spawn loop.
    Nest,
    /// Death-triggered escalation.
    Escalation,
    /// Placed directly by a command or scenario setup.
    Placed,
}

/// Top-level simulation phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimPhase {
    #[default]
    Active,
    Paused,
}
