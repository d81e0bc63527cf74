//! Player locator service.
//!
//! Owned by the engine and passed to the systems that need the player,
//! instead of being looked up from a global.

use hecs::{Entity, World};
use tracing::{info, warn};

use brood_ai::capabilities::CombatTarget;
use brood_ai::fsm::PlayerFix;
use brood_core::components::{Health, Player};
use brood_core::types::Position;

/// Snapshot of the player for one tick.
#[derive(Debug, Clone, Copy)]
pub struct LocatedPlayer {
    pub entity: Entity,
    pub position: Position,
    /// Alive and carrying health.
    pub targetable: bool,
}

impl LocatedPlayer {
    pub fn fix(&self) -> PlayerFix {
        PlayerFix {
            position: self.position,
            targetable: self.targetable,
        }
    }
}

/// Resolves the current player entity.
#[derive(Debug, Default)]
pub struct PlayerLocator {
    player: Option<Entity>,
    warned_unresolved: bool,
}

impl PlayerLocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Point the locator at a player entity.
    pub fn bind(&mut self, entity: Entity) {
        self.player = Some(entity);
        self.warned_unresolved = false;
        info!(entity = entity.to_bits().get(), "player located");
    }

    pub fn entity(&self) -> Option<Entity> {
        self.player
    }

    /// Current player state, or `None` if no live player entity is bound.
    pub fn locate(&self, world: &World) -> Option<LocatedPlayer> {
        let entity = self.player?;
        let position = *world.get::<&Position>(entity).ok()?;
        if world.get::<&Player>(entity).is_err() {
            return None;
        }
        let targetable = world
            .get::<&Health>(entity)
            .map(|health| !health.is_dead())
            .unwrap_or(false);
        Some(LocatedPlayer {
            entity,
            position,
            targetable,
        })
    }

    /// Log once per unresolved stretch; pursuit stays disabled meanwhile.
    pub fn note_unresolved(&mut self) {
        if !self.warned_unresolved {
            warn!("player not resolved; pursuit disabled until a player is spawned");
            self.warned_unresolved = true;
        }
    }
}
