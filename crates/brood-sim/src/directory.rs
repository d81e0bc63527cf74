//! Registry of live hostile entities and the population counter.
//!
//! The directory is owned by the engine and handed to every spawn source.
//! It is the only place the live population is counted.

use std::collections::BTreeMap;

use hecs::{Entity, World};
use tracing::{debug, info};

use brood_ai::fsm::Transition;
use brood_core::types::Position;

use crate::error::entity_id;
use crate::systems::enemy_ai;

/// Registered controllers plus the live count of coordinator spawns.
#[derive(Debug, Default)]
pub struct EntityDirectory {
    /// Keyed by raw entity id so iteration order is stable across runs.
    registered: BTreeMap<u64, Entity>,
    live_population: u32,
}

impl EntityDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a controller. Registering the same entity twice is a no-op;
    /// returns whether the entity was newly added.
    pub fn register(&mut self, entity: Entity) -> bool {
        self.registered.insert(entity_id(entity), entity).is_none()
    }

    pub fn is_registered(&self, entity: Entity) -> bool {
        self.registered.contains_key(&entity_id(entity))
    }

    /// Number of registered controllers.
    pub fn len(&self) -> usize {
        self.registered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registered.is_empty()
    }

    /// Copy of the registry, safe to iterate while spawning or despawning.
    pub fn snapshot(&self) -> Vec<Entity> {
        self.registered.values().copied().collect()
    }

    /// Live coordinator-spawned entities.
    pub fn live_population(&self) -> u32 {
        self.live_population
    }

    /// Count one coordinator spawn.
    pub fn increment(&mut self) {
        self.live_population += 1;
    }

    /// Uncount one coordinator spawn, floored at zero.
    pub fn decrement(&mut self) {
        self.live_population = self.live_population.saturating_sub(1);
    }

    /// Handle one death notice: unregister, and uncount if the entity was
    /// counted against the population cap.
    pub fn notify_death(&mut self, entity: Entity, counted: bool) -> bool {
        let was_registered = self.registered.remove(&entity_id(entity)).is_some();
        if counted {
            self.decrement();
        }
        debug!(
            entity = entity_id(entity),
            counted,
            live = self.live_population,
            "death notified"
        );
        was_registered
    }

    /// Arm pursuit on every registered controller. Returns the controllers
    /// that were not already armed, with their transition.
    pub fn broadcast_arm_pursuit(
        &self,
        world: &mut World,
        player: Option<Position>,
    ) -> Vec<(Entity, Transition)> {
        let armed: Vec<(Entity, Transition)> = self
            .snapshot()
            .into_iter()
            .filter_map(|entity| {
                enemy_ai::arm(world, entity, player).map(|transition| (entity, transition))
            })
            .collect();
        info!(
            registered = self.registered.len(),
            newly_armed = armed.len(),
            "alarm broadcast"
        );
        armed
    }
}
