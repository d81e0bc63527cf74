//! Snapshot system: queries the ECS world and builds a complete SimSnapshot.
//!
//! This system is read-only — it never modifies the world.

use hecs::World;

use brood_ai::fsm::EnemyController;
use brood_core::components::*;
use brood_core::enums::SimPhase;
use brood_core::events::SimEvent;
use brood_core::state::*;
use brood_core::types::{Position, SimTime};

use crate::directory::EntityDirectory;
use crate::error::entity_id;

/// Build a complete SimSnapshot from the current world state.
pub fn build_snapshot(
    world: &World,
    time: &SimTime,
    phase: SimPhase,
    directory: &EntityDirectory,
    spawners: usize,
    events: Vec<SimEvent>,
) -> SimSnapshot {
    SimSnapshot {
        time: *time,
        phase,
        player: build_player(world),
        enemies: build_enemies(world),
        nests: build_nests(world),
        markers: build_markers(world),
        population: PopulationView {
            live: directory.live_population(),
            registered: directory.len() as u32,
            spawners: spawners as u32,
        },
        events,
    }
}

fn build_player(world: &World) -> Option<PlayerView> {
    world
        .query::<(&Player, &Position, &Health)>()
        .iter()
        .next()
        .map(|(entity, (_, pos, health))| PlayerView {
            entity_id: entity_id(entity),
            position: *pos,
            health: health.current,
        })
}

/// Build EnemyView list, ordered by entity id.
fn build_enemies(world: &World) -> Vec<EnemyView> {
    let mut enemies: Vec<EnemyView> = world
        .query::<(&Hostile, &Position, &Health, &Facing, &EnemyController)>()
        .iter()
        .map(|(entity, (hostile, pos, health, facing, controller))| EnemyView {
            entity_id: entity_id(entity),
            variant: hostile.variant,
            origin: hostile.origin,
            state: controller.state(),
            position: *pos,
            health: health.current,
            facing: facing.yaw,
            waypoint_index: controller.waypoint_index(),
        })
        .collect();

    enemies.sort_by_key(|e| e.entity_id);
    enemies
}

fn build_nests(world: &World) -> Vec<NestView> {
    let mut nests: Vec<NestView> = world
        .query::<(&Nest, &Position, &Health)>()
        .iter()
        .map(|(entity, (nest, pos, health))| NestView {
            entity_id: entity_id(entity),
            position: *pos,
            health: health.current,
            destroyed: nest.destroyed,
        })
        .collect();

    nests.sort_by_key(|n| n.entity_id);
    nests
}

/// Build MarkerView list, ordered by name.
fn build_markers(world: &World) -> Vec<MarkerView> {
    let mut markers: Vec<MarkerView> = world
        .query::<(&PatrolMarker, &Position)>()
        .iter()
        .map(|(_, (marker, pos))| MarkerView {
            name: marker.name.clone(),
            position: *pos,
        })
        .collect();

    markers.sort_by(|a, b| a.name.cmp(&b.name));
    markers
}
