//! Entity spawn factories for setting up the simulation world.
//!
//! Creates the player, patrol markers, nests and hostile entities with
//! the appropriate component bundles.

use std::collections::HashMap;

use hecs::{Entity, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use brood_ai::fsm::EnemyController;
use brood_ai::profiles::get_profile;
use brood_ai::route::WaypointRoute;
use brood_core::components::*;
use brood_core::config::{NestConfig, PatrolConfig};
use brood_core::constants::*;
use brood_core::enums::*;
use brood_core::events::SimEvent;
use brood_core::types::Position;

use crate::directory::EntityDirectory;
use crate::error::entity_id;
use crate::systems::movement::Steering;

/// Spawn the player at full health.
pub fn spawn_player(world: &mut World, position: Position) -> Entity {
    world.spawn((
        Player,
        position,
        Health {
            current: DEFAULT_MAX_HEALTH,
            max: DEFAULT_MAX_HEALTH,
        },
        Facing::default(),
    ))
}

/// Place a named patrol waypoint.
pub fn spawn_marker(world: &mut World, name: &str, position: Position) -> Entity {
    world.spawn((
        PatrolMarker {
            name: name.to_string(),
        },
        position,
    ))
}

/// Find a marker entity by name.
pub fn find_marker(world: &World, name: &str) -> Option<Entity> {
    world
        .query::<&PatrolMarker>()
        .iter()
        .find(|(_, marker)| marker.name == name)
        .map(|(entity, _)| entity)
}

/// Current position of every patrol marker, by name.
pub fn marker_index(world: &World) -> HashMap<String, Position> {
    world
        .query::<(&PatrolMarker, &Position)>()
        .iter()
        .map(|(_, (marker, pos))| (marker.name.clone(), *pos))
        .collect()
}

/// Spawn one hostile entity. Patrolling variants discover their route from
/// the markers present right now and head for the first waypoint.
pub fn spawn_enemy(
    world: &mut World,
    variant: EnemyVariant,
    origin: SpawnOrigin,
    position: Position,
    patrol: &PatrolConfig,
) -> Entity {
    let profile = get_profile(variant);
    let markers = marker_index(world);
    let route = profile.patrols.then(|| {
        WaypointRoute::discover(markers.keys().cloned(), patrol.wait_secs, patrol.tolerance)
    });
    if profile.patrols && route.as_ref().is_some_and(WaypointRoute::is_empty) {
        debug!(%variant, "no patrol markers found, entity will idle");
    }

    let mut controller = EnemyController::new(profile, route);
    let mut nav = NavAgent {
        destination: None,
        stopped: false,
        speed: profile.move_speed,
        stopping_distance: AGENT_STOPPING_DISTANCE,
    };
    controller.begin_patrol(&mut Steering::new(&mut nav, position), &markers);

    world.spawn((
        Hostile { variant, origin },
        position,
        Health {
            current: profile.max_health,
            max: profile.max_health,
        },
        Facing::default(),
        nav,
        controller,
    ))
}

/// Spawn a hostile entity and enter it in the directory. Coordinator spawns
/// also count against the population cap.
pub fn spawn_registered(
    world: &mut World,
    directory: &mut EntityDirectory,
    events: &mut Vec<SimEvent>,
    variant: EnemyVariant,
    origin: SpawnOrigin,
    position: Position,
    patrol: &PatrolConfig,
) -> Entity {
    let entity = spawn_enemy(world, variant, origin, position, patrol);
    directory.register(entity);
    if origin == SpawnOrigin::Coordinator {
        directory.increment();
    }
    info!(
        entity = entity_id(entity),
        %variant,
        ?origin,
        live = directory.live_population(),
        "hostile spawned"
    );
    events.push(SimEvent::Spawned {
        entity_id: entity_id(entity),
        variant,
        origin,
        position,
    });
    entity
}

/// Spawn a nest at full health. The initial burst is the nest system's job.
pub fn spawn_nest(world: &mut World, position: Position, config: &NestConfig) -> Entity {
    world.spawn((
        Nest {
            respawn_secs: config.respawn_secs,
            initial_spawn: config.initial_spawn,
            spawn_radius: config.spawn_radius,
            escalation_odds: config.escalation_odds,
            timer_secs: 0.0,
            destroyed: false,
        },
        position,
        Health {
            current: config.max_health,
            max: config.max_health,
        },
    ))
}

/// Random point within `radius` of `center`, at the center's altitude.
pub fn jitter(rng: &mut ChaCha8Rng, center: Position, radius: f64) -> Position {
    if radius <= 0.0 {
        return center;
    }
    // Rejection-sample the unit ball, then drop the vertical component.
    loop {
        let x: f64 = rng.gen_range(-1.0..=1.0);
        let y: f64 = rng.gen_range(-1.0..=1.0);
        let z: f64 = rng.gen_range(-1.0..=1.0);
        if x * x + y * y + z * z <= 1.0 {
            return Position::new(center.x + x * radius, center.y + y * radius, center.z);
        }
    }
}
