//! Nest system: initial bursts, timed respawns and the alarm.
//!
//! A nest spawns a burst when it is placed, then one entity every
//! `respawn_secs`. Any hit arms every registered controller. Once its
//! health reaches zero the nest is destroyed and removed; nothing it
//! spawned is affected.

use hecs::{Entity, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::info;

use brood_ai::capabilities::CombatTarget;
use brood_core::components::{Health, Nest};
use brood_core::config::{NestConfig, PatrolConfig};
use brood_core::constants::TIMER_EPSILON;
use brood_core::enums::{EnemyVariant, SpawnOrigin};
use brood_core::events::SimEvent;
use brood_core::types::Position;

use crate::directory::EntityDirectory;
use crate::error::entity_id;
use crate::systems::enemy_ai;
use crate::world_setup;

/// Pick a variant for one nest spawn: one in `odds` is a hatchling.
pub fn roll_variant(rng: &mut ChaCha8Rng, odds: u32) -> EnemyVariant {
    if rng.gen_range(0..odds.max(1)) == 0 {
        EnemyVariant::Hatchling
    } else {
        EnemyVariant::Standard
    }
}

/// Place a nest and spawn its initial burst.
pub fn place_nest(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    directory: &mut EntityDirectory,
    position: Position,
    config: &NestConfig,
    patrol: &PatrolConfig,
    events: &mut Vec<SimEvent>,
) -> Entity {
    let nest = world_setup::spawn_nest(world, position, config);
    info!(
        nest = entity_id(nest),
        burst = config.initial_spawn,
        "nest placed"
    );
    for _ in 0..config.initial_spawn {
        spawn_from_nest(
            world,
            rng,
            directory,
            position,
            config.spawn_radius,
            config.escalation_odds,
            patrol,
            events,
        );
    }
    nest
}

/// Advance every live nest's respawn timer.
pub fn run(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    directory: &mut EntityDirectory,
    patrol: &PatrolConfig,
    dt: f64,
    events: &mut Vec<SimEvent>,
) {
    let mut due: Vec<(Position, f64, u32)> = Vec::new();
    for (_entity, (nest, pos)) in world.query_mut::<(&mut Nest, &Position)>() {
        if nest.destroyed {
            continue;
        }
        nest.timer_secs += dt;
        if nest.timer_secs + TIMER_EPSILON >= nest.respawn_secs {
            nest.timer_secs = 0.0;
            due.push((*pos, nest.spawn_radius, nest.escalation_odds));
        }
    }

    for (position, radius, odds) in due {
        spawn_from_nest(world, rng, directory, position, radius, odds, patrol, events);
    }
}

/// Apply damage to a nest. Every hit on a live nest raises the alarm; the
/// hit that takes health to zero also destroys it.
pub fn damage_nest(
    world: &mut World,
    directory: &EntityDirectory,
    player: Option<Position>,
    nest_entity: Entity,
    amount: f64,
    events: &mut Vec<SimEvent>,
) {
    let destroyed = {
        let Ok((nest, health)) = world.query_one_mut::<(&mut Nest, &mut Health)>(nest_entity)
        else {
            return;
        };
        if nest.destroyed {
            return;
        }
        health.take_damage(amount, None);
        nest.destroyed = health.is_dead();
        nest.destroyed
    };

    let armed = directory.broadcast_arm_pursuit(world, player);
    for (entity, transition) in &armed {
        enemy_ai::record_transition(*entity, *transition, events);
    }
    events.push(SimEvent::AlarmRaised {
        nest_id: entity_id(nest_entity),
        newly_armed: armed.len() as u32,
    });

    if destroyed {
        info!(nest = entity_id(nest_entity), "nest destroyed");
        events.push(SimEvent::NestDestroyed {
            nest_id: entity_id(nest_entity),
        });
        let _ = world.despawn(nest_entity);
    }
}

#[allow(clippy::too_many_arguments)]
fn spawn_from_nest(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    directory: &mut EntityDirectory,
    center: Position,
    radius: f64,
    odds: u32,
    patrol: &PatrolConfig,
    events: &mut Vec<SimEvent>,
) {
    let variant = roll_variant(rng, odds);
    let position = world_setup::jitter(rng, center, radius);
    world_setup::spawn_registered(
        world,
        directory,
        events,
        variant,
        SpawnOrigin::Nest,
        position,
        patrol,
    );
}
