//! Combat system: damage routing, death processing and escalation.
//!
//! Deaths are published once by the damaged `CombatTarget` into a buffer
//! that the engine drains once per tick through `process_deaths`.

use hecs::{Entity, World};
use tracing::{debug, info};

use brood_ai::capabilities::CombatTarget;
use brood_ai::fsm::EnemyController;
use brood_core::components::{Corpse, Health, Hostile, NavAgent, Nest, Player};
use brood_core::config::PatrolConfig;
use brood_core::constants::CORPSE_GRACE_SECS;
use brood_core::enums::SpawnOrigin;
use brood_core::events::SimEvent;
use brood_core::types::Position;

use crate::directory::EntityDirectory;
use crate::error::{entity_id, SimError, SimResult};
use crate::systems::enemy_ai::{self, PendingStrike};
use crate::systems::movement::Steering;
use crate::world_setup;

/// A death waiting to be processed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeathRecord {
    pub entity: Entity,
    pub killer: Option<u64>,
}

/// Apply `amount` damage to `target`. Nests take the alarm path; anything
/// else with `Health` takes plain damage.
#[allow(clippy::too_many_arguments)]
pub fn apply_damage(
    world: &mut World,
    directory: &EntityDirectory,
    player: Option<Position>,
    target: Entity,
    amount: f64,
    source: Option<u64>,
    deaths: &mut Vec<DeathRecord>,
    events: &mut Vec<SimEvent>,
) -> SimResult<()> {
    if world.get::<&Nest>(target).is_ok() {
        super::nest::damage_nest(world, directory, player, target, amount, events);
        return Ok(());
    }

    let notice = world
        .get::<&mut Health>(target)
        .map_err(|_| SimError::NotDamageable(entity_id(target)))?
        .take_damage(amount, source);
    if let Some(notice) = notice {
        // The controller stops now so the corpse cannot strike or be armed
        // before the death buffer is drained.
        stop_controller(world, target, events);
        deaths.push(DeathRecord {
            entity: target,
            killer: notice.killer,
        });
    }
    Ok(())
}

/// Put a hostile's controller into `Dead`. No-op for anything else.
fn stop_controller(world: &mut World, entity: Entity, events: &mut Vec<SimEvent>) {
    let Ok((pos, nav, controller)) =
        world.query_one_mut::<(&Position, &mut NavAgent, &mut EnemyController)>(entity)
    else {
        return;
    };
    if let Some(transition) = controller.mark_dead(&mut Steering::new(nav, *pos)) {
        enemy_ai::record_transition(entity, transition, events);
    }
}

/// Apply the strikes landed by controllers this tick to the player.
pub fn apply_strikes(
    world: &mut World,
    player: Option<Entity>,
    strikes: Vec<PendingStrike>,
    deaths: &mut Vec<DeathRecord>,
    events: &mut Vec<SimEvent>,
) {
    let Some(player) = player else {
        return;
    };
    for strike in strikes {
        let Ok(mut health) = world.get::<&mut Health>(player) else {
            return;
        };
        if health.is_dead() {
            return;
        }
        let attacker_id = entity_id(strike.attacker);
        if let Some(notice) = health.take_damage(strike.damage, Some(attacker_id)) {
            deaths.push(DeathRecord {
                entity: player,
                killer: notice.killer,
            });
        }
        debug!(
            attacker = attacker_id,
            damage = strike.damage,
            player_health = health.current,
            "player hit"
        );
        events.push(SimEvent::Attack {
            attacker_id,
            target_id: entity_id(player),
            damage: strike.damage,
        });
    }
}

/// Drain the death buffer: stop the dead, update the directory, leave a
/// corpse and run escalation. The player is marked dead but never removed.
pub fn process_deaths(
    world: &mut World,
    directory: &mut EntityDirectory,
    player: Option<Position>,
    patrol: &PatrolConfig,
    deaths: &mut Vec<DeathRecord>,
    events: &mut Vec<SimEvent>,
) {
    for death in deaths.drain(..) {
        let id = entity_id(death.entity);
        events.push(SimEvent::Died {
            entity_id: id,
            killer_id: death.killer,
        });

        if world.get::<&Player>(death.entity).is_ok() {
            info!(entity = id, killer = ?death.killer, "player died");
            continue;
        }

        let Ok(hostile) = world.get::<&Hostile>(death.entity).map(|h| *h) else {
            continue;
        };
        let Ok((pos, controller)) = world
            .query_one_mut::<(&Position, &EnemyController)>(death.entity)
        else {
            continue;
        };
        let last_position = *pos;
        let escalates_to = controller.profile().escalates_to;
        stop_controller(world, death.entity, events);

        directory.notify_death(death.entity, hostile.origin == SpawnOrigin::Coordinator);
        let _ = world.insert_one(
            death.entity,
            Corpse {
                remaining_secs: CORPSE_GRACE_SECS,
            },
        );
        info!(entity = id, variant = %hostile.variant, killer = ?death.killer, "hostile died");

        if let Some(variant) = escalates_to {
            let spawned = world_setup::spawn_registered(
                world,
                directory,
                events,
                variant,
                SpawnOrigin::Escalation,
                last_position,
                patrol,
            );
            if let Some(transition) = enemy_ai::arm(world, spawned, player) {
                enemy_ai::record_transition(spawned, transition, events);
            }
            info!(from = id, spawned = entity_id(spawned), %variant, "escalated");
            events.push(SimEvent::Escalated {
                from_id: id,
                spawned_id: entity_id(spawned),
                variant,
            });
        }
    }
}
