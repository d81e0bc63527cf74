//! Enemy AI system: ticks every behavior controller.
//!
//! Controllers never touch the player directly. Attacks come back as
//! strikes and are applied by the combat system after all controllers ran.

use hecs::{Entity, World};
use tracing::{debug, info};

use brood_ai::fsm::{EnemyController, Perception, Transition};
use brood_core::components::{Facing, NavAgent};
use brood_core::events::SimEvent;
use brood_core::types::Position;

use crate::error::entity_id;
use crate::locator::LocatedPlayer;
use crate::systems::movement::Steering;
use crate::world_setup;

/// An attack a controller landed this tick.
#[derive(Debug, Clone, Copy)]
pub struct PendingStrike {
    pub attacker: Entity,
    pub damage: f64,
}

/// Run one tick of every live controller.
pub fn run(
    world: &mut World,
    now_secs: f64,
    dt: f64,
    player: Option<LocatedPlayer>,
    events: &mut Vec<SimEvent>,
) -> Vec<PendingStrike> {
    let markers = world_setup::marker_index(world);
    let fix = player.map(|p| p.fix());
    let mut strikes = Vec::new();

    for (entity, (pos, nav, controller, facing)) in world.query_mut::<(
        &Position,
        &mut NavAgent,
        &mut EnemyController,
        &mut Facing,
    )>() {
        let perception = Perception {
            now_secs,
            dt,
            position: *pos,
            player: fix,
        };
        let outcome = controller.tick(&perception, &mut Steering::new(nav, *pos), &markers);

        if let Some(yaw) = outcome.facing {
            facing.yaw = yaw;
        }
        if let Some(waypoint) = outcome.aborted_waypoint {
            info!(entity = entity_id(entity), %waypoint, "patrol aborted, waypoint missing");
            events.push(SimEvent::PatrolAborted {
                entity_id: entity_id(entity),
                waypoint,
            });
        }
        if let Some(transition) = outcome.transition {
            record_transition(entity, transition, events);
        }
        if let Some(strike) = outcome.strike {
            strikes.push(PendingStrike {
                attacker: entity,
                damage: strike.damage,
            });
        }
    }

    strikes
}

/// Arm a single controller. Returns the transition if this call set the
/// pursuit latch; `None` if it was already armed, dead, or not a controller.
pub fn arm(world: &mut World, entity: Entity, player: Option<Position>) -> Option<Transition> {
    let (pos, nav, controller) = world
        .query_one_mut::<(&Position, &mut NavAgent, &mut EnemyController)>(entity)
        .ok()?;
    let from = controller.state();
    let armed = controller.activate_aggro(&mut Steering::new(nav, *pos), player);
    armed.then_some(Transition {
        from,
        to: controller.state(),
    })
}

/// Log and publish a controller state change.
pub fn record_transition(entity: Entity, transition: Transition, events: &mut Vec<SimEvent>) {
    debug!(
        entity = entity_id(entity),
        from = %transition.from,
        to = %transition.to,
        "state changed"
    );
    events.push(SimEvent::StateChanged {
        entity_id: entity_id(entity),
        from: transition.from,
        to: transition.to,
    });
}
