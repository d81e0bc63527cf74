//! Cleanup system: removes corpses once their grace period runs out.

use hecs::{Entity, World};
use tracing::trace;

use brood_core::components::Corpse;
use brood_core::constants::TIMER_EPSILON;

/// Count corpses down and despawn the expired ones.
/// Uses a pre-allocated buffer to avoid per-tick allocation.
pub fn run(world: &mut World, dt: f64, despawn_buffer: &mut Vec<Entity>) {
    despawn_buffer.clear();

    for (entity, corpse) in world.query_mut::<&mut Corpse>() {
        corpse.remaining_secs -= dt;
        if corpse.remaining_secs <= TIMER_EPSILON {
            despawn_buffer.push(entity);
        }
    }

    for entity in despawn_buffer.drain(..) {
        trace!(entity = entity.to_bits().get(), "corpse removed");
        let _ = world.despawn(entity);
    }
}
