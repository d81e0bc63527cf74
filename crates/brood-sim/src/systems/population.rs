//! Population coordinator system: keeps hostiles spawning near the player.
//!
//! Each coordinator is anchored at a fixed point. While the player is
//! within `proximity` of the anchor it spawns one entity per `interval_secs`,
//! up to `max_population` live coordinator spawns across all coordinators.

use hecs::World;
use rand_chacha::ChaCha8Rng;
use tracing::trace;

use brood_core::config::{PatrolConfig, PopulationConfig};
use brood_core::constants::TIMER_EPSILON;
use brood_core::enums::{EnemyVariant, SpawnOrigin};
use brood_core::events::SimEvent;
use brood_core::types::Position;

use crate::directory::EntityDirectory;
use crate::world_setup;

/// A spawn source anchored in the world.
#[derive(Debug, Clone)]
pub struct PopulationCoordinator {
    anchor: Position,
    variant: EnemyVariant,
    config: PopulationConfig,
    /// Seconds accumulated since the last spawn.
    accumulator: f64,
}

impl PopulationCoordinator {
    pub fn new(anchor: Position, variant: EnemyVariant, config: PopulationConfig) -> Self {
        Self {
            anchor,
            variant,
            config,
            accumulator: 0.0,
        }
    }

    pub fn anchor(&self) -> Position {
        self.anchor
    }

    pub fn variant(&self) -> EnemyVariant {
        self.variant
    }

    pub fn accumulator(&self) -> f64 {
        self.accumulator
    }

    /// Advance the timer. Returns `true` when a spawn is due now; the
    /// accumulator is reset only when it is.
    pub fn tick(&mut self, dt: f64, player: Option<Position>, live: u32) -> bool {
        self.accumulator += dt;
        let Some(player) = player else {
            return false;
        };
        if self.accumulator + TIMER_EPSILON < self.config.interval_secs {
            return false;
        }
        if self.anchor.range_to(&player) >= self.config.proximity {
            return false;
        }
        if live >= self.config.max_population {
            trace!(
                live,
                cap = self.config.max_population,
                "spawn skipped, population cap reached"
            );
            return false;
        }
        self.accumulator = 0.0;
        true
    }
}

/// Tick every coordinator and spawn whatever is due.
#[allow(clippy::too_many_arguments)]
pub fn run(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    coordinators: &mut [PopulationCoordinator],
    directory: &mut EntityDirectory,
    player: Option<Position>,
    patrol: &PatrolConfig,
    dt: f64,
    events: &mut Vec<SimEvent>,
) {
    for coordinator in coordinators.iter_mut() {
        if !coordinator.tick(dt, player, directory.live_population()) {
            continue;
        }
        let position =
            world_setup::jitter(rng, coordinator.anchor, coordinator.config.jitter_radius);
        world_setup::spawn_registered(
            world,
            directory,
            events,
            coordinator.variant,
            SpawnOrigin::Coordinator,
            position,
            patrol,
        );
    }
}
