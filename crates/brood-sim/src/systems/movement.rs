//! Straight-line navigation system.
//!
//! Walks every unstopped `NavAgent` toward its destination at its own speed
//! and halts at the stopping distance. `Steering` exposes an agent to the
//! controller through the `MovementAgent` capability.

use hecs::World;

use brood_ai::capabilities::MovementAgent;
use brood_core::components::NavAgent;
use brood_core::types::Position;

/// A `NavAgent` borrowed together with its entity's position.
pub struct Steering<'a> {
    nav: &'a mut NavAgent,
    position: Position,
}

impl<'a> Steering<'a> {
    pub fn new(nav: &'a mut NavAgent, position: Position) -> Self {
        Self { nav, position }
    }
}

impl MovementAgent for Steering<'_> {
    fn set_destination(&mut self, point: Position) {
        self.nav.destination = Some(point);
    }

    fn set_stopped(&mut self, stopped: bool) {
        self.nav.stopped = stopped;
    }

    /// Open ground: any destination is reachable.
    fn is_path_complete(&self) -> bool {
        self.nav.destination.is_some()
    }

    fn remaining_distance(&self) -> f64 {
        self.nav
            .destination
            .map_or(f64::INFINITY, |goal| self.position.range_to(&goal))
    }

    fn stopping_distance(&self) -> f64 {
        self.nav.stopping_distance
    }
}

/// Advance every moving agent by one tick of `dt` seconds.
pub fn run(world: &mut World, dt: f64) {
    for (_entity, (pos, nav)) in world.query_mut::<(&mut Position, &NavAgent)>() {
        if nav.stopped {
            continue;
        }
        let Some(goal) = nav.destination else {
            continue;
        };
        let remaining = pos.range_to(&goal) - nav.stopping_distance;
        if remaining <= 0.0 {
            continue;
        }
        *pos = pos.step_toward(&goal, (nav.speed * dt).min(remaining));
    }
}
