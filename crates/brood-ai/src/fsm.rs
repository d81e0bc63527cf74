//! Enemy behavior finite state machine.
//!
//! One `EnemyController` per hostile entity. The controller never moves
//! anything itself: it reads progress from a `MovementAgent`, issues
//! destinations and stops, and reports attacks back to the caller, which
//! applies them to the player's `CombatTarget`.
//!
//! The pursuit latch is one-way. Once armed, a controller never returns to
//! `Patrolling` or `Idle`, even if the player can no longer be reached.

use tracing::{debug, trace};

use brood_core::constants::TIMER_EPSILON;
use brood_core::enums::EnemyState;
use brood_core::types::Position;

use crate::capabilities::{MovementAgent, WaypointLookup};
use crate::profiles::BehaviorProfile;
use crate::route::WaypointRoute;

/// What the controller knows about the world this tick.
#[derive(Debug, Clone, Copy)]
pub struct Perception {
    /// Simulation clock (seconds).
    pub now_secs: f64,
    /// Length of this tick (seconds).
    pub dt: f64,
    /// The controlled entity's own position.
    pub position: Position,
    /// `None` while the player locator is unresolved.
    pub player: Option<PlayerFix>,
}

/// Resolved player as seen by a controller.
#[derive(Debug, Clone, Copy)]
pub struct PlayerFix {
    pub position: Position,
    /// False once the player's combat target is gone or dead.
    pub targetable: bool,
}

/// A state change, reported so the host can log and publish it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: EnemyState,
    pub to: EnemyState,
}

/// An attack the host must apply to the player.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Strike {
    pub damage: f64,
}

/// Everything a tick produced besides internal state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickOutcome {
    pub transition: Option<Transition>,
    pub strike: Option<Strike>,
    /// Yaw toward the player while attacking.
    pub facing: Option<f64>,
    /// Waypoint that failed to resolve, ending the patrol.
    pub aborted_waypoint: Option<String>,
}

/// Per-entity behavior state machine.
#[derive(Debug, Clone)]
pub struct EnemyController {
    state: EnemyState,
    profile: BehaviorProfile,
    route: Option<WaypointRoute>,
    waypoint_index: Option<usize>,
    wait_remaining: Option<f64>,
    last_attack_secs: f64,
    armed: bool,
}

impl EnemyController {
    /// A controller with a non-empty route starts `Patrolling`; anything
    /// else starts (and, unless armed, stays) `Idle`.
    pub fn new(profile: BehaviorProfile, route: Option<WaypointRoute>) -> Self {
        let route = route.filter(|r| !r.is_empty());
        let state = if route.is_some() {
            EnemyState::Patrolling
        } else {
            EnemyState::Idle
        };
        Self {
            state,
            profile,
            route,
            waypoint_index: None,
            wait_remaining: None,
            last_attack_secs: 0.0,
            armed: false,
        }
    }

    pub fn state(&self) -> EnemyState {
        self.state
    }

    pub fn profile(&self) -> &BehaviorProfile {
        &self.profile
    }

    pub fn route(&self) -> Option<&WaypointRoute> {
        self.route.as_ref()
    }

    /// Index of the current waypoint, only while patrolling or waiting.
    pub fn waypoint_index(&self) -> Option<usize> {
        match self.state {
            EnemyState::Patrolling | EnemyState::Waiting => self.waypoint_index,
            _ => None,
        }
    }

    /// Seconds left in the current dwell, only while waiting.
    pub fn wait_remaining(&self) -> Option<f64> {
        self.wait_remaining
    }

    pub fn last_attack_secs(&self) -> f64 {
        self.last_attack_secs
    }

    /// Whether the pursuit latch is set.
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Send a freshly spawned patroller to its first waypoint.
    pub fn begin_patrol(
        &mut self,
        agent: &mut dyn MovementAgent,
        waypoints: &dyn WaypointLookup,
    ) -> TickOutcome {
        let mut outcome = TickOutcome::default();
        if self.state != EnemyState::Patrolling || self.waypoint_index.is_some() {
            return outcome;
        }
        let from = self.state;
        self.advance_waypoint(agent, waypoints, &mut outcome);
        outcome.transition = self.transition_from(from);
        outcome
    }

    /// Arm pursuit. Idempotent: returns `true` only for the call that set
    /// the latch. Cancels any pending dwell and resumes movement at once.
    pub fn activate_aggro(
        &mut self,
        agent: &mut dyn MovementAgent,
        player: Option<Position>,
    ) -> bool {
        if self.armed || self.state == EnemyState::Dead {
            return false;
        }
        self.armed = true;
        self.wait_remaining = None;
        self.waypoint_index = None;
        self.state = EnemyState::Pursuing;
        agent.set_stopped(false);
        if let Some(target) = player {
            agent.set_destination(target);
        }
        debug!("aggro activated");
        true
    }

    /// Stop everything for good. Returns the transition into `Dead`, if any.
    pub fn mark_dead(&mut self, agent: &mut dyn MovementAgent) -> Option<Transition> {
        if self.state == EnemyState::Dead {
            return None;
        }
        let from = self.state;
        self.state = EnemyState::Dead;
        self.wait_remaining = None;
        agent.set_stopped(true);
        Some(Transition {
            from,
            to: EnemyState::Dead,
        })
    }

    /// Evaluate one simulation tick.
    pub fn tick(
        &mut self,
        perception: &Perception,
        agent: &mut dyn MovementAgent,
        waypoints: &dyn WaypointLookup,
    ) -> TickOutcome {
        let mut outcome = TickOutcome::default();
        if self.state == EnemyState::Dead {
            return outcome;
        }
        let from = self.state;

        if !self.armed && self.detects_player(perception) {
            let target = perception.player.map(|p| p.position);
            self.activate_aggro(agent, target);
        }

        match self.state {
            EnemyState::Idle | EnemyState::Dead => {}
            EnemyState::Patrolling => self.check_arrival(agent),
            EnemyState::Waiting => self.count_down(perception.dt, agent, waypoints, &mut outcome),
            EnemyState::Pursuing | EnemyState::Attacking => {
                self.pursue(perception, agent, &mut outcome)
            }
        }

        outcome.transition = self.transition_from(from);
        outcome
    }

    fn detects_player(&self, perception: &Perception) -> bool {
        let (Some(range), Some(player)) = (self.profile.detection_range, perception.player) else {
            return false;
        };
        player.targetable && perception.position.range_to(&player.position) <= range
    }

    fn check_arrival(&mut self, agent: &mut dyn MovementAgent) {
        let Some(route) = self.route.as_ref() else {
            return;
        };
        let arrive_within = agent.stopping_distance() + route.tolerance();
        if agent.is_path_complete() && agent.remaining_distance() <= arrive_within {
            agent.set_stopped(true);
            self.wait_remaining = Some(route.wait_secs());
            self.state = EnemyState::Waiting;
            trace!(index = ?self.waypoint_index, "arrived at waypoint");
        }
    }

    fn count_down(
        &mut self,
        dt: f64,
        agent: &mut dyn MovementAgent,
        waypoints: &dyn WaypointLookup,
        outcome: &mut TickOutcome,
    ) {
        let remaining = self.wait_remaining.unwrap_or(0.0) - dt;
        if remaining > TIMER_EPSILON {
            self.wait_remaining = Some(remaining);
            return;
        }
        self.wait_remaining = None;
        self.advance_waypoint(agent, waypoints, outcome);
    }

    /// Move on to the next waypoint in the cycle, or give up patrolling if
    /// it no longer exists.
    fn advance_waypoint(
        &mut self,
        agent: &mut dyn MovementAgent,
        waypoints: &dyn WaypointLookup,
        outcome: &mut TickOutcome,
    ) {
        let Some(route) = self.route.as_ref() else {
            self.state = EnemyState::Idle;
            return;
        };
        let Some(next) = route.next_index(self.waypoint_index) else {
            self.state = EnemyState::Idle;
            return;
        };
        let name = route.name(next).unwrap_or_default();

        match waypoints.resolve(name) {
            Some(point) => {
                self.waypoint_index = Some(next);
                self.state = EnemyState::Patrolling;
                agent.set_stopped(false);
                agent.set_destination(point);
                trace!(index = next, waypoint = name, "heading to waypoint");
            }
            None => {
                debug!(index = next, waypoint = name, "waypoint vanished, patrol aborted");
                outcome.aborted_waypoint = Some(name.to_string());
                self.waypoint_index = None;
                self.state = EnemyState::Idle;
                agent.set_stopped(true);
            }
        }
    }

    fn pursue(
        &mut self,
        perception: &Perception,
        agent: &mut dyn MovementAgent,
        outcome: &mut TickOutcome,
    ) {
        // Player unresolved: hold position, stay armed.
        let Some(player) = perception.player else {
            agent.set_stopped(true);
            return;
        };

        let distance = perception.position.range_to(&player.position);
        if distance <= self.profile.attack_range {
            if self.state == EnemyState::Pursuing {
                agent.set_stopped(true);
                self.state = EnemyState::Attacking;
            }
            outcome.facing = Some(perception.position.bearing_to(&player.position));
            if player.targetable {
                outcome.strike = self.try_attack(perception.now_secs);
            }
        } else {
            self.state = EnemyState::Pursuing;
            agent.set_stopped(false);
            agent.set_destination(player.position);
        }
    }

    fn try_attack(&mut self, now_secs: f64) -> Option<Strike> {
        if now_secs - self.last_attack_secs < self.profile.attack_cooldown_secs {
            return None;
        }
        self.last_attack_secs = now_secs;
        Some(Strike {
            damage: self.profile.attack_damage,
        })
    }

    fn transition_from(&self, from: EnemyState) -> Option<Transition> {
        (from != self.state).then_some(Transition {
            from,
            to: self.state,
        })
    }
}
