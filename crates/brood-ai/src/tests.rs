#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use proptest::prelude::*;

    use brood_core::components::Health;
    use brood_core::constants::DT;
    use brood_core::enums::{EnemyState, EnemyVariant};
    use brood_core::types::Position;

    use crate::capabilities::{CombatTarget, DeathNotice, MovementAgent};
    use crate::fsm::{EnemyController, Perception, PlayerFix, Strike, TickOutcome, Transition};
    use crate::profiles::get_profile;
    use crate::route::WaypointRoute;

    /// Movement stand-in: the test decides where the entity is.
    #[derive(Debug, Default)]
    struct ScriptedAgent {
        at: Position,
        destination: Option<Position>,
        stopped: bool,
        path_complete: bool,
        stopping: f64,
        calls: usize,
    }

    impl ScriptedAgent {
        fn new() -> Self {
            Self {
                path_complete: true,
                ..Default::default()
            }
        }

        fn arrive(&mut self) {
            if let Some(dest) = self.destination {
                self.at = dest;
            }
        }
    }

    impl MovementAgent for ScriptedAgent {
        fn set_destination(&mut self, point: Position) {
            self.calls += 1;
            self.destination = Some(point);
        }

        fn set_stopped(&mut self, stopped: bool) {
            self.calls += 1;
            self.stopped = stopped;
        }

        fn is_path_complete(&self) -> bool {
            self.path_complete && self.destination.is_some()
        }

        fn remaining_distance(&self) -> f64 {
            self.destination
                .map_or(f64::INFINITY, |dest| self.at.range_to(&dest))
        }

        fn stopping_distance(&self) -> f64 {
            self.stopping
        }
    }

    fn abc_markers() -> HashMap<String, Position> {
        HashMap::from([
            ("A".to_string(), Position::new(0.0, 0.0, 0.0)),
            ("B".to_string(), Position::new(10.0, 0.0, 0.0)),
            ("C".to_string(), Position::new(10.0, 10.0, 0.0)),
        ])
    }

    fn abc_route() -> WaypointRoute {
        // Deliberately unsorted: discovery order must not matter.
        WaypointRoute::discover(["C", "A", "B"], 2.0, 0.5)
    }

    fn perceive(now_secs: f64, position: Position, player: Option<Position>) -> Perception {
        Perception {
            now_secs,
            dt: DT,
            position,
            player: player.map(|position| PlayerFix {
                position,
                targetable: true,
            }),
        }
    }

    fn standard() -> EnemyController {
        EnemyController::new(get_profile(EnemyVariant::Standard), None)
    }

    // ---- Route ----

    #[test]
    fn test_route_sorted_by_name() {
        let route = abc_route();
        assert_eq!(route.names(), ["A", "B", "C"]);
        assert_eq!(route.name(1), Some("B"));
        assert_eq!(route.name(3), None);
    }

    #[test]
    fn test_route_first_index_is_zero() {
        let route = abc_route();
        assert_eq!(route.next_index(None), Some(0));
        assert_eq!(route.next_index(Some(2)), Some(0));

        let empty = WaypointRoute::discover(Vec::<String>::new(), 2.0, 0.5);
        assert_eq!(empty.next_index(None), None);
    }

    proptest! {
        #[test]
        fn prop_route_indices_cycle(len in 1usize..12, steps in 1usize..64) {
            let names: Vec<String> = (0..len).map(|i| format!("P{i:02}")).collect();
            let route = WaypointRoute::discover(names, 1.0, 0.5);
            let mut index = None;
            for step in 0..steps {
                index = route.next_index(index);
                prop_assert_eq!(index, Some(step % len));
            }
        }
    }

    // ---- Initial state ----

    #[test]
    fn test_no_route_starts_idle() {
        let ctrl = standard();
        assert_eq!(ctrl.state(), EnemyState::Idle);

        let empty = WaypointRoute::discover(Vec::<String>::new(), 2.0, 0.5);
        let ctrl = EnemyController::new(get_profile(EnemyVariant::Standard), Some(empty));
        assert_eq!(ctrl.state(), EnemyState::Idle);
        assert!(ctrl.route().is_none());
    }

    #[test]
    fn test_idle_never_starts_patrolling() {
        let mut ctrl = standard();
        let mut agent = ScriptedAgent::new();
        let markers = abc_markers();
        for i in 0..100 {
            let out = ctrl.tick(
                &perceive(i as f64 * DT, Position::default(), None),
                &mut agent,
                &markers,
            );
            assert!(out.transition.is_none());
        }
        assert_eq!(ctrl.state(), EnemyState::Idle);
        assert_eq!(agent.calls, 0);
    }

    #[test]
    fn test_begin_patrol_heads_to_first_waypoint() {
        let mut ctrl = EnemyController::new(get_profile(EnemyVariant::Standard), Some(abc_route()));
        let mut agent = ScriptedAgent::new();
        ctrl.begin_patrol(&mut agent, &abc_markers());

        assert_eq!(ctrl.state(), EnemyState::Patrolling);
        assert_eq!(ctrl.waypoint_index(), Some(0));
        assert_eq!(agent.destination, Some(Position::new(0.0, 0.0, 0.0)));
        assert!(!agent.stopped);
    }

    // ---- Patrol cycle ----

    /// Route [A, B, C], tolerance 0.5, wait 2.0 s: A, B, C, A, B, C, A ...
    #[test]
    fn test_patrol_scenario_cycles_abc() {
        let markers = abc_markers();
        let mut ctrl = EnemyController::new(get_profile(EnemyVariant::Standard), Some(abc_route()));
        let mut agent = ScriptedAgent::new();
        agent.at = Position::new(-5.0, 0.0, 0.0);
        ctrl.begin_patrol(&mut agent, &markers);

        let mut visited = Vec::new();
        let mut now = 0.0;
        for _ in 0..7 {
            agent.arrive();
            let out = ctrl.tick(&perceive(now, agent.at, None), &mut agent, &markers);
            now += DT;
            assert_eq!(
                out.transition,
                Some(Transition {
                    from: EnemyState::Patrolling,
                    to: EnemyState::Waiting
                })
            );
            assert!(agent.stopped, "agent must stop while waiting");
            visited.push(ctrl.waypoint_index().unwrap());

            // Dwell for the configured 2.0 seconds.
            let mut waiting_ticks = 0;
            while ctrl.state() == EnemyState::Waiting {
                ctrl.tick(&perceive(now, agent.at, None), &mut agent, &markers);
                now += DT;
                waiting_ticks += 1;
                assert!(waiting_ticks <= 61, "wait did not elapse");
            }
            let waited = waiting_ticks as f64 * DT;
            assert!((waited - 2.0).abs() <= DT + 1e-9, "waited {waited}s");
            assert_eq!(ctrl.state(), EnemyState::Patrolling);
            assert!(!agent.stopped);
        }

        assert_eq!(visited, vec![0, 1, 2, 0, 1, 2, 0]);
    }

    #[test]
    fn test_arrival_respects_tolerance() {
        let markers = abc_markers();
        let mut ctrl = EnemyController::new(get_profile(EnemyVariant::Standard), Some(abc_route()));
        let mut agent = ScriptedAgent::new();
        ctrl.begin_patrol(&mut agent, &markers);

        agent.at = Position::new(0.6, 0.0, 0.0);
        ctrl.tick(&perceive(0.0, agent.at, None), &mut agent, &markers);
        assert_eq!(ctrl.state(), EnemyState::Patrolling);

        agent.at = Position::new(0.4, 0.0, 0.0);
        ctrl.tick(&perceive(DT, agent.at, None), &mut agent, &markers);
        assert_eq!(ctrl.state(), EnemyState::Waiting);
        assert_eq!(ctrl.wait_remaining(), Some(2.0));
    }

    #[test]
    fn test_stopping_distance_extends_arrival() {
        let markers = abc_markers();
        let mut ctrl = EnemyController::new(get_profile(EnemyVariant::Standard), Some(abc_route()));
        let mut agent = ScriptedAgent::new();
        agent.stopping = 1.0;
        ctrl.begin_patrol(&mut agent, &markers);

        agent.at = Position::new(1.4, 0.0, 0.0);
        ctrl.tick(&perceive(0.0, agent.at, None), &mut agent, &markers);
        assert_eq!(ctrl.state(), EnemyState::Waiting);
    }

    #[test]
    fn test_incomplete_path_never_arrives() {
        let markers = abc_markers();
        let mut ctrl = EnemyController::new(get_profile(EnemyVariant::Standard), Some(abc_route()));
        let mut agent = ScriptedAgent::new();
        ctrl.begin_patrol(&mut agent, &markers);
        agent.path_complete = false;
        agent.arrive();

        ctrl.tick(&perceive(0.0, agent.at, None), &mut agent, &markers);
        assert_eq!(ctrl.state(), EnemyState::Patrolling);
    }

    #[test]
    fn test_removed_waypoint_aborts_patrol() {
        let mut markers = abc_markers();
        let mut ctrl = EnemyController::new(get_profile(EnemyVariant::Standard), Some(abc_route()));
        let mut agent = ScriptedAgent::new();
        ctrl.begin_patrol(&mut agent, &markers);
        agent.arrive();
        ctrl.tick(&perceive(0.0, agent.at, None), &mut agent, &markers);
        assert_eq!(ctrl.state(), EnemyState::Waiting);

        markers.remove("B");
        let mut aborted = None;
        for i in 0..70 {
            let out = ctrl.tick(&perceive(i as f64 * DT, agent.at, None), &mut agent, &markers);
            if out.aborted_waypoint.is_some() {
                aborted = out.aborted_waypoint;
                assert_eq!(
                    out.transition,
                    Some(Transition {
                        from: EnemyState::Waiting,
                        to: EnemyState::Idle
                    })
                );
            }
        }
        assert_eq!(aborted.as_deref(), Some("B"));
        assert_eq!(ctrl.state(), EnemyState::Idle);
        assert_eq!(ctrl.waypoint_index(), None);
    }

    #[test]
    fn test_missing_first_waypoint_goes_idle() {
        let markers = HashMap::new();
        let mut ctrl = EnemyController::new(get_profile(EnemyVariant::Standard), Some(abc_route()));
        let mut agent = ScriptedAgent::new();
        let out = ctrl.begin_patrol(&mut agent, &markers);
        assert_eq!(out.aborted_waypoint.as_deref(), Some("A"));
        assert_eq!(ctrl.state(), EnemyState::Idle);
    }

    // ---- Aggro ----

    #[test]
    fn test_activate_aggro_cancels_wait() {
        let markers = abc_markers();
        let mut ctrl = EnemyController::new(get_profile(EnemyVariant::Standard), Some(abc_route()));
        let mut agent = ScriptedAgent::new();
        ctrl.begin_patrol(&mut agent, &markers);
        agent.arrive();
        ctrl.tick(&perceive(0.0, agent.at, None), &mut agent, &markers);
        assert_eq!(ctrl.state(), EnemyState::Waiting);
        assert!(agent.stopped);

        let player = Position::new(30.0, 0.0, 0.0);
        assert!(ctrl.activate_aggro(&mut agent, Some(player)));
        assert_eq!(ctrl.state(), EnemyState::Pursuing);
        assert_eq!(ctrl.wait_remaining(), None);
        assert!(!agent.stopped);
        assert_eq!(agent.destination, Some(player));
    }

    #[test]
    fn test_activate_aggro_is_idempotent() {
        let player = Some(Position::new(5.0, 5.0, 0.0));

        let mut once = EnemyController::new(get_profile(EnemyVariant::Standard), Some(abc_route()));
        let mut agent_once = ScriptedAgent::new();
        once.begin_patrol(&mut agent_once, &abc_markers());
        assert!(once.activate_aggro(&mut agent_once, player));

        let mut many = EnemyController::new(get_profile(EnemyVariant::Standard), Some(abc_route()));
        let mut agent_many = ScriptedAgent::new();
        many.begin_patrol(&mut agent_many, &abc_markers());
        assert!(many.activate_aggro(&mut agent_many, player));
        for _ in 0..4 {
            assert!(!many.activate_aggro(&mut agent_many, player));
        }

        assert_eq!(once.state(), many.state());
        assert_eq!(once.is_armed(), many.is_armed());
        assert_eq!(once.wait_remaining(), many.wait_remaining());
        assert_eq!(agent_once.calls, agent_many.calls);
        assert_eq!(agent_once.destination, agent_many.destination);
        assert_eq!(agent_once.stopped, agent_many.stopped);
    }

    #[test]
    fn test_aggro_from_idle() {
        let mut ctrl = standard();
        let mut agent = ScriptedAgent::new();
        assert!(ctrl.activate_aggro(&mut agent, None));
        assert_eq!(ctrl.state(), EnemyState::Pursuing);
        assert!(ctrl.is_armed());
    }

    #[test]
    fn test_unresolved_player_holds_position_while_armed() {
        let mut ctrl = standard();
        let mut agent = ScriptedAgent::new();
        ctrl.activate_aggro(&mut agent, None);
        for i in 0..30 {
            ctrl.tick(
                &perceive(i as f64 * DT, Position::default(), None),
                &mut agent,
                &HashMap::new(),
            );
        }
        assert_eq!(ctrl.state(), EnemyState::Pursuing);
        assert!(agent.stopped);
    }

    proptest! {
        /// Once armed, nothing brings the controller back to patrol or idle.
        #[test]
        fn prop_pursuit_latch_is_one_way(
            sightings in proptest::collection::vec(proptest::option::of(0.0f64..40.0), 1..120),
            arm_at_waiting in any::<bool>(),
        ) {
            let markers = abc_markers();
            let mut ctrl = EnemyController::new(get_profile(EnemyVariant::Standard), Some(abc_route()));
            let mut agent = ScriptedAgent::new();
            ctrl.begin_patrol(&mut agent, &markers);
            if arm_at_waiting {
                agent.arrive();
                ctrl.tick(&perceive(0.0, agent.at, None), &mut agent, &markers);
            }
            ctrl.activate_aggro(&mut agent, None);

            let me = Position::default();
            for (i, sighting) in sightings.iter().enumerate() {
                let player = sighting.map(|d| Position::new(d, 0.0, 0.0));
                ctrl.tick(&perceive(i as f64 * DT, me, player), &mut agent, &markers);
                prop_assert!(ctrl.state().is_armed(), "left pursuit: {:?}", ctrl.state());
            }
        }
    }

    // ---- Pursuit and attack ----

    #[test]
    fn test_pursuit_tracks_player_each_tick() {
        let mut ctrl = standard();
        let mut agent = ScriptedAgent::new();
        ctrl.activate_aggro(&mut agent, None);

        for step in 0..5 {
            let player = Position::new(20.0 + step as f64, 0.0, 0.0);
            ctrl.tick(
                &perceive(step as f64 * DT, Position::default(), Some(player)),
                &mut agent,
                &HashMap::new(),
            );
            assert_eq!(agent.destination, Some(player));
            assert_eq!(ctrl.state(), EnemyState::Pursuing);
        }
    }

    #[test]
    fn test_pursuing_to_attacking_and_back() {
        let mut ctrl = standard();
        let mut agent = ScriptedAgent::new();
        ctrl.activate_aggro(&mut agent, None);
        let me = Position::default();

        let out = ctrl.tick(
            &perceive(5.0, me, Some(Position::new(0.0, 1.5, 0.0))),
            &mut agent,
            &HashMap::new(),
        );
        assert_eq!(
            out.transition,
            Some(Transition {
                from: EnemyState::Pursuing,
                to: EnemyState::Attacking
            })
        );
        assert!(agent.stopped);
        assert!(out.facing.unwrap().abs() < 1e-10, "should face north");
        assert_eq!(out.strike, Some(Strike { damage: 20.0 }));

        let far = Position::new(0.0, 8.0, 0.0);
        let out = ctrl.tick(&perceive(5.1, me, Some(far)), &mut agent, &HashMap::new());
        assert_eq!(
            out.transition,
            Some(Transition {
                from: EnemyState::Attacking,
                to: EnemyState::Pursuing
            })
        );
        assert!(!agent.stopped);
        assert_eq!(agent.destination, Some(far));
    }

    #[test]
    fn test_attack_respects_cooldown() {
        let mut ctrl = standard();
        let mut agent = ScriptedAgent::new();
        ctrl.activate_aggro(&mut agent, None);
        let me = Position::default();
        let near = Some(Position::new(1.0, 0.0, 0.0));

        // last_attack starts at 0.0 and the cooldown is 1.5 s.
        let expected = [
            (1.0, false),
            (1.5, true),
            (2.0, false),
            (2.9, false),
            (3.0, true),
            (4.5, true),
            (4.6, false),
        ];
        for (now, fires) in expected {
            let out = ctrl.tick(&perceive(now, me, near), &mut agent, &HashMap::new());
            assert_eq!(out.strike.is_some(), fires, "at t={now}");
            if fires {
                assert_eq!(ctrl.last_attack_secs(), now);
            }
        }
    }

    #[test]
    fn test_no_attack_on_untargetable_player() {
        let mut ctrl = standard();
        let mut agent = ScriptedAgent::new();
        ctrl.activate_aggro(&mut agent, None);

        let perception = Perception {
            now_secs: 10.0,
            dt: DT,
            position: Position::default(),
            player: Some(PlayerFix {
                position: Position::new(1.0, 0.0, 0.0),
                targetable: false,
            }),
        };
        let out = ctrl.tick(&perception, &mut agent, &HashMap::new());
        assert_eq!(ctrl.state(), EnemyState::Attacking);
        assert!(out.strike.is_none());
        assert_eq!(ctrl.last_attack_secs(), 0.0);
    }

    // ---- Detection variant ----

    #[test]
    fn test_sentry_arms_on_proximity() {
        let mut ctrl = EnemyController::new(get_profile(EnemyVariant::Sentry), None);
        let mut agent = ScriptedAgent::new();
        let me = Position::default();

        ctrl.tick(
            &perceive(0.0, me, Some(Position::new(12.0, 0.0, 0.0))),
            &mut agent,
            &HashMap::new(),
        );
        assert_eq!(ctrl.state(), EnemyState::Idle);

        let out = ctrl.tick(
            &perceive(DT, me, Some(Position::new(9.0, 0.0, 0.0))),
            &mut agent,
            &HashMap::new(),
        );
        assert_eq!(
            out.transition,
            Some(Transition {
                from: EnemyState::Idle,
                to: EnemyState::Pursuing
            })
        );

        // Walking back out of range does not disarm.
        ctrl.tick(
            &perceive(2.0 * DT, me, Some(Position::new(50.0, 0.0, 0.0))),
            &mut agent,
            &HashMap::new(),
        );
        assert_eq!(ctrl.state(), EnemyState::Pursuing);
    }

    #[test]
    fn test_standard_ignores_proximity() {
        let mut ctrl = standard();
        let mut agent = ScriptedAgent::new();
        ctrl.tick(
            &perceive(0.0, Position::default(), Some(Position::new(1.0, 0.0, 0.0))),
            &mut agent,
            &HashMap::new(),
        );
        assert_eq!(ctrl.state(), EnemyState::Idle);
    }

    // ---- Death ----

    #[test]
    fn test_dead_controller_is_inert() {
        let mut ctrl = standard();
        let mut agent = ScriptedAgent::new();
        let t = ctrl.mark_dead(&mut agent);
        assert_eq!(
            t,
            Some(Transition {
                from: EnemyState::Idle,
                to: EnemyState::Dead
            })
        );
        assert!(ctrl.mark_dead(&mut agent).is_none());
        assert!(!ctrl.activate_aggro(&mut agent, None));

        let out = ctrl.tick(
            &perceive(5.0, Position::default(), Some(Position::new(1.0, 0.0, 0.0))),
            &mut agent,
            &HashMap::new(),
        );
        assert_eq!(out, TickOutcome::default());
        assert_eq!(ctrl.state(), EnemyState::Dead);
    }

    // ---- Combat target ----

    #[test]
    fn test_health_publishes_death_once() {
        let mut health = Health {
            current: 30.0,
            max: 30.0,
        };
        assert_eq!(health.take_damage(20.0, Some(9)), None);
        assert!((health.health() - 10.0).abs() < 1e-12);

        assert_eq!(
            health.take_damage(15.0, Some(9)),
            Some(DeathNotice { killer: Some(9) })
        );
        assert!(health.is_dead());

        let before = health.health();
        assert_eq!(health.take_damage(50.0, Some(3)), None);
        assert_eq!(health.health(), before, "dead targets ignore damage");
    }

    // ---- Profiles ----

    #[test]
    fn test_profiles() {
        let hatchling = get_profile(EnemyVariant::Hatchling);
        let mother = get_profile(EnemyVariant::Broodmother);
        let standard = get_profile(EnemyVariant::Standard);
        let sentry = get_profile(EnemyVariant::Sentry);

        assert_eq!(hatchling.escalates_to, Some(EnemyVariant::Broodmother));
        assert!(mother.escalates_to.is_none());
        assert!(mother.max_health > standard.max_health);
        assert!(mother.attack_damage > hatchling.attack_damage);
        assert!(!sentry.patrols);
        assert!(sentry.detection_range.is_some());
        assert!(standard.detection_range.is_none());
    }
}
