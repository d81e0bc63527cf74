//! Simulation engine — the core of BROOD.
//!
//! `SimulationEngine` owns the hecs ECS world together with the entity
//! directory, the player locator and the population coordinators. It
//! processes commands, runs all systems and produces `SimSnapshot`s.
//! Completely headless, enabling deterministic testing.

use std::collections::VecDeque;

use hecs::{Entity, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use brood_ai::fsm::EnemyController;
use brood_core::commands::SimCommand;
use brood_core::config::BroodConfig;
use brood_core::constants::{PLAYER_ATTACK_DAMAGE, PLAYER_ATTACK_RANGE};
use brood_core::enums::{EnemyState, EnemyVariant, SimPhase, SpawnOrigin};
use brood_core::events::SimEvent;
use brood_core::state::SimSnapshot;
use brood_core::types::{Position, SimTime};

use crate::directory::EntityDirectory;
use crate::error::{entity_id, resolve_entity, SimError, SimResult};
use crate::locator::PlayerLocator;
use crate::systems;
use crate::systems::combat::DeathRecord;
use crate::systems::enemy_ai;
use crate::systems::population::PopulationCoordinator;
use crate::world_setup;

/// The simulation engine. Owns the ECS world and all sim state.
pub struct SimulationEngine {
    world: World,
    time: SimTime,
    phase: SimPhase,
    time_scale: f64,
    rng: ChaCha8Rng,
    config: BroodConfig,
    command_queue: VecDeque<SimCommand>,
    directory: EntityDirectory,
    locator: PlayerLocator,
    coordinators: Vec<PopulationCoordinator>,
    deaths: Vec<DeathRecord>,
    despawn_buffer: Vec<Entity>,
    events: Vec<SimEvent>,
}

impl SimulationEngine {
    /// Create a new simulation engine with the given config.
    pub fn new(config: BroodConfig) -> Self {
        info!(seed = config.seed, time_scale = config.time_scale, "simulation created");
        Self {
            world: World::new(),
            time: SimTime::default(),
            phase: SimPhase::default(),
            time_scale: config.time_scale,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            config,
            command_queue: VecDeque::new(),
            directory: EntityDirectory::new(),
            locator: PlayerLocator::new(),
            coordinators: Vec::new(),
            deaths: Vec::new(),
            despawn_buffer: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Queue a command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: SimCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = SimCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance the simulation by one tick and return the resulting snapshot.
    pub fn tick(&mut self) -> SimSnapshot {
        self.process_commands();

        if self.phase == SimPhase::Active {
            self.run_systems();
            self.time.advance();
        }

        let events = std::mem::take(&mut self.events);
        systems::snapshot::build_snapshot(
            &self.world,
            &self.time,
            self.phase,
            &self.directory,
            self.coordinators.len(),
            events,
        )
    }

    /// Get the current phase.
    pub fn phase(&self) -> SimPhase {
        self.phase
    }

    /// Get the current simulation time.
    pub fn time(&self) -> SimTime {
        self.time
    }

    /// Get the current time scale.
    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    pub fn config(&self) -> &BroodConfig {
        &self.config
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn directory(&self) -> &EntityDirectory {
        &self.directory
    }

    pub fn coordinators(&self) -> &[PopulationCoordinator] {
        &self.coordinators
    }

    /// Behavior state of a hostile entity.
    pub fn controller_state(&self, entity: Entity) -> SimResult<EnemyState> {
        self.world
            .get::<&EnemyController>(entity)
            .map(|controller| controller.state())
            .map_err(|_| SimError::NotHostile(entity_id(entity)))
    }

    /// Spawn the player and point the locator at it.
    pub fn spawn_player(&mut self, position: Position) -> Entity {
        let entity = world_setup::spawn_player(&mut self.world, position);
        self.locator.bind(entity);
        entity
    }

    /// Teleport the player.
    pub fn move_player(&mut self, position: Position) -> SimResult<()> {
        let player = self.locator.entity().ok_or(SimError::PlayerMissing)?;
        let mut pos = self
            .world
            .get::<&mut Position>(player)
            .map_err(|_| SimError::PlayerMissing)?;
        *pos = position;
        Ok(())
    }

    /// Place a hostile entity directly. Placed entities are registered for
    /// the alarm but do not count against the population cap.
    pub fn spawn_enemy(&mut self, variant: EnemyVariant, position: Position) -> Entity {
        world_setup::spawn_registered(
            &mut self.world,
            &mut self.directory,
            &mut self.events,
            variant,
            SpawnOrigin::Placed,
            position,
            &self.config.patrol,
        )
    }

    /// Place a nest and spawn its initial burst.
    pub fn spawn_nest(&mut self, position: Position) -> Entity {
        systems::nest::place_nest(
            &mut self.world,
            &mut self.rng,
            &mut self.directory,
            position,
            &self.config.nest,
            &self.config.patrol,
            &mut self.events,
        )
    }

    /// Add a population coordinator spawning the standard variant.
    pub fn add_spawner(&mut self, anchor: Position) {
        info!(x = anchor.x, y = anchor.y, z = anchor.z, "spawner added");
        self.coordinators.push(PopulationCoordinator::new(
            anchor,
            EnemyVariant::Standard,
            self.config.population,
        ));
    }

    /// Place a named patrol waypoint. Only entities spawned afterwards
    /// include it in their route.
    pub fn add_patrol_marker(&mut self, name: &str, position: Position) -> SimResult<Entity> {
        if world_setup::find_marker(&self.world, name).is_some() {
            return Err(SimError::DuplicateMarker(name.to_string()));
        }
        debug!(marker = name, "patrol marker added");
        Ok(world_setup::spawn_marker(&mut self.world, name, position))
    }

    /// Remove a patrol waypoint. Entities heading for it give up patrolling
    /// when they next look it up.
    pub fn remove_patrol_marker(&mut self, name: &str) -> SimResult<()> {
        let entity = world_setup::find_marker(&self.world, name)
            .ok_or_else(|| SimError::UnknownMarker(name.to_string()))?;
        let _ = self.world.despawn(entity);
        debug!(marker = name, "patrol marker removed");
        Ok(())
    }

    /// Damage any entity with health. Nests raise the alarm.
    pub fn damage(&mut self, target: Entity, amount: f64, source: Option<u64>) -> SimResult<()> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(SimError::InvalidDamage(amount));
        }
        if !self.world.contains(target) {
            return Err(SimError::UnknownEntity(entity_id(target)));
        }
        let player = self.locator.locate(&self.world).map(|p| p.position);
        systems::combat::apply_damage(
            &mut self.world,
            &self.directory,
            player,
            target,
            amount,
            source,
            &mut self.deaths,
            &mut self.events,
        )
    }

    /// The player hits a target within melee reach.
    pub fn player_strike(&mut self, target: Entity) -> SimResult<()> {
        let player = self
            .locator
            .locate(&self.world)
            .ok_or(SimError::PlayerMissing)?;
        let target_pos = *self
            .world
            .get::<&Position>(target)
            .map_err(|_| SimError::UnknownEntity(entity_id(target)))?;
        let distance = player.position.range_to(&target_pos);
        if distance > PLAYER_ATTACK_RANGE {
            return Err(SimError::OutOfReach {
                target: entity_id(target),
                distance,
                reach: PLAYER_ATTACK_RANGE,
            });
        }
        self.damage(target, PLAYER_ATTACK_DAMAGE, Some(entity_id(player.entity)))
    }

    /// Arm one hostile entity directly. Returns whether this call armed it.
    pub fn activate_aggro(&mut self, entity: Entity) -> SimResult<bool> {
        if self.world.get::<&EnemyController>(entity).is_err() {
            return Err(SimError::NotHostile(entity_id(entity)));
        }
        let player = self.locator.locate(&self.world).map(|p| p.position);
        let transition = enemy_ai::arm(&mut self.world, entity, player);
        if let Some(transition) = transition {
            enemy_ai::record_transition(entity, transition, &mut self.events);
        }
        Ok(transition.is_some())
    }

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            if let Err(err) = self.handle_command(command) {
                warn!(error = %err, "command rejected");
            }
        }
    }

    /// Handle a single command.
    fn handle_command(&mut self, command: SimCommand) -> SimResult<()> {
        match command {
            SimCommand::SpawnPlayer { position } => {
                if self.locator.entity().is_some_and(|e| self.world.contains(e)) {
                    return self.move_player(position);
                }
                self.spawn_player(position);
            }
            SimCommand::MovePlayer { position } => self.move_player(position)?,
            SimCommand::PlayerStrike { target_id } => {
                let target = resolve_entity(&self.world, target_id)?;
                self.player_strike(target)?;
            }
            SimCommand::DamageEntity { entity_id, amount } => {
                let target = resolve_entity(&self.world, entity_id)?;
                self.damage(target, amount, None)?;
            }
            SimCommand::ActivateAggro { entity_id } => {
                let target = resolve_entity(&self.world, entity_id)?;
                self.activate_aggro(target)?;
            }
            SimCommand::SpawnEnemy { variant, position } => {
                self.spawn_enemy(variant, position);
            }
            SimCommand::SpawnNest { position } => {
                self.spawn_nest(position);
            }
            SimCommand::AddSpawner { anchor } => self.add_spawner(anchor),
            SimCommand::AddPatrolMarker { name, position } => {
                self.add_patrol_marker(&name, position)?;
            }
            SimCommand::RemovePatrolMarker { name } => self.remove_patrol_marker(&name)?,
            SimCommand::SetTimeScale { scale } => {
                self.time_scale = scale.clamp(0.0, 4.0);
            }
            SimCommand::Pause => {
                if self.phase == SimPhase::Active {
                    self.phase = SimPhase::Paused;
                }
            }
            SimCommand::Resume => {
                if self.phase == SimPhase::Paused {
                    self.phase = SimPhase::Active;
                }
            }
        }
        Ok(())
    }

    /// Run all systems in order.
    fn run_systems(&mut self) {
        let dt = self.time.dt();
        let now_secs = self.time.elapsed_secs;
        let player = self.locator.locate(&self.world);
        if player.is_none() {
            self.locator.note_unresolved();
        }
        let player_pos = player.map(|p| p.position);

        // 1. Population coordinators
        systems::population::run(
            &mut self.world,
            &mut self.rng,
            &mut self.coordinators,
            &mut self.directory,
            player_pos,
            &self.config.patrol,
            dt,
            &mut self.events,
        );
        // 2. Nest respawn timers
        systems::nest::run(
            &mut self.world,
            &mut self.rng,
            &mut self.directory,
            &self.config.patrol,
            dt,
            &mut self.events,
        );
        // 3. Enemy AI
        let strikes =
            systems::enemy_ai::run(&mut self.world, now_secs, dt, player, &mut self.events);
        // 4. Strikes against the player
        systems::combat::apply_strikes(
            &mut self.world,
            player.map(|p| p.entity),
            strikes,
            &mut self.deaths,
            &mut self.events,
        );
        // 5. Movement integration
        systems::movement::run(&mut self.world, dt);
        // 6. Deaths and escalation
        let player_pos = self.locator.locate(&self.world).map(|p| p.position);
        systems::combat::process_deaths(
            &mut self.world,
            &mut self.directory,
            player_pos,
            &self.config.patrol,
            &mut self.deaths,
            &mut self.events,
        );
        // 7. Cleanup (expired corpses)
        systems::cleanup::run(&mut self.world, dt, &mut self.despawn_buffer);
    }
}

