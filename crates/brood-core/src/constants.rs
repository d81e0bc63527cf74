//! Simulation constants and tuning parameters.
//!
//! These are the defaults; `config::BroodConfig` can override the
//! population, nest and patrol values at startup.

/// Simulation tick rate (Hz).
pub const TICK_RATE: u32 = 30;

/// Seconds per tick.
pub const DT: f64 = 1.0 / TICK_RATE as f64;

/// Slack used when comparing countdowns against zero.
pub const TIMER_EPSILON: f64 = 1e-9;

// --- Patrol ---

/// Dwell time at each waypoint (seconds).
pub const PATROL_WAIT_SECS: f64 = 2.0;

/// Extra arrival slack on top of the agent stopping distance (meters).
pub const PATROL_TOLERANCE: f64 = 0.5;

// --- Combat ---

/// Default melee reach of a hostile entity (meters).
pub const ENEMY_ATTACK_RANGE: f64 = 2.0;

/// Default damage per hostile attack.
pub const ENEMY_ATTACK_DAMAGE: f64 = 20.0;

/// Default seconds between hostile attacks.
pub const ENEMY_ATTACK_COOLDOWN_SECS: f64 = 1.5;

/// Proximity at which detection variants arm themselves (meters).
pub const ENEMY_DETECTION_RANGE: f64 = 10.0;

/// Default maximum health for hostile entities and the player.
pub const DEFAULT_MAX_HEALTH: f64 = 100.0;

/// How long a dead non-player entity lingers before despawn (seconds).
pub const CORPSE_GRACE_SECS: f64 = 2.0;

/// Player melee reach (meters).
pub const PLAYER_ATTACK_RANGE: f64 = 2.5;

/// Player melee damage per strike.
pub const PLAYER_ATTACK_DAMAGE: f64 = 25.0;

// --- Movement ---

/// Straight-line movement speed of hostile entities (m/s).
pub const ENEMY_MOVE_SPEED: f64 = 3.5;

/// Agent stopping distance (meters).
pub const AGENT_STOPPING_DISTANCE: f64 = 0.0;

// --- Population coordinator ---

/// Player must be closer than this to the anchor for spawns (meters).
pub const SPAWNER_PROXIMITY: f64 = 20.0;

/// Maximum concurrently-live coordinator-spawned entities.
pub const SPAWNER_MAX_POPULATION: u32 = 5;

/// Seconds between coordinator spawn attempts.
pub const SPAWNER_INTERVAL_SECS: f64 = 5.0;

/// Radius of the random jitter around the anchor (meters).
pub const SPAWNER_JITTER_RADIUS: f64 = 2.0;

// --- Nest ---

/// Seconds between nest spawns.
pub const NEST_RESPAWN_SECS: f64 = 10.0;

/// Entities spawned when a nest is created.
pub const NEST_INITIAL_SPAWN: u32 = 5;

/// Radius around the nest in which entities appear (meters).
pub const NEST_SPAWN_RADIUS: f64 = 4.0;

/// One in this many nest spawns is the escalation-capable variant.
pub const NEST_ESCALATION_ODDS: u32 = 4;
