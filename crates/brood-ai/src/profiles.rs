//! Variant-specific behavioral profiles.
//!
//! Consolidates per-variant parameters for the enemy controller. A new
//! variant is a new match arm here, not a new controller type.

use brood_core::constants::*;
use brood_core::enums::EnemyVariant;

/// Behavioral profile for a hostile variant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BehaviorProfile {
    /// Whether the variant walks a patrol route while unarmed.
    pub patrols: bool,
    /// Proximity at which the variant arms itself, if it detects at all (m).
    pub detection_range: Option<f64>,
    /// Melee reach (m).
    pub attack_range: f64,
    /// Damage per attack.
    pub attack_damage: f64,
    /// Minimum seconds between attacks.
    pub attack_cooldown_secs: f64,
    /// Starting and maximum health.
    pub max_health: f64,
    /// Straight-line movement speed (m/s).
    pub move_speed: f64,
    /// Variant summoned, pre-armed, when this one dies.
    pub escalates_to: Option<EnemyVariant>,
}

/// Get the behavioral profile for a given variant.
pub fn get_profile(variant: EnemyVariant) -> BehaviorProfile {
    match variant {
        EnemyVariant::Standard => BehaviorProfile {
            patrols: true,
            detection_range: None,
            attack_range: ENEMY_ATTACK_RANGE,
            attack_damage: ENEMY_ATTACK_DAMAGE,
            attack_cooldown_secs: ENEMY_ATTACK_COOLDOWN_SECS,
            max_health: DEFAULT_MAX_HEALTH,
            move_speed: ENEMY_MOVE_SPEED,
            escalates_to: None,
        },
        EnemyVariant::Hatchling => BehaviorProfile {
            patrols: true,
            detection_range: None,
            attack_range: ENEMY_ATTACK_RANGE * 0.75,
            attack_damage: ENEMY_ATTACK_DAMAGE * 0.5,
            attack_cooldown_secs: ENEMY_ATTACK_COOLDOWN_SECS,
            max_health: DEFAULT_MAX_HEALTH * 0.5,
            move_speed: ENEMY_MOVE_SPEED * 1.2,
            escalates_to: Some(EnemyVariant::Broodmother),
        },
        EnemyVariant::Broodmother => BehaviorProfile {
            patrols: true,
            detection_range: None,
            attack_range: ENEMY_ATTACK_RANGE * 1.25,
            attack_damage: ENEMY_ATTACK_DAMAGE * 1.75,
            attack_cooldown_secs: ENEMY_ATTACK_COOLDOWN_SECS * 1.5,
            max_health: DEFAULT_MAX_HEALTH * 2.5,
            move_speed: ENEMY_MOVE_SPEED * 0.8,
            escalates_to: None,
        },
        // Sentries stand still until the player wanders close.
        EnemyVariant::Sentry => BehaviorProfile {
            patrols: false,
            detection_range: Some(ENEMY_DETECTION_RANGE),
            attack_range: ENEMY_ATTACK_RANGE,
            attack_damage: ENEMY_ATTACK_DAMAGE,
            attack_cooldown_secs: 1.0,
            max_health: DEFAULT_MAX_HEALTH,
            move_speed: ENEMY_MOVE_SPEED,
            escalates_to: None,
        },
    }
}
