//! Start-up command scripts.
//!
//! A scenario is a JSON array of `SimCommand`s queued before the first tick.

use std::path::Path;

use anyhow::Context;

use brood_core::commands::SimCommand;
use brood_core::enums::EnemyVariant;
use brood_core::types::Position;

/// Read a scenario file.
pub fn load_scenario(path: &Path) -> anyhow::Result<Vec<SimCommand>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read scenario {}", path.display()))?;
    parse_scenario(&text).with_context(|| format!("invalid scenario {}", path.display()))
}

pub fn parse_scenario(json: &str) -> anyhow::Result<Vec<SimCommand>> {
    Ok(serde_json::from_str(json)?)
}

/// Built-in scenario: a player beside a patrolled nest, with a spawner nearby.
pub fn demo_scenario() -> Vec<SimCommand> {
    let marker = |name: &str, x: f64, y: f64| SimCommand::AddPatrolMarker {
        name: name.to_string(),
        position: Position::new(x, y, 0.0),
    };
    vec![
        marker("north", 0.0, 12.0),
        marker("east", 12.0, 0.0),
        marker("south", 0.0, -12.0),
        marker("west", -12.0, 0.0),
        SimCommand::SpawnPlayer {
            position: Position::new(0.0, 0.0, 0.0),
        },
        SimCommand::SpawnNest {
            position: Position::new(18.0, 18.0, 0.0),
        },
        SimCommand::AddSpawner {
            anchor: Position::new(-8.0, 8.0, 0.0),
        },
        SimCommand::SpawnEnemy {
            variant: EnemyVariant::Sentry,
            position: Position::new(6.0, -6.0, 0.0),
        },
    ]
}
