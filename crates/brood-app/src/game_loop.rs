//! Game loop thread — runs the simulation engine at 30Hz and publishes snapshots.
//!
//! The engine is created inside this thread because it's cleaner for ownership.
//! Commands arrive via `mpsc` channel. Snapshots are stored in shared state for
//! synchronous polling and their events are logged.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tracing::{debug, info};

use brood_core::commands::SimCommand;
use brood_core::config::BroodConfig;
use brood_core::constants::TICK_RATE;
use brood_core::state::SimSnapshot;
use brood_sim::SimulationEngine;

use crate::state::{GameLoopCommand, LoopSummary, SimulationHandle};

/// Nominal duration of one tick at 1x speed.
const TICK_DURATION: Duration = Duration::from_nanos(1_000_000_000 / TICK_RATE as u64);

/// How the loop paces itself and when it stops.
#[derive(Debug, Clone, Copy)]
pub struct LoopOptions {
    /// Stop after this many ticks. `None` runs until shutdown.
    pub max_ticks: Option<u64>,
    /// Sleep between ticks to hold the tick rate (scaled by time scale).
    pub realtime: bool,
}

impl Default for LoopOptions {
    fn default() -> Self {
        Self {
            max_ticks: None,
            realtime: true,
        }
    }
}

/// Spawns the game loop in a new thread. `initial` commands are queued
/// before the first tick.
pub fn spawn_game_loop(
    config: BroodConfig,
    initial: Vec<SimCommand>,
    options: LoopOptions,
) -> std::io::Result<SimulationHandle> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<GameLoopCommand>();
    let latest_snapshot = Arc::new(Mutex::new(None));
    let shared = Arc::clone(&latest_snapshot);

    let thread = std::thread::Builder::new()
        .name("brood-game-loop".into())
        .spawn(move || {
            let mut engine = SimulationEngine::new(config);
            engine.queue_commands(initial);
            run_game_loop(engine, cmd_rx, &shared, options)
        })?;

    Ok(SimulationHandle {
        command_tx: cmd_tx,
        latest_snapshot,
        thread,
    })
}

/// The game loop. Runs until Shutdown, channel disconnect or the tick limit.
fn run_game_loop(
    mut engine: SimulationEngine,
    cmd_rx: mpsc::Receiver<GameLoopCommand>,
    latest_snapshot: &Mutex<Option<SimSnapshot>>,
    options: LoopOptions,
) -> LoopSummary {
    let mut summary = LoopSummary::default();
    let mut next_tick_time = Instant::now();

    loop {
        if options.max_ticks.is_some_and(|max| summary.ticks >= max) {
            break;
        }

        // 1. Drain all pending commands
        loop {
            match cmd_rx.try_recv() {
                Ok(GameLoopCommand::Command(cmd)) => {
                    engine.queue_command(cmd);
                }
                Ok(GameLoopCommand::Shutdown) | Err(mpsc::TryRecvError::Disconnected) => {
                    return finish(summary, latest_snapshot);
                }
                Err(mpsc::TryRecvError::Empty) => break,
            }
        }

        // 2. Advance one tick (engine handles pause semantics internally)
        let snapshot = engine.tick();
        summary.ticks += 1;

        // 3. Publish events
        summary.events += snapshot.events.len();
        for event in &snapshot.events {
            debug!(tick = snapshot.time.tick, ?event, "sim event");
        }

        // 4. Store latest snapshot for synchronous polling
        if let Ok(mut lock) = latest_snapshot.lock() {
            *lock = Some(snapshot);
        }

        if !options.realtime {
            continue;
        }

        // 5. Sleep until next tick, adjusting for time_scale
        let time_scale = engine.time_scale();
        let effective_tick_duration = if time_scale > 0.001 {
            TICK_DURATION.div_f64(time_scale)
        } else {
            TICK_DURATION
        };

        next_tick_time += effective_tick_duration;
        let now = Instant::now();
        if next_tick_time > now {
            std::thread::sleep(next_tick_time - now);
        } else if now - next_tick_time > effective_tick_duration * 2 {
            // Too far behind — reset to avoid catch-up spiral
            next_tick_time = now;
        }
    }

    finish(summary, latest_snapshot)
}

fn finish(mut summary: LoopSummary, latest_snapshot: &Mutex<Option<SimSnapshot>>) -> LoopSummary {
    summary.final_snapshot = latest_snapshot.lock().ok().and_then(|lock| lock.clone());
    info!(ticks = summary.ticks, events = summary.events, "game loop stopped");
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use brood_core::enums::SimPhase;
    use brood_core::types::Position;

    #[test]
    fn test_command_channel_round_trip() {
        let (tx, rx) = mpsc::channel::<GameLoopCommand>();

        tx.send(GameLoopCommand::Command(SimCommand::SpawnPlayer {
            position: Position::default(),
        }))
        .unwrap();
        tx.send(GameLoopCommand::Command(SimCommand::Pause)).unwrap();
        tx.send(GameLoopCommand::Shutdown).unwrap();

        let mut commands = Vec::new();
        while let Ok(cmd) = rx.try_recv() {
            commands.push(cmd);
        }

        assert_eq!(commands.len(), 3);
        assert!(matches!(
            commands[0],
            GameLoopCommand::Command(SimCommand::SpawnPlayer { .. })
        ));
        assert!(matches!(
            commands[1],
            GameLoopCommand::Command(SimCommand::Pause)
        ));
        assert!(matches!(commands[2], GameLoopCommand::Shutdown));
    }

    #[test]
    fn test_loop_stops_at_tick_limit() {
        let handle = spawn_game_loop(
            BroodConfig::default(),
            vec![SimCommand::SpawnPlayer {
                position: Position::default(),
            }],
            LoopOptions {
                max_ticks: Some(45),
                realtime: false,
            },
        )
        .unwrap();
        let summary = handle.join().unwrap();

        assert_eq!(summary.ticks, 45);
        let snap = summary.final_snapshot.expect("loop ticked");
        assert_eq!(snap.time.tick, 45);
        assert!(snap.player.is_some(), "Initial commands apply on the first tick");
    }

    #[test]
    fn test_commands_reach_engine() {
        let (tx, rx) = mpsc::channel::<GameLoopCommand>();
        let latest = Mutex::new(None);
        tx.send(GameLoopCommand::Command(SimCommand::SpawnPlayer {
            position: Position::new(1.0, 2.0, 0.0),
        }))
        .unwrap();
        tx.send(GameLoopCommand::Command(SimCommand::SpawnNest {
            position: Position::new(10.0, 0.0, 0.0),
        }))
        .unwrap();

        let summary = run_game_loop(
            SimulationEngine::new(BroodConfig::default()),
            rx,
            &latest,
            LoopOptions {
                max_ticks: Some(3),
                realtime: false,
            },
        );

        let snap = summary.final_snapshot.unwrap();
        assert!(snap.player.is_some());
        assert_eq!(snap.nests.len(), 1);
        assert_eq!(snap.enemies.len(), 5);
        assert!(summary.events >= 5, "Nest burst publishes spawn events");
    }

    #[test]
    fn test_shutdown_stops_loop() {
        let handle = spawn_game_loop(
            BroodConfig::default(),
            Vec::new(),
            LoopOptions {
                max_ticks: None,
                realtime: true,
            },
        )
        .unwrap();
        handle.send(SimCommand::Pause).unwrap();
        std::thread::sleep(Duration::from_millis(100));
        let snap = handle.latest_snapshot().expect("loop ticked");
        assert_eq!(snap.phase, SimPhase::Paused);

        let summary = handle.shutdown().unwrap();
        assert!(summary.ticks >= 1);
    }

    #[test]
    fn test_snapshot_serialization_under_3ms() {
        let mut engine = SimulationEngine::new(BroodConfig::default());
        engine.queue_command(SimCommand::SpawnPlayer {
            position: Position::default(),
        });
        engine.queue_command(SimCommand::SpawnNest {
            position: Position::new(8.0, 0.0, 0.0),
        });

        for _ in 0..50 {
            engine.tick();
        }

        let snapshot = engine.tick();
        let start = Instant::now();
        let json = serde_json::to_string(&snapshot).unwrap();
        let elapsed = start.elapsed();

        assert!(
            elapsed < Duration::from_millis(3),
            "Snapshot serialization took {:?}, should be <3ms",
            elapsed
        );
        assert!(!json.is_empty());
    }

    #[test]
    fn test_tick_duration_constant() {
        // 30Hz = 33.333ms per tick
        let expected_nanos = 1_000_000_000u64 / 30;
        assert_eq!(TICK_DURATION.as_nanos(), expected_nanos as u128);
    }
}
