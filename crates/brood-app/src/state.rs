//! Handle to the running game loop, shared between the caller and the loop thread.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use anyhow::{anyhow, Context};

use brood_core::commands::SimCommand;
use brood_core::state::SimSnapshot;

/// Commands sent from the caller to the game loop thread.
#[derive(Debug)]
pub enum GameLoopCommand {
    /// A command to forward to the simulation engine.
    Command(SimCommand),
    /// Shut down the game loop thread gracefully.
    Shutdown,
}

/// What the loop did before it stopped.
#[derive(Debug, Default)]
pub struct LoopSummary {
    pub ticks: u64,
    pub events: usize,
    pub final_snapshot: Option<SimSnapshot>,
}

/// Owner's side of a spawned game loop.
pub struct SimulationHandle {
    pub(crate) command_tx: mpsc::Sender<GameLoopCommand>,
    /// Latest snapshot for synchronous polling.
    /// Updated by the game loop thread after each tick.
    pub(crate) latest_snapshot: Arc<Mutex<Option<SimSnapshot>>>,
    pub(crate) thread: JoinHandle<LoopSummary>,
}

impl SimulationHandle {
    /// Forward a command to the engine; it applies at the next tick boundary.
    pub fn send(&self, command: SimCommand) -> anyhow::Result<()> {
        self.command_tx
            .send(GameLoopCommand::Command(command))
            .context("game loop is no longer running")
    }

    /// Get the latest snapshot, if the loop has ticked at least once.
    pub fn latest_snapshot(&self) -> Option<SimSnapshot> {
        self.latest_snapshot
            .lock()
            .ok()
            .and_then(|lock| lock.clone())
    }

    /// Ask the loop to stop after the current tick and wait for it.
    pub fn shutdown(self) -> anyhow::Result<LoopSummary> {
        // The loop may already have stopped on its own.
        let _ = self.command_tx.send(GameLoopCommand::Shutdown);
        self.join()
    }

    /// Wait for the loop to stop on its own.
    pub fn join(self) -> anyhow::Result<LoopSummary> {
        self.thread
            .join()
            .map_err(|_| anyhow!("game loop thread panicked"))
    }
}
