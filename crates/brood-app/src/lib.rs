//! BROOD headless runner.
//!
//! Runs the simulation engine on its own thread, feeds it commands over a
//! channel and exposes the latest snapshot for polling.

pub mod game_loop;
pub mod scenario;
pub mod state;

pub use brood_core as core;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the global tracing subscriber. `RUST_LOG` takes precedence;
/// otherwise `info`, or `debug` when verbose.
pub fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}
