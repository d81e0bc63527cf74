//! Enemy AI for BROOD.
//!
//! Implements the per-entity behavior state machine, patrol routes,
//! variant profiles and the capability traits the host simulation provides.

pub mod capabilities;
pub mod fsm;
pub mod profiles;
pub mod route;

pub use brood_core as core;

#[cfg(test)]
mod tests;
