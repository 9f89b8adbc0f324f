//! Clipworks Env -- an agent-facing episode wrapper around the simulation.
//!
//! [`env::FactoryEnv`] drives a [`clipworks_core::factory::Factory`] one
//! discrete [`action::Action`] at a time: the action is applied at the
//! cursor, the factory advances one tick, and the tick's production is
//! scored with [`reward::RewardWeights`]. Episodes end after a fixed number
//! of steps. Observations are a square window of cell snapshots around the
//! cursor; rendering them is left to the caller.

pub mod action;
pub mod env;
pub mod reward;

pub use action::{Action, ActionError};
pub use env::{EnvConfig, EnvError, FactoryEnv, Observation, Transition};
pub use reward::RewardWeights;
