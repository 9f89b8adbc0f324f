//! Clipworks Core -- a deterministic, tick-based resource-grid simulation.
//!
//! A rectangular grid holds per-cell resource quantities (deposits, ores,
//! steel, paperclips). Equipment placed on cells moves and converts those
//! resources once per tick: belts shift goods to a neighbour, extractors
//! draw ore from deposits, furnaces smelt ore into steel over several ticks,
//! and paperclip machines turn steel into paperclips.
//!
//! # Tick Pipeline
//!
//! Each call to [`factory::Factory::step`] runs:
//!
//! 1. **Snapshot** -- Copy the live [`ledger::Ledger`] into the read buffer.
//! 2. **Compute** -- Every equipment computes its flow from the snapshot.
//! 3. **Apply** -- Flows are applied to the live ledger in registration order.
//! 4. **Bookkeeping** -- Advance the tick counter and report production.
//!
//! Reading from the snapshot makes the outcome independent of the order in
//! which equipment was built, except where two readers contend for the same
//! stock within one tick.
//!
//! # Key Types
//!
//! - [`factory::Factory`] -- Owns all state; build controller and tick engine.
//! - [`ledger::Ledger`] -- Per-cell quantities with incremental global totals.
//! - [`registry::EquipmentRegistry`] -- Arena of placed equipment.
//! - [`equipment::Equipment`] -- Belt, Extractor, Furnace and PaperclipMachine
//!   processors, enum-dispatched.
//! - [`config::FactoryConfig`] -- TOML/RON loadable rates, recipe and terrain.
//! - [`fixed::Fixed64`] -- Q32.32 fixed-point type for deterministic math.
//! - [`terrain::TerrainGenerator`] -- Seeded deposit layout generation.

pub mod config;
pub mod equipment;
pub mod factory;
pub mod fixed;
pub mod grid;
pub mod id;
pub mod ledger;
pub mod query;
pub mod registry;
pub mod resource;
pub mod rng;
pub mod sim;
pub mod terrain;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
