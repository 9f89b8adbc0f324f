//! Shared test helpers for integration tests and benchmarks.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]` so these helpers
//! are available in unit tests, integration tests, and benchmarks (via the
//! `test-utils` feature).

use crate::config::FactoryConfig;
use crate::equipment::EquipmentKind;
use crate::factory::Factory;
use crate::fixed::Quantity;
use crate::grid::{Direction, GridPosition};
use crate::resource::{ResourceKind, ResourceMap};
use crate::terrain::{BarrenTerrain, DepositLayout};

// ===========================================================================
// Value helpers
// ===========================================================================

pub fn q(v: f64) -> Quantity {
    Quantity::from_num(v)
}

pub fn pos(x: i32, y: i32) -> GridPosition {
    GridPosition::new(x, y)
}

pub fn belt(direction: Direction) -> EquipmentKind {
    EquipmentKind::Belt(direction)
}

// ===========================================================================
// Factory builders
// ===========================================================================

/// An empty factory with default rules and no terrain.
pub fn empty_factory(width: u32, height: u32) -> Factory {
    factory_with(FactoryConfig::with_size(width, height))
}

/// An empty factory with no terrain from a custom config.
pub fn factory_with(config: FactoryConfig) -> Factory {
    match Factory::with_terrain(&config, Box::new(BarrenTerrain)) {
        Ok(factory) => factory,
        Err(e) => panic!("test config rejected: {e}"),
    }
}

/// The canonical smelting setup on a 4x4 map:
///
/// ```text
///   x=0       x=1
///   Extractor Extractor     y=0  (coal deposit, iron deposit; 1000 each)
///   Furnace   .             y=1
/// ```
///
/// The furnace's 3x3 input area covers both extractor cells.
pub fn smelting_scenario() -> Factory {
    let mut factory = empty_factory(4, 4);
    let layout = DepositLayout::new()
        .with(pos(0, 0), ResourceKind::CoalDeposit, q(1000.0))
        .with(pos(1, 0), ResourceKind::IronDeposit, q(1000.0));
    factory.reset_with_layout(&layout, pos(0, 0));
    assert!(factory.build_at(EquipmentKind::Extractor, pos(0, 0)));
    assert!(factory.build_at(EquipmentKind::Extractor, pos(1, 0)));
    assert!(factory.build_at(EquipmentKind::Furnace, pos(0, 1)));
    factory
}

/// A smelting line on a 4x1 strip: extract coal and iron, carry both right
/// next to a furnace, carry its steel away.
///
/// ```text
///   x: 0          1          2        3
///      Extractor  Belt(->)   Furnace  Belt(->)
/// ```
///
/// Cell 0 holds both deposits (500 each). The furnace reads cells 1..=3, so
/// it picks up the ore the first belt carries.
pub fn smelting_line() -> Factory {
    let mut factory = empty_factory(4, 1);
    let layout = DepositLayout::new()
        .with(pos(0, 0), ResourceKind::CoalDeposit, q(500.0))
        .with(pos(0, 0), ResourceKind::IronDeposit, q(500.0));
    factory.reset_with_layout(&layout, pos(0, 0));
    assert!(factory.build_at(EquipmentKind::Extractor, pos(0, 0)));
    assert!(factory.build_at(belt(Direction::Right), pos(1, 0)));
    assert!(factory.build_at(EquipmentKind::Furnace, pos(2, 0)));
    assert!(factory.build_at(belt(Direction::Right), pos(3, 0)));
    factory
}

// ===========================================================================
// Invariant helpers
// ===========================================================================

/// Sum of non-deposit kinds in a per-kind map.
pub fn non_deposit_total(map: &ResourceMap) -> Quantity {
    map.iter()
        .filter(|(kind, _)| !kind.is_deposit())
        .fold(Quantity::ZERO, |acc, (_, v)| acc + v)
}

/// Panic if any cell holds a negative quantity.
pub fn assert_non_negative(factory: &Factory) {
    for (position, cell) in factory.ledger().iter() {
        for (kind, v) in cell.iter() {
            assert!(
                v >= Quantity::ZERO,
                "negative {kind:?} ({v}) at ({}, {}) on tick {}",
                position.x,
                position.y,
                factory.tick()
            );
        }
    }
}

/// Panic if the incremental totals drifted from the per-cell sum.
pub fn assert_totals_consistent(factory: &Factory) {
    assert_eq!(
        factory.query_totals(),
        factory.ledger().recount(),
        "totals drifted on tick {}",
        factory.tick()
    );
}
