//! The resource ledger: the sole store of what exists where.
//!
//! A dense row-major array of [`ResourceMap`]s, one per cell, plus global
//! per-kind totals maintained incrementally so aggregate queries never scan
//! the grid.
//!
//! The tick engine never lets processors read the live ledger. It copies the
//! ledger into a [`LedgerSnapshot`] at the start of every tick; processors
//! compute against the snapshot and only the apply phase writes live cells.

use crate::fixed::Quantity;
use crate::grid::{Grid, GridPosition};
use crate::resource::{ResourceKind, ResourceMap};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Ledger
// ---------------------------------------------------------------------------

/// Per-cell resource quantities for the whole grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    grid: Grid,
    cells: Vec<ResourceMap>,
    totals: ResourceMap,
}

impl Ledger {
    pub fn new(grid: Grid) -> Self {
        Self {
            grid,
            cells: vec![ResourceMap::new(); grid.area()],
            totals: ResourceMap::new(),
        }
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    /// Quantity of `kind` at `pos`.
    #[inline]
    pub fn get(&self, pos: GridPosition, kind: ResourceKind) -> Quantity {
        self.cells[self.grid.index(pos)].get(kind)
    }

    /// All quantities at `pos`.
    #[inline]
    pub fn cell(&self, pos: GridPosition) -> &ResourceMap {
        &self.cells[self.grid.index(pos)]
    }

    /// Global per-kind totals across every cell.
    pub fn totals(&self) -> &ResourceMap {
        &self.totals
    }

    /// Absolute write. Negative quantities are stored as zero, and the
    /// quantity is capped so the global total for `kind` stays representable.
    /// Returns the quantity stored.
    pub fn set(
        &mut self,
        pos: GridPosition,
        kind: ResourceKind,
        quantity: Quantity,
    ) -> Quantity {
        let idx = self.grid.index(pos);
        let previous = self.cells[idx].get(kind);
        let ceiling = previous.saturating_add(self.totals.headroom(kind));
        let quantity = quantity.clamp(Quantity::ZERO, ceiling);
        self.cells[idx].set(kind, quantity);
        self.totals.add(kind, quantity - previous);
        quantity
    }

    /// How much more of `kind` can be credited at `pos` before either the
    /// cell or the global total saturates.
    pub fn headroom(&self, pos: GridPosition, kind: ResourceKind) -> Quantity {
        self.cells[self.grid.index(pos)]
            .headroom(kind)
            .min(self.totals.headroom(kind))
    }

    /// Move `amount` of `from_kind` at `from` into `to_kind` at `to`.
    ///
    /// No-op when `amount <= 0`. Callers clamp `amount` to what the source
    /// holds; an overdraw is a debug assertion and saturates at the source
    /// quantity in release builds. Whatever the destination cannot hold
    /// stays at the source. Returns the amount actually moved.
    pub fn transfer(
        &mut self,
        from: GridPosition,
        from_kind: ResourceKind,
        to: GridPosition,
        to_kind: ResourceKind,
        amount: Quantity,
    ) -> Quantity {
        let taken = self.debit(from, from_kind, amount);
        let moved = self.credit(to, to_kind, taken);
        if moved < taken {
            self.credit(from, from_kind, taken - moved);
        }
        moved
    }

    /// Remove up to `amount` of `kind` at `pos`. Returns the amount removed.
    pub fn debit(&mut self, pos: GridPosition, kind: ResourceKind, amount: Quantity) -> Quantity {
        if amount <= Quantity::ZERO {
            return Quantity::ZERO;
        }
        let idx = self.grid.index(pos);
        let available = self.cells[idx].get(kind);
        debug_assert!(
            amount <= available,
            "debit of {amount} {kind:?} at ({}, {}) exceeds {available}",
            pos.x,
            pos.y
        );
        let taken = amount.min(available);
        self.cells[idx].add(kind, -taken);
        self.totals.add(kind, -taken);
        taken
    }

    /// Add up to `amount` of `kind` at `pos`, capped at the available
    /// [`headroom`](Self::headroom). No-op when `amount <= 0`. Returns the
    /// amount added.
    pub fn credit(
        &mut self,
        pos: GridPosition,
        kind: ResourceKind,
        amount: Quantity,
    ) -> Quantity {
        if amount <= Quantity::ZERO {
            return Quantity::ZERO;
        }
        let idx = self.grid.index(pos);
        let added = amount.min(self.headroom(pos, kind));
        self.cells[idx].add(kind, added);
        self.totals.add(kind, added);
        added
    }

    /// Zero every cell and total.
    pub fn clear(&mut self) {
        self.cells.fill(ResourceMap::new());
        self.totals = ResourceMap::new();
    }

    /// Iterate over `(position, cell)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (GridPosition, &ResourceMap)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, cell)| (self.grid.position(i), cell))
    }

    /// Recompute totals from the cells. Used by tests to check that the
    /// incremental totals never drift.
    pub fn recount(&self) -> ResourceMap {
        let mut totals = ResourceMap::new();
        for cell in &self.cells {
            totals.accumulate(cell);
        }
        totals
    }
}

// ---------------------------------------------------------------------------
// LedgerSnapshot
// ---------------------------------------------------------------------------

/// Read-only copy of the ledger taken at the start of a tick.
///
/// Owned by the engine and refreshed in place every tick so its allocation
/// is reused.
#[derive(Debug, Clone, Default)]
pub struct LedgerSnapshot {
    grid: Option<Grid>,
    cells: Vec<ResourceMap>,
}

impl LedgerSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot a ledger into a fresh buffer.
    pub fn of(ledger: &Ledger) -> Self {
        let mut snapshot = Self::new();
        snapshot.refresh(ledger);
        snapshot
    }

    /// Overwrite this buffer with the current contents of `ledger`.
    pub fn refresh(&mut self, ledger: &Ledger) {
        self.grid = Some(ledger.grid);
        self.cells.clear();
        self.cells.extend_from_slice(&ledger.cells);
    }

    /// Quantity of `kind` at `pos` as of the snapshot.
    ///
    /// # Panics
    ///
    /// Panics if the snapshot was never refreshed or `pos` is outside the grid.
    #[inline]
    pub fn get(&self, pos: GridPosition, kind: ResourceKind) -> Quantity {
        let grid = self.grid.expect("snapshot read before refresh");
        self.cells[grid.index(pos)].get(kind)
    }

    pub fn grid(&self) -> Option<Grid> {
        self.grid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(v: f64) -> Quantity {
        Quantity::from_num(v)
    }

    fn pos(x: i32, y: i32) -> GridPosition {
        GridPosition::new(x, y)
    }

    #[test]
    fn set_updates_totals() {
        let mut ledger = Ledger::new(Grid::new(3, 3));
        ledger.set(pos(0, 0), ResourceKind::CoalDeposit, q(1000.0));
        ledger.set(pos(1, 0), ResourceKind::CoalDeposit, q(500.0));
        assert_eq!(ledger.totals()[ResourceKind::CoalDeposit], q(1500.0));

        ledger.set(pos(0, 0), ResourceKind::CoalDeposit, q(200.0));
        assert_eq!(ledger.totals()[ResourceKind::CoalDeposit], q(700.0));
        assert_eq!(ledger.recount(), *ledger.totals());
    }

    #[test]
    fn set_negative_stores_zero() {
        let mut ledger = Ledger::new(Grid::new(1, 1));
        ledger.set(pos(0, 0), ResourceKind::Steel, q(-5.0));
        assert_eq!(ledger.get(pos(0, 0), ResourceKind::Steel), Quantity::ZERO);
    }

    #[test]
    fn transfer_moves_between_cells() {
        let mut ledger = Ledger::new(Grid::new(2, 1));
        ledger.set(pos(0, 0), ResourceKind::IronOre, q(10.0));
        let moved = ledger.transfer(
            pos(0, 0),
            ResourceKind::IronOre,
            pos(1, 0),
            ResourceKind::IronOre,
            q(4.0),
        );
        assert_eq!(moved, q(4.0));
        assert_eq!(ledger.get(pos(0, 0), ResourceKind::IronOre), q(6.0));
        assert_eq!(ledger.get(pos(1, 0), ResourceKind::IronOre), q(4.0));
        assert_eq!(ledger.totals()[ResourceKind::IronOre], q(10.0));
    }

    #[test]
    fn transfer_between_kinds_shifts_totals() {
        let mut ledger = Ledger::new(Grid::new(1, 1));
        ledger.set(pos(0, 0), ResourceKind::CoalDeposit, q(100.0));
        ledger.transfer(
            pos(0, 0),
            ResourceKind::CoalDeposit,
            pos(0, 0),
            ResourceKind::CoalOre,
            q(50.0),
        );
        assert_eq!(ledger.totals()[ResourceKind::CoalDeposit], q(50.0));
        assert_eq!(ledger.totals()[ResourceKind::CoalOre], q(50.0));
    }

    #[test]
    fn non_positive_transfer_is_noop() {
        let mut ledger = Ledger::new(Grid::new(2, 1));
        ledger.set(pos(0, 0), ResourceKind::Steel, q(3.0));
        let before = ledger.clone();
        ledger.transfer(
            pos(0, 0),
            ResourceKind::Steel,
            pos(1, 0),
            ResourceKind::Steel,
            Quantity::ZERO,
        );
        ledger.transfer(
            pos(0, 0),
            ResourceKind::Steel,
            pos(1, 0),
            ResourceKind::Steel,
            q(-1.0),
        );
        assert_eq!(ledger, before);
    }

    #[test]
    fn credit_saturates_at_cell_capacity() {
        let mut ledger = Ledger::new(Grid::new(1, 1));
        ledger.set(pos(0, 0), ResourceKind::IronOre, Quantity::MAX - q(5.0));
        let added = ledger.credit(pos(0, 0), ResourceKind::IronOre, q(8.0));
        assert_eq!(added, q(5.0));
        assert_eq!(ledger.get(pos(0, 0), ResourceKind::IronOre), Quantity::MAX);
        assert_eq!(ledger.credit(pos(0, 0), ResourceKind::IronOre, q(1.0)), Quantity::ZERO);
        assert_eq!(ledger.recount(), *ledger.totals());
    }

    #[test]
    fn set_caps_quantity_to_keep_totals_representable() {
        let mut ledger = Ledger::new(Grid::new(3, 1));
        let big = q(1.0e9);
        assert_eq!(ledger.set(pos(0, 0), ResourceKind::CoalDeposit, big), big);
        assert_eq!(ledger.set(pos(1, 0), ResourceKind::CoalDeposit, big), big);
        let third = ledger.set(pos(2, 0), ResourceKind::CoalDeposit, big);
        assert_eq!(third, Quantity::MAX - big - big);
        assert_eq!(ledger.totals()[ResourceKind::CoalDeposit], Quantity::MAX);
        assert_eq!(ledger.recount(), *ledger.totals());

        // Lowering a cell frees room in the total again.
        ledger.set(pos(0, 0), ResourceKind::CoalDeposit, Quantity::ZERO);
        assert_eq!(ledger.set(pos(2, 0), ResourceKind::CoalDeposit, big), big);
        assert_eq!(ledger.recount(), *ledger.totals());
    }

    #[test]
    fn transfer_into_full_cell_leaves_remainder_at_source() {
        let mut ledger = Ledger::new(Grid::new(2, 1));
        ledger.set(pos(1, 0), ResourceKind::CoalOre, Quantity::MAX - q(3.0));
        ledger.set(pos(0, 0), ResourceKind::CoalDeposit, q(10.0));
        let moved = ledger.transfer(
            pos(0, 0),
            ResourceKind::CoalDeposit,
            pos(1, 0),
            ResourceKind::CoalOre,
            q(10.0),
        );
        assert_eq!(moved, q(3.0));
        assert_eq!(ledger.get(pos(0, 0), ResourceKind::CoalDeposit), q(7.0));
        assert_eq!(ledger.get(pos(1, 0), ResourceKind::CoalOre), Quantity::MAX);
        assert_eq!(ledger.recount(), *ledger.totals());
    }

    #[test]
    #[should_panic(expected = "outside")]
    fn out_of_bounds_get_panics() {
        let ledger = Ledger::new(Grid::new(2, 2));
        ledger.get(pos(5, 5), ResourceKind::Steel);
    }

    #[test]
    fn clear_zeroes_everything() {
        let mut ledger = Ledger::new(Grid::new(2, 2));
        ledger.set(pos(1, 1), ResourceKind::Paperclip, q(9.0));
        ledger.clear();
        assert!(ledger.totals().is_empty());
        assert!(ledger.cell(pos(1, 1)).is_empty());
    }

    #[test]
    fn snapshot_is_isolated_from_live_writes() {
        let mut ledger = Ledger::new(Grid::new(2, 1));
        ledger.set(pos(0, 0), ResourceKind::CoalOre, q(8.0));

        let mut snapshot = LedgerSnapshot::new();
        snapshot.refresh(&ledger);

        ledger.debit(pos(0, 0), ResourceKind::CoalOre, q(8.0));
        assert_eq!(ledger.get(pos(0, 0), ResourceKind::CoalOre), Quantity::ZERO);
        assert_eq!(snapshot.get(pos(0, 0), ResourceKind::CoalOre), q(8.0));

        snapshot.refresh(&ledger);
        assert_eq!(snapshot.get(pos(0, 0), ResourceKind::CoalOre), Quantity::ZERO);
    }
}
