//! The factory: owns the ledger and equipment registry, acts as build
//! controller for cursor commands, and runs the tick engine.
//!
//! # Tick pipeline
//!
//! Each `step()` runs:
//! 1. **Snapshot** -- copy the live ledger into the snapshot buffer
//! 2. **Compute** -- every equipment, in registration order, computes its
//!    [`Flow`] from the snapshot (parallel with the `parallel` feature)
//! 3. **Apply** -- flows are applied to the live ledger serially in
//!    registration order; transfers are clamped to live stock, furnace
//!    batches apply atomically or not at all
//! 4. **Bookkeeping** -- advance the tick counter and report production
//!
//! Because every processor reads the same snapshot, a belt draining a cell
//! cannot starve a sibling that reads the same cell earlier in the tick; the
//! apply phase only clamps when two readers together ask for more than the
//! cell held, and then registration order breaks the tie.

use crate::config::{ConfigError, FactoryConfig, Rules};
use crate::equipment::{BuildError, CookState, Equipment, EquipmentKind, Flow};
use crate::fixed::{Quantity, Ticks};
use crate::grid::{Grid, GridPosition};
use crate::id::EquipmentId;
use crate::ledger::{Ledger, LedgerSnapshot};
use crate::query::{CellSnapshot, EquipmentSnapshot};
use crate::registry::EquipmentRegistry;
use crate::resource::{ResourceKind, ResourceMap};
use crate::sim::{SimState, StateHash, StepResult};
use crate::terrain::{DepositLayout, TerrainGenerator, ValueNoiseTerrain};

// ---------------------------------------------------------------------------
// Factory
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct Factory {
    grid: Grid,
    rules: Rules,

    /// Live resource state.
    ledger: Ledger,

    /// Read buffer for the compute phase. Refreshed from `ledger` at the start
    /// of every tick; never written otherwise.
    snapshot: LedgerSnapshot,

    registry: EquipmentRegistry,
    cursor: GridPosition,
    sim_state: SimState,
    terrain: Box<dyn TerrainGenerator>,
}

impl Factory {
    /// Create an empty factory from a config, using the built-in value-noise
    /// terrain for seeded resets. The cursor starts at the origin.
    pub fn new(config: &FactoryConfig) -> Result<Self, ConfigError> {
        let terrain = ValueNoiseTerrain::new(&config.terrain)?;
        Self::with_terrain(config, Box::new(terrain))
    }

    /// Create an empty factory with a custom terrain generator.
    pub fn with_terrain(
        config: &FactoryConfig,
        terrain: Box<dyn TerrainGenerator>,
    ) -> Result<Self, ConfigError> {
        let rules = config.rules()?;
        let grid = Grid::new(config.width, config.height);
        Ok(Self {
            grid,
            rules,
            ledger: Ledger::new(grid),
            snapshot: LedgerSnapshot::new(),
            registry: EquipmentRegistry::new(grid),
            cursor: GridPosition::new(0, 0),
            sim_state: SimState::new(),
            terrain,
        })
    }

    // -----------------------------------------------------------------------
    // Reset and seeding
    // -----------------------------------------------------------------------

    /// Clear equipment and ledger, regenerate deposits from `seed`, and move
    /// the cursor.
    ///
    /// # Panics
    ///
    /// Panics if `cursor` is outside the grid.
    pub fn reset(&mut self, seed: u64, cursor: GridPosition) {
        let layout = self.terrain.generate(self.grid, seed);
        tracing::debug!(seed, deposits = layout.len(), "generated terrain");
        self.reset_with_layout(&layout, cursor);
    }

    /// Clear equipment and ledger, seed the given deposits, and move the
    /// cursor.
    ///
    /// # Panics
    ///
    /// Panics if `cursor` or any deposit position is outside the grid.
    pub fn reset_with_layout(&mut self, layout: &DepositLayout, cursor: GridPosition) {
        assert!(
            self.grid.contains(cursor),
            "cursor ({}, {}) outside grid",
            cursor.x,
            cursor.y
        );
        self.registry.clear();
        self.ledger.clear();
        self.sim_state = SimState::new();
        self.cursor = cursor;
        for deposit in &layout.deposits {
            self.ledger.set(deposit.position, deposit.kind, deposit.quantity);
        }
        tracing::debug!(
            x = cursor.x,
            y = cursor.y,
            deposits = layout.len(),
            "factory reset"
        );
    }

    /// Absolute write of one ledger slot. Meant for seeding deposits and
    /// fixtures, not for use between ticks.
    pub fn set_resource(&mut self, pos: GridPosition, kind: ResourceKind, quantity: Quantity) {
        self.ledger.set(pos, kind, quantity);
    }

    // -----------------------------------------------------------------------
    // Cursor
    // -----------------------------------------------------------------------

    pub fn cursor(&self) -> GridPosition {
        self.cursor
    }

    /// Move the cursor, clamping to the grid.
    pub fn move_cursor(&mut self, dx: i32, dy: i32) {
        let target = GridPosition::new(
            self.cursor.x.saturating_add(dx),
            self.cursor.y.saturating_add(dy),
        );
        self.cursor = self.grid.clamp(target);
    }

    // -----------------------------------------------------------------------
    // Build controller
    // -----------------------------------------------------------------------

    /// Build at the cursor. Returns whether anything changed.
    pub fn build(&mut self, kind: EquipmentKind) -> bool {
        self.build_at(kind, self.cursor)
    }

    /// Destroy at the cursor. Returns whether anything changed.
    pub fn destroy(&mut self) -> bool {
        self.destroy_at(self.cursor)
    }

    /// Build at `pos`, collapsing the rejection reason to `false`.
    pub fn build_at(&mut self, kind: EquipmentKind, pos: GridPosition) -> bool {
        self.try_build_at(kind, pos).is_ok()
    }

    /// Build at `pos`. On rejection nothing changes.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is outside the grid.
    pub fn try_build_at(
        &mut self,
        kind: EquipmentKind,
        pos: GridPosition,
    ) -> Result<EquipmentId, BuildError> {
        let occupant = self.registry.kind_at(pos);
        if !occupant.is_empty() {
            tracing::trace!(x = pos.x, y = pos.y, ?kind, ?occupant, "build rejected: occupied");
            return Err(BuildError::Occupied {
                position: pos,
                occupant,
            });
        }
        let equipment = Equipment::new(kind, pos, self.grid, &self.rules).inspect_err(|e| {
            tracing::trace!(x = pos.x, y = pos.y, ?kind, error = %e, "build rejected");
        })?;
        let id = self.registry.insert(equipment)?;
        tracing::debug!(x = pos.x, y = pos.y, ?kind, "equipment built");
        Ok(id)
    }

    /// Remove the equipment at `pos`. Resources in the cell stay put.
    /// Returns whether anything changed.
    pub fn destroy_at(&mut self, pos: GridPosition) -> bool {
        match self.registry.remove_at(pos) {
            Some(removed) => {
                tracing::debug!(
                    x = pos.x,
                    y = pos.y,
                    kind = ?removed.kind(),
                    "equipment destroyed"
                );
                true
            }
            None => false,
        }
    }

    // -----------------------------------------------------------------------
    // Tick engine
    // -----------------------------------------------------------------------

    /// Advance one tick. Returns per-kind production and consumption.
    pub fn step(&mut self) -> StepResult {
        self.snapshot.refresh(&self.ledger);

        let flows = self.compute_flows();

        let mut result = StepResult::default();
        for (id, flow) in flows {
            self.apply_flow(id, flow, &mut result);
        }

        self.sim_state.tick += 1;
        result.tick = self.sim_state.tick;

        tracing::trace!(
            tick = result.tick,
            equipment = self.registry.len(),
            steel = %result.produced[ResourceKind::Steel],
            paperclips = %result.produced[ResourceKind::Paperclip],
            "tick complete"
        );
        result
    }

    /// Advance `ticks` ticks and return the combined result.
    pub fn run(&mut self, ticks: Ticks) -> StepResult {
        let mut total = StepResult {
            tick: self.sim_state.tick,
            ..StepResult::default()
        };
        for _ in 0..ticks {
            let step = self.step();
            total.merge(&step);
        }
        total
    }

    fn state_of(&self, id: EquipmentId) -> CookState {
        self.registry.cook_state(id).unwrap_or_default()
    }

    #[cfg(not(feature = "parallel"))]
    fn compute_flows(&self) -> Vec<(EquipmentId, Flow)> {
        self.registry
            .iter()
            .map(|(id, equipment)| (id, equipment.process(self.state_of(id), &self.snapshot)))
            .collect()
    }

    #[cfg(feature = "parallel")]
    fn compute_flows(&self) -> Vec<(EquipmentId, Flow)> {
        use rayon::prelude::*;

        let ids = self.registry.ids();
        // `collect` on an indexed parallel iterator keeps input order.
        ids.par_iter()
            .map(|&id| {
                let flow = match self.registry.get(id) {
                    Some(equipment) => equipment.process(self.state_of(id), &self.snapshot),
                    None => Flow::default(),
                };
                (id, flow)
            })
            .collect()
    }

    fn apply_flow(&mut self, id: EquipmentId, flow: Flow, result: &mut StepResult) {
        for t in &flow.transfers {
            let amount = t.amount.min(self.ledger.get(t.from, t.from_kind));
            if amount <= Quantity::ZERO {
                continue;
            }
            let moved = self
                .ledger
                .transfer(t.from, t.from_kind, t.to, t.to_kind, amount);
            if t.is_conversion() {
                result.consumed.add(t.from_kind, moved);
                result.produced.add(t.to_kind, moved);
            }
        }

        let covered = flow
            .consume
            .iter()
            .all(|d| self.ledger.get(d.position, d.kind) >= d.amount);
        if !covered {
            tracing::trace!(?id, "inputs drained earlier this tick; batch skipped");
            return;
        }

        for d in &flow.consume {
            let taken = self.ledger.debit(d.position, d.kind, d.amount);
            result.consumed.add(d.kind, taken);
        }
        for d in &flow.emit {
            let added = self.ledger.credit(d.position, d.kind, d.amount);
            result.produced.add(d.kind, added);
        }
        if let Some(next) = flow.next_state {
            if let Some(previous) = self.registry.cook_state(id)
                && previous != next
            {
                tracing::trace!(?id, ?previous, ?next, "cook state changed");
            }
            self.registry.set_cook_state(id, next);
        }
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn tick(&self) -> Ticks {
        self.sim_state.tick
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn registry(&self) -> &EquipmentRegistry {
        &self.registry
    }

    pub fn equipment_count(&self) -> usize {
        self.registry.len()
    }

    /// Equipment kind at `pos` (`Empty` when free).
    pub fn equipment_at(&self, pos: GridPosition) -> EquipmentKind {
        self.registry.kind_at(pos)
    }

    /// Quantity of one kind at one cell.
    pub fn resource(&self, pos: GridPosition, kind: ResourceKind) -> Quantity {
        self.ledger.get(pos, kind)
    }

    /// Equipment and resources at a cell.
    pub fn query_cell(&self, pos: GridPosition) -> CellSnapshot {
        let cook_state = self
            .registry
            .id_at(pos)
            .and_then(|id| self.registry.cook_state(id));
        CellSnapshot {
            position: pos,
            equipment: self.registry.kind_at(pos),
            resources: *self.ledger.cell(pos),
            cook_state,
        }
    }

    /// Global per-kind totals.
    pub fn query_totals(&self) -> ResourceMap {
        *self.ledger.totals()
    }

    pub fn snapshot_equipment(&self, id: EquipmentId) -> Option<EquipmentSnapshot> {
        let equipment = self.registry.get(id)?;
        Some(EquipmentSnapshot {
            id,
            kind: equipment.kind(),
            position: equipment.position(),
            input_cells: equipment.input_footprint().cells,
            output_cells: equipment.output_footprint().cells,
            cook_state: self.registry.cook_state(id),
        })
    }

    /// Snapshots of every instance in registration order.
    pub fn snapshot_all_equipment(&self) -> Vec<EquipmentSnapshot> {
        self.registry
            .ids()
            .into_iter()
            .filter_map(|id| self.snapshot_equipment(id))
            .collect()
    }

    /// Deterministic hash of ledger, equipment, cursor and tick.
    pub fn state_hash(&self) -> u64 {
        let mut h = StateHash::new();
        h.write_u64(self.sim_state.tick);
        h.write_i32(self.cursor.x);
        h.write_i32(self.cursor.y);
        for (_, cell) in self.ledger.iter() {
            for (_, q) in cell.iter() {
                h.write_fixed64(q);
            }
        }
        for (id, equipment) in self.registry.iter() {
            let pos = equipment.position();
            h.write(&[equipment.kind().code()]);
            h.write_i32(pos.x);
            h.write_i32(pos.y);
            match self.registry.cook_state(id) {
                Some(CookState::Cooking { ticks_remaining }) => h.write_u32(ticks_remaining + 1),
                Some(CookState::Idle) | None => h.write_u32(0),
            }
        }
        h.finish()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
