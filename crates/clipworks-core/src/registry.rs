//! The equipment registry: sole owner of placed equipment instances.
//!
//! Storage mirrors the rest of the engine's SoA layout:
//! - `instances`: slotmap arena of [`Equipment`], keyed by [`EquipmentId`]
//! - `cook_states`: per-instance runtime state, only for stateful equipment
//! - `by_position`: anchor cell -> id, for O(log n) lookup and removal
//! - `order`: registration serial -> id, so iteration follows insertion order
//!   even after removals recycle arena slots
//! - `map`: the dense [`EquipmentMap`] of occupancy by kind

use crate::equipment::{BuildError, CookState, Equipment, EquipmentKind};
use crate::grid::{Grid, GridPosition};
use crate::id::EquipmentId;
use slotmap::{SecondaryMap, SlotMap};
use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// EquipmentMap
// ---------------------------------------------------------------------------

/// Dense per-cell record of which equipment kind occupies each cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EquipmentMap {
    grid: Grid,
    cells: Vec<EquipmentKind>,
}

impl EquipmentMap {
    pub fn new(grid: Grid) -> Self {
        Self {
            grid,
            cells: vec![EquipmentKind::Empty; grid.area()],
        }
    }

    #[inline]
    pub fn get(&self, pos: GridPosition) -> EquipmentKind {
        self.cells[self.grid.index(pos)]
    }

    pub fn is_empty_at(&self, pos: GridPosition) -> bool {
        self.get(pos).is_empty()
    }

    fn set(&mut self, pos: GridPosition, kind: EquipmentKind) {
        let idx = self.grid.index(pos);
        self.cells[idx] = kind;
    }

    fn clear(&mut self) {
        self.cells.fill(EquipmentKind::Empty);
    }

    /// Number of occupied cells.
    pub fn occupied(&self) -> usize {
        self.cells.iter().filter(|k| !k.is_empty()).count()
    }
}

// ---------------------------------------------------------------------------
// EquipmentRegistry
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct EquipmentRegistry {
    instances: SlotMap<EquipmentId, Equipment>,
    cook_states: SecondaryMap<EquipmentId, CookState>,
    serials: SecondaryMap<EquipmentId, u64>,
    order: BTreeMap<u64, EquipmentId>,
    by_position: BTreeMap<GridPosition, EquipmentId>,
    map: EquipmentMap,
    next_serial: u64,
}

impl EquipmentRegistry {
    pub fn new(grid: Grid) -> Self {
        Self {
            instances: SlotMap::with_key(),
            cook_states: SecondaryMap::new(),
            serials: SecondaryMap::new(),
            order: BTreeMap::new(),
            by_position: BTreeMap::new(),
            map: EquipmentMap::new(grid),
            next_serial: 0,
        }
    }

    // -- Mutation --

    /// Register an instance at its anchor cell. Fails without any state
    /// change if the cell is already occupied.
    pub fn insert(&mut self, equipment: Equipment) -> Result<EquipmentId, BuildError> {
        let position = equipment.position();
        let occupant = self.map.get(position);
        if !occupant.is_empty() {
            return Err(BuildError::Occupied { position, occupant });
        }

        let kind = equipment.kind();
        let stateful = equipment.is_stateful();
        let id = self.instances.insert(equipment);
        if stateful {
            self.cook_states.insert(id, CookState::Idle);
        }
        let serial = self.next_serial;
        self.next_serial += 1;
        self.serials.insert(id, serial);
        self.order.insert(serial, id);
        self.by_position.insert(position, id);
        self.map.set(position, kind);
        Ok(id)
    }

    /// Remove whatever is anchored at `pos`. Returns the removed instance.
    pub fn remove_at(&mut self, pos: GridPosition) -> Option<Equipment> {
        let id = self.by_position.remove(&pos)?;
        self.cook_states.remove(id);
        if let Some(serial) = self.serials.remove(id) {
            self.order.remove(&serial);
        }
        self.map.set(pos, EquipmentKind::Empty);
        self.instances.remove(id)
    }

    /// Drop every instance. Registration serials keep counting.
    pub fn clear(&mut self) {
        self.instances.clear();
        self.cook_states.clear();
        self.serials.clear();
        self.order.clear();
        self.by_position.clear();
        self.map.clear();
    }

    pub(crate) fn set_cook_state(&mut self, id: EquipmentId, state: CookState) {
        if let Some(slot) = self.cook_states.get_mut(id) {
            *slot = state;
        }
    }

    // -- Queries --

    pub fn get(&self, id: EquipmentId) -> Option<&Equipment> {
        self.instances.get(id)
    }

    pub fn id_at(&self, pos: GridPosition) -> Option<EquipmentId> {
        self.by_position.get(&pos).copied()
    }

    pub fn at(&self, pos: GridPosition) -> Option<&Equipment> {
        self.id_at(pos).and_then(|id| self.instances.get(id))
    }

    /// Occupancy by kind (`Empty` when free).
    pub fn kind_at(&self, pos: GridPosition) -> EquipmentKind {
        self.map.get(pos)
    }

    /// The cooking state of a stateful instance.
    pub fn cook_state(&self, id: EquipmentId) -> Option<CookState> {
        self.cook_states.get(id).copied()
    }

    pub fn map(&self) -> &EquipmentMap {
        &self.map
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Instances in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (EquipmentId, &Equipment)> + '_ {
        self.order
            .values()
            .filter_map(move |&id| self.instances.get(id).map(|e| (id, e)))
    }

    /// Ids in registration order.
    pub fn ids(&self) -> Vec<EquipmentId> {
        self.order.values().copied().collect()
    }
}
