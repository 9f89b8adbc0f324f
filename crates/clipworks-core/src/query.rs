//! Read-only query API for inspecting factory state.
//!
//! Snapshot types are owned copies -- no references into internal storage --
//! so they can be handed to rendering or environment code freely.

use crate::equipment::{CookState, EquipmentKind};
use crate::grid::GridPosition;
use crate::id::EquipmentId;
use crate::resource::ResourceMap;
use serde::{Deserialize, Serialize};

/// Everything at one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellSnapshot {
    pub position: GridPosition,
    /// `Empty` when nothing is built here.
    pub equipment: EquipmentKind,
    pub resources: ResourceMap,
    /// Set only for a furnace.
    pub cook_state: Option<CookState>,
}

/// An aggregated view of one equipment instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EquipmentSnapshot {
    pub id: EquipmentId,
    pub kind: EquipmentKind,
    pub position: GridPosition,
    /// Cells read, in scan order.
    pub input_cells: Vec<GridPosition>,
    /// Cells written.
    pub output_cells: Vec<GridPosition>,
    pub cook_state: Option<CookState>,
}
