use crate::config::{DepositModel, FurnaceRecipe, Rules};
use crate::fixed::Quantity;
use crate::grid::{Direction, Grid, GridPosition};
use crate::ledger::LedgerSnapshot;
use crate::resource::ResourceKind;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Equipment kinds
// ---------------------------------------------------------------------------

/// What occupies a cell. Exactly one kind per cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentKind {
    #[default]
    Empty,
    /// Moves transferable resources one cell in the given direction of travel.
    Belt(Direction),
    /// Turns deposits into the matching ore, in place.
    Extractor,
    /// Smelts coal ore and iron ore from its 3x3 surroundings into steel.
    Furnace,
    /// Turns steel into paperclips, in place.
    PaperclipMachine,
}

impl EquipmentKind {
    /// Every kind that can be built.
    pub const BUILDABLE: [EquipmentKind; 7] = [
        EquipmentKind::Belt(Direction::Left),
        EquipmentKind::Belt(Direction::Right),
        EquipmentKind::Belt(Direction::Up),
        EquipmentKind::Belt(Direction::Down),
        EquipmentKind::Extractor,
        EquipmentKind::Furnace,
        EquipmentKind::PaperclipMachine,
    ];

    pub fn is_empty(&self) -> bool {
        matches!(self, EquipmentKind::Empty)
    }

    /// Stable small integer for hashing and observation encoding.
    pub fn code(&self) -> u8 {
        match self {
            EquipmentKind::Empty => 0,
            EquipmentKind::Belt(Direction::Left) => 1,
            EquipmentKind::Belt(Direction::Right) => 2,
            EquipmentKind::Belt(Direction::Up) => 3,
            EquipmentKind::Belt(Direction::Down) => 4,
            EquipmentKind::Extractor => 5,
            EquipmentKind::Furnace => 6,
            EquipmentKind::PaperclipMachine => 7,
        }
    }
}

// ---------------------------------------------------------------------------
// Build errors
// ---------------------------------------------------------------------------

/// Why a placement was rejected. Expected and frequent during exploration,
/// so it is a value, never a panic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    #[error("cell ({}, {}) is occupied by {:?}", .position.x, .position.y, .occupant)]
    Occupied {
        position: GridPosition,
        occupant: EquipmentKind,
    },
    #[error("belt at ({}, {}) would read from outside the grid", .position.x, .position.y)]
    UpstreamOutOfBounds { position: GridPosition },
    #[error("{0:?} cannot be built")]
    NotBuildable(EquipmentKind),
}

// ---------------------------------------------------------------------------
// Cooking state
// ---------------------------------------------------------------------------

/// Runtime state of a furnace. Every other equipment stays `Idle`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CookState {
    #[default]
    Idle,
    /// Inputs already debited; output is emitted on the tick that brings
    /// `ticks_remaining` to zero.
    Cooking { ticks_remaining: u32 },
}

// ---------------------------------------------------------------------------
// Footprints
// ---------------------------------------------------------------------------

/// The cells and resource kinds an equipment instance reads or writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Footprint {
    /// Cells in scan order.
    pub cells: Vec<GridPosition>,
    pub kinds: &'static [ResourceKind],
}

impl Footprint {
    fn point(position: GridPosition, kinds: &'static [ResourceKind]) -> Self {
        Self {
            cells: vec![position],
            kinds,
        }
    }

    pub fn contains(&self, position: GridPosition, kind: ResourceKind) -> bool {
        self.kinds.contains(&kind) && self.cells.contains(&position)
    }
}

const DEPOSITS: [ResourceKind; 2] = [ResourceKind::CoalDeposit, ResourceKind::IronDeposit];
const ORES: [ResourceKind; 2] = [ResourceKind::CoalOre, ResourceKind::IronOre];
const STEEL: [ResourceKind; 1] = [ResourceKind::Steel];
const PAPERCLIP: [ResourceKind; 1] = [ResourceKind::Paperclip];

// ---------------------------------------------------------------------------
// Flow
// ---------------------------------------------------------------------------

/// A clamped move of one kind between two ledger slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transfer {
    pub from: GridPosition,
    pub from_kind: ResourceKind,
    pub to: GridPosition,
    pub to_kind: ResourceKind,
    pub amount: Quantity,
}

impl Transfer {
    /// A transfer that changes the resource kind (extraction or conversion).
    pub fn is_conversion(&self) -> bool {
        self.from_kind != self.to_kind
    }
}

/// A one-sided change at one ledger slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delta {
    pub position: GridPosition,
    pub kind: ResourceKind,
    pub amount: Quantity,
}

/// What one equipment instance wants to do this tick, computed from the
/// snapshot.
///
/// - `transfers` are applied independently; each is clamped to what the live
///   source still holds and credits exactly what it debited.
/// - `consume`, `emit` and `next_state` form one atomic batch: if the live
///   ledger cannot cover every `consume` delta, none of the batch applies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Flow {
    pub transfers: Vec<Transfer>,
    pub consume: Vec<Delta>,
    pub emit: Vec<Delta>,
    pub next_state: Option<CookState>,
}

impl Flow {
    pub fn is_empty(&self) -> bool {
        self.transfers.is_empty()
            && self.consume.is_empty()
            && self.emit.is_empty()
            && self.next_state.is_none()
    }
}

// ---------------------------------------------------------------------------
// Processor variants
// ---------------------------------------------------------------------------

/// Straight transfer from the upstream neighbour into this cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Belt {
    pub direction: Direction,
    pub position: GridPosition,
    /// The upstream neighbour (`position - direction`).
    pub source: GridPosition,
    pub rate: Quantity,
}

/// Deposit-to-ore extraction in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extractor {
    pub position: GridPosition,
    pub rate: Quantity,
    pub deposits: DepositModel,
}

/// Ore-to-steel conversion with multi-tick latency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Furnace {
    pub position: GridPosition,
    /// The clipped 3x3 neighbourhood, row-major.
    pub inputs: Vec<GridPosition>,
    pub recipe: FurnaceRecipe,
}

/// Steel-to-paperclip conversion in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaperclipMachine {
    pub position: GridPosition,
    pub rate: Quantity,
}

/// A placed equipment instance. Dispatches via enum match (no trait objects).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Equipment {
    Belt(Belt),
    Extractor(Extractor),
    Furnace(Furnace),
    PaperclipMachine(PaperclipMachine),
}

impl Equipment {
    /// Construct the processor for `kind` anchored at `position`, capturing
    /// its footprint geometry and rate constants from `rules`.
    ///
    /// # Panics
    ///
    /// Panics if `position` is outside `grid`.
    pub fn new(
        kind: EquipmentKind,
        position: GridPosition,
        grid: Grid,
        rules: &Rules,
    ) -> Result<Self, BuildError> {
        assert!(
            grid.contains(position),
            "build position ({}, {}) outside grid",
            position.x,
            position.y
        );
        match kind {
            EquipmentKind::Empty => Err(BuildError::NotBuildable(kind)),
            EquipmentKind::Belt(direction) => {
                let source = position.step(direction.opposite());
                if !grid.contains(source) {
                    return Err(BuildError::UpstreamOutOfBounds { position });
                }
                Ok(Equipment::Belt(Belt {
                    direction,
                    position,
                    source,
                    rate: rules.belt_rate,
                }))
            }
            EquipmentKind::Extractor => Ok(Equipment::Extractor(Extractor {
                position,
                rate: rules.extractor_rate,
                deposits: rules.deposits,
            })),
            EquipmentKind::Furnace => Ok(Equipment::Furnace(Furnace {
                position,
                inputs: grid.neighborhood(position, 1).collect(),
                recipe: rules.furnace,
            })),
            EquipmentKind::PaperclipMachine => Ok(Equipment::PaperclipMachine(PaperclipMachine {
                position,
                rate: rules.paperclip_rate,
            })),
        }
    }

    pub fn kind(&self) -> EquipmentKind {
        match self {
            Equipment::Belt(b) => EquipmentKind::Belt(b.direction),
            Equipment::Extractor(_) => EquipmentKind::Extractor,
            Equipment::Furnace(_) => EquipmentKind::Furnace,
            Equipment::PaperclipMachine(_) => EquipmentKind::PaperclipMachine,
        }
    }

    /// The anchor cell.
    pub fn position(&self) -> GridPosition {
        match self {
            Equipment::Belt(b) => b.position,
            Equipment::Extractor(e) => e.position,
            Equipment::Furnace(f) => f.position,
            Equipment::PaperclipMachine(p) => p.position,
        }
    }

    pub fn input_footprint(&self) -> Footprint {
        match self {
            Equipment::Belt(b) => Footprint::point(b.source, &ResourceKind::TRANSFERABLE),
            Equipment::Extractor(e) => Footprint::point(e.position, &DEPOSITS),
            Equipment::Furnace(f) => Footprint {
                cells: f.inputs.clone(),
                kinds: &ORES,
            },
            Equipment::PaperclipMachine(p) => Footprint::point(p.position, &STEEL),
        }
    }

    pub fn output_footprint(&self) -> Footprint {
        match self {
            Equipment::Belt(b) => Footprint::point(b.position, &ResourceKind::TRANSFERABLE),
            Equipment::Extractor(e) => Footprint::point(e.position, &ORES),
            Equipment::Furnace(f) => Footprint::point(f.position, &STEEL),
            Equipment::PaperclipMachine(p) => Footprint::point(p.position, &PAPERCLIP),
        }
    }

    /// Whether this equipment carries a cooking state.
    pub fn is_stateful(&self) -> bool {
        matches!(self, Equipment::Furnace(_))
    }

    /// Compute this tick's flow against the snapshot. Pure: reads only the
    /// snapshot and `state`, mutates nothing.
    pub fn process(&self, state: CookState, snapshot: &LedgerSnapshot) -> Flow {
        match self {
            Equipment::Belt(b) => process_belt(b, snapshot),
            Equipment::Extractor(e) => process_extractor(e, snapshot),
            Equipment::Furnace(f) => process_furnace(f, state, snapshot),
            Equipment::PaperclipMachine(p) => process_paperclip(p, snapshot),
        }
    }
}

// ---------------------------------------------------------------------------
// Stateless processors
// ---------------------------------------------------------------------------

/// `min(cap, available)` for one (source, kind) pair, or `None` if nothing moves.
fn capped(
    snapshot: &LedgerSnapshot,
    at: GridPosition,
    kind: ResourceKind,
    cap: Quantity,
) -> Option<Quantity> {
    let amount = cap.min(snapshot.get(at, kind));
    (amount > Quantity::ZERO).then_some(amount)
}

fn process_belt(belt: &Belt, snapshot: &LedgerSnapshot) -> Flow {
    let transfers = ResourceKind::TRANSFERABLE
        .iter()
        .filter_map(|&kind| {
            capped(snapshot, belt.source, kind, belt.rate).map(|amount| Transfer {
                from: belt.source,
                from_kind: kind,
                to: belt.position,
                to_kind: kind,
                amount,
            })
        })
        .collect();
    Flow {
        transfers,
        ..Flow::default()
    }
}

fn process_extractor(ext: &Extractor, snapshot: &LedgerSnapshot) -> Flow {
    let mut flow = Flow::default();
    for deposit in DEPOSITS {
        let Some(ore) = deposit.extracted_ore() else {
            continue;
        };
        let Some(amount) = capped(snapshot, ext.position, deposit, ext.rate) else {
            continue;
        };
        match ext.deposits {
            DepositModel::Finite => flow.transfers.push(Transfer {
                from: ext.position,
                from_kind: deposit,
                to: ext.position,
                to_kind: ore,
                amount,
            }),
            // Presence of the deposit is enough; its stock is never drawn.
            DepositModel::Infinite => flow.emit.push(Delta {
                position: ext.position,
                kind: ore,
                amount: ext.rate,
            }),
        }
    }
    flow
}

fn process_paperclip(machine: &PaperclipMachine, snapshot: &LedgerSnapshot) -> Flow {
    let transfers = capped(snapshot, machine.position, ResourceKind::Steel, machine.rate)
        .map(|amount| Transfer {
            from: machine.position,
            from_kind: ResourceKind::Steel,
            to: machine.position,
            to_kind: ResourceKind::Paperclip,
            amount,
        })
        .into_iter()
        .collect();
    Flow {
        transfers,
        ..Flow::default()
    }
}

// ---------------------------------------------------------------------------
// Furnace
// ---------------------------------------------------------------------------

fn process_furnace(furnace: &Furnace, state: CookState, snapshot: &LedgerSnapshot) -> Flow {
    let recipe = &furnace.recipe;
    let steel = Delta {
        position: furnace.position,
        kind: ResourceKind::Steel,
        amount: recipe.steel_yield,
    };

    match state {
        CookState::Cooking { ticks_remaining } => {
            let remaining = ticks_remaining.saturating_sub(1);
            if remaining == 0 {
                Flow {
                    emit: vec![steel],
                    next_state: Some(CookState::Idle),
                    ..Flow::default()
                }
            } else {
                Flow {
                    next_state: Some(CookState::Cooking {
                        ticks_remaining: remaining,
                    }),
                    ..Flow::default()
                }
            }
        }
        CookState::Idle => {
            let first_with = |kind: ResourceKind, needed: Quantity| {
                furnace
                    .inputs
                    .iter()
                    .copied()
                    .find(|&p| snapshot.get(p, kind) >= needed)
            };
            let (Some(coal_at), Some(iron_at)) = (
                first_with(ResourceKind::CoalOre, recipe.coal_cost),
                first_with(ResourceKind::IronOre, recipe.iron_cost),
            ) else {
                return Flow::default();
            };

            let consume = vec![
                Delta {
                    position: coal_at,
                    kind: ResourceKind::CoalOre,
                    amount: recipe.coal_cost,
                },
                Delta {
                    position: iron_at,
                    kind: ResourceKind::IronOre,
                    amount: recipe.iron_cost,
                },
            ];

            // The start tick is the first cooking tick.
            if recipe.latency <= 1 {
                Flow {
                    consume,
                    emit: vec![steel],
                    next_state: Some(CookState::Idle),
                    ..Flow::default()
                }
            } else {
                Flow {
                    consume,
                    next_state: Some(CookState::Cooking {
                        ticks_remaining: recipe.latency - 1,
                    }),
                    ..Flow::default()
                }
            }
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::Ledger;

    fn q(v: f64) -> Quantity {
        Quantity::from_num(v)
    }

    fn pos(x: i32, y: i32) -> GridPosition {
        GridPosition::new(x, y)
    }

    fn build(kind: EquipmentKind, at: GridPosition, grid: Grid) -> Equipment {
        Equipment::new(kind, at, grid, &Rules::default()).unwrap()
    }

    #[test]
    fn belt_reads_upstream_neighbour() {
        let grid = Grid::new(4, 4);
        let cases = [
            (Direction::Right, pos(0, 1)),
            (Direction::Left, pos(2, 1)),
            (Direction::Down, pos(1, 0)),
            (Direction::Up, pos(1, 2)),
        ];
        for (dir, upstream) in cases {
            let belt = build(EquipmentKind::Belt(dir), pos(1, 1), grid);
            assert_eq!(belt.input_footprint().cells, vec![upstream], "{dir:?}");
            assert_eq!(belt.output_footprint().cells, vec![pos(1, 1)]);
            assert_eq!(belt.input_footprint().kinds, &ResourceKind::TRANSFERABLE);
        }
    }

    #[test]
    fn boundary_belt_rejected() {
        let grid = Grid::new(3, 3);
        let err = Equipment::new(
            EquipmentKind::Belt(Direction::Right),
            pos(0, 0),
            grid,
            &Rules::default(),
        )
        .unwrap_err();
        assert_eq!(err, BuildError::UpstreamOutOfBounds { position: pos(0, 0) });

        // Reading inwards from the edge is fine.
        assert!(
            Equipment::new(
                EquipmentKind::Belt(Direction::Left),
                pos(0, 0),
                grid,
                &Rules::default()
            )
            .is_ok()
        );
    }

    #[test]
    fn empty_is_not_buildable() {
        let err = Equipment::new(
            EquipmentKind::Empty,
            pos(0, 0),
            Grid::new(2, 2),
            &Rules::default(),
        )
        .unwrap_err();
        assert_eq!(err, BuildError::NotBuildable(EquipmentKind::Empty));
    }

    #[test]
    fn belt_flow_is_capped_per_kind() {
        let grid = Grid::new(2, 1);
        let mut ledger = Ledger::new(grid);
        ledger.set(pos(0, 0), ResourceKind::CoalOre, q(100.0));
        ledger.set(pos(0, 0), ResourceKind::Steel, q(3.0));
        ledger.set(pos(0, 0), ResourceKind::CoalDeposit, q(100.0));
        let snapshot = LedgerSnapshot::of(&ledger);

        let belt = build(EquipmentKind::Belt(Direction::Right), pos(1, 0), grid);
        let flow = belt.process(CookState::Idle, &snapshot);

        assert_eq!(flow.transfers.len(), 2, "deposits never ride belts");
        let coal = flow
            .transfers
            .iter()
            .find(|t| t.from_kind == ResourceKind::CoalOre)
            .unwrap();
        assert_eq!(coal.amount, q(25.0));
        let steel = flow
            .transfers
            .iter()
            .find(|t| t.from_kind == ResourceKind::Steel)
            .unwrap();
        assert_eq!(steel.amount, q(3.0));
        assert!(flow.transfers.iter().all(|t| !t.is_conversion()));
    }

    #[test]
    fn extractor_converts_both_deposits() {
        let grid = Grid::new(1, 1);
        let mut ledger = Ledger::new(grid);
        ledger.set(pos(0, 0), ResourceKind::CoalDeposit, q(1000.0));
        ledger.set(pos(0, 0), ResourceKind::IronDeposit, q(10.0));
        let snapshot = LedgerSnapshot::of(&ledger);

        let flow =
            build(EquipmentKind::Extractor, pos(0, 0), grid).process(CookState::Idle, &snapshot);
        assert_eq!(
            flow.transfers,
            vec![
                Transfer {
                    from: pos(0, 0),
                    from_kind: ResourceKind::CoalDeposit,
                    to: pos(0, 0),
                    to_kind: ResourceKind::CoalOre,
                    amount: q(50.0),
                },
                Transfer {
                    from: pos(0, 0),
                    from_kind: ResourceKind::IronDeposit,
                    to: pos(0, 0),
                    to_kind: ResourceKind::IronOre,
                    amount: q(10.0),
                },
            ]
        );
    }

    #[test]
    fn infinite_extractor_emits_without_debit() {
        let grid = Grid::new(1, 1);
        let rules = Rules {
            deposits: DepositModel::Infinite,
            ..Rules::default()
        };
        let extractor = Equipment::new(EquipmentKind::Extractor, pos(0, 0), grid, &rules).unwrap();
        let mut ledger = Ledger::new(grid);
        ledger.set(pos(0, 0), ResourceKind::IronDeposit, q(1.0));
        let flow = extractor.process(CookState::Idle, &LedgerSnapshot::of(&ledger));
        assert!(flow.transfers.is_empty());
        assert_eq!(
            flow.emit,
            vec![Delta {
                position: pos(0, 0),
                kind: ResourceKind::IronOre,
                amount: q(50.0),
            }]
        );
    }

    #[test]
    fn paperclip_machine_converts_steel() {
        let grid = Grid::new(1, 1);
        let mut ledger = Ledger::new(grid);
        ledger.set(pos(0, 0), ResourceKind::Steel, q(2.5));
        let flow = build(EquipmentKind::PaperclipMachine, pos(0, 0), grid)
            .process(CookState::Idle, &LedgerSnapshot::of(&ledger));
        assert_eq!(flow.transfers.len(), 1);
        assert_eq!(flow.transfers[0].to_kind, ResourceKind::Paperclip);
        assert_eq!(flow.transfers[0].amount, q(2.5));
    }

    #[test]
    fn furnace_footprint_is_clipped_3x3() {
        let grid = Grid::new(4, 4);
        let corner = build(EquipmentKind::Furnace, pos(0, 0), grid);
        assert_eq!(corner.input_footprint().cells.len(), 4);
        let centre = build(EquipmentKind::Furnace, pos(1, 1), grid);
        assert_eq!(centre.input_footprint().cells.len(), 9);
        assert!(centre.input_footprint().contains(pos(2, 2), ResourceKind::IronOre));
        assert!(!centre.input_footprint().contains(pos(2, 2), ResourceKind::Steel));
        assert_eq!(centre.output_footprint().cells, vec![pos(1, 1)]);
    }

    #[test]
    fn furnace_waits_for_both_inputs() {
        let grid = Grid::new(3, 3);
        let furnace = build(EquipmentKind::Furnace, pos(1, 1), grid);
        let mut ledger = Ledger::new(grid);
        ledger.set(pos(0, 0), ResourceKind::CoalOre, q(5.0));
        ledger.set(pos(2, 2), ResourceKind::IronOre, q(0.5));
        let flow = furnace.process(CookState::Idle, &LedgerSnapshot::of(&ledger));
        assert!(flow.is_empty());
    }

    #[test]
    fn furnace_picks_first_cell_in_scan_order() {
        let grid = Grid::new(3, 3);
        let furnace = build(EquipmentKind::Furnace, pos(1, 1), grid);
        let mut ledger = Ledger::new(grid);
        ledger.set(pos(2, 2), ResourceKind::CoalOre, q(9.0));
        ledger.set(pos(1, 0), ResourceKind::CoalOre, q(2.0));
        ledger.set(pos(0, 1), ResourceKind::IronOre, q(1.0));
        ledger.set(pos(0, 2), ResourceKind::IronOre, q(7.0));

        let flow = furnace.process(CookState::Idle, &LedgerSnapshot::of(&ledger));
        assert_eq!(flow.consume[0].position, pos(1, 0));
        assert_eq!(flow.consume[0].amount, q(2.0));
        assert_eq!(flow.consume[1].position, pos(0, 1));
        assert_eq!(flow.consume[1].amount, q(1.0));
        assert_eq!(
            flow.next_state,
            Some(CookState::Cooking { ticks_remaining: 2 })
        );
        assert!(flow.emit.is_empty());
    }

    #[test]
    fn furnace_cooking_counts_down_then_emits() {
        let grid = Grid::new(1, 1);
        let furnace = build(EquipmentKind::Furnace, pos(0, 0), grid);
        let snapshot = LedgerSnapshot::of(&Ledger::new(grid));

        let flow = furnace.process(CookState::Cooking { ticks_remaining: 2 }, &snapshot);
        assert!(flow.emit.is_empty() && flow.consume.is_empty());
        assert_eq!(flow.next_state, Some(CookState::Cooking { ticks_remaining: 1 }));

        let flow = furnace.process(CookState::Cooking { ticks_remaining: 1 }, &snapshot);
        assert_eq!(flow.emit.len(), 1);
        assert_eq!(flow.emit[0].amount, q(1.0));
        assert_eq!(flow.next_state, Some(CookState::Idle));
    }

    #[test]
    fn single_tick_furnace_emits_on_start() {
        let grid = Grid::new(1, 1);
        let mut rules = Rules::default();
        rules.furnace.latency = 1;
        let furnace = Equipment::new(EquipmentKind::Furnace, pos(0, 0), grid, &rules).unwrap();
        let mut ledger = Ledger::new(grid);
        ledger.set(pos(0, 0), ResourceKind::CoalOre, q(2.0));
        ledger.set(pos(0, 0), ResourceKind::IronOre, q(1.0));
        let flow = furnace.process(CookState::Idle, &LedgerSnapshot::of(&ledger));
        assert_eq!(flow.consume.len(), 2);
        assert_eq!(flow.emit.len(), 1);
        assert_eq!(flow.next_state, Some(CookState::Idle));
    }

    #[test]
    fn kind_codes_are_distinct() {
        let mut codes: Vec<u8> = EquipmentKind::BUILDABLE.iter().map(|k| k.code()).collect();
        codes.push(EquipmentKind::Empty.code());
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), 8);
    }
}
