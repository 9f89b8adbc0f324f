//! Property-based tests for the Clipworks core.
//!
//! Uses proptest to generate random deposit layouts and command sequences,
//! then verify structural invariants hold after every tick.

use clipworks_core::equipment::EquipmentKind;
use clipworks_core::factory::Factory;
use clipworks_core::fixed::Quantity;
use clipworks_core::grid::Direction;
use clipworks_core::resource::ResourceKind;
use clipworks_core::terrain::DepositLayout;
use clipworks_core::test_utils::*;
use proptest::prelude::*;

const SIZE: i32 = 6;

// ===========================================================================
// Generators
// ===========================================================================

/// Commands an agent can issue between ticks.
#[derive(Debug, Clone)]
enum Command {
    Move(i32, i32),
    Build(EquipmentKind),
    Destroy,
    Step,
}

fn arb_kind() -> impl Strategy<Value = EquipmentKind> {
    prop::sample::select(EquipmentKind::BUILDABLE.to_vec())
}

fn arb_commands(max_ops: usize) -> impl Strategy<Value = Vec<Command>> {
    proptest::collection::vec(
        prop_oneof![
            2 => (-2..=2i32, -2..=2i32).prop_map(|(dx, dy)| Command::Move(dx, dy)),
            3 => arb_kind().prop_map(Command::Build),
            1 => Just(Command::Destroy),
            3 => Just(Command::Step),
        ],
        1..=max_ops,
    )
}

/// Random deposits plus loose ore and steel on a `SIZE` x `SIZE` map.
fn arb_layout() -> impl Strategy<Value = DepositLayout> {
    let kinds = prop::sample::select(vec![
        ResourceKind::CoalDeposit,
        ResourceKind::IronDeposit,
        ResourceKind::CoalOre,
        ResourceKind::IronOre,
        ResourceKind::Steel,
    ]);
    proptest::collection::vec((0..SIZE, 0..SIZE, kinds, 1..400u32), 0..16).prop_map(|entries| {
        let mut layout = DepositLayout::new();
        for (x, y, kind, amount) in entries {
            layout.push(pos(x, y), kind, q(f64::from(amount) / 4.0));
        }
        layout
    })
}

fn seeded_factory(layout: &DepositLayout) -> Factory {
    let mut factory = empty_factory(SIZE as u32, SIZE as u32);
    factory.reset_with_layout(layout, pos(SIZE / 2, SIZE / 2));
    factory
}

/// Apply one command; returns the step result for `Step`.
fn apply(factory: &mut Factory, command: &Command) -> Option<clipworks_core::sim::StepResult> {
    match *command {
        Command::Move(dx, dy) => {
            factory.move_cursor(dx, dy);
            None
        }
        Command::Build(kind) => {
            factory.build(kind);
            None
        }
        Command::Destroy => {
            factory.destroy();
            None
        }
        Command::Step => Some(factory.step()),
    }
}

// ===========================================================================
// Properties
// ===========================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Non-deposit mass changes only by what the step reports.
    #[test]
    fn conservation_holds(layout in arb_layout(), commands in arb_commands(80)) {
        let mut factory = seeded_factory(&layout);
        for command in &commands {
            let before = non_deposit_total(&factory.query_totals());
            if let Some(result) = apply(&mut factory, command) {
                let after = non_deposit_total(&factory.query_totals());
                let expected = before + non_deposit_total(&result.produced)
                    - non_deposit_total(&result.consumed);
                prop_assert_eq!(after, expected);
            } else {
                // Commands never touch the ledger.
                prop_assert_eq!(non_deposit_total(&factory.query_totals()), before);
            }
        }
    }

    /// No cell ever holds a negative quantity, and totals never drift.
    #[test]
    fn ledger_stays_non_negative_and_consistent(
        layout in arb_layout(),
        commands in arb_commands(80),
    ) {
        let mut factory = seeded_factory(&layout);
        for command in &commands {
            apply(&mut factory, command);
            assert_non_negative(&factory);
            prop_assert_eq!(factory.query_totals(), factory.ledger().recount());
        }
    }

    /// A belt moves at most its cap of each kind per tick.
    #[test]
    fn belt_respects_cap(
        coal in 0..2000u32,
        steel in 0..2000u32,
        ticks in 1..10u64,
    ) {
        let mut factory = empty_factory(2, 1);
        factory.set_resource(pos(0, 0), ResourceKind::CoalOre, q(f64::from(coal)));
        factory.set_resource(pos(0, 0), ResourceKind::Steel, q(f64::from(steel)));
        prop_assert!(factory.build_at(belt(Direction::Right), pos(1, 0)));
        let cap = factory.rules().belt_rate;

        for _ in 0..ticks {
            let before = factory.query_cell(pos(1, 0)).resources;
            factory.step();
            let after = factory.query_cell(pos(1, 0)).resources;
            for kind in ResourceKind::TRANSFERABLE {
                let moved = after[kind] - before[kind];
                prop_assert!(moved >= Quantity::ZERO);
                prop_assert!(moved <= cap, "{:?} moved {}", kind, moved);
            }
        }
    }

    /// Same layout and command sequence: identical hashes at every step.
    #[test]
    fn replay_is_deterministic(layout in arb_layout(), commands in arb_commands(60)) {
        let mut a = seeded_factory(&layout);
        let mut b = seeded_factory(&layout);
        for command in &commands {
            let ra = apply(&mut a, command);
            let rb = apply(&mut b, command);
            prop_assert_eq!(ra, rb);
            prop_assert_eq!(a.state_hash(), b.state_hash());
        }
        prop_assert_eq!(a.ledger(), b.ledger());
    }

    /// A rejected build never changes anything.
    #[test]
    fn rejected_build_is_a_no_op(
        layout in arb_layout(),
        commands in arb_commands(40),
        kind in arb_kind(),
    ) {
        let mut factory = seeded_factory(&layout);
        for command in &commands {
            apply(&mut factory, command);
        }
        let hash = factory.state_hash();
        let count = factory.equipment_count();
        if !factory.build(kind) {
            prop_assert_eq!(factory.state_hash(), hash);
            prop_assert_eq!(factory.equipment_count(), count);
        } else {
            prop_assert_eq!(factory.equipment_count(), count + 1);
        }
    }
}
