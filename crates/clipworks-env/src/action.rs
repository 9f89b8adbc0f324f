//! The discrete action set an agent picks from each step.

use clipworks_core::equipment::EquipmentKind;
use clipworks_core::factory::Factory;
use clipworks_core::grid::Direction;
use serde::{Deserialize, Serialize};

/// An index outside `0..Action::COUNT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unknown action index {0} (expected 0..{count})", count = Action::COUNT)]
pub struct ActionError(pub usize);

/// One agent command. Discriminants are the stable discrete indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    MoveLeft = 0,
    MoveRight = 1,
    MoveUp = 2,
    MoveDown = 3,
    BuildLeftBelt = 4,
    BuildRightBelt = 5,
    BuildUpBelt = 6,
    BuildDownBelt = 7,
    BuildExtractor = 8,
    BuildFurnace = 9,
    BuildPaperclipMachine = 10,
    Destroy = 11,
    Wait = 12,
}

impl Action {
    pub const COUNT: usize = 13;

    /// Every action in index order.
    pub const ALL: [Action; Self::COUNT] = [
        Action::MoveLeft,
        Action::MoveRight,
        Action::MoveUp,
        Action::MoveDown,
        Action::BuildLeftBelt,
        Action::BuildRightBelt,
        Action::BuildUpBelt,
        Action::BuildDownBelt,
        Action::BuildExtractor,
        Action::BuildFurnace,
        Action::BuildPaperclipMachine,
        Action::Destroy,
        Action::Wait,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// The equipment this action builds, if it is a build action.
    pub fn build_kind(self) -> Option<EquipmentKind> {
        let kind = match self {
            Action::BuildLeftBelt => EquipmentKind::Belt(Direction::Left),
            Action::BuildRightBelt => EquipmentKind::Belt(Direction::Right),
            Action::BuildUpBelt => EquipmentKind::Belt(Direction::Up),
            Action::BuildDownBelt => EquipmentKind::Belt(Direction::Down),
            Action::BuildExtractor => EquipmentKind::Extractor,
            Action::BuildFurnace => EquipmentKind::Furnace,
            Action::BuildPaperclipMachine => EquipmentKind::PaperclipMachine,
            _ => return None,
        };
        Some(kind)
    }

    /// Issue this action against a factory. Returns whether it changed
    /// anything; cursor moves that hit the edge and `Wait` return `false`.
    pub fn apply(self, factory: &mut Factory) -> bool {
        let cursor_move = |factory: &mut Factory, dx: i32, dy: i32| {
            let before = factory.cursor();
            factory.move_cursor(dx, dy);
            factory.cursor() != before
        };
        match self {
            Action::MoveLeft => cursor_move(factory, -1, 0),
            Action::MoveRight => cursor_move(factory, 1, 0),
            Action::MoveUp => cursor_move(factory, 0, -1),
            Action::MoveDown => cursor_move(factory, 0, 1),
            Action::Destroy => factory.destroy(),
            Action::Wait => false,
            build => build.build_kind().is_some_and(|kind| factory.build(kind)),
        }
    }
}

impl TryFrom<usize> for Action {
    type Error = ActionError;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        Action::ALL.get(index).copied().ok_or(ActionError(index))
    }
}

impl From<Action> for usize {
    fn from(action: Action) -> usize {
        action.index()
    }
}
