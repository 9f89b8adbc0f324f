//! Grid geometry: bounded map dimensions, positions, and directions.
//!
//! The grid is immutable after construction. Every coordinate that reaches
//! the ledger or the equipment map is validated against it; an out-of-bounds
//! position at that point is a caller bug and panics.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// GridPosition
// ---------------------------------------------------------------------------

/// A position on the 2D grid. `x` grows rightwards, `y` grows downwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridPosition {
    pub x: i32,
    pub y: i32,
}

impl GridPosition {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The position shifted by `(dx, dy)`. May lie outside any grid.
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// The adjacent position one step in `dir`.
    pub fn step(self, dir: Direction) -> Self {
        let (dx, dy) = dir.offset();
        self.offset(dx, dy)
    }
}

impl From<(i32, i32)> for GridPosition {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

// ---------------------------------------------------------------------------
// Direction
// ---------------------------------------------------------------------------

/// Cardinal directions in screen space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// All four cardinal directions.
    pub fn all() -> [Direction; 4] {
        [
            Direction::Left,
            Direction::Right,
            Direction::Up,
            Direction::Down,
        ]
    }

    /// Offset for one step in this direction.
    pub fn offset(&self) -> (i32, i32) {
        match self {
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
        }
    }

    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }
}

// ---------------------------------------------------------------------------
// Grid
// ---------------------------------------------------------------------------

/// Fixed map dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Grid {
    width: u32,
    height: u32,
}

impl Grid {
    /// Create a grid. Both dimensions must be non-zero and fit in `i32`.
    pub fn new(width: u32, height: u32) -> Self {
        assert!(width > 0 && height > 0, "grid dimensions must be non-zero");
        assert!(
            width <= i32::MAX as u32 && height <= i32::MAX as u32,
            "grid dimensions must fit in i32"
        );
        Self { width, height }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of cells.
    pub fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn contains(&self, pos: GridPosition) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as u32) < self.width && (pos.y as u32) < self.height
    }

    /// Dense row-major index of `pos`.
    ///
    /// # Panics
    ///
    /// Panics if `pos` lies outside the grid.
    #[inline]
    pub fn index(&self, pos: GridPosition) -> usize {
        assert!(
            self.contains(pos),
            "position ({}, {}) outside {}x{} grid",
            pos.x,
            pos.y,
            self.width,
            self.height
        );
        pos.y as usize * self.width as usize + pos.x as usize
    }

    /// Inverse of [`Grid::index`].
    pub fn position(&self, index: usize) -> GridPosition {
        debug_assert!(index < self.area());
        let w = self.width as usize;
        GridPosition::new((index % w) as i32, (index / w) as i32)
    }

    /// Clamp a position into the grid.
    pub fn clamp(&self, pos: GridPosition) -> GridPosition {
        GridPosition::new(
            pos.x.clamp(0, self.width as i32 - 1),
            pos.y.clamp(0, self.height as i32 - 1),
        )
    }

    /// The in-bounds cells within Chebyshev `radius` of `center`, in row-major
    /// order (by `y`, then `x`). `center` itself is included.
    pub fn neighborhood(
        &self,
        center: GridPosition,
        radius: u32,
    ) -> impl Iterator<Item = GridPosition> + '_ {
        let r = radius as i32;
        (center.y - r..=center.y + r)
            .flat_map(move |y| (center.x - r..=center.x + r).map(move |x| GridPosition::new(x, y)))
            .filter(move |p| self.contains(*p))
    }

    /// Every cell, row-major.
    pub fn positions(&self) -> impl Iterator<Item = GridPosition> + '_ {
        (0..self.area()).map(move |i| self.position(i))
    }
}
