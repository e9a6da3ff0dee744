use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::GridSize;
use crate::input::Direction;

/// Grid position as `(row, col)` cell coordinates.
///
/// Coordinates are signed so that stepping off an edge yields a position
/// that [`Grid::in_bounds`] rejects instead of wrapping.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    #[must_use]
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Returns the neighbouring position one step in `direction`.
    #[must_use]
    pub fn translate(self, direction: Direction) -> Self {
        let (row_offset, col_offset) = direction.offset();
        Self {
            row: self.row + row_offset,
            col: self.col + col_offset,
        }
    }

    /// Sum of absolute row and column differences.
    #[must_use]
    pub fn manhattan_distance(self, other: Self) -> u32 {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Contents of one grid cell.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    Snake,
    Food,
    Obstacle,
    /// Returned for out-of-bounds queries; never stored.
    Outside,
}

/// Dense row-major grid of cells.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Grid {
    size: GridSize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Creates an all-empty grid.
    #[must_use]
    pub fn new(size: GridSize) -> Self {
        Self {
            size,
            cells: vec![Cell::Empty; size.total_cells()],
        }
    }

    #[must_use]
    pub fn size(&self) -> GridSize {
        self.size
    }

    #[must_use]
    pub fn rows(&self) -> i32 {
        i32::from(self.size.rows)
    }

    #[must_use]
    pub fn cols(&self) -> i32 {
        i32::from(self.size.cols)
    }

    /// Returns true when the position lies inside the grid.
    #[must_use]
    pub fn in_bounds(&self, position: Position) -> bool {
        position.row >= 0
            && position.col >= 0
            && position.row < self.rows()
            && position.col < self.cols()
    }

    /// Returns the cell at `position`, or [`Cell::Outside`] when out of bounds.
    #[must_use]
    pub fn classify(&self, position: Position) -> Cell {
        self.index_of(position)
            .map_or(Cell::Outside, |index| self.cells[index])
    }

    /// Row-major index of an in-bounds position.
    #[must_use]
    pub fn index_of(&self, position: Position) -> Option<usize> {
        if !self.in_bounds(position) {
            return None;
        }

        let row = usize::try_from(position.row).ok()?;
        let col = usize::try_from(position.col).ok()?;
        Some(row * usize::from(self.size.cols) + col)
    }

    /// Inverse of [`Grid::index_of`].
    #[must_use]
    pub fn position_of(&self, index: usize) -> Position {
        let cols = usize::from(self.size.cols);
        // Both quotients fit: rows and cols are u16.
        Position::new((index / cols) as i32, (index % cols) as i32)
    }

    /// Iterates, in row-major order, over every position holding `cell`.
    pub fn cells_of(&self, cell: Cell) -> impl Iterator<Item = Position> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(move |(_, candidate)| **candidate == cell)
            .map(|(index, _)| self.position_of(index))
    }

    /// Iterates over every empty position in row-major order.
    pub fn empty_positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.cells_of(Cell::Empty)
    }

    /// Counts cells holding `cell`.
    #[must_use]
    pub fn count(&self, cell: Cell) -> usize {
        self.cells.iter().filter(|candidate| **candidate == cell).count()
    }

    pub(crate) fn set(&mut self, position: Position, cell: Cell) {
        debug_assert!(cell != Cell::Outside, "Outside is never stored");
        debug_assert!(self.in_bounds(position), "write outside grid at {position}");

        if let Some(index) = self.index_of(position) {
            self.cells[index] = cell;
        }
    }
}
