use std::cmp::Ordering;
use std::collections::BinaryHeap;

use serde::{Deserialize, Serialize};

use crate::grid::{Cell, Grid, Position};
use crate::input::Direction;

/// Whether the snake's tail counts as walkable during a search.
///
/// The tail vacates its cell on a non-growing step, and [`crate::game::GameState::tick`]
/// already lets the head follow it, so `Passable` keeps the search in line
/// with movement. `Blocked` treats every snake cell as a wall.
#[derive(
    Debug, Clone, Copy, Default, Eq, PartialEq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum TailPolicy {
    #[default]
    Passable,
    Blocked,
}

/// Open-set entry. Ordered as a min-heap on `f`, then on push order.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
struct OpenNode {
    f: u32,
    g: u32,
    sequence: u64,
    index: usize,
}

impl Ord for OpenNode {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .cmp(&self.f)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A* search over a read-only grid view.
///
/// Movement is 4-directional with unit cost; the Manhattan heuristic is
/// admissible and consistent here, so the first time the goal leaves the
/// open set its path is optimal and closed nodes never need reopening.
#[derive(Debug, Clone, Copy)]
pub struct Pathfinder<'a> {
    grid: &'a Grid,
    passable_tail: Option<Position>,
}

impl<'a> Pathfinder<'a> {
    /// Creates a search where every snake cell is impassable.
    #[must_use]
    pub fn new(grid: &'a Grid) -> Self {
        Self {
            grid,
            passable_tail: None,
        }
    }

    /// Applies `policy` to the given tail cell.
    #[must_use]
    pub fn with_tail(mut self, tail: Position, policy: TailPolicy) -> Self {
        self.passable_tail = match policy {
            TailPolicy::Passable => Some(tail),
            TailPolicy::Blocked => None,
        };
        self
    }

    /// Returns true when the search may enter `position`.
    #[must_use]
    pub fn is_walkable(&self, position: Position) -> bool {
        match self.grid.classify(position) {
            Cell::Empty | Cell::Food => true,
            Cell::Snake => self.passable_tail == Some(position),
            Cell::Obstacle | Cell::Outside => false,
        }
    }

    /// Finds a shortest path from `start` to `goal`, both included.
    ///
    /// `start` need not be walkable since it is normally the snake's head.
    /// Returns an empty path when `goal` is not walkable or cannot be reached.
    #[must_use]
    pub fn find_path(&self, start: Position, goal: Position) -> Vec<Position> {
        let Some(start_index) = self.grid.index_of(start) else {
            return Vec::new();
        };
        if start == goal {
            return vec![start];
        }
        if !self.is_walkable(goal) {
            return Vec::new();
        }
        let Some(goal_index) = self.grid.index_of(goal) else {
            return Vec::new();
        };

        let cell_count = self.grid.size().total_cells();
        let mut best_g: Vec<Option<u32>> = vec![None; cell_count];
        let mut came_from: Vec<Option<usize>> = vec![None; cell_count];
        let mut closed = vec![false; cell_count];
        let mut open = BinaryHeap::new();
        let mut sequence = 0_u64;
        let mut expanded = 0_usize;

        best_g[start_index] = Some(0);
        open.push(OpenNode {
            f: start.manhattan_distance(goal),
            g: 0,
            sequence,
            index: start_index,
        });

        while let Some(node) = open.pop() {
            // Superseded entries stay in the heap; skip them here.
            if closed[node.index] {
                continue;
            }
            closed[node.index] = true;
            expanded += 1;

            if node.index == goal_index {
                log::trace!("path {start} -> {goal}: {} steps, {expanded} expanded", node.g);
                return self.reconstruct(&came_from, goal_index);
            }

            let current = self.grid.position_of(node.index);
            for direction in Direction::ALL {
                let neighbor = current.translate(direction);
                if !self.is_walkable(neighbor) {
                    continue;
                }
                let Some(neighbor_index) = self.grid.index_of(neighbor) else {
                    continue;
                };
                if closed[neighbor_index] {
                    continue;
                }

                let tentative = node.g + 1;
                if best_g[neighbor_index].is_some_and(|known| known <= tentative) {
                    continue;
                }

                best_g[neighbor_index] = Some(tentative);
                came_from[neighbor_index] = Some(node.index);
                sequence += 1;
                open.push(OpenNode {
                    f: tentative + neighbor.manhattan_distance(goal),
                    g: tentative,
                    sequence,
                    index: neighbor_index,
                });
            }
        }

        log::trace!("path {start} -> {goal}: unreachable, {expanded} expanded");
        Vec::new()
    }

    fn reconstruct(&self, came_from: &[Option<usize>], goal_index: usize) -> Vec<Position> {
        let mut path = vec![self.grid.position_of(goal_index)];
        let mut cursor = goal_index;
        while let Some(previous) = came_from[cursor] {
            path.push(self.grid.position_of(previous));
            cursor = previous;
        }
        path.reverse();
        path
    }
}

#[cfg(test)]
mod tests {
    use super::{Pathfinder, TailPolicy};
    use crate::config::GridSize;
    use crate::grid::{Cell, Grid, Position};

    fn grid(rows: u16, cols: u16) -> Grid {
        Grid::new(GridSize::new(rows, cols).expect("test grid size should be valid"))
    }

    fn assert_contiguous(path: &[Position]) {
        for pair in path.windows(2) {
            assert_eq!(
                pair[0].manhattan_distance(pair[1]),
                1,
                "{} and {} are not adjacent",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn open_grid_path_is_manhattan_optimal() {
        let grid = grid(12, 15);
        let finder = Pathfinder::new(&grid);

        for (start, goal) in [
            (Position::new(0, 0), Position::new(11, 14)),
            (Position::new(6, 3), Position::new(1, 9)),
            (Position::new(4, 4), Position::new(4, 0)),
            (Position::new(10, 2), Position::new(0, 2)),
        ] {
            let path = finder.find_path(start, goal);

            assert_eq!(path.len() as u32, start.manhattan_distance(goal) + 1);
            assert_eq!(path.first(), Some(&start));
            assert_eq!(path.last(), Some(&goal));
            assert_contiguous(&path);
        }
    }

    #[test]
    fn equal_cost_ties_resolve_deterministically() {
        let grid = grid(3, 3);
        let finder = Pathfinder::new(&grid);

        let path = finder.find_path(Position::new(0, 0), Position::new(2, 2));

        assert_eq!(
            path,
            vec![
                Position::new(0, 0),
                Position::new(0, 1),
                Position::new(0, 2),
                Position::new(1, 2),
                Position::new(2, 2),
            ]
        );
        assert_eq!(
            path,
            finder.find_path(Position::new(0, 0), Position::new(2, 2))
        );
    }

    #[test]
    fn path_detours_around_wall() {
        let mut grid = grid(5, 5);
        for row in 0..4 {
            grid.set(Position::new(row, 2), Cell::Obstacle);
        }
        let finder = Pathfinder::new(&grid);

        let path = finder.find_path(Position::new(0, 0), Position::new(0, 4));

        // Down to row 4, across, and back up.
        assert_eq!(path.len(), 13);
        assert!(path.iter().all(|p| grid.classify(*p) != Cell::Obstacle));
        assert_contiguous(&path);
    }

    #[test]
    fn walled_off_goal_is_unreachable() {
        let mut grid = grid(5, 5);
        let goal = Position::new(2, 2);
        grid.set(Position::new(1, 2), Cell::Snake);
        grid.set(Position::new(3, 2), Cell::Obstacle);
        grid.set(Position::new(2, 1), Cell::Snake);
        grid.set(Position::new(2, 3), Cell::Obstacle);

        let path = Pathfinder::new(&grid).find_path(Position::new(0, 0), goal);

        assert!(path.is_empty());
    }

    #[test]
    fn blocked_goal_returns_empty_immediately() {
        let mut grid = grid(4, 4);
        grid.set(Position::new(3, 3), Cell::Obstacle);
        grid.set(Position::new(0, 3), Cell::Snake);
        let finder = Pathfinder::new(&grid);

        assert!(finder.find_path(Position::new(0, 0), Position::new(3, 3)).is_empty());
        assert!(finder.find_path(Position::new(0, 0), Position::new(0, 3)).is_empty());
        assert!(finder.find_path(Position::new(0, 0), Position::new(9, 9)).is_empty());
    }

    #[test]
    fn start_equal_to_goal_is_trivial_path() {
        let grid = grid(4, 4);
        let start = Position::new(1, 1);

        assert_eq!(Pathfinder::new(&grid).find_path(start, start), vec![start]);
    }

    #[test]
    fn tail_policy_controls_passage_through_tail() {
        // Row 0 is a corridor closed by the snake; the only way to the food
        // at (0, 0) passes through the tail at (0, 1).
        let mut grid = grid(2, 4);
        let head = Position::new(0, 3);
        let tail = Position::new(0, 1);
        grid.set(head, Cell::Snake);
        grid.set(Position::new(0, 2), Cell::Snake);
        grid.set(tail, Cell::Snake);
        grid.set(Position::new(1, 0), Cell::Obstacle);
        grid.set(Position::new(0, 0), Cell::Food);

        let passable = Pathfinder::new(&grid).with_tail(tail, TailPolicy::Passable);
        let blocked = Pathfinder::new(&grid).with_tail(tail, TailPolicy::Blocked);

        assert!(passable.is_walkable(tail));
        assert!(!blocked.is_walkable(tail));
        assert!(blocked.find_path(head, Position::new(0, 0)).is_empty());

        let path = passable.find_path(head, Position::new(0, 0));
        assert_eq!(path.len(), 6);
        assert!(path.contains(&tail));
    }
}
