use rand::Rng;

use crate::grid::{Cell, Grid, Position};

/// Picks a uniformly random empty cell, or `None` when the grid is full.
#[must_use]
pub fn spawn_position<R: Rng + ?Sized>(rng: &mut R, grid: &Grid) -> Option<Position> {
    let candidates: Vec<Position> = grid.empty_positions().collect();
    if candidates.is_empty() {
        return None;
    }

    let index = rng.gen_range(0..candidates.len());
    Some(candidates[index])
}

/// Writes `cell` onto a random empty position and returns where it landed.
///
/// A full grid skips the spawn.
pub fn spawn_cell<R: Rng + ?Sized>(rng: &mut R, grid: &mut Grid, cell: Cell) -> Option<Position> {
    let Some(position) = spawn_position(rng, grid) else {
        log::debug!("no empty cell left for {cell:?}; spawn skipped");
        return None;
    };

    grid.set(position, cell);
    Some(position)
}
