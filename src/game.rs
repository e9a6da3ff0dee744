use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::config::{
    GridError, GridSize, INITIAL_SNAKE_LENGTH, OBSTACLE_SCORE_CAP, OBSTACLE_SCORE_INTERVAL,
};
use crate::grid::{Cell, Grid, Position};
use crate::input::Direction;
use crate::pathfinder::{Pathfinder, TailPolicy};
use crate::snake::Snake;
use crate::spawn::spawn_cell;

/// Current high-level gameplay state.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub enum GameStatus {
    Running,
    GameOver,
}

/// What ended the game.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub enum DeathReason {
    Wall,
    SelfCollision,
    Obstacle,
}

/// Result of one [`GameState::tick`].
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum TickOutcome {
    Moved,
    Ate,
    Died(DeathReason),
    /// The game was already over; nothing changed.
    Finished,
}

/// Construction-time gameplay switches.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct GameOptions {
    /// Spawn an extra obstacle every few points as a difficulty ramp.
    pub obstacles: bool,
}

/// Complete mutable game state for one session.
///
/// The grid is the rendering source of truth: every `Snake` cell matches
/// exactly one body segment. Restarting means building a new state.
#[derive(Debug, Clone)]
pub struct GameState {
    grid: Grid,
    snake: Snake,
    score: u32,
    tick_count: u64,
    status: GameStatus,
    death_reason: Option<DeathReason>,
    options: GameOptions,
    rng: StdRng,
}

impl GameState {
    /// Creates a new game seeded from system entropy.
    #[must_use]
    pub fn new(size: GridSize) -> Self {
        Self::from_rng(size, GameOptions::default(), StdRng::from_entropy())
    }

    /// Creates a deterministic state for tests and reproducible simulations.
    #[must_use]
    pub fn new_with_seed(size: GridSize, seed: u64) -> Self {
        Self::with_options(size, GameOptions::default(), seed)
    }

    /// Creates a deterministic state with explicit gameplay options.
    #[must_use]
    pub fn with_options(size: GridSize, options: GameOptions, seed: u64) -> Self {
        Self::from_rng(size, options, StdRng::seed_from_u64(seed))
    }

    /// Creates a state from explicit head-first segments, then spawns food.
    ///
    /// Segments must be in bounds, unique, and each adjacent to the next.
    pub fn with_snake(
        size: GridSize,
        segments: Vec<Position>,
        direction: Direction,
        options: GameOptions,
        seed: u64,
    ) -> Result<Self, GridError> {
        let grid = Grid::new(size);
        validate_segments(&grid, &segments)?;

        let mut state = Self::assemble(
            grid,
            Snake::from_segments(segments, direction),
            options,
            StdRng::seed_from_u64(seed),
        );
        state.spawn(Cell::Food);
        Ok(state)
    }

    fn from_rng(size: GridSize, options: GameOptions, rng: StdRng) -> Self {
        let row = i32::from(size.rows / 2);
        // GridSize guarantees room for the initial length on one row.
        let segments = (0..INITIAL_SNAKE_LENGTH as i32)
            .rev()
            .map(|col| Position::new(row, col))
            .collect();

        let mut state = Self::assemble(
            Grid::new(size),
            Snake::from_segments(segments, Direction::Right),
            options,
            rng,
        );
        state.spawn(Cell::Food);
        state
    }

    fn assemble(mut grid: Grid, snake: Snake, options: GameOptions, rng: StdRng) -> Self {
        for segment in snake.segments() {
            grid.set(*segment, Cell::Snake);
        }

        Self {
            grid,
            snake,
            score: 0,
            tick_count: 0,
            status: GameStatus::Running,
            death_reason: None,
            options,
            rng,
        }
    }

    /// Buffers a direction change for upcoming ticks.
    ///
    /// Illegal requests (a full queue, a repeat, or a reversal of the last
    /// buffered direction) are dropped silently.
    pub fn change_direction(&mut self, direction: Direction) {
        if self.is_game_over() {
            return;
        }

        if !self.snake.buffer_direction(direction) {
            log::trace!("dropped direction change to {direction}");
        }
    }

    /// Advances simulation by one gameplay tick.
    ///
    /// A fatal step only flips the status; grid and body keep their
    /// pre-step contents.
    pub fn tick(&mut self) -> TickOutcome {
        if self.is_game_over() {
            return TickOutcome::Finished;
        }

        self.snake.advance_direction();
        let next_head = self.snake.next_head_position();

        match self.will_hit(next_head) {
            Cell::Outside => self.die(DeathReason::Wall),
            Cell::Snake => self.die(DeathReason::SelfCollision),
            Cell::Obstacle => self.die(DeathReason::Obstacle),
            Cell::Empty => {
                self.remove_tail();
                self.add_head(next_head);
                self.tick_count += 1;
                TickOutcome::Moved
            }
            Cell::Food => {
                self.add_head(next_head);
                self.score += 1;
                self.tick_count += 1;
                self.spawn(Cell::Food);
                if self.options.obstacles && obstacle_due(self.score) {
                    self.spawn(Cell::Obstacle);
                }
                TickOutcome::Ate
            }
        }
    }

    /// Moves the food to `position`. Returns false if the cell holds the
    /// snake or an obstacle, or lies outside the grid.
    pub fn set_food(&mut self, position: Position) -> bool {
        match self.grid.classify(position) {
            Cell::Food => return true,
            Cell::Empty => {}
            Cell::Snake | Cell::Obstacle | Cell::Outside => return false,
        }

        let existing: Vec<Position> = self.grid.cells_of(Cell::Food).collect();
        for food in existing {
            self.grid.set(food, Cell::Empty);
        }
        self.grid.set(position, Cell::Food);
        true
    }

    /// Places an obstacle on an empty cell. Returns whether it was placed.
    pub fn place_obstacle(&mut self, position: Position) -> bool {
        if self.grid.classify(position) != Cell::Empty {
            return false;
        }

        self.grid.set(position, Cell::Obstacle);
        true
    }

    /// Returns a search view of the current grid.
    #[must_use]
    pub fn pathfinder(&self, tail_policy: TailPolicy) -> Pathfinder<'_> {
        Pathfinder::new(&self.grid).with_tail(self.tail_position(), tail_policy)
    }

    #[must_use]
    pub fn head_position(&self) -> Position {
        self.snake.head()
    }

    #[must_use]
    pub fn tail_position(&self) -> Position {
        self.snake.tail()
    }

    /// Iterates over body segments from head to tail.
    pub fn snake_body(&self) -> impl Iterator<Item = Position> + '_ {
        self.snake.segments().copied()
    }

    #[must_use]
    pub fn snake_len(&self) -> usize {
        self.snake.len()
    }

    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[must_use]
    pub fn size(&self) -> GridSize {
        self.grid.size()
    }

    #[must_use]
    pub fn direction(&self) -> Direction {
        self.snake.direction()
    }

    /// Iterates over buffered direction changes, oldest first.
    pub fn pending_directions(&self) -> impl Iterator<Item = Direction> + '_ {
        self.snake.pending()
    }

    /// Returns the food cell, if any is on the grid.
    #[must_use]
    pub fn food_position(&self) -> Option<Position> {
        self.grid.cells_of(Cell::Food).next()
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Number of completed, non-fatal ticks.
    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    #[must_use]
    pub fn status(&self) -> GameStatus {
        self.status
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.status == GameStatus::GameOver
    }

    #[must_use]
    pub fn death_reason(&self) -> Option<DeathReason> {
        self.death_reason
    }

    #[must_use]
    pub fn options(&self) -> GameOptions {
        self.options
    }

    fn will_hit(&self, position: Position) -> Cell {
        if !self.grid.in_bounds(position) {
            return Cell::Outside;
        }

        // The tail vacates this tick on a plain move.
        if position == self.snake.tail() {
            return Cell::Empty;
        }

        self.grid.classify(position)
    }

    fn die(&mut self, reason: DeathReason) -> TickOutcome {
        log::debug!(
            "game over after {} ticks: {reason:?} at {}, score {}",
            self.tick_count,
            self.snake.next_head_position(),
            self.score
        );
        self.status = GameStatus::GameOver;
        self.death_reason = Some(reason);
        TickOutcome::Died(reason)
    }

    fn add_head(&mut self, position: Position) {
        self.snake.push_head(position);
        self.grid.set(position, Cell::Snake);
    }

    fn remove_tail(&mut self) {
        if let Some(tail) = self.snake.pop_tail() {
            self.grid.set(tail, Cell::Empty);
        }
    }

    fn spawn(&mut self, cell: Cell) -> Option<Position> {
        spawn_cell(&mut self.rng, &mut self.grid, cell)
    }
}

fn obstacle_due(score: u32) -> bool {
    score % OBSTACLE_SCORE_INTERVAL == 0 && score < OBSTACLE_SCORE_CAP
}

fn validate_segments(grid: &Grid, segments: &[Position]) -> Result<(), GridError> {
    if segments.is_empty() {
        return Err(GridError::EmptySnake);
    }

    let mut seen = HashSet::with_capacity(segments.len());
    for segment in segments {
        if !grid.in_bounds(*segment) {
            return Err(GridError::SegmentOutOfBounds(*segment));
        }
        if !seen.insert(*segment) {
            return Err(GridError::DuplicateSegment(*segment));
        }
    }

    for pair in segments.windows(2) {
        if pair[0].manhattan_distance(pair[1]) != 1 {
            return Err(GridError::DisjointSegments(pair[0], pair[1]));
        }
    }

    Ok(())
}
