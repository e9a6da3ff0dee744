use std::collections::VecDeque;

use crate::config::MAX_PENDING_DIRECTIONS;
use crate::grid::Position;
use crate::input::{direction_change_is_valid, Direction};

/// Snake body plus buffered direction changes.
///
/// The body never touches the grid directly; [`crate::game::GameState`]
/// mirrors every push and pop into its grid.
#[derive(Debug, Clone)]
pub struct Snake {
    body: VecDeque<Position>,
    direction: Direction,
    pending: VecDeque<Direction>,
}

impl Snake {
    /// Creates a snake from explicit body segments (front is head).
    ///
    /// Callers guarantee `segments` is non-empty.
    #[must_use]
    pub fn from_segments(segments: Vec<Position>, direction: Direction) -> Self {
        debug_assert!(!segments.is_empty());

        Self {
            body: VecDeque::from(segments),
            direction,
            pending: VecDeque::with_capacity(MAX_PENDING_DIRECTIONS),
        }
    }

    /// Buffers a direction change for a later tick.
    ///
    /// Validation runs against the most recently buffered direction (or the
    /// current one when nothing is buffered), so two quick perpendicular turns
    /// inside one tick are both kept. Returns whether the change was queued.
    pub fn buffer_direction(&mut self, direction: Direction) -> bool {
        if self.pending.len() >= MAX_PENDING_DIRECTIONS {
            return false;
        }

        if !direction_change_is_valid(self.last_direction(), direction) {
            return false;
        }

        self.pending.push_back(direction);
        true
    }

    /// Promotes the oldest buffered direction, if any, and returns the
    /// direction the next step will use.
    pub fn advance_direction(&mut self) -> Direction {
        if let Some(next) = self.pending.pop_front() {
            self.direction = next;
        }
        self.direction
    }

    /// Returns the head position for a step in the current direction.
    #[must_use]
    pub fn next_head_position(&self) -> Position {
        self.head().translate(self.direction)
    }

    pub(crate) fn push_head(&mut self, position: Position) {
        self.body.push_front(position);
    }

    /// Removes the tail. The caller pushes a new head straight after, so the
    /// body is never observed empty.
    pub(crate) fn pop_tail(&mut self) -> Option<Position> {
        self.body.pop_back()
    }

    /// Returns the current head position.
    #[must_use]
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Returns the current tail position.
    #[must_use]
    pub fn tail(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    /// Returns true if any segment occupies `position`.
    #[must_use]
    pub fn occupies(&self, position: Position) -> bool {
        self.body.contains(&position)
    }

    /// Returns current segment count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Returns true when there are no segments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Returns the current movement direction.
    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Iterates over buffered directions, oldest first.
    pub fn pending(&self) -> impl Iterator<Item = Direction> + '_ {
        self.pending.iter().copied()
    }

    /// Iterates over body segments from head to tail.
    pub fn segments(&self) -> impl Iterator<Item = &Position> {
        self.body.iter()
    }

    fn last_direction(&self) -> Direction {
        self.pending.back().copied().unwrap_or(self.direction)
    }
}

#[cfg(test)]
mod tests {
    use crate::grid::Position;
    use crate::input::Direction;

    use super::Snake;

    fn straight_snake(direction: Direction) -> Snake {
        Snake::from_segments(
            vec![
                Position::new(5, 5),
                Position::new(5, 4),
                Position::new(5, 3),
            ],
            direction,
        )
    }

    #[test]
    fn direction_buffer_rejects_reverse() {
        let mut snake = straight_snake(Direction::Right);

        assert!(!snake.buffer_direction(Direction::Left));
        assert_eq!(snake.pending().count(), 0);
        assert_eq!(snake.advance_direction(), Direction::Right);
    }

    #[test]
    fn direction_buffer_rejects_repeat_of_current() {
        let mut snake = straight_snake(Direction::Right);

        assert!(!snake.buffer_direction(Direction::Right));
        assert_eq!(snake.pending().count(), 0);
    }

    #[test]
    fn direction_buffer_two_deep_queue_is_fifo() {
        let mut snake = straight_snake(Direction::Down);

        assert!(snake.buffer_direction(Direction::Right));
        assert!(snake.buffer_direction(Direction::Up));

        assert_eq!(snake.advance_direction(), Direction::Right);
        assert_eq!(snake.advance_direction(), Direction::Up);
        assert_eq!(snake.advance_direction(), Direction::Up);
    }

    #[test]
    fn direction_buffer_drops_third_request() {
        let mut snake = straight_snake(Direction::Down);

        assert!(snake.buffer_direction(Direction::Right));
        assert!(snake.buffer_direction(Direction::Up));
        assert!(!snake.buffer_direction(Direction::Left));

        assert_eq!(
            snake.pending().collect::<Vec<_>>(),
            vec![Direction::Right, Direction::Up]
        );
    }

    #[test]
    fn direction_buffer_rejects_reversal_of_queued_direction() {
        let mut snake = straight_snake(Direction::Down);

        assert!(snake.buffer_direction(Direction::Right));
        assert!(!snake.buffer_direction(Direction::Left));

        assert_eq!(snake.pending().collect::<Vec<_>>(), vec![Direction::Right]);
    }

    #[test]
    fn direction_buffer_allows_u_turn_via_two_step_queue() {
        let mut snake = straight_snake(Direction::Left);

        assert!(snake.buffer_direction(Direction::Up));
        assert!(snake.buffer_direction(Direction::Right));

        assert_eq!(snake.pending().count(), 2);
    }

    #[test]
    fn head_and_tail_track_pushes_and_pops() {
        let mut snake = straight_snake(Direction::Right);
        let next = snake.next_head_position();

        snake.push_head(next);
        assert_eq!(snake.pop_tail(), Some(Position::new(5, 3)));

        assert_eq!(snake.head(), Position::new(5, 6));
        assert_eq!(snake.tail(), Position::new(5, 4));
        assert_eq!(snake.len(), 3);
    }
}
