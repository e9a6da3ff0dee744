use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::grid::Position;

/// Canonical movement directions for snake input.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Neighbour expansion order used by the pathfinder.
    pub const ALL: [Self; 4] = [Self::Up, Self::Right, Self::Down, Self::Left];

    /// Returns the opposite direction.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Returns the `(row, col)` unit offset of one step in this direction.
    #[must_use]
    pub fn offset(self) -> (i32, i32) {
        match self {
            Self::Up => (-1, 0),
            Self::Down => (1, 0),
            Self::Left => (0, -1),
            Self::Right => (0, 1),
        }
    }

    /// Derives the direction of the step `from -> to`.
    ///
    /// A non-zero row delta picks `Up`/`Down`; otherwise the column delta
    /// picks `Left`/`Right`. Returns `None` when both positions are equal.
    #[must_use]
    pub fn from_step(from: Position, to: Position) -> Option<Self> {
        let row_delta = to.row - from.row;
        let col_delta = to.col - from.col;

        if row_delta < 0 {
            Some(Self::Up)
        } else if row_delta > 0 {
            Some(Self::Down)
        } else if col_delta < 0 {
            Some(Self::Left)
        } else if col_delta > 0 {
            Some(Self::Right)
        } else {
            None
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
        };
        f.write_str(name)
    }
}

/// Raised when scripted input contains an unknown direction token.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
#[error("unknown direction `{0}`; expected up/down/left/right or u/d/l/r")]
pub struct ParseDirectionError(pub String);

impl FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "u" | "up" => Ok(Self::Up),
            "d" | "down" => Ok(Self::Down),
            "l" | "left" => Ok(Self::Left),
            "r" | "right" => Ok(Self::Right),
            _ => Err(ParseDirectionError(raw.to_owned())),
        }
    }
}

/// Parses a comma- or whitespace-separated list of directions.
pub fn parse_direction_script(script: &str) -> Result<Vec<Direction>, ParseDirectionError> {
    script
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .map(str::parse)
        .collect()
}

/// Returns whether `next` may follow `last` in the pending queue.
///
/// Repeating the last direction is a no-op and reversing it would drive the
/// head into the neck, so both are rejected.
#[must_use]
pub fn direction_change_is_valid(last: Direction, next: Direction) -> bool {
    next != last && next != last.opposite()
}

#[cfg(test)]
mod tests {
    use super::{direction_change_is_valid, parse_direction_script, Direction, ParseDirectionError};
    use crate::grid::Position;

    #[test]
    fn opposite_direction_is_correct() {
        assert_eq!(Direction::Up.opposite(), Direction::Down);
        assert_eq!(Direction::Down.opposite(), Direction::Up);
        assert_eq!(Direction::Left.opposite(), Direction::Right);
        assert_eq!(Direction::Right.opposite(), Direction::Left);
    }

    #[test]
    fn direction_change_rejects_reverse_and_repeat() {
        assert!(!direction_change_is_valid(Direction::Up, Direction::Down));
        assert!(!direction_change_is_valid(
            Direction::Right,
            Direction::Left
        ));
        assert!(!direction_change_is_valid(Direction::Up, Direction::Up));

        assert!(direction_change_is_valid(Direction::Up, Direction::Left));
        assert!(direction_change_is_valid(Direction::Up, Direction::Right));
    }

    #[test]
    fn step_direction_prefers_row_delta() {
        let origin = Position::new(3, 3);

        assert_eq!(
            Direction::from_step(origin, Position::new(2, 3)),
            Some(Direction::Up)
        );
        assert_eq!(
            Direction::from_step(origin, Position::new(4, 3)),
            Some(Direction::Down)
        );
        assert_eq!(
            Direction::from_step(origin, Position::new(3, 2)),
            Some(Direction::Left)
        );
        assert_eq!(
            Direction::from_step(origin, Position::new(4, 4)),
            Some(Direction::Down)
        );
        assert_eq!(Direction::from_step(origin, origin), None);
    }

    #[test]
    fn offsets_round_trip_through_step() {
        let origin = Position::new(5, 5);
        for direction in Direction::ALL {
            assert_eq!(
                Direction::from_step(origin, origin.translate(direction)),
                Some(direction)
            );
        }
    }

    #[test]
    fn direction_script_accepts_short_and_long_names() {
        let parsed = parse_direction_script("u, Right down\tl").expect("script should parse");

        assert_eq!(
            parsed,
            vec![
                Direction::Up,
                Direction::Right,
                Direction::Down,
                Direction::Left
            ]
        );
    }

    #[test]
    fn direction_script_reports_unknown_token() {
        assert_eq!(
            parse_direction_script("up,north"),
            Err(ParseDirectionError("north".to_owned()))
        );
    }
}
