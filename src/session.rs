use std::collections::VecDeque;
use std::thread;
use std::time::Duration;

use serde::Serialize;

use crate::autopilot::Autopilot;
use crate::game::{DeathReason, GameState, GameStatus, TickOutcome};
use crate::input::Direction;

/// Anything that produces one direction intent per tick.
pub trait DirectionSource {
    /// Returns the direction to request before the next tick, if any.
    fn next_direction(&mut self, state: &GameState) -> Option<Direction>;
}

impl DirectionSource for Autopilot {
    fn next_direction(&mut self, state: &GameState) -> Option<Direction> {
        self.choose_direction(state)
    }
}

/// Replays a fixed list of directions, one per tick.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    moves: VecDeque<Direction>,
}

impl ScriptedInput {
    #[must_use]
    pub fn new(moves: Vec<Direction>) -> Self {
        Self {
            moves: VecDeque::from(moves),
        }
    }

    /// Directions not yet replayed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.moves.len()
    }
}

impl DirectionSource for ScriptedInput {
    fn next_direction(&mut self, _state: &GameState) -> Option<Direction> {
        self.moves.pop_front()
    }
}

/// Bounds for one headless run.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct SessionLimits {
    pub max_ticks: u64,
    pub tick_interval: Duration,
}

/// Final figures of a finished run.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct SessionSummary {
    pub ticks: u64,
    pub score: u32,
    pub length: usize,
    pub status: GameStatus,
    pub death_reason: Option<DeathReason>,
}

impl SessionSummary {
    #[must_use]
    pub fn from_state(ticks: u64, state: &GameState) -> Self {
        Self {
            ticks,
            score: state.score(),
            length: state.snake_len(),
            status: state.status(),
            death_reason: state.death_reason(),
        }
    }
}

/// Drives `state` until game over or `limits.max_ticks` ticks have run.
pub fn run_session(
    state: &mut GameState,
    source: &mut dyn DirectionSource,
    limits: SessionLimits,
) -> SessionSummary {
    let mut ticks = 0;

    while ticks < limits.max_ticks && !state.is_game_over() {
        if let Some(direction) = source.next_direction(state) {
            state.change_direction(direction);
        }

        ticks += 1;
        match state.tick() {
            TickOutcome::Ate => log::debug!("tick {ticks}: score {}", state.score()),
            TickOutcome::Died(reason) => log::info!("tick {ticks}: snake died ({reason:?})"),
            TickOutcome::Moved | TickOutcome::Finished => {}
        }

        if !limits.tick_interval.is_zero() {
            thread::sleep(limits.tick_interval);
        }
    }

    SessionSummary::from_state(ticks, state)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{run_session, ScriptedInput, SessionLimits};
    use crate::config::GridSize;
    use crate::game::{DeathReason, GameState, GameStatus};
    use crate::grid::Position;
    use crate::input::Direction;

    const UNPACED: Duration = Duration::ZERO;

    fn size(rows: u16, cols: u16) -> GridSize {
        GridSize::new(rows, cols).expect("test grid size should be valid")
    }

    #[test]
    fn scripted_session_stops_at_wall() {
        let mut state = GameState::new_with_seed(size(6, 6), 9);
        assert!(state.set_food(Position::new(5, 5)));
        let mut script = ScriptedInput::new(vec![Direction::Up]);

        let summary = run_session(
            &mut state,
            &mut script,
            SessionLimits {
                max_ticks: 50,
                tick_interval: UNPACED,
            },
        );

        // Head starts at (3, 2): three steps up reach row 0, the fourth dies.
        assert_eq!(summary.ticks, 4);
        assert_eq!(summary.status, GameStatus::GameOver);
        assert_eq!(summary.death_reason, Some(DeathReason::Wall));
        assert_eq!(script.remaining(), 0);
    }

    #[test]
    fn session_respects_tick_limit() {
        let mut state = GameState::new_with_seed(size(10, 10), 10);
        assert!(state.set_food(Position::new(0, 0)));
        let mut script = ScriptedInput::default();

        let summary = run_session(
            &mut state,
            &mut script,
            SessionLimits {
                max_ticks: 3,
                tick_interval: UNPACED,
            },
        );

        assert_eq!(summary.ticks, 3);
        assert_eq!(summary.status, GameStatus::Running);
        assert_eq!(state.head_position(), Position::new(5, 5));
    }
}
