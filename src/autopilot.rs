use crate::game::GameState;
use crate::grid::Position;
use crate::input::Direction;
use crate::pathfinder::TailPolicy;

/// Steers the snake along a shortest path to the food.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct Autopilot {
    pub tail_policy: TailPolicy,
}

impl Autopilot {
    #[must_use]
    pub fn new(tail_policy: TailPolicy) -> Self {
        Self { tail_policy }
    }

    /// Plans a path from the head to the food; empty when there is no food
    /// or it cannot be reached.
    #[must_use]
    pub fn plan(&self, state: &GameState) -> Vec<Position> {
        let Some(food) = state.food_position() else {
            return Vec::new();
        };

        state
            .pathfinder(self.tail_policy)
            .find_path(state.head_position(), food)
    }

    /// Returns the direction of the first planned step, if any.
    #[must_use]
    pub fn choose_direction(&self, state: &GameState) -> Option<Direction> {
        match self.plan(state).as_slice() {
            [from, to, ..] => Direction::from_step(*from, *to),
            _ => None,
        }
    }

    /// Feeds the chosen direction into `state`; keeps the current heading
    /// when no path exists.
    pub fn steer(&self, state: &mut GameState) {
        if let Some(direction) = self.choose_direction(state) {
            state.change_direction(direction);
        }
    }
}
