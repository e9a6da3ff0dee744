//! Grid snake simulation with an A* autopilot.
//!
//! [`game::GameState`] owns the grid and the snake and advances one cell per
//! [`game::GameState::tick`]. Drivers feed it direction intents, either from a
//! player script or from [`autopilot::Autopilot`], and read the grid back.

pub mod autopilot;
pub mod config;
pub mod game;
pub mod grid;
pub mod input;
pub mod pathfinder;
pub mod session;
pub mod snake;
pub mod spawn;
