use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::grid::Position;
use crate::pathfinder::TailPolicy;

const APP_DIR_NAME: &str = "snake-autopilot";
const CONFIG_FILE_NAME: &str = "config.json";

/// Default number of grid rows.
pub const DEFAULT_GRID_ROWS: u16 = 20;

/// Default number of grid columns.
pub const DEFAULT_GRID_COLS: u16 = 20;

/// Segments in a freshly spawned snake.
pub const INITIAL_SNAKE_LENGTH: usize = 3;

/// Maximum number of direction changes buffered between ticks.
pub const MAX_PENDING_DIRECTIONS: usize = 2;

/// An obstacle is added every time the score reaches a multiple of this.
pub const OBSTACLE_SCORE_INTERVAL: u32 = 10;

/// Obstacles stop ramping once the score reaches this value.
pub const OBSTACLE_SCORE_CAP: u32 = 100;

/// Default tick interval for paced sessions; zero runs headless at full speed.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 0;

/// Default upper bound on ticks for one session.
pub const DEFAULT_MAX_TICKS: u64 = 10_000;

/// Errors raised when grid dimensions or an explicit snake layout are unusable.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum GridError {
    #[error("grid {rows}x{cols} is too small; need at least 1 row and {min_cols} columns")]
    TooSmall { rows: u16, cols: u16, min_cols: usize },
    #[error("snake must have at least one segment")]
    EmptySnake,
    #[error("snake segment {0} lies outside the grid")]
    SegmentOutOfBounds(Position),
    #[error("snake segment {0} appears more than once")]
    DuplicateSegment(Position),
    #[error("snake segments {0} and {1} are not adjacent")]
    DisjointSegments(Position, Position),
}

/// Logical grid dimensions, fixed for the lifetime of a game.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct GridSize {
    pub rows: u16,
    pub cols: u16,
}

impl GridSize {
    /// Validates dimensions so the initial snake fits on its starting row.
    pub fn new(rows: u16, cols: u16) -> Result<Self, GridError> {
        if rows == 0 || usize::from(cols) < INITIAL_SNAKE_LENGTH {
            return Err(GridError::TooSmall {
                rows,
                cols,
                min_cols: INITIAL_SNAKE_LENGTH,
            });
        }

        Ok(Self { rows, cols })
    }

    /// Returns the total number of cells in the grid.
    #[must_use]
    pub fn total_cells(self) -> usize {
        usize::from(self.rows) * usize::from(self.cols)
    }
}

impl Default for GridSize {
    fn default() -> Self {
        Self {
            rows: DEFAULT_GRID_ROWS,
            cols: DEFAULT_GRID_COLS,
        }
    }
}

/// Errors raised while loading a [`SimConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Grid(#[from] GridError),
}

/// Session configuration read from a JSON file and overridden by CLI flags.
///
/// Every field is optional in the file; missing fields fall back to the
/// defaults above.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub rows: u16,
    pub cols: u16,
    pub obstacles: bool,
    pub seed: Option<u64>,
    pub max_ticks: u64,
    pub tick_interval_ms: u64,
    pub tail_policy: TailPolicy,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_GRID_ROWS,
            cols: DEFAULT_GRID_COLS,
            obstacles: false,
            seed: None,
            max_ticks: DEFAULT_MAX_TICKS,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            tail_policy: TailPolicy::default(),
        }
    }
}

impl SimConfig {
    /// Loads the config at `path`.
    ///
    /// Returns defaults when the file does not exist. Returns `Err` when the
    /// file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::debug!("no config at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Returns validated grid dimensions.
    pub fn grid_size(&self) -> Result<GridSize, ConfigError> {
        Ok(GridSize::new(self.rows, self.cols)?)
    }
}

/// Returns the platform-correct default config path.
#[must_use]
pub fn default_config_path() -> PathBuf {
    let mut base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    base.push(APP_DIR_NAME);
    base.push(CONFIG_FILE_NAME);
    base
}
