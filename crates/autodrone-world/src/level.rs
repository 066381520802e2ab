//! Level data model and validation.
//!
//! Levels are pure data consumed by the core — authored elsewhere,
//! typically as JSON. [`World`](crate::world::World) construction
//! validates a level the same way a simulation config is validated:
//! structural problems are [`LevelError`] values, never panics.

use std::error::Error;
use std::fmt;

use serde::{Deserialize, Serialize};

use autodrone_core::{Facing, Resource, TileKind};

/// A goal the learner must complete to win the level.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Objective {
    /// Hold at least `count` of `resource` in the inventory.
    Collect {
        /// The resource to gather.
        resource: Resource,
        /// How many are required.
        count: u32,
    },
}

impl fmt::Display for Objective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Objective::Collect { resource, count } => {
                write!(f, "collect {count} {resource}")
            }
        }
    }
}

/// An immutable level definition.
///
/// Field names follow the external level JSON, which uses camelCase.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Level {
    /// Level number, 1-based.
    pub id: u32,
    /// Display name.
    pub name: String,
    /// Flavor text shown before the level starts.
    #[serde(default)]
    pub description: String,
    /// The programming concept this level teaches.
    #[serde(default)]
    pub lesson: String,
    /// Grid width in tiles.
    pub width: u32,
    /// Grid height in tiles.
    pub height: u32,
    /// Row-major tile rows; `grid[y][x]` is the tile at `(x, y)`.
    pub grid: Vec<Vec<TileKind>>,
    /// Drone start column.
    pub start_x: i32,
    /// Drone start row.
    pub start_y: i32,
    /// Drone start heading.
    pub start_facing: Facing,
    /// Battery charge at the start of a run.
    pub start_energy: u32,
    /// Battery capacity.
    pub max_energy: u32,
    /// Whether unrevealed tiles render as unknown.
    #[serde(default)]
    pub fog_of_war: bool,
    /// Radius of the square revealed around the drone.
    #[serde(default = "default_scan_radius")]
    pub scan_radius: u32,
    /// Win conditions. A level with no objectives can never be won.
    #[serde(default)]
    pub objectives: Vec<Objective>,
    /// Reference energy spend used by the analyzer's grading.
    pub optimal_energy: u32,
    /// Reference tick count used by the analyzer's grading.
    pub optimal_steps: u32,
    /// Soft tick limit shown to the learner; not enforced by the core.
    #[serde(default)]
    pub time_limit: u32,
    /// Progressive hints for the level.
    #[serde(default)]
    pub hints: Vec<String>,
    /// A known-good script, shown after the level is beaten.
    #[serde(default)]
    pub sample_solution: String,
}

fn default_scan_radius() -> u32 {
    1
}

impl Level {
    /// Parse a level from its JSON form and validate it.
    pub fn from_json(json: &str) -> Result<Level, LevelError> {
        let level: Level = serde_json::from_str(json).map_err(|e| LevelError::Json {
            reason: e.to_string(),
        })?;
        level.validate()?;
        Ok(level)
    }

    /// Check the structural invariants the simulator relies on.
    pub fn validate(&self) -> Result<(), LevelError> {
        if self.width == 0 || self.height == 0 {
            return Err(LevelError::EmptyGrid);
        }
        if self.grid.len() != self.height as usize {
            return Err(LevelError::GridShape {
                expected_rows: self.height,
                actual_rows: self.grid.len(),
            });
        }
        for (y, row) in self.grid.iter().enumerate() {
            if row.len() != self.width as usize {
                return Err(LevelError::RowWidth {
                    row: y as u32,
                    expected: self.width,
                    actual: row.len(),
                });
            }
        }
        if self.start_x < 0
            || self.start_x >= self.width as i32
            || self.start_y < 0
            || self.start_y >= self.height as i32
        {
            return Err(LevelError::StartOutOfBounds {
                x: self.start_x,
                y: self.start_y,
            });
        }
        if self.grid[self.start_y as usize][self.start_x as usize] == TileKind::Wall {
            return Err(LevelError::StartOnWall {
                x: self.start_x,
                y: self.start_y,
            });
        }
        if self.start_energy > self.max_energy {
            return Err(LevelError::EnergyAboveCapacity {
                start: self.start_energy,
                max: self.max_energy,
            });
        }
        Ok(())
    }

    /// The tile at `(x, y)`. Caller guarantees bounds.
    pub(crate) fn tile(&self, x: u32, y: u32) -> TileKind {
        self.grid[y as usize][x as usize]
    }
}

/// Structural problems in a level definition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LevelError {
    /// Width or height is zero.
    EmptyGrid,
    /// The number of grid rows does not match `height`.
    GridShape {
        /// Rows the `height` field promises.
        expected_rows: u32,
        /// Rows actually present.
        actual_rows: usize,
    },
    /// A grid row's length does not match `width`.
    RowWidth {
        /// Index of the short or long row.
        row: u32,
        /// Columns the `width` field promises.
        expected: u32,
        /// Columns actually present.
        actual: usize,
    },
    /// The start position is outside the grid.
    StartOutOfBounds {
        /// Start column.
        x: i32,
        /// Start row.
        y: i32,
    },
    /// The start position is a wall tile.
    StartOnWall {
        /// Start column.
        x: i32,
        /// Start row.
        y: i32,
    },
    /// `startEnergy` exceeds `maxEnergy`.
    EnergyAboveCapacity {
        /// The starting charge.
        start: u32,
        /// The capacity.
        max: u32,
    },
    /// The JSON form could not be parsed.
    Json {
        /// The parser's message.
        reason: String,
    },
}

impl fmt::Display for LevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelError::EmptyGrid => write!(f, "level grid has zero width or height"),
            LevelError::GridShape {
                expected_rows,
                actual_rows,
            } => write!(f, "grid has {actual_rows} rows, expected {expected_rows}"),
            LevelError::RowWidth {
                row,
                expected,
                actual,
            } => write!(f, "grid row {row} has {actual} tiles, expected {expected}"),
            LevelError::StartOutOfBounds { x, y } => {
                write!(f, "start position ({x}, {y}) is outside the grid")
            }
            LevelError::StartOnWall { x, y } => {
                write!(f, "start position ({x}, {y}) is a wall")
            }
            LevelError::EnergyAboveCapacity { start, max } => {
                write!(f, "start energy {start} exceeds capacity {max}")
            }
            LevelError::Json { reason } => write!(f, "malformed level JSON: {reason}"),
        }
    }
}

impl Error for LevelError {}
