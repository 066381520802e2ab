//! Grid positions.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::direction::Facing;

/// A cell position on the grid.
///
/// Signed so that off-grid candidates (one step past an edge) can be
/// represented and bounds-checked; a `Pos` stored in world state is
/// always in bounds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pos {
    /// Column, increasing eastward.
    pub x: i32,
    /// Row, increasing southward.
    pub y: i32,
}

impl Pos {
    /// Construct a position.
    pub fn new(x: i32, y: i32) -> Pos {
        Pos { x, y }
    }

    /// The adjacent position one step along `facing`.
    pub fn step(self, facing: Facing) -> Pos {
        let (dx, dy) = facing.offset();
        Pos {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
