//! Headings and relative directions on the grid.
//!
//! The grid origin `(0, 0)` is the top-left corner; `+x` is east and
//! `+y` is south. All rotation tables are fixed and total, so heading
//! arithmetic can never fail.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An absolute heading of the drone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Facing {
    /// Toward `-y` (up the grid).
    North,
    /// Toward `+x`.
    East,
    /// Toward `+y` (down the grid).
    South,
    /// Toward `-x`.
    West,
}

impl Facing {
    /// Heading after a 90° left turn: N→W, W→S, S→E, E→N.
    pub fn turned_left(self) -> Facing {
        match self {
            Facing::North => Facing::West,
            Facing::West => Facing::South,
            Facing::South => Facing::East,
            Facing::East => Facing::North,
        }
    }

    /// Heading after a 90° right turn: N→E, E→S, S→W, W→N.
    pub fn turned_right(self) -> Facing {
        match self {
            Facing::North => Facing::East,
            Facing::East => Facing::South,
            Facing::South => Facing::West,
            Facing::West => Facing::North,
        }
    }

    /// Heading after a 180° turn — two right turns.
    pub fn reversed(self) -> Facing {
        self.turned_right().turned_right()
    }

    /// Unit grid offset `(dx, dy)` for one step along this heading.
    pub fn offset(self) -> (i32, i32) {
        match self {
            Facing::North => (0, -1),
            Facing::East => (1, 0),
            Facing::South => (0, 1),
            Facing::West => (-1, 0),
        }
    }

    /// Lowercase name, as exposed to scripts via the `facing` identifier.
    pub fn name(self) -> &'static str {
        match self {
            Facing::North => "north",
            Facing::East => "east",
            Facing::South => "south",
            Facing::West => "west",
        }
    }
}

impl fmt::Display for Facing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A movement direction relative to the drone's current heading.
///
/// `Left` and `Right` are strafing moves: they translate the drone
/// without changing its heading.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RelDir {
    /// Along the current heading.
    Forward,
    /// Opposite the current heading.
    Back,
    /// 90° left of the current heading.
    Left,
    /// 90° right of the current heading.
    Right,
}

impl RelDir {
    /// Resolve to an absolute heading given the drone's current one.
    pub fn resolve(self, facing: Facing) -> Facing {
        match self {
            RelDir::Forward => facing,
            RelDir::Back => facing.reversed(),
            RelDir::Left => facing.turned_left(),
            RelDir::Right => facing.turned_right(),
        }
    }

    /// Lowercase name used in action events and logs.
    pub fn name(self) -> &'static str {
        match self {
            RelDir::Forward => "forward",
            RelDir::Back => "back",
            RelDir::Left => "left",
            RelDir::Right => "right",
        }
    }
}

impl fmt::Display for RelDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A turn direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TurnDir {
    /// Counter-clockwise 90°.
    Left,
    /// Clockwise 90°.
    Right,
}

impl TurnDir {
    /// Apply this turn to a heading.
    pub fn apply(self, facing: Facing) -> Facing {
        match self {
            TurnDir::Left => facing.turned_left(),
            TurnDir::Right => facing.turned_right(),
        }
    }

    /// Lowercase name used in action events and logs.
    pub fn name(self) -> &'static str {
        match self {
            TurnDir::Left => "left",
            TurnDir::Right => "right",
        }
    }
}

impl fmt::Display for TurnDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Direction of a sensor scan relative to the drone's heading.
///
/// There is no backward scan; the drone's sensor array only covers the
/// forward 180° arc.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScanDir {
    /// The tile directly ahead.
    Forward,
    /// The tile 90° left.
    Left,
    /// The tile 90° right.
    Right,
}

impl ScanDir {
    /// Resolve to an absolute heading given the drone's current one.
    pub fn resolve(self, facing: Facing) -> Facing {
        match self {
            ScanDir::Forward => facing,
            ScanDir::Left => facing.turned_left(),
            ScanDir::Right => facing.turned_right(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_left_rotation_table() {
        assert_eq!(Facing::North.turned_left(), Facing::West);
        assert_eq!(Facing::West.turned_left(), Facing::South);
        assert_eq!(Facing::South.turned_left(), Facing::East);
        assert_eq!(Facing::East.turned_left(), Facing::North);
    }

    #[test]
    fn test_right_rotation_table() {
        assert_eq!(Facing::North.turned_right(), Facing::East);
        assert_eq!(Facing::East.turned_right(), Facing::South);
        assert_eq!(Facing::South.turned_right(), Facing::West);
        assert_eq!(Facing::West.turned_right(), Facing::North);
    }

    #[test]
    fn test_reversed_is_two_rights() {
        for f in [Facing::North, Facing::East, Facing::South, Facing::West] {
            assert_eq!(f.reversed(), f.turned_right().turned_right());
        }
    }

    #[test]
    fn test_rel_dir_resolution() {
        assert_eq!(RelDir::Forward.resolve(Facing::East), Facing::East);
        assert_eq!(RelDir::Back.resolve(Facing::East), Facing::West);
        assert_eq!(RelDir::Left.resolve(Facing::East), Facing::North);
        assert_eq!(RelDir::Right.resolve(Facing::East), Facing::South);
    }

    #[test]
    fn test_offsets_are_unit_steps() {
        for f in [Facing::North, Facing::East, Facing::South, Facing::West] {
            let (dx, dy) = f.offset();
            assert_eq!(dx.abs() + dy.abs(), 1);
        }
    }

    fn arb_facing() -> impl Strategy<Value = Facing> {
        prop_oneof![
            Just(Facing::North),
            Just(Facing::East),
            Just(Facing::South),
            Just(Facing::West),
        ]
    }

    proptest! {
        #[test]
        fn left_then_right_is_identity(f in arb_facing()) {
            prop_assert_eq!(f.turned_left().turned_right(), f);
            prop_assert_eq!(f.turned_right().turned_left(), f);
        }

        #[test]
        fn four_turns_are_identity(f in arb_facing()) {
            let mut g = f;
            for _ in 0..4 {
                g = g.turned_left();
            }
            prop_assert_eq!(g, f);
        }

        #[test]
        fn reversed_offset_is_negated(f in arb_facing()) {
            let (dx, dy) = f.offset();
            let (rx, ry) = f.reversed().offset();
            prop_assert_eq!((rx, ry), (-dx, -dy));
        }
    }
}
