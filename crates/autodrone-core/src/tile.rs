//! Tile kinds and collectible resources.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The kind of a grid tile.
///
/// A closed set: level data may only contain these kinds, and the
/// simulator only ever writes `Empty` back (collected resources and
/// spent chargers).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileKind {
    /// Traversable floor.
    Empty,
    /// Impassable.
    Wall,
    /// Collectible crystal.
    Crystal,
    /// Collectible data cache.
    Data,
    /// Collectible energy cell; grants energy when collected.
    EnergyCell,
    /// Traversable, but drains energy when entered.
    Hazard,
    /// Traversable; grants energy when entered, then becomes empty.
    Charger,
}

impl TileKind {
    /// Lowercase name, as returned to scripts by `scan()`.
    pub fn name(self) -> &'static str {
        match self {
            TileKind::Empty => "empty",
            TileKind::Wall => "wall",
            TileKind::Crystal => "crystal",
            TileKind::Data => "data",
            TileKind::EnergyCell => "energy_cell",
            TileKind::Hazard => "hazard",
            TileKind::Charger => "charger",
        }
    }

    /// Whether the drone can occupy this tile.
    pub fn is_walkable(self) -> bool {
        !matches!(self, TileKind::Wall)
    }

    /// The resource obtained by collecting this tile, if any.
    pub fn resource(self) -> Option<Resource> {
        match self {
            TileKind::Crystal => Some(Resource::Crystal),
            TileKind::Data => Some(Resource::Data),
            TileKind::EnergyCell => Some(Resource::EnergyCell),
            _ => None,
        }
    }
}

impl fmt::Display for TileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A collectible resource tracked in the drone's inventory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    /// From [`TileKind::Crystal`].
    Crystal,
    /// From [`TileKind::Data`].
    Data,
    /// From [`TileKind::EnergyCell`].
    EnergyCell,
}

impl Resource {
    /// Lowercase name used in objectives and inventory member access.
    pub fn name(self) -> &'static str {
        match self {
            Resource::Crystal => "crystal",
            Resource::Data => "data",
            Resource::EnergyCell => "energy_cell",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
