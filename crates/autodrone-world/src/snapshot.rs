//! Value-copy snapshots of world state.

use autodrone_core::TileKind;

use crate::stats::RunStats;
use crate::world::{Drone, Inventory, Status};

/// A deep copy of all mutable world state.
///
/// Opaque to callers: produced by
/// [`World::snapshot`](crate::world::World::snapshot), consumed by
/// [`World::restore`](crate::world::World::restore). Capturing and
/// restoring has no side effects on anything else, and a capture
/// followed by a restore is bit-identical.
///
/// Grid dimensions, fog setting, scan radius and the objective list are
/// immutable for the life of a `World`, so they are not captured.
#[derive(Clone, Debug, PartialEq)]
pub struct WorldSnapshot {
    pub(crate) grid: Vec<TileKind>,
    pub(crate) revealed: Vec<bool>,
    pub(crate) drone: Drone,
    pub(crate) inventory: Inventory,
    pub(crate) scan_cooldown: u32,
    pub(crate) stats: RunStats,
    pub(crate) status: Status,
    pub(crate) status_message: String,
    pub(crate) objectives_complete: bool,
}
