//! Deterministic grid-world simulator for AutoDrone.
//!
//! A [`World`] is constructed from an immutable [`Level`], mutated only
//! through its primitive action methods and [`World::restore`], and reset
//! to its initial state with [`World::reset`]. Every action returns a
//! structured receipt; gameplay failures never panic and never raise.
//! The simulator contains no clock and no randomness — identical action
//! sequences always produce identical worlds.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod level;
pub mod snapshot;
pub mod stats;
pub mod world;

pub use level::{Level, LevelError, Objective};
pub use snapshot::WorldSnapshot;
pub use stats::RunStats;
pub use world::{Drone, Inventory, Status, World};
