//! Test fixtures and level builders for AutoDrone development.
//!
//! Provides the small walled levels the cross-crate tests run against,
//! so individual tests don't hand-build grids.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use autodrone_core::{Facing, Resource, TileKind};
use autodrone_world::{Level, Objective};

/// The 5×3 reference corridor: walls all around, a crystal at (3, 1),
/// start at (1, 1) facing east, 100 energy, one collect-1-crystal
/// objective.
pub fn crystal_corridor() -> Level {
    let mut level = walled_room(5, 3);
    level.name = "crystal corridor".into();
    level.grid[1][3] = TileKind::Crystal;
    level.objectives = vec![Objective::Collect {
        resource: Resource::Crystal,
        count: 1,
    }];
    level.optimal_energy = 7;
    level.optimal_steps = 3;
    level.time_limit = 20;
    level
}

/// A straight walled corridor with `interior` empty tiles in a row and
/// no objectives. Start at the west end facing east.
pub fn open_corridor(interior: u32) -> Level {
    let mut level = walled_room(interior + 2, 3);
    level.name = format!("open corridor {interior}");
    level
}

/// A walled rectangle with an empty interior. Start at (1, 1) facing
/// east, 100/100 energy, no objectives, fog off.
pub fn walled_room(width: u32, height: u32) -> Level {
    assert!(width >= 3 && height >= 3, "room needs an interior");
    let mut grid = vec![vec![TileKind::Wall; width as usize]; height as usize];
    for row in grid.iter_mut().take(height as usize - 1).skip(1) {
        for tile in row.iter_mut().take(width as usize - 1).skip(1) {
            *tile = TileKind::Empty;
        }
    }
    Level {
        id: 1,
        name: "room".into(),
        description: String::new(),
        lesson: String::new(),
        width,
        height,
        grid,
        start_x: 1,
        start_y: 1,
        start_facing: Facing::East,
        start_energy: 100,
        max_energy: 100,
        fog_of_war: false,
        scan_radius: 1,
        objectives: vec![],
        optimal_energy: 10,
        optimal_steps: 10,
        time_limit: 0,
        hints: vec![],
        sample_solution: String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use autodrone_world::World;

    #[test]
    fn test_fixture_levels_validate() {
        assert!(World::new(&crystal_corridor()).is_ok());
        assert!(World::new(&open_corridor(10)).is_ok());
        assert!(World::new(&walled_room(8, 6)).is_ok());
    }

    #[test]
    fn test_crystal_corridor_layout() {
        let level = crystal_corridor();
        assert_eq!(level.grid[1][3], TileKind::Crystal);
        assert_eq!(level.grid[1][1], TileKind::Empty);
        assert_eq!(level.grid[0][3], TileKind::Wall);
    }
}
