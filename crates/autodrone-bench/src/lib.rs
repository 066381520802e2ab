//! Benchmark profiles for the AutoDrone execution core.
//!
//! Provides canned scripts and levels shared by the criterion benches:
//!
//! - [`patrol_script`]: a loop-heavy patrol program in either family
//! - [`busy_script`]: a long straight-line program stressing the VM
//! - [`arena_level`]: a large walled level with scattered crystals

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use autodrone::prelude::*;
use autodrone::types::TileKind;
use autodrone_test_utils::walled_room;

/// A nested-loop patrol script exercising conditionals, scans and
/// member access.
pub fn patrol_script(family: SyntaxFamily) -> &'static str {
    match family {
        SyntaxFamily::Block => concat!(
            "loop 20:\n",
            "  if scan() == \"crystal\":\n",
            "    move forward\n",
            "    collect\n",
            "  elif scan_left() == \"wall\" and energy > 30:\n",
            "    turn right\n",
            "  else:\n",
            "    move forward\n",
            "  end\n",
            "  log inventory.crystal\n",
            "end\n",
        ),
        SyntaxFamily::Brace => concat!(
            "for (int i = 0; i < 20; i++) {\n",
            "  if (scan() == \"crystal\") {\n",
            "    move_forward();\n",
            "    collect();\n",
            "  } else if (scan_left() == \"wall\" && energy > 30) {\n",
            "    turn_right();\n",
            "  } else {\n",
            "    move_forward();\n",
            "  }\n",
            "  log(inventory.crystal);\n",
            "}\n",
        ),
    }
}

/// A long program whose every instruction ticks the world: waits in a
/// big counted loop.
pub fn busy_script() -> &'static str {
    "loop 2000: wait 0 end"
}

/// A `size`×`size` walled arena with a crystal every few tiles.
pub fn arena_level(size: u32) -> Level {
    let mut level = walled_room(size, size);
    for y in (2..size as usize - 1).step_by(3) {
        for x in (2..size as usize - 1).step_by(3) {
            level.grid[y][x] = TileKind::Crystal;
        }
    }
    level.optimal_energy = 100;
    level.optimal_steps = 100;
    level
}
