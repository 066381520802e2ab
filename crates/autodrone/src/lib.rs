//! AutoDrone: the language toolchain and deterministic execution core
//! for a grid-world drone programming game.
//!
//! This is the top-level facade crate re-exporting the public API from
//! the AutoDrone sub-crates, plus the two pieces that tie them
//! together: the [`pipeline`] front end (source → bytecode) and the
//! [`session`] driver (paced tick loop against a world).
//!
//! # Quick start
//!
//! ```rust
//! use autodrone::prelude::*;
//! use autodrone::types::TileKind;
//!
//! // A 5x3 walled corridor with a crystal at (3, 1).
//! let level_json = r#"{
//!     "id": 1, "name": "corridor",
//!     "width": 5, "height": 3,
//!     "grid": [
//!         ["wall", "wall", "wall", "wall", "wall"],
//!         ["wall", "empty", "empty", "crystal", "wall"],
//!         ["wall", "wall", "wall", "wall", "wall"]
//!     ],
//!     "startX": 1, "startY": 1, "startFacing": "east",
//!     "startEnergy": 100, "maxEnergy": 100,
//!     "objectives": [{"type": "collect", "resource": "crystal", "count": 1}],
//!     "optimalEnergy": 7, "optimalSteps": 3
//! }"#;
//! let level = Level::from_json(level_json).unwrap();
//!
//! let source = "move forward\nmove forward\ncollect\n";
//! let mut session = Session::new(
//!     level,
//!     SyntaxFamily::Block,
//!     source,
//!     VmOptions::default(),
//! ).unwrap();
//! session.run_to_end().unwrap();
//!
//! assert_eq!(session.world().status(), Status::Won);
//! assert_eq!(session.world().tile_at(Pos::new(3, 1)), Some(TileKind::Empty));
//! let report = session.report();
//! assert_eq!(report.score.completion, 10);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in
//! the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `autodrone-core` | Directions, tiles, values, actions, error enums |
//! | [`world`] | `autodrone-world` | Levels and the grid-world simulator |
//! | [`syntax`] | `autodrone-syntax` | Tokens, lexers, the unified tree, parser, printer |
//! | [`compiler`] | `autodrone-compiler` | Opcodes, bytecode, source map, compiler |
//! | [`vm`] | `autodrone-vm` | The stepwise VM, events, history, rewind |
//! | [`analysis`] | `autodrone-analysis` | Scoring, stars, suggestions |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod pipeline;
pub mod session;

/// Core vocabulary (`autodrone-core`): directions, tiles, runtime
/// values, action descriptors and receipts, error enums.
pub use autodrone_core as types;

/// Levels and the grid-world simulator (`autodrone-world`).
pub use autodrone_world as world;

/// Lexers, unified tree, parser and pretty-printer
/// (`autodrone-syntax`).
pub use autodrone_syntax as syntax;

/// Opcodes, bytecode and the compiler (`autodrone-compiler`).
pub use autodrone_compiler as compiler;

/// The stepwise virtual machine (`autodrone-vm`).
pub use autodrone_vm as vm;

/// Run scoring and suggestions (`autodrone-analysis`).
pub use autodrone_analysis as analysis;

pub use pipeline::{compile_source, Compiled, FrontendError};
pub use session::{Session, SessionError, StepResult};

/// Common imports for typical AutoDrone usage.
///
/// ```rust
/// use autodrone::prelude::*;
/// ```
pub mod prelude {
    // Core vocabulary
    pub use autodrone_core::{
        Action, ActionKind, ActionReceipt, Facing, Pos, RelDir, ScanDir, TurnDir, Value,
    };

    // Errors
    pub use autodrone_core::{CompileError, LexError, ParseError, RuntimeError};

    // World
    pub use autodrone_world::{Level, Objective, Status, World};

    // Syntax
    pub use autodrone_syntax::SyntaxFamily;

    // Compiler
    pub use autodrone_compiler::Bytecode;

    // VM
    pub use autodrone_vm::{Event, EventKind, ExecState, Vm, VmError, VmOptions};

    // Analysis
    pub use autodrone_analysis::{analyze, RunReport, ScoreBreakdown};

    // Facade
    pub use crate::pipeline::{compile_source, Compiled, FrontendError};
    pub use crate::session::{Session, SessionError, StepResult};
}
