//! Run scoring and improvement suggestions.
//!
//! The analyzer is a pure pass over a finished run: the terminal world
//! state, the VM's event log, and the level's reference numbers go in;
//! a score breakdown, a star rating, and suggestion strings come out.
//! Nothing here mutates anything.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod score;
pub mod suggest;

pub use score::{stars, ScoreBreakdown};

use autodrone_vm::Event;
use autodrone_world::{Level, World};

/// The analyzer's verdict on one run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunReport {
    /// Per-category points and the clamped total.
    pub score: ScoreBreakdown,
    /// Star rating, 0 through 5.
    pub stars: u32,
    /// Human-readable improvement suggestions, most important first.
    pub suggestions: Vec<String>,
}

/// Grade a finished run.
pub fn analyze(world: &World, events: &[Event], level: &Level) -> RunReport {
    let score = ScoreBreakdown::compute(world, level);
    let stars = stars(score.total);
    let suggestions = suggest::suggestions(world, events, &score, stars);
    RunReport {
        score,
        stars,
        suggestions,
    }
}
