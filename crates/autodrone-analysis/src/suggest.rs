//! Improvement suggestions.

use autodrone_core::ActionKind;
use autodrone_vm::{Event, EventPayload};
use autodrone_world::{Objective, Status, World};

use crate::score::ScoreBreakdown;

/// Build the suggestion list for a finished run.
///
/// Order: the failure explanation (when the run was not won) comes
/// first, then the pattern findings. A perfect score replaces
/// everything with a single congratulation.
pub fn suggestions(
    world: &World,
    events: &[Event],
    score: &ScoreBreakdown,
    stars: u32,
) -> Vec<String> {
    if score.total == 100 {
        return vec!["Perfect score! Flawless run.".to_string()];
    }

    let mut out = Vec::new();
    if world.status() != Status::Won {
        if let Some(reason) = failure_reason(world) {
            out.push(reason);
        }
    }

    let stats = world.stats();
    if f64::from(stats.turns) > f64::from(stats.moves) * 0.5 {
        out.push(
            "Lots of turning: plan routes that go straight for longer stretches.".to_string(),
        );
    }
    if stats.energy_wasted > 10 {
        out.push(format!(
            "Failed actions would have cost {} energy: check walls and battery before acting.",
            stats.energy_wasted
        ));
    }
    if f64::from(stats.scans) > f64::from(stats.moves) * 2.0 {
        out.push("Scanning far more than moving: trust the map you already have.".to_string());
    }
    if has_consecutive_turns(events) {
        out.push(
            "Back-to-back turns: two lefts are a U-turn, and a right beats three lefts."
                .to_string(),
        );
    }
    if stats.ticks > 100 && f64::from(stats.moves) < f64::from(stats.ticks) * 0.3 {
        out.push("Long run with little movement: cut waiting and busywork.".to_string());
    }

    if stars >= 4 && out.is_empty() {
        out.push("Great run! A little polish and it's perfect.".to_string());
    }
    out
}

/// Why a lost or unfinished run did not win.
fn failure_reason(world: &World) -> Option<String> {
    if world.drone().energy == 0 {
        return Some("The drone ran out of energy before finishing.".to_string());
    }
    world.objectives().iter().find_map(|obj| match obj {
        Objective::Collect { resource, count } => {
            if world.inventory().count(*resource) < *count {
                Some(format!("Objective not met: collect {count} {resource}."))
            } else {
                None
            }
        }
    })
}

/// Two adjacent TURN actions in the action stream.
fn has_consecutive_turns(events: &[Event]) -> bool {
    let mut previous_was_turn = false;
    for event in events {
        if let EventPayload::Action { action } = &event.payload {
            let is_turn = matches!(action.kind, ActionKind::Turn(_));
            if is_turn && previous_was_turn {
                return true;
            }
            previous_was_turn = is_turn;
        }
    }
    false
}
