//! End-to-end runs of small scripts against small levels, checking
//! exact energy, position and status outcomes.

use autodrone::prelude::*;
use autodrone::types::TileKind;
use autodrone_test_utils::{crystal_corridor, open_corridor, walled_room};

fn run_block(level: Level, source: &str) -> Session {
    let mut session =
        Session::new(level, SyntaxFamily::Block, source, VmOptions::default()).unwrap();
    session.run_to_end().unwrap();
    session
}

#[test]
fn two_moves_and_collect_wins() {
    let session = run_block(crystal_corridor(), "MOVE forward; MOVE forward; COLLECT");
    let world = session.world();
    assert_eq!(world.status(), Status::Won);
    assert_eq!(world.drone().energy, 93);
    assert_eq!(world.inventory().crystal, 1);
    assert_eq!(world.stats().ticks, 3);
    assert_eq!(world.stats().moves, 2);
    assert_eq!(world.stats().collects, 1);
}

#[test]
fn collect_on_empty_tile_fails_without_cost() {
    let session = run_block(crystal_corridor(), "MOVE forward; COLLECT");
    let world = session.world();
    assert_eq!(world.status(), Status::Playing);
    assert_eq!(world.drone().energy, 98);
    assert_eq!(world.inventory().crystal, 0);
    // The rejected collect shows up as a warning, not an error.
    assert_eq!(session.vm().state(), ExecState::Halted);
    assert!(session
        .vm()
        .event_log()
        .iter()
        .any(|e| e.kind() == EventKind::Warning));
}

#[test]
fn loop_walks_into_the_wall() {
    let session = run_block(crystal_corridor(), "LOOP 3: MOVE forward END");
    let world = session.world();
    // Two moves reach the crystal at (3, 1); the third hits the wall
    // at (4, 1) and is free.
    assert_eq!(world.drone().pos, Pos::new(3, 1));
    assert_eq!(world.drone().energy, 96);
    assert_eq!(world.stats().moves, 2);
    assert_eq!(world.stats().energy_wasted, 2);
}

#[test]
fn loop_blocked_by_wall_costs_nothing() {
    // A 2-tile interior: the third move is blocked.
    let level = open_corridor(2);
    let session = run_block(level, "LOOP 3: MOVE forward END");
    let world = session.world();
    assert_eq!(world.drone().pos, Pos::new(2, 1));
    // Two successful moves at 2 energy each; the failed one is free.
    assert_eq!(world.drone().energy, 96);
    assert_eq!(world.stats().moves, 2);
    assert_eq!(world.stats().energy_wasted, 2);
}

#[test]
fn while_loop_terminates_on_energy() {
    let mut session = Session::new(
        open_corridor(10),
        SyntaxFamily::Brace,
        "while (energy > 90) { move_forward(); }",
        VmOptions::default(),
    )
    .unwrap();
    session.run_to_end().unwrap();
    let world = session.world();
    assert_eq!(session.vm().state(), ExecState::Halted);
    assert_eq!(world.stats().moves, 5);
    assert_eq!(world.drone().energy, 90);
    assert_eq!(world.drone().pos, Pos::new(6, 1));
}

#[test]
fn scan_then_conditional_collect() {
    let mut level = walled_room(5, 3);
    level.grid[1][2] = TileKind::Crystal;
    level.objectives = vec![Objective::Collect {
        resource: autodrone::types::Resource::Crystal,
        count: 1,
    }];
    let session = run_block(
        level,
        "IF scan() == \"crystal\":\n  MOVE forward\n  COLLECT\nEND",
    );
    let world = session.world();
    assert_eq!(world.status(), Status::Won);
    // 100 - 1 (scan) - 2 (move) - 3 (collect).
    assert_eq!(world.drone().energy, 94);
    assert_eq!(world.inventory().crystal, 1);
    // Scans don't advance world time.
    assert_eq!(world.stats().ticks, 2);
    assert_eq!(world.stats().scans, 1);
}

#[test]
fn scan_not_crystal_skips_block() {
    let session = run_block(
        walled_room(5, 3),
        "IF scan() == \"crystal\":\n  MOVE forward\n  COLLECT\nEND",
    );
    let world = session.world();
    assert_eq!(world.drone().pos, Pos::new(1, 1));
    assert_eq!(world.drone().energy, 99);
}

#[test]
fn instruction_budget_stops_runaway_program() {
    let mut session = Session::new(
        open_corridor(3),
        SyntaxFamily::Block,
        "loop 10001: wait 0 end",
        VmOptions::default(),
    )
    .unwrap();
    let err = session.run_to_end().unwrap_err();
    assert_eq!(err.kind, RuntimeError::InstructionLimit { limit: 10_000 });
    assert_eq!(session.vm().state(), ExecState::Error);
    assert_eq!(session.vm().instruction_count(), 10_000);
    // The error is the final log entry.
    assert_eq!(
        session.vm().event_log().last().unwrap().kind(),
        EventKind::Error
    );
}

#[test]
fn perfect_run_scores_one_hundred() {
    let session = run_block(crystal_corridor(), "move forward\nmove forward\ncollect");
    let report = session.report();
    assert_eq!(report.score.energy, 40);
    assert_eq!(report.score.steps, 30);
    assert_eq!(report.score.time, 20);
    assert_eq!(report.score.completion, 10);
    assert_eq!(report.score.total, 100);
    assert_eq!(report.stars, 5);
    assert_eq!(report.suggestions.len(), 1);
    assert!(report.suggestions[0].contains("Perfect"));
}

#[test]
fn losing_run_reports_unmet_objective() {
    let session = run_block(crystal_corridor(), "move forward");
    let report = session.report();
    assert_eq!(report.score.completion, 0);
    assert!(report.suggestions[0].contains("collect 1 crystal"));
}

#[test]
fn wasteful_run_draws_suggestions() {
    // Spin in place: lots of turns, no movement.
    let session = run_block(
        crystal_corridor(),
        "loop 6: turn left end\nmove forward",
    );
    let report = session.report();
    assert!(report
        .suggestions
        .iter()
        .any(|s| s.contains("turning") || s.contains("Back-to-back")));
}

#[test]
fn fog_of_war_scan_reveals() {
    let mut level = crystal_corridor();
    level.fog_of_war = true;
    level.scan_radius = 1;
    let mut session = Session::new(
        level,
        SyntaxFamily::Block,
        "move forward\nlog scan()",
        VmOptions::default(),
    )
    .unwrap();
    session.run_to_end().unwrap();
    let world = session.world();
    // The initial reveal covered (2, 1); the move re-revealed around
    // (2, 1), reaching the crystal; the scan confirmed it.
    assert!(world.is_revealed(Pos::new(3, 1)));
    assert!(!world.is_revealed(Pos::new(4, 2)));
    assert!(session.vm().event_log().iter().any(|e| matches!(
        &e.payload,
        autodrone::vm::EventPayload::Log { value } if value.loose_eq(&Value::from("crystal"))
    )));
}

#[test]
fn level_round_trips_through_json() {
    let level = crystal_corridor();
    let json = serde_json::to_string(&level).unwrap();
    let back = Level::from_json(&json).unwrap();
    assert_eq!(back, level);
}
