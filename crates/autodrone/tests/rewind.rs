//! The rewind law: executing K ticks and rewinding K returns VM and
//! world to their pre-run state.

use autodrone::prelude::*;
use autodrone_test_utils::{crystal_corridor, open_corridor};

#[test]
fn rewind_everything_restores_initial_state() {
    let mut session = Session::new(
        crystal_corridor(),
        SyntaxFamily::Block,
        "move forward\nmove forward\ncollect",
        VmOptions::default(),
    )
    .unwrap();
    let initial_world = session.world().snapshot();

    session.start();
    let mut executed = 0usize;
    loop {
        let result = session.step().unwrap();
        if !matches!(result.state, ExecState::Running | ExecState::Paused) {
            break;
        }
        executed += 1;
    }
    // The final tick (the one that halted or was stopped) also counts.
    executed = session.vm().instruction_count() as usize;
    assert!(executed > 0);
    assert_eq!(session.world().status(), Status::Won);

    assert!(session.rewind(executed));
    assert_eq!(session.world().snapshot(), initial_world);
    assert_eq!(session.vm().ip(), 0);
    assert_eq!(session.vm().instruction_count(), 0);
    assert_eq!(session.vm().state(), ExecState::Paused);
    assert_eq!(session.world().status(), Status::Playing);
    assert_eq!(session.world().inventory().crystal, 0);
}

#[test]
fn rewind_one_then_replay_is_deterministic() {
    let source = "move forward\nturn left\nturn right\nmove forward\ncollect";
    let mut session = Session::new(
        crystal_corridor(),
        SyntaxFamily::Block,
        source,
        VmOptions::default(),
    )
    .unwrap();
    session.run_to_end().unwrap();
    let final_world = session.world().snapshot();

    // Undo the last three ticks, then replay them.
    assert!(session.rewind(3));
    assert_ne!(session.world().snapshot(), final_world);
    loop {
        let result = session.step().unwrap();
        if !matches!(result.state, ExecState::Running | ExecState::Paused) {
            break;
        }
    }
    assert_eq!(session.world().snapshot(), final_world);
}

#[test]
fn rewind_beyond_history_is_refused() {
    let mut session = Session::new(
        open_corridor(4),
        SyntaxFamily::Block,
        "move forward",
        VmOptions::default(),
    )
    .unwrap();
    session.start();
    session.step().unwrap();
    assert!(!session.rewind(10));
    // A refused rewind changes nothing.
    assert_eq!(session.vm().instruction_count(), 1);
}

#[test]
fn history_is_bounded_and_trimmed_from_front() {
    let mut options = VmOptions::default();
    options.history_capacity = 8;
    let mut session = Session::new(
        open_corridor(4),
        SyntaxFamily::Block,
        "loop 20: wait 0 end",
        options,
    )
    .unwrap();
    session.run_to_end().unwrap();
    assert!(session.vm().instruction_count() > 8);
    assert_eq!(session.vm().history_len(), 8);
    // Only the retained window is rewindable.
    assert!(!session.rewind(9));
    assert!(session.rewind(8));
}

#[test]
fn rewind_preserves_event_log() {
    let mut session = Session::new(
        crystal_corridor(),
        SyntaxFamily::Block,
        "log 1\nlog 2",
        VmOptions::default(),
    )
    .unwrap();
    session.run_to_end().unwrap();
    let events_before = session.vm().event_log().len();
    assert!(session.rewind(1));
    // Rewind emits a state change but removes nothing.
    assert!(session.vm().event_log().len() >= events_before);
}
