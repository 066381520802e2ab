//! Both surface syntaxes must be interchangeable: semantically
//! equivalent programs compile to bytecode with identical behavior on
//! any world.

use autodrone::prelude::*;
use autodrone_test_utils::{crystal_corridor, open_corridor};

/// Run both programs on fresh copies of the same level and assert the
/// observable outcomes match: drone pose, energy, inventory, stats,
/// status, and the action event sequence.
fn assert_agree(level: Level, block_source: &str, brace_source: &str) {
    let mut block = Session::new(
        level.clone(),
        SyntaxFamily::Block,
        block_source,
        VmOptions::default(),
    )
    .unwrap();
    let mut brace = Session::new(
        level,
        SyntaxFamily::Brace,
        brace_source,
        VmOptions::default(),
    )
    .unwrap();
    block.run_to_end().unwrap();
    brace.run_to_end().unwrap();

    let (bw, cw) = (block.world(), brace.world());
    assert_eq!(bw.drone().pos, cw.drone().pos);
    assert_eq!(bw.drone().facing, cw.drone().facing);
    assert_eq!(bw.drone().energy, cw.drone().energy);
    assert_eq!(bw.inventory(), cw.inventory());
    assert_eq!(bw.stats(), cw.stats());
    assert_eq!(bw.status(), cw.status());

    let actions = |session: &Session| -> Vec<ActionKind> {
        session
            .vm()
            .event_log()
            .iter()
            .filter_map(|e| match &e.payload {
                autodrone::vm::EventPayload::Action { action } => Some(action.kind),
                _ => None,
            })
            .collect()
    };
    assert_eq!(actions(&block), actions(&brace));
}

#[test]
fn counted_loops_agree() {
    assert_agree(
        crystal_corridor(),
        "LOOP 3: MOVE forward END",
        "for (int i = 0; i < 3; i++) { move_forward(); }",
    );
}

#[test]
fn straight_line_actions_agree() {
    assert_agree(
        crystal_corridor(),
        "move forward\nturn left\nturn right\nmove forward\ncollect\nwait 2",
        "move_forward(); turn_left(); turn_right(); move_forward(); collect(); wait(2);",
    );
}

#[test]
fn conditional_scan_agrees() {
    assert_agree(
        crystal_corridor(),
        concat!(
            "move forward\n",
            "if scan() == \"crystal\":\n",
            "  move forward\n",
            "  collect\n",
            "else:\n",
            "  turn left\n",
            "end\n",
        ),
        concat!(
            "move_forward();\n",
            "if (scan() == \"crystal\") {\n",
            "  move_forward();\n",
            "  collect();\n",
            "} else {\n",
            "  turn_left();\n",
            "}\n",
        ),
    );
}

#[test]
fn while_loops_agree() {
    assert_agree(
        open_corridor(10),
        "while energy > 90:\n  move forward\nend",
        "while (energy > 90) { move_forward(); }",
    );
}

#[test]
fn elif_chains_agree() {
    assert_agree(
        crystal_corridor(),
        concat!(
            "if energy > 150:\n",
            "  collect\n",
            "elif energy > 50:\n",
            "  move forward\n",
            "else:\n",
            "  wait 3\n",
            "end\n",
        ),
        concat!(
            "if (energy > 150) {\n",
            "  collect();\n",
            "} else if (energy > 50) {\n",
            "  move_forward();\n",
            "} else {\n",
            "  wait(3);\n",
            "}\n",
        ),
    );
}

#[test]
fn logical_operators_agree() {
    assert_agree(
        open_corridor(5),
        "if energy >= 100 and not energy < 50:\n  move forward\nend",
        "if (energy >= 100 && !(energy < 50)) { move_forward(); }",
    );
}

#[test]
fn member_access_agrees() {
    assert_agree(
        crystal_corridor(),
        "move forward\nmove forward\ncollect\nif inventory.crystal >= 1:\n  wait 1\nend",
        "move_forward(); move_forward(); collect(); if (inventory.crystal >= 1) { wait(1); }",
    );
}

#[test]
fn log_values_agree() {
    let level = crystal_corridor();
    let run = |family, source: &str| -> Vec<Value> {
        let mut session =
            Session::new(level.clone(), family, source, VmOptions::default()).unwrap();
        session.run_to_end().unwrap();
        session
            .vm()
            .event_log()
            .iter()
            .filter_map(|e| match &e.payload {
                autodrone::vm::EventPayload::Log { value } => Some(value.clone()),
                _ => None,
            })
            .collect()
    };
    let block = run(
        SyntaxFamily::Block,
        "log energy + 1 - 2\nlog facing\nlog inventory.crystal",
    );
    let brace = run(
        SyntaxFamily::Brace,
        "log((energy + 1) - 2); log(facing); log(inventory.crystal);",
    );
    assert_eq!(block, brace);
}
