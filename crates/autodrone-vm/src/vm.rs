//! The virtual machine.

use std::fmt;

use indexmap::IndexMap;
use log::{debug, warn};
use smallvec::SmallVec;

use autodrone_core::{
    Action, ActionKind, ActionReceipt, RuntimeError, ScanDir, Value,
};
use autodrone_compiler::{Bytecode, Op};
use autodrone_world::World;
use crossbeam_channel::Receiver;

use crate::bus::{EventBus, Subscriber};
use crate::event::{Event, EventKind, EventPayload};
use crate::history::{HistoryRing, VmSnapshot};
use crate::options::{VmConfigError, VmOptions};

/// The VM's execution state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExecState {
    /// Loaded, not yet started.
    Ready,
    /// Ticks advance instructions.
    Running,
    /// Suspended by the driver; ticks still advance when requested.
    Paused,
    /// Finished normally or stopped.
    Halted,
    /// Stopped by a runtime error.
    Error,
}

impl fmt::Display for ExecState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExecState::Ready => "ready",
            ExecState::Running => "running",
            ExecState::Paused => "paused",
            ExecState::Halted => "halted",
            ExecState::Error => "error",
        };
        f.write_str(name)
    }
}

/// A runtime error annotated with its source line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VmError {
    /// The underlying error.
    pub kind: RuntimeError,
    /// 1-based faulting source line, 0 if unmapped.
    pub line: u32,
}

impl fmt::Display for VmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.line > 0 {
            write!(f, "line {}: {}", self.line, self.kind)
        } else {
            write!(f, "{}", self.kind)
        }
    }
}

impl std::error::Error for VmError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}

/// The stepwise bytecode interpreter.
///
/// One [`tick`](Vm::tick) executes one instruction. Action opcodes
/// yield an [`Action`] for the driver instead of touching the world;
/// the world reference passed to `tick` is only read (name lookups) or
/// scanned. A full VM+world snapshot is captured before every tick and
/// kept in a bounded history for [`rewind`](Vm::rewind).
#[derive(Debug)]
pub struct Vm {
    code: Bytecode,
    options: VmOptions,
    ip: usize,
    stack: Vec<Value>,
    instruction_count: u32,
    state: ExecState,
    history: HistoryRing,
    event_log: Vec<Event>,
    bus: EventBus,
    backjump_counts: IndexMap<usize, u32>,
}

impl Vm {
    /// Load a program with the given budgets.
    pub fn new(code: Bytecode, options: VmOptions) -> Result<Vm, VmConfigError> {
        options.validate()?;
        Ok(Vm {
            code,
            options,
            ip: 0,
            stack: Vec::new(),
            instruction_count: 0,
            state: ExecState::Ready,
            history: HistoryRing::new(options.history_capacity),
            event_log: Vec::new(),
            bus: EventBus::new(),
            backjump_counts: IndexMap::new(),
        })
    }

    // ── State and introspection ─────────────────────────────────

    /// Current execution state.
    pub fn state(&self) -> ExecState {
        self.state
    }

    /// The instruction pointer.
    pub fn ip(&self) -> usize {
        self.ip
    }

    /// Instructions executed so far.
    pub fn instruction_count(&self) -> u32 {
        self.instruction_count
    }

    /// The operand stack, bottom first.
    pub fn stack(&self) -> &[Value] {
        &self.stack
    }

    /// The loaded program.
    pub fn code(&self) -> &Bytecode {
        &self.code
    }

    /// The configured budgets.
    pub fn options(&self) -> &VmOptions {
        &self.options
    }

    /// All events emitted so far, in emission order.
    pub fn event_log(&self) -> &[Event] {
        &self.event_log
    }

    /// Snapshots available for rewind.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// The source line of the next instruction, for editor
    /// highlighting. 0 when unmapped or past the end.
    pub fn current_line(&self) -> u32 {
        self.code.line_for(self.ip)
    }

    /// Register an event callback for one event kind.
    pub fn subscribe(&mut self, kind: EventKind, subscriber: Subscriber) {
        self.bus.subscribe(kind, subscriber);
    }

    /// Attach a channel that receives every event, for consumption on
    /// another thread.
    pub fn attach_channel(&mut self) -> Receiver<Event> {
        self.bus.attach_channel()
    }

    // ── Lifecycle ───────────────────────────────────────────────

    /// Start or resume execution. A finished or errored VM is reset
    /// first, so `run()` always leaves the VM running from a
    /// consistent state.
    pub fn run(&mut self) {
        if matches!(self.state, ExecState::Halted | ExecState::Error) {
            self.reset();
        }
        self.set_state(ExecState::Running);
    }

    /// Suspend execution. Ticks requested while paused still advance;
    /// pausing is a signal to the driver's pacing loop.
    pub fn pause(&mut self) {
        if self.state == ExecState::Running {
            self.set_state(ExecState::Paused);
        }
    }

    /// Cancel execution. Observed at the next tick boundary.
    pub fn stop(&mut self) {
        self.set_state(ExecState::Halted);
    }

    /// Return to [`ExecState::Ready`], discarding the stack, counters,
    /// history and event log. Subscribers stay registered. Emits no
    /// event — the log it would land in is being discarded.
    pub fn reset(&mut self) {
        self.ip = 0;
        self.stack.clear();
        self.instruction_count = 0;
        self.history.clear();
        self.event_log.clear();
        self.backjump_counts.clear();
        self.state = ExecState::Ready;
    }

    // ── Execution ───────────────────────────────────────────────

    /// Execute exactly one instruction.
    ///
    /// Returns an action descriptor when an action opcode executed,
    /// `None` otherwise (including when the VM is not in a runnable
    /// state). Errors move the VM to [`ExecState::Error`], emit an
    /// ERROR event carrying the source-mapped line, and propagate.
    pub fn tick(&mut self, world: &mut World) -> Result<Option<Action>, VmError> {
        if !matches!(self.state, ExecState::Running | ExecState::Paused) {
            return Ok(None);
        }

        if self.instruction_count >= self.options.max_instructions {
            return Err(self.fault(
                RuntimeError::InstructionLimit {
                    limit: self.options.max_instructions,
                },
                self.current_line(),
            ));
        }

        if self.ip >= self.code.len() {
            self.set_state(ExecState::Halted);
            return Ok(None);
        }

        // Atomic pre-tick snapshot of VM and world.
        self.history.push(VmSnapshot {
            ip: self.ip,
            stack: self.stack.clone(),
            instruction_count: self.instruction_count,
            backjump_counts: self.backjump_counts.clone(),
            world: world.snapshot(),
        });

        self.instruction_count += 1;
        let line = self.code.line_for(self.ip);
        let op = self.code.instructions[self.ip].op.clone();
        match self.dispatch(op, line, world) {
            Ok(action) => {
                if let Some(action) = action {
                    self.emit(EventPayload::Action { action });
                }
                Ok(action)
            }
            Err(kind) => Err(self.fault(kind, line)),
        }
    }

    fn dispatch(
        &mut self,
        op: Op,
        line: u32,
        world: &mut World,
    ) -> Result<Option<Action>, RuntimeError> {
        match op {
            Op::Move(dir) => {
                self.ip += 1;
                return Ok(Some(Action {
                    kind: ActionKind::Move(dir),
                    line,
                }));
            }
            Op::Turn(dir) => {
                self.ip += 1;
                return Ok(Some(Action {
                    kind: ActionKind::Turn(dir),
                    line,
                }));
            }
            Op::Collect => {
                self.ip += 1;
                return Ok(Some(Action {
                    kind: ActionKind::Collect,
                    line,
                }));
            }
            Op::Wait(n) => {
                self.ip += 1;
                return Ok(Some(Action {
                    kind: ActionKind::Wait(n),
                    line,
                }));
            }
            Op::Log => {
                let value = self.pop()?;
                self.emit(EventPayload::Log { value });
                self.ip += 1;
            }
            Op::Push(value) => {
                self.stack.push(value);
                self.ip += 1;
            }
            Op::Pop => {
                self.pop()?;
                self.ip += 1;
            }
            Op::Load(name) => {
                let value = self.load(&name, world)?;
                self.stack.push(value);
                self.ip += 1;
            }
            Op::Call { name, argc } => {
                let value = self.call(&name, argc, world)?;
                self.stack.push(value);
                self.ip += 1;
            }
            Op::Member(property) => {
                let object = self.pop()?;
                match object.field(&property) {
                    Some(value) => self.stack.push(Value::Number(value)),
                    None => {
                        return Err(RuntimeError::BadMember { property });
                    }
                }
                self.ip += 1;
            }
            Op::Add => self.binary(|l, r| Value::Number(l.as_number() + r.as_number()))?,
            Op::Sub => self.binary(|l, r| Value::Number(l.as_number() - r.as_number()))?,
            Op::Eq => self.binary(|l, r| Value::Bool(l.loose_eq(&r)))?,
            Op::Neq => self.binary(|l, r| Value::Bool(!l.loose_eq(&r)))?,
            Op::Lt => self.binary(|l, r| Value::Bool(l.as_number() < r.as_number()))?,
            Op::Gt => self.binary(|l, r| Value::Bool(l.as_number() > r.as_number()))?,
            Op::Lte => self.binary(|l, r| Value::Bool(l.as_number() <= r.as_number()))?,
            Op::Gte => self.binary(|l, r| Value::Bool(l.as_number() >= r.as_number()))?,
            Op::And => self.binary(|l, r| Value::Bool(l.is_truthy() && r.is_truthy()))?,
            Op::Or => self.binary(|l, r| Value::Bool(l.is_truthy() || r.is_truthy()))?,
            Op::Not => {
                let value = self.pop()?;
                self.stack.push(Value::Bool(!value.is_truthy()));
                self.ip += 1;
            }
            Op::Jump(addr) => {
                self.take_jump(addr)?;
            }
            Op::JumpIfFalse(addr) => {
                let value = self.pop()?;
                if value.is_truthy() {
                    self.ip += 1;
                } else {
                    self.take_jump(addr)?;
                }
            }
            Op::JumpIfTrue(addr) => {
                let value = self.pop()?;
                if value.is_truthy() {
                    self.take_jump(addr)?;
                } else {
                    self.ip += 1;
                }
            }
            Op::Halt => {
                self.set_state(ExecState::Halted);
                self.ip += 1;
            }
            Op::Nop => {
                self.ip += 1;
            }
        }
        Ok(None)
    }

    /// Jump, charging backward jumps against the per-site loop budget.
    fn take_jump(&mut self, addr: usize) -> Result<(), RuntimeError> {
        if addr <= self.ip {
            let count = self.backjump_counts.entry(self.ip).or_insert(0);
            *count += 1;
            if *count > self.options.max_loop_iterations {
                return Err(RuntimeError::InstructionLimit {
                    limit: self.options.max_loop_iterations,
                });
            }
        }
        self.ip = addr;
        Ok(())
    }

    fn pop(&mut self) -> Result<Value, RuntimeError> {
        self.stack.pop().ok_or(RuntimeError::StackUnderflow)
    }

    /// Pop right then left, apply, push.
    fn binary(&mut self, apply: impl FnOnce(Value, Value) -> Value) -> Result<(), RuntimeError> {
        let right = self.pop()?;
        let left = self.pop()?;
        self.stack.push(apply(left, right));
        self.ip += 1;
        Ok(())
    }

    /// Resolve a read-only name: the boolean literals, then the
    /// world's variable table.
    fn load(&self, name: &str, world: &World) -> Result<Value, RuntimeError> {
        let lower = name.to_lowercase();
        match lower.as_str() {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            _ => world
                .lookup(&lower)
                .ok_or_else(|| RuntimeError::UnknownIdentifier {
                    name: name.to_string(),
                }),
        }
    }

    /// Dispatch a built-in function call. Arguments are popped into
    /// source order; the sensor functions take none and ignore extras.
    fn call(&mut self, name: &str, argc: usize, world: &mut World) -> Result<Value, RuntimeError> {
        let mut args: SmallVec<[Value; 4]> = SmallVec::new();
        for _ in 0..argc {
            args.push(self.pop()?);
        }
        args.reverse();

        let dir = match name.to_lowercase().as_str() {
            "scan" => ScanDir::Forward,
            "scan_left" => ScanDir::Left,
            "scan_right" => ScanDir::Right,
            _ => {
                return Err(RuntimeError::UnknownFunction {
                    name: name.to_string(),
                });
            }
        };
        let outcome = world.scan(dir);
        debug!("scan {name} -> {}", outcome.name());
        Ok(Value::from(outcome.name()))
    }

    // ── Rewind ──────────────────────────────────────────────────

    /// Undo the last `n` ticks: restore the snapshot captured before
    /// tick `count - n + 1`, truncate newer history, overwrite the
    /// world, and leave the VM paused. `false` when the history does
    /// not reach back that far.
    ///
    /// The event log is preserved; rewinding is an execution-state
    /// operation, not a log edit.
    pub fn rewind(&mut self, world: &mut World, n: usize) -> bool {
        let Some(snap) = self.history.rewind(n) else {
            return false;
        };
        self.ip = snap.ip;
        self.stack = snap.stack;
        self.instruction_count = snap.instruction_count;
        self.backjump_counts = snap.backjump_counts;
        world.restore(&snap.world);
        self.set_state(ExecState::Paused);
        true
    }

    // ── Driver support ──────────────────────────────────────────

    /// Record the simulator's receipt for an applied action. Failures
    /// become WARNING events; execution continues.
    pub fn report_receipt(&mut self, receipt: &ActionReceipt, line: u32) {
        if receipt.ok {
            return;
        }
        let message = match &receipt.reason {
            Some(reason) => reason.to_string(),
            None => "action ignored".to_string(),
        };
        warn!("line {line}: {message}");
        self.emit(EventPayload::Warning { message, line });
    }

    // ── Internals ───────────────────────────────────────────────

    fn set_state(&mut self, to: ExecState) {
        if self.state == to {
            return;
        }
        let from = self.state;
        self.state = to;
        debug!("vm state {from} -> {to}");
        self.emit(EventPayload::StateChange { from, to });
    }

    /// Enter the error state and emit the ERROR event. The state is
    /// assigned directly so the ERROR event is the last log entry.
    fn fault(&mut self, kind: RuntimeError, line: u32) -> VmError {
        self.state = ExecState::Error;
        self.emit(EventPayload::Error {
            message: kind.to_string(),
            line,
            hint: kind.hint(),
        });
        VmError { kind, line }
    }

    fn emit(&mut self, payload: EventPayload) {
        let event = Event::now(payload, self.instruction_count);
        self.bus.emit(&event);
        self.event_log.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use autodrone_core::{Facing, Pos};
    use autodrone_syntax::{lex, parse, SyntaxFamily};
    use autodrone_world::{Level, Objective, Status, World};

    fn corridor_level() -> Level {
        use autodrone_core::{Resource, TileKind};
        let w = TileKind::Wall;
        let e = TileKind::Empty;
        let c = TileKind::Crystal;
        Level {
            id: 1,
            name: "corridor".into(),
            description: String::new(),
            lesson: String::new(),
            width: 5,
            height: 3,
            grid: vec![
                vec![w, w, w, w, w],
                vec![w, e, e, c, w],
                vec![w, w, w, w, w],
            ],
            start_x: 1,
            start_y: 1,
            start_facing: Facing::East,
            start_energy: 100,
            max_energy: 100,
            fog_of_war: false,
            scan_radius: 1,
            objectives: vec![Objective::Collect {
                resource: Resource::Crystal,
                count: 1,
            }],
            optimal_energy: 7,
            optimal_steps: 3,
            time_limit: 20,
            hints: vec![],
            sample_solution: String::new(),
        }
    }

    fn load(source: &str) -> (Vm, World) {
        let parsed = parse(SyntaxFamily::Block, lex(SyntaxFamily::Block, source).unwrap()).unwrap();
        let code = autodrone_compiler::compile(&parsed.program).unwrap();
        let vm = Vm::new(code, VmOptions::default()).unwrap();
        let world = World::new(&corridor_level()).unwrap();
        (vm, world)
    }

    /// Drive to completion, applying actions like the real driver.
    fn run_to_end(vm: &mut Vm, world: &mut World) -> Result<(), VmError> {
        vm.run();
        loop {
            match vm.tick(world)? {
                Some(action) => {
                    let receipt = world.apply(action.kind);
                    vm.report_receipt(&receipt, action.line);
                    if world.status() != Status::Playing {
                        vm.stop();
                    }
                }
                None => {
                    if !matches!(vm.state(), ExecState::Running | ExecState::Paused) {
                        return Ok(());
                    }
                }
            }
        }
    }

    #[test]
    fn test_tick_outside_run_is_inert() {
        let (mut vm, mut world) = load("move forward");
        assert_eq!(vm.tick(&mut world).unwrap(), None);
        assert_eq!(vm.state(), ExecState::Ready);
        assert_eq!(vm.instruction_count(), 0);
    }

    #[test]
    fn test_action_opcode_yields_descriptor() {
        let (mut vm, mut world) = load("move forward");
        vm.run();
        let action = vm.tick(&mut world).unwrap().unwrap();
        assert_eq!(
            action.kind,
            ActionKind::Move(autodrone_core::RelDir::Forward)
        );
        assert_eq!(action.line, 1);
        // The VM did not touch the world.
        assert_eq!(world.drone().pos, Pos::new(1, 1));
        // The yield was logged as an ACTION event.
        assert!(matches!(
            vm.event_log().last().unwrap().payload,
            EventPayload::Action { .. }
        ));
    }

    #[test]
    fn test_halt_transitions_and_logs() {
        let (mut vm, mut world) = load("");
        vm.run();
        assert_eq!(vm.tick(&mut world).unwrap(), None);
        assert_eq!(vm.state(), ExecState::Halted);
        assert!(matches!(
            vm.event_log().last().unwrap().payload,
            EventPayload::StateChange {
                to: ExecState::Halted,
                ..
            }
        ));
    }

    #[test]
    fn test_log_event_carries_value() {
        let (mut vm, mut world) = load("log energy + 1");
        vm.run();
        while vm.state() == ExecState::Running {
            vm.tick(&mut world).unwrap();
        }
        let logged: Vec<&Value> = vm
            .event_log()
            .iter()
            .filter_map(|e| match &e.payload {
                EventPayload::Log { value } => Some(value),
                _ => None,
            })
            .collect();
        assert_eq!(logged, vec![&Value::Number(101.0)]);
    }

    #[test]
    fn test_unknown_identifier_faults_with_line() {
        let (mut vm, mut world) = load("log energy\nlog speed");
        vm.run();
        let err = loop {
            match vm.tick(&mut world) {
                Ok(_) => {}
                Err(err) => break err,
            }
        };
        assert_eq!(
            err.kind,
            RuntimeError::UnknownIdentifier {
                name: "speed".into()
            }
        );
        assert_eq!(err.line, 2);
        assert_eq!(vm.state(), ExecState::Error);
        assert!(matches!(
            vm.event_log().last().unwrap().payload,
            EventPayload::Error { line: 2, .. }
        ));
    }

    #[test]
    fn test_member_access() {
        let (mut vm, mut world) = load("log inventory.crystal");
        vm.run();
        while vm.state() == ExecState::Running {
            vm.tick(&mut world).unwrap();
        }
        assert!(vm
            .event_log()
            .iter()
            .any(|e| e.payload == EventPayload::Log {
                value: Value::Number(0.0)
            }));
    }

    #[test]
    fn test_bad_member_faults() {
        let (mut vm, mut world) = load("log inventory.fuel");
        vm.run();
        let err = loop {
            match vm.tick(&mut world) {
                Ok(_) => {}
                Err(err) => break err,
            }
        };
        assert_eq!(
            err.kind,
            RuntimeError::BadMember {
                property: "fuel".into()
            }
        );
    }

    #[test]
    fn test_scan_call_reads_world() {
        let (mut vm, mut world) = load("move forward\nlog scan()");
        run_to_end(&mut vm, &mut world).unwrap();
        assert!(vm
            .event_log()
            .iter()
            .any(|e| e.payload == EventPayload::Log {
                value: Value::from("crystal")
            }));
    }

    #[test]
    fn test_instruction_limit() {
        let (mut vm, mut world) = load("while true:\nwait 0\nend");
        let mut options = VmOptions::default();
        // A generous loop budget so the instruction budget fires first.
        options.max_loop_iterations = 100_000;
        let mut vm2 = Vm::new(vm.code().clone(), options).unwrap();
        std::mem::swap(&mut vm, &mut vm2);
        vm.run();
        let err = loop {
            match vm.tick(&mut world) {
                Ok(_) => {}
                Err(err) => break err,
            }
        };
        assert_eq!(err.kind, RuntimeError::InstructionLimit { limit: 10_000 });
        assert_eq!(vm.instruction_count(), 10_000);
        assert_eq!(vm.state(), ExecState::Error);
        assert!(matches!(
            vm.event_log().last().unwrap().payload,
            EventPayload::Error { .. }
        ));
    }

    #[test]
    fn test_loop_budget_catches_runaway_while() {
        let (mut vm, mut world) = load("while true:\nwait 0\nend");
        vm.run();
        let err = loop {
            match vm.tick(&mut world) {
                Ok(_) => {}
                Err(err) => break err,
            }
        };
        assert_eq!(err.kind, RuntimeError::InstructionLimit { limit: 1_000 });
    }

    #[test]
    fn test_stop_observed_at_tick_boundary() {
        let (mut vm, mut world) = load("move forward\nmove forward");
        vm.run();
        vm.tick(&mut world).unwrap();
        vm.stop();
        assert_eq!(vm.tick(&mut world).unwrap(), None);
        assert_eq!(vm.instruction_count(), 1);
    }

    #[test]
    fn test_run_after_halt_resets() {
        let (mut vm, mut world) = load("collect");
        run_to_end(&mut vm, &mut world).unwrap();
        let logged_events = vm.event_log().len();
        assert!(logged_events > 0);
        vm.run();
        assert_eq!(vm.state(), ExecState::Running);
        assert_eq!(vm.instruction_count(), 0);
        assert_eq!(vm.ip(), 0);
    }

    #[test]
    fn test_rewind_one_undoes_last_tick() {
        let (mut vm, mut world) = load("move forward\nmove forward");
        vm.run();
        for _ in 0..2 {
            if let Some(action) = vm.tick(&mut world).unwrap() {
                world.apply(action.kind);
            }
        }
        assert_eq!(world.drone().pos, Pos::new(3, 1));
        assert!(vm.rewind(&mut world, 1));
        assert_eq!(vm.state(), ExecState::Paused);
        assert_eq!(world.drone().pos, Pos::new(2, 1));
        assert_eq!(vm.ip(), 1);
        assert_eq!(vm.instruction_count(), 1);
    }

    #[test]
    fn test_rewind_all_returns_to_start() {
        let (mut vm, mut world) = load("move forward\nmove forward\ncollect");
        let initial = world.snapshot();
        vm.run();
        let mut ticks = 0;
        loop {
            match vm.tick(&mut world).unwrap() {
                Some(action) => {
                    world.apply(action.kind);
                    ticks += 1;
                }
                None => break,
            }
            if vm.state() == ExecState::Halted {
                break;
            }
        }
        // Undo every executed tick (actions plus the final HALT).
        let executed = vm.instruction_count() as usize;
        assert!(executed >= ticks);
        assert!(vm.rewind(&mut world, executed));
        assert_eq!(world.snapshot(), initial);
        assert_eq!(vm.ip(), 0);
        assert_eq!(vm.instruction_count(), 0);
        assert_eq!(vm.stack(), &[] as &[Value]);
    }

    #[test]
    fn test_rewind_past_history_fails() {
        let (mut vm, mut world) = load("move forward");
        vm.run();
        vm.tick(&mut world).unwrap();
        assert!(!vm.rewind(&mut world, 5));
        assert_eq!(vm.state(), ExecState::Running);
    }

    #[test]
    fn test_failed_action_receipt_becomes_warning() {
        let (mut vm, mut world) = load("turn left\nmove forward");
        run_to_end(&mut vm, &mut world).unwrap();
        // Facing north after the turn, the move hits the wall.
        let warnings: Vec<&Event> = vm
            .event_log()
            .iter()
            .filter(|e| e.kind() == EventKind::Warning)
            .collect();
        assert_eq!(warnings.len(), 1);
        assert!(matches!(
            &warnings[0].payload,
            EventPayload::Warning { line: 2, .. }
        ));
        // A failed action is not an error; the run finished normally.
        assert_eq!(vm.state(), ExecState::Halted);
    }

    #[test]
    fn test_current_line_tracks_ip() {
        let (mut vm, mut world) = load("move forward\nturn left");
        assert_eq!(vm.current_line(), 1);
        vm.run();
        vm.tick(&mut world).unwrap();
        assert_eq!(vm.current_line(), 2);
    }

    #[test]
    fn test_event_order_matches_execution_order() {
        let (mut vm, mut world) = load("log 1\nmove forward\nlog 2");
        run_to_end(&mut vm, &mut world).unwrap();
        let kinds: Vec<EventKind> = vm.event_log().iter().map(Event::kind).collect();
        // run() StateChange, LOG 1, ACTION, LOG 2, HALT StateChange.
        assert_eq!(
            kinds,
            vec![
                EventKind::StateChange,
                EventKind::Log,
                EventKind::Action,
                EventKind::Log,
                EventKind::StateChange,
            ]
        );
    }

    #[test]
    fn test_comparisons_and_logic() {
        let (mut vm, mut world) =
            load("log 2 < 3 and not (2 == 3)\nlog \"a\" == \"a\"\nlog 1 or 0");
        vm.run();
        while vm.state() == ExecState::Running {
            vm.tick(&mut world).unwrap();
        }
        let logged: Vec<&Value> = vm
            .event_log()
            .iter()
            .filter_map(|e| match &e.payload {
                EventPayload::Log { value } => Some(value),
                _ => None,
            })
            .collect();
        assert_eq!(
            logged,
            vec![&Value::Bool(true), &Value::Bool(true), &Value::Bool(true)]
        );
    }

    #[test]
    fn test_subscriber_sees_events() {
        use std::sync::{Arc, Mutex};
        let (mut vm, mut world) = load("log 7");
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        vm.subscribe(
            EventKind::Log,
            Box::new(move |e| sink.lock().unwrap().push(e.clone())),
        );
        vm.run();
        while vm.state() == ExecState::Running {
            vm.tick(&mut world).unwrap();
        }
        assert_eq!(seen.lock().unwrap().len(), 1);
    }
}
