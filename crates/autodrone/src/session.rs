//! The driver: a paced tick loop over one VM and one world.
//!
//! A [`Session`] owns both sides of the tick protocol. Each
//! [`step`](Session::step) advances the VM one instruction; when the VM
//! yields an action descriptor the session applies it to the world,
//! reports the receipt back, and stops the VM once the world leaves its
//! playing state. The surrounding shell paces `step()` calls with its
//! own timer — the session has no clock.

use std::error::Error;
use std::fmt;

use autodrone_analysis::{analyze, RunReport};
use autodrone_core::{Action, ActionReceipt};
use autodrone_syntax::{ParseWarning, SyntaxFamily};
use autodrone_vm::{ExecState, Vm, VmConfigError, VmError, VmOptions};
use autodrone_world::{Level, LevelError, Status, World};

use crate::pipeline::{compile_source, FrontendError};

/// What one driver step did.
#[derive(Clone, Debug, PartialEq)]
pub struct StepResult {
    /// The action the VM yielded this tick, if any.
    pub action: Option<Action>,
    /// The simulator's receipt for that action.
    pub receipt: Option<ActionReceipt>,
    /// The VM state after the step.
    pub state: ExecState,
}

/// Anything that can keep a session from being built.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionError {
    /// The level failed validation.
    Level(LevelError),
    /// The script failed to lex, parse or compile.
    Frontend(FrontendError),
    /// The VM budgets were unusable.
    Config(VmConfigError),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::Level(e) => write!(f, "{e}"),
            SessionError::Frontend(e) => write!(f, "{e}"),
            SessionError::Config(e) => write!(f, "{e}"),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SessionError::Level(e) => Some(e),
            SessionError::Frontend(e) => Some(e),
            SessionError::Config(e) => Some(e),
        }
    }
}

impl From<LevelError> for SessionError {
    fn from(e: LevelError) -> SessionError {
        SessionError::Level(e)
    }
}

impl From<FrontendError> for SessionError {
    fn from(e: FrontendError) -> SessionError {
        SessionError::Frontend(e)
    }
}

impl From<VmConfigError> for SessionError {
    fn from(e: VmConfigError) -> SessionError {
        SessionError::Config(e)
    }
}

/// One scripted run against one level.
#[derive(Debug)]
pub struct Session {
    level: Level,
    world: World,
    vm: Vm,
    warnings: Vec<ParseWarning>,
}

impl Session {
    /// Compile `source` and set up a fresh world for `level`.
    pub fn new(
        level: Level,
        family: SyntaxFamily,
        source: &str,
        options: VmOptions,
    ) -> Result<Session, SessionError> {
        let compiled = compile_source(family, source)?;
        let world = World::new(&level)?;
        let vm = Vm::new(compiled.bytecode, options)?;
        Ok(Session {
            level,
            world,
            vm,
            warnings: compiled.warnings,
        })
    }

    /// The world, for rendering and assertions.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// The VM, for event log access and line highlighting.
    pub fn vm(&self) -> &Vm {
        &self.vm
    }

    /// The VM, mutably — for subscriptions and pacing control.
    pub fn vm_mut(&mut self) -> &mut Vm {
        &mut self.vm
    }

    /// The level this session runs.
    pub fn level(&self) -> &Level {
        &self.level
    }

    /// Parse warnings from compilation, for the editor surface.
    pub fn warnings(&self) -> &[ParseWarning] {
        &self.warnings
    }

    /// Start (or restart) the VM.
    pub fn start(&mut self) {
        self.vm.run();
    }

    /// Advance one tick: execute one instruction, apply any yielded
    /// action to the world, report its receipt, and stop the VM when
    /// the world reaches a terminal status.
    pub fn step(&mut self) -> Result<StepResult, VmError> {
        let action = self.vm.tick(&mut self.world)?;
        let receipt = action.map(|action| {
            let receipt = self.world.apply(action.kind);
            self.vm.report_receipt(&receipt, action.line);
            receipt
        });
        if self.world.status() != Status::Playing {
            self.vm.stop();
        }
        Ok(StepResult {
            action,
            receipt,
            state: self.vm.state(),
        })
    }

    /// Run until the VM halts or errors. Errors are returned after the
    /// VM has logged them.
    pub fn run_to_end(&mut self) -> Result<(), VmError> {
        self.vm.run();
        loop {
            let result = self.step()?;
            if !matches!(result.state, ExecState::Running | ExecState::Paused) {
                return Ok(());
            }
        }
    }

    /// Undo the last `n` ticks across VM and world together.
    pub fn rewind(&mut self, n: usize) -> bool {
        self.vm.rewind(&mut self.world, n)
    }

    /// Throw the run away: fresh world from the level, VM back to
    /// ready. The compiled program and subscriptions are kept.
    pub fn reset(&mut self) -> Result<(), SessionError> {
        self.world.reset(&self.level)?;
        self.vm.reset();
        Ok(())
    }

    /// Grade the (finished) run.
    pub fn report(&self) -> RunReport {
        analyze(&self.world, self.vm.event_log(), &self.level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use autodrone_core::Pos;

    fn corridor_json() -> Level {
        Level::from_json(
            r#"{
                "id": 1, "name": "corridor",
                "width": 5, "height": 3,
                "grid": [
                    ["wall", "wall", "wall", "wall", "wall"],
                    ["wall", "empty", "empty", "crystal", "wall"],
                    ["wall", "wall", "wall", "wall", "wall"]
                ],
                "startX": 1, "startY": 1, "startFacing": "east",
                "startEnergy": 100, "maxEnergy": 100,
                "objectives": [{"type": "collect", "resource": "crystal", "count": 1}],
                "optimalEnergy": 7, "optimalSteps": 3
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_session_wins_corridor() {
        let mut session = Session::new(
            corridor_json(),
            SyntaxFamily::Block,
            "move forward\nmove forward\ncollect\n",
            VmOptions::default(),
        )
        .unwrap();
        session.run_to_end().unwrap();
        assert_eq!(session.world().status(), Status::Won);
        assert_eq!(session.world().drone().pos, Pos::new(3, 1));
        let report = session.report();
        assert_eq!(report.score.completion, 10);
    }

    #[test]
    fn test_session_stops_vm_on_win() {
        let mut session = Session::new(
            corridor_json(),
            SyntaxFamily::Block,
            // Statements after the win never execute.
            "move forward\nmove forward\ncollect\nmove back\nmove back\n",
            VmOptions::default(),
        )
        .unwrap();
        session.run_to_end().unwrap();
        assert_eq!(session.world().status(), Status::Won);
        assert_eq!(session.world().drone().pos, Pos::new(3, 1));
        assert_eq!(session.vm().state(), ExecState::Halted);
    }

    #[test]
    fn test_session_reset_restores_everything() {
        let mut session = Session::new(
            corridor_json(),
            SyntaxFamily::Block,
            "move forward\ncollect\n",
            VmOptions::default(),
        )
        .unwrap();
        session.run_to_end().unwrap();
        session.reset().unwrap();
        assert_eq!(session.world().drone().pos, Pos::new(1, 1));
        assert_eq!(session.world().drone().energy, 100);
        assert_eq!(session.vm().state(), ExecState::Ready);
        assert_eq!(session.vm().event_log().len(), 0);
    }

    #[test]
    fn test_bad_script_fails_construction() {
        let err = Session::new(
            corridor_json(),
            SyntaxFamily::Block,
            "move sideways",
            VmOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, SessionError::Frontend(_)));
    }
}
