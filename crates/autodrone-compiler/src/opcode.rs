//! The instruction set.

use std::fmt;

use autodrone_core::{RelDir, TurnDir, Value};

/// One VM instruction: an opcode plus its originating source line
/// (0 when the source position is unknown).
#[derive(Clone, Debug, PartialEq)]
pub struct Instruction {
    /// The operation.
    pub op: Op,
    /// 1-based source line, 0 if unmapped.
    pub line: u32,
}

impl Instruction {
    /// Construct an instruction.
    pub fn new(op: Op, line: u32) -> Instruction {
        Instruction { op, line }
    }
}

/// The closed opcode set.
///
/// Action opcodes (`Move`, `Turn`, `Collect`, `Wait`) suspend the VM
/// and hand an action descriptor to the driver; everything else
/// manipulates the operand stack and instruction pointer in place.
#[derive(Clone, Debug, PartialEq)]
pub enum Op {
    /// Yield a move action.
    Move(RelDir),
    /// Yield a turn action.
    Turn(TurnDir),
    /// Yield a collect action.
    Collect,
    /// Yield a wait action for `n` ticks.
    Wait(u32),
    /// Pop a value and emit it as a LOG event.
    Log,
    /// Push a constant.
    Push(Value),
    /// Pop and discard.
    Pop,
    /// Push a read-only name's current value.
    Load(String),
    /// Call a built-in function with `argc` stacked arguments.
    Call {
        /// The function name, matched case-insensitively.
        name: String,
        /// How many arguments to pop.
        argc: usize,
    },
    /// Pop a record and push one of its fields.
    Member(String),
    /// Pop two, push their sum.
    Add,
    /// Pop two, push their difference.
    Sub,
    /// Pop two, push equality.
    Eq,
    /// Pop two, push inequality.
    Neq,
    /// Pop two, push less-than.
    Lt,
    /// Pop two, push greater-than.
    Gt,
    /// Pop two, push less-or-equal.
    Lte,
    /// Pop two, push greater-or-equal.
    Gte,
    /// Pop two, push logical and (by truthiness).
    And,
    /// Pop two, push logical or (by truthiness).
    Or,
    /// Pop one, push its negated truthiness.
    Not,
    /// Jump unconditionally.
    Jump(usize),
    /// Pop; jump when falsy.
    JumpIfFalse(usize),
    /// Pop; jump when truthy.
    JumpIfTrue(usize),
    /// Stop execution.
    Halt,
    /// Do nothing.
    Nop,
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Op::Move(dir) => write!(f, "MOVE {dir}"),
            Op::Turn(dir) => write!(f, "TURN {dir}"),
            Op::Collect => f.write_str("COLLECT"),
            Op::Wait(n) => write!(f, "WAIT {n}"),
            Op::Log => f.write_str("LOG"),
            Op::Push(v) => write!(f, "PUSH {v}"),
            Op::Pop => f.write_str("POP"),
            Op::Load(name) => write!(f, "LOAD {name}"),
            Op::Call { name, argc } => write!(f, "CALL {name}/{argc}"),
            Op::Member(prop) => write!(f, "MEMBER {prop}"),
            Op::Add => f.write_str("ADD"),
            Op::Sub => f.write_str("SUB"),
            Op::Eq => f.write_str("EQ"),
            Op::Neq => f.write_str("NEQ"),
            Op::Lt => f.write_str("LT"),
            Op::Gt => f.write_str("GT"),
            Op::Lte => f.write_str("LTE"),
            Op::Gte => f.write_str("GTE"),
            Op::And => f.write_str("AND"),
            Op::Or => f.write_str("OR"),
            Op::Not => f.write_str("NOT"),
            Op::Jump(addr) => write!(f, "JUMP {addr}"),
            Op::JumpIfFalse(addr) => write!(f, "JUMP_IF_FALSE {addr}"),
            Op::JumpIfTrue(addr) => write!(f, "JUMP_IF_TRUE {addr}"),
            Op::Halt => f.write_str("HALT"),
            Op::Nop => f.write_str("NOP"),
        }
    }
}
