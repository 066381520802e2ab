//! The unified abstract tree both syntax families parse into.
//!
//! A strict tree: no parent pointers, no sharing. Every node records
//! the 1-based `line` and `column` of its first token; the compiler
//! threads lines into the bytecode source map.

use autodrone_core::{TurnDir, Value};

/// A movement direction as written in a script.
///
/// Scripts can only move forward or back; sideways movement is done by
/// turning first.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveDir {
    /// `move forward` / `move_forward()`.
    Forward,
    /// `move back` / `move_back()`.
    Back,
}

impl MoveDir {
    /// The heading-relative direction the simulator understands.
    pub fn to_rel(self) -> autodrone_core::RelDir {
        match self {
            MoveDir::Forward => autodrone_core::RelDir::Forward,
            MoveDir::Back => autodrone_core::RelDir::Back,
        }
    }
}

/// A whole script.
#[derive(Clone, Debug, PartialEq)]
pub struct Program {
    /// Top-level statements in source order.
    pub body: Vec<Stmt>,
}

/// A statement sequence inside a block construct.
#[derive(Clone, Debug, PartialEq)]
pub struct Block {
    /// Statements in source order.
    pub statements: Vec<Stmt>,
    /// 1-based line of the block's first token.
    pub line: u32,
    /// 1-based column of the block's first token.
    pub column: u32,
}

/// The `else` arm of an `if`.
#[derive(Clone, Debug, PartialEq)]
pub enum ElseBranch {
    /// A plain `else` block.
    Else(Block),
    /// An `elif` / `else if` chain; always a [`Stmt::If`].
    Elif(Box<Stmt>),
}

/// A statement.
#[derive(Clone, Debug, PartialEq)]
pub enum Stmt {
    /// Move one tile forward or back.
    Move {
        /// The written direction.
        dir: MoveDir,
        /// 1-based source line.
        line: u32,
        /// 1-based source column.
        column: u32,
    },
    /// Rotate the drone 90°.
    Turn {
        /// The written direction.
        dir: TurnDir,
        /// 1-based source line.
        line: u32,
        /// 1-based source column.
        column: u32,
    },
    /// Pick up the resource under the drone.
    Collect {
        /// 1-based source line.
        line: u32,
        /// 1-based source column.
        column: u32,
    },
    /// Idle and recharge for a fixed number of ticks.
    Wait {
        /// Tick count; defaults to 1 when omitted in source.
        ticks: u32,
        /// 1-based source line.
        line: u32,
        /// 1-based source column.
        column: u32,
    },
    /// Evaluate an expression and record it in the event log.
    Log {
        /// The logged expression.
        expr: Expr,
        /// 1-based source line.
        line: u32,
        /// 1-based source column.
        column: u32,
    },
    /// Conditional execution with an optional else/elif chain.
    If {
        /// The condition.
        cond: Expr,
        /// Statements run when the condition is truthy.
        consequent: Block,
        /// The `else` arm, if any.
        alternate: Option<ElseBranch>,
        /// 1-based source line.
        line: u32,
        /// 1-based source column.
        column: u32,
    },
    /// Run a body a fixed number of times.
    Loop {
        /// The repeat count. Signed: the brace family's `for` header
        /// computes it as a difference, which can be negative; a count
        /// of zero or less runs the body zero times.
        count: i64,
        /// The repeated statements.
        body: Block,
        /// 1-based source line.
        line: u32,
        /// 1-based source column.
        column: u32,
    },
    /// Run a body while a condition stays truthy.
    While {
        /// The condition, re-evaluated before each iteration.
        cond: Expr,
        /// The repeated statements.
        body: Block,
        /// 1-based source line.
        line: u32,
        /// 1-based source column.
        column: u32,
    },
}

impl Stmt {
    /// The statement's 1-based source line.
    pub fn line(&self) -> u32 {
        match self {
            Stmt::Move { line, .. }
            | Stmt::Turn { line, .. }
            | Stmt::Collect { line, .. }
            | Stmt::Wait { line, .. }
            | Stmt::Log { line, .. }
            | Stmt::If { line, .. }
            | Stmt::Loop { line, .. }
            | Stmt::While { line, .. } => *line,
        }
    }
}

/// A binary operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinOp {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `==`
    Eq,
    /// `!=`
    Neq,
    /// `<`
    Lt,
    /// `>`
    Gt,
    /// `<=`
    Lte,
    /// `>=`
    Gte,
    /// `and` / `&&`
    And,
    /// `or` / `||`
    Or,
}

/// A unary operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnOp {
    /// `not` / `!`
    Not,
}

/// An expression.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// A number, string or boolean literal.
    Literal {
        /// The literal value.
        value: Value,
        /// 1-based source line.
        line: u32,
        /// 1-based source column.
        column: u32,
    },
    /// A read-only name, resolved by the VM at execution time.
    Identifier {
        /// The name as written.
        name: String,
        /// 1-based source line.
        line: u32,
        /// 1-based source column.
        column: u32,
    },
    /// A binary operation.
    Binary {
        /// The operator.
        op: BinOp,
        /// Left operand.
        left: Box<Expr>,
        /// Right operand.
        right: Box<Expr>,
        /// 1-based source line.
        line: u32,
        /// 1-based source column.
        column: u32,
    },
    /// A unary operation.
    Unary {
        /// The operator.
        op: UnOp,
        /// The operand.
        operand: Box<Expr>,
        /// 1-based source line.
        line: u32,
        /// 1-based source column.
        column: u32,
    },
    /// A call. The parser only produces identifier callees; the
    /// compiler rejects anything else as an internal error.
    Call {
        /// The called expression.
        callee: Box<Expr>,
        /// Arguments in source order.
        arguments: Vec<Expr>,
        /// 1-based source line.
        line: u32,
        /// 1-based source column.
        column: u32,
    },
    /// Field projection, `object.property`.
    Member {
        /// The projected expression.
        object: Box<Expr>,
        /// The field name.
        property: String,
        /// 1-based source line.
        line: u32,
        /// 1-based source column.
        column: u32,
    },
}

impl Expr {
    /// The expression's 1-based source line.
    pub fn line(&self) -> u32 {
        match self {
            Expr::Literal { line, .. }
            | Expr::Identifier { line, .. }
            | Expr::Binary { line, .. }
            | Expr::Unary { line, .. }
            | Expr::Call { line, .. }
            | Expr::Member { line, .. } => *line,
        }
    }

    /// Whether this is the literal `true` or the identifier `true`,
    /// the forms the unreachable-code warning looks for.
    pub fn is_literally_true(&self) -> bool {
        match self {
            Expr::Literal {
                value: Value::Bool(true),
                ..
            } => true,
            Expr::Identifier { name, .. } => name.eq_ignore_ascii_case("true"),
            _ => false,
        }
    }
}
