//! Tree → bytecode lowering.
//!
//! One forward pass. Forward jumps are emitted with a placeholder
//! target and patched when the block end is reached; backward jumps
//! (`while`) know their target already.
//!
//! Counted loops have a compile-time-constant trip count and no loop
//! variable, so they lower to the body repeated `count` times. The
//! conditional jumps pop their operand, which rules out keeping a
//! runtime counter on the operand stack without a duplication opcode.
//! Expansion is capped at [`MAX_LOOP_INSTRUCTIONS`] emitted
//! instructions per loop; a loop long enough to hit the cap exceeds any
//! practical VM instruction budget long before reaching it.

use indexmap::IndexMap;

use autodrone_core::CompileError;
use autodrone_syntax::{BinOp, Block, ElseBranch, Expr, Program, Stmt, UnOp};

use crate::bytecode::Bytecode;
use crate::opcode::{Instruction, Op};

/// Cap on instructions emitted per counted-loop expansion.
pub const MAX_LOOP_INSTRUCTIONS: usize = 50_000;

/// Compile a program. The output always ends with `HALT`.
pub fn compile(program: &Program) -> Result<Bytecode, CompileError> {
    let mut compiler = Compiler {
        code: Vec::new(),
        source_map: IndexMap::new(),
    };
    for stmt in &program.body {
        compiler.compile_stmt(stmt)?;
    }
    compiler.emit(Op::Halt, 0);
    Ok(Bytecode::new(compiler.code, compiler.source_map))
}

struct Compiler {
    code: Vec<Instruction>,
    source_map: IndexMap<usize, u32>,
}

impl Compiler {
    /// Append an instruction, recording its source line when the
    /// originating node has one.
    fn emit(&mut self, op: Op, line: u32) -> usize {
        let index = self.code.len();
        self.code.push(Instruction::new(op, line));
        if line > 0 {
            self.source_map.insert(index, line);
        }
        index
    }

    /// Current emission address — the target for a patch or a
    /// backward jump.
    fn here(&self) -> usize {
        self.code.len()
    }

    /// Point a previously emitted jump at `target`.
    fn patch(&mut self, index: usize, target: usize) {
        match &mut self.code[index].op {
            Op::Jump(addr) | Op::JumpIfFalse(addr) | Op::JumpIfTrue(addr) => *addr = target,
            other => unreachable!("patching a non-jump instruction {other}"),
        }
    }

    fn compile_block(&mut self, block: &Block) -> Result<(), CompileError> {
        for stmt in &block.statements {
            self.compile_stmt(stmt)?;
        }
        Ok(())
    }

    fn compile_stmt(&mut self, stmt: &Stmt) -> Result<(), CompileError> {
        match stmt {
            Stmt::Move { dir, line, .. } => {
                self.emit(Op::Move(dir.to_rel()), *line);
            }
            Stmt::Turn { dir, line, .. } => {
                self.emit(Op::Turn(*dir), *line);
            }
            Stmt::Collect { line, .. } => {
                self.emit(Op::Collect, *line);
            }
            Stmt::Wait { ticks, line, .. } => {
                self.emit(Op::Wait(*ticks), *line);
            }
            Stmt::Log { expr, line, .. } => {
                self.compile_expr(expr)?;
                self.emit(Op::Log, *line);
            }
            Stmt::If {
                cond,
                consequent,
                alternate,
                line,
                ..
            } => {
                self.compile_expr(cond)?;
                let skip_then = self.emit(Op::JumpIfFalse(0), *line);
                self.compile_block(consequent)?;
                match alternate {
                    Some(branch) => {
                        let skip_else = self.emit(Op::Jump(0), *line);
                        let else_start = self.here();
                        self.patch(skip_then, else_start);
                        match branch {
                            ElseBranch::Else(block) => self.compile_block(block)?,
                            ElseBranch::Elif(chained) => self.compile_stmt(chained)?,
                        }
                        let after = self.here();
                        self.patch(skip_else, after);
                    }
                    None => {
                        let after = self.here();
                        self.patch(skip_then, after);
                    }
                }
            }
            Stmt::While { cond, body, line, .. } => {
                let top = self.here();
                self.compile_expr(cond)?;
                let exit = self.emit(Op::JumpIfFalse(0), *line);
                self.compile_block(body)?;
                self.emit(Op::Jump(top), *line);
                let after = self.here();
                self.patch(exit, after);
            }
            Stmt::Loop { count, body, .. } => {
                let start = self.here();
                for _ in 0..(*count).max(0) {
                    self.compile_block(body)?;
                    if self.here() - start >= MAX_LOOP_INSTRUCTIONS {
                        break;
                    }
                }
            }
        }
        Ok(())
    }

    /// Post-order expression lowering: operands first, operator last.
    fn compile_expr(&mut self, expr: &Expr) -> Result<(), CompileError> {
        match expr {
            Expr::Literal { value, line, .. } => {
                self.emit(Op::Push(value.clone()), *line);
            }
            Expr::Identifier { name, line, .. } => {
                self.emit(Op::Load(name.clone()), *line);
            }
            Expr::Binary {
                op, left, right, line, ..
            } => {
                self.compile_expr(left)?;
                self.compile_expr(right)?;
                let op = match op {
                    BinOp::Add => Op::Add,
                    BinOp::Sub => Op::Sub,
                    BinOp::Eq => Op::Eq,
                    BinOp::Neq => Op::Neq,
                    BinOp::Lt => Op::Lt,
                    BinOp::Gt => Op::Gt,
                    BinOp::Lte => Op::Lte,
                    BinOp::Gte => Op::Gte,
                    BinOp::And => Op::And,
                    BinOp::Or => Op::Or,
                };
                self.emit(op, *line);
            }
            Expr::Unary {
                op: UnOp::Not,
                operand,
                line,
                ..
            } => {
                self.compile_expr(operand)?;
                self.emit(Op::Not, *line);
            }
            Expr::Call {
                callee,
                arguments,
                line,
                ..
            } => {
                let name = match callee.as_ref() {
                    Expr::Identifier { name, .. } => name.clone(),
                    _ => {
                        return Err(CompileError::CalleeNotIdentifier { line: *line });
                    }
                };
                for arg in arguments {
                    self.compile_expr(arg)?;
                }
                self.emit(
                    Op::Call {
                        name,
                        argc: arguments.len(),
                    },
                    *line,
                );
            }
            Expr::Member {
                object,
                property,
                line,
                ..
            } => {
                self.compile_expr(object)?;
                self.emit(Op::Member(property.clone()), *line);
            }
        }
        Ok(())
    }
}
