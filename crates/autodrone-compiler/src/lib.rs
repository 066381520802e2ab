//! Bytecode compiler for the AutoDrone scripting languages.
//!
//! A single forward pass over the unified tree emits a flat instruction
//! array with integer jump targets, patching forward jumps as block
//! ends are reached, and records an instruction-index → source-line map
//! for the VM's line highlighting and error reports.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod bytecode;
pub mod compiler;
pub mod opcode;

pub use bytecode::Bytecode;
pub use compiler::compile;
pub use opcode::{Instruction, Op};
