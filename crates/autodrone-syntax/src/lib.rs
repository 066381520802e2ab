//! Lexers, unified syntax tree and parser for the AutoDrone scripting
//! languages.
//!
//! AutoDrone scripts come in two surface syntaxes: DroneScript, a
//! keyword-and-block family (`loop 3: move forward end`), and DroneC, a
//! brace-and-semicolon family (`for (int i = 0; i < 3; i++) {
//! move_forward(); }`). Each family has its own lexer, but both produce
//! the same token shape and both parse into one unified tree, so every
//! stage downstream of this crate is syntax-agnostic.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod ast;
pub mod block_lexer;
pub mod brace_lexer;
pub mod parser;
mod scanner;
pub mod token;
pub mod unparse;

pub use ast::{Block, ElseBranch, Expr, BinOp, MoveDir, Program, Stmt, UnOp};
pub use parser::{parse, ParseWarning, Parsed};
pub use token::{Token, TokenKind};
pub use unparse::unparse;

use autodrone_core::LexError;

/// Which surface syntax a script is written in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SyntaxFamily {
    /// DroneScript: keyword statements, `:`-headed blocks closed by
    /// `end`, newline (or `;`) statement terminators.
    Block,
    /// DroneC: C-like surface with `{}` blocks and `;` terminators.
    Brace,
}

/// Tokenize `source` in the given family.
pub fn lex(family: SyntaxFamily, source: &str) -> Result<Vec<Token>, LexError> {
    match family {
        SyntaxFamily::Block => block_lexer::lex(source),
        SyntaxFamily::Brace => brace_lexer::lex(source),
    }
}
