//! The front-end pipeline: source → tokens → tree → bytecode.

use std::error::Error;
use std::fmt;

use autodrone_core::{CompileError, LexError, ParseError};
use autodrone_compiler::Bytecode;
use autodrone_syntax::{lex, parse, ParseWarning, SyntaxFamily};

/// A compiled script plus the parser's non-fatal findings.
#[derive(Clone, Debug, PartialEq)]
pub struct Compiled {
    /// The executable program.
    pub bytecode: Bytecode,
    /// Warnings to surface in the editor, in source order.
    pub warnings: Vec<ParseWarning>,
}

/// Any fatal front-end failure. Lex and parse errors stop the pipeline
/// before compilation.
#[derive(Clone, Debug, PartialEq)]
pub enum FrontendError {
    /// The lexer rejected the source.
    Lex(LexError),
    /// The parser rejected the token stream.
    Parse(ParseError),
    /// The compiler rejected the tree — an internal bug, not a user
    /// mistake.
    Compile(CompileError),
}

impl FrontendError {
    /// The failing source line, when known.
    pub fn line(&self) -> Option<u32> {
        match self {
            FrontendError::Lex(e) => Some(e.line()),
            FrontendError::Parse(e) => Some(e.line()),
            FrontendError::Compile(CompileError::CalleeNotIdentifier { line }) => Some(*line),
        }
    }

    /// A hint for the learner, when one applies.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            FrontendError::Lex(e) => e.hint(),
            FrontendError::Parse(e) => e.hint(),
            FrontendError::Compile(_) => None,
        }
    }
}

impl fmt::Display for FrontendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrontendError::Lex(e) => write!(f, "{e}"),
            FrontendError::Parse(e) => write!(f, "{e}"),
            FrontendError::Compile(e) => write!(f, "{e}"),
        }
    }
}

impl Error for FrontendError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            FrontendError::Lex(e) => Some(e),
            FrontendError::Parse(e) => Some(e),
            FrontendError::Compile(e) => Some(e),
        }
    }
}

impl From<LexError> for FrontendError {
    fn from(e: LexError) -> FrontendError {
        FrontendError::Lex(e)
    }
}

impl From<ParseError> for FrontendError {
    fn from(e: ParseError) -> FrontendError {
        FrontendError::Parse(e)
    }
}

impl From<CompileError> for FrontendError {
    fn from(e: CompileError) -> FrontendError {
        FrontendError::Compile(e)
    }
}

/// Compile a script in the given family.
pub fn compile_source(family: SyntaxFamily, source: &str) -> Result<Compiled, FrontendError> {
    let tokens = lex(family, source)?;
    let parsed = parse(family, tokens)?;
    let bytecode = autodrone_compiler::compile(&parsed.program)?;
    Ok(Compiled {
        bytecode,
        warnings: parsed.warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_produces_bytecode_and_warnings() {
        let compiled = compile_source(SyntaxFamily::Block, "loop 0: move forward end").unwrap();
        assert!(compiled.bytecode.len() >= 1);
        assert_eq!(compiled.warnings.len(), 1);
    }

    #[test]
    fn test_lex_error_stops_pipeline() {
        let err = compile_source(SyntaxFamily::Block, "move @").unwrap_err();
        assert!(matches!(err, FrontendError::Lex(_)));
        assert_eq!(err.line(), Some(1));
    }

    #[test]
    fn test_parse_error_carries_hint() {
        let err = compile_source(SyntaxFamily::Block, "loop 2: collect").unwrap_err();
        assert!(matches!(err, FrontendError::Parse(_)));
        assert!(err.hint().is_some());
    }
}
