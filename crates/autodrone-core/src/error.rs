//! Error types for the AutoDrone execution core.
//!
//! One closed enum per pipeline stage: lexing, parsing, compilation,
//! and execution. Each variant carries the position data it has and a
//! `hint()` the driver can surface to the learner. Simulator-side
//! gameplay failures are *not* errors — see
//! [`ActionReceipt`](crate::action::ActionReceipt).

use std::error::Error;
use std::fmt;

/// Errors from either lexer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LexError {
    /// A character outside the language's alphabet.
    UnexpectedChar {
        /// The offending character.
        ch: char,
        /// 1-based source line.
        line: u32,
        /// 1-based source column.
        column: u32,
    },
    /// A string literal with no closing quote before end of input.
    UnterminatedString {
        /// 1-based line of the opening quote.
        line: u32,
        /// 1-based column of the opening quote.
        column: u32,
    },
}

impl LexError {
    /// Source line of the failure.
    pub fn line(&self) -> u32 {
        match self {
            LexError::UnexpectedChar { line, .. } | LexError::UnterminatedString { line, .. } => {
                *line
            }
        }
    }

    /// Source column of the failure.
    pub fn column(&self) -> u32 {
        match self {
            LexError::UnexpectedChar { column, .. }
            | LexError::UnterminatedString { column, .. } => *column,
        }
    }

    /// A hint for the learner, when one applies.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            LexError::UnexpectedChar { .. } => None,
            LexError::UnterminatedString { .. } => Some("close the string with a matching quote"),
        }
    }
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexError::UnexpectedChar { ch, line, column } => {
                write!(f, "unexpected character '{ch}' at {line}:{column}")
            }
            LexError::UnterminatedString { line, column } => {
                write!(f, "unterminated string starting at {line}:{column}")
            }
        }
    }
}

impl Error for LexError {}

/// Fatal errors from the parser.
///
/// Non-fatal findings are collected as warnings alongside the tree and
/// never abort parsing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParseError {
    /// The token at this position cannot start or continue the current
    /// construct.
    UnexpectedToken {
        /// Display form of the offending token.
        found: String,
        /// What the parser was looking for.
        expected: String,
        /// 1-based source line.
        line: u32,
        /// 1-based source column.
        column: u32,
    },
    /// A required delimiter (`:`, `end`, `)`, `}`, `;`, `{`, `(`) is missing.
    MissingDelimiter {
        /// The missing delimiter.
        delimiter: &'static str,
        /// The construct that needs it, e.g. "if block".
        context: &'static str,
        /// 1-based source line.
        line: u32,
        /// 1-based source column.
        column: u32,
    },
    /// `move` or `turn` followed by something other than a direction
    /// keyword.
    BadDirection {
        /// The statement keyword, "move" or "turn".
        keyword: &'static str,
        /// The directions the keyword accepts.
        expected: &'static str,
        /// 1-based source line.
        line: u32,
        /// 1-based source column.
        column: u32,
    },
    /// `loop` without an integer repeat count.
    MissingLoopCount {
        /// 1-based source line.
        line: u32,
        /// 1-based source column.
        column: u32,
    },
    /// `.` with no property name after it.
    MissingProperty {
        /// 1-based source line.
        line: u32,
        /// 1-based source column.
        column: u32,
    },
    /// `end` at statement position with no open block.
    UnexpectedEnd {
        /// 1-based source line.
        line: u32,
        /// 1-based source column.
        column: u32,
    },
}

impl ParseError {
    /// Source line of the failure.
    pub fn line(&self) -> u32 {
        match self {
            ParseError::UnexpectedToken { line, .. }
            | ParseError::MissingDelimiter { line, .. }
            | ParseError::BadDirection { line, .. }
            | ParseError::MissingLoopCount { line, .. }
            | ParseError::MissingProperty { line, .. }
            | ParseError::UnexpectedEnd { line, .. } => *line,
        }
    }

    /// Source column of the failure.
    pub fn column(&self) -> u32 {
        match self {
            ParseError::UnexpectedToken { column, .. }
            | ParseError::MissingDelimiter { column, .. }
            | ParseError::BadDirection { column, .. }
            | ParseError::MissingLoopCount { column, .. }
            | ParseError::MissingProperty { column, .. }
            | ParseError::UnexpectedEnd { column, .. } => *column,
        }
    }

    /// A hint for the learner, when one applies.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            ParseError::UnexpectedToken { .. } => None,
            ParseError::MissingDelimiter { .. } => {
                Some("every block header needs its closing delimiter")
            }
            ParseError::BadDirection { .. } => None,
            ParseError::MissingLoopCount { .. } => {
                Some("write the repeat count right after 'loop', like 'loop 3:'")
            }
            ParseError::MissingProperty { .. } => Some("write the field name after the dot"),
            ParseError::UnexpectedEnd { .. } => {
                Some("'end' closes a block; check for an unmatched 'end'")
            }
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::UnexpectedToken {
                found,
                expected,
                line,
                column,
            } => write!(
                f,
                "unexpected {found} at {line}:{column}, expected {expected}"
            ),
            ParseError::MissingDelimiter {
                delimiter,
                context,
                line,
                column,
            } => write!(f, "missing '{delimiter}' for {context} at {line}:{column}"),
            ParseError::BadDirection {
                keyword,
                expected,
                line,
                column,
            } => write!(
                f,
                "'{keyword}' needs a direction ({expected}) at {line}:{column}"
            ),
            ParseError::MissingLoopCount { line, column } => {
                write!(f, "'loop' needs an integer count at {line}:{column}")
            }
            ParseError::MissingProperty { line, column } => {
                write!(f, "expected a property name after '.' at {line}:{column}")
            }
            ParseError::UnexpectedEnd { line, column } => {
                write!(f, "unexpected 'end' at {line}:{column}")
            }
        }
    }
}

impl Error for ParseError {}

/// Errors from the compiler.
///
/// These indicate a malformed tree reaching the compiler — an upstream
/// bug, not a user mistake. The parser only produces calls with
/// identifier callees, so a well-formed pipeline never surfaces them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CompileError {
    /// A call whose callee is not a plain identifier.
    CalleeNotIdentifier {
        /// 1-based source line of the call.
        line: u32,
    },
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileError::CalleeNotIdentifier { line } => {
                write!(f, "internal: call on non-identifier callee at line {line}")
            }
        }
    }
}

impl Error for CompileError {}

/// Errors raised by the virtual machine during execution.
///
/// Any of these moves the VM to its terminal error state; the VM
/// attaches the faulting source line from the bytecode source map when
/// it reports them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RuntimeError {
    /// An opcode needed more operands than the stack held.
    StackUnderflow,
    /// `LOAD` of a name outside the fixed read-only set.
    UnknownIdentifier {
        /// The unresolved name.
        name: String,
    },
    /// Member access on a value without that field.
    BadMember {
        /// The missing property.
        property: String,
    },
    /// `CALL` of a name outside the fixed function set.
    UnknownFunction {
        /// The unresolved name.
        name: String,
    },
    /// An instruction the VM does not recognize.
    UnknownOpcode,
    /// The per-run instruction budget was exhausted.
    InstructionLimit {
        /// The configured budget.
        limit: u32,
    },
}

impl RuntimeError {
    /// A hint for the learner, when one applies.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            RuntimeError::StackUnderflow => None,
            RuntimeError::UnknownIdentifier { .. } => {
                Some("available names: energy, x, y, facing, inventory, true, false")
            }
            RuntimeError::BadMember { .. } => {
                Some("inventory has fields: crystal, data, energy_cell")
            }
            RuntimeError::UnknownFunction { .. } => {
                Some("available functions: scan, scan_left, scan_right")
            }
            RuntimeError::UnknownOpcode => None,
            RuntimeError::InstructionLimit { .. } => {
                Some("check for a loop that never finishes, like 'while true' with no exit")
            }
        }
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeError::StackUnderflow => write!(f, "operand stack underflow"),
            RuntimeError::UnknownIdentifier { name } => {
                write!(f, "unknown variable '{name}'")
            }
            RuntimeError::BadMember { property } => {
                write!(f, "no such member '{property}'")
            }
            RuntimeError::UnknownFunction { name } => {
                write!(f, "unknown function '{name}'")
            }
            RuntimeError::UnknownOpcode => write!(f, "unknown opcode"),
            RuntimeError::InstructionLimit { limit } => {
                write!(f, "instruction limit of {limit} exceeded")
            }
        }
    }
}

impl Error for RuntimeError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lex_error_positions() {
        let err = LexError::UnexpectedChar {
            ch: '@',
            line: 3,
            column: 7,
        };
        assert_eq!(err.line(), 3);
        assert_eq!(err.column(), 7);
        assert!(err.to_string().contains("'@'"));
    }

    #[test]
    fn test_parse_error_hints() {
        let err = ParseError::UnexpectedEnd { line: 5, column: 1 };
        assert!(err.hint().unwrap().contains("unmatched"));
        let err = ParseError::MissingLoopCount { line: 2, column: 6 };
        assert!(err.to_string().contains("loop"));
    }

    #[test]
    fn test_runtime_error_display() {
        let err = RuntimeError::UnknownIdentifier {
            name: "speed".into(),
        };
        assert_eq!(err.to_string(), "unknown variable 'speed'");
        assert!(err.hint().unwrap().contains("energy"));

        let err = RuntimeError::InstructionLimit { limit: 10_000 };
        assert!(err.to_string().contains("10000"));
    }
}
