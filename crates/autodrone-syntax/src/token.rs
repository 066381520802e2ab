//! Tokens shared by both lexers.

use std::fmt;

/// A lexical token.
///
/// `line` and `column` are 1-based and point at the token's first
/// character.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    /// What the token is, with any literal payload.
    pub kind: TokenKind,
    /// 1-based source line.
    pub line: u32,
    /// 1-based source column.
    pub column: u32,
}

impl Token {
    /// Construct a token.
    pub fn new(kind: TokenKind, line: u32, column: u32) -> Token {
        Token { kind, line, column }
    }
}

/// The closed set of token kinds across both syntax families.
///
/// One enum serves both lexers: each family only ever emits the subset
/// its surface defines, and the parser rejects out-of-family tokens as
/// ordinary unexpected tokens.
#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    // ── Literals and names ──────────────────────────────────────
    /// A number literal.
    Number(f64),
    /// A string literal, escapes already resolved.
    Str(String),
    /// An identifier, original spelling preserved.
    Ident(String),

    // ── Keywords, block family ──────────────────────────────────
    /// `if` (both families).
    KwIf,
    /// `elif`.
    KwElif,
    /// `else` (both families).
    KwElse,
    /// `end`.
    KwEnd,
    /// `loop`.
    KwLoop,
    /// `while` (both families).
    KwWhile,
    /// `move`.
    KwMove,
    /// `turn`.
    KwTurn,
    /// `collect` (both families).
    KwCollect,
    /// `wait` (both families).
    KwWait,
    /// `log` (both families).
    KwLog,
    /// `forward`.
    KwForward,
    /// `back`.
    KwBack,
    /// `left`.
    KwLeft,
    /// `right`.
    KwRight,
    /// `and`.
    KwAnd,
    /// `or`.
    KwOr,
    /// `not`.
    KwNot,

    // ── Keywords, brace family ──────────────────────────────────
    /// `for`.
    KwFor,
    /// `int`.
    KwInt,
    /// `move_forward`.
    KwMoveForward,
    /// `move_back`.
    KwMoveBack,
    /// `turn_left`.
    KwTurnLeft,
    /// `turn_right`.
    KwTurnRight,
    /// `scan`.
    KwScan,
    /// `scan_left`.
    KwScanLeft,
    /// `scan_right`.
    KwScanRight,

    // ── Punctuation ─────────────────────────────────────────────
    /// `:`
    Colon,
    /// `;`
    Semicolon,
    /// `,`
    Comma,
    /// `.`
    Dot,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `{`
    LBrace,
    /// `}`
    RBrace,

    // ── Operators ───────────────────────────────────────────────
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `=`
    Assign,
    /// `++`
    PlusPlus,
    /// `--`
    MinusMinus,
    /// `==`
    EqEq,
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
    /// `&&`
    AndAnd,
    /// `||`
    OrOr,
    /// `!`
    Bang,

    // ── Structure ───────────────────────────────────────────────
    /// One or more consecutive statement terminators, collapsed.
    Newline,
    /// End of input. Every token stream ends with exactly one.
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Number(n) => write!(f, "number {n}"),
            TokenKind::Str(s) => write!(f, "string \"{s}\""),
            TokenKind::Ident(name) => write!(f, "identifier '{name}'"),
            TokenKind::KwIf => f.write_str("'if'"),
            TokenKind::KwElif => f.write_str("'elif'"),
            TokenKind::KwElse => f.write_str("'else'"),
            TokenKind::KwEnd => f.write_str("'end'"),
            TokenKind::KwLoop => f.write_str("'loop'"),
            TokenKind::KwWhile => f.write_str("'while'"),
            TokenKind::KwMove => f.write_str("'move'"),
            TokenKind::KwTurn => f.write_str("'turn'"),
            TokenKind::KwCollect => f.write_str("'collect'"),
            TokenKind::KwWait => f.write_str("'wait'"),
            TokenKind::KwLog => f.write_str("'log'"),
            TokenKind::KwForward => f.write_str("'forward'"),
            TokenKind::KwBack => f.write_str("'back'"),
            TokenKind::KwLeft => f.write_str("'left'"),
            TokenKind::KwRight => f.write_str("'right'"),
            TokenKind::KwAnd => f.write_str("'and'"),
            TokenKind::KwOr => f.write_str("'or'"),
            TokenKind::KwNot => f.write_str("'not'"),
            TokenKind::KwFor => f.write_str("'for'"),
            TokenKind::KwInt => f.write_str("'int'"),
            TokenKind::KwMoveForward => f.write_str("'move_forward'"),
            TokenKind::KwMoveBack => f.write_str("'move_back'"),
            TokenKind::KwTurnLeft => f.write_str("'turn_left'"),
            TokenKind::KwTurnRight => f.write_str("'turn_right'"),
            TokenKind::KwScan => f.write_str("'scan'"),
            TokenKind::KwScanLeft => f.write_str("'scan_left'"),
            TokenKind::KwScanRight => f.write_str("'scan_right'"),
            TokenKind::Colon => f.write_str("':'"),
            TokenKind::Semicolon => f.write_str("';'"),
            TokenKind::Comma => f.write_str("','"),
            TokenKind::Dot => f.write_str("'.'"),
            TokenKind::LParen => f.write_str("'('"),
            TokenKind::RParen => f.write_str("')'"),
            TokenKind::LBrace => f.write_str("'{'"),
            TokenKind::RBrace => f.write_str("'}'"),
            TokenKind::Plus => f.write_str("'+'"),
            TokenKind::Minus => f.write_str("'-'"),
            TokenKind::Assign => f.write_str("'='"),
            TokenKind::PlusPlus => f.write_str("'++'"),
            TokenKind::MinusMinus => f.write_str("'--'"),
            TokenKind::EqEq => f.write_str("'=='"),
            TokenKind::Neq => f.write_str("'!='"),
            TokenKind::Lt => f.write_str("'<'"),
            TokenKind::Gt => f.write_str("'>'"),
            TokenKind::Lte => f.write_str("'<='"),
            TokenKind::Gte => f.write_str("'>='"),
            TokenKind::AndAnd => f.write_str("'&&'"),
            TokenKind::OrOr => f.write_str("'||'"),
            TokenKind::Bang => f.write_str("'!'"),
            TokenKind::Newline => f.write_str("end of line"),
            TokenKind::Eof => f.write_str("end of input"),
        }
    }
}
