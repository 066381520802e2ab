//! Lexer for DroneScript, the keyword-and-block family.
//!
//! Statements end at a newline or a `;`; both lex to a single
//! [`TokenKind::Newline`], and runs of terminators collapse to one.
//! Blocks open with a trailing `:` and close with the `end` keyword.
//! `#` starts a line comment.

use autodrone_core::LexError;

use crate::scanner::Scanner;
use crate::token::{Token, TokenKind};

/// Keyword table. Lookup happens on the lowercased spelling, so
/// `MOVE`, `Move` and `move` are the same keyword.
fn keyword(name: &str) -> Option<TokenKind> {
    match name {
        "if" => Some(TokenKind::KwIf),
        "elif" => Some(TokenKind::KwElif),
        "else" => Some(TokenKind::KwElse),
        "end" => Some(TokenKind::KwEnd),
        "loop" => Some(TokenKind::KwLoop),
        "while" => Some(TokenKind::KwWhile),
        "move" => Some(TokenKind::KwMove),
        "turn" => Some(TokenKind::KwTurn),
        "collect" => Some(TokenKind::KwCollect),
        "wait" => Some(TokenKind::KwWait),
        "log" => Some(TokenKind::KwLog),
        "forward" => Some(TokenKind::KwForward),
        "back" => Some(TokenKind::KwBack),
        "left" => Some(TokenKind::KwLeft),
        "right" => Some(TokenKind::KwRight),
        "and" => Some(TokenKind::KwAnd),
        "or" => Some(TokenKind::KwOr),
        "not" => Some(TokenKind::KwNot),
        _ => None,
    }
}

/// Tokenize DroneScript source.
pub fn lex(source: &str) -> Result<Vec<Token>, LexError> {
    let mut scanner = Scanner::new(source);
    let mut tokens: Vec<Token> = Vec::new();

    while !scanner.is_eof() {
        let (line, column) = scanner.position();
        let ch = scanner.peek().expect("not at eof");
        match ch {
            ' ' | '\t' | '\r' => {
                scanner.advance();
            }
            '#' => {
                while !matches!(scanner.peek(), None | Some('\n')) {
                    scanner.advance();
                }
            }
            '\n' | ';' => {
                scanner.advance();
                push_newline(&mut tokens, line, column);
            }
            '"' | '\'' => {
                scanner.advance();
                let text = scanner.scan_string(ch, line, column)?;
                tokens.push(Token::new(TokenKind::Str(text), line, column));
            }
            c if c.is_ascii_digit() => {
                let value = scanner.scan_number();
                tokens.push(Token::new(TokenKind::Number(value), line, column));
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let name = scanner.scan_ident();
                let kind = keyword(&name.to_lowercase()).unwrap_or(TokenKind::Ident(name));
                tokens.push(Token::new(kind, line, column));
            }
            _ => {
                scanner.advance();
                let kind = match ch {
                    ':' => TokenKind::Colon,
                    ',' => TokenKind::Comma,
                    '.' => TokenKind::Dot,
                    '(' => TokenKind::LParen,
                    ')' => TokenKind::RParen,
                    '+' => TokenKind::Plus,
                    '-' => TokenKind::Minus,
                    '=' if scanner.advance_if('=') => TokenKind::EqEq,
                    '!' if scanner.advance_if('=') => TokenKind::Neq,
                    '<' if scanner.advance_if('=') => TokenKind::Lte,
                    '<' => TokenKind::Lt,
                    '>' if scanner.advance_if('=') => TokenKind::Gte,
                    '>' => TokenKind::Gt,
                    _ => {
                        return Err(LexError::UnexpectedChar { ch, line, column });
                    }
                };
                tokens.push(Token::new(kind, line, column));
            }
        }
    }

    let (line, column) = scanner.position();
    tokens.push(Token::new(TokenKind::Eof, line, column));
    Ok(tokens)
}

/// Append a `Newline`, collapsing runs of terminators to one token.
fn push_newline(tokens: &mut Vec<Token>, line: u32, column: u32) {
    if !matches!(
        tokens.last(),
        Some(Token {
            kind: TokenKind::Newline,
            ..
        })
    ) {
        tokens.push(Token::new(TokenKind::Newline, line, column));
    }
}
