//! Lexer for DroneC, the brace-and-semicolon family.
//!
//! Same token shape and shared literal rules as the block-family lexer,
//! with a C-like surface: `//` and `/* … */` comments, `&& || !`
//! logical operators, `++`/`--`, and explicit `;` terminators (which
//! the parser requires, unlike the block family's newlines).

use autodrone_core::LexError;

use crate::scanner::Scanner;
use crate::token::{Token, TokenKind};

/// Keyword table. Lookup happens on the lowercased spelling.
fn keyword(name: &str) -> Option<TokenKind> {
    match name {
        "if" => Some(TokenKind::KwIf),
        "else" => Some(TokenKind::KwElse),
        "for" => Some(TokenKind::KwFor),
        "while" => Some(TokenKind::KwWhile),
        "int" => Some(TokenKind::KwInt),
        "move_forward" => Some(TokenKind::KwMoveForward),
        "move_back" => Some(TokenKind::KwMoveBack),
        "turn_left" => Some(TokenKind::KwTurnLeft),
        "turn_right" => Some(TokenKind::KwTurnRight),
        "collect" => Some(TokenKind::KwCollect),
        "wait" => Some(TokenKind::KwWait),
        "log" => Some(TokenKind::KwLog),
        "scan" => Some(TokenKind::KwScan),
        "scan_left" => Some(TokenKind::KwScanLeft),
        "scan_right" => Some(TokenKind::KwScanRight),
        _ => None,
    }
}

/// Tokenize DroneC source.
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
            '\n' => {
                scanner.advance();
                push_newline(&mut tokens, line, column);
            }
            '/' if scanner.peek_next() == Some('/') => {
                while !matches!(scanner.peek(), None | Some('\n')) {
                    scanner.advance();
                }
            }
            '/' if scanner.peek_next() == Some('*') => {
                scanner.advance();
                scanner.advance();
                // Runs to `*/`; an unclosed block comment swallows the
                // rest of the input, like the comment itself would.
                loop {
                    match scanner.advance() {
                        None => break,
                        Some('*') if scanner.advance_if('/') => break,
                        Some(_) => {}
                    }
                }
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
                    ';' => TokenKind::Semicolon,
                    ',' => TokenKind::Comma,
                    '.' => TokenKind::Dot,
                    '(' => TokenKind::LParen,
                    ')' => TokenKind::RParen,
                    '{' => TokenKind::LBrace,
                    '}' => TokenKind::RBrace,
                    '+' if scanner.advance_if('+') => TokenKind::PlusPlus,
                    '+' => TokenKind::Plus,
                    '-' if scanner.advance_if('-') => TokenKind::MinusMinus,
                    '-' => TokenKind::Minus,
                    '=' if scanner.advance_if('=') => TokenKind::EqEq,
                    '=' => TokenKind::Assign,
                    '!' if scanner.advance_if('=') => TokenKind::Neq,
                    '!' => TokenKind::Bang,
                    '<' if scanner.advance_if('=') => TokenKind::Lte,
                    '<' => TokenKind::Lt,
                    '>' if scanner.advance_if('=') => TokenKind::Gte,
                    '>' => TokenKind::Gt,
                    '&' if scanner.advance_if('&') => TokenKind::AndAnd,
                    '|' if scanner.advance_if('|') => TokenKind::OrOr,
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

/// Append a `Newline`, collapsing runs of physical newlines to one.
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

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        lex(source).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_call_statement() {
        assert_eq!(
            kinds("move_forward();"),
            vec![
                TokenKind::KwMoveForward,
                TokenKind::LParen,
                TokenKind::RParen,
                TokenKind::Semicolon,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_for_header() {
        assert_eq!(
            kinds("for (int i = 0; i < 3; i++)"),
            vec![
                TokenKind::KwFor,
                TokenKind::LParen,
                TokenKind::KwInt,
                TokenKind::Ident("i".into()),
                TokenKind::Assign,
                TokenKind::Number(0.0),
                TokenKind::Semicolon,
                TokenKind::Ident("i".into()),
                TokenKind::Lt,
                TokenKind::Number(3.0),
                TokenKind::Semicolon,
                TokenKind::Ident("i".into()),
                TokenKind::PlusPlus,
                TokenKind::RParen,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_logical_operators() {
        assert_eq!(
            kinds("!a && b || c"),
            vec![
                TokenKind::Bang,
                TokenKind::Ident("a".into()),
                TokenKind::AndAnd,
                TokenKind::Ident("b".into()),
                TokenKind::OrOr,
                TokenKind::Ident("c".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_line_comment() {
        assert_eq!(
            kinds("collect(); // grab it\nwait(1);"),
            vec![
                TokenKind::KwCollect,
                TokenKind::LParen,
                TokenKind::RParen,
                TokenKind::Semicolon,
                TokenKind::Newline,
                TokenKind::KwWait,
                TokenKind::LParen,
                TokenKind::Number(1.0),
                TokenKind::RParen,
                TokenKind::Semicolon,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_block_comment_spans_lines() {
        let tokens = lex("collect(); /* one\ntwo */ collect();").unwrap();
        let collects = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::KwCollect)
            .count();
        assert_eq!(collects, 2);
        // Position tracking continues through the comment.
        let second = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::KwCollect)
            .nth(1)
            .unwrap();
        assert_eq!(second.line, 2);
    }

    #[test]
    fn test_newline_runs_collapse() {
        assert_eq!(
            kinds("collect();\n\n\ncollect();"),
            vec![
                TokenKind::KwCollect,
                TokenKind::LParen,
                TokenKind::RParen,
                TokenKind::Semicolon,
                TokenKind::Newline,
                TokenKind::KwCollect,
                TokenKind::LParen,
                TokenKind::RParen,
                TokenKind::Semicolon,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_stray_ampersand_rejected() {
        assert_eq!(
            lex("a & b"),
            Err(LexError::UnexpectedChar {
                ch: '&',
                line: 1,
                column: 3,
            })
        );
    }

    #[test]
    fn test_scan_keywords() {
        assert_eq!(
            kinds("scan() == \"crystal\""),
            vec![
                TokenKind::KwScan,
                TokenKind::LParen,
                TokenKind::RParen,
                TokenKind::EqEq,
                TokenKind::Str("crystal".into()),
                TokenKind::Eof,
            ]
        );
    }
}
