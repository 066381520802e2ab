//! Recursive-descent parser producing the unified tree.
//!
//! One parser serves both families: statement grammars differ per
//! family, the expression grammar is shared. Fatal problems abort with
//! a [`ParseError`]; softer findings (dead loops, unknown names,
//! unreachable code) accumulate as [`ParseWarning`]s and are returned
//! alongside the tree.

use std::mem::discriminant;

use autodrone_core::{ParseError, TurnDir, Value};

use crate::ast::{BinOp, Block, ElseBranch, Expr, MoveDir, Program, Stmt, UnOp};
use crate::token::{Token, TokenKind};
use crate::SyntaxFamily;

/// Names scripts may read without tripping the unknown-name warning.
const KNOWN_NAMES: [&str; 10] = [
    "energy",
    "x",
    "y",
    "facing",
    "inventory",
    "scan",
    "scan_left",
    "scan_right",
    "true",
    "false",
];

/// Loop counts above this draw a performance warning.
const LARGE_LOOP_COUNT: i64 = 1000;

/// A non-fatal finding from parsing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseWarning {
    /// What the parser noticed.
    pub message: String,
    /// 1-based source line.
    pub line: u32,
    /// 1-based source column.
    pub column: u32,
}

/// A successfully parsed script plus any warnings.
#[derive(Clone, Debug, PartialEq)]
pub struct Parsed {
    /// The unified tree.
    pub program: Program,
    /// Non-fatal findings, in source order.
    pub warnings: Vec<ParseWarning>,
}

/// Parse a token stream in the given family.
pub fn parse(family: SyntaxFamily, tokens: Vec<Token>) -> Result<Parsed, ParseError> {
    let mut parser = Parser {
        tokens,
        pos: 0,
        family,
        warnings: Vec::new(),
    };
    let program = parser.parse_program()?;
    Ok(Parsed {
        program,
        warnings: parser.warnings,
    })
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    family: SyntaxFamily,
    warnings: Vec<ParseWarning>,
}

impl Parser {
    // ── Token plumbing ──────────────────────────────────────────

    fn peek(&self) -> &Token {
        // The lexer guarantees a trailing Eof, so `pos` never passes it.
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek_kind(&self) -> &TokenKind {
        &self.peek().kind
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }

    fn check(&self, kind: &TokenKind) -> bool {
        discriminant(self.peek_kind()) == discriminant(kind)
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn skip_newlines(&mut self) {
        while self.check(&TokenKind::Newline) {
            self.advance();
        }
    }

    fn at_eof(&self) -> bool {
        self.check(&TokenKind::Eof)
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        let token = self.peek();
        ParseError::UnexpectedToken {
            found: token.kind.to_string(),
            expected: expected.to_string(),
            line: token.line,
            column: token.column,
        }
    }

    fn expect(
        &mut self,
        kind: &TokenKind,
        delimiter: &'static str,
        context: &'static str,
    ) -> Result<Token, ParseError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            let token = self.peek();
            Err(ParseError::MissingDelimiter {
                delimiter,
                context,
                line: token.line,
                column: token.column,
            })
        }
    }

    /// Consume an integer-valued number literal.
    fn expect_integer(&mut self, expected: &str) -> Result<(i64, u32, u32), ParseError> {
        match self.peek_kind() {
            TokenKind::Number(n) if n.fract() == 0.0 => {
                let value = *n as i64;
                let token = self.advance();
                Ok((value, token.line, token.column))
            }
            _ => Err(self.unexpected(expected)),
        }
    }

    fn warn(&mut self, message: String, line: u32, column: u32) {
        self.warnings.push(ParseWarning {
            message,
            line,
            column,
        });
    }

    // ── Programs and statement sequences ────────────────────────

    fn parse_program(&mut self) -> Result<Program, ParseError> {
        let mut body = Vec::new();
        loop {
            self.skip_newlines();
            if self.at_eof() {
                break;
            }
            if self.check(&TokenKind::KwEnd) {
                let token = self.peek();
                return Err(ParseError::UnexpectedEnd {
                    line: token.line,
                    column: token.column,
                });
            }
            self.push_statement(&mut body)?;
        }
        Ok(Program { body })
    }

    /// Parse one statement, append it, and flag code following a
    /// `while true` as unreachable.
    fn push_statement(&mut self, out: &mut Vec<Stmt>) -> Result<(), ParseError> {
        let after_forever = matches!(
            out.last(),
            Some(Stmt::While { cond, .. }) if cond.is_literally_true()
        );
        let token = self.peek();
        let (line, column) = (token.line, token.column);
        let stmt = match self.family {
            SyntaxFamily::Block => self.parse_block_statement()?,
            SyntaxFamily::Brace => self.parse_brace_statement()?,
        };
        if after_forever {
            self.warn(
                "code after 'while true' is unreachable".to_string(),
                line,
                column,
            );
        }
        out.push(stmt);
        if self.family == SyntaxFamily::Block {
            self.expect_block_terminator()?;
        }
        Ok(())
    }

    // ── Block family statements ─────────────────────────────────

    /// After a block-family statement: a newline, or a token that ends
    /// the enclosing block.
    fn expect_block_terminator(&mut self) -> Result<(), ParseError> {
        match self.peek_kind() {
            TokenKind::Newline => {
                self.advance();
                Ok(())
            }
            TokenKind::Eof | TokenKind::KwEnd | TokenKind::KwElif | TokenKind::KwElse => Ok(()),
            _ => Err(self.unexpected("end of line")),
        }
    }

    fn parse_block_statement(&mut self) -> Result<Stmt, ParseError> {
        match self.peek_kind() {
            TokenKind::KwMove => {
                let kw = self.advance();
                let dir = match self.peek_kind() {
                    TokenKind::KwForward => MoveDir::Forward,
                    TokenKind::KwBack => MoveDir::Back,
                    _ => {
                        let token = self.peek();
                        return Err(ParseError::BadDirection {
                            keyword: "move",
                            expected: "forward or back",
                            line: token.line,
                            column: token.column,
                        });
                    }
                };
                self.advance();
                Ok(Stmt::Move {
                    dir,
                    line: kw.line,
                    column: kw.column,
                })
            }
            TokenKind::KwTurn => {
                let kw = self.advance();
                let dir = match self.peek_kind() {
                    TokenKind::KwLeft => TurnDir::Left,
                    TokenKind::KwRight => TurnDir::Right,
                    _ => {
                        let token = self.peek();
                        return Err(ParseError::BadDirection {
                            keyword: "turn",
                            expected: "left or right",
                            line: token.line,
                            column: token.column,
                        });
                    }
                };
                self.advance();
                Ok(Stmt::Turn {
                    dir,
                    line: kw.line,
                    column: kw.column,
                })
            }
            TokenKind::KwCollect => {
                let kw = self.advance();
                Ok(Stmt::Collect {
                    line: kw.line,
                    column: kw.column,
                })
            }
            TokenKind::KwWait => {
                let kw = self.advance();
                let ticks = if matches!(self.peek_kind(), TokenKind::Number(_)) {
                    let (n, _, _) = self.expect_integer("an integer tick count")?;
                    n.max(0) as u32
                } else {
                    1
                };
                Ok(Stmt::Wait {
                    ticks,
                    line: kw.line,
                    column: kw.column,
                })
            }
            TokenKind::KwLog => {
                let kw = self.advance();
                let expr = self.parse_expr()?;
                Ok(Stmt::Log {
                    expr,
                    line: kw.line,
                    column: kw.column,
                })
            }
            TokenKind::KwIf => {
                let kw = self.advance();
                self.parse_block_if_chain(kw.line, kw.column)
            }
            TokenKind::KwLoop => {
                let kw = self.advance();
                let count = match self.peek_kind() {
                    TokenKind::Number(n) if n.fract() == 0.0 => {
                        let count = *n as i64;
                        self.advance();
                        count
                    }
                    _ => {
                        let token = self.peek();
                        return Err(ParseError::MissingLoopCount {
                            line: token.line,
                            column: token.column,
                        });
                    }
                };
                self.warn_loop_count(count, kw.line, kw.column);
                self.expect(&TokenKind::Colon, ":", "loop block")?;
                let body = self.parse_block_body()?;
                self.expect(&TokenKind::KwEnd, "end", "loop block")?;
                Ok(Stmt::Loop {
                    count,
                    body,
                    line: kw.line,
                    column: kw.column,
                })
            }
            TokenKind::KwWhile => {
                let kw = self.advance();
                let cond = self.parse_expr()?;
                self.expect(&TokenKind::Colon, ":", "while block")?;
                let body = self.parse_block_body()?;
                self.expect(&TokenKind::KwEnd, "end", "while block")?;
                Ok(Stmt::While {
                    cond,
                    body,
                    line: kw.line,
                    column: kw.column,
                })
            }
            _ => Err(self.unexpected("a statement")),
        }
    }

    /// Parse the remainder of an `if`/`elif` whose keyword is already
    /// consumed. The single `end` closing the whole chain is consumed
    /// by the deepest arm.
    fn parse_block_if_chain(&mut self, line: u32, column: u32) -> Result<Stmt, ParseError> {
        let cond = self.parse_expr()?;
        self.expect(&TokenKind::Colon, ":", "if block")?;
        let consequent = self.parse_block_body()?;
        let alternate = match self.peek_kind() {
            TokenKind::KwElif => {
                let kw = self.advance();
                let chained = self.parse_block_if_chain(kw.line, kw.column)?;
                Some(ElseBranch::Elif(Box::new(chained)))
            }
            TokenKind::KwElse => {
                self.advance();
                self.expect(&TokenKind::Colon, ":", "else block")?;
                let block = self.parse_block_body()?;
                self.expect(&TokenKind::KwEnd, "end", "if block")?;
                Some(ElseBranch::Else(block))
            }
            _ => {
                self.expect(&TokenKind::KwEnd, "end", "if block")?;
                None
            }
        };
        Ok(Stmt::If {
            cond,
            consequent,
            alternate,
            line,
            column,
        })
    }

    /// Statements up to (not consuming) `end`, `elif` or `else`.
    fn parse_block_body(&mut self) -> Result<Block, ParseError> {
        self.skip_newlines();
        let first = self.peek();
        let (line, column) = (first.line, first.column);
        let mut statements = Vec::new();
        loop {
            self.skip_newlines();
            match self.peek_kind() {
                TokenKind::KwEnd | TokenKind::KwElif | TokenKind::KwElse => break,
                TokenKind::Eof => break,
                _ => self.push_statement(&mut statements)?,
            }
        }
        Ok(Block {
            statements,
            line,
            column,
        })
    }

    // ── Brace family statements ─────────────────────────────────

    fn parse_brace_statement(&mut self) -> Result<Stmt, ParseError> {
        match self.peek_kind() {
            TokenKind::KwMoveForward => {
                self.parse_action_call("move_forward call", |line, column| Stmt::Move {
                    dir: MoveDir::Forward,
                    line,
                    column,
                })
            }
            TokenKind::KwMoveBack => {
                self.parse_action_call("move_back call", |line, column| Stmt::Move {
                    dir: MoveDir::Back,
                    line,
                    column,
                })
            }
            TokenKind::KwTurnLeft => {
                self.parse_action_call("turn_left call", |line, column| Stmt::Turn {
                    dir: TurnDir::Left,
                    line,
                    column,
                })
            }
            TokenKind::KwTurnRight => {
                self.parse_action_call("turn_right call", |line, column| Stmt::Turn {
                    dir: TurnDir::Right,
                    line,
                    column,
                })
            }
            TokenKind::KwCollect => {
                self.parse_action_call("collect call", |line, column| Stmt::Collect {
                    line,
                    column,
                })
            }
            TokenKind::KwWait => {
                let kw = self.advance();
                self.expect(&TokenKind::LParen, "(", "wait call")?;
                let ticks = if matches!(self.peek_kind(), TokenKind::Number(_)) {
                    let (n, _, _) = self.expect_integer("an integer tick count")?;
                    n.max(0) as u32
                } else {
                    1
                };
                self.expect(&TokenKind::RParen, ")", "wait call")?;
                self.expect(&TokenKind::Semicolon, ";", "wait call")?;
                Ok(Stmt::Wait {
                    ticks,
                    line: kw.line,
                    column: kw.column,
                })
            }
            TokenKind::KwLog => {
                let kw = self.advance();
                self.expect(&TokenKind::LParen, "(", "log call")?;
                let expr = self.parse_expr()?;
                self.expect(&TokenKind::RParen, ")", "log call")?;
                self.expect(&TokenKind::Semicolon, ";", "log call")?;
                Ok(Stmt::Log {
                    expr,
                    line: kw.line,
                    column: kw.column,
                })
            }
            TokenKind::KwIf => self.parse_brace_if(),
            TokenKind::KwWhile => {
                let kw = self.advance();
                self.expect(&TokenKind::LParen, "(", "while condition")?;
                let cond = self.parse_expr()?;
                self.expect(&TokenKind::RParen, ")", "while condition")?;
                let body = self.parse_braced_block()?;
                Ok(Stmt::While {
                    cond,
                    body,
                    line: kw.line,
                    column: kw.column,
                })
            }
            TokenKind::KwFor => self.parse_for(),
            _ => Err(self.unexpected("a statement")),
        }
    }

    /// `keyword();` — the shared shape of the zero-argument action
    /// statements.
    fn parse_action_call(
        &mut self,
        context: &'static str,
        build: impl FnOnce(u32, u32) -> Stmt,
    ) -> Result<Stmt, ParseError> {
        let kw = self.advance();
        self.expect(&TokenKind::LParen, "(", context)?;
        self.expect(&TokenKind::RParen, ")", context)?;
        self.expect(&TokenKind::Semicolon, ";", context)?;
        Ok(build(kw.line, kw.column))
    }

    fn parse_brace_if(&mut self) -> Result<Stmt, ParseError> {
        let kw = self.advance();
        self.expect(&TokenKind::LParen, "(", "if condition")?;
        let cond = self.parse_expr()?;
        self.expect(&TokenKind::RParen, ")", "if condition")?;
        let consequent = self.parse_braced_block()?;
        self.skip_newlines();
        let alternate = if self.eat(&TokenKind::KwElse) {
            self.skip_newlines();
            if self.check(&TokenKind::KwIf) {
                let chained = self.parse_brace_if()?;
                Some(ElseBranch::Elif(Box::new(chained)))
            } else {
                Some(ElseBranch::Else(self.parse_braced_block()?))
            }
        } else {
            None
        };
        Ok(Stmt::If {
            cond,
            consequent,
            alternate,
            line: kw.line,
            column: kw.column,
        })
    }

    /// `for (int i = a; i < b; i++) { … }`, lowered to a counted loop
    /// of `b - a` iterations. The induction variable never reaches the
    /// tree.
    fn parse_for(&mut self) -> Result<Stmt, ParseError> {
        let kw = self.advance();
        self.expect(&TokenKind::LParen, "(", "for header")?;
        if !self.eat(&TokenKind::KwInt) {
            return Err(self.unexpected("'int'"));
        }
        let var = match self.peek_kind() {
            TokenKind::Ident(name) => name.clone(),
            _ => return Err(self.unexpected("a loop variable name")),
        };
        self.advance();
        if !self.eat(&TokenKind::Assign) {
            return Err(self.unexpected("'='"));
        }
        let (start, _, _) = self.expect_integer("an integer start value")?;
        self.expect(&TokenKind::Semicolon, ";", "for header")?;
        self.expect_loop_var(&var)?;
        if !self.eat(&TokenKind::Lt) {
            return Err(self.unexpected("'<'"));
        }
        let (limit, _, _) = self.expect_integer("an integer limit")?;
        self.expect(&TokenKind::Semicolon, ";", "for header")?;
        self.expect_loop_var(&var)?;
        if !self.eat(&TokenKind::PlusPlus) {
            return Err(self.unexpected("'++'"));
        }
        self.expect(&TokenKind::RParen, ")", "for header")?;

        let count = limit - start;
        self.warn_loop_count(count, kw.line, kw.column);
        let body = self.parse_braced_block()?;
        Ok(Stmt::Loop {
            count,
            body,
            line: kw.line,
            column: kw.column,
        })
    }

    fn expect_loop_var(&mut self, var: &str) -> Result<(), ParseError> {
        match self.peek_kind() {
            TokenKind::Ident(name) if name == var => {
                self.advance();
                Ok(())
            }
            _ => Err(self.unexpected("the loop variable")),
        }
    }

    fn parse_braced_block(&mut self) -> Result<Block, ParseError> {
        self.skip_newlines();
        let open = self.expect(&TokenKind::LBrace, "{", "block")?;
        let mut statements = Vec::new();
        loop {
            self.skip_newlines();
            match self.peek_kind() {
                TokenKind::RBrace => {
                    self.advance();
                    break;
                }
                TokenKind::Eof => {
                    let token = self.peek();
                    return Err(ParseError::MissingDelimiter {
                        delimiter: "}",
                        context: "block",
                        line: token.line,
                        column: token.column,
                    });
                }
                _ => self.push_statement(&mut statements)?,
            }
        }
        Ok(Block {
            statements,
            line: open.line,
            column: open.column,
        })
    }

    fn warn_loop_count(&mut self, count: i64, line: u32, column: u32) {
        if count <= 0 {
            self.warn(
                format!("loop with {count} iterations will never execute"),
                line,
                column,
            );
        } else if count > LARGE_LOOP_COUNT {
            self.warn(
                "large loop count may impact performance".to_string(),
                line,
                column,
            );
        }
    }

    // ── Expressions (shared grammar) ────────────────────────────

    fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        self.parse_or()
    }

    fn parse_or(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_and()?;
        while matches!(self.peek_kind(), TokenKind::KwOr | TokenKind::OrOr) {
            let op = self.advance();
            let right = self.parse_and()?;
            left = Expr::Binary {
                op: BinOp::Or,
                left: Box::new(left),
                right: Box::new(right),
                line: op.line,
                column: op.column,
            };
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_comparison()?;
        while matches!(self.peek_kind(), TokenKind::KwAnd | TokenKind::AndAnd) {
            let op = self.advance();
            let right = self.parse_comparison()?;
            left = Expr::Binary {
                op: BinOp::And,
                left: Box::new(left),
                right: Box::new(right),
                line: op.line,
                column: op.column,
            };
        }
        Ok(left)
    }

    fn parse_comparison(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_additive()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::EqEq => BinOp::Eq,
                TokenKind::Neq => BinOp::Neq,
                TokenKind::Lt => BinOp::Lt,
                TokenKind::Gt => BinOp::Gt,
                TokenKind::Lte => BinOp::Lte,
                TokenKind::Gte => BinOp::Gte,
                _ => break,
            };
            let token = self.advance();
            let right = self.parse_additive()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
                line: token.line,
                column: token.column,
            };
        }
        Ok(left)
    }

    fn parse_additive(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Plus => BinOp::Add,
                TokenKind::Minus => BinOp::Sub,
                _ => break,
            };
            let token = self.advance();
            let right = self.parse_unary()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
                line: token.line,
                column: token.column,
            };
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        if matches!(self.peek_kind(), TokenKind::KwNot | TokenKind::Bang) {
            let token = self.advance();
            let operand = self.parse_unary()?;
            return Ok(Expr::Unary {
                op: UnOp::Not,
                operand: Box::new(operand),
                line: token.line,
                column: token.column,
            });
        }
        self.parse_postfix()
    }

    /// Postfix chains of calls and member access, left-associative.
    fn parse_postfix(&mut self) -> Result<Expr, ParseError> {
        let start = self.peek().clone();
        let mut expr = self.parse_primary()?;
        loop {
            match self.peek_kind() {
                TokenKind::LParen => {
                    self.advance();
                    let mut arguments = Vec::new();
                    if !self.check(&TokenKind::RParen) {
                        loop {
                            arguments.push(self.parse_expr()?);
                            if !self.eat(&TokenKind::Comma) {
                                break;
                            }
                        }
                    }
                    self.expect(&TokenKind::RParen, ")", "call arguments")?;
                    expr = Expr::Call {
                        callee: Box::new(expr),
                        arguments,
                        line: start.line,
                        column: start.column,
                    };
                }
                TokenKind::Dot => {
                    self.advance();
                    let property = match self.peek_kind() {
                        TokenKind::Ident(name) => name.clone(),
                        _ => {
                            let token = self.peek();
                            return Err(ParseError::MissingProperty {
                                line: token.line,
                                column: token.column,
                            });
                        }
                    };
                    self.advance();
                    expr = Expr::Member {
                        object: Box::new(expr),
                        property,
                        line: start.line,
                        column: start.column,
                    };
                }
                _ => break,
            }
        }
        Ok(expr)
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let token = self.peek().clone();
        match &token.kind {
            TokenKind::Number(n) => {
                self.advance();
                Ok(Expr::Literal {
                    value: Value::Number(*n),
                    line: token.line,
                    column: token.column,
                })
            }
            TokenKind::Str(s) => {
                self.advance();
                Ok(Expr::Literal {
                    value: Value::Str(s.clone()),
                    line: token.line,
                    column: token.column,
                })
            }
            TokenKind::Ident(name) => {
                self.advance();
                if !KNOWN_NAMES.contains(&name.to_lowercase().as_str()) {
                    self.warn(
                        format!("unknown variable or function '{name}'"),
                        token.line,
                        token.column,
                    );
                }
                Ok(Expr::Identifier {
                    name: name.clone(),
                    line: token.line,
                    column: token.column,
                })
            }
            // Direction keywords double as string literals in the
            // block family: `log forward`, `facing == left`.
            TokenKind::KwForward | TokenKind::KwBack | TokenKind::KwLeft | TokenKind::KwRight
                if self.family == SyntaxFamily::Block =>
            {
                let text = match token.kind {
                    TokenKind::KwForward => "forward",
                    TokenKind::KwBack => "back",
                    TokenKind::KwLeft => "left",
                    _ => "right",
                };
                self.advance();
                Ok(Expr::Literal {
                    value: Value::from(text),
                    line: token.line,
                    column: token.column,
                })
            }
            // In the brace family the scan keywords name the built-in
            // sensor functions.
            TokenKind::KwScan | TokenKind::KwScanLeft | TokenKind::KwScanRight
                if self.family == SyntaxFamily::Brace =>
            {
                let name = match token.kind {
                    TokenKind::KwScan => "scan",
                    TokenKind::KwScanLeft => "scan_left",
                    _ => "scan_right",
                };
                self.advance();
                Ok(Expr::Identifier {
                    name: name.to_string(),
                    line: token.line,
                    column: token.column,
                })
            }
            TokenKind::LParen => {
                self.advance();
                let expr = self.parse_expr()?;
                self.expect(&TokenKind::RParen, ")", "parenthesized expression")?;
                Ok(expr)
            }
            _ => Err(self.unexpected("an expression")),
        }
    }
}
