//! Low-level source scanner shared by both lexers.
//!
//! Owns the character cursor and 1-based position tracking, and scans
//! the literal forms both families share: numbers, quoted strings with
//! escapes, and identifiers. Family-specific dispatch (keywords,
//! comments, operators) stays in the lexers.

use autodrone_core::LexError;

pub(crate) struct Scanner {
    chars: Vec<char>,
    pos: usize,
    line: u32,
    column: u32,
}

impl Scanner {
    pub(crate) fn new(source: &str) -> Scanner {
        Scanner {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    pub(crate) fn is_eof(&self) -> bool {
        self.pos >= self.chars.len()
    }

    pub(crate) fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    pub(crate) fn peek_next(&self) -> Option<char> {
        self.chars.get(self.pos + 1).copied()
    }

    /// Position of the *next* character to be consumed.
    pub(crate) fn position(&self) -> (u32, u32) {
        (self.line, self.column)
    }

    /// Consume one character, tracking line and column.
    pub(crate) fn advance(&mut self) -> Option<char> {
        let ch = self.chars.get(self.pos).copied()?;
        self.pos += 1;
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    /// Consume the next character if it equals `expected`.
    pub(crate) fn advance_if(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Scan `\d+(\.\d+)?`. The caller guarantees the next character is
    /// a digit.
    pub(crate) fn scan_number(&mut self) -> f64 {
        let mut text = String::new();
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            text.push(self.advance().unwrap());
        }
        if self.peek() == Some('.') && matches!(self.peek_next(), Some(c) if c.is_ascii_digit()) {
            text.push(self.advance().unwrap());
            while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                text.push(self.advance().unwrap());
            }
        }
        // The scanned text is a valid decimal by construction.
        text.parse().expect("digits parse as f64")
    }

    /// Scan a string literal. The caller has already consumed the
    /// opening quote; `quote` is that character, and `line`/`column`
    /// point at it for error reporting.
    pub(crate) fn scan_string(
        &mut self,
        quote: char,
        line: u32,
        column: u32,
    ) -> Result<String, LexError> {
        let mut text = String::new();
        loop {
            match self.advance() {
                None | Some('\n') => {
                    return Err(LexError::UnterminatedString { line, column });
                }
                Some(c) if c == quote => return Ok(text),
                Some('\\') => match self.advance() {
                    Some('n') => text.push('\n'),
                    Some('t') => text.push('\t'),
                    Some('\\') => text.push('\\'),
                    Some('"') => text.push('"'),
                    Some('\'') => text.push('\''),
                    // Unknown escapes keep the character as written.
                    Some(other) => text.push(other),
                    None => {
                        return Err(LexError::UnterminatedString { line, column });
                    }
                },
                Some(c) => text.push(c),
            }
        }
    }

    /// Scan `[A-Za-z_][A-Za-z0-9_]*`. The caller guarantees the next
    /// character starts an identifier.
    pub(crate) fn scan_ident(&mut self) -> String {
        let mut text = String::new();
        while matches!(self.peek(), Some(c) if c.is_ascii_alphanumeric() || c == '_') {
            text.push(self.advance().unwrap());
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_tracking_across_newlines() {
        let mut s = Scanner::new("ab\ncd");
        assert_eq!(s.position(), (1, 1));
        s.advance();
        s.advance();
        assert_eq!(s.position(), (1, 3));
        s.advance(); // newline
        assert_eq!(s.position(), (2, 1));
    }

    #[test]
    fn test_number_with_fraction() {
        let mut s = Scanner::new("12.5x");
        assert_eq!(s.scan_number(), 12.5);
        assert_eq!(s.peek(), Some('x'));
    }

    #[test]
    fn test_number_dot_without_fraction_stops() {
        let mut s = Scanner::new("3.foo");
        assert_eq!(s.scan_number(), 3.0);
        assert_eq!(s.peek(), Some('.'));
    }

    #[test]
    fn test_string_escapes() {
        let mut s = Scanner::new(r#"a\tb\\c" rest"#);
        let text = s.scan_string('"', 1, 1).unwrap();
        assert_eq!(text, "a\tb\\c");
    }

    #[test]
    fn test_unterminated_string_reports_open_quote() {
        let mut s = Scanner::new("abc");
        assert_eq!(
            s.scan_string('"', 2, 7),
            Err(LexError::UnterminatedString { line: 2, column: 7 })
        );
    }

    #[test]
    fn test_ident_charset() {
        let mut s = Scanner::new("foo_9-bar");
        assert_eq!(s.scan_ident(), "foo_9");
        assert_eq!(s.peek(), Some('-'));
    }
}
