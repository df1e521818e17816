//! Number scanning for the Kestrel lexer
//!
//! Handles integer and floating-point literals. The lexer only checks the *shape* of a literal; its value (and
//! whether it fits the target type) is decoded later by `resolver::resolve_literal` from the token text.

use super::Lexer;
use super::tokens::{Token, TokenKind};
use crate::ast::Span;
use crate::diagnostics::{CompileError, CompileResult};

impl<'a> Lexer<'a> {
    /// Scan a numeric literal whose first character (a digit, or `.` followed by a digit) is already consumed.
    pub(super) fn scan_number(&mut self, start: usize) -> CompileResult<Token> {
        let mut is_float = self.source[start..].starts_with('.');

        self.eat_digits();

        // Decimal part
        if !is_float && self.peek() == Some('.') && self.peek_next().is_some_and(|c| c.is_ascii_digit()) {
            is_float = true;
            self.advance(); // consume .
            self.eat_digits();
        }

        // Exponent part
        if matches!(self.peek(), Some('e' | 'E')) {
            is_float = true;
            self.advance();
            if matches!(self.peek(), Some('+' | '-')) {
                self.advance();
            }
            if !self.peek().is_some_and(|c| c.is_ascii_digit()) {
                return Err(self.invalid_number(start, "exponent has no digits"));
            }
            self.eat_digits();
        }

        // Type suffix
        let kind = match self.peek() {
            Some('L' | 'l') => {
                self.advance();
                if is_float {
                    return Err(self.invalid_number(start, "'L' suffix on a floating-point literal"));
                }
                TokenKind::IntLiteral
            }
            Some('f' | 'F' | 'd' | 'D') => {
                self.advance();
                TokenKind::FloatLiteral
            }
            _ if is_float => TokenKind::FloatLiteral,
            _ => TokenKind::IntLiteral,
        };

        // `12abc` is one malformed literal, not a number followed by an identifier
        if self.peek().is_some_and(|c| c.is_ascii_alphanumeric() || c == '_') {
            while self.peek().is_some_and(|c| c.is_ascii_alphanumeric() || c == '_') {
                self.advance();
            }
            return Err(self.invalid_number(start, "unexpected characters after the number"));
        }

        let text = &self.source[start..self.current_pos];
        if text.ends_with('_') || text.contains("_.") || text.contains("._") {
            return Err(self.invalid_number(start, "'_' must sit between digits"));
        }

        Ok(self.make_token(kind, start))
    }

    fn eat_digits(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() || c == '_' {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn invalid_number(&self, start: usize, reason: &str) -> CompileError {
        CompileError::lexical(
            format!(
                "Invalid numeric literal '{}': {}",
                &self.source[start..self.current_pos],
                reason
            ),
            Span::new(start, self.current_pos),
        )
    }
}

#[cfg(test)]
mod tests {
    use crate::lexer::{TokenKind, lex};

    fn single(source: &str) -> (TokenKind, String) {
        let tokens = lex(source).unwrap_or_else(|e| panic!("lex({source:?}) failed: {e:?}"));
        assert_eq!(tokens.len(), 2, "expected one token for {source:?}");
        (tokens[0].kind, tokens[0].text.clone())
    }

    #[test]
    fn test_integer_shapes() {
        assert_eq!(single("42"), (TokenKind::IntLiteral, "42".to_string()));
        assert_eq!(single("1_000_000"), (TokenKind::IntLiteral, "1_000_000".to_string()));
        assert_eq!(single("9L"), (TokenKind::IntLiteral, "9L".to_string()));
    }

    #[test]
    fn test_float_shapes() {
        for source in ["3.14", ".5", "1e10", "2.5E-3", "1f", "7.0d", "6.02e+23D"] {
            assert_eq!(single(source), (TokenKind::FloatLiteral, source.to_string()));
        }
    }

    #[test]
    fn test_dot_after_integer_without_digit_is_punctuation() {
        let tokens = lex("1.x").unwrap();
        let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(kinds.len(), 4);
        assert_eq!(kinds[0], TokenKind::IntLiteral);
        assert_eq!(tokens[1].text, ".");
        assert_eq!(kinds[2], TokenKind::Ident);
    }

    #[test]
    fn test_malformed_numbers() {
        for source in ["1e", "2.5L", "12abc", "1_", "1_.5"] {
            let errs = lex(source).unwrap_err();
            assert_eq!(errs.len(), 1, "{source:?} should produce one error, got {errs:?}");
            assert!(errs[0].message.starts_with("Invalid numeric literal"), "{}", errs[0].message);
        }
    }
}
