//! String and character literal scanning for the Kestrel lexer
//!
//! Literals may not span lines. Supported escapes: `\n \t \r \0 \\ \' \"`.

use super::Lexer;
use super::tokens::{Token, TokenKind};
use crate::ast::Span;
use crate::diagnostics::{CompileError, CompileResult};

impl<'a> Lexer<'a> {
    /// Scan a string literal whose opening `"` is already consumed.
    ///
    /// A bad escape does not stop the scan: the literal is consumed up to its closing quote and the first
    /// escape error is returned afterwards.
    pub(super) fn scan_string(&mut self, start: usize) -> CompileResult<Token> {
        let mut bad_escape = None;
        loop {
            match self.peek() {
                None | Some('\n') => {
                    return Err(CompileError::lexical(
                        "Unterminated string literal",
                        Span::new(start, self.current_pos),
                    )
                    .with_hint("String literals cannot span lines; close it with '\"'"));
                }
                Some('"') => {
                    self.advance();
                    break;
                }
                Some('\\') => record_first(&mut bad_escape, self.scan_escape()),
                Some(_) => {
                    self.advance();
                }
            }
        }
        match bad_escape {
            Some(e) => Err(e),
            None => Ok(self.make_token(TokenKind::StringLiteral, start)),
        }
    }

    /// Scan a char literal whose opening `'` is already consumed.
    pub(super) fn scan_char(&mut self, start: usize) -> CompileResult<Token> {
        let mut units = 0usize;
        let mut bad_escape = None;
        loop {
            match self.peek() {
                None | Some('\n') => {
                    return Err(CompileError::lexical(
                        "Unterminated character literal",
                        Span::new(start, self.current_pos),
                    ));
                }
                Some('\'') => {
                    self.advance();
                    break;
                }
                Some('\\') => {
                    record_first(&mut bad_escape, self.scan_escape());
                    units += 1;
                }
                Some(_) => {
                    self.advance();
                    units += 1;
                }
            }
        }

        if let Some(e) = bad_escape {
            return Err(e);
        }
        let span = Span::new(start, self.current_pos);
        match units {
            1 => Ok(self.make_token(TokenKind::CharLiteral, start)),
            0 => Err(CompileError::lexical("Empty character literal", span)),
            _ => Err(CompileError::lexical(
                format!("Character literal '{}' holds more than one character", &self.source[start..self.current_pos]),
                span,
            )
            .with_hint("Use double quotes for a string literal")),
        }
    }

    fn scan_escape(&mut self) -> CompileResult<()> {
        let escape_start = self.current_pos;
        self.advance(); // backslash
        match self.peek() {
            Some(c) if escape_value(c).is_some() => {
                self.advance();
                Ok(())
            }
            Some('\n') | None => Ok(()), // reported as unterminated by the caller
            Some(c) => {
                self.advance();
                Err(CompileError::lexical(
                    format!("Unknown escape sequence '\\{}'", c.escape_debug()),
                    Span::new(escape_start, self.current_pos),
                ))
            }
        }
    }
}

fn record_first(slot: &mut Option<CompileError>, result: CompileResult<()>) {
    if let Err(e) = result {
        slot.get_or_insert(e);
    }
}

fn escape_value(c: char) -> Option<char> {
    match c {
        'n' => Some('\n'),
        't' => Some('\t'),
        'r' => Some('\r'),
        '0' => Some('\0'),
        '\\' => Some('\\'),
        '\'' => Some('\''),
        '"' => Some('"'),
        _ => None,
    }
}

/// Decode the body of a string or char literal (without its quotes).
///
/// Returns `None` if the body holds an escape the lexer would have rejected.
pub(crate) fn unescape(body: &str) -> Option<String> {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            out.push(escape_value(chars.next()?)?);
        } else {
            out.push(c);
        }
    }
    Some(out)
}
