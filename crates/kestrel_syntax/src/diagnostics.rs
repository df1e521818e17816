//! Diagnostics and error reporting for Kestrel
//!
//! [`CompileError`] is the root "compile failure" every stage reports through. Specialised failures are added
//! by composition through [`ErrorKind`] payloads, never by replacing the root: an illegal-token diagnostic is a
//! `CompileError` whose kind carries the offending [`Token`] and what was expected instead.
//!
//! ## Notes
//! - Diagnostics are immutable data once raised. Stages return them; they never print them.
//! - `CompileError` implements [`miette::Diagnostic`], so a driver can render it with source context.
//!   [`format_error`] is a dependency-free plain-text alternative.

use std::fmt;

use miette::{LabeledSpan, Severity, SourceSpan};

use crate::ast::Span;
use crate::lexer::Token;

/// Result alias used by every fallible front-end stage.
pub type CompileResult<T> = Result<T, CompileError>;

/// A compile-time error with location information
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct CompileError {
    pub message: String,
    pub span: Span,
    pub kind: ErrorKind,
    pub notes: Vec<String>,
    pub hints: Vec<String>,
}

impl CompileError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self::with_kind(ErrorKind::Error, message, span)
    }

    pub fn lexical(message: impl Into<String>, span: Span) -> Self {
        Self::with_kind(ErrorKind::Lexical, message, span)
    }

    pub fn syntax(message: impl Into<String>, span: Span) -> Self {
        Self::with_kind(ErrorKind::Syntax, message, span)
    }

    pub fn semantic(message: impl Into<String>, span: Span) -> Self {
        Self::with_kind(ErrorKind::Semantic, message, span)
    }

    /// A front-end bug or API misuse, not a problem in the user's source.
    pub fn internal(message: impl Into<String>, span: Span) -> Self {
        Self::with_kind(ErrorKind::Internal, message, span)
    }

    /// `token` did not match any production the caller was prepared to accept.
    ///
    /// The token is captured by value, exactly as it was handed to the caller.
    pub fn illegal_token(token: &Token, expected: impl Into<String>) -> Self {
        let expected = expected.into();
        let message = format!("Expected {}, found {}", expected, token.describe());
        Self::with_kind(
            ErrorKind::IllegalToken(IllegalToken {
                token: token.clone(),
                expected,
            }),
            message,
            token.span,
        )
    }

    fn with_kind(kind: ErrorKind, message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
            kind,
            notes: Vec::new(),
            hints: Vec::new(),
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hints.push(hint.into());
        self
    }

    /// Recover the illegal-token payload, if this is an illegal-token diagnostic.
    pub fn as_illegal_token(&self) -> Option<&IllegalToken> {
        match &self.kind {
            ErrorKind::IllegalToken(t) => Some(t),
            _ => None,
        }
    }

    pub fn is_lexical(&self) -> bool {
        matches!(self.kind, ErrorKind::Lexical)
    }
}

/// Category of a [`CompileError`].
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorKind {
    Error,
    Lexical,
    Syntax,
    IllegalToken(IllegalToken),
    Semantic,
    Internal,
}

impl ErrorKind {
    /// Stable diagnostic code, as shown by `miette`.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::Error => "kestrel::error",
            ErrorKind::Lexical => "kestrel::lexical",
            ErrorKind::Syntax => "kestrel::syntax",
            ErrorKind::IllegalToken(_) => "kestrel::illegal_token",
            ErrorKind::Semantic => "kestrel::semantic",
            ErrorKind::Internal => "kestrel::internal",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Error => write!(f, "error"),
            ErrorKind::Lexical => write!(f, "lexical error"),
            ErrorKind::Syntax | ErrorKind::IllegalToken(_) => write!(f, "syntax error"),
            ErrorKind::Semantic => write!(f, "semantic error"),
            ErrorKind::Internal => write!(f, "internal error"),
        }
    }
}

/// Payload of an illegal-token diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IllegalToken {
    /// The offending token, byte-identical to the one the resolver or parser rejected.
    pub token: Token,
    /// What the grammar expected at this position (e.g. `"primitive type"`).
    pub expected: String,
}

impl miette::Diagnostic for CompileError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(self.kind.code()))
    }

    fn severity(&self) -> Option<Severity> {
        Some(Severity::Error)
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        if self.hints.is_empty() && self.notes.is_empty() {
            return None;
        }
        let lines: Vec<String> = self
            .notes
            .iter()
            .map(|n| format!("note: {n}"))
            .chain(self.hints.iter().cloned())
            .collect();
        Some(Box::new(lines.join("\n")))
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let label = self.as_illegal_token().map(|t| format!("expected {}", t.expected));
        let span = SourceSpan::from((self.span.start, self.span.len()));
        Some(Box::new(std::iter::once(LabeledSpan::new_with_span(label, span))))
    }
}

// ============================================================================
// Source positions
// ============================================================================

/// Byte offset → (line, column) lookup for one source text.
///
/// Lines and columns are 1-based; columns count bytes.
#[derive(Debug, Clone)]
pub struct LineIndex {
    line_starts: Vec<usize>,
    len: usize,
}

impl LineIndex {
    pub fn new(source: &str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self {
            line_starts,
            len: source.len(),
        }
    }

    pub fn line_col(&self, offset: usize) -> (usize, usize) {
        let offset = offset.min(self.len);
        let line = match self.line_starts.binary_search(&offset) {
            Ok(exact) => exact,
            Err(next) => next - 1,
        };
        (line + 1, offset - self.line_starts[line] + 1)
    }
}

/// Render an error as plain text with the offending source line and a caret underline.
pub fn format_error(file_name: &str, source: &str, error: &CompileError) -> String {
    let (line_num, col_num, line_text) = get_line_info(source, error.span.start);
    let gutter = line_num.to_string().len();

    let mut out = String::new();
    out.push_str(&format!("{}: {}\n", error.kind, error.message));
    out.push_str(&format!("  --> {}:{}:{}\n", file_name, line_num, col_num));
    out.push_str(&format!("  {:>gutter$} |\n", ""));
    out.push_str(&format!("  {:>gutter$} | {}\n", line_num, line_text));

    let available = line_text.len().saturating_sub(col_num - 1);
    let underline_len = error.span.len().min(available).max(1);
    out.push_str(&format!(
        "  {:>gutter$} | {}{}\n",
        "",
        " ".repeat(col_num - 1),
        "^".repeat(underline_len)
    ));

    for note in &error.notes {
        out.push_str(&format!("  = note: {}\n", note));
    }
    for hint in &error.hints {
        out.push_str(&format!("  = hint: {}\n", hint));
    }
    out
}

/// Get line number, column number, and line text for a byte offset
fn get_line_info(source: &str, offset: usize) -> (usize, usize, &str) {
    let offset = offset.min(source.len());
    let (line_num, col_num) = LineIndex::new(source).line_col(offset);
    let line_start = offset - (col_num - 1);
    let line_end = source[line_start..]
        .find('\n')
        .map(|i| line_start + i)
        .unwrap_or(source.len());
    (line_num, col_num, source[line_start..line_end].trim_end_matches('\r'))
}

// ============================================================================
// Error catalog
// ============================================================================

/// Constructors for diagnostics raised in more than one place.
pub mod errors {
    use super::*;

    pub fn unexpected_end_of_input(expected: &str, at: usize) -> CompileError {
        CompileError::syntax(format!("Unexpected end of input, expected {}", expected), Span::new(at, at))
    }

    pub fn literal_out_of_range(text: &str, ty: &str, span: Span) -> CompileError {
        CompileError::semantic(format!("Literal {} is out of range for type '{}'", text, ty), span)
            .with_hint(if ty == "int" {
                "Add an 'L' suffix to make it a long literal"
            } else {
                "Use a smaller value"
            })
    }

    pub fn duplicate_field(name: &str, span: Span, previous: Span) -> CompileError {
        CompileError::semantic(format!("Duplicate field '{}'", name), span)
            .with_note(format!("previously declared at byte {}", previous.start))
    }

    pub fn duplicate_method(signature: &str, span: Span, previous: Span) -> CompileError {
        CompileError::semantic(format!("Duplicate method '{}'", signature), span)
            .with_note(format!("previously declared at byte {}", previous.start))
            .with_hint("Methods are distinguished by name and erased parameter types")
    }

    pub fn duplicate_parameter(name: &str, span: Span) -> CompileError {
        CompileError::semantic(format!("Duplicate parameter '{}'", name), span)
    }

    pub fn repeated_modifier(modifier: &str, span: Span) -> CompileError {
        CompileError::semantic(format!("Repeated modifier '{}'", modifier), span).with_hint("Remove the duplicate")
    }

    pub fn conflicting_access(first: &str, second: &str, span: Span) -> CompileError {
        CompileError::semantic(
            format!("Conflicting access modifiers '{}' and '{}'", first, second),
            span,
        )
        .with_hint("A member can have at most one of public, protected, private")
    }

    pub fn initializer_type_mismatch(literal: &str, ty: &str, span: Span) -> CompileError {
        CompileError::semantic(format!("Cannot initialize '{}' with {}", ty, literal), span)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::TokenKind;

    #[test]
    fn test_get_line_info() {
        let source = "line 1\nline 2\nline 3";

        let (line, col, text) = get_line_info(source, 0);
        assert_eq!(line, 1);
        assert_eq!(col, 1);
        assert_eq!(text, "line 1");

        let (line, col, text) = get_line_info(source, 7);
        assert_eq!(line, 2);
        assert_eq!(col, 1);
        assert_eq!(text, "line 2");

        let (line, col, text) = get_line_info(source, 10);
        assert_eq!(line, 2);
        assert_eq!(col, 4);
        assert_eq!(text, "line 2");
    }

    #[test]
    fn test_line_index_clamps_past_end() {
        let index = LineIndex::new("ab\ncd\n");
        assert_eq!(index.line_col(4), (2, 2));
        assert_eq!(index.line_col(100), (3, 1));
    }

    #[test]
    fn test_illegal_token_keeps_token_and_message() {
        let token = Token::new(TokenKind::Ident, "foo", Span::new(4, 7));
        let err = CompileError::illegal_token(&token, "primitive type");

        assert_eq!(err.message, "Expected primitive type, found identifier 'foo'");
        assert_eq!(err.span, token.span);
        let payload = err.as_illegal_token().expect("illegal token payload");
        assert_eq!(payload.token, token);
        assert_eq!(payload.expected, "primitive type");
        assert_eq!(err.kind.code(), "kestrel::illegal_token");
    }

    #[test]
    fn test_format_error_underlines_span() {
        let source = "int x;\nfoo y;\n";
        let token = Token::new(TokenKind::Ident, "foo", Span::new(7, 10));
        let err = CompileError::illegal_token(&token, "primitive type").with_hint("Use one of the eight primitives");
        insta::assert_snapshot!(format_error("demo.kst", source, &err), @r"
        syntax error: Expected primitive type, found identifier 'foo'
          --> demo.kst:2:1
            |
          2 | foo y;
            | ^^^
          = hint: Use one of the eight primitives
        ");
    }
}
