//! Token types for the Kestrel lexer.
//!
//! The lexer uses **registry-backed IDs** for language vocabulary:
//! - `Keyword(KeywordId)` for reserved words
//! - `Punctuation(PunctuationId)` for punctuation tokens
//!
//! ## Notes
//! - `TokenKind` is a closed set and is `Copy`: literal *values* are not stored in the kind, the exact source
//!   spelling lives in [`Token::text`] and resolvers decode it on demand.
//! - Use `crate::token_helpers` for ergonomic token matching at call sites.

use std::fmt;

use crate::ast::Span;
use kestrel_core::lang::keywords::{self, KeywordId};
use kestrel_core::lang::punctuation::{self, PunctuationId};

// ============================================================================
// TOKEN TYPES
// ============================================================================

/// Kind of token produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // ========== Keyword / punctuation (ID-based) ==========
    Keyword(KeywordId),
    Punctuation(PunctuationId),

    // ========== Identifiers and Literals ==========
    Ident,
    IntLiteral,
    FloatLiteral,
    CharLiteral,
    StringLiteral,

    // ========== Special ==========
    Eof,
}

impl TokenKind {
    /// Enumerate every token kind: all keywords, all punctuation, the literal/identifier classes, and `Eof`.
    pub fn all() -> impl Iterator<Item = TokenKind> {
        keywords::KEYWORDS
            .iter()
            .map(|k| TokenKind::Keyword(k.id))
            .chain(punctuation::PUNCTUATION.iter().map(|p| TokenKind::Punctuation(p.id)))
            .chain([
                TokenKind::Ident,
                TokenKind::IntLiteral,
                TokenKind::FloatLiteral,
                TokenKind::CharLiteral,
                TokenKind::StringLiteral,
                TokenKind::Eof,
            ])
    }

    /// Short description used in "expected X, found Y" messages.
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Keyword(id) => format!("keyword '{}'", keywords::as_str(*id)),
            TokenKind::Punctuation(id) => format!("'{}'", punctuation::as_str(*id)),
            TokenKind::Ident => "identifier".to_string(),
            TokenKind::IntLiteral => "integer literal".to_string(),
            TokenKind::FloatLiteral => "floating-point literal".to_string(),
            TokenKind::CharLiteral => "character literal".to_string(),
            TokenKind::StringLiteral => "string literal".to_string(),
            TokenKind::Eof => "end of file".to_string(),
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Keyword(id) => f.write_str(keywords::as_str(*id)),
            TokenKind::Punctuation(id) => f.write_str(punctuation::as_str(*id)),
            TokenKind::Ident => f.write_str("IDENT"),
            TokenKind::IntLiteral => f.write_str("INT"),
            TokenKind::FloatLiteral => f.write_str("FLOAT"),
            TokenKind::CharLiteral => f.write_str("CHAR"),
            TokenKind::StringLiteral => f.write_str("STRING"),
            TokenKind::Eof => f.write_str("EOF"),
        }
    }
}

/// A token: its kind, exact source spelling, and source span.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub span: Span,
}

impl Token {
    /// Construct a new token.
    pub fn new(kind: TokenKind, text: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
        }
    }

    /// The end-of-input marker at byte offset `at`.
    pub fn eof(at: usize) -> Self {
        Self::new(TokenKind::Eof, "", Span::new(at, at))
    }

    /// Description for diagnostics: the kind, plus the spelling for data-bearing tokens.
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::Ident
            | TokenKind::IntLiteral
            | TokenKind::FloatLiteral
            | TokenKind::CharLiteral
            | TokenKind::StringLiteral => format!("{} '{}'", self.kind.describe(), self.text),
            _ => self.kind.describe(),
        }
    }
}

/// Resolve an identifier spelling to a keyword id, if reserved.
pub fn keyword_id(name: &str) -> Option<KeywordId> {
    keywords::from_str(name)
}
