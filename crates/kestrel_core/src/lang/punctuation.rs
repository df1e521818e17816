//! Punctuation vocabulary.
//!
//! This module defines the canonical set of punctuation tokens used by the lexer/parser: delimiters,
//! separators, access markers and the few markers used by type arguments.
//!
//! ## Notes
//! - Every punctuation token is a single ASCII character. `<` and `>` are always separate tokens, so nested
//!   type arguments such as `Map<String, List<Integer>>` never need token splitting.
//! - This module is vocabulary only (spellings + metadata). It does not tokenize source text.
//!
//! ## Examples
//! ```rust
//! use kestrel_core::lang::punctuation::{self, PunctuationId};
//!
//! assert_eq!(punctuation::from_char(';'), Some(PunctuationId::Semicolon));
//! assert_eq!(punctuation::as_str(PunctuationId::LAngle), "<");
//! ```


/// Broad syntactic grouping for punctuation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PunctuationCategory {
    /// Brackets, parentheses and angle brackets.
    Delimiter,
    /// Separators like `,` and `;`.
    Separator,
    /// Access/path markers like `.`.
    Access,
    /// Misc markers like `=`, `*` and `?`.
    Marker,
}

/// Stable identifier for punctuation tokens.
///
/// ## Notes
/// - The declaration order matches [`PUNCTUATION`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PunctuationId {
    // Separators
    Semicolon,
    Comma,

    // Access
    Dot,

    // Delimiters
    LParen,
    RParen,
    LBracket,
    RBracket,
    LAngle,
    RAngle,

    // Markers
    Eq,
    Star,
    Question,
}

/// Metadata for a punctuation token.
#[derive(Debug, Clone, Copy)]
pub struct PunctuationInfo {
    pub id: PunctuationId,
    pub canonical: &'static str,
    pub category: PunctuationCategory,
}

/// Registry of all punctuation tokens, in [`PunctuationId`] declaration order.
pub const PUNCTUATION: &[PunctuationInfo] = &[
    // Separators
    info(PunctuationId::Semicolon, ";", PunctuationCategory::Separator),
    info(PunctuationId::Comma, ",", PunctuationCategory::Separator),
    // Access
    info(PunctuationId::Dot, ".", PunctuationCategory::Access),
    // Delimiters
    info(PunctuationId::LParen, "(", PunctuationCategory::Delimiter),
    info(PunctuationId::RParen, ")", PunctuationCategory::Delimiter),
    info(PunctuationId::LBracket, "[", PunctuationCategory::Delimiter),
    info(PunctuationId::RBracket, "]", PunctuationCategory::Delimiter),
    info(PunctuationId::LAngle, "<", PunctuationCategory::Delimiter),
    info(PunctuationId::RAngle, ">", PunctuationCategory::Delimiter),
    // Markers
    info(PunctuationId::Eq, "=", PunctuationCategory::Marker),
    info(PunctuationId::Star, "*", PunctuationCategory::Marker),
    info(PunctuationId::Question, "?", PunctuationCategory::Marker),
];

/// Return the canonical spelling for a punctuation token.
pub fn as_str(id: PunctuationId) -> &'static str {
    info_for(id).canonical
}

/// Return the category for a punctuation token.
pub fn category(id: PunctuationId) -> PunctuationCategory {
    info_for(id).category
}

/// Return the full metadata entry for a punctuation token.
pub fn info_for(id: PunctuationId) -> &'static PunctuationInfo {
    &PUNCTUATION[id as usize]
}

/// Resolve a punctuation spelling to its identifier.
pub fn from_str(s: &str) -> Option<PunctuationId> {
    PUNCTUATION.iter().find(|p| p.canonical == s).map(|p| p.id)
}

/// Resolve a single character to its punctuation identifier.
///
/// This is the lexer's entrypoint: every punctuation token is exactly one character long.
pub fn from_char(c: char) -> Option<PunctuationId> {
    PUNCTUATION
        .iter()
        .find(|p| p.canonical.len() == 1 && p.canonical.starts_with(c))
        .map(|p| p.id)
}

const fn info(id: PunctuationId, canonical: &'static str, category: PunctuationCategory) -> PunctuationInfo {
    PunctuationInfo {
        id,
        canonical,
        category,
    }
}
