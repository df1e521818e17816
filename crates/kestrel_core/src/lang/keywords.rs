//! Define the reserved keyword vocabulary for the Kestrel language.
//!
//! This module is the single source of truth for reserved words: a stable identifier ([`KeywordId`]) plus a
//! const metadata table ([`KEYWORDS`]) that records canonical spellings, categories and provenance.
//!
//! ## Notes
//! - Lookup via [`from_str`] is **case-sensitive**: `Int` is an identifier, `int` is a keyword.
//! - The eight primitive type keywords are also described by [`crate::lang::types`], which maps each of them to
//!   a primitive type.
//!
//! ## Examples
//! ```rust
//! use kestrel_core::lang::keywords::{self, KeywordCategory, KeywordId};
//!
//! assert_eq!(keywords::from_str("static"), Some(KeywordId::Static));
//! assert_eq!(keywords::category(KeywordId::Double), KeywordCategory::PrimitiveType);
//! assert_eq!(keywords::from_str("Static"), None);
//! ```


/// Stable identifier for every reserved keyword.
///
/// ## Notes
/// - The declaration order matches [`KEYWORDS`]; [`info_for`] relies on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordId {
    // Compilation unit structure
    Package,
    Import,

    // Modifiers
    Public,
    Private,
    Protected,
    Static,
    Final,

    // Return-only type
    Void,

    // Primitive types
    Boolean,
    Byte,
    Short,
    Char,
    Int,
    Long,
    Float,
    Double,

    // Literals
    True,
    False,
    Null,

    // Wildcard bounds
    Extends,
    Super,
}

/// High-level grouping for documentation and tooling.
///
/// ## Notes
/// - Categories are metadata only; they do not enforce parsing context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordCategory {
    Structure,
    Modifier,
    PrimitiveType,
    Void,
    Literal,
    Bound,
}

/// Metadata for a keyword.
#[derive(Debug, Clone, Copy)]
pub struct KeywordInfo {
    pub id: KeywordId,
    pub canonical: &'static str,
    pub category: KeywordCategory,
    pub description: &'static str,
}

/// Registry of all keywords, in [`KeywordId`] declaration order.
pub const KEYWORDS: &[KeywordInfo] = &[
    // Compilation unit structure
    info(
        KeywordId::Package,
        "package",
        KeywordCategory::Structure,
        "Declares the package a compilation unit belongs to.",
    ),
    info(
        KeywordId::Import,
        "import",
        KeywordCategory::Structure,
        "Imports a single type or, with `.*`, every type of a package.",
    ),
    // Modifiers
    info(KeywordId::Public, "public", KeywordCategory::Modifier, "Visible everywhere."),
    info(KeywordId::Private, "private", KeywordCategory::Modifier, "Visible to the declaring unit only."),
    info(
        KeywordId::Protected,
        "protected",
        KeywordCategory::Modifier,
        "Visible to the package and to subtypes.",
    ),
    info(KeywordId::Static, "static", KeywordCategory::Modifier, "Belongs to the type, not to instances."),
    info(KeywordId::Final, "final", KeywordCategory::Modifier, "Cannot be reassigned or overridden."),
    // Return-only type
    info(KeywordId::Void, "void", KeywordCategory::Void, "Marks a method that returns no value."),
    // Primitive types
    info(KeywordId::Boolean, "boolean", KeywordCategory::PrimitiveType, "Primitive truth value."),
    info(KeywordId::Byte, "byte", KeywordCategory::PrimitiveType, "Primitive 8-bit signed integer."),
    info(KeywordId::Short, "short", KeywordCategory::PrimitiveType, "Primitive 16-bit signed integer."),
    info(KeywordId::Char, "char", KeywordCategory::PrimitiveType, "Primitive 16-bit code unit."),
    info(KeywordId::Int, "int", KeywordCategory::PrimitiveType, "Primitive 32-bit signed integer."),
    info(KeywordId::Long, "long", KeywordCategory::PrimitiveType, "Primitive 64-bit signed integer."),
    info(KeywordId::Float, "float", KeywordCategory::PrimitiveType, "Primitive 32-bit IEEE 754 float."),
    info(KeywordId::Double, "double", KeywordCategory::PrimitiveType, "Primitive 64-bit IEEE 754 float."),
    // Literals
    info(KeywordId::True, "true", KeywordCategory::Literal, "Boolean literal."),
    info(KeywordId::False, "false", KeywordCategory::Literal, "Boolean literal."),
    info(KeywordId::Null, "null", KeywordCategory::Literal, "The null reference literal."),
    // Wildcard bounds
    info(KeywordId::Extends, "extends", KeywordCategory::Bound, "Upper bound of a wildcard type argument."),
    info(KeywordId::Super, "super", KeywordCategory::Bound, "Lower bound of a wildcard type argument."),
];

/// Canonical spelling.
pub fn as_str(id: KeywordId) -> &'static str {
    info_for(id).canonical
}

/// Category.
pub fn category(id: KeywordId) -> KeywordCategory {
    info_for(id).category
}

/// Full metadata.
///
/// ## Returns
/// - The associated [`KeywordInfo`] from [`KEYWORDS`].
pub fn info_for(id: KeywordId) -> &'static KeywordInfo {
    &KEYWORDS[id as usize]
}

/// Lookup by spelling.
///
/// ## Returns
/// - `Some(KeywordId)` if the spelling is reserved.
/// - `None` otherwise.
pub fn from_str(s: &str) -> Option<KeywordId> {
    KEYWORDS.iter().find(|k| k.canonical == s).map(|k| k.id)
}

// --- helpers -----------------------------------------------------------------

const fn info(
    id: KeywordId,
    canonical: &'static str,
    category: KeywordCategory,
    description: &'static str,
) -> KeywordInfo {
    KeywordInfo {
        id,
        canonical,
        category,
        description,
    }
}
