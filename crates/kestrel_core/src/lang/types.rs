//! Primitive type vocabulary.
//!
//! The eight primitive types form a closed set. Each member is recognized by exactly one keyword, and every
//! keyword in [`crate::lang::keywords::KeywordCategory::PrimitiveType`] maps back to exactly one member.
//!
//! ## Notes
//! - This module is vocabulary only (spellings, keywords, widths). Resolution of tokens to primitive types
//!   lives in `kestrel_syntax::resolver`.
//!
//! ## Examples
//! ```rust
//! use kestrel_core::lang::keywords::KeywordId;
//! use kestrel_core::lang::types::{self, PrimitiveType};
//!
//! assert_eq!(types::from_keyword(KeywordId::Long), Some(PrimitiveType::Long));
//! assert_eq!(types::keyword(PrimitiveType::Char), KeywordId::Char);
//! assert_eq!(types::from_keyword(KeywordId::Void), None);
//! ```

use super::keywords::KeywordId;

/// Stable identifier for the primitive types.
///
/// ## Notes
/// - The declaration order matches [`PRIMITIVE_TYPES`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PrimitiveType {
    Boolean,
    Byte,
    Short,
    Char,
    Int,
    Long,
    Float,
    Double,
}

/// Value category of a primitive type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveCategory {
    Boolean,
    Integral,
    FloatingPoint,
}

/// Metadata for a primitive type.
#[derive(Debug, Clone, Copy)]
pub struct PrimitiveTypeInfo {
    pub id: PrimitiveType,
    /// The one keyword that denotes this type.
    pub keyword: KeywordId,
    pub category: PrimitiveCategory,
}

/// Registry of primitive types, in [`PrimitiveType`] declaration order.
pub const PRIMITIVE_TYPES: &[PrimitiveTypeInfo] = &[
    info(PrimitiveType::Boolean, KeywordId::Boolean, PrimitiveCategory::Boolean),
    info(PrimitiveType::Byte, KeywordId::Byte, PrimitiveCategory::Integral),
    info(PrimitiveType::Short, KeywordId::Short, PrimitiveCategory::Integral),
    info(PrimitiveType::Char, KeywordId::Char, PrimitiveCategory::Integral),
    info(PrimitiveType::Int, KeywordId::Int, PrimitiveCategory::Integral),
    info(PrimitiveType::Long, KeywordId::Long, PrimitiveCategory::Integral),
    info(PrimitiveType::Float, KeywordId::Float, PrimitiveCategory::FloatingPoint),
    info(PrimitiveType::Double, KeywordId::Double, PrimitiveCategory::FloatingPoint),
];

impl PrimitiveType {
    /// Every member of the closed set, in declaration order.
    pub const ALL: [PrimitiveType; 8] = [
        PrimitiveType::Boolean,
        PrimitiveType::Byte,
        PrimitiveType::Short,
        PrimitiveType::Char,
        PrimitiveType::Int,
        PrimitiveType::Long,
        PrimitiveType::Float,
        PrimitiveType::Double,
    ];

    /// Return `true` for the integral and floating-point types.
    pub fn is_numeric(self) -> bool {
        category(self) != PrimitiveCategory::Boolean
    }
}

/// Canonical spelling (the keyword text).
pub fn as_str(id: PrimitiveType) -> &'static str {
    super::keywords::as_str(keyword(id))
}

/// The keyword that denotes `id`.
pub fn keyword(id: PrimitiveType) -> KeywordId {
    info_for(id).keyword
}

/// Value category.
pub fn category(id: PrimitiveType) -> PrimitiveCategory {
    info_for(id).category
}

/// Full metadata.
pub fn info_for(id: PrimitiveType) -> &'static PrimitiveTypeInfo {
    &PRIMITIVE_TYPES[id as usize]
}

/// Map a keyword to the primitive type it denotes.
///
/// ## Returns
/// - `Some(PrimitiveType)` for the eight primitive keywords.
/// - `None` for every other keyword (including `void`).
pub fn from_keyword(kw: KeywordId) -> Option<PrimitiveType> {
    PRIMITIVE_TYPES.iter().find(|t| t.keyword == kw).map(|t| t.id)
}

/// Lookup by spelling.
pub fn from_str(s: &str) -> Option<PrimitiveType> {
    super::keywords::from_str(s).and_then(from_keyword)
}

impl std::fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(as_str(*self))
    }
}

const fn info(
    id: PrimitiveType,
    keyword: KeywordId,
    category: PrimitiveCategory,
) -> PrimitiveTypeInfo {
    PrimitiveTypeInfo { id, keyword, category }
}
