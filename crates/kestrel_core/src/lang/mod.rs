//! Kestrel language vocabulary registries.
//!
//! This module is the "front door" for language-level vocabulary: reserved keywords, punctuation, and
//! primitive types.
//!
//! The design goal is to avoid stringly-typed checks scattered across the front end. Callers work with
//! **stable IDs** (e.g. `KeywordId`, `PunctuationId`) and look up spellings/metadata via registry tables.
//!
//! ## Notes
//! - Registries are intentionally **pure**: no tree types, no IO, no side effects.
//! - Every registry is ordered exactly like its ID enum, so `TABLE[id as usize]` is the entry for `id`.
//!   The guardrail tests in `tests/lang_registry_guardrails.rs` enforce this.
//!
//! ## Examples
//! ```rust
//! use kestrel_core::lang::keywords::{self, KeywordId};
//!
//! assert_eq!(keywords::from_str("int"), Some(KeywordId::Int));
//! assert_eq!(keywords::as_str(KeywordId::Int), "int");
//! ```

pub mod keywords;
pub mod punctuation;
pub mod types;
