//! Syntax frontend for the Kestrel language: lexer, tree model, resolvers, parser, diagnostics.
//!
//! This crate is dependency-light and does no IO. Orchestration (reading sources, running jobs, cancelling
//! them) lives in the `kestrel` crate.
//!
//! ## Notes
//! - Vocabulary identity (keywords/punctuation/primitive types) comes from `kestrel_core::lang` registries.
//! - Every fallible stage reports through [`diagnostics::CompileError`]; composition goes through the
//!   contracts in [`func`] so the original diagnostic always reaches the top unaltered.
//!
//! ## Examples
//! ```rust
//! use kestrel_syntax::{checks, lexer, parser};
//!
//! let tokens = lexer::lex("int x;\nint x;\n").unwrap();
//! let unit = parser::parse(&tokens).unwrap();
//! let diagnostics = checks::check_unit(&unit, parser::DiagnosticPolicy::Accumulate);
//! assert_eq!(diagnostics[0].message, "Duplicate field 'x'");
//! ```
//!
//! ## See also
//! - `kestrel_core::lang` for the registry-backed language vocabulary.

pub mod ast;
pub mod checks;
pub mod diagnostics;
pub mod func;
pub mod lexer;
pub mod parser;
pub mod resolver;
pub mod stream;
pub mod token_helpers;
