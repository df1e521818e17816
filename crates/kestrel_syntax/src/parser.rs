//! Parser for the Kestrel language
//!
//! Converts a token sequence into a [`CompilationUnit`]:
//!
//! ```text
//! CompilationUnit := [Package] {Import} {Member}
//! Package         := "package" QualifiedName ";"
//! Import          := "import" QualifiedName ["." "*"] ";"
//! Member          := {Modifier} (Type | "void") Ident (FieldRest | MethodRest)
//! FieldRest       := ["=" Literal] ";"
//! MethodRest      := "(" [Param {"," Param}] ")" ";"
//! Param           := ["final"] Type Ident
//! ```
//!
//! Types are delegated to [`crate::resolver::TypeResolver`], modifiers and literals to the single-token
//! resolvers.
//!
//! ## Examples
//!
//! ```rust
//! use kestrel_syntax::{lexer, parser};
//!
//! let source = "package demo;\npublic int area(int w, int h);\n";
//! let tokens = lexer::lex(source).unwrap();
//! let unit = parser::parse(&tokens).unwrap();
//! assert_eq!(unit.members.len(), 1);
//! ```

use std::sync::atomic::{AtomicBool, Ordering};

use crate::ast::*;
use crate::diagnostics::{CompileError, CompileResult};
use crate::func::try_map;
use crate::lexer::{Token, TokenKind};
use crate::resolver::{ModifierResolver, TypeResolver, expect_ident, expect_punct, qualified_name, resolve_literal};
use crate::stream::TokenStream;
use kestrel_core::lang::keywords::KeywordId;
use kestrel_core::lang::punctuation::PunctuationId;

// NOTE: This module is split across multiple files using `include!` to keep all parser
// methods in the same Rust module (preserving privacy + call patterns) while avoiding
// a single large source file.

include!("parser/core.rs");
include!("parser/helpers.rs");
include!("parser/decl.rs");
include!("parser/api.rs");
include!("parser/tests.rs");
