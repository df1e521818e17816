//! Canonical language vocabulary for the Kestrel front end.
//!
//! This crate is intentionally small and dependency-free. It holds the closed vocabularies the lexer, parser,
//! resolvers and tooling agree on: reserved keywords, punctuation, and the primitive type table.
//!
//! ## Notes
//!
//! - This is a "vocabulary" crate: **no IO**, no global mutable state, and no syntax-tree types.
//! - Every registry is a `const` table, so it is process-wide and read-only by construction. Jobs running on
//!   different threads share it without locking.

pub mod lang;
