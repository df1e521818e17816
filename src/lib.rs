#![forbid(unsafe_code)]
//! Kestrel compiler front end
//!
//! Kestrel declarations (a package clause, imports, fields and method signatures) are lexed, parsed into a
//! typed tree and checked. This crate is the driver: it runs one cancellable job per compilation unit and
//! exposes the `kestrel` CLI. The language itself lives in `kestrel_syntax` (lexer, resolvers, parser,
//! diagnostics) and `kestrel_core` (vocabulary registries).
//!
//! ## Panic Policy
//!
//! This codebase follows explicit error handling:
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` module enforces
//!   `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//!
//! - **True invariants**: If a panic represents a front-end bug (logic error), use `.expect("INVARIANT: reason")`
//!   with a clear explanation.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use kestrel::config::ParseConfig;
//! use kestrel::jobs::{JobOutcome, ParseJob, SourceHandle};
//!
//! let job = ParseJob::new(SourceHandle::inline("shapes.kst", "package geo;\ndouble area();"), Arc::new(ParseConfig::default()));
//! match job.run() {
//!     JobOutcome::Completed { unit, diagnostics, .. } => {
//!         assert!(diagnostics.is_empty());
//!         assert_eq!(unit.members.len(), 1);
//!     }
//!     other => panic!("unexpected outcome: {other:?}"),
//! }
//! ```

pub mod cli;
pub mod config;
pub mod jobs;
pub mod version;

pub use kestrel_syntax::ast;
pub use kestrel_syntax::checks;
pub use kestrel_syntax::diagnostics;
pub use kestrel_syntax::func;
pub use kestrel_syntax::lexer;
pub use kestrel_syntax::parser;
pub use kestrel_syntax::resolver;
pub use kestrel_syntax::stream;
