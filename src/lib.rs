#![forbid(unsafe_code)]
//! utility-types: derive `Partial` and `Readonly` companion types.
//!
//! Given a `struct` or `class` annotated with `@Partial` or `@Readonly`, the generator derives a nested type over the
//! same stored fields plus two conversion initializers, and splices it into the container body. The pipeline is:
//! analyze (validated [`expand::AnalyzedContainer`]) → transform (field policy) → render (text) → splice.
//!
//! ## Panic Policy
//!
//! This codebase follows explicit error handling:
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` and `expand` modules
//!   enforce `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//!
//! - **Generated code**: rendered declarations are plain text; nothing the generator emits is evaluated here.
//!
//! - **True invariants**: If a panic represents a generator bug (logic error), use `.expect("INVARIANT: reason")`
//!   with a clear explanation.

pub mod cli;
pub mod expand;
pub mod render;

pub use utility_syntax::ast;
pub use utility_syntax::diagnostics;
pub use utility_syntax::lexer;
pub use utility_syntax::parser;

pub use expand::driver::{Expansion, FileExpansion, expand_source_file};
pub use expand::splice::splice;
pub use expand::{ExpansionError, expand};
pub use render::{Fragment, RenderConfig};
