//! Syntax frontend for declaration source: lexer, parser, AST, diagnostics.
//!
//! The generator consumes a typed declaration tree; this crate produces it from source text. It understands the
//! declaration surface the utility macros care about (containers, stored and computed properties, attributes with
//! arguments, type annotations) and skips over everything else (function bodies, accessor bodies, initializer
//! expressions) while keeping spans so callers can splice code back into the source.
//!
//! ## Notes
//! - This crate is “syntax-only”: no name resolution and no type checking.
//! - Vocabulary identity (keywords/punctuation) comes from `utility_core::lang` registries.
//!
//! ## Examples
//! ```rust
//! use utility_syntax::{lexer, parser};
//!
//! let tokens = lexer::lex("struct User {\n    var id: String\n}\n").unwrap();
//! let file = parser::parse(&tokens).unwrap();
//! assert_eq!(file.declarations.len(), 1);
//! ```

pub mod ast;
pub mod diagnostics;
pub mod lexer;
pub mod parser;
pub mod token_helpers;
