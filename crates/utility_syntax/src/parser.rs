//! Parser for declaration source.
//!
//! Converts a token stream into a [`SourceFile`]: nominal type declarations with their members, stored and
//! computed properties, function outlines, attributes and type annotations. Expression-level code (initializer
//! values, function and accessor bodies) is not parsed; it is kept as raw text or as a span.
//!
//! ## Examples
//!
//! ```rust
//! use utility_syntax::{lexer, parser};
//! use utility_syntax::ast::Decl;
//!
//! let source = "@Partial\nstruct User {\n    let id: String\n    var email: String?\n}\n";
//! let tokens = lexer::lex(source).unwrap();
//! let file = parser::parse(&tokens).unwrap();
//! let Decl::Struct(user) = &file.declarations[0].node else { panic!("expected struct") };
//! assert_eq!(user.name.node, "User");
//! assert_eq!(user.members.len(), 2);
//! ```

use crate::ast::*;
use crate::diagnostics::CompileError;
use crate::lexer::{StringPart, Token, TokenKind};
use utility_core::lang::keywords::{self, KeywordId};
use utility_core::lang::punctuation::PunctuationId;

// NOTE: This module is split across multiple files using `include!` to keep all parser
// methods in the same Rust module (preserving privacy + call patterns) while avoiding
// a single large source file.

include!("parser/core.rs");
include!("parser/helpers.rs");
include!("parser/decl.rs");
include!("parser/types.rs");
include!("parser/expr.rs");
include!("parser/util.rs");
include!("parser/api.rs");
include!("parser/tests.rs");
