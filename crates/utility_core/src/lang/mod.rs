//! Declaration-language vocabulary registries.
//!
//! Callers work with **stable IDs** (`KeywordId`, `PunctuationId`, `UtilityMacroId`) and look up spellings and
//! metadata via const registry tables, instead of comparing strings all over the frontend and generator.
//!
//! ## Notes
//! - Registries are **pure**: no AST types, no IO, no side effects.
//! - The lexer/parser enforce syntax; registries only provide spellings and metadata.
//!
//! ## Examples
//! ```rust
//! use utility_core::lang::keywords::{self, KeywordId};
//!
//! assert_eq!(keywords::from_str("struct"), Some(KeywordId::Struct));
//! assert_eq!(keywords::as_str(KeywordId::Struct), "struct");
//! ```

pub mod keywords;
pub mod macros;
pub mod punctuation;
