//! Provide the canonical vocabulary shared by the utility-types syntax frontend and generator.
//!
//! This crate is intentionally small and dependency-free. It contains the registries that both:
//! - the lexer/parser use to classify reserved words and punctuation, and
//! - the generator uses to recognize utility macros, their options, and the names of the types they derive.
//!
//! ## Notes
//!
//! - This is a “vocabulary” crate: **no IO**, no global mutable state, and no AST types.

pub mod lang;
