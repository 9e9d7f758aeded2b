//! Token types for the declaration lexer.
//!
//! The lexer uses **registry-backed IDs** for vocabulary:
//! - `Keyword(KeywordId)` for reserved and contextual words
//! - `Punctuation(PunctuationId)` for punctuation tokens
//!
//! Operator characters that only matter inside expressions are kept as free-form `Operator` runs.

use std::fmt;

use crate::ast::Span;
use utility_core::lang::keywords::{self, KeywordId};
use utility_core::lang::punctuation::{self, PunctuationId};

/// Kind of token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // ========== Keyword / punctuation (ID-based) ==========
    Keyword(KeywordId),
    Punctuation(PunctuationId),
    /// Run of operator characters (`+`, `&&`, `...`, …).
    Operator(String),

    // ========== Identifiers and Literals ==========
    /// Identifier; backtick-escaped identifiers keep their backticks.
    Ident(String),
    /// Integer literal, as written (`1_000`, `0xFF`).
    Int(String),
    /// Floating-point literal, as written.
    Float(String),
    String(StringToken),

    // ========== Special ==========
    Eof,
}

/// A string literal, split into text and interpolation parts.
#[derive(Debug, Clone, PartialEq)]
pub struct StringToken {
    pub parts: Vec<StringPart>,
    pub multiline: bool,
}

/// Part of a string literal.
#[derive(Debug, Clone, PartialEq)]
pub enum StringPart {
    /// Literal text with escapes already processed.
    Text(String),
    /// Raw source of an interpolated expression (`\( … )`), without the delimiters.
    Interpolation(String),
}

/// A token with its kind and source span.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    /// Whether at least one line break separates this token from the previous one.
    pub newline_before: bool,
}

impl Token {
    /// Construct a new token.
    pub fn new(kind: TokenKind, span: Span, newline_before: bool) -> Self {
        Self {
            kind,
            span,
            newline_before,
        }
    }
}

/// Resolve an identifier spelling to a keyword id, if reserved.
pub fn keyword_id(name: &str) -> Option<KeywordId> {
    keywords::from_str(name)
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Keyword(id) => write!(f, "{}", keywords::as_str(*id)),
            TokenKind::Punctuation(id) => write!(f, "{}", punctuation::as_str(*id)),
            TokenKind::Operator(op) => write!(f, "{}", op),
            TokenKind::Ident(name) => write!(f, "{}", name),
            TokenKind::Int(text) | TokenKind::Float(text) => write!(f, "{}", text),
            TokenKind::String(s) => write!(f, "{}", s),
            TokenKind::Eof => write!(f, "end of file"),
        }
    }
}

impl fmt::Display for StringToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("\"")?;
        for part in &self.parts {
            match part {
                StringPart::Text(text) => f.write_str(&escape_text(text))?,
                StringPart::Interpolation(expr) => write!(f, "\\({})", expr)?,
            }
        }
        f.write_str("\"")
    }
}

/// Re-escape processed string text so it can be written back inside a single-line literal.
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\0' => out.push_str("\\0"),
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            _ => out.push(c),
        }
    }
    out
}
