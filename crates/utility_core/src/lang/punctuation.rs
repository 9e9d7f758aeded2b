//! Punctuation vocabulary.
//!
//! This module defines the canonical set of punctuation tokens used by the lexer/parser: delimiters, separators,
//! and the markers that carry meaning in declarations (`?` for optionals, `@` for attributes, `->` for function
//! types, …).
//!
//! ## Notes
//! - Characters that only matter inside expressions (`+`, `*`, `&&`, …) are not registered here; the lexer keeps
//!   them as free-form operator runs.
//!
//! ## Examples
//! ```rust
//! use utility_core::lang::punctuation::{self, PunctuationId};
//!
//! assert_eq!(punctuation::from_str("->"), Some(PunctuationId::Arrow));
//! assert_eq!(punctuation::as_str(PunctuationId::Question), "?");
//! ```

/// Broad syntactic grouping for punctuation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PunctuationCategory {
    /// Brackets, braces, and angle brackets.
    Delimiter,
    /// Separators like `,`, `:` and `;`.
    Separator,
    /// Member access (`.`).
    Access,
    /// Type and attribute markers (`?`, `!`, `@`, `->`, `=`).
    Marker,
}

/// Stable identifier for punctuation tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PunctuationId {
    // Separators
    Comma,
    Colon,
    Semicolon,

    // Access
    Dot,

    // Markers
    Question,
    Exclamation,
    At,
    Eq,
    Arrow,
    Hash,

    // Delimiters
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    LAngle,
    RAngle,
}

/// Metadata for a punctuation token.
#[derive(Debug, Clone, Copy)]
pub struct PunctuationInfo {
    pub id: PunctuationId,
    pub canonical: &'static str,
    pub category: PunctuationCategory,
}

/// Registry of all punctuation tokens.
pub const PUNCTUATION: &[PunctuationInfo] = &[
    info(PunctuationId::Comma, ",", PunctuationCategory::Separator),
    info(PunctuationId::Colon, ":", PunctuationCategory::Separator),
    info(PunctuationId::Semicolon, ";", PunctuationCategory::Separator),
    info(PunctuationId::Dot, ".", PunctuationCategory::Access),
    info(PunctuationId::Question, "?", PunctuationCategory::Marker),
    info(PunctuationId::Exclamation, "!", PunctuationCategory::Marker),
    info(PunctuationId::At, "@", PunctuationCategory::Marker),
    info(PunctuationId::Eq, "=", PunctuationCategory::Marker),
    info(PunctuationId::Arrow, "->", PunctuationCategory::Marker),
    info(PunctuationId::Hash, "#", PunctuationCategory::Marker),
    info(PunctuationId::LParen, "(", PunctuationCategory::Delimiter),
    info(PunctuationId::RParen, ")", PunctuationCategory::Delimiter),
    info(PunctuationId::LBracket, "[", PunctuationCategory::Delimiter),
    info(PunctuationId::RBracket, "]", PunctuationCategory::Delimiter),
    info(PunctuationId::LBrace, "{", PunctuationCategory::Delimiter),
    info(PunctuationId::RBrace, "}", PunctuationCategory::Delimiter),
    info(PunctuationId::LAngle, "<", PunctuationCategory::Delimiter),
    info(PunctuationId::RAngle, ">", PunctuationCategory::Delimiter),
];

/// Canonical spelling.
pub fn as_str(id: PunctuationId) -> &'static str {
    info_for(id).canonical
}

/// Category metadata.
pub fn category(id: PunctuationId) -> PunctuationCategory {
    info_for(id).category
}

/// Full metadata.
///
/// ## Panics
/// - Panics if the registry is missing an entry (a bug in this table).
pub fn info_for(id: PunctuationId) -> &'static PunctuationInfo {
    PUNCTUATION
        .iter()
        .find(|p| p.id == id)
        .expect("punctuation info missing")
}

/// Lookup by spelling.
pub fn from_str(s: &str) -> Option<PunctuationId> {
    PUNCTUATION.iter().find(|p| p.canonical == s).map(|p| p.id)
}

/// Lookup a single-character punctuation token.
///
/// ## Notes
/// - `->` is the only multi-character punctuation and is never returned here.
pub fn from_char(c: char) -> Option<PunctuationId> {
    PUNCTUATION
        .iter()
        .find(|p| {
            let mut chars = p.canonical.chars();
            chars.next() == Some(c) && chars.next().is_none()
        })
        .map(|p| p.id)
}

const fn info(id: PunctuationId, canonical: &'static str, category: PunctuationCategory) -> PunctuationInfo {
    PunctuationInfo {
        id,
        canonical,
        category,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_char_skips_multi_char_spellings() {
        assert_eq!(from_char('-'), None);
        assert_eq!(from_char('?'), Some(PunctuationId::Question));
        assert_eq!(from_char('<'), Some(PunctuationId::LAngle));
    }
}
