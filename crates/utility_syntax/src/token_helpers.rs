//! Small helper APIs for working with `Token` / `TokenKind`.
//!
//! These helpers keep `matches!(...)` noise out of the parser and make the ID-based tokens easy to query.

use crate::lexer::{Token, TokenKind};
use utility_core::lang::keywords::KeywordId;
use utility_core::lang::punctuation::PunctuationId;

impl TokenKind {
    /// Return the keyword id, if this is a keyword token.
    pub fn keyword_id(&self) -> Option<KeywordId> {
        match self {
            TokenKind::Keyword(id) => Some(*id),
            _ => None,
        }
    }

    /// Return `true` if this is the given keyword.
    pub fn is_keyword(&self, id: KeywordId) -> bool {
        matches!(self, TokenKind::Keyword(k) if *k == id)
    }

    /// Return the punctuation id, if this is a punctuation token.
    pub fn punctuation_id(&self) -> Option<PunctuationId> {
        match self {
            TokenKind::Punctuation(id) => Some(*id),
            _ => None,
        }
    }

    /// Return `true` if this is the given punctuation.
    pub fn is_punctuation(&self, id: PunctuationId) -> bool {
        matches!(self, TokenKind::Punctuation(p) if *p == id)
    }

    /// Return `true` if this is an operator run spelled exactly `op`.
    pub fn is_operator(&self, op: &str) -> bool {
        matches!(self, TokenKind::Operator(o) if o == op)
    }

    /// Spelling usable as a name: identifiers, and contextual keywords used as identifiers.
    pub fn name_spelling(&self) -> Option<&str> {
        match self {
            TokenKind::Ident(name) => Some(name),
            TokenKind::Keyword(id) if utility_core::lang::keywords::is_contextual(*id) => {
                Some(utility_core::lang::keywords::as_str(*id))
            }
            _ => None,
        }
    }
}

impl Token {
    /// Convenience wrapper for `self.kind.keyword_id()`.
    pub fn keyword_id(&self) -> Option<KeywordId> {
        self.kind.keyword_id()
    }

    /// Convenience wrapper for `self.kind.punctuation_id()`.
    pub fn punctuation_id(&self) -> Option<PunctuationId> {
        self.kind.punctuation_id()
    }
}
