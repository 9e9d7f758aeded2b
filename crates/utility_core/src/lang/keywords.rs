//! Define the reserved and contextual keyword vocabulary of the declaration language.
//!
//! This module is the single source of truth for keywords: a stable identifier ([`KeywordId`]) plus a const
//! metadata table ([`KEYWORDS`]) that records canonical spellings, categories, and whether the word is only
//! reserved in specific positions.
//!
//! ## Notes
//! - Lookup via [`from_str`] is **case-sensitive** (`Self` and `self` are different keywords).
//! - Contextual keywords (`open`, `lazy`, `final`, …) are lexed as keywords but the parser also accepts them
//!   wherever an identifier is expected; see [`is_contextual`].
//!
//! ## Examples
//! ```rust
//! use utility_core::lang::keywords::{self, KeywordId};
//!
//! assert_eq!(keywords::from_str("let"), Some(KeywordId::Let));
//! assert!(keywords::is_access_modifier(KeywordId::Public));
//! assert!(!keywords::is_access_modifier(KeywordId::Static));
//! ```

/// Stable identifier for every keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordId {
    // Declarations
    Import,
    Struct,
    Class,
    Enum,
    Protocol,
    Extension,
    Actor,
    Typealias,
    Func,
    Init,
    Deinit,
    Subscript,
    Case,

    // Bindings
    Let,
    Var,

    // Access levels
    Public,
    Open,
    Internal,
    Fileprivate,
    Private,

    // Other declaration modifiers
    Static,
    Final,
    Lazy,
    Weak,
    Unowned,
    Mutating,
    Nonmutating,
    Override,
    Required,
    Convenience,

    // Clauses
    Where,

    // Receivers / literals
    SelfValue,
    SelfType,
    True,
    False,
    Nil,
}

/// High-level grouping for documentation and tooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordCategory {
    Declaration,
    Binding,
    Access,
    Modifier,
    Clause,
    Literal,
}

/// Metadata for a keyword.
///
/// ## Notes
/// - `canonical` is the only accepted spelling and the one used when rendering generated code.
/// - `contextual` keywords may also be used as plain identifiers (field names, labels, …).
#[derive(Debug, Clone, Copy)]
pub struct KeywordInfo {
    pub id: KeywordId,
    pub canonical: &'static str,
    pub category: KeywordCategory,
    pub contextual: bool,
}

/// Registry of all keywords.
///
/// ## Notes
/// - The ordering is not semantically meaningful, but is grouped for readability.
pub const KEYWORDS: &[KeywordInfo] = &[
    // Declarations
    reserved(KeywordId::Import, "import", KeywordCategory::Declaration),
    reserved(KeywordId::Struct, "struct", KeywordCategory::Declaration),
    reserved(KeywordId::Class, "class", KeywordCategory::Declaration),
    reserved(KeywordId::Enum, "enum", KeywordCategory::Declaration),
    reserved(KeywordId::Protocol, "protocol", KeywordCategory::Declaration),
    reserved(KeywordId::Extension, "extension", KeywordCategory::Declaration),
    contextual(KeywordId::Actor, "actor", KeywordCategory::Declaration),
    reserved(KeywordId::Typealias, "typealias", KeywordCategory::Declaration),
    reserved(KeywordId::Func, "func", KeywordCategory::Declaration),
    reserved(KeywordId::Init, "init", KeywordCategory::Declaration),
    reserved(KeywordId::Deinit, "deinit", KeywordCategory::Declaration),
    reserved(KeywordId::Subscript, "subscript", KeywordCategory::Declaration),
    reserved(KeywordId::Case, "case", KeywordCategory::Declaration),
    // Bindings
    reserved(KeywordId::Let, "let", KeywordCategory::Binding),
    reserved(KeywordId::Var, "var", KeywordCategory::Binding),
    // Access levels
    reserved(KeywordId::Public, "public", KeywordCategory::Access),
    contextual(KeywordId::Open, "open", KeywordCategory::Access),
    reserved(KeywordId::Internal, "internal", KeywordCategory::Access),
    reserved(KeywordId::Fileprivate, "fileprivate", KeywordCategory::Access),
    reserved(KeywordId::Private, "private", KeywordCategory::Access),
    // Other declaration modifiers
    reserved(KeywordId::Static, "static", KeywordCategory::Modifier),
    contextual(KeywordId::Final, "final", KeywordCategory::Modifier),
    contextual(KeywordId::Lazy, "lazy", KeywordCategory::Modifier),
    contextual(KeywordId::Weak, "weak", KeywordCategory::Modifier),
    contextual(KeywordId::Unowned, "unowned", KeywordCategory::Modifier),
    contextual(KeywordId::Mutating, "mutating", KeywordCategory::Modifier),
    contextual(KeywordId::Nonmutating, "nonmutating", KeywordCategory::Modifier),
    contextual(KeywordId::Override, "override", KeywordCategory::Modifier),
    contextual(KeywordId::Required, "required", KeywordCategory::Modifier),
    contextual(KeywordId::Convenience, "convenience", KeywordCategory::Modifier),
    // Clauses
    reserved(KeywordId::Where, "where", KeywordCategory::Clause),
    // Receivers / literals
    reserved(KeywordId::SelfValue, "self", KeywordCategory::Literal),
    reserved(KeywordId::SelfType, "Self", KeywordCategory::Literal),
    reserved(KeywordId::True, "true", KeywordCategory::Literal),
    reserved(KeywordId::False, "false", KeywordCategory::Literal),
    reserved(KeywordId::Nil, "nil", KeywordCategory::Literal),
];

/// Canonical spelling.
///
/// ## Parameters
/// - `id`: Keyword identifier.
///
/// ## Returns
/// - The canonical spelling (as used in generated code).
pub fn as_str(id: KeywordId) -> &'static str {
    info_for(id).canonical
}

/// Category metadata.
pub fn category(id: KeywordId) -> KeywordCategory {
    info_for(id).category
}

/// Return `true` if the keyword may also be used as a plain identifier.
pub fn is_contextual(id: KeywordId) -> bool {
    info_for(id).contextual
}

/// Return `true` if the keyword is an access-level modifier (`public`, `private`, …).
pub fn is_access_modifier(id: KeywordId) -> bool {
    category(id) == KeywordCategory::Access
}

/// Return `true` if the keyword can appear in a declaration's modifier list.
pub fn is_declaration_modifier(id: KeywordId) -> bool {
    matches!(category(id), KeywordCategory::Access | KeywordCategory::Modifier)
}

/// Full metadata.
///
/// ## Panics
/// - Panics if the registry is missing an entry (a bug in this table, covered by the guardrail tests).
pub fn info_for(id: KeywordId) -> &'static KeywordInfo {
    KEYWORDS.iter().find(|k| k.id == id).expect("keyword info missing")
}

/// Lookup by spelling.
///
/// ## Returns
/// - `Some(KeywordId)` if the spelling is a keyword, `None` otherwise.
pub fn from_str(s: &str) -> Option<KeywordId> {
    KEYWORDS.iter().find(|k| k.canonical == s).map(|k| k.id)
}

const fn reserved(id: KeywordId, canonical: &'static str, category: KeywordCategory) -> KeywordInfo {
    KeywordInfo {
        id,
        canonical,
        category,
        contextual: false,
    }
}

const fn contextual(id: KeywordId, canonical: &'static str, category: KeywordCategory) -> KeywordInfo {
    KeywordInfo {
        id,
        canonical,
        category,
        contextual: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_sensitive() {
        assert_eq!(from_str("self"), Some(KeywordId::SelfValue));
        assert_eq!(from_str("Self"), Some(KeywordId::SelfType));
        assert_eq!(from_str("Struct"), None);
    }

    #[test]
    fn test_access_modifiers() {
        let access: Vec<_> = KEYWORDS
            .iter()
            .filter(|k| is_access_modifier(k.id))
            .map(|k| k.canonical)
            .collect();
        assert_eq!(access, vec!["public", "open", "internal", "fileprivate", "private"]);
    }

    #[test]
    fn test_contextual_keywords_are_modifiers_or_declarations() {
        for k in KEYWORDS.iter().filter(|k| k.contextual) {
            assert!(
                matches!(
                    k.category,
                    KeywordCategory::Access | KeywordCategory::Modifier | KeywordCategory::Declaration
                ),
                "unexpected contextual keyword {:?}",
                k.id
            );
        }
    }
}
