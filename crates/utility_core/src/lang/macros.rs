//! Utility macro vocabulary.
//!
//! Each utility macro is an attribute (`@Partial`, `@Readonly`) that asks the generator to derive a companion type
//! nested inside the annotated container. This registry records the attribute spelling, the fixed name of the
//! derived type, and the invocation options the generator understands.
//!
//! ## Notes
//! - Derived type names are fixed. Applying the same macro twice in one scope produces two types with the same
//!   name; the generator does not try to avoid that.
//! - Options not listed in [`OPTIONS`] are ignored by the generator.
//!
//! ## Examples
//! ```rust
//! use utility_core::lang::macros::{self, UtilityMacroId};
//!
//! assert_eq!(macros::from_attribute_name("Partial"), Some(UtilityMacroId::Partial));
//! assert_eq!(macros::derived_type_name(UtilityMacroId::Readonly), "Readonly");
//! ```

/// Stable identifier for every utility macro.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UtilityMacroId {
    /// Every field becomes optional and mutable.
    Partial,
    /// Every field becomes immutable; types are unchanged.
    Readonly,
}

/// Metadata for a utility macro.
#[derive(Debug, Clone, Copy)]
pub struct UtilityMacroInfo {
    pub id: UtilityMacroId,
    /// Attribute spelling without the leading `@`.
    pub attribute: &'static str,
    /// Name of the nested type the macro derives.
    pub derived_type: &'static str,
    pub summary: &'static str,
}

/// Registry of all utility macros.
pub const UTILITY_MACROS: &[UtilityMacroInfo] = &[
    UtilityMacroInfo {
        id: UtilityMacroId::Partial,
        attribute: "Partial",
        derived_type: "Partial",
        summary: "Derive a nested type whose fields are all optional and mutable.",
    },
    UtilityMacroInfo {
        id: UtilityMacroId::Readonly,
        attribute: "Readonly",
        derived_type: "Readonly",
        summary: "Derive a nested type whose fields are all immutable.",
    },
];

/// Label of the option whose string literal is forwarded verbatim ahead of the derived declaration.
pub const MACROS_OPTION: &str = "macros";

/// Metadata for an invocation option.
#[derive(Debug, Clone, Copy)]
pub struct MacroOptionInfo {
    pub label: &'static str,
    pub summary: &'static str,
}

/// Registry of recognized invocation options (shared by every utility macro).
pub const OPTIONS: &[MacroOptionInfo] = &[MacroOptionInfo {
    label: MACROS_OPTION,
    summary: "Raw source text (usually attributes) inserted before the derived declaration.",
}];

/// Attribute spelling (without `@`).
pub fn attribute_name(id: UtilityMacroId) -> &'static str {
    info_for(id).attribute
}

/// Name of the derived nested type.
pub fn derived_type_name(id: UtilityMacroId) -> &'static str {
    info_for(id).derived_type
}

/// Full metadata.
///
/// ## Panics
/// - Panics if the registry is missing an entry (a bug in this table).
pub fn info_for(id: UtilityMacroId) -> &'static UtilityMacroInfo {
    UTILITY_MACROS
        .iter()
        .find(|m| m.id == id)
        .expect("utility macro info missing")
}

/// Lookup by attribute name (without `@`).
pub fn from_attribute_name(name: &str) -> Option<UtilityMacroId> {
    UTILITY_MACROS.iter().find(|m| m.attribute == name).map(|m| m.id)
}

/// Return `true` if `label` is an option the generator understands.
pub fn is_known_option(label: &str) -> bool {
    OPTIONS.iter().any(|o| o.label == label)
}
