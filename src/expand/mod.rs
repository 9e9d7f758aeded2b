//! Utility macro expansion.
//!
//! ## Modules
//!
//! - `analyzer` - Validate the annotated declaration and extract its stored fields
//! - `transform` - The [`FieldPolicy`] seam and the derived declaration model
//! - `partial` / `readonly` - The two policies
//! - `driver` - Find every utility macro application in a source file
//! - `splice` - Insert rendered fragments back into the source text

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod analyzer;
pub mod driver;
pub mod errors;
pub mod partial;
pub mod readonly;
pub mod splice;
pub mod transform;

use utility_core::lang::macros::{self, UtilityMacroId};

use crate::ast::{Attribute, Decl};
use crate::render::{self, Fragment, RenderConfig};

pub use analyzer::{Access, AnalyzedContainer, ContainerKind, StoredField, analyze};
pub use errors::ExpansionError;
pub use partial::PartialPolicy;
pub use readonly::ReadonlyPolicy;
pub use transform::{DerivedDeclaration, FieldPolicy, transform};

/// Expand one application of `macro_id` with the default [`RenderConfig`].
///
/// On success the result holds exactly one fragment: the derived type declaration.
pub fn expand(
    macro_id: UtilityMacroId,
    attribute: &Attribute,
    declaration: &Decl,
) -> Result<Vec<Fragment>, ExpansionError> {
    expand_with_config(macro_id, attribute, declaration, &RenderConfig::default())
}

/// Expand one application of `macro_id`, rendering with `config`.
#[tracing::instrument(skip_all, fields(macro_name = macros::attribute_name(macro_id)))]
pub fn expand_with_config(
    macro_id: UtilityMacroId,
    attribute: &Attribute,
    declaration: &Decl,
    config: &RenderConfig,
) -> Result<Vec<Fragment>, ExpansionError> {
    let container = analyze(macro_id, attribute, declaration)?;
    let derived = match macro_id {
        UtilityMacroId::Partial => transform(&PartialPolicy, &container),
        UtilityMacroId::Readonly => transform(&ReadonlyPolicy, &container),
    };
    tracing::debug!(
        container = %container.name,
        derived = derived.name,
        fields = derived.fields.len(),
        "derived declaration"
    );
    Ok(vec![render::assemble(&derived, config)])
}
