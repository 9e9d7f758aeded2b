//! `@Partial`: every field optional and mutable.

use utility_core::lang::macros::UtilityMacroId;

use crate::ast::{BindingSpecifier, TypeExpr};

use super::analyzer::StoredField;
use super::transform::{DerivedField, FieldPolicy};

/// The required type is the declared type with one optional layer removed (`T?`/`T!` → `T`). The derived field
/// is the required type made optional, unless it is still optional (`T??` stays `T?`). The raw parameter always
/// wraps the required type once more, so an optional source field takes a double optional.
#[derive(Debug, Clone, Copy, Default)]
pub struct PartialPolicy;

fn required_type(field: &StoredField) -> &TypeExpr {
    field.ty.unwrap_optional()
}

impl FieldPolicy for PartialPolicy {
    fn macro_id(&self) -> UtilityMacroId {
        UtilityMacroId::Partial
    }

    fn derived_field(&self, field: &StoredField) -> DerivedField {
        let required = required_type(field);
        let ty = if required.is_optional() {
            required.clone()
        } else {
            TypeExpr::optional(required.clone())
        };
        DerivedField {
            name: field.name.clone(),
            ty,
            specifier: BindingSpecifier::Var,
        }
    }

    fn raw_parameter_type(&self, field: &StoredField) -> TypeExpr {
        TypeExpr::optional(TypeExpr::optional(required_type(field).clone()))
    }
}
