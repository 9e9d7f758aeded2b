//! `@Readonly`: every field immutable, types unchanged.

use utility_core::lang::macros::UtilityMacroId;

use crate::ast::{BindingSpecifier, TypeExpr};

use super::analyzer::StoredField;
use super::transform::{DerivedField, FieldPolicy};

#[derive(Debug, Clone, Copy, Default)]
pub struct ReadonlyPolicy;

impl FieldPolicy for ReadonlyPolicy {
    fn macro_id(&self) -> UtilityMacroId {
        UtilityMacroId::Readonly
    }

    fn derived_field(&self, field: &StoredField) -> DerivedField {
        DerivedField {
            name: field.name.clone(),
            ty: field.ty.clone(),
            specifier: BindingSpecifier::Let,
        }
    }

    fn raw_parameter_type(&self, field: &StoredField) -> TypeExpr {
        field.ty.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_is_kept_and_binding_is_let() {
        let field = StoredField {
            name: "email".to_string(),
            ty: TypeExpr::optional(TypeExpr::named("String")),
            specifier: BindingSpecifier::Var,
        };
        let derived = ReadonlyPolicy.derived_field(&field);
        assert_eq!(derived.specifier, BindingSpecifier::Let);
        assert_eq!(derived.ty, field.ty);
        assert_eq!(ReadonlyPolicy.raw_parameter_type(&field).to_string(), "String?");
    }
}
