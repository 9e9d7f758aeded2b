//! Field policies and the derived declaration model.
//!
//! A utility macro is a [`FieldPolicy`]: how one stored field becomes a derived field and a raw-initializer
//! parameter. [`transform`] applies a policy to every field of an [`AnalyzedContainer`] and adds the two
//! initializers every derived type has.

use utility_core::lang::macros::{self, UtilityMacroId};

use crate::ast::{BindingSpecifier, Ident, TypeExpr};

use super::analyzer::{Access, AnalyzedContainer, ContainerKind, StoredField};

/// A field of the derived type.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedField {
    pub name: Ident,
    pub ty: TypeExpr,
    pub specifier: BindingSpecifier,
}

/// `label: Type` in an initializer signature.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub label: Ident,
    pub ty: TypeExpr,
}

/// `self.<target> = <value>`
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub target: Ident,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Constructor {
    pub parameters: Vec<Parameter>,
    pub assignments: Vec<Assignment>,
}

/// The nested type a utility macro derives.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedDeclaration {
    /// Same kind as the source container.
    pub kind: ContainerKind,
    pub name: &'static str,
    pub access: Access,
    pub forwarded_annotations: String,
    pub fields: Vec<DerivedField>,
    /// `init(<hint>: <Source>)`
    pub from_source: Constructor,
    /// One parameter per field, in field order.
    pub from_raw: Constructor,
}

/// Per-field transformation rule of a utility macro.
pub trait FieldPolicy {
    /// The macro this policy implements.
    fn macro_id(&self) -> UtilityMacroId;

    /// The derived field for a stored source field.
    fn derived_field(&self, field: &StoredField) -> DerivedField;

    /// Type of the raw initializer's parameter for a stored source field.
    fn raw_parameter_type(&self, field: &StoredField) -> TypeExpr;
}

/// Build the derived declaration for `container` under `policy`.
pub fn transform<P: FieldPolicy>(policy: &P, container: &AnalyzedContainer) -> DerivedDeclaration {
    let fields = container
        .fields
        .iter()
        .map(|field| policy.derived_field(field))
        .collect();

    let from_source = Constructor {
        parameters: vec![Parameter {
            label: container.variable_name_hint.clone(),
            ty: TypeExpr::named(container.name.clone()),
        }],
        assignments: container
            .fields
            .iter()
            .map(|field| Assignment {
                target: field.name.clone(),
                value: format!("{}.{}", container.variable_name_hint, field.name),
            })
            .collect(),
    };

    let from_raw = Constructor {
        parameters: container
            .fields
            .iter()
            .map(|field| Parameter {
                label: field.name.clone(),
                ty: policy.raw_parameter_type(field),
            })
            .collect(),
        assignments: container
            .fields
            .iter()
            .map(|field| Assignment {
                target: field.name.clone(),
                value: field.name.clone(),
            })
            .collect(),
    };

    DerivedDeclaration {
        kind: container.kind,
        name: macros::derived_type_name(policy.macro_id()),
        access: container.access,
        forwarded_annotations: container.forwarded_annotations.clone(),
        fields,
        from_source,
        from_raw,
    }
}
