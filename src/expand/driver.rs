//! Source-file driver: find and expand every utility macro application.
//!
//! Declarations are walked depth first, so containers nested in other type bodies are expanded too. A failing
//! application is recorded with its attribute span and the walk continues.

use utility_core::lang::macros::{self, UtilityMacroId};

use crate::ast::{Decl, SourceFile, Span, Spanned};
use crate::render::{Fragment, RenderConfig};

use super::errors::Require;
use super::{ExpansionError, expand_with_config};

/// A successful application.
#[derive(Debug, Clone, PartialEq)]
pub struct Expansion {
    pub macro_id: UtilityMacroId,
    /// Span of the `@Macro(…)` attribute.
    pub attribute: Span,
    /// Member block of the annotated container, braces included.
    pub body: Span,
    pub fragments: Vec<Fragment>,
}

/// A failed application.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpansionFailure {
    pub macro_id: UtilityMacroId,
    pub attribute: Span,
    pub error: ExpansionError,
}

/// Every application found in one source file, in source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileExpansion {
    pub expansions: Vec<Expansion>,
    pub failures: Vec<ExpansionFailure>,
}

impl FileExpansion {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// All fragments, in source order.
    pub fn fragments(&self) -> impl Iterator<Item = &Fragment> {
        self.expansions.iter().flat_map(|e| e.fragments.iter())
    }
}

/// Expand every utility macro application in `file`.
#[tracing::instrument(skip_all, fields(declarations = file.declarations.len()))]
pub fn expand_source_file(file: &SourceFile, config: &RenderConfig) -> FileExpansion {
    let mut result = FileExpansion::default();
    for declaration in &file.declarations {
        visit(declaration, config, &mut result);
    }
    tracing::debug!(
        expansions = result.expansions.len(),
        failures = result.failures.len(),
        "expanded source file"
    );
    result
}

fn visit(declaration: &Spanned<Decl>, config: &RenderConfig, result: &mut FileExpansion) {
    let decl = &declaration.node;
    for attribute in decl.attributes() {
        let Some(macro_id) = macros::from_attribute_name(&attribute.node.name.node) else {
            continue;
        };
        let outcome = expand_with_config(macro_id, &attribute.node, decl, config).and_then(|fragments| {
            let body = decl
                .as_type_decl()
                .map(|container| container.body)
                .require("member block of expanded declaration")?;
            Ok((fragments, body))
        });
        match outcome {
            Ok((fragments, body)) => result.expansions.push(Expansion {
                macro_id,
                attribute: attribute.span,
                body,
                fragments,
            }),
            Err(error) => {
                tracing::debug!(error = %error, "expansion failed");
                result.failures.push(ExpansionFailure {
                    macro_id,
                    attribute: attribute.span,
                    error,
                });
            }
        }
    }

    if let Some(container) = decl.as_type_decl() {
        for member in &container.members {
            visit(member, config, result);
        }
    }
    if let Some(region) = decl.as_if_config() {
        for member in region.clauses.iter().flat_map(|clause| &clause.members) {
            visit(member, config, result);
        }
    }
}
