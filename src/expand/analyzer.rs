//! Declaration analysis.
//!
//! [`analyze`] turns an annotated declaration into an [`AnalyzedContainer`]: the container kind, its name, the
//! access prefix to forward, the stored fields in source order, and the forwarded annotation text. Everything that
//! can be wrong with the input is reported here, so transformers and the renderer only ever see validated data.

use utility_core::lang::keywords::KeywordId;
use utility_core::lang::macros::{self, UtilityMacroId};

use crate::ast::{
    Argument, Attribute, BindingSpecifier, Decl, Expr, Ident, Modifier, Spanned, StringSegment, TypeDecl, TypeExpr,
    VariableDecl,
};

use super::errors::{ExpansionError, Require};

/// Kind of container a utility macro can be applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    /// Record-like value type.
    Struct,
    /// Reference type.
    Class,
}

impl ContainerKind {
    pub fn keyword(self) -> &'static str {
        match self {
            ContainerKind::Struct => "struct",
            ContainerKind::Class => "class",
        }
    }
}

/// Access level forwarded to generated declarations. Only `public` is ever forwarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Access {
    #[default]
    Internal,
    Public,
}

impl Access {
    /// Text written before each generated declaration.
    pub fn prefix(self) -> &'static str {
        match self {
            Access::Internal => "",
            Access::Public => "public ",
        }
    }

    fn from_modifiers(modifiers: &[Spanned<Modifier>]) -> Self {
        if modifiers.iter().any(|m| m.node.keyword == KeywordId::Public) {
            Access::Public
        } else {
            Access::Internal
        }
    }
}

/// A stored (non-computed) instance property.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredField {
    pub name: Ident,
    /// Declared type, exactly as written.
    pub ty: TypeExpr,
    pub specifier: BindingSpecifier,
}

/// A validated container declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzedContainer {
    pub kind: ContainerKind,
    pub name: Ident,
    /// Parameter name of the from-source initializer (`User` → `user`).
    pub variable_name_hint: Ident,
    pub access: Access,
    pub fields: Vec<StoredField>,
    /// Text forwarded ahead of the derived declaration; empty when `macros:` is absent.
    pub forwarded_annotations: String,
}

/// Analyze `declaration` for an application of `macro_id` through `attribute`.
///
/// ## Errors
/// - [`ExpansionError::UnsupportedDeclarationKind`] unless `declaration` is a struct or class.
/// - [`ExpansionError::UnwrapFailure`] for a stored property whose type cannot be determined.
/// - [`ExpansionError::CastFailure`] / [`ExpansionError::UnexpectedInterpolation`] for a malformed `macros:`
///   argument list.
pub fn analyze(
    macro_id: UtilityMacroId,
    attribute: &Attribute,
    declaration: &Decl,
) -> Result<AnalyzedContainer, ExpansionError> {
    let (kind, container) = narrow(declaration).ok_or(ExpansionError::UnsupportedDeclarationKind {
        macro_name: macros::attribute_name(macro_id),
        found: declaration.kind_name(),
    })?;

    let forwarded_annotations = forwarded_annotations(attribute)?;
    let fields = stored_fields(container)?;
    tracing::trace!(container = %container.name.node, fields = fields.len(), "analyzed container");

    Ok(AnalyzedContainer {
        kind,
        name: container.name.node.clone(),
        variable_name_hint: variable_name_hint(&container.name.node),
        access: Access::from_modifiers(&container.modifiers),
        fields,
        forwarded_annotations,
    })
}

/// Narrow a declaration to a container.
fn narrow(declaration: &Decl) -> Option<(ContainerKind, &TypeDecl)> {
    match declaration {
        Decl::Struct(decl) => Some((ContainerKind::Struct, decl)),
        Decl::Class(decl) => Some((ContainerKind::Class, decl)),
        Decl::Enum(_)
        | Decl::Protocol(_)
        | Decl::Extension(_)
        | Decl::Actor(_)
        | Decl::Import(_)
        | Decl::TypeAlias(_)
        | Decl::Variable(_)
        | Decl::Function(_)
        | Decl::EnumCase(_)
        | Decl::IfConfig(_) => None,
    }
}

/// Lower-case the first character; the rest is kept (`URLRequest` → `uRLRequest`).
pub fn variable_name_hint(name: &str) -> Ident {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Collect stored instance properties in source order.
///
/// Only direct `let`/`var` members count: declarations inside a `#if` region belong to that region. Bindings with
/// an accessor block are computed (or observed) and skipped. Type properties (`static`/`class`) are not part of an
/// instance and are skipped as well.
fn stored_fields(container: &TypeDecl) -> Result<Vec<StoredField>, ExpansionError> {
    let mut fields = Vec::new();
    for variable in container
        .members
        .iter()
        .filter_map(|member| member.node.as_variable())
        .filter(|variable| !is_type_property(variable))
    {
        for (index, binding) in variable.bindings.iter().enumerate() {
            if !binding.is_stored() {
                continue;
            }
            let ty = binding_type(variable, index)
                .require(&format!("type annotation of stored property `{}`", binding.name.node))?;
            fields.push(StoredField {
                name: binding.name.node.clone(),
                ty: ty.clone(),
                specifier: variable.specifier,
            });
        }
    }
    Ok(fields)
}

fn is_type_property(variable: &VariableDecl) -> bool {
    variable
        .modifiers
        .iter()
        .any(|m| matches!(m.node.keyword, KeywordId::Static | KeywordId::Class))
}

/// Declared type of `bindings[index]`.
///
/// In `var a, b: Int` the untyped `a` shares the type of the next annotated binding. A binding with an initializer
/// ends the sharing run, since its type would come from the value instead.
fn binding_type(variable: &VariableDecl, index: usize) -> Option<&TypeExpr> {
    let binding = &variable.bindings[index];
    if let Some(annotation) = &binding.type_annotation {
        return Some(&annotation.node);
    }
    if binding.initializer.is_some() {
        return None;
    }
    variable.bindings[index + 1..]
        .iter()
        .find(|next| next.type_annotation.is_some() || next.initializer.is_some())
        .and_then(|next| next.type_annotation.as_ref())
        .map(|annotation| &annotation.node)
}

/// Text of the `macros:` argument and every argument after it, joined by newlines.
///
/// Arguments before `macros:` and arguments with other labels are ignored.
fn forwarded_annotations(attribute: &Attribute) -> Result<String, ExpansionError> {
    let Some(arguments) = &attribute.arguments else {
        return Ok(String::new());
    };
    let Some(start) = arguments.iter().position(is_macros_argument) else {
        return Ok(String::new());
    };

    let mut texts = Vec::new();
    for argument in &arguments[start..] {
        if let Some(label) = &argument.label {
            if !macros::is_known_option(&label.node) {
                tracing::debug!(label = %label.node, "ignoring unknown option");
                continue;
            }
        }
        let literal = match &argument.value.node {
            Expr::StringLiteral(literal) => literal,
            other => {
                return Err(ExpansionError::CastFailure {
                    expected: "StringLiteral",
                    found: format!("{} `{}`", other.kind_name(), other),
                });
            }
        };
        for segment in &literal.segments {
            match segment {
                StringSegment::Text(text) => texts.push(text.as_str()),
                StringSegment::Interpolation(expression) => {
                    return Err(ExpansionError::UnexpectedInterpolation {
                        expression: expression.clone(),
                    });
                }
            }
        }
    }
    Ok(texts.join("\n"))
}

fn is_macros_argument(argument: &Argument) -> bool {
    argument
        .label
        .as_ref()
        .is_some_and(|label| label.node == macros::MACROS_OPTION)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{lexer, parser};

    fn parse_one(source: &str) -> Decl {
        let tokens = lexer::lex(source).unwrap();
        let mut file = parser::parse(&tokens).unwrap();
        file.declarations.remove(0).node
    }

    fn analyze_source(source: &str) -> Result<AnalyzedContainer, ExpansionError> {
        let decl = parse_one(source);
        let attribute = decl.attributes()[0].node.clone();
        analyze(UtilityMacroId::Partial, &attribute, &decl)
    }

    fn field_summary(container: &AnalyzedContainer) -> Vec<String> {
        container
            .fields
            .iter()
            .map(|f| format!("{} {}: {}", f.specifier, f.name, f.ty))
            .collect()
    }

    #[test]
    fn test_user_struct() {
        let source = "@Partial\npublic struct User {\n    var id: String\n    var email: String?\n    let createdAt: Date\n}";
        let container = analyze_source(source).unwrap();
        assert_eq!(container.kind, ContainerKind::Struct);
        assert_eq!(container.name, "User");
        assert_eq!(container.variable_name_hint, "user");
        assert_eq!(container.access, Access::Public);
        assert_eq!(
            field_summary(&container),
            vec!["var id: String", "var email: String?", "let createdAt: Date"]
        );
        assert_eq!(container.forwarded_annotations, "");
    }

    #[test]
    fn test_computed_and_type_properties_are_skipped() {
        let source = r#"
@Partial
final class Session {
    static let shared = Session()
    let token: String
    var isValid: Bool { !token.isEmpty }
    var retries: Int = 0 {
        didSet { print(retries) }
    }
    var expiresAt: Date? = nil
    func refresh() {}
}
"#;
        let container = analyze_source(source).unwrap();
        assert_eq!(container.kind, ContainerKind::Class);
        assert_eq!(container.access, Access::Internal);
        assert_eq!(field_summary(&container), vec!["let token: String", "var expiresAt: Date?"]);
    }

    #[test]
    fn test_conditional_members_are_not_fields() {
        let source = r#"
@Readonly
struct Cfg {
    let a: Int
    #if os(iOS)
    let platform: UIColor
    #else
    let platform: NSColor
    #endif
    var b: String
}
"#;
        let container = analyze_source(source).unwrap();
        assert_eq!(field_summary(&container), vec!["let a: Int", "var b: String"]);
    }

    #[test]
    fn test_shared_type_annotation() {
        let container = analyze_source("@Partial\nstruct P {\n    var x, y: Double\n}").unwrap();
        assert_eq!(field_summary(&container), vec!["var x: Double", "var y: Double"]);
    }

    #[test]
    fn test_untyped_stored_property_is_an_unwrap_failure() {
        let error = analyze_source("@Partial\nstruct P {\n    var count = 0\n}").unwrap_err();
        let ExpansionError::UnwrapFailure { what, .. } = error else {
            panic!("expected UnwrapFailure, got {:?}", error);
        };
        assert_eq!(what, "type annotation of stored property `count`");
    }

    #[test]
    fn test_only_public_is_forwarded() {
        for (modifier, expected) in [
            ("public", Access::Public),
            ("open", Access::Internal),
            ("internal", Access::Internal),
            ("fileprivate", Access::Internal),
            ("private", Access::Internal),
        ] {
            let source = format!("@Partial\n{} class A {{\n    var x: Int\n}}", modifier);
            assert_eq!(analyze_source(&source).unwrap().access, expected, "{}", modifier);
        }
    }

    #[test]
    fn test_enum_is_unsupported() {
        let error = analyze_source("@Partial\nenum E {\n    case a\n}").unwrap_err();
        assert_eq!(
            error,
            ExpansionError::UnsupportedDeclarationKind {
                macro_name: "Partial",
                found: "enum",
            }
        );
    }

    #[test]
    fn test_variable_name_hint() {
        assert_eq!(variable_name_hint("User"), "user");
        assert_eq!(variable_name_hint("URLRequest"), "uRLRequest");
        assert_eq!(variable_name_hint("already"), "already");
        assert_eq!(variable_name_hint("Ärger"), "ärger");
        assert_eq!(variable_name_hint(""), "");
    }

    #[test]
    fn test_forwarded_macros() {
        let source = "@Partial(macros: \"@Observable\", \"@MainActor\")\nclass A {\n    var x: Int\n}";
        let container = analyze_source(source).unwrap();
        assert_eq!(container.forwarded_annotations, "@Observable\n@MainActor");
    }

    #[test]
    fn test_forwarded_macros_ignore_other_labels() {
        let source = "@Partial(\"@Before\", macros: \"@Foo\\n@Bar\", note: 1)\nstruct A {}";
        let container = analyze_source(source).unwrap();
        assert_eq!(container.forwarded_annotations, "@Foo\n@Bar");
    }

    #[test]
    fn test_non_string_macros_argument_is_a_cast_failure() {
        let error = analyze_source("@Partial(macros: Observable)\nstruct A {}").unwrap_err();
        assert_eq!(
            error,
            ExpansionError::CastFailure {
                expected: "StringLiteral",
                found: "Identifier `Observable`".to_string(),
            }
        );
    }

    #[test]
    fn test_interpolated_macros_argument_is_rejected() {
        let error = analyze_source("@Partial(macros: \"@\\(name)\")\nstruct A {}").unwrap_err();
        assert_eq!(
            error,
            ExpansionError::UnexpectedInterpolation {
                expression: "name".to_string(),
            }
        );
    }
}
