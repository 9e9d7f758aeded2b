//! Syntax tree definitions for declaration source.
//!
//! The tree is a tagged-variant structure: every declaration is a [`Decl`] variant carrying its concrete node,
//! so consumers narrow with `match` instead of casting. Nodes render back to canonical source text through
//! `Display`, which the generator uses for type annotations and error messages.

use std::fmt;

use crate::lexer::tokens::escape_text;
use utility_core::lang::keywords::{self, KeywordId};

/// Source location span (byte offsets)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

/// A node with source location
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }
}

pub type Ident = String;

/// A source file is a sequence of declarations
#[derive(Debug, Clone, PartialEq)]
pub struct SourceFile {
    pub declarations: Vec<Spanned<Decl>>,
}

/// Declarations, at file level or inside a type body.
#[derive(Debug, Clone, PartialEq)]
pub enum Decl {
    Import(ImportDecl),
    Struct(TypeDecl),
    Class(TypeDecl),
    Enum(TypeDecl),
    Protocol(TypeDecl),
    Extension(TypeDecl),
    Actor(TypeDecl),
    TypeAlias(TypeAliasDecl),
    Variable(VariableDecl),
    Function(FunctionDecl),
    EnumCase(EnumCaseDecl),
    IfConfig(IfConfigDecl),
}

impl Decl {
    /// Keyword-style name of the declaration kind (`"struct"`, `"func"`, …), for messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Decl::Import(_) => "import",
            Decl::Struct(_) => "struct",
            Decl::Class(_) => "class",
            Decl::Enum(_) => "enum",
            Decl::Protocol(_) => "protocol",
            Decl::Extension(_) => "extension",
            Decl::Actor(_) => "actor",
            Decl::TypeAlias(_) => "typealias",
            Decl::Variable(v) => keywords::as_str(v.specifier.keyword()),
            Decl::Function(f) => f.kind.keyword_str(),
            Decl::EnumCase(_) => "case",
            Decl::IfConfig(_) => "#if",
        }
    }

    /// The node's name, when it has one.
    pub fn name(&self) -> Option<&str> {
        match self {
            Decl::Struct(t)
            | Decl::Class(t)
            | Decl::Enum(t)
            | Decl::Protocol(t)
            | Decl::Extension(t)
            | Decl::Actor(t) => Some(&t.name.node),
            Decl::TypeAlias(t) => Some(&t.name.node),
            Decl::Function(f) => Some(&f.name),
            Decl::Variable(v) => v.bindings.first().map(|b| b.name.node.as_str()),
            Decl::Import(_) | Decl::EnumCase(_) | Decl::IfConfig(_) => None,
        }
    }

    pub fn attributes(&self) -> &[Spanned<Attribute>] {
        match self {
            Decl::Import(i) => &i.attributes,
            Decl::Struct(t)
            | Decl::Class(t)
            | Decl::Enum(t)
            | Decl::Protocol(t)
            | Decl::Extension(t)
            | Decl::Actor(t) => &t.attributes,
            Decl::TypeAlias(t) => &t.attributes,
            Decl::Variable(v) => &v.attributes,
            Decl::Function(f) => &f.attributes,
            Decl::EnumCase(c) => &c.attributes,
            Decl::IfConfig(_) => &[],
        }
    }

    pub fn modifiers(&self) -> &[Spanned<Modifier>] {
        match self {
            Decl::Import(_) | Decl::IfConfig(_) => &[],
            Decl::Struct(t)
            | Decl::Class(t)
            | Decl::Enum(t)
            | Decl::Protocol(t)
            | Decl::Extension(t)
            | Decl::Actor(t) => &t.modifiers,
            Decl::TypeAlias(t) => &t.modifiers,
            Decl::Variable(v) => &v.modifiers,
            Decl::Function(f) => &f.modifiers,
            Decl::EnumCase(c) => &c.modifiers,
        }
    }

    /// Narrow to any nominal type declaration (struct, class, enum, protocol, extension, actor).
    pub fn as_type_decl(&self) -> Option<&TypeDecl> {
        match self {
            Decl::Struct(t)
            | Decl::Class(t)
            | Decl::Enum(t)
            | Decl::Protocol(t)
            | Decl::Extension(t)
            | Decl::Actor(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_variable(&self) -> Option<&VariableDecl> {
        match self {
            Decl::Variable(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_if_config(&self) -> Option<&IfConfigDecl> {
        match self {
            Decl::IfConfig(c) => Some(c),
            _ => None,
        }
    }
}

/// A `#if … #endif` region. Declarations stay inside their branch.
#[derive(Debug, Clone, PartialEq)]
pub struct IfConfigDecl {
    pub clauses: Vec<IfConfigClause>,
}

/// One branch of an [`IfConfigDecl`].
#[derive(Debug, Clone, PartialEq)]
pub struct IfConfigClause {
    /// `if`, `elseif` or `else`.
    pub directive: Ident,
    /// Condition source text; `None` for `#else`.
    pub condition: Option<String>,
    pub members: Vec<Spanned<Decl>>,
}

// ============================================================================
// Attributes and modifiers
// ============================================================================

/// `@Name` or `@Name(arguments)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: Spanned<Ident>,
    /// `None` when written without parentheses; `Some(vec![])` for `@Name()`.
    pub arguments: Option<Vec<Argument>>,
}

/// A possibly-labelled attribute argument (`label: value` or `value`).
#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    pub label: Option<Spanned<Ident>>,
    pub value: Spanned<Expr>,
}

/// Declaration modifier, such as `public`, `static`, or `private(set)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Modifier {
    pub keyword: KeywordId,
    /// Parenthesized detail (`set` in `private(set)`).
    pub detail: Option<Ident>,
}

impl Modifier {
    pub fn new(keyword: KeywordId) -> Self {
        Self { keyword, detail: None }
    }
}

/// The small expression language allowed in attribute arguments.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    StringLiteral(StringLiteral),
    Identifier(Ident),
    Integer(String),
    Float(String),
    Boolean(bool),
    Nil,
    /// Any other expression, kept as source text.
    Raw(String),
}

impl Expr {
    /// Name of the node kind, for messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Expr::StringLiteral(_) => "StringLiteral",
            Expr::Identifier(_) => "Identifier",
            Expr::Integer(_) => "IntegerLiteral",
            Expr::Float(_) => "FloatLiteral",
            Expr::Boolean(_) => "BooleanLiteral",
            Expr::Nil => "NilLiteral",
            Expr::Raw(_) => "Expression",
        }
    }

    pub fn as_string_literal(&self) -> Option<&StringLiteral> {
        match self {
            Expr::StringLiteral(s) => Some(s),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StringLiteral {
    pub segments: Vec<StringSegment>,
    pub multiline: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StringSegment {
    /// Literal text with escapes processed.
    Text(String),
    /// Raw source of an interpolated expression.
    Interpolation(String),
}

// ============================================================================
// Type declarations
// ============================================================================

/// Nominal type declaration: struct, class, enum, protocol, extension, or actor.
///
/// The variant of [`Decl`] that wraps it says which one.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDecl {
    pub attributes: Vec<Spanned<Attribute>>,
    pub modifiers: Vec<Spanned<Modifier>>,
    pub name: Spanned<Ident>,
    pub generic_params: Vec<Ident>,
    pub inheritance: Vec<Spanned<TypeExpr>>,
    pub members: Vec<Spanned<Decl>>,
    /// Span of the member block, braces included.
    pub body: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportDecl {
    pub attributes: Vec<Spanned<Attribute>>,
    pub path: Vec<Ident>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeAliasDecl {
    pub attributes: Vec<Spanned<Attribute>>,
    pub modifiers: Vec<Spanned<Modifier>>,
    pub name: Spanned<Ident>,
    pub generic_params: Vec<Ident>,
    pub target: Spanned<TypeExpr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumCaseDecl {
    pub attributes: Vec<Spanned<Attribute>>,
    pub modifiers: Vec<Spanned<Modifier>>,
    pub elements: Vec<Spanned<Ident>>,
}

// ============================================================================
// Functions
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionKind {
    Func,
    Init,
    Deinit,
    Subscript,
}

impl FunctionKind {
    pub fn keyword(self) -> KeywordId {
        match self {
            FunctionKind::Func => KeywordId::Func,
            FunctionKind::Init => KeywordId::Init,
            FunctionKind::Deinit => KeywordId::Deinit,
            FunctionKind::Subscript => KeywordId::Subscript,
        }
    }

    pub fn keyword_str(self) -> &'static str {
        keywords::as_str(self.keyword())
    }
}

/// Function-like declaration. Only the outline is kept: the signature as text and the body as a span.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub attributes: Vec<Spanned<Attribute>>,
    pub modifiers: Vec<Spanned<Modifier>>,
    pub kind: FunctionKind,
    pub name: Ident,
    pub signature: String,
    pub body: Option<Span>,
}

// ============================================================================
// Variables
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingSpecifier {
    Let,
    Var,
}

impl BindingSpecifier {
    pub fn keyword(self) -> KeywordId {
        match self {
            BindingSpecifier::Let => KeywordId::Let,
            BindingSpecifier::Var => KeywordId::Var,
        }
    }
}

impl fmt::Display for BindingSpecifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(keywords::as_str(self.keyword()))
    }
}

/// `let`/`var` declaration with one or more comma-separated bindings.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDecl {
    pub attributes: Vec<Spanned<Attribute>>,
    pub modifiers: Vec<Spanned<Modifier>>,
    pub specifier: BindingSpecifier,
    pub bindings: Vec<PatternBinding>,
}

/// One `name: Type = value { accessors }` binding.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternBinding {
    pub name: Spanned<Ident>,
    pub type_annotation: Option<Spanned<TypeExpr>>,
    pub initializer: Option<Spanned<String>>,
    pub accessor_block: Option<AccessorBlock>,
}

impl PatternBinding {
    /// A binding backed by storage: no getter/setter/observer block.
    pub fn is_stored(&self) -> bool {
        self.accessor_block.is_none()
    }
}

/// `{ … }` after a binding: a getter body, explicit accessors, or observers.
#[derive(Debug, Clone, PartialEq)]
pub struct AccessorBlock {
    pub kind: AccessorBlockKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AccessorBlockKind {
    /// `{ expression }`: shorthand read-only getter.
    Getter,
    /// `{ get set }`, `{ willSet { … } didSet { … } }`, …
    Accessors(Vec<Ident>),
}

// ============================================================================
// Types
// ============================================================================

/// Type expression (annotation).
#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpr {
    /// `Int`, `Foo.Bar`, `Array<Int>`
    Named { name: Ident, generic_args: Vec<TypeExpr> },
    /// `T?`
    Optional(Box<TypeExpr>),
    /// `T!`
    ImplicitlyUnwrapped(Box<TypeExpr>),
    /// `[T]`
    Array(Box<TypeExpr>),
    /// `[K: V]`
    Dictionary(Box<TypeExpr>, Box<TypeExpr>),
    /// `(A, b: B)`
    Tuple(Vec<TupleTypeElement>),
    /// `(A) async throws -> B`
    Function {
        params: Vec<TupleTypeElement>,
        effects: Vec<Ident>,
        ret: Box<TypeExpr>,
    },
    /// `A & B`
    Composition(Vec<TypeExpr>),
    /// `some P`, `any P`, `@escaping T`, `inout T`
    Attributed { specifiers: Vec<Ident>, base: Box<TypeExpr> },
    /// `Self`
    SelfType,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TupleTypeElement {
    pub label: Option<Ident>,
    pub ty: TypeExpr,
}

impl TypeExpr {
    pub fn named(name: impl Into<Ident>) -> Self {
        TypeExpr::Named {
            name: name.into(),
            generic_args: Vec::new(),
        }
    }

    pub fn optional(inner: TypeExpr) -> Self {
        TypeExpr::Optional(Box::new(inner))
    }

    /// Return `true` for `T?` and `T!`.
    pub fn is_optional(&self) -> bool {
        matches!(self, TypeExpr::Optional(_) | TypeExpr::ImplicitlyUnwrapped(_))
    }

    /// Remove one optional layer (`T?` or `T!` → `T`); other types are returned unchanged.
    pub fn unwrap_optional(&self) -> &TypeExpr {
        match self {
            TypeExpr::Optional(inner) | TypeExpr::ImplicitlyUnwrapped(inner) => inner,
            other => other,
        }
    }

    /// Whether a postfix `?`/`!` needs parentheses around this type.
    fn needs_parens_for_postfix(&self) -> bool {
        matches!(
            self,
            TypeExpr::Function { .. } | TypeExpr::Composition(_) | TypeExpr::Attributed { .. }
        )
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::Named { name, generic_args } => {
                f.write_str(name)?;
                if !generic_args.is_empty() {
                    f.write_str("<")?;
                    write_joined(f, generic_args, ", ")?;
                    f.write_str(">")?;
                }
                Ok(())
            }
            TypeExpr::Optional(inner) | TypeExpr::ImplicitlyUnwrapped(inner) => {
                let mark = if matches!(self, TypeExpr::Optional(_)) { "?" } else { "!" };
                if inner.needs_parens_for_postfix() {
                    write!(f, "({}){}", inner, mark)
                } else {
                    write!(f, "{}{}", inner, mark)
                }
            }
            TypeExpr::Array(element) => write!(f, "[{}]", element),
            TypeExpr::Dictionary(key, value) => write!(f, "[{}: {}]", key, value),
            TypeExpr::Tuple(elements) => {
                f.write_str("(")?;
                write_joined(f, elements, ", ")?;
                f.write_str(")")
            }
            TypeExpr::Function { params, effects, ret } => {
                f.write_str("(")?;
                write_joined(f, params, ", ")?;
                f.write_str(")")?;
                for effect in effects {
                    write!(f, " {}", effect)?;
                }
                write!(f, " -> {}", ret)
            }
            TypeExpr::Composition(parts) => write_joined(f, parts, " & "),
            TypeExpr::Attributed { specifiers, base } => {
                for specifier in specifiers {
                    write!(f, "{} ", specifier)?;
                }
                write!(f, "{}", base)
            }
            TypeExpr::SelfType => f.write_str(keywords::as_str(KeywordId::SelfType)),
        }
    }
}

impl fmt::Display for TupleTypeElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.label {
            Some(label) => write!(f, "{}: {}", label, self.ty),
            None => write!(f, "{}", self.ty),
        }
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(keywords::as_str(self.keyword))?;
        if let Some(detail) = &self.detail {
            write!(f, "({})", detail)?;
        }
        Ok(())
    }
}

impl fmt::Display for StringLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("\"")?;
        for segment in &self.segments {
            match segment {
                StringSegment::Text(text) => f.write_str(&escape_text(text))?,
                StringSegment::Interpolation(expr) => write!(f, "\\({})", expr)?,
            }
        }
        f.write_str("\"")
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::StringLiteral(s) => write!(f, "{}", s),
            Expr::Identifier(name) => f.write_str(name),
            Expr::Integer(text) | Expr::Float(text) | Expr::Raw(text) => f.write_str(text),
            Expr::Boolean(value) => write!(f, "{}", value),
            Expr::Nil => f.write_str(keywords::as_str(KeywordId::Nil)),
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.name.node)?;
        if let Some(arguments) = &self.arguments {
            f.write_str("(")?;
            for (i, argument) in arguments.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                if let Some(label) = &argument.label {
                    write!(f, "{}: ", label.node)?;
                }
                write!(f, "{}", argument.value.node)?;
            }
            f.write_str(")")?;
        }
        Ok(())
    }
}

fn write_joined<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T], separator: &str) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(separator)?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optional_function_type_keeps_parens() {
        let ty = TypeExpr::optional(TypeExpr::Function {
            params: vec![],
            effects: vec![],
            ret: Box::new(TypeExpr::named("Void")),
        });
        assert_eq!(ty.to_string(), "(() -> Void)?");
    }

    #[test]
    fn test_unwrap_optional_removes_one_layer() {
        let double = TypeExpr::optional(TypeExpr::optional(TypeExpr::named("String")));
        assert_eq!(double.unwrap_optional().to_string(), "String?");
        assert_eq!(TypeExpr::named("Int").unwrap_optional().to_string(), "Int");
    }

    #[test]
    fn test_string_literal_display_reescapes() {
        let literal = StringLiteral {
            segments: vec![
                StringSegment::Text("@Foo\n".to_string()),
                StringSegment::Interpolation("name".to_string()),
            ],
            multiline: false,
        };
        assert_eq!(literal.to_string(), r#""@Foo\n\(name)""#);
    }
}
