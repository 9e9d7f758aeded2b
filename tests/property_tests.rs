//! Property-based tests for the utility-types generator
//!
//! These tests use proptest to verify the field policy invariants across many
//! randomly generated containers.

use proptest::prelude::*;

use utility_types::RenderConfig;
use utility_types::ast::{BindingSpecifier, Decl};
use utility_types::expand::{PartialPolicy, ReadonlyPolicy, analyze, transform};
use utility_types::expand::{driver::expand_source_file, splice::splice};
use utility_types::{lexer, parser};
use utility_core::lang::macros::UtilityMacroId;

/// (declared type, Partial field type, Partial raw parameter type)
const TYPES: &[(&str, &str, &str)] = &[
    ("Int", "Int?", "Int??"),
    ("String", "String?", "String??"),
    ("Date?", "Date?", "Date??"),
    ("Int??", "Int?", "Int??"),
    ("Double!", "Double?", "Double??"),
    ("[Int]", "[Int]?", "[Int]??"),
    ("[String: [Int]]", "[String: [Int]]?", "[String: [Int]]??"),
    ("(Int, label: String)", "(Int, label: String)?", "(Int, label: String)??"),
    ("Set<String>", "Set<String>?", "Set<String>??"),
    ("Foundation.URL", "Foundation.URL?", "Foundation.URL??"),
    ("() -> Void", "(() -> Void)?", "(() -> Void)??"),
];

#[derive(Debug, Clone)]
struct FieldSpec {
    name: String,
    ty: usize,
    mutable: bool,
    computed: bool,
}

#[derive(Debug, Clone)]
struct ContainerSpec {
    class: bool,
    public: bool,
    fields: Vec<FieldSpec>,
}

impl ContainerSpec {
    fn source(&self, attribute: &str) -> String {
        let mut out = format!(
            "@{}\n{}{} Model {{\n",
            attribute,
            if self.public { "public " } else { "" },
            if self.class { "class" } else { "struct" }
        );
        for field in &self.fields {
            let ty = TYPES[field.ty].0;
            if field.computed {
                out.push_str(&format!("    var {}: {} {{ fatalError() }}\n", field.name, ty));
            } else {
                let specifier = if field.mutable { "var" } else { "let" };
                out.push_str(&format!("    {} {}: {}\n", specifier, field.name, ty));
            }
        }
        out.push_str("}\n");
        out
    }

    fn stored(&self) -> Vec<&FieldSpec> {
        self.fields.iter().filter(|f| !f.computed).collect()
    }
}

fn field_strategy() -> impl Strategy<Value = (String, usize, bool, bool)> {
    ("[a-z]{1,6}", 0..TYPES.len(), any::<bool>(), any::<bool>())
}

fn container_strategy() -> impl Strategy<Value = ContainerSpec> {
    (any::<bool>(), any::<bool>(), prop::collection::vec(field_strategy(), 0..8)).prop_map(|(class, public, raw)| {
        let fields = raw
            .into_iter()
            .enumerate()
            // Numeric suffix keeps names unique and never a keyword.
            .map(|(i, (base, ty, mutable, computed))| FieldSpec {
                name: format!("{}{}", base, i),
                ty,
                mutable,
                computed,
            })
            .collect();
        ContainerSpec { class, public, fields }
    })
}

fn parse_decl(source: &str) -> Decl {
    let tokens = lexer::lex(source).expect("Lex failed");
    let mut file = parser::parse(&tokens).expect("Parse failed");
    file.declarations.remove(0).node
}

proptest! {
    /// Property: one derived field per stored field, in source order; computed fields never appear.
    #[test]
    fn derived_fields_follow_stored_fields(spec in container_strategy()) {
        let decl = parse_decl(&spec.source("Partial"));
        let attribute = decl.attributes()[0].node.clone();
        let container = analyze(UtilityMacroId::Partial, &attribute, &decl).expect("analyze failed");
        let derived = transform(&PartialPolicy, &container);

        let expected: Vec<&str> = spec.stored().iter().map(|f| f.name.as_str()).collect();
        let actual: Vec<&str> = derived.fields.iter().map(|f| f.name.as_str()).collect();
        prop_assert_eq!(&actual, &expected);

        let raw: Vec<&str> = derived.from_raw.parameters.iter().map(|p| p.label.as_str()).collect();
        prop_assert_eq!(&raw, &expected);
        let copied: Vec<String> = derived.from_source.assignments.iter().map(|a| a.value.clone()).collect();
        let expected_copies: Vec<String> = expected.iter().map(|name| format!("model.{}", name)).collect();
        prop_assert_eq!(copied, expected_copies);
    }

    /// Property: Partial makes every field `var` and optional exactly once.
    #[test]
    fn partial_policy_widens_types(spec in container_strategy()) {
        let decl = parse_decl(&spec.source("Partial"));
        let attribute = decl.attributes()[0].node.clone();
        let container = analyze(UtilityMacroId::Partial, &attribute, &decl).expect("analyze failed");
        let derived = transform(&PartialPolicy, &container);

        for ((field, parameter), source) in derived.fields.iter().zip(&derived.from_raw.parameters).zip(spec.stored()) {
            let (_, field_ty, parameter_ty) = TYPES[source.ty];
            prop_assert_eq!(field.specifier, BindingSpecifier::Var);
            prop_assert_eq!(field.ty.to_string(), field_ty);
            prop_assert_eq!(parameter.ty.to_string(), parameter_ty);
        }
    }

    /// Property: Readonly makes every field `let` and keeps its type.
    #[test]
    fn readonly_policy_keeps_types(spec in container_strategy()) {
        let decl = parse_decl(&spec.source("Readonly"));
        let attribute = decl.attributes()[0].node.clone();
        let container = analyze(UtilityMacroId::Readonly, &attribute, &decl).expect("analyze failed");
        let derived = transform(&ReadonlyPolicy, &container);

        for ((field, parameter), source) in derived.fields.iter().zip(&derived.from_raw.parameters).zip(spec.stored()) {
            let declared = TYPES[source.ty].0;
            prop_assert_eq!(field.specifier, BindingSpecifier::Let);
            prop_assert_eq!(field.ty.to_string(), declared);
            prop_assert_eq!(parameter.ty.to_string(), declared);
        }
    }

    /// Property: spliced output parses again, gains exactly one member, and carries `public` only if the source does.
    #[test]
    fn spliced_output_reparses(spec in container_strategy(), partial in any::<bool>()) {
        let attribute = if partial { "Partial" } else { "Readonly" };
        let source = spec.source(attribute);
        let tokens = lexer::lex(&source).expect("Lex failed");
        let file = parser::parse(&tokens).expect("Parse failed");
        let config = RenderConfig::default();
        let result = expand_source_file(&file, &config);
        prop_assert!(result.is_success());

        let output = splice(&source, &result.expansions, &config);
        let tokens = lexer::lex(&output).expect("Lex spliced failed");
        let reparsed = parser::parse(&tokens).expect("Parse spliced failed");
        let model = reparsed.declarations[0].node.as_type_decl().expect("container");
        prop_assert_eq!(model.members.len(), spec.fields.len() + 1);
        let derived = model.members.last().and_then(|m| m.node.name().map(str::to_string));
        prop_assert_eq!(derived.as_deref(), Some(attribute));

        let generated = &output[source.len() - 2..];
        prop_assert_eq!(generated.contains("public "), spec.public);
    }
}
