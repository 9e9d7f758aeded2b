#[cfg(test)]
/// Parser unit tests.
///
/// These tests focus on the declaration shapes the generator depends on and on the parser’s
/// error recovery behavior (one error per broken member, no cascades).
mod tests {
    use super::*;
    use crate::lexer;

    fn parse_str(source: &str) -> Result<SourceFile, Vec<CompileError>> {
        let tokens = lexer::lex(source).map_err(|_| vec![])?;
        parse(&tokens)
    }

    fn single_type(source: &str) -> TypeDecl {
        let file = parse_str(source).unwrap();
        assert_eq!(file.declarations.len(), 1);
        file.declarations[0]
            .node
            .as_type_decl()
            .cloned()
            .expect("expected a type declaration")
    }

    fn variable(member: &Spanned<Decl>) -> &VariableDecl {
        member.node.as_variable().expect("expected a variable member")
    }

    /// One line per declaration, nested members indented by two spaces.
    fn outline(declarations: &[Spanned<Decl>]) -> String {
        fn walk(declarations: &[Spanned<Decl>], depth: usize, lines: &mut Vec<String>) {
            let indent = "  ".repeat(depth);
            for declaration in declarations {
                match &declaration.node {
                    Decl::Variable(v) => {
                        for binding in &v.bindings {
                            let ty = binding
                                .type_annotation
                                .as_ref()
                                .map(|t| t.node.to_string())
                                .unwrap_or_else(|| "_".to_string());
                            lines.push(format!("{}{} {}: {}", indent, v.specifier, binding.name.node, ty));
                        }
                    }
                    Decl::IfConfig(region) => {
                        for clause in &region.clauses {
                            let condition = clause.condition.as_deref().map(|c| format!(" {}", c)).unwrap_or_default();
                            lines.push(format!("{}#{}{}", indent, clause.directive, condition));
                            walk(&clause.members, depth + 1, lines);
                        }
                    }
                    other => {
                        let name = other.name().map(|n| format!(" {}", n)).unwrap_or_default();
                        lines.push(format!("{}{}{}", indent, other.kind_name(), name));
                        if let Some(container) = other.as_type_decl() {
                            walk(&container.members, depth + 1, lines);
                        }
                    }
                }
            }
        }
        let mut lines = Vec::new();
        walk(declarations, 0, &mut lines);
        lines.join("\n")
    }

    fn type_of(source: &str) -> String {
        let decl = single_type(&format!("struct S {{\n    var x: {}\n}}", source));
        let binding = &variable(&decl.members[0]).bindings[0];
        binding.type_annotation.as_ref().unwrap().node.to_string()
    }

    #[test]
    fn test_parse_struct_with_stored_properties() {
        let source = r#"
@Partial
public struct User: Codable, Sendable {
    let id: String
    var email: String?
    var createdAt: Date = .now
}
"#;
        let file = parse_str(source).unwrap();
        let Decl::Struct(user) = &file.declarations[0].node else {
            panic!("expected struct");
        };
        assert_eq!(user.name.node, "User");
        assert_eq!(user.attributes[0].node.name.node, "Partial");
        assert_eq!(user.attributes[0].node.arguments, None);
        assert_eq!(user.modifiers[0].node.keyword, KeywordId::Public);
        assert_eq!(user.inheritance.len(), 2);
        assert_eq!(user.members.len(), 3);

        let created = &variable(&user.members[2]).bindings[0];
        assert_eq!(created.name.node, "createdAt");
        assert_eq!(created.initializer.as_ref().unwrap().node, ".now");
        assert!(created.is_stored());

        let body = &source[user.body.start..user.body.end];
        assert!(body.starts_with('{') && body.ends_with('}'));
    }

    #[test]
    fn test_parse_class_and_actor() {
        let file = parse_str("final class A {}\nactor B {}\n").unwrap();
        assert!(matches!(file.declarations[0].node, Decl::Class(_)));
        assert!(matches!(file.declarations[1].node, Decl::Actor(_)));
        assert_eq!(file.declarations[0].node.modifiers()[0].node.keyword, KeywordId::Final);
    }

    #[test]
    fn test_attribute_arguments() {
        let source = "@Partial(macros: \"@Observable\\n\", 42, flag: true, other: .some(x))\nstruct A {}";
        let decl = single_type(source);
        let attribute = &decl.attributes[0].node;
        let arguments = attribute.arguments.as_ref().unwrap();
        assert_eq!(arguments.len(), 4);

        assert_eq!(arguments[0].label.as_ref().unwrap().node, "macros");
        let literal = arguments[0].value.node.as_string_literal().unwrap();
        assert_eq!(literal.segments, vec![StringSegment::Text("@Observable\n".to_string())]);

        assert!(arguments[1].label.is_none());
        assert_eq!(arguments[1].value.node, Expr::Integer("42".to_string()));
        assert_eq!(arguments[2].value.node, Expr::Boolean(true));
        assert_eq!(arguments[3].value.node, Expr::Raw(".some(x)".to_string()));
    }

    #[test]
    fn test_empty_attribute_argument_list() {
        let decl = single_type("@Readonly()\nstruct A {}");
        assert_eq!(decl.attributes[0].node.arguments, Some(vec![]));
    }

    #[test]
    fn test_computed_and_observed_properties() {
        let source = r#"
struct A {
    var a: Int { 1 }
    var b: Int {
        get { 1 }
        set { }
    }
    var c: Int = 0 {
        didSet { print(c) }
    }
    var d: Int { get }
}
"#;
        let decl = single_type(source);
        let kinds: Vec<_> = decl
            .members
            .iter()
            .map(|m| variable(m).bindings[0].accessor_block.as_ref().unwrap().kind.clone())
            .collect();
        assert_eq!(kinds[0], AccessorBlockKind::Getter);
        assert_eq!(
            kinds[1],
            AccessorBlockKind::Accessors(vec!["get".to_string(), "set".to_string()])
        );
        assert_eq!(kinds[2], AccessorBlockKind::Accessors(vec!["didSet".to_string()]));
        assert_eq!(kinds[3], AccessorBlockKind::Accessors(vec!["get".to_string()]));

        let c = &variable(&decl.members[2]).bindings[0];
        assert_eq!(c.initializer.as_ref().unwrap().node, "0");
    }

    #[test]
    fn test_multiple_bindings() {
        let decl = single_type("struct A {\n    var x, y: Int, z = \"s\"\n}");
        let bindings = &variable(&decl.members[0]).bindings;
        assert_eq!(bindings.len(), 3);
        assert!(bindings[0].type_annotation.is_none());
        assert_eq!(bindings[1].type_annotation.as_ref().unwrap().node.to_string(), "Int");
        assert_eq!(bindings[2].initializer.as_ref().unwrap().node, "\"s\"");
    }

    #[test]
    fn test_multiline_initializer() {
        let source = "struct A {\n    var x = [1, 2]\n        .map { $0 + 1 }\n    let y = 1 +\n        2\n    let z: Int\n}";
        let decl = single_type(source);
        assert_eq!(decl.members.len(), 3);
        let x = &variable(&decl.members[0]).bindings[0];
        assert_eq!(x.initializer.as_ref().unwrap().node, "[1, 2] .map { $0 + 1 }");
        let y = &variable(&decl.members[1]).bindings[0];
        assert_eq!(y.initializer.as_ref().unwrap().node, "1 + 2");
    }

    #[test]
    fn test_type_annotation_forms() {
        assert_eq!(type_of("String?"), "String?");
        assert_eq!(type_of("String??"), "String??");
        assert_eq!(type_of("Int!"), "Int!");
        assert_eq!(type_of("[String]"), "[String]");
        assert_eq!(type_of("[String: [Int]]?"), "[String: [Int]]?");
        assert_eq!(type_of("Array<Array<Int>>"), "Array<Array<Int>>");
        assert_eq!(type_of("Swift.Result<Int, Error>"), "Swift.Result<Int, Error>");
        assert_eq!(type_of("(Int, label: String)"), "(Int, label: String)");
        assert_eq!(type_of("(Int) async throws -> Void"), "(Int) async throws -> Void");
        assert_eq!(type_of("(() -> Void)?"), "(() -> Void)?");
        assert_eq!(type_of("@escaping @Sendable () -> Int?"), "@escaping @Sendable () -> Int?");
        assert_eq!(type_of("any Codable & Sendable"), "any Codable & Sendable");
        assert_eq!(type_of("(any Error)?"), "(any Error)?");
        assert_eq!(type_of("Self.Element"), "Self.Element");
        assert_eq!(type_of("Foo.Type"), "Foo.Type");
    }

    #[test]
    fn test_functions_are_outlined() {
        let source = r#"
protocol P {
    func a() -> Int?
    var b: Int { get }
}
struct A {
    init(x: Int) { self.x = x }
    init?(string: String) where T: P {
        return nil
    }
    static func == (lhs: A, rhs: A) -> Bool { true }
    subscript(i: Int) -> Int { i }
    deinit {}
    private(set) var x: Int
}
"#;
        let file = parse_str(source).unwrap();
        let protocol = file.declarations[0].node.as_type_decl().unwrap();
        assert_eq!(protocol.members.len(), 2);

        let a = file.declarations[1].node.as_type_decl().unwrap();
        assert_eq!(a.members.len(), 6);
        let Decl::Function(init) = &a.members[1].node else {
            panic!("expected init");
        };
        assert_eq!(init.kind, FunctionKind::Init);
        assert_eq!(init.signature, "?(string: String) where T: P");
        assert!(init.body.is_some());

        let Decl::Function(eq) = &a.members[2].node else {
            panic!("expected operator function");
        };
        assert_eq!(eq.name, "==");

        let x = variable(&a.members[5]);
        assert_eq!(x.modifiers[0].node.keyword, KeywordId::Private);
        assert_eq!(x.modifiers[0].node.detail.as_deref(), Some("set"));
    }

    #[test]
    fn test_enum_and_nested_types() {
        let source = r#"
import Foundation
enum E: String {
    case a = "a", b
    indirect case c(E)
    struct Nested { let v: Int }
}
typealias Pair<T> = (T, T)
"#;
        let file = parse_str(source).unwrap();
        assert_eq!(file.declarations.len(), 3);
        let e = file.declarations[1].node.as_type_decl().unwrap();
        assert_eq!(e.members.len(), 3);
        let Decl::EnumCase(case) = &e.members[0].node else {
            panic!("expected case");
        };
        assert_eq!(case.elements.len(), 2);
        let Decl::TypeAlias(alias) = &file.declarations[2].node else {
            panic!("expected typealias");
        };
        assert_eq!(alias.target.node.to_string(), "(T, T)");
    }

    #[test]
    fn test_extension_and_directives() {
        let source = "extension Array.Index where Element: Equatable {\n#if DEBUG\n    var debug: Bool { true }\n#endif\n}";
        let decl = single_type(source);
        assert_eq!(decl.name.node, "Array.Index");
        assert_eq!(decl.members.len(), 1);
        let region = decl.members[0].node.as_if_config().expect("expected #if region");
        assert_eq!(region.clauses[0].condition.as_deref(), Some("DEBUG"));
        assert_eq!(region.clauses[0].members.len(), 1);
    }

    #[test]
    fn test_static_and_class_modifiers() {
        let decl = single_type("class A {\n    static let shared = A()\n    class var name: String { \"A\" }\n}");
        let shared = variable(&decl.members[0]);
        assert_eq!(shared.modifiers[0].node.keyword, KeywordId::Static);
        let name = variable(&decl.members[1]);
        assert_eq!(name.modifiers[0].node.keyword, KeywordId::Class);
    }

    #[test]
    fn test_if_config_branches_stay_separate() {
        let source = "struct Cfg {\n    let a: Int\n    #if os(iOS)\n    let platform: UIColor\n    #else\n    let platform: NSColor\n    #endif\n}";
        let decl = single_type(source);
        assert_eq!(decl.members.len(), 2);
        let region = decl.members[1].node.as_if_config().expect("expected #if region");
        assert_eq!(region.clauses.len(), 2);
        assert_eq!(region.clauses[0].directive, "if");
        assert_eq!(region.clauses[0].condition.as_deref(), Some("os(iOS)"));
        assert_eq!(region.clauses[1].directive, "else");
        assert_eq!(region.clauses[1].condition, None);
        assert_eq!(variable(&region.clauses[1].members[0]).bindings[0].name.node, "platform");
    }

    #[test]
    fn test_unterminated_if_config_is_an_error() {
        let errors = parse_str("struct A {\n    #if DEBUG\n    let a: Int\n}").unwrap_err();
        assert!(errors[0].message.contains("Expected '#endif' to close '#if'"), "got {:?}", errors);
    }

    #[test]
    fn test_line_directives_are_skipped() {
        let decl = single_type("struct A {\n    #warning(\"fix\")\n    let a: Int\n}");
        assert_eq!(decl.members.len(), 1);
    }

    #[test]
    fn test_outline_snapshot() {
        let source = r#"
import Foundation

@Partial
public struct Settings {
    let id: String
    var theme, accent: Color?
    #if os(iOS)
    var haptics: Bool
    #elseif os(macOS)
    var menuBar: Bool
    #else
    #endif
    func reset() {}
}

enum Mode {
    case light, dark
}
"#;
        let file = parse_str(source).unwrap();
        insta::assert_snapshot!(outline(&file.declarations), @r"
        import
        struct Settings
          let id: String
          var theme: _
          var accent: Color?
          #if os(iOS)
            var haptics: Bool
          #elseif os(macOS)
            var menuBar: Bool
          #else
          func reset
        enum Mode
          case
        ");
    }

    #[test]
    fn test_nested_types_outline_snapshot() {
        let source = "class Outer {\n    static let shared = Outer()\n    struct Inner {\n        var x: [String: Int]\n    }\n    var inner: Inner { Inner(x: [:]) }\n}";
        let file = parse_str(source).unwrap();
        insta::assert_snapshot!(outline(&file.declarations), @r"
        class Outer
          let shared: _
          struct Inner
            var x: [String: Int]
          var inner: Inner
        ");
    }

    #[test]
    fn test_member_errors_recover() {
        let source = "struct A {\n    var = 1\n    let ok: Int\n    var (a, b) = (1, 2)\n}";
        let errors = parse_str(source).unwrap_err();
        assert_eq!(errors.len(), 2, "got {:?}", errors);
        assert!(errors[0].message.contains("Expected property name"));
        assert!(errors[1].message.contains("Tuple patterns"));
    }

    #[test]
    fn test_file_level_statement_is_rejected() {
        let errors = parse_str("print(1)\nstruct A {}").unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "Expected declaration, found 'print'");
        assert_eq!(errors[0].hints.len(), 1);
    }
}
