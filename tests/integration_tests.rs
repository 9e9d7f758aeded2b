//! Integration tests for the utility-types generator

use std::fs;
use std::path::Path;
use std::thread;

use utility_core::lang::macros::UtilityMacroId;
use utility_types::ast::{Decl, SourceFile};
use utility_types::expand::driver::FileExpansion;
use utility_types::{ExpansionError, Fragment, RenderConfig, expand, expand_source_file, lexer, parser, splice};

fn parse_source(source: &str) -> SourceFile {
    let tokens = lexer::lex(source).expect("lexer failed");
    parser::parse(&tokens).expect("parser failed")
}

fn first_decl(source: &str) -> Decl {
    parse_source(source).declarations.remove(0).node
}

fn expand_first(macro_id: UtilityMacroId, source: &str) -> Result<Vec<Fragment>, ExpansionError> {
    let decl = first_decl(source);
    let attribute = decl.attributes()[0].node.clone();
    expand(macro_id, &attribute, &decl)
}

const USER: &str = "\
@Partial
struct User {
    var id: String
    var email: String?
    let createdAt: Date
}
";

#[test]
fn test_user_partial_scenario() {
    let fragments = expand_first(UtilityMacroId::Partial, USER).unwrap();
    assert_eq!(fragments.len(), 1);
    let text = &fragments[0].text;
    for line in [
        "struct Partial {",
        "    var id: String?",
        "    var email: String?",
        "    var createdAt: Date?",
        "    init(user: User) {",
        "        self.id = user.id",
        "        self.email = user.email",
        "        self.createdAt = user.createdAt",
        "    init(id: String??, email: String??, createdAt: Date??) {",
        "        self.createdAt = createdAt",
    ] {
        assert!(text.lines().any(|l| l == line), "missing line {:?} in\n{}", line, text);
    }
    assert!(!text.contains("public"));
}

#[test]
fn test_user_readonly_scenario() {
    let fragments = expand_first(UtilityMacroId::Readonly, USER).unwrap();
    let text = &fragments[0].text;
    assert!(text.contains("    let id: String\n    let email: String?\n    let createdAt: Date\n"));
    assert!(text.contains("    init(id: String, email: String?, createdAt: Date) {\n"));
    assert!(!text.contains("var "));
}

#[test]
fn test_public_access_reaches_every_declaration() {
    let source = "@Readonly\npublic class Token {\n    let value: String\n}\n";
    let fragments = expand_first(UtilityMacroId::Readonly, source).unwrap();
    let text = &fragments[0].text;
    assert!(text.starts_with("public class Readonly {\n"));
    assert!(text.contains("    public let value: String\n"));
    assert!(text.contains("    public init(token: Token) {\n"));
    assert!(text.contains("    public init(value: String) {\n"));
}

#[test]
fn test_forwarded_macros_precede_declaration() {
    let source = "@Partial(macros: \"@Foo\\n@Bar\")\nstruct S {\n    let a: Int\n}\n";
    let fragments = expand_first(UtilityMacroId::Partial, source).unwrap();
    assert!(fragments[0].text.starts_with("@Foo\n@Bar\nstruct Partial {\n"));
}

#[test]
fn test_conditional_members_stay_out_of_generated_type() {
    let source = "\
@Readonly
struct Cfg {
    let a: Int
    #if os(iOS)
    let platform: UIColor
    #else
    let platform: NSColor
    #endif
}
";
    let fragments = expand_first(UtilityMacroId::Readonly, source).unwrap();
    let text = &fragments[0].text;
    assert!(!text.contains("platform"), "{}", text);
    assert!(text.contains("    init(a: Int) {\n"));

    let file = parse_source(source);
    let expansion = expand_source_file(&file, &RenderConfig::default());
    let output = splice(source, &expansion.expansions, &RenderConfig::default());
    let reparsed = parse_source(&output);
    let cfg = reparsed.declarations[0].node.as_type_decl().unwrap();
    assert_eq!(cfg.members.len(), 3);
    assert!(cfg.members[1].node.as_if_config().is_some());
}

#[test]
fn test_enum_yields_error_and_no_fragments() {
    let source = "@Partial\nenum Direction {\n    case up, down\n}\n";
    let result = expand_first(UtilityMacroId::Partial, source);
    assert!(matches!(
        result,
        Err(ExpansionError::UnsupportedDeclarationKind {
            macro_name: "Partial",
            found: "enum"
        })
    ));

    let file = parse_source(source);
    let expansion = expand_source_file(&file, &RenderConfig::default());
    assert_eq!(expansion.fragments().count(), 0);
    assert_eq!(expansion.failures.len(), 1);
    assert_eq!(splice(source, &expansion.expansions, &RenderConfig::default()), source);
}

#[test]
fn test_syntax_errors_are_collected() {
    let tokens = lexer::lex("struct A {\n    var = 1\n}\nstruct B {\n    let (x, y) = (1, 2)\n}\n").unwrap();
    let errors = parser::parse(&tokens).unwrap_err();
    assert_eq!(errors.len(), 2, "{:?}", errors);
}

/// Every input fixture expands cleanly and the spliced result parses again.
#[test]
fn test_expansion_inputs_round_trip() {
    let inputs = Path::new("tests/expansion_inputs");
    for entry in fs::read_dir(inputs).unwrap() {
        let path = entry.unwrap().path();
        if path.extension().map(|e| e == "swift").unwrap_or(false) {
            let source = fs::read_to_string(&path).unwrap();
            let config = RenderConfig::default();
            let expansion = expand_source_file(&parse_source(&source), &config);
            assert!(expansion.is_success(), "{}: {:?}", path.display(), expansion.failures);
            assert!(!expansion.expansions.is_empty(), "{} has no expansions", path.display());

            let output = splice(&source, &expansion.expansions, &config);
            let tokens = lexer::lex(&output).unwrap();
            assert!(
                parser::parse(&tokens).is_ok(),
                "spliced output of {} does not parse:\n{}",
                path.display(),
                output
            );
        }
    }
}

fn assert_send_sync<T: Send + Sync>() {}

#[test]
fn test_parallel_expansion_matches_sequential() {
    assert_send_sync::<SourceFile>();
    assert_send_sync::<FileExpansion>();
    assert_send_sync::<RenderConfig>();

    let sources: Vec<String> = (0..8)
        .map(|i| {
            format!(
                "@Partial\n@Readonly\npublic struct Model{} {{\n    var a{}: Int\n    let b: [String: Double]?\n}}\n",
                i, i
            )
        })
        .collect();
    let files: Vec<SourceFile> = sources.iter().map(|s| parse_source(s)).collect();
    let config = RenderConfig::default();

    let sequential: Vec<FileExpansion> = files.iter().map(|f| expand_source_file(f, &config)).collect();
    let config = &config;
    let parallel: Vec<FileExpansion> = thread::scope(|scope| {
        let handles: Vec<_> = files
            .iter()
            .map(|file| scope.spawn(move || expand_source_file(file, config)))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(sequential, parallel);
    for (i, expansion) in parallel.iter().enumerate() {
        assert_eq!(expansion.fragments().count(), 2);
        let partial = &expansion.expansions[0].fragments[0].text;
        assert!(partial.contains(&format!("public init(model{}: Model{})", i, i)));
    }
}
