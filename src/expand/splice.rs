//! Splice rendered fragments into the source text.
//!
//! Each fragment is inserted right before the closing `}` of its container, one indentation level deeper than the
//! line holding that brace. Insertions run back to front, so the byte spans recorded by the parser stay valid for
//! every insertion that is still pending. The fragments of one container go in as a single insertion.

use crate::ast::Span;
use crate::render::{Fragment, RenderConfig};

use super::driver::Expansion;

/// Return `source` with every expansion's fragments inserted into the container body.
///
/// Several applications on one container are inserted together, in attribute order.
pub fn splice(source: &str, expansions: &[Expansion], config: &RenderConfig) -> String {
    let mut ordered: Vec<&Expansion> = expansions
        .iter()
        .filter(|expansion| {
            let body = expansion.body;
            let valid = body.start < body.end && body.end <= source.len() && source.is_char_boundary(body.end - 1);
            if !valid {
                tracing::warn!(body = ?body, "skipping expansion with a body span outside the source");
            }
            valid
        })
        .collect();
    ordered.sort_by_key(|expansion| (expansion.body.end, expansion.attribute.start));

    let mut groups: Vec<(Span, Vec<&Fragment>)> = Vec::new();
    for expansion in ordered {
        if let Some((_, fragments)) = groups.last_mut().filter(|(body, _)| *body == expansion.body) {
            fragments.extend(&expansion.fragments);
            continue;
        }
        groups.push((expansion.body, expansion.fragments.iter().collect()));
    }

    let mut output = source.to_string();
    for (body, fragments) in groups.iter().rev() {
        let (at, text) = insertion(&output, *body, fragments, config);
        output.insert_str(at, &text);
    }
    output
}

/// Where to insert `fragments` for the member block `body`, and the text to insert.
fn insertion(source: &str, body: Span, fragments: &[&Fragment], config: &RenderConfig) -> (usize, String) {
    let close = body.end - 1;
    let line_start = source[..close].rfind('\n').map_or(0, |i| i + 1);
    let line = &source[line_start..];
    let base_indent = &line[..line.len() - line.trim_start().len()];
    let member_indent = format!("{}{}", base_indent, config.indent_unit());

    let has_members = !source[body.start + 1..close].trim().is_empty();
    let brace_starts_line = source[line_start..close].trim().is_empty();

    let mut text = String::new();
    if !brace_starts_line {
        text.push('\n');
    }
    for (index, fragment) in fragments.iter().enumerate() {
        if (has_members || index > 0) && config.blank_line_between_members {
            text.push('\n');
        }
        for fragment_line in fragment.text.lines() {
            if !fragment_line.is_empty() {
                text.push_str(&member_indent);
                text.push_str(fragment_line);
            }
            text.push('\n');
        }
    }

    if brace_starts_line {
        (line_start, text)
    } else {
        text.push_str(base_indent);
        (close, text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expand::driver::expand_source_file;
    use crate::{lexer, parser};

    fn splice_str(source: &str, config: &RenderConfig) -> String {
        let tokens = lexer::lex(source).unwrap();
        let file = parser::parse(&tokens).unwrap();
        let result = expand_source_file(&file, config);
        assert!(result.is_success(), "{:?}", result.failures);
        splice(source, &result.expansions, config)
    }

    #[test]
    fn test_fragment_goes_before_closing_brace() {
        let source = "@Readonly\nstruct P {\n    let x: Int\n}\n";
        let expected = "\
@Readonly
struct P {
    let x: Int

    struct Readonly {
        let x: Int

        init(p: P) {
            self.x = p.x
        }

        init(x: Int) {
            self.x = x
        }
    }
}
";
        assert_eq!(splice_str(source, &RenderConfig::default()), expected);
    }

    #[test]
    fn test_nested_container_uses_its_own_indentation() {
        let source = "enum N {\n  @Partial\n  struct Q {\n    var a: Int\n  }\n}\n";
        let config = RenderConfig::new()
            .with_indent_width(2)
            .with_blank_line_between_members(false);
        let output = splice_str(source, &config);
        let expected = "\
enum N {
  @Partial
  struct Q {
    var a: Int
    struct Partial {
      var a: Int?
      init(q: Q) {
        self.a = q.a
      }
      init(a: Int??) {
        self.a = a
      }
    }
  }
}
";
        assert_eq!(output, expected);
    }

    #[test]
    fn test_single_line_body() {
        let source = "@Readonly struct E {}";
        let output = splice_str(source, &RenderConfig::default());
        assert_eq!(
            output,
            "@Readonly struct E {\n    struct Readonly {\n        init(e: E) {}\n\n        init() {}\n    }\n}"
        );
    }

    #[test]
    fn test_two_applications_keep_attribute_order() {
        let source = "@Partial\n@Readonly\nstruct S {\n    let v: Int\n}\n";
        let output = splice_str(source, &RenderConfig::default());
        let partial = output.find("struct Partial").unwrap();
        let readonly = output.find("struct Readonly").unwrap();
        assert!(partial < readonly);
        assert!(output.ends_with("    }\n}\n"));
    }

    #[test]
    fn test_no_expansions_returns_source_unchanged() {
        let source = "struct Plain {\n    var x: Int\n}\n";
        assert_eq!(splice(source, &[], &RenderConfig::default()), source);
    }
}
