//! Text rendering of derived declarations.
//!
//! Rendering takes already-validated [`DerivedDeclaration`] values and produces text; it never looks at the syntax
//! tree and never fails. There is one function per declaration shape:
//!
//! - [`render_field`]: `public var id: String?`
//! - [`render_constructor`]: `init(…) { self.x = … }`
//! - [`render_declaration`]: the whole nested type, forwarded annotations first
//!
//! [`assemble`] wraps the rendered declaration into a [`Fragment`] for the host to splice.

pub mod config;
pub mod writer;

use std::fmt;

use crate::expand::analyzer::Access;
use crate::expand::transform::{Constructor, DerivedDeclaration, DerivedField};

pub use config::RenderConfig;
pub use writer::CodeWriter;

/// One generated member declaration, rendered at indentation level zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    /// Name of the derived type (`Partial`, `Readonly`).
    pub name: &'static str,
    /// Rendered text; every line ends with `\n`.
    pub text: String,
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Render one stored field: `<access><let|var> <name>: <Type>`.
pub fn render_field(field: &DerivedField, access: Access) -> String {
    format!("{}{} {}: {}", access.prefix(), field.specifier, field.name, field.ty)
}

/// Render an initializer with one `self.<field> = <value>` line per assignment.
pub fn render_constructor(constructor: &Constructor, access: Access, config: &RenderConfig) -> String {
    let parameters = constructor
        .parameters
        .iter()
        .map(|p| format!("{}: {}", p.label, p.ty))
        .collect::<Vec<_>>()
        .join(", ");
    let header = format!("{}init({})", access.prefix(), parameters);

    let mut writer = CodeWriter::new(config.clone());
    if constructor.assignments.is_empty() {
        writer.writeln(&format!("{} {{}}", header));
        return writer.finish();
    }
    writer.writeln(&format!("{} {{", header));
    writer.indent();
    for assignment in &constructor.assignments {
        writer.writeln(&format!("self.{} = {}", assignment.target, assignment.value));
    }
    writer.dedent();
    writer.writeln("}");
    writer.finish()
}

/// Render the complete derived type.
///
/// Layout: forwarded annotation lines, the declaration header, the fields, the from-source initializer, then the
/// raw-value initializer.
pub fn render_declaration(declaration: &DerivedDeclaration, config: &RenderConfig) -> String {
    let access = declaration.access;
    let mut writer = CodeWriter::new(config.clone());
    let separator = usize::from(config.blank_line_between_members);

    for line in declaration.forwarded_annotations.lines() {
        writer.writeln(line);
    }
    writer.writeln(&format!(
        "{}{} {} {{",
        access.prefix(),
        declaration.kind.keyword(),
        declaration.name
    ));
    writer.indent();

    for field in &declaration.fields {
        writer.writeln(&render_field(field, access));
    }
    if !declaration.fields.is_empty() {
        writer.blank_lines(separator);
    }
    writer.write_block(&render_constructor(&declaration.from_source, access, config));
    writer.blank_lines(separator);
    writer.write_block(&render_constructor(&declaration.from_raw, access, config));

    writer.dedent();
    writer.writeln("}");
    writer.finish()
}

/// Render a derived declaration into a splice-ready fragment.
pub fn assemble(declaration: &DerivedDeclaration, config: &RenderConfig) -> Fragment {
    Fragment {
        name: declaration.name,
        text: render_declaration(declaration, config),
    }
}
