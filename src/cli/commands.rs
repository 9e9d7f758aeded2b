//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::fs;
use std::path::Path;

use miette::{Diagnostic, GraphicalReportHandler, GraphicalTheme};

use crate::ast::SourceFile;
use crate::diagnostics::{CompileError, SourceDiagnostic};
use crate::expand::driver::{ExpansionFailure, FileExpansion, expand_source_file};
use crate::expand::{ExpansionError, splice::splice};
use crate::render::RenderConfig;
use crate::{lexer, parser};

use super::{CliError, CliResult, ExitCode};

/// Maximum source file size (100 MB)
///
/// Larger files are rejected before reading.
const MAX_SOURCE_SIZE: u64 = 100 * 1024 * 1024;

/// Read a source file with a size check.
///
/// ## Errors
/// - The file cannot be stat'ed or read
/// - The file exceeds `MAX_SOURCE_SIZE` (100 MB)
pub fn read_source(file_path: &str) -> CliResult<String> {
    let metadata =
        fs::metadata(file_path).map_err(|e| CliError::failure(format!("Error reading file '{}': {}", file_path, e)))?;

    if metadata.len() > MAX_SOURCE_SIZE {
        return Err(CliError::failure(format!(
            "Error: file '{}' is too large ({} bytes, limit is {} bytes)",
            file_path,
            metadata.len(),
            MAX_SOURCE_SIZE
        )));
    }

    fs::read_to_string(file_path).map_err(|e| CliError::failure(format!("Error reading file '{}': {}", file_path, e)))
}

// ============================================================================
// Diagnostics rendering
// ============================================================================

/// Render a diagnostic with `miette`'s graphical handler (no colors).
fn render_diagnostic(diagnostic: &dyn Diagnostic) -> String {
    let handler = GraphicalReportHandler::new_themed(GraphicalTheme::unicode_nocolor());
    let mut out = String::new();
    if handler.render_report(&mut out, diagnostic).is_err() {
        return diagnostic.to_string();
    }
    out
}

fn syntax_failure(file_path: &str, source: &str, errors: &[CompileError]) -> CliError {
    let mut msg = String::new();
    for err in errors {
        msg.push_str(&render_diagnostic(&err.to_diagnostic(file_path, source)));
    }
    CliError::failure(msg.trim_end())
}

fn expansion_diagnostic(file_path: &str, source: &str, failure: &ExpansionFailure) -> SourceDiagnostic {
    let diagnostic = SourceDiagnostic::new(
        file_path,
        source,
        format!("expansion error: {}", failure.error),
        failure.attribute,
        "expanded here",
    );
    match &failure.error {
        ExpansionError::UnsupportedDeclarationKind { found, .. } => {
            diagnostic.with_help(format!("the annotated declaration is a `{}`", found))
        }
        ExpansionError::UnexpectedInterpolation { .. } => {
            diagnostic.with_help("forwarded macros are inserted verbatim; write them as plain text")
        }
        ExpansionError::CastFailure { .. } | ExpansionError::UnwrapFailure { .. } => diagnostic,
    }
}

fn expansion_failure(file_path: &str, source: &str, failures: &[ExpansionFailure]) -> CliError {
    let mut msg = String::new();
    for failure in failures {
        msg.push_str(&render_diagnostic(&expansion_diagnostic(file_path, source, failure)));
    }
    CliError::failure(msg.trim_end())
}

// ============================================================================
// Pipeline
// ============================================================================

/// Lex and parse `source`, rendering every syntax error on failure.
fn load(file_path: &str, source: &str) -> CliResult<SourceFile> {
    let tokens = lexer::lex(source).map_err(|errs| syntax_failure(file_path, source, &errs))?;
    parser::parse(&tokens).map_err(|errs| syntax_failure(file_path, source, &errs))
}

/// Run every expansion in `source`; fails if any application fails.
fn expand_all(file_path: &str, source: &str, config: &RenderConfig) -> CliResult<FileExpansion> {
    let file = load(file_path, source)?;
    let result = expand_source_file(&file, config);
    if !result.is_success() {
        return Err(expansion_failure(file_path, source, &result.failures));
    }
    Ok(result)
}

/// Expand `source` and return the text to emit.
///
/// With `fragments_only` the result is the generated declarations separated by blank lines; otherwise it is the
/// full source with every declaration spliced in.
pub fn expand_source(file_path: &str, source: &str, fragments_only: bool, config: &RenderConfig) -> CliResult<String> {
    let result = expand_all(file_path, source, config)?;
    if fragments_only {
        return Ok(result
            .fragments()
            .map(|fragment| fragment.text.as_str())
            .collect::<Vec<_>>()
            .join("\n"));
    }
    Ok(splice(source, &result.expansions, config))
}

// ============================================================================
// Commands
// ============================================================================

/// Tokenize and display tokens.
pub fn lex_file(file_path: &str) -> CliResult<ExitCode> {
    let source = read_source(file_path)?;
    let tokens = lexer::lex(&source).map_err(|errs| syntax_failure(file_path, &source, &errs))?;

    for tok in &tokens {
        println!("{:?}", tok);
    }
    Ok(ExitCode::SUCCESS)
}

/// Parse and display AST.
pub fn parse_file(file_path: &str) -> CliResult<ExitCode> {
    let source = read_source(file_path)?;
    let ast = load(file_path, &source)?;
    println!("{:#?}", ast);
    Ok(ExitCode::SUCCESS)
}

/// Expand a file and return the text to emit.
pub fn expand_file(file_path: &str, fragments_only: bool, config: &RenderConfig) -> CliResult<String> {
    let source = read_source(file_path)?;
    expand_source(file_path, &source, fragments_only, config)
}

/// Write `rendered` to `output`, or to stdout when no path is given.
pub fn emit(rendered: &str, output: Option<&Path>) -> CliResult<ExitCode> {
    match output {
        Some(path) => {
            fs::write(path, rendered)
                .map_err(|e| CliError::failure(format!("Error writing '{}': {}", path.display(), e)))?;
            tracing::info!(path = %path.display(), bytes = rendered.len(), "wrote expanded source");
        }
        None => print!("{}", rendered),
    }
    Ok(ExitCode::SUCCESS)
}

/// Run every expansion and report errors only.
pub fn check_file(file_path: &str) -> CliResult<ExitCode> {
    let source = read_source(file_path)?;
    let result = expand_all(file_path, &source, &RenderConfig::default())?;
    println!("✓ {} ({} expansion(s))", file_path, result.expansions.len());
    Ok(ExitCode::SUCCESS)
}
