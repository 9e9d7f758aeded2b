//! Diagnostics and error reporting for the syntax frontend.
//!
//! [`CompileError`] is the plain data produced by the lexer and parser. [`SourceDiagnostic`] is its user-facing
//! form: a `miette` diagnostic carrying the named source, a labelled span, and optional help text. Tools (the CLI,
//! tests) convert at the edge so the frontend itself stays free of presentation concerns.

use miette::{Diagnostic, LabeledSpan, NamedSource, SourceSpan};
use thiserror::Error;

use crate::ast::Span;

/// A lexing or parsing error with location information.
#[derive(Debug, Clone, PartialEq)]
pub struct CompileError {
    pub message: String,
    pub span: Span,
    pub kind: ErrorKind,
    pub notes: Vec<String>,
    pub hints: Vec<String>,
}

impl CompileError {
    pub fn new(message: String, span: Span) -> Self {
        Self {
            message,
            span,
            kind: ErrorKind::Lexical,
            notes: Vec::new(),
            hints: Vec::new(),
        }
    }

    pub fn syntax(message: String, span: Span) -> Self {
        Self {
            message,
            span,
            kind: ErrorKind::Syntax,
            notes: Vec::new(),
            hints: Vec::new(),
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hints.push(hint.into());
        self
    }

    /// Convert into a [`SourceDiagnostic`] pointing into `source`.
    pub fn to_diagnostic(&self, file_name: &str, source: &str) -> SourceDiagnostic {
        let mut diagnostic = SourceDiagnostic::new(
            file_name,
            source,
            format!("{}: {}", self.kind, self.message),
            self.span,
            self.kind.to_string(),
        );
        for note in &self.notes {
            diagnostic = diagnostic.with_help(format!("note: {}", note));
        }
        for hint in &self.hints {
            diagnostic = diagnostic.with_help(hint.clone());
        }
        diagnostic
    }
}

impl std::fmt::Display for CompileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for CompileError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Lexical,
    Syntax,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Lexical => write!(f, "lexical error"),
            ErrorKind::Syntax => write!(f, "syntax error"),
        }
    }
}

/// A diagnostic ready to be rendered by `miette` against its source text.
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
pub struct SourceDiagnostic {
    message: String,
    #[source_code]
    source_code: NamedSource<String>,
    #[label(collection)]
    labels: Vec<LabeledSpan>,
    #[help]
    help: Option<String>,
}

impl SourceDiagnostic {
    /// Create a diagnostic with a single labelled span.
    ///
    /// ## Parameters
    /// - `file_name`: name shown in the rendered header.
    /// - `source`: the full source text the span points into.
    /// - `span`: byte-offset span; clamped to the source length.
    pub fn new(
        file_name: &str,
        source: &str,
        message: impl Into<String>,
        span: Span,
        label: impl Into<String>,
    ) -> Self {
        Self {
            message: message.into(),
            source_code: NamedSource::new(file_name, source.to_string()),
            labels: vec![LabeledSpan::new_with_span(
                Some(label.into()),
                to_source_span(span, source.len()),
            )],
            help: None,
        }
    }

    /// Append a line of help text.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        let help = help.into();
        self.help = Some(match self.help.take() {
            Some(existing) => format!("{}\n{}", existing, help),
            None => help,
        });
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

fn to_source_span(span: Span, source_len: usize) -> SourceSpan {
    let start = span.start.min(source_len);
    let end = span.end.clamp(start, source_len);
    SourceSpan::from((start, end - start))
}

/// Get line number, column number, and line text for a byte offset.
pub fn line_info(source: &str, offset: usize) -> (usize, usize, &str) {
    let offset = offset.min(source.len());
    let mut line_num = 1;
    let mut line_start = 0;

    for (i, c) in source.char_indices() {
        if i >= offset {
            break;
        }
        if c == '\n' {
            line_num += 1;
            line_start = i + 1;
        }
    }

    let line_end = source[line_start..]
        .find('\n')
        .map(|i| line_start + i)
        .unwrap_or(source.len());

    (line_num, offset - line_start + 1, &source[line_start..line_end])
}
