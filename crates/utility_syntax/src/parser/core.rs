/// Parser core types and entrypoint.
///
/// This chunk defines the [`Parser`] type and its top-level `parse()` entrypoint.
///
/// ## Notes
/// - This file is `include!`'d into `crate::parser` to keep all parser methods in a
///   single module while avoiding a single “god file”.

/// Where a declaration appears; recovery stops at different boundaries in each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeclContext {
    File,
    Member,
}

/// Parser state.
///
/// ## Notes
/// - The parser is single-pass and recovers from errors by synchronizing at the next line that starts a
///   declaration, so one pass can report several problems.
/// - Most parsing helpers are implemented on `Parser` but split across multiple files.
pub struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    errors: Vec<CompileError>,
}

impl<'a> Parser<'a> {
    /// Create a new parser for a token stream.
    ///
    /// ## Parameters
    /// - `tokens`: Token stream produced by `utility_syntax::lexer`; must end with `Eof`.
    pub fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            pos: 0,
            errors: Vec::new(),
        }
    }

    /// Parse the entire token stream into a [`SourceFile`].
    ///
    /// ## Errors
    /// Returns a list of [`CompileError`]s if parsing fails. The parser attempts
    /// to recover and continue after an error to report multiple issues in one pass.
    pub fn parse(mut self) -> Result<SourceFile, Vec<CompileError>> {
        let mut declarations = Vec::new();

        while !self.is_at_end() {
            if self.match_punct(PunctuationId::Semicolon) {
                continue;
            }
            match self.declaration(DeclContext::File) {
                Ok(Some(decl)) => declarations.push(decl),
                Ok(None) => {}
                Err(e) => {
                    self.errors.push(e);
                    self.synchronize(DeclContext::File);
                }
            }
        }

        if self.errors.is_empty() {
            Ok(SourceFile { declarations })
        } else {
            Err(self.errors)
        }
    }
}
