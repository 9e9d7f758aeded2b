/// Miscellaneous parser utilities.
///
/// This chunk contains small shared parsing helpers that don’t cleanly fit into
/// “decl”, “types” or “expr” (name parsing and token descriptions for messages).
impl<'a> Parser<'a> {
    // ========================================================================
    // Utilities
    // ========================================================================

    /// Parse a name: an identifier or a contextual keyword.
    fn name(&mut self, msg: &str) -> Result<Ident, CompileError> {
        Ok(self.name_spanned(msg)?.node)
    }

    fn name_spanned(&mut self, msg: &str) -> Result<Spanned<Ident>, CompileError> {
        match self.peek().kind.name_spelling() {
            Some(name) => {
                let name = Spanned::new(name.to_string(), self.current_span());
                self.advance();
                Ok(name)
            }
            None => Err(self.error_here(msg)),
        }
    }

    /// Parse a name after `.`, where any keyword spelling is allowed (`Foo.Type`, `P.Protocol`, `x.self`).
    fn member_name(&mut self, msg: &str) -> Result<Ident, CompileError> {
        if let TokenKind::Keyword(id) = self.peek().kind {
            self.advance();
            return Ok(keywords::as_str(id).to_string());
        }
        self.name(msg)
    }
}

/// Describe a token for an error message.
fn describe(kind: &TokenKind) -> String {
    match kind {
        TokenKind::Eof => kind.to_string(),
        _ => format!("'{}'", kind),
    }
}
