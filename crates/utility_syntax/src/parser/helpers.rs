/// Token-stream helpers and error recovery.
///
/// This chunk contains the low-level primitives used throughout parsing:
/// - Peeking/consuming tokens (`peek`, `peek_at`, `advance`)
/// - Matching / expecting keywords and punctuation
/// - Error recovery (`synchronize`)
impl<'a> Parser<'a> {
    // ========================================================================
    // Helpers
    // ========================================================================

    /// Return `true` if the current token is [`TokenKind::Eof`].
    fn is_at_end(&self) -> bool {
        matches!(self.peek().kind, TokenKind::Eof)
    }

    /// Return the current token without consuming it.
    fn peek(&self) -> &Token {
        self.peek_at(0)
    }

    /// Return the token after the current token without consuming it.
    fn peek_next(&self) -> &Token {
        self.peek_at(1)
    }

    /// Return the token `offset` positions ahead, clamped to the trailing `Eof`.
    fn peek_at(&self, offset: usize) -> &Token {
        let index = (self.pos + offset).min(self.tokens.len() - 1);
        &self.tokens[index]
    }

    /// Advance to the next token and return the token we just consumed.
    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.pos += 1;
        }
        &self.tokens[self.pos.saturating_sub(1)]
    }

    /// Return `true` if the current token is the given keyword.
    fn check_keyword(&self, id: KeywordId) -> bool {
        self.peek().kind.is_keyword(id)
    }

    /// Return `true` if the current token is the given punctuation.
    fn check_punct(&self, id: PunctuationId) -> bool {
        self.peek().kind.is_punctuation(id)
    }

    fn match_keyword(&mut self, id: KeywordId) -> bool {
        if self.check_keyword(id) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn match_punct(&mut self, id: PunctuationId) -> bool {
        if self.check_punct(id) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect_keyword(&mut self, id: KeywordId, msg: &str) -> Result<&Token, CompileError> {
        if self.check_keyword(id) {
            Ok(self.advance())
        } else {
            Err(self.error_here(msg))
        }
    }

    fn expect_punct(&mut self, id: PunctuationId, msg: &str) -> Result<&Token, CompileError> {
        if self.check_punct(id) {
            Ok(self.advance())
        } else {
            Err(self.error_here(msg))
        }
    }

    /// Build a syntax error at the current token: `"<msg>, found <token>"`.
    fn error_here(&self, msg: &str) -> CompileError {
        CompileError::syntax(
            format!("{}, found {}", msg, describe(&self.peek().kind)),
            self.current_span(),
        )
    }

    fn current_span(&self) -> Span {
        self.peek().span
    }

    /// Span of the most recently consumed token.
    fn previous_span(&self) -> Span {
        match self.pos.checked_sub(1) {
            Some(index) => self.tokens[index].span,
            None => Span::new(self.current_span().start, self.current_span().start),
        }
    }

    /// Return `true` if the current token can begin a declaration.
    fn is_at_declaration_start(&self) -> bool {
        let kind = &self.peek().kind;
        if kind.is_punctuation(PunctuationId::At) || kind.is_punctuation(PunctuationId::Hash) {
            return true;
        }
        kind.keyword_id().is_some_and(|id| {
            matches!(
                keywords::category(id),
                keywords::KeywordCategory::Declaration
                    | keywords::KeywordCategory::Binding
                    | keywords::KeywordCategory::Access
                    | keywords::KeywordCategory::Modifier
            )
        })
    }

    /// Skip tokens until the next line that starts a declaration.
    ///
    /// Bracketed groups are skipped whole. In member context a `}` that closes the enclosing body stops recovery
    /// without being consumed.
    fn synchronize(&mut self, context: DeclContext) {
        let start = self.pos;
        let mut depth = 0usize;
        while !self.is_at_end() {
            let token = self.peek();
            if depth == 0 && self.pos > start && token.newline_before && self.is_at_declaration_start() {
                return;
            }
            match token.punctuation_id() {
                Some(PunctuationId::LBrace | PunctuationId::LParen | PunctuationId::LBracket) => depth += 1,
                Some(PunctuationId::RBrace) if depth == 0 && context == DeclContext::Member => return,
                Some(PunctuationId::RBrace | PunctuationId::RParen | PunctuationId::RBracket) => {
                    depth = depth.saturating_sub(1)
                }
                _ => {}
            }
            self.advance();
        }
    }
}
