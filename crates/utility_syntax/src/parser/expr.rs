/// Attribute and expression parsing.
///
/// Expressions appear in two places: attribute arguments, which are parsed into the small [`Expr`] language
/// (literals and identifiers, anything else kept as raw text), and initializer values, which are only captured as
/// raw text. This chunk also holds the balanced-group skipping used for bodies.

/// Where a raw expression ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RawExprEnd {
    /// An attribute argument: ends at `,` or `)`.
    Argument,
    /// An initializer or raw value: also ends at a line break that does not continue the expression.
    Statement,
}

impl<'a> Parser<'a> {
    // ========================================================================
    // Attributes
    // ========================================================================

    fn attributes(&mut self) -> Result<Vec<Spanned<Attribute>>, CompileError> {
        let mut attributes = Vec::new();
        while self.check_punct(PunctuationId::At) {
            attributes.push(self.attribute()?);
        }
        Ok(attributes)
    }

    /// Parse `@Name` or `@Name(arguments)`. The argument list must directly follow the name.
    fn attribute(&mut self) -> Result<Spanned<Attribute>, CompileError> {
        let start = self.advance().span.start; // '@'
        let mut name = self.name_spanned("Expected attribute name after '@'")?;
        while self.check_punct(PunctuationId::Dot) && self.current_span().start == name.span.end {
            self.advance();
            let member = self.member_name("Expected name after '.'")?;
            name.node = format!("{}.{}", name.node, member);
            name.span.end = self.previous_span().end;
        }

        let arguments = if self.check_punct(PunctuationId::LParen) && self.current_span().start == name.span.end {
            self.advance();
            let mut arguments = Vec::new();
            while !self.check_punct(PunctuationId::RParen) {
                arguments.push(self.argument()?);
                if !self.match_punct(PunctuationId::Comma) {
                    break;
                }
            }
            self.expect_punct(PunctuationId::RParen, "Expected ')' after attribute arguments")?;
            Some(arguments)
        } else {
            None
        };

        Ok(Spanned::new(
            Attribute { name, arguments },
            Span::new(start, self.previous_span().end),
        ))
    }

    /// Parse `label: value` or `value`.
    fn argument(&mut self) -> Result<Argument, CompileError> {
        let label_spelling = match &self.peek().kind {
            TokenKind::Ident(name) => Some(name.clone()),
            TokenKind::Keyword(id) => Some(keywords::as_str(*id).to_string()),
            _ => None,
        };
        let label = match label_spelling {
            Some(spelling) if self.peek_next().kind.is_punctuation(PunctuationId::Colon) => {
                let span = self.current_span();
                self.advance();
                self.advance();
                Some(Spanned::new(spelling, span))
            }
            _ => None,
        };
        let value = self.argument_value()?;
        Ok(Argument { label, value })
    }

    /// Parse an argument value: a single literal or identifier, otherwise raw text.
    fn argument_value(&mut self) -> Result<Spanned<Expr>, CompileError> {
        let next = &self.peek_next().kind;
        let single = next.is_punctuation(PunctuationId::Comma) || next.is_punctuation(PunctuationId::RParen);
        if single {
            let token = self.peek();
            let expr = match &token.kind {
                TokenKind::String(s) => Some(Expr::StringLiteral(StringLiteral {
                    segments: s
                        .parts
                        .iter()
                        .map(|part| match part {
                            StringPart::Text(text) => StringSegment::Text(text.clone()),
                            StringPart::Interpolation(expr) => StringSegment::Interpolation(expr.clone()),
                        })
                        .collect(),
                    multiline: s.multiline,
                })),
                TokenKind::Ident(name) => Some(Expr::Identifier(name.clone())),
                TokenKind::Int(text) => Some(Expr::Integer(text.clone())),
                TokenKind::Float(text) => Some(Expr::Float(text.clone())),
                TokenKind::Keyword(KeywordId::True) => Some(Expr::Boolean(true)),
                TokenKind::Keyword(KeywordId::False) => Some(Expr::Boolean(false)),
                TokenKind::Keyword(KeywordId::Nil) => Some(Expr::Nil),
                _ => None,
            };
            if let Some(expr) = expr {
                let span = token.span;
                self.advance();
                return Ok(Spanned::new(expr, span));
            }
        }

        let raw = self.raw_expression(RawExprEnd::Argument)?;
        Ok(Spanned::new(Expr::Raw(raw.node), raw.span))
    }

    // ========================================================================
    // Raw capture
    // ========================================================================

    /// Capture an unparsed expression as source text.
    ///
    /// Stops at a `,`, `;` or closing bracket outside any nested group. In statement position it also stops before
    /// an observer block (`{ willSet … }`) and at a line break that does not continue the expression.
    fn raw_expression(&mut self, end: RawExprEnd) -> Result<Spanned<String>, CompileError> {
        let from = self.pos;
        let mut depth = 0usize;
        while !self.is_at_end() {
            let token = self.peek();
            if depth == 0 {
                if end == RawExprEnd::Statement
                    && self.pos > from
                    && token.newline_before
                    && !self.continues_expression(self.pos)
                {
                    break;
                }
                match token.punctuation_id() {
                    Some(
                        PunctuationId::Comma
                        | PunctuationId::Semicolon
                        | PunctuationId::RParen
                        | PunctuationId::RBracket
                        | PunctuationId::RBrace,
                    ) => break,
                    Some(PunctuationId::LBrace)
                        if end == RawExprEnd::Statement && self.pos > from && self.is_observer_block() =>
                    {
                        break;
                    }
                    _ => {}
                }
            }
            match token.punctuation_id() {
                Some(PunctuationId::LParen | PunctuationId::LBracket | PunctuationId::LBrace) => depth += 1,
                Some(PunctuationId::RParen | PunctuationId::RBracket | PunctuationId::RBrace) => depth -= 1,
                _ => {}
            }
            self.advance();
        }

        if self.pos == from {
            return Err(self.error_here("Expected expression"));
        }
        Ok(Spanned::new(self.raw_text(from, self.pos), self.range_span(from, self.pos)))
    }

    /// Capture a function signature (everything between the name and the body) as source text.
    fn signature_text(&mut self) -> String {
        let from = self.pos;
        let mut depth = 0usize;
        while !self.is_at_end() {
            let token = self.peek();
            if depth == 0 {
                if self.pos > from && token.newline_before && !self.continues_signature(self.pos) {
                    break;
                }
                if matches!(
                    token.punctuation_id(),
                    Some(PunctuationId::LBrace | PunctuationId::RBrace | PunctuationId::Semicolon)
                ) {
                    break;
                }
            }
            match token.punctuation_id() {
                Some(PunctuationId::LParen | PunctuationId::LBracket) => depth += 1,
                Some(PunctuationId::RParen | PunctuationId::RBracket) => depth = depth.saturating_sub(1),
                _ => {}
            }
            self.advance();
        }
        self.raw_text(from, self.pos)
    }

    /// Whether the token at `index`, which starts a new line, continues the expression on the previous line.
    fn continues_expression(&self, index: usize) -> bool {
        let current = &self.tokens[index].kind;
        let previous = &self.tokens[index - 1].kind;
        let continues_after = |kind: &TokenKind| {
            matches!(kind, TokenKind::Operator(_))
                || matches!(
                    kind.punctuation_id(),
                    Some(
                        PunctuationId::Eq
                            | PunctuationId::Dot
                            | PunctuationId::Question
                            | PunctuationId::Colon
                            | PunctuationId::Arrow
                    )
                )
        };
        let continues_before = |kind: &TokenKind| {
            matches!(kind, TokenKind::Operator(_))
                || matches!(
                    kind.punctuation_id(),
                    Some(PunctuationId::Dot | PunctuationId::Question | PunctuationId::Colon)
                )
        };
        continues_after(previous) || continues_before(current)
    }

    /// Whether the token at `index`, which starts a new line, continues a function signature.
    fn continues_signature(&self, index: usize) -> bool {
        let current = &self.tokens[index].kind;
        let previous = &self.tokens[index - 1].kind;
        current.is_punctuation(PunctuationId::Arrow)
            || current.is_keyword(KeywordId::Where)
            || previous.is_punctuation(PunctuationId::Arrow)
            || previous.is_punctuation(PunctuationId::Colon)
            || previous.is_keyword(KeywordId::Where)
            || previous.is_operator("&")
    }

    /// At a `{`: is this a property observer block (`{ willSet … }` / `{ didSet … }`)?
    fn is_observer_block(&self) -> bool {
        matches!(&self.peek_next().kind, TokenKind::Ident(name) if name == "willSet" || name == "didSet")
    }

    /// Skip a bracketed group starting at the current opener and return its span.
    fn skip_group(&mut self) -> Span {
        let start = self.current_span().start;
        let mut depth = 0usize;
        while !self.is_at_end() {
            match self.peek().punctuation_id() {
                Some(PunctuationId::LParen | PunctuationId::LBracket | PunctuationId::LBrace) => depth += 1,
                Some(PunctuationId::RParen | PunctuationId::RBracket | PunctuationId::RBrace) => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        let end = self.advance().span.end;
                        return Span::new(start, end);
                    }
                }
                _ => {}
            }
            self.advance();
        }
        Span::new(start, self.previous_span().end)
    }

    /// Skip a bracketed group and return its source text.
    fn group_text(&mut self) -> String {
        let from = self.pos;
        self.skip_group();
        self.raw_text(from, self.pos)
    }

    /// Rebuild source text for `tokens[from..to]`: tokens separated by whitespace get one space.
    fn raw_text(&self, from: usize, to: usize) -> String {
        let mut text = String::new();
        let mut previous_end = None;
        for token in &self.tokens[from..to] {
            if previous_end.is_some_and(|end| token.span.start > end) {
                text.push(' ');
            }
            text.push_str(&token.kind.to_string());
            previous_end = Some(token.span.end);
        }
        text
    }

    fn range_span(&self, from: usize, to: usize) -> Span {
        if from >= to {
            let at = self.tokens[from].span.start;
            return Span::new(at, at);
        }
        Span::new(self.tokens[from].span.start, self.tokens[to - 1].span.end)
    }
}
