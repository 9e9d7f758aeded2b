/// Type expression parsing.
///
/// Grammar, loosest binding first:
/// - composition: `A & B`
/// - postfix: `T?`, `T!`, `T.Member`
/// - primary: named (`Foo<Bar>`), `Self`, `[T]`, `[K: V]`, `(A, b: B)`, `(A) async throws -> B`,
///   `@escaping T`, `some P`, `any P`, `inout T`
impl<'a> Parser<'a> {
    /// Parse a type annotation with its span.
    fn type_expr(&mut self) -> Result<Spanned<TypeExpr>, CompileError> {
        let start = self.current_span().start;
        let ty = self.composition_type()?;
        Ok(Spanned::new(ty, Span::new(start, self.previous_span().end)))
    }

    fn composition_type(&mut self) -> Result<TypeExpr, CompileError> {
        let first = self.postfix_type()?;
        if !self.peek().kind.is_operator("&") {
            return Ok(first);
        }
        let mut parts = vec![first];
        while self.peek().kind.is_operator("&") {
            self.advance();
            parts.push(self.postfix_type()?);
        }
        Ok(TypeExpr::Composition(parts))
    }

    fn postfix_type(&mut self) -> Result<TypeExpr, CompileError> {
        let mut ty = self.primary_type()?;
        loop {
            let token = self.peek();
            if token.newline_before {
                break;
            }
            match token.punctuation_id() {
                Some(PunctuationId::Question) => {
                    self.advance();
                    ty = TypeExpr::Optional(Box::new(ty));
                }
                Some(PunctuationId::Exclamation) => {
                    self.advance();
                    ty = TypeExpr::ImplicitlyUnwrapped(Box::new(ty));
                }
                Some(PunctuationId::Dot) if !matches!(ty, TypeExpr::Function { .. }) => {
                    self.advance();
                    let member = self.member_name("Expected member type name after '.'")?;
                    let name = format!("{}.{}", ty, member);
                    let generic_args = self.generic_args()?;
                    ty = TypeExpr::Named { name, generic_args };
                }
                _ => break,
            }
        }
        Ok(ty)
    }

    fn primary_type(&mut self) -> Result<TypeExpr, CompileError> {
        match &self.peek().kind {
            TokenKind::Punctuation(PunctuationId::At) => {
                let mut specifiers = Vec::new();
                while self.check_punct(PunctuationId::At) {
                    self.advance();
                    let mut specifier = format!("@{}", self.name("Expected type attribute name after '@'")?);
                    if self.check_punct(PunctuationId::LParen) && self.current_span().start == self.previous_span().end {
                        specifier.push_str(&self.group_text());
                    }
                    specifiers.push(specifier);
                }
                let base = self.postfix_type()?;
                Ok(TypeExpr::Attributed {
                    specifiers,
                    base: Box::new(base),
                })
            }
            TokenKind::Ident(name) if is_type_specifier(name) && self.starts_type(1) => {
                let specifier = name.clone();
                self.advance();
                let base = self.postfix_type()?;
                Ok(TypeExpr::Attributed {
                    specifiers: vec![specifier],
                    base: Box::new(base),
                })
            }
            TokenKind::Keyword(KeywordId::SelfType) => {
                self.advance();
                Ok(TypeExpr::SelfType)
            }
            TokenKind::Punctuation(PunctuationId::LBracket) => self.collection_type(),
            TokenKind::Punctuation(PunctuationId::LParen) => self.parenthesized_type(),
            kind => {
                let Some(name) = kind.name_spelling() else {
                    return Err(self.error_here("Expected type"));
                };
                let name = name.to_string();
                self.advance();
                let generic_args = self.generic_args()?;
                Ok(TypeExpr::Named { name, generic_args })
            }
        }
    }

    /// Parse `<A, B>` directly after a type name, if present.
    fn generic_args(&mut self) -> Result<Vec<TypeExpr>, CompileError> {
        let mut args = Vec::new();
        if !self.check_punct(PunctuationId::LAngle) || self.current_span().start != self.previous_span().end {
            return Ok(args);
        }
        self.advance();
        loop {
            args.push(self.composition_type()?);
            if !self.match_punct(PunctuationId::Comma) {
                break;
            }
        }
        self.expect_punct(PunctuationId::RAngle, "Expected '>' to close generic arguments")?;
        Ok(args)
    }

    /// Parse `[T]` or `[K: V]`.
    fn collection_type(&mut self) -> Result<TypeExpr, CompileError> {
        self.advance(); // '['
        let element = self.composition_type()?;
        let ty = if self.match_punct(PunctuationId::Colon) {
            let value = self.composition_type()?;
            TypeExpr::Dictionary(Box::new(element), Box::new(value))
        } else {
            TypeExpr::Array(Box::new(element))
        };
        self.expect_punct(PunctuationId::RBracket, "Expected ']' to close collection type")?;
        Ok(ty)
    }

    /// Parse a parenthesized type: a tuple, a grouped type, or a function type's parameter list.
    fn parenthesized_type(&mut self) -> Result<TypeExpr, CompileError> {
        self.advance(); // '('
        let mut elements = Vec::new();
        if !self.check_punct(PunctuationId::RParen) {
            loop {
                let label = self.tuple_label();
                let ty = self.composition_type()?;
                // Variadic parameter: `Int...`
                let ty = if self.check_punct(PunctuationId::Dot)
                    && self.peek_at(1).kind.is_punctuation(PunctuationId::Dot)
                    && self.peek_at(2).kind.is_punctuation(PunctuationId::Dot)
                {
                    self.advance();
                    self.advance();
                    self.advance();
                    TypeExpr::Named {
                        name: format!("{}...", ty),
                        generic_args: Vec::new(),
                    }
                } else {
                    ty
                };
                elements.push(TupleTypeElement { label, ty });
                if !self.match_punct(PunctuationId::Comma) {
                    break;
                }
            }
        }
        self.expect_punct(PunctuationId::RParen, "Expected ')' to close parenthesized type")?;

        let mut effects = Vec::new();
        while let Some(name) = self.peek().kind.name_spelling() {
            if !matches!(name, "async" | "throws" | "rethrows") || self.peek().newline_before {
                break;
            }
            let mut effect = name.to_string();
            self.advance();
            if effect == "throws" && self.check_punct(PunctuationId::LParen) {
                effect.push_str(&self.group_text());
            }
            effects.push(effect);
        }

        if self.match_punct(PunctuationId::Arrow) {
            let ret = self.composition_type()?;
            return Ok(TypeExpr::Function {
                params: elements,
                effects,
                ret: Box::new(ret),
            });
        }
        if !effects.is_empty() {
            return Err(self.error_here("Expected '->' after function type effects"));
        }

        if elements.len() == 1 && elements[0].label.is_none() {
            return Ok(elements.remove(0).ty);
        }
        Ok(TypeExpr::Tuple(elements))
    }

    /// Consume `label:` or `_ name:` at the start of a tuple element, if present.
    fn tuple_label(&mut self) -> Option<Ident> {
        let first = self.peek().kind.name_spelling()?.to_string();
        if self.peek_next().kind.is_punctuation(PunctuationId::Colon) {
            self.advance();
            self.advance();
            return Some(first);
        }
        let second = self.peek_next().kind.name_spelling()?.to_string();
        if self.peek_at(2).kind.is_punctuation(PunctuationId::Colon) {
            self.advance();
            self.advance();
            self.advance();
            return Some(format!("{} {}", first, second));
        }
        None
    }

    /// Return `true` if the token `offset` ahead can begin a type on the same line.
    fn starts_type(&self, offset: usize) -> bool {
        let token = self.peek_at(offset);
        !token.newline_before
            && (token.kind.name_spelling().is_some()
                || token.kind.is_keyword(KeywordId::SelfType)
                || token.kind.is_punctuation(PunctuationId::LParen)
                || token.kind.is_punctuation(PunctuationId::LBracket)
                || token.kind.is_punctuation(PunctuationId::At))
    }
}

/// Contextual words that prefix a type (`some P`, `inout T`, …).
fn is_type_specifier(name: &str) -> bool {
    matches!(
        name,
        "some" | "any" | "inout" | "borrowing" | "consuming" | "sending" | "isolated" | "each" | "repeat" | "__owned"
            | "__shared"
    )
}
