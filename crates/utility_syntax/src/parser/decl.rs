/// Declaration parsing.
///
/// This chunk parses attributes and modifiers, then dispatches on the declaration keyword:
/// - Nominal types (`struct`, `class`, `enum`, `protocol`, `extension`, `actor`) and their member blocks
/// - Properties (`let` / `var`) with type annotations, initializers and accessor blocks
/// - Function outlines (`func`, `init`, `deinit`, `subscript`), enum cases, type aliases and imports
///
/// ## Notes
/// - Bodies are never parsed; they are skipped as balanced groups and recorded as spans.

/// Identifiers that open an accessor clause inside a property's `{ … }` block.
const ACCESSOR_NAMES: &[&str] = &[
    "get",
    "set",
    "willSet",
    "didSet",
    "init",
    "_read",
    "_modify",
    "unsafeAddress",
    "unsafeMutableAddress",
];

impl<'a> Parser<'a> {
    // ========================================================================
    // Declarations
    // ========================================================================

    /// Parse one declaration. Returns `Ok(None)` for line directives (`#warning(…)`, `#sourceLocation(…)`), which
    /// are skipped.
    fn declaration(&mut self, context: DeclContext) -> Result<Option<Spanned<Decl>>, CompileError> {
        if self.check_punct(PunctuationId::Hash) {
            if self.directive_name() == Some("if") {
                let start = self.current_span().start;
                let config = self.if_config_decl(context)?;
                let span = Span::new(start, self.previous_span().end);
                return Ok(Some(Spanned::new(Decl::IfConfig(config), span)));
            }
            self.skip_directive();
            return Ok(None);
        }

        let start = self.current_span().start;
        let attributes = self.attributes()?;
        let modifiers = self.modifiers();

        let decl = match self.peek().kind.keyword_id() {
            Some(KeywordId::Import) => Decl::Import(self.import_decl(attributes)?),
            Some(KeywordId::Struct) => Decl::Struct(self.type_decl(attributes, modifiers)?),
            Some(KeywordId::Class) => Decl::Class(self.type_decl(attributes, modifiers)?),
            Some(KeywordId::Enum) => Decl::Enum(self.type_decl(attributes, modifiers)?),
            Some(KeywordId::Protocol) => Decl::Protocol(self.type_decl(attributes, modifiers)?),
            Some(KeywordId::Extension) => Decl::Extension(self.type_decl(attributes, modifiers)?),
            Some(KeywordId::Actor) => Decl::Actor(self.type_decl(attributes, modifiers)?),
            Some(KeywordId::Typealias) => Decl::TypeAlias(self.type_alias_decl(attributes, modifiers)?),
            Some(KeywordId::Let | KeywordId::Var) => Decl::Variable(self.variable_decl(attributes, modifiers)?),
            Some(KeywordId::Func | KeywordId::Init | KeywordId::Deinit | KeywordId::Subscript) => {
                Decl::Function(self.function_decl(attributes, modifiers)?)
            }
            Some(KeywordId::Case) => Decl::EnumCase(self.enum_case_decl(attributes, modifiers)?),
            _ => {
                let error = self.error_here("Expected declaration");
                return Err(match context {
                    DeclContext::File => error.with_hint("only declarations are supported at file level"),
                    DeclContext::Member => error,
                });
            }
        };

        Ok(Some(Spanned::new(decl, Span::new(start, self.previous_span().end))))
    }

    /// Parse declaration modifiers (`public`, `static`, `private(set)`, `class` before a member, …).
    ///
    /// Identifiers used as modifiers (`nonisolated`, `dynamic`, …) are skipped without being recorded.
    fn modifiers(&mut self) -> Vec<Spanned<Modifier>> {
        let mut modifiers = Vec::new();
        loop {
            let token = self.peek();
            let span = token.span;
            match &token.kind {
                TokenKind::Keyword(id) if keywords::is_declaration_modifier(*id) => {
                    let mut modifier = Modifier::new(*id);
                    self.advance();
                    modifier.detail = self.modifier_detail();
                    let span = Span::new(span.start, self.previous_span().end);
                    modifiers.push(Spanned::new(modifier, span));
                }
                TokenKind::Keyword(KeywordId::Class) if self.class_is_modifier() => {
                    self.advance();
                    modifiers.push(Spanned::new(Modifier::new(KeywordId::Class), span));
                }
                TokenKind::Ident(_) if self.ident_is_modifier() => {
                    self.advance();
                    self.modifier_detail();
                }
                _ => return modifiers,
            }
        }
    }

    /// Parse `(set)` after an access modifier, if present.
    fn modifier_detail(&mut self) -> Option<Ident> {
        if !self.check_punct(PunctuationId::LParen) || !self.peek_at(2).kind.is_punctuation(PunctuationId::RParen) {
            return None;
        }
        let detail = self.peek_next().kind.name_spelling()?.to_string();
        self.advance();
        self.advance();
        self.advance();
        Some(detail)
    }

    /// `class` is a modifier in `class func`, `class var`, `class override func`, …
    fn class_is_modifier(&self) -> bool {
        self.peek_next().kind.keyword_id().is_some_and(|id| {
            matches!(id, KeywordId::Func | KeywordId::Var | KeywordId::Let | KeywordId::Subscript)
                || keywords::is_declaration_modifier(id)
        })
    }

    /// An identifier (optionally with a parenthesized detail) directly followed by a declaration keyword.
    fn ident_is_modifier(&self) -> bool {
        let mut offset = 1;
        if self.peek_at(1).kind.is_punctuation(PunctuationId::LParen)
            && self.peek_at(3).kind.is_punctuation(PunctuationId::RParen)
        {
            offset = 4;
        }
        let next = self.peek_at(offset);
        !next.newline_before
            && next.kind.keyword_id().is_some_and(|id| {
                matches!(
                    keywords::category(id),
                    keywords::KeywordCategory::Declaration
                        | keywords::KeywordCategory::Binding
                        | keywords::KeywordCategory::Access
                        | keywords::KeywordCategory::Modifier
                )
            })
    }

    /// Parse `#if cond … #elseif cond … #else … #endif`.
    ///
    /// Each branch keeps its own declarations; none of them become members of the enclosing body.
    fn if_config_decl(&mut self, context: DeclContext) -> Result<IfConfigDecl, CompileError> {
        let mut clauses = Vec::new();
        loop {
            let directive = self.directive_name().unwrap_or_default().to_string();
            self.advance(); // '#'
            self.advance(); // directive name
            let from = self.pos;
            self.skip_directive_line();
            let condition = (self.pos > from).then(|| self.raw_text(from, self.pos));

            let mut members = Vec::new();
            while !matches!(self.directive_name(), Some("elseif" | "else" | "endif")) {
                if self.is_at_end() || (context == DeclContext::Member && self.check_punct(PunctuationId::RBrace)) {
                    return Err(self.error_here("Expected '#endif' to close '#if'"));
                }
                if self.match_punct(PunctuationId::Semicolon) {
                    continue;
                }
                match self.declaration(context) {
                    Ok(Some(member)) => members.push(member),
                    Ok(None) => {}
                    Err(e) => {
                        self.errors.push(e);
                        self.synchronize(context);
                    }
                }
            }
            clauses.push(IfConfigClause {
                directive,
                condition,
                members,
            });

            if self.directive_name() == Some("endif") {
                self.advance();
                self.advance();
                return Ok(IfConfigDecl { clauses });
            }
        }
    }

    /// Name of the directive at the cursor (`if` for `#if`), if the cursor is on one.
    fn directive_name(&self) -> Option<&str> {
        if !self.check_punct(PunctuationId::Hash) {
            return None;
        }
        let next = self.peek_next();
        if next.span.start != self.current_span().end {
            return None;
        }
        match &next.kind {
            TokenKind::Ident(name) => Some(name),
            _ => None,
        }
    }

    /// Skip a `#…` compiler directive line.
    fn skip_directive(&mut self) {
        self.advance();
        self.skip_directive_line();
    }

    /// Skip to the end of the current line, keeping bracketed groups whole.
    fn skip_directive_line(&mut self) {
        let mut depth = 0usize;
        while !self.is_at_end() {
            let token = self.peek();
            if depth == 0 && token.newline_before {
                return;
            }
            match token.punctuation_id() {
                Some(PunctuationId::LBrace | PunctuationId::LParen | PunctuationId::LBracket) => depth += 1,
                Some(PunctuationId::RBrace) if depth == 0 => return,
                Some(PunctuationId::RBrace | PunctuationId::RParen | PunctuationId::RBracket) => {
                    depth = depth.saturating_sub(1)
                }
                _ => {}
            }
            self.advance();
        }
    }

    // ========================================================================
    // Nominal types
    // ========================================================================

    fn type_decl(
        &mut self,
        attributes: Vec<Spanned<Attribute>>,
        modifiers: Vec<Spanned<Modifier>>,
    ) -> Result<TypeDecl, CompileError> {
        let is_extension = self.advance().kind.is_keyword(KeywordId::Extension);

        let (name, generic_params) = if is_extension {
            let extended = self.type_expr()?;
            (Spanned::new(extended.node.to_string(), extended.span), Vec::new())
        } else {
            let name = self.name_spanned("Expected type name")?;
            (name, self.generic_params()?)
        };

        let mut inheritance = Vec::new();
        if self.match_punct(PunctuationId::Colon) {
            loop {
                inheritance.push(self.type_expr()?);
                if !self.match_punct(PunctuationId::Comma) {
                    break;
                }
            }
        }

        if self.check_keyword(KeywordId::Where) {
            while !self.check_punct(PunctuationId::LBrace) && !self.is_at_end() {
                self.advance();
            }
        }

        let (members, body) = self.member_block()?;
        Ok(TypeDecl {
            attributes,
            modifiers,
            name,
            generic_params,
            inheritance,
            members,
            body,
        })
    }

    /// Parse `<T, U: P>` and return the parameter names. Constraints are skipped.
    fn generic_params(&mut self) -> Result<Vec<Ident>, CompileError> {
        let mut params = Vec::new();
        if !self.match_punct(PunctuationId::LAngle) {
            return Ok(params);
        }
        loop {
            params.push(self.name("Expected generic parameter name")?);
            let mut depth = 0usize;
            loop {
                match self.peek().punctuation_id() {
                    Some(PunctuationId::LAngle) => depth += 1,
                    Some(PunctuationId::RAngle) if depth == 0 => break,
                    Some(PunctuationId::RAngle) => depth -= 1,
                    Some(PunctuationId::Comma) if depth == 0 => break,
                    Some(PunctuationId::LBrace) => {
                        return Err(self.error_here("Expected '>' to close generic parameters"));
                    }
                    _ if self.is_at_end() => {
                        return Err(self.error_here("Expected '>' to close generic parameters"));
                    }
                    _ => {}
                }
                self.advance();
            }
            if !self.match_punct(PunctuationId::Comma) {
                break;
            }
        }
        self.expect_punct(PunctuationId::RAngle, "Expected '>' to close generic parameters")?;
        Ok(params)
    }

    /// Parse `{ members }`, recovering from errors member by member.
    ///
    /// Returns the members and the span of the block, braces included.
    fn member_block(&mut self) -> Result<(Vec<Spanned<Decl>>, Span), CompileError> {
        let open = self
            .expect_punct(PunctuationId::LBrace, "Expected '{' to open declaration body")?
            .span;
        let mut members = Vec::new();
        while !self.check_punct(PunctuationId::RBrace) && !self.is_at_end() {
            if self.match_punct(PunctuationId::Semicolon) {
                continue;
            }
            match self.declaration(DeclContext::Member) {
                Ok(Some(member)) => members.push(member),
                Ok(None) => {}
                Err(e) => {
                    self.errors.push(e);
                    self.synchronize(DeclContext::Member);
                }
            }
        }
        let close = self
            .expect_punct(PunctuationId::RBrace, "Expected '}' to close declaration body")?
            .span;
        Ok((members, Span::new(open.start, close.end)))
    }

    // ========================================================================
    // Properties
    // ========================================================================

    fn variable_decl(
        &mut self,
        attributes: Vec<Spanned<Attribute>>,
        modifiers: Vec<Spanned<Modifier>>,
    ) -> Result<VariableDecl, CompileError> {
        let specifier = if self.match_keyword(KeywordId::Let) {
            BindingSpecifier::Let
        } else {
            self.expect_keyword(KeywordId::Var, "Expected 'let' or 'var'")?;
            BindingSpecifier::Var
        };

        let mut bindings = vec![self.pattern_binding()?];
        while self.match_punct(PunctuationId::Comma) {
            bindings.push(self.pattern_binding()?);
        }

        Ok(VariableDecl {
            attributes,
            modifiers,
            specifier,
            bindings,
        })
    }

    /// Parse `name[: Type][= value][{ accessors }]`.
    fn pattern_binding(&mut self) -> Result<PatternBinding, CompileError> {
        if self.check_punct(PunctuationId::LParen) {
            return Err(CompileError::syntax(
                "Tuple patterns are not supported in property declarations".to_string(),
                self.current_span(),
            )
            .with_hint("declare each property separately"));
        }

        let name = self.name_spanned("Expected property name")?;
        let type_annotation = if self.match_punct(PunctuationId::Colon) {
            Some(self.type_expr()?)
        } else {
            None
        };
        let initializer = if self.match_punct(PunctuationId::Eq) {
            Some(self.raw_expression(RawExprEnd::Statement)?)
        } else {
            None
        };
        let accessor_block = if self.check_punct(PunctuationId::LBrace) {
            Some(self.accessor_block()?)
        } else {
            None
        };

        Ok(PatternBinding {
            name,
            type_annotation,
            initializer,
            accessor_block,
        })
    }

    /// Parse the `{ … }` after a binding: a shorthand getter or a list of accessors/observers.
    fn accessor_block(&mut self) -> Result<AccessorBlock, CompileError> {
        let is_accessor_list = self.is_accessor_list();
        let start = self.current_span().start;
        self.advance(); // '{'

        let mut names = Vec::new();
        let mut depth = 0usize;
        loop {
            match &self.peek().kind {
                TokenKind::Eof => return Err(self.error_here("Expected '}' to close accessor block")),
                TokenKind::Punctuation(PunctuationId::LBrace | PunctuationId::LParen | PunctuationId::LBracket) => {
                    depth += 1
                }
                TokenKind::Punctuation(PunctuationId::RBrace | PunctuationId::RParen | PunctuationId::RBracket) => {
                    if depth == 0 {
                        break;
                    }
                    depth -= 1;
                }
                TokenKind::Ident(name) if depth == 0 && ACCESSOR_NAMES.contains(&name.as_str()) => {
                    names.push(name.clone())
                }
                _ => {}
            }
            self.advance();
        }
        let end = self.advance().span.end; // '}'

        let kind = if is_accessor_list {
            AccessorBlockKind::Accessors(names)
        } else {
            AccessorBlockKind::Getter
        };
        Ok(AccessorBlock {
            kind,
            span: Span::new(start, end),
        })
    }

    /// Decide whether the block at the current `{` lists accessors (`get`, `set`, `willSet`, …) rather than
    /// being a getter body.
    fn is_accessor_list(&self) -> bool {
        let first = self.peek_at(1);
        match &first.kind {
            TokenKind::Punctuation(PunctuationId::At) => true,
            TokenKind::Keyword(KeywordId::Mutating | KeywordId::Nonmutating) => true,
            TokenKind::Ident(name) if ACCESSOR_NAMES.contains(&name.as_str()) => {
                let next = &self.peek_at(2).kind;
                match next {
                    TokenKind::Punctuation(PunctuationId::LBrace | PunctuationId::RBrace | PunctuationId::Semicolon) => {
                        true
                    }
                    TokenKind::Punctuation(PunctuationId::LParen) => name != "get",
                    TokenKind::Ident(_) => true,
                    TokenKind::Keyword(id) => keywords::is_declaration_modifier(*id),
                    _ => false,
                }
            }
            _ => false,
        }
    }

    // ========================================================================
    // Functions, cases, aliases, imports
    // ========================================================================

    fn function_decl(
        &mut self,
        attributes: Vec<Spanned<Attribute>>,
        modifiers: Vec<Spanned<Modifier>>,
    ) -> Result<FunctionDecl, CompileError> {
        let keyword_span = self.current_span();
        let kind = match self.advance().kind.keyword_id() {
            Some(KeywordId::Init) => FunctionKind::Init,
            Some(KeywordId::Deinit) => FunctionKind::Deinit,
            Some(KeywordId::Subscript) => FunctionKind::Subscript,
            _ => FunctionKind::Func,
        };

        let name = match kind {
            FunctionKind::Func => self.function_name()?,
            _ => kind.keyword_str().to_string(),
        };
        let signature = match kind {
            FunctionKind::Deinit => String::new(),
            _ => self.signature_text(),
        };
        let body = if self.check_punct(PunctuationId::LBrace) {
            Some(self.skip_group())
        } else {
            None
        };

        if kind == FunctionKind::Deinit && body.is_none() {
            return Err(CompileError::syntax("Expected '{' after 'deinit'".to_string(), keyword_span));
        }

        Ok(FunctionDecl {
            attributes,
            modifiers,
            kind,
            name,
            signature,
            body,
        })
    }

    /// Function name: an identifier or an operator spelling (`==`, `<`, `+=`, …).
    fn function_name(&mut self) -> Result<Ident, CompileError> {
        if let Some(name) = self.peek().kind.name_spelling() {
            let name = name.to_string();
            self.advance();
            return Ok(name);
        }

        let mut name = String::new();
        let mut previous_end = None;
        loop {
            let token = self.peek();
            let is_operator_part = matches!(
                token.kind,
                TokenKind::Operator(_)
                    | TokenKind::Punctuation(
                        PunctuationId::Eq
                            | PunctuationId::LAngle
                            | PunctuationId::RAngle
                            | PunctuationId::Exclamation
                            | PunctuationId::Question
                            | PunctuationId::Dot
                    )
            );
            let adjacent = previous_end.is_none_or(|end| token.span.start == end);
            if !is_operator_part || !adjacent || (!name.is_empty() && self.check_punct(PunctuationId::LParen)) {
                break;
            }
            name.push_str(&token.kind.to_string());
            previous_end = Some(token.span.end);
            self.advance();
        }

        if name.is_empty() {
            Err(self.error_here("Expected function name"))
        } else {
            Ok(name)
        }
    }

    fn enum_case_decl(
        &mut self,
        attributes: Vec<Spanned<Attribute>>,
        modifiers: Vec<Spanned<Modifier>>,
    ) -> Result<EnumCaseDecl, CompileError> {
        self.advance(); // 'case'
        let mut elements = Vec::new();
        loop {
            elements.push(self.name_spanned("Expected enum case name")?);
            if self.check_punct(PunctuationId::LParen) {
                self.skip_group();
            }
            if self.match_punct(PunctuationId::Eq) {
                self.raw_expression(RawExprEnd::Statement)?;
            }
            if !self.match_punct(PunctuationId::Comma) {
                break;
            }
        }
        Ok(EnumCaseDecl {
            attributes,
            modifiers,
            elements,
        })
    }

    fn type_alias_decl(
        &mut self,
        attributes: Vec<Spanned<Attribute>>,
        modifiers: Vec<Spanned<Modifier>>,
    ) -> Result<TypeAliasDecl, CompileError> {
        self.advance(); // 'typealias'
        let name = self.name_spanned("Expected type alias name")?;
        let generic_params = self.generic_params()?;
        self.expect_punct(PunctuationId::Eq, "Expected '=' in type alias")?;
        let target = self.type_expr()?;
        Ok(TypeAliasDecl {
            attributes,
            modifiers,
            name,
            generic_params,
            target,
        })
    }

    /// Parse `import [kind] A.B.C`.
    fn import_decl(&mut self, attributes: Vec<Spanned<Attribute>>) -> Result<ImportDecl, CompileError> {
        self.advance(); // 'import'
        if self.peek().kind.keyword_id().is_some_and(|id| {
            matches!(
                id,
                KeywordId::Struct
                    | KeywordId::Class
                    | KeywordId::Enum
                    | KeywordId::Protocol
                    | KeywordId::Typealias
                    | KeywordId::Func
                    | KeywordId::Let
                    | KeywordId::Var
            )
        }) {
            self.advance();
        }

        let mut path = vec![self.name("Expected module name")?];
        while self.match_punct(PunctuationId::Dot) {
            path.push(self.member_name("Expected name after '.'")?);
        }
        Ok(ImportDecl { attributes, path })
    }
}
