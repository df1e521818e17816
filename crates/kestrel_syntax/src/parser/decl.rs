/// Declaration parsing methods.
///
/// This chunk parses the package clause, imports, and field/method members.
///
/// ## Notes
/// - Every entrypoint returns [`Spanned<T>`] to preserve source locations.
/// - A production either returns a complete node or an error; partial members never reach the unit.
impl<'a> Parser<'a> {
    // ========================================================================
    // Package and imports
    // ========================================================================

    fn package_decl(&mut self) -> CompileResult<Spanned<QualifiedName>> {
        let start = self.current_span();
        self.match_keyword(KeywordId::Package);
        let name = qualified_name(&mut self.stream)?;
        self.expect_punct(PunctuationId::Semicolon)?;
        Ok(Spanned::new(name.node, self.span_from(start)))
    }

    fn import_decl(&mut self) -> CompileResult<Spanned<ImportDecl>> {
        let start = self.current_span();
        self.match_keyword(KeywordId::Import);
        let path = qualified_name(&mut self.stream)?;
        let wildcard = if self.match_punct(PunctuationId::Dot) {
            self.expect_punct(PunctuationId::Star)?;
            true
        } else {
            false
        };
        self.expect_punct(PunctuationId::Semicolon)?;
        Ok(Spanned::new(
            ImportDecl {
                path: path.node,
                wildcard,
            },
            self.span_from(start),
        ))
    }

    // ========================================================================
    // Members
    // ========================================================================

    fn member(&mut self) -> CompileResult<Spanned<Member>> {
        let start = self.current_span();

        if self.check_keyword(KeywordId::Import) || self.check_keyword(KeywordId::Package) {
            let token = self.stream.peek();
            return Err(CompileError::syntax(
                format!("'{}' must come before any member declaration", token.text),
                token.span,
            ));
        }

        let modifiers = self.modifiers()?;

        let return_type = if self.check_keyword(KeywordId::Void) {
            let span = self.stream.advance().span;
            Spanned::new(ReturnType::Void, span)
        } else if TypeResolver::starts_type(&self.stream) {
            TypeResolver::resolve(&mut self.stream)?.map(ReturnType::Type)
        } else {
            return Err(CompileError::illegal_token(self.stream.peek(), "type or 'void'"));
        };

        let name = self.identifier()?;

        let member = if self.check_punct(PunctuationId::LParen) {
            Member::Method(self.method_rest(modifiers, return_type, name)?)
        } else {
            let ty = match return_type.node {
                ReturnType::Type(ty) => Spanned::new(ty, return_type.span),
                ReturnType::Void => {
                    return Err(CompileError::illegal_token(self.stream.peek(), "'('")
                        .with_note("'void' is only allowed as a method return type"));
                }
            };
            Member::Field(self.field_rest(modifiers, ty, name)?)
        };

        Ok(Spanned::new(member, self.span_from(start)))
    }

    /// `{Modifier}`: collected with the modifier resolver's predicate, then resolved token by token.
    fn modifiers(&mut self) -> CompileResult<Vec<Spanned<Modifier>>> {
        let resolver = ModifierResolver::new();
        let tokens = self.stream.take_while(&resolver)?;
        try_map(tokens.iter(), &|token: &Token| -> CompileResult<Spanned<Modifier>> {
            Ok(Spanned::new(resolver.resolve(token)?, token.span))
        })
    }

    fn field_rest(
        &mut self,
        modifiers: Vec<Spanned<Modifier>>,
        ty: Spanned<TypeNode>,
        name: Spanned<Ident>,
    ) -> CompileResult<FieldDecl> {
        let init = if self.match_punct(PunctuationId::Eq) {
            let literal = resolve_literal(self.stream.peek())?;
            self.stream.advance();
            Some(literal)
        } else {
            None
        };
        self.expect_punct(PunctuationId::Semicolon)?;
        Ok(FieldDecl {
            modifiers,
            ty,
            name,
            init,
        })
    }

    fn method_rest(
        &mut self,
        modifiers: Vec<Spanned<Modifier>>,
        return_type: Spanned<ReturnType>,
        name: Spanned<Ident>,
    ) -> CompileResult<MethodDecl> {
        self.expect_punct(PunctuationId::LParen)?;
        let mut params = Vec::new();
        if !self.check_punct(PunctuationId::RParen) {
            params.push(self.param()?);
            while self.match_punct(PunctuationId::Comma) {
                params.push(self.param()?);
            }
        }
        self.expect_punct(PunctuationId::RParen)?;
        self.expect_punct(PunctuationId::Semicolon)?;
        Ok(MethodDecl {
            modifiers,
            return_type,
            name,
            params,
        })
    }

    fn param(&mut self) -> CompileResult<Spanned<Param>> {
        let start = self.current_span();
        let is_final = self.match_keyword(KeywordId::Final);
        if self.stream.peek_kind() == TokenKind::Keyword(KeywordId::Void) {
            return Err(CompileError::illegal_token(self.stream.peek(), "parameter type"));
        }
        let ty = TypeResolver::resolve(&mut self.stream)?;
        let name = self.identifier()?;
        Ok(Spanned::new(Param { is_final, ty, name }, self.span_from(start)))
    }
}
