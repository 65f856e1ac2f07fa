/// Declarations: `var` / `globalvar`, `pattern` / `pnamespace`, `extend` and `struct`.
///
/// ## Notes
/// - This file is `include!`'d into `crate::parser`.
/// - Type annotations and pattern right-hand sides are parsed with `in_pattern` set, so `int`
///   yields an unprefixed pattern identifier.
impl<'a> Parser<'a> {
    /// Parse an expression with pattern mode enabled, restoring the previous mode afterwards.
    fn parse_in_pattern_mode(&mut self) -> Node {
        let saved = std::mem::replace(&mut self.in_pattern, true);
        let node = self.parse_expression();
        self.in_pattern = saved;
        node
    }

    // ========================================================================
    // Variables
    // ========================================================================

    /// `var x = 1`, `var x %int = 1`, `var (x = 1; y = 2)` and the `globalvar` equivalents.
    fn parse_variable_declarations(&mut self, keyword: NodeSpan, global: bool) -> Node {
        let (token_type, unterminated, opening_paren_expected, missing_closing_paren) = if global {
            (
                TokenType::GlobalvarKeyword,
                UNTERMINATED_GLOBAL_VAR_DECLS,
                INVALID_GLOBAL_VAR_DECLS_OPENING_PAREN_EXPECTED,
                INVALID_GLOBAL_VAR_DECLS_MISSING_CLOSING_PAREN,
            )
        } else {
            (
                TokenType::VarKeyword,
                UNTERMINATED_LOCAL_VAR_DECLS,
                INVALID_LOCAL_VAR_DECLS_OPENING_PAREN_EXPECTED,
                INVALID_LOCAL_VAR_DECLS_MISSING_CLOSING_PAREN,
            )
        };
        self.push_keyword(token_type, keyword.start);
        self.eat_space();

        let mut declarations = Vec::new();
        let mut error = None;

        match self.peek() {
            None | Some('\n') => error = Some(ParsingError::unspecified(unterminated)),
            Some(c) if is_alpha(c) || c == '_' => declarations.push(self.parse_single_variable_declaration(global)),
            Some(c) => {
                if c == '(' {
                    self.push_token_at(TokenType::OpeningParenthesis, self.i);
                } else {
                    error = Some(ParsingError::unspecified(opening_paren_expected));
                }
                self.i += 1;

                while self.peek().is_some_and(|c| c != ')') && !self.is_interrupted() {
                    self.eat_declaration_separators();
                    if self.peek().is_none_or(|c| c == ')') {
                        break;
                    }
                    let before = self.i;
                    declarations.push(self.parse_single_variable_declaration(global));
                    if self.i == before {
                        // nothing could start a declaration here
                        self.push_raw_token(TokenType::UnexpectedChar, self.i, self.i + 1);
                        self.i += 1;
                    }
                    self.eat_declaration_separators();
                }

                if self.peek_is(')') {
                    self.push_token_at(TokenType::ClosingParenthesis, self.i);
                    self.i += 1;
                } else if error.is_none() {
                    error = Some(ParsingError::unspecified(missing_closing_paren));
                }
            }
        }

        let base = NodeBase::with_opt_error(self.span_from(keyword.start), error);
        if global {
            GlobalVariableDeclarations { base, declarations }.into()
        } else {
            LocalVariableDeclarations { base, declarations }.into()
        }
    }

    /// Declarations of a group are separated by newlines, semicolons or commas.
    fn eat_declaration_separators(&mut self) {
        self.eat_separators(true, true, true, true);
    }

    fn parse_single_variable_declaration(&mut self, global: bool) -> Node {
        let left = self.parse_expression();
        let start = left.span().start;

        let mut error = if matches!(left, Node::IdentifierLiteral(_)) {
            None
        } else {
            Some(ParsingError::unspecified(if global {
                INVALID_GLOBAL_VAR_DECL_LHS_MUST_BE_AN_IDENT
            } else {
                INVALID_LOCAL_VAR_DECL_LHS_MUST_BE_AN_IDENT
            }))
        };

        self.eat_space();

        let mut type_annotation = None;
        if self.peek().is_some_and(|c| !matches!(c, '=' | '\n' | ')' | ';' | ',')) {
            type_annotation = Some(self.parse_in_pattern_mode());
            self.eat_space();
        }

        let mut right = None;
        let mut skipped_end = None;
        if self.peek_is('=') {
            self.push_token_at(TokenType::Equal, self.i);
            self.i += 1;
            self.eat_space();
            right = Some(self.parse_expression());
        } else {
            if error.is_none() {
                let message = if type_annotation.is_some() {
                    EQUAL_SIGN_MISSING_AFTER_TYPE_ANNOTATION.to_string()
                } else {
                    let name = left.identifier_name().unwrap_or_default();
                    if global {
                        fmt_invalid_global_var_decl_missing_equals_sign(name)
                    } else {
                        fmt_invalid_local_var_decl_missing_equals_sign(name)
                    }
                };
                error = Some(ParsingError::new(ParsingErrorKind::MissingEqualsSignInDeclaration, message));
            }
            if self.peek().is_some_and(|c| !matches!(c, '\n' | ')' | ';' | ',')) {
                self.push_raw_token(TokenType::UnexpectedChar, self.i, self.i + 1);
                self.i += 1;
                skipped_end = Some(self.i);
            }
        }

        let end = right
            .as_ref()
            .or(type_annotation.as_ref())
            .map_or(left.span().end, |n| n.span().end)
            .max(skipped_end.unwrap_or(0));
        let base = NodeBase::with_opt_error(NodeSpan::new(start, end), error);
        let left = Box::new(left);
        let type_annotation = type_annotation.map(Box::new);
        let right = right.map(Box::new);

        if global {
            GlobalVariableDeclarator {
                base,
                left,
                type_annotation,
                right,
            }
            .into()
        } else {
            LocalVariableDeclarator {
                base,
                left,
                type_annotation,
                right,
            }
            .into()
        }
    }

    // ========================================================================
    // Patterns
    // ========================================================================

    /// `pattern name = <pattern>`, `pattern name = @ <lazy pattern>`.
    fn parse_pattern_definition(&mut self, keyword: NodeSpan) -> Node {
        self.push_keyword(TokenType::PatternKeyword, keyword.start);
        self.eat_space();

        let kind = ParsingErrorKind::UnterminatedPatternDefinition;
        if self.peek().is_none_or(|c| c == '\n') {
            return PatternDefinition {
                base: NodeBase::with_error(
                    self.span_from(keyword.start),
                    ParsingError::new(kind, UNTERMINATED_PATT_DEF_MISSING_NAME_AFTER_PATTERN_KEYWORD),
                ),
                left: Box::new(self.missing_at_cursor()),
                right: Box::new(self.missing_at_cursor()),
                is_lazy: false,
            }
            .into();
        }

        let left = self.parse_in_pattern_mode();
        let mut error = (!matches!(left, Node::PatternIdentifierLiteral(_)))
            .then(|| ParsingError::unspecified(A_PATTERN_NAME_WAS_EXPECTED));

        self.eat_space();
        if !self.peek_is('=') {
            return PatternDefinition {
                base: NodeBase::with_opt_error(
                    NodeSpan::new(keyword.start, left.span().end),
                    error.or_else(|| {
                        Some(ParsingError::new(
                            kind,
                            UNTERMINATED_PATT_DEF_MISSING_EQUAL_SYMBOL_AFTER_PATTERN_NAME,
                        ))
                    }),
                ),
                right: Box::new(missing_at(left.span().end)),
                left: Box::new(left),
                is_lazy: false,
            }
            .into();
        }

        self.push_token_at(TokenType::Equal, self.i);
        self.i += 1;
        self.eat_space();

        let is_lazy = self.eat_lazy_marker();

        let right = if self.peek().is_none_or(|c| c == '\n') {
            error = error.or_else(|| Some(ParsingError::new(kind, UNTERMINATED_PATT_DEF_MISSING_RHS)));
            self.missing_at_cursor()
        } else {
            self.parse_in_pattern_mode()
        };

        PatternDefinition {
            base: NodeBase::with_opt_error(NodeSpan::new(keyword.start, right.span().end.max(left.span().end)), error),
            left: Box::new(left),
            right: Box::new(right),
            is_lazy,
        }
        .into()
    }

    /// `pnamespace name. = <object literal>`.
    fn parse_pattern_namespace_definition(&mut self, keyword: NodeSpan) -> Node {
        self.push_keyword(TokenType::PnamespaceKeyword, keyword.start);
        self.eat_space();

        let kind = ParsingErrorKind::UnterminatedPatternNamespaceDefinition;
        if self.peek().is_none_or(|c| c == '\n') {
            return PatternNamespaceDefinition {
                base: NodeBase::with_error(
                    self.span_from(keyword.start),
                    ParsingError::new(kind, UNTERMINATED_PATT_NS_DEF_MISSING_NAME_AFTER_PATTERN_KEYWORD),
                ),
                left: Box::new(self.missing_at_cursor()),
                right: Box::new(self.missing_at_cursor()),
                is_lazy: false,
            }
            .into();
        }

        let left = self.parse_in_pattern_mode();
        let mut error = (!matches!(left, Node::PatternNamespaceIdentifierLiteral(_)))
            .then(|| ParsingError::unspecified(A_PATTERN_NAMESPACE_NAME_WAS_EXPECTED));

        self.eat_space();
        if !self.peek_is('=') {
            return PatternNamespaceDefinition {
                base: NodeBase::with_opt_error(
                    NodeSpan::new(keyword.start, left.span().end),
                    error.or_else(|| {
                        Some(ParsingError::new(
                            kind,
                            UNTERMINATED_PATT_NS_DEF_MISSING_EQUAL_SYMBOL_AFTER_PATTERN_NAME,
                        ))
                    }),
                ),
                right: Box::new(missing_at(left.span().end)),
                left: Box::new(left),
                is_lazy: false,
            }
            .into();
        }

        self.push_token_at(TokenType::Equal, self.i);
        self.i += 1;
        self.eat_space();

        let is_lazy = self.eat_lazy_marker();

        let right = if self.peek().is_none_or(|c| c == '\n') {
            error = error.or_else(|| Some(ParsingError::new(kind, UNTERMINATED_PATT_NS_DEF_MISSING_RHS)));
            self.missing_at_cursor()
        } else {
            self.parse_expression()
        };

        PatternNamespaceDefinition {
            base: NodeBase::with_opt_error(NodeSpan::new(keyword.start, right.span().end.max(left.span().end)), error),
            left: Box::new(left),
            right: Box::new(right),
            is_lazy,
        }
        .into()
    }

    /// `@ ` before the right-hand side of a pattern definition.
    fn eat_lazy_marker(&mut self) -> bool {
        if self.peek_is('@') && self.char_at(self.i + 1).is_some_and(is_space_not_lf) {
            self.push_token_at(TokenType::AtSign, self.i);
            self.i += 1;
            self.eat_space();
            return true;
        }
        false
    }

    // ========================================================================
    // Extend & struct
    // ========================================================================

    /// `extend <pattern> { ... }`
    fn parse_extend_statement(&mut self, keyword: NodeSpan) -> Node {
        self.push_keyword(TokenType::ExtendKeyword, keyword.start);
        self.eat_space();

        let kind = ParsingErrorKind::UnterminatedExtendStmt;
        if self.peek().is_none_or(|c| c == '\n') {
            return ExtendStatement {
                base: NodeBase::with_error(
                    self.span_from(keyword.start),
                    ParsingError::new(kind, UNTERMINATED_EXTEND_STMT_MISSING_PATTERN_TO_EXTEND_AFTER_KEYWORD),
                ),
                extended_pattern: None,
                extension: None,
            }
            .into();
        }

        let pattern = self.parse_in_pattern_mode();
        let end = pattern.span().end;
        self.eat_space();

        if self.peek().is_none_or(|c| c == '\n') {
            return ExtendStatement {
                base: NodeBase::with_error(
                    NodeSpan::new(keyword.start, end),
                    ParsingError::new(kind, UNTERMINATED_EXTEND_STMT_MISSING_OBJECT_LITERAL_AFTER_EXTENDED_PATTERN),
                ),
                extended_pattern: Some(Box::new(pattern)),
                extension: None,
            }
            .into();
        }

        let extension = self.parse_expression();
        let error = (!matches!(extension, Node::ObjectLiteral(_)))
            .then(|| ParsingError::unspecified(INVALID_EXTENSION_VALUE_AN_OBJECT_LITERAL_WAS_EXPECTED));

        ExtendStatement {
            base: NodeBase::with_opt_error(NodeSpan::new(keyword.start, extension.span().end.max(end)), error),
            extended_pattern: Some(Box::new(pattern)),
            extension: Some(Box::new(extension)),
        }
        .into()
    }

    /// `struct Name { field type; fn method() {...} }`
    fn parse_struct_definition(&mut self, keyword: NodeSpan) -> Node {
        self.push_keyword(TokenType::StructKeyword, keyword.start);
        self.eat_space();

        let kind = ParsingErrorKind::UnterminatedStructDefinition;
        let name_start = self.i;
        while self.peek().is_some_and(|c| is_ident_char(c) && (self.i > name_start || is_alpha(c) || c == '_')) {
            self.i += 1;
        }
        if self.i == name_start {
            return StructDefinition {
                base: NodeBase::with_error(
                    self.span_from(keyword.start),
                    ParsingError::new(kind, UNTERMINATED_STRUCT_DEF_MISSING_NAME_AFTER_KEYWORD),
                ),
                name: None,
                body: None,
            }
            .into();
        }

        let name: Node = PatternIdentifierLiteral {
            base: NodeBase::new(self.span_from(name_start)),
            unprefixed: true,
            name: self.text(name_start, self.i),
        }
        .into();

        self.eat_space();
        if !self.peek_is('{') {
            return StructDefinition {
                base: NodeBase::with_error(
                    self.span_from(keyword.start),
                    ParsingError::new(kind, UNTERMINATED_STRUCT_DEF_MISSING_BODY),
                ),
                name: Some(Box::new(name)),
                body: None,
            }
            .into();
        }

        let body = self.parse_struct_body();
        StructDefinition {
            base: NodeBase::new(self.span_from(keyword.start)),
            name: Some(Box::new(name)),
            body: Some(Box::new(body)),
        }
        .into()
    }

    fn parse_struct_body(&mut self) -> Node {
        let start = self.i;
        self.push_token_at(TokenType::OpeningCurlyBracket, start);
        self.i += 1;
        self.eat_space_newline_semicolon_comment();

        let mut definitions = Vec::new();
        while self.peek().is_some_and(|c| c != '}') && !self.is_interrupted() {
            let definition = self.parse_expression();
            match definition {
                Node::MissingExpression(_) => match self.peek() {
                    Some(c) => definitions.push(self.unexpected_char_node(fmt_unexpected_char_in_struct_body(c))),
                    None => break,
                },
                Node::IdentifierLiteral(_) => {
                    self.eat_space();
                    let type_annotation = self
                        .peek()
                        .is_some_and(|c| !matches!(c, ';' | '\n' | '}'))
                        .then(|| self.parse_in_pattern_mode());
                    let end = type_annotation
                        .as_ref()
                        .map_or(definition.span().end, |t| t.span().end);
                    definitions.push(
                        StructFieldDefinition {
                            base: NodeBase::new(NodeSpan::new(definition.span().start, end)),
                            name: Box::new(definition),
                            type_annotation: type_annotation.map(Box::new),
                        }
                        .into(),
                    );
                }
                Node::FunctionDeclaration(_) => definitions.push(definition),
                mut other => {
                    if other.error().is_none() {
                        other.base_mut().error = Some(ParsingError::unspecified(
                            ONLY_FIELD_AND_METHOD_DEFINITIONS_ARE_ALLOWED_IN_STRUCT_BODY,
                        ));
                    }
                    definitions.push(other);
                }
            }
            self.eat_space_newline_semicolon_comment();
        }

        let mut error = None;
        if self.peek_is('}') {
            self.push_token_at(TokenType::ClosingCurlyBracket, self.i);
            self.i += 1;
        } else {
            error = Some(ParsingError::unspecified(UNTERMINATED_STRUCT_BODY_MISSING_CLOSING_BRACE));
        }

        StructBody {
            base: NodeBase::with_opt_error(self.span_from(start), error),
            definitions,
        }
        .into()
    }
}
