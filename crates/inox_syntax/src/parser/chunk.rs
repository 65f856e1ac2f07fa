/// Module-level parsing: the chunk header (shebang, `includable-chunk`, `const (...)`,
/// `preinit {...}`, `manifest {...}`) and statement lists.
///
/// ## Notes
/// - This file is `include!`'d into `crate::parser`.
/// - Chunks, blocks, embedded modules and quoted statement regions share
///   [`Parser::parse_statement_list`]; they only differ by the character that ends the list.
impl<'a> Parser<'a> {
    pub(crate) fn parse_chunk(&mut self) -> Chunk {
        let mut chunk = Chunk {
            base: NodeBase::new(NodeSpan::new(0, self.len())),
            ..Default::default()
        };

        // shebang
        if self.at_str("#!") {
            while self.peek().is_some_and(|c| c != '\n') {
                self.i += 1;
            }
        }

        self.eat_space_newline_semicolon_comment();
        chunk.includable_chunk_desc = self.parse_includable_chunk_desc_if_present().map(Box::new);

        self.eat_space_newline_semicolon_comment();
        chunk.global_constant_declarations = self.parse_global_constant_declarations().map(Box::new);

        if chunk.includable_chunk_desc.is_none() {
            self.eat_space_newline_semicolon_comment();
            chunk.preinit = self.parse_preinit_if_present().map(Box::new);

            self.eat_space_newline_semicolon_comment();
            chunk.manifest = self.parse_manifest_if_present().map(Box::new);
        }

        if !self.only_chunk_start {
            self.eat_space_newline_semicolon_comment();
            let (statements, region_headers) = self.parse_statement_list(|_| false, fmt_unexpected_char_in_block_or_module);
            chunk.statements = statements;
            chunk.region_headers = region_headers;
        }

        let mut tokens = std::mem::take(&mut self.tokens);
        tokens.sort_by_key(|t| t.span.start);
        // productions that backtrack can push the same token twice
        tokens.dedup_by_key(|t| t.span.start);
        chunk.tokens = tokens;
        chunk
    }

    /// Parse statements until the end of the input or until `is_end` accepts the current char.
    ///
    /// ## Returns
    /// - The statements and the annotated region headers found between them.
    fn parse_statement_list(
        &mut self,
        is_end: fn(char) -> bool,
        unexpected_char_message: fn(char) -> String,
    ) -> (Vec<Node>, Vec<Node>) {
        let mut stmts: Vec<Node> = Vec::new();
        let mut region_headers: Vec<Node> = Vec::new();
        let mut prev_stmt_end: Option<usize> = None;
        let mut prev_stmt_error_kind: Option<ParsingErrorKind> = None;

        while let Some(c) = self.peek() {
            if is_end(c) || self.is_interrupted() {
                break;
            }

            if is_forbidden_space_character(c) {
                stmts.push(self.unexpected_char_node(unexpected_char_message(c)));
                self.eat_space_newline_semicolon_comment();
                continue;
            }

            let mut stmt_error = None;
            if prev_stmt_end == Some(self.i)
                && prev_stmt_error_kind != Some(ParsingErrorKind::InvalidNext)
                && !self.s[self.i - 1].is_whitespace()
            {
                stmt_error = Some(ParsingError::unspecified(STMTS_SHOULD_BE_SEPARATED_BY));
            }

            let (annotations, move_forward) =
                self.parse_metadata_annotations_before_statement(&mut stmts, &mut region_headers, is_end);
            if !move_forward {
                break;
            }

            let mut stmt = self.parse_statement();
            prev_stmt_end = Some(self.i);

            if let Some(missing) = self.add_annotations_to_node_if_possible(annotations, &mut stmt) {
                stmts.push(missing);
            }

            if stmt.is_missing_expr() {
                stmts.push(stmt);
                break;
            }

            prev_stmt_error_kind = stmt.error().map(|e| e.kind);
            if let Some(error) = stmt_error
                && stmt.error().is_none_or(|e| e.kind != ParsingErrorKind::InvalidNext)
            {
                stmt.base_mut().error = Some(error);
            }
            stmts.push(stmt);

            self.eat_space_newline_semicolon_comment();
        }

        (stmts, region_headers)
    }

    fn parse_includable_chunk_desc_if_present(&mut self) -> Option<Node> {
        let keyword = keywords::as_str(KeywordId::IncludableChunk);
        if !self.at_word(keyword) {
            return None;
        }
        let start = self.i;
        self.push_keyword(TokenType::IncludableChunkKeyword, start);
        self.i += keyword.len();

        Some(
            IncludableChunkDescription {
                base: NodeBase::new(self.span_from(start)),
            }
            .into(),
        )
    }

    fn parse_preinit_if_present(&mut self) -> Option<Node> {
        let keyword = keywords::as_str(KeywordId::Preinit);
        if !self.at_word(keyword) {
            return None;
        }
        let start = self.i;
        self.push_keyword(TokenType::PreinitKeyword, start);
        self.i += keyword.len();
        self.eat_space();

        if !self.peek_is('{') {
            return Some(
                PreinitStatement {
                    base: NodeBase::with_error(
                        self.span_from(start),
                        ParsingError::unspecified(PREINIT_KEYWORD_SHOULD_BE_FOLLOWED_BY_A_BLOCK),
                    ),
                    block: None,
                }
                .into(),
            );
        }

        let block = self.parse_block();
        Some(
            PreinitStatement {
                base: NodeBase::new(self.span_from(start)),
                block: Some(Box::new(block)),
            }
            .into(),
        )
    }

    fn parse_manifest_if_present(&mut self) -> Option<Node> {
        let keyword = keywords::as_str(KeywordId::Manifest);
        if !self.at_word(keyword) {
            return None;
        }
        let start = self.i;
        self.push_keyword(TokenType::ManifestKeyword, start);
        self.i += keyword.len();
        self.eat_space();

        let object = self.parse_expression();
        let error = (!matches!(object, Node::ObjectLiteral(_)) && !object.is_missing_expr())
            .then(|| ParsingError::unspecified(INVALID_MANIFEST_DESC_VALUE));

        Some(
            Manifest {
                base: NodeBase::with_opt_error(NodeSpan::new(start, object.span().end), error),
                object: Box::new(object),
            }
            .into(),
        )
    }

    /// `const ( a = 1 ... )` or `const a = 1` at the top of the module.
    fn parse_global_constant_declarations(&mut self) -> Option<Node> {
        let keyword = keywords::as_str(KeywordId::Const);
        if !self.at_word(keyword) {
            return None;
        }
        let start = self.i;
        self.push_keyword(TokenType::ConstKeyword, start);
        self.i += keyword.len();
        self.eat_space();

        let mut declarations = Vec::new();
        let mut error = None;

        match self.peek() {
            None => {
                error = Some(ParsingError::unspecified(UNTERMINATED_GLOBAL_CONS_DECLS));
            }
            Some(c) if is_first_ident_char(c) => {
                declarations.push(self.parse_single_global_const_declaration());
            }
            Some(c) => {
                if c == '(' {
                    self.push_token_at(TokenType::OpeningParenthesis, self.i);
                } else {
                    error = Some(ParsingError::unspecified(INVALID_GLOBAL_CONST_DECLS_OPENING_PAREN_EXPECTED));
                }
                self.i += 1;

                while self.peek().is_some_and(|c| c != ')') {
                    self.eat_space_newline_comment();
                    if self.peek_is(')') {
                        break;
                    }
                    if self.at_end() {
                        break;
                    }
                    declarations.push(self.parse_single_global_const_declaration());
                    self.eat_space_newline_comment();
                }

                if self.peek_is(')') {
                    self.push_token_at(TokenType::ClosingParenthesis, self.i);
                    self.i += 1;
                } else {
                    error = Some(ParsingError::unspecified(INVALID_GLOBAL_CONST_DECLS_MISSING_CLOSING_PAREN));
                }
            }
        }

        Some(
            GlobalConstantDeclarations {
                base: NodeBase::with_opt_error(self.span_from(start), error),
                declarations,
            }
            .into(),
        )
    }

    fn parse_single_global_const_declaration(&mut self) -> Node {
        let lhs = self.parse_expression();
        let start = lhs.span().start;
        let mut error = match &lhs {
            Node::IdentifierLiteral(_) => None,
            _ => Some(ParsingError::unspecified(INVALID_GLOBAL_CONST_DECL_LHS_MUST_BE_AN_IDENT)),
        };

        self.eat_space();

        if !self.peek_is('=') {
            let name = lhs.identifier_name().unwrap_or_default().to_string();
            error = Some(ParsingError::new(
                ParsingErrorKind::MissingEqualsSignInDeclaration,
                fmt_invalid_const_decl_missing_equals_sign(&name),
            ));
            if !self.at_end() {
                self.i += 1;
            }
            return GlobalConstantDeclaration {
                base: NodeBase::with_opt_error(self.span_from(start), error),
                right: Box::new(self.missing_at_cursor()),
                left: Box::new(lhs),
            }
            .into();
        }

        self.push_token_at(TokenType::Equal, self.i);
        self.i += 1;
        self.eat_space();

        let rhs = self.parse_expression();
        GlobalConstantDeclaration {
            base: NodeBase::with_opt_error(NodeSpan::new(start, rhs.span().end), error),
            left: Box::new(lhs),
            right: Box::new(rhs),
        }
        .into()
    }

    /// `{ statements }`
    fn parse_block(&mut self) -> Node {
        let start = self.i;
        self.push_sub_token(TokenType::OpeningCurlyBracket, TokenSubType::BlockOpeningBrace, start, start + 1);
        self.i += 1;
        self.eat_space_newline_semicolon_comment();

        let (statements, region_headers) = self.parse_statement_list(|c| c == '}', fmt_unexpected_char_in_block_or_module);

        let mut error = None;
        if self.peek_is('}') {
            self.push_sub_token(TokenType::ClosingCurlyBracket, TokenSubType::BlockClosingBrace, self.i, self.i + 1);
            self.i += 1;
        } else {
            error = Some(ParsingError::unspecified(UNTERMINATED_BLOCK_MISSING_BRACE));
        }

        Block {
            base: NodeBase::with_opt_error(self.span_from(start), error),
            region_headers,
            statements,
        }
        .into()
    }
}
