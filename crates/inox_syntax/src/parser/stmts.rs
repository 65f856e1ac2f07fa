/// Statements: keyword statements, assignments, command-like calls and pipelines.
///
/// Statement keywords are first scanned as plain identifiers by [`Parser::parse_expression`]; the
/// productions in this file receive the span of that identifier and push the keyword token.
///
/// ## Notes
/// - This file is `include!`'d into `crate::parser`.
impl<'a> Parser<'a> {
    pub(crate) fn parse_statement(&mut self) -> Node {
        if !self.enter_nested() {
            return self.missing_at_cursor();
        }
        let stmt = self.parse_statement_inner();
        self.leave_nested();
        stmt
    }

    fn parse_statement_inner(&mut self) -> Node {
        let mut expr = self.parse_expression();
        let parenthesized = expr.base().is_parenthesized;

        let keyword = match &expr {
            Node::IdentifierLiteral(ident) if !parenthesized => keywords::from_str(&ident.name),
            _ => None,
        };
        let is_ident_like = !parenthesized
            && keyword.is_none()
            && matches!(expr, Node::IdentifierLiteral(_) | Node::IdentifierMemberExpression(_));

        // `f;` is a call without arguments.
        if is_ident_like && self.are_next_spaces_followed_by(';') {
            let span = expr.span();
            return CallExpression {
                base: NodeBase::new(span),
                callee: Box::new(expr),
                arguments: Vec::new(),
                must: true,
                command_like_syntax: true,
            }
            .into();
        }

        if expr.is_missing_expr() {
            return match self.peek() {
                Some(c) => self.unexpected_char_node(fmt_unexpected_char_in_block_or_module(c)),
                None => expr,
            };
        }

        if matches!(expr, Node::CallExpression(_)) {
            return expr;
        }

        match &mut expr {
            Node::TestSuiteExpression(suite) if !parenthesized => suite.is_statement = true,
            Node::TestCaseExpression(case) if !parenthesized => case.is_statement = true,
            Node::BooleanConversionExpression(conversion)
                if !parenthesized && conversion.expr.is_ident_with_name(keywords::as_str(KeywordId::Assign)) =>
            {
                let span = conversion.expr.span();
                self.push_token_at(TokenType::QuestionMark, span.end);
                return self.parse_multi_assignment(span, true);
            }
            _ => {}
        }

        if let Some(keyword) = keyword {
            let span = expr.span();
            let stmt = match keyword {
                KeywordId::Assert => Some(self.parse_assertion_statement(span)),
                KeywordId::If => Some(self.parse_if_statement(span)),
                KeywordId::For => Some(self.parse_for_statement(span)),
                KeywordId::Walk => Some(self.parse_walk_statement(span)),
                KeywordId::Switch => Some(self.parse_switch_or_match_statement(span, false)),
                KeywordId::Match => Some(self.parse_switch_or_match_statement(span, true)),
                KeywordId::DropPerms => Some(self.parse_permission_dropping_statement(span)),
                KeywordId::Import => Some(self.parse_import_statement(span)),
                KeywordId::Return | KeywordId::Yield | KeywordId::Coyield => {
                    Some(self.parse_return_like_statement(span, keyword))
                }
                KeywordId::Break | KeywordId::Continue | KeywordId::Prune => {
                    Some(self.parse_loop_control_statement(span, keyword))
                }
                KeywordId::Assign => Some(self.parse_multi_assignment(span, false)),
                KeywordId::Var => Some(self.parse_variable_declarations(span, false)),
                KeywordId::Globalvar => Some(self.parse_variable_declarations(span, true)),
                KeywordId::Synchronized => Some(self.parse_synchronized_block(span)),
                KeywordId::Pattern => Some(self.parse_pattern_definition(span)),
                KeywordId::Pnamespace => Some(self.parse_pattern_namespace_definition(span)),
                KeywordId::Extend => Some(self.parse_extend_statement(span)),
                KeywordId::Struct => Some(self.parse_struct_definition(span)),
                _ => None,
            };
            if let Some(stmt) = stmt {
                return stmt;
            }
        }

        if self.at_end() {
            return expr;
        }

        let followed_by_space = self.peek_is(' ');
        self.eat_space();

        let Some(c) = self.peek() else {
            return expr;
        };

        match c {
            '=' => self.parse_assignment(expr),
            ';' => expr,
            '+' | '-' | '*' | '/' if self.next_is(1, '=') => self.parse_assignment(expr),
            '+' | '-' | '*' | '/' if followed_by_space && is_ident_like => self.parse_command_like_statement(expr),
            _ if followed_by_space
                && is_ident_like
                && (!is_unpaired_or_closing_delim(c) || matches!(c, '|' | '\n' | ':')) =>
            {
                self.parse_command_like_statement(expr)
            }
            _ => expr,
        }
    }

    /// Parse the block at the cursor if there is one.
    fn parse_block_if_present(&mut self) -> Option<Node> {
        self.peek_is('{').then(|| self.parse_block())
    }

    fn missing_block_error(message: impl Into<String>) -> Option<ParsingError> {
        Some(ParsingError::new(ParsingErrorKind::MissingBlock, message))
    }

    // ========================================================================
    // Calls & pipelines
    // ========================================================================

    /// `callee arg1 arg2`, optionally followed by pipeline stages (`a | b $`).
    fn parse_command_like_statement(&mut self, callee: Node) -> Node {
        let call = self.parse_command_like_call(callee);
        self.eat_space();
        if !self.peek_is('|') {
            return call;
        }

        let start = call.span().start;
        let mut end = call.span().end;
        let mut stages = vec![PipelineStage {
            kind: PipelineStageKind::Normal,
            expr: call,
        }];
        let mut error = None;

        self.push_token_at(TokenType::Pipe, self.i);
        self.i += 1;
        end = end.max(self.i);
        self.eat_space();

        loop {
            if self.at_end() || self.peek_is('\n') {
                error = Some(ParsingError::unspecified(UNTERMINATED_PIPE_STMT_LAST_STAGE_EMPTY));
                break;
            }

            let callee = self.parse_expression();
            if !matches!(callee, Node::IdentifierLiteral(_) | Node::IdentifierMemberExpression(_)) {
                end = callee.span().end;
                stages.push(PipelineStage {
                    kind: PipelineStageKind::Normal,
                    expr: callee,
                });
                error = Some(ParsingError::unspecified(INVALID_PIPE_STATE_ALL_STAGES_SHOULD_BE_CALLS));
                break;
            }

            let stage = self.parse_command_like_call(callee);
            end = stage.span().end;
            stages.push(PipelineStage {
                kind: PipelineStageKind::Normal,
                expr: stage,
            });

            self.eat_space();
            match self.peek() {
                Some('|') => {
                    self.push_token_at(TokenType::Pipe, self.i);
                    self.i += 1;
                    end = self.i;
                    self.eat_space();
                }
                None | Some('\n' | ';') => break,
                Some(c) if is_closing_delim(c) => break,
                Some(c) => {
                    error = Some(ParsingError::unspecified(fmt_invalid_pipeline_stage_unexpected_char(c)));
                    break;
                }
            }
        }

        PipelineStatement {
            base: NodeBase::with_opt_error(NodeSpan::new(start, end), error),
            stages,
        }
        .into()
    }

    fn parse_command_like_call(&mut self, callee: Node) -> Node {
        let start = callee.span().start;
        let arguments = self.parse_call_args_no_parenthesis();
        let end = arguments.last().map_or(callee.span().end, |arg| arg.span().end);
        CallExpression {
            base: NodeBase::new(NodeSpan::new(start, end)),
            callee: Box::new(callee),
            arguments,
            must: true,
            command_like_syntax: true,
        }
        .into()
    }

    // ========================================================================
    // Control flow
    // ========================================================================

    fn parse_if_statement(&mut self, keyword: NodeSpan) -> Node {
        self.push_keyword(TokenType::IfKeyword, keyword.start);
        self.eat_space();

        let test = self.parse_expression();
        let mut end = test.span().end;
        let mut consequent = None;
        let mut alternate = None;
        let mut error = None;

        self.eat_space();
        match self.peek() {
            None => error = Self::missing_block_error(UNTERMINATED_IF_STMT_MISSING_BLOCK),
            Some('{') => {
                let block = self.parse_block();
                end = block.span().end;
                consequent = Some(Box::new(block));

                let else_keyword = keywords::as_str(KeywordId::Else);
                self.eat_space();
                if self.at_word(else_keyword) {
                    self.push_keyword(TokenType::ElseKeyword, self.i);
                    self.i += else_keyword.len();
                    end = self.i;
                    self.eat_space();

                    let if_keyword = keywords::as_str(KeywordId::If);
                    match self.peek() {
                        None => error = Self::missing_block_error(UNTERMINATED_IF_STMT_MISSING_BLOCK_AFTER_ELSE),
                        Some('{') => {
                            let block = self.parse_block();
                            end = block.span().end;
                            alternate = Some(Box::new(block));
                        }
                        Some(_) if self.at_word(if_keyword) => {
                            let start = self.i;
                            self.i += if_keyword.len();
                            let nested = self.parse_if_statement(NodeSpan::new(start, self.i));
                            end = nested.span().end;
                            alternate = Some(Box::new(nested));
                        }
                        Some(c) => {
                            error = Self::missing_block_error(fmt_unterminated_if_stmt_else_should_be_followed_by_block(c))
                        }
                    }
                }
            }
            Some(c) => error = Self::missing_block_error(fmt_unterminated_if_stmt_should_be_followed_by_block(c)),
        }

        IfStatement {
            base: NodeBase::with_opt_error(NodeSpan::new(keyword.start, end), error),
            test: Box::new(test),
            consequent,
            alternate,
        }
        .into()
    }

    /// `for [%key-pattern] [key,] [%value-pattern] value in iterated { ... }`,
    /// `for [chunked] iterated { ... }`.
    fn parse_for_statement(&mut self, keyword: NodeSpan) -> Node {
        self.push_keyword(TokenType::ForKeyword, keyword.start);
        self.eat_space();

        let mut stmt = ForStatement {
            base: NodeBase::new(keyword),
            ..Default::default()
        };
        let mut error = None;

        let chunked_keyword = keywords::as_str(KeywordId::Chunked);
        if self.at_word(chunked_keyword) {
            self.push_keyword(TokenType::ChunkedKeyword, self.i);
            self.i += chunked_keyword.len();
            stmt.chunked = true;
            self.eat_space();
        }

        let mut first_pattern = None;
        if self.peek_is('%') {
            let pattern = self.parse_expression();
            self.eat_space();
            if self.peek_is('{') {
                // variable-less loop over a pattern
                stmt.iterated_value = Some(Box::new(pattern));
                return self.finish_for_statement(stmt, keyword.start, error);
            }
            first_pattern = Some(pattern);
        }

        let first = self.parse_expression();
        self.eat_space();

        let Node::IdentifierLiteral(_) = first else {
            stmt.key_pattern = first_pattern.map(Box::new);
            stmt.iterated_value = Some(Box::new(first));
            return self.finish_for_statement(stmt, keyword.start, error);
        };

        if self.at_end() {
            stmt.value_pattern = first_pattern.map(Box::new);
            stmt.value_elem_ident = Some(Box::new(first));
            error = Some(ParsingError::unspecified(INVALID_FOR_STMT));
            return self.finish_for_statement(stmt, keyword.start, error);
        }

        if self.at_word(keywords::as_str(KeywordId::In)) {
            stmt.value_pattern = first_pattern.map(Box::new);
            stmt.value_elem_ident = Some(Box::new(first));
        } else {
            stmt.key_pattern = first_pattern.map(Box::new);
            let key = first;

            match self.peek() {
                Some(',') => self.push_token_at(TokenType::Comma, self.i),
                Some(c) => {
                    error = Some(ParsingError::unspecified(fmt_for_stmt_key_index_should_be_followed_by_comma_not(c)));
                    self.push_raw_token(TokenType::UnexpectedChar, self.i, self.i + 1);
                }
                None => {}
            }
            self.i += 1;
            self.eat_space();

            if self.at_end() {
                stmt.key_index_ident = Some(Box::new(key));
                return self.finish_for_statement(
                    stmt,
                    keyword.start,
                    Some(ParsingError::unspecified(UNTERMINATED_FOR_STMT)),
                );
            }

            if self.peek_is('%') {
                stmt.value_pattern = Some(Box::new(self.parse_expression()));
                self.eat_space();
            }

            let value = self.parse_expression();
            if !matches!(value, Node::IdentifierLiteral(_)) {
                error = Some(ParsingError::unspecified(
                    fmt_invalid_for_stmt_key_index_var_should_be_followed_by_var_not(&key),
                ));
            }
            stmt.key_index_ident = Some(Box::new(key));
            stmt.value_elem_ident = Some(Box::new(value));
            self.eat_space();

            if self.at_end() {
                return self.finish_for_statement(
                    stmt,
                    keyword.start,
                    Some(ParsingError::unspecified(UNTERMINATED_FOR_STMT)),
                );
            }

            if !self.at_word(keywords::as_str(KeywordId::In)) {
                return self.finish_for_statement(
                    stmt,
                    keyword.start,
                    Some(ParsingError::unspecified(INVALID_FOR_STMT_MISSING_IN_KEYWORD)),
                );
            }
        }

        self.push_keyword(TokenType::InKeyword, self.i);
        self.i += 2;

        if !self.peek_is(' ') {
            return self.finish_for_statement(
                stmt,
                keyword.start,
                Some(ParsingError::unspecified(INVALID_FOR_STMT_IN_KEYWORD_SHOULD_BE_FOLLOWED_BY_SPACE)),
            );
        }
        self.eat_space();

        if self.at_end() {
            return self.finish_for_statement(
                stmt,
                keyword.start,
                Some(ParsingError::unspecified(INVALID_FOR_STMT_MISSING_VALUE_AFTER_IN)),
            );
        }

        stmt.iterated_value = Some(Box::new(self.parse_expression()));
        self.finish_for_statement(stmt, keyword.start, error)
    }

    /// Parse the body of a for statement (if not already errored) and compute its span.
    fn finish_for_statement(&mut self, mut stmt: ForStatement, start: usize, mut error: Option<ParsingError>) -> Node {
        if error.is_none() {
            self.eat_space();
            stmt.body = self.parse_block_if_present().map(Box::new);
            if stmt.body.is_none() {
                error = Self::missing_block_error(UNTERMINATED_FOR_STMT_MISSING_BLOCK);
            }
        }

        let end = [
            &stmt.body,
            &stmt.iterated_value,
            &stmt.value_elem_ident,
            &stmt.value_pattern,
            &stmt.key_index_ident,
            &stmt.key_pattern,
        ]
        .into_iter()
        .flatten()
        .map(|n| n.span().end)
        .max()
        .unwrap_or(stmt.base.span.end)
        .max(stmt.base.span.end);

        stmt.base = NodeBase::with_opt_error(NodeSpan::new(start, end), error);
        stmt.into()
    }

    /// `walk walked [meta,] entry { ... }`
    fn parse_walk_statement(&mut self, keyword: NodeSpan) -> Node {
        self.push_keyword(TokenType::WalkKeyword, keyword.start);
        self.eat_space();

        let mut stmt = WalkStatement::default();
        let mut end = keyword.end;

        let walked = self.parse_expression();
        if walked.is_missing_expr() {
            stmt.base = NodeBase::with_error(
                NodeSpan::new(keyword.start, self.i),
                ParsingError::unspecified(UNTERMINATED_WALK_STMT_MISSING_WALKED_VALUE),
            );
            return stmt.into();
        }
        end = end.max(walked.span().end);
        stmt.walked = Some(Box::new(walked));
        self.eat_space();

        let first = self.parse_expression();
        if !matches!(first, Node::IdentifierLiteral(_)) {
            stmt.base = NodeBase::with_error(
                NodeSpan::new(keyword.start, end),
                ParsingError::unspecified(UNTERMINATED_WALK_STMT_MISSING_ENTRY_VARIABLE_NAME),
            );
            return stmt.into();
        }
        end = first.span().end;
        self.eat_space();

        if self.peek_is(',') {
            self.push_token_at(TokenType::Comma, self.i);
            self.i += 1;
            end = self.i;
            stmt.meta_ident = Some(Box::new(first));
            self.eat_space();

            if self.at_end() || self.peek_is('{') {
                stmt.base = NodeBase::with_error(
                    NodeSpan::new(keyword.start, end),
                    ParsingError::unspecified(INVALID_WALK_STMT_MISSING_ENTRY_IDENTIFIER),
                );
                return stmt.into();
            }

            let entry = self.parse_expression();
            if !matches!(entry, Node::IdentifierLiteral(_)) {
                stmt.base = NodeBase::with_error(
                    NodeSpan::new(keyword.start, end),
                    ParsingError::unspecified(UNTERMINATED_WALK_STMT_MISSING_ENTRY_VARIABLE_NAME),
                );
                return stmt.into();
            }
            end = entry.span().end;
            stmt.entry_ident = Some(Box::new(entry));
            self.eat_space();
        } else {
            stmt.entry_ident = Some(Box::new(first));
        }

        let mut error = None;
        match self.parse_block_if_present() {
            Some(block) => {
                end = block.span().end;
                stmt.body = Some(Box::new(block));
            }
            None => error = Self::missing_block_error(UNTERMINATED_WALK_STMT_MISSING_BLOCK),
        }

        stmt.base = NodeBase::with_opt_error(NodeSpan::new(keyword.start, end), error);
        stmt.into()
    }

    /// `switch value { 1 {...} 2, 3 {...} defaultcase {...} }`, `match value { %int {...} }`.
    fn parse_switch_or_match_statement(&mut self, keyword: NodeSpan, is_match: bool) -> Node {
        let token_type = if is_match {
            TokenType::MatchKeyword
        } else {
            TokenType::SwitchKeyword
        };
        self.push_keyword(token_type, keyword.start);
        self.eat_space();

        let (missing_value, missing_body, missing_closing_brace, missing_case_block, invalid_value) = if is_match {
            (
                UNTERMINATED_MATCH_STMT_MISSING_VALUE,
                UNTERMINATED_MATCH_STMT_MISSING_BODY,
                UNTERMINATED_MATCH_STMT_MISSING_CLOSING_BRACE,
                UNTERMINATED_MATCH_CASE_MISSING_BLOCK,
                INVALID_MATCH_CASE_VALUE_EXPLANATION,
            )
        } else {
            (
                UNTERMINATED_SWITCH_STMT_MISSING_VALUE,
                UNTERMINATED_SWITCH_STMT_MISSING_BODY,
                UNTERMINATED_SWITCH_STMT_MISSING_CLOSING_BRACE,
                UNTERMINATED_SWITCH_CASE_MISSING_BLOCK,
                INVALID_SWITCH_CASE_VALUE_EXPLANATION,
            )
        };

        let build = |span: NodeSpan, error: Option<ParsingError>, discriminant: Node, cases, default_cases| -> Node {
            let base = NodeBase::with_opt_error(span, error);
            let discriminant = Box::new(discriminant);
            if is_match {
                MatchStatement {
                    base,
                    discriminant,
                    cases,
                    default_cases,
                }
                .into()
            } else {
                SwitchStatement {
                    base,
                    discriminant,
                    cases,
                    default_cases,
                }
                .into()
            }
        };

        if self.at_end() {
            let discriminant = self.missing_at_cursor();
            return build(
                self.span_from(keyword.start),
                Some(ParsingError::unspecified(missing_value)),
                discriminant,
                Vec::new(),
                Vec::new(),
            );
        }

        let discriminant = self.parse_expression();
        self.eat_space();

        if !self.peek_is('{') {
            return build(
                NodeSpan::new(keyword.start, discriminant.span().end.max(keyword.end)),
                Some(ParsingError::unspecified(missing_body)),
                discriminant,
                Vec::new(),
                Vec::new(),
            );
        }

        self.push_token_at(TokenType::OpeningCurlyBracket, self.i);
        self.i += 1;

        let mut cases: Vec<Node> = Vec::new();
        let mut default_cases: Vec<Node> = Vec::new();
        let default_keyword = keywords::as_str(KeywordId::Defaultcase);

        'cases: while self.peek().is_some_and(|c| c != '}') && !self.is_interrupted() {
            self.eat_space_newline_semicolon_comment();
            if self.peek().is_none_or(|c| c == '}') {
                break;
            }

            // defaultcase { ... }
            if self.at_word(default_keyword) {
                let start = self.i;
                self.push_keyword(TokenType::DefaultcaseKeyword, start);
                self.i += default_keyword.len();
                self.eat_space();

                let block = self.parse_block_if_present();
                let mut error = if block.is_none() {
                    Self::missing_block_error(UNTERMINATED_DEFAULT_CASE_MISSING_BLOCK)
                } else {
                    None
                };
                if !default_cases.is_empty() && error.is_none() {
                    error = Some(ParsingError::unspecified(DEFAULT_CASE_MUST_BE_UNIQUE));
                }
                default_cases.push(
                    DefaultCaseWithBlock {
                        base: NodeBase::with_opt_error(self.span_from(start), error),
                        block: block.map(Box::new),
                    }
                    .into(),
                );
                continue;
            }

            // block without a value
            if self.peek_is('{') {
                let start = self.i;
                let value: Node = MissingExpression {
                    base: NodeBase::with_error(
                        NodeSpan::new(start, start + 1),
                        ParsingError::unspecified(fmt_case_value_expected_here(self.s, start, true)),
                    ),
                }
                .into();
                let block = self.parse_block();
                cases.push(Self::make_case(
                    is_match,
                    self.span_from(start),
                    None,
                    vec![value],
                    None,
                    Some(block),
                ));
                continue;
            }

            let case_start = self.i;
            let mut values: Vec<Node> = Vec::new();
            let mut case_error = None;
            let mut group_matching_variable = None;

            while self.peek().is_some_and(|c| c != '{') {
                let value = self.parse_expression();
                if value.is_missing_expr() {
                    if self.peek_is('}') {
                        break;
                    }
                    values.push(self.unexpected_char_node(fmt_unexpected_char_in_switch_or_match_statement(
                        self.peek().unwrap_or(' '),
                    )));
                    cases.push(Self::make_case(is_match, self.span_from(case_start), None, values, None, None));
                    continue 'cases;
                }

                let valid = if is_match {
                    has_statically_known_value(&value)
                } else {
                    value.is_simple_value_literal()
                };
                if !valid {
                    case_error = Some(ParsingError::unspecified(invalid_value));
                }
                values.push(value);

                self.eat_space();
                match self.peek() {
                    Some(',') => {
                        self.push_token_at(TokenType::Comma, self.i);
                        self.i += 1;
                        self.eat_space();
                    }
                    Some('{') | None => {}
                    Some('}') => {
                        cases.push(Self::make_case(
                            is_match,
                            self.span_from(case_start),
                            case_error,
                            values,
                            None,
                            None,
                        ));
                        break 'cases;
                    }
                    Some(c) if is_match && is_alpha(c) => {
                        group_matching_variable = Some(self.parse_expression());
                        self.eat_space();
                        break;
                    }
                    Some(c) => {
                        values.push(self.unexpected_char_node(fmt_unexpected_char_in_switch_or_match_statement(c)));
                        cases.push(Self::make_case(
                            is_match,
                            self.span_from(case_start),
                            case_error,
                            values,
                            None,
                            None,
                        ));
                        continue 'cases;
                    }
                }
            }

            let block = self.parse_block_if_present();
            if block.is_none() && case_error.is_none() {
                case_error = Self::missing_block_error(missing_case_block);
            }
            cases.push(Self::make_case(
                is_match,
                self.span_from(case_start),
                case_error,
                values,
                group_matching_variable,
                block,
            ));
        }

        let mut error = None;
        if self.peek_is('}') {
            self.push_token_at(TokenType::ClosingCurlyBracket, self.i);
            self.i += 1;
        } else {
            error = Some(ParsingError::unspecified(missing_closing_brace));
        }

        build(self.span_from(keyword.start), error, discriminant, cases, default_cases)
    }

    fn make_case(
        is_match: bool,
        span: NodeSpan,
        error: Option<ParsingError>,
        values: Vec<Node>,
        group_matching_variable: Option<Node>,
        block: Option<Node>,
    ) -> Node {
        let base = NodeBase::with_opt_error(span, error);
        let block = block.map(Box::new);
        if is_match {
            MatchStatementCase {
                base,
                values,
                group_matching_variable: group_matching_variable.map(Box::new),
                block,
            }
            .into()
        } else {
            SwitchStatementCase { base, values, block }.into()
        }
    }

    fn parse_synchronized_block(&mut self, keyword: NodeSpan) -> Node {
        self.push_keyword(TokenType::SynchronizedKeyword, keyword.start);
        self.eat_space();

        if self.at_end() {
            return SynchronizedBlockStatement {
                base: NodeBase::with_error(
                    self.span_from(keyword.start),
                    ParsingError::unspecified(SYNCHRONIZED_KEYWORD_SHOULD_BE_FOLLOWED_BY_SYNC_VALUES),
                ),
                ..Default::default()
            }
            .into();
        }

        let mut values = Vec::new();
        while self.peek().is_some_and(|c| c != '{') && !self.is_interrupted() {
            let value = self.parse_expression();
            if value.is_missing_expr() {
                match self.peek() {
                    Some(c) => values.push(self.unexpected_char_node(fmt_unexpected_char_in_synchronized_value_list(c))),
                    None => break,
                }
            } else {
                values.push(value);
            }
            self.eat_space();
        }

        let block = self.parse_block_if_present();
        let error = block
            .is_none()
            .then(|| ParsingError::new(ParsingErrorKind::MissingBlock, UNTERMINATED_SYNCHRONIZED_MISSING_BLOCK));

        SynchronizedBlockStatement {
            base: NodeBase::with_opt_error(self.span_from(keyword.start), error),
            synchronized_values: values,
            block: block.map(Box::new),
        }
        .into()
    }

    // ========================================================================
    // Simple keyword statements
    // ========================================================================

    fn parse_assertion_statement(&mut self, keyword: NodeSpan) -> Node {
        self.push_keyword(TokenType::AssertKeyword, keyword.start);
        self.eat_space();

        let expr = self.parse_expression();
        AssertionStatement {
            base: NodeBase::new(NodeSpan::new(keyword.start, expr.span().end.max(keyword.end))),
            expr: Box::new(expr),
        }
        .into()
    }

    fn parse_permission_dropping_statement(&mut self, keyword: NodeSpan) -> Node {
        self.push_keyword(TokenType::DropPermsKeyword, keyword.start);
        self.eat_space();

        let object = self.parse_expression();
        let error = (!matches!(object, Node::ObjectLiteral(_)))
            .then(|| ParsingError::unspecified(DROP_PERM_KEYWORD_SHOULD_BE_FOLLOWED_BY));

        PermissionDroppingStatement {
            base: NodeBase::with_opt_error(NodeSpan::new(keyword.start, object.span().end.max(keyword.end)), error),
            object: Box::new(object),
        }
        .into()
    }

    /// `return [value]`, `yield [value]`, `coyield [value]`.
    fn parse_return_like_statement(&mut self, keyword: NodeSpan, id: KeywordId) -> Node {
        let token_type = match id {
            KeywordId::Yield => TokenType::YieldKeyword,
            KeywordId::Coyield => TokenType::CoyieldKeyword,
            _ => TokenType::ReturnKeyword,
        };
        self.push_keyword(token_type, keyword.start);

        let mut end = keyword.end;
        self.eat_space();

        let mut expr = None;
        let at_comment = self.peek_is('#') && self.char_at(self.i + 1).is_some_and(is_comment_first_space);
        if self.peek().is_some_and(|c| !matches!(c, ';' | '}' | '\n')) && !at_comment {
            let value = self.parse_expression();
            end = value.span().end;
            expr = Some(Box::new(value));
        }

        let base = NodeBase::new(NodeSpan::new(keyword.start, end));
        match id {
            KeywordId::Yield => YieldStatement { base, expr }.into(),
            KeywordId::Coyield => CoyieldStatement { base, expr }.into(),
            _ => ReturnStatement { base, expr }.into(),
        }
    }

    fn parse_loop_control_statement(&mut self, keyword: NodeSpan, id: KeywordId) -> Node {
        let base = NodeBase::new(keyword);
        match id {
            KeywordId::Break => {
                self.push_keyword(TokenType::BreakKeyword, keyword.start);
                BreakStatement { base, label: None }.into()
            }
            KeywordId::Continue => {
                self.push_keyword(TokenType::ContinueKeyword, keyword.start);
                ContinueStatement { base, label: None }.into()
            }
            _ => {
                self.push_keyword(TokenType::PruneKeyword, keyword.start);
                PruneStatement { base }.into()
            }
        }
    }

    /// `import name <source> [config]` or the inclusion form `import ./file.ix`.
    fn parse_import_statement(&mut self, keyword: NodeSpan) -> Node {
        self.push_keyword(TokenType::ImportKeyword, keyword.start);
        self.eat_space();

        let first = self.parse_expression();
        if matches!(first, Node::RelativePathLiteral(_) | Node::AbsolutePathLiteral(_)) {
            let error = if matches!(first, Node::AbsolutePathLiteral(_)) {
                Some(INCLUSION_IMPORT_STMT_SRC_SHOULD_BE_A_RELATIVE_PATH_LIT)
            } else {
                check_import_source(&first)
            };
            return InclusionImportStatement {
                base: NodeBase::with_opt_error(
                    NodeSpan::new(keyword.start, first.span().end),
                    error.map(ParsingError::unspecified),
                ),
                source: Box::new(first),
            }
            .into();
        }

        if !matches!(first, Node::IdentifierLiteral(_)) {
            let missing = missing_at(first.span().start);
            return ImportStatement {
                base: NodeBase::with_error(
                    NodeSpan::new(keyword.start, first.span().end.max(keyword.end)),
                    ParsingError::unspecified(IMPORT_STMT_IMPORT_KEYWORD_SHOULD_BE_FOLLOWED_BY_IDENT),
                ),
                identifier: Box::new(missing),
                source: Box::new(first),
                configuration: None,
            }
            .into();
        }

        self.eat_space();
        let source = self.parse_expression();
        let mut error = match &source {
            Node::URLLiteral(_) | Node::RelativePathLiteral(_) | Node::AbsolutePathLiteral(_) => {
                check_import_source(&source).map(ParsingError::unspecified)
            }
            _ => Some(ParsingError::unspecified(IMPORT_STMT_SRC_SHOULD_BE_AN_URL_OR_PATH_LIT)),
        };
        let mut end = source.span().end;

        self.eat_space();
        let mut configuration = None;
        if self.peek().is_some_and(|c| !matches!(c, ';' | '\n' | '}')) {
            let config = self.parse_expression();
            if !config.is_missing_expr() {
                end = config.span().end;
                if !matches!(config, Node::ObjectLiteral(_)) && config.error().is_none() && error.is_none() {
                    error = Some(ParsingError::unspecified(IMPORT_STMT_CONFIG_SHOULD_BE_AN_OBJ_LIT));
                }
                configuration = Some(Box::new(config));
            }
        }

        ImportStatement {
            base: NodeBase::with_opt_error(NodeSpan::new(keyword.start, end), error),
            identifier: Box::new(first),
            source: Box::new(source),
            configuration,
        }
        .into()
    }

    // ========================================================================
    // Assignments
    // ========================================================================

    /// `assign a b = value`, `assign? a b = value` (missing values become nil).
    fn parse_multi_assignment(&mut self, keyword: NodeSpan, nillable: bool) -> Node {
        self.push_keyword(TokenType::AssignKeyword, keyword.start);

        let mut variables = Vec::new();
        while self.peek().is_some_and(|c| c != '=') && !self.is_interrupted() {
            self.eat_space();
            let var = self.parse_expression();
            if !matches!(var, Node::IdentifierLiteral(_)) {
                let end = var.span().end.max(keyword.end);
                let right = missing_at(end);
                variables.push(var);
                return MultiAssignment {
                    base: NodeBase::with_error(
                        NodeSpan::new(keyword.start, end),
                        ParsingError::unspecified(ASSIGN_KEYWORD_SHOULD_BE_FOLLOWED_BY_IDENTS),
                    ),
                    variables,
                    right: Box::new(right),
                    nillable,
                }
                .into();
            }
            variables.push(var);
            self.eat_space();
        }

        let mut error = None;
        let right = if self.peek_is('=') {
            self.push_token_at(TokenType::Equal, self.i);
            self.i += 1;
            self.eat_space();
            self.parse_expression()
        } else {
            error = Some(ParsingError::unspecified(UNTERMINATED_MULTI_ASSIGN_MISSING_EQL_SIGN));
            self.missing_at_cursor()
        };

        let mut stmt: Node = MultiAssignment {
            base: NodeBase::with_opt_error(NodeSpan::new(keyword.start, right.span().end.max(keyword.end)), error),
            variables,
            right: Box::new(right),
            nillable,
        }
        .into();
        self.check_assignment_terminator(&mut stmt);
        stmt
    }

    /// `left = right`, `left += right`, ... and the `%name = pattern` definition shorthand.
    fn parse_assignment(&mut self, left: Node) -> Node {
        let mut stmt = self.parse_assignment_inner(left);
        self.check_assignment_terminator(&mut stmt);
        stmt
    }

    fn parse_assignment_inner(&mut self, left: Node) -> Node {
        let start = left.span().start;
        let (operator, token_type, len) = match self.peek() {
            Some('+') => (AssignmentOperator::PlusAssign, TokenType::PlusEqual, 2),
            Some('-') => (AssignmentOperator::MinusAssign, TokenType::MinusEqual, 2),
            Some('*') => (AssignmentOperator::MulAssign, TokenType::MulEqual, 2),
            Some('/') => (AssignmentOperator::DivAssign, TokenType::DivEqual, 2),
            _ => (AssignmentOperator::Assign, TokenType::Equal, 1),
        };
        self.push_token(token_type, self.i, self.i + len);
        self.i += len;
        self.eat_space();

        if matches!(left, Node::PatternIdentifierLiteral(_) | Node::PatternNamespaceIdentifierLiteral(_)) {
            return self.parse_pattern_definition_rhs(left, start, operator);
        }

        let mut error = match &left {
            Node::IdentifierLiteral(ident) if keywords::is_keyword(&ident.name) => {
                Some(ParsingError::unspecified(KEYWORDS_SHOULD_NOT_BE_USED_IN_ASSIGNMENT_LHS))
            }
            Node::GlobalVariable(_)
            | Node::Variable(_)
            | Node::IdentifierLiteral(_)
            | Node::MemberExpression(_)
            | Node::IndexExpression(_)
            | Node::SliceExpression(_)
            | Node::IdentifierMemberExpression(_) => None,
            _ => Some(ParsingError::unspecified(fmt_invalid_assignment_invalid_lhs(&left))),
        };

        let right = if self.at_end() {
            error = error.or_else(|| {
                Some(ParsingError::unspecified(
                    UNTERMINATED_ASSIGNMENT_MISSING_VALUE_AFTER_EQL_SIGN,
                ))
            });
            self.missing_at_cursor()
        } else if self.peek_is('|') {
            self.push_token_at(TokenType::Pipe, self.i);
            self.i += 1;
            self.eat_space();
            match self.parse_statement() {
                Node::PipelineStatement(pipeline) => PipelineExpression {
                    base: pipeline.base,
                    stages: pipeline.stages,
                }
                .into(),
                other => {
                    error = error.or_else(|| {
                        Some(ParsingError::unspecified(
                            INVALID_ASSIGN_A_PIPELINE_EXPR_WAS_EXPECTED_AFTER_PIPE,
                        ))
                    });
                    other
                }
            }
        } else {
            self.parse_expression()
        };

        Assignment {
            base: NodeBase::with_opt_error(NodeSpan::new(start, right.span().end.max(left.span().end)), error),
            left: Box::new(left),
            right: Box::new(right),
            operator,
        }
        .into()
    }

    /// `%name = pattern` and `%name. = namespace`, the operator has already been consumed.
    fn parse_pattern_definition_rhs(&mut self, left: Node, start: usize, operator: AssignmentOperator) -> Node {
        let is_namespace = matches!(left, Node::PatternNamespaceIdentifierLiteral(_));
        let (missing_rhs, kind, invalid_operator) = if is_namespace {
            (
                UNTERMINATED_PATT_NS_DEF_MISSING_RHS,
                ParsingErrorKind::UnterminatedPatternNamespaceDefinition,
                INVALID_PATT_NS_DEF_MISSING_OPERATOR_SHOULD_BE_EQUAL,
            )
        } else {
            (
                UNTERMINATED_PATT_DEF_MISSING_RHS,
                ParsingErrorKind::UnterminatedPatternDefinition,
                INVALID_PATT_DEF_MISSING_OPERATOR_SHOULD_BE_EQUAL,
            )
        };

        let mut error = None;
        let mut is_lazy = false;
        let right = if self.at_end() {
            error = Some(ParsingError::new(kind, missing_rhs));
            self.missing_at_cursor()
        } else {
            if operator != AssignmentOperator::Assign {
                error = Some(ParsingError::unspecified(invalid_operator));
            }
            if self.peek_is('@') && self.char_at(self.i + 1).is_some_and(is_space_not_lf) {
                is_lazy = true;
                self.push_token_at(TokenType::AtSign, self.i);
                self.i += 1;
                self.eat_space();
            }
            if is_namespace {
                self.parse_expression()
            } else {
                self.parse_in_pattern_mode()
            }
        };

        let base = NodeBase::with_opt_error(NodeSpan::new(start, right.span().end.max(left.span().end)), error);
        if is_namespace {
            PatternNamespaceDefinition {
                base,
                left: Box::new(left),
                right: Box::new(right),
                is_lazy,
            }
            .into()
        } else {
            PatternDefinition {
                base,
                left: Box::new(left),
                right: Box::new(right),
                is_lazy,
            }
            .into()
        }
    }

    /// Assignments must be followed by a terminator: `;`, a newline, `}`, a comment or the end.
    fn check_assignment_terminator(&mut self, stmt: &mut Node) {
        self.eat_space();
        let terminated = match self.peek() {
            None | Some(';' | '\r' | '\n' | '}') => true,
            Some('#') => self.char_at(self.i + 1).is_some_and(is_comment_first_space),
            Some(_) => false,
        };
        if !terminated && stmt.error().is_none() {
            stmt.base_mut().error = Some(ParsingError::new(
                ParsingErrorKind::InvalidNext,
                UNTERMINATED_ASSIGNMENT_MISSING_TERMINATOR,
            ));
        }
    }
}

/// Additional checks on the source of import statements.
fn check_import_source(source: &Node) -> Option<&'static str> {
    let (path, is_url) = match source {
        Node::RelativePathLiteral(n) => (n.value.as_str(), false),
        Node::AbsolutePathLiteral(n) => (n.value.as_str(), false),
        Node::URLLiteral(n) => {
            let after_scheme = n.value.split_once("://").map_or(n.value.as_str(), |(_, rest)| rest);
            let path = after_scheme.find('/').map_or("", |index| &after_scheme[index..]);
            (path, true)
        }
        _ => return None,
    };

    let relative = path.strip_prefix("./").unwrap_or(path);
    if path.contains("//") {
        return Some(if is_url {
            PATH_OF_URL_LITERALS_USED_AS_IMPORT_SRCS_SHOULD_NOT_CONTAIN_SLASHSLASH
        } else {
            PATH_LITERALS_USED_AS_IMPORT_SRCS_SHOULD_NOT_CONTAIN_SLASHSLASH
        });
    }
    if path.split('/').any(|segment| segment == "..") {
        return Some(if is_url {
            PATH_OF_URL_LITERALS_USED_AS_IMPORT_SRCS_SHOULD_NOT_CONTAIN_DOT_SLASHSLASH
        } else {
            PATH_LITERALS_USED_AS_IMPORT_SRCS_SHOULD_NOT_CONTAIN_DOT_SLASHSLASH
        });
    }
    if relative.split('/').any(|segment| segment == ".") {
        return Some(if is_url {
            PATH_OF_URL_LITERALS_USED_AS_IMPORT_SRCS_SHOULD_NOT_CONTAIN_DOT_SEGMENTS
        } else {
            PATH_LITERALS_USED_AS_IMPORT_SRCS_SHOULD_NOT_CONTAIN_DOT_SEGMENTS
        });
    }
    if !path.ends_with(".ix") {
        return Some(URL_LITS_AND_PATH_LITS_USED_AS_IMPORT_SRCS_SHOULD_END_WITH_IX);
    }
    None
}

/// Whether the value of `node` can be determined without evaluating anything (match cases).
fn has_statically_known_value(node: &Node) -> bool {
    let mut known = true;
    walk(node, |visit| match visit.node {
        Node::NamedSegmentPathPatternLiteral(_) => TraversalAction::Prune,
        Node::GlobalVariable(_)
        | Node::Variable(_)
        | Node::CallExpression(_)
        | Node::IndexExpression(_)
        | Node::MemberExpression(_)
        | Node::SliceExpression(_)
        | Node::AbsolutePathExpression(_)
        | Node::RelativePathExpression(_)
        | Node::IfStatement(_)
        | Node::ForStatement(_)
        | Node::SwitchStatement(_)
        | Node::MatchStatement(_)
        | Node::Assignment(_)
        | Node::MultiAssignment(_)
        | Node::ImportStatement(_)
        | Node::BreakStatement(_)
        | Node::ContinueStatement(_)
        | Node::ReturnStatement(_)
        | Node::FunctionExpression(_) => {
            known = false;
            TraversalAction::Stop
        }
        _ => TraversalAction::Continue,
    });
    known
}
