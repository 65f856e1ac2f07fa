/// Embedded modules and the keyword expressions built around them (`go`, `testsuite`,
/// `testcase`, `lifetimejob`), plus the other keyword-introduced expressions: `Mapping`,
/// `comp`, `udata`, `concat`, `on received`, `sendval` and `new`.
///
/// ## Notes
/// - This file is `include!`'d into `crate::parser`.
/// - Every production receives the span of its keyword, the cursor being right after it.
impl<'a> Parser<'a> {
    /// `{ [manifest] statements }`; the cursor is on the opening brace.
    fn parse_embedded_module(&mut self) -> Node {
        let start = self.i;
        self.push_token_at(TokenType::OpeningCurlyBracket, start);
        self.i += 1;

        self.eat_space_newline_comma_comment();
        let manifest = self.parse_manifest_if_present();
        self.eat_space_newline_semicolon_comment();

        let (statements, region_headers) = self.parse_statement_list(|c| c == '}', fmt_unexpected_char_in_block_or_module);

        let mut error = None;
        if self.peek_is('}') {
            self.push_token_at(TokenType::ClosingCurlyBracket, self.i);
            self.i += 1;
        } else {
            error = Some(ParsingError::unspecified(UNTERMINATED_EMBEDDED_MODULE));
        }

        EmbeddedModule {
            base: NodeBase::with_opt_error(self.span_from(start), error),
            manifest: manifest.map(Box::new),
            region_headers,
            statements,
            single_call_expr: false,
        }
        .into()
    }

    // ========================================================================
    // Concurrency
    // ========================================================================

    /// `go [meta] do {...}` or `go [meta] do f(...)`.
    fn parse_spawn_expression(&mut self, keyword: NodeSpan) -> Node {
        let start = keyword.start;
        self.push_keyword(TokenType::GoKeyword, start);
        self.eat_space();

        let incomplete = |parser: &Self, meta: Option<Node>, message: &str| -> Node {
            SpawnExpression {
                base: NodeBase::with_error(parser.span_from(start), ParsingError::unspecified(message)),
                meta: meta.map(Box::new),
                module: Box::new(missing_at(parser.i)),
            }
            .into()
        };

        if self.at_end() {
            return incomplete(&*self, None, UNTERMINATED_SPAWN_EXPRESSION_MISSING_EMBEDDED_MODULE_AFTER_GO_KEYWORD);
        }

        let mut meta = None;
        let first = self.parse_expression();
        self.eat_space();

        if let Some(do_span) = do_keyword_span(&first) {
            self.push_keyword(TokenType::DoKeyword, do_span.start);
        } else {
            meta = Some(first);
            let next = self.parse_expression();
            self.eat_space();
            match do_keyword_span(&next) {
                Some(do_span) => self.push_keyword(TokenType::DoKeyword, do_span.start),
                None => return incomplete(&*self, meta, UNTERMINATED_SPAWN_EXPRESSION_MISSING_DO_KEYWORD_AFTER_META),
            }
        }

        if self.at_end() {
            return incomplete(&*self, meta, UNTERMINATED_SPAWN_EXPRESSION_MISSING_EMBEDDED_MODULE_AFTER_DO_KEYWORD);
        }

        let module = if self.peek_is('{') {
            self.parse_embedded_module()
        } else {
            let call = self.parse_expression();
            let is_simple_call =
                matches!(&call, Node::CallExpression(c) if matches!(*c.callee, Node::IdentifierLiteral(_)));
            let error = (!is_simple_call).then(|| ParsingError::unspecified(SPAWN_EXPR_ONLY_SIMPLE_CALLS_ARE_SUPPORTED));
            EmbeddedModule {
                base: NodeBase::with_opt_error(call.span(), error),
                manifest: None,
                region_headers: Vec::new(),
                statements: vec![call],
                single_call_expr: true,
            }
            .into()
        };

        SpawnExpression {
            base: NodeBase::new(self.span_from(start)),
            meta: meta.map(Box::new),
            module: Box::new(module),
        }
        .into()
    }

    /// `lifetimejob <meta> [for <subject>] {...}`
    fn parse_lifetimejob_expression(&mut self, keyword: NodeSpan) -> Node {
        let start = keyword.start;
        self.push_keyword(TokenType::LifetimejobKeyword, start);
        self.eat_space();

        if self.at_end() {
            return LifetimejobExpression {
                base: NodeBase::with_error(
                    self.span_from(start),
                    ParsingError::unspecified(UNTERMINATED_LIFETIMEJOB_EXPRESSION_MISSING_META),
                ),
                meta: Box::new(self.missing_at_cursor()),
                subject: None,
                module: Box::new(self.missing_at_cursor()),
            }
            .into();
        }

        let meta = self.parse_expression();
        self.eat_space();

        let mut subject = None;
        if self.at_word(keywords::as_str(KeywordId::For)) {
            self.push_keyword(TokenType::ForKeyword, self.i);
            self.i += keywords::as_str(KeywordId::For).len();
            self.eat_space();
            subject = Some(Box::new(self.parse_expression()));
            self.eat_space();
        }

        if !self.peek_is('{') {
            return LifetimejobExpression {
                base: NodeBase::with_error(
                    self.span_from(start),
                    ParsingError::unspecified(UNTERMINATED_LIFETIMEJOB_EXPRESSION_MISSING_EMBEDDED_MODULE),
                ),
                meta: Box::new(meta),
                subject,
                module: Box::new(self.missing_at_cursor()),
            }
            .into();
        }

        let module = self.parse_embedded_module();
        LifetimejobExpression {
            base: NodeBase::new(self.span_from(start)),
            meta: Box::new(meta),
            subject,
            module: Box::new(module),
        }
        .into()
    }

    /// `on received <pattern> <handler>`
    fn parse_reception_handler_expression(&mut self, keyword: NodeSpan) -> Node {
        let start = keyword.start;
        self.push_keyword(TokenType::OnKeyword, start);
        self.eat_space();

        let incomplete = |parser: &Self, pattern: Option<Node>, message: &str| -> Node {
            ReceptionHandlerExpression {
                base: NodeBase::with_error(parser.span_from(start), ParsingError::unspecified(message)),
                pattern: Box::new(pattern.unwrap_or_else(|| missing_at(parser.i))),
                handler: Box::new(missing_at(parser.i)),
            }
            .into()
        };

        if self.is_expression_end() {
            return incomplete(&*self, None, UNTERMINATED_RECEP_HANDLER_MISSING_RECEIVED_KEYWORD);
        }

        let mut error = None;
        let received = keywords::as_str(KeywordId::Received);
        if self.at_word(received) {
            self.push_keyword(TokenType::ReceivedKeyword, self.i);
            self.i += received.len();
            self.eat_space();
        } else {
            error = Some(ParsingError::unspecified(INVALID_RECEP_HANDLER_MISSING_RECEIVED_KEYWORD));
        }

        if self.is_expression_end() {
            return incomplete(&*self, None, UNTERMINATED_RECEP_HANDLER_MISSING_PATTERN);
        }
        let pattern = self.parse_expression();
        self.eat_space();

        if self.is_expression_end() {
            return incomplete(&*self, Some(pattern), UNTERMINATED_RECEP_HANDLER_MISSING_HANDLER_OR_PATTERN);
        }
        let handler = self.parse_expression();

        ReceptionHandlerExpression {
            base: NodeBase::with_opt_error(self.span_from(start), error),
            pattern: Box::new(pattern),
            handler: Box::new(handler),
        }
        .into()
    }

    /// `sendval <value> to <receiver>`
    fn parse_send_value_expression(&mut self, keyword: NodeSpan) -> Node {
        let start = keyword.start;
        self.push_keyword(TokenType::SendvalKeyword, start);
        self.eat_space();

        if self.is_expression_end() {
            return SendValueExpression {
                base: NodeBase::with_error(
                    self.span_from(start),
                    ParsingError::unspecified(UNTERMINATED_SENDVALUE_EXPRESSION_MISSING_VALUE),
                ),
                value: Box::new(self.missing_at_cursor()),
                receiver: Box::new(self.missing_at_cursor()),
            }
            .into();
        }

        let value = self.parse_expression();
        self.eat_space();

        let mut error = None;
        let to = keywords::as_str(KeywordId::To);
        let receiver = if self.at_word(to) {
            self.push_keyword(TokenType::ToKeyword, self.i);
            self.i += to.len();
            self.eat_space();
            if self.is_expression_end() {
                error = Some(ParsingError::unspecified(UNTERMINATED_SENDVALUE_EXPRESSION_MISSING_TO_KEYWORD));
                self.missing_at_cursor()
            } else {
                self.parse_expression()
            }
        } else {
            error = Some(ParsingError::unspecified(
                INVALID_SENDVALUE_EXPRESSION_MISSING_TO_KEYWORD_BEFORE_RECEIVER,
            ));
            self.parse_expression()
        };

        SendValueExpression {
            base: NodeBase::with_opt_error(NodeSpan::new(start, receiver.span().end.max(value.span().end)), error),
            value: Box::new(value),
            receiver: Box::new(receiver),
        }
        .into()
    }

    // ========================================================================
    // Tests
    // ========================================================================

    /// `testsuite [meta] {...}`
    fn parse_test_suite_expression(&mut self, keyword: NodeSpan) -> Node {
        self.push_keyword(TokenType::TestsuiteKeyword, keyword.start);
        let (meta, module, error) = self.parse_test_meta_and_module(UNTERMINATED_TESTSUITE_EXPRESSION_MISSING_BLOCK);
        TestSuiteExpression {
            base: NodeBase::with_opt_error(self.span_from(keyword.start), error),
            meta: meta.map(Box::new),
            module: Box::new(module),
            is_statement: false,
        }
        .into()
    }

    /// `testcase [meta] {...}`
    fn parse_test_case_expression(&mut self, keyword: NodeSpan) -> Node {
        self.push_keyword(TokenType::TestcaseKeyword, keyword.start);
        let (meta, module, error) = self.parse_test_meta_and_module(UNTERMINATED_TESTCASE_EXPRESSION_MISSING_BLOCK);
        TestCaseExpression {
            base: NodeBase::with_opt_error(self.span_from(keyword.start), error),
            meta: meta.map(Box::new),
            module: Box::new(module),
            is_statement: false,
        }
        .into()
    }

    fn parse_test_meta_and_module(&mut self, missing_block: &str) -> (Option<Node>, Node, Option<ParsingError>) {
        self.eat_space();

        let mut meta = None;
        if self.peek().is_some_and(|c| c != '{') {
            meta = Some(self.parse_expression());
            self.eat_space();
        }

        if !self.peek_is('{') {
            let error = ParsingError::unspecified(missing_block);
            return (meta, self.missing_at_cursor(), Some(error));
        }
        (meta, self.parse_embedded_module(), None)
    }

    // ========================================================================
    // Mappings & data
    // ========================================================================

    /// `Mapping { 0 => 1  n %int => n }`
    fn parse_mapping_expression(&mut self, keyword: NodeSpan) -> Node {
        let start = keyword.start;
        self.push_keyword(TokenType::MappingKeyword, start);
        self.eat_space();

        if !self.peek_is('{') {
            return MappingExpression {
                base: NodeBase::with_error(
                    self.span_from(start),
                    ParsingError::unspecified(UNTERMINATED_MAPPING_EXPRESSION_MISSING_BODY),
                ),
                entries: Vec::new(),
            }
            .into();
        }

        self.push_token_at(TokenType::OpeningCurlyBracket, self.i);
        self.i += 1;
        self.eat_space_newline_comment();

        let mut entries = Vec::new();
        while self.peek().is_some_and(|c| c != '}') && !self.is_interrupted() {
            let mut key = self.parse_expression();
            self.eat_space();
            if key.is_missing_expr() {
                let Some(c) = self.peek() else {
                    break;
                };
                key = self.unexpected_char_node(fmt_unexpected_char_in_mapping_expression(c));
            }

            if self.at_end() {
                entries.push(mapping_entry_without_value(key));
                return MappingExpression {
                    base: NodeBase::with_error(self.span_from(start), ParsingError::unspecified(UNTERMINATED_MAPPING_ENTRY)),
                    entries,
                }
                .into();
            }

            entries.push(self.parse_mapping_entry(key));
            self.eat_space_newline_comment();
        }

        let mut error = None;
        if self.peek_is('}') {
            self.push_token_at(TokenType::ClosingCurlyBracket, self.i);
            self.i += 1;
        } else {
            error = Some(ParsingError::unspecified(UNTERMINATED_MAPPING_EXPRESSION_MISSING_CLOSING_BRACE));
        }

        MappingExpression {
            base: NodeBase::with_opt_error(self.span_from(start), error),
            entries,
        }
        .into()
    }

    /// Rest of a mapping entry. An identifier key introduces a dynamic entry: `n %int [m] => ...`.
    fn parse_mapping_entry(&mut self, first: Node) -> Node {
        let entry_start = first.span().start;
        let is_dynamic = matches!(first, Node::IdentifierLiteral(_));

        let mut key = None;
        let mut group_matching_variable = None;
        if is_dynamic {
            let mut dynamic_key = self.parse_expression();
            if dynamic_key.is_missing_expr()
                && let Some(c) = self.peek()
            {
                dynamic_key = self.unexpected_char_node(fmt_unexpected_char_in_mapping_expression(c));
            }
            key = Some(dynamic_key);
            self.eat_space();

            if self.peek().is_some_and(|c| is_alpha(c) || c == '_') {
                let mut variable = self.parse_ident_starting_expression();
                if !matches!(variable, Node::IdentifierLiteral(_)) && variable.error().is_none() {
                    variable.base_mut().error = Some(ParsingError::unspecified(
                        INVALID_DYNAMIC_MAPPING_ENTRY_GROUP_MATCHING_VAR_EXPECTED,
                    ));
                }
                group_matching_variable = Some(Box::new(variable));
            }
        }

        let mut end = self.i;
        self.eat_space();

        let mut value = None;
        if self.at_str("=>") {
            self.push_token(TokenType::Arrow, self.i, self.i + 2);
            self.i += 2;
            self.eat_space();
            let parsed = self.parse_expression();
            end = parsed.span().end;
            value = Some(parsed);
        }

        let error = value
            .is_none()
            .then(|| ParsingError::unspecified(UNTERMINATED_MAPPING_ENTRY_MISSING_ARROW_VALUE));
        let base = NodeBase::with_opt_error(NodeSpan::new(entry_start, end), error);
        let value = Box::new(value.unwrap_or_else(|| missing_at(end)));

        match key {
            Some(key) => DynamicMappingEntry {
                base,
                key: Box::new(key),
                key_var: Box::new(first),
                group_matching_variable,
                value_computation: value,
            }
            .into(),
            None => StaticMappingEntry {
                base,
                key: Box::new(first),
                value,
            }
            .into(),
        }
    }

    /// `comp <expr>`
    fn parse_compute_expression(&mut self, keyword: NodeSpan) -> Node {
        self.push_keyword(TokenType::CompKeyword, keyword.start);
        self.eat_space();
        let arg = self.parse_expression();
        ComputeExpression {
            base: NodeBase::new(self.span_from(keyword.start)),
            arg: Box::new(arg),
        }
        .into()
    }

    /// `udata <root> { entry {children} ... }`
    fn parse_treedata_literal(&mut self, keyword: NodeSpan) -> Node {
        let start = keyword.start;
        self.push_keyword(TokenType::UdataKeyword, start);
        self.eat_space();

        let root = self.parse_expression();
        self.eat_space();

        if !self.peek_is('{') {
            return TreedataLiteral {
                base: NodeBase::with_error(
                    self.span_from(start),
                    ParsingError::unspecified(UNTERMINATED_TREEDATA_LIT_MISSING_OPENING_BRACE),
                ),
                root: Box::new(root),
                children: Vec::new(),
            }
            .into();
        }

        let (children, error) = self.parse_treedata_children(UNTERMINATED_TREEDATA_LIT_MISSING_CLOSING_BRACE);
        TreedataLiteral {
            base: NodeBase::with_opt_error(self.span_from(start), error),
            root: Box::new(root),
            children,
        }
        .into()
    }

    /// `{ entries }` of a treedata literal or entry; the cursor is on the opening brace.
    fn parse_treedata_children(&mut self, unterminated: &str) -> (Vec<Node>, Option<ParsingError>) {
        self.push_token_at(TokenType::OpeningCurlyBracket, self.i);
        self.i += 1;
        self.eat_space_newline_comma_comment();

        let mut children = Vec::new();
        while self.peek().is_some_and(|c| c != '}') && !self.is_interrupted() {
            let (entry, keep_going) = self.parse_treedata_entry();
            children.push(entry);
            if !keep_going {
                return (children, None);
            }
            self.eat_space_newline_comma_comment();
        }

        if self.peek_is('}') {
            self.push_token_at(TokenType::ClosingCurlyBracket, self.i);
            self.i += 1;
            (children, None)
        } else {
            (children, Some(ParsingError::unspecified(unterminated)))
        }
    }

    /// `value`, `value {children}` or `key: value`.
    ///
    /// ## Returns
    /// - The entry, and `false` if the input ended inside it.
    fn parse_treedata_entry(&mut self) -> (Node, bool) {
        if !self.enter_nested() {
            return (self.missing_at_cursor(), false);
        }
        let start = self.i;

        let mut value = self.parse_expression();
        self.eat_space();

        if value.is_missing_expr()
            && let Some(c) = self.peek()
        {
            let unexpected = self.unexpected_char_node(fmt_unexpected_char_in_treedata_literal(c));
            self.leave_nested();
            return (
                TreedataEntry {
                    base: NodeBase::new(self.span_from(start)),
                    value: Box::new(unexpected),
                    children: Vec::new(),
                }
                .into(),
                true,
            );
        }

        if self.peek_is(':') {
            self.push_token_at(TokenType::Colon, self.i);
            self.i += 1;
            self.eat_space();
            let pair_value = self.parse_expression();
            value = TreedataPair {
                base: NodeBase::new(NodeSpan::new(start, pair_value.span().end)),
                key: Box::new(value),
                value: Box::new(pair_value),
            }
            .into();
            self.eat_space();
        }

        let result = match self.peek() {
            None => (
                TreedataEntry {
                    base: NodeBase::with_error(self.span_from(start), ParsingError::unspecified(UNTERMINATED_TREEDATA_ENTRY)),
                    value: Box::new(value),
                    children: Vec::new(),
                }
                .into(),
                false,
            ),
            Some('{') => {
                let (children, error) = self.parse_treedata_children(UNTERMINATED_TREEDATA_ENTRY_MISSING_CLOSING_BRACE);
                let keep_going = error.is_none() || !self.at_end();
                (
                    TreedataEntry {
                        base: NodeBase::with_opt_error(self.span_from(start), error),
                        value: Box::new(value),
                        children,
                    }
                    .into(),
                    keep_going,
                )
            }
            Some(_) => (
                TreedataEntry {
                    base: NodeBase::new(NodeSpan::new(start, value.span().end)),
                    value: Box::new(value),
                    children: Vec::new(),
                }
                .into(),
                true,
            ),
        };
        self.leave_nested();
        result
    }

    /// `concat <elem> <elem> ...`; inside parentheses the elements can span several lines.
    fn parse_concatenation_expression(&mut self, keyword: NodeSpan, preceded_by_opening_paren: bool) -> Node {
        let start = keyword.start;
        self.push_keyword(TokenType::ConcatKeyword, start);
        self.eat_space();

        let mut elements = Vec::new();
        while !self.is_expression_end() && !self.is_interrupted() {
            let element = self.parse_expression();
            let is_missing = element.is_missing_expr();
            elements.push(element);
            if is_missing {
                break;
            }
            if preceded_by_opening_paren {
                self.eat_space_newline_comment();
            } else {
                self.eat_space();
            }
        }

        let error = elements
            .is_empty()
            .then(|| ParsingError::unspecified(UNTERMINATED_CONCAT_EXPR_ELEMS_EXPECTED));
        ConcatenationExpression {
            base: NodeBase::with_opt_error(self.span_from(start), error),
            elements,
        }
        .into()
    }

    // ========================================================================
    // Structs
    // ========================================================================

    /// `new <type> [{field: value, ...}]`
    fn parse_new_expression(&mut self, keyword: NodeSpan) -> Node {
        let start = keyword.start;
        self.push_keyword(TokenType::NewKeyword, start);
        self.eat_space();

        if !self.peek().is_some_and(|c| is_alpha(c) || c == '_') {
            return NewExpression {
                base: NodeBase::with_error(
                    self.span_from(start),
                    ParsingError::new(
                        ParsingErrorKind::UnterminatedStructDefinition,
                        UNTERMINATED_NEW_EXPR_MISSING_TYPE_AFTER_KEYWORD,
                    ),
                ),
                type_annotation: None,
                initialization: None,
            }
            .into();
        }

        let type_annotation = self.parse_in_pattern_mode();
        let type_end = type_annotation.span().end;
        self.eat_space();

        let initialization = match self.peek() {
            None => None,
            Some(c) if is_unpaired_or_closing_delim(c) => None,
            Some('{') => Some(self.parse_struct_initialization_literal()),
            Some(_) => Some(self.parse_expression()),
        };
        let end = initialization.as_ref().map_or(type_end, |init| init.span().end);

        NewExpression {
            base: NodeBase::new(NodeSpan::new(start, end)),
            type_annotation: Some(Box::new(type_annotation)),
            initialization: initialization.map(Box::new),
        }
        .into()
    }

    /// `{name: value, ...}` after `new <type>`.
    fn parse_struct_initialization_literal(&mut self) -> Node {
        let start = self.i;
        self.push_token_at(TokenType::OpeningCurlyBracket, start);
        self.i += 1;
        self.eat_space_newline_comma_comment();

        let mut fields = Vec::new();
        while self.peek().is_some_and(|c| c != '}') && !self.is_interrupted() {
            let expr = self.parse_expression();
            if expr.is_missing_expr() {
                let Some(c) = self.peek() else {
                    break;
                };
                fields.push(self.unexpected_char_node(fmt_unexpected_char_in_struct_init_literal(c)));
                self.eat_space_newline_comma_comment();
                continue;
            }

            match expr {
                Node::IdentifierLiteral(_) => {
                    let name_span = expr.span();
                    self.eat_space();

                    let mut field = StructFieldInitialization {
                        base: NodeBase::new(name_span),
                        name: Box::new(expr),
                        value: None,
                    };
                    if self.peek_is(':') {
                        self.push_token_at(TokenType::Colon, self.i);
                        self.i += 1;
                        self.eat_space();
                        let value = self.parse_expression();
                        field.base.span.end = value.span().end;
                        field.value = Some(Box::new(value));
                    } else if self.peek().is_some_and(|c| c != '}') {
                        field.base.error = Some(ParsingError::unspecified(MISSING_COLON_AFTER_FIELD_NAME));
                    }
                    fields.push(field.into());
                }
                mut other => {
                    if other.error().is_none() {
                        other.base_mut().error = Some(ParsingError::unspecified(ONLY_FIELD_INIT_PAIRS_ALLOWED));
                    }
                    fields.push(other);
                }
            }
            self.eat_space_newline_comma_comment();
        }

        let mut error = None;
        if self.peek_is('}') {
            self.push_token_at(TokenType::ClosingCurlyBracket, self.i);
            self.i += 1;
        } else {
            error = Some(ParsingError::new(
                ParsingErrorKind::UnterminatedStructDefinition,
                UNTERMINATED_STRUCT_INIT_LIT_MISSING_CLOSING_BRACE,
            ));
        }

        StructInitializationLiteral {
            base: NodeBase::with_opt_error(self.span_from(start), error),
            fields,
        }
        .into()
    }
}

/// Span of `node` if it is the `do` keyword.
fn do_keyword_span(node: &Node) -> Option<NodeSpan> {
    node.is_ident_with_name(keywords::as_str(KeywordId::Do))
        .then(|| node.span())
}

/// Entry of a mapping whose input ended right after the key.
fn mapping_entry_without_value(key: Node) -> Node {
    let span = key.span();
    match key {
        Node::IdentifierLiteral(_) => DynamicMappingEntry {
            base: NodeBase::new(span),
            key: Box::new(missing_at(span.end)),
            key_var: Box::new(key),
            group_matching_variable: None,
            value_computation: Box::new(missing_at(span.end)),
        }
        .into(),
        key => StaticMappingEntry {
            base: NodeBase::new(span),
            key: Box::new(key),
            value: Box::new(missing_at(span.end)),
        }
        .into(),
    }
}
