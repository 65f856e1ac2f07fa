/// Expression dispatch and the postfix chain (members, indexes, slices, calls, `::`, `?`).
///
/// [`Parser::parse_expression`] looks at the first code unit to pick a production. Only a few
/// productions (variables, identifiers, parenthesized expressions) can be followed by postfix
/// operators; every other one is returned as is.
///
/// ## Notes
/// - This file is `include!`'d into `crate::parser`.
/// - Keywords come back as plain [`IdentifierLiteral`]s unless they start an expression
///   (`fn`, `go`, `Mapping`...). Statement productions rely on this.
impl<'a> Parser<'a> {
    /// Parse any expression at the cursor.
    ///
    /// ## Returns
    /// - A [`MissingExpression`] carrying an "expression expected" error if nothing could be
    ///   parsed; the cursor is not moved in that case.
    pub(crate) fn parse_expression(&mut self) -> Node {
        self.parse_expression_with(false)
    }

    /// Same as [`Parser::parse_expression`] for the first operand of a parenthesized expression.
    fn parse_expression_with(&mut self, preceded_by_opening_paren: bool) -> Node {
        if !self.enter_nested() {
            return self.missing_at_cursor();
        }
        let expr = self.parse_expression_inner(preceded_by_opening_paren);
        self.leave_nested();
        expr
    }

    fn parse_expression_inner(&mut self, preceded_by_opening_paren: bool) -> Node {
        let start = self.i;
        let Some(c) = self.peek() else {
            return MissingExpression {
                base: NodeBase::with_error(
                    NodeSpan::new(start.saturating_sub(1), start),
                    ParsingError::unspecified(fmt_expr_expected_here(self.s, start, false)),
                ),
            }
            .into();
        };

        let lhs = match c {
            '$' => self.parse_variable(),
            '!' => {
                self.push_token_at(TokenType::ExclamationMark, start);
                self.i += 1;
                let operand = self.parse_expression();
                return UnaryExpression {
                    base: NodeBase::new(NodeSpan::new(start, operand.span().end)),
                    operator: UnaryOperator::BoolNegate,
                    operand: Box::new(operand),
                }
                .into();
            }
            '~' => {
                self.push_token_at(TokenType::Tilde, start);
                self.i += 1;
                let expr = self.parse_expression();
                return RuntimeTypeCheckExpression {
                    base: NodeBase::new(NodeSpan::new(start, expr.span().end)),
                    expr: Box::new(expr),
                }
                .into();
            }
            ':' => {
                return match self.char_at(start + 1) {
                    Some('/') if self.next_is(2, '/') => self.parse_url_like(start),
                    Some(d) if is_dec_digit(d) => self.parse_port_literal(),
                    Some('{') if self.in_pattern => self.parse_dictionary_pattern_literal(false),
                    Some('{') => self.parse_dictionary_literal(),
                    _ => self.expression_expected(),
                };
            }
            c if is_first_ident_char(c) => match self.parse_ident_starting_expression_and_call(preceded_by_opening_paren) {
                std::ops::ControlFlow::Break(expr) => return expr,
                std::ops::ControlFlow::Continue(lhs) => lhs,
            },
            '0' if self.char_at(start + 1).is_some_and(is_byte_slice_base) && self.next_is(2, '[') => {
                return self.parse_byte_slices();
            }
            '0'..='9' => return self.parse_number_and_range_and_rate_literals(),
            '{' if self.in_pattern => return self.parse_object_record_pattern_literal(false, false),
            '{' => return self.parse_object_or_record_literal(false),
            '[' if self.in_pattern => return self.parse_list_tuple_pattern_literal(false, false),
            '[' => return self.parse_list_or_tuple_literal(false),
            '|' if self.in_pattern => return self.parse_pattern_union(start, false),
            '\'' => return self.parse_rune_or_rune_range(),
            '"' => return self.parse_quoted_string_literal(),
            '`' => return self.parse_string_template_or_multiline_string(None),
            '+' if self.char_at(start + 1).is_some_and(is_dec_digit) => return self.expression_expected(),
            '+' => return self.parse_unquoted_string_literal(start),
            '/' => return self.parse_path_like_expression(false),
            '.' => return self.parse_dot_starting_expression(),
            '-' => return self.parse_dash_starting_expression(),
            '#' => return self.parse_hash_starting_expression(),
            '@' => return self.parse_at_sign_expression(),
            '<' if self.next_is(1, '{') => return self.parse_unquoted_region(),
            '*' => {
                self.push_token_at(TokenType::Asterisk, start);
                self.i += 1;
                let operand = self.parse_expression();
                let span = NodeSpan::new(start, operand.span().end);
                return if self.in_pattern {
                    PointerType {
                        base: NodeBase::new(span),
                        value_type: Box::new(operand),
                    }
                    .into()
                } else {
                    DereferenceExpression {
                        base: NodeBase::new(span),
                        pointer: Box::new(operand),
                    }
                    .into()
                };
            }
            '%' => {
                let pattern = self.parse_percent_prefixed_pattern(preceded_by_opening_paren);
                if matches!(pattern, Node::PatternIdentifierLiteral(_) | Node::PatternNamespaceMemberExpression(_))
                    && self.peek_is('`')
                {
                    return self.parse_string_template_or_multiline_string(Some(pattern));
                }
                return pattern;
            }
            '(' => self.parse_unary_binary_and_parenthesized_expression(start),
            _ => return self.expression_expected(),
        };

        self.parse_postfix_chain(lhs, start)
    }

    /// [`MissingExpression`] covering the code unit at the cursor (which is not consumed).
    fn expression_expected(&self) -> Node {
        let end = (self.i + 1).min(self.len());
        MissingExpression {
            base: NodeBase::with_error(
                NodeSpan::new(self.i.min(end), end),
                ParsingError::unspecified(fmt_expr_expected_here(self.s, self.i, true)),
            ),
        }
        .into()
    }

    /// `$name` or `$$name`.
    fn parse_variable(&mut self) -> Node {
        let start = self.i;
        self.i += 1;
        let is_global = self.peek_is('$');
        if is_global {
            self.i += 1;
        }
        let name_start = self.i;
        self.eat_ident_chars();
        let name = self.text(name_start, self.i);
        let base = NodeBase::new(self.span_from(start));

        if is_global {
            GlobalVariable { base, name }.into()
        } else {
            Variable { base, name }.into()
        }
    }

    /// `#{...}` (record), `#[...]` (tuple) or `#name`.
    fn parse_hash_starting_expression(&mut self) -> Node {
        let start = self.i;
        match self.char_at(start + 1) {
            Some('{') if self.in_pattern => return self.parse_object_record_pattern_literal(false, true),
            Some('{') => return self.parse_object_or_record_literal(true),
            Some('[') if self.in_pattern => return self.parse_list_tuple_pattern_literal(false, true),
            Some('[') => return self.parse_list_or_tuple_literal(true),
            _ => {}
        }

        self.i += 1;
        self.eat_ident_chars();
        let error = (self.i == start + 1).then(|| ParsingError::unspecified(UNTERMINATED_IDENTIFIER_LIT));

        UnambiguousIdentifierLiteral {
            base: NodeBase::with_opt_error(self.span_from(start), error),
            name: self.text(start + 1, self.i),
        }
        .into()
    }

    // ========================================================================
    // Identifier-starting expressions
    // ========================================================================

    /// Identifier-starting expression, followed by the keyword productions, markup and
    /// call shorthands that can follow a name.
    ///
    /// ## Returns
    /// - `Continue(lhs)` when the result can still be followed by postfix operators.
    fn parse_ident_starting_expression_and_call(
        &mut self,
        preceded_by_opening_paren: bool,
    ) -> std::ops::ControlFlow<Node, Node> {
        use std::ops::ControlFlow::{Break, Continue};

        let expr = self.parse_ident_starting_expression();
        let mut name = String::new();

        match &expr {
            Node::IdentifierLiteral(ident) => {
                let span = ident.base.span;
                if let Some(keyword) = keywords::from_str(&ident.name) {
                    let result = match keyword {
                        KeywordId::Go => self.parse_spawn_expression(span),
                        KeywordId::Fn if self.in_pattern => self.parse_function_pattern(span.start, false),
                        KeywordId::Fn => self.parse_function(span),
                        KeywordId::Mapping => self.parse_mapping_expression(span),
                        KeywordId::Comp => self.parse_compute_expression(span),
                        KeywordId::Udata => self.parse_treedata_literal(span),
                        KeywordId::Concat => self.parse_concatenation_expression(span, preceded_by_opening_paren),
                        KeywordId::Testsuite => self.parse_test_suite_expression(span),
                        KeywordId::Testcase => self.parse_test_case_expression(span),
                        KeywordId::Lifetimejob => self.parse_lifetimejob_expression(span),
                        KeywordId::On => self.parse_reception_handler_expression(span),
                        KeywordId::Sendval => self.parse_send_value_expression(span),
                        KeywordId::Readonly if self.in_pattern => self.parse_readonly_pattern_expression(span),
                        KeywordId::New => self.parse_new_expression(span),
                        _ => expr,
                    };
                    return Break(result);
                }

                if ident.name == "s" && self.peek_is('!') {
                    self.i += 1;
                    return Break(self.parse_css_selector_expression(span.start));
                }

                if self.in_pattern {
                    let pattern: Node = PatternIdentifierLiteral {
                        base: ident.base.clone(),
                        unprefixed: true,
                        name: ident.name.clone(),
                    }
                    .into();
                    return Break(self.parse_pattern_suffix(pattern));
                }
                name = ident.name.clone();
            }
            Node::IdentifierMemberExpression(member) if self.in_pattern && member.property_names.len() == 1 => {
                let left = member.left.span();
                let namespace: Node = PatternNamespaceIdentifierLiteral {
                    base: NodeBase::new(NodeSpan::new(left.start, left.end + 1)),
                    unprefixed: true,
                    name: member.left.identifier_name().unwrap_or_default().to_string(),
                }
                .into();
                let pattern: Node = PatternNamespaceMemberExpression {
                    base: member.base.clone(),
                    namespace: Box::new(namespace),
                    member_name: Box::new(member.property_names[0].clone()),
                }
                .into();
                return Break(self.parse_pattern_suffix(pattern));
            }
            Node::IdentifierMemberExpression(member) => {
                name = member.left.identifier_name().unwrap_or_default().to_string();
            }
            Node::SelfExpression(_) | Node::MemberExpression(_) => {}
            _ => return Break(expr),
        }

        let at_double_colon = self.at_str("::");
        match self.peek() {
            None => return Break(expr),
            Some(c) if is_unpaired_or_closing_delim(c) && !at_double_colon => return Break(expr),
            Some('<') if matches!(expr, Node::IdentifierLiteral(_)) => {
                let start = expr.span().start;
                return Break(self.parse_markup_expression(Some(expr), start));
            }
            _ => {}
        }

        Continue(self.try_parse_call(expr, &name))
    }

    /// Pattern call (`p(...)`, `p{...}`) or optional pattern (`p?`) following a pattern name.
    fn parse_pattern_suffix(&mut self, pattern: Node) -> Node {
        match self.peek() {
            Some('(') if matches!(&pattern, Node::PatternIdentifierLiteral(p) if p.unprefixed && p.name == "str") => {
                self.parse_complex_string_pattern_piece(pattern.span(), true)
            }
            Some('(' | '{') => self.parse_pattern_call(pattern),
            Some('?') => {
                self.i += 1;
                OptionalPatternExpression {
                    base: NodeBase::new(NodeSpan::new(pattern.span().start, self.i)),
                    pattern: Box::new(pattern),
                }
                .into()
            }
            _ => pattern,
        }
    }

    /// Identifiers, `self`, `supersys`, `a.b.c` chains, booleans, `nil`, URL-like literals
    /// (`https://...`), unquoted strings and email addresses.
    fn parse_ident_starting_expression(&mut self) -> Node {
        let start = self.i;
        self.i += 1;
        self.eat_ident_chars();

        let name = self.text(start, self.i);
        let span = self.span_from(start);

        if name == keywords::as_str(KeywordId::SelfRef) {
            return SelfExpression {
                base: NodeBase::new(span),
            }
            .into();
        }
        if name == keywords::as_str(KeywordId::Supersys) {
            return SupersysExpression {
                base: NodeBase::new(span),
            }
            .into();
        }

        if self.peek_is('.') {
            if self.in_pattern && !self.char_at(self.i + 1).is_some_and(|c| is_first_ident_char(c) || c == '<') {
                self.i += 1;
                return PatternNamespaceIdentifierLiteral {
                    base: NodeBase::new(self.span_from(start)),
                    unprefixed: true,
                    name,
                }
                .into();
            }
            let ident: Node = IdentifierLiteral {
                base: NodeBase::new(span),
                name,
            }
            .into();
            return self.parse_identifier_member_chain(ident);
        }

        let is_scheme = self.at_str("://");
        if !is_scheme
            && self
                .peek()
                .is_some_and(|c| c == '\\' || (is_unquoted_string_char(c) && c != ':'))
        {
            return self.parse_unquoted_string_literal(start);
        }

        if name == keywords::as_str(KeywordId::True) || name == keywords::as_str(KeywordId::False) {
            return BooleanLiteral {
                base: NodeBase::new(span),
                value: name == keywords::as_str(KeywordId::True),
            }
            .into();
        }
        if name == keywords::as_str(KeywordId::Nil) {
            return NilLiteral {
                base: NodeBase::new(span),
            }
            .into();
        }

        if is_scheme {
            if inox_core::lang::schemes::is_supported_scheme(&name) {
                return self.parse_url_like(start);
            }
            return InvalidURL {
                base: NodeBase::with_error(span, ParsingError::unspecified(fmt_invalid_uri_unsupported_protocol(&name))),
                value: name,
            }
            .into();
        }

        IdentifierLiteral {
            base: NodeBase::new(span),
            name,
        }
        .into()
    }

    /// `ident.a.b`, with `.<name>` dynamic members. The cursor is on the first dot.
    fn parse_identifier_member_chain(&mut self, ident: Node) -> Node {
        let start = ident.span().start;
        self.i += 1;

        let mut member: Node = IdentifierMemberExpression {
            base: NodeBase::new(NodeSpan::new(start, self.i)),
            left: Box::new(ident),
            property_names: Vec::new(),
        }
        .into();

        loop {
            let mut name_start = self.i;
            let dynamic = match self.peek() {
                Some(c) if !is_unpaired_or_closing_delim(c) && c == '<' => {
                    self.i += 1;
                    name_start = self.i;
                    true
                }
                Some(c) if !is_unpaired_or_closing_delim(c) && !is_first_ident_char(c) => {
                    return self.parse_unquoted_string_literal(start);
                }
                Some(c) if !is_unpaired_or_closing_delim(c) => false,
                _ => {
                    self.push_token_at(TokenType::Dot, self.i - 1);
                    let base = member.base_mut();
                    base.span.end = self.i;
                    base.error = Some(ParsingError::new(
                        ParsingErrorKind::UnterminatedMemberExpr,
                        UNTERMINATED_IDENT_MEMB_EXPR,
                    ));
                    return member;
                }
            };

            self.eat_ident_chars();
            let property: Node = IdentifierLiteral {
                base: NodeBase::new(NodeSpan::new(name_start, self.i)),
                name: self.text(name_start, self.i),
            }
            .into();

            if dynamic {
                let left = match std::mem::take(&mut member) {
                    Node::IdentifierMemberExpression(m) if m.property_names.is_empty() => *m.left,
                    other => other,
                };
                member = DynamicMemberExpression {
                    base: NodeBase::new(NodeSpan::new(start, self.i)),
                    left: Box::new(left),
                    property_name: Box::new(property),
                    optional: false,
                }
                .into();
            } else if let Node::IdentifierMemberExpression(m) = &mut member {
                m.property_names.push(property);
                m.base.span.end = self.i;
            } else {
                member = MemberExpression {
                    base: NodeBase::new(NodeSpan::new(start, self.i)),
                    left: Box::new(std::mem::take(&mut member)),
                    property_name: Box::new(property),
                    optional: false,
                }
                .into();
            }

            if !self.peek_is('.') {
                break;
            }
            self.i += 1;
        }

        if self
            .peek()
            .is_some_and(|c| c == '\\' || (is_unquoted_string_char(c) && c != ':' && c != '<'))
        {
            return self.parse_unquoted_string_literal(start);
        }
        member
    }

    /// Call shorthands following a name: `f"string"`, `f{...}`, `f(...)` and `f!(...)`.
    ///
    /// ## Returns
    /// - The callee unchanged if no call follows.
    fn try_parse_call(&mut self, callee: Node, name: &str) -> Node {
        match self.peek() {
            Some('"' | '{') => {
                let argument = self.parse_expression();
                CallExpression {
                    base: NodeBase::new(NodeSpan::new(callee.span().start, argument.span().end)),
                    callee: Box::new(callee),
                    arguments: vec![argument],
                    must: true,
                    command_like_syntax: false,
                }
                .into()
            }
            Some('(') if !keywords::is_keyword(name) => {
                let start = callee.span().start;
                self.parse_parenthesized_call(callee, start)
            }
            Some('!') if self.next_is(1, '(') && !keywords::is_keyword(name) => {
                let start = callee.span().start;
                self.parse_parenthesized_call(callee, start)
            }
            _ => callee,
        }
    }

    // ========================================================================
    // Postfix chain
    // ========================================================================

    /// Postfix operators applied to `lhs`, every resulting node starts at `start`.
    fn parse_postfix_chain(&mut self, mut lhs: Node, start: usize) -> Node {
        while let Some(c) = self.peek() {
            let at_double_colon = self.at_str("::");
            if is_unpaired_or_closing_delim(c) && !at_double_colon {
                break;
            }

            lhs = match c {
                '[' => match self.parse_index_or_slice(lhs, start) {
                    std::ops::ControlFlow::Continue(expr) => expr,
                    std::ops::ControlFlow::Break(expr) => return expr,
                },
                '.' => match self.parse_member_like(lhs, start) {
                    std::ops::ControlFlow::Continue(expr) => expr,
                    std::ops::ControlFlow::Break(expr) => return expr,
                },
                ':' => match self.parse_double_colon_expression(lhs, start) {
                    std::ops::ControlFlow::Continue(expr) => expr,
                    std::ops::ControlFlow::Break(expr) => return expr,
                },
                '(' => self.parse_parenthesized_call(lhs, start),
                '!' if self.next_is(1, '(') => self.parse_parenthesized_call(lhs, start),
                '?' => {
                    self.i += 1;
                    BooleanConversionExpression {
                        base: NodeBase::new(NodeSpan::new(start, self.i)),
                        expr: Box::new(lhs),
                    }
                    .into()
                }
                _ => break,
            };
        }
        lhs
    }

    /// `lhs[index]`, `lhs[start:end]`, `lhs[:end]`, `lhs[start:]`. The cursor is on `[`.
    fn parse_index_or_slice(&mut self, lhs: Node, start: usize) -> std::ops::ControlFlow<Node, Node> {
        use std::ops::ControlFlow::{Break, Continue};

        let invalid = |parser: &Self, lhs: Node, message: &str| -> Node {
            InvalidMemberLike {
                base: NodeBase::with_error(NodeSpan::new(start, parser.i), ParsingError::unspecified(message)),
                left: Box::new(lhs),
                right: None,
            }
            .into()
        };

        self.push_token_at(TokenType::OpeningBracket, self.i);
        self.i += 1;

        match self.peek() {
            None => return Break(invalid(&*self, lhs, UNTERMINATED_MEMB_OR_INDEX_EXPR)),
            Some(c) if is_unpaired_or_closing_delim(c) && c != ':' && c != ']' => {
                return Break(invalid(&*self, lhs, UNTERMINATED_MEMB_OR_INDEX_EXPR));
            }
            _ => {}
        }

        self.eat_space();
        let mut start_index = None;
        let mut is_slice = self.peek_is(':');

        if is_slice {
            self.push_token_at(TokenType::Colon, self.i);
            self.i += 1;
        } else if !self.at_end() {
            start_index = Some(Box::new(self.parse_expression()));
        }

        self.eat_space();
        if self.at_end() {
            return Break(invalid(&*self, lhs, UNTERMINATED_INDEX_OR_SLICE_EXPR));
        }

        if self.peek_is(':') {
            if is_slice {
                return Break(
                    SliceExpression {
                        base: NodeBase::with_error(
                            NodeSpan::new(start, self.i),
                            ParsingError::unspecified(INVALID_SLICE_EXPR_SINGLE_COLON),
                        ),
                        indexed: Box::new(lhs),
                        start_index,
                        end_index: None,
                    }
                    .into(),
                );
            }
            is_slice = true;
            self.push_token_at(TokenType::Colon, self.i);
            self.i += 1;
        }

        self.eat_space();

        if is_slice && start_index.is_none() && (self.at_end() || self.peek_is(']')) {
            return Break(
                SliceExpression {
                    base: NodeBase::with_error(
                        NodeSpan::new(start, self.i),
                        ParsingError::unspecified(UNTERMINATED_SLICE_EXPR_MISSING_END_INDEX),
                    ),
                    indexed: Box::new(lhs),
                    start_index: None,
                    end_index: None,
                }
                .into(),
            );
        }

        let mut end_index = None;
        if is_slice && !self.at_end() && !self.peek_is(']') {
            end_index = Some(Box::new(self.parse_expression()));
        }

        self.eat_space();
        if !self.peek_is(']') {
            return Break(invalid(&*self, lhs, UNTERMINATED_INDEX_OR_SLICE_EXPR_MISSING_CLOSING_BRACKET));
        }
        self.push_token_at(TokenType::ClosingBracket, self.i);
        self.i += 1;

        let base = NodeBase::new(NodeSpan::new(start, self.i));
        if is_slice {
            return Continue(
                SliceExpression {
                    base,
                    indexed: Box::new(lhs),
                    start_index,
                    end_index,
                }
                .into(),
            );
        }

        Continue(
            IndexExpression {
                base,
                indexed: Box::new(lhs),
                index: start_index.unwrap_or_else(|| Box::new(self.missing_at_cursor())),
            }
            .into(),
        )
    }

    /// `lhs.name`, `lhs.?name`, `lhs.<name`, `lhs.(expr)` and `lhs.{keys}`. The cursor is on the dot.
    fn parse_member_like(&mut self, lhs: Node, start: usize) -> std::ops::ControlFlow<Node, Node> {
        use std::ops::ControlFlow::{Break, Continue};

        let dot_index = self.i;

        if self.next_is(1, '{') {
            let keys = self.parse_key_list();
            return Continue(
                ExtractionExpression {
                    base: NodeBase::new(NodeSpan::new(start, keys.span().end)),
                    object: Box::new(lhs),
                    keys: Box::new(keys),
                }
                .into(),
            );
        }

        self.i += 1;
        let optional = self.peek_is('?');
        if optional {
            self.i += 1;
        }

        let member = |parser: &Self, lhs: Node, property_name: Node, error: Option<ParsingError>| -> Node {
            MemberExpression {
                base: NodeBase::with_opt_error(NodeSpan::new(start, parser.i), error),
                left: Box::new(lhs),
                property_name: Box::new(property_name),
                optional,
            }
            .into()
        };

        let Some(c) = self.peek().filter(|&c| !is_unpaired_or_closing_delim(c)) else {
            let error = ParsingError::new(ParsingErrorKind::UnterminatedMemberExpr, UNTERMINATED_MEMB_OR_INDEX_EXPR);
            let missing = self.missing_at_cursor();
            return Break(member(&*self, lhs, missing, Some(error)));
        };

        if !optional && c == '(' {
            self.push_token_at(TokenType::Dot, dot_index);
            let opening_paren = self.i;
            let property_name = self.parse_unary_binary_and_parenthesized_expression(opening_paren);
            return Continue(
                ComputedMemberExpression {
                    base: NodeBase::new(NodeSpan::new(start, self.i)),
                    left: Box::new(lhs),
                    property_name: Box::new(property_name),
                    optional,
                }
                .into(),
            );
        }

        let dynamic = !optional && c == '<';
        if dynamic {
            self.i += 1;
        }
        let name_start = self.i;

        match self.peek() {
            None => {
                let missing = self.missing_at_cursor();
                return Break(
                    DynamicMemberExpression {
                        base: NodeBase::with_error(
                            NodeSpan::new(start, self.i),
                            ParsingError::unspecified(UNTERMINATED_DYN_MEMB_OR_INDEX_EXPR),
                        ),
                        left: Box::new(lhs),
                        property_name: Box::new(missing),
                        optional,
                    }
                    .into(),
                );
            }
            Some(c) if !is_first_ident_char(c) => {
                let error = ParsingError::unspecified(fmt_prop_name_should_start_with_a_letter_not(c));
                let missing = self.missing_at_cursor();
                if dynamic {
                    return Break(
                        DynamicMemberExpression {
                            base: NodeBase::with_error(NodeSpan::new(start, self.i), error),
                            left: Box::new(lhs),
                            property_name: Box::new(missing),
                            optional,
                        }
                        .into(),
                    );
                }
                return Break(member(&*self, lhs, missing, Some(error)));
            }
            _ => {}
        }

        self.eat_ident_chars();
        let property_name: Node = IdentifierLiteral {
            base: NodeBase::new(NodeSpan::new(name_start, self.i)),
            name: self.text(name_start, self.i),
        }
        .into();

        if dynamic {
            return Continue(
                DynamicMemberExpression {
                    base: NodeBase::new(NodeSpan::new(start, self.i)),
                    left: Box::new(lhs),
                    property_name: Box::new(property_name),
                    optional,
                }
                .into(),
            );
        }
        Continue(member(&*self, lhs, property_name, None))
    }

    /// `lhs::element`. The cursor is on the first colon.
    fn parse_double_colon_expression(&mut self, lhs: Node, start: usize) -> std::ops::ControlFlow<Node, Node> {
        use std::ops::ControlFlow::{Break, Continue};

        self.push_token(TokenType::DoubleColon, self.i, self.i + 2);
        self.i += 2;

        let Some(c) = self.peek().filter(|&c| !is_unpaired_or_closing_delim(c)) else {
            let missing = self.missing_at_cursor();
            return Break(
                DoubleColonExpression {
                    base: NodeBase::with_error(
                        NodeSpan::new(start, self.i),
                        ParsingError::new(ParsingErrorKind::UnterminatedDoubleColonExpr, UNTERMINATED_DOUBLE_COLON_EXPR),
                    ),
                    left: Box::new(lhs),
                    element: Box::new(missing),
                }
                .into(),
            );
        };

        let error = (!is_first_ident_char(c))
            .then(|| ParsingError::unspecified(fmt_double_colon_expression_element_should_start_with_a_letter_not(c)));

        let element_start = self.i;
        self.eat_ident_chars();
        let element: Node = IdentifierLiteral {
            base: NodeBase::new(NodeSpan::new(element_start, self.i)),
            name: self.text(element_start, self.i),
        }
        .into();

        Continue(
            DoubleColonExpression {
                base: NodeBase::with_opt_error(NodeSpan::new(start, self.i), error),
                left: Box::new(lhs),
                element: Box::new(element),
            }
            .into(),
        )
    }

    // ========================================================================
    // Calls
    // ========================================================================

    /// `callee(args)` or `callee!(args)`. The cursor is on `(` or `!`.
    fn parse_parenthesized_call(&mut self, callee: Node, start: usize) -> Node {
        let must = self.peek_is('!');
        if must {
            self.push_token_at(TokenType::ExclamationMark, self.i);
            self.i += 1;
        }
        self.push_token_at(TokenType::OpeningParenthesis, self.i);
        self.i += 1;

        let mut arguments = Vec::new();
        let mut spread_seen = false;

        while self.peek().is_some_and(|c| c != ')') {
            self.eat_space_newline_comma_comment();
            let Some(c) = self.peek().filter(|&c| c != ')') else {
                break;
            };

            let argument_start = self.i;
            let argument = self.parse_call_argument(&mut spread_seen);
            if argument.is_missing_expr() || self.i == argument_start {
                arguments.push(self.unexpected_char_node(fmt_unexpected_char_in_call_arguments(c)));
                continue;
            }
            arguments.push(argument);
            self.eat_space_newline_comma_comment();
        }

        let mut error = None;
        if self.peek_is(')') {
            self.push_token_at(TokenType::ClosingParenthesis, self.i);
            self.i += 1;
        } else {
            error = Some(ParsingError::unspecified(UNTERMINATED_CALL_MISSING_CLOSING_PAREN));
        }

        CallExpression {
            base: NodeBase::with_opt_error(NodeSpan::new(start, self.i), error),
            callee: Box::new(callee),
            arguments,
            must,
            command_like_syntax: false,
        }
        .into()
    }

    /// Arguments of a command-like call (`print a b`), up to the end of the line or the next
    /// unpaired or closing delimiter.
    fn parse_call_args_no_parenthesis(&mut self) -> Vec<Node> {
        let mut arguments = Vec::new();
        let mut spread_seen = false;
        let is_end = |c: char| is_unpaired_or_closing_delim(c) && c != ':';

        while self.peek().is_some_and(|c| !is_end(c)) {
            self.eat_space_comments();
            let Some(c) = self.peek().filter(|&c| !is_end(c)) else {
                break;
            };

            let argument_start = self.i;
            let argument = self.parse_call_argument(&mut spread_seen);
            if argument.is_missing_expr() || self.i == argument_start {
                if self.at_end() {
                    break;
                }
                arguments.push(self.unexpected_char_node(fmt_unexpected_char_in_call_arguments(c)));
                continue;
            }
            arguments.push(argument);
            self.eat_space_comments();
        }
        arguments
    }

    /// A single call argument, possibly a `...spread` one.
    ///
    /// Arguments following a spread argument get an error.
    fn parse_call_argument(&mut self, spread_seen: &mut bool) -> Node {
        let error = spread_seen.then(|| ParsingError::unspecified(SPREAD_ARGUMENT_CANNOT_BE_FOLLOWED_BY_ADDITIONAL_ARGS));

        if !self.at_str("...") {
            let mut argument = self.parse_expression();
            if let Some(error) = error
                && !argument.is_missing_expr()
                && argument.error().is_none()
            {
                argument.base_mut().error = Some(error);
            }
            return argument;
        }

        let start = self.i;
        self.push_token(TokenType::ThreeDots, start, start + 3);
        self.i += 3;
        let expr = self.parse_expression();
        if expr.is_missing_expr() {
            return expr;
        }
        *spread_seen = true;

        SpreadArgument {
            base: NodeBase::with_opt_error(NodeSpan::new(start, expr.span().end), error),
            expr: Box::new(expr),
        }
        .into()
    }

    // ========================================================================
    // Dot and dash starting expressions
    // ========================================================================

    /// `.{a, b}` key list. The cursor is on the dot.
    fn parse_key_list(&mut self) -> Node {
        let start = self.i;
        self.push_token(TokenType::OpeningKeylistBracket, start, start + 2);
        self.i += 2;

        let mut keys = Vec::new();
        let mut error = None;

        loop {
            self.eat_space_newline_comma();
            let Some(c) = self.peek().filter(|&c| c != '}') else {
                break;
            };

            let key = self.parse_expression();
            if key.is_missing_expr() {
                keys.push(self.unexpected_char_node(fmt_unexpected_char_in_key_list(c)));
                continue;
            }
            if !matches!(key, Node::IdentifierLiteral(_)) {
                error = Some(ParsingError::unspecified(KEY_LIST_CAN_ONLY_CONTAIN_IDENTS));
            }
            keys.push(key);
        }

        if self.peek_is('}') {
            self.push_token_at(TokenType::ClosingCurlyBracket, self.i);
            self.i += 1;
        } else {
            error = Some(ParsingError::unspecified(UNTERMINATED_KEY_LIST_MISSING_BRACE));
        }

        KeyListExpression {
            base: NodeBase::with_opt_error(self.span_from(start), error),
            keys,
        }
        .into()
    }

    /// Relative paths (`./a`, `../a`), key lists (`.{a}`), upper-bound ranges (`..10`) and
    /// property names (`.name`).
    fn parse_dot_starting_expression(&mut self) -> Node {
        let start = self.i;

        if self.next_is(1, '/') || (self.next_is(1, '.') && self.next_is(2, '/')) {
            return self.parse_path_like_expression(false);
        }

        match self.char_at(start + 1) {
            Some('{') => return self.parse_key_list(),
            Some('.') => {
                self.push_token(TokenType::TwoDots, start, start + 2);
                self.i += 2;
                let upper_bound = self.parse_expression();
                return UpperBoundRangeExpression {
                    base: NodeBase::new(NodeSpan::new(start, self.i.max(upper_bound.span().end))),
                    upper_bound: Box::new(upper_bound),
                }
                .into();
            }
            Some(c) if is_ident_char(c) && !is_dec_digit(c) => {
                self.i += 1;
                self.eat_ident_chars();
                return PropertyNameLiteral {
                    base: NodeBase::new(self.span_from(start)),
                    name: self.text(start + 1, self.i),
                }
                .into();
            }
            _ => {}
        }

        self.push_raw_token(TokenType::UnexpectedChar, start, start + 1);
        self.i += 1;
        UnknownNode {
            base: NodeBase::with_error(self.span_from(start), ParsingError::unspecified(DOT_SHOULD_BE_FOLLOWED_BY)),
        }
        .into()
    }

    /// Negative numbers, flags (`-v`, `--verbose`), options (`--level=3`) and dash-starting
    /// unquoted strings.
    fn parse_dash_starting_expression(&mut self) -> Node {
        let start = self.i;
        self.i += 1;

        let unquoted = |parser: &Self| -> Node {
            let raw = parser.text(start, parser.i);
            UnquotedStringLiteral {
                base: NodeBase::new(parser.span_from(start)),
                value: raw.clone(),
                raw,
            }
            .into()
        };

        match self.peek() {
            None => return unquoted(&*self),
            Some(c) if c.is_whitespace() => return unquoted(&*self),
            Some(c) if is_dec_digit(c) => {
                self.i = start;
                return self.parse_number_and_range_and_rate_literals();
            }
            _ => {}
        }

        let single_dash = !self.peek_is('-');
        if !single_dash {
            self.i += 1;
        }

        let name_start = self.i;
        match self.peek() {
            None => return unquoted(&*self),
            Some(c) if c.is_whitespace() || is_delim(c) => return unquoted(&*self),
            Some(c) if !c.is_ascii_alphanumeric() => {
                if is_unquoted_string_char(c) {
                    return self.parse_unquoted_string_literal(start);
                }
                return FlagLiteral {
                    base: NodeBase::with_error(
                        self.span_from(start),
                        ParsingError::unspecified(OPTION_NAME_CAN_ONLY_CONTAIN_ALPHANUM_CHARS),
                    ),
                    single_dash,
                    name: String::new(),
                    raw: self.text(start, self.i),
                }
                .into();
            }
            _ => {}
        }

        while self.peek_matches(|c| c.is_ascii_alphanumeric() || c == '-') {
            self.i += 1;
        }
        let name = self.text(name_start, self.i);

        if !self.peek_is('=') {
            return FlagLiteral {
                base: NodeBase::new(self.span_from(start)),
                single_dash,
                name,
                raw: self.text(start, self.i),
            }
            .into();
        }

        self.i += 1;
        if self.at_end() {
            return OptionExpression {
                base: NodeBase::with_error(
                    self.span_from(start),
                    ParsingError::unspecified(UNTERMINATED_OPION_EXPR_EQUAL_ASSIGN_SHOULD_BE_FOLLOWED_BY_EXPR),
                ),
                single_dash,
                name,
                value: Box::new(self.missing_at_cursor()),
            }
            .into();
        }

        let value = self.parse_expression();
        OptionExpression {
            base: NodeBase::new(NodeSpan::new(start, self.i.max(value.span().end))),
            single_dash,
            name,
            value: Box::new(value),
        }
        .into()
    }
}
