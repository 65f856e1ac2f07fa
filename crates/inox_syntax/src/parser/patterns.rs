/// Pattern syntax: `%`-prefixed patterns, pattern unions, pattern calls and the object, record,
/// list, tuple and dictionary pattern literals.
///
/// Inside a pattern (`in_pattern` set) identifiers are pattern identifiers and `{`, `[`, `#{`,
/// `#[`, `:{` and `|` start pattern literals without a `%` prefix. Object pattern keys are parsed
/// outside of pattern mode, their values inside.
///
/// ## Notes
/// - This file is `include!`'d into `crate::parser`.
/// - A pattern union without a leading pipe does not exist: `%| a | b` or `| a | b` in a pattern.
impl<'a> Parser<'a> {
    /// Parse a pattern starting with `%`; the cursor is on the `%`.
    fn parse_percent_prefixed_pattern(&mut self, preceded_by_opening_paren: bool) -> Node {
        let start = self.i;
        self.i += 1;

        let Some(c) = self.peek() else {
            self.push_token_at(TokenType::PercentSymbol, start);
            return UnknownNode {
                base: NodeBase::with_error(self.span_from(start), ParsingError::unspecified(UNTERMINATED_PATT)),
            }
            .into();
        };

        match c {
            '|' => {
                let saved = std::mem::replace(&mut self.in_pattern, true);
                let union = self.parse_pattern_union_cases(start, true, preceded_by_opening_paren);
                self.in_pattern = saved;
                self.eat_space();
                union
            }
            '.' | '/' => {
                self.i = start;
                self.parse_path_like_expression(true)
            }
            ':' if self.next_is(1, '{') => {
                self.i = start;
                self.parse_dictionary_pattern_literal(true)
            }
            ':' => {
                self.i += 1;
                self.parse_url_like_pattern(start, true)
            }
            '{' => {
                let saved = std::mem::replace(&mut self.in_pattern, true);
                let pattern = self.parse_object_record_pattern_literal(true, false);
                self.in_pattern = saved;
                pattern
            }
            '[' => {
                let saved = std::mem::replace(&mut self.in_pattern, true);
                let pattern = self.parse_list_tuple_pattern_literal(true, false);
                self.in_pattern = saved;
                pattern
            }
            '(' => {
                let saved = std::mem::replace(&mut self.in_pattern, false);
                let value = self.parse_expression();
                self.in_pattern = saved;
                self.push_token_at(TokenType::PercentSymbol, start);
                PatternConversionExpression {
                    base: NodeBase::new(NodeSpan::new(start, value.span().end)),
                    value: Box::new(value),
                }
                .into()
            }
            '<' => self.parse_markup_pattern_expression(start),
            '`' => self.parse_regular_expression_literal(start),
            '-' => self.parse_option_pattern_literal(start),
            c if is_alpha(c) => self.parse_percent_alpha_starting_pattern(start),
            _ => {
                self.push_token_at(TokenType::PercentSymbol, start);
                UnknownNode {
                    base: NodeBase::with_error(self.span_from(start), ParsingError::unspecified(UNTERMINATED_PATT)),
                }
                .into()
            }
        }
    }

    /// ``%`regex` ``; the cursor is on the opening backquote and `start` is the `%`.
    ///
    /// The value is validated with the `regex` crate.
    fn parse_regular_expression_literal(&mut self, start: usize) -> Node {
        let value_start = self.i + 1;
        self.i += 1;
        while self
            .peek()
            .is_some_and(|c| c != '`' || count_prev_backslashes(self.s, self.i) % 2 == 1)
        {
            self.i += 1;
        }

        let value = self.text(value_start, self.i);
        let error = if self.at_end() {
            Some(ParsingError::unspecified(UNTERMINATED_REGEX_LIT))
        } else {
            self.i += 1;
            regex::Regex::new(&value)
                .err()
                .map(|err| ParsingError::unspecified(fmt_invalid_regex_literal(&err.to_string())))
        };

        RegularExpressionLiteral {
            base: NodeBase::with_opt_error(self.span_from(start), error),
            raw: self.text(start, self.i),
            value,
            unprefixed: false,
        }
        .into()
    }

    /// `%-v`, `%--name=%int`; the cursor is on the first dash.
    fn parse_option_pattern_literal(&mut self, start: usize) -> Node {
        let saved = std::mem::replace(&mut self.in_pattern, true);
        let pattern = self.parse_option_pattern_literal_inner(start);
        self.in_pattern = saved;
        pattern
    }

    fn parse_option_pattern_literal_inner(&mut self, start: usize) -> Node {
        let invalid = |parser: &Self, single_dash: bool, name: String, message: &str| -> Node {
            OptionPatternLiteral {
                base: NodeBase::with_error(parser.span_from(start), ParsingError::unspecified(message)),
                single_dash,
                name,
                value: Box::new(parser.missing_at_cursor()),
                unprefixed: false,
            }
            .into()
        };

        self.i += 1;
        if self.at_end() {
            return invalid(&*self, true, String::new(), DASH_SHOULD_BE_FOLLOWED_BY_OPTION_NAME);
        }

        let single_dash = !self.peek_is('-');
        if !single_dash {
            self.i += 1;
        }

        let name_start = self.i;
        match self.peek() {
            None => return invalid(&*self, single_dash, String::new(), DOUBLE_DASH_SHOULD_BE_FOLLOWED_BY_OPTION_NAME),
            Some(c) if !c.is_ascii_alphanumeric() => {
                return invalid(&*self, single_dash, String::new(), OPTION_NAME_CAN_ONLY_CONTAIN_ALPHANUM_CHARS);
            }
            _ => {}
        }
        while self.peek_matches(|c| c.is_ascii_alphanumeric() || c == '-') {
            self.i += 1;
        }
        let name = self.text(name_start, self.i);

        if !self.peek_is('=') {
            return invalid(
                &*self,
                single_dash,
                name,
                UNTERMINATED_OPTION_PATTERN_A_VALUE_IS_EXPECTED_AFTER_EQUAKL_SIGN,
            );
        }
        self.i += 1;

        if self.at_end() {
            return invalid(
                &*self,
                single_dash,
                name,
                UNTERMINATED_OPTION_PATT_EQUAL_ASSIGN_SHOULD_BE_FOLLOWED_BY_EXPR,
            );
        }

        let value = self.parse_expression();
        OptionPatternLiteral {
            base: NodeBase::new(self.span_from(start)),
            single_dash,
            name,
            value: Box::new(value),
            unprefixed: false,
        }
        .into()
    }

    /// `%name`, `%ns.`, `%ns.member` and what can follow them: a pattern call, `?`, a function
    /// pattern (`%fn`), a complex string pattern (`%str(...)`) or a URL pattern (`%https://...`).
    fn parse_percent_alpha_starting_pattern(&mut self, start: usize) -> Node {
        self.eat_ident_chars();
        let name = self.text(start + 1, self.i);
        let ident: Node = PatternIdentifierLiteral {
            base: NodeBase::new(self.span_from(start)),
            unprefixed: false,
            name: name.clone(),
        }
        .into();

        if !self.peek_is('.') {
            match self.peek() {
                None => return ident,
                _ if name == keywords::as_str(KeywordId::Fn) => return self.parse_function_pattern(start, true),
                Some('(') if name == "str" => {
                    return self.parse_complex_string_pattern_piece(self.span_from(start), false);
                }
                Some(':') if self.next_is(1, '/') && inox_core::lang::schemes::is_supported_scheme(&name) => {
                    self.i += 1;
                    return self.parse_url_like_pattern(start, true);
                }
                _ => return self.parse_pattern_suffix(ident),
            }
        }

        self.i += 1;
        let namespace: Node = PatternNamespaceIdentifierLiteral {
            base: NodeBase::new(self.span_from(start)),
            unprefixed: false,
            name,
        }
        .into();

        let Some(c) = self.peek().filter(|&c| !is_delim(c) && !is_space_not_lf(c) && c != '\n') else {
            return namespace;
        };

        if !is_alpha(c) && c != '_' {
            return PatternNamespaceMemberExpression {
                base: NodeBase::with_error(
                    self.span_from(start),
                    ParsingError::unspecified(fmt_pattern_namespace_member_should_start_with_a_letter_not(c)),
                ),
                namespace: Box::new(namespace),
                member_name: Box::new(self.missing_at_cursor()),
            }
            .into();
        }

        let member_start = self.i;
        self.eat_ident_chars();
        let member: Node = PatternNamespaceMemberExpression {
            base: NodeBase::new(self.span_from(start)),
            namespace: Box::new(namespace),
            member_name: Box::new(
                IdentifierLiteral {
                    base: NodeBase::new(NodeSpan::new(member_start, self.i)),
                    name: self.text(member_start, self.i),
                }
                .into(),
            ),
        }
        .into();
        self.parse_pattern_suffix(member)
    }

    /// `readonly %pattern`, the keyword has already been consumed.
    fn parse_readonly_pattern_expression(&mut self, keyword: NodeSpan) -> Node {
        self.push_keyword(TokenType::ReadonlyKeyword, keyword.start);
        self.eat_space();

        let saved = std::mem::replace(&mut self.in_pattern, true);
        let pattern = self.parse_expression();
        self.in_pattern = saved;

        ReadonlyPatternExpression {
            base: NodeBase::new(NodeSpan::new(keyword.start, pattern.span().end.max(keyword.end))),
            pattern: Box::new(pattern),
        }
        .into()
    }

    // ========================================================================
    // Unions & calls
    // ========================================================================

    /// `| a | b` inside a pattern; the cursor is on the pipe.
    fn parse_pattern_union(&mut self, start: usize, percent_prefixed: bool) -> Node {
        self.parse_pattern_union_cases(start, percent_prefixed, false)
    }

    /// Cases of a pattern union; the cursor is on the leading pipe.
    ///
    /// The union ends at the end of the line, or at the first unpaired or closing delimiter if
    /// the union is directly inside parentheses (the closing parenthesis is left to the caller).
    fn parse_pattern_union_cases(&mut self, start: usize, percent_prefixed: bool, preceded_by_opening_paren: bool) -> Node {
        if percent_prefixed {
            self.push_token(TokenType::PatternUnionOpeningPipe, self.i - 1, self.i + 1);
        } else {
            self.push_sub_token(
                TokenType::Pipe,
                TokenSubType::UnprefixedPatternUnionPipe,
                self.i,
                self.i + 1,
            );
        }
        self.i += 1;

        let eat_non_significant = |parser: &mut Self| {
            if preceded_by_opening_paren {
                parser.eat_space_newline_comma_comment();
            } else {
                parser.eat_space();
            }
        };

        eat_non_significant(self);
        let mut cases = vec![self.parse_expression()];
        eat_non_significant(self);

        while let Some(c) = self.peek() {
            if c != '|' && !(preceded_by_opening_paren && c == '\n') && is_unpaired_or_closing_delim(c) {
                break;
            }
            eat_non_significant(self);

            if !self.peek_is('|') {
                return PatternUnion {
                    base: NodeBase::with_error(
                        self.span_from(start),
                        ParsingError::unspecified(INVALID_PATT_UNION_ELEMENT_SEPARATOR_EXPLANATION),
                    ),
                    cases,
                }
                .into();
            }
            self.push_sub_token(
                TokenType::Pipe,
                TokenSubType::UnprefixedPatternUnionPipe,
                self.i,
                self.i + 1,
            );
            self.i += 1;

            eat_non_significant(self);
            cases.push(self.parse_expression());
            eat_non_significant(self);
        }

        PatternUnion {
            base: NodeBase::new(self.span_from(start)),
            cases,
        }
        .into()
    }

    /// `callee(args)` or `callee{...}`; the cursor is on the opening delimiter.
    fn parse_pattern_call(&mut self, callee: Node) -> Node {
        let saved = std::mem::replace(&mut self.in_pattern, true);
        let mut arguments = Vec::new();
        let mut error = None;

        if self.peek_is('{') {
            arguments.push(self.parse_expression());
        } else {
            self.push_token_at(TokenType::OpeningParenthesis, self.i);
            self.i += 1;
            self.eat_space_comma();

            while let Some(c) = self.peek().filter(|&c| c != ')') {
                if self.is_interrupted() {
                    break;
                }
                let argument = self.parse_expression();
                if argument.is_missing_expr() {
                    arguments.push(self.unexpected_char_node(fmt_unexpected_char_in_pattern_call_arguments(c)));
                } else {
                    arguments.push(argument);
                }
                self.eat_space_comma();
            }

            if self.peek_is(')') {
                self.push_token_at(TokenType::ClosingParenthesis, self.i);
                self.i += 1;
            } else {
                error = Some(ParsingError::unspecified(UNTERMINATED_PATTERN_CALL_MISSING_CLOSING_PAREN));
            }
        }
        self.in_pattern = saved;

        PatternCallExpression {
            base: NodeBase::with_opt_error(NodeSpan::new(callee.span().start, self.i), error),
            callee: Box::new(callee),
            arguments,
        }
        .into()
    }

    // ========================================================================
    // Object & record patterns
    // ========================================================================

    /// `%{...}`, `{...}` or `#{...}` in a pattern. The cursor is on the `{` (after the `%`) if
    /// `percent_prefixed`, else on the first code unit of the literal.
    fn parse_object_record_pattern_literal(&mut self, percent_prefixed: bool, is_record: bool) -> Node {
        let start = if percent_prefixed { self.i - 1 } else { self.i };
        if percent_prefixed {
            self.push_token(TokenType::OpeningObjectPatternBracket, start, start + 2);
            self.i += 1;
        } else if is_record {
            self.push_token(TokenType::OpeningRecordBracket, start, start + 2);
            self.i += 2;
        } else {
            self.push_sub_token(TokenType::OpeningCurlyBracket, TokenSubType::ObjectLikeOpeningBrace, start, start + 1);
            self.i += 1;
        }

        let mut properties = Vec::new();
        let mut other_properties = Vec::new();
        let mut spread_elements = Vec::new();

        loop {
            self.eat_space_newline_comma_comment();
            match self.peek() {
                None => break,
                Some(c) if c == '}' || is_closing_delim(c) => break,
                _ if self.is_interrupted() => break,
                _ => {}
            }

            if self.at_str("...") {
                let mut spread = self.parse_pattern_property_spread_element();
                if !properties.is_empty() && spread.error().is_none() {
                    spread.base_mut().error = Some(ParsingError::unspecified(SPREAD_SHOULD_BE_LOCATED_AT_THE_START));
                }
                spread_elements.push(spread);
                continue;
            }

            match self.parse_object_pattern_entry() {
                ObjectPatternEntry::Property(property) => properties.push(property),
                ObjectPatternEntry::OtherProps(expr) => other_properties.push(expr),
            }
        }

        let error = if self.peek_is('}') {
            self.push_sub_token(
                TokenType::ClosingCurlyBracket,
                TokenSubType::ObjectLikeClosingBrace,
                self.i,
                self.i + 1,
            );
            self.i += 1;
            None
        } else if is_record {
            Some(ParsingError::unspecified(UNTERMINATED_REC_PATTERN_MISSING_CLOSING_BRACE))
        } else {
            Some(ParsingError::unspecified(UNTERMINATED_OBJ_PATTERN_MISSING_CLOSING_BRACE))
        };

        let base = NodeBase::with_opt_error(self.span_from(start), error);
        if is_record {
            RecordPatternLiteral {
                base,
                properties,
                other_properties,
                spread_elements,
            }
            .into()
        } else {
            ObjectPatternLiteral {
                base,
                properties,
                other_properties,
                spread_elements,
            }
            .into()
        }
    }

    /// `...%pattern` inside an object pattern.
    fn parse_pattern_property_spread_element(&mut self) -> Node {
        let start = self.i;
        self.push_token(TokenType::ThreeDots, start, start + 3);
        self.i += 3;
        self.eat_space();

        let expr = self.parse_expression();
        PatternPropertySpreadElement {
            base: NodeBase::new(NodeSpan::new(start, expr.span().end.max(start + 3))),
            expr: Box::new(expr),
        }
        .into()
    }

    /// One property or `otherprops` expression of an object pattern.
    fn parse_object_pattern_entry(&mut self) -> ObjectPatternEntry {
        let saved = std::mem::replace(&mut self.in_pattern, false);
        let key_or_value = self.parse_expression();
        self.in_pattern = saved;

        if key_or_value.is_missing_expr() {
            let value = match self.peek() {
                Some(c) => self.unexpected_char_node(fmt_unexpected_char_in_object_pattern(c)),
                None => key_or_value,
            };
            return ObjectPatternEntry::Property(pattern_property(value.span(), None, None, value, None));
        }

        let (key_or_value, optional) = match key_or_value {
            Node::BooleanConversionExpression(conversion) => {
                self.push_token_at(TokenType::QuestionMark, self.i - 1);
                (*conversion.expr, true)
            }
            other => (other, false),
        };

        let start = key_or_value.span().start;
        let parenthesized = self.s[start] == '(';

        let mut error = None;
        let key_name = match &key_or_value {
            _ if parenthesized => None,
            Node::IdentifierLiteral(ident) if ident.name == keywords::as_str(KeywordId::Otherprops) => {
                return ObjectPatternEntry::OtherProps(self.parse_other_props(ident.base.span));
            }
            Node::IdentifierLiteral(ident) => Some(ident.name.clone()),
            Node::DoubleQuotedStringLiteral(string) => Some(string.value.clone()),
            Node::UnquotedRegion(_) if self.are_next_spaces_followed_by(':') || self.are_next_spaces_followed_by('%') => {
                Some(String::from("(unquoted region)"))
            }
            Node::UnquotedRegion(_) => None,
            _ => {
                error = Some(ParsingError::unspecified(A_KEY_IS_REQUIRED_FOR_EACH_VALUE_IN_OBJ_REC_PATTERNS));
                None
            }
        };

        self.eat_space();
        if self.at_end() || is_valid_entry_end(self.s, self.i) {
            let error = error.or_else(|| {
                Some(ParsingError::unspecified(A_KEY_IS_REQUIRED_FOR_EACH_VALUE_IN_OBJ_REC_PATTERNS))
            });
            let span = NodeSpan::new(start, self.i);
            return ObjectPatternEntry::Property(pattern_property(span, None, None, key_or_value, error));
        }

        let mut type_annotation = None;
        if self.peek_is('%') {
            let annotation = self.parse_percent_prefixed_pattern(false);
            if key_name.is_none() {
                let error = error.or_else(|| Some(ParsingError::unspecified(ONLY_KEYS_CAN_HAVE_A_TYPE_ANNOT)));
                let span = NodeSpan::new(start, annotation.span().end);
                return ObjectPatternEntry::Property(pattern_property(
                    span,
                    None,
                    Some(annotation),
                    key_or_value,
                    error,
                ));
            }
            type_annotation = Some(annotation);
            self.eat_space();
        }

        if key_name.as_deref().is_some_and(is_metadata_key) {
            error.get_or_insert_with(|| ParsingError::unspecified(METAPROPS_ARE_NOT_ALLOWED_IN_OBJECT_PATTERNS));
        }

        let Some(key_name) = key_name else {
            if !self.peek_is(':') {
                error.get_or_insert_with(|| ParsingError::unspecified(INVALID_OBJ_PATT_LIT_ENTRY_SEPARATION));
                let span = NodeSpan::new(start, self.i);
                return ObjectPatternEntry::Property(pattern_property(span, None, None, key_or_value, error));
            }
            let error = ParsingError::unspecified(fmt_only_idents_and_strings_valid_obj_pattern_keys_not(&key_or_value));
            return ObjectPatternEntry::Property(self.parse_property_pattern_value(
                start,
                key_or_value,
                None,
                Some(error),
                "",
                optional,
            ));
        };

        if !self.peek_is(':') {
            let message = if type_annotation.is_some() {
                fmt_invalid_obj_key_missing_colon_after_type_annotation(&key_name)
            } else {
                fmt_invalid_obj_pattern_key_missing_colon_after_key(&key_name)
            };
            let mut property = pattern_property(
                NodeSpan::new(start, self.i),
                Some(key_or_value),
                type_annotation,
                missing_at(self.i),
                Some(ParsingError::unspecified(message)),
            );
            if let Node::ObjectPatternProperty(p) = &mut property {
                p.optional = optional;
            }
            return ObjectPatternEntry::Property(property);
        }

        ObjectPatternEntry::Property(self.parse_property_pattern_value(
            start,
            key_or_value,
            type_annotation,
            error,
            &key_name,
            optional,
        ))
    }

    /// Parse `: pattern [@annotations]` and build the property; the cursor is on the colon.
    fn parse_property_pattern_value(
        &mut self,
        start: usize,
        key: Node,
        type_annotation: Option<Node>,
        mut error: Option<ParsingError>,
        key_name: &str,
        optional: bool,
    ) -> Node {
        self.push_token_at(TokenType::Colon, self.i);
        self.i += 1;
        self.eat_space();

        if self.peek_is('#') && self.char_at(self.i + 1).is_some_and(is_comment_first_space) {
            self.eat_space_newline_comment();
            error.get_or_insert_with(|| {
                ParsingError::unspecified(fmt_invalid_obj_pattern_key_comment_before_value_of_key(key_name))
            });
        }
        self.eat_space();

        let property = |span: NodeSpan, value: Node, annotations: Option<Node>, error: Option<ParsingError>| -> Node {
            ObjectPatternProperty {
                base: NodeBase::with_opt_error(span, error),
                key: Some(Box::new(key)),
                type_annotation: type_annotation.map(Box::new),
                value: Box::new(value),
                optional,
                annotations: annotations.map(Box::new),
            }
            .into()
        };

        match self.peek() {
            None | Some('}' | ',') => {
                error.get_or_insert_with(|| {
                    ParsingError::new(ParsingErrorKind::MissingObjectPatternProperty, MISSING_PROPERTY_PATTERN)
                });
                return property(self.span_from(start), missing_at(self.i), None, error);
            }
            Some('\n') => {
                error.get_or_insert_with(|| ParsingError::unspecified(UNEXPECTED_NEWLINE_AFTER_COLON));
                return property(self.span_from(start), missing_at(self.i), None, error);
            }
            _ => {}
        }

        let mut value = self.parse_expression();
        let mut end = self.i;
        let mut annotations = None;

        if value.is_missing_expr() {
            if let Some(c) = self.peek() {
                value = self.unexpected_char_node(fmt_unexpected_char_in_object_pattern(c));
            }
        } else {
            self.eat_space();
            annotations = self.try_parse_metadata_annotations_after_property();
            if annotations.is_some() {
                end = self.i;
            }
            self.eat_space();
            if error.is_none()
                && self
                    .peek()
                    .is_some_and(|c| !is_valid_entry_end(self.s, self.i) && !is_closing_delim(c))
            {
                error = Some(ParsingError::unspecified(INVALID_OBJ_PATT_LIT_ENTRY_SEPARATION));
            }
        }

        property(NodeSpan::new(start, end), value, annotations, error)
    }

    /// `otherprops %pattern` (`otherprops no` forbids additional properties).
    fn parse_other_props(&mut self, keyword: NodeSpan) -> Node {
        self.push_keyword(TokenType::OtherpropsKeyword, keyword.start);
        self.eat_space();

        let saved = std::mem::replace(&mut self.in_pattern, true);
        let pattern = self.parse_expression();
        self.in_pattern = saved;

        let no = matches!(&pattern, Node::PatternIdentifierLiteral(ident) if ident.name == "no");
        let mut error = None;
        self.check_entry_end(&mut error, INVALID_OBJ_PATT_LIT_ENTRY_SEPARATION);

        OtherPropsExpr {
            base: NodeBase::with_opt_error(NodeSpan::new(keyword.start, pattern.span().end.max(keyword.end)), error),
            no,
            pattern: Box::new(pattern),
        }
        .into()
    }

    // ========================================================================
    // List & tuple patterns
    // ========================================================================

    /// `%[...]`, `[...]` or `#[...]` in a pattern, optionally followed by a general element
    /// (`[]%int`). The cursor is on the `[` (after the `%`) if `percent_prefixed`.
    fn parse_list_tuple_pattern_literal(&mut self, percent_prefixed: bool, is_tuple: bool) -> Node {
        let start = if percent_prefixed { self.i - 1 } else { self.i };
        if percent_prefixed {
            self.push_token(TokenType::OpeningListPatternBracket, start, start + 2);
            self.i += 1;
        } else if is_tuple {
            self.push_token(TokenType::OpeningTupleBracket, start, start + 2);
            self.i += 2;
        } else {
            self.push_token_at(TokenType::OpeningBracket, start);
            self.i += 1;
        }

        let mut elements = Vec::new();
        loop {
            self.eat_space_newline_comma_comment();
            if self.at_end() || self.peek_is(']') || self.is_interrupted() {
                break;
            }

            let element = self.parse_expression();
            if element.is_missing_expr() {
                match self.peek() {
                    Some(c) if !is_closing_delim(c) => {
                        elements.push(self.unexpected_char_node(fmt_unexpected_char_in_list_or_tuple_pattern(c)));
                        continue;
                    }
                    _ => break,
                }
            }
            elements.push(element);
        }

        let mut error = None;
        if self.peek_is(']') {
            self.push_token_at(TokenType::ClosingBracket, self.i);
            self.i += 1;
        } else {
            error = Some(ParsingError::unspecified(UNTERMINATED_LIST_TUPLE_PATT_LIT_MISSING_BRACE));
        }

        let mut general_element = None;
        if self
            .peek()
            .is_some_and(|c| c == '%' || c == '#' || is_first_ident_char(c) || is_opening_delim(c))
        {
            if !elements.is_empty() {
                error = Some(ParsingError::unspecified(INVALID_LIST_TUPLE_PATT_GENERAL_ELEMENT_IF_ELEMENTS));
            }
            general_element = Some(Box::new(self.parse_expression()));
        }

        let base = NodeBase::with_opt_error(self.span_from(start), error);
        if is_tuple {
            TuplePatternLiteral {
                base,
                elements,
                general_element,
            }
            .into()
        } else {
            ListPatternLiteral {
                base,
                elements,
                general_element,
            }
            .into()
        }
    }

    // ========================================================================
    // Dictionary patterns
    // ========================================================================

    /// `%:{"key": %int}` or `:{...}` in a pattern; the cursor is on the `%` if
    /// `percent_prefixed`, else on the colon.
    fn parse_dictionary_pattern_literal(&mut self, percent_prefixed: bool) -> Node {
        let start = self.i;
        if percent_prefixed {
            self.push_token(TokenType::OpeningDictionaryPatternBracket, start, start + 3);
            self.i += 3;
        } else {
            self.push_token(TokenType::OpeningDictionaryBracket, start, start + 2);
            self.i += 2;
        }

        let saved = std::mem::replace(&mut self.in_pattern, true);
        let mut entries = Vec::new();
        loop {
            self.eat_space_newline_comma_comment();
            match self.peek() {
                None => break,
                Some(c) if c == '}' || is_closing_delim(c) => break,
                _ if self.is_interrupted() => break,
                _ => {}
            }
            entries.push(self.parse_dictionary_pattern_entry());
        }
        self.in_pattern = saved;

        let error = if self.peek_is('}') {
            self.push_token_at(TokenType::ClosingCurlyBracket, self.i);
            self.i += 1;
            None
        } else {
            Some(ParsingError::unspecified(UNTERMINATED_DICT_PATT_MISSING_CLOSING_BRACE))
        };

        DictionaryPatternLiteral {
            base: NodeBase::with_opt_error(self.span_from(start), error),
            entries,
        }
        .into()
    }

    /// `key: pattern`, keys are simple value literals parsed outside of pattern mode.
    fn parse_dictionary_pattern_entry(&mut self) -> Node {
        let start = self.i;
        let saved = std::mem::replace(&mut self.in_pattern, false);
        let mut key = self.parse_expression();
        self.in_pattern = saved;

        let entry = |span: NodeSpan, key: Node, value: Node, error: Option<ParsingError>| -> Node {
            DictionaryPatternEntry {
                base: NodeBase::with_opt_error(span, error),
                key: Box::new(key),
                value: Box::new(value),
            }
            .into()
        };

        if key.is_missing_expr() {
            if let Some(c) = self.peek() {
                key = self.unexpected_char_node(fmt_unexpected_char_in_dictionary(c));
            }
            return entry(self.span_from(start), key, missing_at(self.i), None);
        }

        if key.error().is_none() && !key.is_simple_value_literal() {
            key.base_mut().error = Some(ParsingError::unspecified(INVALID_DICT_KEY_ONLY_SIMPLE_VALUE_LITS));
        }

        self.eat_space();
        if !self.peek_is(':') {
            let message = if key_value_contains_colon(&key) {
                INVALID_DICT_ENTRY_MISSING_SPACE_BETWEEN_KEY_AND_COLON
            } else {
                INVALID_DICT_ENTRY_MISSING_COLON_AFTER_KEY
            };
            let error = Some(ParsingError::unspecified(message));
            let span = NodeSpan::new(start, key.span().end);
            return entry(span, key, missing_at(self.i), error);
        }

        self.push_token_at(TokenType::Colon, self.i);
        self.i += 1;
        self.eat_space();

        let mut value = self.parse_expression();
        if value.is_missing_expr()
            && let Some(c) = self.peek().filter(|&c| !matches!(c, ',' | '}' | '\n') && !is_closing_delim(c))
        {
            value = self.unexpected_char_node(fmt_unexpected_char_in_dictionary(c));
        }
        let end = self.i;

        let mut error = None;
        self.check_entry_end(&mut error, INVALID_DICT_PATT_LIT_ENTRY_SEPARATION);
        entry(NodeSpan::new(start, end), key, value, error)
    }
}

/// Result of [`Parser::parse_object_pattern_entry`].
enum ObjectPatternEntry {
    Property(Node),
    OtherProps(Node),
}

fn pattern_property(
    span: NodeSpan,
    key: Option<Node>,
    type_annotation: Option<Node>,
    value: Node,
    error: Option<ParsingError>,
) -> Node {
    ObjectPatternProperty {
        base: NodeBase::with_opt_error(span, error),
        key: key.map(Box::new),
        type_annotation: type_annotation.map(Box::new),
        value: Box::new(value),
        optional: false,
        annotations: None,
    }
    .into()
}

/// Whether the text of a dictionary key ends with a colon that is not part of `://`, e.g. the
/// `a:` of `:{a: 1}` where a space was expected.
fn key_value_contains_colon(key: &Node) -> bool {
    let text = match key {
        Node::InvalidURL(url) => url.value.clone(),
        other => other.value_string().unwrap_or_default(),
    };
    text.rfind(':')
        .is_some_and(|last| last > 0 && text.find("://").is_none_or(|scheme| scheme < last))
}
