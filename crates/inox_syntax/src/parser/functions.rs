/// Functions: declarations (`fn name(a, b %int) %int {...}`), expressions (`fn[x](y) => x + y`)
/// and function patterns (`%fn(%int) %str`).
///
/// ## Notes
/// - This file is `include!`'d into `crate::parser`.
/// - Parameter types and return types are parsed in pattern mode.
/// - Parameters that cannot be parsed stay in the parameter list with an error, so that the
///   unexpected characters are still covered by a node.
impl<'a> Parser<'a> {
    /// Function declaration or expression; `keyword` is the span of `fn` and the cursor is right
    /// after it.
    fn parse_function(&mut self, keyword: NodeSpan) -> Node {
        let start = keyword.start;
        self.push_keyword(TokenType::FnKeyword, start);
        self.eat_space();

        let mut capture_list = Vec::new();
        let has_capture_list = self.peek_is('[');

        if has_capture_list {
            self.push_token_at(TokenType::OpeningBracket, self.i);
            self.i += 1;
            self.eat_space();

            while self.peek().is_some_and(|c| c != ']') {
                let mut captured = self.parse_expression();
                if captured.is_missing_expr() {
                    match self.peek() {
                        Some(c) => captured = self.unexpected_char_node(fmt_unexpected_char_in_capture_list(c)),
                        None => break,
                    }
                } else if !matches!(captured, Node::IdentifierLiteral(_)) && captured.error().is_none() {
                    captured.base_mut().error =
                        Some(ParsingError::unspecified(CAPTURE_LIST_SHOULD_ONLY_CONTAIN_IDENTIFIERS));
                }
                capture_list.push(captured);
                self.eat_space_comma();
            }

            if !self.peek_is(']') {
                let error = ParsingError::new(
                    ParsingErrorKind::InvalidNext,
                    UNTERMINATED_CAPTURE_LIST_MISSING_CLOSING_BRACKET,
                );
                return self.incomplete_function(start, capture_list, None, error);
            }
            self.push_token_at(TokenType::ClosingBracket, self.i);
            self.i += 1;
            self.eat_space();
        }

        let mut name = None;
        if self.peek_matches(is_alpha) {
            let name_node = self.parse_ident_starting_expression();
            match &name_node {
                Node::IdentifierLiteral(ident) => {
                    let error = keywords::from_str(&ident.name)
                        .is_some()
                        .then(|| ParsingError::unspecified(KEYWORDS_SHOULD_NOT_BE_USED_AS_FN_NAMES));
                    let mut name_node = name_node;
                    if error.is_some() {
                        name_node.base_mut().error = error;
                    }
                    name = Some(name_node);
                }
                other => {
                    let error = ParsingError::unspecified(fmt_func_name_should_be_an_ident_not(other));
                    return FunctionDeclaration {
                        base: NodeBase::with_error(self.span_from(start), error),
                        annotations: None,
                        function: Box::new(missing_at(self.i)),
                        name: Box::new(name_node),
                    }
                    .into();
                }
            }
        }

        if !self.peek_is('(') {
            let message = if has_capture_list && name.is_none() {
                CAPTURE_LIST_SHOULD_BE_FOLLOWED_BY_PARAMS
            } else {
                FN_KEYWORD_OR_FUNC_NAME_SHOULD_BE_FOLLOWED_BY_PARAMS
            };
            let error = ParsingError::new(ParsingErrorKind::InvalidNext, message);
            return self.incomplete_function(start, capture_list, name, error);
        }

        let (parameters, is_variadic, mut error) = self.parse_parameters(false);

        let mut return_type = None;
        let mut body = None;
        let mut is_body_expression = false;

        if error.is_none() {
            self.eat_space();
            if self.peek_matches(is_accepted_return_type_start) {
                return_type = Some(self.parse_return_type());
                self.eat_space();
            }

            match self.peek() {
                Some('{') => body = Some(self.parse_block()),
                Some('=') if self.next_is(1, '>') => {
                    self.push_token(TokenType::Arrow, self.i, self.i + 2);
                    self.i += 2;
                    self.eat_space();
                    body = Some(self.parse_expression());
                    is_body_expression = true;
                }
                _ => {
                    let message = if return_type.is_some() {
                        RETURN_TYPE_OF_FUNC_SHOULD_BE_FOLLOWED_BY_BLOCK_OR_ARROW
                    } else {
                        PARAM_LIST_OF_FUNC_SHOULD_BE_FOLLOWED_BY_BLOCK_OR_ARROW
                    };
                    error = Some(ParsingError::new(ParsingErrorKind::MissingFnBody, message));
                }
            }
        }

        let end = body.as_ref().map_or(self.i, |b| b.span().end);
        let span = NodeSpan::new(start, end);

        let function = FunctionExpression {
            base: NodeBase::new(span),
            capture_list,
            parameters,
            return_type: return_type.map(Box::new),
            is_variadic,
            body: body.map(Box::new),
            is_body_expression,
        };

        match name {
            Some(name) => FunctionDeclaration {
                base: NodeBase::with_opt_error(span, error),
                annotations: None,
                function: Box::new(function.into()),
                name: Box::new(name),
            }
            .into(),
            None => {
                let mut function: Node = function.into();
                function.base_mut().error = error;
                function
            }
        }
    }

    /// Function (or declaration) stopped before its parameters.
    fn incomplete_function(
        &mut self,
        start: usize,
        capture_list: Vec<Node>,
        name: Option<Node>,
        error: ParsingError,
    ) -> Node {
        let span = self.span_from(start);
        let function = FunctionExpression {
            base: NodeBase::new(span),
            capture_list,
            ..Default::default()
        };

        match name {
            Some(name) => FunctionDeclaration {
                base: NodeBase::with_error(span, error),
                annotations: None,
                function: Box::new(function.into()),
                name: Box::new(name),
            }
            .into(),
            None => {
                let mut function: Node = function.into();
                function.base_mut().error = Some(error);
                function
            }
        }
    }

    /// `%fn(...)` or `fn(...)` in a pattern; the cursor is right after `fn`.
    fn parse_function_pattern(&mut self, start: usize, percent_prefixed: bool) -> Node {
        if percent_prefixed {
            self.push_token(TokenType::PercentFn, self.i - 3, self.i);
        } else {
            self.push_token(TokenType::FnKeyword, self.i - 2, self.i);
        }
        self.eat_space();

        if !self.peek_is('(') {
            return FunctionPatternExpression {
                base: NodeBase::with_error(
                    self.span_from(start),
                    ParsingError::new(ParsingErrorKind::InvalidNext, PERCENT_FN_SHOULD_BE_FOLLOWED_BY_PARAMETERS),
                ),
                ..Default::default()
            }
            .into();
        }

        let (parameters, is_variadic, error) = self.parse_parameters(true);

        let mut return_type = None;
        if error.is_none() {
            let after_params = self.i;
            self.eat_space();
            if self.peek_matches(is_accepted_return_type_start) {
                return_type = Some(self.parse_return_type());
            } else {
                self.i = after_params;
            }
        }

        FunctionPatternExpression {
            base: NodeBase::with_opt_error(self.span_from(start), error),
            parameters,
            return_type: return_type.map(Box::new),
            is_variadic,
        }
        .into()
    }

    fn parse_return_type(&mut self) -> Node {
        let saved = std::mem::replace(&mut self.in_pattern, true);
        let return_type = self.parse_expression();
        self.in_pattern = saved;
        return_type
    }

    /// `(a, b %int, ...rest %str)`; the cursor is on the opening parenthesis.
    ///
    /// In function patterns a lone pattern is a parameter type (`%fn(%int)`).
    ///
    /// ## Returns
    /// - The parameters, whether the last one is variadic, and the error of an unterminated list.
    fn parse_parameters(&mut self, in_function_pattern: bool) -> (Vec<Node>, bool, Option<ParsingError>) {
        self.push_token_at(TokenType::OpeningParenthesis, self.i);
        self.i += 1;

        let mut parameters = Vec::new();
        let mut is_variadic = false;

        let saved = self.in_pattern;
        self.in_pattern = in_function_pattern;

        while self.peek().is_some_and(|c| c != ')') && !self.is_interrupted() {
            self.eat_space_newline_comma();
            if self.peek().is_none_or(|c| c == ')') {
                break;
            }

            let param_start = self.i;
            let mut param_error = is_variadic
                .then(|| ParsingError::unspecified(VARIADIC_PARAM_IS_UNIQUE_AND_SHOULD_BE_LAST_PARAM));

            if self.at_str("...") {
                is_variadic = true;
                self.i += 3;
            }

            let first = self.parse_expression();
            if first.is_missing_expr() {
                let Some(c) = self.peek() else {
                    break;
                };
                let unexpected = self.unexpected_char_node(fmt_unexpected_char_in_parameters(c));
                parameters.push(
                    FunctionParameter {
                        base: unexpected.base().clone(),
                        ..Default::default()
                    }
                    .into(),
                );
                self.eat_space_newline_comma();
                continue;
            }

            let parameter = if in_function_pattern {
                self.finish_function_pattern_parameter(param_start, first, param_error, is_variadic)
            } else {
                match first {
                    Node::IdentifierLiteral(ref ident) => {
                        if param_error.is_none() && keywords::from_str(&ident.name).is_some() {
                            param_error = Some(ParsingError::unspecified(KEYWORDS_SHOULD_NOT_BE_USED_AS_PARAM_NAMES));
                        }
                        self.eat_space();
                        let type_annotation = self.parse_parameter_type_if_present();
                        let end = type_annotation.as_ref().map_or(first.span().end, |t| t.span().end);
                        FunctionParameter {
                            base: NodeBase::with_opt_error(NodeSpan::new(param_start, end), param_error),
                            var: Some(Box::new(first)),
                            type_annotation: type_annotation.map(Box::new),
                            is_variadic,
                        }
                        .into()
                    }
                    mut other => {
                        other.base_mut().error = Some(ParsingError::unspecified(
                            PARAM_LIST_OF_FUNC_SHOULD_CONTAIN_PARAMETERS_SEP_BY_COMMAS,
                        ));
                        FunctionParameter {
                            base: NodeBase::with_opt_error(NodeSpan::new(param_start, other.span().end), param_error),
                            var: Some(Box::new(other)),
                            type_annotation: None,
                            is_variadic,
                        }
                        .into()
                    }
                }
            };
            parameters.push(parameter);
            self.eat_space_newline_comma();
        }

        self.in_pattern = saved;

        let error = match self.peek() {
            None => Some(ParsingError::unspecified(UNTERMINATED_PARAM_LIST_MISSING_CLOSING_PAREN)),
            Some(')') => {
                self.push_token_at(TokenType::ClosingParenthesis, self.i);
                self.i += 1;
                None
            }
            Some(_) => Some(ParsingError::unspecified(INVALID_FUNC_SYNTAX)),
        };

        (parameters, is_variadic, error)
    }

    /// Type after a parameter name, up to the next separator.
    fn parse_parameter_type_if_present(&mut self) -> Option<Node> {
        if self.peek().is_none_or(|c| matches!(c, ',' | ')' | '\n')) {
            return None;
        }
        let saved = std::mem::replace(&mut self.in_pattern, true);
        let type_annotation = self.parse_expression();
        self.in_pattern = saved;
        (!type_annotation.is_missing_expr()).then_some(type_annotation)
    }

    /// Parameter of a function pattern: `name %type`, `%type` or `type` (pattern mode).
    fn finish_function_pattern_parameter(
        &mut self,
        start: usize,
        first: Node,
        mut error: Option<ParsingError>,
        is_variadic: bool,
    ) -> Node {
        match first {
            // keywords are not turned into patterns
            Node::IdentifierLiteral(_) => {
                self.eat_space();
                let type_annotation = self.parse_parameter_type_if_present();
                let end = type_annotation.as_ref().map_or(first.span().end, |t| t.span().end);
                FunctionParameter {
                    base: NodeBase::with_error(
                        NodeSpan::new(start, end),
                        ParsingError::unspecified(KEYWORDS_SHOULD_NOT_BE_USED_AS_PARAM_NAMES),
                    ),
                    var: Some(Box::new(first)),
                    type_annotation: type_annotation.map(Box::new),
                    is_variadic,
                }
                .into()
            }
            Node::PatternIdentifierLiteral(ident) if ident.unprefixed => {
                self.eat_space();
                match self.parse_parameter_type_if_present() {
                    Some(type_annotation) => {
                        if error.is_none() && keywords::from_str(&ident.name).is_some() {
                            error = Some(ParsingError::unspecified(KEYWORDS_SHOULD_NOT_BE_USED_AS_PARAM_NAMES));
                        }
                        let var = IdentifierLiteral {
                            base: ident.base.clone(),
                            name: ident.name.clone(),
                        };
                        FunctionParameter {
                            base: NodeBase::with_opt_error(NodeSpan::new(start, type_annotation.span().end), error),
                            var: Some(Box::new(var.into())),
                            type_annotation: Some(Box::new(type_annotation)),
                            is_variadic,
                        }
                        .into()
                    }
                    None => {
                        let end = ident.base.span.end;
                        FunctionParameter {
                            base: NodeBase::with_opt_error(NodeSpan::new(start, end), error),
                            var: None,
                            type_annotation: Some(Box::new(Node::PatternIdentifierLiteral(ident))),
                            is_variadic,
                        }
                        .into()
                    }
                }
            }
            pattern if pattern.is_pattern() => FunctionParameter {
                base: NodeBase::with_opt_error(NodeSpan::new(start, pattern.span().end), error),
                var: None,
                type_annotation: Some(Box::new(pattern)),
                is_variadic,
            }
            .into(),
            mut other => {
                other.base_mut().error = Some(ParsingError::unspecified(
                    PARAM_LIST_OF_FUNC_PATT_SHOULD_CONTAIN_PARAMETERS_SEP_BY_COMMAS,
                ));
                FunctionParameter {
                    base: NodeBase::with_opt_error(NodeSpan::new(start, other.span().end), error),
                    var: Some(Box::new(other)),
                    type_annotation: None,
                    is_variadic,
                }
                .into()
            }
        }
    }
}

/// Whether `c` can start a return type: a pattern, a pointer type or a pattern name.
fn is_accepted_return_type_start(c: char) -> bool {
    matches!(c, '%' | '*' | '[' | '#' | '|') || is_first_ident_char(c)
}
