/// Parenthesized expressions: `(expr)`, `(- x)`, binary expressions, `and`/`or` chains and the
/// expression forms of `if`, `for`, `walk`, `switch` and `match`.
///
/// Binary expressions are always parenthesized, there is no precedence table. `and`/`or` chains
/// are the only exception: `(a and b and c)` is parsed as `a and (b and c)` and mixing the two
/// operators without parentheses is an error.
///
/// ## Notes
/// - This file is `include!`'d into `crate::parser`.
/// - A parenthesized non-binary expression keeps its inner span and gets `is_parenthesized` set.

/// Outcome of [`Parser::parse_binary_operator`].
enum BinaryOperatorParse {
    /// `operator` is `None` when no valid operator was found; the right operand is parsed anyway.
    Parsed {
        operator: Option<BinaryOperator>,
        error: Option<ParsingError>,
    },
    /// An invalid operator is directly followed by the end of the expression.
    MissingRightOperand,
}

fn is_non_ident_binary_operator_char(c: char) -> bool {
    matches!(c, '+' | '-' | '*' | '/' | '\\' | '<' | '>' | '?' | '!' | '=' | '.')
}

/// Operators spelled as words (`and`, `not-in`, `substrof`...).
const WORD_OPERATORS: [BinaryOperator; 11] = [
    BinaryOperator::And,
    BinaryOperator::Or,
    BinaryOperator::In,
    BinaryOperator::NotIn,
    BinaryOperator::Is,
    BinaryOperator::IsNot,
    BinaryOperator::Keyof,
    BinaryOperator::Urlof,
    BinaryOperator::Match,
    BinaryOperator::NotMatch,
    BinaryOperator::Substrof,
];

fn operator_token_type(operator: BinaryOperator) -> TokenType {
    use BinaryOperator::*;
    match operator {
        Add => TokenType::Plus,
        AddDot => TokenType::PlusDot,
        Sub => TokenType::Minus,
        SubDot => TokenType::MinusDot,
        Mul => TokenType::Asterisk,
        MulDot => TokenType::AsteriskDot,
        Div => TokenType::Slash,
        DivDot => TokenType::SlashDot,
        LessThan => TokenType::LessThan,
        LessThanDot => TokenType::LessThanDot,
        LessOrEqual => TokenType::LessOrEqual,
        LessOrEqualDot => TokenType::LessOrEqualDot,
        GreaterThan => TokenType::GreaterThan,
        GreaterThanDot => TokenType::GreaterThanDot,
        GreaterOrEqual => TokenType::GreaterOrEqual,
        GreaterOrEqualDot => TokenType::GreaterOrEqualDot,
        Equal => TokenType::EqualEqual,
        NotEqual => TokenType::ExclamationMarkEqual,
        Is => TokenType::Is,
        IsNot => TokenType::IsNot,
        In => TokenType::InKeyword,
        NotIn => TokenType::NotIn,
        Keyof => TokenType::Keyof,
        Urlof => TokenType::Urlof,
        Dot => TokenType::Dot,
        Range => TokenType::TwoDots,
        ExclEndRange => TokenType::DotDotLessThan,
        And => TokenType::AndKeyword,
        Or => TokenType::OrKeyword,
        Match => TokenType::MatchKeyword,
        NotMatch => TokenType::NotMatch,
        Substrof => TokenType::Substrof,
        SetDifference => TokenType::AntiSlash,
        NilCoalescing => TokenType::DoubleQuestionMark,
        PairComma => TokenType::Comma,
    }
}

/// Float variant of an arithmetic or comparison operator (`+.`, `<.`), `..` for `.`.
fn dotted_operator(operator: BinaryOperator) -> Option<BinaryOperator> {
    use BinaryOperator::*;
    Some(match operator {
        Add => AddDot,
        Sub => SubDot,
        Mul => MulDot,
        Div => DivDot,
        LessThan => LessThanDot,
        LessOrEqual => LessOrEqualDot,
        GreaterThan => GreaterThanDot,
        GreaterOrEqual => GreaterOrEqualDot,
        Dot => Range,
        _ => return None,
    })
}

impl<'a> Parser<'a> {
    /// Parse a parenthesized expression; `opening_paren` is the index of the `(` under the cursor.
    fn parse_unary_binary_and_parenthesized_expression(&mut self, opening_paren: usize) -> Node {
        if !self.enter_nested() {
            return self.missing_at_cursor();
        }
        self.push_token_at(TokenType::OpeningParenthesis, opening_paren);
        self.i = opening_paren + 1;
        let expr = self.parse_unary_binary_inner(opening_paren, true);
        self.leave_nested();
        expr
    }

    /// Parse either a whole parenthesized expression (`opening_paren` set, `start` is the `(`)
    /// or a chain element following `and`/`or` (`start` is the element start).
    fn parse_unary_binary_inner(&mut self, start: usize, opening_paren: bool) -> Node {
        self.eat_space_newline_comment();

        let mut left = if opening_paren && self.peek_is('<') {
            let markup_start = self.i;
            self.parse_markup_expression(None, markup_start)
        } else {
            self.parse_expression_with(true)
        };

        if opening_paren && let Node::IdentifierLiteral(ident) = &left {
            let keyword = ident.base.span;
            match keywords::from_str(&ident.name) {
                Some(KeywordId::If) => return self.parse_if_expression(start, keyword),
                Some(KeywordId::For) => return self.parse_for_expression(start, keyword),
                Some(KeywordId::Walk) => return self.parse_walk_expression(start, keyword),
                Some(KeywordId::Switch) => return self.parse_switch_or_match_expression(start, keyword, false),
                Some(KeywordId::Match) => return self.parse_switch_or_match_expression(start, keyword, true),
                _ => {}
            }
        }

        self.eat_space_newline_comment();

        if left.is_missing_expr() {
            let Some(c) = self.peek() else {
                if !opening_paren {
                    return self.expression_expected_before_cursor();
                }
                return UnknownNode {
                    base: NodeBase::with_opt_error(self.span_from(start), left.error().cloned()),
                }
                .into();
            };

            if c == ')' {
                if !opening_paren {
                    return self.expression_expected_before_cursor();
                }
                self.push_token_at(TokenType::ClosingParenthesis, self.i);
                self.i += 1;
                let mut base = NodeBase::with_opt_error(self.span_from(start), left.error().cloned());
                base.is_parenthesized = true;
                return UnknownNode { base }.into();
            }

            self.push_raw_token(TokenType::UnexpectedChar, self.i, self.i + 1);
            self.i += 1;
            return UnknownNode {
                base: NodeBase::with_error(
                    self.span_from(start),
                    ParsingError::unspecified(fmt_unexpected_char_in_parenthesized_expression(c)),
                ),
            }
            .into();
        }

        // (- x)
        if matches!(&left, Node::UnquotedStringLiteral(s) if s.value == "-") {
            let minus = left.span();
            self.push_token(TokenType::Minus, minus.start, minus.end);
            let operand = self.parse_expression();
            let mut unary: Node = UnaryExpression {
                base: NodeBase::new(NodeSpan::new(minus.start, self.i)),
                operator: UnaryOperator::NumberNegate,
                operand: Box::new(operand),
            }
            .into();
            self.eat_space();

            if opening_paren && self.peek_is(')') {
                self.push_token_at(TokenType::ClosingParenthesis, self.i);
                self.i += 1;
                let base = unary.base_mut();
                base.span = self.span_from(start);
                base.is_parenthesized = true;
                return unary;
            }
            left = unary;
        }

        if self.peek_is(')') {
            if opening_paren {
                self.push_token_at(TokenType::ClosingParenthesis, self.i);
                self.i += 1;
                left.base_mut().is_parenthesized = true;
            }
            return left;
        }

        if self.at_end() {
            if opening_paren {
                let base = left.base_mut();
                base.is_parenthesized = true;
                if base.error.is_none() {
                    base.error = Some(ParsingError::unspecified(UNTERMINATED_PARENTHESIZED_EXPR_MISSING_CLOSING_PAREN));
                }
            }
            return left;
        }

        let (operator, mut error) = match self.parse_binary_operator() {
            BinaryOperatorParse::Parsed { operator, error } => (operator, error),
            BinaryOperatorParse::MissingRightOperand => {
                let right = self.missing_at_cursor();
                let mut base = NodeBase::with_error(
                    self.span_from(start),
                    ParsingError::unspecified(UNTERMINATED_BIN_EXPR_MISSING_OPERAND_OR_INVALID_OPERATOR),
                );
                if opening_paren && self.peek_is(')') {
                    self.push_token_at(TokenType::ClosingParenthesis, self.i);
                    self.i += 1;
                    base.span = self.span_from(start);
                    base.is_parenthesized = true;
                }
                return BinaryExpression {
                    base,
                    operator: BinaryOperator::default(),
                    left: Box::new(left),
                    right: Box::new(right),
                }
                .into();
            }
        };

        self.eat_space();
        if self.at_end() {
            error = Some(ParsingError::unspecified(UNTERMINATED_BIN_EXPR_MISSING_RIGHT_OPERAND));
        }

        let tokens_before_right = self.tokens.len();
        let saved_in_pattern = self.in_pattern;
        if matches!(operator, Some(BinaryOperator::Match | BinaryOperator::NotMatch)) {
            self.in_pattern = true;
        }
        let right = self.parse_expression();
        self.in_pattern = saved_in_pattern;

        self.eat_space();
        if right.is_missing_expr() {
            error = Some(ParsingError::unspecified(UNTERMINATED_BIN_EXPR_MISSING_RIGHT_OPERAND));
        } else if self.at_end() && opening_paren {
            error = Some(ParsingError::unspecified(UNTERMINATED_BIN_EXPR_MISSING_PAREN));
        }

        let operator_or_default = operator.unwrap_or_default();
        let is_and_or = matches!(operator, Some(BinaryOperator::And | BinaryOperator::Or));
        let mut chain: Option<(BinaryOperator, bool)> = None;
        let mut element_end = self.i;

        if let Some(c) = self.peek() {
            let and = keywords::as_str(KeywordId::And);
            let or = keywords::as_str(KeywordId::Or);

            if self.at_word(and) {
                self.push_token(TokenType::AndKeyword, self.i, self.i + and.len());
                self.i += and.len();
                chain = Some((BinaryOperator::And, false));
            } else if self.at_word(or) {
                self.push_token(TokenType::OrKeyword, self.i, self.i + or.len());
                self.i += or.len();
                chain = Some((BinaryOperator::Or, false));
            } else if c == ')' {
                if opening_paren {
                    self.push_token_at(TokenType::ClosingParenthesis, self.i);
                    self.i += 1;
                    element_end = self.i;
                }
            } else if is_and_or {
                // (a or b + c): the right operand is reparsed as a chain element.
                chain = Some((operator_or_default, true));
            } else if is_non_ident_binary_operator_char(c) || is_alpha(c) || c == '_' {
                error = Some(ParsingError::unspecified(COMPLEX_OPERANDS_OF_BINARY_EXPRS_MUST_BE_PARENTHESIZED));
            } else if opening_paren {
                error = Some(ParsingError::unspecified(UNTERMINATED_BIN_EXPR_MISSING_PAREN));
            }
        }

        let Some((chain_operator, reparse_right)) = chain else {
            let mut base = NodeBase::with_opt_error(NodeSpan::new(start, element_end), error);
            base.is_parenthesized = opening_paren;
            return BinaryExpression {
                base,
                operator: operator_or_default,
                left: Box::new(left),
                right: Box::new(right),
            }
            .into();
        };

        let new_left: Node = if reparse_right {
            self.tokens.truncate(tokens_before_right);
            self.i = right.span().start;
            left
        } else {
            let end = if opening_paren { right.span().end } else { element_end };
            BinaryExpression {
                base: NodeBase::with_opt_error(NodeSpan::new(start, end), error),
                operator: operator_or_default,
                left: Box::new(left),
                right: Box::new(right),
            }
            .into()
        };

        self.eat_space();
        let element_start = self.i;
        let new_right = self.parse_unary_binary_inner(element_start, false);
        self.eat_space();

        let mut error = None;
        let mut end = new_right.span().end;

        if opening_paren {
            if self.peek_is(')') {
                self.push_token_at(TokenType::ClosingParenthesis, self.i);
                self.i += 1;
                end = self.i;
            } else if !new_right.is_missing_expr() {
                error = Some(ParsingError::unspecified(UNTERMINATED_BIN_EXPR_MISSING_PAREN));
            }

            if error.is_none() && mixes_and_or(chain_operator, &new_right) {
                error = Some(ParsingError::unspecified(BIN_EXPR_CHAIN_OPERATORS_SHOULD_BE_THE_SAME));
            }
        }

        let mut base = NodeBase::with_opt_error(NodeSpan::new(start, end), error);
        base.is_parenthesized = opening_paren;
        BinaryExpression {
            base,
            operator: chain_operator,
            left: Box::new(new_left),
            right: Box::new(new_right),
        }
        .into()
    }

    /// [`MissingExpression`] ending at the cursor.
    fn expression_expected_before_cursor(&self) -> Node {
        MissingExpression {
            base: NodeBase::with_error(
                NodeSpan::new(self.i.saturating_sub(1), self.i),
                ParsingError::unspecified(fmt_expr_expected_here(self.s, self.i, false)),
            ),
        }
        .into()
    }

    /// Parse the binary operator at the cursor and push its token.
    fn parse_binary_operator(&mut self) -> BinaryOperatorParse {
        let start = self.i;
        let invalid = || ParsingError::unspecified(INVALID_BIN_EXPR_NON_EXISTING_OPERATOR);
        // `?`, `!` and `=` must be followed by another char to form an operator.
        let at_expression_end = |parser: &Self, allow_equal: bool| match parser.peek() {
            None => true,
            Some(c) => is_unpaired_or_closing_delim(c) && c != '\n' && !(allow_equal && c == '='),
        };

        let Some(c) = self.peek() else {
            return BinaryOperatorParse::Parsed {
                operator: None,
                error: Some(ParsingError::unspecified(UNTERMINATED_BIN_EXPR_MISSING_OPERATOR)),
            };
        };

        let mut operator = match c {
            '+' => BinaryOperator::Add,
            '-' => BinaryOperator::Sub,
            '*' => BinaryOperator::Mul,
            '/' => BinaryOperator::Div,
            '\\' => BinaryOperator::SetDifference,
            '.' => BinaryOperator::Dot,
            ',' => BinaryOperator::PairComma,
            '<' if self.next_is(1, '=') => BinaryOperator::LessOrEqual,
            '<' => BinaryOperator::LessThan,
            '>' if self.next_is(1, '=') => BinaryOperator::GreaterOrEqual,
            '>' => BinaryOperator::GreaterThan,
            '?' | '!' | '=' => {
                self.i += 1;
                if at_expression_end(&*self, c != '?') {
                    self.eat_invalid_operator(start);
                    return BinaryOperatorParse::MissingRightOperand;
                }
                match (c, self.peek()) {
                    ('?', Some('?')) => BinaryOperator::NilCoalescing,
                    ('!', Some('=')) => BinaryOperator::NotEqual,
                    ('=', Some('=')) => BinaryOperator::Equal,
                    _ => {
                        self.eat_invalid_operator(start);
                        return BinaryOperatorParse::Parsed {
                            operator: None,
                            error: Some(invalid()),
                        };
                    }
                }
            }
            '$' | '"' | '\'' | '`' | '0'..='9' => {
                return BinaryOperatorParse::Parsed {
                    operator: None,
                    error: Some(ParsingError::unspecified(UNTERMINATED_BIN_EXPR_MISSING_OPERATOR)),
                };
            }
            c if is_alpha(c) || c == '_' => {
                let mut end = self.i;
                while self.char_at(end).is_some_and(is_ident_char) {
                    end += 1;
                }
                let word = self.text(self.i, end);
                match WORD_OPERATORS.into_iter().find(|op| op.as_str() == word) {
                    Some(op) => {
                        self.i = end;
                        self.push_token(operator_token_type(op), start, end);
                        return BinaryOperatorParse::Parsed {
                            operator: Some(op),
                            error: None,
                        };
                    }
                    None => {
                        self.eat_invalid_operator(start);
                        return BinaryOperatorParse::Parsed {
                            operator: None,
                            error: Some(invalid()),
                        };
                    }
                }
            }
            _ => {
                self.push_raw_token(TokenType::UnexpectedChar, start, start + 1);
                self.i += 1;
                return BinaryOperatorParse::Parsed {
                    operator: None,
                    error: Some(invalid()),
                };
            }
        };

        // the first char of `?`, `!` and `=` operators is already consumed
        self.i = start + operator.as_str().chars().count();

        let mut error = None;
        if self.peek_is('.') && self.i + 1 < self.len() {
            match dotted_operator(operator) {
                Some(dotted) => {
                    operator = dotted;
                    self.i += 1;
                }
                None => error = Some(invalid()),
            }
        }
        if operator == BinaryOperator::Range && self.peek_is('<') {
            operator = BinaryOperator::ExclEndRange;
            self.i += 1;
        }

        self.push_token(operator_token_type(operator), start, self.i);
        BinaryOperatorParse::Parsed {
            operator: Some(operator),
            error,
        }
    }

    /// Consume the rest of an invalid operator starting at `start` and push its token.
    fn eat_invalid_operator(&mut self, start: usize) {
        let Some(first) = self.char_at(start) else {
            return;
        };
        if is_non_ident_binary_operator_char(first) {
            while self.peek_matches(is_non_ident_binary_operator_char) {
                self.i += 1;
            }
        } else if is_alpha(first) || first == '_' {
            while self.peek_matches(is_ident_char) {
                self.i += 1;
            }
        }
        self.push_raw_token(TokenType::InvalidOperator, start, self.i);
    }

    // ========================================================================
    // Expression forms of control flow statements
    // ========================================================================

    /// Consume the closing parenthesis of a keyword expression.
    ///
    /// ## Returns
    /// - `message` as an error if the parenthesis is missing.
    fn eat_closing_paren(&mut self, message: &'static str) -> Option<ParsingError> {
        self.eat_space_newline_comment();
        if self.peek_is(')') {
            self.push_token_at(TokenType::ClosingParenthesis, self.i);
            self.i += 1;
            return None;
        }
        Some(ParsingError::unspecified(message))
    }

    /// `(if test consequent else alternate)`
    fn parse_if_expression(&mut self, opening_paren: usize, keyword: NodeSpan) -> Node {
        self.push_keyword(TokenType::IfKeyword, keyword.start);
        self.eat_space();

        let mut expr = IfExpression::default();
        let test = self.parse_expression();
        self.eat_space();
        let consequent = self.parse_expression();
        self.eat_space();

        let consequent_missing = consequent.is_missing_expr();
        expr.test = Box::new(test);
        expr.consequent = Some(Box::new(consequent));

        let mut error = None;
        if self.at_word(keywords::as_str(KeywordId::Else)) {
            self.push_keyword(TokenType::ElseKeyword, self.i);
            self.i += keywords::as_str(KeywordId::Else).len();
            self.eat_space();

            let alternate = self.parse_expression();
            if alternate.is_missing_expr() {
                error = Some(ParsingError::unspecified(UNTERMINATED_IF_EXPR_MISSING_VALUE_AFTER_ELSE));
            }
            expr.alternate = Some(Box::new(alternate));
        }

        let paren_error = self.eat_closing_paren(UNTERMINATED_IF_EXPR_MISSING_CLOSING_PAREN);
        if error.is_none() && !consequent_missing {
            error = paren_error;
        }

        expr.base = NodeBase::with_opt_error(self.span_from(opening_paren), error);
        expr.into()
    }

    /// `(for [%p] [key,] [%p] value in iterated: body)`; the body can also be a block.
    fn parse_for_expression(&mut self, opening_paren: usize, keyword: NodeSpan) -> Node {
        self.push_keyword(TokenType::ForKeyword, keyword.start);
        self.eat_space();

        let mut expr = ForExpression::default();
        let error = self.parse_for_expression_header(&mut expr).err();

        let error = match error {
            Some(error) => Some(error),
            None => {
                self.eat_space();
                match self.parse_keyword_expression_body() {
                    Some(body) => {
                        expr.body = Some(Box::new(body));
                        self.eat_closing_paren(UNTERMINATED_FOR_EXPR_MISSING_CLOSIN_PAREN)
                    }
                    None => Some(ParsingError::unspecified(UNTERMINATED_FOR_EXPR_MISSING_BODY)),
                }
            }
        };

        expr.base = NodeBase::with_opt_error(self.span_from(opening_paren), error);
        expr.into()
    }

    /// Everything between `for` and the body.
    fn parse_for_expression_header(&mut self, expr: &mut ForExpression) -> Result<(), ParsingError> {
        let chunked = keywords::as_str(KeywordId::Chunked);
        if self.at_word(chunked) {
            self.push_keyword(TokenType::ChunkedKeyword, self.i);
            self.i += chunked.len();
            expr.chunked = true;
            self.eat_space();
        }

        let mut first_pattern = None;
        if self.peek_is('%') {
            first_pattern = Some(Box::new(self.parse_expression()));
            self.eat_space();
        }

        let first = self.parse_expression();
        self.eat_space();
        if !matches!(first, Node::IdentifierLiteral(_)) {
            expr.value_pattern = first_pattern;
            expr.iterated_value = Some(Box::new(first));
            return Err(ParsingError::unspecified(INVALID_FOR_EXPR));
        }

        match self.peek() {
            None => {
                expr.value_pattern = first_pattern;
                expr.value_elem_ident = Some(Box::new(first));
                return Err(ParsingError::unspecified(UNTERMINATED_FOR_EXPR));
            }
            Some(',') => {
                self.push_token_at(TokenType::Comma, self.i);
                self.i += 1;
                self.eat_space();
                expr.key_pattern = first_pattern;

                if self.peek_is('%') {
                    expr.value_pattern = Some(Box::new(self.parse_expression()));
                    self.eat_space();
                }
                let value = self.parse_expression();
                self.eat_space();
                let value_is_ident = matches!(value, Node::IdentifierLiteral(_));
                let value_error = (!value_is_ident).then(|| {
                    ParsingError::unspecified(fmt_invalid_for_expr_key_index_var_should_be_followed_by_var_not(&first))
                });
                expr.key_index_ident = Some(Box::new(first));
                expr.value_elem_ident = Some(Box::new(value));
                if let Some(error) = value_error {
                    return Err(error);
                }
            }
            Some(_) if self.at_word(keywords::as_str(KeywordId::In)) => {
                expr.value_pattern = first_pattern;
                expr.value_elem_ident = Some(Box::new(first));
            }
            Some(c) => {
                expr.key_pattern = first_pattern;
                expr.key_index_ident = Some(Box::new(first));
                return Err(ParsingError::unspecified(fmt_for_expr_key_index_should_be_followed_by_comma_not(c)));
            }
        }

        if !self.at_word(keywords::as_str(KeywordId::In)) {
            return Err(ParsingError::unspecified(INVALID_FOR_EXPR_MISSING_IN_KEYWORD));
        }
        self.push_keyword(TokenType::InKeyword, self.i);
        self.i += keywords::as_str(KeywordId::In).len();

        if !self.peek_is(' ') {
            return Err(ParsingError::unspecified(INVALID_FOR_EXPR_IN_KEYWORD_SHOULD_BE_FOLLOWED_BY_SPACE));
        }
        self.eat_space();
        if self.is_expression_end() {
            return Err(ParsingError::unspecified(INVALID_FOR_EXPR_MISSING_VALUE_AFTER_IN));
        }

        expr.iterated_value = Some(Box::new(self.parse_expression()));
        Ok(())
    }

    /// `: expr` or a block.
    fn parse_keyword_expression_body(&mut self) -> Option<Node> {
        match self.peek() {
            Some(':') => {
                self.push_token_at(TokenType::Colon, self.i);
                self.i += 1;
                self.eat_space();
                let body = self.parse_expression();
                (!body.is_missing_expr()).then_some(body)
            }
            Some('{') => Some(self.parse_block()),
            _ => None,
        }
    }

    /// `(walk walked [meta,] entry: body)`; the body can also be a block.
    fn parse_walk_expression(&mut self, opening_paren: usize, keyword: NodeSpan) -> Node {
        self.push_keyword(TokenType::WalkKeyword, keyword.start);
        self.eat_space();

        let mut expr = WalkExpression::default();
        let error = self.parse_walk_expression_inner(&mut expr).err();
        expr.base = NodeBase::with_opt_error(self.span_from(opening_paren), error);
        expr.into()
    }

    fn parse_walk_expression_inner(&mut self, expr: &mut WalkExpression) -> Result<(), ParsingError> {
        let walked = self.parse_expression();
        if walked.is_missing_expr() {
            return Err(ParsingError::unspecified(UNTERMINATED_WALK_EXPR_MISSING_WALKED_VALUE));
        }
        expr.walked = Some(Box::new(walked));
        self.eat_space();

        let first = self.parse_expression();
        if !matches!(first, Node::IdentifierLiteral(_)) {
            return Err(ParsingError::unspecified(UNTERMINATED_WALK_EXPR_MISSING_ENTRY_VARIABLE_NAME));
        }
        self.eat_space();

        if self.peek_is(',') {
            self.push_token_at(TokenType::Comma, self.i);
            self.i += 1;
            self.eat_space();
            expr.meta_ident = Some(Box::new(first));

            let entry = self.parse_expression();
            if !matches!(entry, Node::IdentifierLiteral(_)) {
                return Err(ParsingError::unspecified(UNTERMINATED_WALK_EXPR_MISSING_ENTRY_VARIABLE_NAME));
            }
            expr.entry_ident = Some(Box::new(entry));
            self.eat_space();
        } else {
            expr.entry_ident = Some(Box::new(first));
        }

        let body = self
            .parse_keyword_expression_body()
            .ok_or_else(|| ParsingError::unspecified(UNTERMINATED_WALK_EXPR_MISSING_BODY))?;
        expr.body = Some(Box::new(body));

        match self.eat_closing_paren(UNTERMINATED_WALK_EXPR_MISSING_CLOSING_PAREN) {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    /// `(switch value { 1, 2 => a; defaultcase => b })`, `(match value { %int n => n })`.
    ///
    /// Cases are separated by newlines or semicolons.
    fn parse_switch_or_match_expression(&mut self, opening_paren: usize, keyword: NodeSpan, is_match: bool) -> Node {
        let token_type = if is_match {
            TokenType::MatchKeyword
        } else {
            TokenType::SwitchKeyword
        };
        self.push_keyword(token_type, keyword.start);
        self.eat_space();

        let (missing_value, missing_body, missing_closing_brace, invalid_value) = if is_match {
            (
                UNTERMINATED_MATCH_EXPR_MISSING_VALUE,
                UNTERMINATED_MATCH_EXPR_MISSING_BODY,
                UNTERMINATED_MATCH_EXPR_MISSING_CLOSING_BRACE,
                INVALID_MATCH_CASE_VALUE_EXPLANATION,
            )
        } else {
            (
                UNTERMINATED_SWITCH_EXPR_MISSING_VALUE,
                UNTERMINATED_SWITCH_EXPR_MISSING_BODY,
                UNTERMINATED_SWITCH_EXPR_MISSING_CLOSING_BRACE,
                INVALID_SWITCH_CASE_VALUE_EXPLANATION,
            )
        };

        let mut cases: Vec<Node> = Vec::new();
        let mut default_cases: Vec<Node> = Vec::new();

        let (discriminant, error) = 'parse: {
            if self.is_expression_end() {
                break 'parse (self.missing_at_cursor(), Some(ParsingError::unspecified(missing_value)));
            }

            let discriminant = self.parse_expression();
            self.eat_space();
            if !self.peek_is('{') {
                break 'parse (discriminant, Some(ParsingError::unspecified(missing_body)));
            }
            self.push_token_at(TokenType::OpeningCurlyBracket, self.i);
            self.i += 1;

            self.parse_expression_cases(is_match, invalid_value, &mut cases, &mut default_cases);

            if !self.peek_is('}') {
                break 'parse (discriminant, Some(ParsingError::unspecified(missing_closing_brace)));
            }
            self.push_token_at(TokenType::ClosingCurlyBracket, self.i);
            self.i += 1;

            let error = self.eat_closing_paren(UNTERMINATED_SWITCH_OR_MATCH_EXPR_MISSING_CLOSING_PAREN);
            (discriminant, error)
        };

        let base = NodeBase::with_opt_error(self.span_from(opening_paren), error);
        let discriminant = Box::new(discriminant);
        if is_match {
            MatchExpression {
                base,
                discriminant,
                cases,
                default_cases,
            }
            .into()
        } else {
            SwitchExpression {
                base,
                discriminant,
                cases,
                default_cases,
            }
            .into()
        }
    }

    /// Cases of a switch or match expression, up to the closing brace (not consumed).
    fn parse_expression_cases(
        &mut self,
        is_match: bool,
        invalid_value: &'static str,
        cases: &mut Vec<Node>,
        default_cases: &mut Vec<Node>,
    ) {
        let default_keyword = keywords::as_str(KeywordId::Defaultcase);

        'cases: while !self.is_interrupted() {
            self.eat_space_newline_semicolon_comment();
            if self.peek().is_none_or(|c| c == '}') {
                break;
            }

            if self.at_word(default_keyword) {
                let start = self.i;
                self.push_keyword(TokenType::DefaultcaseKeyword, start);
                self.i += default_keyword.len();
                self.eat_space();

                let (result, mut error) = self.parse_case_result();
                if !default_cases.is_empty() && error.is_none() {
                    error = Some(ParsingError::unspecified(DEFAULT_CASE_MUST_BE_UNIQUE));
                }
                default_cases.push(
                    DefaultCaseWithResult {
                        base: NodeBase::with_opt_error(self.span_from(start), error),
                        result: result.map(Box::new),
                    }
                    .into(),
                );
                continue;
            }

            let case_start = self.i;
            let mut values = Vec::new();
            let mut case_error = None;
            let mut group_matching_variable = None;

            loop {
                let value = self.parse_expression();
                if value.is_missing_expr() {
                    if let Some(c) = self.peek().filter(|&c| c != '}') {
                        values.push(self.unexpected_char_node(fmt_unexpected_char_in_switch_or_match_statement(c)));
                    }
                    cases.push(make_expression_case(
                        is_match,
                        self.span_from(case_start),
                        case_error,
                        values,
                        None,
                        None,
                    ));
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
                    Some(c) if is_match && is_alpha(c) => {
                        group_matching_variable = Some(self.parse_expression());
                        self.eat_space();
                        break;
                    }
                    _ => break,
                }
            }

            let (result, result_error) = self.parse_case_result();
            cases.push(make_expression_case(
                is_match,
                self.span_from(case_start),
                case_error.or(result_error),
                values,
                group_matching_variable,
                result,
            ));
        }
    }

    /// `=> result`
    fn parse_case_result(&mut self) -> (Option<Node>, Option<ParsingError>) {
        if !self.at_str("=>") {
            return (None, Some(ParsingError::unspecified(UNTERMINATED_CASE_MISSING_ARROW)));
        }
        self.push_token(TokenType::Arrow, self.i, self.i + 2);
        self.i += 2;
        self.eat_space();

        if self.is_expression_end() {
            return (None, Some(ParsingError::unspecified(UNTERMINATED_CASE_MISSING_RESULT)));
        }
        (Some(self.parse_expression()), None)
    }
}

/// Whether the right side of an `and`/`or` chain uses the other operator without parentheses.
fn mixes_and_or(chain_operator: BinaryOperator, right: &Node) -> bool {
    let complement = if chain_operator == BinaryOperator::And {
        BinaryOperator::Or
    } else {
        BinaryOperator::And
    };
    let Node::BinaryExpression(right) = right else {
        return false;
    };
    if right.base.is_parenthesized {
        return false;
    }
    if right.operator == complement {
        return true;
    }
    [&right.left, &right.right].into_iter().any(|operand| {
        matches!(&**operand, Node::BinaryExpression(sub) if !sub.base.is_parenthesized && sub.operator == complement)
    })
}

fn make_expression_case(
    is_match: bool,
    span: NodeSpan,
    error: Option<ParsingError>,
    values: Vec<Node>,
    group_matching_variable: Option<Node>,
    result: Option<Node>,
) -> Node {
    let base = NodeBase::with_opt_error(span, error);
    let result = result.map(Box::new);
    if is_match {
        MatchExpressionCase {
            base,
            values,
            group_matching_variable: group_matching_variable.map(Box::new),
            result,
        }
        .into()
    } else {
        SwitchExpressionCase { base, values, result }.into()
    }
}
