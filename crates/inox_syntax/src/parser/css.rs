/// CSS selector expressions: `s!div.item > a[href^="https"]:not(.hidden)!`.
///
/// A selector ends at the end of the line, at a closing delimiter or at a terminating `!`.
///
/// ## Notes
/// - This file is `include!`'d into `crate::parser`.
/// - Spaces are descendant combinators unless they surround another combinator.
impl<'a> Parser<'a> {
    /// `start` is the index of the `s` of the `s!` prefix; the cursor is right after the `!`.
    fn parse_css_selector_expression(&mut self, start: usize) -> Node {
        self.push_token(TokenType::CssSelectorPrefix, start, self.i);

        if self.at_end() {
            return InvalidCssSelectorNode {
                base: NodeBase::with_error(
                    NodeSpan::new(self.i - 1, self.i),
                    ParsingError::unspecified(EMPTY_CSS_SELECTOR),
                ),
            }
            .into();
        }

        let elements = self.parse_css_selector_elements(false);
        if self.peek_is('!') {
            self.push_token_at(TokenType::ExclamationMark, self.i);
            self.i += 1;
        }

        CssSelectorExpression {
            base: NodeBase::new(self.span_from(start)),
            elements,
        }
        .into()
    }

    /// Elements up to the end of the selector; with `in_arguments` the list also ends at `)`.
    fn parse_css_selector_elements(&mut self, in_arguments: bool) -> Vec<Node> {
        let mut elements = Vec::new();
        let mut ignore_next_space = in_arguments;

        while let Some(c) = self.peek() {
            if is_css_selector_end(c) {
                break;
            }
            let element_start = self.i;
            let Some(element) = self.parse_css_selector_element(ignore_next_space) else {
                ignore_next_space = false;
                continue;
            };

            ignore_next_space = matches!(element, Node::CssCombinator(_));
            if element.error().is_some() && self.i == element_start {
                self.i += 1;
            }
            elements.push(element);
        }
        elements
    }

    /// ## Returns
    /// - `None` for spaces that are not a descendant combinator.
    fn parse_css_selector_element(&mut self, ignore_next_space: bool) -> Option<Node> {
        let start = self.i;
        let c = self.peek()?;

        let element: Node = match c {
            '>' | '~' | '+' => {
                self.i += 1;
                CssCombinator {
                    base: NodeBase::new(self.span_from(start)),
                    name: c.to_string(),
                }
                .into()
            }
            '.' | '#' => {
                self.i += 1;
                let (name, error) = self.parse_css_name(if c == '.' {
                    UNTERMINATED_CSS_CLASS_SELECTOR_NAME_EXPECTED
                } else {
                    UNTERMINATED_CSS_ID_SELECTOR_NAME_EXPECTED
                });
                let base = NodeBase::with_opt_error(self.span_from(start), error);
                if c == '.' {
                    CssClassSelector { base, name }.into()
                } else {
                    CssIdSelector { base, name }.into()
                }
            }
            '[' => self.parse_css_attribute_selector(),
            ':' if self.next_is(1, ':') => {
                self.i += 2;
                let (name, error) = self.parse_css_name(INVALID_PSEUDO_CSS_SELECTOR_INVALID_NAME);
                CssPseudoElementSelector {
                    base: NodeBase::with_opt_error(self.span_from(start), error),
                    name,
                }
                .into()
            }
            ':' => {
                self.i += 1;
                if self.at_end() {
                    return Some(
                        InvalidCssSelectorNode {
                            base: NodeBase::with_error(self.span_from(start), ParsingError::unspecified(INVALID_CSS_SELECTOR)),
                        }
                        .into(),
                    );
                }
                self.parse_css_pseudo_class_selector(start)
            }
            ' ' | '\t' => {
                self.eat_space();
                let at_other_combinator = self
                    .peek()
                    .is_none_or(|c| is_non_space_css_combinator(c) || is_css_selector_end(c));
                if at_other_combinator || ignore_next_space {
                    return None;
                }
                CssCombinator {
                    base: NodeBase::new(self.span_from(start)),
                    name: " ".to_string(),
                }
                .into()
            }
            '*' => {
                self.i += 1;
                CssTypeSelector {
                    base: NodeBase::new(self.span_from(start)),
                    name: "*".to_string(),
                }
                .into()
            }
            c if is_alpha(c) => {
                self.eat_ident_chars();
                CssTypeSelector {
                    base: NodeBase::new(self.span_from(start)),
                    name: self.text(start, self.i),
                }
                .into()
            }
            _ => InvalidCssSelectorNode {
                base: NodeBase::with_error(self.span_from(start), ParsingError::unspecified(EMPTY_CSS_SELECTOR)),
            }
            .into(),
        };
        Some(element)
    }

    /// Name of a class, id or pseudo selector, it should start with a letter.
    fn parse_css_name(&mut self, missing_name_message: &str) -> (String, Option<ParsingError>) {
        if !self.peek_matches(is_alpha) {
            return (String::new(), Some(ParsingError::unspecified(missing_name_message)));
        }
        let start = self.i;
        self.eat_ident_chars();
        (self.text(start, self.i), None)
    }

    /// `:name` or `:name(selector)`; the cursor is after the colon.
    fn parse_css_pseudo_class_selector(&mut self, start: usize) -> Node {
        let (name, mut error) = self.parse_css_name(INVALID_CSS_CLASS_SELECTOR_INVALID_NAME);
        let mut arguments = Vec::new();

        if error.is_none() && self.peek_is('(') {
            self.push_token_at(TokenType::OpeningParenthesis, self.i);
            self.i += 1;
            arguments = self.parse_css_selector_elements(true);
            if self.peek_is(')') {
                self.push_token_at(TokenType::ClosingParenthesis, self.i);
                self.i += 1;
            } else {
                error = Some(ParsingError::unspecified(INVALID_CSS_SELECTOR));
            }
        }

        CssPseudoClassSelector {
            base: NodeBase::with_opt_error(self.span_from(start), error),
            name,
            arguments,
        }
        .into()
    }

    /// `[name]`, `[name=value]` or `[name op= value]` with op among `~ * ^ | $`.
    fn parse_css_attribute_selector(&mut self) -> Node {
        let start = self.i;
        self.push_token_at(TokenType::OpeningBracket, start);
        self.i += 1;

        let name_start = self.i;
        let mut matcher = String::new();
        let mut value = None;

        let error = 'parse: {
            if self.at_end() {
                break 'parse Some(UNTERMINATED_CSS_ATTR_SELECTOR_NAME_EXPECTED);
            }
            if !self.peek_matches(is_alpha) {
                break 'parse Some(CSS_ATTRIBUTE_NAME_SHOULD_START_WITH_ALPHA_CHAR);
            }
            self.eat_ident_chars();

            match self.peek() {
                None => break 'parse Some(UNTERMINATED_CSS_ATTR_SELECTOR_PATTERN_EXPECTED_AFTER_NAME),
                Some(']') => {}
                Some('=') => {
                    matcher = "=".to_string();
                    self.push_raw_token(TokenType::CssSelectorSlice, self.i, self.i + 1);
                    self.i += 1;
                }
                Some('~' | '*' | '^' | '|' | '$') if self.next_is(1, '=') => {
                    matcher = self.text(self.i, self.i + 2);
                    self.push_raw_token(TokenType::CssSelectorSlice, self.i, self.i + 2);
                    self.i += 2;
                }
                Some(_) => break 'parse Some(UNTERMINATED_CSS_ATTR_SELECTOR_INVALID_PATTERN),
            }

            if !matcher.is_empty() {
                let saved = std::mem::replace(&mut self.in_pattern, false);
                value = Some(self.parse_expression());
                self.in_pattern = saved;
            }

            if !self.peek_is(']') {
                break 'parse Some(UNTERMINATED_CSS_ATTRIBUTE_SELECTOR_MISSING_BRACKET);
            }
            self.push_token_at(TokenType::ClosingBracket, self.i);
            self.i += 1;
            None
        };

        let name_end = self.i.min(name_start + self.s[name_start..].iter().take_while(|&&c| is_ident_char(c)).count());
        let attribute_name: Node = if name_end > name_start {
            IdentifierLiteral {
                base: NodeBase::new(NodeSpan::new(name_start, name_end)),
                name: self.text(name_start, name_end),
            }
            .into()
        } else {
            missing_at(name_start)
        };

        CssAttributeSelector {
            base: NodeBase::with_opt_error(self.span_from(start), error.map(ParsingError::unspecified)),
            attribute_name: Box::new(attribute_name),
            matcher,
            value: value.map(Box::new),
        }
        .into()
    }
}

fn is_css_selector_end(c: char) -> bool {
    matches!(c, '\n' | '!' | ')' | '}' | ']' | ',' | ';')
}
