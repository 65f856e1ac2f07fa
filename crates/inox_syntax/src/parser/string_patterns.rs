/// Complex string patterns: `%str('a'+ (|'b' | 'c') name:%int)`.
///
/// A piece is a sequence of elements, each optionally named (`name:`) and followed by an
/// occurrence modifier (`+`, `*`, `?` or `=count`). Elements are string and rune literals,
/// integer ranges, pattern names, regex literals, parenthesized pieces and unions.
///
/// ## Notes
/// - This file is `include!`'d into `crate::parser`.
/// - A piece whose content starts with `|` is a union: `%str(| 'a' | 'b')`.

/// Where a string pattern piece is located, it decides how the piece ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StringPatternPieceKind {
    /// `str(...)`
    Root,
    /// `(...)` inside another piece.
    Parenthesized,
    /// A case of a union, it ends at the next `|` or `)` which are not consumed.
    UnionCase,
}

impl<'a> Parser<'a> {
    /// `%str(...)` or `str(...)` in a pattern; `ident` is the span of `%str`/`str` and the cursor
    /// is on the opening parenthesis.
    fn parse_complex_string_pattern_piece(&mut self, ident: NodeSpan, unprefixed: bool) -> Node {
        if unprefixed {
            self.push_raw_token(TokenType::UnprefixedPatternIdentifierLiteral, ident.start, ident.end);
        } else {
            self.push_token(TokenType::PercentStr, ident.start, ident.end);
        }
        self.push_token_at(TokenType::OpeningParenthesis, self.i);
        self.i += 1;

        let mut piece = self.parse_string_pattern_piece(ident.start, StringPatternPieceKind::Root);
        if let Node::ComplexStringPatternPiece(p) = &mut piece {
            p.unprefixed = unprefixed;
        }
        piece
    }

    /// Elements of a piece; the cursor is right after the opening parenthesis (or on the first
    /// element of a union case).
    fn parse_string_pattern_piece(&mut self, start: usize, kind: StringPatternPieceKind) -> Node {
        if !self.enter_nested() {
            return self.missing_at_cursor();
        }

        let is_piece_end = |c: char| c == ')' || (kind == StringPatternPieceKind::UnionCase && c == '|');
        let mut elements = Vec::new();

        loop {
            self.eat_space_newline_comment();
            let Some(c) = self.peek().filter(|&c| !is_piece_end(c)) else {
                break;
            };

            if c == '|' {
                let union = self.parse_string_pattern_union(self.i, true);
                elements.push(
                    PatternPieceElement {
                        base: NodeBase::new(union.span()),
                        occurrence: OccurrenceModifier::ExactlyOne,
                        exact_occurrence_count: 0,
                        expr: Box::new(union),
                        group_name: None,
                    }
                    .into(),
                );
                break;
            }

            elements.push(self.parse_string_pattern_piece_element());
        }

        let mut error = None;
        if kind != StringPatternPieceKind::UnionCase {
            if self.peek_is(')') {
                self.push_token_at(TokenType::ClosingParenthesis, self.i);
                self.i += 1;
            } else {
                error = Some(ParsingError::unspecified(UNTERMINATED_COMPLEX_STRING_PATT_MISSING_CLOSING_BRACKET));
            }
        }
        self.leave_nested();

        ComplexStringPatternPiece {
            base: NodeBase::with_opt_error(self.span_from(start), error),
            unprefixed: false,
            elements,
        }
        .into()
    }

    /// `[name:] element [modifier]`
    fn parse_string_pattern_piece_element(&mut self) -> Node {
        let start = self.i;
        let group_name = self.parse_pattern_group_name_if_present();
        let expr = self.parse_string_pattern_element();
        let mut end = self.i;

        let mut occurrence = OccurrenceModifier::ExactlyOne;
        let mut exact_occurrence_count = 0;
        let mut error = None;

        match self.peek() {
            Some(c @ ('+' | '*' | '?')) => {
                occurrence = match c {
                    '+' => OccurrenceModifier::AtLeastOne,
                    '*' => OccurrenceModifier::ZeroOrMore,
                    _ => OccurrenceModifier::Optional,
                };
                self.push_raw_token(TokenType::OccurrenceModifier, self.i, self.i + 1);
                self.i += 1;
                end = self.i;
            }
            Some('=') => {
                self.i += 1;
                let count_start = self.i;
                while self.peek_matches(is_dec_digit) {
                    self.i += 1;
                }
                end = self.i;

                if count_start == self.i {
                    error = Some(ParsingError::unspecified(UNTERMINATED_PATT_UNTERMINATED_EXACT_OCURRENCE_COUNT));
                } else {
                    match self.text(count_start, self.i).parse::<u32>() {
                        Ok(count) => exact_occurrence_count = count as usize,
                        Err(_) => error = Some(ParsingError::unspecified(INVALID_PATTERN_INVALID_OCCURENCE_COUNT)),
                    }
                    occurrence = OccurrenceModifier::Exact;
                    self.push_raw_token(TokenType::OccurrenceModifier, count_start - 1, self.i);
                }
            }
            _ => {}
        }

        PatternPieceElement {
            base: NodeBase::with_opt_error(NodeSpan::new(start, end), error),
            occurrence,
            exact_occurrence_count,
            expr: Box::new(expr),
            group_name: group_name.map(Box::new),
        }
        .into()
    }

    /// `name:` before an element. Names contain letters, digits, `_` and `-`.
    fn parse_pattern_group_name_if_present(&mut self) -> Option<Node> {
        let start = self.i;
        if !self.peek_matches(is_alpha) {
            return None;
        }

        let name_len = self.s[start + 1..]
            .iter()
            .take_while(|&&c| is_alpha(c) || is_dec_digit(c) || c == '_' || c == '-')
            .count();
        let end = start + 1 + name_len;
        if self.char_at(end) != Some(':') {
            return None;
        }

        let name = self.text(start, end);
        let error = name
            .ends_with('-')
            .then(|| ParsingError::unspecified(INVALID_GROUP_NAME_SHOULD_NOT_END_WITH_DASH));
        self.push_token_at(TokenType::Colon, end);
        self.i = end + 1;
        self.eat_space();

        Some(
            PatternGroupName {
                base: NodeBase::with_opt_error(NodeSpan::new(start, end), error),
                name,
            }
            .into(),
        )
    }

    fn parse_string_pattern_element(&mut self) -> Node {
        let start = self.i;
        let invalid = |parser: &Self, message: String| -> Node {
            InvalidComplexStringPatternElement {
                base: NodeBase::with_error(parser.span_from(start), ParsingError::unspecified(message)),
            }
            .into()
        };

        let Some(c) = self.peek().filter(|&c| c != ')' && c != '|') else {
            return invalid(&*self, fmt_a_pattern_was_expected_here(self.s, self.i));
        };

        match c {
            '(' => {
                self.i += 1;
                match self.peek() {
                    None | Some(')') => invalid(&*self, UNTERMINATED_STRING_PATTERN_ELEMENT.to_string()),
                    Some('|') => self.parse_string_pattern_union(start, false),
                    _ => {
                        self.push_token_at(TokenType::OpeningParenthesis, start);
                        self.parse_string_pattern_piece(start, StringPatternPieceKind::Parenthesized)
                    }
                }
            }
            '"' | '`' | '\'' => self.parse_expression(),
            '-' | '0'..='9' => {
                let expr = self.parse_expression();
                if matches!(expr, Node::IntegerRangeLiteral(_)) {
                    return expr;
                }
                InvalidComplexStringPatternElement {
                    base: NodeBase::with_error(expr.span(), ParsingError::unspecified(INVALID_COMPLEX_PATTERN_ELEMENT)),
                }
                .into()
            }
            c if is_alpha(c) => {
                self.eat_ident_chars();
                PatternIdentifierLiteral {
                    base: NodeBase::new(self.span_from(start)),
                    unprefixed: true,
                    name: self.text(start, self.i),
                }
                .into()
            }
            '%' if self.next_is(1, '`') => self.parse_percent_prefixed_pattern(false),
            _ => {
                while self.peek().is_some_and(|c| !is_delim(c) && c != '"' && c != '\'') {
                    self.i += 1;
                }
                if self.i == start {
                    let message = fmt_a_pattern_was_expected_here(self.s, self.i);
                    self.i += 1;
                    return invalid(&*self, message);
                }
                invalid(&*self, INVALID_COMPLEX_PATTERN_ELEMENT.to_string())
            }
        }
    }

    /// `(| a | b)`, or the `| a | b` shorthand filling the rest of a piece. The cursor is on the
    /// first pipe.
    fn parse_string_pattern_union(&mut self, start: usize, shorthand: bool) -> Node {
        if !shorthand {
            self.push_token_at(TokenType::OpeningParenthesis, start);
        }

        let mut cases = Vec::new();
        loop {
            self.eat_space_newline_comment();
            let Some(c) = self.peek().filter(|&c| c != ')') else {
                break;
            };

            if c != '|' {
                while self.peek().is_some_and(|c| c != ')') {
                    self.i += 1;
                }
                return PatternUnion {
                    base: NodeBase::with_error(
                        self.span_from(start),
                        ParsingError::unspecified(INVALID_PATT_UNION_ELEMENT_SEPARATOR_EXPLANATION),
                    ),
                    cases,
                }
                .into();
            }
            self.push_sub_token(TokenType::Pipe, TokenSubType::StringPatternUnionPipe, self.i, self.i + 1);
            self.i += 1;
            self.eat_space_newline_comment();

            if self.peek().is_none_or(|c| c == ')' || c == '|') {
                cases.push(
                    InvalidComplexStringPatternElement {
                        base: NodeBase::with_error(
                            NodeSpan::new(self.i, self.i),
                            ParsingError::unspecified(fmt_a_pattern_was_expected_here(self.s, self.i)),
                        ),
                    }
                    .into(),
                );
                continue;
            }

            let piece = self.parse_string_pattern_piece(self.i, StringPatternPieceKind::UnionCase);
            cases.push(simplify_union_case(piece));
        }

        let mut error = None;
        if !shorthand {
            if self.peek_is(')') {
                self.push_token_at(TokenType::ClosingParenthesis, self.i);
                self.i += 1;
            } else {
                error = Some(ParsingError::unspecified(UNTERMINATED_UNION_MISSING_CLOSING_PAREN));
            }
        }

        PatternUnion {
            base: NodeBase::with_opt_error(self.span_from(start), error),
            cases,
        }
        .into()
    }
}

/// A union case made of a single unnamed element without modifier is the element itself.
fn simplify_union_case(piece: Node) -> Node {
    let Node::ComplexStringPatternPiece(mut piece) = piece else {
        return piece;
    };
    let is_simple = piece.elements.len() == 1
        && matches!(
            &piece.elements[0],
            Node::PatternPieceElement(e)
                if e.occurrence == OccurrenceModifier::ExactlyOne && e.group_name.is_none() && !e.base.is_parenthesized
        );
    match piece.elements.pop() {
        Some(Node::PatternPieceElement(element)) if is_simple => *element.expr,
        Some(element) => {
            piece.elements.push(element);
            Node::ComplexStringPatternPiece(piece)
        }
        None => Node::ComplexStringPatternPiece(piece),
    }
}
