/// Path literals, path expressions and path patterns.
///
/// A path starts with `/`, `./` or `../` and runs until a space or a delimiter. `{expr}`
/// interpolations turn it into a path expression, `{:name}` named segments are only allowed in
/// path patterns (`%/users/{:id}`).
///
/// ## Notes
/// - This file is `include!`'d into `crate::parser`.
/// - The characters allowed in interpolations are limited, see `is_interpolation_allowed_char`.
impl<'a> Parser<'a> {
    /// Parse a path, or a path pattern if `is_pattern` (the cursor is then on the `%`).
    fn parse_path_like_expression(&mut self, is_pattern: bool) -> Node {
        let start = self.i;
        if is_pattern {
            self.i += 1;
        }

        let path_start = self.i;
        let is_absolute = self.peek_is('/');
        self.i += 1;

        if !is_absolute {
            while self.peek_is('.') {
                self.i += 1;
            }
            while self.peek_is('/') {
                self.i += 1;
            }
        }

        if self.peek_is('`') {
            return self.parse_quoted_path_literal(start, path_start, is_absolute, is_pattern);
        }

        while let Some(c) = self.peek() {
            if c.is_whitespace() || (is_delim(c) && c != '{') {
                break;
            }
            self.i += 1;
            if c == '{' {
                while self.peek().is_some_and(|c| c != '\n' && c != '}') {
                    self.i += 1;
                }
                if self.peek_is('}') {
                    self.i += 1;
                }
            }
        }

        let raw = self.text(start, self.i);
        let value = self.text(path_start, self.i);
        let mut base = NodeBase::new(self.span_from(start));

        let slices = self.parse_path_expression_slices(path_start, self.i);
        let has_interpolations_or_named_segments = slices.len() > 1;

        if is_pattern && value.contains("/...") {
            let trimmed = value.strip_suffix("/...");
            if trimmed.is_none_or(|rest| rest.contains("/...")) {
                base.error = Some(ParsingError::unspecified(
                    fmt_slash_dot_dot_dot_can_only_be_present_at_end_of_path_pattern(&value),
                ));
            } else if self.slices_contain_globbing(&slices) {
                base.error = Some(ParsingError::unspecified(fmt_prefix_patt_cannot_contain_globbing_pattern(
                    &value,
                )));
                return InvalidPathPattern { base, value }.into();
            }
        }

        if is_pattern {
            if !has_interpolations_or_named_segments {
                return if is_absolute {
                    AbsolutePathPatternLiteral {
                        base,
                        raw,
                        value,
                        unprefixed: false,
                    }
                    .into()
                } else {
                    RelativePathPatternLiteral {
                        base,
                        raw,
                        value,
                        unprefixed: false,
                    }
                    .into()
                };
            }

            self.push_token_at(TokenType::PercentSymbol, start);
            return finish_path_pattern(base, slices, raw, value);
        }

        if slices.iter().any(|s| matches!(s, Node::NamedPathSegment(_))) && base.error.is_none() {
            base.error = Some(ParsingError::unspecified(ONLY_PATH_PATTERNS_CAN_CONTAIN_NAMED_SEGMENTS));
        }

        if has_interpolations_or_named_segments {
            return if is_absolute {
                AbsolutePathExpression { base, slices }.into()
            } else {
                RelativePathExpression { base, slices }.into()
            };
        }

        if is_absolute {
            AbsolutePathLiteral { base, raw, value }.into()
        } else {
            RelativePathLiteral { base, raw, value }.into()
        }
    }

    /// ``/`path with spaces` ``, the backquotes are not part of the value and there are no
    /// interpolations.
    fn parse_quoted_path_literal(&mut self, start: usize, path_start: usize, is_absolute: bool, is_pattern: bool) -> Node {
        self.i += 1;
        while self.peek().is_some_and(|c| c != '`') {
            self.i += 1;
        }

        let error = if self.peek_is('`') {
            self.i += 1;
            None
        } else {
            Some(ParsingError::unspecified(if is_pattern {
                UNTERMINATED_QUOTED_PATH_PATTERN_LIT_MISSING_CLOSING_BACTICK
            } else {
                UNTERMINATED_QUOTED_PATH_LIT_MISSING_CLOSING_BACTICK
            }))
        };

        let raw = self.text(start, self.i);
        let value: String = self.s[path_start..self.i].iter().filter(|&&c| c != '`').collect();
        let base = NodeBase::with_opt_error(self.span_from(start), error);

        match (is_pattern, is_absolute) {
            (true, true) => AbsolutePathPatternLiteral {
                base,
                raw,
                value,
                unprefixed: false,
            }
            .into(),
            (true, false) => RelativePathPatternLiteral {
                base,
                raw,
                value,
                unprefixed: false,
            }
            .into(),
            (false, true) => AbsolutePathLiteral { base, raw, value }.into(),
            (false, false) => RelativePathLiteral { base, raw, value }.into(),
        }
    }

    /// Whether a non-escaped globbing char (`*`, `?`, `[`) appears in the text slices.
    fn slices_contain_globbing(&self, slices: &[Node]) -> bool {
        slices.iter().any(|slice| {
            let Node::PathSlice(slice) = slice else {
                return false;
            };
            let start = slice.base.span.start;
            slice
                .value
                .chars()
                .enumerate()
                .any(|(i, c)| matches!(c, '[' | '*' | '?') && count_prev_backslashes(self.s, start + i) % 2 == 0)
        })
    }

    /// Split `s[start..end]` into [`PathSlice`]s, named segments and interpolated expressions.
    fn parse_path_expression_slices(&mut self, start: usize, end: usize) -> Vec<Node> {
        let mut slices: Vec<Node> = Vec::new();
        let mut slice_start = start;
        let mut j = start;

        while j < end {
            if self.s[j] != '{' {
                j += 1;
                continue;
            }

            slices.push(
                PathSlice {
                    base: NodeBase::new(NodeSpan::new(slice_start, j)),
                    value: self.text(slice_start, j),
                }
                .into(),
            );
            self.push_sub_token(TokenType::OpeningCurlyBracket, TokenSubType::PathInterpOpeningBrace, j, j + 1);

            let interp_start = j + 1;
            let closing = self.s[interp_start..end]
                .iter()
                .position(|&c| c == '}')
                .map(|offset| interp_start + offset);
            let interp_end = closing.unwrap_or(end);

            if closing.is_none() && interp_start == interp_end {
                slices.push(
                    PathSlice {
                        base: NodeBase::with_error(
                            NodeSpan::new(interp_start, interp_start),
                            ParsingError::unspecified(UNTERMINATED_PATH_INTERP),
                        ),
                        value: String::new(),
                    }
                    .into(),
                );
                return slices;
            }

            let slice = self.parse_path_interpolation(interp_start, interp_end);
            slices.push(slice);

            match closing {
                Some(closing) => {
                    self.push_sub_token(
                        TokenType::ClosingCurlyBracket,
                        TokenSubType::PathInterpClosingBrace,
                        closing,
                        closing + 1,
                    );
                    j = closing + 1;
                }
                None => {
                    slices.push(
                        PathSlice {
                            base: NodeBase::with_error(
                                NodeSpan::new(end, end),
                                ParsingError::unspecified(UNTERMINATED_PATH_INTERP_MISSING_CLOSING_BRACE),
                            ),
                            value: String::new(),
                        }
                        .into(),
                    );
                    j = end;
                }
            }
            slice_start = j;
        }

        if slice_start < end {
            slices.push(
                PathSlice {
                    base: NodeBase::new(NodeSpan::new(slice_start, end)),
                    value: self.text(slice_start, end),
                }
                .into(),
            );
        }
        slices
    }

    /// Content of a `{...}` in a path: a named segment `:name` or an expression.
    fn parse_path_interpolation(&mut self, start: usize, end: usize) -> Node {
        if self.s[start..end].iter().any(|&c| !is_interpolation_allowed_char(c)) {
            return self.invalid_interpolation_slice(start, end, PATH_INTERP_EXPLANATION);
        }

        if self.s.get(start) == Some(&':') && start < end {
            let name = self.text(start + 1, end);
            if !name.chars().all(is_ident_char) {
                return self.invalid_interpolation_slice(start, end, INVALID_NAMED_SEGMENT_COLON_SHOULD_BE_FOLLOWED_BY_A_NAME);
            }
            let message = if name.is_empty() {
                Some(INVALID_NAMED_SEGMENT_COLON_SHOULD_BE_FOLLOWED_BY_A_NAME)
            } else if name.starts_with('-') {
                Some(INVALID_NAMED_SEGMENT_PATH_PATTERN_COLON_NAME_SHOULD_NOT_START_WITH_DASH)
            } else if name.ends_with('-') {
                Some(INVALID_NAMED_SEGMENT_PATH_PATTERN_COLON_NAME_SHOULD_NOT_END_WITH_DASH)
            } else {
                None
            };
            return NamedPathSegment {
                base: NodeBase::with_opt_error(NodeSpan::new(start, end), message.map(ParsingError::unspecified)),
                name,
            }
            .into();
        }

        if start == end {
            return self.invalid_interpolation_slice(start, end, EMPTY_PATH_INTERP);
        }

        let tokens_before = self.tokens.len();
        let (expr, ok) = self.parse_interpolation(start, end);
        if !ok {
            self.tokens.truncate(tokens_before);
            return self.invalid_interpolation_slice(start, end, INVALID_PATH_INTERP);
        }
        expr
    }

    /// [`UnknownNode`] standing for an interpolation that cannot be parsed.
    fn invalid_interpolation_slice(&mut self, start: usize, end: usize, message: &str) -> Node {
        self.push_raw_token(TokenType::InvalidInterpSlice, start, end);
        UnknownNode {
            base: NodeBase::with_error(NodeSpan::new(start, end), ParsingError::unspecified(message)),
        }
        .into()
    }
}

/// Build the node of a path pattern containing named segments or interpolations.
fn finish_path_pattern(mut base: NodeBase, slices: Vec<Node>, raw: String, value: String) -> Node {
    let slices: Vec<Node> = slices
        .into_iter()
        .map(|slice| match slice {
            Node::PathSlice(PathSlice { base, value }) => PathPatternSlice { base, value }.into(),
            other => other,
        })
        .collect();

    let has_named_segments = slices.iter().any(|s| matches!(s, Node::NamedPathSegment(_)));
    let has_interpolations = slices
        .iter()
        .any(|s| !matches!(s, Node::NamedPathSegment(_) | Node::PathPatternSlice(_)));

    if has_named_segments && has_interpolations {
        base.error = Some(ParsingError::unspecified(CANNOT_MIX_PATH_INTER_PATH_NAMED_SEGMENT));
        return NamedSegmentPathPatternLiteral {
            base,
            slices,
            raw,
            string_value: String::new(),
        }
        .into();
    }

    if !has_named_segments {
        return PathPatternExpression { base, slices }.into();
    }

    let slice_value = |slice: Option<&Node>| match slice {
        Some(Node::PathPatternSlice(s)) => Some(s.value.clone()),
        _ => None,
    };
    for (j, slice) in slices.iter().enumerate() {
        if !matches!(slice, Node::NamedPathSegment(_)) {
            continue;
        }
        let preceded_by_slash = j
            .checked_sub(1)
            .and_then(|prev| slice_value(slices.get(prev)))
            .is_some_and(|v| v.ends_with('/'));
        let followed_by_slash = match slice_value(slices.get(j + 1)) {
            Some(v) => v.starts_with('/'),
            None => j + 1 >= slices.len(),
        };

        if !preceded_by_slash || !followed_by_slash {
            if base.error.is_none() {
                base.error = Some(ParsingError::unspecified(INVALID_PATH_PATT_NAMED_SEGMENTS));
            }
            return NamedSegmentPathPatternLiteral {
                base,
                slices,
                raw,
                string_value: String::new(),
            }
            .into();
        }
    }

    NamedSegmentPathPatternLiteral {
        base,
        slices,
        raw,
        string_value: format!("%{value}"),
    }
    .into()
}
