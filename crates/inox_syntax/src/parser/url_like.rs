/// Scheme, host and URL literals, URL expressions and their pattern counterparts.
///
/// The text of a URL-like literal is scanned first (up to a space or a delimiter other than
/// `:` and `{`), then classified with the loose regexes of [`crate::url`] and validated.
///
/// ## Notes
/// - This file is `include!`'d into `crate::parser`.
/// - The `?` and `&` tokens of URL expressions are synthesized from the node, they are not pushed
///   here.
impl<'a> Parser<'a> {
    /// Parse a scheme, host, URL or URL expression; the cursor is on the `:` of `://` and `start`
    /// is the start of the scheme name (`start == self.i` for schemeless hosts).
    fn parse_url_like(&mut self, start: usize) -> Node {
        if self.in_pattern {
            self.i += 1;
            return self.parse_url_like_pattern(start, false);
        }

        self.i += 3;
        let after_scheme = self.i;
        self.eat_url_like_text(true);

        let u = self.text(start, self.i);
        let span = self.span_from(start);

        if self.i == after_scheme {
            let name = self.text(start, after_scheme - 3);
            let error = name
                .is_empty()
                .then(|| ParsingError::unspecified(INVALID_SCHEME_LIT_MISSING_SCHEME));
            return SchemeLiteral {
                base: NodeBase::with_opt_error(span, error),
                name,
            }
            .into();
        }

        if LOOSE_HOST_REGEX.is_match(&u) {
            return HostLiteral {
                base: NodeBase::with_opt_error(span, check_host(&u).err()),
                value: u,
            }
            .into();
        }

        if u.contains('{') && LOOSE_URL_EXPR_REGEX.is_match(&u) {
            return self.parse_url_expression(start, after_scheme, u);
        }

        if LOOSE_URL_REGEX.is_match(&u) {
            let has_path = u[u.find("://").map_or(0, |i| i + 3)..].contains('/');
            match check_url(&u) {
                Ok(true) => {
                    return URLLiteral {
                        base: NodeBase::new(span),
                        value: u,
                    }
                    .into();
                }
                Err(err) if has_path => {
                    return URLLiteral {
                        base: NodeBase::with_error(span, err),
                        value: u,
                    }
                    .into();
                }
                Err(err) => {
                    return InvalidURL {
                        base: NodeBase::with_error(span, err),
                        value: u,
                    }
                    .into();
                }
                Ok(false) => {}
            }
        }

        InvalidURL {
            base: NodeBase::with_error(span, ParsingError::unspecified(INVALID_URL_OR_HOST)),
            value: u,
        }
        .into()
    }

    /// Move the cursor past the text of a URL-like literal. `{...}` interpolations are skipped
    /// as a whole; a `:` is only part of the literal if followed by a non-delimiter.
    fn eat_url_like_text(&mut self, stop_at_newline_in_interpolation: bool) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() || (is_delim(c) && c != ':' && c != '{') {
                break;
            }
            match c {
                '{' => {
                    self.i += 1;
                    while self
                        .peek()
                        .is_some_and(|c| c != '}' && !(stop_at_newline_in_interpolation && c == '\n'))
                    {
                        self.i += 1;
                    }
                    if self.peek_is('}') {
                        self.i += 1;
                    }
                }
                ':' => match self.char_at(self.i + 1) {
                    Some(next) if !next.is_whitespace() && (!is_delim(next) || next == '{') => self.i += 1,
                    _ => break,
                },
                _ => self.i += 1,
            }
        }
    }

    /// `https://{host}/users/{id}?page={n}`: a URL with an interpolated host, path or query.
    fn parse_url_expression(&mut self, start: usize, after_scheme: usize, raw: String) -> Node {
        let end = self.i;
        let mut error: Option<ParsingError> = None;

        let query_start = self.s[after_scheme..end]
            .iter()
            .position(|&c| c == '?')
            .map(|offset| after_scheme + offset);
        let path_end = query_start.unwrap_or(end);

        let mut path_start = after_scheme;
        let mut host_interpolation: Option<(usize, usize)> = None;

        if self.s.get(after_scheme) == Some(&'{') {
            self.push_sub_token(
                TokenType::OpeningCurlyBracket,
                TokenSubType::HostInterpOpeningBrace,
                after_scheme,
                after_scheme + 1,
            );
            let closing = self.s[after_scheme..path_end]
                .iter()
                .position(|&c| c == '}')
                .map_or(path_end, |offset| after_scheme + offset);
            if closing < path_end {
                self.push_sub_token(
                    TokenType::ClosingCurlyBracket,
                    TokenSubType::HostInterpClosingBrace,
                    closing,
                    closing + 1,
                );
            }
            host_interpolation = Some((after_scheme + 1, closing));
            path_start = (closing + 1).min(path_end);
        } else {
            while path_start < path_end && !matches!(self.s[path_start], '/' | '{') {
                path_start += 1;
            }
        }

        let path = self.parse_path_expression_slices(path_start, path_end);

        if raw.contains("}{") {
            error = Some(ParsingError::unspecified(URL_EXPR_CANNOT_CONTAIN_INTERP_NEXT_TO_EACH_OTHER));
        } else if query_start.is_none() && raw.ends_with("/...") {
            error = Some(ParsingError::unspecified(URL_EXPR_CANNOT_END_WITH_SLASH_3DOTS));
        }

        let mut query_params: Vec<Node> = Vec::new();
        if let Some(query_start) = query_start {
            let mut j = query_start + 1;
            while j < end {
                let key_start = j;
                while j < end && self.s[j] != '=' && self.s[j] != '&' {
                    j += 1;
                }
                let key = self.text(key_start, j);
                let key_chars = &self.s[key_start..j];

                if j >= end || self.s[j] == '&' {
                    error.get_or_insert_with(|| ParsingError::unspecified(fmt_invalid_query_missing_equal_sign_after_key(&key)));
                } else {
                    j += 1;
                }
                if contains_not_escaped_bracket(key_chars) || contains_not_escaped_dollar(key_chars) {
                    error.get_or_insert_with(|| ParsingError::unspecified(fmt_invalid_query_keys_cannot_contain_dollar(&key)));
                }

                let value_start = j;
                while j < end && self.s[j] != '&' {
                    j += 1;
                }
                let value = self.parse_query_parameter_value_slices(value_start, j);

                query_params.push(
                    URLQueryParameter {
                        base: NodeBase::new(NodeSpan::new(key_start, j)),
                        name: key,
                        value,
                    }
                    .into(),
                );

                while j < end && self.s[j] == '&' {
                    j += 1;
                }
            }
        }

        let host_raw = self.text(start, path_start);
        let host_span = NodeSpan::new(start, path_start);
        let host_part: Node = match host_interpolation {
            Some((host_start, host_end)) => {
                let scheme: Node = SchemeLiteral {
                    base: NodeBase::new(NodeSpan::new(start, after_scheme)),
                    name: self.text(start, after_scheme - 3),
                }
                .into();
                let (host, ok) = if host_start < host_end {
                    self.parse_interpolation(host_start, host_end)
                } else {
                    (missing_at(host_start), false)
                };
                if !ok {
                    error.get_or_insert_with(|| ParsingError::unspecified(INVALID_HOST_INTERPOLATION));
                }
                HostExpression {
                    base: NodeBase::new(host_span),
                    scheme: Box::new(scheme),
                    host: Box::new(host),
                    raw: host_raw.clone(),
                }
                .into()
            }
            None => HostLiteral {
                base: NodeBase::with_opt_error(host_span, check_host(&host_raw).err()),
                value: host_raw,
            }
            .into(),
        };

        if path.is_empty() && query_start.is_none() && matches!(host_part, Node::HostExpression(_)) {
            let mut host_part = host_part;
            let base = host_part.base_mut();
            base.span = NodeSpan::new(start, end);
            if base.error.is_none() {
                base.error = error;
            }
            return host_part;
        }

        URLExpression {
            base: NodeBase::with_opt_error(NodeSpan::new(start, end), error),
            raw,
            host_part: Box::new(host_part),
            path,
            query_params,
        }
        .into()
    }

    /// Split the value of a query parameter into text slices and `{expr}` interpolations.
    fn parse_query_parameter_value_slices(&mut self, start: usize, end: usize) -> Vec<Node> {
        let mut slices: Vec<Node> = Vec::new();
        let mut slice_start = start;
        let mut j = start;

        let text_slice = |parser: &Self, start: usize, end: usize, message: Option<&str>| -> Node {
            URLQueryParameterValueSlice {
                base: NodeBase::with_opt_error(NodeSpan::new(start, end), message.map(ParsingError::unspecified)),
                value: parser.text(start, end),
            }
            .into()
        };

        while j < end {
            if self.s[j] != '{' {
                j += 1;
                continue;
            }

            if j > slice_start {
                slices.push(text_slice(&*self, slice_start, j, None));
            }
            self.push_sub_token(
                TokenType::OpeningCurlyBracket,
                TokenSubType::QueryParamInterpOpeningBrace,
                j,
                j + 1,
            );

            let interp_start = j + 1;
            let closing = self.s[interp_start..end]
                .iter()
                .position(|&c| c == '}')
                .map(|offset| interp_start + offset);
            let interp_end = closing.unwrap_or(end);

            if closing.is_none() && interp_start == interp_end {
                slices.push(text_slice(&*self, interp_start, interp_start, Some(UNTERMINATED_QUERY_PARAM_INTERP)));
                return slices;
            }

            if self.s[interp_start..interp_end]
                .iter()
                .any(|&c| !is_interpolation_allowed_char(c))
            {
                slices.push(text_slice(&*self, interp_start, interp_end, Some(QUERY_PARAM_INTERP_EXPLANATION)));
            } else if interp_start == interp_end {
                slices.push(self.invalid_interpolation_slice(interp_start, interp_end, EMPTY_QUERY_PARAM_INTERP));
            } else {
                let tokens_before = self.tokens.len();
                let (expr, ok) = self.parse_interpolation(interp_start, interp_end);
                if ok {
                    slices.push(expr);
                } else {
                    self.tokens.truncate(tokens_before);
                    slices.push(self.invalid_interpolation_slice(interp_start, interp_end, INVALID_QUERY_PARAM_INTERP));
                }
            }

            match closing {
                Some(closing) => {
                    self.push_sub_token(
                        TokenType::ClosingCurlyBracket,
                        TokenSubType::QueryParamInterpClosingBrace,
                        closing,
                        closing + 1,
                    );
                    j = closing + 1;
                }
                None => {
                    slices.push(text_slice(
                        &*self,
                        end,
                        end,
                        Some(UNTERMINATED_QUERY_PARAM_INTERP_MISSING_CLOSING_BRACE),
                    ));
                    j = end;
                }
            }
            slice_start = j;
        }

        if slice_start < end {
            slices.push(text_slice(&*self, slice_start, end, None));
        }
        slices
    }

    // ========================================================================
    // Patterns
    // ========================================================================

    /// Parse a host or URL pattern. The cursor is right after the `:` of `://`; `start` is the
    /// `%` if `percent_prefixed`, else the start of the scheme.
    fn parse_url_like_pattern(&mut self, start: usize, percent_prefixed: bool) -> Node {
        let mut leading_slash_count = 0;
        while self.peek_is('/') {
            self.i += 1;
            leading_slash_count += 1;
        }
        self.eat_url_like_text(false);

        let raw = self.text(start, self.i);
        let u = if percent_prefixed {
            raw.chars().skip(1).collect::<String>()
        } else {
            raw.clone()
        };
        let span = self.span_from(start);
        let unprefixed = !percent_prefixed;

        if leading_slash_count != 2 {
            if !percent_prefixed && u.ends_with(":/") && u.matches('/').count() == 1 {
                return InvalidURL {
                    base: NodeBase::with_error(span, ParsingError::unspecified(INVALID_SCHEME_LIT_SLASH_EXPECTED)),
                    value: u,
                }
                .into();
            }
            return InvalidURLPattern {
                base: NodeBase::with_error(
                    span,
                    ParsingError::unspecified(INVALID_URL_OR_HOST_PATT_SCHEME_SHOULD_BE_FOLLOWED_BY_COLON_SLASH_SLASH),
                ),
                value: u,
            }
            .into();
        }

        if LOOSE_HOST_PATTERN_REGEX.is_match(&u) {
            return HostPatternLiteral {
                base: NodeBase::with_opt_error(span, check_host_pattern(&u).err()),
                value: u,
                raw,
                unprefixed,
            }
            .into();
        }

        if raw.ends_with("://") {
            if percent_prefixed {
                return HostPatternLiteral {
                    base: NodeBase::with_error(span, ParsingError::unspecified(UNTERMINATED_HOST_PATT_MISSING_HOSTNAME)),
                    value: u,
                    raw,
                    unprefixed,
                }
                .into();
            }
            return SchemeLiteral {
                base: NodeBase::new(span),
                name: u.trim_end_matches("://").to_string(),
            }
            .into();
        }

        let error = if !LOOSE_URL_REGEX.is_match(&u) {
            Some(ParsingError::unspecified(INVALID_URL_PATT))
        } else if u.contains('?') {
            Some(ParsingError::unspecified(URL_PATT_LITS_WITH_QUERY_PART_NOT_SUPPORTED_YET))
        } else {
            check_url_pattern(&u).err()
        };

        URLPatternLiteral {
            base: NodeBase::with_opt_error(span, error),
            value: u,
            raw,
            unprefixed,
        }
        .into()
    }
}
