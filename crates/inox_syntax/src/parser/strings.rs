/// String-like literals: quoted strings, unquoted strings and email addresses, multiline strings,
/// string templates and runes.
///
/// ## Notes
/// - This file is `include!`'d into `crate::parser`.
/// - Quoted strings use JSON escapes, they are decoded with `serde_json` so that the accepted
///   escapes and the error messages match JSON exactly.
impl<'a> Parser<'a> {
    /// `"..."`, a string that cannot span several lines.
    fn parse_quoted_string_literal(&mut self) -> Node {
        let start = self.i;
        self.i += 1;

        while self
            .peek()
            .is_some_and(|c| c != '\n' && (c != '"' || count_prev_backslashes(self.s, self.i) % 2 == 1))
        {
            self.i += 1;
        }

        if !self.peek_is('"') {
            return DoubleQuotedStringLiteral {
                base: NodeBase::with_error(self.span_from(start), ParsingError::unspecified(UNTERMINATED_QUOTED_STRING_LIT)),
                raw: self.text(start, self.i),
                value: String::new(),
            }
            .into();
        }
        self.i += 1;

        let raw = self.text(start, self.i);
        let (value, error) = match serde_json::from_str::<String>(&raw) {
            Ok(value) => (value, None),
            Err(err) => (
                String::new(),
                Some(ParsingError::unspecified(fmt_invalid_string_lit_json(&err.to_string()))),
            ),
        };

        DoubleQuotedStringLiteral {
            base: NodeBase::with_opt_error(self.span_from(start), error),
            raw,
            value,
        }
        .into()
    }

    /// Unquoted string or email address starting at `start`; the code unit at the cursor is
    /// already known to belong to the string.
    ///
    /// `\:` escapes a colon, the backslashes are removed from the value.
    fn parse_unquoted_string_literal(&mut self, start: usize) -> Node {
        if !self.peek_is('\\') {
            self.i += 1;
        }

        while let Some(c) = self.peek() {
            if c == '\\' && self.next_is(1, ':') {
                self.i += 2;
                continue;
            }
            if !is_unquoted_string_char(c) || (c == '/' && self.next_is(1, '>')) {
                break;
            }
            self.i += 1;
        }

        let raw = self.text(start, self.i);
        let base = NodeBase::new(self.span_from(start));
        if is_email_address(&raw) {
            return EmailAddressLiteral { base, value: raw }.into();
        }

        UnquotedStringLiteral {
            base,
            value: raw.replace('\\', ""),
            raw,
        }
        .into()
    }

    // ========================================================================
    // Multiline strings & templates
    // ========================================================================

    /// `` `...` `` multiline string, or string template if it contains `{{...}}` interpolations
    /// or follows a pattern (`%sql`...`).
    fn parse_string_template_or_multiline_string(&mut self, pattern: Option<Node>) -> Node {
        let opening_backquote = self.i;
        let start = pattern.as_ref().map_or(opening_backquote, |p| p.span().start);
        self.push_token_at(TokenType::Backquote, opening_backquote);
        self.i += 1;

        let mut slices: Vec<Node> = Vec::new();
        let mut slice_start = self.i;
        let mut interpolation_start: Option<usize> = None;

        while let Some(c) = self.peek() {
            if c == '`' && count_prev_backslashes(self.s, self.i) % 2 == 0 {
                break;
            }

            match interpolation_start {
                None if c == '{' && self.i > slice_start && self.char_at(self.i - 1) == Some('{') => {
                    self.push_token(TokenType::StrInterpOpeningBrackets, self.i - 1, self.i + 1);
                    slices.push(template_slice(self.text(slice_start, self.i - 1), slice_start, self.i - 1));
                    self.i += 1;
                    interpolation_start = Some(self.i);
                }
                Some(interp_start) if c == '}' && self.next_is(1, '}') => {
                    self.push_token(TokenType::StrInterpClosingBrackets, self.i, self.i + 2);
                    let interpolation = self.parse_template_interpolation(interp_start, self.i, pattern.is_some());
                    slices.push(interpolation);
                    self.i += 2;
                    slice_start = self.i;
                    interpolation_start = None;
                }
                _ => self.i += 1,
            }
        }

        if let Some(interp_start) = interpolation_start {
            let mut slice = template_slice(self.text(interp_start, self.i), interp_start, self.i);
            slice.base_mut().error = Some(ParsingError::unspecified(UNTERMINATED_STRING_INTERP));
            slices.push(slice);
        } else if slices.is_empty() && pattern.is_none() {
            return self.finish_multiline_string_literal(opening_backquote);
        } else {
            slices.push(template_slice(self.text(slice_start, self.i), slice_start, self.i));
        }

        let mut error = None;
        if self.at_end() {
            if interpolation_start.is_none() {
                error = Some(ParsingError::unspecified(UNTERMINATED_STRING_TEMPL_LIT));
            }
        } else {
            self.push_token_at(TokenType::Backquote, self.i);
            self.i += 1;
        }

        StringTemplateLiteral {
            base: NodeBase::with_opt_error(self.span_from(start), error),
            pattern: pattern.map(Box::new),
            slices,
        }
        .into()
    }

    /// Build the multiline string literal once the cursor is on the closing backquote (or at the
    /// end if it is missing).
    fn finish_multiline_string_literal(&mut self, opening_backquote: usize) -> Node {
        if self.at_end() {
            return MultilineStringLiteral {
                base: NodeBase::with_error(
                    self.span_from(opening_backquote),
                    ParsingError::unspecified(UNTERMINATED_MULTILINE_STRING_LIT),
                ),
                raw: self.text(opening_backquote, self.i),
                value: String::new(),
                is_unterminated: true,
            }
            .into();
        }

        self.push_token_at(TokenType::Backquote, self.i);
        self.i += 1;
        let raw = self.text(opening_backquote, self.i);
        let content: String = raw.chars().skip(1).take(raw.chars().count().saturating_sub(2)).collect();
        let (value, error) = match decode_multiline_text(&content) {
            Ok(value) => (value, None),
            Err(error) => (String::new(), Some(error)),
        };

        MultilineStringLiteral {
            base: NodeBase::with_opt_error(self.span_from(opening_backquote), error),
            raw,
            value,
            is_unterminated: false,
        }
        .into()
    }

    /// Interpolation `s[start..end]` of a template: `{{expr}}`, or `{{type: expr}}` in templates
    /// following a pattern.
    fn parse_template_interpolation(&mut self, start: usize, end: usize, typed: bool) -> Node {
        let span = NodeSpan::new(start, end);
        let invalid = |message: &str| -> Node {
            StringTemplateInterpolation {
                base: NodeBase::with_error(span, ParsingError::unspecified(message)),
                interp_type: String::new(),
                expr: Box::new(missing_at(start)),
            }
            .into()
        };

        let content = &self.s[start..end];
        if content.iter().any(|&c| !is_interpolation_allowed_char(c) && !c.is_whitespace()) {
            return invalid(STR_INTERP_LIMITED_CHARSET);
        }
        if content.iter().all(|c| c.is_whitespace()) {
            return invalid(INVALID_STRING_INTERPOLATION_SHOULD_NOT_BE_EMPTY);
        }

        let mut expr_start = start;
        let mut interp_type = String::new();
        if typed {
            if !is_ident_char(content[0]) {
                return invalid(INVALID_STRING_INTERPOLATION_SHOULD_START_WITH_A_NAME);
            }
            let name_len = content
                .iter()
                .take_while(|&&c| c == '.' || is_ident_char(c))
                .count();
            if content.get(name_len) != Some(&':') || name_len + 1 >= content.len() {
                return invalid(NAME_IN_STR_INTERP_SHOULD_BE_FOLLOWED_BY_COLON_AND_EXPR);
            }
            self.push_raw_token(TokenType::StrTemplateInterpType, start, start + name_len + 1);
            interp_type = self.text(start, start + name_len);
            expr_start = start + name_len + 1;
        }

        let (expr, ok) = self.parse_interpolation(expr_start, end);
        StringTemplateInterpolation {
            base: NodeBase::with_opt_error(span, (!ok).then(|| ParsingError::unspecified(INVALID_STR_INTERP))),
            interp_type,
            expr: Box::new(expr),
        }
        .into()
    }

    // ========================================================================
    // Runes
    // ========================================================================

    /// `'a'` or a rune range `'a'..'z'`.
    fn parse_rune_or_rune_range(&mut self) -> Node {
        let start = self.i;
        let lower = self.parse_rune_literal();

        if !self.peek_is('.') {
            return lower;
        }
        self.i += 1;

        if !self.peek_is('.') {
            self.push_token_at(TokenType::Dot, self.i - 1);
            return RuneRangeExpression {
                base: NodeBase::with_error(self.span_from(start), ParsingError::unspecified(INVALID_RUNE_RANGE_EXPR)),
                lower: Box::new(lower),
                upper: Box::new(self.missing_at_cursor()),
            }
            .into();
        }
        self.push_token(TokenType::TwoDots, self.i - 1, self.i + 1);
        self.i += 1;

        if !self.peek_is('\'') {
            return RuneRangeExpression {
                base: NodeBase::with_error(self.span_from(start), ParsingError::unspecified(INVALID_RUNE_RANGE_EXPR)),
                lower: Box::new(lower),
                upper: Box::new(self.missing_at_cursor()),
            }
            .into();
        }

        let upper = self.parse_rune_literal();
        RuneRangeExpression {
            base: NodeBase::new(self.span_from(start)),
            lower: Box::new(lower),
            upper: Box::new(upper),
        }
        .into()
    }

    fn parse_rune_literal(&mut self) -> Node {
        let start = self.i;
        self.i += 1;

        let invalid = |parser: &Self, message: &str| -> Node {
            RuneLiteral {
                base: NodeBase::with_error(parser.span_from(start), ParsingError::unspecified(message)),
                raw: parser.text(start, parser.i),
                value: '\0',
            }
            .into()
        };

        let Some(mut value) = self.peek() else {
            return invalid(&*self, UNTERMINATED_RUNE_LIT);
        };
        if value == '\'' {
            return invalid(&*self, INVALID_RUNE_LIT_NO_CHAR);
        }

        if value == '\\' {
            self.i += 1;
            value = match self.peek() {
                Some('a') => '\u{07}',
                Some('b') => '\u{08}',
                Some('f') => '\u{0c}',
                Some('n') => '\n',
                Some('r') => '\r',
                Some('t') => '\t',
                Some('v') => '\u{0b}',
                Some('\\') => '\\',
                Some('\'') => '\'',
                _ => return invalid(&*self, INVALID_RUNE_LIT_INVALID_SINGLE_CHAR_ESCAPE),
            };
        }
        self.i += 1;

        let error = if self.peek_is('\'') {
            self.i += 1;
            None
        } else {
            Some(ParsingError::unspecified(UNTERMINATED_RUNE_LIT_MISSING_QUOTE))
        };

        RuneLiteral {
            base: NodeBase::with_opt_error(self.span_from(start), error),
            raw: self.text(start, self.i),
            value,
        }
        .into()
    }
}

fn template_slice(raw: String, start: usize, end: usize) -> Node {
    let (value, error) = match decode_multiline_text(&raw) {
        Ok(value) => (value, None),
        Err(error) => (String::new(), Some(error)),
    };
    StringTemplateSlice {
        base: NodeBase::with_opt_error(NodeSpan::new(start, end), error),
        raw,
        value,
    }
    .into()
}

/// Decode the text between the backquotes of a multiline string or template.
///
/// Line breaks and tabs are kept as is, `` \` `` is a backquote and the other escapes are the
/// JSON ones.
fn decode_multiline_text(raw: &str) -> Result<String, ParsingError> {
    let mut json = String::with_capacity(raw.len() + 2);
    json.push('"');
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\n' => json.push_str("\\n"),
            '\r' => json.push_str("\\r"),
            '\t' => json.push_str("\\t"),
            '"' => json.push_str("\\\""),
            '\\' if chars.peek() == Some(&'`') => {}
            _ => json.push(c),
        }
    }
    json.push('"');

    serde_json::from_str::<String>(&json)
        .map_err(|err| ParsingError::unspecified(fmt_invalid_string_lit_json(&err.to_string())))
}
