/// Quoted code and metadata: `@(expr)`, `@{ statements }`, `<{ expr }>` unquoted regions,
/// `@name` meta identifiers, metadata annotations and annotated region headers.
///
/// ## Notes
/// - This file is `include!`'d into `crate::parser`.
/// - Quoted regions cannot be nested, unquoted regions are only allowed inside quoted regions and
///   cannot be nested either.
/// - Metadata annotations are whole lines of `@name` / `@name(args)` items placed before a
///   statement. A line that continues with something else is a statement.
impl<'a> Parser<'a> {
    /// Expression starting with `@`; the cursor is on the `@`.
    fn parse_at_sign_expression(&mut self) -> Node {
        let start = self.i;
        match self.char_at(start + 1) {
            Some('(') => self.parse_quoted_expression(),
            Some('{') => self.parse_quoted_statements(),
            Some('\'') => self.parse_annotated_region_header(),
            Some(c) if is_first_ident_char(c) => self.parse_meta_identifier(),
            _ => {
                self.push_raw_token(TokenType::UnexpectedChar, start, start + 1);
                self.i += 1;
                UnknownNode {
                    base: NodeBase::with_error(self.span_from(start), ParsingError::unspecified(AT_SYMBOL_SHOULD_BE_FOLLOWED_BY)),
                }
                .into()
            }
        }
    }

    /// `@name`
    fn parse_meta_identifier(&mut self) -> Node {
        let start = self.i;
        self.i += 1;
        self.eat_ident_chars();
        let name = self.text(start + 1, self.i);
        let error = name
            .ends_with('-')
            .then(|| ParsingError::unspecified(META_IDENTIFIER_MUST_NO_END_WITH_A_HYPHEN));

        MetaIdentifier {
            base: NodeBase::with_opt_error(self.span_from(start), error),
            name,
        }
        .into()
    }

    /// Enter a quoted region.
    ///
    /// ## Returns
    /// - The nesting error, if the parser already is in a quoted region, and the flags to restore.
    fn enter_quoted_region(&mut self) -> (Option<ParsingError>, bool, bool) {
        let error = self
            .in_quoted_region
            .then(|| ParsingError::unspecified(NESTED_QUOTED_REGIONS_NOT_ALLOWED));
        let saved_quoted = std::mem::replace(&mut self.in_quoted_region, true);
        let saved_pattern = std::mem::replace(&mut self.in_pattern, false);
        (error, saved_quoted, saved_pattern)
    }

    /// `@(expr)`; the parenthesized expression is parsed as usual.
    fn parse_quoted_expression(&mut self) -> Node {
        let start = self.i;
        self.push_token_at(TokenType::AtSign, start);
        self.i += 1;

        let (error, saved_quoted, saved_pattern) = self.enter_quoted_region();
        let expression = self.parse_expression();
        self.in_quoted_region = saved_quoted;
        self.in_pattern = saved_pattern;

        QuotedExpression {
            base: NodeBase::with_opt_error(self.span_from(start), error),
            expression: Box::new(expression),
        }
        .into()
    }

    /// `@{ statements }`
    fn parse_quoted_statements(&mut self) -> Node {
        let start = self.i;
        self.push_token(TokenType::OpeningQuotedStmtsRegionBrace, start, start + 2);
        self.i += 2;

        let (mut error, saved_quoted, saved_pattern) = self.enter_quoted_region();
        self.eat_space_newline_semicolon_comment();
        let (statements, region_headers) = self.parse_statement_list(is_closing_delim, fmt_unexpected_char_in_block_or_module);
        self.in_quoted_region = saved_quoted;
        self.in_pattern = saved_pattern;

        if self.peek_is('}') {
            self.push_sub_token(
                TokenType::ClosingCurlyBracket,
                TokenSubType::QuotedStmtsClosingBrace,
                self.i,
                self.i + 1,
            );
            self.i += 1;
        } else {
            error = Some(ParsingError::unspecified(UNTERMINATED_QUOTED_STATEMENTS_REGION_MISSING_CLOSING_DELIM));
        }

        QuotedStatements {
            base: NodeBase::with_opt_error(self.span_from(start), error),
            region_headers,
            statements,
        }
        .into()
    }

    /// `<{ expr }>` or `<{...expr}>`; the cursor is on the `<`.
    fn parse_unquoted_region(&mut self) -> Node {
        let start = self.i;
        self.push_token(TokenType::UnquotedRegionOpeningDelim, start, start + 2);
        self.i += 2;

        let spread = self.at_str("...");
        if spread {
            self.push_token(TokenType::ThreeDots, self.i, self.i + 3);
            self.i += 3;
        }

        let mut error = if !self.in_quoted_region {
            Some(ParsingError::unspecified(UNQUOTED_REGIONS_ONLY_ALLOWED_INSIDE_QUOTED_REGIONS))
        } else if self.in_unquoted_region {
            Some(ParsingError::unspecified(NESTED_UNQUOTED_REGIONS_NOT_ALLOWED))
        } else {
            None
        };

        let saved_unquoted = std::mem::replace(&mut self.in_unquoted_region, self.in_quoted_region);
        let saved_pattern = std::mem::replace(&mut self.in_pattern, false);
        self.eat_space_newline_comment();
        let expression = self.parse_expression();
        self.eat_space_newline_comment();
        self.in_unquoted_region = saved_unquoted;
        self.in_pattern = saved_pattern;

        if self.at_str("}>") {
            self.push_token(TokenType::UnquotedRegionClosingDelim, self.i, self.i + 2);
            self.i += 2;
        } else if self.at_end() {
            error = Some(ParsingError::new(
                ParsingErrorKind::UnterminatedUnquotedRegion,
                UNTERMINATED_UNQUOTED_REGION_MISSING_CLOSING_DELIM,
            ));
        } else {
            error = Some(ParsingError::unspecified(UNQUOTED_REGION_SHOULD_CONTAIN_A_SINGLE_EXPR));
            let extra_start = self.i;
            while !self.at_end() && !self.at_str("}>") {
                self.i += 1;
            }
            self.push_raw_token(TokenType::InvalidInterpSlice, extra_start, self.i);
            if self.at_str("}>") {
                self.push_token(TokenType::UnquotedRegionClosingDelim, self.i, self.i + 2);
                self.i += 2;
            }
        }

        UnquotedRegion {
            base: NodeBase::with_opt_error(self.span_from(start), error),
            spread,
            expression: Box::new(expression),
        }
        .into()
    }

    // ========================================================================
    // Annotated region headers
    // ========================================================================

    /// `@'Region title' @tag @other(arg)`; the cursor is on the `@`. The header ends at the end
    /// of the line.
    fn parse_annotated_region_header(&mut self) -> Node {
        let start = self.i;
        self.push_token_at(TokenType::AtSign, start);
        self.i += 1;

        let text_start = self.i;
        self.i += 1;
        while self.peek().is_some_and(|c| c != '\'' && c != '\n') {
            self.i += 1;
        }
        let value = self.text(text_start + 1, self.i);
        let mut error = None;
        if self.peek_is('\'') {
            self.i += 1;
        } else {
            error = Some(ParsingError::unspecified(UNTERMINATED_REGION_HEADER_MISSING_CLOSING_QUOTE));
        }
        let text: Node = AnnotatedRegionHeaderText {
            base: NodeBase::with_opt_error(self.span_from(text_start), error),
            raw: self.text(text_start, self.i),
            value,
        }
        .into();

        self.eat_space();
        let annotations = self.parse_metadata_annotations_on_line();

        AnnotatedRegionHeader {
            base: NodeBase::new(NodeSpan::new(start, annotations.as_ref().map_or(text.span().end, |a| a.span().end))),
            text: Box::new(text),
            annotations: annotations.map(Box::new),
        }
        .into()
    }

    /// Region headers inside markup; the cursor is on the `@` of the first one.
    fn parse_annotated_region_headers_in_markup(&mut self, region_headers: &mut Vec<Node>) {
        loop {
            region_headers.push(self.parse_annotated_region_header());
            self.eat_space();
            if !self.at_str("@'") {
                break;
            }
        }
    }

    // ========================================================================
    // Metadata annotations
    // ========================================================================

    fn at_metadata_annotation(&self) -> bool {
        self.peek_is('@') && self.char_at(self.i + 1).is_some_and(is_first_ident_char)
    }

    /// `@name` or `@name(arguments)`; the cursor is on the `@`.
    fn parse_metadata_annotation(&mut self) -> Node {
        let start = self.i;
        let meta = self.parse_meta_identifier();
        if self.peek_is('(') {
            return self.parse_parenthesized_call(meta, start);
        }
        meta
    }

    /// Annotations up to the end of the current line, `None` if there is none.
    fn parse_metadata_annotations_on_line(&mut self) -> Option<Node> {
        let start = self.i;
        let mut expressions = Vec::new();
        let mut end = start;
        while self.at_metadata_annotation() {
            expressions.push(self.parse_metadata_annotation());
            end = self.i;
            self.eat_space();
        }
        if expressions.is_empty() {
            return None;
        }
        Some(
            MetadataAnnotations {
                base: NodeBase::new(NodeSpan::new(start, end)),
                expressions,
            }
            .into(),
        )
    }

    /// Annotations after the value of an object pattern property, on the same line.
    fn try_parse_metadata_annotations_after_property(&mut self) -> Option<Node> {
        self.parse_metadata_annotations_on_line()
    }

    /// Region headers and metadata annotation lines before a statement.
    ///
    /// Region headers are appended to `region_headers`. When annotations are not followed by a
    /// statement (end of input or of the enclosing list) a [`MissingStatement`] holding them is
    /// appended to `stmts`.
    ///
    /// ## Returns
    /// - The annotations of the next statement, and whether the caller should parse a statement.
    fn parse_metadata_annotations_before_statement(
        &mut self,
        stmts: &mut Vec<Node>,
        region_headers: &mut Vec<Node>,
        is_end: fn(char) -> bool,
    ) -> (Option<Node>, bool) {
        while self.at_str("@'") {
            region_headers.push(self.parse_annotated_region_header());
            self.eat_space_newline_semicolon_comment();
        }

        let at_list_end = |parser: &Self| parser.peek().is_none_or(is_end);
        if at_list_end(&*self) {
            return (None, false);
        }
        if !self.at_metadata_annotation() {
            return (None, true);
        }

        let start = self.i;
        let mut end = start;
        let mut expressions = Vec::new();

        loop {
            let line_start = self.i;
            let token_count = self.tokens.len();
            let expression_count = expressions.len();

            while self.at_metadata_annotation() {
                expressions.push(self.parse_metadata_annotation());
                self.eat_space();
            }

            let at_line_end = self.peek().is_none_or(|c| c == '\n')
                || (self.peek_is('#') && self.char_at(self.i + 1).is_some_and(is_comment_first_space));
            if !at_line_end {
                // The line is a statement starting with a meta identifier.
                self.i = line_start;
                self.tokens.truncate(token_count);
                expressions.truncate(expression_count);
                break;
            }

            end = expressions.last().map_or(end, |e| e.span().end);
            self.eat_space_newline_comment();
            if !self.at_metadata_annotation() {
                break;
            }
        }

        if expressions.is_empty() {
            return (None, true);
        }

        let annotations: Node = MetadataAnnotations {
            base: NodeBase::new(NodeSpan::new(start, end)),
            expressions,
        }
        .into();

        if at_list_end(&*self) {
            stmts.push(
                MissingStatement {
                    base: NodeBase::with_error(
                        annotations.span(),
                        ParsingError::unspecified(METADATA_ANNOTATIONS_SHOULD_BE_FOLLOWED_BY_STMT),
                    ),
                    annotations: Some(Box::new(annotations)),
                }
                .into(),
            );
            return (None, false);
        }
        (Some(annotations), true)
    }

    /// Attach `annotations` to `stmt` if it is a function declaration.
    ///
    /// ## Returns
    /// - A [`MissingStatement`] holding the annotations when they cannot be attached.
    fn add_annotations_to_node_if_possible(&mut self, annotations: Option<Node>, stmt: &mut Node) -> Option<Node> {
        let annotations = annotations?;
        match stmt {
            Node::FunctionDeclaration(decl) => {
                decl.base.span.start = annotations.span().start;
                decl.annotations = Some(Box::new(annotations));
                None
            }
            _ => Some(
                MissingStatement {
                    base: NodeBase::new(annotations.span()),
                    annotations: Some(Box::new(annotations)),
                }
                .into(),
            ),
        }
    }
}
