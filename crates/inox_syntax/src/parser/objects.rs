/// Object, record, list, tuple and dictionary literals.
///
/// Entries are separated by commas or newlines. A property whose key is not an identifier or a
/// quoted string is a keyless property: `{1, 2}` has two properties without keys.
///
/// ## Notes
/// - This file is `include!`'d into `crate::parser`.
/// - Properties whose key is a metadata key (`_name_`) followed by a block are metaproperties,
///   they only exist in objects.
impl<'a> Parser<'a> {
    /// `{...}`, or `#{...}` if `is_record`.
    fn parse_object_or_record_literal(&mut self, is_record: bool) -> Node {
        let start = self.i;
        if is_record {
            self.push_token(TokenType::OpeningRecordBracket, start, start + 2);
            self.i += 2;
        } else {
            self.push_sub_token(TokenType::OpeningCurlyBracket, TokenSubType::ObjectLikeOpeningBrace, start, start + 1);
            self.i += 1;
        }

        let mut properties = Vec::new();
        let mut meta_properties = Vec::new();
        let mut spread_elements = Vec::new();

        loop {
            self.eat_space_newline_comma_comment();
            if self.at_end() || self.peek_is('}') || self.is_interrupted() {
                break;
            }

            match self.parse_object_entry(is_record) {
                ObjectEntry::Property(property) => properties.push(property),
                ObjectEntry::Meta(property) => meta_properties.push(property),
                ObjectEntry::Spread(element) => spread_elements.push(element),
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
            Some(ParsingError::unspecified(UNTERMINATED_REC_MISSING_CLOSING_BRACE))
        } else {
            Some(ParsingError::unspecified(UNTERMINATED_OBJ_MISSING_CLOSING_BRACE))
        };

        let base = NodeBase::with_opt_error(self.span_from(start), error);
        if is_record {
            RecordLiteral {
                base,
                properties,
                spread_elements,
            }
            .into()
        } else {
            ObjectLiteral {
                base,
                properties,
                meta_properties,
                spread_elements,
            }
            .into()
        }
    }

    /// One property, metaproperty or spread element; the cursor is on its first code unit.
    fn parse_object_entry(&mut self, is_record: bool) -> ObjectEntry {
        if self.at_str("...") {
            return ObjectEntry::Spread(self.parse_property_spread_element());
        }

        let key_or_value = self.parse_expression();
        if key_or_value.is_missing_expr() {
            let value = match self.peek() {
                Some(c) => self.unexpected_char_node(fmt_unexpected_char_in_object_record(c)),
                None => key_or_value,
            };
            return ObjectEntry::Property(keyless_property(value, None, None));
        }

        let start = key_or_value.span().start;
        let key_name = match &key_or_value {
            _ if self.s[start] == '(' => None,
            Node::IdentifierLiteral(ident) => Some(ident.name.clone()),
            Node::DoubleQuotedStringLiteral(string) => Some(string.value.clone()),
            _ => None,
        };

        self.eat_space();
        if self.at_end() || is_valid_entry_end(self.s, self.i) {
            return ObjectEntry::Property(keyless_property(key_or_value, None, None));
        }

        let mut error = None;
        let mut type_annotation = None;

        if self.peek_is('%') {
            let annotation = self.parse_percent_prefixed_pattern(false);
            let Some(name) = &key_name else {
                let mut error = Some(ParsingError::unspecified(ONLY_EXPLICIT_KEY_CAN_HAVE_A_TYPE_ANNOT));
                self.check_entry_end(&mut error, INVALID_OBJ_REC_ENTRY_ENTRY_SEPARATION);
                return ObjectEntry::Property(keyless_property(key_or_value, Some(annotation), error));
            };
            if !is_record && is_metadata_key(name) {
                error = Some(ParsingError::unspecified(METAPROP_KEY_CANNOT_HAVE_A_TYPE_ANNOT));
            }
            type_annotation = Some(Box::new(annotation));
            self.eat_space();
        } else if !is_record && self.peek_is('{') && key_name.as_deref().is_some_and(is_metadata_key) {
            return ObjectEntry::Meta(self.parse_object_meta_property(key_or_value));
        }

        let Some(key_name) = key_name else {
            if !self.peek_is(':') {
                let mut error = None;
                self.check_entry_end(&mut error, INVALID_OBJ_REC_ENTRY_ENTRY_SEPARATION);
                return ObjectEntry::Property(keyless_property(key_or_value, None, error));
            }
            error = Some(ParsingError::unspecified(fmt_only_idents_and_strings_valid_obj_record_keys_not(
                &key_or_value,
            )));
            return ObjectEntry::Property(self.parse_property_value(start, Some(key_or_value), None, error, ""));
        };

        if !self.peek_is(':') {
            let message = if type_annotation.is_some() {
                fmt_invalid_obj_key_missing_colon_after_type_annotation(&key_name)
            } else {
                fmt_invalid_obj_record_key_missing_colon_after_key(&key_name)
            };
            return ObjectEntry::Property(
                ObjectProperty {
                    base: NodeBase::with_error(self.span_from(start), ParsingError::unspecified(message)),
                    key: Some(Box::new(key_or_value)),
                    type_annotation,
                    value: Box::new(missing_at(self.i)),
                }
                .into(),
            );
        }

        ObjectEntry::Property(self.parse_property_value(
            start,
            Some(key_or_value),
            type_annotation,
            error,
            &key_name,
        ))
    }

    /// Parse `: value` and build the property; the cursor is on the colon.
    fn parse_property_value(
        &mut self,
        start: usize,
        key: Option<Node>,
        type_annotation: Option<Box<Node>>,
        mut error: Option<ParsingError>,
        key_name: &str,
    ) -> Node {
        self.push_token_at(TokenType::Colon, self.i);
        self.i += 1;
        self.eat_space();

        if self.peek_is('#') && self.char_at(self.i + 1).is_some_and(is_comment_first_space) {
            self.eat_space_newline_comment();
            error.get_or_insert_with(|| {
                ParsingError::unspecified(fmt_invalid_obj_record_key_comment_before_value_of_key(key_name))
            });
        }
        self.eat_space();

        if self.at_end() || self.peek_is('}') {
            error.get_or_insert_with(|| {
                ParsingError::new(ParsingErrorKind::MissingObjectPropertyValue, MISSING_PROPERTY_VALUE)
            });
            return ObjectProperty {
                base: NodeBase::with_opt_error(self.span_from(start), error),
                key: key.map(Box::new),
                type_annotation,
                value: Box::new(missing_at(self.i)),
            }
            .into();
        }

        if self.peek_is('\n') {
            error.get_or_insert_with(|| ParsingError::unspecified(UNEXPECTED_NEWLINE_AFTER_COLON));
            self.eat_space_newline();
        }

        let mut value = self.parse_expression();
        if value.is_missing_expr() {
            if let Some(c) = self.peek() {
                value = self.unexpected_char_node(fmt_unexpected_char_in_object_record(c));
            }
        }
        let end = self.i;
        self.check_entry_end(&mut error, INVALID_OBJ_REC_ENTRY_ENTRY_SEPARATION);

        ObjectProperty {
            base: NodeBase::with_opt_error(NodeSpan::new(start, end), error),
            key: key.map(Box::new),
            type_annotation,
            value: Box::new(value),
        }
        .into()
    }

    /// `_name_ { ... }`, the block initializes the metaproperty.
    fn parse_object_meta_property(&mut self, key: Node) -> Node {
        let start = key.span().start;
        let initialization: Node = match self.parse_block() {
            Node::Block(block) => InitializationBlock {
                base: block.base,
                statements: block.statements,
            }
            .into(),
            other => other,
        };

        let mut error = None;
        self.check_entry_end(&mut error, INVALID_OBJ_REC_ENTRY_ENTRY_SEPARATION);
        ObjectMetaProperty {
            base: NodeBase::with_opt_error(NodeSpan::new(start, initialization.span().end), error),
            key: Box::new(key),
            initialization: Box::new(initialization),
        }
        .into()
    }

    /// `...$obj.{a, b}` inside an object or record literal.
    fn parse_property_spread_element(&mut self) -> Node {
        let start = self.i;
        self.push_token(TokenType::ThreeDots, start, start + 3);
        self.i += 3;
        self.eat_space();

        let expr = self.parse_expression();
        let mut error = (!matches!(expr, Node::ExtractionExpression(_))).then(|| {
            ParsingError::new(
                ParsingErrorKind::ExtractionExpressionExpected,
                fmt_invalid_spread_elem_expr_should_be_extr_expr_not(&expr),
            )
        });
        let end = self.i.max(expr.span().end);
        self.check_entry_end(&mut error, INVALID_OBJ_REC_LIT_SPREAD_SEPARATION);

        PropertySpreadElement {
            base: NodeBase::with_opt_error(NodeSpan::new(start, end), error),
            expr: Box::new(expr),
        }
        .into()
    }

    /// Eat the spaces following an entry and report a missing separator if there is no error yet.
    fn check_entry_end(&mut self, error: &mut Option<ParsingError>, message: &str) {
        self.eat_space();
        if error.is_none() && !self.at_end() && !is_valid_entry_end(self.s, self.i) {
            *error = Some(ParsingError::unspecified(message));
        }
    }

    // ========================================================================
    // Lists & tuples
    // ========================================================================

    /// `[...]`, `#[...]`, or with a type annotation: `[]%int[1, 2]`.
    fn parse_list_or_tuple_literal(&mut self, is_tuple: bool) -> Node {
        let start = self.i;
        if is_tuple {
            self.push_token(TokenType::OpeningTupleBracket, start, start + 2);
            self.i += 2;
        } else {
            self.push_token_at(TokenType::OpeningBracket, start);
            self.i += 1;
        }

        let mut error = None;
        let mut type_annotation = None;
        if self.peek_is(']') && self.next_is(1, '%') {
            self.push_token_at(TokenType::ClosingBracket, self.i);
            self.i += 1;
            type_annotation = Some(Box::new(self.parse_percent_prefixed_pattern(false)));

            if self.peek_is('[') {
                self.push_token_at(TokenType::OpeningBracket, self.i);
                self.i += 1;
            } else {
                error = Some(ParsingError::unspecified(UNTERMINATED_LIST_LIT_MISSING_OPENING_BRACKET_AFTER_TYPE));
            }
        }

        let mut elements = Vec::new();
        if error.is_none() {
            loop {
                self.eat_space_newline_comma_comment();
                if self.at_end() || self.peek_is(']') || self.is_interrupted() {
                    break;
                }

                let element = if self.at_str("...") {
                    self.parse_element_spread_element()
                } else {
                    self.parse_expression()
                };

                if element.is_missing_expr() {
                    match self.peek() {
                        Some(c) => {
                            let unexpected = self.unexpected_char_node(fmt_unexpected_char_in_list_or_tuple_literal(c));
                            elements.push(unexpected);
                        }
                        None => break,
                    }
                    continue;
                }
                elements.push(element);
            }

            if self.peek_is(']') {
                self.push_token_at(TokenType::ClosingBracket, self.i);
                self.i += 1;
            } else {
                error = Some(ParsingError::unspecified(UNTERMINATED_LIST_LIT_MISSING_CLOSING_BRACKET));
            }
        }

        let base = NodeBase::with_opt_error(self.span_from(start), error);
        if is_tuple {
            TupleLiteral {
                base,
                type_annotation,
                elements,
            }
            .into()
        } else {
            ListLiteral {
                base,
                type_annotation,
                elements,
            }
            .into()
        }
    }

    fn parse_element_spread_element(&mut self) -> Node {
        let start = self.i;
        self.push_token(TokenType::ThreeDots, start, start + 3);
        self.i += 3;

        let expr = self.parse_expression();
        let error = expr
            .is_missing_expr()
            .then(|| ParsingError::unspecified(UNTERMINATED_SPREAD_ELEM_MISSING_EXPR));

        ElementSpreadElement {
            base: NodeBase::with_opt_error(NodeSpan::new(start, self.i.max(start + 3)), error),
            expr: Box::new(expr),
        }
        .into()
    }

    // ========================================================================
    // Dictionaries
    // ========================================================================

    /// `:{key: value, ...}`, keys are simple value literals.
    fn parse_dictionary_literal(&mut self) -> Node {
        let start = self.i;
        self.push_token(TokenType::OpeningDictionaryBracket, start, start + 2);
        self.i += 2;

        let mut entries = Vec::new();
        loop {
            self.eat_space_newline_comma_comment();
            if self.at_end() || self.peek_is('}') || self.is_interrupted() {
                break;
            }
            entries.push(self.parse_dictionary_entry());
        }

        let error = if self.peek_is('}') {
            self.push_token_at(TokenType::ClosingCurlyBracket, self.i);
            self.i += 1;
            None
        } else {
            Some(ParsingError::unspecified(UNTERMINATED_DICT_MISSING_CLOSING_BRACE))
        };

        DictionaryLiteral {
            base: NodeBase::with_opt_error(self.span_from(start), error),
            entries,
        }
        .into()
    }

    fn parse_dictionary_entry(&mut self) -> Node {
        let start = self.i;
        let mut key = self.parse_expression();

        if key.is_missing_expr() {
            if let Some(c) = self.peek() {
                key = self.unexpected_char_node(fmt_unexpected_char_in_dictionary(c));
            }
            return DictionaryEntry {
                base: NodeBase::new(self.span_from(start)),
                key: Box::new(key),
                value: Box::new(missing_at(self.i)),
            }
            .into();
        }

        if key.error().is_none() && !key.is_simple_value_literal() {
            key.base_mut().error = Some(ParsingError::unspecified(INVALID_DICT_KEY_ONLY_SIMPLE_VALUE_LITS));
        }

        self.eat_space();
        if !self.peek_is(':') {
            return DictionaryEntry {
                base: NodeBase::with_error(
                    NodeSpan::new(start, key.span().end),
                    ParsingError::unspecified(INVALID_DICT_ENTRY_MISSING_COLON_AFTER_KEY),
                ),
                key: Box::new(key),
                value: Box::new(missing_at(self.i)),
            }
            .into();
        }

        self.push_token_at(TokenType::Colon, self.i);
        self.i += 1;
        self.eat_space();

        let mut value = self.parse_expression();
        if value.is_missing_expr() {
            if let Some(c) = self.peek().filter(|&c| !matches!(c, ',' | '}' | '\n')) {
                value = self.unexpected_char_node(fmt_unexpected_char_in_dictionary(c));
            }
        }
        let end = self.i;

        let mut error = None;
        self.check_entry_end(&mut error, INVALID_DICT_LIT_ENTRY_SEPARATION);
        DictionaryEntry {
            base: NodeBase::with_opt_error(NodeSpan::new(start, end), error),
            key: Box::new(key),
            value: Box::new(value),
        }
        .into()
    }
}

/// Result of [`Parser::parse_object_entry`].
enum ObjectEntry {
    Property(Node),
    Meta(Node),
    Spread(Node),
}

/// Property without key: `{1}`, `{(a)}`.
fn keyless_property(value: Node, type_annotation: Option<Node>, error: Option<ParsingError>) -> Node {
    let span = value.span();
    let end = type_annotation.as_ref().map_or(span.end, |t| t.span().end);
    ObjectProperty {
        base: NodeBase::with_opt_error(NodeSpan::new(span.start, end), error),
        key: None,
        type_annotation: type_annotation.map(Box::new),
        value: Box::new(value),
    }
    .into()
}

/// Whether `s[i]` ends an entry of an object-like literal: a newline, a comma, a closing brace
/// or a comment.
fn is_valid_entry_end(s: &[char], i: usize) -> bool {
    match s.get(i) {
        Some('\n' | ',' | '}') => true,
        Some('#') => s.get(i + 1).is_some_and(|&c| is_comment_first_space(c)),
        _ => false,
    }
}
