/// Markup expressions (`html<div class="a">{text}</div>`) and markup patterns (`%<ul><li*/></ul>`).
///
/// Both share one element grammar: an opening tag with attributes, then children made of text
/// slices, `{…}` interpolations, unquoted regions, annotated region headers and nested elements,
/// then a closing tag. Patterns additionally accept a quantifier right after the tag name
/// (`<li*>`) and `*` wildcard children, and their attribute values are patterns.
///
/// ## Notes
/// - This file is `include!`'d into `crate::parser`.
/// - `script` and `style` elements have raw text content that ends at the first `</`.
/// - Hyperscript (`{on click …}` shorthands and `<script h>` bodies) is handed to the injected
///   [`HyperscriptParser`], the parser itself never looks inside it.

const SCRIPT_TAG_NAME: &str = "script";
const STYLE_TAG_NAME: &str = "style";
/// Attribute marking a `<script>` element as hyperscript.
const HYPERSCRIPT_SCRIPT_MARKER: &str = "h";
const HYPERSCRIPT_CONTENT_TYPE: &str = "text/hyperscript";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MarkupFlavor {
    Expression,
    Pattern,
}

impl MarkupFlavor {
    fn tag_name(self, span: NodeSpan, name: String) -> Node {
        match self {
            MarkupFlavor::Expression => IdentifierLiteral {
                base: NodeBase::new(span),
                name,
            }
            .into(),
            MarkupFlavor::Pattern => PatternIdentifierLiteral {
                base: NodeBase::new(span),
                unprefixed: true,
                name,
            }
            .into(),
        }
    }

    fn attribute(self, span: NodeSpan, name: Node, value: Option<Node>) -> Node {
        match self {
            MarkupFlavor::Expression => MarkupAttribute {
                base: NodeBase::new(span),
                name: Box::new(name),
                value: value.map(Box::new),
            }
            .into(),
            MarkupFlavor::Pattern => MarkupPatternAttribute {
                base: NodeBase::new(span),
                name: Box::new(name),
                type_annotation: value.map(Box::new),
            }
            .into(),
        }
    }

    fn interpolation(self, span: NodeSpan, error: Option<ParsingError>, expr: Option<Node>) -> Node {
        let base = NodeBase::with_opt_error(span, error);
        let expr = expr.map(Box::new);
        match self {
            MarkupFlavor::Expression => MarkupInterpolation { base, expr }.into(),
            MarkupFlavor::Pattern => MarkupPatternInterpolation { base, expr }.into(),
        }
    }

    fn closing_tag(self, span: NodeSpan, error: Option<ParsingError>, name: Node) -> Node {
        let base = NodeBase::with_opt_error(span, error);
        let name = Box::new(name);
        match self {
            MarkupFlavor::Expression => MarkupClosingTag { base, name }.into(),
            MarkupFlavor::Pattern => MarkupPatternClosingTag { base, name }.into(),
        }
    }
}

/// What has been parsed of an element so far.
struct MarkupElementParts {
    flavor: MarkupFlavor,
    start: usize,
    error: Option<ParsingError>,
    tag_name: String,
    name: Node,
    opening_end: usize,
    opening_error: Option<ParsingError>,
    attributes: Vec<Node>,
    self_closed: bool,
    quantifier: MarkupElementQuantifier,
    region_headers: Vec<Node>,
    children: Vec<Node>,
    closing: Option<Node>,
    raw_element_type: Option<RawElementType>,
    raw_content: Option<(usize, usize)>,
    raw_parsing_result: Option<HyperscriptPayload>,
}

impl<'a> Parser<'a> {
    /// `[namespace]<tag …>…</tag>`; the cursor is on the `<` and `start` is the start of the
    /// namespace (or of the `<`).
    fn parse_markup_expression(&mut self, namespace: Option<Node>, start: usize) -> Node {
        let namespace = namespace.map(Box::new);

        if !self.char_at(self.i + 1).is_some_and(is_alpha) {
            self.push_sub_token(TokenType::LessThan, TokenSubType::MarkupTagOpeningBracket, self.i, self.i + 1);
            self.i += 1;
            return MarkupExpression {
                base: NodeBase::with_error(
                    self.span_from(start),
                    ParsingError::unspecified(UNTERMINATED_MARKUP_EXPRESSION_MISSING_TOP_ELEM_NAME),
                ),
                namespace,
                element: Box::new(self.missing_at_cursor()),
            }
            .into();
        }

        let saved = std::mem::replace(&mut self.in_pattern, false);
        let (element, _) = self.parse_markup_element(MarkupFlavor::Expression);
        self.in_pattern = saved;

        MarkupExpression {
            base: NodeBase::new(self.span_from(start)),
            namespace,
            element: Box::new(element),
        }
        .into()
    }

    /// `%<tag …>…</tag>`; `start` is the index of the `%` and the cursor is on the `<`.
    fn parse_markup_pattern_expression(&mut self, start: usize) -> Node {
        self.push_token_at(TokenType::PercentSymbol, start);

        if !self.char_at(self.i + 1).is_some_and(is_alpha) {
            self.push_sub_token(TokenType::LessThan, TokenSubType::MarkupTagOpeningBracket, self.i, self.i + 1);
            self.i += 1;
            return MarkupPatternExpression {
                base: NodeBase::with_error(
                    self.span_from(start),
                    ParsingError::unspecified(UNTERMINATED_MARKUP_PATTERN_EXPRESSION_MISSING_TOP_ELEM_NAME),
                ),
                element: Box::new(self.missing_at_cursor()),
            }
            .into();
        }

        let saved = std::mem::replace(&mut self.in_pattern, true);
        let (element, _) = self.parse_markup_element(MarkupFlavor::Pattern);
        self.in_pattern = saved;

        MarkupPatternExpression {
            base: NodeBase::new(self.span_from(start)),
            element: Box::new(element),
        }
        .into()
    }

    /// Parse an element, the cursor is on its `<`.
    ///
    /// ## Returns
    /// - The element, and `false` if its closing tag has another name than its opening tag.
    fn parse_markup_element(&mut self, flavor: MarkupFlavor) -> (Node, bool) {
        if !self.enter_nested() {
            return (self.missing_at_cursor(), true);
        }
        let result = self.parse_markup_element_inner(flavor);
        self.leave_nested();
        result
    }

    fn parse_markup_element_inner(&mut self, flavor: MarkupFlavor) -> (Node, bool) {
        let start = self.i;
        self.push_sub_token(TokenType::LessThan, TokenSubType::MarkupTagOpeningBracket, start, start + 1);
        self.i += 1;

        // opening tag
        let name_start = self.i;
        self.eat_ident_chars();
        let tag_name = self.text(name_start, self.i);
        let name = flavor.tag_name(NodeSpan::new(name_start, self.i), tag_name.clone());

        let mut parts = MarkupElementParts {
            flavor,
            start,
            error: None,
            opening_end: self.i,
            opening_error: None,
            name,
            tag_name,
            attributes: Vec::new(),
            self_closed: false,
            quantifier: MarkupElementQuantifier::One,
            region_headers: Vec::new(),
            children: Vec::new(),
            closing: None,
            raw_element_type: None,
            raw_content: None,
            raw_parsing_result: None,
        };

        if parts.tag_name.is_empty() {
            parts.opening_error = Some(ParsingError::unspecified(INVALID_TAG_NAME));
        }

        if flavor == MarkupFlavor::Pattern {
            self.parse_markup_pattern_quantifier(&mut parts);
        }
        self.eat_space_newline_comment();

        let (is_hyperscript_script, unterminated_shorthand) = self.parse_markup_attributes(&mut parts);

        parts.raw_element_type = match parts.tag_name.as_str() {
            SCRIPT_TAG_NAME if is_hyperscript_script => Some(RawElementType::HyperscriptScript),
            SCRIPT_TAG_NAME => Some(RawElementType::JsScript),
            STYLE_TAG_NAME => Some(RawElementType::CssStyle),
            _ => None,
        };

        match self.peek() {
            Some('/') if self.next_is(1, '>') => {
                self.push_token(TokenType::SelfClosingTagTerminator, self.i, self.i + 2);
                self.i += 2;
                parts.opening_end = self.i;
                parts.self_closed = true;
                return (self.finish_markup_element(parts), true);
            }
            Some('/') => {
                self.push_token_at(TokenType::Slash, self.i);
                self.i += 1;
                parts.opening_end = self.i;
                parts.opening_error = Some(ParsingError::unspecified(UNTERMINATED_SELF_CLOSING_MARKUP_TAG_MISSING_CLOSING));
                return (self.finish_markup_element(parts), true);
            }
            Some('>') => {
                self.push_sub_token(TokenType::GreaterThan, TokenSubType::MarkupTagClosingBracket, self.i, self.i + 1);
                self.i += 1;
                parts.opening_end = self.i;
            }
            _ => {
                if !unterminated_shorthand {
                    parts.opening_error = Some(ParsingError::unspecified(UNTERMINATED_OPENING_MARKUP_TAG_MISSING_CLOSING));
                }
                return (self.finish_markup_element(parts), true);
            }
        }

        // children
        let mut all_children_have_matching_closing_tag = true;
        if parts.raw_element_type.is_some() {
            let content_start = self.i;
            while !self.at_end() && !self.at_str("</") {
                self.i += 1;
            }
            self.set_raw_markup_content(&mut parts, content_start);
        } else {
            let (children, region_headers, all_match) = self.parse_markup_children(flavor);
            parts.children = children;
            parts.region_headers = region_headers;
            all_children_have_matching_closing_tag = all_match;
        }

        if !self.at_str("</") {
            if all_children_have_matching_closing_tag {
                parts.error = Some(ParsingError::unspecified(fmt_expected_closing_tag(&parts.tag_name)));
            }
            return (self.finish_markup_element(parts), true);
        }

        // closing tag
        let closing_start = self.i;
        self.push_token(TokenType::EndTagOpenDelimiter, self.i, self.i + 2);
        self.i += 2;

        let mut matching_closing_tag = true;
        let closing_name_start = self.i;
        let (closing_name, mut closing_error) = if self.peek_matches(is_alpha) {
            self.eat_ident_chars();
            let name = self.text(closing_name_start, self.i);
            let mut error = None;
            if name != parts.tag_name {
                error = Some(ParsingError::unspecified(fmt_expected_closing_tag(&parts.tag_name)));
                matching_closing_tag = false;
            }
            (flavor.tag_name(self.span_from(closing_name_start), name), error)
        } else {
            (self.missing_at_cursor(), Some(ParsingError::unspecified(INVALID_TAG_NAME)))
        };

        if self.peek_is('>') {
            self.push_sub_token(TokenType::GreaterThan, TokenSubType::MarkupTagClosingBracket, self.i, self.i + 1);
            self.i += 1;
        } else {
            closing_error.get_or_insert_with(|| ParsingError::unspecified(UNTERMINATED_CLOSING_MARKUP_TAG_MISSING_CLOSING_DELIM));
        }

        parts.closing = Some(flavor.closing_tag(self.span_from(closing_start), closing_error, closing_name));
        (self.finish_markup_element(parts), matching_closing_tag)
    }

    /// `?`, `+` or `*` stuck to the tag name of a pattern element.
    fn parse_markup_pattern_quantifier(&mut self, parts: &mut MarkupElementParts) {
        let name_end = self.i;
        self.eat_space();
        let Some(quantifier) = self.peek().and_then(MarkupElementQuantifier::from_char) else {
            return;
        };

        if self.i == name_end {
            parts.quantifier = quantifier;
            self.push_raw_token(TokenType::OccurrenceModifier, self.i, self.i + 1);
        } else {
            self.push_raw_token(TokenType::UnexpectedChar, self.i, self.i + 1);
            parts.opening_error = Some(ParsingError::unspecified(
                THERE_SHOULD_NOT_BE_SPACE_BETWEEN_THE_TAG_NAME_AND_THE_QUANTIFIER,
            ));
        }
        self.i += 1;
        parts.opening_end = self.i;
    }

    /// Attributes of an opening tag, up to `>`, `/` or a `<` that does not start an unquoted
    /// region.
    ///
    /// ## Returns
    /// - Whether the element is marked as a hyperscript script, and whether the last attribute is
    ///   an unterminated hyperscript shorthand.
    fn parse_markup_attributes(&mut self, parts: &mut MarkupElementParts) -> (bool, bool) {
        let flavor = parts.flavor;
        let mut is_hyperscript_script = false;
        let mut unterminated_shorthand = false;

        while let Some(c) = self.peek() {
            if c == '>' || c == '/' || (c == '<' && !self.next_is(1, '{')) {
                break;
            }

            if c == '{' && flavor == MarkupFlavor::Expression {
                let (shorthand, terminated) = self.parse_hyperscript_attribute_shorthand();
                parts.attributes.push(shorthand);
                unterminated_shorthand = !terminated;
                parts.opening_end = self.i;
                self.eat_space_newline_comment();
                continue;
            }
            unterminated_shorthand = false;

            let name_start = self.i;
            let mut name = if is_alpha(c) {
                self.eat_ident_chars();
                IdentifierLiteral {
                    base: NodeBase::new(self.span_from(name_start)),
                    name: self.text(name_start, self.i),
                }
                .into()
            } else {
                let saved = std::mem::replace(&mut self.in_pattern, false);
                let name = self.parse_expression();
                self.in_pattern = saved;
                name
            };

            if name.is_missing_expr() {
                let span = name.span();
                parts.attributes.push(flavor.attribute(span, name, None));
                break;
            }

            if !matches!(name, Node::IdentifierLiteral(_) | Node::UnquotedRegion(_)) && name.error().is_none() {
                name.base_mut().error = Some(ParsingError::unspecified(MARKUP_ATTRIBUTE_NAME_SHOULD_BE_IDENT));
            }
            let attribute_name = name.identifier_name().unwrap_or_default().to_string();

            if !self.peek_is('=') {
                if attribute_name == HYPERSCRIPT_SCRIPT_MARKER && parts.tag_name == SCRIPT_TAG_NAME {
                    is_hyperscript_script = true;
                }
                parts.attributes.push(flavor.attribute(self.span_from(name_start), name, None));
                parts.opening_end = self.i;
                self.eat_space_newline_comment();
                continue;
            }

            self.push_sub_token(TokenType::Equal, TokenSubType::MarkupAttrEqual, self.i, self.i + 1);
            self.i += 1;

            let saved = std::mem::replace(&mut self.in_pattern, flavor == MarkupFlavor::Pattern);
            let value = self.parse_expression();
            self.in_pattern = saved;

            let is_missing_value = value.is_missing_expr();
            if attribute_name == "type"
                && matches!(&value, Node::DoubleQuotedStringLiteral(s) if s.value == HYPERSCRIPT_CONTENT_TYPE)
            {
                is_hyperscript_script = true;
            }
            parts.attributes.push(flavor.attribute(self.span_from(name_start), name, Some(value)));
            parts.opening_end = self.i;
            if is_missing_value {
                break;
            }
            self.eat_space_newline_comment();
        }

        (is_hyperscript_script, unterminated_shorthand)
    }

    /// `{hyperscript code}` in an opening tag; the cursor is on the `{`.
    ///
    /// ## Returns
    /// - The shorthand and whether it is terminated.
    fn parse_hyperscript_attribute_shorthand(&mut self) -> (Node, bool) {
        let start = self.i;
        self.i += 1;
        let content_start = self.i;
        while self.peek().is_some_and(|c| c != '}') {
            self.i += 1;
        }
        let value = self.text(content_start, self.i);

        let terminated = self.peek_is('}');
        let mut error = None;
        let mut parsing_result = None;
        if terminated {
            self.i += 1;
            match self.parse_hyperscript_code(&value) {
                Ok(result) => parsing_result = result,
                Err(err) => error = Some(err),
            }
        } else {
            error = Some(ParsingError::unspecified(UNTERMINATED_HYPERSCRIPT_ATTRIBUTE_SHORTHAND));
        }

        let shorthand = HyperscriptAttributeShorthand {
            base: NodeBase::with_opt_error(self.span_from(start), error),
            value,
            is_unterminated: !terminated,
            parsing_result,
        };
        (shorthand.into(), terminated)
    }

    /// Run the hyperscript hook, if any, on `code`.
    fn parse_hyperscript_code(&self, code: &str) -> Result<Option<HyperscriptPayload>, ParsingError> {
        let Some(hook) = &self.parse_hyperscript else {
            return Ok(None);
        };
        match hook.parse(code) {
            Ok(payload) => Ok(Some(payload)),
            Err(HyperscriptError::Syntax(message)) => Err(ParsingError::unspecified(message)),
            Err(error @ HyperscriptError::Fatal(_)) => {
                tracing::trace!(%error, "hyperscript hook failed");
                Err(ParsingError::unspecified(error.to_string()))
            }
        }
    }

    /// Record the raw text of a `script`/`style` element, it ends at the cursor.
    fn set_raw_markup_content(&mut self, parts: &mut MarkupElementParts, content_start: usize) {
        let content_end = self.i;
        match parts.flavor {
            MarkupFlavor::Expression => {
                parts.raw_content = Some((content_start, content_end));
                if parts.raw_element_type == Some(RawElementType::HyperscriptScript) {
                    let code = self.text(content_start, content_end);
                    match self.parse_hyperscript_code(&code) {
                        Ok(result) => parts.raw_parsing_result = result,
                        Err(err) => parts.error = Some(err),
                    }
                }
            }
            // Pattern elements keep their raw content as a single text child.
            MarkupFlavor::Pattern => {
                let raw = self.text(content_start, content_end);
                parts.children.push(
                    MarkupText {
                        base: NodeBase::new(NodeSpan::new(content_start, content_end)),
                        value: raw.clone(),
                        raw,
                    }
                    .into(),
                );
            }
        }
    }

    /// Children of a non-raw element, up to `</` or the end of the input.
    ///
    /// ## Returns
    /// - The children, the annotated region headers, and whether every child element has a
    ///   closing tag matching its opening tag.
    fn parse_markup_children(&mut self, flavor: MarkupFlavor) -> (Vec<Node>, Vec<Node>, bool) {
        let mut children = Vec::new();
        let mut region_headers = Vec::new();
        let mut all_children_have_matching_closing_tag = true;
        let mut slice_start = self.i;

        while let Some(c) = self.peek() {
            if self.is_interrupted() {
                break;
            }
            match c {
                '<' if self.next_is(1, '/') || self.i + 1 == self.len() => break,
                '{' => {
                    children.push(self.markup_text(slice_start, self.i));
                    children.push(self.parse_markup_interpolation(flavor));
                    slice_start = self.i;
                }
                '<' if self.next_is(1, '{') => {
                    children.push(self.markup_text(slice_start, self.i));
                    children.push(self.parse_unquoted_region());
                    slice_start = self.i;
                }
                '<' => {
                    children.push(self.markup_text(slice_start, self.i));
                    let (child, matching_closing_tag) = self.parse_markup_element(flavor);
                    children.push(child);
                    slice_start = self.i;
                    if !matching_closing_tag {
                        all_children_have_matching_closing_tag = false;
                    }
                }
                '@' if self.next_is(1, '\'') && self.i > 0 && self.s[self.i - 1].is_whitespace() => {
                    children.push(self.markup_text(slice_start, self.i));
                    self.parse_annotated_region_headers_in_markup(&mut region_headers);
                    slice_start = self.i;
                }
                '*' if flavor == MarkupFlavor::Pattern => {
                    children.push(self.markup_text(slice_start, self.i));
                    children.push(
                        MarkupPatternWildcard {
                            base: NodeBase::new(NodeSpan::new(self.i, self.i + 1)),
                            wildcard: MarkupPatternWildcardKind::Star,
                        }
                        .into(),
                    );
                    self.i += 1;
                    slice_start = self.i;
                }
                _ => self.i += 1,
            }
        }

        children.push(self.markup_text(slice_start, self.i));
        (children, region_headers, all_children_have_matching_closing_tag)
    }

    /// `{expr}` among children; the cursor is on the `{`. Braces inside the interpolation must be
    /// balanced.
    fn parse_markup_interpolation(&mut self, flavor: MarkupFlavor) -> Node {
        self.push_sub_token(TokenType::OpeningCurlyBracket, TokenSubType::MarkupInterpOpeningBrace, self.i, self.i + 1);
        self.i += 1;
        let start = self.i;

        let mut depth = 0usize;
        let end = loop {
            match self.peek() {
                None => {
                    let mut text = self.markup_text(start, self.i);
                    text.base_mut().error = Some(ParsingError::unspecified(UNTERMINATED_MARKUP_INTERP));
                    return text;
                }
                Some('{') => depth += 1,
                Some('}') if depth == 0 => break self.i,
                Some('}') => depth -= 1,
                Some(_) => {}
            }
            self.i += 1;
        };
        self.i += 1;

        let mut error = None;
        let mut expr = None;
        if self.s[start..end].iter().all(|c| c.is_whitespace()) {
            error = Some(ParsingError::unspecified(EMPTY_MARKUP_INTERP));
        } else {
            let mut sub = self.sub_parser(start, end);
            sub.in_pattern = flavor == MarkupFlavor::Pattern;
            sub.eat_space_newline_comment();
            let mut parsed = sub.parse_expression();
            sub.eat_space_newline_comment();

            if !sub.at_end() {
                let rest = sub.i;
                sub.push_raw_token(TokenType::InvalidInterpSlice, rest, sub.len());
                if !parsed.is_missing_expr() {
                    error = Some(ParsingError::unspecified(MARKUP_INTERP_SHOULD_CONTAIN_A_SINGLE_EXPR));
                }
            }
            if parsed.is_missing_expr() {
                error.get_or_insert_with(|| ParsingError::unspecified(INVALID_MARKUP_INTERP));
            }

            shift_node_spans(&mut parsed, start);
            self.absorb_sub_parser(sub, start);
            expr = Some(parsed);
        }

        self.push_sub_token(TokenType::ClosingCurlyBracket, TokenSubType::MarkupInterpClosingBrace, end, end + 1);
        flavor.interpolation(NodeSpan::new(start, end), error, expr)
    }

    fn markup_text(&self, start: usize, end: usize) -> Node {
        let raw = self.text(start, end);
        MarkupText {
            base: NodeBase::new(NodeSpan::new(start, end)),
            value: unescape_markup_text(&raw),
            raw,
        }
        .into()
    }

    fn finish_markup_element(&mut self, parts: MarkupElementParts) -> Node {
        let opening_span = NodeSpan::new(parts.start, parts.opening_end);
        let span = self.span_from(parts.start);

        match parts.flavor {
            MarkupFlavor::Expression => {
                let opening = MarkupOpeningTag {
                    base: NodeBase::with_opt_error(opening_span, parts.opening_error),
                    name: Box::new(parts.name),
                    attributes: parts.attributes,
                    self_closed: parts.self_closed,
                };
                let (content_start, content_end) = parts.raw_content.unwrap_or_default();
                MarkupElement {
                    base: NodeBase::with_opt_error(span, parts.error),
                    opening: Box::new(opening.into()),
                    region_headers: parts.region_headers,
                    children: parts.children,
                    closing: parts.closing.map(Box::new),
                    raw_element_type: parts.raw_element_type,
                    raw_element_content: self.text(content_start, content_end),
                    raw_element_content_start: content_start,
                    raw_element_content_end: content_end,
                    raw_element_parsing_result: parts.raw_parsing_result,
                }
                .into()
            }
            MarkupFlavor::Pattern => {
                let opening = MarkupPatternOpeningTag {
                    base: NodeBase::with_opt_error(opening_span, parts.opening_error),
                    name: Box::new(parts.name),
                    attributes: parts.attributes,
                    self_closed: parts.self_closed,
                    quantifier: parts.quantifier,
                };
                MarkupPatternElement {
                    base: NodeBase::with_opt_error(span, parts.error),
                    opening: Box::new(opening.into()),
                    region_headers: parts.region_headers,
                    children: parts.children,
                    closing: parts.closing.map(Box::new),
                    raw_element_type: parts.raw_element_type,
                }
                .into()
            }
        }
    }
}

/// Decode the character references (`&lt;`, `&#65;`, `&#x41;`) of a text slice. Invalid
/// references are kept as written.
fn unescape_markup_text(raw: &str) -> String {
    if !raw.contains('&') {
        return raw.to_string();
    }

    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];

        let decoded = rest
            .find(';')
            .filter(|&semicolon| semicolon <= 10)
            .and_then(|semicolon| Some((decode_character_reference(&rest[1..semicolon])?, semicolon)));
        match decoded {
            Some((c, semicolon)) => {
                out.push(c);
                rest = &rest[semicolon + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_character_reference(name: &str) -> Option<char> {
    match name {
        "lt" => Some('<'),
        "gt" => Some('>'),
        "amp" => Some('&'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => {
            let digits = name.strip_prefix('#')?;
            let code = match digits.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => digits.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}
