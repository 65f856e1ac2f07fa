/// Numeric literals: integers, floats, ranges, quantities, rates, date-like literals, ports and
/// byte slices.
///
/// All of them share the same numeric prefix scanner; the code unit following the number decides
/// what the literal becomes (`..` for ranges, a unit for quantities, `y-` for date-like literals).
///
/// ## Notes
/// - This file is `include!`'d into `crate::parser`.
/// - Literal tokens are derived from the nodes, only the `..` of ranges is recorded here.

/// Kind of a date-like literal, given by its most precise part.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateLikeKind {
    Year,
    Date,
    DateTime,
}

/// Parts of a date-like literal in the order they must appear, with their maximum digit count.
const DATE_LIKE_UNITS: [(&str, usize); 7] = [
    ("mt", 2),
    ("d", 2),
    ("h", 2),
    ("m", 2),
    ("s", 2),
    ("ms", 3),
    ("us", 3),
];

impl<'a> Parser<'a> {
    /// Number, number range, quantity, quantity range, rate or date-like literal. The cursor is on
    /// the first digit or on a leading `-`.
    fn parse_number_and_range_and_rate_literals(&mut self) -> Node {
        let start = self.i;
        let number = self.parse_number_and_number_range();

        let (value, is_float) = match &number {
            Node::IntLiteral(n) => (n.value as f64, false),
            Node::FloatLiteral(n) => (n.value, true),
            _ => return number,
        };

        if !self.peek_matches(|c| is_alpha(c) || c == '%') {
            return number;
        }

        if let Node::IntLiteral(int) = &number {
            let message = if int.raw.trim_start_matches('-').starts_with("0x") {
                Some(QUANTITY_LIT_NOT_ALLOWED_WITH_HEXADECIMAL_NUM)
            } else if int.raw.trim_start_matches('-').starts_with("0o") {
                Some(QUANTITY_LIT_NOT_ALLOWED_WITH_OCTAL_NUM)
            } else {
                None
            };
            if let Some(message) = message {
                while self.peek_matches(|c| is_alpha(c) || c == '%') {
                    self.i += 1;
                }
                return QuantityLiteral {
                    base: NodeBase::with_error(self.span_from(start), ParsingError::unspecified(message)),
                    raw: self.text(start, self.i),
                    values: vec![value],
                    units: Vec::new(),
                }
                .into();
            }
        }

        let quantity = self.parse_quantity_or_rate_literal(start, value, is_float);
        if matches!(&quantity, Node::QuantityLiteral(q) if q.base.error.is_none()) && self.at_str("..") {
            return self.parse_quantity_range(quantity);
        }
        quantity
    }

    /// Integer, float, integer range or float range literal.
    fn parse_number_and_number_range(&mut self) -> Node {
        let start = self.i;
        if self.peek_is('-') {
            self.i += 1;
        }

        let digits_start = self.i;
        if self.peek_is('0') && self.next_is(1, 'x') && self.char_at(self.i + 2).is_some_and(|c| c.is_ascii_hexdigit()) {
            self.i += 2;
            while self.peek_matches(|c| c.is_ascii_hexdigit() || c == '_') {
                self.i += 1;
            }
            return self.int_literal(start, self.i);
        }
        if self.peek_is('0') && self.next_is(1, 'o') && self.char_at(self.i + 2).is_some_and(|c| c.is_digit(8)) {
            self.i += 2;
            while self.peek_matches(|c| c.is_digit(8) || c == '_') {
                self.i += 1;
            }
            return self.int_literal(start, self.i);
        }
        if self.peek_is('0') && self.char_at(self.i + 1).is_some_and(is_byte_slice_base) && self.next_is(2, '[') {
            return self.parse_byte_slices();
        }

        self.eat_decimal_digits();
        if self.i == digits_start {
            return self.int_literal(start, self.i);
        }

        if self.at_str("..") {
            let lower = self.int_literal(start, self.i);
            return self.parse_int_range(lower);
        }

        if !self.peek_is('.') {
            return self.int_literal(start, self.i);
        }

        self.i += 1;
        self.eat_decimal_digits();
        if self.peek_is('e') {
            self.i += 1;
            if self.peek_matches(|c| c == '-' || c == '+') {
                self.i += 1;
            }
            while self.peek_matches(is_dec_digit) {
                self.i += 1;
            }
        }

        let float = self.float_literal(start, self.i);
        if float.error().is_none() && self.at_str("..") {
            return self.parse_float_range(float);
        }
        float
    }

    fn eat_decimal_digits(&mut self) {
        while self.peek_matches(|c| is_dec_digit(c) || c == '_') {
            self.i += 1;
        }
    }

    fn int_literal(&self, start: usize, end: usize) -> Node {
        let raw = self.text(start, end);
        let value = parse_int_text(&raw);
        IntLiteral {
            base: NodeBase::with_opt_error(
                NodeSpan::new(start, end),
                value.is_none().then(|| ParsingError::unspecified(INVALID_INT_LIT)),
            ),
            value: value.unwrap_or_default(),
            raw,
        }
        .into()
    }

    fn float_literal(&self, start: usize, end: usize) -> Node {
        let raw = self.text(start, end);
        let value = raw.replace('_', "").parse::<f64>().ok().filter(|v| v.is_finite());
        FloatLiteral {
            base: NodeBase::with_opt_error(
                NodeSpan::new(start, end),
                value.is_none().then(|| ParsingError::unspecified(INVALID_FLOAT_LIT)),
            ),
            value: value.unwrap_or_default(),
            raw,
        }
        .into()
    }

    /// Record the `..` of a range literal and move past it.
    fn eat_range_dots(&mut self) {
        self.push_token(TokenType::TwoDots, self.i, self.i + 2);
        self.i += 2;
    }

    /// `1..10`. The cursor is on the first dot.
    fn parse_int_range(&mut self, lower: Node) -> Node {
        let start = lower.span().start;
        self.eat_range_dots();

        let upper_start = self.i;
        if self.peek_is('-') && self.char_at(self.i + 1).is_some_and(is_dec_digit) {
            self.i += 1;
        }
        if !self.peek_matches(is_dec_digit) {
            self.i = upper_start;
            return IntegerRangeLiteral {
                base: NodeBase::with_error(self.span_from(start), ParsingError::unspecified(UNTERMINATED_INT_RANGE_LIT)),
                lower_bound: Box::new(lower),
                upper_bound: None,
            }
            .into();
        }

        self.eat_decimal_digits();
        let mut error = None;
        let upper = if self.peek_is('.') && self.char_at(self.i + 1).is_some_and(is_dec_digit) {
            self.i += 1;
            self.eat_decimal_digits();
            error = Some(ParsingError::unspecified(UPPER_BOUND_OF_INT_RANGE_LIT_SHOULD_BE_INT_LIT));
            self.float_literal(upper_start, self.i)
        } else {
            self.int_literal(upper_start, self.i)
        };

        IntegerRangeLiteral {
            base: NodeBase::with_opt_error(self.span_from(start), error),
            lower_bound: Box::new(lower),
            upper_bound: Some(Box::new(upper)),
        }
        .into()
    }

    /// `1.5..2.5`. The cursor is on the first dot.
    fn parse_float_range(&mut self, lower: Node) -> Node {
        let start = lower.span().start;
        self.eat_range_dots();

        let upper_start = self.i;
        let has_upper = self.peek_matches(is_dec_digit)
            || (self.peek_is('-') && self.char_at(self.i + 1).is_some_and(is_dec_digit));
        if !has_upper {
            return FloatRangeLiteral {
                base: NodeBase::with_error(
                    self.span_from(start),
                    ParsingError::unspecified(UPPER_BOUND_OF_FLOAT_RANGE_LIT_SHOULD_BE_FLOAT_LIT),
                ),
                lower_bound: Box::new(lower),
                upper_bound: None,
            }
            .into();
        }

        if self.peek_is('-') {
            self.i += 1;
        }
        self.eat_decimal_digits();
        let upper = if self.peek_is('.') && !self.next_is(1, '.') {
            self.i += 1;
            self.eat_decimal_digits();
            self.float_literal(upper_start, self.i)
        } else {
            self.int_literal(upper_start, self.i)
        };

        let error = (!matches!(upper, Node::FloatLiteral(_)))
            .then(|| ParsingError::unspecified(UPPER_BOUND_OF_FLOAT_RANGE_LIT_SHOULD_BE_FLOAT_LIT));

        FloatRangeLiteral {
            base: NodeBase::with_opt_error(self.span_from(start), error),
            lower_bound: Box::new(lower),
            upper_bound: Some(Box::new(upper)),
        }
        .into()
    }

    /// `1kB..2kB`. The cursor is on the first dot.
    fn parse_quantity_range(&mut self, lower: Node) -> Node {
        let start = lower.span().start;
        self.eat_range_dots();

        if !self.peek_matches(is_dec_digit) {
            return QuantityRangeLiteral {
                base: NodeBase::with_error(self.span_from(start), ParsingError::unspecified(UNTERMINATED_QTY_RANGE_LIT)),
                lower_bound: Box::new(lower),
                upper_bound: None,
            }
            .into();
        }

        let upper = self.parse_number_and_range_and_rate_literals();
        let error = (!matches!(upper, Node::QuantityLiteral(_)))
            .then(|| ParsingError::unspecified(UPPER_BOUND_OF_QTY_RANGE_LIT_SHOULD_BE_QTY_LIT));

        QuantityRangeLiteral {
            base: NodeBase::with_opt_error(self.span_from(start), error),
            lower_bound: Box::new(lower),
            upper_bound: Some(Box::new(upper)),
        }
        .into()
    }

    // ========================================================================
    // Quantities & rates
    // ========================================================================

    /// `10kB`, `1h30m`, `10%`, `5kB/s`. The cursor is on the first unit char.
    ///
    /// An integer followed by `y-` starts a date-like literal instead.
    fn parse_quantity_or_rate_literal(&mut self, start: usize, value: f64, is_float: bool) -> Node {
        if !is_float && self.peek_is('y') && self.next_is(1, '-') {
            return self.parse_date_like_literal(start);
        }

        let mut error = None;
        let mut values = vec![value];
        let mut units = vec![self.eat_unit()];

        while self.peek_matches(is_dec_digit) {
            match self.parse_number_and_number_range() {
                Node::IntLiteral(n) => values.push(n.value as f64),
                Node::FloatLiteral(n) => values.push(n.value),
                _ => {
                    error = Some(ParsingError::unspecified(INVALID_QUANTITY_LIT));
                    break;
                }
            }
            if !self.peek_matches(is_alpha) {
                error = Some(ParsingError::unspecified(INVALID_QUANTITY_LIT));
                break;
            }
            units.push(self.eat_unit());
        }

        let raw = self.text(start, self.i);
        if !self.peek_is('/') {
            return QuantityLiteral {
                base: NodeBase::with_opt_error(self.span_from(start), error),
                raw,
                values,
                units,
            }
            .into();
        }

        self.i += 1;
        let mut div_unit = String::new();
        match self.peek() {
            None => error = Some(ParsingError::unspecified(INVALID_RATE_LIT_DIV_SYMBOL_SHOULD_BE_FOLLOWED_BY_UNIT)),
            Some(c) if !is_alpha(c) => error = Some(ParsingError::unspecified(INVALID_RATE_LIT)),
            Some(_) => {
                let unit_start = self.i;
                while self.peek_matches(is_alpha) {
                    self.i += 1;
                }
                div_unit = self.text(unit_start, self.i);
                if self.peek_matches(is_ident_char) {
                    error = Some(ParsingError::unspecified(INVALID_RATE_LIT));
                }
            }
        }

        RateLiteral {
            base: NodeBase::with_opt_error(self.span_from(start), error),
            raw: format!("{raw}/{div_unit}"),
            values,
            units,
            div_unit,
        }
        .into()
    }

    /// Unit of a quantity: `%` or a run of letters.
    fn eat_unit(&mut self) -> String {
        let start = self.i;
        self.i += 1;
        while self.peek_matches(is_alpha) {
            self.i += 1;
        }
        self.text(start, self.i)
    }

    // ========================================================================
    // Date-like literals
    // ========================================================================

    /// `2020y-UTC`, `2020y-10mt-5d-CET`, `2020y-10mt-5d-5h-30m-Europe/Paris`. The cursor is on
    /// the `y`.
    fn parse_date_like_literal(&mut self, start: usize) -> Node {
        self.i += 2;
        while self.peek_matches(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '/' | '_')) {
            self.i += 1;
        }

        let raw = self.text(start, self.i);
        let span = self.span_from(start);
        let (kind, result) = parse_date_like(&raw);
        let (value, error) = match result {
            Ok(value) => (Some(value), None),
            Err(error) => (None, Some(error)),
        };
        let base = NodeBase::with_opt_error(span, error);

        match kind {
            DateLikeKind::Year => YearLiteral { base, raw, value }.into(),
            DateLikeKind::Date => DateLiteral { base, raw, value }.into(),
            DateLikeKind::DateTime => DateTimeLiteral { base, raw, value }.into(),
        }
    }

    // ========================================================================
    // Ports
    // ========================================================================

    /// `:80` or `:443/https`. The cursor is on the colon.
    fn parse_port_literal(&mut self) -> Node {
        let start = self.i;
        self.i += 1;

        let mut port_number: u32 = 0;
        while let Some(digit) = self.peek().and_then(|c| c.to_digit(10)) {
            port_number = port_number.saturating_mul(10).saturating_add(digit);
            self.i += 1;
        }

        let mut error = u16::try_from(port_number)
            .is_err()
            .then(|| ParsingError::unspecified(INVALID_PORT_LITERAL_INVALID_PORT_NUMBER));

        let mut scheme_name = String::new();
        if self.peek_is('/') {
            self.i += 1;
            let name_start = self.i;
            while self.peek_matches(|c| is_alpha(c) || c == '-') {
                self.i += 1;
            }
            scheme_name = self.text(name_start, self.i);
            if scheme_name.is_empty() && error.is_none() {
                error = Some(ParsingError::unspecified(UNTERMINATED_PORT_LITERAL_MISSING_SCHEME_NAME_AFTER_SLASH));
            }
        }

        PortLiteral {
            base: NodeBase::with_opt_error(self.span_from(start), error),
            raw: self.text(start, self.i),
            port_number: u16::try_from(port_number).unwrap_or(u16::MAX),
            scheme_name,
        }
        .into()
    }

    // ========================================================================
    // Byte slices
    // ========================================================================

    /// `0x[ff 01]`, `0b[1010 0001]` and `0d[255 1]`. The cursor is on the `0`.
    fn parse_byte_slices(&mut self) -> Node {
        let start = self.i;
        self.i += 1;

        let Some(base) = self.peek() else {
            return self.invalid_byte_slice(start, UNKNOWN_BYTE_SLICE_BASE);
        };
        let missing_brackets = match base {
            'x' => UNTERMINATED_HEX_BYTE_SICE_LIT_MISSING_BRACKETS,
            'b' => UNTERMINATED_BIN_BYTE_SICE_LIT_MISSING_BRACKETS,
            'd' => UNTERMINATED_DECIMAL_BYTE_SICE_LIT_MISSING_BRACKETS,
            _ => return self.invalid_byte_slice(start, UNKNOWN_BYTE_SLICE_BASE),
        };
        self.i += 1;
        if !self.peek_is('[') {
            return self.invalid_byte_slice(start, missing_brackets);
        }
        self.i += 1;

        let mut errors: Vec<String> = Vec::new();
        let value = match base {
            'x' => self.eat_hex_bytes(&mut errors),
            'b' => self.eat_binary_bytes(&mut errors),
            _ => self.eat_decimal_bytes(&mut errors),
        };

        if self.at_end() {
            errors.push(UNTERMINATED_BYTE_SICE_LIT_MISSING_CLOSING_BRACKET.to_string());
        } else {
            self.i += 1;
        }

        let error = (!errors.is_empty()).then(|| ParsingError::unspecified(errors.join("\n")));
        ByteSliceLiteral {
            base: NodeBase::with_opt_error(self.span_from(start), error),
            raw: self.text(start, self.i),
            value,
        }
        .into()
    }

    fn invalid_byte_slice(&self, start: usize, message: &str) -> Node {
        ByteSliceLiteral {
            base: NodeBase::with_error(self.span_from(start), ParsingError::unspecified(message)),
            raw: self.text(start, self.i),
            value: Vec::new(),
        }
        .into()
    }

    /// Hexadecimal digits up to `]`, spaces are ignored.
    fn eat_hex_bytes(&mut self, errors: &mut Vec<String>) -> Vec<u8> {
        self.eat_space();
        let mut digits = String::new();
        while let Some(c) = self.peek().filter(|&c| c != ']') {
            if c.is_ascii_digit() || c.is_ascii_lowercase() {
                digits.push(c);
            } else {
                errors.push(fmt_unexpected_char_in_hexadecimal_byte_slice_literal(c));
            }
            self.i += 1;
            self.eat_space();
        }

        if !errors.is_empty() {
            return Vec::new();
        }
        if digits.len() % 2 != 0 {
            errors.push(INVALID_HEX_BYTE_SICE_LIT_LENGTH_SHOULD_BE_EVEN.to_string());
            return Vec::new();
        }

        let bytes: Option<Vec<u8>> = (0..digits.len())
            .step_by(2)
            .map(|i| u8::from_str_radix(&digits[i..i + 2], 16).ok())
            .collect();
        bytes.unwrap_or_else(|| {
            errors.push(INVALID_HEX_BYTE_SICE_LIT_FAILED_TO_DECODE.to_string());
            Vec::new()
        })
    }

    /// Bits up to `]`; an incomplete last byte keeps its bits in the low positions.
    fn eat_binary_bytes(&mut self, errors: &mut Vec<String>) -> Vec<u8> {
        self.eat_space();
        let mut value = Vec::new();
        let mut byte: u8 = 0;
        let mut bit_count = 0;

        while let Some(c) = self.peek().filter(|&c| c != ']') {
            match c {
                '0' | '1' => {
                    byte = (byte << 1) | u8::from(c == '1');
                    bit_count += 1;
                    if bit_count == 8 {
                        value.push(byte);
                        byte = 0;
                        bit_count = 0;
                    }
                }
                ' ' | '\n' | '\r' => {}
                _ => errors.push(fmt_unexpected_char_in_bin_byte_slice_literal(c)),
            }
            self.i += 1;
            self.eat_space();
        }
        if bit_count != 0 {
            value.push(byte);
        }
        value
    }

    /// Space-separated decimal bytes up to `]`.
    fn eat_decimal_bytes(&mut self, errors: &mut Vec<String>) -> Vec<u8> {
        self.eat_space();
        let mut words: Vec<String> = Vec::new();
        let mut current = String::new();

        while let Some(c) = self.peek().filter(|&c| c != ']') {
            match c {
                '0'..='9' => current.push(c),
                ' ' | '\t' | '\r' => {
                    if !current.is_empty() {
                        words.push(std::mem::take(&mut current));
                    }
                }
                _ => errors.push(fmt_unexpected_char_in_decimal_byte_slice_literal(c)),
            }
            self.i += 1;
        }
        if !current.is_empty() {
            words.push(current);
        }

        if !errors.is_empty() {
            return Vec::new();
        }

        let mut value = Vec::with_capacity(words.len());
        for word in &words {
            match word.parse::<u8>() {
                Ok(byte) if word.len() <= 3 => value.push(byte),
                _ => {
                    errors.push(fmt_invalid_byte_in_decimal_byte_slice_literal(word));
                    return Vec::new();
                }
            }
        }
        value
    }
}

/// Integer value of a literal (`_` separators, optional sign, `0x`/`0o` prefixes).
fn parse_int_text(raw: &str) -> Option<i64> {
    let digits = raw.replace('_', "");
    let (sign, unsigned) = match digits.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", digits.as_str()),
    };
    let (radix, body) = if let Some(body) = unsigned.strip_prefix("0x") {
        (16, body)
    } else if let Some(body) = unsigned.strip_prefix("0o") {
        (8, body)
    } else {
        (10, unsigned)
    };
    if body.is_empty() {
        return None;
    }
    i64::from_str_radix(&format!("{sign}{body}"), radix).ok()
}

/// Parse the raw text of a year, date or datetime literal.
///
/// The literal is `<year>y`, followed by optional `-<n>mt`, `-<n>d`, `-<n>h`, `-<n>m`, `-<n>s`,
/// `-<n>ms`, `-<n>us` parts in this order, and ends with a location (`-UTC`,
/// `-America/Los_Angeles`). The kind is returned even when the literal is invalid.
pub fn parse_date_like(raw: &str) -> (DateLikeKind, Result<DateValue, ParsingError>) {
    let invalid = |message: &str| Err(ParsingError::unspecified(message));

    let Some((year_part, rest)) = raw.split_once('-') else {
        return (DateLikeKind::Year, invalid(INVALID_DATELIKE_LITERAL_MISSING_LOCATION_PART_AT_THE_END));
    };
    let Some(year) = year_part.strip_suffix('y').and_then(|y| y.parse::<i32>().ok()) else {
        return (DateLikeKind::Year, invalid(INVALID_YEAR_LITERAL));
    };

    let mut values: [Option<u32>; 7] = [None; 7];
    let mut last_rank: Option<usize> = None;
    let mut location = None;
    let mut malformed = false;

    let mut remaining = rest;
    while !remaining.is_empty() {
        if !remaining.starts_with(|c: char| c.is_ascii_digit()) {
            location = Some(remaining);
            break;
        }
        let (part, next) = remaining.split_once('-').unwrap_or((remaining, ""));
        remaining = next;

        let digit_count = part.chars().take_while(char::is_ascii_digit).count();
        let (digits, unit) = part.split_at(digit_count);
        let rank = DATE_LIKE_UNITS.iter().position(|(name, _)| *name == unit);
        match rank {
            Some(rank) if last_rank.is_none_or(|last| rank > last) && digits.len() <= DATE_LIKE_UNITS[rank].1 => {
                values[rank] = digits.parse().ok();
                last_rank = Some(rank);
            }
            _ => malformed = true,
        }
    }

    let [month, day, hour, minute, second, millis, micros] = values;
    let kind = if hour.is_some() || minute.is_some() || second.is_some() || millis.is_some() || micros.is_some() {
        DateLikeKind::DateTime
    } else if month.is_some() || day.is_some() {
        DateLikeKind::Date
    } else {
        DateLikeKind::Year
    };

    if malformed {
        return (kind, invalid(INVALID_DATE_LIKE_LITERAL));
    }
    let Some(location) = location else {
        let message = if raw.ends_with('-') {
            UNTERMINATED_DATE_LITERAL
        } else {
            INVALID_DATELIKE_LITERAL_MISSING_LOCATION_PART_AT_THE_END
        };
        return (kind, invalid(message));
    };
    if !is_valid_location(location) {
        return (kind, invalid(INVALID_DATE_LIKE_LITERAL));
    }

    let missing = match (kind, month, day) {
        (DateLikeKind::Date, Some(_), None) => Some(INVALID_DATE_LITERAL_DAY_COUNT_PROBABLY_MISSING),
        (DateLikeKind::Date, None, Some(_)) => Some(INVALID_DATE_LITERAL_MONTH_COUNT_PROBABLY_MISSING),
        (DateLikeKind::DateTime, None, None) => Some(INVALID_DATETIME_LITERAL_BOTH_MONTH_AND_DAY_COUNT_PROBABLY_MISSING),
        (DateLikeKind::DateTime, Some(_), None) => Some(INVALID_DATETIME_LITERAL_DAY_COUNT_PROBABLY_MISSING),
        (DateLikeKind::DateTime, None, Some(_)) => Some(INVALID_DATETIME_LITERAL_MONTH_COUNT_PROBABLY_MISSING),
        _ => None,
    };
    if let Some(message) = missing {
        return (kind, invalid(message));
    }

    let invalid_value = match kind {
        DateLikeKind::Year => INVALID_YEAR_LITERAL,
        DateLikeKind::Date => INVALID_DATE_LITERAL,
        DateLikeKind::DateTime => INVALID_DATETIME_LITERAL,
    };
    let Some(date) = NaiveDate::from_ymd_opt(year, month.unwrap_or(1), day.unwrap_or(1)) else {
        return (kind, invalid(invalid_value));
    };
    let micros = millis.unwrap_or(0) * 1_000 + micros.unwrap_or(0);
    let Some(time) = NaiveTime::from_hms_micro_opt(hour.unwrap_or(0), minute.unwrap_or(0), second.unwrap_or(0), micros)
    else {
        return (kind, invalid(invalid_value));
    };

    (
        kind,
        Ok(DateValue {
            datetime: NaiveDateTime::new(date, time),
            location: location.to_string(),
        }),
    )
}

/// Location names: letters, `_`, `/` and `-`, ending with a letter or `_`.
fn is_valid_location(location: &str) -> bool {
    location
        .chars()
        .all(|c| c.is_ascii_alphabetic() || matches!(c, '_' | '/' | '-'))
        && location.ends_with(|c: char| c.is_ascii_alphabetic() || c == '_')
}
