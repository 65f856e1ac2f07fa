/// Whitespace, separator and comment skipping.
///
/// Each `eat_*` variant consumes a different set of separators and pushes the valueless tokens of
/// what it consumed (newlines, commas, semicolons, comments).
///
/// ## Notes
/// - This file is `include!`'d into `crate::parser`.
/// - A comment is `#` followed by a space; `#name` and `#{` are expressions.
impl<'a> Parser<'a> {
    /// Consume a comment if the cursor is on one.
    fn eat_comment(&mut self) -> bool {
        let start = self.i;
        if !self.char_at(self.i + 1).is_some_and(is_comment_first_space) {
            return false;
        }
        self.i += 2;
        while self.peek().is_some_and(|c| c != '\n') {
            self.i += 1;
        }
        self.push_raw_token(TokenType::Comment, start, self.i);
        true
    }

    fn eat_space(&mut self) {
        while self.peek_matches(is_space_not_lf) {
            self.i += 1;
        }
    }

    /// Shared loop of the `eat_*` variants.
    fn eat_separators(&mut self, newlines: bool, commas: bool, semicolons: bool, comments: bool) {
        while let Some(c) = self.peek() {
            match c {
                ' ' | '\t' | '\r' => {}
                '\n' if newlines => self.push_token_at(TokenType::Newline, self.i),
                ',' if commas => self.push_token_at(TokenType::Comma, self.i),
                ';' if semicolons => self.push_token_at(TokenType::Semicolon, self.i),
                '#' if comments => {
                    if !self.eat_comment() {
                        return;
                    }
                    continue;
                }
                _ => return,
            }
            self.i += 1;
        }
    }

    fn eat_space_newline(&mut self) {
        self.eat_separators(true, false, false, false);
    }

    fn eat_space_comments(&mut self) {
        self.eat_separators(false, false, false, true);
    }

    fn eat_space_newline_comment(&mut self) {
        self.eat_separators(true, false, false, true);
    }

    fn eat_space_newline_comma_comment(&mut self) {
        self.eat_separators(true, true, false, true);
    }

    fn eat_space_newline_semicolon_comment(&mut self) {
        self.eat_separators(true, false, true, true);
    }

    fn eat_space_newline_comma(&mut self) {
        self.eat_separators(true, true, false, false);
    }

    fn eat_space_comma(&mut self) {
        self.eat_separators(false, true, false, false);
    }

    /// Whether the next non-space char is `c` (the cursor does not move).
    fn are_next_spaces_followed_by(&self, c: char) -> bool {
        let mut j = self.i;
        while self.char_at(j).is_some_and(is_space_not_lf) {
            j += 1;
        }
        self.char_at(j) == Some(c)
    }
}

