//! Character classes the scanner branches on.
//!
//! The parser works on decoded code units (`char`), so every predicate here takes a `char`.
//! Delimiter families drive most of the "stop here" decisions: an unquoted string, a path or a
//! command-like call argument all end at the first delimiter.

/// ASCII letter.
pub fn is_alpha(c: char) -> bool {
    c.is_ascii_alphabetic()
}

/// ASCII decimal digit.
pub fn is_dec_digit(c: char) -> bool {
    c.is_ascii_digit()
}

/// Character allowed inside an identifier (after the first one).
pub fn is_ident_char(c: char) -> bool {
    is_alpha(c) || is_dec_digit(c) || c == '-' || c == '_'
}

/// Character allowed as the first character of an identifier.
pub fn is_first_ident_char(c: char) -> bool {
    is_alpha(c) || c == '_'
}

/// Base letter of a byte slice literal (`0x[...]`, `0d[...]`, `0b[...]`).
pub fn is_byte_slice_base(c: char) -> bool {
    matches!(c, 'x' | 'd' | 'b')
}

/// Character allowed inside a `{...}` interpolation of a path or URL.
pub fn is_interpolation_allowed_char(c: char) -> bool {
    is_ident_char(c) || matches!(c, '[' | ']' | '.' | '$' | ':')
}

/// Character allowed inside an unquoted string.
pub fn is_unquoted_string_char(c: char) -> bool {
    is_ident_char(c) || matches!(c, '+' | '~' | '/' | '^' | '@' | '.' | '%')
}

/// Space that does not end a line.
pub fn is_space_not_lf(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r')
}

/// Character that must follow `#` for it to start a comment.
pub fn is_comment_first_space(c: char) -> bool {
    is_space_not_lf(c)
}

/// Delimiters: brackets and the unpaired separators.
pub fn is_delim(c: char) -> bool {
    matches!(c, '{' | '}' | '[' | ']' | '(' | ')') || is_unpaired_delim(c)
}

/// Separators that have no matching counterpart.
pub fn is_unpaired_delim(c: char) -> bool {
    matches!(c, '\n' | ',' | ';' | ':' | '|')
}

/// Opening or closing bracket.
pub fn is_paired_delim(c: char) -> bool {
    matches!(c, '{' | '}' | '[' | ']' | '(' | ')')
}

pub fn is_opening_delim(c: char) -> bool {
    matches!(c, '{' | '[' | '(')
}

pub fn is_closing_delim(c: char) -> bool {
    matches!(c, '}' | ')' | ']')
}

/// Unpaired separator, closing bracket or `=`.
pub fn is_unpaired_or_closing_delim(c: char) -> bool {
    matches!(c, '\n' | ',' | ';' | ':' | '=' | ')' | ']' | '}' | '|')
}

/// CSS combinators other than the descendant (space) combinator.
pub fn is_non_space_css_combinator(c: char) -> bool {
    matches!(c, '>' | '~' | '+')
}

/// Unicode space that is neither a line feed nor an ordinary space-like character.
///
/// Such characters are rejected where they would be invisible to a reader (e.g. U+00A0).
pub fn is_forbidden_space_character(c: char) -> bool {
    c.is_whitespace() && c != '\n' && !is_space_not_lf(c)
}

/// Number of consecutive backslashes right before `index`.
pub fn count_prev_backslashes(s: &[char], index: usize) -> usize {
    s[..index.min(s.len())].iter().rev().take_while(|&&c| c == '\\').count()
}

/// Report whether `s` contains an unescaped `[`.
pub fn contains_not_escaped_bracket(s: &[char]) -> bool {
    contains_not_escaped(s, '[')
}

/// Report whether `s` contains an unescaped `$`.
pub fn contains_not_escaped_dollar(s: &[char]) -> bool {
    contains_not_escaped(s, '$')
}

fn contains_not_escaped(s: &[char], needle: char) -> bool {
    s.iter()
        .enumerate()
        .any(|(i, &c)| c == needle && count_prev_backslashes(s, i) % 2 == 0)
}

/// Report whether `s` starts like a path literal (`/`, `./` or `../`).
pub fn has_path_like_start(s: &str) -> bool {
    s.starts_with('/') || s.starts_with("./") || s.starts_with("../")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delimiter_families_are_consistent() {
        for c in ['\n', ',', ';', ':', '|'] {
            assert!(is_unpaired_delim(c));
            assert!(is_delim(c));
            assert!(is_unpaired_or_closing_delim(c));
        }
        for c in ['}', ')', ']'] {
            assert!(is_closing_delim(c));
            assert!(is_unpaired_or_closing_delim(c));
        }
        assert!(is_unpaired_or_closing_delim('='));
        assert!(!is_delim('='));
    }

    #[test]
    fn test_forbidden_space_characters() {
        assert!(is_forbidden_space_character('\u{00A0}'));
        assert!(is_forbidden_space_character('\u{2003}'));
        assert!(!is_forbidden_space_character(' '));
        assert!(!is_forbidden_space_character('\t'));
        assert!(!is_forbidden_space_character('\n'));
    }

    #[test]
    fn test_escapes() {
        let s: Vec<char> = r"a\[b".chars().collect();
        assert!(!contains_not_escaped_bracket(&s));
        let s: Vec<char> = r"a\\[b".chars().collect();
        assert!(contains_not_escaped_bracket(&s));
        let s: Vec<char> = "$x".chars().collect();
        assert!(contains_not_escaped_dollar(&s));
    }

    #[test]
    fn test_path_like_start() {
        assert!(has_path_like_start("/a"));
        assert!(has_path_like_start("../a"));
        assert!(!has_path_like_start(".a"));
    }
}
