//! Define the fixed spellings of Inox punctuation and operators.
//!
//! Every valueless token that is not a reserved word has its spelling here. The token model in
//! `inox_syntax` maps each token type onto a [`LexemeId`] (or a keyword) so the printer and the
//! diagnostics never hardcode spellings.
//!
//! ## Notes
//! - Several lexemes share a spelling (`{` opens a block, an object or an interpolation); the
//!   parser disambiguates them through token sub-types, not through this table.
//! - [`from_str`] returns the first entry with a given spelling.
//!
//! ## Examples
//! ```rust
//! use inox_core::lang::lexemes::{self, LexemeId};
//!
//! assert_eq!(lexemes::as_str(LexemeId::OpeningRecordBracket), "#{");
//! assert_eq!(lexemes::from_str("not-in"), Some(LexemeId::NotIn));
//! ```

use super::registry::Since;

/// Stable identifier for a punctuation or operator lexeme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LexemeId {
    // Delimiter
    OpeningBracket,
    ClosingBracket,
    OpeningCurlyBracket,
    ClosingCurlyBracket,
    OpeningParenthesis,
    ClosingParenthesis,
    OpeningDictionaryBracket,
    OpeningKeylistBracket,
    OpeningRecordBracket,
    OpeningTupleBracket,
    OpeningObjectPatternBracket,
    OpeningListPatternBracket,
    OpeningDictionaryPatternBracket,
    PatternUnionOpeningPipe,
    StrInterpOpeningBrackets,
    StrInterpClosingBrackets,
    UnquotedRegionOpeningDelim,
    UnquotedRegionClosingDelim,
    OpeningQuotedStmtsRegionBrace,
    SelfClosingTagTerminator,
    EndTagOpenDelimiter,
    Backquote,
    // Separator
    Comma,
    Colon,
    Semicolon,
    Newline,
    Pipe,
    Ampersand,
    // Access
    Dot,
    DoubleColon,
    DotLessThan,
    QuestionMark,
    // Marker
    Arrow,
    AtSign,
    Dollar,
    DoubleDollar,
    Percent,
    PercentFn,
    PercentStr,
    CssSelectorPrefix,
    ThreeDots,
    Tilde,
    Hash,
    // Assignment
    Equal,
    PlusEqual,
    MinusEqual,
    MulEqual,
    DivEqual,
    // Operator
    Plus,
    PlusDot,
    Minus,
    MinusDot,
    Asterisk,
    AsteriskDot,
    Slash,
    SlashDot,
    LessThan,
    LessThanDot,
    LessOrEqual,
    LessOrEqualDot,
    GreaterThan,
    GreaterThanDot,
    GreaterOrEqual,
    GreaterOrEqualDot,
    EqualEqual,
    ExclamationMarkEqual,
    ExclamationMark,
    DoubleQuestionMark,
    TwoDots,
    DotDotLessThan,
    AntiSlash,
    // WordOperator
    In,
    NotIn,
    Is,
    IsNot,
    Keyof,
    Urlof,
    Match,
    NotMatch,
    Substrof,
    And,
    Or,
}

/// Lexeme grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexemeCategory {
    Delimiter,
    Separator,
    Access,
    Marker,
    Assignment,
    Operator,
    /// Binary operators spelled with letters (`in`, `not-match`, ...).
    WordOperator,
}

/// Metadata for a lexeme.
#[derive(Debug, Clone, Copy)]
pub struct LexemeInfo {
    pub id: LexemeId,
    pub canonical: &'static str,
    pub category: LexemeCategory,
    pub since: Since,
}

/// Registry of all punctuation and operator lexemes.
pub const LEXEMES: &[LexemeInfo] = &[
    info(LexemeId::OpeningBracket, "[", LexemeCategory::Delimiter),
    info(LexemeId::ClosingBracket, "]", LexemeCategory::Delimiter),
    info(LexemeId::OpeningCurlyBracket, "{", LexemeCategory::Delimiter),
    info(LexemeId::ClosingCurlyBracket, "}", LexemeCategory::Delimiter),
    info(LexemeId::OpeningParenthesis, "(", LexemeCategory::Delimiter),
    info(LexemeId::ClosingParenthesis, ")", LexemeCategory::Delimiter),
    info(LexemeId::OpeningDictionaryBracket, ":{", LexemeCategory::Delimiter),
    info(LexemeId::OpeningKeylistBracket, ".{", LexemeCategory::Delimiter),
    info(LexemeId::OpeningRecordBracket, "#{", LexemeCategory::Delimiter),
    info(LexemeId::OpeningTupleBracket, "#[", LexemeCategory::Delimiter),
    info(LexemeId::OpeningObjectPatternBracket, "%{", LexemeCategory::Delimiter),
    info(LexemeId::OpeningListPatternBracket, "%[", LexemeCategory::Delimiter),
    info(LexemeId::OpeningDictionaryPatternBracket, "%:{", LexemeCategory::Delimiter),
    info(LexemeId::PatternUnionOpeningPipe, "%|", LexemeCategory::Delimiter),
    info(LexemeId::StrInterpOpeningBrackets, "{{", LexemeCategory::Delimiter),
    info(LexemeId::StrInterpClosingBrackets, "}}", LexemeCategory::Delimiter),
    info(LexemeId::UnquotedRegionOpeningDelim, "<{", LexemeCategory::Delimiter),
    info(LexemeId::UnquotedRegionClosingDelim, "}>", LexemeCategory::Delimiter),
    info(LexemeId::OpeningQuotedStmtsRegionBrace, "@{", LexemeCategory::Delimiter),
    info(LexemeId::SelfClosingTagTerminator, "/>", LexemeCategory::Delimiter),
    info(LexemeId::EndTagOpenDelimiter, "</", LexemeCategory::Delimiter),
    info(LexemeId::Backquote, "`", LexemeCategory::Delimiter),
    info(LexemeId::Comma, ",", LexemeCategory::Separator),
    info(LexemeId::Colon, ":", LexemeCategory::Separator),
    info(LexemeId::Semicolon, ";", LexemeCategory::Separator),
    info(LexemeId::Newline, "\n", LexemeCategory::Separator),
    info(LexemeId::Pipe, "|", LexemeCategory::Separator),
    info(LexemeId::Ampersand, "&", LexemeCategory::Separator),
    info(LexemeId::Dot, ".", LexemeCategory::Access),
    info(LexemeId::DoubleColon, "::", LexemeCategory::Access),
    info(LexemeId::DotLessThan, ".<", LexemeCategory::Access),
    info(LexemeId::QuestionMark, "?", LexemeCategory::Access),
    info(LexemeId::Arrow, "=>", LexemeCategory::Marker),
    info(LexemeId::AtSign, "@", LexemeCategory::Marker),
    info(LexemeId::Dollar, "$", LexemeCategory::Marker),
    info(LexemeId::DoubleDollar, "$$", LexemeCategory::Marker),
    info(LexemeId::Percent, "%", LexemeCategory::Marker),
    info(LexemeId::PercentFn, "%fn", LexemeCategory::Marker),
    info(LexemeId::PercentStr, "%str", LexemeCategory::Marker),
    info(LexemeId::CssSelectorPrefix, "s!", LexemeCategory::Marker),
    info(LexemeId::ThreeDots, "...", LexemeCategory::Marker),
    info(LexemeId::Tilde, "~", LexemeCategory::Marker),
    info(LexemeId::Hash, "#", LexemeCategory::Marker),
    info(LexemeId::Equal, "=", LexemeCategory::Assignment),
    info(LexemeId::PlusEqual, "+=", LexemeCategory::Assignment),
    info(LexemeId::MinusEqual, "-=", LexemeCategory::Assignment),
    info(LexemeId::MulEqual, "*=", LexemeCategory::Assignment),
    info(LexemeId::DivEqual, "/=", LexemeCategory::Assignment),
    info(LexemeId::Plus, "+", LexemeCategory::Operator),
    info(LexemeId::PlusDot, "+.", LexemeCategory::Operator),
    info(LexemeId::Minus, "-", LexemeCategory::Operator),
    info(LexemeId::MinusDot, "-.", LexemeCategory::Operator),
    info(LexemeId::Asterisk, "*", LexemeCategory::Operator),
    info(LexemeId::AsteriskDot, "*.", LexemeCategory::Operator),
    info(LexemeId::Slash, "/", LexemeCategory::Operator),
    info(LexemeId::SlashDot, "/.", LexemeCategory::Operator),
    info(LexemeId::LessThan, "<", LexemeCategory::Operator),
    info(LexemeId::LessThanDot, "<.", LexemeCategory::Operator),
    info(LexemeId::LessOrEqual, "<=", LexemeCategory::Operator),
    info(LexemeId::LessOrEqualDot, "<=.", LexemeCategory::Operator),
    info(LexemeId::GreaterThan, ">", LexemeCategory::Operator),
    info(LexemeId::GreaterThanDot, ">.", LexemeCategory::Operator),
    info(LexemeId::GreaterOrEqual, ">=", LexemeCategory::Operator),
    info(LexemeId::GreaterOrEqualDot, ">=.", LexemeCategory::Operator),
    info(LexemeId::EqualEqual, "==", LexemeCategory::Operator),
    info(LexemeId::ExclamationMarkEqual, "!=", LexemeCategory::Operator),
    info(LexemeId::ExclamationMark, "!", LexemeCategory::Operator),
    info(LexemeId::DoubleQuestionMark, "??", LexemeCategory::Operator),
    info(LexemeId::TwoDots, "..", LexemeCategory::Operator),
    info(LexemeId::DotDotLessThan, "..<", LexemeCategory::Operator),
    info(LexemeId::AntiSlash, "\\", LexemeCategory::Operator),
    info(LexemeId::In, "in", LexemeCategory::WordOperator),
    info(LexemeId::NotIn, "not-in", LexemeCategory::WordOperator),
    info(LexemeId::Is, "is", LexemeCategory::WordOperator),
    info(LexemeId::IsNot, "is-not", LexemeCategory::WordOperator),
    info(LexemeId::Keyof, "keyof", LexemeCategory::WordOperator),
    info(LexemeId::Urlof, "urlof", LexemeCategory::WordOperator),
    info(LexemeId::Match, "match", LexemeCategory::WordOperator),
    info(LexemeId::NotMatch, "not-match", LexemeCategory::WordOperator),
    info(LexemeId::Substrof, "substrof", LexemeCategory::WordOperator),
    info(LexemeId::And, "and", LexemeCategory::WordOperator),
    info(LexemeId::Or, "or", LexemeCategory::WordOperator),
];

/// Canonical spelling.
pub fn as_str(id: LexemeId) -> &'static str {
    info_for(id).canonical
}

/// Category of a lexeme.
pub fn category(id: LexemeId) -> LexemeCategory {
    info_for(id).category
}

/// Full metadata.
///
/// ## Panics
/// - If the registry is missing an entry for `id` (this indicates a programming error).
pub fn info_for(id: LexemeId) -> &'static LexemeInfo {
    LEXEMES.iter().find(|l| l.id == id).expect("lexeme info missing")
}

/// Lookup by spelling.
pub fn from_str(s: &str) -> Option<LexemeId> {
    LEXEMES.iter().find(|l| l.canonical == s).map(|l| l.id)
}

/// Report whether `s` is a binary operator spelled with letters.
pub fn is_word_operator(s: &str) -> bool {
    LEXEMES
        .iter()
        .any(|l| l.category == LexemeCategory::WordOperator && l.canonical == s)
}

// --- helpers -----------------------------------------------------------------

const fn info(id: LexemeId, canonical: &'static str, category: LexemeCategory) -> LexemeInfo {
    LexemeInfo {
        id,
        canonical,
        category,
        since: Since(0, 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_id_has_exactly_one_entry() {
        for l in LEXEMES {
            assert_eq!(LEXEMES.iter().filter(|other| other.id == l.id).count(), 1, "{:?}", l.id);
        }
    }

    #[test]
    fn test_word_operators() {
        assert!(is_word_operator("substrof"));
        assert!(is_word_operator("is-not"));
        assert!(!is_word_operator("+"));
        assert!(!is_word_operator("manifest"));
    }
}
