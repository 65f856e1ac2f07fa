//! Define the reserved word vocabulary of Inox.
//!
//! A reserved word cannot be used where the parser expects a user-chosen identifier (a declared
//! variable, a function name, an object key in command-like calls, ...). Word operators such as
//! `not-in` or `substrof` are listed in [`crate::lang::lexemes`] instead: they are only reserved
//! in operator position.
//!
//! ## Examples
//! ```rust
//! use inox_core::lang::keywords::{self, KeywordCategory, KeywordId};
//!
//! assert_eq!(keywords::from_str("includable-chunk"), Some(KeywordId::IncludableChunk));
//! assert_eq!(keywords::category(KeywordId::Manifest), KeywordCategory::Header);
//! assert!(!keywords::is_keyword("manifests"));
//! ```

use super::registry::{Since, Stability};

/// Stable identifier for every reserved word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordId {
    If,
    Else,
    Preinit,
    Manifest,
    IncludableChunk,
    DropPerms,
    Assign,
    Readonly,
    Const,
    Var,
    Globalvar,
    For,
    Walk,
    In,
    Go,
    Import,
    Fn,
    Switch,
    Match,
    Defaultcase,
    Return,
    Yield,
    Coyield,
    Break,
    Continue,
    Prune,
    Assert,
    SelfRef,
    Supersys,
    Mapping,
    Comp,
    Udata,
    Concat,
    Testsuite,
    Testcase,
    Synchronized,
    Lifetimejob,
    On,
    Received,
    Do,
    Chunked,
    Sendval,
    Pattern,
    Pnamespace,
    Extend,
    Struct,
    New,
    Otherprops,
    To,
    And,
    Or,
    True,
    False,
    Nil,
}

/// Coarse grouping used by tooling (highlighting, completion).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeywordCategory {
    /// Only valid at the top of a chunk (`manifest`, `preinit`, ...).
    Header,
    Statement,
    Declaration,
    Expression,
    Literal,
    Operator,
}

/// Metadata for a reserved word.
#[derive(Debug, Clone, Copy)]
pub struct KeywordInfo {
    pub id: KeywordId,
    pub canonical: &'static str,
    pub category: KeywordCategory,
    pub since: Since,
    pub stability: Stability,
}

/// Registry of all reserved words.
pub const KEYWORDS: &[KeywordInfo] = &[
    info(KeywordId::If, "if", KeywordCategory::Statement, Since(0, 1), Stability::Stable),
    info(KeywordId::Else, "else", KeywordCategory::Statement, Since(0, 1), Stability::Stable),
    info(KeywordId::Preinit, "preinit", KeywordCategory::Header, Since(0, 1), Stability::Stable),
    info(KeywordId::Manifest, "manifest", KeywordCategory::Header, Since(0, 1), Stability::Stable),
    info(KeywordId::IncludableChunk, "includable-chunk", KeywordCategory::Header, Since(0, 1), Stability::Stable),
    info(KeywordId::DropPerms, "drop-perms", KeywordCategory::Statement, Since(0, 1), Stability::Stable),
    info(KeywordId::Assign, "assign", KeywordCategory::Statement, Since(0, 1), Stability::Stable),
    info(KeywordId::Readonly, "readonly", KeywordCategory::Expression, Since(0, 1), Stability::Stable),
    info(KeywordId::Const, "const", KeywordCategory::Declaration, Since(0, 1), Stability::Stable),
    info(KeywordId::Var, "var", KeywordCategory::Declaration, Since(0, 1), Stability::Stable),
    info(KeywordId::Globalvar, "globalvar", KeywordCategory::Declaration, Since(0, 2), Stability::Experimental),
    info(KeywordId::For, "for", KeywordCategory::Statement, Since(0, 1), Stability::Stable),
    info(KeywordId::Walk, "walk", KeywordCategory::Statement, Since(0, 1), Stability::Stable),
    info(KeywordId::In, "in", KeywordCategory::Operator, Since(0, 1), Stability::Stable),
    info(KeywordId::Go, "go", KeywordCategory::Expression, Since(0, 1), Stability::Stable),
    info(KeywordId::Import, "import", KeywordCategory::Statement, Since(0, 1), Stability::Stable),
    info(KeywordId::Fn, "fn", KeywordCategory::Declaration, Since(0, 1), Stability::Stable),
    info(KeywordId::Switch, "switch", KeywordCategory::Statement, Since(0, 1), Stability::Stable),
    info(KeywordId::Match, "match", KeywordCategory::Statement, Since(0, 1), Stability::Stable),
    info(KeywordId::Defaultcase, "defaultcase", KeywordCategory::Statement, Since(0, 1), Stability::Stable),
    info(KeywordId::Return, "return", KeywordCategory::Statement, Since(0, 1), Stability::Stable),
    info(KeywordId::Yield, "yield", KeywordCategory::Statement, Since(0, 1), Stability::Stable),
    info(KeywordId::Coyield, "coyield", KeywordCategory::Statement, Since(0, 2), Stability::Experimental),
    info(KeywordId::Break, "break", KeywordCategory::Statement, Since(0, 1), Stability::Stable),
    info(KeywordId::Continue, "continue", KeywordCategory::Statement, Since(0, 1), Stability::Stable),
    info(KeywordId::Prune, "prune", KeywordCategory::Statement, Since(0, 1), Stability::Stable),
    info(KeywordId::Assert, "assert", KeywordCategory::Statement, Since(0, 1), Stability::Stable),
    info(KeywordId::SelfRef, "self", KeywordCategory::Expression, Since(0, 1), Stability::Stable),
    info(KeywordId::Supersys, "supersys", KeywordCategory::Expression, Since(0, 2), Stability::Experimental),
    info(KeywordId::Mapping, "Mapping", KeywordCategory::Expression, Since(0, 1), Stability::Stable),
    info(KeywordId::Comp, "comp", KeywordCategory::Expression, Since(0, 1), Stability::Stable),
    info(KeywordId::Udata, "udata", KeywordCategory::Expression, Since(0, 1), Stability::Stable),
    info(KeywordId::Concat, "concat", KeywordCategory::Expression, Since(0, 1), Stability::Stable),
    info(KeywordId::Testsuite, "testsuite", KeywordCategory::Expression, Since(0, 1), Stability::Stable),
    info(KeywordId::Testcase, "testcase", KeywordCategory::Expression, Since(0, 1), Stability::Stable),
    info(KeywordId::Synchronized, "synchronized", KeywordCategory::Statement, Since(0, 1), Stability::Stable),
    info(KeywordId::Lifetimejob, "lifetimejob", KeywordCategory::Expression, Since(0, 1), Stability::Stable),
    info(KeywordId::On, "on", KeywordCategory::Expression, Since(0, 1), Stability::Stable),
    info(KeywordId::Received, "received", KeywordCategory::Expression, Since(0, 1), Stability::Stable),
    info(KeywordId::Do, "do", KeywordCategory::Expression, Since(0, 1), Stability::Stable),
    info(KeywordId::Chunked, "chunked", KeywordCategory::Statement, Since(0, 1), Stability::Stable),
    info(KeywordId::Sendval, "sendval", KeywordCategory::Expression, Since(0, 1), Stability::Stable),
    info(KeywordId::Pattern, "pattern", KeywordCategory::Declaration, Since(0, 1), Stability::Stable),
    info(KeywordId::Pnamespace, "pnamespace", KeywordCategory::Declaration, Since(0, 1), Stability::Stable),
    info(KeywordId::Extend, "extend", KeywordCategory::Declaration, Since(0, 1), Stability::Stable),
    info(KeywordId::Struct, "struct", KeywordCategory::Declaration, Since(0, 2), Stability::Experimental),
    info(KeywordId::New, "new", KeywordCategory::Expression, Since(0, 2), Stability::Experimental),
    info(KeywordId::Otherprops, "otherprops", KeywordCategory::Expression, Since(0, 2), Stability::Experimental),
    info(KeywordId::To, "to", KeywordCategory::Expression, Since(0, 1), Stability::Stable),
    info(KeywordId::And, "and", KeywordCategory::Operator, Since(0, 1), Stability::Stable),
    info(KeywordId::Or, "or", KeywordCategory::Operator, Since(0, 1), Stability::Stable),
    info(KeywordId::True, "true", KeywordCategory::Literal, Since(0, 1), Stability::Stable),
    info(KeywordId::False, "false", KeywordCategory::Literal, Since(0, 1), Stability::Stable),
    info(KeywordId::Nil, "nil", KeywordCategory::Literal, Since(0, 1), Stability::Stable),
];

/// Canonical spelling.
pub fn as_str(id: KeywordId) -> &'static str {
    info_for(id).canonical
}

/// Category of a reserved word.
pub fn category(id: KeywordId) -> KeywordCategory {
    info_for(id).category
}

/// Full metadata.
///
/// ## Panics
/// - If the registry is missing an entry for `id` (this indicates a programming error).
pub fn info_for(id: KeywordId) -> &'static KeywordInfo {
    KEYWORDS.iter().find(|k| k.id == id).expect("keyword info missing")
}

/// Lookup by spelling.
///
/// ## Notes
/// - Matching is **case-sensitive**: `Mapping` is reserved, `mapping` is not.
pub fn from_str(s: &str) -> Option<KeywordId> {
    KEYWORDS.iter().find(|k| k.canonical == s).map(|k| k.id)
}

/// Report whether `s` is a reserved word.
pub fn is_keyword(s: &str) -> bool {
    from_str(s).is_some()
}

// --- helpers -----------------------------------------------------------------

const fn info(
    id: KeywordId,
    canonical: &'static str,
    category: KeywordCategory,
    since: Since,
    stability: Stability,
) -> KeywordInfo {
    KeywordInfo {
        id,
        canonical,
        category,
        since,
        stability,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_id_has_exactly_one_entry() {
        for k in KEYWORDS {
            assert_eq!(KEYWORDS.iter().filter(|other| other.id == k.id).count(), 1, "{:?}", k.id);
        }
    }

    #[test]
    fn test_spellings_are_unique() {
        for k in KEYWORDS {
            assert_eq!(from_str(k.canonical), Some(k.id));
        }
    }

    #[test]
    fn test_dashed_keywords() {
        assert_eq!(from_str("drop-perms"), Some(KeywordId::DropPerms));
        assert_eq!(as_str(KeywordId::IncludableChunk), "includable-chunk");
        assert_eq!(from_str("drop"), None);
    }
}
