//! Provide the pure, dependency-free vocabulary shared by the Inox parser and its tooling.
//!
//! Everything here is a `const` table or a small predicate: reserved words, the fixed spelling of
//! punctuation lexemes, the URL schemes understood by URL-like literals, and the character classes
//! the scanner branches on.
//!
//! ## Notes
//!
//! - This is a "vocabulary" crate: **no IO**, no global state, and no AST types.
//! - Syntax is enforced by `inox_syntax`; these registries only answer "what is this spelling".

pub mod lang;

/// Hard ceiling on the UTF-8 byte length of a module accepted by the parser.
pub const MAX_MODULE_BYTE_LEN: usize = 1 << 24;

/// Maximum byte length of an object key.
pub const MAX_OBJECT_KEY_BYTE_LEN: usize = 64;

/// Maximum length of a URL scheme name.
pub const MAX_SCHEME_NAME_LEN: usize = 5;
