//! Inox language vocabulary registries.
//!
//! Callers work with stable IDs (`KeywordId`, `LexemeId`) and look up spellings/metadata via the
//! registry tables instead of scattering string comparisons across the parser.
//!
//! ## Examples
//! ```rust
//! use inox_core::lang::keywords::{self, KeywordId};
//!
//! assert_eq!(keywords::from_str("manifest"), Some(KeywordId::Manifest));
//! assert_eq!(keywords::as_str(KeywordId::DropPerms), "drop-perms");
//! ```

pub mod chars;
pub mod keywords;
pub mod lexemes;
pub mod registry;
pub mod schemes;
