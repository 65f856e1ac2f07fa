//! Syntax frontend for the Inox scripting language: AST, token model, parser, traversal, printer.
//!
//! Everything here works on a single module (a *chunk*) and its decoded code units; spans are
//! indices into those code units, not byte offsets.
//!
//! ## Notes
//! - This crate is syntax-only: no name resolution, no evaluation, no static checks.
//! - Vocabulary identity (keywords, lexemes, URL schemes, character classes) comes from
//!   `inox_core::lang`.
//!
//! ## Examples
//! ```rust
//! use inox_syntax::parser::must_parse_chunk;
//! use inox_syntax::print::{PrintConfig, sprint};
//!
//! let root = must_parse_chunk("print   1");
//! assert_eq!(sprint(root.node(), root.chunk(), PrintConfig::default()), "print   1");
//! ```
//!
//! ## See also
//! - [`walk`] for traversal and node lookups.
//! - [`url`] for the URL, host and email validators shared with the parser.

pub mod ast;
pub mod diagnostics;
pub mod parser;
pub mod print;
pub mod tokens;
pub mod url;
pub mod walk;
