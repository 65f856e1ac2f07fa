//! Parser for the Inox scripting language
//!
//! A single-pass recursive-descent parser working directly on the decoded code units of a module
//! (there is no separate lexer). It produces an immutable [`Chunk`] and, as a side product, the
//! sorted list of valueless tokens (keywords, brackets, separators, comments) of the whole module.
//!
//! Syntax errors never abort parsing: the node that detected the problem carries a
//! [`ParsingError`] and parsing resumes right after it. Only cancellation, excessive nesting and
//! oversized inputs stop the parser.
//!
//! ## Examples
//!
//! ```rust
//! use inox_syntax::parser::{parse_chunk, ParserOptions};
//!
//! let root = parse_chunk("manifest {}\nprint 1", "example.ix", &ParserOptions::default()).unwrap();
//! assert!(root.chunk().manifest.is_some());
//! assert_eq!(root.chunk().statements.len(), 1);
//!
//! let error = parse_chunk("print (1", "example.ix", &ParserOptions::default()).unwrap_err();
//! assert!(error.chunk.is_some());
//! assert!(error.error.as_syntax().is_some());
//! ```

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use inox_core::MAX_MODULE_BYTE_LEN;
use inox_core::lang::chars::*;
use inox_core::lang::keywords::{self, KeywordId};
use thiserror::Error;

use crate::ast::*;
use crate::diagnostics::messages::*;
use crate::diagnostics::{
    ParseError, ParsingError, ParsingErrorAggregation, ParsingErrorKind, SourcePositionRange, line_columns,
};
use crate::tokens::{Token, TokenSubType, TokenType};
use crate::url::{
    LOOSE_HOST_PATTERN_REGEX, LOOSE_HOST_REGEX, LOOSE_URL_EXPR_REGEX, LOOSE_URL_REGEX, check_host, check_host_pattern,
    check_url, check_url_pattern, is_email_address,
};
use crate::walk::{TraversalAction, has_error_at_any_depth, walk};

// NOTE: This module is split across multiple files using `include!` so that every production is a
// method of the same `Parser` type (shared private state and helpers) without one huge file.

include!("parser/core.rs");
include!("parser/low_level.rs");
include!("parser/chunk.rs");
include!("parser/stmts.rs");
include!("parser/decl.rs");
include!("parser/expr.rs");
include!("parser/unary_binary.rs");
include!("parser/numbers.rs");
include!("parser/strings.rs");
include!("parser/paths.rs");
include!("parser/url_like.rs");
include!("parser/objects.rs");
include!("parser/patterns.rs");
include!("parser/string_patterns.rs");
include!("parser/functions.rs");
include!("parser/modules.rs");
include!("parser/markup.rs");
include!("parser/css.rs");
include!("parser/quoted.rs");
include!("parser/api.rs");
include!("parser/tests.rs");
