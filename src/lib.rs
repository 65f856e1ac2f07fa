#![forbid(unsafe_code)]
//! Inox front end
//!
//! Parses Inox modules into a lossless syntax tree and answers position queries on the result.
//! The syntax itself lives in `inox_syntax`; this crate pairs trees with the sources they came
//! from, caches parse results and provides the `inox-parse` developer CLI.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use inox::{ChunkParseOptions, InMemorySource, parse_chunk_source};
//!
//! let parsed = parse_chunk_source(Arc::new(InMemorySource::new("repl", "a = 1")), &ChunkParseOptions::default())
//!     .expect("valid module");
//! assert_eq!(parsed.chunk().statements.len(), 1);
//! ```
//!
//! ## Panic Policy
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` module enforces
//!   `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//!
//! - **`must_*` helpers**: `must_parse_chunk_source` panics on invalid input; it is meant for tests and code that is
//!   known to be valid.

pub mod cache;
pub mod cli;
pub mod error;
pub mod parsed_chunk;
pub mod source;

pub use inox_syntax::{ast, diagnostics, parser, print, tokens, url, walk};

pub use cache::ParseCache;
pub use error::{Error, Result};
pub use parsed_chunk::{
    ChunkParseOptions, ParseSourceError, ParseSourceResult, ParsedChunkSource, must_parse_chunk_source,
    parse_chunk_source,
};
pub use source::{ChunkSource, InMemorySource, SourceFile};
