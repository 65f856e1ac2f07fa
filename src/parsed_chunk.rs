//! Parsed module sources and position lookups.
//!
//! A [`ParsedChunkSource`] keeps the tree of a module together with the source it was parsed
//! from, and answers the questions editors and error reporters ask: which node is under this
//! position, where does this node start, what is the first statement on this line.
//!
//! ## Notes
//! - Lines and columns are 1-based; columns count code units (`char`s), like spans.
//! - Position scans are linear in the offset; they run on demand, nothing is indexed.

use std::fmt;
use std::sync::{Arc, OnceLock};

use inox_syntax::ast::{Chunk, ChunkRoot, Node, NodeSpan};
use inox_syntax::diagnostics::{ParseError, SourcePositionRange};
use inox_syntax::parser::{ChunkParseError, ParserOptions, parse_chunk_returning_code_units};
use inox_syntax::walk::{TraversalAction, walk};
use thiserror::Error;

use crate::cache::ParseCache;
use crate::source::ChunkSource;

/// Result of [`parse_chunk_source`].
pub type ParseSourceResult = Result<Arc<ParsedChunkSource>, ParseSourceError>;

/// Error of [`parse_chunk_source`].
///
/// With syntax errors the module is still available in `parsed`.
#[derive(Debug, Clone, Error)]
#[error("{error}")]
pub struct ParseSourceError {
    pub parsed: Option<Arc<ParsedChunkSource>>,
    pub error: Arc<ParseError>,
}

/// Options of [`parse_chunk_source`].
#[derive(Debug, Clone, Default)]
pub struct ChunkParseOptions {
    pub parser: ParserOptions,
    /// Cache consulted for sources that have a resource location.
    pub cache: Option<Arc<ParseCache>>,
}

/// Parse a module source.
///
/// ## Notes
/// - When a cache is set and the source has a resource location, a previous result for the same
///   `(resource, code)` pair is returned as is, errors included. Otherwise the result is stored.
#[tracing::instrument(skip_all, fields(name = source.name(), source_len = source.code().len()))]
pub fn parse_chunk_source(source: Arc<dyn ChunkSource>, options: &ChunkParseOptions) -> ParseSourceResult {
    let cache = match (&options.cache, source.resource()) {
        (Some(cache), Some(resource)) => Some((cache, resource.to_string())),
        _ => None,
    };

    if let Some((cache, resource)) = &cache
        && let Some(result) = cache.get(resource, source.code())
    {
        return result;
    }

    let (code_units, result) = parse_chunk_returning_code_units(source.code(), source.name(), &options.parser);
    let result = match result {
        Ok(root) => Ok(Arc::new(ParsedChunkSource::with_code_units(root, source.clone(), code_units))),
        Err(ChunkParseError { chunk, error }) => Err(ParseSourceError {
            parsed: chunk.map(|root| Arc::new(ParsedChunkSource::with_code_units(root, source.clone(), code_units))),
            error: Arc::new(error),
        }),
    };

    if let Some((cache, resource)) = cache {
        cache.put(&resource, source.code(), result.clone());
    }
    result
}

/// Parse a module source that is known to be valid.
///
/// ## Panics
/// - If the module has any error.
pub fn must_parse_chunk_source(source: Arc<dyn ChunkSource>) -> Arc<ParsedChunkSource> {
    match parse_chunk_source(source, &ChunkParseOptions::default()) {
        Ok(parsed) => parsed,
        Err(error) => panic!("failed to parse chunk source: {error}"),
    }
}

/// A module tree and the source it was parsed from.
#[derive(Debug)]
pub struct ParsedChunkSource {
    root: ChunkRoot,
    source: Arc<dyn ChunkSource>,
    code_units: OnceLock<Arc<[char]>>,
}

impl ParsedChunkSource {
    /// Pair a tree with its source; the code units are decoded on first use.
    pub fn new(root: ChunkRoot, source: Arc<dyn ChunkSource>) -> Self {
        Self {
            root,
            source,
            code_units: OnceLock::new(),
        }
    }

    fn with_code_units(root: ChunkRoot, source: Arc<dyn ChunkSource>, code_units: Arc<[char]>) -> Self {
        let parsed = Self::new(root, source);
        let _ = parsed.code_units.set(code_units);
        parsed
    }

    pub fn node(&self) -> &Node {
        self.root.node()
    }

    pub fn chunk(&self) -> &Chunk {
        self.root.chunk()
    }

    pub fn source(&self) -> &Arc<dyn ChunkSource> {
        &self.source
    }

    pub fn name(&self) -> &str {
        self.source.name()
    }

    pub fn user_friendly_name(&self) -> &str {
        self.source.user_friendly_name()
    }

    /// The code units that spans index into.
    pub fn code_units(&self) -> &[char] {
        self.code_units.get_or_init(|| self.source.code().chars().collect())
    }

    // ========================================================================
    // Positions
    // ========================================================================

    /// Line and column of the start of `node`.
    pub fn get_line_column(&self, node: &Node) -> (usize, usize) {
        self.get_span_line_column(node.span())
    }

    /// Line and column of the start of `span`.
    pub fn get_span_line_column(&self, span: NodeSpan) -> (usize, usize) {
        line_column_at(self.code_units(), span.start)
    }

    /// Line and column of the (exclusive) end of `span`.
    pub fn get_end_span_line_column(&self, span: NodeSpan) -> (usize, usize) {
        line_column_at(self.code_units(), span.end)
    }

    /// Index of the code unit at `line` and `column`.
    ///
    /// Lines past the end resolve from the end of the source; the column is not checked against
    /// the length of the line.
    pub fn get_line_column_position(&self, line: usize, column: usize) -> usize {
        let units = self.code_units();
        let mut remaining = line.saturating_sub(1);
        let mut i = 0;
        while i < units.len() && remaining > 0 {
            if units[i] == '\n' {
                remaining -= 1;
            }
            i += 1;
        }
        i + column.saturating_sub(1)
    }

    /// One-unit span at `line` and `column`.
    pub fn get_line_column_single_char_span(&self, line: usize, column: usize) -> NodeSpan {
        let position = self.get_line_column_position(line, column);
        NodeSpan::new(position, position + 1)
    }

    pub fn get_source_position(&self, span: NodeSpan) -> SourcePositionRange {
        let (start_line, start_column) = self.get_span_line_column(span);
        let (end_line, end_column) = self.get_end_span_line_column(span);
        SourcePositionRange {
            source_name: self.name().to_string(),
            start_line,
            start_column,
            end_line,
            end_column,
            span,
        }
    }

    /// Write `<name>:<line>:<column>:` for the start of `span`.
    pub fn format_node_span_location(&self, w: &mut impl fmt::Write, span: NodeSpan) -> fmt::Result {
        let (line, column) = self.get_span_line_column(span);
        write!(w, "{}:{}:{}:", self.name(), line, column)
    }

    pub fn get_formatted_node_location(&self, node: &Node) -> String {
        let mut location = String::new();
        // writing to a String never fails
        let _ = self.format_node_span_location(&mut location, node.span());
        location
    }

    // ========================================================================
    // Node lookups
    // ========================================================================

    /// Deepest node whose span overlaps `target`, and its ancestors (root first).
    ///
    /// ## Notes
    /// - Nodes ending where `target` starts are ignored. An empty `target` only selects nodes
    ///   that strictly contain it, or empty nodes at the same position.
    /// - Between nodes with the same span, the last visited (the deepest) one wins.
    pub fn get_node_and_chain_at_span(&self, target: NodeSpan) -> Option<(&Node, Vec<&Node>)> {
        let mut found: Option<(&Node, Vec<&Node>)> = None;
        walk(self.node(), |visit| {
            let span = visit.node.span();
            let empty_match = span.is_empty() && target.is_empty() && span.start == target.start;
            if !empty_match && (span.start >= target.end || span.end <= target.start) {
                return TraversalAction::Prune;
            }
            if found.as_ref().is_none_or(|(node, _)| node.span().contains(span)) {
                found = Some((visit.node, visit.ancestors.to_vec()));
            }
            TraversalAction::Continue
        });
        found
    }

    pub fn get_node_at_span(&self, target: NodeSpan) -> Option<&Node> {
        self.get_node_and_chain_at_span(target).map(|(node, _)| node)
    }

    /// First statement starting on `line`, and its ancestors.
    ///
    /// ## Returns
    /// - `None` for blank and comment-only lines, and for lines whose first non-space unit is
    ///   not the start of a statement of a block, a chunk or an embedded module.
    pub fn find_first_statement_and_chain_on_line(&self, line: usize) -> Option<(&Node, Vec<&Node>)> {
        let units = self.code_units();
        let mut position = self.get_line_column_position(line, 1);
        while position < units.len() && matches!(units[position], ' ' | '\t' | '\r') {
            position += 1;
        }
        if position >= units.len() || units[position] == '\n' {
            return None;
        }

        let (node, ancestors) = self.get_node_and_chain_at_span(NodeSpan::new(position, position + 1))?;
        if ancestors.is_empty() || node.is_scope_container() {
            return None;
        }

        let container_index = ancestors
            .iter()
            .rposition(|a| matches!(a, Node::Block(_) | Node::Chunk(_) | Node::EmbeddedModule(_)))?;
        let (statement, chain) = if container_index == ancestors.len() - 1 {
            (node, ancestors)
        } else {
            (ancestors[container_index + 1], ancestors[..=container_index].to_vec())
        };

        (statement.span().start == position).then_some((statement, chain))
    }
}

/// Line and column of the code unit at `index`, `index` may be the length of `units`.
fn line_column_at(units: &[char], index: usize) -> (usize, usize) {
    let (mut line, mut column) = (1, 1);
    for &c in &units[..index.min(units.len())] {
        if c == '\n' {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }
    }
    (line, column)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::InMemorySource;

    fn parse(code: &str) -> Arc<ParsedChunkSource> {
        must_parse_chunk_source(Arc::new(InMemorySource::new("test", code)))
    }

    #[test]
    fn test_line_column() {
        let parsed = parse("a = 1\n  print a");
        let print = &parsed.chunk().statements[1];
        assert_eq!(parsed.get_line_column(print), (2, 3));
        assert_eq!(parsed.get_end_span_line_column(print.span()), (2, 10));
        assert_eq!(parsed.get_formatted_node_location(print), "test:2:3:");
    }

    #[test]
    fn test_line_column_position() {
        let parsed = parse("a = 1\n  print a");
        assert_eq!(parsed.get_line_column_position(1, 1), 0);
        assert_eq!(parsed.get_line_column_position(2, 3), 8);
        assert_eq!(parsed.get_line_column_single_char_span(2, 3), NodeSpan::new(8, 9));
    }

    #[test]
    fn test_source_position() {
        let parsed = parse("a = 1\nprint a");
        let position = parsed.get_source_position(NodeSpan::new(6, 13));
        assert_eq!(position.source_name, "test");
        assert_eq!((position.start_line, position.start_column), (2, 1));
        assert_eq!((position.end_line, position.end_column), (2, 8));
    }

    #[test]
    fn test_node_at_span() {
        let parsed = parse("a = 1\na\nfn f(){}");
        let first = parsed.get_node_at_span(parsed.get_line_column_single_char_span(1, 1));
        assert!(first.is_some_and(|n| n.is_ident_with_name("a")));

        let second = parsed.get_node_at_span(parsed.get_line_column_single_char_span(2, 1));
        assert!(second.is_some_and(|n| n.is_ident_with_name("a")));
    }

    #[test]
    fn test_empty_span_within_an_identifier() {
        let parsed = parse("aaa");
        let node = parsed.get_node_at_span(NodeSpan::new(1, 1));
        assert!(matches!(node, Some(Node::IdentifierLiteral(_))));
    }

    #[test]
    fn test_span_starting_at_the_end_of_a_node() {
        let parsed = parse("aaa ");
        let node = parsed.get_node_at_span(NodeSpan::new(3, 4));
        assert!(matches!(node, Some(Node::Chunk(_))));
    }

    #[test]
    fn test_first_statement_on_line() {
        let parsed = parse("a = 1\n  # comment\n\nif true {\n  print a\n}");

        let (statement, chain) = parsed.find_first_statement_and_chain_on_line(1).unwrap();
        assert!(matches!(statement, Node::Assignment(_)));
        assert_eq!(chain.len(), 1);

        assert!(parsed.find_first_statement_and_chain_on_line(2).is_none());
        assert!(parsed.find_first_statement_and_chain_on_line(3).is_none());

        let (statement, chain) = parsed.find_first_statement_and_chain_on_line(5).unwrap();
        assert!(matches!(statement, Node::CallExpression(_)));
        assert!(matches!(chain.last(), Some(Node::Block(_))));

        assert!(parsed.find_first_statement_and_chain_on_line(6).is_none());
        assert!(parsed.find_first_statement_and_chain_on_line(42).is_none());
    }

    #[test]
    fn test_code_units_are_decoded_lazily() {
        let source: Arc<dyn ChunkSource> = Arc::new(InMemorySource::new("test", "x = \"é\"\ny"));
        let root = inox_syntax::parser::must_parse_chunk(source.code());
        let parsed = ParsedChunkSource::new(root, source);
        assert_eq!(parsed.code_units().len(), 9);
        assert_eq!(parsed.get_span_line_column(NodeSpan::new(6, 7)), (1, 7));
        assert_eq!(parsed.get_span_line_column(NodeSpan::new(8, 9)), (2, 1));
    }
}
