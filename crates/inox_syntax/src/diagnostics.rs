//! Parsing diagnostics: local errors stored on nodes, their chunk-wide aggregation and the
//! errors returned by the parser entry points.
//!
//! ## Notes
//! - Syntax errors never abort parsing. The parser attaches a [`ParsingError`] to the node that
//!   detected the problem and keeps going; [`ParsingErrorAggregation`] is built afterwards by
//!   walking the tree.
//! - [`ParseError`] is for everything that is *not* a syntax error (input too large,
//!   cancellation, nesting too deep) plus the aggregation itself.

pub mod messages;

use crate::ast::NodeSpan;
use miette::Diagnostic;
use thiserror::Error;

/// Category of a [`ParsingError`].
///
/// Most errors are [`ParsingErrorKind::Unspecified`]; the other kinds let tooling (completion,
/// quick fixes) recognize a few recoverable situations without matching on messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ParsingErrorKind {
    #[default]
    Unspecified,
    UnterminatedMemberExpr,
    UnterminatedDoubleColonExpr,
    UnterminatedExtendStmt,
    UnterminatedPatternDefinition,
    UnterminatedPatternNamespaceDefinition,
    UnterminatedStructDefinition,
    UnterminatedUnquotedRegion,
    MissingBlock,
    MissingFnBody,
    MissingEqualsSignInDeclaration,
    MissingObjectPropertyValue,
    MissingObjectPatternProperty,
    ExtractionExpressionExpected,
    /// The next statement starts right after this node without a separator, and that is expected.
    InvalidNext,
}

/// A syntax error local to one node.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ParsingError {
    pub kind: ParsingErrorKind,
    pub message: String,
}

impl ParsingError {
    pub fn new(kind: ParsingErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Shorthand for an [`ParsingErrorKind::Unspecified`] error.
    pub fn unspecified(message: impl Into<String>) -> Self {
        Self::new(ParsingErrorKind::Unspecified, message)
    }
}

/// Position of a span in a named source. Lines and columns are 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePositionRange {
    pub source_name: String,
    pub start_line: usize,
    pub start_column: usize,
    pub end_line: usize,
    pub end_column: usize,
    pub span: NodeSpan,
}

/// Every syntax error of a chunk, in traversal order, with their positions.
///
/// ## Notes
/// - `message` starts with a newline and has one `<name>:<line>:<col>: <message>` line per error.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic, Default)]
#[error("{message}")]
#[diagnostic(code(inox::parse))]
pub struct ParsingErrorAggregation {
    pub message: String,
    pub errors: Vec<ParsingError>,
    pub positions: Vec<SourcePositionRange>,
}

impl ParsingErrorAggregation {
    /// Append an error and extend the accumulated message.
    pub fn push(&mut self, error: ParsingError, position: SourcePositionRange) {
        self.message = format!(
            "{}\n{}:{}:{}: {}",
            self.message, position.source_name, position.start_line, position.start_column, error.message
        );
        self.errors.push(error);
        self.positions.push(position);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Error returned by the parser entry points.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("module's code is too long ({len} bytes)")]
    TooLarge { len: usize },

    #[error("parsing was cancelled")]
    Cancelled,

    #[error("maximum nesting depth exceeded ({max_depth})")]
    RecursionLimit { max_depth: usize },

    #[error(transparent)]
    Syntax(#[from] ParsingErrorAggregation),
}

impl ParseError {
    /// The syntax error aggregation, if this is a syntax error.
    pub fn as_syntax(&self) -> Option<&ParsingErrorAggregation> {
        match self {
            ParseError::Syntax(agg) => Some(agg),
            _ => None,
        }
    }
}

/// Compute the 1-based start and end (line, column) of `[start, end)` in a single scan.
///
/// ## Returns
/// - `(start_line, start_column, end_line, end_column)`
pub fn line_columns(s: &[char], start: usize, end: usize) -> (usize, usize, usize, usize) {
    let (mut line, mut column) = (1, 1);
    let start = start.min(s.len());
    let end = end.min(s.len()).max(start);

    for &c in &s[..start] {
        if c == '\n' {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }
    }
    let (start_line, start_column) = (line, column);

    for &c in &s[start..end] {
        if c == '\n' {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }
    }

    (start_line, start_column, line, column)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_columns() {
        let s: Vec<char> = "ab\ncd".chars().collect();
        assert_eq!(line_columns(&s, 0, 1), (1, 1, 1, 2));
        assert_eq!(line_columns(&s, 3, 5), (2, 1, 2, 3));
        assert_eq!(line_columns(&s, 1, 4), (1, 2, 2, 2));
    }

    #[test]
    fn test_aggregation_message() {
        let mut agg = ParsingErrorAggregation::default();
        agg.push(
            ParsingError::unspecified("oops"),
            SourcePositionRange {
                source_name: "mod.ix".to_string(),
                start_line: 2,
                start_column: 3,
                end_line: 2,
                end_column: 4,
                span: NodeSpan::new(5, 6),
            },
        );
        assert_eq!(agg.to_string(), "\nmod.ix:2:3: oops");
        assert_eq!(ParseError::from(agg).to_string(), "\nmod.ix:2:3: oops");
    }
}
