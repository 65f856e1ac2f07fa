//! Error recovery: syntax errors are attached to nodes and parsing keeps going.

use insta::assert_snapshot;
use inox_syntax::ast::Node;
use inox_syntax::diagnostics::messages::UNTERMINATED_QUOTED_STRING_LIT;
use inox_syntax::diagnostics::{ParseError, ParsingErrorAggregation, ParsingErrorKind};
use inox_syntax::parser::{ChunkParseError, ParserOptions, parse_chunk};
use inox_syntax::walk::has_error_at_any_depth;
use miette::Diagnostic;

fn parse_invalid(source: &str) -> ChunkParseError {
    parse_chunk(source, "test.ix", &ParserOptions::default()).expect_err("the source should not be valid")
}

fn aggregation(error: &ChunkParseError) -> &ParsingErrorAggregation {
    error.error.as_syntax().expect("a syntax error")
}

#[test]
fn unknown_char_after_manifest_is_reported_with_its_position() {
    let error = parse_invalid("manifest {}; ?");
    let aggregation = aggregation(&error);

    assert_eq!(aggregation.errors.len(), 1);
    assert_eq!(aggregation.errors[0].kind, ParsingErrorKind::Unspecified);
    assert_snapshot!(aggregation.message.trim_start(), @"test.ix:1:14: unexpected char '?' (code: 63) in block or module");

    let root = error.chunk.as_ref().expect("the chunk is kept");
    assert!(root.chunk().manifest.is_some());
    assert!(matches!(root.chunk().statements.as_slice(), [Node::UnknownNode(_)]));
}

#[test]
fn parsing_continues_after_an_unknown_char() {
    let error = parse_invalid("?\nprint 2");
    let root = error.chunk.as_ref().expect("the chunk is kept");
    let statements = &root.chunk().statements;

    assert_eq!(statements.len(), 2);
    assert!(matches!(statements[0], Node::UnknownNode(_)));
    assert!(matches!(statements[1], Node::CallExpression(_)));
    assert!(!has_error_at_any_depth(&statements[1]));
}

#[test]
fn errors_are_aggregated_in_traversal_order() {
    let error = parse_invalid("?\n\"abc");
    let aggregation = aggregation(&error);

    assert_eq!(aggregation.errors.len(), 2);
    assert_eq!(aggregation.errors[1].message, UNTERMINATED_QUOTED_STRING_LIT);

    let lines: Vec<(usize, usize)> = aggregation
        .positions
        .iter()
        .map(|p| (p.start_line, p.start_column))
        .collect();
    assert_eq!(lines, vec![(1, 1), (2, 1)]);
    assert_snapshot!(
        aggregation.message.lines().last().unwrap_or_default(),
        @"test.ix:2:1: unterminated quoted string literal"
    );
}

#[test]
fn aggregation_is_a_diagnostic() {
    let error = parse_invalid("manifest {}; ?");
    let aggregation = aggregation(&error);
    let code = aggregation.code().map(|code| code.to_string());
    assert_eq!(code.as_deref(), Some("inox::parse"));
    assert_eq!(error.to_string(), aggregation.message);
}

#[test]
fn fatal_errors_come_without_a_chunk() {
    let source = "1".repeat(inox_core::MAX_MODULE_BYTE_LEN + 1);
    let error = parse_chunk(&source, "big.ix", &ParserOptions::default()).unwrap_err();
    assert!(error.chunk.is_none());
    assert!(matches!(error.error, ParseError::TooLarge { .. }));
    assert_snapshot!(error.to_string(), @"module's code is too long (16777217 bytes)");
}
