//! URL-like literals as produced by the parser.

use inox_syntax::ast::Node;
use inox_syntax::diagnostics::messages::{CREDENTIALS_NOT_ALLOWED_IN_HOST_LITERALS, URL_PATT_LITS_WITH_QUERY_PART_NOT_SUPPORTED_YET};
use inox_syntax::parser::{ParserOptions, parse_chunk, parse_url};

/// The single statement of `source`, whether or not it has errors.
fn single_statement(source: &str) -> Node {
    let root = match parse_chunk(source, "test.ix", &ParserOptions::default()) {
        Ok(root) => root,
        Err(error) => error.chunk.expect("syntax errors keep the chunk"),
    };
    let statements = &root.chunk().statements;
    assert_eq!(statements.len(), 1, "{statements:?}");
    statements[0].clone()
}

#[test]
fn url_with_path_is_a_url_literal() {
    let node = single_statement("https://example.com/index.html");
    let Node::URLLiteral(url) = &node else {
        panic!("expected a URL literal, got {node:?}");
    };
    assert_eq!(url.value, "https://example.com/index.html");
    assert!(url.base.error.is_none());
}

#[test]
fn url_without_path_is_a_host_literal() {
    let node = single_statement("https://example.com:8080");
    let Node::HostLiteral(host) = &node else {
        panic!("expected a host literal, got {node:?}");
    };
    assert_eq!(host.value, "https://example.com:8080");
    assert!(host.base.error.is_none());
}

#[test]
fn host_literal_with_credentials_has_an_error() {
    let node = single_statement("https://user@example.com");
    let Node::HostLiteral(host) = &node else {
        panic!("expected a host literal, got {node:?}");
    };
    let error = host.base.error.as_ref().expect("an error");
    assert_eq!(error.message, CREDENTIALS_NOT_ALLOWED_IN_HOST_LITERALS);
}

#[test]
fn host_pattern_literal() {
    let node = single_statement("%https://**.example.com");
    let Node::HostPatternLiteral(pattern) = &node else {
        panic!("expected a host pattern literal, got {node:?}");
    };
    assert_eq!(pattern.value, "https://**.example.com");
    assert!(!pattern.unprefixed);
    assert!(pattern.base.error.is_none());
}

#[test]
fn parse_url_helper() {
    assert_eq!(parse_url("https://example.com/a?b=1").as_deref(), Some("https://example.com/a?b=1"));
    assert_eq!(parse_url("https://example.com"), None);
    assert_eq!(parse_url("example.com/a"), None);
}

#[test]
fn url_pattern_literal_with_prefix_suffix() {
    let node = single_statement("%https://example.com/...");
    let Node::URLPatternLiteral(pattern) = &node else {
        panic!("expected a URL pattern literal, got {node:?}");
    };
    assert_eq!(pattern.value, "https://example.com/...");
    assert_eq!(pattern.raw, "%https://example.com/...");
    assert!(pattern.base.error.is_none());
}

#[test]
fn url_pattern_literal_with_query_is_not_supported() {
    let node = single_statement("%https://example.com/a?b=1");
    let error = node.error().expect("an error");
    assert_eq!(error.message, URL_PATT_LITS_WITH_QUERY_PART_NOT_SUPPORTED_YET);
}

#[test]
fn url_expression_with_interpolated_path() {
    let node = single_statement("https://example.com/users/{1}");
    let Node::URLExpression(expr) = &node else {
        panic!("expected a URL expression, got {node:?}");
    };
    assert!(expr.query_params.is_empty());
    assert!(node.error().is_none());
}
