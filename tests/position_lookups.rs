use std::sync::Arc;

use inox::ast::Node;
use inox::ast::NodeSpan;
use inox::{InMemorySource, ParsedChunkSource, must_parse_chunk_source};
use proptest::prelude::*;

fn parse(code: &str) -> Arc<ParsedChunkSource> {
    must_parse_chunk_source(Arc::new(InMemorySource::new("lookup.ix", code)))
}

#[test]
fn pattern_identifier_in_parameter_type() {
    let parsed = parse("fn f(arg %int){}");
    let node = parsed.get_node_at_span(NodeSpan::new(10, 11));
    match node {
        Some(Node::PatternIdentifierLiteral(ident)) => assert_eq!(ident.name, "int"),
        other => panic!("expected a pattern identifier, got {:?}", other.map(Node::type_name)),
    }
}

#[test]
fn markup_lookups_prefer_the_innermost_overlapping_node() {
    let parsed = parse("html<div></div>");

    let (node, chain) = parsed.get_node_and_chain_at_span(NodeSpan::new(8, 9)).unwrap();
    assert!(matches!(node, Node::MarkupOpeningTag(_)));
    let chain_types: Vec<_> = chain.iter().map(|n| n.type_name()).collect();
    assert_eq!(chain_types, ["Chunk", "MarkupExpression", "MarkupElement"]);

    let node = parsed.get_node_at_span(NodeSpan::new(7, 7)).unwrap();
    assert!(node.is_ident_with_name("div"));
    assert_eq!(node.span(), NodeSpan::new(5, 8));
}

#[test]
fn first_statement_on_a_line_with_several_statements() {
    let parsed = parse("1; 2");
    let (statement, chain) = parsed.find_first_statement_and_chain_on_line(1).unwrap();
    assert!(matches!(statement, Node::IntLiteral(_)));
    assert_eq!(statement.span(), NodeSpan::new(0, 1));
    assert_eq!(chain.len(), 1);
    assert!(matches!(chain[0], Node::Chunk(_)));
}

#[test]
fn statement_inside_an_embedded_module() {
    let parsed = parse("go do {\n  print 1\n}");
    let (statement, chain) = parsed.find_first_statement_and_chain_on_line(2).unwrap();
    assert!(matches!(statement, Node::CallExpression(_)));
    assert!(matches!(chain.last(), Some(Node::EmbeddedModule(_))));
}

fn comment_module() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(prop_oneof![Just(String::new()), "# [a-z ]{0,12}"], 1..8)
}

proptest! {
    #[test]
    fn line_column_positions_round_trip(lines in comment_module(), line_pick in any::<prop::sample::Index>(), column_pick in any::<prop::sample::Index>()) {
        let code = lines.join("\n");
        let parsed = parse(&code);

        let line = line_pick.index(lines.len()) + 1;
        // the column just past the last character addresses the line break
        let column = column_pick.index(lines[line - 1].chars().count() + 1) + 1;

        let position = parsed.get_line_column_position(line, column);
        prop_assert_eq!(parsed.get_span_line_column(NodeSpan::new(position, position)), (line, column));
    }
}

#[test]
fn formatted_statement_locations() {
    let parsed = parse("a = 1\nif true {\n  print a\n}");
    let locations: Vec<String> = parsed
        .chunk()
        .statements
        .iter()
        .map(|statement| parsed.get_formatted_node_location(statement))
        .collect();
    insta::assert_snapshot!(locations.join("\n"), @r"
    lookup.ix:1:1:
    lookup.ix:2:1:
    ");
}
