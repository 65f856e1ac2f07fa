//! Property-based tests for the parser
//!
//! Sources are generated from a small statement grammar (assignments, calls, variable
//! declarations, `if` blocks) whose output is always valid, so every property runs on an
//! error-free chunk.

use std::collections::HashSet;

use inox_syntax::ast::{ChunkRoot, Node};
use inox_syntax::parser::{ParserOptions, parse_chunk};
use inox_syntax::print::{PrintConfig, sprint};
use inox_syntax::tokens::get_tokens;
use inox_syntax::walk::{TraversalAction, count_nodes, walk};
use proptest::prelude::*;

// =============================================================================
// Strategies
// =============================================================================

/// Identifiers starting with `x`: no keyword or word operator starts with it.
fn ident_strategy() -> impl Strategy<Value = String> {
    "x[a-z0-9]{0,4}"
}

fn rune_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => "'[a-z0-9]'",
        1 => prop_oneof![Just("'\\n'"), Just("'\\t'"), Just("'\\a'"), Just("'\\v'"), Just("'\\''")]
            .prop_map(str::to_string),
    ]
}

fn expr_strategy() -> impl Strategy<Value = String> {
    let leaf = prop_oneof![
        "0|[1-9][0-9]{0,4}",
        "\"[a-z ]{0,6}\"",
        "`[a-z ]{0,6}`",
        "`[a-z]{0,3}\n[a-z]{0,3}`",
        rune_strategy(),
        "https://example\\.com/[a-z]{1,4}",
        "html<div>[a-z]{0,6}</div>",
        ident_strategy(),
    ];
    leaf.prop_recursive(3, 16, 3, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..3).prop_map(|items| format!("[{}]", items.join(", "))),
            (inner.clone(), prop_oneof![Just("+"), Just("*"), Just("<"), Just("==")], inner)
                .prop_map(|(left, op, right)| format!("({left} {op} {right})")),
        ]
    })
}

fn statement_strategy() -> impl Strategy<Value = String> {
    let declaration = (ident_strategy(), expr_strategy())
        .prop_map(|(name, value)| format!("{name} = {value}"))
        .boxed();
    let simple = prop_oneof![
        declaration.clone(),
        (ident_strategy(), prop::collection::vec(expr_strategy(), 0..3))
            .prop_map(|(callee, args)| format!("{callee}({})", args.join(", "))),
        (
            prop_oneof![Just("var"), Just("globalvar")],
            prop::collection::vec(declaration, 1..3),
            prop_oneof![Just("; "), Just(", "), Just("\n")],
        )
            .prop_map(|(keyword, decls, separator)| format!("{keyword} ({})", decls.join(separator))),
    ]
    .boxed();
    prop_oneof![
        3 => simple.clone(),
        1 => (expr_strategy(), simple).prop_map(|(cond, body)| format!("if {cond} {{ {body} }}")),
    ]
}

fn chunk_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(statement_strategy(), 1..6).prop_map(|stmts| stmts.join("\n"))
}

fn parse_valid(source: &str) -> ChunkRoot {
    match parse_chunk(source, "prop.ix", &ParserOptions::default()) {
        Ok(root) => root,
        Err(error) => panic!("{source:?} should be valid: {error}"),
    }
}

/// Type names of all nodes in visit order.
fn shape(root: &Node) -> Vec<&'static str> {
    let mut names = Vec::new();
    walk(root, |visit| {
        names.push(visit.node.type_name());
        TraversalAction::Continue
    });
    names
}

fn addr(node: &Node) -> usize {
    std::ptr::from_ref(node) as usize
}

fn all_nodes(root: &Node) -> Vec<&Node> {
    let mut nodes = Vec::new();
    walk(root, |visit| {
        nodes.push(visit.node);
        TraversalAction::Continue
    });
    nodes
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    /// Printing a chunk keeps its length and re-parsing the output gives the same tree shape.
    #[test]
    fn printing_round_trips(source in chunk_strategy()) {
        let root = parse_valid(&source);
        let printed = sprint(root.node(), root.chunk(), PrintConfig::default());
        prop_assert_eq!(printed.chars().count(), source.chars().count());

        let reparsed = parse_valid(&printed);
        prop_assert_eq!(shape(reparsed.node()), shape(root.node()));
    }

    /// Every child span lies within its parent's span.
    #[test]
    fn child_spans_are_contained(source in chunk_strategy()) {
        let root = parse_valid(&source);
        let mut violations = Vec::new();
        walk(root.node(), |visit| {
            if let Some(parent) = visit.parent
                && !parent.span().contains(visit.node.span())
            {
                violations.push((parent.type_name(), visit.node.type_name()));
            }
            TraversalAction::Continue
        });
        prop_assert!(violations.is_empty(), "{:?}", violations);
    }

    /// Chunk tokens are strictly sorted by start and inside the chunk.
    #[test]
    fn chunk_tokens_are_ordered(source in chunk_strategy()) {
        let root = parse_valid(&source);
        let chunk_span = root.node().span();
        let tokens = &root.chunk().tokens;
        prop_assert!(tokens.windows(2).all(|w| w[0].span.start < w[1].span.start));
        prop_assert!(tokens.iter().all(|t| chunk_span.contains(t.span)));
    }

    /// Derived tokens have distinct, non-empty spans, with or without metadata.
    #[test]
    fn derived_tokens_are_unique(source in chunk_strategy(), add_meta in any::<bool>()) {
        let root = parse_valid(&source);
        for node in all_nodes(root.node()) {
            let tokens = get_tokens(node, root.chunk(), add_meta);
            let spans: HashSet<_> = tokens.iter().map(|t| t.span).collect();
            prop_assert_eq!(spans.len(), tokens.len());
            prop_assert!(tokens.iter().all(|t| !t.span.is_empty()));
            prop_assert!(tokens.windows(2).all(|w| w[0].span.start <= w[1].span.start));
        }
    }

    /// Pruning a node skips exactly its descendants.
    #[test]
    fn pruning_skips_descendants(source in chunk_strategy(), pick in any::<prop::sample::Index>()) {
        let root = parse_valid(&source);
        let nodes = all_nodes(root.node());
        let pruned = nodes[pick.index(nodes.len())];

        let descendants: HashSet<usize> = all_nodes(pruned).into_iter().skip(1).map(addr).collect();
        let mut visited = Vec::new();
        walk(root.node(), |visit| {
            visited.push(addr(visit.node));
            if std::ptr::eq(visit.node, pruned) {
                TraversalAction::Prune
            } else {
                TraversalAction::Continue
            }
        });

        prop_assert_eq!(visited.len(), nodes.len() - (count_nodes(pruned) - 1));
        prop_assert!(visited.iter().all(|addr| !descendants.contains(addr)));
    }
}
