//! Depth-first traversal of the AST and the lookup helpers built on it.
//!
//! ## Notes
//! - The visit order of a node's children is [`Node::children`].
//! - `ancestors` never contains the visited node itself; it goes from the root to the parent.
//! - The *scope* of a node is its closest scope-container ancestor, or its parent when no ancestor
//!   is a scope container.

use std::cell::RefCell;
use std::convert::Infallible;

use thiserror::Error;

use crate::ast::{CallExpression, Chunk, Node, NodeSpan};
use crate::tokens::{TokenType, get_tokens};

/// What the walker does after a callback returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraversalAction {
    Continue,
    /// Skip the descendants of the current node.
    Prune,
    /// Abort the whole traversal.
    Stop,
}

/// Arguments of a walk callback.
#[derive(Debug, Clone, Copy)]
pub struct Visit<'a, 'c> {
    pub node: &'a Node,
    pub parent: Option<&'a Node>,
    pub scope: Option<&'a Node>,
    pub ancestors: &'c [&'a Node],
    /// `true` for post-order callbacks.
    pub after: bool,
}

/// Pre-order walk.
pub fn walk<'a, F>(root: &'a Node, mut pre: F)
where
    F: FnMut(&Visit<'a, '_>) -> TraversalAction,
{
    let result: Result<(), Infallible> = try_walk_with_post(root, |v| Ok(pre(v)), |_| Ok(TraversalAction::Continue));
    let Ok(()) = result;
}

/// Pre-order walk with a callback invoked after the descendants of each node have been visited.
///
/// ## Notes
/// - `post` is not called on pruned nodes.
pub fn walk_with_post<'a, F, G>(root: &'a Node, mut pre: F, mut post: G)
where
    F: FnMut(&Visit<'a, '_>) -> TraversalAction,
    G: FnMut(&Visit<'a, '_>) -> TraversalAction,
{
    let result: Result<(), Infallible> = try_walk_with_post(root, |v| Ok(pre(v)), |v| Ok(post(v)));
    let Ok(()) = result;
}

/// Fallible pre-order walk: the first error stops the traversal and is returned.
pub fn try_walk<'a, E, F>(root: &'a Node, pre: F) -> Result<(), E>
where
    F: FnMut(&Visit<'a, '_>) -> Result<TraversalAction, E>,
{
    try_walk_with_post(root, pre, |_| Ok(TraversalAction::Continue))
}

pub fn try_walk_with_post<'a, E, F, G>(root: &'a Node, mut pre: F, mut post: G) -> Result<(), E>
where
    F: FnMut(&Visit<'a, '_>) -> Result<TraversalAction, E>,
    G: FnMut(&Visit<'a, '_>) -> Result<TraversalAction, E>,
{
    let mut ancestors = Vec::new();
    walk_node(root, &mut ancestors, &mut pre, &mut post)?;
    Ok(())
}

/// Returns `Ok(true)` when the traversal must stop.
fn walk_node<'a, E, F, G>(node: &'a Node, ancestors: &mut Vec<&'a Node>, pre: &mut F, post: &mut G) -> Result<bool, E>
where
    F: FnMut(&Visit<'a, '_>) -> Result<TraversalAction, E>,
    G: FnMut(&Visit<'a, '_>) -> Result<TraversalAction, E>,
{
    let parent = ancestors.last().copied();
    let scope = ancestors.iter().rev().find(|a| a.is_scope_container()).copied().or(parent);

    let action = pre(&Visit {
        node,
        parent,
        scope,
        ancestors: ancestors.as_slice(),
        after: false,
    })?;
    match action {
        TraversalAction::Stop => return Ok(true),
        TraversalAction::Prune => return Ok(false),
        TraversalAction::Continue => {}
    }

    ancestors.push(node);
    for child in node.children() {
        if walk_node(child, ancestors, pre, post)? {
            ancestors.pop();
            return Ok(true);
        }
    }
    ancestors.pop();

    let action = post(&Visit {
        node,
        parent,
        scope,
        ancestors: ancestors.as_slice(),
        after: true,
    })?;
    Ok(action == TraversalAction::Stop)
}

// ============================================================================
// Lookup helpers
// ============================================================================

pub fn count_nodes(root: &Node) -> usize {
    let mut count = 0;
    walk(root, |_| {
        count += 1;
        TraversalAction::Continue
    });
    count
}

pub fn has_error_at_any_depth(root: &Node) -> bool {
    let mut found = false;
    walk(root, |v| {
        if v.node.error().is_some() {
            found = true;
            return TraversalAction::Stop;
        }
        TraversalAction::Continue
    });
    found
}

/// Node whose span is exactly `span`.
pub fn find_node_with_span(root: &Node, span: NodeSpan) -> Option<&Node> {
    let mut found = None;
    walk(root, |v| {
        let node_span = v.node.span();
        if span.end < node_span.start || span.start >= node_span.end {
            return TraversalAction::Prune;
        }
        if node_span == span {
            found = Some(v.node);
            return TraversalAction::Stop;
        }
        TraversalAction::Continue
    });
    found
}

/// All nodes matching `pred`, in visit order.
pub fn find_nodes<'a>(root: &'a Node, pred: impl FnMut(&Node) -> bool) -> Vec<&'a Node> {
    find_nodes_and_chains(root, pred).into_iter().map(|(n, _)| n).collect()
}

/// All nodes matching `pred` together with their ancestors.
pub fn find_nodes_and_chains<'a>(
    root: &'a Node,
    mut pred: impl FnMut(&Node) -> bool,
) -> Vec<(&'a Node, Vec<&'a Node>)> {
    let mut found = Vec::new();
    walk(root, |v| {
        if pred(v.node) {
            found.push((v.node, v.ancestors.to_vec()));
        }
        TraversalAction::Continue
    });
    found
}

/// Last node accepted by `handle` (called with `is_first_found` and the ancestors), and its chain.
pub fn find_node_and_chain<'a>(
    root: &'a Node,
    mut handle: impl FnMut(&Node, bool, &[&Node]) -> bool,
) -> Option<(&'a Node, Vec<&'a Node>)> {
    let mut found: Option<(&'a Node, Vec<&'a Node>)> = None;
    walk(root, |v| {
        if handle(v.node, found.is_none(), v.ancestors) {
            found = Some((v.node, v.ancestors.to_vec()));
        }
        TraversalAction::Continue
    });
    found
}

pub fn find_node<'a>(root: &'a Node, handle: impl FnMut(&Node, bool, &[&Node]) -> bool) -> Option<&'a Node> {
    find_node_and_chain(root, handle).map(|(n, _)| n)
}

/// First node (in visit order) matching `pred`.
pub fn find_first_node<'a>(root: &'a Node, mut pred: impl FnMut(&Node) -> bool) -> Option<&'a Node> {
    let mut found = None;
    walk(root, |v| {
        if pred(v.node) {
            found = Some(v.node);
            return TraversalAction::Stop;
        }
        TraversalAction::Continue
    });
    found
}

/// Closest ancestor matching `pred`, starting from the parent (last element).
pub fn find_closest<'a>(ancestors: &[&'a Node], pred: impl FnMut(&Node) -> bool) -> Option<(&'a Node, usize)> {
    find_closest_max_distance(ancestors, pred, 0)
}

/// Like [`find_closest`], but only looks at most `max_distance` nodes above the parent.
/// A zero `max_distance` means no limit.
pub fn find_closest_max_distance<'a>(
    ancestors: &[&'a Node],
    mut pred: impl FnMut(&Node) -> bool,
    max_distance: usize,
) -> Option<(&'a Node, usize)> {
    let last = if max_distance > 0 {
        ancestors.len().saturating_sub(max_distance + 1)
    } else {
        0
    };
    (last..ancestors.len())
        .rev()
        .find(|&i| pred(ancestors[i]))
        .map(|i| (ancestors[i], i))
}

/// Deepest top-level statement among `node` and its ancestors.
pub fn find_closest_top_level_statement<'a>(node: &'a Node, ancestors: &[&'a Node]) -> Option<&'a Node> {
    let parent = ancestors.last()?;
    if parent.is_the_top_level() {
        return Some(node);
    }
    (1..ancestors.len())
        .rev()
        .find(|&i| ancestors[i - 1].is_the_top_level())
        .map(|i| ancestors[i])
}

pub fn find_previous_statement<'a>(node: &'a Node, ancestors: &[&'a Node]) -> Option<&'a Node> {
    find_previous_statement_and_chain(node, ancestors, true).map(|(stmt, _)| stmt)
}

/// Statement lexically before `node` in its enclosing block or module.
///
/// ## Notes
/// - With `climb_blocks`, the first statement of a block gets the statement preceding the block.
pub fn find_previous_statement_and_chain<'a>(
    node: &'a Node,
    ancestors: &[&'a Node],
    climb_blocks: bool,
) -> Option<(&'a Node, Vec<&'a Node>)> {
    let (&parent, rest) = ancestors.split_last()?;
    if node.is_scope_container() {
        return None;
    }

    let statements = match parent {
        Node::Block(block) => Some((&block.statements, true)),
        Node::Chunk(chunk) => Some((&chunk.statements, false)),
        Node::EmbeddedModule(module) => Some((&module.statements, false)),
        _ => None,
    };

    if let Some((statements, is_block)) = statements {
        if let Some(index) = statements.iter().position(|s| std::ptr::eq(s, node)) {
            if index > 0 {
                return Some((&statements[index - 1], ancestors.to_vec()));
            }
            if !is_block || !climb_blocks {
                return None;
            }
        } else if is_block && !climb_blocks {
            return None;
        }
    }
    find_previous_statement_and_chain(parent, rest, climb_blocks)
}

pub fn find_ident_with_name<'a>(root: &'a Node, name: &str) -> Option<&'a Node> {
    find_first_node(root, |n| n.is_ident_with_name(name))
}

// ============================================================================
// Token-based helpers
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InteriorSpanError {
    #[error("missing tokens")]
    MissingTokens,
    #[error("interior span is not supported for {0} nodes")]
    NotSupported(&'static str),
}

/// Span between the opening and closing brackets of objects, records and dictionaries.
pub fn get_interior_span(node: &Node, chunk: &Chunk) -> Result<NodeSpan, InteriorSpanError> {
    let opening = match node {
        Node::ObjectLiteral(_) => TokenType::OpeningCurlyBracket,
        Node::RecordLiteral(_) => TokenType::OpeningRecordBracket,
        Node::DictionaryLiteral(_) => TokenType::OpeningDictionaryBracket,
        _ => return Err(InteriorSpanError::NotSupported(node.type_name())),
    };

    let tokens = get_tokens(node, chunk, false);
    let start = tokens.iter().find(|t| t.token_type == opening).map(|t| t.span.end);
    let end = tokens
        .iter()
        .rev()
        .find(|t| t.token_type == TokenType::ClosingCurlyBracket)
        .map(|t| t.span.start);

    match (start, end) {
        (Some(start), Some(end)) => Ok(NodeSpan::new(start, end)),
        _ => Err(InteriorSpanError::MissingTokens),
    }
}

/// Index of the call argument the cursor is on.
///
/// ## Parameters
/// - `call_expr_index`: index of `call_expr` in `ancestors`, `None` when `node_at_span` is `call_expr`.
///
/// ## Returns
/// - `None` if the index cannot be determined or `ancestors` does not contain a chunk.
pub fn determine_active_parameter_index(
    cursor_span: NodeSpan,
    node_at_span: &Node,
    call_expr: &CallExpression,
    call_expr_index: Option<usize>,
    ancestors: &[&Node],
) -> Option<usize> {
    let chunk = ancestors.iter().find_map(|a| match a {
        Node::Chunk(chunk) => Some(chunk),
        _ => None,
    })?;
    let call_node = match call_expr_index {
        Some(index) => *ancestors.get(index)?,
        None => *ancestors.last()?,
    };

    let arg_node = match call_expr_index {
        None if !std::ptr::eq(node_at_span, call_node) => Some(node_at_span),
        None => None,
        Some(index) => ancestors.get(index + 1).copied(),
    };

    if let Some(arg) = arg_node {
        return call_expr.arguments.iter().position(|a| std::ptr::eq(a, arg));
    }
    if call_expr.arguments.is_empty() {
        return Some(0);
    }

    let tokens = get_tokens(call_node, chunk, false);
    let mut active: Option<usize> = None;
    for (i, arg) in call_expr.arguments.iter().enumerate() {
        let arg_end = arg.span().end;
        if cursor_span.start >= arg_end {
            active = Some(i);
            let after_comma = tokens
                .iter()
                .any(|t| t.token_type == TokenType::Comma && t.span.start >= arg_end && cursor_span.start >= t.span.end);
            if after_comma {
                active = Some(i + 1);
            }
        }
    }
    active
}

/// Indented tree of node types, each followed by its tokens (used for debugging).
pub fn get_tree_view(root: &Node, chunk: &Chunk) -> String {
    // both callbacks append to the same buffer
    let buf = RefCell::new(String::new());
    walk_with_post(
        root,
        |v| {
            let mut buf = buf.borrow_mut();
            buf.push_str(&"  ".repeat(v.ancestors.len()));
            buf.push_str(v.node.type_name());
            if !v.node.is_simple_value_literal() {
                buf.push_str("{ ");
                for token in get_tokens(v.node, chunk, false).iter() {
                    match token.token_type {
                        TokenType::UnexpectedChar => {
                            buf.push_str("(unexpected)`");
                            buf.push_str(&token.str().replace('\n', "\\n"));
                        }
                        TokenType::Newline => buf.push_str(" `\\n"),
                        _ => {
                            buf.push_str(" `");
                            buf.push_str(token.str());
                        }
                    }
                    buf.push_str("` ");
                }
            }
            buf.push('\n');
            TraversalAction::Continue
        },
        |v| {
            if !v.node.is_simple_value_literal() {
                let mut buf = buf.borrow_mut();
                buf.push_str(&"  ".repeat(v.ancestors.len()));
                buf.push_str("}\n");
            }
            TraversalAction::Continue
        },
    );
    buf.into_inner()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Block, IdentifierLiteral, NodeBase, ReturnStatement};

    fn ident(start: usize, name: &str) -> Node {
        IdentifierLiteral {
            base: NodeBase::new(NodeSpan::new(start, start + name.len())),
            name: name.to_string(),
        }
        .into()
    }

    fn block() -> Node {
        Block {
            base: NodeBase::new(NodeSpan::new(0, 9)),
            region_headers: vec![],
            statements: vec![
                ident(1, "a"),
                ReturnStatement {
                    base: NodeBase::new(NodeSpan::new(3, 9)),
                    expr: Some(Box::new(ident(8, "b"))),
                }
                .into(),
            ],
        }
        .into()
    }

    #[test]
    fn test_walk_prune_skips_descendants() {
        let root = block();
        let mut visited = Vec::new();
        walk(&root, |v| {
            visited.push(v.node.type_name());
            if matches!(v.node, Node::ReturnStatement(_)) {
                TraversalAction::Prune
            } else {
                TraversalAction::Continue
            }
        });
        assert_eq!(visited, vec!["Block", "IdentifierLiteral", "ReturnStatement"]);
    }

    #[test]
    fn test_walk_stop() {
        let root = block();
        let mut count = 0;
        walk(&root, |_| {
            count += 1;
            if count == 2 {
                TraversalAction::Stop
            } else {
                TraversalAction::Continue
            }
        });
        assert_eq!(count, 2);
        assert_eq!(count_nodes(&root), 4);
    }

    #[test]
    fn test_find_ident_with_name() {
        let root = block();
        let found = find_ident_with_name(&root, "b");
        assert_eq!(found.map(Node::span), Some(NodeSpan::new(8, 9)));
        assert!(find_ident_with_name(&root, "c").is_none());
    }

    #[test]
    fn test_tree_view_closes_every_composite_node() {
        let root = crate::parser::must_parse_chunk("print 1");
        let view = get_tree_view(root.node(), root.chunk());
        let lines: Vec<&str> = view.lines().collect();
        assert!(lines[0].starts_with("Chunk{"));
        assert!(lines.iter().any(|l| l.trim_start().starts_with("CallExpression{")));
        let opened = lines.iter().filter(|l| l.contains("{ ")).count();
        let closed = lines.iter().filter(|l| l.trim() == "}").count();
        assert_eq!(opened, closed);
        assert!(view.ends_with("}\n"));
    }

    #[test]
    fn test_post_order_callback() {
        let root = block();
        let mut order = Vec::new();
        walk_with_post(
            &root,
            |_| TraversalAction::Continue,
            |v| {
                assert!(v.after);
                order.push(v.node.type_name());
                TraversalAction::Continue
            },
        );
        assert_eq!(
            order,
            vec!["IdentifierLiteral", "IdentifierLiteral", "ReturnStatement", "Block"]
        );
    }

    #[test]
    fn test_try_walk_propagates_errors() {
        let root = block();
        let result: Result<(), &str> = try_walk(&root, |v| {
            if matches!(v.node, Node::ReturnStatement(_)) {
                Err("boom")
            } else {
                Ok(TraversalAction::Continue)
            }
        });
        assert_eq!(result, Err("boom"));
    }

    #[test]
    fn test_find_previous_statement() {
        let root = block();
        let Node::Block(b) = &root else { unreachable!() };
        let ret = &b.statements[1];
        let prev = find_previous_statement(ret, &[&root]);
        assert!(prev.is_some_and(|p| p.is_ident_with_name("a")));
        assert!(find_previous_statement(&b.statements[0], &[&root]).is_none());
    }

    #[test]
    fn test_find_closest_max_distance() {
        let root = block();
        let Node::Block(b) = &root else { unreachable!() };
        let ret = &b.statements[1];
        let chain = [&root, ret];
        let is_block = |n: &Node| matches!(n, Node::Block(_));
        assert_eq!(find_closest(&chain, is_block).map(|(_, i)| i), Some(0));
        assert_eq!(find_closest_max_distance(&chain, is_block, 1).map(|(_, i)| i), Some(0));
        let is_return = |n: &Node| matches!(n, Node::ReturnStatement(_));
        assert_eq!(find_closest_max_distance(&chain, is_return, 1).map(|(_, i)| i), Some(1));
    }

    #[test]
    fn test_find_node_with_span() {
        let root = block();
        let found = find_node_with_span(&root, NodeSpan::new(8, 9));
        assert!(found.is_some_and(|n| n.is_ident_with_name("b")));
    }
}
