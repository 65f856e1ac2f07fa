//! Token-based printer
//!
//! Prints a node back to source text from its tokens. Gaps between tokens (whitespace the parser
//! does not keep) are filled with spaces, so the output of a node has exactly as many characters
//! as its span.

use std::fmt;

use crate::ast::{Chunk, Node};
use crate::tokens::{Token, get_tokens};

/// Printer settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PrintConfig {
    /// Skip the padding before the first token.
    pub trim_start: bool,
}

/// Print `node`, a node of `chunk`, to `w`.
pub fn print(node: &Node, chunk: &Chunk, w: &mut impl fmt::Write, config: PrintConfig) -> fmt::Result {
    let span = node.span();
    let tokens = get_tokens(node, chunk, false);
    let tokens = outermost_tokens(&tokens);
    let mut prev_end = span.start;

    for (index, token) in tokens.iter().enumerate() {
        if index > 0 || !config.trim_start {
            write_padding(w, token.span.start.saturating_sub(prev_end))?;
        }
        w.write_str(token.str())?;
        prev_end = token.span.end;
    }

    if tokens.is_empty() && config.trim_start {
        return Ok(());
    }
    write_padding(w, span.end.saturating_sub(prev_end))
}

/// [`print`] into a new string.
pub fn sprint(node: &Node, chunk: &Chunk, config: PrintConfig) -> String {
    let mut out = String::new();
    // writing to a String never fails
    let _ = print(node, chunk, &mut out, config);
    out
}

/// Tokens not nested in another token. A token starting where the previous one starts but ending
/// after it (a string literal and its opening backquote) replaces it.
fn outermost_tokens(tokens: &[Token]) -> Vec<&Token> {
    let mut kept: Vec<&Token> = Vec::with_capacity(tokens.len());
    for token in tokens {
        let Some(last) = kept.last().map(|t| t.span) else {
            kept.push(token);
            continue;
        };
        if token.span.start == last.start && token.span.end > last.end {
            kept.pop();
            kept.push(token);
        } else if token.span.start >= last.end {
            kept.push(token);
        }
    }
    kept
}

fn write_padding(w: &mut impl fmt::Write, width: usize) -> fmt::Result {
    for _ in 0..width {
        w.write_char(' ')?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::must_parse_chunk;
    use insta::assert_snapshot;

    fn print_statement(source: &str, index: usize, config: PrintConfig) -> String {
        let root = must_parse_chunk(source);
        sprint(&root.chunk().statements[index], root.chunk(), config)
    }

    #[test]
    fn test_print_whole_chunk() {
        let source = "manifest {}\nprint (1 + 2)";
        let root = must_parse_chunk(source);
        let out = sprint(root.node(), root.chunk(), PrintConfig::default());
        assert_eq!(out, source);
    }

    #[test]
    fn test_print_statement() {
        assert_snapshot!(print_statement("print (1 + 2)", 0, PrintConfig::default()), @"print (1 + 2)");
    }

    #[test]
    fn test_print_keeps_comments() {
        let source = "# say hello\nprint 1";
        let root = must_parse_chunk(source);
        assert_eq!(sprint(root.node(), root.chunk(), PrintConfig::default()), source);
    }

    #[test]
    fn test_print_replaces_tabs_with_spaces() {
        let root = must_parse_chunk("print\t1");
        assert_snapshot!(sprint(root.node(), root.chunk(), PrintConfig::default()), @"print 1");
    }

    #[test]
    fn test_print_trim_start() {
        let source = "print 1\n  print 2";
        let padded = print_statement(source, 1, PrintConfig::default());
        let trimmed = print_statement(source, 1, PrintConfig { trim_start: true });
        assert_eq!(padded, "print 2");
        assert_eq!(trimmed, "print 2");

        let root = must_parse_chunk(source);
        let whole = sprint(root.node(), root.chunk(), PrintConfig { trim_start: true });
        assert_eq!(whole, "print 1\n  print 2");
    }

    #[test]
    fn test_print_string_and_rune_literals() {
        for source in [
            "x = `abc`",
            "x = `multi\nline`",
            "x = `a{{b}}c`",
            "x = 'a'",
            "x = '\\a'",
            "x = '\\v'",
            "x = '\\n'",
            "x = ['a'..'z']",
        ] {
            let root = must_parse_chunk(source);
            assert_eq!(sprint(root.node(), root.chunk(), PrintConfig::default()), source, "{source:?}");
        }
    }

    #[test]
    fn test_print_length_matches_span() {
        let root = must_parse_chunk("a = [1,   2]\nprint   a");
        for statement in &root.chunk().statements {
            let out = sprint(statement, root.chunk(), PrintConfig::default());
            assert_eq!(out.chars().count(), statement.span().len());
        }
    }
}
