/// Public entry points.
///
/// ## Notes
/// - This file is `include!`'d into `crate::parser`.
/// - Every entry point rejects inputs longer than [`MAX_MODULE_BYTE_LEN`] bytes.

/// Error of [`parse_chunk`].
///
/// Syntax errors do not prevent the chunk from being built: in that case `chunk` holds the
/// complete tree (with error nodes) and `error` is [`ParseError::Syntax`].
#[derive(Debug, Clone, Error)]
#[error("{error}")]
pub struct ChunkParseError {
    pub chunk: Option<ChunkRoot>,
    pub error: ParseError,
}

impl ChunkParseError {
    fn fatal(error: ParseError) -> Self {
        Self { chunk: None, error }
    }
}

/// Parse a whole module.
///
/// `source_name` only appears in the positions of the aggregated syntax errors.
///
/// ## Errors
/// - [`ParseError::TooLarge`], [`ParseError::Cancelled`] and [`ParseError::RecursionLimit`]
///   come without a chunk.
/// - [`ParseError::Syntax`] comes with the chunk, see [`ChunkParseError`].
#[tracing::instrument(skip_all, fields(source_len = source.len()))]
pub fn parse_chunk(source: &str, source_name: &str, options: &ParserOptions) -> Result<ChunkRoot, ChunkParseError> {
    let (_, result) = parse_chunk_returning_code_units(source, source_name, options);
    result
}

/// Same as [`parse_chunk`], also returning the code units the spans index into.
#[tracing::instrument(skip_all, fields(source_len = source.len()))]
pub fn parse_chunk_returning_code_units(
    source: &str,
    source_name: &str,
    options: &ParserOptions,
) -> (Arc<[char]>, Result<ChunkRoot, ChunkParseError>) {
    if source.len() > MAX_MODULE_BYTE_LEN {
        let error = ParseError::TooLarge { len: source.len() };
        return (Arc::from(Vec::new()), Err(ChunkParseError::fatal(error)));
    }
    if options.cancellation.as_ref().is_some_and(CancellationToken::is_cancelled) {
        return (Arc::from(Vec::new()), Err(ChunkParseError::fatal(ParseError::Cancelled)));
    }

    let code_units: Arc<[char]> = source.chars().collect();
    let (chunk, fatal) = {
        let mut parser = Parser::new(&code_units, options);
        let chunk = parser.parse_chunk();
        (chunk, parser.fatal.take())
    };

    if let Some(error) = fatal {
        tracing::debug!(%error, "parsing stopped");
        return (code_units, Err(ChunkParseError::fatal(error)));
    }

    let root = ChunkRoot::new(chunk);
    let aggregation = aggregate_syntax_errors(root.node(), &code_units, source_name);
    if aggregation.is_empty() {
        return (code_units, Ok(root));
    }

    tracing::debug!(count = aggregation.errors.len(), "chunk has syntax errors");
    let error = ChunkParseError {
        chunk: Some(root),
        error: ParseError::Syntax(aggregation),
    };
    (code_units, Err(error))
}

/// Parse a module that is known to be valid.
///
/// ## Panics
/// - If the module has any error.
pub fn must_parse_chunk(source: &str) -> ChunkRoot {
    match parse_chunk(source, "<chunk>", &ParserOptions::default()) {
        Ok(root) => root,
        Err(error) => panic!("failed to parse chunk: {error}"),
    }
}

/// Collect the errors of `root` and its descendants in traversal order.
fn aggregate_syntax_errors(root: &Node, code_units: &[char], source_name: &str) -> ParsingErrorAggregation {
    let mut aggregation = ParsingErrorAggregation::default();
    walk(root, |visit| {
        if let Some(error) = visit.node.error() {
            let span = visit.node.span();
            let (start_line, start_column, end_line, end_column) = line_columns(code_units, span.start, span.end);
            aggregation.push(
                error.clone(),
                SourcePositionRange {
                    source_name: source_name.to_string(),
                    start_line,
                    start_column,
                    end_line,
                    end_column,
                    span,
                },
            );
        }
        TraversalAction::Continue
    });
    aggregation
}

/// Parse a single expression.
///
/// ## Returns
/// - The expression and `true` if it has no error and spans the whole input.
pub fn parse_expression(source: &str) -> (Node, bool) {
    if source.len() > MAX_MODULE_BYTE_LEN {
        return (missing_at(0), false);
    }

    let code_units: Vec<char> = source.chars().collect();
    let mut parser = Parser::new(&code_units, &ParserOptions::default());
    let expr = parser.parse_expression();

    let ok = parser.fatal.is_none()
        && parser.at_end()
        && !matches!(expr, Node::MissingExpression(_))
        && !has_error_at_any_depth(&expr);
    (expr, ok)
}

/// Run a single production over `source` and keep its result if it consumed everything.
fn parse_whole(source: &str, production: impl FnOnce(&mut Parser<'_>) -> Option<Node>) -> Option<Node> {
    if source.is_empty() || source.len() > MAX_MODULE_BYTE_LEN {
        return None;
    }

    let code_units: Vec<char> = source.chars().collect();
    let mut parser = Parser::new(&code_units, &ParserOptions::default());
    let node = production(&mut parser)?;
    (parser.fatal.is_none() && parser.at_end() && node.error().is_none()).then_some(node)
}

/// Value of an absolute or relative path literal such as `/a/b` or `./a`.
pub fn parse_path(source: &str) -> Option<String> {
    let node = parse_whole(source, |p| {
        p.peek_matches(|c| c == '/' || c == '.').then(|| p.parse_path_like_expression(false))
    })?;
    match node {
        Node::AbsolutePathLiteral(path) => Some(path.value),
        Node::RelativePathLiteral(path) => Some(path.value),
        _ => None,
    }
}

/// Whether `source` is a path pattern literal such as `%/a/...` or `%./*.txt`.
pub fn parse_path_pattern(source: &str) -> bool {
    let node = parse_whole(source, |p| {
        (p.peek_is('%') && p.char_at(p.i + 1).is_some_and(|c| c == '/' || c == '.'))
            .then(|| p.parse_path_like_expression(true))
    });
    matches!(
        node,
        Some(Node::AbsolutePathPatternLiteral(_) | Node::RelativePathPatternLiteral(_))
    )
}

/// Value of a URL literal such as `https://example.com/index.html`.
pub fn parse_url(source: &str) -> Option<String> {
    let node = parse_whole(source, |p| {
        let scheme_end = p.s.windows(3).position(|w| w == [':', '/', '/'])?;
        if scheme_end == 0 || !p.s[..scheme_end].iter().all(|&c| is_alpha(c)) {
            return None;
        }
        p.i = scheme_end;
        Some(p.parse_url_like(0))
    })?;
    match node {
        Node::URLLiteral(url) => Some(url.value),
        _ => None,
    }
}

/// Parse the text of a date literal such as `2020y-10mt-5d-UTC`.
///
/// ## Errors
/// - The same errors as the date literal nodes carry; year-only literals are rejected.
pub fn parse_date_literal(raw: &str) -> Result<DateValue, ParsingError> {
    match parse_date_like(raw) {
        (DateLikeKind::Year, Ok(_)) => Err(ParsingError::unspecified(INVALID_DATE_LITERAL)),
        (_, result) => result,
    }
}

/// Whether `key` is the key of a metadata property, like `_id_`.
pub fn is_metadata_key(key: &str) -> bool {
    key.len() > 2 && key.starts_with('_') && key.ends_with('_')
}
