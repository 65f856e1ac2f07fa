/// Parser core types: options, cancellation, the hyperscript hook and the [`Parser`] state.
///
/// This chunk also holds the low-level primitives shared by every production: peeking, token
/// pushing, nesting/cancellation guards and interpolation sub-parsing.
///
/// ## Notes
/// - This file is `include!`'d into `crate::parser` to keep all parser methods in a single module.
/// - Positions are indexes into the decoded code units, never byte offsets.

/// Default maximum nesting depth of expressions and statements. Sources nested this deep still
/// parse on a 2 MiB thread stack with an unoptimized build.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Cooperative cancellation flag shared between the caller and the parser.
///
/// The parser polls it before every statement and every nested expression.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Error returned by a [`HyperscriptParser`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HyperscriptError {
    /// The code is not valid hyperscript; the message is stored on the node.
    #[error("{0}")]
    Syntax(String),

    /// The hook itself failed; the node only gets a generic error.
    #[error("hyperscript parser failure: {0}")]
    Fatal(String),
}

/// Sub-parser for hyperscript code found in attribute shorthands (`{on click ...}`) and in
/// `<script h>` elements.
pub trait HyperscriptParser: Send + Sync {
    fn parse(&self, source: &str) -> Result<HyperscriptPayload, HyperscriptError>;
}

/// Parser configuration.
///
/// ## Notes
/// - `start_index` lets callers skip a prefix of the code units (spans stay absolute).
/// - With `only_chunk_start` the parser stops after the manifest.
#[derive(Clone)]
pub struct ParserOptions {
    pub cancellation: Option<CancellationToken>,
    pub parse_hyperscript: Option<Arc<dyn HyperscriptParser>>,
    pub start_index: usize,
    pub only_chunk_start: bool,
    pub max_depth: usize,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            cancellation: None,
            parse_hyperscript: None,
            start_index: 0,
            only_chunk_start: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl fmt::Debug for ParserOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParserOptions")
            .field("cancellation", &self.cancellation)
            .field("parse_hyperscript", &self.parse_hyperscript.is_some())
            .field("start_index", &self.start_index)
            .field("only_chunk_start", &self.only_chunk_start)
            .field("max_depth", &self.max_depth)
            .finish()
    }
}

/// Parser state.
///
/// ## Notes
/// - `tokens` accumulates the valueless tokens of the whole module in parsing order, they are
///   sorted once the chunk is complete.
/// - `fatal` is sticky: once set, the cursor is moved to the end so that every loop stops, and the
///   entry point returns the error instead of a chunk.
pub(crate) struct Parser<'a> {
    s: &'a [char],
    i: usize,
    in_pattern: bool,
    in_quoted_region: bool,
    in_unquoted_region: bool,
    only_chunk_start: bool,
    tokens: Vec<Token>,
    depth: usize,
    max_depth: usize,
    cancellation: Option<CancellationToken>,
    parse_hyperscript: Option<Arc<dyn HyperscriptParser>>,
    fatal: Option<ParseError>,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(s: &'a [char], options: &ParserOptions) -> Self {
        Self {
            s,
            i: options.start_index.min(s.len()),
            in_pattern: false,
            in_quoted_region: false,
            in_unquoted_region: false,
            only_chunk_start: options.only_chunk_start,
            tokens: Vec::new(),
            depth: 0,
            max_depth: options.max_depth,
            cancellation: options.cancellation.clone(),
            parse_hyperscript: options.parse_hyperscript.clone(),
            fatal: None,
        }
    }

    /// Parser over `s[start..end]` sharing this parser's hooks and nesting limit.
    fn sub_parser(&self, start: usize, end: usize) -> Parser<'a> {
        let s: &'a [char] = self.s;
        Parser {
            s: &s[start..end],
            i: 0,
            in_pattern: false,
            in_quoted_region: self.in_quoted_region,
            in_unquoted_region: self.in_unquoted_region,
            only_chunk_start: false,
            tokens: Vec::new(),
            depth: self.depth,
            max_depth: self.max_depth,
            cancellation: self.cancellation.clone(),
            parse_hyperscript: self.parse_hyperscript.clone(),
            fatal: None,
        }
    }

    // ========================================================================
    // Guards
    // ========================================================================

    fn interrupt(&mut self, error: ParseError) {
        if self.fatal.is_none() {
            self.fatal = Some(error);
        }
        self.i = self.s.len();
    }

    /// Poll the cancellation token.
    ///
    /// ## Returns
    /// - `true` if parsing must stop.
    fn is_interrupted(&mut self) -> bool {
        if self.fatal.is_some() {
            return true;
        }
        if self.cancellation.as_ref().is_some_and(CancellationToken::is_cancelled) {
            self.interrupt(ParseError::Cancelled);
            return true;
        }
        false
    }

    /// Enter a nested production.
    ///
    /// ## Returns
    /// - `false` if parsing was cancelled or the maximum depth is exceeded; the caller must then
    ///   return without calling [`Parser::leave_nested`].
    fn enter_nested(&mut self) -> bool {
        if self.is_interrupted() {
            return false;
        }
        if self.depth >= self.max_depth {
            self.interrupt(ParseError::RecursionLimit {
                max_depth: self.max_depth,
            });
            return false;
        }
        self.depth += 1;
        true
    }

    fn leave_nested(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    fn missing_at_cursor(&self) -> Node {
        missing_at(self.i)
    }

    // ========================================================================
    // Cursor helpers
    // ========================================================================

    fn len(&self) -> usize {
        self.s.len()
    }

    fn at_end(&self) -> bool {
        self.i >= self.s.len()
    }

    fn peek(&self) -> Option<char> {
        self.s.get(self.i).copied()
    }

    fn char_at(&self, index: usize) -> Option<char> {
        self.s.get(index).copied()
    }

    fn peek_is(&self, c: char) -> bool {
        self.peek() == Some(c)
    }

    /// Whether the char at `i + offset` is `c`.
    fn next_is(&self, offset: usize, c: char) -> bool {
        self.char_at(self.i + offset) == Some(c)
    }

    fn peek_matches(&self, pred: impl Fn(char) -> bool) -> bool {
        self.peek().is_some_and(pred)
    }

    /// Whether the code units at the cursor spell `word`.
    fn at_str(&self, word: &str) -> bool {
        let mut j = self.i;
        for c in word.chars() {
            if self.char_at(j) != Some(c) {
                return false;
            }
            j += 1;
        }
        true
    }

    /// Whether the code units at the cursor spell `word` followed by a non-identifier char.
    fn at_word(&self, word: &str) -> bool {
        self.at_str(word) && !self.char_at(self.i + word.chars().count()).is_some_and(is_ident_char)
    }

    fn text(&self, start: usize, end: usize) -> String {
        let end = end.min(self.s.len());
        self.s[start.min(end)..end].iter().collect()
    }

    fn span_from(&self, start: usize) -> NodeSpan {
        NodeSpan::new(start, self.i)
    }

    fn is_expression_end(&self) -> bool {
        self.peek().is_none_or(is_unpaired_or_closing_delim)
    }

    fn eat_ident_chars(&mut self) {
        while self.peek_matches(is_ident_char) {
            self.i += 1;
        }
    }

    // ========================================================================
    // Tokens
    // ========================================================================

    fn push_token(&mut self, token_type: TokenType, start: usize, end: usize) {
        self.tokens.push(Token::new(token_type, NodeSpan::new(start, end)));
    }

    /// Push a one-char token at `index`.
    fn push_token_at(&mut self, token_type: TokenType, index: usize) {
        self.push_token(token_type, index, index + 1);
    }

    fn push_sub_token(&mut self, token_type: TokenType, sub_type: TokenSubType, start: usize, end: usize) {
        self.tokens
            .push(Token::with_sub_type(token_type, sub_type, NodeSpan::new(start, end)));
    }

    fn push_raw_token(&mut self, token_type: TokenType, start: usize, end: usize) {
        let raw = self.text(start, end);
        self.tokens.push(Token::with_raw(token_type, NodeSpan::new(start, end), raw));
    }

    /// Push the keyword token spanning `[start, start + keyword length)`.
    fn push_keyword(&mut self, token_type: TokenType, start: usize) {
        let len = token_type.lexeme().map_or(0, |l| l.chars().count());
        self.push_token(token_type, start, start + len);
    }

    fn unexpected_char_node(&mut self, message: String) -> Node {
        let start = self.i;
        self.push_raw_token(TokenType::UnexpectedChar, start, start + 1);
        self.i += 1;
        UnknownNode {
            base: NodeBase::with_error(NodeSpan::new(start, self.i), ParsingError::unspecified(message)),
        }
        .into()
    }

    // ========================================================================
    // Interpolations
    // ========================================================================

    /// Parse `s[start..end]` as a single expression, the way interpolations are parsed.
    ///
    /// The resulting node and its tokens are shifted back to absolute positions.
    ///
    /// ## Returns
    /// - The expression, and whether it is error-free and covers the whole range.
    fn parse_interpolation(&mut self, start: usize, end: usize) -> (Node, bool) {
        let mut sub = self.sub_parser(start, end);
        let mut expr = sub.parse_expression();
        let ok = !expr.is_missing_expr() && sub.at_end() && !has_error_at_any_depth(&expr);

        shift_node_spans(&mut expr, start);
        self.absorb_sub_parser(sub, start);
        (expr, ok)
    }

    /// Take over the tokens and the fatal error of a parser created by [`Parser::sub_parser`]
    /// at `offset`.
    fn absorb_sub_parser(&mut self, mut sub: Parser<'a>, offset: usize) {
        if let Some(fatal) = sub.fatal.take() {
            self.interrupt(fatal);
        }
        self.tokens.extend(sub.tokens.into_iter().map(|mut token| {
            token.span = NodeSpan::new(token.span.start + offset, token.span.end + offset);
            token
        }));
    }
}

/// Empty [`MissingExpression`] at `index`, used for absent mandatory children.
fn missing_at(index: usize) -> Node {
    MissingExpression {
        base: NodeBase::new(NodeSpan::new(index, index)),
    }
    .into()
}
