//! Token model and on-demand token derivation.
//!
//! The parser only records *valueless* tokens (keywords, punctuation) plus a few valued ones it
//! cannot attach to a node (comments, unexpected characters). The tokens of literals and
//! identifiers are synthesized from the AST by [`get_tokens`].

use std::fmt;
use std::sync::Arc;

use inox_core::lang::keywords::{self, KeywordId};
use inox_core::lang::lexemes::{self, LexemeId};

use crate::ast::{Chunk, Node, NodeSpan};
use crate::walk::{TraversalAction, walk};

/// Derived token lists shorter than this are not cached.
const MIN_TOKEN_CACHING_COUNT: usize = 2;

macro_rules! token_types {
    (
        valueless { $($v:ident => $spelling:expr),* $(,)? }
        valued { $($w:ident),* $(,)? }
    ) => {
        /// Type of a [`Token`].
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum TokenType {
            $($v,)*
            $($w,)*
        }

        impl TokenType {
            /// Fixed spelling of valueless tokens.
            pub fn lexeme(self) -> Option<&'static str> {
                match self {
                    $(TokenType::$v => Some($spelling),)*
                    _ => None,
                }
            }

            pub fn name(self) -> &'static str {
                match self {
                    $(TokenType::$v => stringify!($v),)*
                    $(TokenType::$w => stringify!($w),)*
                }
            }
        }
    };
}

fn kw(id: KeywordId) -> &'static str {
    keywords::as_str(id)
}

fn lx(id: LexemeId) -> &'static str {
    lexemes::as_str(id)
}

token_types! {
    valueless {
        IfKeyword => kw(KeywordId::If),
        ElseKeyword => kw(KeywordId::Else),
        PreinitKeyword => kw(KeywordId::Preinit),
        ManifestKeyword => kw(KeywordId::Manifest),
        IncludableChunkKeyword => kw(KeywordId::IncludableChunk),
        DropPermsKeyword => kw(KeywordId::DropPerms),
        AssignKeyword => kw(KeywordId::Assign),
        ReadonlyKeyword => kw(KeywordId::Readonly),
        ConstKeyword => kw(KeywordId::Const),
        VarKeyword => kw(KeywordId::Var),
        GlobalvarKeyword => kw(KeywordId::Globalvar),
        ForKeyword => kw(KeywordId::For),
        WalkKeyword => kw(KeywordId::Walk),
        InKeyword => kw(KeywordId::In),
        GoKeyword => kw(KeywordId::Go),
        ImportKeyword => kw(KeywordId::Import),
        FnKeyword => kw(KeywordId::Fn),
        PercentFn => lx(LexemeId::PercentFn),
        SwitchKeyword => kw(KeywordId::Switch),
        MatchKeyword => kw(KeywordId::Match),
        DefaultcaseKeyword => kw(KeywordId::Defaultcase),
        ReturnKeyword => kw(KeywordId::Return),
        YieldKeyword => kw(KeywordId::Yield),
        CoyieldKeyword => kw(KeywordId::Coyield),
        BreakKeyword => kw(KeywordId::Break),
        ContinueKeyword => kw(KeywordId::Continue),
        PruneKeyword => kw(KeywordId::Prune),
        AssertKeyword => kw(KeywordId::Assert),
        SelfKeyword => kw(KeywordId::SelfRef),
        SupersysKeyword => kw(KeywordId::Supersys),
        MappingKeyword => kw(KeywordId::Mapping),
        CompKeyword => kw(KeywordId::Comp),
        UdataKeyword => kw(KeywordId::Udata),
        ConcatKeyword => kw(KeywordId::Concat),
        TestsuiteKeyword => kw(KeywordId::Testsuite),
        TestcaseKeyword => kw(KeywordId::Testcase),
        SynchronizedKeyword => kw(KeywordId::Synchronized),
        LifetimejobKeyword => kw(KeywordId::Lifetimejob),
        OnKeyword => kw(KeywordId::On),
        ReceivedKeyword => kw(KeywordId::Received),
        DoKeyword => kw(KeywordId::Do),
        ChunkedKeyword => kw(KeywordId::Chunked),
        SendvalKeyword => kw(KeywordId::Sendval),
        PatternKeyword => kw(KeywordId::Pattern),
        PnamespaceKeyword => kw(KeywordId::Pnamespace),
        ExtendKeyword => kw(KeywordId::Extend),
        StructKeyword => kw(KeywordId::Struct),
        NewKeyword => kw(KeywordId::New),
        OtherpropsKeyword => kw(KeywordId::Otherprops),
        ToKeyword => kw(KeywordId::To),
        AndKeyword => kw(KeywordId::And),
        OrKeyword => kw(KeywordId::Or),
        PercentStr => lx(LexemeId::PercentStr),
        In => lx(LexemeId::In),
        NotIn => lx(LexemeId::NotIn),
        Is => lx(LexemeId::Is),
        IsNot => lx(LexemeId::IsNot),
        Keyof => lx(LexemeId::Keyof),
        Urlof => lx(LexemeId::Urlof),
        NotMatch => lx(LexemeId::NotMatch),
        Substrof => lx(LexemeId::Substrof),
        PercentSymbol => lx(LexemeId::Percent),
        Tilde => lx(LexemeId::Tilde),
        ExclamationMark => lx(LexemeId::ExclamationMark),
        ExclamationMarkEqual => lx(LexemeId::ExclamationMarkEqual),
        DoubleQuestionMark => lx(LexemeId::DoubleQuestionMark),
        Plus => lx(LexemeId::Plus),
        PlusDot => lx(LexemeId::PlusDot),
        Minus => lx(LexemeId::Minus),
        MinusDot => lx(LexemeId::MinusDot),
        Asterisk => lx(LexemeId::Asterisk),
        AsteriskDot => lx(LexemeId::AsteriskDot),
        Slash => lx(LexemeId::Slash),
        SlashDot => lx(LexemeId::SlashDot),
        GreaterThan => lx(LexemeId::GreaterThan),
        GreaterThanDot => lx(LexemeId::GreaterThanDot),
        GreaterOrEqual => lx(LexemeId::GreaterOrEqual),
        GreaterOrEqualDot => lx(LexemeId::GreaterOrEqualDot),
        LessThan => lx(LexemeId::LessThan),
        LessThanDot => lx(LexemeId::LessThanDot),
        LessOrEqual => lx(LexemeId::LessOrEqual),
        LessOrEqualDot => lx(LexemeId::LessOrEqualDot),
        SelfClosingTagTerminator => lx(LexemeId::SelfClosingTagTerminator),
        EndTagOpenDelimiter => lx(LexemeId::EndTagOpenDelimiter),
        OpeningBracket => lx(LexemeId::OpeningBracket),
        ClosingBracket => lx(LexemeId::ClosingBracket),
        OpeningCurlyBracket => lx(LexemeId::OpeningCurlyBracket),
        ClosingCurlyBracket => lx(LexemeId::ClosingCurlyBracket),
        OpeningDictionaryBracket => lx(LexemeId::OpeningDictionaryBracket),
        OpeningKeylistBracket => lx(LexemeId::OpeningKeylistBracket),
        OpeningObjectPatternBracket => lx(LexemeId::OpeningObjectPatternBracket),
        OpeningListPatternBracket => lx(LexemeId::OpeningListPatternBracket),
        OpeningDictionaryPatternBracket => lx(LexemeId::OpeningDictionaryPatternBracket),
        OpeningRecordBracket => lx(LexemeId::OpeningRecordBracket),
        OpeningTupleBracket => lx(LexemeId::OpeningTupleBracket),
        OpeningParenthesis => lx(LexemeId::OpeningParenthesis),
        ClosingParenthesis => lx(LexemeId::ClosingParenthesis),
        PatternUnionOpeningPipe => lx(LexemeId::PatternUnionOpeningPipe),
        PatternUnionPipe => lx(LexemeId::Pipe),
        Arrow => lx(LexemeId::Arrow),
        Pipe => lx(LexemeId::Pipe),
        Comma => lx(LexemeId::Comma),
        Colon => lx(LexemeId::Colon),
        DoubleColon => lx(LexemeId::DoubleColon),
        Semicolon => lx(LexemeId::Semicolon),
        CssSelectorPrefix => lx(LexemeId::CssSelectorPrefix),
        Dot => lx(LexemeId::Dot),
        TwoDots => lx(LexemeId::TwoDots),
        DotDotLessThan => lx(LexemeId::DotDotLessThan),
        ThreeDots => lx(LexemeId::ThreeDots),
        DotLessThan => lx(LexemeId::DotLessThan),
        Equal => lx(LexemeId::Equal),
        EqualEqual => lx(LexemeId::EqualEqual),
        PlusEqual => lx(LexemeId::PlusEqual),
        MinusEqual => lx(LexemeId::MinusEqual),
        MulEqual => lx(LexemeId::MulEqual),
        DivEqual => lx(LexemeId::DivEqual),
        AtSign => lx(LexemeId::AtSign),
        AntiSlash => lx(LexemeId::AntiSlash),
        Dollar => lx(LexemeId::Dollar),
        Hash => lx(LexemeId::Hash),
        QueryParamQuestionMark => lx(LexemeId::QuestionMark),
        QueryParamSep => lx(LexemeId::Ampersand),
        QuestionMark => lx(LexemeId::QuestionMark),
        Backquote => lx(LexemeId::Backquote),
        StrInterpOpeningBrackets => lx(LexemeId::StrInterpOpeningBrackets),
        StrInterpClosingBrackets => lx(LexemeId::StrInterpClosingBrackets),
        UnquotedRegionOpeningDelim => lx(LexemeId::UnquotedRegionOpeningDelim),
        UnquotedRegionClosingDelim => lx(LexemeId::UnquotedRegionClosingDelim),
        OpeningQuotedStmtsRegionBrace => lx(LexemeId::OpeningQuotedStmtsRegionBrace),
        Newline => lx(LexemeId::Newline),
    }
    valued {
        UnexpectedChar,
        InvalidOperator,
        InvalidInterpSlice,
        InvalidUrlLit,
        Comment,
        IntLiteral,
        NilLiteral,
        FloatLiteral,
        PortLiteral,
        BooleanLiteral,
        QuotedStringLiteral,
        UnquotedStringLiteral,
        MultilineStringLiteral,
        RegexLiteral,
        RateLiteral,
        QuantityLiteral,
        DateLiteral,
        FlagLiteral,
        RuneLiteral,
        SchemeLiteral,
        HostLiteral,
        UrlLiteral,
        UrlPatternLiteral,
        HostPatternLiteral,
        EmailAddressLiteral,
        PatternIdentifierLiteral,
        UnprefixedPatternIdentifierLiteral,
        PatternNamespaceIdentifierLiteral,
        UnprefixedPatternNamespaceIdentifierLiteral,
        IdentifierLiteral,
        MetaIdentifier,
        PropNameLiteral,
        UnambiguousIdentifierLiteral,
        LocalVarname,
        GlobalVarname,
        AbsolutePathLiteral,
        RelativePathLiteral,
        AbsolutePathPatternLiteral,
        RelativePathPatternLiteral,
        PathSlice,
        PathPatternSlice,
        StrTemplateSlice,
        StrTemplateInterpType,
        ByteSliceLiteral,
        NamedPathSegment,
        PatternGroupName,
        QueryParamKeyEqual,
        QueryParamSlice,
        OptionName,
        MarkupTextSlice,
        OccurrenceModifier,
        AnnotatedRegionHeaderText,
        HyperscriptCode,
        RawMarkupContent,
        CssSelectorSlice,
    }
}

impl TokenType {
    pub fn is_valueless(self) -> bool {
        self.lexeme().is_some()
    }
}

/// Disambiguates tokens sharing a [`TokenType`] (the `{` of an object vs. a markup interpolation).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TokenSubType {
    #[default]
    None,
    BlockOpeningBrace,
    BlockClosingBrace,
    ObjectLikeOpeningBrace,
    ObjectLikeClosingBrace,
    MarkupTagOpeningBracket,
    MarkupTagClosingBracket,
    MarkupAttrEqual,
    MarkupInterpOpeningBrace,
    MarkupInterpClosingBrace,
    HostInterpOpeningBrace,
    HostInterpClosingBrace,
    PathInterpOpeningBrace,
    PathInterpClosingBrace,
    QueryParamInterpOpeningBrace,
    QueryParamInterpClosingBrace,
    StringPatternUnionPipe,
    UnprefixedPatternUnionPipe,
    QuotedStmtsClosingBrace,
}

/// Semantic flags computed by [`get_tokens`] when metadata is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TokenMeta(u16);

impl TokenMeta {
    pub const NONE: TokenMeta = TokenMeta(0);
    pub const CALLEE: TokenMeta = TokenMeta(1);
    pub const PARAM_NAME: TokenMeta = TokenMeta(1 << 1);
    pub const PROP_NAME: TokenMeta = TokenMeta(1 << 2);
    pub const DECL_FN_NAME: TokenMeta = TokenMeta(1 << 3);

    pub fn contains(self, other: TokenMeta) -> bool {
        self.0 & other.0 == other.0 && other.0 != 0
    }

    pub fn insert(&mut self, other: TokenMeta) {
        self.0 |= other.0;
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Names of the set flags, in declaration order.
    pub fn names(self) -> Vec<&'static str> {
        [
            (TokenMeta::CALLEE, "callee"),
            (TokenMeta::PARAM_NAME, "param"),
            (TokenMeta::PROP_NAME, "prop"),
            (TokenMeta::DECL_FN_NAME, "fn"),
        ]
        .into_iter()
        .filter(|(flag, _)| self.contains(*flag))
        .map(|(_, name)| name)
        .collect()
    }
}

/// A lexical token. `raw` is empty for valueless tokens.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token {
    pub token_type: TokenType,
    pub sub_type: TokenSubType,
    pub meta: TokenMeta,
    pub span: NodeSpan,
    pub raw: String,
}

impl Token {
    pub fn new(token_type: TokenType, span: NodeSpan) -> Self {
        Self {
            token_type,
            sub_type: TokenSubType::None,
            meta: TokenMeta::NONE,
            span,
            raw: String::new(),
        }
    }

    pub fn with_sub_type(token_type: TokenType, sub_type: TokenSubType, span: NodeSpan) -> Self {
        Self {
            sub_type,
            ..Self::new(token_type, span)
        }
    }

    pub fn with_raw(token_type: TokenType, span: NodeSpan, raw: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            ..Self::new(token_type, span)
        }
    }

    /// Source text of the token.
    pub fn str(&self) -> &str {
        if !self.raw.is_empty() {
            return &self.raw;
        }
        self.token_type.lexeme().unwrap_or("")
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({}-{})", self.str(), self.span.start, self.span.end)
    }
}

// ============================================================================
// Derivation
// ============================================================================

/// Reconstruct the sorted tokens of `node`, a node of `chunk` (or `chunk` itself).
///
/// ## Notes
/// - The result is sorted by start, has no empty span and no two tokens with the same span.
/// - Results with at least two tokens are memoized in the chunk's token cache.
/// - With `add_meta` identifiers get [`TokenMeta`] flags (callee, property name, ...).
#[tracing::instrument(level = "trace", skip_all, fields(node = node.type_name(), add_meta = add_meta))]
pub fn get_tokens(node: &Node, chunk: &Chunk, add_meta: bool) -> Arc<[Token]> {
    let span = node.span();
    let key = (node.addr(), span, add_meta);
    if let Some(tokens) = chunk.token_cache.get(key) {
        tracing::debug!("token cache hit");
        return tokens;
    }

    let lo = chunk.tokens.partition_point(|t| t.span.start < span.start);
    let hi = chunk.tokens.partition_point(|t| t.span.start < span.end);
    let mut tokens: Vec<Token> = chunk.tokens[lo..hi.max(lo)]
        .iter()
        .filter(|t| t.span.end <= span.end)
        .cloned()
        .collect();

    walk(node, |visit| {
        synthesize_tokens(visit.node, visit.parent, visit.ancestors, add_meta, &mut tokens);
        TraversalAction::Continue
    });

    tokens.sort_by_key(|t| t.span.start);
    let mut unique: Vec<Token> = Vec::with_capacity(tokens.len());
    for token in tokens {
        if token.span.is_empty() {
            continue;
        }
        if unique.last().is_some_and(|last| last.span == token.span) {
            continue;
        }
        unique.push(token);
    }

    let tokens: Arc<[Token]> = Arc::from(unique);
    if tokens.len() >= MIN_TOKEN_CACHING_COUNT {
        chunk.token_cache.insert(key, tokens.clone());
    }
    tokens
}

pub fn get_first_token(node: &Node, chunk: &Chunk) -> Option<Token> {
    get_tokens(node, chunk, false).first().cloned()
}

pub fn get_first_token_string(node: &Node, chunk: &Chunk) -> Option<String> {
    get_first_token(node, chunk).map(|t| t.str().to_string())
}

/// Token of `node` whose span contains `pos`.
pub fn get_token_at_position(pos: usize, node: &Node, chunk: &Chunk) -> Option<Token> {
    let tokens = get_tokens(node, chunk, false);
    let index = tokens
        .binary_search_by(|t| {
            if t.span.end <= pos {
                std::cmp::Ordering::Less
            } else if t.span.start > pos {
                std::cmp::Ordering::Greater
            } else {
                std::cmp::Ordering::Equal
            }
        })
        .ok()?;
    Some(tokens[index].clone())
}

/// Tokens implied by `node` itself (literal text, implicit operators).
fn synthesize_tokens(node: &Node, parent: Option<&Node>, ancestors: &[&Node], add_meta: bool, out: &mut Vec<Token>) {
    let span = node.span();

    match node {
        // The left operand may be parenthesized, so the dot is located from the property name.
        Node::MemberExpression(n) => {
            let name_start = n.property_name.span().start;
            let i = name_start.saturating_sub(if n.optional { 2 } else { 1 });
            out.push(Token::new(TokenType::Dot, NodeSpan::new(i, i + 1)));
            if n.optional {
                out.push(Token::new(TokenType::QuestionMark, NodeSpan::new(i + 1, i + 2)));
            }
        }
        Node::DynamicMemberExpression(n) => {
            let i = n.property_name.span().start.saturating_sub(2);
            out.push(Token::new(TokenType::DotLessThan, NodeSpan::new(i, i + 2)));
        }
        Node::IdentifierMemberExpression(n) => {
            for name in &n.property_names {
                let i = name.span().start.saturating_sub(1);
                out.push(Token::new(TokenType::Dot, NodeSpan::new(i, i + 1)));
            }
        }
        Node::URLExpression(n) => {
            let mut depth = 0usize;
            for (i, c) in n.raw.chars().enumerate() {
                let pos = span.start + i;
                match c {
                    '{' => depth += 1,
                    '}' => depth = depth.saturating_sub(1),
                    '?' if depth == 0 => {
                        out.push(Token::new(TokenType::QueryParamQuestionMark, NodeSpan::new(pos, pos + 1)))
                    }
                    '&' if depth == 0 => out.push(Token::new(TokenType::QueryParamSep, NodeSpan::new(pos, pos + 1))),
                    _ => {}
                }
            }
        }
        Node::URLQueryParameter(n) => {
            let end = span.start + n.name.chars().count() + 1;
            out.push(Token::with_raw(
                TokenType::QueryParamKeyEqual,
                NodeSpan::new(span.start, end),
                format!("{}=", n.name),
            ));
        }
        Node::OptionalPatternExpression(_) | Node::BooleanConversionExpression(_) => {
            out.push(Token::new(
                TokenType::QuestionMark,
                NodeSpan::new(span.end.saturating_sub(1), span.end),
            ));
        }
        Node::OptionExpression(n) => {
            let name_part = format!("{}{}", if n.single_dash { "-" } else { "--" }, n.name);
            push_option_name(span.start, name_part, out);
        }
        Node::OptionPatternLiteral(n) => {
            let dashes = if n.single_dash { "-" } else { "--" };
            let prefix = if n.unprefixed { "" } else { "%" };
            push_option_name(span.start, format!("{prefix}{dashes}{}", n.name), out);
        }
        _ => {}
    }

    let mut meta = TokenMeta::NONE;
    let (token_type, raw) = match node {
        Node::IntLiteral(n) => (TokenType::IntLiteral, n.raw.clone()),
        Node::FloatLiteral(n) => (TokenType::FloatLiteral, n.raw.clone()),
        Node::PortLiteral(n) => (TokenType::PortLiteral, n.raw.clone()),
        Node::NilLiteral(_) => (TokenType::NilLiteral, kw(KeywordId::Nil).to_string()),
        Node::SelfExpression(_) => (TokenType::SelfKeyword, kw(KeywordId::SelfRef).to_string()),
        Node::SupersysExpression(_) => (TokenType::SupersysKeyword, kw(KeywordId::Supersys).to_string()),
        Node::BooleanLiteral(n) => (TokenType::BooleanLiteral, n.value.to_string()),
        Node::DoubleQuotedStringLiteral(n) => (TokenType::QuotedStringLiteral, n.raw.clone()),
        Node::UnquotedStringLiteral(n) => (TokenType::UnquotedStringLiteral, n.raw.clone()),
        Node::MultilineStringLiteral(n) => (TokenType::MultilineStringLiteral, n.raw.clone()),
        Node::RegularExpressionLiteral(n) => (TokenType::RegexLiteral, n.raw.clone()),
        Node::RateLiteral(n) => (TokenType::RateLiteral, n.raw.clone()),
        Node::QuantityLiteral(n) => (TokenType::QuantityLiteral, n.raw.clone()),
        Node::YearLiteral(n) => (TokenType::DateLiteral, n.raw.clone()),
        Node::DateLiteral(n) => (TokenType::DateLiteral, n.raw.clone()),
        Node::DateTimeLiteral(n) => (TokenType::DateLiteral, n.raw.clone()),
        Node::FlagLiteral(n) => (TokenType::FlagLiteral, n.raw.clone()),
        Node::RuneLiteral(n) => (TokenType::RuneLiteral, n.raw.clone()),
        Node::EmailAddressLiteral(n) => (TokenType::EmailAddressLiteral, n.value.clone()),
        Node::SchemeLiteral(n) => (TokenType::SchemeLiteral, format!("{}://", n.name)),
        Node::HostLiteral(n) => (TokenType::HostLiteral, n.value.clone()),
        Node::URLLiteral(n) => (TokenType::UrlLiteral, n.value.clone()),
        Node::URLPatternLiteral(n) => (TokenType::UrlPatternLiteral, n.raw.clone()),
        Node::HostPatternLiteral(n) => (TokenType::HostPatternLiteral, n.raw.clone()),
        Node::PatternIdentifierLiteral(n) if n.unprefixed => {
            (TokenType::UnprefixedPatternIdentifierLiteral, n.name.clone())
        }
        Node::PatternIdentifierLiteral(n) => (TokenType::PatternIdentifierLiteral, format!("%{}", n.name)),
        Node::PatternNamespaceIdentifierLiteral(n) if n.unprefixed => (
            TokenType::UnprefixedPatternNamespaceIdentifierLiteral,
            format!("{}.", n.name),
        ),
        Node::PatternNamespaceIdentifierLiteral(n) => {
            (TokenType::PatternNamespaceIdentifierLiteral, format!("%{}.", n.name))
        }
        Node::IdentifierLiteral(n) => {
            if add_meta {
                meta = identifier_meta(node, parent, ancestors);
            }
            (TokenType::IdentifierLiteral, n.name.clone())
        }
        Node::UnambiguousIdentifierLiteral(n) => (TokenType::UnambiguousIdentifierLiteral, format!("#{}", n.name)),
        Node::MetaIdentifier(n) => (TokenType::MetaIdentifier, format!("@{}", n.name)),
        Node::Variable(n) => (TokenType::LocalVarname, format!("${}", n.name)),
        Node::GlobalVariable(n) => (TokenType::GlobalVarname, format!("$${}", n.name)),
        Node::PropertyNameLiteral(n) => (TokenType::PropNameLiteral, format!(".{}", n.name)),
        Node::AbsolutePathLiteral(n) => (TokenType::AbsolutePathLiteral, n.raw.clone()),
        Node::RelativePathLiteral(n) => (TokenType::RelativePathLiteral, n.raw.clone()),
        Node::AbsolutePathPatternLiteral(n) => (TokenType::AbsolutePathPatternLiteral, n.raw.clone()),
        Node::RelativePathPatternLiteral(n) => (TokenType::RelativePathPatternLiteral, n.raw.clone()),
        Node::PathSlice(n) => (TokenType::PathSlice, n.value.clone()),
        Node::PathPatternSlice(n) => (TokenType::PathPatternSlice, n.value.clone()),
        Node::NamedPathSegment(n) => (TokenType::NamedPathSegment, format!(":{}", n.name)),
        Node::StringTemplateSlice(n) => (TokenType::StrTemplateSlice, n.raw.clone()),
        Node::ByteSliceLiteral(n) => (TokenType::ByteSliceLiteral, n.raw.clone()),
        Node::PatternGroupName(n) => (TokenType::PatternGroupName, n.name.clone()),
        Node::URLQueryParameterValueSlice(n) => (TokenType::QueryParamSlice, n.value.clone()),
        Node::InvalidURL(n) => (TokenType::InvalidUrlLit, n.value.clone()),
        Node::InvalidURLPattern(n) => (TokenType::InvalidUrlLit, n.value.clone()),
        Node::InvalidPathPattern(n) => (TokenType::AbsolutePathPatternLiteral, n.value.clone()),
        Node::MarkupText(n) => (TokenType::MarkupTextSlice, n.raw.clone()),
        Node::AnnotatedRegionHeaderText(n) => (TokenType::AnnotatedRegionHeaderText, n.raw.clone()),
        Node::HyperscriptAttributeShorthand(n) => {
            let closing = if n.is_unterminated { "" } else { "}" };
            (TokenType::HyperscriptCode, format!("{{{}{closing}", n.value))
        }
        Node::CssCombinator(n) if n.name != " " => (TokenType::CssSelectorSlice, n.name.clone()),
        Node::CssTypeSelector(n) => (TokenType::CssSelectorSlice, n.name.clone()),
        Node::CssClassSelector(n) => (TokenType::CssSelectorSlice, format!(".{}", n.name)),
        Node::CssIdSelector(n) => (TokenType::CssSelectorSlice, format!("#{}", n.name)),
        Node::CssPseudoElementSelector(n) => (TokenType::CssSelectorSlice, format!("::{}", n.name)),
        // The arguments have their own tokens.
        Node::CssPseudoClassSelector(n) => {
            let raw = format!(":{}", n.name);
            let end = span.start + raw.chars().count();
            out.push(Token::with_raw(TokenType::CssSelectorSlice, NodeSpan::new(span.start, end), raw));
            return;
        }
        Node::MarkupElement(n) if n.raw_element_type.is_some() => {
            out.push(Token::with_raw(
                TokenType::RawMarkupContent,
                NodeSpan::new(n.raw_element_content_start, n.raw_element_content_end),
                n.raw_element_content.clone(),
            ));
            return;
        }
        _ => return,
    };

    out.push(Token {
        token_type,
        sub_type: TokenSubType::None,
        meta,
        span,
        raw,
    });
}

fn push_option_name(start: usize, name_part: String, out: &mut Vec<Token>) {
    let name_end = start + name_part.chars().count();
    out.push(Token::with_raw(TokenType::OptionName, NodeSpan::new(start, name_end), name_part));
    out.push(Token::new(TokenType::Equal, NodeSpan::new(name_end, name_end + 1)));
}

fn identifier_meta(ident: &Node, parent: Option<&Node>, ancestors: &[&Node]) -> TokenMeta {
    let mut meta = TokenMeta::NONE;
    let grandparent = ancestors.len().checked_sub(2).map(|i| ancestors[i]);
    let is_callee_of_grandparent = |p: &Node| {
        matches!(grandparent, Some(Node::CallExpression(call)) if std::ptr::eq(&*call.callee, p))
    };

    match parent {
        Some(p @ Node::MemberExpression(member)) => {
            if std::ptr::eq(&*member.property_name, ident) {
                meta.insert(TokenMeta::PROP_NAME);
                if is_callee_of_grandparent(p) {
                    meta.insert(TokenMeta::CALLEE);
                }
            }
        }
        Some(p @ Node::IdentifierMemberExpression(member)) => {
            if member.property_names.iter().any(|n| std::ptr::eq(n, ident)) {
                meta.insert(TokenMeta::PROP_NAME);
            }
            if member.property_names.last().is_some_and(|n| std::ptr::eq(n, ident)) && is_callee_of_grandparent(p) {
                meta.insert(TokenMeta::CALLEE);
            }
        }
        Some(Node::CallExpression(call)) if std::ptr::eq(&*call.callee, ident) => meta.insert(TokenMeta::CALLEE),
        Some(Node::FunctionParameter(param)) if param.var.as_deref().is_some_and(|v| std::ptr::eq(v, ident)) => {
            meta.insert(TokenMeta::PARAM_NAME)
        }
        Some(Node::FunctionDeclaration(decl)) if std::ptr::eq(&*decl.name, ident) => {
            meta.insert(TokenMeta::DECL_FN_NAME)
        }
        _ => {}
    }
    meta
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valueless_spellings() {
        assert_eq!(TokenType::IncludableChunkKeyword.lexeme(), Some("includable-chunk"));
        assert_eq!(TokenType::OpeningRecordBracket.lexeme(), Some("#{"));
        assert_eq!(TokenType::Newline.lexeme(), Some("\n"));
        assert!(TokenType::IntLiteral.lexeme().is_none());
        assert_eq!(TokenType::OpeningDictionaryPatternBracket.name(), "OpeningDictionaryPatternBracket");
    }

    #[test]
    fn test_token_str() {
        let comma = Token::new(TokenType::Comma, NodeSpan::new(1, 2));
        assert_eq!(comma.str(), ",");
        let int = Token::with_raw(TokenType::IntLiteral, NodeSpan::new(0, 2), "12");
        assert_eq!(int.str(), "12");
        assert_eq!(int.to_string(), "\"12\"(0-2)");
    }

    #[test]
    fn test_meta_flags() {
        let mut meta = TokenMeta::NONE;
        assert!(meta.is_empty());
        meta.insert(TokenMeta::CALLEE);
        meta.insert(TokenMeta::PROP_NAME);
        assert!(meta.contains(TokenMeta::CALLEE));
        assert!(!meta.contains(TokenMeta::PARAM_NAME));
        assert_eq!(meta.names(), vec!["callee", "prop"]);
    }
}
