//! Abstract Syntax Tree definitions for Inox
//!
//! Every node is a struct embedding a [`NodeBase`] (span, optional local error, parenthesization
//! flag). [`Node`] is the closed union of all of them; it is the type children are stored as.
//!
//! ## Notes
//! - Spans index the decoded code-unit stream (`Vec<char>`), `end` is exclusive.
//! - Nodes are never mutated once the parser has returned. The only interior state is the per-chunk
//!   token cache, see [`TokenCache`].

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use chrono::NaiveDateTime;
use inox_core::lang::lexemes::{self, LexemeId};

use crate::diagnostics::ParsingError;
use crate::tokens::Token;

/// Half-open range `[start, end)` of code units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct NodeSpan {
    pub start: usize,
    pub end: usize,
}

impl NodeSpan {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(self) -> bool {
        self.len() == 0
    }

    /// Whether `pos` is in `[start, end]` (the end position is included).
    pub fn has_position_end_included(self, pos: usize) -> bool {
        pos >= self.start && pos <= self.end
    }

    pub fn contains(self, other: NodeSpan) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

/// Data shared by all nodes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NodeBase {
    pub span: NodeSpan,
    pub error: Option<ParsingError>,
    pub is_parenthesized: bool,
}

impl NodeBase {
    pub fn new(span: NodeSpan) -> Self {
        Self {
            span,
            error: None,
            is_parenthesized: false,
        }
    }

    pub fn with_error(span: NodeSpan, error: ParsingError) -> Self {
        Self {
            span,
            error: Some(error),
            is_parenthesized: false,
        }
    }

    pub fn with_opt_error(span: NodeSpan, error: Option<ParsingError>) -> Self {
        Self {
            span,
            error,
            is_parenthesized: false,
        }
    }
}

/// Whether a node is an expression or a statement, independent of where it appears.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Expr,
    Stmt,
    Unspecified,
}

// ============================================================================
// Operators and small enums
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnaryOperator {
    #[default]
    BoolNegate,
    NumberNegate,
}

impl UnaryOperator {
    pub fn as_str(self) -> &'static str {
        match self {
            UnaryOperator::BoolNegate => lexemes::as_str(LexemeId::ExclamationMark),
            UnaryOperator::NumberNegate => lexemes::as_str(LexemeId::Minus),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BinaryOperator {
    #[default]
    Add,
    AddDot,
    Sub,
    SubDot,
    Mul,
    MulDot,
    Div,
    DivDot,
    LessThan,
    LessThanDot,
    LessOrEqual,
    LessOrEqualDot,
    GreaterThan,
    GreaterThanDot,
    GreaterOrEqual,
    GreaterOrEqualDot,
    Equal,
    NotEqual,
    Is,
    IsNot,
    In,
    NotIn,
    Keyof,
    Urlof,
    Dot,
    Range,
    ExclEndRange,
    And,
    Or,
    Match,
    NotMatch,
    Substrof,
    SetDifference,
    NilCoalescing,
    PairComma,
}

impl BinaryOperator {
    pub fn lexeme(self) -> LexemeId {
        use BinaryOperator::*;
        match self {
            Add => LexemeId::Plus,
            AddDot => LexemeId::PlusDot,
            Sub => LexemeId::Minus,
            SubDot => LexemeId::MinusDot,
            Mul => LexemeId::Asterisk,
            MulDot => LexemeId::AsteriskDot,
            Div => LexemeId::Slash,
            DivDot => LexemeId::SlashDot,
            LessThan => LexemeId::LessThan,
            LessThanDot => LexemeId::LessThanDot,
            LessOrEqual => LexemeId::LessOrEqual,
            LessOrEqualDot => LexemeId::LessOrEqualDot,
            GreaterThan => LexemeId::GreaterThan,
            GreaterThanDot => LexemeId::GreaterThanDot,
            GreaterOrEqual => LexemeId::GreaterOrEqual,
            GreaterOrEqualDot => LexemeId::GreaterOrEqualDot,
            Equal => LexemeId::EqualEqual,
            NotEqual => LexemeId::ExclamationMarkEqual,
            Is => LexemeId::Is,
            IsNot => LexemeId::IsNot,
            In => LexemeId::In,
            NotIn => LexemeId::NotIn,
            Keyof => LexemeId::Keyof,
            Urlof => LexemeId::Urlof,
            Dot => LexemeId::Dot,
            Range => LexemeId::TwoDots,
            ExclEndRange => LexemeId::DotDotLessThan,
            And => LexemeId::And,
            Or => LexemeId::Or,
            Match => LexemeId::Match,
            NotMatch => LexemeId::NotMatch,
            Substrof => LexemeId::Substrof,
            SetDifference => LexemeId::AntiSlash,
            NilCoalescing => LexemeId::DoubleQuestionMark,
            PairComma => LexemeId::Comma,
        }
    }

    pub fn as_str(self) -> &'static str {
        lexemes::as_str(self.lexeme())
    }

    /// Dotted operators (`+.`, `<.` ...) operate on floats.
    pub fn is_dotted(self) -> bool {
        use BinaryOperator::*;
        matches!(
            self,
            AddDot | SubDot | MulDot | DivDot | LessThanDot | LessOrEqualDot | GreaterThanDot | GreaterOrEqualDot
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AssignmentOperator {
    #[default]
    Assign,
    PlusAssign,
    MinusAssign,
    MulAssign,
    DivAssign,
}

impl AssignmentOperator {
    pub fn as_str(self) -> &'static str {
        lexemes::as_str(match self {
            AssignmentOperator::Assign => LexemeId::Equal,
            AssignmentOperator::PlusAssign => LexemeId::PlusEqual,
            AssignmentOperator::MinusAssign => LexemeId::MinusEqual,
            AssignmentOperator::MulAssign => LexemeId::MulEqual,
            AssignmentOperator::DivAssign => LexemeId::DivEqual,
        })
    }

    pub fn is_arithmetic(self) -> bool {
        self != AssignmentOperator::Assign
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PipelineStageKind {
    #[default]
    Normal,
    Parallel,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PipelineStage {
    pub kind: PipelineStageKind,
    pub expr: Node,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OccurrenceModifier {
    #[default]
    ExactlyOne,
    AtLeastOne,
    ZeroOrMore,
    Optional,
    Exact,
}

impl OccurrenceModifier {
    pub fn as_str(self) -> &'static str {
        match self {
            OccurrenceModifier::ExactlyOne | OccurrenceModifier::Exact => "",
            OccurrenceModifier::AtLeastOne => "+",
            OccurrenceModifier::ZeroOrMore => "*",
            OccurrenceModifier::Optional => "?",
        }
    }
}

/// Element whose content is not markup (`<script>`, `<style>`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawElementType {
    JsScript,
    HyperscriptScript,
    CssStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MarkupElementQuantifier {
    #[default]
    One,
    Optional,
    OneOrMore,
    ZeroOrMore,
}

impl MarkupElementQuantifier {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '?' => Some(MarkupElementQuantifier::Optional),
            '+' => Some(MarkupElementQuantifier::OneOrMore),
            '*' => Some(MarkupElementQuantifier::ZeroOrMore),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MarkupPatternWildcardKind {
    #[default]
    Star,
}

/// Opaque result of the injected hyperscript parser.
#[derive(Clone)]
pub struct HyperscriptPayload(pub Arc<dyn Any + Send + Sync>);

impl HyperscriptPayload {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self(Arc::new(value))
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref()
    }
}

impl fmt::Debug for HyperscriptPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("HyperscriptPayload(..)")
    }
}

impl PartialEq for HyperscriptPayload {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// Value of a year/date/datetime literal. The location is kept as written (`UTC`,
/// `Europe/Paris`...), it is not resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct DateValue {
    pub datetime: NaiveDateTime,
    pub location: String,
}

/// Memoized derived tokens, owned by the [`Chunk`] they were derived from.
///
/// Keys are `(node address, node span, with metadata)`. Nodes never move once the chunk is built
/// because every child lives behind a `Box` or in a `Vec`.
#[derive(Default)]
pub struct TokenCache {
    entries: Mutex<HashMap<(usize, NodeSpan, bool), Arc<[Token]>>>,
}

impl TokenCache {
    pub(crate) fn get(&self, key: (usize, NodeSpan, bool)) -> Option<Arc<[Token]>> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.get(&key).cloned()
    }

    pub(crate) fn insert(&self, key: (usize, NodeSpan, bool), tokens: Arc<[Token]>) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(key, tokens);
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for TokenCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TokenCache({} entries)", self.len())
    }
}

/// A fresh clone starts with an empty cache: entries are keyed by node addresses.
impl Clone for TokenCache {
    fn clone(&self) -> Self {
        Self::default()
    }
}

/// Caches never take part in structural equality.
impl PartialEq for TokenCache {
    fn eq(&self, _: &Self) -> bool {
        true
    }
}

// ============================================================================
// Node definitions
// ============================================================================

type Child = Box<Node>;
type OptChild = Option<Box<Node>>;
type Children = Vec<Node>;

macro_rules! define_nodes {
    ($(
        $(#[$meta:meta])*
        $name:ident { $($(#[$fmeta:meta])* $field:ident : $fty:ty),* $(,)? }
    ),* $(,)?) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, PartialEq, Default)]
            pub struct $name {
                pub base: NodeBase,
                $($(#[$fmeta])* pub $field: $fty,)*
            }

            impl From<$name> for Node {
                fn from(node: $name) -> Node {
                    Node::$name(node)
                }
            }
        )*

        /// Any AST node.
        #[derive(Debug, Clone, PartialEq)]
        pub enum Node {
            $($name($name),)*
        }

        impl Node {
            pub fn base(&self) -> &NodeBase {
                match self {
                    $(Node::$name(n) => &n.base,)*
                }
            }

            pub fn base_mut(&mut self) -> &mut NodeBase {
                match self {
                    $(Node::$name(n) => &mut n.base,)*
                }
            }

            /// Name of the variant, used in diagnostics and tree views.
            pub fn type_name(&self) -> &'static str {
                match self {
                    $(Node::$name(_) => stringify!($name),)*
                }
            }
        }
    };
}

define_nodes! {
    // --- recovery nodes ---
    MissingExpression {},
    /// Metadata annotations that are not followed by a statement.
    MissingStatement { annotations: OptChild },
    UnknownNode {},
    InvalidURL { value: String },
    InvalidURLPattern { value: String },
    InvalidPathPattern { value: String },
    InvalidComplexStringPatternElement {},
    InvalidObjectElement {},
    InvalidMemberLike { left: Child, right: OptChild },
    InvalidCssSelectorNode {},

    // --- modules ---
    Chunk {
        global_constant_declarations: OptChild,
        includable_chunk_desc: OptChild,
        preinit: OptChild,
        manifest: OptChild,
        region_headers: Children,
        statements: Children,
        is_shell_chunk: bool,
        /// Valueless tokens of the whole chunk, sorted by start.
        tokens: Vec<Token>,
        token_cache: TokenCache,
    },
    EmbeddedModule {
        manifest: OptChild,
        region_headers: Children,
        statements: Children,
        single_call_expr: bool,
    },
    IncludableChunkDescription {},
    PreinitStatement { block: OptChild },
    Manifest { object: Child },
    Block { region_headers: Children, statements: Children },
    InitializationBlock { statements: Children },

    // --- identifiers & variables ---
    Variable { name: String },
    GlobalVariable { name: String },
    IdentifierLiteral { name: String },
    UnambiguousIdentifierLiteral { name: String },
    MetaIdentifier { name: String },
    PropertyNameLiteral { name: String },
    SelfExpression {},
    SupersysExpression {},

    // --- member-like expressions ---
    MemberExpression { left: Child, property_name: Child, optional: bool },
    ComputedMemberExpression { left: Child, property_name: Child, optional: bool },
    IdentifierMemberExpression { left: Child, property_names: Children },
    DynamicMemberExpression { left: Child, property_name: Child, optional: bool },
    DoubleColonExpression { left: Child, element: Child },
    IndexExpression { indexed: Child, index: Child },
    SliceExpression { indexed: Child, start_index: OptChild, end_index: OptChild },
    KeyListExpression { keys: Children },
    ExtractionExpression { object: Child, keys: Child },
    BooleanConversionExpression { expr: Child },

    // --- simple literals ---
    BooleanLiteral { value: bool },
    NilLiteral {},
    FlagLiteral { single_dash: bool, name: String, raw: String },
    OptionExpression { single_dash: bool, name: String, value: Child },
    IntLiteral { raw: String, value: i64 },
    FloatLiteral { raw: String, value: f64 },
    PortLiteral { raw: String, port_number: u16, scheme_name: String },
    QuantityLiteral { raw: String, values: Vec<f64>, units: Vec<String> },
    RateLiteral { raw: String, values: Vec<f64>, units: Vec<String>, div_unit: String },
    YearLiteral { raw: String, value: Option<DateValue> },
    DateLiteral { raw: String, value: Option<DateValue> },
    DateTimeLiteral { raw: String, value: Option<DateValue> },
    RuneLiteral { raw: String, value: char },
    DoubleQuotedStringLiteral { raw: String, value: String },
    UnquotedStringLiteral { raw: String, value: String },
    MultilineStringLiteral { raw: String, value: String, is_unterminated: bool },
    ByteSliceLiteral { raw: String, value: Vec<u8> },
    RegularExpressionLiteral { raw: String, value: String, unprefixed: bool },
    EmailAddressLiteral { value: String },

    // --- string templates ---
    StringTemplateLiteral { pattern: OptChild, slices: Children },
    StringTemplateSlice { raw: String, value: String },
    StringTemplateInterpolation { interp_type: String, expr: Child },

    // --- paths, hosts & URLs ---
    AbsolutePathLiteral { raw: String, value: String },
    RelativePathLiteral { raw: String, value: String },
    AbsolutePathPatternLiteral { raw: String, value: String, unprefixed: bool },
    RelativePathPatternLiteral { raw: String, value: String, unprefixed: bool },
    NamedSegmentPathPatternLiteral { slices: Children, raw: String, string_value: String },
    AbsolutePathExpression { slices: Children },
    RelativePathExpression { slices: Children },
    PathPatternExpression { slices: Children },
    PathSlice { value: String },
    PathPatternSlice { value: String },
    NamedPathSegment { name: String },
    SchemeLiteral { name: String },
    HostLiteral { value: String },
    HostPatternLiteral { value: String, raw: String, unprefixed: bool },
    URLLiteral { value: String },
    URLPatternLiteral { value: String, raw: String, unprefixed: bool },
    URLExpression { raw: String, host_part: Child, path: Children, query_params: Children },
    HostExpression { scheme: Child, host: Child, raw: String },
    URLQueryParameter { name: String, value: Children },
    URLQueryParameterValueSlice { value: String },

    // --- containers ---
    ObjectLiteral { properties: Children, meta_properties: Children, spread_elements: Children },
    RecordLiteral { properties: Children, spread_elements: Children },
    ObjectProperty { key: OptChild, type_annotation: OptChild, value: Child },
    ObjectMetaProperty { key: Child, initialization: Child },
    PropertySpreadElement { expr: Child },
    ListLiteral { type_annotation: OptChild, elements: Children },
    TupleLiteral { type_annotation: OptChild, elements: Children },
    ElementSpreadElement { expr: Child },
    DictionaryLiteral { entries: Children },
    DictionaryEntry { key: Child, value: Child },

    // --- patterns ---
    PatternIdentifierLiteral { unprefixed: bool, name: String },
    PatternNamespaceIdentifierLiteral { unprefixed: bool, name: String },
    PatternNamespaceMemberExpression { namespace: Child, member_name: Child },
    PatternDefinition { left: Child, right: Child, is_lazy: bool },
    PatternNamespaceDefinition { left: Child, right: Child, is_lazy: bool },
    OptionalPatternExpression { pattern: Child },
    ReadonlyPatternExpression { pattern: Child },
    PatternConversionExpression { value: Child },
    PatternCallExpression { callee: Child, arguments: Children },
    PatternUnion { cases: Children },
    ObjectPatternLiteral { properties: Children, other_properties: Children, spread_elements: Children },
    RecordPatternLiteral { properties: Children, other_properties: Children, spread_elements: Children },
    ObjectPatternProperty {
        key: OptChild,
        type_annotation: OptChild,
        value: Child,
        optional: bool,
        annotations: OptChild,
    },
    PatternPropertySpreadElement { expr: Child },
    OtherPropsExpr { no: bool, pattern: Child },
    ListPatternLiteral { elements: Children, general_element: OptChild },
    TuplePatternLiteral { elements: Children, general_element: OptChild },
    DictionaryPatternLiteral { entries: Children },
    DictionaryPatternEntry { key: Child, value: Child },
    OptionPatternLiteral { single_dash: bool, name: String, value: Child, unprefixed: bool },
    ComplexStringPatternPiece { unprefixed: bool, elements: Children },
    PatternGroupName { name: String },
    PatternPieceElement {
        occurrence: OccurrenceModifier,
        exact_occurrence_count: usize,
        expr: Child,
        group_name: OptChild,
    },
    FunctionPatternExpression { parameters: Children, return_type: OptChild, is_variadic: bool },
    PointerType { value_type: Child },

    // --- declarations ---
    GlobalConstantDeclarations { declarations: Children },
    GlobalConstantDeclaration { left: Child, right: Child },
    LocalVariableDeclarations { declarations: Children },
    LocalVariableDeclarator { left: Child, type_annotation: OptChild, right: OptChild },
    GlobalVariableDeclarations { declarations: Children },
    GlobalVariableDeclarator { left: Child, type_annotation: OptChild, right: OptChild },
    Assignment { left: Child, right: Child, operator: AssignmentOperator },
    MultiAssignment { variables: Children, right: Child, nillable: bool },
    FunctionDeclaration { annotations: OptChild, function: Child, name: Child },
    FunctionExpression {
        capture_list: Children,
        parameters: Children,
        return_type: OptChild,
        is_variadic: bool,
        body: OptChild,
        is_body_expression: bool,
    },
    FunctionParameter { var: OptChild, type_annotation: OptChild, is_variadic: bool },
    StructDefinition { name: OptChild, body: OptChild },
    StructBody { definitions: Children },
    StructFieldDefinition { name: Child, type_annotation: OptChild },
    NewExpression { type_annotation: OptChild, initialization: OptChild },
    StructInitializationLiteral { fields: Children },
    StructFieldInitialization { name: Child, value: OptChild },
    DereferenceExpression { pointer: Child },
    ExtendStatement { extended_pattern: OptChild, extension: OptChild },
    ImportStatement { identifier: Child, source: Child, configuration: OptChild },
    InclusionImportStatement { source: Child },
    PermissionDroppingStatement { object: Child },

    // --- calls & operators ---
    CallExpression { callee: Child, arguments: Children, must: bool, command_like_syntax: bool },
    SpreadArgument { expr: Child },
    UnaryExpression { operator: UnaryOperator, operand: Child },
    BinaryExpression { operator: BinaryOperator, left: Child, right: Child },
    IntegerRangeLiteral { lower_bound: Child, upper_bound: OptChild },
    FloatRangeLiteral { lower_bound: Child, upper_bound: OptChild },
    QuantityRangeLiteral { lower_bound: Child, upper_bound: OptChild },
    UpperBoundRangeExpression { upper_bound: Child },
    RuneRangeExpression { lower: Child, upper: Child },
    ConcatenationExpression { elements: Children },
    RuntimeTypeCheckExpression { expr: Child },
    SendValueExpression { value: Child, receiver: Child },

    // --- control flow ---
    IfStatement { test: Child, consequent: OptChild, alternate: OptChild },
    IfExpression { test: Child, consequent: OptChild, alternate: OptChild },
    ForStatement {
        key_index_ident: OptChild,
        key_pattern: OptChild,
        value_elem_ident: OptChild,
        value_pattern: OptChild,
        iterated_value: OptChild,
        body: OptChild,
        chunked: bool,
    },
    ForExpression {
        key_index_ident: OptChild,
        key_pattern: OptChild,
        value_elem_ident: OptChild,
        value_pattern: OptChild,
        iterated_value: OptChild,
        body: OptChild,
        chunked: bool,
    },
    WalkStatement { walked: OptChild, meta_ident: OptChild, entry_ident: OptChild, body: OptChild },
    WalkExpression { walked: OptChild, meta_ident: OptChild, entry_ident: OptChild, body: OptChild },
    PruneStatement {},
    BreakStatement { label: OptChild },
    ContinueStatement { label: OptChild },
    ReturnStatement { expr: OptChild },
    YieldStatement { expr: OptChild },
    CoyieldStatement { expr: OptChild },
    SynchronizedBlockStatement { synchronized_values: Children, block: OptChild },
    AssertionStatement { expr: Child },
    SwitchStatement { discriminant: Child, cases: Children, default_cases: Children },
    SwitchStatementCase { values: Children, block: OptChild },
    MatchStatement { discriminant: Child, cases: Children, default_cases: Children },
    MatchStatementCase { values: Children, group_matching_variable: OptChild, block: OptChild },
    DefaultCaseWithBlock { block: OptChild },
    SwitchExpression { discriminant: Child, cases: Children, default_cases: Children },
    SwitchExpressionCase { values: Children, result: OptChild },
    MatchExpression { discriminant: Child, cases: Children, default_cases: Children },
    MatchExpressionCase { values: Children, group_matching_variable: OptChild, result: OptChild },
    DefaultCaseWithResult { result: OptChild },
    PipelineStatement { stages: Vec<PipelineStage> },
    PipelineExpression { stages: Vec<PipelineStage> },

    // --- quoting ---
    QuotedExpression { expression: Child },
    QuotedStatements { region_headers: Children, statements: Children },
    UnquotedRegion { spread: bool, expression: Child },

    // --- embedded modules & concurrency ---
    SpawnExpression { meta: OptChild, module: Child },
    TestSuiteExpression { meta: OptChild, module: Child, is_statement: bool },
    TestCaseExpression { meta: OptChild, module: Child, is_statement: bool },
    LifetimejobExpression { meta: Child, subject: OptChild, module: Child },
    ReceptionHandlerExpression { pattern: Child, handler: Child },
    MappingExpression { entries: Children },
    StaticMappingEntry { key: Child, value: Child },
    DynamicMappingEntry {
        key: Child,
        key_var: Child,
        group_matching_variable: OptChild,
        value_computation: Child,
    },
    ComputeExpression { arg: Child },
    TreedataLiteral { root: Child, children: Children },
    TreedataEntry { value: Child, children: Children },
    TreedataPair { key: Child, value: Child },

    // --- CSS selectors ---
    CssSelectorExpression { elements: Children },
    CssCombinator { name: String },
    CssClassSelector { name: String },
    CssPseudoClassSelector { name: String, arguments: Children },
    CssPseudoElementSelector { name: String },
    CssTypeSelector { name: String },
    CssIdSelector { name: String },
    CssAttributeSelector { attribute_name: Child, matcher: String, value: OptChild },

    // --- markup ---
    MarkupExpression { namespace: OptChild, element: Child },
    MarkupElement {
        opening: Child,
        region_headers: Children,
        children: Children,
        closing: OptChild,
        raw_element_type: Option<RawElementType>,
        raw_element_content: String,
        raw_element_content_start: usize,
        raw_element_content_end: usize,
        raw_element_parsing_result: Option<HyperscriptPayload>,
    },
    MarkupOpeningTag { name: Child, attributes: Children, self_closed: bool },
    MarkupClosingTag { name: Child },
    MarkupAttribute { name: Child, value: OptChild },
    HyperscriptAttributeShorthand {
        value: String,
        is_unterminated: bool,
        parsing_result: Option<HyperscriptPayload>,
    },
    MarkupText { raw: String, value: String },
    MarkupInterpolation { expr: OptChild },
    MarkupPatternExpression { element: Child },
    MarkupPatternElement {
        opening: Child,
        region_headers: Children,
        children: Children,
        closing: OptChild,
        raw_element_type: Option<RawElementType>,
    },
    MarkupPatternOpeningTag {
        name: Child,
        attributes: Children,
        self_closed: bool,
        quantifier: MarkupElementQuantifier,
    },
    MarkupPatternClosingTag { name: Child },
    MarkupPatternAttribute { name: Child, type_annotation: OptChild },
    MarkupPatternInterpolation { expr: OptChild },
    MarkupPatternWildcard { wildcard: MarkupPatternWildcardKind },

    // --- metadata ---
    MetadataAnnotations { expressions: Children },
    AnnotatedRegionHeader { text: Child, annotations: OptChild },
    /// Quoted title of a region header, `'Title'`.
    AnnotatedRegionHeaderText { raw: String, value: String },
}

impl Default for Node {
    fn default() -> Self {
        Node::MissingExpression(MissingExpression::default())
    }
}

// ============================================================================
// Children
// ============================================================================

macro_rules! push_child {
    ($out:ident, one, $e:expr) => {
        $out.push(&*$e)
    };
    ($out:ident, opt, $e:expr) => {
        if let Some(child) = &$e {
            $out.push(&**child)
        }
    };
    ($out:ident, many, $e:expr) => {
        $out.extend($e.iter())
    };
    ($out:ident, stages, $e:expr) => {
        $out.extend($e.iter().map(|stage| &stage.expr))
    };
}

macro_rules! push_child_mut {
    ($out:ident, one, $e:expr) => {
        $out.push(&mut *$e)
    };
    ($out:ident, opt, $e:expr) => {
        if let Some(child) = &mut $e {
            $out.push(&mut **child)
        }
    };
    ($out:ident, many, $e:expr) => {
        $out.extend($e.iter_mut())
    };
    ($out:ident, stages, $e:expr) => {
        $out.extend($e.iter_mut().map(|stage| &mut stage.expr))
    };
}

macro_rules! node_children {
    ($($name:ident => [$($mode:ident $field:ident),+ $(,)?]),* $(,)?) => {
        impl Node {
            /// Direct children in visitation order.
            pub fn children(&self) -> Vec<&Node> {
                let mut out: Vec<&Node> = Vec::new();
                match self {
                    $(Node::$name(n) => {
                        $(push_child!(out, $mode, n.$field);)+
                    })*
                    _ => {}
                }
                out
            }

            pub fn children_mut(&mut self) -> Vec<&mut Node> {
                let mut out: Vec<&mut Node> = Vec::new();
                match self {
                    $(Node::$name(n) => {
                        $(push_child_mut!(out, $mode, n.$field);)+
                    })*
                    _ => {}
                }
                out
            }
        }
    };
}

node_children! {
    MissingStatement => [opt annotations],
    InvalidMemberLike => [one left, opt right],
    Chunk => [
        opt global_constant_declarations,
        opt includable_chunk_desc,
        opt preinit,
        opt manifest,
        many region_headers,
        many statements,
    ],
    EmbeddedModule => [opt manifest, many region_headers, many statements],
    PreinitStatement => [opt block],
    Manifest => [one object],
    Block => [many region_headers, many statements],
    InitializationBlock => [many statements],

    MemberExpression => [one left, one property_name],
    ComputedMemberExpression => [one left, one property_name],
    IdentifierMemberExpression => [one left, many property_names],
    DynamicMemberExpression => [one left, one property_name],
    DoubleColonExpression => [one left, one element],
    IndexExpression => [one indexed, one index],
    SliceExpression => [one indexed, opt start_index, opt end_index],
    KeyListExpression => [many keys],
    ExtractionExpression => [one object, one keys],
    BooleanConversionExpression => [one expr],

    OptionExpression => [one value],
    StringTemplateLiteral => [opt pattern, many slices],
    StringTemplateInterpolation => [one expr],

    NamedSegmentPathPatternLiteral => [many slices],
    AbsolutePathExpression => [many slices],
    RelativePathExpression => [many slices],
    PathPatternExpression => [many slices],
    URLExpression => [one host_part, many path, many query_params],
    HostExpression => [one scheme, one host],
    URLQueryParameter => [many value],

    ObjectLiteral => [many properties, many meta_properties, many spread_elements],
    RecordLiteral => [many properties, many spread_elements],
    ObjectProperty => [opt key, opt type_annotation, one value],
    ObjectMetaProperty => [one key, one initialization],
    PropertySpreadElement => [one expr],
    ListLiteral => [opt type_annotation, many elements],
    TupleLiteral => [opt type_annotation, many elements],
    ElementSpreadElement => [one expr],
    DictionaryLiteral => [many entries],
    DictionaryEntry => [one key, one value],

    PatternNamespaceMemberExpression => [one namespace, one member_name],
    PatternDefinition => [one left, one right],
    PatternNamespaceDefinition => [one left, one right],
    OptionalPatternExpression => [one pattern],
    ReadonlyPatternExpression => [one pattern],
    PatternConversionExpression => [one value],
    PatternCallExpression => [one callee, many arguments],
    PatternUnion => [many cases],
    ObjectPatternLiteral => [many properties, many spread_elements, many other_properties],
    RecordPatternLiteral => [many properties, many spread_elements, many other_properties],
    ObjectPatternProperty => [opt key, opt type_annotation, one value, opt annotations],
    PatternPropertySpreadElement => [one expr],
    OtherPropsExpr => [one pattern],
    ListPatternLiteral => [many elements, opt general_element],
    TuplePatternLiteral => [many elements, opt general_element],
    DictionaryPatternLiteral => [many entries],
    DictionaryPatternEntry => [one key, one value],
    OptionPatternLiteral => [one value],
    ComplexStringPatternPiece => [many elements],
    PatternPieceElement => [opt group_name, one expr],
    FunctionPatternExpression => [many parameters, opt return_type],
    PointerType => [one value_type],

    GlobalConstantDeclarations => [many declarations],
    GlobalConstantDeclaration => [one left, one right],
    LocalVariableDeclarations => [many declarations],
    LocalVariableDeclarator => [one left, opt type_annotation, opt right],
    GlobalVariableDeclarations => [many declarations],
    GlobalVariableDeclarator => [one left, opt type_annotation, opt right],
    Assignment => [one left, one right],
    MultiAssignment => [many variables, one right],
    FunctionDeclaration => [opt annotations, one name, one function],
    FunctionExpression => [many capture_list, many parameters, opt return_type, opt body],
    FunctionParameter => [opt var, opt type_annotation],
    StructDefinition => [opt name, opt body],
    StructBody => [many definitions],
    StructFieldDefinition => [one name, opt type_annotation],
    NewExpression => [opt type_annotation, opt initialization],
    StructInitializationLiteral => [many fields],
    StructFieldInitialization => [one name, opt value],
    DereferenceExpression => [one pointer],
    ExtendStatement => [opt extended_pattern, opt extension],
    ImportStatement => [one identifier, one source, opt configuration],
    InclusionImportStatement => [one source],
    PermissionDroppingStatement => [one object],

    CallExpression => [one callee, many arguments],
    SpreadArgument => [one expr],
    UnaryExpression => [one operand],
    BinaryExpression => [one left, one right],
    IntegerRangeLiteral => [one lower_bound, opt upper_bound],
    FloatRangeLiteral => [one lower_bound, opt upper_bound],
    QuantityRangeLiteral => [one lower_bound, opt upper_bound],
    UpperBoundRangeExpression => [one upper_bound],
    RuneRangeExpression => [one lower, one upper],
    ConcatenationExpression => [many elements],
    RuntimeTypeCheckExpression => [one expr],
    SendValueExpression => [one value, one receiver],

    IfStatement => [one test, opt consequent, opt alternate],
    IfExpression => [one test, opt consequent, opt alternate],
    ForStatement => [
        opt key_pattern,
        opt key_index_ident,
        opt value_pattern,
        opt value_elem_ident,
        opt iterated_value,
        opt body,
    ],
    ForExpression => [
        opt key_pattern,
        opt key_index_ident,
        opt value_pattern,
        opt value_elem_ident,
        opt iterated_value,
        opt body,
    ],
    WalkStatement => [opt walked, opt meta_ident, opt entry_ident, opt body],
    WalkExpression => [opt walked, opt meta_ident, opt entry_ident, opt body],
    BreakStatement => [opt label],
    ContinueStatement => [opt label],
    ReturnStatement => [opt expr],
    YieldStatement => [opt expr],
    CoyieldStatement => [opt expr],
    SynchronizedBlockStatement => [many synchronized_values, opt block],
    AssertionStatement => [one expr],
    SwitchStatement => [one discriminant, many cases, many default_cases],
    SwitchStatementCase => [many values, opt block],
    MatchStatement => [one discriminant, many cases, many default_cases],
    MatchStatementCase => [opt group_matching_variable, many values, opt block],
    DefaultCaseWithBlock => [opt block],
    SwitchExpression => [one discriminant, many cases, many default_cases],
    SwitchExpressionCase => [many values, opt result],
    MatchExpression => [one discriminant, many cases, many default_cases],
    MatchExpressionCase => [opt group_matching_variable, many values, opt result],
    DefaultCaseWithResult => [opt result],
    PipelineStatement => [stages stages],
    PipelineExpression => [stages stages],

    QuotedExpression => [one expression],
    QuotedStatements => [many region_headers, many statements],
    UnquotedRegion => [one expression],

    SpawnExpression => [opt meta, one module],
    TestSuiteExpression => [opt meta, one module],
    TestCaseExpression => [opt meta, one module],
    LifetimejobExpression => [one meta, opt subject, one module],
    ReceptionHandlerExpression => [one pattern, one handler],
    MappingExpression => [many entries],
    StaticMappingEntry => [one key, one value],
    DynamicMappingEntry => [one key, one key_var, opt group_matching_variable, one value_computation],
    ComputeExpression => [one arg],
    TreedataLiteral => [one root, many children],
    TreedataEntry => [one value, many children],
    TreedataPair => [one key, one value],

    CssSelectorExpression => [many elements],
    CssPseudoClassSelector => [many arguments],
    CssAttributeSelector => [one attribute_name, opt value],

    MarkupExpression => [opt namespace, one element],
    MarkupElement => [one opening, many region_headers, many children, opt closing],
    MarkupOpeningTag => [one name, many attributes],
    MarkupClosingTag => [one name],
    MarkupAttribute => [one name, opt value],
    MarkupInterpolation => [opt expr],
    MarkupPatternExpression => [one element],
    MarkupPatternElement => [one opening, many region_headers, many children, opt closing],
    MarkupPatternOpeningTag => [one name, many attributes],
    MarkupPatternClosingTag => [one name],
    MarkupPatternAttribute => [one name, opt type_annotation],
    MarkupPatternInterpolation => [opt expr],

    MetadataAnnotations => [many expressions],
    AnnotatedRegionHeader => [one text, opt annotations],
}

// ============================================================================
// Classification
// ============================================================================

impl Node {
    pub fn span(&self) -> NodeSpan {
        self.base().span
    }

    pub fn error(&self) -> Option<&ParsingError> {
        self.base().error.as_ref()
    }

    pub fn is_missing_expr(&self) -> bool {
        matches!(self, Node::MissingExpression(_))
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::GlobalConstantDeclarations(_)
            | Node::GlobalConstantDeclaration(_)
            | Node::LocalVariableDeclarations(_)
            | Node::LocalVariableDeclarator(_)
            | Node::GlobalVariableDeclarations(_)
            | Node::GlobalVariableDeclarator(_)
            | Node::Assignment(_)
            | Node::MultiAssignment(_)
            | Node::IfStatement(_)
            | Node::ForStatement(_)
            | Node::WalkStatement(_)
            | Node::PruneStatement(_)
            | Node::SynchronizedBlockStatement(_)
            | Node::ReturnStatement(_)
            | Node::YieldStatement(_)
            | Node::CoyieldStatement(_)
            | Node::BreakStatement(_)
            | Node::ContinueStatement(_)
            | Node::SwitchStatement(_)
            | Node::MatchStatement(_)
            | Node::FunctionDeclaration(_)
            | Node::PermissionDroppingStatement(_)
            | Node::ImportStatement(_)
            | Node::InclusionImportStatement(_)
            | Node::PipelineStatement(_)
            | Node::PatternDefinition(_)
            | Node::PatternNamespaceDefinition(_)
            | Node::AssertionStatement(_)
            | Node::ExtendStatement(_)
            | Node::StructDefinition(_)
            | Node::PreinitStatement(_)
            | Node::MissingStatement(_) => NodeKind::Stmt,
            Node::TestSuiteExpression(n) if n.is_statement => NodeKind::Stmt,
            Node::TestCaseExpression(n) if n.is_statement => NodeKind::Stmt,
            Node::UnknownNode(_) | Node::Chunk(_) | Node::EmbeddedModule(_) => NodeKind::Unspecified,
            _ => NodeKind::Expr,
        }
    }

    /// Nodes whose children form a new lexical scope.
    pub fn is_scope_container(&self) -> bool {
        matches!(
            self,
            Node::Chunk(_)
                | Node::EmbeddedModule(_)
                | Node::FunctionExpression(_)
                | Node::FunctionPatternExpression(_)
                | Node::QuotedExpression(_)
                | Node::InitializationBlock(_)
                | Node::MappingExpression(_)
                | Node::StaticMappingEntry(_)
                | Node::DynamicMappingEntry(_)
                | Node::TestSuiteExpression(_)
                | Node::TestCaseExpression(_)
                | Node::ExtendStatement(_)
                | Node::MetadataAnnotations(_)
                | Node::StructDefinition(_)
                | Node::LifetimejobExpression(_)
        )
    }

    pub fn is_the_top_level(&self) -> bool {
        matches!(self, Node::Chunk(_) | Node::EmbeddedModule(_))
    }

    pub fn is_pattern(&self) -> bool {
        matches!(
            self,
            Node::PatternCallExpression(_)
                | Node::ListPatternLiteral(_)
                | Node::TuplePatternLiteral(_)
                | Node::ObjectPatternLiteral(_)
                | Node::RecordPatternLiteral(_)
                | Node::DictionaryPatternLiteral(_)
                | Node::PatternIdentifierLiteral(_)
                | Node::PatternNamespaceMemberExpression(_)
                | Node::ComplexStringPatternPiece(_)
                | Node::PatternConversionExpression(_)
                | Node::PatternUnion(_)
                | Node::PathPatternExpression(_)
                | Node::AbsolutePathPatternLiteral(_)
                | Node::RelativePathPatternLiteral(_)
                | Node::URLPatternLiteral(_)
                | Node::HostPatternLiteral(_)
                | Node::OptionalPatternExpression(_)
                | Node::OptionPatternLiteral(_)
                | Node::FunctionPatternExpression(_)
                | Node::NamedSegmentPathPatternLiteral(_)
                | Node::ReadonlyPatternExpression(_)
                | Node::RegularExpressionLiteral(_)
                | Node::MarkupPatternExpression(_)
                | Node::PointerType(_)
        )
    }

    pub fn is_string_literal(&self) -> bool {
        matches!(
            self,
            Node::DoubleQuotedStringLiteral(_)
                | Node::UnquotedStringLiteral(_)
                | Node::StringTemplateLiteral(_)
                | Node::MultilineStringLiteral(_)
        )
    }

    /// Literal whose value is fully described by a string, see [`Node::value_string`].
    pub fn is_simple_value_literal(&self) -> bool {
        self.value_string().is_some()
    }

    /// Textual value of simple value literals.
    pub fn value_string(&self) -> Option<String> {
        let s = match self {
            Node::BooleanLiteral(n) => n.value.to_string(),
            Node::NilLiteral(_) => "nil".to_string(),
            Node::FlagLiteral(n) => n.raw.clone(),
            Node::IntLiteral(n) => n.raw.clone(),
            Node::FloatLiteral(n) => n.raw.clone(),
            Node::PortLiteral(n) => n.raw.clone(),
            Node::QuantityLiteral(n) => n.raw.clone(),
            Node::RateLiteral(n) => n.raw.clone(),
            Node::YearLiteral(n) => n.raw.clone(),
            Node::DateLiteral(n) => n.raw.clone(),
            Node::DateTimeLiteral(n) => n.raw.clone(),
            Node::RuneLiteral(n) => n.value.to_string(),
            Node::DoubleQuotedStringLiteral(n) => n.value.clone(),
            Node::UnquotedStringLiteral(n) => n.value.clone(),
            Node::MultilineStringLiteral(n) => n.value.clone(),
            Node::ByteSliceLiteral(n) => n.raw.clone(),
            Node::RegularExpressionLiteral(n) => n.value.clone(),
            Node::EmailAddressLiteral(n) => n.value.clone(),
            Node::URLLiteral(n) => n.value.clone(),
            Node::SchemeLiteral(n) => n.name.clone(),
            Node::HostLiteral(n) => n.value.clone(),
            Node::HostPatternLiteral(n) => n.value.clone(),
            Node::URLPatternLiteral(n) => n.value.clone(),
            Node::AbsolutePathLiteral(n) => n.value.clone(),
            Node::RelativePathLiteral(n) => n.value.clone(),
            Node::AbsolutePathPatternLiteral(n) => n.value.clone(),
            Node::RelativePathPatternLiteral(n) => n.value.clone(),
            Node::NamedSegmentPathPatternLiteral(n) => n.string_value.clone(),
            Node::URLQueryParameterValueSlice(n) => n.value.clone(),
            Node::PathSlice(n) => n.value.clone(),
            Node::PathPatternSlice(n) => n.value.clone(),
            Node::IdentifierLiteral(n) => n.name.clone(),
            Node::UnambiguousIdentifierLiteral(n) => n.name.clone(),
            Node::PropertyNameLiteral(n) => n.name.clone(),
            _ => return None,
        };
        Some(s)
    }

    /// Name of an identifier-like node (`a`, `#a`, `.a`, `$a`, `$$a`, `@a`).
    pub fn identifier_name(&self) -> Option<&str> {
        match self {
            Node::IdentifierLiteral(n) => Some(&n.name),
            Node::UnambiguousIdentifierLiteral(n) => Some(&n.name),
            Node::PropertyNameLiteral(n) => Some(&n.name),
            Node::Variable(n) => Some(&n.name),
            Node::GlobalVariable(n) => Some(&n.name),
            Node::MetaIdentifier(n) => Some(&n.name),
            _ => None,
        }
    }

    pub fn is_ident_with_name(&self, name: &str) -> bool {
        matches!(self, Node::IdentifierLiteral(n) if n.name == name)
    }

    /// Whether this node is `a.b.c` with the given names.
    pub fn is_ident_member_expr_with_names(&self, name: &str, prop_names: &[&str]) -> bool {
        let Node::IdentifierMemberExpression(expr) = self else {
            return false;
        };
        expr.left.is_ident_with_name(name)
            && expr.property_names.len() == prop_names.len()
            && expr
                .property_names
                .iter()
                .zip(prop_names)
                .all(|(n, expected)| n.identifier_name() == Some(*expected))
    }

    /// Identity of a node inside its chunk.
    pub(crate) fn addr(&self) -> usize {
        self as *const Node as usize
    }
}

pub fn is_any_variable_identifier(node: &Node) -> bool {
    matches!(node, Node::Variable(_) | Node::IdentifierLiteral(_))
}

/// Name of a `$var` or identifier, `None` for any other node.
pub fn get_variable_name(node: &Node) -> Option<&str> {
    match node {
        Node::Variable(n) => Some(&n.name),
        Node::IdentifierLiteral(n) => Some(&n.name),
        _ => None,
    }
}

impl ObjectProperty {
    pub fn has_no_key(&self) -> bool {
        self.key.is_none()
    }

    /// Key as a string: identifier name or string value.
    pub fn name(&self) -> Option<String> {
        match self.key.as_deref()? {
            Node::IdentifierLiteral(n) => Some(n.name.clone()),
            Node::DoubleQuotedStringLiteral(n) => Some(n.value.clone()),
            Node::UnquotedStringLiteral(n) => Some(n.value.clone()),
            _ => None,
        }
    }
}

impl ObjectPatternProperty {
    pub fn name(&self) -> Option<String> {
        match self.key.as_deref()? {
            Node::IdentifierLiteral(n) => Some(n.name.clone()),
            Node::DoubleQuotedStringLiteral(n) => Some(n.value.clone()),
            _ => None,
        }
    }
}

impl EmbeddedModule {
    /// Valueless tokens of `chunk` covered by this module.
    pub fn tokens<'c>(&self, chunk: &'c Chunk) -> &'c [Token] {
        let span = self.base.span;
        let start = chunk.tokens.partition_point(|t| t.span.start < span.start);
        let end = chunk.tokens.partition_point(|t| t.span.start < span.end);
        &chunk.tokens[start..end.max(start)]
    }
}

/// A parsed module: a [`Node::Chunk`] that can be walked as a node and read as a [`Chunk`].
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkRoot(Node);

impl ChunkRoot {
    pub fn new(chunk: Chunk) -> Self {
        Self(Node::Chunk(chunk))
    }

    /// The chunk as a node, the starting point of walks.
    pub fn node(&self) -> &Node {
        &self.0
    }

    pub fn chunk(&self) -> &Chunk {
        match &self.0 {
            Node::Chunk(chunk) => chunk,
            _ => unreachable!("a chunk root always wraps a chunk"),
        }
    }

    pub fn into_chunk(self) -> Chunk {
        match self.0 {
            Node::Chunk(chunk) => chunk,
            _ => unreachable!("a chunk root always wraps a chunk"),
        }
    }
}

impl From<Chunk> for ChunkRoot {
    fn from(chunk: Chunk) -> Self {
        Self::new(chunk)
    }
}

/// Shift the span of `node` and all its descendants by `offset`.
pub fn shift_node_spans(node: &mut Node, offset: usize) {
    let base = node.base_mut();
    base.span.start += offset;
    base.span.end += offset;
    match node {
        Node::MarkupElement(elem) if elem.raw_element_type.is_some() => {
            elem.raw_element_content_start += offset;
            elem.raw_element_content_end += offset;
        }
        _ => {}
    }
    for child in node.children_mut() {
        shift_node_spans(child, offset);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(start: usize, end: usize, value: i64) -> Node {
        IntLiteral {
            base: NodeBase::new(NodeSpan::new(start, end)),
            raw: value.to_string(),
            value,
        }
        .into()
    }

    #[test]
    fn test_children_order() {
        let node: Node = BinaryExpression {
            base: NodeBase::new(NodeSpan::new(0, 7)),
            operator: BinaryOperator::Add,
            left: Box::new(int(1, 2, 1)),
            right: Box::new(int(5, 6, 2)),
        }
        .into();
        let children = node.children();
        assert_eq!(children.len(), 2);
        assert_eq!(children[0].span(), NodeSpan::new(1, 2));
        assert_eq!(children[1].span(), NodeSpan::new(5, 6));
    }

    #[test]
    fn test_kind() {
        assert_eq!(int(0, 1, 1).kind(), NodeKind::Expr);
        let ret: Node = ReturnStatement::default().into();
        assert_eq!(ret.kind(), NodeKind::Stmt);
        let suite: Node = TestSuiteExpression {
            is_statement: true,
            ..Default::default()
        }
        .into();
        assert_eq!(suite.kind(), NodeKind::Stmt);
        assert_eq!(Node::default().type_name(), "MissingExpression");
    }

    #[test]
    fn test_shift_node_spans() {
        let mut node: Node = ListLiteral {
            base: NodeBase::new(NodeSpan::new(0, 5)),
            type_annotation: None,
            elements: vec![int(1, 2, 1), int(3, 4, 2)],
        }
        .into();
        shift_node_spans(&mut node, 10);
        assert_eq!(node.span(), NodeSpan::new(10, 15));
        assert_eq!(node.children()[1].span(), NodeSpan::new(13, 14));
    }

    #[test]
    fn test_binary_operator_spelling() {
        assert_eq!(BinaryOperator::ExclEndRange.as_str(), "..<");
        assert_eq!(BinaryOperator::NilCoalescing.as_str(), "??");
        assert_eq!(BinaryOperator::NotMatch.as_str(), "not-match");
        assert!(BinaryOperator::LessThanDot.is_dotted());
    }

    #[test]
    fn test_token_cache_is_not_cloned() {
        let cache = TokenCache::default();
        cache.insert((1, NodeSpan::new(0, 1), false), Arc::from(Vec::new()));
        assert_eq!(cache.len(), 1);
        assert!(cache.clone().is_empty());
    }
}
