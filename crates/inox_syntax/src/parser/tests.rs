#[cfg(test)]
mod tests {
    use super::*;
    use crate::walk::{find_first_node, find_nodes};

    fn statements(root: &ChunkRoot) -> &[Node] {
        &root.chunk().statements
    }

    fn parse_with_errors(source: &str) -> (ChunkRoot, ParsingErrorAggregation) {
        let error = parse_chunk(source, "test.ix", &ParserOptions::default())
            .expect_err("the source should have syntax errors");
        let aggregation = error.error.as_syntax().cloned().expect("syntax errors");
        (error.chunk.expect("chunk"), aggregation)
    }

    #[test]
    fn test_single_int_literal() {
        let root = must_parse_chunk("1");
        let [Node::IntLiteral(int)] = statements(&root) else {
            panic!("expected a single int literal, got {:?}", statements(&root));
        };
        assert_eq!(int.value, 1);
        assert_eq!(int.raw, "1");
        assert_eq!(int.base.span, NodeSpan::new(0, 1));
        assert_eq!(root.chunk().base.span, NodeSpan::new(0, 1));
    }

    #[test]
    fn test_unexpected_char_after_manifest() {
        let (root, aggregation) = parse_with_errors("manifest {}; ?");

        let Some(Node::Manifest(manifest)) = root.chunk().manifest.as_deref() else {
            panic!("expected a manifest");
        };
        assert!(matches!(&*manifest.object, Node::ObjectLiteral(obj) if obj.properties.is_empty()));

        let [Node::UnknownNode(unknown)] = statements(&root) else {
            panic!("expected a single unknown node");
        };
        assert_eq!(unknown.base.span, NodeSpan::new(13, 14));
        assert_eq!(
            unknown.base.error.as_ref().map(|e| e.kind),
            Some(ParsingErrorKind::Unspecified)
        );

        assert_eq!(aggregation.errors.len(), 1);
        let position = &aggregation.positions[0];
        assert_eq!((position.start_line, position.start_column), (1, 14));
        assert_eq!(
            aggregation.message,
            format!("\ntest.ix:1:14: {}", fmt_unexpected_char_in_block_or_module('?'))
        );
    }

    #[test]
    fn test_function_parameter_type() {
        let root = must_parse_chunk("fn f(arg %int){}");
        let [Node::FunctionDeclaration(decl)] = statements(&root) else {
            panic!("expected a function declaration");
        };
        assert!(decl.name.is_ident_with_name("f"));

        let Node::FunctionExpression(function) = &*decl.function else {
            panic!("expected a function expression");
        };
        let [Node::FunctionParameter(param)] = function.parameters.as_slice() else {
            panic!("expected a single parameter");
        };
        assert!(param.var.as_deref().is_some_and(|var| var.is_ident_with_name("arg")));

        let Some(Node::PatternIdentifierLiteral(pattern)) = param.type_annotation.as_deref() else {
            panic!("expected a pattern identifier");
        };
        assert_eq!(pattern.name, "int");
        assert!(pattern.base.span.start <= 10 && 11 <= pattern.base.span.end);
        assert!(function.body.is_some());
    }

    #[test]
    fn test_markup_expression() {
        let root = must_parse_chunk("html<div></div>");
        let [Node::MarkupExpression(expr)] = statements(&root) else {
            panic!("expected a markup expression");
        };
        assert!(expr.namespace.as_deref().is_some_and(|ns| ns.is_ident_with_name("html")));

        let Node::MarkupElement(element) = &*expr.element else {
            panic!("expected a markup element");
        };
        let Node::MarkupOpeningTag(opening) = &*element.opening else {
            panic!("expected an opening tag");
        };
        assert_eq!(opening.base.span, NodeSpan::new(4, 9));
        assert_eq!(opening.name.span(), NodeSpan::new(5, 8));
        assert!(opening.name.is_ident_with_name("div"));
        assert!(element.closing.is_some());
        assert_eq!(expr.base.span, NodeSpan::new(0, 15));
    }

    #[test]
    fn test_markup_children_and_interpolation() {
        let root = must_parse_chunk("html<ul><li>a &lt; b</li><li>{1}</li></ul>");
        let items = find_nodes(root.node(), |n| {
            matches!(n, Node::MarkupOpeningTag(tag) if tag.name.is_ident_with_name("li"))
        });
        assert_eq!(items.len(), 2);

        let text = find_first_node(root.node(), |n| matches!(n, Node::MarkupText(t) if !t.raw.is_empty()));
        let Some(Node::MarkupText(text)) = text else {
            panic!("expected a markup text");
        };
        assert_eq!(text.raw, "a &lt; b");
        assert_eq!(text.value, "a < b");

        let interpolation = find_first_node(root.node(), |n| matches!(n, Node::MarkupInterpolation(_)));
        let Some(Node::MarkupInterpolation(interpolation)) = interpolation else {
            panic!("expected an interpolation");
        };
        assert!(matches!(interpolation.expr.as_deref(), Some(Node::IntLiteral(int)) if int.value == 1));
    }

    #[test]
    fn test_markup_mismatched_closing_tag() {
        let (_, aggregation) = parse_with_errors("html<div></span>");
        assert!(
            aggregation.errors.iter().any(|e| e.message == fmt_expected_closing_tag("div")),
            "{aggregation:?}"
        );
    }

    #[test]
    fn test_markup_raw_script_content() {
        let root = must_parse_chunk("html<script>if (a < b) {}</script>");
        let element = find_first_node(root.node(), |n| matches!(n, Node::MarkupElement(_)));
        let Some(Node::MarkupElement(element)) = element else {
            panic!("expected a markup element");
        };
        assert_eq!(element.raw_element_type, Some(RawElementType::JsScript));
        assert_eq!(element.raw_element_content, "if (a < b) {}");
        assert!(element.children.is_empty());
    }

    #[test]
    fn test_markup_pattern_wildcard() {
        let root = must_parse_chunk("pattern p = %<div>*</div>");
        assert!(find_first_node(root.node(), |n| matches!(n, Node::MarkupPatternExpression(_))).is_some());
        assert!(find_first_node(root.node(), |n| matches!(n, Node::MarkupPatternWildcard(_))).is_some());
    }

    struct EchoHyperscript;

    impl HyperscriptParser for EchoHyperscript {
        fn parse(&self, source: &str) -> Result<HyperscriptPayload, HyperscriptError> {
            if source.contains("oops") {
                return Err(HyperscriptError::Syntax("unexpected oops".to_string()));
            }
            Ok(HyperscriptPayload::new(source.trim().to_string()))
        }
    }

    fn hyperscript_options() -> ParserOptions {
        ParserOptions {
            parse_hyperscript: Some(Arc::new(EchoHyperscript)),
            ..Default::default()
        }
    }

    #[test]
    fn test_hyperscript_attribute_shorthand() {
        let root = parse_chunk("html<button {on click toggle}></button>", "test.ix", &hyperscript_options())
            .expect("no syntax error");
        let shorthand = find_first_node(root.node(), |n| matches!(n, Node::HyperscriptAttributeShorthand(_)));
        let Some(Node::HyperscriptAttributeShorthand(shorthand)) = shorthand else {
            panic!("expected a hyperscript shorthand");
        };
        assert_eq!(shorthand.value, "on click toggle");
        assert!(!shorthand.is_unterminated);
        let payload = shorthand.parsing_result.as_ref().expect("payload");
        assert_eq!(payload.downcast_ref::<String>().map(String::as_str), Some("on click toggle"));
    }

    #[test]
    fn test_hyperscript_errors_are_attached_to_nodes() {
        let error = parse_chunk("html<div {oops}></div>", "test.ix", &hyperscript_options()).unwrap_err();
        let aggregation = error.error.as_syntax().expect("syntax error");
        assert_eq!(aggregation.errors[0].message, "unexpected oops");

        let root = parse_chunk("html<script h>on load log 1</script>", "test.ix", &hyperscript_options())
            .expect("no syntax error");
        let element = find_first_node(root.node(), |n| matches!(n, Node::MarkupElement(_)));
        let Some(Node::MarkupElement(element)) = element else {
            panic!("expected a markup element");
        };
        assert_eq!(element.raw_element_type, Some(RawElementType::HyperscriptScript));
        assert!(element.raw_element_parsing_result.is_some());
    }

    #[test]
    fn test_css_selector() {
        let root = must_parse_chunk("s!div.item > a");
        let [Node::CssSelectorExpression(selector)] = statements(&root) else {
            panic!("expected a css selector");
        };
        let names: Vec<&str> = selector.elements.iter().map(Node::type_name).collect();
        assert_eq!(
            names,
            vec!["CssTypeSelector", "CssClassSelector", "CssCombinator", "CssTypeSelector"]
        );
        assert!(matches!(&selector.elements[2], Node::CssCombinator(c) if c.name == ">"));
    }

    #[test]
    fn test_css_descendant_combinator_and_attribute() {
        let root = must_parse_chunk(r#"s!ul li[href^="https"]"#);
        let [Node::CssSelectorExpression(selector)] = statements(&root) else {
            panic!("expected a css selector");
        };
        assert!(matches!(&selector.elements[1], Node::CssCombinator(c) if c.name == " "));
        let Node::CssAttributeSelector(attribute) = &selector.elements[3] else {
            panic!("expected an attribute selector, got {:?}", selector.elements);
        };
        assert_eq!(attribute.matcher, "^=");
        assert!(attribute.attribute_name.is_ident_with_name("href"));
        assert!(matches!(attribute.value.as_deref(), Some(Node::DoubleQuotedStringLiteral(s)) if s.value == "https"));
    }

    #[test]
    fn test_url_expression_query_parameters() {
        let root = must_parse_chunk("https://example.com/?x={1}&y=2");
        let [Node::URLExpression(url)] = statements(&root) else {
            panic!("expected an URL expression, got {:?}", statements(&root));
        };
        let [Node::URLQueryParameter(x), Node::URLQueryParameter(y)] = url.query_params.as_slice() else {
            panic!("expected two query parameters");
        };
        assert_eq!(x.name, "x");
        assert!(matches!(x.value.as_slice(), [Node::IntLiteral(int)] if int.value == 1));
        assert_eq!(y.name, "y");
        assert!(matches!(y.value.as_slice(), [Node::URLQueryParameterValueSlice(s)] if s.value == "2"));
    }

    #[test]
    fn test_import_statement_walk_order() {
        let root = must_parse_chunk("import lib /lib.ix {}");
        let [Node::ImportStatement(import)] = statements(&root) else {
            panic!("expected an import statement");
        };
        assert!(import.identifier.is_ident_with_name("lib"));
        assert!(matches!(&*import.source, Node::AbsolutePathLiteral(p) if p.value == "/lib.ix"));

        let mut visited = Vec::new();
        walk(root.node(), |v| {
            visited.push(v.node.type_name());
            TraversalAction::Continue
        });
        assert_eq!(
            visited,
            vec![
                "Chunk",
                "ImportStatement",
                "IdentifierLiteral",
                "AbsolutePathLiteral",
                "ObjectLiteral"
            ]
        );
    }

    #[test]
    fn test_if_else_statement() {
        let root = must_parse_chunk("if true {\n  1\n} else {\n  2\n}");
        let [Node::IfStatement(stmt)] = statements(&root) else {
            panic!("expected an if statement");
        };
        assert!(matches!(&*stmt.test, Node::BooleanLiteral(b) if b.value));
        assert!(stmt.consequent.is_some());
        assert!(matches!(stmt.alternate.as_deref(), Some(Node::Block(_))));
    }

    #[test]
    fn test_unterminated_block_keeps_partial_tree() {
        let (root, aggregation) = parse_with_errors("if true {\n  1\n");
        assert!(matches!(statements(&root), [Node::IfStatement(_)]));
        assert!(aggregation.errors.iter().any(|e| e.message == UNTERMINATED_BLOCK_MISSING_BRACE));
    }

    #[test]
    fn test_command_like_call() {
        let root = must_parse_chunk("print 1 2");
        let [Node::CallExpression(call)] = statements(&root) else {
            panic!("expected a call");
        };
        assert!(call.command_like_syntax);
        assert!(call.callee.is_ident_with_name("print"));
        assert_eq!(call.arguments.len(), 2);
    }

    #[test]
    fn test_global_constant_declarations() {
        let root = must_parse_chunk("const (\n  a = 1\n  b = 2\n)\nprint a");
        let Some(Node::GlobalConstantDeclarations(decls)) = root.chunk().global_constant_declarations.as_deref()
        else {
            panic!("expected global constant declarations");
        };
        assert_eq!(decls.declarations.len(), 2);
        assert_eq!(statements(&root).len(), 1);
    }

    #[test]
    fn test_grouped_local_variable_declarations() {
        for source in ["var (a = 1; b = 2)", "var (a = 1, b = 2)", "var (\n  a = 1\n  b = 2\n)"] {
            let root = must_parse_chunk(source);
            let [Node::LocalVariableDeclarations(decls)] = statements(&root) else {
                panic!("expected local variable declarations for {source:?}");
            };
            assert_eq!(decls.declarations.len(), 2, "{source:?}");
            assert_eq!(decls.base.span, NodeSpan::new(0, source.chars().count()));
        }
    }

    #[test]
    fn test_grouped_global_variable_declarations() {
        let root = must_parse_chunk("globalvar (a = 1; b = 2)");
        let [Node::GlobalVariableDeclarations(decls)] = statements(&root) else {
            panic!("expected global variable declarations");
        };
        assert_eq!(decls.declarations.len(), 2);
    }

    #[test]
    fn test_grouped_variable_declaration_missing_value() {
        let (root, aggregation) = parse_with_errors("var (a; b = 1)");
        let [Node::LocalVariableDeclarations(decls)] = statements(&root) else {
            panic!("expected local variable declarations");
        };
        assert_eq!(decls.declarations.len(), 2);
        assert_eq!(aggregation.errors.len(), 1);
        assert_eq!(aggregation.errors[0].kind, ParsingErrorKind::MissingEqualsSignInDeclaration);
    }

    #[test]
    fn test_grouped_variable_declarations_always_progress() {
        for source in ["var (a = 1; ?)", "globalvar (?, ?)", "var (a = 1;;; ?)"] {
            let error = parse_chunk(source, "test.ix", &ParserOptions::default()).unwrap_err();
            let root = error.chunk.expect("partial chunk");
            assert_eq!(statements(&root).len(), 1, "{source:?}");
        }
    }

    #[test]
    fn test_quoted_statements_and_unquoted_region() {
        let root = must_parse_chunk("@{ a = <{b}> }");
        let [Node::QuotedStatements(quoted)] = statements(&root) else {
            panic!("expected quoted statements");
        };
        assert_eq!(quoted.statements.len(), 1);
        assert!(find_first_node(root.node(), |n| matches!(n, Node::UnquotedRegion(r) if !r.spread)).is_some());
    }

    #[test]
    fn test_unquoted_region_outside_quoted_region() {
        let (_, aggregation) = parse_with_errors("a = <{b}>");
        assert_eq!(aggregation.errors.len(), 1);
        assert_eq!(
            aggregation.errors[0].message,
            UNQUOTED_REGIONS_ONLY_ALLOWED_INSIDE_QUOTED_REGIONS
        );
    }

    #[test]
    fn test_nested_quoted_regions() {
        let (_, aggregation) = parse_with_errors("@(@(1))");
        assert_eq!(aggregation.errors[0].message, NESTED_QUOTED_REGIONS_NOT_ALLOWED);
    }

    #[test]
    fn test_metadata_annotations_on_function() {
        let root = must_parse_chunk("@test @tag(1)\nfn f(){}");
        let [Node::FunctionDeclaration(decl)] = statements(&root) else {
            panic!("expected a function declaration, got {:?}", statements(&root));
        };
        let Some(Node::MetadataAnnotations(annotations)) = decl.annotations.as_deref() else {
            panic!("expected annotations");
        };
        assert_eq!(annotations.expressions.len(), 2);
        assert!(matches!(&annotations.expressions[0], Node::MetaIdentifier(m) if m.name == "test"));
        assert!(matches!(&annotations.expressions[1], Node::CallExpression(_)));
        assert_eq!(decl.base.span.start, 0);
    }

    #[test]
    fn test_trailing_metadata_annotations() {
        let (root, aggregation) = parse_with_errors("1\n@test");
        assert!(matches!(statements(&root), [Node::IntLiteral(_), Node::MissingStatement(_)]));
        assert_eq!(aggregation.errors[0].message, METADATA_ANNOTATIONS_SHOULD_BE_FOLLOWED_BY_STMT);
    }

    #[test]
    fn test_annotated_region_header() {
        let root = must_parse_chunk("@'Intro' @section\n1");
        let [Node::AnnotatedRegionHeader(header)] = root.chunk().region_headers.as_slice() else {
            panic!("expected a region header");
        };
        assert!(matches!(&*header.text, Node::AnnotatedRegionHeaderText(t) if t.value == "Intro"));
        assert!(header.annotations.is_some());
        assert!(matches!(statements(&root), [Node::IntLiteral(_)]));
    }

    #[test]
    fn test_chunk_tokens_are_sorted() {
        let root = must_parse_chunk("manifest {}\nfn f(a, b){ return (a + b) }");
        let tokens = &root.chunk().tokens;
        assert!(!tokens.is_empty());
        assert!(tokens.windows(2).all(|w| w[0].span.start < w[1].span.start));
        assert_eq!(tokens[0].token_type, TokenType::ManifestKeyword);
    }

    #[test]
    fn test_too_large_input() {
        let source = " ".repeat(MAX_MODULE_BYTE_LEN + 1);
        let error = parse_chunk(&source, "big.ix", &ParserOptions::default()).unwrap_err();
        assert!(error.chunk.is_none());
        assert_eq!(
            error.error,
            ParseError::TooLarge {
                len: MAX_MODULE_BYTE_LEN + 1
            }
        );
    }

    #[test]
    fn test_cancelled_parse() {
        let cancellation = CancellationToken::new();
        cancellation.cancel();
        let options = ParserOptions {
            cancellation: Some(cancellation),
            ..Default::default()
        };
        let error = parse_chunk("1", "test.ix", &options).unwrap_err();
        assert_eq!(error.error, ParseError::Cancelled);
        assert!(error.chunk.is_none());
    }

    #[test]
    fn test_recursion_limit() {
        let options = ParserOptions {
            max_depth: 8,
            ..Default::default()
        };
        let source = format!("{}1{}", "(".repeat(20), ")".repeat(20));
        let error = parse_chunk(&source, "test.ix", &options).unwrap_err();
        assert_eq!(error.error, ParseError::RecursionLimit { max_depth: 8 });
        assert!(error.chunk.is_none());
    }

    #[test]
    fn test_start_index_skips_a_prefix() {
        let source = "???\nprint 1";
        let options = ParserOptions {
            start_index: 4,
            ..Default::default()
        };
        let root = parse_chunk(source, "test.ix", &options).expect("the prefix is not parsed");
        let [Node::CallExpression(call)] = statements(&root) else {
            panic!("expected a single call, got {:?}", statements(&root));
        };
        assert_eq!(call.base.span, NodeSpan::new(4, 11));
        assert_eq!(root.chunk().base.span, NodeSpan::new(0, 11));
        assert!(root.chunk().tokens.iter().all(|t| t.span.start >= 4));

        let past_the_end = ParserOptions {
            start_index: 100,
            ..Default::default()
        };
        let root = parse_chunk(source, "test.ix", &past_the_end).expect("nothing is parsed");
        assert!(statements(&root).is_empty());
    }

    #[test]
    fn test_nesting_below_default_limit() {
        let levels = DEFAULT_MAX_DEPTH - 8;
        let source = format!("x = {}1{}", "[".repeat(levels), "]".repeat(levels));
        let root = must_parse_chunk(&source);
        assert_eq!(statements(&root).len(), 1);

        let levels = DEFAULT_MAX_DEPTH / 2 - 8;
        let source = format!("x = {}1{}", "(".repeat(levels), ")".repeat(levels));
        must_parse_chunk(&source);

        let levels = DEFAULT_MAX_DEPTH - 8;
        let source = format!("{}{}", "if x { ".repeat(levels), "}".repeat(levels));
        must_parse_chunk(&source);
    }

    #[test]
    fn test_nesting_above_default_limit() {
        let levels = DEFAULT_MAX_DEPTH + 8;
        let source = format!("x = {}1{}", "[".repeat(levels), "]".repeat(levels));
        let error = parse_chunk(&source, "test.ix", &ParserOptions::default()).unwrap_err();
        assert_eq!(error.error, ParseError::RecursionLimit { max_depth: DEFAULT_MAX_DEPTH });
    }

    #[test]
    fn test_parse_expression() {
        let (expr, ok) = parse_expression("(1 + 2)");
        assert!(ok);
        assert!(matches!(expr, Node::BinaryExpression(_)));

        let (_, ok) = parse_expression("1 2");
        assert!(!ok);

        let (expr, ok) = parse_expression("");
        assert!(!ok);
        assert!(expr.is_missing_expr());
    }

    #[test]
    fn test_parse_path_helpers() {
        assert_eq!(parse_path("/a/b").as_deref(), Some("/a/b"));
        assert_eq!(parse_path("/a b"), None);
        assert_eq!(parse_path("a"), None);

        assert!(parse_path_pattern("%/a/..."));
        assert!(!parse_path_pattern("/a"));
    }

    #[test]
    fn test_parse_url() {
        assert_eq!(
            parse_url("https://example.com/index.html").as_deref(),
            Some("https://example.com/index.html")
        );
        assert_eq!(parse_url("example.com"), None);
    }

    #[test]
    fn test_parse_date_literal() {
        let date = parse_date_literal("2020y-10mt-5d-UTC").expect("valid date");
        assert_eq!(date.location, "UTC");
        assert!(parse_date_literal("2020y-UTC").is_err());
        assert!(parse_date_literal("2020-10-05").is_err());
    }

    #[test]
    fn test_is_metadata_key() {
        assert!(is_metadata_key("_id_"));
        assert!(!is_metadata_key("__"));
        assert!(!is_metadata_key("_id"));
    }

    #[test]
    fn test_shebang_is_skipped() {
        let root = must_parse_chunk("#!/usr/local/bin/inox\n1");
        assert!(matches!(statements(&root), [Node::IntLiteral(_)]));
    }

    #[test]
    fn test_only_chunk_start() {
        let options = ParserOptions {
            only_chunk_start: true,
            ..Default::default()
        };
        let root = parse_chunk("manifest {}\n)(", "test.ix", &options).expect("the body is not parsed");
        assert!(root.chunk().manifest.is_some());
        assert!(statements(&root).is_empty());
    }
}
