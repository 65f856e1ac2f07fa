//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::fmt;
use std::iter;
use std::path::Path;
use std::sync::Arc;

use miette::{Diagnostic, LabeledSpan, NamedSource, SourceCode};
use serde_json::{Value, json};

use crate::diagnostics::{ParseError, ParsingErrorAggregation};
use crate::parser::{DEFAULT_MAX_DEPTH, ParserOptions};
use crate::print::{PrintConfig, sprint};
use crate::tokens::get_tokens;
use crate::walk::get_tree_view;
use crate::{ChunkParseOptions, ChunkSource, ParsedChunkSource, SourceFile, parse_chunk_source};

use super::{CliError, CliResult, ExitCode};

pub fn parse_options(max_depth: Option<usize>) -> ChunkParseOptions {
    ChunkParseOptions {
        parser: ParserOptions {
            max_depth: max_depth.unwrap_or(DEFAULT_MAX_DEPTH),
            ..ParserOptions::default()
        },
        cache: None,
    }
}

// ============================================================================
// Loading
// ============================================================================

/// A module read from disk and parsed, errors included.
struct LoadedModule {
    source: Arc<SourceFile>,
    parsed: Option<Arc<ParsedChunkSource>>,
    error: Option<Arc<ParseError>>,
}

impl LoadedModule {
    /// The tree, even when the module has syntax errors.
    fn tree(&self) -> CliResult<&ParsedChunkSource> {
        self.parsed.as_deref().ok_or_else(|| {
            let message = self
                .error
                .as_deref()
                .map(|error| render_error(&self.source, error))
                .unwrap_or_default();
            CliError::failure(message)
        })
    }

    /// Report the errors on stderr after an inspection command produced its output.
    fn finish(&self) -> ExitCode {
        match self.error.as_deref() {
            Some(error) => {
                eprintln!("{}", render_error(&self.source, error));
                ExitCode::FAILURE
            }
            None => ExitCode::SUCCESS,
        }
    }
}

fn load_module(file: &Path, options: &ChunkParseOptions) -> CliResult<LoadedModule> {
    let source = Arc::new(SourceFile::read(file)?);
    tracing::debug!(file = %file.display(), len = source.code.len(), "parsing module");

    match parse_chunk_source(source.clone(), options) {
        Ok(parsed) => Ok(LoadedModule {
            source,
            parsed: Some(parsed),
            error: None,
        }),
        Err(e) => Ok(LoadedModule {
            source,
            parsed: e.parsed,
            error: Some(e.error),
        }),
    }
}

// ============================================================================
// Error rendering
// ============================================================================

/// Syntax errors of a module, rendered by miette against the module's code.
#[derive(Debug)]
struct SyntaxReport {
    message: String,
    source: NamedSource<String>,
    labels: Vec<LabeledSpan>,
}

impl SyntaxReport {
    fn new(source: &SourceFile, aggregation: &ParsingErrorAggregation) -> Self {
        // spans index chars, miette wants byte offsets
        let offsets: Vec<usize> = source
            .code
            .char_indices()
            .map(|(i, _)| i)
            .chain(iter::once(source.code.len()))
            .collect();
        let byte_offset = |index: usize| offsets.get(index).copied().unwrap_or(source.code.len());

        let labels = aggregation
            .errors
            .iter()
            .zip(&aggregation.positions)
            .map(|(error, position)| {
                let start = byte_offset(position.span.start);
                let end = byte_offset(position.span.end).max(start);
                LabeledSpan::new(Some(error.message.clone()), start, end - start)
            })
            .collect::<Vec<_>>();

        let count = labels.len();
        Self {
            message: format!(
                "{count} syntax error{} in {}",
                if count == 1 { "" } else { "s" },
                source.user_friendly_name()
            ),
            source: NamedSource::new(source.name(), source.code.clone()),
            labels,
        }
    }
}

impl fmt::Display for SyntaxReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for SyntaxReport {}

impl Diagnostic for SyntaxReport {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new("inox::parse"))
    }

    fn source_code(&self) -> Option<&dyn SourceCode> {
        Some(&self.source)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        Some(Box::new(self.labels.iter().cloned()))
    }
}

fn render_error(source: &SourceFile, error: &ParseError) -> String {
    match error.as_syntax() {
        Some(aggregation) => format!("{:?}", miette::Report::new(SyntaxReport::new(source, aggregation))),
        None => format!("Error: {error}"),
    }
}

// ============================================================================
// Commands
// ============================================================================

/// Report the syntax errors of a file.
pub fn check_file(file: &Path, options: &ChunkParseOptions, as_json: bool) -> CliResult<ExitCode> {
    let module = load_module(file, options)?;

    if as_json {
        let output = serde_json::to_string_pretty(&check_report(&module))
            .map_err(|e| CliError::failure(format!("Error serializing report: {e}")))?;
        println!("{output}");
        return Ok(if module.error.is_none() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        });
    }

    match module.error.as_deref() {
        None => {
            println!("{}: ok", module.source.user_friendly_name());
            Ok(ExitCode::SUCCESS)
        }
        Some(error) => Err(CliError::failure(render_error(&module.source, error))),
    }
}

fn check_report(module: &LoadedModule) -> Value {
    let errors: Vec<Value> = match module.error.as_deref() {
        None => Vec::new(),
        Some(ParseError::Syntax(aggregation)) => aggregation
            .errors
            .iter()
            .zip(&aggregation.positions)
            .map(|(error, position)| {
                json!({
                    "message": error.message,
                    "line": position.start_line,
                    "column": position.start_column,
                    "end_line": position.end_line,
                    "end_column": position.end_column,
                    "start": position.span.start,
                    "end": position.span.end,
                })
            })
            .collect(),
        Some(error) => vec![json!({ "message": error.to_string() })],
    };

    json!({
        "file": module.source.name(),
        "ok": errors.is_empty(),
        "errors": errors,
    })
}

/// List the tokens of a file with their positions and semantic flags.
pub fn list_tokens(file: &Path, options: &ChunkParseOptions) -> CliResult<ExitCode> {
    let module = load_module(file, options)?;
    let parsed = module.tree()?;

    for token in get_tokens(parsed.node(), parsed.chunk(), true).iter() {
        let (line, column) = parsed.get_span_line_column(token.span);
        println!(
            "{line}:{column}\t{}\t{:?}\t{}",
            token.token_type.name(),
            token.str(),
            token.meta.names().join(",")
        );
    }
    Ok(module.finish())
}

/// Show the syntax tree of a file.
pub fn show_tree(file: &Path, options: &ChunkParseOptions) -> CliResult<ExitCode> {
    let module = load_module(file, options)?;
    let parsed = module.tree()?;
    print!("{}", get_tree_view(parsed.node(), parsed.chunk()));
    Ok(module.finish())
}

/// Print a file back from its tree.
pub fn print_file(file: &Path, options: &ChunkParseOptions) -> CliResult<ExitCode> {
    let module = load_module(file, options)?;
    let parsed = module.tree()?;
    print!("{}", sprint(parsed.node(), parsed.chunk(), PrintConfig::default()));
    Ok(module.finish())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use super::*;

    fn temp_module(tag: &str, code: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("inox_cli_{tag}_{}.ix", std::process::id()));
        fs::write(&path, code).unwrap();
        path
    }

    fn load(tag: &str, code: &str) -> LoadedModule {
        let path = temp_module(tag, code);
        let module = load_module(&path, &parse_options(None));
        let _ = fs::remove_file(&path);
        module.ok().unwrap()
    }

    #[test]
    fn test_check_report_valid_module() {
        let module = load("valid", "a = 1\nprint a");
        let report = check_report(&module);
        assert_eq!(report["ok"], json!(true));
        assert_eq!(report["errors"], json!([]));
    }

    #[test]
    fn test_check_report_syntax_error() {
        let module = load("invalid", "a = 1\n?");
        let report = check_report(&module);
        assert_eq!(report["ok"], json!(false));
        assert_eq!(report["errors"][0]["line"], json!(2));
        assert_eq!(report["errors"][0]["column"], json!(1));
        assert!(module.parsed.is_some());
    }

    #[test]
    fn test_report_labels_use_byte_offsets() {
        let module = load("offsets", "s = \"é\"\n?");
        let aggregation = module.error.as_deref().and_then(ParseError::as_syntax).unwrap();
        let report = SyntaxReport::new(&module.source, aggregation);

        assert_eq!(report.labels.len(), 1);
        // 'é' takes two bytes
        assert_eq!(report.labels[0].offset(), 9);
        assert_eq!(report.message.split(" in ").next(), Some("1 syntax error"));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = load_module(Path::new("/definitely/not/here.ix"), &parse_options(None));
        assert_eq!(result.err().map(|e| e.exit_code), Some(ExitCode(2)));
    }

    #[test]
    fn test_parse_options_max_depth() {
        assert_eq!(parse_options(None).parser.max_depth, DEFAULT_MAX_DEPTH);
        assert_eq!(parse_options(Some(3)).parser.max_depth, 3);
    }
}
