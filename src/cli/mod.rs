//! CLI module for the Inox parser
//!
//! ## Commands
//!
//! - `check <file>` - Report syntax errors (`--json` for machine-readable output)
//! - `tokens <file>` - List the tokens of a module
//! - `tree <file>` - Show the syntax tree
//! - `print <file>` - Print a module back from its tree
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;

use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// prints the message and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    pub exit_code: ExitCode,
}

impl CliError {
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }

    pub fn with_code(message: impl Into<String>, code: i32) -> Self {
        Self::new(message, ExitCode(code))
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<crate::Error> for CliError {
    fn from(error: crate::Error) -> Self {
        match error {
            crate::Error::Io(_) => Self::with_code(format!("Error: {error}"), 2),
            crate::Error::Parse(_) => Self::failure(format!("Error: {error}")),
        }
    }
}

pub type CliResult<T> = Result<T, CliError>;

const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Developer tools for the Inox parser
#[derive(Parser, Debug)]
#[command(name = "inox-parse")]
#[command(version = VERSION)]
#[command(about = "Parse Inox modules and inspect the result", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Maximum nesting depth of the parsed tree
    #[arg(long, global = true, value_name = "DEPTH")]
    pub max_depth: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Report syntax errors
    Check {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Print the result as JSON on stdout
        #[arg(long)]
        json: bool,
    },

    /// List the tokens of a module
    Tokens {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Show the syntax tree
    Tree {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Print a module back from its tree
    Print {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

fn execute(cli: Cli) -> CliResult<ExitCode> {
    let options = commands::parse_options(cli.max_depth);
    match cli.command {
        Command::Check { file, json } => commands::check_file(&file, &options, json),
        Command::Tokens { file } => commands::list_tokens(&file, &options),
        Command::Tree { file } => commands::show_tree(&file, &options),
        Command::Print { file } => commands::print_file(&file, &options),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_check() {
        let cli = Cli::try_parse_from(["inox-parse", "check", "main.ix"]).unwrap();
        if let Command::Check { file, json } = cli.command {
            assert_eq!(file, PathBuf::from("main.ix"));
            assert!(!json);
        } else {
            panic!("Expected Check command");
        }
    }

    #[test]
    fn test_cli_parse_check_json() {
        let cli = Cli::try_parse_from(["inox-parse", "check", "--json", "main.ix"]).unwrap();
        assert!(matches!(cli.command, Command::Check { json: true, .. }));
    }

    #[test]
    fn test_cli_parse_inspection_commands() {
        let cli = Cli::try_parse_from(["inox-parse", "tokens", "main.ix"]).unwrap();
        assert!(matches!(cli.command, Command::Tokens { .. }));

        let cli = Cli::try_parse_from(["inox-parse", "tree", "main.ix"]).unwrap();
        assert!(matches!(cli.command, Command::Tree { .. }));

        let cli = Cli::try_parse_from(["inox-parse", "print", "main.ix"]).unwrap();
        assert!(matches!(cli.command, Command::Print { .. }));
    }

    #[test]
    fn test_cli_parse_max_depth_is_global() {
        let cli = Cli::try_parse_from(["inox-parse", "tree", "main.ix", "--max-depth", "12"]).unwrap();
        assert_eq!(cli.max_depth, Some(12));
    }

    #[test]
    fn test_cli_requires_a_command() {
        assert!(Cli::try_parse_from(["inox-parse"]).is_err());
        assert!(Cli::try_parse_from(["inox-parse", "check"]).is_err());
    }

    #[test]
    fn test_io_error_exit_code() {
        let error = crate::Error::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        let cli_error = CliError::from(error);
        assert_eq!(cli_error.exit_code, ExitCode(2));
        assert!(cli_error.message.contains("gone"));
    }
}
