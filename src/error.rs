//! Errors of the facade crate.

use std::io;

use inox_syntax::diagnostics::ParseError;
use thiserror::Error;

/// Error of the operations that load or parse module sources.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("failed to read module: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
