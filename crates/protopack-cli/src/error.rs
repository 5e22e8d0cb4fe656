use std::process;

use protopack::{ProtoError, SchemaError};
use thiserror::Error;

/// Exit codes for the CLI.
pub const EXIT_ERROR: i32 = 1;
pub const EXIT_USAGE: i32 = 2;

/// Unified error type for CLI operations.
#[derive(Debug, Error)]
pub enum CliError {
    /// Encoding, decoding or value errors from the codec.
    #[error("error: {0}")]
    Proto(#[from] ProtoError),
    /// Schema descriptor could not be loaded.
    #[error("error: schema: {0}")]
    Schema(#[from] SchemaError),
    /// Socket or file I/O.
    #[error("error: {0}")]
    Io(#[from] std::io::Error),
    /// Unreadable input such as a malformed JSON message.
    #[error("error: {0}")]
    Input(String),
    /// Argument / usage errors.
    #[error("error: {0}")]
    Usage(String),
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Input(format!("JSON parse error: {e}"))
    }
}

/// Print error and exit with the appropriate code.
pub fn exit_with_error(err: CliError) -> ! {
    eprintln!("{err}");
    let code = match &err {
        CliError::Usage(_) => EXIT_USAGE,
        _ => EXIT_ERROR,
    };
    process::exit(code)
}

pub type CliResult<T> = std::result::Result<T, CliError>;
