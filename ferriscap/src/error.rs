//! Error types for ferriscap.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Main error type for ferriscap operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Input file or directory errors
    #[error("Input error: {0}")]
    Input(#[from] InputError),

    /// Output/serialization errors
    #[error("Output error: {0}")]
    Output(#[from] OutputError),

    /// Dialect definition errors
    #[error("Dialect error: {0}")]
    Dialect(#[from] DialectError),
}

/// Errors raised while locating or reading a capture.
///
/// These abort the current target only; a batch moves on to the next file.
#[derive(Error, Debug)]
pub enum InputError {
    /// The capture file does not exist
    #[error("File not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// Directory mode was requested for something that is not a directory
    #[error("Not a directory: {}", path.display())]
    NotADirectory { path: PathBuf },

    /// The file exists but could not be read
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file is not valid UTF-8 text
    #[error("File is not valid UTF-8: {}", path.display())]
    Encoding { path: PathBuf },
}

/// Errors raised by a single field extractor.
///
/// Caught at the registry boundary and recorded in the diagnostics bucket,
/// never propagated out of a parse.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExtractError {
    /// A table extractor could not find its header row
    #[error("Missing table header: expected '{expected}'")]
    MissingHeader { expected: &'static str },

    /// The chunk matched but its contents could not be interpreted
    #[error("Malformed output: {message}")]
    Malformed { message: String },

    /// The extractor panicked
    #[error("Extractor panicked: {message}")]
    Panicked { message: String },
}

/// Errors raised while writing an analysis result.
#[derive(Error, Debug)]
pub enum OutputError {
    /// Failed to create the output directory or write the file
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// JSON serialization failed
    #[error("Serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Dialect definition errors.
#[derive(Error, Debug)]
pub enum DialectError {
    /// No dialect registered under this name
    #[error("Unknown dialect: '{name}'")]
    UnknownDialect { name: String },

    /// A dialect with this name is already registered
    #[error("Dialect '{name}' is already registered")]
    AlreadyRegistered { name: String },

    /// Invalid regex pattern in a dialect or rule definition
    #[error("Invalid regex pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

/// Result type alias using ferriscap's Error.
pub type Result<T> = std::result::Result<T, Error>;
