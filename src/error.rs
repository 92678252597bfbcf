//! Error handling for vinyl-component.
//! Defines the single error channel every failure of the transformer flows through.

use serde::Serialize;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Message of the shape error for Vinyl objects created before the v2 contract.
pub const LEGACY_FILE_MESSAGE: &str = "vinyl-component doesn't support Vinyl < v2.x file objects. \
     Update the upstream producer to emit Vinyl >= v2.0.0 files.";

/// A compiler failure normalized against the file that caused it.
///
/// `file_name` is only ever taken from the input file's path. A file without a
/// path yields an error without `file_name`, even when the compiler reported one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompileError {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<PathBuf>,
}

impl CompileError {
    pub fn new(message: impl Into<String>, path: Option<&Path>) -> Self {
        Self {
            message: message.into(),
            file_name: path.map(Path::to_path_buf),
        }
    }
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.file_name {
            Some(file_name) => write!(f, "{}: {}", file_name.display(), self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for CompileError {}

/// Custom error types for vinyl-component operations.
#[derive(Error, Debug)]
pub enum Error {
    /// The entry point received more than one options argument
    #[error("Expected 0 or 1 argument (<Options>), but got {got} arguments.")]
    Usage { got: usize },

    /// The pipeline handed over something that is not a Vinyl file at all
    #[error(
        "Expected a Vinyl file object of a component template, but got a non-Vinyl value {rendered} ({kind})."
    )]
    NotAFile { rendered: String, kind: &'static str },

    /// A Vinyl file produced by a pre-v2 implementation
    #[error("{}", LEGACY_FILE_MESSAGE)]
    LegacyFile,

    /// The file carries a live stream instead of a buffer
    #[error("Streaming not supported")]
    StreamingNotSupported,

    /// The compiler rejected the component source
    #[error(transparent)]
    Compile(#[from] CompileError),

    /// Represents errors that occur during file system operations
    #[error("IO error: {0}.")]
    IoError(#[from] io::Error),

    /// Represents errors that occur during JSON (de)serialization of pipeline objects
    #[error("JSON error: {0}.")]
    JsonError(#[from] serde_json::Error),

    /// Represents errors that occur during configuration parsing or processing
    #[error("Configuration error: {0}.")]
    ConfigError(String),
}

/// Serializable form of an error, as written by the JSON-lines sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorRecord {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<PathBuf>,
}

impl Error {
    /// The file an error is attributed to. Only compile errors carry one.
    pub fn file_name(&self) -> Option<&Path> {
        match self {
            Error::Compile(err) => err.file_name.as_deref(),
            _ => None,
        }
    }

    pub fn to_record(&self) -> ErrorRecord {
        match self {
            Error::Compile(err) => ErrorRecord {
                message: err.message.clone(),
                file_name: err.file_name.clone(),
            },
            other => ErrorRecord {
                message: other.to_string(),
                file_name: None,
            },
        }
    }
}

/// Convenience type alias for Results with [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Default error handler that prints the error and exits the program.
pub fn default_error_handler(err: Error) {
    eprintln!("{err}");
    std::process::exit(1);
}
