//! Error types for postmerge-core

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Which of the two file sets an operation refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Urls,
    Captions,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Urls => write!(f, "URL"),
            SourceKind::Captions => write!(f, "caption"),
        }
    }
}

/// Errors that can occur in postmerge-core
#[derive(Debug, Error)]
pub enum Error {
    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File content is not valid UTF-8 text
    #[error("file '{name}' is not valid UTF-8 text: {source}")]
    Decode {
        name: String,
        #[source]
        source: std::str::Utf8Error,
    },

    /// A post metadata file is not the expected JSON document
    #[error("invalid metadata file '{path}': {source}")]
    Metadata {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Directory traversal error
    #[error("failed to traverse directory: {0}")]
    WalkDir(#[from] walkdir::Error),

    /// A read task panicked or was aborted
    #[error("file read task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// One of the two file sets is empty at processing time
    #[error("no {0} files selected; select both URL and caption files first")]
    MissingInput(SourceKind),

    /// Export requested without a table to export
    #[error("no data to export")]
    EmptyExport,

    /// Unsupported export format name
    #[error("unknown export format '{0}' (supported: xlsx, csv, json)")]
    UnknownFormat(String),

    /// Spreadsheet serialization error
    #[error("XLSX error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// CSV serialization error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Whether this error is a user-facing notice (missing input, nothing to
    /// export) rather than a failure of the pipeline itself
    pub fn is_notice(&self) -> bool {
        matches!(self, Error::MissingInput(_) | Error::EmptyExport)
    }
}
