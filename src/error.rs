//! Error types for panel aggregation.
//!
//! Every failure is fatal to the run; variants carry the path, line and
//! offending value needed to diagnose the input without re-running.

use std::num::ParseFloatError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors decoding a single data row.
#[derive(Debug, Error)]
pub enum RowError {
    /// Fewer than the key and weight columns were present.
    #[error("expected at least 2 fields (key, weight), found {fields}")]
    MalformedRow { fields: usize },

    #[error("weight '{value}' is not a number: {source}")]
    NumericParse {
        value: String,
        #[source]
        source: ParseFloatError,
    },
}

/// Errors that abort an aggregation run.
#[derive(Debug, Error)]
pub enum PanelError {
    #[error("failed to read period directory {path}: {source}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to open period file {path}: {source}")]
    FileOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read header of {path}: {source}")]
    HeaderRead {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("period file {path} is empty, expected a header row")]
    EmptyPeriodFile { path: PathBuf },

    #[error("failed to read row in {path}: {source}")]
    RowRead {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("invalid row at {path}:{line}: {source}")]
    InvalidRow {
        path: PathBuf,
        line: u64,
        #[source]
        source: RowError,
    },

    #[error("failed to create output file {path}: {source}")]
    OutputCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write output file {path}: {source}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid field separator '{0}': expected a single ASCII character, '\\t' or 'tab'")]
    InvalidDelimiter(String),
}

/// Result type for aggregation operations
pub type PanelResult<T> = Result<T, PanelError>;
