//! Error types for od-output.

use thiserror::Error;

/// Errors that can occur when writing analysis output.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    /// A wide-table row whose value count differs from its header.
    #[error("{table}: row has {got} values for {expected} columns")]
    Shape { table: &'static str, expected: usize, got: usize },

    #[cfg(feature = "sqlite")]
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Alias for `Result<T, OutputError>`.
pub type OutputResult<T> = Result<T, OutputError>;
