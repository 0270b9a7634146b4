use thiserror::Error;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("malformed OD label {label:?}: {reason}")]
    Label { label: String, reason: String },

    #[error("{label} is tagged on more than one node")]
    DuplicateLabel { label: String },

    #[error("snapshot parse error: {0}")]
    Parse(String),

    #[error("missing column {0:?}")]
    MissingColumn(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type TableResult<T> = Result<T, TableError>;
