use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading the happiness table or the ISO lookup.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("data file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error in {path}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{path}: line {line} has {found} fields, the header has {expected}")]
    TooManyFields {
        path: PathBuf,
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("required column '{column}' is missing")]
    MissingColumn { column: String },

    #[error("invalid ISO lookup table")]
    IsoTable(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DataError>;
