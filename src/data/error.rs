//! Error types for loading and exporting datasets

use thiserror::Error;

/// Structural failures. Malformed cell values never end up here; the
/// enricher degrades them to sentinels instead.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("Missing required column '{column}' in {source_name}")]
    MissingColumn { column: String, source_name: String },
}

/// Result type alias for data operations
pub type Result<T> = std::result::Result<T, DataError>;
