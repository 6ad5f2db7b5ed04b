//! Error types for rust_coxpress

use thiserror::Error;

/// Main error type for expression matrix preprocessing
#[derive(Error, Debug)]
pub enum CoxpressError {
    #[error("Parse error: {reason}")]
    Parse { reason: String },

    #[error("{axis} index {index} out of bounds for length {len}")]
    IndexOutOfBounds {
        index: usize,
        len: usize,
        axis: &'static str,
    },

    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: String, got: String },

    #[error("Invalid dataset layout: {reason}")]
    InvalidLayout { reason: String },

    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type alias for preprocessing operations
pub type Result<T> = std::result::Result<T, CoxpressError>;
