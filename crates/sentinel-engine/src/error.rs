//! Error types for the metrics engine.

use polars::prelude::PolarsError;
use thiserror::Error;

/// Errors raised while building result frames.
///
/// Missing columns, unreadable dates and empty datasets are not errors; the
/// engine degrades to neutral results for those.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<PolarsError> for EngineError {
    fn from(err: PolarsError) -> Self {
        EngineError::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
