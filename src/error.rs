//! Error handling types and utilities.

use std::path::PathBuf;
use thiserror::Error;

/// A specialized Result type for symbol search operations.
pub type Result<T> = std::result::Result<T, SearchError>;

/// Errors surfaced by the query compiler and the searcher.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The raw query does not fit the shape it was compiled as.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// The requested result count is not a positive integer.
    #[error("invalid limit {0}: must be a positive integer")]
    InvalidLimit(i64),

    /// The requested result count is above the searcher's configured cap.
    #[error("limit {limit} exceeds the configured maximum of {max}")]
    LimitExceeded { limit: i64, max: usize },

    /// Evaluation against the corpus failed. Passed through unchanged.
    #[error("corpus unavailable: {0}")]
    CorpusUnavailable(#[from] CorpusError),
}

/// Failures reported by a corpus collaborator.
#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("corpus evaluation timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("connection to corpus failed: {0}")]
    Connection(String),

    #[error("corpus is not available: {0}")]
    Unavailable(String),

    /// The snapshot file backing an in-memory corpus could not be parsed.
    #[error("invalid corpus snapshot at {path}: {reason}")]
    Snapshot { path: PathBuf, reason: String },

    /// A snapshot entry breaks a corpus invariant.
    #[error("invalid corpus entry: {0}")]
    InvalidEntry(String),

    #[error("I/O error reading corpus: {0}")]
    Io(#[from] std::io::Error),
}
