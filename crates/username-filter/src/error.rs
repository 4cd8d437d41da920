//! Error types for the username filter

use thiserror::Error;

/// Errors raised by filter construction, snapshot transport and hydration
#[derive(Debug, Error)]
pub enum FilterError {
    #[error("Expected element count must be positive, got {0}")]
    InvalidExpectedElements(usize),

    #[error("Invalid false positive rate: {fpr} (must be strictly between 0 and 1)")]
    InvalidFalsePositiveRate { fpr: f64 },

    #[error("Invalid filter parameters: {0}")]
    InvalidParameters(String),

    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),

    #[error("Unsupported snapshot version: {found} (supported: {supported})")]
    UnsupportedSnapshotVersion { found: u32, supported: u32 },

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Hydration failed: {0}")]
    Hydration(#[from] DataError),
}

/// Errors from external collaborators (lookup service, hydration sources)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Timeout")]
    Timeout,

    #[error("Query error: {0}")]
    QueryError(String),

    #[error("Username already exists: {0}")]
    AlreadyExists(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("I/O error: {0}")]
    Io(String),
}
