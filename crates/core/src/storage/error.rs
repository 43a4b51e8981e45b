use thiserror::Error;

use crate::args::MissingArgument;

/// Errors that can occur during key-value store operations.
///
/// Records the store declines to write in a batch are not errors; they are
/// returned as the unprocessed remainder and retried by the batch writer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Table not found: {0}")]
    TableNotFound(String),
    #[error("Condition check failed: {0}")]
    ConditionFailed(String),
    #[error("Throughput exceeded: {0}")]
    Throttled(String),
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Request failed: {0}")]
    RequestFailed(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error(transparent)]
    MissingArgument(#[from] MissingArgument),
    #[error("Batch write gave up after {rounds} rounds with {unprocessed} records unprocessed")]
    RetriesExhausted { rounds: usize, unprocessed: usize },
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
