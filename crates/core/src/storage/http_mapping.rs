//! Pure functions for mapping store errors to HTTP status codes.
//!
//! Handlers that front a table use this together with
//! [`crate::http::format_http_response`] to answer with a meaningful code.

use super::StoreError;

/// Maps a [`StoreError`] to an HTTP status code.
///
/// - `TableNotFound` -> 404 (Not Found)
/// - `ConditionFailed` -> 409 (Conflict)
/// - `Throttled` -> 429 (Too Many Requests)
/// - `ConnectionFailed` -> 503 (Service Unavailable)
/// - `RetriesExhausted` -> 503 (Service Unavailable)
/// - `RequestFailed` -> 500 (Internal Server Error)
/// - `Serialization` -> 500 (Internal Server Error)
/// - `InvalidData` -> 400 (Bad Request)
/// - `MissingArgument` -> 400 (Bad Request)
///
/// # Examples
///
/// ```
/// use cloudkit_core::storage::{store_error_to_status_code, StoreError};
///
/// let error = StoreError::TableNotFound("orders".to_string());
/// assert_eq!(store_error_to_status_code(&error), 404);
/// ```
pub fn store_error_to_status_code(error: &StoreError) -> u16 {
    match error {
        StoreError::TableNotFound(_) => 404,
        StoreError::ConditionFailed(_) => 409,
        StoreError::Throttled(_) => 429,
        StoreError::ConnectionFailed(_) => 503,
        StoreError::RetriesExhausted { .. } => 503,
        StoreError::RequestFailed(_) => 500,
        StoreError::Serialization(_) => 500,
        StoreError::InvalidData(_) => 400,
        StoreError::MissingArgument(_) => 400,
    }
}
