use thiserror::Error;

use crate::args::MissingArgument;

/// Errors that can occur while fetching configuration parameters.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParameterError {
    #[error("Parameters not found: {}", .0.join(", "))]
    NotFound(Vec<String>),
    #[error("Not authorized to read parameters: {0}")]
    AccessDenied(String),
    #[error("Parameter request failed: {0}")]
    RequestFailed(String),
    #[error(transparent)]
    MissingArgument(#[from] MissingArgument),
}

/// Result type for parameter operations.
pub type Result<T> = std::result::Result<T, ParameterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_lists_names() {
        let error = ParameterError::NotFound(vec!["/app/db".to_string(), "/app/key".to_string()]);
        assert_eq!(error.to_string(), "Parameters not found: /app/db, /app/key");
    }

    #[test]
    fn test_request_failed_display() {
        let error = ParameterError::RequestFailed("InternalServerError".to_string());
        assert_eq!(
            error.to_string(),
            "Parameter request failed: InternalServerError"
        );
    }
}
