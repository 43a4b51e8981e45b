use thiserror::Error;

use crate::args::MissingArgument;

/// Errors that can occur while building, publishing or parsing notifications.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NotifyError {
    #[error("Invalid attribute type for {name}: {kind} (expected string, number or array)")]
    InvalidAttributeType { name: String, kind: &'static str },
    #[error("Notification envelope has no records")]
    EmptyEnvelope,
    #[error("Malformed notification envelope: {0}")]
    MalformedEnvelope(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Topic not found: {0}")]
    TopicNotFound(String),
    #[error("Not authorized to publish: {0}")]
    AccessDenied(String),
    #[error("Publish failed: {0}")]
    PublishFailed(String),
    #[error(transparent)]
    MissingArgument(#[from] MissingArgument),
}

/// Result type for notification operations.
pub type Result<T> = std::result::Result<T, NotifyError>;
