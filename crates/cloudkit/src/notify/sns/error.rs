//! SNS error mapping.

use std::fmt::Debug;

use aws_sdk_sns::error::SdkError;
use aws_sdk_sns::operation::publish::PublishError;
use cloudkit_core::notify::NotifyError;

/// Map a Publish SDK error to NotifyError.
pub fn map_publish_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<PublishError, R>,
    topic: &str,
) -> NotifyError {
    if let SdkError::DispatchFailure(_) | SdkError::TimeoutError(_) = err {
        return NotifyError::PublishFailed(format!("Connection failed: {:?}", err));
    }
    match err.into_service_error() {
        PublishError::NotFoundException(_) => NotifyError::TopicNotFound(topic.to_string()),
        PublishError::AuthorizationErrorException(e) => {
            NotifyError::AccessDenied(e.message().unwrap_or(topic).to_string())
        }
        PublishError::KmsAccessDeniedException(e) => {
            NotifyError::AccessDenied(e.message().unwrap_or(topic).to_string())
        }
        PublishError::InvalidParameterException(e) => NotifyError::PublishFailed(format!(
            "Invalid parameter: {}",
            e.message().unwrap_or("unknown")
        )),
        PublishError::InvalidParameterValueException(e) => NotifyError::PublishFailed(format!(
            "Invalid parameter value: {}",
            e.message().unwrap_or("unknown")
        )),
        PublishError::InternalErrorException(_) => {
            NotifyError::PublishFailed("SNS internal error".to_string())
        }
        err => NotifyError::PublishFailed(format!("Publish failed: {:?}", err)),
    }
}
