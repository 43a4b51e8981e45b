//! SSM error mapping.

use std::fmt::Debug;

use aws_sdk_ssm::error::{ProvideErrorMetadata, SdkError};
use aws_sdk_ssm::operation::get_parameters::GetParametersError;
use aws_sdk_ssm::operation::get_parameters_by_path::GetParametersByPathError;
use cloudkit_core::params::ParameterError;

const ACCESS_DENIED: &str = "AccessDeniedException";

/// Map a GetParameters SDK error to ParameterError.
pub fn map_get_parameters_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<GetParametersError, R>,
) -> ParameterError {
    if let SdkError::DispatchFailure(_) | SdkError::TimeoutError(_) = err {
        return ParameterError::RequestFailed(format!("Connection failed: {:?}", err));
    }
    let err = err.into_service_error();
    if err.code() == Some(ACCESS_DENIED) {
        return ParameterError::AccessDenied(err.message().unwrap_or("GetParameters").to_string());
    }
    match err {
        GetParametersError::InvalidKeyId(_) => {
            ParameterError::AccessDenied("Invalid KMS key for secure parameter".to_string())
        }
        GetParametersError::InternalServerError(_) => {
            ParameterError::RequestFailed("SSM internal server error".to_string())
        }
        err => ParameterError::RequestFailed(format!("GetParameters failed: {:?}", err)),
    }
}

/// Map a GetParametersByPath SDK error to ParameterError.
pub fn map_get_parameters_by_path_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<GetParametersByPathError, R>,
    path: &str,
) -> ParameterError {
    if let SdkError::DispatchFailure(_) | SdkError::TimeoutError(_) = err {
        return ParameterError::RequestFailed(format!("Connection failed: {:?}", err));
    }
    let err = err.into_service_error();
    if err.code() == Some(ACCESS_DENIED) {
        return ParameterError::AccessDenied(path.to_string());
    }
    match err {
        GetParametersByPathError::InvalidKeyId(_) => {
            ParameterError::AccessDenied("Invalid KMS key for secure parameter".to_string())
        }
        GetParametersByPathError::InvalidNextToken(_) => {
            ParameterError::RequestFailed(format!("Invalid continuation token for {path}"))
        }
        GetParametersByPathError::InternalServerError(_) => {
            ParameterError::RequestFailed("SSM internal server error".to_string())
        }
        err => ParameterError::RequestFailed(format!("GetParametersByPath failed: {:?}", err)),
    }
}
