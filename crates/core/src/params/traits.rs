use async_trait::async_trait;

use super::{ParameterBatch, ParameterPage, Result};

/// A remote store of named configuration values.
#[async_trait]
pub trait ParameterStore: Send + Sync {
    /// Resolves at most `GET_PARAMETERS_LIMIT` names in one request.
    async fn get_parameters(&self, names: &[String], decrypt: bool) -> Result<ParameterBatch>;

    /// Lists one page of the parameters under `path`.
    async fn get_parameters_by_path(
        &self,
        path: &str,
        recursive: bool,
        decrypt: bool,
        next_token: Option<String>,
    ) -> Result<ParameterPage>;
}
