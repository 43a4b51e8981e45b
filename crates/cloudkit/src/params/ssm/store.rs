//! SSM Parameter Store backend.

use async_trait::async_trait;
use aws_sdk_ssm::Client;

use cloudkit_core::params::{Parameter, ParameterBatch, ParameterPage, ParameterStore, Result};

use super::error::{map_get_parameters_by_path_error, map_get_parameters_error};

/// Parameter store backed by AWS Systems Manager.
#[derive(Debug, Clone)]
pub struct SsmParameterStore {
    client: Client,
}

impl SsmParameterStore {
    /// Creates a new store with the given SSM client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Creates a new store from a loaded AWS configuration.
    pub fn from_conf(config: &aws_config::SdkConfig) -> Self {
        Self::new(Client::new(config))
    }

    /// Creates a new store using the AWS SDK default credential chain.
    pub async fn from_env() -> Self {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self::from_conf(&config)
    }
}

fn to_parameter(parameter: &aws_sdk_ssm::types::Parameter) -> Option<Parameter> {
    Some(Parameter {
        name: parameter.name()?.to_string(),
        value: parameter.value().unwrap_or_default().to_string(),
    })
}

#[async_trait]
impl ParameterStore for SsmParameterStore {
    async fn get_parameters(&self, names: &[String], decrypt: bool) -> Result<ParameterBatch> {
        let output = self
            .client
            .get_parameters()
            .set_names(Some(names.to_vec()))
            .with_decryption(decrypt)
            .send()
            .await
            .map_err(map_get_parameters_error)?;

        Ok(ParameterBatch {
            parameters: output.parameters().iter().filter_map(to_parameter).collect(),
            invalid: output.invalid_parameters().to_vec(),
        })
    }

    async fn get_parameters_by_path(
        &self,
        path: &str,
        recursive: bool,
        decrypt: bool,
        next_token: Option<String>,
    ) -> Result<ParameterPage> {
        let output = self
            .client
            .get_parameters_by_path()
            .path(path)
            .recursive(recursive)
            .with_decryption(decrypt)
            .set_next_token(next_token)
            .send()
            .await
            .map_err(|e| map_get_parameters_by_path_error(e, path))?;

        Ok(ParameterPage {
            parameters: output.parameters().iter().filter_map(to_parameter).collect(),
            next_token: output.next_token().map(String::from),
        })
    }
}
