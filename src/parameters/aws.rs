//! SSM Parameter Store and Secrets Manager.

use async_trait::async_trait;
use aws_sdk_secretsmanager::Client as SecretsClient;
use aws_sdk_ssm::Client as SsmClient;

use crate::error::{AppError, Result};
use crate::parameters::ParameterSource;

/// Parameters from SSM, secrets from Secrets Manager.
#[derive(Clone)]
pub struct AwsParameterStore {
    ssm: SsmClient,
    secrets: SecretsClient,
}

impl AwsParameterStore {
    pub fn new(ssm: SsmClient, secrets: SecretsClient) -> Self {
        Self { ssm, secrets }
    }

    /// Create both clients from a shared AWS configuration.
    pub fn from_sdk_config(config: &aws_config::SdkConfig) -> Self {
        Self::new(SsmClient::new(config), SecretsClient::new(config))
    }

    /// Create both clients from the default AWS configuration chain.
    pub async fn from_env() -> Self {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self::from_sdk_config(&config)
    }
}

#[async_trait]
impl ParameterSource for AwsParameterStore {
    async fn get_parameter(&self, name: &str) -> Result<String> {
        let output = self
            .ssm
            .get_parameter()
            .name(name)
            .send()
            .await
            .map_err(|e| AppError::parameter(name, aws_sdk_ssm::error::DisplayErrorContext(e)))?;

        output
            .parameter()
            .and_then(|p| p.value())
            .map(str::to_string)
            .ok_or_else(|| AppError::parameter(name, "parameter has no value"))
    }

    async fn get_secret(&self, secret_id: &str) -> Result<String> {
        let output = self
            .secrets
            .get_secret_value()
            .secret_id(secret_id)
            .send()
            .await
            .map_err(|e| {
                AppError::parameter(
                    secret_id,
                    aws_sdk_secretsmanager::error::DisplayErrorContext(e),
                )
            })?;

        output
            .secret_string()
            .map(str::to_string)
            .ok_or_else(|| AppError::parameter(secret_id, "secret has no string value"))
    }
}
