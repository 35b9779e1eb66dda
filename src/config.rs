// src/config.rs

//! Configuration loading.
//!
//! Resolves the CRM endpoint, credentials and bucket name from a parameter
//! source once per invocation.

use log::info;

use crate::error::Result;
use crate::models::{ConnectorConfig, ParameterNames};
use crate::parameters::ParameterSource;
use crate::utils::ensure_trailing_slash;

/// Path segment of the phone call collection below the phone service.
const PHONE_CALLS_SEGMENT: &str = "phoneCalls";

/// Config loader over any parameter source.
pub struct ConfigLoader<'a, P: ParameterSource + ?Sized> {
    source: &'a P,
    names: &'a ParameterNames,
}

impl<'a, P: ParameterSource + ?Sized> ConfigLoader<'a, P> {
    pub fn new(source: &'a P, names: &'a ParameterNames) -> Self {
        Self { source, names }
    }

    async fn load_parameter(&self, name: &str) -> Result<String> {
        let qualified = self.names.qualified(name);
        info!("Loading parameter {}", qualified);
        self.source.get_parameter(&qualified).await
    }

    /// Resolve every value the connector needs.
    ///
    /// Fails on the first missing parameter or secret.
    pub async fn load(&self) -> Result<ConnectorConfig> {
        let base_url = ensure_trailing_slash(&self.load_parameter(&self.names.base_url).await?);
        let phone_service_path =
            ensure_trailing_slash(&self.load_parameter(&self.names.phone_service_path).await?);
        let username = self.load_parameter(&self.names.username).await?;

        info!("Loading secret {}", self.names.password_secret);
        let password = self.source.get_secret(&self.names.password_secret).await?;

        let bucket_name = self.load_parameter(&self.names.bucket_name).await?;

        Ok(ConnectorConfig {
            phone_call_path: format!("{phone_service_path}{PHONE_CALLS_SEGMENT}"),
            base_url,
            phone_service_path,
            username,
            password,
            bucket_name,
        })
    }
}
