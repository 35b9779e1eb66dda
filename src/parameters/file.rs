//! File-backed parameters for local runs.
//!
//! ```toml
//! [parameters]
//! "/my-connect/poc/c4c-base-url" = "https://my000000.crm.ondemand.com"
//! "/my-connect/poc/c4c-phone-service-endpoint-path" = "/sap/c4c/api/v1/phone-service/"
//! "/my-connect/poc/c4c-username" = "CONNECT_USER"
//! "/my-connect/poc/connect-bucket-name" = "connect-bucket"
//!
//! [secrets]
//! "Secret-c4c-password" = "..."
//! ```

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::parameters::ParameterSource;

/// Parameters and secrets held in memory.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileParameters {
    #[serde(default)]
    parameters: HashMap<String, String>,
    #[serde(default)]
    secrets: HashMap<String, String>,
}

impl FileParameters {
    /// Load parameters from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse parameters from TOML text.
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Add or replace a parameter.
    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }

    /// Add or replace a secret.
    pub fn with_secret(mut self, id: impl Into<String>, value: impl Into<String>) -> Self {
        self.secrets.insert(id.into(), value.into());
        self
    }
}

#[async_trait]
impl ParameterSource for FileParameters {
    async fn get_parameter(&self, name: &str) -> Result<String> {
        self.parameters
            .get(name)
            .cloned()
            .ok_or_else(|| AppError::parameter(name, "ParameterNotFound"))
    }

    async fn get_secret(&self, secret_id: &str) -> Result<String> {
        self.secrets
            .get(secret_id)
            .cloned()
            .ok_or_else(|| AppError::parameter(secret_id, "ResourceNotFoundException"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_from_toml() {
        let params = FileParameters::from_toml(
            r#"
            [parameters]
            "/inst/poc/c4c-username" = "CONNECT_USER"

            [secrets]
            "Secret-c4c-password" = "s3cret"
            "#,
        )
        .unwrap();

        assert_eq!(
            params.get_parameter("/inst/poc/c4c-username").await.unwrap(),
            "CONNECT_USER"
        );
        assert_eq!(params.get_secret("Secret-c4c-password").await.unwrap(), "s3cret");
    }

    #[tokio::test]
    async fn test_missing_entries() {
        let params = FileParameters::default().with_parameter("/a/b/c", "x");

        assert!(params.get_parameter("/a/b/d").await.is_err());
        assert!(matches!(
            params.get_secret("nope").await,
            Err(AppError::Parameter { .. })
        ));
    }

    #[test]
    fn test_load_from_file() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), "[secrets]\n\"pw\" = \"x\"\n").unwrap();

        let params = FileParameters::load(tmp.path()).unwrap();
        assert_eq!(params.secrets.get("pw").map(String::as_str), Some("x"));
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            FileParameters::from_toml("[parameters"),
            Err(AppError::Toml(_))
        ));
    }
}
