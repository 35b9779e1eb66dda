//! Parameter and secret sources.
//!
//! - `FileParameters`: TOML file with `[parameters]` and `[secrets]` tables
//! - `AwsParameterStore`: SSM Parameter Store + Secrets Manager

#[cfg(feature = "aws")]
pub mod aws;
pub mod file;

use async_trait::async_trait;

use crate::error::Result;

#[cfg(feature = "aws")]
pub use aws::AwsParameterStore;
pub use file::FileParameters;

/// Source of plain parameters and secrets.
#[async_trait]
pub trait ParameterSource: Send + Sync {
    /// Value of a fully qualified parameter name.
    async fn get_parameter(&self, name: &str) -> Result<String>;

    /// Value of a secret by id.
    async fn get_secret(&self, secret_id: &str) -> Result<String>;
}
