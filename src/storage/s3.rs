//! AWS S3 artifact store.

use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::error::{ProvideErrorMetadata, SdkError};
use log::debug;

use crate::error::{AppError, Result};
use crate::storage::ArtifactStore;

/// S3-backed analysis document store.
#[derive(Clone)]
pub struct S3ArtifactStore {
    client: Client,
}

impl S3ArtifactStore {
    /// Create a new S3 store.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Create S3 store from the default AWS configuration chain.
    pub async fn from_env() -> Self {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self::new(Client::new(&config))
    }
}

#[async_trait]
impl ArtifactStore for S3ArtifactStore {
    async fn list_keys(&self, bucket: &str, prefix: &str) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        let mut continuation: Option<String> = None;

        loop {
            let output = self
                .client
                .list_objects_v2()
                .bucket(bucket)
                .prefix(prefix)
                .set_continuation_token(continuation.take())
                .send()
                .await
                .map_err(storage_error)?;

            keys.extend(
                output
                    .contents()
                    .iter()
                    .filter_map(|object| object.key().map(str::to_string)),
            );

            match output.next_continuation_token() {
                Some(token) => continuation = Some(token.to_string()),
                None => break,
            }
        }

        debug!("Listed {} keys under s3://{}/{}", keys.len(), bucket, prefix);
        keys.sort();
        Ok(keys)
    }

    async fn read_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        let output = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(storage_error)?;

        let bytes = output
            .body
            .collect()
            .await
            .map_err(|e| AppError::storage(500, e.to_string()))?;

        Ok(bytes.into_bytes().to_vec())
    }
}

/// Keep the HTTP status and message S3 reported.
///
/// Failures without an HTTP error status (timeouts, dispatch errors, a 200
/// response whose body could not be read) are reported as 500.
fn storage_error<E>(err: SdkError<E>) -> AppError
where
    E: ProvideErrorMetadata,
{
    let status = err
        .raw_response()
        .map(|response| response.status().as_u16())
        .filter(|status| *status >= 400)
        .unwrap_or(500);
    let message = err
        .message()
        .map(str::to_string)
        .unwrap_or_else(|| err.to_string());

    AppError::storage(status, message)
}
