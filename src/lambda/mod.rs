// src/lambda/mod.rs

//! AWS Lambda handler for the connector.
//!
//! ## Environment Variables
//!
//! - `SSM_PARAM_ROOT_NAME`: root of the parameter hierarchy (required)
//! - `ENVIRONMENT_NAME`: deployment environment (default: `poc`)
//! - `SSM_PARAM_C4C_BASE_URL`, `SSM_PARAM_C4C_PHONE_SERVICE_ENDPOINT_PATH`,
//!   `SSM_PARAM_C4C_USERNAME`, `SSM_PARAM_BUCKET_NAME`: parameter names
//! - `SECRET_PARAM_C4C_PASSWORD`: secret id of the CRM password
//! - `EVENT_RULE_NAME`: accepted rule name (default: `SAPPostCallAnalytics`)
//! - `SUMMARY_RETRY_ATTEMPTS`, `SUMMARY_RETRY_DELAY_SECS`: summary polling
//! - `CRM_TIMEOUT_SECS`: CRM request timeout
//! - `RUST_LOG`: log level (e.g., `info`, `debug`)

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use lambda_runtime::{Error as LambdaError, LambdaEvent};
use serde_json::Value;
use tracing::{info, instrument};

use crate::handler::Connector;
use crate::models::{HandlerResponse, HandlerSettings, ParameterNames};
use crate::parameters::AwsParameterStore;
use crate::storage::S3ArtifactStore;

/// Time reserved for returning the response after the pipeline is cut off.
const DEADLINE_MARGIN: Duration = Duration::from_millis(500);

/// Connector wired to SSM, Secrets Manager and S3.
pub type AwsConnector = Connector<AwsParameterStore, S3ArtifactStore>;

/// Build the connector from the process environment.
///
/// SDK clients are shared across invocations; parameter values are not.
pub async fn build_connector() -> crate::error::Result<AwsConnector> {
    let names = ParameterNames::from_env()?;
    let settings = HandlerSettings::from_env();
    settings.validate()?;

    let sdk_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let parameters = AwsParameterStore::from_sdk_config(&sdk_config);
    let store = S3ArtifactStore::new(aws_sdk_s3::Client::new(&sdk_config));

    info!(
        "Connector configured under {} for rule {}",
        names.prefix(),
        settings.rule_name
    );
    Ok(Connector::new(names, settings, parameters, store))
}

/// Main Lambda handler function.
#[instrument(skip(event, connector), fields(request_id = %event.context.request_id))]
pub async fn handler(
    event: LambdaEvent<Value>,
    connector: &AwsConnector,
) -> std::result::Result<HandlerResponse, LambdaError> {
    let (payload, context) = event.into_parts();
    info!("Received event: {}", payload);

    let response = match remaining_budget(context.deadline, SystemTime::now()) {
        Some(budget) => connector.handle_within(&payload, budget).await,
        None => connector.handle(&payload).await,
    };

    info!("Responding with status {}", response.status_code);
    Ok(response)
}

/// Time left before the invocation deadline, minus the safety margin.
///
/// `deadline_ms` is milliseconds since the Unix epoch; zero means unknown.
fn remaining_budget(deadline_ms: u64, now: SystemTime) -> Option<Duration> {
    if deadline_ms == 0 {
        return None;
    }
    let now_ms = now.duration_since(UNIX_EPOCH).ok()?.as_millis() as u64;
    let remaining = Duration::from_millis(deadline_ms.saturating_sub(now_ms));
    Some(remaining.saturating_sub(DEADLINE_MARGIN))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remaining_budget() {
        let now = UNIX_EPOCH + Duration::from_secs(1_000);
        let deadline = 1_000_000 + 300_000;

        assert_eq!(
            remaining_budget(deadline, now),
            Some(Duration::from_millis(299_500))
        );
    }

    #[test]
    fn test_remaining_budget_past_deadline() {
        let now = UNIX_EPOCH + Duration::from_secs(2_000);
        assert_eq!(remaining_budget(1_000_000, now), Some(Duration::ZERO));
    }

    #[test]
    fn test_remaining_budget_unknown_deadline() {
        assert_eq!(remaining_budget(0, SystemTime::now()), None);
    }
}
