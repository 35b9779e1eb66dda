// src/handler.rs

//! Post-call analytics event handler.
//!
//! One invocation runs:
//! 1. Validate the event and extract the contact id
//! 2. Resolve configuration from the parameter source
//! 3. Locate the analysis document and its summary
//! 4. Look up the CRM phone call and patch its transcript

use std::time::Duration;

use log::{error, info, warn};
use serde_json::Value;

use crate::config::ConfigLoader;
use crate::error::{AppError, Result};
use crate::models::{CallLookup, HandlerResponse, HandlerSettings, InboundEvent, ParameterNames};
use crate::parameters::ParameterSource;
use crate::services::{ArtifactLocator, CrmClient, Located};
use crate::storage::ArtifactStore;
use crate::utils::http::create_async_client;

/// What a successful pipeline run produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The phone call was updated; carries the CRM response body
    Updated(Value),
    /// No analysis document exists for the contact
    ArtifactNotFound { prefix: String },
    /// The CRM has no usable phone call for the contact
    CallNotFound { display_id: String },
}

impl Outcome {
    /// Map the outcome to the response envelope.
    pub fn into_response(self) -> HandlerResponse {
        match self {
            Self::Updated(body) => HandlerResponse::ok(&body),
            Self::ArtifactNotFound { prefix } => {
                HandlerResponse::not_found(format!("No matching object found in S3 for {prefix}"))
            }
            Self::CallNotFound { display_id } => HandlerResponse::not_found(format!(
                "No phone call found for display id {display_id}"
            )),
        }
    }
}

/// The connector pipeline over its two backends.
pub struct Connector<P, S> {
    names: ParameterNames,
    settings: HandlerSettings,
    parameters: P,
    store: S,
}

impl<P: ParameterSource, S: ArtifactStore> Connector<P, S> {
    pub fn new(names: ParameterNames, settings: HandlerSettings, parameters: P, store: S) -> Self {
        Self {
            names,
            settings,
            parameters,
            store,
        }
    }

    /// Handle one event, mapping every failure to a response.
    pub async fn handle(&self, payload: &Value) -> HandlerResponse {
        match self.process(payload).await {
            Ok(outcome) => outcome.into_response(),
            Err(e) => failure_response(&e),
        }
    }

    /// Handle one event, giving up once `budget` has elapsed.
    ///
    /// Dropping the pipeline future cancels whichever request or retry wait
    /// is pending.
    pub async fn handle_within(&self, payload: &Value, budget: Duration) -> HandlerResponse {
        match tokio::time::timeout(budget, self.process(payload)).await {
            Ok(Ok(outcome)) => outcome.into_response(),
            Ok(Err(e)) => failure_response(&e),
            Err(_) => failure_response(&AppError::DeadlineExceeded(budget)),
        }
    }

    /// Run the pipeline.
    pub async fn process(&self, payload: &Value) -> Result<Outcome> {
        let event = InboundEvent::parse(payload, &self.settings.rule_name)?;
        info!(
            "Processing {} event from {} for contact {} ({})",
            event.rule_name, event.time, event.correlation_id, event.contact_arn
        );

        let config = ConfigLoader::new(&self.parameters, &self.names).load().await?;
        info!("CRM base URL: {}", config.base_url);

        let locator =
            ArtifactLocator::new(&self.store, &config.bucket_name, self.settings.summary_retry);
        let artifact = match locator.locate(&event).await? {
            Located::Found(artifact) => artifact,
            Located::NotFound { prefix } => return Ok(Outcome::ArtifactNotFound { prefix }),
        };

        let client = create_async_client(&self.settings)?;
        let crm = CrmClient::new(&client, &config);

        let record = match crm.lookup(&artifact.correlation_id).await {
            CallLookup::Found(record) => record,
            CallLookup::Missing => {
                return Ok(Outcome::CallNotFound {
                    display_id: artifact.correlation_id,
                });
            }
            CallLookup::Unavailable(reason) => return Err(AppError::CrmUnavailable(reason)),
        };

        let updated = crm.update_transcript(&record, &artifact.summary).await?;
        info!("CRM response for phone call {}: {}", record.id, updated);

        Ok(Outcome::Updated(updated))
    }
}

/// Log a failure with its full detail and build the caller-facing response.
fn failure_response(err: &AppError) -> HandlerResponse {
    match err {
        AppError::Validation(_) => warn!("Error: {}", err),
        AppError::Http(_) | AppError::CrmUnavailable(_) => error!("Error: {}", err),
        _ => error!("Unexpected error: {}", err),
    }
    HandlerResponse::from_error(err)
}
