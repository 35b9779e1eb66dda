// src/services/crm.rs

//! SAP Sales and Service Cloud phone-call client.

use log::{error, info};
use reqwest::Client;
use serde_json::{Value, json};

use crate::error::Result;
use crate::models::{CallLookup, CallRecord, ConnectorConfig};
use crate::utils::http::join_url;

/// Conditional-update precondition header.
const IF_MATCH: &str = "if-Match";

/// Client for the phone call collection of the phone service.
pub struct CrmClient<'a> {
    client: &'a Client,
    config: &'a ConnectorConfig,
}

impl<'a> CrmClient<'a> {
    pub fn new(client: &'a Client, config: &'a ConnectorConfig) -> Self {
        Self { client, config }
    }

    /// Find the phone call whose external display id matches the contact.
    ///
    /// Never fails: transport errors, error statuses and unreadable bodies
    /// come back as [`CallLookup::Unavailable`].
    pub async fn lookup(&self, display_id: &str) -> CallLookup {
        let collection = match self.fetch_collection(display_id).await {
            Ok(collection) => collection,
            Err(e) => {
                error!("Error fetching call record for {}: {}", display_id, e);
                return CallLookup::Unavailable(e.to_string());
            }
        };

        match CallRecord::from_collection(&collection, display_id) {
            Some(record) => {
                info!(
                    "Phone call {} matches display id {}",
                    record.id, display_id
                );
                CallLookup::Found(record)
            }
            None => {
                error!(
                    "Error extracting call details for {}: {}",
                    display_id, collection
                );
                CallLookup::Missing
            }
        }
    }

    async fn fetch_collection(&self, display_id: &str) -> Result<Value> {
        let url = join_url(&self.config.base_url, &self.config.phone_call_path)?;
        let filter = format!("externalId.displayId eq '{display_id}'");

        let response = self
            .client
            .get(url)
            .basic_auth(&self.config.username, Some(&self.config.password))
            .query(&[("$filter", filter.as_str())])
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json().await?)
    }

    /// Write the summary to the phone call's transcript.
    ///
    /// The record's concurrency token guards the write; a stale token is
    /// rejected by the CRM and surfaces as an HTTP error like any other
    /// error status. An empty success body is returned as `null`.
    pub async fn update_transcript(&self, record: &CallRecord, transcript: &str) -> Result<Value> {
        let path = format!("{}/{}", self.config.phone_call_path, record.id);
        let url = join_url(&self.config.base_url, &path)?;

        let response = self
            .client
            .patch(url)
            .basic_auth(&self.config.username, Some(&self.config.password))
            .header(IF_MATCH, &record.concurrency_token)
            .json(&json!({ "transcript": transcript }))
            .send()
            .await?
            .error_for_status()?;

        info!(
            "Updated transcript of phone call {} (display id {})",
            record.id, record.display_id
        );

        let body = response.text().await?;
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&body)?)
    }
}
