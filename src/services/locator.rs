// src/services/locator.rs

//! Analysis document locator.
//!
//! Finds a contact's analysis document and waits for its post-contact
//! summary. The summary can land after the document itself (notably on
//! transferred calls), so an empty summary is polled a bounded number of
//! times before the connector moves on with what it has.

use log::{info, warn};

use crate::error::Result;
use crate::models::{AnalysisArtifact, AnalysisDocument, InboundEvent, RetryPolicy};
use crate::storage::ArtifactStore;

/// Outcome of a locate call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Located {
    Found(AnalysisArtifact),
    /// No object exists under the prefix
    NotFound { prefix: String },
}

/// Service locating analysis documents in one bucket.
pub struct ArtifactLocator<'a, S: ArtifactStore + ?Sized> {
    store: &'a S,
    bucket: &'a str,
    retry: RetryPolicy,
}

impl<'a, S: ArtifactStore + ?Sized> ArtifactLocator<'a, S> {
    pub fn new(store: &'a S, bucket: &'a str, retry: RetryPolicy) -> Self {
        Self {
            store,
            bucket,
            retry,
        }
    }

    /// Locate the analysis document for an event and extract its summary.
    ///
    /// When several documents share the prefix, the lexicographically
    /// greatest key wins; keys end in the analysis timestamp, so that is the
    /// newest one.
    pub async fn locate(&self, event: &InboundEvent) -> Result<Located> {
        let prefix = event.analysis_prefix();
        info!("Processed prefix: {}", prefix);

        let keys = self.store.list_keys(self.bucket, &prefix).await?;
        let Some(key) = keys.into_iter().max() else {
            warn!("No analysis document under s3://{}/{}", self.bucket, prefix);
            return Ok(Located::NotFound { prefix });
        };
        info!("Found object with key: {}", key);

        let summary = self.read_summary(&key).await?;
        info!(
            "Summary of {} characters for contact {}",
            summary.chars().count(),
            event.correlation_id
        );

        Ok(Located::Found(AnalysisArtifact {
            key,
            summary,
            correlation_id: event.correlation_id.clone(),
        }))
    }

    /// Read the summary, re-reading the object while it is empty.
    async fn read_summary(&self, key: &str) -> Result<String> {
        let mut summary = self.fetch_summary(key).await?;
        let mut attempt = 0;

        while summary.is_empty() && attempt < self.retry.attempts {
            attempt += 1;
            info!(
                "Summary empty, re-reading in {:?} (attempt {}/{})",
                self.retry.delay, attempt, self.retry.attempts
            );
            tokio::time::sleep(self.retry.delay).await;
            summary = self.fetch_summary(key).await?;
        }

        if summary.is_empty() {
            warn!(
                "Summary still empty after {} re-reads of {}; continuing without it",
                self.retry.attempts, key
            );
        }

        Ok(summary)
    }

    async fn fetch_summary(&self, key: &str) -> Result<String> {
        let bytes = self.store.read_object(self.bucket, key).await?;
        let document = AnalysisDocument::from_slice(&bytes)?;
        Ok(document.summary().to_string())
    }
}
