//! Contact Lens analysis document.

use serde::Deserialize;

use crate::error::Result;

/// The parts of an analysis document the connector reads.
///
/// Every level is optional: the summary is written by a separate job and
/// may be missing while the rest of the document already exists.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AnalysisDocument {
    #[serde(default)]
    pub conversation_characteristics: Option<ConversationCharacteristics>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ConversationCharacteristics {
    #[serde(default)]
    pub contact_summary: Option<ContactSummary>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ContactSummary {
    #[serde(default)]
    pub post_contact_summary: Option<PostContactSummary>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PostContactSummary {
    #[serde(default)]
    pub content: Option<String>,
}

impl AnalysisDocument {
    /// Parse a downloaded document.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// `ConversationCharacteristics.ContactSummary.PostContactSummary.Content`,
    /// or an empty string when any level is absent.
    pub fn summary(&self) -> &str {
        self.conversation_characteristics
            .as_ref()
            .and_then(|c| c.contact_summary.as_ref())
            .and_then(|s| s.post_contact_summary.as_ref())
            .and_then(|p| p.content.as_deref())
            .unwrap_or_default()
    }
}

/// A located analysis document and the values taken from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisArtifact {
    /// Object key the document was read from
    pub key: String,
    /// Post-contact summary, possibly empty
    pub summary: String,
    /// Contact id the document belongs to
    pub correlation_id: String,
}
