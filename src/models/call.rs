//! CRM phone-call records.

use serde_json::Value;

/// The identifiers needed to update a phone call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallRecord {
    /// CRM-internal phone call id
    pub id: String,
    /// `adminData.updatedOn`, sent back as `if-Match`
    pub concurrency_token: String,
    /// External display id the record was looked up by
    pub display_id: String,
}

impl CallRecord {
    /// Take the first element of a phone-call collection response.
    ///
    /// Returns `None` when the collection is empty or the first element lacks
    /// `id` or `adminData.updatedOn`.
    pub fn from_collection(collection: &Value, display_id: &str) -> Option<Self> {
        let first = collection.get("value")?.get(0)?;
        let id = first.get("id")?.as_str()?;
        let token = first.pointer("/adminData/updatedOn")?.as_str()?;

        Some(Self {
            id: id.to_string(),
            concurrency_token: token.to_string(),
            display_id: display_id.to_string(),
        })
    }
}

/// Result of looking up a phone call by display id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallLookup {
    /// A usable record was returned
    Found(CallRecord),
    /// The CRM answered, but without a usable record
    Missing,
    /// The CRM could not be reached or answered with an error
    Unavailable(String),
}
