//! Handler response envelope.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::AppError;

/// `{ statusCode, body }` returned to the invoker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandlerResponse {
    pub status_code: u16,
    /// Serialized JSON body
    pub body: String,
}

impl HandlerResponse {
    /// Successful response carrying the CRM's update result.
    pub fn ok(payload: &Value) -> Self {
        Self::with_body(200, payload)
    }

    /// Resource lookup came up empty.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::error_body(404, message.into())
    }

    /// Response for a failed invocation.
    pub fn from_error(err: &AppError) -> Self {
        Self::error_body(err.status_code(), err.public_message())
    }

    /// Body parsed back into JSON.
    pub fn body_json(&self) -> serde_json::Result<Value> {
        serde_json::from_str(&self.body)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    fn error_body(status_code: u16, message: String) -> Self {
        Self::with_body(status_code, &json!({ "error": message }))
    }

    fn with_body(status_code: u16, payload: &Value) -> Self {
        Self {
            status_code,
            body: payload.to_string(),
        }
    }
}
