//! Inbound contact-analysis event.

use chrono::NaiveDate;
use serde_json::Value;

use crate::error::{AppError, Result};

/// A validated "post-call analytics ready" event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundEvent {
    pub rule_name: String,
    /// Event time as delivered, e.g. `2024-05-01T10:00:00Z`
    pub time: String,
    pub contact_arn: String,
    /// Contact id, the last segment of the contact ARN
    pub correlation_id: String,
    /// Calendar date taken from the first ten characters of `time`
    pub date: NaiveDate,
}

impl InboundEvent {
    /// Parse and validate an event payload.
    ///
    /// The rule name is checked before anything else is read, so an event for
    /// a different rule is rejected as a validation error even when the rest
    /// of its payload is unusable.
    pub fn parse(payload: &Value, accepted_rule: &str) -> Result<Self> {
        let rule_name = required_str(payload, "/detail/ruleName")?;
        if rule_name != accepted_rule {
            return Err(AppError::validation(format!(
                "Unsupported ruleName: {rule_name}"
            )));
        }

        let time = required_str(payload, "/time")?;
        let contact_arn = required_str(payload, "/detail/contactArn")?;

        let correlation_id = contact_arn.rsplit('/').next().unwrap_or_default();
        if correlation_id.is_empty() {
            return Err(AppError::event(format!(
                "contactArn has no contact id: {contact_arn}"
            )));
        }

        let date = time
            .get(..10)
            .and_then(|day| NaiveDate::parse_from_str(day, "%Y-%m-%d").ok())
            .ok_or_else(|| AppError::event(format!("time is not an ISO-8601 date: {time}")))?;

        Ok(Self {
            rule_name: rule_name.to_string(),
            time: time.to_string(),
            contact_arn: contact_arn.to_string(),
            correlation_id: correlation_id.to_string(),
            date,
        })
    }

    /// Key prefix of the contact's analysis documents.
    pub fn analysis_prefix(&self) -> String {
        format!(
            "Analysis/Voice/{}/{}_analysis_",
            self.date.format("%Y/%m/%d"),
            self.correlation_id
        )
    }
}

fn required_str<'a>(payload: &'a Value, pointer: &str) -> Result<&'a str> {
    payload
        .pointer(pointer)
        .and_then(Value::as_str)
        .ok_or_else(|| AppError::event(format!("missing string field {pointer}")))
}
