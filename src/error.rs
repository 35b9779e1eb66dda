// src/error.rs

//! Unified error handling for the connector.

use std::fmt;

use thiserror::Error;

/// Result type alias for connector operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Message returned to the caller for CRM transport failures.
pub const EXTERNAL_SERVICE_MESSAGE: &str = "Error communicating with external service";

/// Message returned to the caller for everything without a dedicated mapping.
pub const UNEXPECTED_MESSAGE: &str = "Unexpected error occurred";

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// Business-rule rejection of the inbound event
    #[error("{0}")]
    Validation(String),

    /// Inbound event is missing fields or carries malformed values
    #[error("Malformed event: {0}")]
    Event(String),

    /// Process configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Parameter store or secret store lookup failed
    #[error("Parameter error for {name}: {message}")]
    Parameter { name: String, message: String },

    /// Object storage backend reported a failure
    #[error("Storage error ({status}): {message}")]
    Storage { status: u16, message: String },

    /// CRM lookup could not produce a usable response
    #[error("CRM unavailable: {0}")]
    CrmUnavailable(String),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// A locally driven invocation answered with a non-success status
    #[error("Invocation finished with status {0}")]
    Unsuccessful(u16),

    /// The invocation ran out of time
    #[error("Invocation deadline exceeded after {0:?}")]
    DeadlineExceeded(std::time::Duration),
}

impl AppError {
    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a malformed-event error.
    pub fn event(message: impl Into<String>) -> Self {
        Self::Event(message.into())
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a parameter lookup error.
    pub fn parameter(name: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Parameter {
            name: name.into(),
            message: message.to_string(),
        }
    }

    /// Create a storage error carrying the backend's HTTP status.
    pub fn storage(status: u16, message: impl Into<String>) -> Self {
        Self::Storage {
            status,
            message: message.into(),
        }
    }

    /// HTTP status code reported to the caller.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::Storage { status, .. } if *status >= 400 => *status,
            _ => 500,
        }
    }

    /// Message safe to echo back to the caller.
    ///
    /// Transport and unexpected failures are reduced to a generic message;
    /// their detail only reaches the logs.
    pub fn public_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Storage { message, .. } => message.clone(),
            Self::Http(_) | Self::CrmUnavailable(_) => EXTERNAL_SERVICE_MESSAGE.to_string(),
            _ => UNEXPECTED_MESSAGE.to_string(),
        }
    }
}
