// src/models/mod.rs

//! Domain models for the connector.
//!
//! Every value here lives for a single invocation.

mod artifact;
mod call;
mod config;
mod event;
mod response;

// Re-export all public types
pub use artifact::{AnalysisArtifact, AnalysisDocument};
pub use call::{CallLookup, CallRecord};
pub use config::{ConnectorConfig, HandlerSettings, ParameterNames, RetryPolicy};
pub use event::InboundEvent;
pub use response::HandlerResponse;
