//! Services used by the connector pipeline.
//!
//! - `ArtifactLocator`: finds the analysis document and its summary
//! - `CrmClient`: looks up and updates phone calls in the CRM

pub mod crm;
pub mod locator;

pub use crm::CrmClient;
pub use locator::{ArtifactLocator, Located};
