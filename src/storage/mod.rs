//! Object storage access for analysis documents.
//!
//! Contact Lens writes one JSON document per analyzed contact:
//!
//! ```text
//! {bucket}/
//! └── Analysis/
//!     └── Voice/
//!         └── YYYY/
//!             └── MM/
//!                 └── DD/
//!                     └── {contactId}_analysis_{timestamp}.json
//! ```

pub mod local;
#[cfg(feature = "aws")]
pub mod s3;

use async_trait::async_trait;

use crate::error::Result;

// Re-export for convenience
pub use local::LocalArtifactStore;
#[cfg(feature = "aws")]
pub use s3::S3ArtifactStore;

/// Read-only access to a bucket of analysis documents.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Every key in `bucket` starting with `prefix`, in ascending order.
    async fn list_keys(&self, bucket: &str, prefix: &str) -> Result<Vec<String>>;

    /// Full contents of an object.
    ///
    /// A missing object is a storage error, not an empty result.
    async fn read_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>>;
}
