//! Local filesystem artifact store.
//!
//! Mirrors the bucket layout on disk for replaying events without AWS.
//!
//! ## Storage Layout
//!
//! ```text
//! {root}/
//! └── {bucket}/
//!     └── Analysis/Voice/YYYY/MM/DD/{contactId}_analysis_{timestamp}.json
//! ```

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::storage::ArtifactStore;

/// Local filesystem storage backend.
#[derive(Debug, Clone)]
pub struct LocalArtifactStore {
    root_dir: PathBuf,
}

impl LocalArtifactStore {
    /// Create a new store rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    /// Get the full path for a key inside a bucket.
    fn path(&self, bucket: &str, key: &str) -> PathBuf {
        self.root_dir.join(bucket).join(key)
    }

    /// Write bytes atomically (write to temp, then rename).
    pub async fn put_object(&self, bucket: &str, key: &str, bytes: &[u8]) -> Result<()> {
        let path = self.path(bucket, key);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let tmp = path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }

    /// Deepest directory that can contain keys starting with `prefix`.
    fn search_root(bucket_dir: &Path, prefix: &str) -> PathBuf {
        match prefix.rfind('/') {
            Some(idx) => bucket_dir.join(&prefix[..idx]),
            None => bucket_dir.to_path_buf(),
        }
    }
}

#[async_trait]
impl ArtifactStore for LocalArtifactStore {
    async fn list_keys(&self, bucket: &str, prefix: &str) -> Result<Vec<String>> {
        let bucket_dir = self.root_dir.join(bucket);
        if !tokio::fs::try_exists(&bucket_dir).await? {
            return Err(AppError::storage(404, "The specified bucket does not exist"));
        }

        let mut keys = Vec::new();
        let mut pending = vec![Self::search_root(&bucket_dir, prefix)];

        while let Some(dir) = pending.pop() {
            let mut entries = match tokio::fs::read_dir(&dir).await {
                Ok(entries) => entries,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => return Err(AppError::Io(e)),
            };

            while let Some(entry) = entries.next_entry().await? {
                let path = entry.path();
                if entry.file_type().await?.is_dir() {
                    pending.push(path);
                    continue;
                }

                let Ok(relative) = path.strip_prefix(&bucket_dir) else {
                    continue;
                };
                let key = relative
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy())
                    .collect::<Vec<_>>()
                    .join("/");

                if key.starts_with(prefix) && !key.ends_with(".tmp") {
                    keys.push(key);
                }
            }
        }

        keys.sort();
        Ok(keys)
    }

    async fn read_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        match tokio::fs::read(self.path(bucket, key)).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(AppError::storage(404, "The specified key does not exist."))
            }
            Err(e) => Err(AppError::Io(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const BUCKET: &str = "connect-bucket";

    #[tokio::test]
    async fn test_write_and_read() {
        let tmp = TempDir::new().unwrap();
        let store = LocalArtifactStore::new(tmp.path());

        store.put_object(BUCKET, "a/b.json", b"hello").await.unwrap();
        let data = store.read_object(BUCKET, "a/b.json").await.unwrap();
        assert_eq!(data, b"hello".to_vec());
    }

    #[tokio::test]
    async fn test_read_nonexistent() {
        let tmp = TempDir::new().unwrap();
        let store = LocalArtifactStore::new(tmp.path());

        let err = store.read_object(BUCKET, "nope.json").await.unwrap_err();
        assert_eq!(err.status_code(), 404);
    }

    #[tokio::test]
    async fn test_list_by_partial_file_name() {
        let tmp = TempDir::new().unwrap();
        let store = LocalArtifactStore::new(tmp.path());
        let day = "Analysis/Voice/2024/05/01";

        for name in [
            "abc123_analysis_2024-05-01T10:05:00Z.json",
            "abc123_analysis_2024-05-01T10:01:00Z.json",
            "xyz999_analysis_2024-05-01T10:02:00Z.json",
        ] {
            store
                .put_object(BUCKET, &format!("{day}/{name}"), b"{}")
                .await
                .unwrap();
        }

        let keys = store
            .list_keys(BUCKET, &format!("{day}/abc123_analysis_"))
            .await
            .unwrap();

        assert_eq!(
            keys,
            vec![
                format!("{day}/abc123_analysis_2024-05-01T10:01:00Z.json"),
                format!("{day}/abc123_analysis_2024-05-01T10:05:00Z.json"),
            ]
        );
    }

    #[tokio::test]
    async fn test_list_nested_keys() {
        let tmp = TempDir::new().unwrap();
        let store = LocalArtifactStore::new(tmp.path());

        store
            .put_object(BUCKET, "Analysis/Voice/2024/05/01/a.json", b"{}")
            .await
            .unwrap();
        store
            .put_object(BUCKET, "Analysis/Voice/2024/06/02/b.json", b"{}")
            .await
            .unwrap();
        store.put_object(BUCKET, "Other/c.json", b"{}").await.unwrap();

        let keys = store.list_keys(BUCKET, "Analysis/Voice/2024/").await.unwrap();
        assert_eq!(keys.len(), 2);
    }

    #[tokio::test]
    async fn test_list_missing_prefix_dir_is_empty() {
        let tmp = TempDir::new().unwrap();
        let store = LocalArtifactStore::new(tmp.path());
        store.put_object(BUCKET, "Other/c.json", b"{}").await.unwrap();

        let keys = store
            .list_keys(BUCKET, "Analysis/Voice/2024/05/01/abc123_analysis_")
            .await
            .unwrap();
        assert!(keys.is_empty());
    }

    #[tokio::test]
    async fn test_list_missing_bucket() {
        let tmp = TempDir::new().unwrap();
        let store = LocalArtifactStore::new(tmp.path());

        let err = store.list_keys("no-such-bucket", "x").await.unwrap_err();
        assert!(matches!(err, AppError::Storage { status: 404, .. }));
    }
}
