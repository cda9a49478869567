use std::{
    future::Future,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::{
    config::{OutputConfig, StoreConfig},
    error::StorageError,
};

/// Destination for encoded output
pub trait ImageStore: Send + Sync + 'static {
    /// Human-readable name of the location, used in operator messages
    fn location(&self) -> String;

    /// Store `bytes` under `key` and return the public URL
    fn put(
        &self,
        key: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> impl Future<Output = Result<String, StorageError>> + Send;
}

/// Storage key for an upload made at `now`
pub fn storage_key(output: &OutputConfig, now: DateTime<Utc>) -> String {
    format!(
        "{}/branded_{}.{}",
        output.key_prefix.trim_end_matches('/'),
        now.timestamp_millis(),
        output.format.extension()
    )
}

/// Directory served under a public URL prefix.
///
/// The root must already exist; a missing root is reported as
/// [`StorageError::LocationMissing`] rather than created.
pub struct LocalDirStore {
    root: PathBuf,
    public_base_url: String,
}

impl LocalDirStore {
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self { root: root.into(), public_base_url: public_base_url.into() }
    }

    pub fn from_config(config: &StoreConfig) -> Self {
        Self::new(config.root.clone(), config.public_base_url.clone())
    }
}

impl ImageStore for LocalDirStore {
    fn location(&self) -> String {
        self.root.display().to_string()
    }

    async fn put(&self, key: &str, bytes: &[u8], content_type: &str) -> Result<String, StorageError> {
        if !tokio::fs::try_exists(&self.root).await.unwrap_or(false) {
            return Err(StorageError::LocationMissing { location: self.location() });
        }

        let relative = key.trim_start_matches('/');
        if relative.split('/').any(|part| part == "..") {
            return Err(StorageError::Rejected { reason: format!("key '{}' escapes the storage root", key) });
        }

        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        // readers only ever see complete objects
        let staging = staging_path(&path);
        if let Err(err) = tokio::fs::write(&staging, bytes).await {
            let _ = tokio::fs::remove_file(&staging).await;
            return Err(err.into());
        }
        tokio::fs::rename(&staging, &path).await?;
        debug!("Stored {} bytes of {} at {}", bytes.len(), content_type, path.display());

        Ok(format!("{}/{}", self.public_base_url.trim_end_matches('/'), relative))
    }
}

/// Hidden sibling of `path` that an upload is written to before it is renamed into place
fn staging_path(path: &Path) -> PathBuf {
    let name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    path.with_file_name(format!(".{}.partial", name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_storage_key_format() {
        let output = OutputConfig::default();
        let now = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        assert_eq!(storage_key(&output, now), "composites/branded_1700000000123.jpg");
    }

    #[tokio::test]
    async fn test_put_writes_and_returns_public_url() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalDirStore::new(dir.path(), "https://cdn.test/images/");

        let url = store.put("composites/branded_1.png", b"png", "image/png").await.unwrap();
        assert_eq!(url, "https://cdn.test/images/composites/branded_1.png");
        assert_eq!(std::fs::read(dir.path().join("composites/branded_1.png")).unwrap(), b"png");
    }

    #[tokio::test]
    async fn test_put_leaves_no_staging_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalDirStore::new(dir.path(), "https://cdn.test");

        store.put("composites/branded_2.jpg", b"jpeg", "image/jpeg").await.unwrap();
        let names: Vec<String> = std::fs::read_dir(dir.path().join("composites"))
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["branded_2.jpg".to_string()]);
    }

    #[test]
    fn test_staging_path_is_a_hidden_sibling() {
        let staged = staging_path(Path::new("/srv/out/composites/branded_3.png"));
        assert_eq!(staged, Path::new("/srv/out/composites/.branded_3.png.partial"));
    }

    #[tokio::test]
    async fn test_missing_root_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalDirStore::new(dir.path().join("absent"), "https://cdn.test");

        let err = store.put("a.png", b"x", "image/png").await.unwrap_err();
        assert!(matches!(err, StorageError::LocationMissing { ref location } if location.ends_with("absent")));
    }

    #[tokio::test]
    async fn test_rejects_escaping_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalDirStore::new(dir.path(), "https://cdn.test");
        let err = store.put("../evil.png", b"x", "image/png").await.unwrap_err();
        assert!(matches!(err, StorageError::Rejected { .. }));
    }
}
