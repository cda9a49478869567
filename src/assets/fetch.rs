use std::future::Future;

use tracing::{debug, warn};
use url::Url;

use crate::{
    config::FetchConfig,
    error::{ConfigError, FetchError, ImageRole, Result},
};

/// Source of image bytes
pub trait ImageSource: Send + Sync + 'static {
    /// Fetch the bytes behind `url`. One attempt; the first failure is final.
    fn fetch(&self, url: &Url, role: ImageRole) -> impl Future<Output = std::result::Result<Vec<u8>, FetchError>> + Send;
}

/// Fetches over HTTP(S) with an identifying user agent, and reads `file://`
/// references from disk
pub struct HttpImageSource {
    client: reqwest::Client,
}

impl HttpImageSource {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout())
            .build()
            .map_err(|e| ConfigError::InvalidValue {
                key: "fetch".to_string(),
                value: e.to_string(),
            })?;
        Ok(Self { client })
    }

    async fn fetch_local(url: &Url, role: ImageRole) -> std::result::Result<Vec<u8>, FetchError> {
        let path = url.to_file_path().map_err(|_| FetchError::LocalReadFailed {
            role,
            path: url.to_string(),
            reason: "not a local path".to_string(),
        })?;

        tokio::fs::read(&path).await.map_err(|e| FetchError::LocalReadFailed {
            role,
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    async fn fetch_remote(&self, url: &Url, role: ImageRole) -> std::result::Result<Vec<u8>, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| FetchError::RequestFailed { role, reason: e.to_string() })?;

        let status = response.status();
        if !status.is_success() {
            warn!("Fetching {} returned {}", role, status);
            return Err(FetchError::BadStatus { role, status: status.as_u16() });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::ReadFailed { role, reason: e.to_string() })?;
        Ok(body.to_vec())
    }
}

impl ImageSource for HttpImageSource {
    async fn fetch(&self, url: &Url, role: ImageRole) -> std::result::Result<Vec<u8>, FetchError> {
        debug!("Fetching {} from {}", role, url);
        let bytes = match url.scheme() {
            "file" => Self::fetch_local(url, role).await?,
            _ => self.fetch_remote(url, role).await?,
        };
        debug!("Fetched {} bytes for {}", bytes.len(), role);
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reads_file_references() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("base.png");
        std::fs::write(&path, b"not really a png").unwrap();

        let source = HttpImageSource::new(&FetchConfig::default()).unwrap();
        let url = Url::from_file_path(&path).unwrap();
        let bytes = source.fetch(&url, ImageRole::Base).await.unwrap();
        assert_eq!(bytes, b"not really a png");
    }

    #[tokio::test]
    async fn test_missing_file_keeps_role() {
        let dir = tempfile::tempdir().unwrap();
        let url = Url::from_file_path(dir.path().join("missing.png")).unwrap();

        let source = HttpImageSource::new(&FetchConfig::default()).unwrap();
        let err = source.fetch(&url, ImageRole::Overlay).await.unwrap_err();
        assert!(matches!(err, FetchError::LocalReadFailed { role: ImageRole::Overlay, .. }));
    }
}
