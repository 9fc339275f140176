//! HTTP client for the image hosting provider
//!
//! Uploads avatar images and deletes replaced assets by provider id.
//! Uploads must succeed; deletion is wired as best-effort by the calling
//! service.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

use sgms_core::services::users::{ImageHost, UploadedImage};
use sgms_shared::config::ImageHostConfig;

use crate::InfrastructureError;

/// Image host backed by the provider's HTTP API
pub struct HttpImageHost {
    client: reqwest::Client,
    config: ImageHostConfig,
}

/// Provider response for an uploaded asset
#[derive(Debug, Deserialize)]
struct UploadResponse {
    asset_id: String,
    url: String,
}

impl HttpImageHost {
    /// Create a new image host client
    pub fn new(config: ImageHostConfig) -> Result<Self, InfrastructureError> {
        if config.api_url.is_empty() {
            return Err(InfrastructureError::Config(
                "IMAGE_HOST_API_URL not set".to_string(),
            ));
        }
        if config.api_key.is_empty() {
            return Err(InfrastructureError::Config(
                "IMAGE_HOST_API_KEY not set".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| InfrastructureError::Config(format!("HTTP client build failed: {e}")))?;

        info!(folder = config.folder, "image host client initialized");
        Ok(Self { client, config })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.api_url.trim_end_matches('/'), path)
    }
}

#[async_trait]
impl ImageHost for HttpImageHost {
    async fn upload(&self, bytes: &[u8], content_type: &str) -> Result<UploadedImage, String> {
        let response = self
            .client
            .post(self.endpoint("assets"))
            .bearer_auth(&self.config.api_key)
            .query(&[("folder", self.config.folder.as_str())])
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes.to_vec())
            .send()
            .await
            .map_err(|e| format!("upload request failed: {e}"))?;

        if !response.status().is_success() {
            return Err(format!("upload rejected: {}", response.status()));
        }

        let parsed: UploadResponse = response
            .json()
            .await
            .map_err(|e| format!("invalid upload response: {e}"))?;

        debug!(asset_id = parsed.asset_id, "image uploaded");
        Ok(UploadedImage {
            url: parsed.url,
            asset_id: parsed.asset_id,
        })
    }

    async fn delete(&self, asset_id: &str) -> Result<(), String> {
        let response = self
            .client
            .delete(self.endpoint(&format!("assets/{asset_id}")))
            .bearer_auth(&self.config.api_key)
            .send()
            .await
            .map_err(|e| format!("delete request failed: {e}"))?;

        // 404 counts as deleted; the asset is gone either way
        if response.status().is_success() || response.status() == reqwest::StatusCode::NOT_FOUND {
            debug!(asset_id, "image deleted");
            return Ok(());
        }

        Err(format!("delete rejected: {}", response.status()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_missing_configuration() {
        let config = ImageHostConfig {
            provider: "http".to_string(),
            ..ImageHostConfig::default()
        };
        assert!(HttpImageHost::new(config).is_err());
    }
}
