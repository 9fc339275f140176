//! Mock image host for development and testing

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::info;

use sgms_core::services::users::{ImageHost, UploadedImage};

/// Image host that fabricates URLs instead of storing anything
#[derive(Clone)]
pub struct MockImageHost {
    upload_count: Arc<AtomicU64>,
}

impl MockImageHost {
    /// Create a new mock image host
    pub fn new() -> Self {
        Self {
            upload_count: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Number of uploads performed
    pub fn upload_count(&self) -> u64 {
        self.upload_count.load(Ordering::SeqCst)
    }
}

impl Default for MockImageHost {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageHost for MockImageHost {
    async fn upload(&self, bytes: &[u8], content_type: &str) -> Result<UploadedImage, String> {
        let n = self.upload_count.fetch_add(1, Ordering::SeqCst) + 1;
        info!(
            size = bytes.len(),
            content_type, "[mock image host] upload"
        );
        Ok(UploadedImage {
            url: format!("https://images.local/mock/{n}.jpg"),
            asset_id: format!("mock-asset-{n}"),
        })
    }

    async fn delete(&self, asset_id: &str) -> Result<(), String> {
        info!(asset_id, "[mock image host] delete");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_upload_generates_assets() {
        let host = MockImageHost::new();
        let a = host.upload(b"img", "image/jpeg").await.unwrap();
        let b = host.upload(b"img", "image/png").await.unwrap();

        assert_ne!(a.asset_id, b.asset_id);
        assert_eq!(host.upload_count(), 2);
        host.delete(&a.asset_id).await.unwrap();
    }
}
