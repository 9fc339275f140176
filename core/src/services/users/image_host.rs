//! Trait for the third-party image host collaborator

use async_trait::async_trait;

/// An asset stored at the image host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedImage {
    /// Public URL serving the image
    pub url: String,
    /// Provider asset id, needed for later deletion
    pub asset_id: String,
}

/// Trait for the image hosting collaborator
///
/// Implementations live in the infrastructure crate. Uploads are
/// must-succeed; deletes are best-effort - the user service logs delete
/// failures and never surfaces them.
#[async_trait]
pub trait ImageHost: Send + Sync {
    /// Upload image bytes; returns the hosted asset
    async fn upload(&self, bytes: &[u8], content_type: &str) -> Result<UploadedImage, String>;

    /// Delete an asset by its provider id
    async fn delete(&self, asset_id: &str) -> Result<(), String>;
}
