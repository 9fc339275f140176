//! Image host module
//!
//! Implementations of the core `ImageHost` trait for avatar storage:
//! - **HttpImageHost**: production client for the hosting provider's API
//! - **MockImageHost**: in-memory stand-in for development

pub mod http_image_host;
pub mod mock_image_host;

use std::sync::Arc;

use sgms_core::services::users::ImageHost;
use sgms_shared::config::ImageHostConfig;

pub use http_image_host::HttpImageHost;
pub use mock_image_host::MockImageHost;

use crate::InfrastructureError;

/// Create an image host client based on configuration
pub fn create_image_host(
    config: &ImageHostConfig,
) -> Result<Arc<dyn ImageHost>, InfrastructureError> {
    match config.provider.as_str() {
        "mock" => Ok(Arc::new(MockImageHost::new())),
        "http" => Ok(Arc::new(HttpImageHost::new(config.clone())?)),
        other => Err(InfrastructureError::Config(format!(
            "Unknown image host provider: {}",
            other
        ))),
    }
}
