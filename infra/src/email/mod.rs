//! Email delivery module
//!
//! Implementations of the core `EmailSender` trait:
//! - **HttpEmailSender**: production delivery via a transactional-mail
//!   HTTP API with retry and backoff
//! - **MockEmailSender**: console output for development

pub mod http_email;
pub mod mock_email;

use std::sync::Arc;

use sgms_core::services::otp::EmailSender;
use sgms_shared::config::EmailConfig;

pub use http_email::HttpEmailSender;
pub use mock_email::MockEmailSender;

use crate::InfrastructureError;

/// Create an email sender based on configuration
pub fn create_email_sender(
    config: &EmailConfig,
) -> Result<Arc<dyn EmailSender>, InfrastructureError> {
    match config.provider.as_str() {
        "mock" => Ok(Arc::new(MockEmailSender::new())),
        "http" => Ok(Arc::new(HttpEmailSender::new(config.clone())?)),
        other => Err(InfrastructureError::Config(format!(
            "Unknown email provider: {}",
            other
        ))),
    }
}
