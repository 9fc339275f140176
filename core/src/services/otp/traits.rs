//! Trait for email delivery integration

use async_trait::async_trait;

/// Trait for the transactional email collaborator
///
/// Implementations live in the infrastructure crate (HTTP provider client,
/// console mock). Errors are plain strings; the OTP service wraps them into
/// domain errors.
#[async_trait]
pub trait EmailSender: Send + Sync {
    /// Send a verification-code email; returns a provider message id
    async fn send_otp_email(&self, email: &str, code: &str, name: &str) -> Result<String, String>;

    /// Send a password-reset code email; returns a provider message id
    async fn send_password_reset_email(&self, email: &str, code: &str)
        -> Result<String, String>;
}
