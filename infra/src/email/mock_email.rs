//! Mock email sender for development and testing
//!
//! Logs the message to the console instead of delivering it, and hands out
//! sequential message ids.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::info;

use sgms_core::services::otp::EmailSender;

use super::http_email::mask_email;

/// Email sender that prints to the log instead of sending
#[derive(Clone)]
pub struct MockEmailSender {
    /// Counter for tracking number of messages sent
    message_count: Arc<AtomicU64>,
}

impl MockEmailSender {
    /// Create a new mock email sender
    pub fn new() -> Self {
        Self {
            message_count: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Total number of messages "sent"
    pub fn message_count(&self) -> u64 {
        self.message_count.load(Ordering::SeqCst)
    }

    fn next_id(&self) -> String {
        let n = self.message_count.fetch_add(1, Ordering::SeqCst) + 1;
        format!("mock-{n}")
    }
}

impl Default for MockEmailSender {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmailSender for MockEmailSender {
    async fn send_otp_email(&self, email: &str, code: &str, name: &str) -> Result<String, String> {
        let id = self.next_id();
        info!(
            to = mask_email(email),
            name,
            code,
            message_id = id,
            "[mock email] verification code"
        );
        Ok(id)
    }

    async fn send_password_reset_email(
        &self,
        email: &str,
        code: &str,
    ) -> Result<String, String> {
        let id = self.next_id();
        info!(
            to = mask_email(email),
            code,
            message_id = id,
            "[mock email] password reset code"
        );
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_counts_messages() {
        let sender = MockEmailSender::new();
        sender.send_otp_email("a@x.com", "123456", "Bob").await.unwrap();
        let id = sender
            .send_password_reset_email("a@x.com", "654321")
            .await
            .unwrap();

        assert_eq!(sender.message_count(), 2);
        assert_eq!(id, "mock-2");
    }
}
