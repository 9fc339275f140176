//! Transactional email delivery over an HTTP provider API
//!
//! Sends templated verification emails through the configured provider
//! endpoint. Transient failures are retried with exponential backoff;
//! the provider message id is returned for logging.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use sgms_core::services::otp::EmailSender;
use sgms_shared::config::EmailConfig;

use crate::InfrastructureError;

/// Email sender backed by a transactional-mail HTTP API
pub struct HttpEmailSender {
    client: reqwest::Client,
    config: EmailConfig,
}

/// Provider response for a queued message
#[derive(Debug, Deserialize)]
struct SendMessageResponse {
    id: String,
}

impl HttpEmailSender {
    /// Create a new HTTP email sender
    pub fn new(config: EmailConfig) -> Result<Self, InfrastructureError> {
        if config.api_url.is_empty() {
            return Err(InfrastructureError::Config(
                "EMAIL_API_URL not set".to_string(),
            ));
        }
        if config.api_key.is_empty() {
            return Err(InfrastructureError::Config(
                "EMAIL_API_KEY not set".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| InfrastructureError::Config(format!("HTTP client build failed: {e}")))?;

        info!(from = config.from_address, "HTTP email sender initialized");
        Ok(Self { client, config })
    }

    /// POST a message to the provider, retrying transient failures
    async fn send_message(
        &self,
        to: &str,
        subject: &str,
        text: &str,
        html: &str,
    ) -> Result<String, InfrastructureError> {
        let body = serde_json::json!({
            "from": {
                "address": self.config.from_address,
                "name": self.config.from_name,
            },
            "to": [{ "address": to }],
            "subject": subject,
            "text": text,
            "html": html,
        });

        let url = format!("{}/messages", self.config.api_url.trim_end_matches('/'));
        let mut delay = Duration::from_millis(500);
        let mut last_error = String::new();

        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                warn!(to = mask_email(to), attempt, "retrying email send");
                tokio::time::sleep(delay).await;
                delay *= 2;
            }

            let response = self
                .client
                .post(&url)
                .bearer_auth(&self.config.api_key)
                .json(&body)
                .send()
                .await;

            match response {
                Ok(response) if response.status().is_success() => {
                    let parsed: SendMessageResponse = response.json().await.map_err(|e| {
                        InfrastructureError::Email(format!("Invalid provider response: {e}"))
                    })?;
                    debug!(
                        to = mask_email(to),
                        message_id = parsed.id,
                        "email accepted by provider"
                    );
                    return Ok(parsed.id);
                }
                Ok(response) if response.status().is_server_error() => {
                    last_error = format!("provider returned {}", response.status());
                }
                Ok(response) => {
                    // Client errors are permanent, do not retry
                    let status = response.status();
                    let detail = response.text().await.unwrap_or_default();
                    error!(to = mask_email(to), %status, detail, "email rejected");
                    return Err(InfrastructureError::Email(format!(
                        "provider rejected message: {status}"
                    )));
                }
                Err(e) => {
                    last_error = e.to_string();
                }
            }
        }

        error!(to = mask_email(to), error = last_error, "email send failed after retries");
        Err(InfrastructureError::Email(last_error))
    }
}

#[async_trait]
impl EmailSender for HttpEmailSender {
    async fn send_otp_email(&self, email: &str, code: &str, name: &str) -> Result<String, String> {
        let subject = "SGMS - Verify your email address";
        let text = format!(
            "Hi {name},\n\n\
             Your SGMS verification code is: {code}\n\n\
             The code expires in 10 minutes. If you did not request it, you \
             can safely ignore this email.\n"
        );
        let html = format!(
            "<p>Hi {name},</p>\
             <p>Your SGMS verification code is:</p>\
             <p style=\"font-size:24px;font-weight:bold;letter-spacing:4px\">{code}</p>\
             <p>The code expires in 10 minutes. If you did not request it, you \
             can safely ignore this email.</p>"
        );

        self.send_message(email, subject, &text, &html)
            .await
            .map_err(|e| e.to_string())
    }

    async fn send_password_reset_email(
        &self,
        email: &str,
        code: &str,
    ) -> Result<String, String> {
        let subject = "SGMS - Password reset code";
        let text = format!(
            "A password reset was requested for your SGMS account.\n\n\
             Your reset code is: {code}\n\n\
             The code expires in 10 minutes. If you did not request a reset, \
             no action is needed.\n"
        );
        let html = format!(
            "<p>A password reset was requested for your SGMS account.</p>\
             <p>Your reset code is:</p>\
             <p style=\"font-size:24px;font-weight:bold;letter-spacing:4px\">{code}</p>\
             <p>The code expires in 10 minutes. If you did not request a reset, \
             no action is needed.</p>"
        );

        self.send_message(email, subject, &text, &html)
            .await
            .map_err(|e| e.to_string())
    }
}

/// Mask an email address for logs: `b***@gym.com`
pub fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => {
            let head = local.chars().next().map(String::from).unwrap_or_default();
            format!("{head}***@{domain}")
        }
        None => "***".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_email() {
        assert_eq!(mask_email("bob@gym.com"), "b***@gym.com");
        assert_eq!(mask_email("a@x.co"), "a***@x.co");
        assert_eq!(mask_email("not-an-email"), "***");
    }

    #[test]
    fn test_rejects_missing_configuration() {
        let config = EmailConfig {
            provider: "http".to_string(),
            ..EmailConfig::default()
        };
        assert!(HttpEmailSender::new(config).is_err());
    }
}
