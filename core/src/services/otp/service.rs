//! Main OTP service implementation

use chrono::Duration;
use std::sync::Arc;

use sgms_shared::utils::validation::is_valid_otp_format;

use crate::domain::entities::otp::{OtpPurpose, OtpRecord, OtpState, MAX_ATTEMPTS};
use crate::errors::{AuthError, DomainError, DomainResult, OtpError};
use crate::repositories::OtpRepository;

use super::config::OtpServiceConfig;
use super::traits::EmailSender;
use super::types::OtpCreated;

/// Service owning the verification-code lifecycle
pub struct OtpService<R: OtpRepository> {
    repository: Arc<R>,
    email_sender: Arc<dyn EmailSender>,
    config: OtpServiceConfig,
}

impl<R: OtpRepository> OtpService<R> {
    /// Create a new OTP service
    pub fn new(
        repository: Arc<R>,
        email_sender: Arc<dyn EmailSender>,
        config: OtpServiceConfig,
    ) -> Self {
        Self {
            repository,
            email_sender,
            config,
        }
    }

    /// Create and send a verification code
    ///
    /// Purges stale records for the key first, enforces the active-code cap,
    /// persists a fresh CSPRNG code with the configured expiry, then emails
    /// it. The staged `payload` is released to the caller of `verify` on
    /// success.
    pub async fn create(
        &self,
        email: &str,
        purpose: OtpPurpose,
        payload: Option<serde_json::Value>,
        recipient_name: Option<&str>,
    ) -> DomainResult<OtpCreated> {
        // Opportunistic cleanup so abandoned codes never pile up
        let purged = self.repository.delete_stale(email, purpose).await?;
        if purged > 0 {
            tracing::debug!(email, purpose = purpose.as_str(), purged, "purged stale codes");
        }

        let active = self.repository.count_active(email, purpose).await?;
        if active >= self.config.max_active_codes as u64 {
            tracing::warn!(
                email,
                purpose = purpose.as_str(),
                active,
                "too many active verification codes"
            );
            return Err(OtpError::TooManyActiveCodes.into());
        }

        let mut record = OtpRecord::new(email.to_string(), purpose, payload);
        record.expires_at =
            record.created_at + Duration::minutes(self.config.code_expiration_minutes);
        let record = self.repository.create(record).await?;

        let message_id = self.deliver(&record, recipient_name).await?;

        tracing::info!(
            email,
            purpose = purpose.as_str(),
            otp_id = %record.id,
            "verification code created and sent"
        );

        Ok(OtpCreated {
            otp_id: record.id,
            expires_at: record.expires_at,
            resend_available_at: record.created_at
                + Duration::seconds(self.config.resend_cooldown_seconds),
            message_id,
        })
    }

    /// Verify a code and release its staged payload
    ///
    /// Only the newest record for the (email, purpose) pair can verify; a
    /// resend invalidates every earlier code value. On mismatch the attempt
    /// counter is incremented atomically at the storage layer.
    pub async fn verify(
        &self,
        email: &str,
        code: &str,
        purpose: OtpPurpose,
    ) -> DomainResult<Option<serde_json::Value>> {
        if !is_valid_otp_format(code) {
            return Err(OtpError::InvalidOtpFormat.into());
        }

        let record = self
            .repository
            .find_newest(email, purpose)
            .await?
            .ok_or(OtpError::OtpNotFound)?;

        match record.state() {
            OtpState::Used => return Err(OtpError::OtpAlreadyUsed.into()),
            OtpState::Expired => return Err(OtpError::OtpExpired.into()),
            OtpState::Exhausted => return Err(OtpError::OtpMaxAttempts.into()),
            OtpState::Active => {}
        }

        if !record.matches(code) {
            // Count the failure in a single conditional UPDATE; two racing
            // mismatches can never both observe "under limit"
            let counted = self
                .repository
                .increment_attempts(record.id, MAX_ATTEMPTS)
                .await?;

            return Err(match counted {
                Some(attempts) => {
                    let remaining = (MAX_ATTEMPTS - attempts).max(0);
                    tracing::warn!(
                        email,
                        purpose = purpose.as_str(),
                        remaining,
                        "verification code mismatch"
                    );
                    if remaining == 0 {
                        OtpError::OtpMaxAttempts.into()
                    } else {
                        OtpError::InvalidOtp { remaining }.into()
                    }
                }
                None => OtpError::OtpMaxAttempts.into(),
            });
        }

        // Single-use: the first transition wins, a concurrent verify loses
        if !self.repository.mark_used(record.id).await? {
            return Err(OtpError::OtpAlreadyUsed.into());
        }

        tracing::info!(email, purpose = purpose.as_str(), otp_id = %record.id, "code verified");
        Ok(record.payload)
    }

    /// Regenerate and resend the newest live code
    ///
    /// Rate-limited to once per cooldown window per (email, purpose). The
    /// record keeps its staged payload; code, attempts and expiry are reset,
    /// so the previous code value stops matching.
    pub async fn resend(
        &self,
        email: &str,
        purpose: OtpPurpose,
        recipient_name: Option<&str>,
    ) -> DomainResult<OtpCreated> {
        let mut record = self
            .repository
            .find_newest(email, purpose)
            .await?
            .filter(|r| !r.is_used)
            .ok_or(OtpError::OtpNotFound)?;

        if record.is_expired() {
            return Err(OtpError::OtpExpired.into());
        }

        let wait = record.resend_wait_seconds(self.config.resend_cooldown_seconds);
        if wait > 0 {
            tracing::warn!(email, purpose = purpose.as_str(), wait, "resend inside cooldown");
            return Err(OtpError::ResendCooldown { seconds: wait }.into());
        }

        record.reset_for_resend();
        record.expires_at =
            record.created_at + Duration::minutes(self.config.code_expiration_minutes);
        let record = self.repository.update(record).await?;

        let message_id = self.deliver(&record, recipient_name).await?;

        tracing::info!(email, purpose = purpose.as_str(), otp_id = %record.id, "code resent");

        Ok(OtpCreated {
            otp_id: record.id,
            expires_at: record.expires_at,
            resend_available_at: record.created_at
                + Duration::seconds(self.config.resend_cooldown_seconds),
            message_id,
        })
    }

    /// Seconds until the next resend is permitted; `0` when allowed now
    pub async fn resend_wait(&self, email: &str, purpose: OtpPurpose) -> DomainResult<i64> {
        Ok(self
            .repository
            .find_newest(email, purpose)
            .await?
            .filter(|r| r.is_active())
            .map(|r| r.resend_wait_seconds(self.config.resend_cooldown_seconds))
            .unwrap_or(0))
    }

    async fn deliver(
        &self,
        record: &OtpRecord,
        recipient_name: Option<&str>,
    ) -> DomainResult<String> {
        let send_result = match record.purpose {
            OtpPurpose::Registration => {
                self.email_sender
                    .send_otp_email(&record.email, &record.code, recipient_name.unwrap_or("User"))
                    .await
            }
            OtpPurpose::PasswordReset => {
                self.email_sender
                    .send_password_reset_email(&record.email, &record.code)
                    .await
            }
        };

        send_result.map_err(|e| {
            tracing::error!(email = record.email, error = %e, "failed to send verification email");
            DomainError::Auth(AuthError::EmailDeliveryFailure)
        })
    }
}
