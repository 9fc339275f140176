//! Types for OTP service results

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Result of creating or resending a verification code
#[derive(Debug, Clone)]
pub struct OtpCreated {
    /// Identifier of the stored record
    pub otp_id: Uuid,
    /// When the code expires
    pub expires_at: DateTime<Utc>,
    /// When the client may request a resend
    pub resend_available_at: DateTime<Utc>,
    /// Provider message id of the delivery email
    pub message_id: String,
}
