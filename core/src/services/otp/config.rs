//! Configuration for the OTP service

use crate::domain::entities::otp::{DEFAULT_EXPIRATION_MINUTES, MAX_ACTIVE_CODES};

/// Configuration for the OTP service
#[derive(Debug, Clone)]
pub struct OtpServiceConfig {
    /// Code validity window in minutes
    pub code_expiration_minutes: i64,
    /// Minimum seconds between resends per (email, purpose)
    pub resend_cooldown_seconds: i64,
    /// Maximum unexpired codes per (email, purpose)
    pub max_active_codes: usize,
}

impl Default for OtpServiceConfig {
    fn default() -> Self {
        Self {
            code_expiration_minutes: DEFAULT_EXPIRATION_MINUTES,
            resend_cooldown_seconds: 60,
            max_active_codes: MAX_ACTIVE_CODES,
        }
    }
}
