//! OTP entity for email-based verification flows.

use chrono::{DateTime, Duration, Utc};
use constant_time_eq::constant_time_eq;
use rand::{rngs::OsRng, RngCore};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum number of verification attempts allowed per code
pub const MAX_ATTEMPTS: i32 = 5;

/// Length of the verification code
pub const CODE_LENGTH: usize = 6;

/// Default expiration time for verification codes (10 minutes)
pub const DEFAULT_EXPIRATION_MINUTES: i64 = 10;

/// Maximum unexpired codes allowed per (email, purpose)
pub const MAX_ACTIVE_CODES: usize = 3;

/// What a verification code was issued for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OtpPurpose {
    /// Confirming email ownership during registration
    Registration,
    /// Authorizing a password reset
    PasswordReset,
}

impl OtpPurpose {
    /// Database/wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            OtpPurpose::Registration => "registration",
            OtpPurpose::PasswordReset => "password_reset",
        }
    }
}

impl std::str::FromStr for OtpPurpose {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "registration" => Ok(OtpPurpose::Registration),
            "password_reset" => Ok(OtpPurpose::PasswordReset),
            _ => Err(format!("Invalid OTP purpose: {}", s)),
        }
    }
}

/// Lifecycle state of a verification code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtpState {
    /// May still be verified
    Active,
    /// Successfully verified; single-use, so terminal
    Used,
    /// Past its expiry timestamp
    Expired,
    /// Attempt cap reached
    Exhausted,
}

/// A one-time verification code tied to an email and a purpose
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpRecord {
    /// Unique identifier for the record
    pub id: Uuid,

    /// Email the code was sent to (lowercased)
    pub email: String,

    /// The 6-digit verification code
    pub code: String,

    /// What the code authorizes
    pub purpose: OtpPurpose,

    /// Number of verification attempts made
    pub attempts: i32,

    /// Whether the code has been successfully used
    pub is_used: bool,

    /// Staged payload released on successful verification
    /// (pending registration data, reset context)
    pub payload: Option<serde_json::Value>,

    /// Timestamp when the code was created; refreshed on resend so the
    /// resend cooldown keys off the latest send
    pub created_at: DateTime<Utc>,

    /// Timestamp when the code expires
    pub expires_at: DateTime<Utc>,
}

impl OtpRecord {
    /// Creates a new verification code with a cryptographically sourced
    /// 6-digit code and the default expiry
    pub fn new(email: String, purpose: OtpPurpose, payload: Option<serde_json::Value>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email,
            code: Self::generate_code(),
            purpose,
            attempts: 0,
            is_used: false,
            payload,
            created_at: now,
            expires_at: now + Duration::minutes(DEFAULT_EXPIRATION_MINUTES),
        }
    }

    /// Generates a 6-digit code from the OS CSPRNG
    pub fn generate_code() -> String {
        let mut bytes = [0u8; 4];
        OsRng.fill_bytes(&mut bytes);
        let num = u32::from_le_bytes(bytes);
        // Slight modulo bias is negligible at this range
        format!("{:06}", num % 1_000_000)
    }

    /// Checks if the verification code has expired
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }

    /// Checks if the attempt cap has been reached
    pub fn is_exhausted(&self) -> bool {
        self.attempts >= MAX_ATTEMPTS
    }

    /// Current lifecycle state
    ///
    /// `Used` wins over `Expired`: a consumed code stays consumed.
    pub fn state(&self) -> OtpState {
        if self.is_used {
            OtpState::Used
        } else if self.is_expired() {
            OtpState::Expired
        } else if self.is_exhausted() {
            OtpState::Exhausted
        } else {
            OtpState::Active
        }
    }

    /// Whether the code may still be verified
    pub fn is_active(&self) -> bool {
        self.state() == OtpState::Active
    }

    /// Constant-time comparison against a candidate code
    pub fn matches(&self, candidate: &str) -> bool {
        self.code.len() == candidate.len()
            && constant_time_eq(self.code.as_bytes(), candidate.as_bytes())
    }

    /// Remaining verification attempts (0 if exceeded)
    pub fn remaining_attempts(&self) -> i32 {
        (MAX_ATTEMPTS - self.attempts).max(0)
    }

    /// Resets the record for a resend: new code, cleared attempts, fresh
    /// expiry window, refreshed send timestamp
    pub fn reset_for_resend(&mut self) {
        self.code = Self::generate_code();
        self.attempts = 0;
        self.is_used = false;
        self.created_at = Utc::now();
        self.expires_at = self.created_at + Duration::minutes(DEFAULT_EXPIRATION_MINUTES);
    }

    /// Seconds until a resend is allowed, given the cooldown window
    pub fn resend_wait_seconds(&self, cooldown_seconds: i64) -> i64 {
        let elapsed = (Utc::now() - self.created_at).num_seconds();
        (cooldown_seconds - elapsed).max(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_otp() -> OtpRecord {
        OtpRecord::new(
            "a@x.com".to_string(),
            OtpPurpose::Registration,
            Some(serde_json::json!({"username": "bob"})),
        )
    }

    #[test]
    fn test_new_otp_record() {
        let otp = sample_otp();
        assert_eq!(otp.code.len(), CODE_LENGTH);
        assert!(otp.code.chars().all(|c| c.is_ascii_digit()));
        assert_eq!(otp.attempts, 0);
        assert!(!otp.is_used);
        assert!(otp.is_active());
        assert_eq!(otp.state(), OtpState::Active);
    }

    #[test]
    fn test_generate_code_format() {
        for _ in 0..100 {
            let code = OtpRecord::generate_code();
            assert_eq!(code.len(), CODE_LENGTH);
            let num: u32 = code.parse().expect("code should be numeric");
            assert!(num < 1_000_000);
        }
    }

    #[test]
    fn test_code_uniqueness() {
        let codes: std::collections::HashSet<String> =
            (0..100).map(|_| OtpRecord::generate_code()).collect();
        assert!(codes.len() > 1);
    }

    #[test]
    fn test_constant_time_match() {
        let otp = sample_otp();
        assert!(otp.matches(&otp.code.clone()));
        assert!(!otp.matches("000000"));
        assert!(!otp.matches("00000"));
    }

    #[test]
    fn test_expired_state() {
        let mut otp = sample_otp();
        otp.expires_at = Utc::now() - Duration::seconds(1);
        assert!(otp.is_expired());
        assert_eq!(otp.state(), OtpState::Expired);
        assert!(!otp.is_active());
    }

    #[test]
    fn test_exhausted_state() {
        let mut otp = sample_otp();
        otp.attempts = MAX_ATTEMPTS;
        assert_eq!(otp.state(), OtpState::Exhausted);
        assert_eq!(otp.remaining_attempts(), 0);
    }

    #[test]
    fn test_used_state_wins_over_expired() {
        let mut otp = sample_otp();
        otp.is_used = true;
        otp.expires_at = Utc::now() - Duration::seconds(1);
        assert_eq!(otp.state(), OtpState::Used);
    }

    #[test]
    fn test_reset_for_resend() {
        let mut otp = sample_otp();
        let original_code = otp.code.clone();
        otp.attempts = 3;

        otp.reset_for_resend();

        assert_ne!(otp.code, original_code);
        assert_eq!(otp.attempts, 0);
        assert!(!otp.is_used);
        assert!(otp.is_active());
        // Staged payload survives a resend
        assert!(otp.payload.is_some());
    }

    #[test]
    fn test_resend_wait() {
        let mut otp = sample_otp();
        assert!(otp.resend_wait_seconds(60) > 0);

        otp.created_at = Utc::now() - Duration::seconds(61);
        assert_eq!(otp.resend_wait_seconds(60), 0);
    }

    #[test]
    fn test_purpose_round_trip() {
        for purpose in [OtpPurpose::Registration, OtpPurpose::PasswordReset] {
            assert_eq!(purpose.as_str().parse::<OtpPurpose>().unwrap(), purpose);
        }
        assert!("login".parse::<OtpPurpose>().is_err());
    }
}
