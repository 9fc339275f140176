//! Input format validation helpers
//!
//! Centralizes the format rules used by both the DTO layer (via `validator`
//! custom functions) and the domain services, so the two never drift apart.

use once_cell::sync::Lazy;
use regex::Regex;

/// Minimum password length
pub const PASSWORD_MIN_LENGTH: usize = 8;

/// Maximum password length
pub const PASSWORD_MAX_LENGTH: usize = 128;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex"));

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9_]{3,30}$").expect("username regex"));

static OTP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{6}$").expect("otp regex"));

/// Check email address format
pub fn is_valid_email(email: &str) -> bool {
    email.len() <= 254 && EMAIL_RE.is_match(email)
}

/// Check username format: alphanumeric and underscore, 3-30 chars
pub fn is_valid_username(username: &str) -> bool {
    USERNAME_RE.is_match(username)
}

/// Check OTP code format: exactly 6 ASCII digits
pub fn is_valid_otp_format(code: &str) -> bool {
    OTP_RE.is_match(code)
}

/// Check password strength
///
/// Requires length within bounds plus at least one uppercase letter, one
/// lowercase letter and one digit.
pub fn is_strong_password(password: &str) -> bool {
    if password.len() < PASSWORD_MIN_LENGTH || password.len() > PASSWORD_MAX_LENGTH {
        return false;
    }
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    has_upper && has_lower && has_digit
}

/// Normalize an email address for storage and lookup
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
