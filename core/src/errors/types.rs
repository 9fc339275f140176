//! Domain-specific error types for authentication and related operations
//!
//! Each variant carries a stable machine-readable code used by the API
//! boundary when serializing the client-facing error envelope. HTTP status
//! mapping lives in the presentation layer.

use thiserror::Error;

/// Authentication and account errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Account is temporarily locked due to too many failed login attempts")]
    AccountLocked,

    #[error("Account is deactivated")]
    AccountInactive,

    #[error("Account is suspended")]
    AccountSuspended,

    #[error("Email already exists")]
    EmailAlreadyExists,

    #[error("Username already exists")]
    UsernameAlreadyExists,

    #[error("User not found")]
    UserNotFound,

    #[error("Access denied: requires one of roles [{required}]")]
    InsufficientRole { required: String },

    #[error("Access denied: missing permission '{permission}'")]
    MissingPermission { permission: String },

    #[error("Access denied: not the resource owner")]
    NotResourceOwner,

    #[error("Failed to deliver email")]
    EmailDeliveryFailure,
}

impl AuthError {
    /// Stable error code for client-side handling
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::InvalidCredentials => "INVALID_CREDENTIALS",
            AuthError::AccountLocked => "ACCOUNT_LOCKED",
            AuthError::AccountInactive => "ACCOUNT_INACTIVE",
            AuthError::AccountSuspended => "ACCOUNT_SUSPENDED",
            AuthError::EmailAlreadyExists => "EMAIL_ALREADY_EXISTS",
            AuthError::UsernameAlreadyExists => "USERNAME_ALREADY_EXISTS",
            AuthError::UserNotFound => "USER_NOT_FOUND",
            AuthError::InsufficientRole { .. } => "INSUFFICIENT_ROLE",
            AuthError::MissingPermission { .. } => "MISSING_PERMISSION",
            AuthError::NotResourceOwner => "NOT_RESOURCE_OWNER",
            AuthError::EmailDeliveryFailure => "EMAIL_DELIVERY_FAILED",
        }
    }
}

/// Token validation and generation errors
///
/// The distinct variants exist for diagnostics; the API layer collapses all
/// verification failures into 401 responses.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token expired")]
    TokenExpired,

    #[error("Token not yet valid")]
    TokenNotYetValid,

    #[error("Token signature verification failed")]
    InvalidSignature,

    #[error("Malformed token")]
    MalformedToken,

    #[error("Wrong token type: expected {expected}")]
    WrongTokenType { expected: String },

    #[error("Invalid token claims")]
    InvalidClaims,

    #[error("Token generation failed")]
    TokenGenerationFailed,
}

impl TokenError {
    /// Stable error code for client-side handling
    pub fn code(&self) -> &'static str {
        match self {
            TokenError::TokenExpired => "TOKEN_EXPIRED",
            TokenError::TokenNotYetValid => "TOKEN_NOT_YET_VALID",
            TokenError::InvalidSignature => "INVALID_SIGNATURE",
            TokenError::MalformedToken => "MALFORMED_TOKEN",
            TokenError::WrongTokenType { .. } => "WRONG_TOKEN_TYPE",
            TokenError::InvalidClaims => "INVALID_CLAIMS",
            TokenError::TokenGenerationFailed => "TOKEN_GENERATION_FAILED",
        }
    }
}

/// OTP lifecycle errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OtpError {
    #[error("Invalid verification code. {remaining} attempt(s) remaining")]
    InvalidOtp { remaining: i32 },

    #[error("Verification code has expired")]
    OtpExpired,

    #[error("Verification code has already been used")]
    OtpAlreadyUsed,

    #[error("Maximum verification attempts exceeded")]
    OtpMaxAttempts,

    #[error("No verification code found for this email")]
    OtpNotFound,

    #[error("Too many active verification codes. Please wait before requesting another")]
    TooManyActiveCodes,

    #[error("Please wait {seconds} seconds before requesting another code")]
    ResendCooldown { seconds: i64 },

    #[error("Verification code must be 6 digits")]
    InvalidOtpFormat,
}

impl OtpError {
    /// Stable error code for client-side handling
    pub fn code(&self) -> &'static str {
        match self {
            OtpError::InvalidOtp { .. } => "INVALID_OTP",
            OtpError::OtpExpired => "OTP_EXPIRED",
            OtpError::OtpAlreadyUsed => "OTP_ALREADY_USED",
            OtpError::OtpMaxAttempts => "OTP_MAX_ATTEMPTS",
            OtpError::OtpNotFound => "OTP_NOT_FOUND",
            OtpError::TooManyActiveCodes => "TOO_MANY_OTP_REQUESTS",
            OtpError::ResendCooldown { .. } => "OTP_RESEND_COOLDOWN",
            OtpError::InvalidOtpFormat => "INVALID_OTP_FORMAT",
        }
    }
}

/// Input validation errors raised by domain services
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required field: {field}")]
    RequiredField { field: String },

    #[error("Invalid format: {field}")]
    InvalidFormat { field: String },

    #[error("Invalid email format")]
    InvalidEmail,

    #[error("Username must be 3-30 characters, alphanumeric or underscore")]
    InvalidUsername,

    #[error("Password does not meet strength requirements")]
    WeakPassword,

    #[error("Invalid length: {field} (max: {max})")]
    InvalidLength { field: String, max: usize },
}

impl ValidationError {
    /// Stable error code for client-side handling
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::RequiredField { .. } => "REQUIRED_FIELD",
            ValidationError::InvalidFormat { .. } => "INVALID_FORMAT",
            ValidationError::InvalidEmail => "INVALID_EMAIL",
            ValidationError::InvalidUsername => "INVALID_USERNAME",
            ValidationError::WeakPassword => "WEAK_PASSWORD",
            ValidationError::InvalidLength { .. } => "INVALID_LENGTH",
        }
    }
}
