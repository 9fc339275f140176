//! Domain-specific error types and error handling.

mod types;

// Re-export all error types
pub use types::{AuthError, OtpError, TokenError, ValidationError};

use thiserror::Error;

/// Core domain errors
///
/// Umbrella over the specific error families plus the general-purpose
/// variants every layer may raise. All domain errors bubble unchanged to the
/// API boundary, which maps them onto HTTP statuses and the standard
/// response envelope.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Otp(#[from] OtpError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    #[error("Too many requests. Try again in {retry_after_seconds} seconds")]
    RateLimitExceeded { retry_after_seconds: u64 },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    /// Stable error code for client-side handling
    pub fn code(&self) -> &'static str {
        match self {
            DomainError::Auth(e) => e.code(),
            DomainError::Token(e) => e.code(),
            DomainError::Otp(e) => e.code(),
            DomainError::Validation(e) => e.code(),
            DomainError::NotFound { .. } => "NOT_FOUND",
            DomainError::RateLimitExceeded { .. } => "RATE_LIMIT_EXCEEDED",
            DomainError::Database(_) => "DATABASE_ERROR",
            DomainError::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    /// Whether the error carries server-internal detail that must not reach
    /// clients outside development
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            DomainError::Database(_) | DomainError::Internal { .. }
        )
    }

    /// Shorthand for an internal error with a message
    pub fn internal(message: impl Into<String>) -> Self {
        DomainError::Internal {
            message: message.into(),
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_passthrough() {
        let err: DomainError = OtpError::OtpExpired.into();
        assert_eq!(err.code(), "OTP_EXPIRED");

        let err: DomainError = TokenError::InvalidSignature.into();
        assert_eq!(err.code(), "INVALID_SIGNATURE");
    }

    #[test]
    fn test_internal_redaction_flag() {
        assert!(DomainError::Database("connection refused".into()).is_internal());
        assert!(DomainError::internal("boom").is_internal());
        assert!(!DomainError::from(AuthError::InvalidCredentials).is_internal());
    }
}
