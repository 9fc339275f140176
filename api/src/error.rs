//! The API error boundary
//!
//! Every handler returns `Result<HttpResponse, ApiError>`; this module is
//! the single place where domain errors become HTTP statuses and the
//! standard envelope. Internal errors are logged with full context and
//! reach clients redacted (details only in debug builds).

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use std::collections::HashMap;

use sgms_core::errors::{AuthError, DomainError, OtpError, TokenError};
use sgms_shared::types::{ApiResponse, ErrorBody};

/// Wrapper carrying a domain error across the handler boundary
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl From<DomainError> for ApiError {
    fn from(error: DomainError) -> Self {
        Self(error)
    }
}

impl From<AuthError> for ApiError {
    fn from(error: AuthError) -> Self {
        Self(error.into())
    }
}

impl From<TokenError> for ApiError {
    fn from(error: TokenError) -> Self {
        Self(error.into())
    }
}

impl From<OtpError> for ApiError {
    fn from(error: OtpError) -> Self {
        Self(error.into())
    }
}

/// HTTP status for a domain error
pub fn status_for(error: &DomainError) -> StatusCode {
    match error {
        DomainError::Auth(auth) => match auth {
            AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::AccountLocked
            | AuthError::AccountInactive
            | AuthError::AccountSuspended
            | AuthError::InsufficientRole { .. }
            | AuthError::MissingPermission { .. }
            | AuthError::NotResourceOwner => StatusCode::FORBIDDEN,
            AuthError::EmailAlreadyExists | AuthError::UsernameAlreadyExists => {
                StatusCode::CONFLICT
            }
            AuthError::UserNotFound => StatusCode::NOT_FOUND,
            AuthError::EmailDeliveryFailure => StatusCode::INTERNAL_SERVER_ERROR,
        },
        // Every token failure reads as "not authenticated" to the client
        DomainError::Token(token) => match token {
            TokenError::TokenGenerationFailed => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::UNAUTHORIZED,
        },
        DomainError::Otp(otp) => match otp {
            OtpError::OtpNotFound => StatusCode::NOT_FOUND,
            OtpError::TooManyActiveCodes | OtpError::ResendCooldown { .. } => {
                StatusCode::TOO_MANY_REQUESTS
            }
            _ => StatusCode::BAD_REQUEST,
        },
        DomainError::Validation(_) => StatusCode::BAD_REQUEST,
        DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::RateLimitExceeded { .. } => StatusCode::TOO_MANY_REQUESTS,
        DomainError::Database(_) | DomainError::Internal { .. } => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        status_for(&self.0)
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let code = self.0.code();

        let (message, details) = if self.0.is_internal() {
            tracing::error!(error = %self.0, code, "internal error reached the API boundary");
            let details = if cfg!(debug_assertions) {
                Some(serde_json::json!({ "detail": self.0.to_string() }))
            } else {
                None
            };
            ("Internal server error".to_string(), details)
        } else {
            tracing::debug!(error = %self.0, code, status = %status, "request failed");
            (self.0.to_string(), None)
        };

        let mut body = ErrorBody::new(code);
        if let Some(details) = details {
            body = body.with_details(details);
        }

        HttpResponse::build(status).json(ApiResponse::<()>::error(message, body))
    }
}

/// Convert `validator` DTO failures into a 400 envelope with field errors
pub fn validation_failure(errors: validator::ValidationErrors) -> HttpResponse {
    let mut fields: HashMap<String, Vec<String>> = HashMap::new();
    for (field, field_errors) in errors.field_errors() {
        let messages = field_errors
            .iter()
            .map(|e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string())
            })
            .collect();
        fields.insert(field.to_string(), messages);
    }

    HttpResponse::BadRequest().json(ApiResponse::<()>::error(
        "Validation failed",
        ErrorBody::new("VALIDATION_ERROR").with_fields(fields),
    ))
}
