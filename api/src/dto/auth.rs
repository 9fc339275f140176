//! Authentication request/response DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use sgms_shared::utils::validation;

fn validate_username(username: &str) -> Result<(), ValidationError> {
    if validation::is_valid_username(username) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_username"))
    }
}

fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    if validation::is_strong_password(password) {
        Ok(())
    } else {
        Err(ValidationError::new("weak_password"))
    }
}

fn validate_otp_code(code: &str) -> Result<(), ValidationError> {
    if validation::is_valid_otp_format(code) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_otp_format"))
    }
}

/// Request body for POST /auth/register
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(
        email(message = "must be a valid email address"),
        length(max = 254)
    )]
    pub email: String,

    #[validate(custom = "validate_username")]
    pub username: String,

    #[validate(custom = "validate_password_strength")]
    pub password: String,

    #[validate(length(max = 50))]
    pub first_name: Option<String>,

    #[validate(length(max = 50))]
    pub last_name: Option<String>,

    #[validate(length(max = 32))]
    pub phone: Option<String>,
}

/// Request body for POST /auth/register/confirm
#[derive(Debug, Deserialize, Validate)]
pub struct ConfirmRegistrationRequest {
    #[validate(email)]
    pub email: String,

    #[validate(custom = "validate_otp_code")]
    pub code: String,
}

/// Request body for POST /auth/register/resend
#[derive(Debug, Deserialize, Validate)]
pub struct ResendOtpRequest {
    #[validate(email)]
    pub email: String,
}

/// Request body for POST /auth/login
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

/// Request body for POST /auth/refresh
///
/// The token may come from the body or from the refresh cookie; the body
/// wins when both are present.
#[derive(Debug, Default, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: Option<String>,
}

/// Request body for POST /auth/password/forgot
#[derive(Debug, Deserialize, Validate)]
pub struct ForgotPasswordRequest {
    #[validate(email)]
    pub email: String,
}

/// Request body for POST /auth/password/reset
#[derive(Debug, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    #[validate(email)]
    pub email: String,

    #[validate(custom = "validate_otp_code")]
    pub code: String,

    #[validate(custom = "validate_password_strength")]
    pub new_password: String,
}

/// Response data after an OTP has been issued or re-issued
#[derive(Debug, Serialize)]
pub struct OtpIssuedResponse {
    pub expires_at: DateTime<Utc>,
    pub resend_available_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_validation() {
        let valid = RegisterRequest {
            email: "member@gym.com".to_string(),
            username: "bob_42".to_string(),
            password: "Sup3rSecret".to_string(),
            first_name: None,
            last_name: None,
            phone: None,
        };
        assert!(valid.validate().is_ok());

        let bad_email = RegisterRequest {
            email: "nope".to_string(),
            ..valid_copy(&valid)
        };
        assert!(bad_email.validate().is_err());

        let weak_password = RegisterRequest {
            password: "short".to_string(),
            ..valid_copy(&valid)
        };
        assert!(weak_password.validate().is_err());
    }

    #[test]
    fn test_otp_code_validation() {
        let request = ConfirmRegistrationRequest {
            email: "a@x.com".to_string(),
            code: "123456".to_string(),
        };
        assert!(request.validate().is_ok());

        let bad = ConfirmRegistrationRequest {
            email: "a@x.com".to_string(),
            code: "12345".to_string(),
        };
        assert!(bad.validate().is_err());
    }

    fn valid_copy(r: &RegisterRequest) -> RegisterRequest {
        RegisterRequest {
            email: r.email.clone(),
            username: r.username.clone(),
            password: r.password.clone(),
            first_name: r.first_name.clone(),
            last_name: r.last_name.clone(),
            phone: r.phone.clone(),
        }
    }
}
