//! Main authentication service implementation

use std::sync::Arc;

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

use sgms_shared::utils::validation::{
    is_strong_password, is_valid_email, is_valid_username, normalize_email,
};

use crate::domain::entities::otp::OtpPurpose;
use crate::domain::entities::token::TokenKind;
use crate::domain::entities::user::{User, UserRole, UserStatus};
use crate::domain::value_objects::AuthResponse;
use crate::errors::{AuthError, DomainError, DomainResult, ValidationError};
use crate::repositories::{OtpRepository, UserRepository};
use crate::services::otp::{OtpCreated, OtpService};
use crate::services::token::TokenService;

use super::config::AuthServiceConfig;

/// Registration request accepted by [`AuthService::register`]
#[derive(Debug, Clone, Deserialize)]
pub struct RegistrationRequest {
    pub email: String,
    pub username: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
}

/// Account data staged on the registration OTP until the email is confirmed
#[derive(Debug, Serialize, Deserialize)]
struct StagedRegistration {
    username: String,
    password_hash: String,
    first_name: Option<String>,
    last_name: Option<String>,
    phone: Option<String>,
}

/// Authentication service orchestrating the complete authentication flow
pub struct AuthService<U, O>
where
    U: UserRepository,
    O: OtpRepository,
{
    /// User repository for credential storage
    user_repository: Arc<U>,
    /// OTP service for email confirmation flows
    otp_service: Arc<OtpService<O>>,
    /// Token service for JWT management
    token_service: Arc<TokenService>,
    /// Service configuration
    config: AuthServiceConfig,
}

impl<U, O> AuthService<U, O>
where
    U: UserRepository,
    O: OtpRepository,
{
    /// Create a new authentication service
    pub fn new(
        user_repository: Arc<U>,
        otp_service: Arc<OtpService<O>>,
        token_service: Arc<TokenService>,
        config: AuthServiceConfig,
    ) -> Self {
        Self {
            user_repository,
            otp_service,
            token_service,
            config,
        }
    }

    /// Start a registration: validate, stage the account data on an OTP,
    /// email the code
    ///
    /// No user row exists until [`Self::confirm_registration`] succeeds; the
    /// bcrypt hash (never the raw password) rides along on the OTP record.
    pub async fn register(&self, request: RegistrationRequest) -> DomainResult<OtpCreated> {
        if !self.config.allow_registration {
            return Err(DomainError::internal("registration is disabled"));
        }

        let email = normalize_email(&request.email);
        if !is_valid_email(&email) {
            return Err(ValidationError::InvalidEmail.into());
        }
        if !is_valid_username(&request.username) {
            return Err(ValidationError::InvalidUsername.into());
        }
        if !is_strong_password(&request.password) {
            return Err(ValidationError::WeakPassword.into());
        }

        if self.user_repository.exists_by_email(&email).await? {
            return Err(AuthError::EmailAlreadyExists.into());
        }
        if self
            .user_repository
            .exists_by_username(&request.username)
            .await?
        {
            return Err(AuthError::UsernameAlreadyExists.into());
        }

        let password_hash = self.hash_password(&request.password)?;
        let staged = StagedRegistration {
            username: request.username,
            password_hash,
            first_name: request.first_name,
            last_name: request.last_name,
            phone: request.phone,
        };
        let payload = serde_json::to_value(&staged)
            .map_err(|e| DomainError::internal(format!("failed to stage registration: {e}")))?;

        let name = staged_display_name(&staged);
        let created = self
            .otp_service
            .create(&email, OtpPurpose::Registration, Some(payload), Some(&name))
            .await?;

        tracing::info!(email, "registration started, confirmation code sent");
        Ok(created)
    }

    /// Confirm a registration OTP and materialize the account
    pub async fn confirm_registration(&self, email: &str, code: &str) -> DomainResult<AuthResponse> {
        let email = normalize_email(email);

        let payload = self
            .otp_service
            .verify(&email, code, OtpPurpose::Registration)
            .await?
            .ok_or_else(|| DomainError::internal("registration OTP carried no staged data"))?;

        let staged: StagedRegistration = serde_json::from_value(payload)
            .map_err(|e| DomainError::internal(format!("corrupt staged registration: {e}")))?;

        let mut user = User::new(
            email.clone(),
            staged.username,
            staged.password_hash,
            UserRole::Member,
        );
        user.profile.first_name = staged.first_name;
        user.profile.last_name = staged.last_name;
        user.profile.phone = staged.phone;
        // The OTP round-trip proved ownership of the address
        user.verify_email();
        user.record_successful_login();

        let user = self.user_repository.create(user).await?;
        let pair = self.token_service.issue_pair(&user)?;

        tracing::info!(email, user_id = %user.id, "registration confirmed, account created");
        Ok(AuthResponse::from_token_pair(pair, &user))
    }

    /// Resend the pending registration code
    pub async fn resend_registration_code(&self, email: &str) -> DomainResult<OtpCreated> {
        let email = normalize_email(email);
        self.otp_service
            .resend(&email, OtpPurpose::Registration, None)
            .await
    }

    /// Authenticate with email and password
    ///
    /// Lockout and status gates run before the password check, so a locked
    /// or suspended account fails the same way with or without the correct
    /// password. A wrong password is recorded atomically and the fifth
    /// consecutive failure locks the account.
    pub async fn login(&self, email: &str, password: &str) -> DomainResult<AuthResponse> {
        let email = normalize_email(email);

        let user = self
            .user_repository
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if user.is_locked() {
            tracing::warn!(email, user_id = %user.id, "login attempt on locked account");
            return Err(AuthError::AccountLocked.into());
        }
        match user.status {
            UserStatus::Active => {}
            UserStatus::Inactive => return Err(AuthError::AccountInactive.into()),
            UserStatus::Suspended => return Err(AuthError::AccountSuspended.into()),
        }

        let password_ok = bcrypt::verify(password, &user.password_hash)
            .map_err(|e| DomainError::internal(format!("password verification failed: {e}")))?;

        if !password_ok {
            let lock_until =
                Utc::now() + Duration::minutes(self.config.lockout_duration_minutes);
            let attempts = self
                .user_repository
                .record_failed_login(user.id, self.config.max_login_attempts, lock_until)
                .await?;
            tracing::warn!(email, attempts, "failed login attempt");
            return Err(AuthError::InvalidCredentials.into());
        }

        let mut user = user;
        user.record_successful_login();
        let user = self.user_repository.update(user).await?;

        let pair = self.token_service.issue_pair(&user)?;
        tracing::info!(email, user_id = %user.id, "login successful");
        Ok(AuthResponse::from_token_pair(pair, &user))
    }

    /// Exchange a valid refresh token for a new token pair
    ///
    /// The user is reloaded so the new tokens reflect current role/status;
    /// accounts that can no longer authenticate are refused. The presented
    /// refresh token stays valid until its own expiry (no rotation).
    pub async fn refresh(&self, refresh_token: &str) -> DomainResult<AuthResponse> {
        let claims = self.token_service.verify(refresh_token, TokenKind::Refresh)?;
        let user_id = claims
            .user_id()
            .map_err(|_| DomainError::Token(crate::errors::TokenError::InvalidClaims))?;

        let user = self
            .user_repository
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if user.is_locked() {
            return Err(AuthError::AccountLocked.into());
        }
        match user.status {
            UserStatus::Active => {}
            UserStatus::Inactive => return Err(AuthError::AccountInactive.into()),
            UserStatus::Suspended => return Err(AuthError::AccountSuspended.into()),
        }

        let pair = self.token_service.refresh(refresh_token, &user)?;
        Ok(AuthResponse::from_token_pair(pair, &user))
    }

    /// Start a password reset for an existing account
    ///
    /// Always reports success to the caller; whether the address belongs to
    /// an account is never leaked. Only existing users get mail.
    pub async fn request_password_reset(&self, email: &str) -> DomainResult<()> {
        let email = normalize_email(email);

        let Some(user) = self.user_repository.find_by_email(&email).await? else {
            tracing::info!(email, "password reset requested for unknown email");
            return Ok(());
        };

        let payload = serde_json::json!({ "user_id": user.id });
        self.otp_service
            .create(&email, OtpPurpose::PasswordReset, Some(payload), None)
            .await?;

        tracing::info!(email, user_id = %user.id, "password reset code sent");
        Ok(())
    }

    /// Complete a password reset with a valid OTP
    ///
    /// Re-hashes the new password and clears any lockout, so a locked-out
    /// user can recover through their inbox.
    pub async fn reset_password(
        &self,
        email: &str,
        code: &str,
        new_password: &str,
    ) -> DomainResult<()> {
        let email = normalize_email(email);

        if !is_strong_password(new_password) {
            return Err(ValidationError::WeakPassword.into());
        }

        self.otp_service
            .verify(&email, code, OtpPurpose::PasswordReset)
            .await?;

        let user = self
            .user_repository
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let password_hash = self.hash_password(new_password)?;
        self.user_repository
            .update_password(user.id, &password_hash)
            .await?;

        tracing::info!(email, user_id = %user.id, "password reset completed");
        Ok(())
    }

    fn hash_password(&self, password: &str) -> DomainResult<String> {
        bcrypt::hash(password, self.config.bcrypt_cost)
            .map_err(|e| DomainError::internal(format!("password hashing failed: {e}")))
    }
}

fn staged_display_name(staged: &StagedRegistration) -> String {
    match (&staged.first_name, &staged.last_name) {
        (Some(first), Some(last)) => format!("{} {}", first, last),
        (Some(first), None) => first.clone(),
        _ => staged.username.clone(),
    }
}
