//! Application state shared across handlers

use std::sync::Arc;

use sgms_core::repositories::{OtpRepository, UserRepository};
use sgms_core::services::auth::AuthService;
use sgms_core::services::token::TokenService;
use sgms_core::services::users::UserService;
use sgms_shared::config::AppConfig;

/// Shared services injected into every handler
///
/// Generic over the repository implementations so tests can run the same
/// handlers against the in-memory mocks.
pub struct AppState<U, O>
where
    U: UserRepository,
    O: OtpRepository,
{
    /// Authentication flows (register, login, refresh, password reset)
    pub auth_service: Arc<AuthService<U, O>>,
    /// Profile and account management
    pub user_service: Arc<UserService<U>>,
    /// JWT issuance/verification
    pub token_service: Arc<TokenService>,
    /// Application configuration
    pub config: AppConfig,
}

impl<U, O> AppState<U, O>
where
    U: UserRepository,
    O: OtpRepository,
{
    /// Create the application state
    pub fn new(
        auth_service: Arc<AuthService<U, O>>,
        user_service: Arc<UserService<U>>,
        token_service: Arc<TokenService>,
        config: AppConfig,
    ) -> Self {
        Self {
            auth_service,
            user_service,
            token_service,
            config,
        }
    }
}
