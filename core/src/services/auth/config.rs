//! Configuration for the authentication service

use crate::domain::entities::user::{LOCKOUT_DURATION_MINUTES, MAX_LOGIN_ATTEMPTS};

/// Configuration for the authentication service
#[derive(Debug, Clone)]
pub struct AuthServiceConfig {
    /// Whether to allow registration of new users
    pub allow_registration: bool,
    /// Bcrypt cost factor for password hashing
    pub bcrypt_cost: u32,
    /// Failed logins before the account locks
    pub max_login_attempts: i32,
    /// Lockout duration in minutes
    pub lockout_duration_minutes: i64,
}

impl Default for AuthServiceConfig {
    fn default() -> Self {
        Self {
            allow_registration: true,
            bcrypt_cost: 12,
            max_login_attempts: MAX_LOGIN_ATTEMPTS,
            lockout_duration_minutes: LOCKOUT_DURATION_MINUTES,
        }
    }
}
