//! Authentication configuration: JWT signing and token cookies

use serde::{Deserialize, Serialize};

use super::environment::Environment;

/// JWT authentication configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JwtConfig {
    /// JWT secret key for signing tokens
    pub secret: String,

    /// Access token expiry time in seconds
    pub access_token_expiry: i64,

    /// Refresh token expiry time in seconds
    pub refresh_token_expiry: i64,

    /// JWT issuer claim
    pub issuer: String,

    /// JWT audience claim
    pub audience: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::from("development-secret-please-change-in-production"),
            access_token_expiry: 900,     // 15 minutes
            refresh_token_expiry: 604800, // 7 days
            issuer: String::from("sgms-backend"),
            audience: String::from("sgms-frontend"),
        }
    }
}

impl JwtConfig {
    /// Create a new JWT configuration with secret
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ..Default::default()
        }
    }

    /// Set access token expiry in minutes
    pub fn with_access_expiry_minutes(mut self, minutes: i64) -> Self {
        self.access_token_expiry = minutes * 60;
        self
    }

    /// Set refresh token expiry in days
    pub fn with_refresh_expiry_days(mut self, days: i64) -> Self {
        self.refresh_token_expiry = days * 86400;
        self
    }

    /// Check if using the default secret (security warning)
    pub fn is_using_default_secret(&self) -> bool {
        self.secret == "development-secret-please-change-in-production"
    }

    /// Load JWT configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            secret: std::env::var("JWT_SECRET").unwrap_or(defaults.secret),
            access_token_expiry: env_i64("JWT_ACCESS_TOKEN_EXPIRY", defaults.access_token_expiry),
            refresh_token_expiry: env_i64("JWT_REFRESH_TOKEN_EXPIRY", defaults.refresh_token_expiry),
            issuer: std::env::var("JWT_ISSUER").unwrap_or(defaults.issuer),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or(defaults.audience),
        }
    }
}

/// Token cookie configuration
///
/// Refresh tokens are always delivered in an HTTP-only cookie scoped to the
/// auth routes; the access-token cookie is optional (clients may prefer the
/// Authorization header).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CookieConfig {
    /// Name of the refresh token cookie
    pub refresh_cookie_name: String,

    /// Name of the access token cookie
    pub access_cookie_name: String,

    /// Cookie path
    pub path: String,

    /// Whether to also store the access token in a cookie
    pub store_access_token: bool,

    /// Secure flag (HTTPS only)
    pub secure: bool,

    /// SameSite attribute ("Strict", "Lax" or "None")
    pub same_site: String,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            refresh_cookie_name: String::from("refresh_token"),
            access_cookie_name: String::from("access_token"),
            path: String::from("/api/v1/auth"),
            store_access_token: false,
            secure: false,
            same_site: String::from("Lax"),
        }
    }
}

impl CookieConfig {
    /// Build cookie configuration for a given environment
    ///
    /// Production forces `Secure` and `SameSite=Strict`.
    pub fn for_environment(env: Environment) -> Self {
        let mut config = Self::default();
        if env.is_production() {
            config.secure = true;
            config.same_site = String::from("Strict");
        }
        config
    }
}

/// Complete authentication configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AuthConfig {
    /// JWT configuration
    pub jwt: JwtConfig,

    /// Token cookie configuration
    pub cookie: CookieConfig,
}

impl AuthConfig {
    /// Load authentication configuration from environment variables
    pub fn from_env(env: Environment) -> Self {
        let mut cookie = CookieConfig::for_environment(env);
        if let Ok(v) = std::env::var("COOKIE_STORE_ACCESS_TOKEN") {
            cookie.store_access_token = v == "true" || v == "1";
        }
        Self {
            jwt: JwtConfig::from_env(),
            cookie,
        }
    }
}

fn env_i64(key: &str, default: i64) -> i64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jwt_config_default() {
        let config = JwtConfig::default();
        assert_eq!(config.access_token_expiry, 900);
        assert_eq!(config.refresh_token_expiry, 604800);
        assert_eq!(config.issuer, "sgms-backend");
        assert_eq!(config.audience, "sgms-frontend");
        assert!(config.is_using_default_secret());
    }

    #[test]
    fn test_jwt_config_builder() {
        let config = JwtConfig::new("my-secret")
            .with_access_expiry_minutes(30)
            .with_refresh_expiry_days(14);

        assert_eq!(config.access_token_expiry, 1800);
        assert_eq!(config.refresh_token_expiry, 1209600);
        assert!(!config.is_using_default_secret());
    }

    #[test]
    fn test_cookie_config_production_hardening() {
        let dev = CookieConfig::for_environment(Environment::Development);
        assert!(!dev.secure);
        assert_eq!(dev.same_site, "Lax");

        let prod = CookieConfig::for_environment(Environment::Production);
        assert!(prod.secure);
        assert_eq!(prod.same_site, "Strict");
    }
}
