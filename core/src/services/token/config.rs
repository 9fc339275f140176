//! Configuration for the token service

use sgms_shared::config::JwtConfig;

/// Configuration for the token service
#[derive(Debug, Clone)]
pub struct TokenServiceConfig {
    /// JWT signing secret
    pub jwt_secret: String,
    /// Issuer claim stamped into and required of every token
    pub issuer: String,
    /// Audience claim stamped into and required of every token
    pub audience: String,
    /// Access token expiry in seconds
    pub access_token_expiry_secs: i64,
    /// Refresh token expiry in seconds
    pub refresh_token_expiry_secs: i64,
}

impl Default for TokenServiceConfig {
    fn default() -> Self {
        Self::from(&JwtConfig::default())
    }
}

impl From<&JwtConfig> for TokenServiceConfig {
    fn from(config: &JwtConfig) -> Self {
        Self {
            jwt_secret: config.secret.clone(),
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
            access_token_expiry_secs: config.access_token_expiry,
            refresh_token_expiry_secs: config.refresh_token_expiry,
        }
    }
}
