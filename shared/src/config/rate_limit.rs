//! Rate limiting configuration
//!
//! Two independent limits exist in the system: the generic per-IP API limit
//! enforced by middleware, and the OTP resend cooldown enforced by the OTP
//! service itself. Both windows live here so they can be tuned per
//! deployment.

use serde::{Deserialize, Serialize};

/// Rate limiting configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateLimitConfig {
    /// Redis URL backing the per-IP counters
    pub redis_url: String,

    /// Maximum API requests per IP within the window
    pub api_requests_per_ip: u32,

    /// Window for the per-IP API limit, in seconds
    pub api_window_seconds: u64,

    /// Maximum auth-route requests (login, register, OTP) per IP within
    /// the auth window
    pub auth_requests_per_ip: u32,

    /// Window for the per-IP auth limit, in seconds
    pub auth_window_seconds: u64,

    /// Minimum interval between OTP resends for one (email, purpose),
    /// in seconds
    pub otp_resend_cooldown_seconds: i64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            redis_url: String::from("redis://127.0.0.1:6379"),
            api_requests_per_ip: 100,
            api_window_seconds: 900, // 15 minutes
            auth_requests_per_ip: 5,
            auth_window_seconds: 900,
            otp_resend_cooldown_seconds: 60,
        }
    }
}

impl RateLimitConfig {
    /// Load rate limit configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            redis_url: std::env::var("REDIS_URL").unwrap_or(defaults.redis_url),
            api_requests_per_ip: env_u32("RATE_LIMIT_API_MAX", defaults.api_requests_per_ip),
            api_window_seconds: env_u64("RATE_LIMIT_API_WINDOW", defaults.api_window_seconds),
            auth_requests_per_ip: env_u32("RATE_LIMIT_AUTH_MAX", defaults.auth_requests_per_ip),
            auth_window_seconds: env_u64("RATE_LIMIT_AUTH_WINDOW", defaults.auth_window_seconds),
            otp_resend_cooldown_seconds: defaults.otp_resend_cooldown_seconds,
        }
    }
}

fn env_u32(key: &str, default: u32) -> u32 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RateLimitConfig::default();
        assert_eq!(config.api_requests_per_ip, 100);
        assert_eq!(config.auth_requests_per_ip, 5);
        assert_eq!(config.otp_resend_cooldown_seconds, 60);
    }
}
