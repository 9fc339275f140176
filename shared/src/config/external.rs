//! External collaborator configuration: email delivery and image hosting

use serde::{Deserialize, Serialize};

/// Transactional email delivery configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmailConfig {
    /// Provider identifier ("http" for the HTTP API client, "mock" for
    /// console output in development)
    pub provider: String,

    /// Base URL of the transactional mail HTTP API
    pub api_url: String,

    /// API key for the mail provider
    pub api_key: String,

    /// Sender address
    pub from_address: String,

    /// Sender display name
    pub from_name: String,

    /// Maximum retry attempts for failed sends
    pub max_retries: u32,

    /// Request timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            provider: String::from("mock"),
            api_url: String::new(),
            api_key: String::new(),
            from_address: String::from("noreply@sgms.com"),
            from_name: String::from("SGMS"),
            max_retries: 3,
            request_timeout_secs: 30,
        }
    }
}

impl EmailConfig {
    /// Load email configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            provider: std::env::var("EMAIL_PROVIDER").unwrap_or(defaults.provider),
            api_url: std::env::var("EMAIL_API_URL").unwrap_or(defaults.api_url),
            api_key: std::env::var("EMAIL_API_KEY").unwrap_or(defaults.api_key),
            from_address: std::env::var("EMAIL_FROM").unwrap_or(defaults.from_address),
            from_name: std::env::var("EMAIL_FROM_NAME").unwrap_or(defaults.from_name),
            max_retries: std::env::var("EMAIL_MAX_RETRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_retries),
            request_timeout_secs: defaults.request_timeout_secs,
        }
    }
}

/// Image host configuration (avatar storage)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ImageHostConfig {
    /// Provider identifier ("http" or "mock")
    pub provider: String,

    /// Base URL of the image host API
    pub api_url: String,

    /// API key for the image host
    pub api_key: String,

    /// Folder/namespace uploads land in
    pub folder: String,

    /// Request timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for ImageHostConfig {
    fn default() -> Self {
        Self {
            provider: String::from("mock"),
            api_url: String::new(),
            api_key: String::new(),
            folder: String::from("sgms/avatars"),
            request_timeout_secs: 30,
        }
    }
}

impl ImageHostConfig {
    /// Load image host configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            provider: std::env::var("IMAGE_HOST_PROVIDER").unwrap_or(defaults.provider),
            api_url: std::env::var("IMAGE_HOST_API_URL").unwrap_or(defaults.api_url),
            api_key: std::env::var("IMAGE_HOST_API_KEY").unwrap_or(defaults.api_key),
            folder: std::env::var("IMAGE_HOST_FOLDER").unwrap_or(defaults.folder),
            request_timeout_secs: defaults.request_timeout_secs,
        }
    }
}
