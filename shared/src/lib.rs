//! Shared utilities and common types for the SGMS server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types
//! - Standard API response envelope
//! - Utility functions (input validation, etc.)
//! - Common type definitions

pub mod config;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, CookieConfig, DatabaseConfig, EmailConfig, Environment, ImageHostConfig,
    JwtConfig, RateLimitConfig, ServerConfig,
};
pub use types::{ApiResponse, ErrorBody, PageQuery, PaginatedResponse, Pagination};
pub use utils::validation;
