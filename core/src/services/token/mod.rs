//! Token service module for JWT management
//!
//! This module handles all token-related operations:
//! - Access/refresh token pair issuance
//! - Verification with distinct failure reasons
//! - Refresh (re-issuing a pair from a valid refresh token)
//!
//! Tokens are stateless: nothing is persisted and nothing can be revoked
//! ahead of expiry. Refresh tokens are not rotated on use - an old refresh
//! token stays valid until its own expiry.

mod config;
mod service;

#[cfg(test)]
mod tests;

pub use config::TokenServiceConfig;
pub use service::TokenService;
