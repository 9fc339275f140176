//! # Infrastructure Layer
//!
//! Concrete implementations of the core layer's persistence and
//! collaborator interfaces:
//! - **Database**: MySQL repositories using SQLx
//! - **Email**: transactional mail delivery over an HTTP provider API
//! - **Media**: image host client for avatar storage
//!
//! Each external service ships with a console mock for development, chosen
//! by the provider field of its configuration.

use thiserror::Error;

pub mod database;
pub mod email;
pub mod media;

/// Errors raised inside the infrastructure layer before they are mapped
/// onto domain errors
#[derive(Error, Debug)]
pub enum InfrastructureError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Email delivery error: {0}")]
    Email(String),

    #[error("Image host error: {0}")]
    Media(String),
}
