//! HTTP API layer for the SGMS backend
//!
//! Actix-web application exposing the auth and user management routes,
//! with JWT middleware, per-IP rate limiting and a single error boundary
//! translating domain errors into the standard response envelope.

pub mod app;
pub mod cookies;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

pub use app::create_app;
pub use error::ApiError;
pub use state::AppState;
