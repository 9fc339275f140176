//! Value objects shared across services.

mod auth_response;

pub use auth_response::{AuthResponse, UserSummary};
