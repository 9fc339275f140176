//! API middleware: JWT authentication, rate limiting, CORS

pub mod auth;
pub mod cors;
pub mod rate_limit;

pub use auth::{AuthContext, JwtAuth};
pub use rate_limit::RateLimiter;
