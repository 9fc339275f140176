//! Repository interfaces for domain persistence.
//!
//! Concrete implementations live in the infrastructure crate; in-memory
//! mocks for service tests live next to each trait.

pub mod otp;
pub mod user;

pub use otp::{MockOtpRepository, OtpRepository};
pub use user::{MockUserRepository, UserFilter, UserRepository};
