//! OTP service module for email verification codes
//!
//! Implements the full lifecycle of one-time codes:
//! `Active` -> `Verified(used)` | `Expired` | `Exhausted(max attempts)`.
//!
//! Codes are created with a staged payload (pending registration data or
//! reset context), delivered over email, verified at most once, and
//! resendable after a cooldown.

mod config;
mod service;
mod traits;
mod types;

#[cfg(test)]
mod tests;

pub use config::OtpServiceConfig;
pub use service::OtpService;
pub use traits::EmailSender;
pub use types::OtpCreated;
