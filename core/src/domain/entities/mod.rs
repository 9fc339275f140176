//! Domain entities for the SGMS backend.

pub mod otp;
pub mod token;
pub mod user;

pub use otp::{OtpPurpose, OtpRecord, OtpState};
pub use token::{Claims, TokenKind, TokenPair};
pub use user::{User, UserProfile, UserRole, UserStatus};
