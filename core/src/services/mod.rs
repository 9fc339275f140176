//! Business services containing domain logic and use cases.

pub mod auth;
pub mod otp;
pub mod token;
pub mod users;

// Re-export commonly used types
pub use auth::{policy, AuthService, AuthServiceConfig, RegistrationRequest};
pub use otp::{EmailSender, OtpCreated, OtpService, OtpServiceConfig};
pub use token::{TokenService, TokenServiceConfig};
pub use users::{ImageHost, ProfileUpdate, UploadedImage, UserService};
