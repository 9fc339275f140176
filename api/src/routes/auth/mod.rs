//! Authentication routes
//!
//! `/api/v1/auth/*`: registration (OTP-confirmed), login, logout, token
//! refresh and the password reset flow.

mod login;
mod logout;
mod password;
mod refresh;
mod register;

pub use login::login;
pub use logout::logout;
pub use password::{forgot_password, reset_password};
pub use refresh::refresh;
pub use register::{confirm_registration, register, resend_registration_code};
