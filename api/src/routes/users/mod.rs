//! User routes
//!
//! `/api/v1/users/*`: the caller's own profile and avatar, plus the
//! staff/admin account management endpoints.

mod admin;
mod avatar;
mod profile;

pub use admin::{admin_update_user, delete_user, get_user, list_users};
pub use avatar::{remove_avatar, upload_avatar};
pub use profile::{deactivate_me, get_me, update_me};
