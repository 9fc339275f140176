//! User profile and account management service
//!
//! Profile read/update, avatar handling through the image-host
//! collaborator, deactivation, and the admin listing/maintenance
//! operations.

mod image_host;
mod service;

#[cfg(test)]
mod tests;

pub use image_host::{ImageHost, UploadedImage};
pub use service::{ProfileUpdate, UserService};
