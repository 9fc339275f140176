//! HTTP route handlers

pub mod auth;
pub mod users;
