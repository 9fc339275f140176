//! User repository trait defining the interface for user data persistence.
//!
//! The trait is async-first and returns domain errors; implementations map
//! driver-level failures onto `DomainError::Database` before they cross this
//! boundary.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::user::{User, UserRole, UserStatus};
use crate::errors::DomainError;

/// Filter applied to admin user listings
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    /// Restrict to a single role
    pub role: Option<UserRole>,

    /// Restrict to a single status
    pub status: Option<UserStatus>,

    /// Case-insensitive substring match on email, username or name
    pub search: Option<String>,
}

/// Repository trait for User entity persistence operations
///
/// # Example
/// ```no_run
/// # use sgms_core::repositories::UserRepository;
/// # async fn example(repo: &impl UserRepository) -> Result<(), Box<dyn std::error::Error>> {
/// if let Some(user) = repo.find_by_email("member@gym.com").await? {
///     println!("found {}", user.username);
/// }
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by their unique identifier
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError>;

    /// Find a user by email (expects a normalized, lowercased address)
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// Find a user by username
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError>;

    /// Check whether a user exists with the given email
    async fn exists_by_email(&self, email: &str) -> Result<bool, DomainError>;

    /// Check whether a user exists with the given username
    async fn exists_by_username(&self, username: &str) -> Result<bool, DomainError>;

    /// Create a new user
    ///
    /// Returns `AuthError::EmailAlreadyExists` / `UsernameAlreadyExists`
    /// (wrapped in `DomainError::Auth`) when a uniqueness constraint fires.
    async fn create(&self, user: User) -> Result<User, DomainError>;

    /// Update an existing user
    async fn update(&self, user: User) -> Result<User, DomainError>;

    /// Delete a user; `Ok(false)` if no such user existed
    async fn delete(&self, id: Uuid) -> Result<bool, DomainError>;

    /// List users matching a filter, returning the page and the total count
    async fn list(
        &self,
        filter: &UserFilter,
        offset: u64,
        limit: u32,
    ) -> Result<(Vec<User>, u64), DomainError>;

    /// Atomically record a failed login attempt
    ///
    /// Increments the failure counter in a single storage-level operation
    /// and, when the new count reaches `max_attempts`, stores `lock_until`
    /// on the account in the same statement. Returns the new attempt count.
    /// This closes the read-modify-write race of checking the counter in
    /// application code.
    async fn record_failed_login(
        &self,
        id: Uuid,
        max_attempts: i32,
        lock_until: DateTime<Utc>,
    ) -> Result<i32, DomainError>;

    /// Replace the password hash and clear lockout counters
    async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<(), DomainError>;
}
