//! MySQL implementation of the UserRepository trait.
//!
//! Expected schema (unique indexes named so constraint violations can be
//! mapped onto precise domain errors):
//!
//! ```sql
//! CREATE TABLE users (
//!     id                    CHAR(36)     PRIMARY KEY,
//!     email                 VARCHAR(254) NOT NULL,
//!     username              VARCHAR(30)  NOT NULL,
//!     password_hash         VARCHAR(100) NOT NULL,
//!     role                  VARCHAR(16)  NOT NULL,
//!     status                VARCHAR(16)  NOT NULL,
//!     first_name            VARCHAR(50)  NULL,
//!     last_name             VARCHAR(50)  NULL,
//!     phone                 VARCHAR(32)  NULL,
//!     avatar_url            TEXT         NULL,
//!     avatar_id             VARCHAR(255) NULL,
//!     date_of_birth         DATE         NULL,
//!     is_email_verified     BOOLEAN      NOT NULL DEFAULT FALSE,
//!     last_login_at         TIMESTAMP(6) NULL,
//!     failed_login_attempts INT          NOT NULL DEFAULT 0,
//!     locked_until          TIMESTAMP(6) NULL,
//!     created_at            TIMESTAMP(6) NOT NULL,
//!     updated_at            TIMESTAMP(6) NOT NULL,
//!     UNIQUE KEY uq_users_email (email),
//!     UNIQUE KEY uq_users_username (username),
//!     KEY idx_users_role (role),
//!     KEY idx_users_status (status)
//! );
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use sgms_core::domain::entities::user::{User, UserProfile, UserRole, UserStatus};
use sgms_core::errors::{AuthError, DomainError};
use sgms_core::repositories::{UserFilter, UserRepository};

/// MySQL implementation of UserRepository
pub struct MySqlUserRepository {
    /// Database connection pool
    pool: MySqlPool,
}

const USER_COLUMNS: &str = r#"id, email, username, password_hash, role, status,
       first_name, last_name, phone, avatar_url, avatar_id, date_of_birth,
       is_email_verified, last_login_at, failed_login_attempts, locked_until,
       created_at, updated_at"#;

impl MySqlUserRepository {
    /// Create a new MySQL user repository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert a database row to a User entity
    fn row_to_user(row: &sqlx::mysql::MySqlRow) -> Result<User, DomainError> {
        let id: String = row
            .try_get("id")
            .map_err(|e| DomainError::Database(format!("Failed to get id: {}", e)))?;
        let role: String = row
            .try_get("role")
            .map_err(|e| DomainError::Database(format!("Failed to get role: {}", e)))?;
        let status: String = row
            .try_get("status")
            .map_err(|e| DomainError::Database(format!("Failed to get status: {}", e)))?;

        Ok(User {
            id: Uuid::parse_str(&id)
                .map_err(|e| DomainError::Database(format!("Invalid UUID: {}", e)))?,
            email: get(row, "email")?,
            username: get(row, "username")?,
            password_hash: get(row, "password_hash")?,
            role: role
                .parse::<UserRole>()
                .map_err(DomainError::Database)?,
            status: status
                .parse::<UserStatus>()
                .map_err(DomainError::Database)?,
            profile: UserProfile {
                first_name: get(row, "first_name")?,
                last_name: get(row, "last_name")?,
                phone: get(row, "phone")?,
                avatar_url: get(row, "avatar_url")?,
                avatar_id: get(row, "avatar_id")?,
                date_of_birth: get(row, "date_of_birth")?,
            },
            is_email_verified: get(row, "is_email_verified")?,
            last_login_at: get(row, "last_login_at")?,
            failed_login_attempts: get(row, "failed_login_attempts")?,
            locked_until: get(row, "locked_until")?,
            created_at: get::<DateTime<Utc>>(row, "created_at")?,
            updated_at: get::<DateTime<Utc>>(row, "updated_at")?,
        })
    }

    /// Map a write error, translating unique-key violations into conflicts
    fn map_write_error(e: sqlx::Error) -> DomainError {
        if let sqlx::Error::Database(ref db_err) = e {
            let message = db_err.message();
            if message.contains("uq_users_email") {
                return AuthError::EmailAlreadyExists.into();
            }
            if message.contains("uq_users_username") {
                return AuthError::UsernameAlreadyExists.into();
            }
        }
        DomainError::Database(format!("Database write failed: {}", e))
    }
}

fn get<'r, T>(row: &'r sqlx::mysql::MySqlRow, column: &str) -> Result<T, DomainError>
where
    T: sqlx::Decode<'r, sqlx::MySql> + sqlx::Type<sqlx::MySql>,
{
    row.try_get(column)
        .map_err(|e| DomainError::Database(format!("Failed to get {}: {}", column, e)))
}

/// Bind the optional filter values in declaration order
fn bind_filters<'q>(
    mut query: sqlx::query::Query<'q, sqlx::MySql, sqlx::mysql::MySqlArguments>,
    filter: &'q UserFilter,
) -> sqlx::query::Query<'q, sqlx::MySql, sqlx::mysql::MySqlArguments> {
    if let Some(role) = filter.role {
        query = query.bind(role.as_str());
    }
    if let Some(status) = filter.status {
        query = query.bind(status.as_str());
    }
    if let Some(ref search) = filter.search {
        let pattern = format!("%{}%", search);
        query = query
            .bind(pattern.clone())
            .bind(pattern.clone())
            .bind(pattern.clone())
            .bind(pattern);
    }
    query
}

#[async_trait]
impl UserRepository for MySqlUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ? LIMIT 1");

        let result = sqlx::query(&query)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Database(format!("Database query failed: {}", e)))?;

        result.as_ref().map(Self::row_to_user).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE email = ? LIMIT 1");

        let result = sqlx::query(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Database(format!("Database query failed: {}", e)))?;

        result.as_ref().map(Self::row_to_user).transpose()
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE username = ? LIMIT 1");

        let result = sqlx::query(&query)
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Database(format!("Database query failed: {}", e)))?;

        result.as_ref().map(Self::row_to_user).transpose()
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, DomainError> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM users WHERE email = ?")
            .bind(email)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::Database(format!("Database query failed: {}", e)))?;

        let count: i64 = get(&row, "count")?;
        Ok(count > 0)
    }

    async fn exists_by_username(&self, username: &str) -> Result<bool, DomainError> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM users WHERE username = ?")
            .bind(username)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::Database(format!("Database query failed: {}", e)))?;

        let count: i64 = get(&row, "count")?;
        Ok(count > 0)
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        let query = r#"
            INSERT INTO users (
                id, email, username, password_hash, role, status,
                first_name, last_name, phone, avatar_url, avatar_id,
                date_of_birth, is_email_verified, last_login_at,
                failed_login_attempts, locked_until, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(user.id.to_string())
            .bind(&user.email)
            .bind(&user.username)
            .bind(&user.password_hash)
            .bind(user.role.as_str())
            .bind(user.status.as_str())
            .bind(&user.profile.first_name)
            .bind(&user.profile.last_name)
            .bind(&user.profile.phone)
            .bind(&user.profile.avatar_url)
            .bind(&user.profile.avatar_id)
            .bind(user.profile.date_of_birth)
            .bind(user.is_email_verified)
            .bind(user.last_login_at)
            .bind(user.failed_login_attempts)
            .bind(user.locked_until)
            .bind(user.created_at)
            .bind(user.updated_at)
            .execute(&self.pool)
            .await
            .map_err(Self::map_write_error)?;

        Ok(user)
    }

    async fn update(&self, user: User) -> Result<User, DomainError> {
        let query = r#"
            UPDATE users SET
                email = ?, username = ?, password_hash = ?, role = ?, status = ?,
                first_name = ?, last_name = ?, phone = ?, avatar_url = ?,
                avatar_id = ?, date_of_birth = ?, is_email_verified = ?,
                last_login_at = ?, failed_login_attempts = ?, locked_until = ?,
                updated_at = ?
            WHERE id = ?
        "#;

        let result = sqlx::query(query)
            .bind(&user.email)
            .bind(&user.username)
            .bind(&user.password_hash)
            .bind(user.role.as_str())
            .bind(user.status.as_str())
            .bind(&user.profile.first_name)
            .bind(&user.profile.last_name)
            .bind(&user.profile.phone)
            .bind(&user.profile.avatar_url)
            .bind(&user.profile.avatar_id)
            .bind(user.profile.date_of_birth)
            .bind(user.is_email_verified)
            .bind(user.last_login_at)
            .bind(user.failed_login_attempts)
            .bind(user.locked_until)
            .bind(user.updated_at)
            .bind(user.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(Self::map_write_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound {
                resource: "User".to_string(),
            });
        }

        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Database(format!("Database delete failed: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn list(
        &self,
        filter: &UserFilter,
        offset: u64,
        limit: u32,
    ) -> Result<(Vec<User>, u64), DomainError> {
        let mut conditions = Vec::new();
        if filter.role.is_some() {
            conditions.push("role = ?");
        }
        if filter.status.is_some() {
            conditions.push("status = ?");
        }
        if filter.search.is_some() {
            conditions
                .push("(email LIKE ? OR username LIKE ? OR first_name LIKE ? OR last_name LIKE ?)");
        }
        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let count_query = format!("SELECT COUNT(*) AS count FROM users {where_clause}");
        let row = bind_filters(sqlx::query(&count_query), filter)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::Database(format!("Database query failed: {}", e)))?;
        let total: i64 = get(&row, "count")?;

        let page_query = format!(
            "SELECT {USER_COLUMNS} FROM users {where_clause} ORDER BY created_at DESC LIMIT ? OFFSET ?"
        );
        let rows = bind_filters(sqlx::query(&page_query), filter)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::Database(format!("Database query failed: {}", e)))?;

        let users = rows
            .iter()
            .map(Self::row_to_user)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((users, total as u64))
    }

    async fn record_failed_login(
        &self,
        id: Uuid,
        max_attempts: i32,
        lock_until: DateTime<Utc>,
    ) -> Result<i32, DomainError> {
        // Single conditional UPDATE: the increment and the lock decision
        // happen atomically at the database, not read-then-write in Rust
        let query = r#"
            UPDATE users
            SET failed_login_attempts = failed_login_attempts + 1,
                locked_until = IF(failed_login_attempts + 1 >= ?, ?, locked_until),
                updated_at = UTC_TIMESTAMP(6)
            WHERE id = ?
        "#;

        let result = sqlx::query(query)
            .bind(max_attempts)
            .bind(lock_until)
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Database(format!("Database update failed: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound {
                resource: "User".to_string(),
            });
        }

        let row = sqlx::query("SELECT failed_login_attempts FROM users WHERE id = ?")
            .bind(id.to_string())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::Database(format!("Database query failed: {}", e)))?;

        get(&row, "failed_login_attempts")
    }

    async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<(), DomainError> {
        let query = r#"
            UPDATE users
            SET password_hash = ?,
                failed_login_attempts = 0,
                locked_until = NULL,
                updated_at = UTC_TIMESTAMP(6)
            WHERE id = ?
        "#;

        let result = sqlx::query(query)
            .bind(password_hash)
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Database(format!("Database update failed: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound {
                resource: "User".to_string(),
            });
        }

        Ok(())
    }
}
