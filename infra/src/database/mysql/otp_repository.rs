//! MySQL implementation of the OtpRepository trait.
//!
//! Expected schema:
//!
//! ```sql
//! CREATE TABLE otp_codes (
//!     id         CHAR(36)     PRIMARY KEY,
//!     email      VARCHAR(254) NOT NULL,
//!     code       CHAR(6)      NOT NULL,
//!     purpose    VARCHAR(20)  NOT NULL,
//!     attempts   INT          NOT NULL DEFAULT 0,
//!     is_used    BOOLEAN      NOT NULL DEFAULT FALSE,
//!     payload    JSON         NULL,
//!     created_at TIMESTAMP(6) NOT NULL,
//!     expires_at TIMESTAMP(6) NOT NULL,
//!     KEY idx_otp_email_purpose (email, purpose, created_at),
//!     KEY idx_otp_expires (expires_at)
//! );
//! ```
//!
//! The attempt counter and the used flag are only ever mutated through
//! conditional UPDATEs, so concurrent verifications cannot both pass the
//! same guard.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use sgms_core::domain::entities::otp::{OtpPurpose, OtpRecord};
use sgms_core::errors::DomainError;
use sgms_core::repositories::OtpRepository;

/// MySQL implementation of OtpRepository
pub struct MySqlOtpRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlOtpRepository {
    /// Create a new MySQL OTP repository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert a database row to an OtpRecord entity
    fn row_to_record(row: &sqlx::mysql::MySqlRow) -> Result<OtpRecord, DomainError> {
        let id: String = row
            .try_get("id")
            .map_err(|e| DomainError::Database(format!("Failed to get id: {}", e)))?;
        let purpose: String = row
            .try_get("purpose")
            .map_err(|e| DomainError::Database(format!("Failed to get purpose: {}", e)))?;
        let payload: Option<String> = row
            .try_get("payload")
            .map_err(|e| DomainError::Database(format!("Failed to get payload: {}", e)))?;
        let payload = payload
            .map(|raw| serde_json::from_str(&raw))
            .transpose()
            .map_err(|e| DomainError::Database(format!("Corrupt OTP payload: {}", e)))?;

        Ok(OtpRecord {
            id: Uuid::parse_str(&id)
                .map_err(|e| DomainError::Database(format!("Invalid UUID: {}", e)))?,
            email: column(row, "email")?,
            code: column(row, "code")?,
            purpose: purpose
                .parse::<OtpPurpose>()
                .map_err(DomainError::Database)?,
            attempts: column(row, "attempts")?,
            is_used: column(row, "is_used")?,
            payload,
            created_at: column::<DateTime<Utc>>(row, "created_at")?,
            expires_at: column::<DateTime<Utc>>(row, "expires_at")?,
        })
    }

    fn payload_to_string(record: &OtpRecord) -> Result<Option<String>, DomainError> {
        record
            .payload
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| DomainError::Database(format!("Failed to serialize OTP payload: {}", e)))
    }
}

fn column<'r, T>(row: &'r sqlx::mysql::MySqlRow, name: &str) -> Result<T, DomainError>
where
    T: sqlx::Decode<'r, sqlx::MySql> + sqlx::Type<sqlx::MySql>,
{
    row.try_get(name)
        .map_err(|e| DomainError::Database(format!("Failed to get {}: {}", name, e)))
}

#[async_trait]
impl OtpRepository for MySqlOtpRepository {
    async fn create(&self, record: OtpRecord) -> Result<OtpRecord, DomainError> {
        let query = r#"
            INSERT INTO otp_codes (
                id, email, code, purpose, attempts, is_used, payload,
                created_at, expires_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(record.id.to_string())
            .bind(&record.email)
            .bind(&record.code)
            .bind(record.purpose.as_str())
            .bind(record.attempts)
            .bind(record.is_used)
            .bind(Self::payload_to_string(&record)?)
            .bind(record.created_at)
            .bind(record.expires_at)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Database(format!("Database write failed: {}", e)))?;

        Ok(record)
    }

    async fn find_newest(
        &self,
        email: &str,
        purpose: OtpPurpose,
    ) -> Result<Option<OtpRecord>, DomainError> {
        let query = r#"
            SELECT id, email, code, purpose, attempts, is_used, payload,
                   created_at, expires_at
            FROM otp_codes
            WHERE email = ? AND purpose = ?
            ORDER BY created_at DESC
            LIMIT 1
        "#;

        let result = sqlx::query(query)
            .bind(email)
            .bind(purpose.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Database(format!("Database query failed: {}", e)))?;

        result.as_ref().map(Self::row_to_record).transpose()
    }

    async fn count_active(&self, email: &str, purpose: OtpPurpose) -> Result<u64, DomainError> {
        let query = r#"
            SELECT COUNT(*) AS count
            FROM otp_codes
            WHERE email = ? AND purpose = ? AND is_used = FALSE
              AND expires_at > UTC_TIMESTAMP(6)
        "#;

        let row = sqlx::query(query)
            .bind(email)
            .bind(purpose.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::Database(format!("Database query failed: {}", e)))?;

        let count: i64 = column(&row, "count")?;
        Ok(count as u64)
    }

    async fn increment_attempts(
        &self,
        id: Uuid,
        max_attempts: i32,
    ) -> Result<Option<i32>, DomainError> {
        // Conditional increment: no row is touched once the cap is reached
        // or the code has been consumed
        let query = r#"
            UPDATE otp_codes
            SET attempts = attempts + 1
            WHERE id = ? AND is_used = FALSE AND attempts < ?
        "#;

        let result = sqlx::query(query)
            .bind(id.to_string())
            .bind(max_attempts)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Database(format!("Database update failed: {}", e)))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        let row = sqlx::query("SELECT attempts FROM otp_codes WHERE id = ?")
            .bind(id.to_string())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::Database(format!("Database query failed: {}", e)))?;

        Ok(Some(column(&row, "attempts")?))
    }

    async fn mark_used(&self, id: Uuid) -> Result<bool, DomainError> {
        // First transition wins; a racing verify sees rows_affected == 0
        let query = "UPDATE otp_codes SET is_used = TRUE WHERE id = ? AND is_used = FALSE";

        let result = sqlx::query(query)
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Database(format!("Database update failed: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn update(&self, record: OtpRecord) -> Result<OtpRecord, DomainError> {
        let query = r#"
            UPDATE otp_codes
            SET code = ?, attempts = ?, is_used = ?, payload = ?,
                created_at = ?, expires_at = ?
            WHERE id = ?
        "#;

        let result = sqlx::query(query)
            .bind(&record.code)
            .bind(record.attempts)
            .bind(record.is_used)
            .bind(Self::payload_to_string(&record)?)
            .bind(record.created_at)
            .bind(record.expires_at)
            .bind(record.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Database(format!("Database update failed: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound {
                resource: "OTP".to_string(),
            });
        }

        Ok(record)
    }

    async fn delete_stale(&self, email: &str, purpose: OtpPurpose) -> Result<u64, DomainError> {
        let query = r#"
            DELETE FROM otp_codes
            WHERE email = ? AND purpose = ?
              AND (is_used = TRUE OR expires_at <= UTC_TIMESTAMP(6))
        "#;

        let result = sqlx::query(query)
            .bind(email)
            .bind(purpose.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Database(format!("Database delete failed: {}", e)))?;

        Ok(result.rows_affected())
    }
}
