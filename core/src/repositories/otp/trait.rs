//! OTP repository trait defining the interface for verification-code
//! persistence.
//!
//! The attempt counter is deliberately mutated through an atomic
//! increment-and-check operation rather than read-modify-write, so two
//! concurrent failed verifications can never both observe "under limit".

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::otp::{OtpPurpose, OtpRecord};
use crate::errors::DomainError;

/// Repository trait for OtpRecord persistence operations
#[async_trait]
pub trait OtpRepository: Send + Sync {
    /// Persist a new verification code
    async fn create(&self, record: OtpRecord) -> Result<OtpRecord, DomainError>;

    /// Find the newest record for an (email, purpose) pair regardless of
    /// state; used/expired records are still visible so verification can
    /// report "already used" / "expired" precisely
    async fn find_newest(
        &self,
        email: &str,
        purpose: OtpPurpose,
    ) -> Result<Option<OtpRecord>, DomainError>;

    /// Count unexpired, unused records for an (email, purpose) pair
    async fn count_active(&self, email: &str, purpose: OtpPurpose) -> Result<u64, DomainError>;

    /// Atomically increment the attempt counter of an unused record,
    /// capped at `max_attempts`
    ///
    /// Returns `Some(new_count)` when the increment was applied and `None`
    /// when the record was already at the cap (or already used) - a single
    /// conditional storage operation, never read-then-write.
    async fn increment_attempts(
        &self,
        id: Uuid,
        max_attempts: i32,
    ) -> Result<Option<i32>, DomainError>;

    /// Atomically mark a record used
    ///
    /// Returns `false` when the record was already used, which callers treat
    /// as a lost race against a concurrent verification.
    async fn mark_used(&self, id: Uuid) -> Result<bool, DomainError>;

    /// Overwrite a record (resend: new code, reset attempts, fresh expiry)
    async fn update(&self, record: OtpRecord) -> Result<OtpRecord, DomainError>;

    /// Delete expired or used records for an (email, purpose) pair,
    /// returning how many were removed; called opportunistically before
    /// each create
    async fn delete_stale(&self, email: &str, purpose: OtpPurpose) -> Result<u64, DomainError>;
}
