//! Mock implementation of OtpRepository for testing

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::otp::{OtpPurpose, OtpRecord};
use crate::errors::DomainError;

use super::trait_::OtpRepository;

/// In-memory OTP repository for service tests
pub struct MockOtpRepository {
    records: Arc<RwLock<HashMap<Uuid, OtpRecord>>>,
}

impl MockOtpRepository {
    /// Create a new mock repository
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Snapshot a record by id (test helper)
    pub async fn get(&self, id: Uuid) -> Option<OtpRecord> {
        self.records.read().await.get(&id).cloned()
    }

    /// Mutate a stored record in place (test helper, e.g. to back-date
    /// expiry or creation timestamps)
    pub async fn mutate<F: FnOnce(&mut OtpRecord)>(&self, id: Uuid, f: F) {
        if let Some(record) = self.records.write().await.get_mut(&id) {
            f(record);
        }
    }
}

impl Default for MockOtpRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OtpRepository for MockOtpRepository {
    async fn create(&self, record: OtpRecord) -> Result<OtpRecord, DomainError> {
        self.records
            .write()
            .await
            .insert(record.id, record.clone());
        Ok(record)
    }

    async fn find_newest(
        &self,
        email: &str,
        purpose: OtpPurpose,
    ) -> Result<Option<OtpRecord>, DomainError> {
        let records = self.records.read().await;
        Ok(records
            .values()
            .filter(|r| r.email == email && r.purpose == purpose)
            .max_by_key(|r| r.created_at)
            .cloned())
    }

    async fn count_active(&self, email: &str, purpose: OtpPurpose) -> Result<u64, DomainError> {
        let records = self.records.read().await;
        Ok(records
            .values()
            .filter(|r| {
                r.email == email && r.purpose == purpose && !r.is_used && !r.is_expired()
            })
            .count() as u64)
    }

    async fn increment_attempts(
        &self,
        id: Uuid,
        max_attempts: i32,
    ) -> Result<Option<i32>, DomainError> {
        let mut records = self.records.write().await;
        match records.get_mut(&id) {
            Some(record) if !record.is_used && record.attempts < max_attempts => {
                record.attempts += 1;
                Ok(Some(record.attempts))
            }
            Some(_) => Ok(None),
            None => Err(DomainError::NotFound {
                resource: "OTP".to_string(),
            }),
        }
    }

    async fn mark_used(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut records = self.records.write().await;
        match records.get_mut(&id) {
            Some(record) if !record.is_used => {
                record.is_used = true;
                Ok(true)
            }
            Some(_) => Ok(false),
            None => Err(DomainError::NotFound {
                resource: "OTP".to_string(),
            }),
        }
    }

    async fn update(&self, record: OtpRecord) -> Result<OtpRecord, DomainError> {
        let mut records = self.records.write().await;
        if !records.contains_key(&record.id) {
            return Err(DomainError::NotFound {
                resource: "OTP".to_string(),
            });
        }
        records.insert(record.id, record.clone());
        Ok(record)
    }

    async fn delete_stale(&self, email: &str, purpose: OtpPurpose) -> Result<u64, DomainError> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|_, r| {
            !(r.email == email && r.purpose == purpose && (r.is_used || r.is_expired()))
        });
        Ok((before - records.len()) as u64)
    }
}
