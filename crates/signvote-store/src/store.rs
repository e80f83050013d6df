//! Storage backend trait.

use crate::error::StoreError;
use crate::types::{Column, ListOrder, NewSignatureRecord, SignatureRecord};
use async_trait::async_trait;

/// Insert-only signature storage.
///
/// Implementations must be safe to share across request handlers. Empty
/// identifier values are never indexed: they match nothing and never
/// conflict.
#[async_trait]
pub trait SignatureStore: Send + Sync {
    /// Store a new record and return it with its assigned id.
    ///
    /// Fails with [`StoreError::Conflict`] when a record already holds the
    /// same `device_uuid` or `device_fingerprint`.
    async fn insert(&self, record: NewSignatureRecord) -> Result<SignatureRecord, StoreError>;

    /// First record (lowest id) whose `column` equals `value`.
    async fn find_by(
        &self,
        column: Column,
        value: &str,
    ) -> Result<Option<SignatureRecord>, StoreError>;

    /// All records matching either condition, in id order.
    async fn find_by_or(
        &self,
        column_a: Column,
        value_a: &str,
        column_b: Column,
        value_b: &str,
    ) -> Result<Vec<SignatureRecord>, StoreError>;

    /// Number of stored records.
    async fn count(&self) -> Result<u64, StoreError>;

    /// Every record in the requested order.
    async fn list_all(&self, order: ListOrder) -> Result<Vec<SignatureRecord>, StoreError>;

    /// Record with the given id.
    async fn find_by_id(&self, id: u64) -> Result<Option<SignatureRecord>, StoreError>;

    /// Whether the backend can currently serve requests.
    async fn health_check(&self) -> bool;
}
