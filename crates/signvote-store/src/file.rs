//! Snapshot-backed persistent store.

use crate::error::StoreError;
use crate::memory::{MemoryStore, Snapshot, Table};
use crate::store::SignatureStore;
use crate::types::{Column, ListOrder, NewSignatureRecord, SignatureRecord};
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::fs;
use tracing::{debug, error, info};

/// Signature store that rewrites a JSON snapshot after every insert.
///
/// Reads are served from memory. The snapshot is written while the table
/// write lock is held, so the file always reflects a prefix of the insert
/// order and a failed write rolls the insert back.
#[derive(Debug)]
pub struct FileStore {
    inner: MemoryStore,
    storage_path: PathBuf,
}

impl FileStore {
    /// Open a store, loading the snapshot at `storage_path` if it exists.
    ///
    /// The snapshot's directory is created up front so a fresh deployment
    /// reports healthy before its first insert.
    pub async fn open(storage_path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let storage_path = storage_path.into();

        if let Some(parent) = storage_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let table = if fs::try_exists(&storage_path).await? {
            let data = fs::read(&storage_path).await?;
            let snapshot: Snapshot = serde_json::from_slice(&data)?;
            let table = Table::from_snapshot(snapshot)?;
            info!(
                "Loaded {} signatures from {:?}",
                table.len(),
                storage_path
            );
            table
        } else {
            info!(
                "Snapshot not found at {:?}, starting with empty table",
                storage_path
            );
            Table::default()
        };

        Ok(Self {
            inner: MemoryStore::from_table(table),
            storage_path,
        })
    }

    async fn persist(&self, table: &Table) -> Result<(), StoreError> {
        let data = serde_json::to_vec(&table.snapshot())?;

        if let Some(parent) = self.storage_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        // Write atomically using temp file + rename
        let temp_path = self.storage_path.with_extension("tmp");
        fs::write(&temp_path, &data).await?;
        fs::rename(&temp_path, &self.storage_path).await?;

        debug!(
            "Saved snapshot ({} bytes) to {:?}",
            data.len(),
            self.storage_path
        );
        Ok(())
    }
}

#[async_trait]
impl SignatureStore for FileStore {
    async fn insert(&self, record: NewSignatureRecord) -> Result<SignatureRecord, StoreError> {
        let mut table = self.inner.table.write().await;
        let record = table.insert(record)?;

        if let Err(e) = self.persist(&table).await {
            error!(id = record.id, "Failed to persist snapshot, rolling back: {}", e);
            table.pop_last();
            return Err(e);
        }

        debug!(id = record.id, "Stored signature");
        Ok(record)
    }

    async fn find_by(
        &self,
        column: Column,
        value: &str,
    ) -> Result<Option<SignatureRecord>, StoreError> {
        self.inner.find_by(column, value).await
    }

    async fn find_by_or(
        &self,
        column_a: Column,
        value_a: &str,
        column_b: Column,
        value_b: &str,
    ) -> Result<Vec<SignatureRecord>, StoreError> {
        self.inner
            .find_by_or(column_a, value_a, column_b, value_b)
            .await
    }

    async fn count(&self) -> Result<u64, StoreError> {
        self.inner.count().await
    }

    async fn list_all(&self, order: ListOrder) -> Result<Vec<SignatureRecord>, StoreError> {
        self.inner.list_all(order).await
    }

    async fn find_by_id(&self, id: u64) -> Result<Option<SignatureRecord>, StoreError> {
        self.inner.find_by_id(id).await
    }

    async fn health_check(&self) -> bool {
        match self.storage_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => fs::metadata(parent)
                .await
                .map(|m| m.is_dir())
                .unwrap_or(false),
            _ => true,
        }
    }
}
