//! In-memory signature table with unique identifier indexes.

use crate::error::StoreError;
use crate::store::SignatureStore;
use crate::types::{Column, ListOrder, NewSignatureRecord, SignatureRecord};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Snapshot schema version.
const SNAPSHOT_VERSION: u32 = 1;

/// Serialized form of a table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Snapshot {
    pub version: u32,
    pub next_id: u64,
    pub records: Vec<SignatureRecord>,
}

/// Records in id order plus one index per unique column.
#[derive(Debug)]
pub(crate) struct Table {
    records: Vec<SignatureRecord>,
    by_uuid: HashMap<String, usize>,
    by_fingerprint: HashMap<String, usize>,
    next_id: u64,
}

impl Default for Table {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            by_uuid: HashMap::new(),
            by_fingerprint: HashMap::new(),
            next_id: 1,
        }
    }
}

impl Table {
    /// Rebuild a table from a snapshot, rejecting duplicate identifiers.
    pub(crate) fn from_snapshot(snapshot: Snapshot) -> Result<Self, StoreError> {
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(StoreError::Corrupt(format!(
                "unsupported snapshot version {}",
                snapshot.version
            )));
        }

        let mut records = snapshot.records;
        records.sort_by_key(|r| r.id);

        let mut table = Table::default();
        for record in records {
            if table.find_by_id(record.id).is_some() {
                return Err(StoreError::Corrupt(format!("duplicate id {}", record.id)));
            }
            if let Some(column) = table.conflict(&record.device_uuid, &record.device_fingerprint) {
                return Err(StoreError::Corrupt(format!(
                    "record {} repeats a {} value",
                    record.id, column
                )));
            }
            let after = record
                .id
                .checked_add(1)
                .ok_or_else(|| StoreError::Corrupt(format!("record id {} out of range", record.id)))?;
            table.next_id = table.next_id.max(after);
            table.push(record);
        }
        table.next_id = table.next_id.max(snapshot.next_id);

        Ok(table)
    }

    pub(crate) fn snapshot(&self) -> Snapshot {
        Snapshot {
            version: SNAPSHOT_VERSION,
            next_id: self.next_id,
            records: self.records.clone(),
        }
    }

    fn index(&self, column: Column) -> &HashMap<String, usize> {
        match column {
            Column::DeviceUuid => &self.by_uuid,
            Column::DeviceFingerprint => &self.by_fingerprint,
        }
    }

    fn conflict(&self, uuid: &str, fingerprint: &str) -> Option<Column> {
        if !uuid.is_empty() && self.by_uuid.contains_key(uuid) {
            Some(Column::DeviceUuid)
        } else if !fingerprint.is_empty() && self.by_fingerprint.contains_key(fingerprint) {
            Some(Column::DeviceFingerprint)
        } else {
            None
        }
    }

    fn push(&mut self, record: SignatureRecord) {
        let position = self.records.len();
        if !record.device_uuid.is_empty() {
            self.by_uuid.insert(record.device_uuid.clone(), position);
        }
        if !record.device_fingerprint.is_empty() {
            self.by_fingerprint
                .insert(record.device_fingerprint.clone(), position);
        }
        self.records.push(record);
    }

    /// Check both unique indexes and append under the caller's write lock.
    pub(crate) fn insert(
        &mut self,
        record: NewSignatureRecord,
    ) -> Result<SignatureRecord, StoreError> {
        if let Some(column) = self.conflict(&record.device_uuid, &record.device_fingerprint) {
            debug!(%column, "Insert rejected by unique constraint");
            return Err(StoreError::Conflict(column));
        }

        let record = record.into_record(self.next_id);
        self.next_id += 1;
        self.push(record.clone());
        Ok(record)
    }

    /// Undo the most recent insert.
    pub(crate) fn pop_last(&mut self) {
        if let Some(record) = self.records.pop() {
            self.by_uuid.remove(&record.device_uuid);
            self.by_fingerprint.remove(&record.device_fingerprint);
            self.next_id = record.id;
        }
    }

    pub(crate) fn find_by(&self, column: Column, value: &str) -> Option<&SignatureRecord> {
        if value.is_empty() {
            return None;
        }
        self.index(column)
            .get(value)
            .map(|&position| &self.records[position])
    }

    pub(crate) fn find_by_or(
        &self,
        column_a: Column,
        value_a: &str,
        column_b: Column,
        value_b: &str,
    ) -> Vec<SignatureRecord> {
        let mut matches: Vec<&SignatureRecord> = self
            .find_by(column_a, value_a)
            .into_iter()
            .chain(self.find_by(column_b, value_b))
            .collect();
        matches.sort_by_key(|r| r.id);
        matches.dedup_by_key(|r| r.id);
        matches.into_iter().cloned().collect()
    }

    pub(crate) fn find_by_id(&self, id: u64) -> Option<&SignatureRecord> {
        self.records
            .binary_search_by_key(&id, |r| r.id)
            .ok()
            .map(|position| &self.records[position])
    }

    pub(crate) fn len(&self) -> usize {
        self.records.len()
    }

    pub(crate) fn list_all(&self, order: ListOrder) -> Vec<SignatureRecord> {
        let mut records = self.records.clone();
        if order == ListOrder::CreatedAtDesc {
            records.sort_by(|a, b| {
                b.created_at
                    .cmp(&a.created_at)
                    .then_with(|| b.id.cmp(&a.id))
            });
        }
        records
    }
}

/// Volatile signature store. Data is lost on restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    pub(crate) table: RwLock<Table>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        info!("In-memory signature store initialized");
        Self::default()
    }

    pub(crate) fn from_table(table: Table) -> Self {
        Self {
            table: RwLock::new(table),
        }
    }
}

#[async_trait]
impl SignatureStore for MemoryStore {
    async fn insert(&self, record: NewSignatureRecord) -> Result<SignatureRecord, StoreError> {
        let mut table = self.table.write().await;
        let record = table.insert(record)?;
        debug!(id = record.id, "Stored signature");
        Ok(record)
    }

    async fn find_by(
        &self,
        column: Column,
        value: &str,
    ) -> Result<Option<SignatureRecord>, StoreError> {
        let table = self.table.read().await;
        Ok(table.find_by(column, value).cloned())
    }

    async fn find_by_or(
        &self,
        column_a: Column,
        value_a: &str,
        column_b: Column,
        value_b: &str,
    ) -> Result<Vec<SignatureRecord>, StoreError> {
        let table = self.table.read().await;
        Ok(table.find_by_or(column_a, value_a, column_b, value_b))
    }

    async fn count(&self) -> Result<u64, StoreError> {
        let table = self.table.read().await;
        Ok(table.len() as u64)
    }

    async fn list_all(&self, order: ListOrder) -> Result<Vec<SignatureRecord>, StoreError> {
        let table = self.table.read().await;
        Ok(table.list_all(order))
    }

    async fn find_by_id(&self, id: u64) -> Result<Option<SignatureRecord>, StoreError> {
        let table = self.table.read().await;
        Ok(table.find_by_id(id).cloned())
    }

    async fn health_check(&self) -> bool {
        true
    }
}
