//! Device identity resolution.

use signvote_store::{Column, SignatureRecord, SignatureStore, StoreError};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Finds the stored signature belonging to a device.
///
/// The uuid is tried first and the fingerprint only when the uuid matches
/// nothing, so a device that rotates one identifier while keeping the
/// other is still recognized.
#[derive(Clone)]
pub struct IdentityResolver {
    store: Arc<dyn SignatureStore>,
}

impl IdentityResolver {
    pub fn new(store: Arc<dyn SignatureStore>) -> Self {
        Self { store }
    }

    /// Resolve a device to its signature, or `None` if it has not signed.
    #[instrument(skip(self))]
    pub async fn resolve(
        &self,
        uuid: &str,
        fingerprint: &str,
    ) -> Result<Option<SignatureRecord>, StoreError> {
        if let Some(record) = self.store.find_by(Column::DeviceUuid, uuid).await? {
            debug!(id = record.id, "Resolved device by uuid");
            return Ok(Some(record));
        }

        let record = self
            .store
            .find_by(Column::DeviceFingerprint, fingerprint)
            .await?;
        if let Some(record) = &record {
            debug!(id = record.id, "Resolved device by fingerprint");
        }
        Ok(record)
    }
}
