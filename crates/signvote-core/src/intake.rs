//! Signature intake: the accept or reject decision for a submission.

use crate::error::IntakeError;
use crate::normalizer::{normalize, NormalizedSignature};
use crate::types::SignaturePayload;
use signvote_store::{Column, NewSignatureRecord, SignatureRecord, SignatureStore, StoreError};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Accepts at most one signature per device identifier.
#[derive(Clone)]
pub struct IntakeService {
    store: Arc<dyn SignatureStore>,
}

impl IntakeService {
    pub fn new(store: Arc<dyn SignatureStore>) -> Self {
        Self { store }
    }

    /// Validate, deduplicate and store a submission.
    ///
    /// Any prior record sharing either the uuid or the fingerprint rejects
    /// the submission. The store's uniqueness constraint backs the check up
    /// when two submissions from one device race past it.
    #[instrument(
        skip(self, payload),
        fields(device_uuid = tracing::field::Empty, device_fingerprint = tracing::field::Empty)
    )]
    pub async fn submit(
        &self,
        payload: &SignaturePayload,
        origin_ip: Option<String>,
    ) -> Result<SignatureRecord, IntakeError> {
        let normalized = normalize(payload)?;

        let span = tracing::Span::current();
        span.record("device_uuid", normalized.device_uuid.as_str());
        span.record("device_fingerprint", normalized.device_fingerprint.as_str());

        let existing = self
            .store
            .find_by_or(
                Column::DeviceUuid,
                &normalized.device_uuid,
                Column::DeviceFingerprint,
                &normalized.device_fingerprint,
            )
            .await?;

        if let Some(prior) = existing.first() {
            warn!(existing_id = prior.id, "Device has already signed");
            return Err(IntakeError::AlreadySigned);
        }

        match self.store.insert(into_new_record(normalized, origin_ip)).await {
            Ok(record) => {
                info!(id = record.id, "Signature accepted");
                Ok(record)
            }
            Err(StoreError::Conflict(column)) => {
                warn!(%column, "Concurrent submission from the same device");
                Err(IntakeError::AlreadySigned)
            }
            Err(e) => Err(IntakeError::Storage(e)),
        }
    }
}

fn into_new_record(normalized: NormalizedSignature, ip: Option<String>) -> NewSignatureRecord {
    NewSignatureRecord {
        ip,
        device_uuid: normalized.device_uuid,
        device_fingerprint: normalized.device_fingerprint,
        signature: normalized.signature_name,
        room_number: normalized.room_number,
        signature_image: normalized.signature_image,
        created_at: normalized.created_at,
    }
}
