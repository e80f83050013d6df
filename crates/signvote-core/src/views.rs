//! Public and administrative projections of stored signatures.

use crate::error::ViewError;
use crate::resolver::IdentityResolver;
use serde::Serialize;
use signvote_store::{ListOrder, SignatureRecord, SignatureStore};
use std::sync::Arc;
use tracing::debug;

/// Redacted row for the public wall: no image, no device identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublicSignature {
    pub id: u64,
    pub signature: String,
    pub room_number: String,
    pub created_at: String,
}

impl From<SignatureRecord> for PublicSignature {
    fn from(record: SignatureRecord) -> Self {
        Self {
            id: record.id,
            signature: record.signature,
            room_number: record.room_number,
            created_at: record.created_at,
        }
    }
}

/// A device's own signature, shown back to the signer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OwnSignature {
    pub signature: String,
    pub signature_image: String,
    pub created_at: String,
    pub room_number: String,
}

impl From<SignatureRecord> for OwnSignature {
    fn from(record: SignatureRecord) -> Self {
        Self {
            signature: record.signature,
            signature_image: record.signature_image,
            created_at: record.created_at,
            room_number: record.room_number,
        }
    }
}

/// Whether a device has signed, and under which name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureStatus {
    pub has_signed: bool,
    pub signature: Option<String>,
}

/// Name and image of a single signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureImage {
    pub id: u64,
    pub signature_name: String,
    pub signature_data: String,
}

/// Read-only projections over the stored set.
///
/// The administrative listing exposes device identifiers and images;
/// callers must gate it behind authentication.
#[derive(Clone)]
pub struct ReadViews {
    store: Arc<dyn SignatureStore>,
    resolver: IdentityResolver,
}

impl ReadViews {
    pub fn new(store: Arc<dyn SignatureStore>) -> Self {
        Self {
            resolver: IdentityResolver::new(store.clone()),
            store,
        }
    }

    /// All signatures, most recent first, redacted.
    pub async fn public_listing(&self) -> Result<Vec<PublicSignature>, ViewError> {
        let records = self.store.list_all(ListOrder::CreatedAtDesc).await?;
        Ok(records.into_iter().map(PublicSignature::from).collect())
    }

    /// The caller's own signature, resolved uuid first.
    pub async fn own_signature(
        &self,
        uuid: &str,
        fingerprint: &str,
    ) -> Result<Option<OwnSignature>, ViewError> {
        let record = self.resolver.resolve(uuid, fingerprint).await?;
        Ok(record.map(OwnSignature::from))
    }

    pub async fn signature_status(
        &self,
        uuid: &str,
        fingerprint: &str,
    ) -> Result<SignatureStatus, ViewError> {
        let record = self.resolver.resolve(uuid, fingerprint).await?;
        Ok(SignatureStatus {
            has_signed: record.is_some(),
            signature: record.map(|r| r.signature),
        })
    }

    /// Every field of every record, in id order.
    pub async fn admin_listing(&self) -> Result<Vec<SignatureRecord>, ViewError> {
        Ok(self.store.list_all(ListOrder::Id).await?)
    }

    pub async fn download_image(&self, id: u64) -> Result<SignatureImage, ViewError> {
        let record = self
            .store
            .find_by_id(id)
            .await?
            .ok_or(ViewError::RecordNotFound(id))?;

        if record.signature_image.is_empty() {
            debug!(id, "Signature has no stored image");
            return Err(ViewError::ImageNotFound(id));
        }

        Ok(SignatureImage {
            id: record.id,
            signature_name: record.signature,
            signature_data: record.signature_image,
        })
    }
}
