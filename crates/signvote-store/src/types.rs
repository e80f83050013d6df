//! Signature record types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A stored signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureRecord {
    /// Assigned by storage, strictly increasing
    pub id: u64,

    /// Best-effort origin address at submission time
    pub ip: Option<String>,

    /// Client-generated stable device identifier
    pub device_uuid: String,

    /// Client-computed secondary device identifier
    pub device_fingerprint: String,

    /// Signer's name, trimmed
    pub signature: String,

    /// Unit or room reference, trimmed
    pub room_number: String,

    /// Base64 image payload without data-URI prefix
    pub signature_image: String,

    /// ISO-8601 submission time
    pub created_at: String,
}

/// Fields of a signature before storage assigns its id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSignatureRecord {
    pub ip: Option<String>,
    pub device_uuid: String,
    pub device_fingerprint: String,
    pub signature: String,
    pub room_number: String,
    pub signature_image: String,
    pub created_at: String,
}

impl NewSignatureRecord {
    /// Attach an id, producing the stored form.
    pub fn into_record(self, id: u64) -> SignatureRecord {
        SignatureRecord {
            id,
            ip: self.ip,
            device_uuid: self.device_uuid,
            device_fingerprint: self.device_fingerprint,
            signature: self.signature,
            room_number: self.room_number,
            signature_image: self.signature_image,
            created_at: self.created_at,
        }
    }
}

/// Uniquely indexed lookup columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    DeviceUuid,
    DeviceFingerprint,
}

impl Column {
    /// Column name as it appears in records.
    pub fn name(&self) -> &'static str {
        match self {
            Column::DeviceUuid => "device_uuid",
            Column::DeviceFingerprint => "device_fingerprint",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Ordering for full listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListOrder {
    /// Ascending id (insertion order)
    #[default]
    Id,
    /// Most recent `created_at` first, ties broken by higher id first
    CreatedAtDesc,
}
