//! Submission validation and canonicalization.

use crate::error::ValidationError;
use crate::types::{non_empty, SignaturePayload};
use chrono::{DateTime, SecondsFormat, Utc};

/// Prefix marking an inline image data URI.
const IMAGE_DATA_URI_PREFIX: &str = "data:image/";

/// A submission that passed validation, ready to store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedSignature {
    /// Trimmed signer name
    pub signature_name: String,
    /// Trimmed room reference
    pub room_number: String,
    /// Encoded image without any data-URI prefix
    pub signature_image: String,
    pub device_uuid: String,
    pub device_fingerprint: String,
    pub created_at: String,
}

/// Validate and canonicalize a submission using the current time.
pub fn normalize(payload: &SignaturePayload) -> Result<NormalizedSignature, ValidationError> {
    normalize_at(payload, Utc::now())
}

/// Validate and canonicalize a submission.
///
/// `now` becomes `created_at` when the payload carries no signing time.
pub fn normalize_at(
    payload: &SignaturePayload,
    now: DateTime<Utc>,
) -> Result<NormalizedSignature, ValidationError> {
    let signature_data = non_empty(&payload.signature_data);
    let signature_name = trimmed(&payload.signature_name);
    let (signature_data, signature_name) = match (signature_data, signature_name) {
        (Some(data), Some(name)) => (data, name),
        _ => return Err(ValidationError::MissingSignatureOrName),
    };

    let room_number = trimmed(&payload.room_number).ok_or(ValidationError::MissingRoom)?;

    let (device_uuid, device_fingerprint) = match (
        non_empty(&payload.device_uuid),
        non_empty(&payload.device_fingerprint),
    ) {
        (Some(uuid), Some(fingerprint)) => (uuid, fingerprint),
        _ => return Err(ValidationError::MissingDeviceInfo),
    };

    let created_at = match non_empty(&payload.signature_time) {
        Some(time) => time.to_string(),
        None => now.to_rfc3339_opts(SecondsFormat::Millis, true),
    };

    Ok(NormalizedSignature {
        signature_name: signature_name.to_string(),
        room_number: room_number.to_string(),
        signature_image: strip_data_uri(signature_data).to_string(),
        device_uuid: device_uuid.to_string(),
        device_fingerprint: device_fingerprint.to_string(),
        created_at,
    })
}

/// Drop an image data-URI prefix, keeping the encoded payload.
///
/// Everything up to and including the first comma is removed. Input
/// without the prefix, without a comma, or with nothing after the comma is
/// returned unchanged.
pub fn strip_data_uri(data: &str) -> &str {
    if !data.starts_with(IMAGE_DATA_URI_PREFIX) {
        return data;
    }

    match data.split_once(',') {
        Some((_, payload)) if !payload.is_empty() => payload,
        _ => data,
    }
}

fn trimmed(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
