//! Inbound request shapes.

use serde::Deserialize;

/// A signature submission as sent by the signing page.
///
/// Every field is optional on the wire; presence is decided by
/// validation so that each missing field gets its own message.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SignaturePayload {
    /// Signature image, usually a `data:image/...;base64,` URI
    pub signature_data: Option<String>,

    /// Signer's typed name
    pub signature_name: Option<String>,

    pub room_number: Option<String>,

    pub device_uuid: Option<String>,

    pub device_fingerprint: Option<String>,

    /// Client-side signing time, stored verbatim when present
    pub signature_time: Option<String>,
}

/// Identifier pair a device presents on read paths.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeviceIdentity {
    pub uuid: Option<String>,
    pub fingerprint: Option<String>,
}

impl DeviceIdentity {
    pub fn new(uuid: impl Into<String>, fingerprint: impl Into<String>) -> Self {
        Self {
            uuid: Some(uuid.into()),
            fingerprint: Some(fingerprint.into()),
        }
    }

    /// Both identifiers, if both are present and non-empty.
    pub fn complete(&self) -> Option<(&str, &str)> {
        match (non_empty(&self.uuid), non_empty(&self.fingerprint)) {
            (Some(uuid), Some(fingerprint)) => Some((uuid, fingerprint)),
            _ => None,
        }
    }
}

pub(crate) fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_deserialization_with_missing_fields() {
        let json = r#"{
            "signature_name": "Alice",
            "room_number": "12B",
            "device_uuid": null
        }"#;

        let payload: SignaturePayload = serde_json::from_str(json).unwrap();
        assert_eq!(payload.signature_name.as_deref(), Some("Alice"));
        assert!(payload.signature_data.is_none());
        assert!(payload.device_uuid.is_none());
        assert!(payload.signature_time.is_none());
    }

    #[test]
    fn test_device_identity_complete() {
        assert_eq!(
            DeviceIdentity::new("u1", "f1").complete(),
            Some(("u1", "f1"))
        );
        assert!(DeviceIdentity::new("u1", "").complete().is_none());
        assert!(DeviceIdentity::default().complete().is_none());
    }
}
