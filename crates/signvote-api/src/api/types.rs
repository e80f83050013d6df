//! API response types.

use serde::Serialize;
use signvote_core::{OwnSignature, PublicSignature, SignatureImage};
use signvote_store::SignatureRecord;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub environment: String,
}

/// Version information.
#[derive(Debug, Serialize)]
pub struct VersionResponse {
    pub application: String,
    pub version: String,
    pub environment: String,
}

/// Whether the calling device has signed.
#[derive(Debug, Serialize)]
pub struct UserStatusResponse {
    #[serde(rename = "hasSigned")]
    pub has_signed: bool,
    /// Signer name, if signed
    pub signature: Option<String>,
}

/// Response after an accepted signature.
#[derive(Debug, Serialize)]
pub struct SignResponse {
    pub message: String,
    pub id: u64,
}

/// The calling device's own signature.
#[derive(Debug, Serialize)]
pub struct UserSignatureResponse {
    pub signature: Option<OwnSignature>,
}

/// Redacted signature wall.
#[derive(Debug, Serialize)]
pub struct PublicSignaturesResponse {
    pub signatures: Vec<PublicSignature>,
    pub total: usize,
}

/// Full records for administrators.
#[derive(Debug, Serialize)]
pub struct AdminSignaturesResponse {
    pub signatures: Vec<SignatureRecord>,
    pub total: usize,
}

/// Progress toward the signature goal.
#[derive(Debug, Serialize)]
pub struct StatisticsResponse {
    pub total_signatures: u64,
    pub target_signatures: u32,
    pub progress: f64,
}

/// Signature image download.
#[derive(Debug, Serialize)]
pub struct DownloadResponse {
    pub user_id: u64,
    pub signature_name: String,
    pub signature_data: String,
}

impl From<SignatureImage> for DownloadResponse {
    fn from(image: SignatureImage) -> Self {
        Self {
            user_id: image.id,
            signature_name: image.signature_name,
            signature_data: image.signature_data,
        }
    }
}
