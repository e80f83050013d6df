//! HTTP request handlers.

use super::types::{
    AdminSignaturesResponse, DownloadResponse, HealthResponse, PublicSignaturesResponse,
    SignResponse, StatisticsResponse, UserSignatureResponse, UserStatusResponse,
    VersionResponse,
};
use super::AppState;
use crate::error::ApiError;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        ConnectInfo, Path, State,
    },
    http::{HeaderMap, StatusCode},
    Json,
};
use signvote_core::{DeviceIdentity, SignaturePayload, ValidationError};
use std::net::SocketAddr;
use tracing::{info, warn};

/// Name reported by /version.
pub const APPLICATION_NAME: &str = "SignVote API";

/// Health check endpoint.
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    if state.store.health_check().await {
        (
            StatusCode::OK,
            Json(HealthResponse {
                status: "healthy".to_string(),
                database: Some("connected".to_string()),
                error: None,
                environment: state.environment.to_string(),
            }),
        )
    } else {
        warn!("Storage health check failed");
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthResponse {
                status: "unhealthy".to_string(),
                database: None,
                error: Some("storage unavailable".to_string()),
                environment: state.environment.to_string(),
            }),
        )
    }
}

/// Version information endpoint.
pub async fn version(State(state): State<AppState>) -> Json<VersionResponse> {
    Json(VersionResponse {
        application: APPLICATION_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        environment: state.environment.to_string(),
    })
}

/// Check whether a device has already signed.
pub async fn user_status(
    State(state): State<AppState>,
    body: Result<Json<DeviceIdentity>, JsonRejection>,
) -> Result<Json<UserStatusResponse>, ApiError> {
    let Json(identity) = body?;
    let (uuid, fingerprint) = identity
        .complete()
        .ok_or(ApiError::Validation(ValidationError::MissingDeviceInfo))?;

    let status = state.views.signature_status(uuid, fingerprint).await?;

    Ok(Json(UserStatusResponse {
        has_signed: status.has_signed,
        signature: status.signature,
    }))
}

/// Submit a signature.
pub async fn sign(
    State(state): State<AppState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    body: Result<Json<SignaturePayload>, JsonRejection>,
) -> Result<Json<SignResponse>, ApiError> {
    let Json(payload) = body?;
    let origin_ip = client_ip(&headers, connect_info.map(|ConnectInfo(addr)| addr));
    info!(origin_ip = ?origin_ip, "Signature submission received");

    let record = state.intake.submit(&payload, origin_ip).await?;

    Ok(Json(SignResponse {
        message: "Thank you for signing!".to_string(),
        id: record.id,
    }))
}

/// Return the calling device's own signature.
///
/// An incomplete identity is not an error here; it simply resolves to no
/// signature.
pub async fn user_signature(
    State(state): State<AppState>,
    body: Result<Json<DeviceIdentity>, JsonRejection>,
) -> Result<Json<UserSignatureResponse>, ApiError> {
    let Json(identity) = body?;
    let signature = match identity.complete() {
        Some((uuid, fingerprint)) => state.views.own_signature(uuid, fingerprint).await?,
        None => None,
    };

    Ok(Json(UserSignatureResponse { signature }))
}

/// Redacted list of all signatures, most recent first.
pub async fn all_signatures(
    State(state): State<AppState>,
) -> Result<Json<PublicSignaturesResponse>, ApiError> {
    let signatures = state.views.public_listing().await?;
    let total = signatures.len();
    Ok(Json(PublicSignaturesResponse { signatures, total }))
}

/// Progress toward the signature goal.
pub async fn statistics(
    State(state): State<AppState>,
) -> Result<Json<StatisticsResponse>, ApiError> {
    let stats = state.stats.stats().await?;
    Ok(Json(StatisticsResponse {
        total_signatures: stats.total,
        target_signatures: stats.target,
        progress: stats.progress,
    }))
}

/// Full records for administrators.
pub async fn admin_signatures(
    State(state): State<AppState>,
) -> Result<Json<AdminSignaturesResponse>, ApiError> {
    let signatures = state.views.admin_listing().await?;
    let total = signatures.len();
    info!(total, "Administrative listing served");
    Ok(Json(AdminSignaturesResponse { signatures, total }))
}

/// Download a single signature image.
///
/// Ids that are not plain decimal numbers do not name this route.
pub async fn download_signature(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<DownloadResponse>, ApiError> {
    let id = id
        .ok()
        .and_then(|Path(raw)| parse_record_id(&raw))
        .ok_or(ApiError::EndpointNotFound)?;
    let image = state.views.download_image(id).await?;
    Ok(Json(image.into()))
}

fn parse_record_id(raw: &str) -> Option<u64> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

/// Fallback for unknown routes and unsupported methods.
pub async fn not_found() -> ApiError {
    ApiError::EndpointNotFound
}

/// Best-effort origin address of a request.
///
/// Prefers the edge proxy's `CF-Connecting-IP`, then the first
/// `X-Forwarded-For` hop, then the peer socket address.
pub fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> Option<String> {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    };

    header("cf-connecting-ip")
        .map(String::from)
        .or_else(|| {
            header("x-forwarded-for")
                .and_then(|v| v.split(',').next())
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        })
        .or_else(|| peer.map(|addr| addr.ip().to_string()))
}
