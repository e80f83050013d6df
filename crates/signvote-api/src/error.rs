//! Error types for the signature API.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use signvote_core::{IntakeError, ValidationError, ViewError};
use signvote_store::StoreError;
use thiserror::Error;
use tracing::error;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("You have already signed")]
    AlreadySigned,

    #[error("{0}")]
    NotFound(String),

    #[error("Endpoint not found")]
    EndpointNotFound,

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(&'static str),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Storage error: {0}")]
    Storage(String),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::Validation(ValidationError::MissingSignatureOrName) => {
                (StatusCode::BAD_REQUEST, "MISSING_SIGNATURE_OR_NAME")
            }
            ApiError::Validation(ValidationError::MissingRoom) => {
                (StatusCode::BAD_REQUEST, "MISSING_ROOM")
            }
            ApiError::Validation(ValidationError::MissingDeviceInfo) => {
                (StatusCode::BAD_REQUEST, "MISSING_DEVICE_INFO")
            }
            ApiError::AlreadySigned => (StatusCode::CONFLICT, "ALREADY_SIGNED"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::EndpointNotFound => (StatusCode::NOT_FOUND, "ENDPOINT_NOT_FOUND"),
            ApiError::InvalidBody(_) => (StatusCode::BAD_REQUEST, "INVALID_BODY"),
            ApiError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            ApiError::RateLimitExceeded => (StatusCode::TOO_MANY_REQUESTS, "RATE_LIMIT_EXCEEDED"),
            ApiError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR"),
        };

        if status.is_server_error() {
            error!("{}", self);
        }

        let body = ErrorResponse {
            error: self.to_string(),
            code: code.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidBody(rejection.body_text())
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Conflict(_) => ApiError::AlreadySigned,
            other => ApiError::Storage(other.to_string()),
        }
    }
}

impl From<IntakeError> for ApiError {
    fn from(e: IntakeError) -> Self {
        match e {
            IntakeError::Validation(v) => ApiError::Validation(v),
            IntakeError::AlreadySigned => ApiError::AlreadySigned,
            IntakeError::Storage(s) => s.into(),
        }
    }
}

impl From<ViewError> for ApiError {
    fn from(e: ViewError) -> Self {
        match e {
            ViewError::RecordNotFound(_) | ViewError::ImageNotFound(_) => {
                ApiError::NotFound(e.to_string())
            }
            ViewError::Storage(s) => s.into(),
        }
    }
}
