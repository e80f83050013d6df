//! Integration tests for the signature API.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use secrecy::SecretString;
use serde_json::{json, Value};
use signvote_api::api::{create_router_with_rate_limit, AppState, AuthState, RateLimitState};
use signvote_store::{FileStore, MemoryStore, SignatureStore};
use std::num::NonZeroU32;
use std::sync::Arc;
use tower::ServiceExt;

const TOKEN: &str = "test-token";

/// Create a test app with memory-only storage.
fn create_test_app() -> Router {
    create_test_app_with_store(Arc::new(MemoryStore::new()))
}

fn create_test_app_with_store(store: Arc<dyn SignatureStore>) -> Router {
    let state = AppState::new(store, NonZeroU32::new(667).unwrap(), "test");
    let auth = AuthState::new(&SecretString::new(TOKEN.to_string()));
    create_router_with_rate_limit(state, auth, RateLimitState::permissive())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("Authorization", format!("Bearer {}", TOKEN))
        .body(Body::empty())
        .unwrap()
}

fn post(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("Authorization", format!("Bearer {}", TOKEN))
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn submission(uuid: &str, fingerprint: &str, name: &str) -> Value {
    json!({
        "signature_data": "data:image/png;base64,AAA",
        "signature_name": name,
        "room_number": " 12B ",
        "device_uuid": uuid,
        "device_fingerprint": fingerprint,
    })
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, json)
}

#[tokio::test]
async fn test_health_without_token() {
    let app = create_test_app();

    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let (status, json) = send(&app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["database"], "connected");
    assert_eq!(json["environment"], "test");
}

#[tokio::test]
async fn test_version_without_token() {
    let app = create_test_app();

    let request = Request::builder()
        .uri("/version")
        .body(Body::empty())
        .unwrap();
    let (status, json) = send(&app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["application"], "SignVote API");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_auth_failures() {
    let app = create_test_app();

    let missing = Request::builder()
        .uri("/statistics")
        .body(Body::empty())
        .unwrap();
    let (status, json) = send(&app, missing).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["code"], "UNAUTHORIZED");

    let wrong_scheme = Request::builder()
        .uri("/statistics")
        .header("Authorization", format!("Basic {}", TOKEN))
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, wrong_scheme).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let wrong_token = Request::builder()
        .uri("/admin/signatures")
        .header("Authorization", "Bearer nope")
        .body(Body::empty())
        .unwrap();
    let (status, json) = send(&app, wrong_token).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(json["error"].as_str().unwrap().contains("invalid token"));
}

#[tokio::test]
async fn test_sign_then_duplicate_rejected() {
    let app = create_test_app();

    let (status, json) = send(&app, post("/sign", submission("u1", "f1", "Alice"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["id"], 1);

    // Same uuid, new fingerprint
    let (status, json) = send(&app, post("/sign", submission("u1", "f2", "Alice"))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "ALREADY_SIGNED");

    // Same fingerprint, new uuid
    let (status, _) = send(&app, post("/sign", submission("u2", "f1", "Alice"))).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, json) = send(&app, get("/statistics")).await;
    assert_eq!(json["total_signatures"], 1);
}

#[tokio::test]
async fn test_sign_validation_messages() {
    let app = create_test_app();

    let (status, json) = send(
        &app,
        post("/sign", json!({ "signature_data": "AAA", "room_number": "1" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "MISSING_SIGNATURE_OR_NAME");

    let (status, json) = send(
        &app,
        post(
            "/sign",
            json!({ "signature_data": "AAA", "signature_name": "Alice" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "MISSING_ROOM");

    let (status, json) = send(
        &app,
        post(
            "/sign",
            json!({
                "signature_data": "AAA",
                "signature_name": "Alice",
                "room_number": "12B",
                "device_uuid": "u1",
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "MISSING_DEVICE_INFO");

    let (_, json) = send(&app, get("/statistics")).await;
    assert_eq!(json["total_signatures"], 0);
}

#[tokio::test]
async fn test_sign_records_forwarded_ip() {
    let app = create_test_app();

    let request = Request::builder()
        .method("POST")
        .uri("/sign")
        .header("Authorization", format!("Bearer {}", TOKEN))
        .header("Content-Type", "application/json")
        .header("CF-Connecting-IP", "203.0.113.50")
        .body(Body::from(submission("u1", "f1", "Alice").to_string()))
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);

    let (_, json) = send(&app, get("/admin/signatures")).await;
    assert_eq!(json["total"], 1);
    let record = &json["signatures"][0];
    assert_eq!(record["ip"], "203.0.113.50");
    assert_eq!(record["signature_image"], "AAA");
    assert_eq!(record["room_number"], "12B");
    assert_eq!(record["device_uuid"], "u1");
    assert_eq!(record["device_fingerprint"], "f1");
}

#[tokio::test]
async fn test_user_status() {
    let app = create_test_app();
    send(&app, post("/sign", submission("u1", "f1", "Alice"))).await;

    let (status, json) = send(
        &app,
        post("/user-status", json!({ "uuid": "u1", "fingerprint": "other" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["hasSigned"], true);
    assert_eq!(json["signature"], "Alice");

    // Fingerprint fallback
    let (_, json) = send(
        &app,
        post("/user-status", json!({ "uuid": "new", "fingerprint": "f1" })),
    )
    .await;
    assert_eq!(json["hasSigned"], true);

    let (_, json) = send(
        &app,
        post("/user-status", json!({ "uuid": "u9", "fingerprint": "f9" })),
    )
    .await;
    assert_eq!(json["hasSigned"], false);
    assert!(json["signature"].is_null());

    let (status, json) = send(&app, post("/user-status", json!({ "uuid": "u1" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "MISSING_DEVICE_INFO");
}

#[tokio::test]
async fn test_user_signature() {
    let app = create_test_app();
    send(&app, post("/sign", submission("u1", "f1", "Alice"))).await;

    let (status, json) = send(
        &app,
        post("/user-signature", json!({ "uuid": "u1", "fingerprint": "f1" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["signature"]["signature"], "Alice");
    assert_eq!(json["signature"]["signature_image"], "AAA");
    assert_eq!(json["signature"]["room_number"], "12B");
    assert!(json["signature"]["created_at"].is_string());
    assert!(json["signature"].get("device_uuid").is_none());

    // Incomplete identity is not an error on this route
    let (status, json) = send(&app, post("/user-signature", json!({ "uuid": "u1" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["signature"].is_null());
}

#[tokio::test]
async fn test_all_signatures_redacted_and_ordered() {
    let app = create_test_app();

    let mut first = submission("u1", "f1", "Alice");
    first["signature_time"] = json!("2024-01-01T08:00:00.000Z");
    let mut second = submission("u2", "f2", "Bob");
    second["signature_time"] = json!("2024-01-02T08:00:00.000Z");
    send(&app, post("/sign", first)).await;
    send(&app, post("/sign", second)).await;

    let (status, json) = send(&app, get("/all-signatures")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total"], 2);

    let rows = json["signatures"].as_array().unwrap();
    assert_eq!(rows[0]["signature"], "Bob");
    assert_eq!(rows[0]["created_at"], "2024-01-02T08:00:00.000Z");
    assert_eq!(rows[1]["signature"], "Alice");
    for row in rows {
        assert!(row.get("signature_image").is_none());
        assert!(row.get("device_uuid").is_none());
        assert!(row.get("device_fingerprint").is_none());
        assert!(row.get("ip").is_none());
    }
}

#[tokio::test]
async fn test_statistics_empty() {
    let app = create_test_app();

    let (status, json) = send(&app, get("/statistics")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total_signatures"], 0);
    assert_eq!(json["target_signatures"], 667);
    assert_eq!(json["progress"], 0.0);
}

#[tokio::test]
async fn test_download_signature() {
    let app = create_test_app();
    send(&app, post("/sign", submission("u1", "f1", "Alice"))).await;

    let (status, json) = send(&app, get("/signature/download/1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["user_id"], 1);
    assert_eq!(json["signature_name"], "Alice");
    assert_eq!(json["signature_data"], "AAA");

    let (status, json) = send(&app, get("/signature/download/99")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_unknown_endpoint() {
    let app = create_test_app();

    let (status, json) = send(&app, get("/nope")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "ENDPOINT_NOT_FOUND");
}

#[tokio::test]
async fn test_wrong_method_is_unknown_endpoint() {
    let app = create_test_app();

    for request in [
        get("/sign"),
        post("/statistics", json!({})),
        post("/health", json!({})),
    ] {
        let (status, json) = send(&app, request).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["code"], "ENDPOINT_NOT_FOUND");
    }
}

#[tokio::test]
async fn test_download_non_numeric_id_is_unknown_endpoint() {
    let app = create_test_app();

    for uri in [
        "/signature/download/abc",
        "/signature/download/99999999999999999999999",
        "/signature/download/+1",
    ] {
        let (status, json) = send(&app, get(uri)).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{}", uri);
        assert_eq!(json["code"], "ENDPOINT_NOT_FOUND");
    }
}

#[tokio::test]
async fn test_malformed_body_is_json_error() {
    let app = create_test_app();

    let request = Request::builder()
        .method("POST")
        .uri("/sign")
        .header("Authorization", format!("Bearer {}", TOKEN))
        .header("Content-Type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, json) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "INVALID_BODY");

    let request = Request::builder()
        .method("POST")
        .uri("/user-status")
        .header("Authorization", format!("Bearer {}", TOKEN))
        .body(Body::from("{}"))
        .unwrap();
    let (status, json) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "INVALID_BODY");
}

#[tokio::test]
async fn test_cors_preflight_skips_auth() {
    let app = create_test_app();

    let request = Request::builder()
        .method("OPTIONS")
        .uri("/sign")
        .header("Origin", "https://petition.example")
        .header("Access-Control-Request-Method", "POST")
        .header("Access-Control-Request-Headers", "content-type,authorization")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "*"
    );
}

#[tokio::test]
async fn test_rate_limiting() {
    let state = AppState::new(
        Arc::new(MemoryStore::new()),
        NonZeroU32::new(667).unwrap(),
        "test",
    );
    let auth = AuthState::new(&SecretString::new(TOKEN.to_string()));
    // Very restrictive rate limit: 1 request per minute
    let app = create_router_with_rate_limit(state, auth, RateLimitState::new(1));

    let (status, _) = send(&app, get("/statistics")).await;
    assert_eq!(status, StatusCode::OK);

    let (status, json) = send(&app, get("/statistics")).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(json["code"], "RATE_LIMIT_EXCEEDED");
}

#[tokio::test]
async fn test_signatures_persist_across_restart() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("signatures.json");

    {
        let store = FileStore::open(&path).await.unwrap();
        let app = create_test_app_with_store(Arc::new(store));
        let (status, _) = send(&app, post("/sign", submission("u1", "f1", "Alice"))).await;
        assert_eq!(status, StatusCode::OK);
    }

    let store = FileStore::open(&path).await.unwrap();
    let app = create_test_app_with_store(Arc::new(store));

    let (status, _) = send(&app, post("/sign", submission("u1", "f1", "Alice"))).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, json) = send(&app, get("/statistics")).await;
    assert_eq!(json["total_signatures"], 1);
    assert_eq!(json["progress"], 0.1);
}
