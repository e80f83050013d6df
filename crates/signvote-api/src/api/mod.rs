//! HTTP API for the signature service.

mod handlers;
mod middleware;
mod types;

pub use handlers::*;
pub use middleware::{
    auth_middleware, hash_token, logging_middleware, rate_limit_middleware, AuthState,
    RateLimitState,
};
pub use types::*;

use axum::{
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        Method,
    },
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use signvote_core::{IntakeService, ReadViews, StatsAggregator};
use signvote_store::SignatureStore;
use std::num::NonZeroU32;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Signature storage backend
    pub store: Arc<dyn SignatureStore>,
    /// Accept/reject decisions for submissions
    pub intake: IntakeService,
    /// Progress toward the target
    pub stats: StatsAggregator,
    /// Public, own and administrative projections
    pub views: ReadViews,
    /// Deployment environment name
    pub environment: Arc<str>,
}

impl AppState {
    /// Create new application state.
    pub fn new(
        store: Arc<dyn SignatureStore>,
        target: NonZeroU32,
        environment: impl Into<String>,
    ) -> Self {
        let environment: String = environment.into();
        Self {
            intake: IntakeService::new(store.clone()),
            stats: StatsAggregator::new(store.clone(), target),
            views: ReadViews::new(store.clone()),
            store,
            environment: Arc::from(environment),
        }
    }
}

/// Create the API router with custom rate limiting.
pub fn create_router_with_rate_limit(
    state: AppState,
    auth: AuthState,
    rate_limit: RateLimitState,
) -> Router {
    // Wrong methods on known paths answer like unknown paths
    Router::new()
        // Status surface (no token)
        .route("/health", get(handlers::health).fallback(handlers::not_found))
        .route("/version", get(handlers::version).fallback(handlers::not_found))
        // Signer endpoints
        .route(
            "/user-status",
            post(handlers::user_status).fallback(handlers::not_found),
        )
        .route("/sign", post(handlers::sign).fallback(handlers::not_found))
        .route(
            "/user-signature",
            post(handlers::user_signature).fallback(handlers::not_found),
        )
        // Public read endpoints
        .route(
            "/all-signatures",
            get(handlers::all_signatures).fallback(handlers::not_found),
        )
        .route(
            "/statistics",
            get(handlers::statistics).fallback(handlers::not_found),
        )
        // Administrative endpoints
        .route(
            "/admin/signatures",
            get(handlers::admin_signatures).fallback(handlers::not_found),
        )
        .route(
            "/signature/download/:id",
            get(handlers::download_signature).fallback(handlers::not_found),
        )
        .fallback(handlers::not_found)
        .layer(axum_middleware::from_fn_with_state(auth, auth_middleware))
        .layer(axum_middleware::from_fn_with_state(
            rate_limit,
            rate_limit_middleware,
        ))
        .layer(axum_middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
        .with_state(state)
}

/// CORS for the browser signing page; preflights never reach auth.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
}
