//! SignVote API - Entry point.

use signvote_api::{
    api::{create_router_with_rate_limit, AppState, AuthState, RateLimitState},
    config::{Config, LogConfig},
};
use signvote_store::{FileStore, MemoryStore, SignatureStore};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() {
    // Load configuration
    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {:#}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config.log);

    info!("Starting SignVote API ({})", config.app.environment);

    // Initialize storage
    let store: Arc<dyn SignatureStore> = if config.storage.persist {
        match FileStore::open(config.storage.path.clone()).await {
            Ok(s) => Arc::new(s),
            Err(e) => {
                error!("Failed to open signature store {:?}: {}", config.storage.path, e);
                std::process::exit(1);
            }
        }
    } else {
        warn!("Persistence disabled, signatures will be lost on restart");
        Arc::new(MemoryStore::new())
    };

    match store.count().await {
        Ok(count) => info!(
            "Signature store ready with {} of {} signatures",
            count, config.petition.target
        ),
        Err(e) => warn!("Could not count stored signatures: {}", e),
    }

    // Create application state
    let state = AppState::new(store, config.petition.target, config.app.environment.clone());
    let auth = AuthState::new(&config.auth.token);
    let rate_limit = RateLimitState::new(config.rate_limit.global_per_minute);

    let app = create_router_with_rate_limit(state, auth, rate_limit);

    // Bind to address
    let addr = SocketAddr::new(
        config.server.listen_addr.parse().unwrap_or([0, 0, 0, 0].into()),
        config.server.port,
    );

    info!("Listening on {}", addr);

    let listener = match TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    // Run server
    let server = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal());

    if let Err(e) = server.await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }

    info!("Shutdown complete");
}

fn init_logging(log: &LogConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.level));

    let registry = tracing_subscriber::registry().with(filter);
    if log.json {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
