//! Luxury Market - catalog and admin API server.
//!
//! Serves the public catalog, the WhatsApp checkout handoff and the
//! password-protected admin API consumed by the shop's web client.
//!
//! # Storage
//!
//! A valid `DATABASE_URL`/`POSTGRES_URL` selects the `PostgreSQL`
//! backend; otherwise catalog data lives in flat JSON files under
//! `DATA_DIR` (the dev/fallback mode). The choice is made once at
//! startup and injected through the application state.

#![cfg_attr(not(test), forbid(unsafe_code))]

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use luxury_market_server::config::{ServerConfig, StorageConfig};
use luxury_market_server::routes;
use luxury_market_server::state::AppState;
use luxury_market_server::store::{FileStore, SqlStore, Store};

#[tokio::main]
async fn main() {
    // Load configuration from environment
    let config = ServerConfig::from_env().expect("Failed to load configuration");

    // Initialize tracing with EnvFilter
    // Defaults to info level for our crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "luxury_market_server=info,tower_http=debug".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Open the storage backend selected by the environment
    let store = match &config.storage {
        StorageConfig::Postgres(url) => {
            let sql = SqlStore::connect(url)
                .await
                .expect("Failed to connect to PostgreSQL");
            tracing::info!("using PostgreSQL storage");
            Store::Sql(sql)
        }
        StorageConfig::File(dir) => {
            let file = FileStore::open(dir.clone()).expect("Failed to open data directory");
            tracing::info!(dir = %file.dir().display(), "using JSON file storage");
            Store::File(file)
        }
    };

    // Build application state
    let state = AppState::new(config.clone(), store);

    // Build router
    let app = Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes::routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // Start server
    let addr = config.socket_addr();
    tracing::info!("server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Verifies storage availability before returning OK.
/// Returns 503 Service Unavailable if storage is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    let ready = match state.store() {
        Store::Sql(sql) => sqlx::query("SELECT 1").fetch_one(sql.pool()).await.is_ok(),
        Store::File(file) => file.dir().is_dir(),
    };

    if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
