//! Pool Deployer Backend
//!
//! HTTP API server for the lending-pool creation wizard: configuration
//! validation, asset catalogs and multi-step on-chain pool deployment.

use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pool_deployer_backend::api;
use pool_deployer_backend::deploy::NetworkRegistry;

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    // Static network table, shared read-only across requests
    let networks = Arc::new(NetworkRegistry::builtin());
    tracing::info!(
        "Network registry initialized: {:?}",
        networks.network_names()
    );

    // Build router
    let app = Router::new()
        .route("/health", get(health_check))
        .nest("/api", api::router(networks))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    // Start server
    let port = std::env::var("POOL_DEPLOYER_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3001);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Starting server on {}", addr);
    tracing::info!("API endpoints:");
    tracing::info!("  GET  /health        - Health check");
    tracing::info!("  POST /api/deploy    - Validate and deploy a pool (testnet only)");
    tracing::info!("  POST /api/validate  - Run configuration validation");
    tracing::info!("  GET  /api/assets    - List selectable assets (?network=testnet)");

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}

async fn health_check() -> &'static str {
    "ok"
}
