//! API endpoints for the deployment service

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

mod assets;
mod deploy;
mod validate;

use crate::deploy::NetworkRegistry;

/// Shared application state: the read-only network table
#[derive(Clone)]
pub struct AppState {
    pub networks: Arc<NetworkRegistry>,
}

impl AppState {
    pub fn new(networks: Arc<NetworkRegistry>) -> Self {
        Self { networks }
    }
}

/// Create the API router with all endpoints
pub fn router(networks: Arc<NetworkRegistry>) -> Router {
    let app_state = AppState::new(networks);

    Router::new()
        // Deployment
        .route("/deploy", post(deploy::deploy_pool))
        // Pre-flight validation
        .route("/validate", post(validate::validate_config))
        // Asset catalog (supports ?network=testnet|mainnet|futurenet|local)
        .route("/assets", get(assets::list_assets))
        .with_state(app_state)
}
