//! Pool deployment endpoint
//!
//! Validates the submitted configuration, then drives the multi-step
//! deployment against the network's RPC endpoint. Deployments are restricted
//! to testnet.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::api::AppState;
use crate::deploy::rpc::SorobanRpcClient;
use crate::deploy::tx::Keypair;
use crate::deploy::{validate, PoolConfiguration, PoolDeployer};
use crate::types::{ApiError, ApiResult};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployResponse {
    pub success: bool,
    pub pool_address: String,
    pub transaction_hashes: Vec<String>,
    pub network: String,
    pub warnings: Vec<String>,
}

/// POST /api/deploy - Validate and deploy a pool
pub async fn deploy_pool(
    State(state): State<AppState>,
    Json(mut body): Json<serde_json::Value>,
) -> ApiResult<Json<DeployResponse>> {
    // The signing seed rides alongside the configuration; pull it out before
    // deserializing so it never appears in the config object.
    let secret_key = body
        .as_object_mut()
        .and_then(|obj| obj.remove("userSecretKey"))
        .and_then(|v| v.as_str().map(str::to_string))
        .ok_or_else(|| ApiError::BadRequest("User secret key required for deployment".into()))?;

    let config: PoolConfiguration = serde_json::from_value(body)
        .map_err(|e| ApiError::BadRequest(format!("Invalid request body: {}", e)))?;

    if config.network != "testnet" {
        return Err(ApiError::BadRequest(
            "Only testnet deployments are supported".into(),
        ));
    }
    if config.name.is_empty() || config.selected_assets.is_empty() {
        return Err(ApiError::BadRequest(
            "Missing required fields: name and selectedAssets are required".into(),
        ));
    }

    let keypair = Keypair::from_secret_seed(&secret_key)
        .map_err(|_| ApiError::BadRequest("Invalid secret key format".into()))?;

    let report = validate(&config, &state.networks);
    if !report.valid {
        return Err(ApiError::Validation {
            errors: report.errors,
            warnings: report.warnings,
        });
    }

    let profile = state
        .networks
        .get(&config.network)
        .ok_or_else(|| ApiError::BadRequest(format!("Unsupported network: {}", config.network)))?
        .clone();

    tracing::info!(pool = %config.name, network = %config.network, "starting pool deployment");

    let rpc = SorobanRpcClient::new(&profile.rpc_url);
    let deployer =
        PoolDeployer::new(profile, rpc).map_err(|e| ApiError::Internal(e.to_string()))?;

    match deployer.deploy(&config, &keypair).await {
        Ok(result) => {
            tracing::info!(
                pool_address = %result.pool_address,
                transactions = result.transaction_hashes.len(),
                "pool deployment completed"
            );
            let mut warnings = report.warnings;
            warnings.extend(result.warnings);
            Ok(Json(DeployResponse {
                success: true,
                pool_address: result.pool_address,
                transaction_hashes: result.transaction_hashes,
                network: config.network,
                warnings,
            }))
        }
        Err(failure) => {
            tracing::error!(
                error = %failure.error,
                submitted = failure.transaction_hashes.len(),
                "pool deployment failed"
            );
            Err(ApiError::Deployment {
                details: failure.error.to_string(),
                transaction_hashes: failure.transaction_hashes,
            })
        }
    }
}
