//! Asset catalog endpoint

use axum::{extract::Query, Json};
use serde::{Deserialize, Serialize};

use crate::deploy::config::{asset_catalog, CatalogAsset};
use crate::types::{ApiError, ApiResult};

#[derive(Debug, Deserialize)]
pub struct AssetsQuery {
    #[serde(default = "default_network")]
    pub network: String,
}

fn default_network() -> String {
    "testnet".to_string()
}

#[derive(Debug, Serialize)]
pub struct AssetsResponse {
    pub network: String,
    pub assets: Vec<CatalogAsset>,
}

/// GET /api/assets?network=X - List selectable assets for a network
pub async fn list_assets(Query(query): Query<AssetsQuery>) -> ApiResult<Json<AssetsResponse>> {
    let assets = asset_catalog(&query.network)
        .ok_or_else(|| ApiError::BadRequest("Invalid network".into()))?;
    Ok(Json(AssetsResponse {
        network: query.network,
        assets,
    }))
}
