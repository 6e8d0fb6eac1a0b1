//! Pre-flight validation endpoint
//!
//! Always answers with a validation report, never a 5xx: a malformed or
//! incomplete configuration is itself a validation failure.

use axum::{extract::State, Json};

use crate::api::AppState;
use crate::deploy::{validate, PoolConfiguration, ValidationReport};

/// POST /api/validate - Run the validator without deploying
pub async fn validate_config(
    State(state): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> Json<ValidationReport> {
    let has_name = body.get("name").and_then(|v| v.as_str()).is_some_and(|s| !s.is_empty());
    let has_network = body
        .get("network")
        .and_then(|v| v.as_str())
        .is_some_and(|s| !s.is_empty());
    if !has_name || !has_network {
        return Json(ValidationReport {
            valid: false,
            errors: vec!["Pool name and network are required".to_string()],
            warnings: vec![],
        });
    }

    let config: PoolConfiguration = match serde_json::from_value(body) {
        Ok(config) => config,
        Err(e) => {
            return Json(ValidationReport {
                valid: false,
                errors: vec![format!("Validation failed: {}", e)],
                warnings: vec![],
            });
        }
    };

    Json(validate(&config, &state.networks))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deploy::NetworkRegistry;
    use axum::extract::State;
    use std::sync::Arc;

    fn state() -> AppState {
        AppState::new(Arc::new(NetworkRegistry::builtin()))
    }

    fn base_body() -> serde_json::Value {
        serde_json::json!({
            "name": "Test Pool",
            "network": "testnet",
            "backstopTakeRate": 0.1,
            "maxPositions": 4,
            "selectedAssets": [
                {"id": "xlm", "symbol": "XLM", "address": "CXLM", "decimals": 7}
            ],
            "riskParameters": {"preset": "balanced"}
        })
    }

    #[tokio::test]
    async fn valid_config_reports_clean() {
        let report = validate_config(State(state()), Json(base_body())).await.0;
        assert!(report.valid, "errors: {:?}", report.errors);
        assert!(report.warnings.is_empty());
    }

    #[tokio::test]
    async fn missing_name_or_network_is_a_report_not_an_error() {
        let body = serde_json::json!({ "name": "Test Pool" });
        let report = validate_config(State(state()), Json(body)).await.0;
        assert!(!report.valid);
        assert_eq!(report.errors, vec!["Pool name and network are required"]);
    }

    #[tokio::test]
    async fn malformed_body_is_a_report_not_an_error() {
        let mut body = base_body();
        body["selectedAssets"] = serde_json::json!("not-a-list");
        let report = validate_config(State(state()), Json(body)).await.0;
        assert!(!report.valid);
        assert!(report.errors[0].starts_with("Validation failed"));
    }

    #[tokio::test]
    async fn rule_violations_surface_in_the_report() {
        let mut body = base_body();
        body["maxPositions"] = serde_json::json!(0);
        let report = validate_config(State(state()), Json(body)).await.0;
        assert!(!report.valid);
        assert!(report
            .errors
            .iter()
            .any(|e| e.contains("cannot exceed max positions")));
    }
}
