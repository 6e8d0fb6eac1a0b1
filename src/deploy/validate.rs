//! Pre-flight configuration validation
//!
//! Runs every rule independently and collects all violations; no network
//! contact, no short-circuiting. Emission-share overflow is deliberately a
//! warning rather than an error, mirroring the wizard's existing behavior.

use serde::Serialize;
use std::collections::HashSet;

use super::config::{NetworkRegistry, PoolConfiguration, MAX_REACTIVITY};

/// Outcome of validating one configuration
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

/// Validate a pool configuration against static rules and the network table
pub fn validate(config: &PoolConfiguration, networks: &NetworkRegistry) -> ValidationReport {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if config.name.chars().count() < 2 {
        errors.push("Pool name must be at least 2 characters long".to_string());
    }

    if config.selected_assets.is_empty() {
        errors.push("At least one asset must be selected".to_string());
    }

    let mut seen = HashSet::new();
    for asset in &config.selected_assets {
        if !seen.insert(asset.id.as_str()) {
            errors.push(format!("Duplicate asset selected: {}", asset.id));
        }
    }

    if config.selected_assets.len() > config.max_positions as usize {
        errors.push(format!(
            "Number of assets ({}) cannot exceed max positions ({})",
            config.selected_assets.len(),
            config.max_positions
        ));
    }

    if config.backstop_take_rate < 0.0 || config.backstop_take_rate > 1.0 {
        errors.push("Backstop take rate must be between 0 and 1".to_string());
    }

    if config.risk_parameters.preset == "custom" {
        if let Some(params) = &config.risk_parameters.custom_params {
            if params.util >= params.max_util {
                errors.push(
                    "Utilization threshold must be less than max utilization".to_string(),
                );
            }
            if params.collateral_factor > 1.0 || params.liquidation_factor > 1.0 {
                errors.push("Collateral and liquidation factors must be <= 1".to_string());
            }
            if params.reactivity > MAX_REACTIVITY {
                errors.push(format!("Reactivity must be <= {}", MAX_REACTIVITY));
            }
            if params.r_base < 0.0
                || params.r_one < 0.0
                || params.r_two < 0.0
                || params.r_three < 0.0
            {
                errors.push("Interest rate parameters must be non-negative".to_string());
            }
        }
    }

    let total_supply: f64 = config.emissions.iter().map(|e| e.supply_emission).sum();
    let total_borrow: f64 = config.emissions.iter().map(|e| e.borrow_emission).sum();
    if total_supply > 1.0 {
        warnings.push("Total supply emissions exceed 100%".to_string());
    }
    if total_borrow > 1.0 {
        warnings.push("Total borrow emissions exceed 100%".to_string());
    }

    if !networks.contains(&config.network) {
        errors.push(format!("Unsupported network: {}", config.network));
    }

    ValidationReport {
        valid: errors.is_empty(),
        errors,
        warnings,
    }
}
