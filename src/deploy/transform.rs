//! Configuration transformer
//!
//! Maps the wizard-facing configuration into the typed on-chain argument
//! structures: one deploy-argument record, one reserve configuration per
//! selected asset, and zero/one/two emission entries per asset. Pure aside
//! from the salt randomness; no network contact.

use rand::{thread_rng, RngCore};

use super::config::{
    risk_preset, ContractAddresses, PoolConfiguration, SCALAR_5, SCALAR_7,
};
use super::error::DeployError;
use super::tx::{
    DeployPoolArgs, ReserveConfig, ReserveEmissionMetadata, RES_TYPE_BORROWER, RES_TYPE_SUPPLIER,
};

/// Everything the orchestrator needs to drive one deployment attempt
#[derive(Debug, Clone)]
pub struct DeploymentPlan {
    pub deploy_args: DeployPoolArgs,
    pub reserve_configs: Vec<ReserveConfig>,
    pub emission_entries: Vec<ReserveEmissionMetadata>,
}

/// 32 cryptographically random bytes, hex-encoded. Fresh per call so a retried
/// deployment never collides on the derived pool address.
pub fn generate_salt() -> String {
    let mut salt = [0u8; 32];
    thread_rng().fill_bytes(&mut salt);
    hex::encode(salt)
}

fn scale(value: f64, scalar: f64) -> u32 {
    (value * scalar).round() as u32
}

/// Build the deployment plan for a configuration
///
/// `admin` is left empty; the orchestrator fills it with the signer's public
/// key once the keypair is known.
pub fn transform(
    config: &PoolConfiguration,
    contracts: &ContractAddresses,
) -> Result<DeploymentPlan, DeployError> {
    let deploy_args = DeployPoolArgs {
        admin: String::new(),
        name: config.name.clone(),
        salt: generate_salt(),
        oracle: contracts.oracle.clone(),
        backstop_take_rate: scale(config.backstop_take_rate, SCALAR_7),
        max_positions: config.max_positions,
        min_collateral: config.min_collateral,
    };

    let preset = &config.risk_parameters.preset;
    let reserve_configs = config
        .selected_assets
        .iter()
        .enumerate()
        .map(|(index, asset)| {
            let params = if preset == "custom" {
                let custom = config.risk_parameters.custom_params.as_ref().ok_or_else(|| {
                    DeployError::Config(
                        "custom risk preset selected without custom parameters".to_string(),
                    )
                })?;
                ReserveParams {
                    c_factor: scale(custom.collateral_factor, SCALAR_7),
                    l_factor: scale(custom.liquidation_factor, SCALAR_7),
                    util: scale(custom.util, SCALAR_7),
                    max_util: scale(custom.max_util, SCALAR_7),
                    r_base: scale(custom.r_base, SCALAR_5),
                    r_one: scale(custom.r_one, SCALAR_5),
                    r_two: scale(custom.r_two, SCALAR_5),
                    r_three: scale(custom.r_three, SCALAR_7),
                    reactivity: custom.reactivity,
                }
            } else {
                let table = risk_preset(preset).ok_or_else(|| {
                    DeployError::Config(format!("unknown risk preset: {}", preset))
                })?;
                ReserveParams {
                    c_factor: table.c_factor,
                    l_factor: table.l_factor,
                    util: table.util,
                    max_util: table.max_util,
                    r_base: table.r_base,
                    r_one: table.r_one,
                    r_two: table.r_two,
                    r_three: table.r_three,
                    reactivity: table.reactivity,
                }
            };
            Ok(ReserveConfig {
                index: index as u32,
                decimals: asset.decimals,
                c_factor: params.c_factor,
                l_factor: params.l_factor,
                util: params.util,
                max_util: params.max_util,
                r_base: params.r_base,
                r_one: params.r_one,
                r_two: params.r_two,
                r_three: params.r_three,
                reactivity: params.reactivity,
                supply_cap: i128::MAX,
                enabled: true,
            })
        })
        .collect::<Result<Vec<_>, DeployError>>()?;

    let mut emission_entries = Vec::new();
    for (index, emission) in config.emissions.iter().enumerate() {
        if emission.supply_emission > 0.0 {
            emission_entries.push(ReserveEmissionMetadata {
                res_index: index as u32,
                res_type: RES_TYPE_SUPPLIER,
                share: (emission.supply_emission * SCALAR_7).round() as i128,
            });
        }
        if emission.borrow_emission > 0.0 {
            emission_entries.push(ReserveEmissionMetadata {
                res_index: index as u32,
                res_type: RES_TYPE_BORROWER,
                share: (emission.borrow_emission * SCALAR_7).round() as i128,
            });
        }
    }

    Ok(DeploymentPlan {
        deploy_args,
        reserve_configs,
        emission_entries,
    })
}

struct ReserveParams {
    c_factor: u32,
    l_factor: u32,
    util: u32,
    max_util: u32,
    r_base: u32,
    r_one: u32,
    r_two: u32,
    r_three: u32,
    reactivity: u32,
}
