//! Pool configuration model and static per-network tables
//!
//! Holds the user-facing configuration shape submitted by the wizard, the
//! network registry (RPC endpoint, passphrase, contract addresses) and the
//! named risk presets. Presets are plain keyed data: "custom" is simply the
//! absence of a preset lookup.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Fixed-point scalar for factors, utilizations and shares (7 decimals)
pub const SCALAR_7: f64 = 1e7;
/// Fixed-point scalar for the base and slope-one/two interest rates (5 decimals)
pub const SCALAR_5: f64 = 1e5;
/// Ceiling for the rate-reactivity coefficient
pub const MAX_REACTIVITY: u32 = 1000;
/// Transaction fee ceiling in stroops, matching the wizard's flat fee
pub const BASE_FEE: u64 = 10_000;
/// Transaction validity window in seconds
pub const TX_TIMEOUT_SECS: u64 = 30;

/// Pool configuration as submitted by the create-pool wizard
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolConfiguration {
    pub name: String,
    pub network: String,
    pub backstop_take_rate: f64,
    pub max_positions: u32,
    #[serde(default)]
    pub min_collateral: i128,
    pub selected_assets: Vec<AssetRef>,
    pub risk_parameters: RiskParameters,
    #[serde(default)]
    pub emissions: Vec<EmissionInput>,
}

/// One selectable asset with its on-chain contract reference
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetRef {
    pub id: String,
    pub symbol: String,
    #[serde(default)]
    pub name: String,
    pub address: String,
    pub decimals: u32,
}

/// Either a named preset or user-entered custom knobs
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskParameters {
    pub preset: String,
    #[serde(default)]
    pub custom_params: Option<CustomRiskParams>,
}

/// User-entered risk knobs as fractions (scaled to fixed-point by the transformer)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomRiskParams {
    pub collateral_factor: f64,
    pub liquidation_factor: f64,
    pub util: f64,
    pub max_util: f64,
    pub r_base: f64,
    pub r_one: f64,
    pub r_two: f64,
    pub r_three: f64,
    pub reactivity: u32,
}

/// Per-asset reward allocations as fractions of the emission budget
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmissionInput {
    pub asset_id: String,
    #[serde(default)]
    pub supply_emission: f64,
    #[serde(default)]
    pub borrow_emission: f64,
}

/// Preset risk parameters, already in on-chain fixed-point representation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RiskPreset {
    pub c_factor: u32,
    pub l_factor: u32,
    pub util: u32,
    pub max_util: u32,
    pub r_base: u32,
    pub r_one: u32,
    pub r_two: u32,
    pub r_three: u32,
    pub reactivity: u32,
}

/// Look up a named risk preset. "custom" intentionally resolves to None.
pub fn risk_preset(name: &str) -> Option<RiskPreset> {
    match name {
        "conservative" => Some(RiskPreset {
            c_factor: 900_0000,
            l_factor: 900_0000,
            util: 800_0000,
            max_util: 900_0000,
            r_base: 20000,
            r_one: 300000,
            r_two: 800000,
            r_three: 1_0000000,
            reactivity: 500,
        }),
        "balanced" => Some(RiskPreset {
            c_factor: 950_0000,
            l_factor: 950_0000,
            util: 850_0000,
            max_util: 950_0000,
            r_base: 30000,
            r_one: 400000,
            r_two: 900000,
            r_three: 1_0000000,
            reactivity: 750,
        }),
        "aggressive" => Some(RiskPreset {
            c_factor: 980_0000,
            l_factor: 980_0000,
            util: 900_0000,
            max_util: 980_0000,
            r_base: 50000,
            r_one: 500000,
            r_two: 1000000,
            r_three: 1_0000000,
            reactivity: 1000,
        }),
        _ => None,
    }
}

/// Addresses of the deployed protocol contracts on one network
#[derive(Debug, Clone)]
pub struct ContractAddresses {
    pub pool_factory: String,
    pub oracle: String,
}

/// Connection details for one network
#[derive(Debug, Clone)]
pub struct NetworkProfile {
    pub rpc_url: String,
    pub passphrase: String,
    pub friendbot_url: Option<String>,
    /// None when the protocol contracts are not deployed on this network
    pub contracts: Option<ContractAddresses>,
}

/// Static mapping from network name to its profile
///
/// Injected read-only through AppState so tests can substitute their own table.
#[derive(Debug, Clone)]
pub struct NetworkRegistry {
    networks: HashMap<String, NetworkProfile>,
}

impl NetworkRegistry {
    pub fn new(networks: HashMap<String, NetworkProfile>) -> Self {
        Self { networks }
    }

    /// Registry with the four known environments. RPC URLs can be overridden
    /// per network via `RPC_URL_<NETWORK>` env vars.
    pub fn builtin() -> Self {
        let mut networks = HashMap::new();
        networks.insert(
            "testnet".to_string(),
            NetworkProfile {
                rpc_url: rpc_url_override("testnet")
                    .unwrap_or_else(|| "https://soroban-testnet.stellar.org".to_string()),
                passphrase: "Test SDF Network ; September 2015".to_string(),
                friendbot_url: Some("https://friendbot.stellar.org".to_string()),
                contracts: Some(ContractAddresses {
                    pool_factory: "CDSMKKCWEQLEDZAZWYVN7EQEVJD6ODLUVDZXNYOHVG5NSB3AJDQ3IGG4"
                        .to_string(),
                    oracle: "CBJSXNC2PL5LRMGWBOJVCWZFRNFPQXX4JWCUPSGEVZELZDNSEOM7Q6IQ"
                        .to_string(),
                }),
            },
        );
        networks.insert(
            "mainnet".to_string(),
            NetworkProfile {
                rpc_url: rpc_url_override("mainnet")
                    .unwrap_or_else(|| "https://mainnet.sorobanrpc.com".to_string()),
                passphrase: "Public Global Stellar Network ; September 2015".to_string(),
                friendbot_url: None,
                contracts: Some(ContractAddresses {
                    pool_factory: "CA4FBMB4AYZ3PMDEVQSMQCAMAUTSSF6QW73XCYIS4GSWMT3J3KPCFJTV"
                        .to_string(),
                    oracle: "CBJSXNC2PL5LRMGWBOJVCWZFRNFPQXX4JWCUPSGEVZELZDNSEOM7Q6IQ"
                        .to_string(),
                }),
            },
        );
        networks.insert(
            "futurenet".to_string(),
            NetworkProfile {
                rpc_url: rpc_url_override("futurenet")
                    .unwrap_or_else(|| "https://rpc-futurenet.stellar.org".to_string()),
                passphrase: "Test SDF Future Network ; October 2022".to_string(),
                friendbot_url: Some("https://friendbot-futurenet.stellar.org".to_string()),
                contracts: Some(ContractAddresses {
                    pool_factory: "CCYZVHB3SEMXHUHLDQKH2MGYDE5W3LNHOTRZQ6KJTM2T4QLBOALYZ5MC"
                        .to_string(),
                    oracle: "CDOQW2KGOEV5JUHNQ4UUQQUMX3RRF7GHBB2Y2XWAXNSGF3DGUCP25RC3"
                        .to_string(),
                }),
            },
        );
        networks.insert(
            "local".to_string(),
            NetworkProfile {
                rpc_url: rpc_url_override("local")
                    .unwrap_or_else(|| "http://localhost:8000/soroban/rpc".to_string()),
                passphrase: "Standalone Network ; February 2017".to_string(),
                friendbot_url: Some("http://localhost:8000/friendbot".to_string()),
                contracts: None,
            },
        );
        Self { networks }
    }

    pub fn get(&self, network: &str) -> Option<&NetworkProfile> {
        self.networks.get(network)
    }

    pub fn contains(&self, network: &str) -> bool {
        self.networks.contains_key(network)
    }

    pub fn network_names(&self) -> Vec<&str> {
        self.networks.keys().map(String::as_str).collect()
    }
}

fn rpc_url_override(network: &str) -> Option<String> {
    std::env::var(format!("RPC_URL_{}", network.to_uppercase())).ok()
}

/// Catalog entry returned by GET /api/assets
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogAsset {
    pub symbol: String,
    pub contract_id: String,
    pub decimals: u32,
    pub enabled: bool,
}

/// Static per-network asset listing for the wizard's selection step
pub fn asset_catalog(network: &str) -> Option<Vec<CatalogAsset>> {
    let entries: &[(&str, &str, u32)] = match network {
        "testnet" => &[
            ("XLM", "CDLZFC3SYJYDZT7K67VZ75HPJVIEUVNIXF47ZG2FB2RMQQVU2HHGCYSC", 7),
            ("USDC", "CAQCFVLOBK5GIULPNZRGATJJMIZL5BSP7X5YJVMGCPTUEPFM4AVSRCJU", 7),
            ("BLND", "CB22KRA3YZVCNCQI64JQ5WE7UY2VAV7WFLK6A2JN3HEX56T2EDAFO7QF", 7),
            ("wETH", "CAZAQB3D7KSLSNOSQKYD2V4JP5V2Y3B4RDJZRLBFCCIXDCTE3WHSY3UE", 8),
            ("wBTC", "CAP5AMC2OHNVREKBBRSIOTCR4FRLOYZJMGJ6DCL5NXCVMERIRJLHWFSQ", 8),
        ],
        "mainnet" => &[
            ("XLM", "CAS3J7GYLGXMF6TDJBBYYSE3HQ6BBSMLNUQ34T6TZMYMW2EVH34XOWMA", 7),
            ("USDC", "CCW67TSZV3SSS2HXMBQ5JFGCKJNXKZM7UQUWUZPUTHXSTZLEO7SJMI75", 7),
            ("BLND", "CD25MNVTZDL4Y3XBCPCJXGXATV5WUHHHW2RCLKKI7B5JLPC5HYW5DU3J", 7),
        ],
        "futurenet" => &[
            ("XLM", "CB64D3G7SM2RTH6JSGG34DDTFTQ5CFDKVDZJZSODMCX4NJ2HV2KN7OHT", 7),
            ("USDC", "CACFSMD2TF7KFHSCJRQ4YMPMA4WYQBNIZBNAIH6GIJCOZTJM24PQDGEW", 7),
        ],
        // No asset contracts ship with a standalone network
        "local" => &[],
        _ => return None,
    };
    Some(
        entries
            .iter()
            .map(|(symbol, contract_id, decimals)| CatalogAsset {
                symbol: symbol.to_string(),
                contract_id: contract_id.to_string(),
                decimals: *decimals,
                enabled: false,
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_registry_has_known_networks() {
        let registry = NetworkRegistry::builtin();
        for network in ["testnet", "mainnet", "futurenet", "local"] {
            assert!(registry.contains(network), "missing {}", network);
        }
        assert!(!registry.contains("devnet"));
    }

    #[test]
    fn local_network_has_no_contracts() {
        let registry = NetworkRegistry::builtin();
        assert!(registry.get("local").unwrap().contracts.is_none());
        assert!(registry.get("testnet").unwrap().contracts.is_some());
    }

    #[test]
    fn preset_lookup() {
        let balanced = risk_preset("balanced").unwrap();
        assert_eq!(balanced.util, 850_0000);
        assert_eq!(balanced.max_util, 950_0000);
        assert!(balanced.util < balanced.max_util);
        assert!(risk_preset("custom").is_none());
        assert!(risk_preset("yolo").is_none());
    }

    #[test]
    fn preset_reactivity_within_ceiling() {
        for name in ["conservative", "balanced", "aggressive"] {
            let preset = risk_preset(name).unwrap();
            assert!(preset.reactivity <= MAX_REACTIVITY);
        }
    }

    #[test]
    fn asset_catalog_per_network() {
        let testnet = asset_catalog("testnet").unwrap();
        assert!(testnet.iter().any(|a| a.symbol == "USDC"));
        assert!(testnet.iter().all(|a| !a.enabled));
        assert!(asset_catalog("devnet").is_none());
    }
}
