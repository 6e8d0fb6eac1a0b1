//! Transaction envelopes, operations and signing
//!
//! One envelope wraps exactly one protocol operation and binds it to the
//! source account's next sequence number, a flat fee ceiling and a bounded
//! validity window. The builder is stateless per call; advancing the sequence
//! between envelopes is the orchestrator's job.

use ed25519_dalek::{Signer as _, SigningKey};
use serde::{Deserialize, Serialize};

use super::config::{BASE_FEE, TX_TIMEOUT_SECS};
use super::error::DeployError;

/// Arguments for the pool-factory deploy call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeployPoolArgs {
    /// Admin account, filled by the orchestrator with the signer's public key
    pub admin: String,
    pub name: String,
    /// 32 random bytes, hex-encoded, fresh per deployment attempt
    pub salt: String,
    pub oracle: String,
    /// Fraction of borrower interest diverted to the backstop, scaled 1e7
    pub backstop_take_rate: u32,
    pub max_positions: u32,
    pub min_collateral: i128,
}

/// Per-reserve risk configuration in on-chain fixed-point representation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReserveConfig {
    pub index: u32,
    pub decimals: u32,
    pub c_factor: u32,
    pub l_factor: u32,
    pub util: u32,
    pub max_util: u32,
    pub r_base: u32,
    pub r_one: u32,
    pub r_two: u32,
    pub r_three: u32,
    pub reactivity: u32,
    pub supply_cap: i128,
    pub enabled: bool,
}

/// Reward share routed to suppliers (res_type 1) or borrowers (res_type 0)
/// of one reserve
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReserveEmissionMetadata {
    pub res_index: u32,
    pub res_type: u32,
    pub share: i128,
}

pub const RES_TYPE_BORROWER: u32 = 0;
pub const RES_TYPE_SUPPLIER: u32 = 1;

/// One on-chain operation of the deployment sequence
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Operation {
    DeployPool {
        factory: String,
        args: DeployPoolArgs,
    },
    QueueSetReserve {
        pool: String,
        asset: String,
        config: ReserveConfig,
    },
    SetReserve {
        pool: String,
        asset: String,
    },
    SetEmissionsConfig {
        pool: String,
        entries: Vec<ReserveEmissionMetadata>,
    },
}

impl Operation {
    /// Short label used in logs and error payloads
    pub fn label(&self) -> String {
        match self {
            Operation::DeployPool { args, .. } => format!("deploy_pool({})", args.name),
            Operation::QueueSetReserve { asset, .. } => {
                format!("queue_set_reserve({})", asset)
            }
            Operation::SetReserve { asset, .. } => format!("set_reserve({})", asset),
            Operation::SetEmissionsConfig { entries, .. } => {
                format!("set_emissions_config({} entries)", entries.len())
            }
        }
    }
}

/// An unsigned transaction envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub source: String,
    /// Sequence number consumed by this transaction (account sequence + 1)
    pub sequence: i64,
    /// Fee ceiling in stroops; raised by the assemble phase after simulation
    pub fee: u64,
    /// Unix-seconds upper bound of the validity window
    pub valid_until: u64,
    /// Network passphrase, binding the envelope to one network
    pub network_passphrase: String,
    pub operation: Operation,
}

impl Transaction {
    /// Canonical bytes covered by the signature
    pub fn signing_payload(&self) -> Result<Vec<u8>, DeployError> {
        serde_json::to_vec(self)
            .map_err(|e| DeployError::Config(format!("unserializable transaction: {}", e)))
    }
}

/// A signed envelope ready for submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignedTransaction {
    pub tx: Transaction,
    /// Hex-encoded ed25519 signature over the envelope's signing payload
    pub signature: String,
    pub public_key: String,
}

/// Builds a single-operation envelope against a known account sequence
pub struct TransactionBuilder {
    source: String,
    sequence: i64,
    fee: u64,
    timeout_secs: u64,
    network_passphrase: String,
    operation: Option<Operation>,
}

impl TransactionBuilder {
    /// `sequence` is the account's current sequence number; the built
    /// transaction consumes `sequence + 1`.
    pub fn new(source: &str, sequence: i64, network_passphrase: &str) -> Self {
        Self {
            source: source.to_string(),
            sequence,
            fee: BASE_FEE,
            timeout_secs: TX_TIMEOUT_SECS,
            network_passphrase: network_passphrase.to_string(),
            operation: None,
        }
    }

    pub fn fee(mut self, fee: u64) -> Self {
        self.fee = fee;
        self
    }

    pub fn timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn operation(mut self, op: Operation) -> Self {
        self.operation = Some(op);
        self
    }

    pub fn build(self) -> Result<Transaction, DeployError> {
        let operation = self
            .operation
            .ok_or_else(|| DeployError::Config("transaction has no operation".to_string()))?;
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Ok(Transaction {
            source: self.source,
            sequence: self.sequence + 1,
            fee: self.fee,
            valid_until: now + self.timeout_secs,
            network_passphrase: self.network_passphrase,
            operation,
        })
    }
}

/// An ed25519 keypair derived from the caller-supplied secret seed
///
/// The seed is consumed at construction and never surfaces in logs or
/// serialized output.
pub struct Keypair {
    signing: SigningKey,
    public_hex: String,
}

impl Keypair {
    /// Parse a 32-byte hex seed into a keypair
    pub fn from_secret_seed(seed_hex: &str) -> Result<Self, DeployError> {
        let bytes = hex::decode(seed_hex.trim())
            .map_err(|_| DeployError::Config("secret seed is not valid hex".to_string()))?;
        let seed: [u8; 32] = bytes
            .try_into()
            .map_err(|_| DeployError::Config("secret seed must be 32 bytes".to_string()))?;
        let signing = SigningKey::from_bytes(&seed);
        let public_hex = hex::encode(signing.verifying_key().to_bytes());
        Ok(Self { signing, public_hex })
    }

    pub fn public_key(&self) -> &str {
        &self.public_hex
    }

    pub fn sign(&self, tx: &Transaction) -> Result<SignedTransaction, DeployError> {
        let payload = tx.signing_payload()?;
        let signature = self.signing.sign(&payload);
        Ok(SignedTransaction {
            tx: tx.clone(),
            signature: hex::encode(signature.to_bytes()),
            public_key: self.public_hex.clone(),
        })
    }
}

impl std::fmt::Debug for Keypair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Keypair")
            .field("public_key", &self.public_hex)
            .finish()
    }
}
