//! Deployment error taxonomy
//!
//! Configuration errors are raised before any network contact. Simulation,
//! submission, failure and timeout are distinct so callers can tell whether a
//! transaction may still land later (timeout) or was definitively rejected.

use super::rpc::RpcError;

#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("rpc error: {0}")]
    Rpc(#[from] RpcError),

    #[error("simulation failed for {op}: {detail}")]
    Simulation { op: String, detail: String },

    #[error("transaction rejected on submit: {detail}")]
    Submission { detail: String },

    #[error("transaction {hash} failed: {detail}")]
    Failed { hash: String, detail: String },

    #[error("transaction {hash} not confirmed after {attempts} status polls")]
    Timeout { hash: String, attempts: u32 },
}

impl DeployError {
    /// Whether the error was raised before any network contact
    pub fn is_configuration(&self) -> bool {
        matches!(self, DeployError::Config(_))
    }
}

/// A fatal deployment error together with the hashes of every transaction
/// submitted before the failure, in submission order. The partial list is what
/// lets an operator inspect and resume a half-finished deployment.
#[derive(Debug, thiserror::Error)]
#[error("deployment failed after {} submitted transaction(s): {error}", transaction_hashes.len())]
pub struct DeploymentFailure {
    #[source]
    pub error: DeployError,
    pub transaction_hashes: Vec<String>,
}

impl DeploymentFailure {
    pub fn new(error: DeployError, transaction_hashes: Vec<String>) -> Self {
        Self {
            error,
            transaction_hashes,
        }
    }
}
