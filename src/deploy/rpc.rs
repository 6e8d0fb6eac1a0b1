//! Outbound Soroban RPC boundary
//!
//! The deployment core treats the network as a black-box JSON-RPC service
//! exposing getAccount / simulateTransaction / sendTransaction /
//! getTransaction. The `PoolRpc` trait is what the pipeline and orchestrator
//! program against; tests substitute a scripted mock.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::tx::{SignedTransaction, Transaction};

#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("rpc error {code}: {message}")]
    Server { code: i64, message: String },

    #[error("malformed rpc response: {0}")]
    Malformed(String),
}

/// Account state as reported by the network; the sole source of truth for
/// sequence numbers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountEntry {
    pub account_id: String,
    pub sequence: i64,
}

/// Result of a dry run against current network state
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulateResponse {
    /// Set when the host rejected the operation; fatal for that operation
    #[serde(default)]
    pub error: Option<String>,
    /// Resource fee to merge into the envelope during assembly
    #[serde(default)]
    pub min_resource_fee: u64,
    /// Decoded return value of the invoked function, if any
    #[serde(default)]
    pub return_value: Option<serde_json::Value>,
    #[serde(default)]
    pub latest_ledger: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SendStatus {
    Pending,
    Duplicate,
    TryAgainLater,
    Error,
}

/// Immediate response to a submission
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendResponse {
    pub status: SendStatus,
    pub hash: String,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TxStatus {
    Success,
    Failed,
    NotFound,
}

/// Confirmation status of a previously submitted transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetTransactionResponse {
    pub status: TxStatus,
    #[serde(default)]
    pub return_value: Option<serde_json::Value>,
    #[serde(default)]
    pub result_meta: Option<serde_json::Value>,
}

/// The four RPC operations the deployment core depends on
#[allow(async_fn_in_trait)]
pub trait PoolRpc {
    async fn get_account(&self, account_id: &str) -> Result<AccountEntry, RpcError>;
    async fn simulate_transaction(&self, tx: &Transaction) -> Result<SimulateResponse, RpcError>;
    async fn send_transaction(&self, tx: &SignedTransaction) -> Result<SendResponse, RpcError>;
    async fn get_transaction(&self, hash: &str) -> Result<GetTransactionResponse, RpcError>;
}

#[derive(Serialize)]
struct JsonRpcRequest<'a, P: Serialize> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: P,
}

#[derive(Deserialize)]
struct JsonRpcResponse<T> {
    result: Option<T>,
    error: Option<JsonRpcError>,
}

#[derive(Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
}

/// HTTP JSON-RPC client for a Soroban-style endpoint
#[derive(Debug, Clone)]
pub struct SorobanRpcClient {
    http: reqwest::Client,
    url: String,
}

impl SorobanRpcClient {
    pub fn new(url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: url.to_string(),
        }
    }

    async fn call<P: Serialize, T: DeserializeOwned>(
        &self,
        method: &str,
        params: P,
    ) -> Result<T, RpcError> {
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            id: 1,
            method,
            params,
        };
        let response = self
            .http
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| RpcError::Transport(e.to_string()))?;
        let body: JsonRpcResponse<T> = response
            .json()
            .await
            .map_err(|e| RpcError::Malformed(e.to_string()))?;
        if let Some(err) = body.error {
            return Err(RpcError::Server {
                code: err.code,
                message: err.message,
            });
        }
        body.result
            .ok_or_else(|| RpcError::Malformed(format!("{} returned no result", method)))
    }
}

impl PoolRpc for SorobanRpcClient {
    async fn get_account(&self, account_id: &str) -> Result<AccountEntry, RpcError> {
        self.call("getAccount", serde_json::json!({ "accountId": account_id }))
            .await
    }

    async fn simulate_transaction(&self, tx: &Transaction) -> Result<SimulateResponse, RpcError> {
        self.call("simulateTransaction", serde_json::json!({ "transaction": tx }))
            .await
    }

    async fn send_transaction(&self, tx: &SignedTransaction) -> Result<SendResponse, RpcError> {
        self.call("sendTransaction", serde_json::json!({ "transaction": tx }))
            .await
    }

    async fn get_transaction(&self, hash: &str) -> Result<GetTransactionResponse, RpcError> {
        self.call("getTransaction", serde_json::json!({ "hash": hash }))
            .await
    }
}
