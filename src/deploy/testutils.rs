//! Shared test fixtures: a scripted in-memory RPC service
//!
//! MockRpc answers the four RPC operations the core depends on. Failure
//! behavior is scripted with predicates over the submitted operation so
//! tests can break a specific step of a deployment.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use super::rpc::{
    AccountEntry, GetTransactionResponse, PoolRpc, RpcError, SendResponse, SendStatus,
    SimulateResponse, TxStatus,
};
use super::tx::{Keypair, Operation, SignedTransaction, Transaction, TransactionBuilder};

pub const MOCK_POOL_ADDRESS: &str = "CBQOYZXQVVXROJ5ZRN5ILRZHIGMSXH3XM2MOLEWFYVLSFMRHP2KNMOCK";
pub const MOCK_PASSPHRASE: &str = "Mock Network ; January 2026";

const TEST_SEED: &str = "0000000000000000000000000000000000000000000000000000000000000042";

pub fn test_keypair() -> Keypair {
    Keypair::from_secret_seed(TEST_SEED).unwrap()
}

pub fn test_tx(keypair: &Keypair, sequence: i64, op: Operation) -> Transaction {
    TransactionBuilder::new(keypair.public_key(), sequence, MOCK_PASSPHRASE)
        .operation(op)
        .build()
        .unwrap()
}

type OpPredicate = Box<dyn Fn(&Operation) -> bool + Send + Sync>;

pub struct MockRpc {
    starting_sequence: i64,
    fail_simulation: OpPredicate,
    send_error: OpPredicate,
    fail_on_chain: OpPredicate,
    pending_forever: bool,
    state: Mutex<MockLedger>,
}

#[derive(Default)]
struct MockLedger {
    next_hash: u32,
    submitted: Vec<SignedTransaction>,
    poll_counts: HashMap<String, u32>,
    failed_hashes: HashSet<String>,
}

impl MockRpc {
    pub fn new() -> Self {
        Self {
            starting_sequence: 0,
            fail_simulation: Box::new(|_| false),
            send_error: Box::new(|_| false),
            fail_on_chain: Box::new(|_| false),
            pending_forever: false,
            state: Mutex::new(MockLedger::default()),
        }
    }

    /// Reject simulation for operations matching the predicate
    pub fn fail_simulation_when(
        mut self,
        predicate: impl Fn(&Operation) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.fail_simulation = Box::new(predicate);
        self
    }

    /// Reject submission outright for operations matching the predicate
    pub fn send_error_when(
        mut self,
        predicate: impl Fn(&Operation) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.send_error = Box::new(predicate);
        self
    }

    /// Accept submission but report FAILED on the first status poll
    pub fn fail_on_chain_when(
        mut self,
        predicate: impl Fn(&Operation) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.fail_on_chain = Box::new(predicate);
        self
    }

    /// Never confirm anything; every status poll reports NOT_FOUND
    pub fn always_pending(mut self) -> Self {
        self.pending_forever = true;
        self
    }

    /// Every transaction accepted for submission, in order
    pub fn submitted(&self) -> Vec<SignedTransaction> {
        self.state.lock().unwrap().submitted.clone()
    }

    /// Operation labels of submitted transactions, in order
    pub fn submitted_labels(&self) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .submitted
            .iter()
            .map(|s| s.tx.operation.label())
            .collect()
    }

    pub fn total_polls(&self) -> u32 {
        self.state.lock().unwrap().poll_counts.values().sum()
    }
}

impl PoolRpc for MockRpc {
    async fn get_account(&self, account_id: &str) -> Result<AccountEntry, RpcError> {
        Ok(AccountEntry {
            account_id: account_id.to_string(),
            sequence: self.starting_sequence,
        })
    }

    async fn simulate_transaction(&self, tx: &Transaction) -> Result<SimulateResponse, RpcError> {
        if (self.fail_simulation)(&tx.operation) {
            return Ok(SimulateResponse {
                error: Some(format!("mock simulation failure for {}", tx.operation.label())),
                ..Default::default()
            });
        }
        let return_value = match &tx.operation {
            Operation::DeployPool { .. } => Some(serde_json::json!(MOCK_POOL_ADDRESS)),
            _ => None,
        };
        Ok(SimulateResponse {
            error: None,
            min_resource_fee: 52_641,
            return_value,
            latest_ledger: 1,
        })
    }

    async fn send_transaction(&self, tx: &SignedTransaction) -> Result<SendResponse, RpcError> {
        if (self.send_error)(&tx.tx.operation) {
            return Ok(SendResponse {
                status: SendStatus::Error,
                hash: String::new(),
                error: Some(format!("mock submit rejection for {}", tx.tx.operation.label())),
            });
        }
        let mut state = self.state.lock().unwrap();
        state.next_hash += 1;
        let hash = format!("tx-{:04}", state.next_hash);
        if (self.fail_on_chain)(&tx.tx.operation) {
            state.failed_hashes.insert(hash.clone());
        }
        state.submitted.push(tx.clone());
        Ok(SendResponse {
            status: SendStatus::Pending,
            hash,
            error: None,
        })
    }

    async fn get_transaction(&self, hash: &str) -> Result<GetTransactionResponse, RpcError> {
        let mut state = self.state.lock().unwrap();
        *state.poll_counts.entry(hash.to_string()).or_insert(0) += 1;
        let status = if self.pending_forever {
            TxStatus::NotFound
        } else if state.failed_hashes.contains(hash) {
            TxStatus::Failed
        } else {
            TxStatus::Success
        };
        Ok(GetTransactionResponse {
            status,
            return_value: None,
            result_meta: match status {
                TxStatus::Failed => Some(serde_json::json!({"reason": "mock on-chain failure"})),
                _ => None,
            },
        })
    }
}
