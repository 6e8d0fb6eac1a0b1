//! Per-operation transaction pipeline
//!
//! Every operation goes through the same four phases: simulate (dry run),
//! assemble (merge the simulated resource fee), sign, then submit and poll
//! for confirmation. Simulation results are never reused across operations;
//! the whole pipeline replays from phase one for each envelope.

use std::time::Duration;

use super::error::DeployError;
use super::rpc::{PoolRpc, SendStatus, TxStatus};
use super::tx::{Keypair, Transaction};

/// Delay between confirmation polls
pub const POLL_INTERVAL: Duration = Duration::from_secs(1);
/// Poll budget before a pending transaction is declared timed out
pub const MAX_POLL_ATTEMPTS: u32 = 30;

/// A confirmed transaction and the value decoded from its simulation
#[derive(Debug, Clone)]
pub struct ConfirmedTx {
    pub hash: String,
    pub return_value: Option<serde_json::Value>,
}

/// Drives one envelope through simulate, assemble, sign, submit and poll
pub struct TxPipeline<'a, R> {
    rpc: &'a R,
}

impl<'a, R: PoolRpc> TxPipeline<'a, R> {
    pub fn new(rpc: &'a R) -> Self {
        Self { rpc }
    }

    pub async fn execute(
        &self,
        tx: Transaction,
        keypair: &Keypair,
    ) -> Result<ConfirmedTx, DeployError> {
        let op = tx.operation.label();

        // Phase 1: dry run. A simulation error is fatal for this operation.
        let sim = self.rpc.simulate_transaction(&tx).await?;
        if let Some(detail) = sim.error {
            return Err(DeployError::Simulation { op, detail });
        }
        tracing::debug!(
            op = %op,
            min_resource_fee = sim.min_resource_fee,
            "simulation passed"
        );

        // Phase 2: assemble the real fee from the simulated resource footprint.
        let mut assembled = tx;
        assembled.fee += sim.min_resource_fee;

        // Phase 3: sign with the caller-held key.
        let signed = keypair.sign(&assembled)?;

        // Phase 4: submit, then poll until a terminal status or the budget runs out.
        let send = self.rpc.send_transaction(&signed).await?;
        match send.status {
            SendStatus::Error | SendStatus::TryAgainLater => Err(DeployError::Submission {
                detail: send
                    .error
                    .unwrap_or_else(|| format!("submission rejected with {:?}", send.status)),
            }),
            SendStatus::Pending | SendStatus::Duplicate => {
                self.wait_for_confirmation(send.hash, sim.return_value).await
            }
        }
    }

    /// Bounded retry loop: one status poll per interval, never more than
    /// MAX_POLL_ATTEMPTS. Transport hiccups during polling are tolerated since
    /// the transaction may simply not be visible yet.
    async fn wait_for_confirmation(
        &self,
        hash: String,
        return_value: Option<serde_json::Value>,
    ) -> Result<ConfirmedTx, DeployError> {
        for attempt in 1..=MAX_POLL_ATTEMPTS {
            tokio::time::sleep(POLL_INTERVAL).await;
            match self.rpc.get_transaction(&hash).await {
                Ok(status) => match status.status {
                    TxStatus::Success => {
                        return Ok(ConfirmedTx {
                            hash,
                            return_value: status.return_value.or(return_value),
                        });
                    }
                    TxStatus::Failed => {
                        let detail = status
                            .result_meta
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| "no diagnostic payload".to_string());
                        return Err(DeployError::Failed { hash, detail });
                    }
                    TxStatus::NotFound => {}
                },
                Err(e) => {
                    tracing::debug!(hash = %hash, attempt, error = %e, "status poll failed, retrying");
                }
            }
        }
        Err(DeployError::Timeout {
            hash,
            attempts: MAX_POLL_ATTEMPTS,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deploy::testutils::{test_keypair, test_tx, MockRpc, MOCK_POOL_ADDRESS};
    use crate::deploy::tx::Operation;

    #[tokio::test(start_paused = true)]
    async fn deploy_operation_confirms_and_returns_pool_address() {
        let rpc = MockRpc::new();
        let keypair = test_keypair();
        let tx = test_tx(&keypair, 0, deploy_op());

        let confirmed = TxPipeline::new(&rpc).execute(tx, &keypair).await.unwrap();
        assert_eq!(
            confirmed.return_value,
            Some(serde_json::json!(MOCK_POOL_ADDRESS))
        );
        assert_eq!(rpc.submitted_labels().len(), 1);
        // Success on the first poll
        assert_eq!(rpc.total_polls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn simulation_error_is_fatal_and_skips_submission() {
        let rpc = MockRpc::new().fail_simulation_when(|op| matches!(op, Operation::DeployPool { .. }));
        let keypair = test_keypair();
        let tx = test_tx(&keypair, 0, deploy_op());

        let err = TxPipeline::new(&rpc).execute(tx, &keypair).await.unwrap_err();
        assert!(matches!(err, DeployError::Simulation { .. }));
        assert!(rpc.submitted_labels().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn immediate_send_error_is_fatal() {
        let rpc = MockRpc::new().send_error_when(|_| true);
        let keypair = test_keypair();
        let tx = test_tx(&keypair, 0, deploy_op());

        let err = TxPipeline::new(&rpc).execute(tx, &keypair).await.unwrap_err();
        assert!(matches!(err, DeployError::Submission { .. }));
        assert_eq!(rpc.total_polls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn on_chain_failure_surfaces_hash_and_diagnostics() {
        let rpc = MockRpc::new().fail_on_chain_when(|_| true);
        let keypair = test_keypair();
        let tx = test_tx(&keypair, 0, deploy_op());

        let err = TxPipeline::new(&rpc).execute(tx, &keypair).await.unwrap_err();
        match err {
            DeployError::Failed { hash, .. } => assert!(!hash.is_empty()),
            other => panic!("expected Failed, got {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_after_exactly_thirty_polls() {
        let rpc = MockRpc::new().always_pending();
        let keypair = test_keypair();
        let tx = test_tx(&keypair, 0, deploy_op());

        let err = TxPipeline::new(&rpc).execute(tx, &keypair).await.unwrap_err();
        match err {
            DeployError::Timeout { attempts, .. } => assert_eq!(attempts, MAX_POLL_ATTEMPTS),
            other => panic!("expected Timeout, got {:?}", other),
        }
        assert_eq!(rpc.total_polls(), 30);
    }

    #[tokio::test(start_paused = true)]
    async fn assembled_fee_includes_resource_estimate() {
        let rpc = MockRpc::new();
        let keypair = test_keypair();
        let tx = test_tx(&keypair, 0, deploy_op());
        let base_fee = tx.fee;

        TxPipeline::new(&rpc).execute(tx, &keypair).await.unwrap();
        let submitted = rpc.submitted();
        assert_eq!(submitted.len(), 1);
        assert!(submitted[0].tx.fee > base_fee);
    }

    fn deploy_op() -> Operation {
        Operation::DeployPool {
            factory: "CFACTORY".to_string(),
            args: crate::deploy::tx::DeployPoolArgs {
                admin: "GADMIN".to_string(),
                name: "Test Pool".to_string(),
                salt: "00".repeat(32),
                oracle: "CORACLE".to_string(),
                backstop_take_rate: 1_000_000,
                max_positions: 4,
                min_collateral: 0,
            },
        }
    }
}
