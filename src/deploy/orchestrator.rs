//! Deployment orchestrator
//!
//! Sequences the on-chain steps of one deployment: deploy the pool, queue
//! and activate a reserve per selected asset in selection order, then set
//! emissions if any are configured. One account drives every transaction, so
//! steps run strictly sequentially and the sequence number advances by one
//! per transaction that reaches the network.
//!
//! Queue failures abort the deployment; activation failures are recoverable
//! (the reserve stays queued and can be activated out-of-band once the queue
//! delay elapses). Every submitted transaction hash is accumulated in order
//! and attached to any fatal error, so a half-finished deployment stays
//! diagnosable.

use serde::Serialize;

use super::config::{ContractAddresses, NetworkProfile, PoolConfiguration};
use super::error::{DeployError, DeploymentFailure};
use super::pipeline::{ConfirmedTx, TxPipeline};
use super::rpc::{AccountEntry, PoolRpc};
use super::transform::transform;
use super::tx::{Keypair, Operation, TransactionBuilder};

/// Final outcome of a successful deployment
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentResult {
    pub pool_address: String,
    /// One hash per submitted transaction, in submission order
    pub transaction_hashes: Vec<String>,
    /// Non-fatal issues, currently reserves queued but not yet activated
    pub warnings: Vec<String>,
}

/// Orchestrates pool deployments against one network
pub struct PoolDeployer<R> {
    profile: NetworkProfile,
    contracts: ContractAddresses,
    rpc: R,
}

impl<R> std::fmt::Debug for PoolDeployer<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PoolDeployer")
            .field("profile", &self.profile)
            .field("contracts", &self.contracts)
            .finish_non_exhaustive()
    }
}

impl<R: PoolRpc> PoolDeployer<R> {
    /// Fails fast when the profile carries no contract addresses
    pub fn new(profile: NetworkProfile, rpc: R) -> Result<Self, DeployError> {
        let contracts = profile
            .contracts
            .clone()
            .ok_or_else(|| DeployError::Config("no contract addresses for network".to_string()))?;
        Ok(Self {
            profile,
            contracts,
            rpc,
        })
    }

    /// Run a full deployment. On fatal failure the partial transaction-hash
    /// list travels with the error.
    pub async fn deploy(
        &self,
        config: &PoolConfiguration,
        keypair: &Keypair,
    ) -> Result<DeploymentResult, DeploymentFailure> {
        let mut hashes = Vec::new();
        let mut warnings = Vec::new();
        match self.run(config, keypair, &mut hashes, &mut warnings).await {
            Ok(pool_address) => Ok(DeploymentResult {
                pool_address,
                transaction_hashes: hashes,
                warnings,
            }),
            Err(error) => Err(DeploymentFailure::new(error, hashes)),
        }
    }

    async fn run(
        &self,
        config: &PoolConfiguration,
        keypair: &Keypair,
        hashes: &mut Vec<String>,
        warnings: &mut Vec<String>,
    ) -> Result<String, DeployError> {
        let attempt = uuid::Uuid::new_v4();
        let mut plan = transform(config, &self.contracts)?;
        plan.deploy_args.admin = keypair.public_key().to_string();

        let mut account = self.rpc.get_account(keypair.public_key()).await?;
        let pipeline = TxPipeline::new(&self.rpc);

        tracing::info!(%attempt, pool = %config.name, assets = config.selected_assets.len(), "deploying pool");
        let deploy_op = Operation::DeployPool {
            factory: self.contracts.pool_factory.clone(),
            args: plan.deploy_args.clone(),
        };
        let confirmed = self
            .run_step(&pipeline, &mut account, deploy_op, keypair, hashes)
            .await?;

        // The new pool's address comes from the deploy simulation return value
        // and is required to build every subsequent operation.
        let pool_address = confirmed
            .return_value
            .as_ref()
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .ok_or_else(|| DeployError::Simulation {
                op: "deploy_pool".to_string(),
                detail: "simulation returned no pool address".to_string(),
            })?;
        tracing::info!(%attempt, pool_address = %pool_address, "pool deployed, configuring reserves");

        for (index, asset) in config.selected_assets.iter().enumerate() {
            let queue_op = Operation::QueueSetReserve {
                pool: pool_address.clone(),
                asset: asset.address.clone(),
                config: plan.reserve_configs[index].clone(),
            };
            self.run_step(&pipeline, &mut account, queue_op, keypair, hashes)
                .await?;
            tracing::info!(%attempt, asset = %asset.symbol, "reserve queued");

            let activate_op = Operation::SetReserve {
                pool: pool_address.clone(),
                asset: asset.address.clone(),
            };
            match self
                .run_step(&pipeline, &mut account, activate_op, keypair, hashes)
                .await
            {
                Ok(_) => tracing::info!(%attempt, asset = %asset.symbol, "reserve activated"),
                Err(e) => {
                    // Activation legitimately fails while the queue delay has
                    // not elapsed; the caller can retry it later.
                    tracing::warn!(%attempt, asset = %asset.symbol, error = %e, "reserve activation failed, continuing");
                    warnings.push(format!(
                        "Reserve for {} was queued but could not be activated yet: {}",
                        asset.symbol, e
                    ));
                }
            }
        }

        if !plan.emission_entries.is_empty() {
            let emissions_op = Operation::SetEmissionsConfig {
                pool: pool_address.clone(),
                entries: plan.emission_entries.clone(),
            };
            self.run_step(&pipeline, &mut account, emissions_op, keypair, hashes)
                .await?;
            tracing::info!(%attempt, entries = plan.emission_entries.len(), "emissions configured");
        }

        tracing::info!(%attempt, pool_address = %pool_address, transactions = hashes.len(), "deployment complete");
        Ok(pool_address)
    }

    /// Build, execute and account for one envelope. The account sequence is
    /// advanced only when the transaction reached the network (confirmed,
    /// failed on-chain, or timed out while pending) since all of those consume
    /// the sequence number. Submitted hashes are recorded even on failure.
    async fn run_step(
        &self,
        pipeline: &TxPipeline<'_, R>,
        account: &mut AccountEntry,
        op: Operation,
        keypair: &Keypair,
        hashes: &mut Vec<String>,
    ) -> Result<ConfirmedTx, DeployError> {
        let tx = TransactionBuilder::new(&account.account_id, account.sequence, &self.profile.passphrase)
            .operation(op)
            .build()?;
        let consumed_sequence = tx.sequence;

        match pipeline.execute(tx, keypair).await {
            Ok(confirmed) => {
                account.sequence = consumed_sequence;
                hashes.push(confirmed.hash.clone());
                Ok(confirmed)
            }
            Err(e @ DeployError::Failed { .. }) | Err(e @ DeployError::Timeout { .. }) => {
                account.sequence = consumed_sequence;
                match &e {
                    DeployError::Failed { hash, .. } | DeployError::Timeout { hash, .. } => {
                        hashes.push(hash.clone());
                    }
                    _ => {}
                }
                Err(e)
            }
            Err(e) => Err(e),
        }
    }
}
