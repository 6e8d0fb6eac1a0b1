//! Deployment core: validation, transformation and on-chain orchestration

pub mod config;
pub mod error;
pub mod orchestrator;
pub mod pipeline;
pub mod rpc;
pub mod transform;
pub mod tx;
pub mod validate;

#[cfg(test)]
pub mod testutils;

pub use config::{NetworkRegistry, PoolConfiguration};
pub use error::{DeployError, DeploymentFailure};
pub use orchestrator::{DeploymentResult, PoolDeployer};
pub use validate::{validate, ValidationReport};
