//! Lending-pool deployment backend
//!
//! HTTP API that validates a wizard-built pool configuration and orchestrates
//! the multi-step on-chain deployment (deploy pool, queue and activate each
//! reserve, set emissions) against a Soroban-style RPC endpoint.

pub mod api;
pub mod deploy;
pub mod types;
