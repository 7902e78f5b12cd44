//! # Integration Flows
//!
//! Every flow deploys a fresh bridge through the pipeline and then talks to
//! it only through [`BridgeClient`](gw_04_deploy_pipeline::BridgeClient).

pub mod fixtures;

mod consensus_e2e;
mod deployment_e2e;
mod transfer_e2e;
