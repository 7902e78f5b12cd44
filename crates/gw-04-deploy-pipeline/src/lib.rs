//! # GW-04 Deploy Pipeline
//!
//! Deploys and wires a bridge topology through a [`ChainAdapter`], then
//! drives the deployed bridge at runtime.
//!
//! **Subsystem ID:** 04
//! **Architecture:** Hexagonal (DDD)
//!
//! ## Pipeline
//!
//! ```text
//! TopologyConfig ──validate──→ BridgeTopology ──plan(model)──→ [Step]
//!                                                                │
//!   registry → relay[s] → (asset, port)[s] → add-minter / subscribe
//!                                                                │
//!        submit → await_finality → record id ───────────────────┘
//!                                                                ↓
//!                                                    DeploymentReport
//! ```
//!
//! Steps run one at a time; finality is the only suspension point. The
//! first failure halts the run with the step name and role attached.
//!
//! ## Module Structure
//!
//! ```text
//! gw-04-deploy-pipeline/
//! ├── domain/          # TopologyConfig, BridgeTopology, Role, DeployedAddressSet, errors
//! ├── plan             # Step, plan(), existing_roles()
//! ├── context          # DeploymentContext, DeploymentReport
//! ├── pipeline         # DeploymentPipeline
//! └── client           # BridgeClient (pulses, transfer requests, faucet)
//! ```
//!
//! [`ChainAdapter`]: gw_03_chain_adapter::ChainAdapter

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod client;
pub mod context;
pub mod domain;
pub mod pipeline;
pub mod plan;

// Re-exports
pub use client::{BridgeClient, PulseOutcome};
pub use context::{DeploymentContext, DeploymentReport, StepRecord};
pub use domain::{
    AssetConfig, AssetSpec, BridgeTopology, ClientError, ConfigError, DeployedAddressSet, Minter,
    PipelineError, PortConfig, PortSpec, RelayConfig, RelaySpec, Role, RoleEntry, TopologyConfig,
    DEFAULT_KEY_ENV,
};
pub use pipeline::DeploymentPipeline;
pub use plan::{plan, Step};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
