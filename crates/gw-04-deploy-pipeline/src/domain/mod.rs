//! # Domain Module
//!
//! Topology, roles, configuration and errors.

pub mod config;
pub mod errors;
pub mod roles;
pub mod topology;

pub use config::{AssetConfig, PortConfig, RelayConfig, TopologyConfig, DEFAULT_KEY_ENV};
pub use errors::{ClientError, ConfigError, PipelineError};
pub use roles::{DeployedAddressSet, Role, RoleEntry};
pub use topology::{AssetSpec, BridgeTopology, Minter, PortSpec, RelaySpec};
