//! # Bridge Topology
//!
//! Typed description of what one run deploys. Built from a validated
//! [`TopologyConfig`](super::config::TopologyConfig).

use gw_01_oracle_consensus::{BftThreshold, ValidatorSet};
use shared_types::{DataType, OnchainId, PortDirection};

/// One registry, its relays and their ports.
#[derive(Clone, Debug)]
pub struct BridgeTopology {
    /// Registry validators
    pub validators: ValidatorSet,
    /// Registry threshold
    pub bft: BftThreshold,
    /// Reuse this registry instead of deploying one
    pub existing_registry: Option<OnchainId>,
    /// Relays, in deployment order
    pub relays: Vec<RelaySpec>,
    /// Ports, in deployment order
    pub ports: Vec<PortSpec>,
}

/// Oracle relay bound to the registry.
#[derive(Clone, Debug)]
pub struct RelaySpec {
    /// Unique name within the topology
    pub name: String,
    /// Value tag
    pub data_type: DataType,
    /// Oracles signing pulses
    pub oracles: ValidatorSet,
    /// Threshold
    pub bft: BftThreshold,
    /// Reuse this relay
    pub existing: Option<OnchainId>,
}

/// Port bound to one relay and one asset.
#[derive(Clone, Debug)]
pub struct PortSpec {
    /// Unique name within the topology
    pub name: String,
    /// Name of the relay delivering instructions
    pub relay: String,
    /// Lock-style or mint-style
    pub direction: PortDirection,
    /// Asset moved by the port
    pub asset: AssetSpec,
    /// Reuse this port
    pub existing: Option<OnchainId>,
    /// Extra minter on a newly created token of a lock-style port
    pub token_owner: Option<OnchainId>,
}

impl PortSpec {
    /// Minting rights granted on this port's token, in order.
    pub fn minters(&self) -> Vec<Minter> {
        let mut minters = Vec::new();
        match self.direction {
            PortDirection::Mint => minters.push(Minter::Port),
            PortDirection::Lock => {
                if let (Some(owner), AssetSpec::New { .. }) = (self.token_owner, &self.asset) {
                    minters.push(Minter::Account(owner));
                }
            }
        }
        minters
    }
}

/// Who receives minting rights.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Minter {
    /// The port itself
    Port,
    /// A fixed account
    Account(OnchainId),
}

/// Asset reference.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AssetSpec {
    /// Token already on chain
    Existing(OnchainId),
    /// Token created by the run
    New {
        /// Display name
        name: String,
        /// Ticker
        symbol: String,
        /// Decimal places
        decimals: u8,
    },
}

impl AssetSpec {
    /// On-chain id when the token already exists.
    pub fn existing(&self) -> Option<OnchainId> {
        match self {
            AssetSpec::Existing(id) => Some(*id),
            AssetSpec::New { .. } => None,
        }
    }
}

impl BridgeTopology {
    /// Relay by name.
    pub fn relay(&self, name: &str) -> Option<&RelaySpec> {
        self.relays.iter().find(|r| r.name == name)
    }

    /// Port by name.
    pub fn port(&self, name: &str) -> Option<&PortSpec> {
        self.ports.iter().find(|p| p.name == name)
    }
}
