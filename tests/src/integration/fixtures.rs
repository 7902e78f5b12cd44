//! # Shared Fixtures
//!
//! Oracle sets, topologies and deployed bridges for the end-to-end flows.

use std::sync::Arc;

use gw_01_oracle_consensus::{OracleSigner, SignatureSet, ValidatorSet};
use gw_03_chain_adapter::{AccountStateDevnet, ChainAdapter, EvmDevnet};
use gw_04_deploy_pipeline::{
    AssetSpec, BridgeClient, BridgeTopology, DeploymentContext, DeploymentPipeline,
    DeploymentReport, PortSpec, RelaySpec, Role,
};
use shared_types::{Address, BackendKind, DataType, Hash, OnchainId, PortDirection};

/// Deploying account.
pub const DEPLOYER: Address = [0xDE; 20];

/// End user moving funds across the bridge.
pub const USER: Address = [0x5E; 20];

/// Fresh devnet of the given family.
pub fn devnet(backend: BackendKind) -> Arc<dyn ChainAdapter> {
    match backend {
        BackendKind::Evm => Arc::new(EvmDevnet::default()),
        BackendKind::AccountState => Arc::new(AccountStateDevnet::default()),
    }
}

/// `n` random oracles.
pub fn oracles(n: usize) -> Vec<OracleSigner> {
    (0..n).map(|_| OracleSigner::random()).collect()
}

/// Validator set of `oracles`, in order.
pub fn validator_set(oracles: &[OracleSigner]) -> ValidatorSet {
    ValidatorSet::new(oracles.iter().map(OracleSigner::validator_key).collect())
        .expect("distinct random keys")
}

/// Slots for `digest` signed by the oracles at `signers`; the rest empty.
pub fn sign_slots(oracles: &[OracleSigner], digest: &Hash, signers: &[usize]) -> SignatureSet {
    let mut set = SignatureSet::empty(oracles.len());
    for &slot in signers {
        let signature = oracles[slot].sign(digest).expect("signing");
        set.set(slot, &signature);
    }
    set
}

fn new_asset(symbol: &str) -> AssetSpec {
    AssetSpec::New {
        name: format!("{symbol} token"),
        symbol: symbol.to_string(),
        decimals: 8,
    }
}

/// Registry + one bytes relay + the given ports, all oracles shared.
pub fn topology(
    oracles: &[OracleSigner],
    threshold: usize,
    ports: &[PortDirection],
) -> BridgeTopology {
    let validators = validator_set(oracles);
    let bft = validators.threshold(threshold).expect("threshold in range");
    BridgeTopology {
        relays: vec![RelaySpec {
            name: "main".into(),
            data_type: DataType::Bytes,
            oracles: validators.clone(),
            bft,
            existing: None,
        }],
        ports: ports
            .iter()
            .map(|direction| PortSpec {
                name: direction.to_string(),
                relay: "main".into(),
                direction: *direction,
                asset: new_asset(match direction {
                    PortDirection::Lock => "GRAV",
                    PortDirection::Mint => "wGRAV",
                }),
                existing: None,
                token_owner: None,
            })
            .collect(),
        validators,
        bft,
        existing_registry: None,
    }
}

/// A deployed bridge and the oracles that sign for it.
pub struct Bridge {
    /// Devnet the bridge lives on
    pub adapter: Arc<dyn ChainAdapter>,
    /// Client sending as the deployer
    pub client: BridgeClient,
    /// Deployment outcome
    pub report: DeploymentReport,
    /// Oracles in slot order
    pub oracles: Vec<OracleSigner>,
}

impl Bridge {
    /// Deploy `topology` on a fresh devnet.
    pub async fn deploy(
        backend: BackendKind,
        oracles: Vec<OracleSigner>,
        topology: BridgeTopology,
    ) -> Self {
        let adapter = devnet(backend);
        let mut ctx = DeploymentContext::new(adapter.clone(), DEPLOYER);
        let report = DeploymentPipeline::new(topology)
            .run(&mut ctx)
            .await
            .expect("deployment");
        Self {
            client: BridgeClient::new(adapter.clone(), DEPLOYER),
            adapter,
            report,
            oracles,
        }
    }

    /// Id of a deployed role.
    pub fn id(&self, role: Role) -> OnchainId {
        self.report
            .addresses
            .get(&role)
            .unwrap_or_else(|| panic!("{role} not deployed"))
    }

    /// The registry.
    pub fn registry(&self) -> OnchainId {
        self.id(Role::Registry)
    }

    /// The relay.
    pub fn relay(&self) -> OnchainId {
        self.id(Role::Relay("main".into()))
    }

    /// Port by direction.
    pub fn port(&self, direction: PortDirection) -> OnchainId {
        self.id(Role::Port(direction.to_string()))
    }

    /// Token of the port with `direction`.
    pub fn asset(&self, direction: PortDirection) -> OnchainId {
        self.id(Role::Asset(direction.to_string()))
    }

    /// Subscription id of the port with `direction`.
    pub fn subscription(&self, direction: PortDirection) -> u64 {
        self.report
            .addresses
            .subscription(&Role::Port(direction.to_string()))
            .expect("port subscribed")
    }

    /// Slots for `digest` signed at `signers`.
    pub fn sign(&self, digest: &Hash, signers: &[usize]) -> SignatureSet {
        sign_slots(&self.oracles, digest, signers)
    }
}
