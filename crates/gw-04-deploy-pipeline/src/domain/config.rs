//! # Topology Configuration
//!
//! JSON description of a bridge deployment. Validated before any chain call.
//!
//! ```json
//! {
//!   "node_url": "devnet://evm",
//!   "backend": "evm",
//!   "validators": ["02…", "03…", "02…"],
//!   "bft_coefficient": 2,
//!   "relays": [{ "name": "eth", "data_type": "bytes" }],
//!   "ports": [{
//!     "name": "lock", "relay": "eth", "direction": "lock",
//!     "asset": { "name": "Gravity", "symbol": "GRAV", "decimals": 8 }
//!   }]
//! }
//! ```

use super::errors::ConfigError;
use super::topology::{AssetSpec, BridgeTopology, PortSpec, RelaySpec};
use gw_01_oracle_consensus::{BftThreshold, ValidatorKey, ValidatorSet};
use serde::{Deserialize, Serialize};
use shared_types::{BackendKind, DataType, OnchainId, PortDirection};
use std::collections::HashSet;
use std::path::Path;

/// Default environment variable holding the deployer credential.
pub const DEFAULT_KEY_ENV: &str = "DEPLOYER_PRIV_KEY";

fn default_key_env() -> String {
    DEFAULT_KEY_ENV.to_string()
}

fn default_confirmations() -> u64 {
    1
}

/// Top-level deployment configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopologyConfig {
    /// Node endpoint
    pub node_url: String,
    /// Environment variable holding the deployer credential
    #[serde(default = "default_key_env")]
    pub deployer_key_env: String,
    /// Backend family
    pub backend: BackendKind,
    /// Registry validators, hex SEC1 public keys
    pub validators: Vec<String>,
    /// Registry threshold
    pub bft_coefficient: usize,
    /// Reuse this registry
    #[serde(default)]
    pub existing_registry: Option<OnchainId>,
    /// Confirmation depth awaited per step
    #[serde(default = "default_confirmations")]
    pub confirmations: u64,
    /// Relays
    pub relays: Vec<RelayConfig>,
    /// Ports
    #[serde(default)]
    pub ports: Vec<PortConfig>,
}

/// Relay entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Unique name
    pub name: String,
    /// Value tag
    #[serde(default)]
    pub data_type: DataType,
    /// Oracle keys; the registry validators when absent
    #[serde(default)]
    pub oracles: Option<Vec<String>>,
    /// Oracle threshold; the registry threshold when absent
    #[serde(default)]
    pub bft_coefficient: Option<usize>,
    /// Reuse this relay
    #[serde(default)]
    pub existing: Option<OnchainId>,
}

/// Port entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortConfig {
    /// Unique name
    pub name: String,
    /// Relay name
    pub relay: String,
    /// `lock` or `mint`
    pub direction: PortDirection,
    /// Asset moved by the port
    pub asset: AssetConfig,
    /// Reuse this port
    #[serde(default)]
    pub existing: Option<OnchainId>,
    /// Extra minter on a new token of a lock-style port
    #[serde(default)]
    pub token_owner: Option<OnchainId>,
}

/// Existing token or a token to create.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AssetConfig {
    /// Token already deployed
    Existing {
        /// Its id
        existing: OnchainId,
    },
    /// Token to create
    New {
        /// Display name
        name: String,
        /// Ticker
        symbol: String,
        /// Decimal places
        #[serde(default)]
        decimals: u8,
    },
}

impl TopologyConfig {
    /// Read and validate a JSON config file.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every rule that does not need the chain.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.node_url.trim().is_empty() {
            return Err(ConfigError::EmptyNodeUrl);
        }
        if self.deployer_key_env.trim().is_empty() {
            return Err(ConfigError::EmptyCredentialRef);
        }
        let (validators, _) = self.registry_set()?;
        if self.relays.is_empty() {
            return Err(ConfigError::NoRelays);
        }
        if self.ports.is_empty() {
            return Err(ConfigError::NoPorts);
        }

        let mut names = HashSet::new();
        for relay in &self.relays {
            if !names.insert(relay.name.as_str()) {
                return Err(ConfigError::DuplicateName(relay.name.clone()));
            }
            relay_set(relay, &validators, self.bft_coefficient)?;
        }

        let mut port_names = HashSet::new();
        for port in &self.ports {
            if !port_names.insert(port.name.as_str()) {
                return Err(ConfigError::DuplicateName(port.name.clone()));
            }
            if !names.contains(port.relay.as_str()) {
                return Err(ConfigError::UnknownRelay {
                    port: port.name.clone(),
                    relay: port.relay.clone(),
                });
            }
        }
        Ok(())
    }

    /// Validate and convert to the typed topology.
    pub fn into_topology(self) -> Result<BridgeTopology, ConfigError> {
        self.validate()?;
        let (validators, bft) = self.registry_set()?;
        let relays = self
            .relays
            .iter()
            .map(|r| {
                let (oracles, bft) = relay_set(r, &validators, self.bft_coefficient)?;
                Ok(RelaySpec {
                    name: r.name.clone(),
                    data_type: r.data_type,
                    oracles,
                    bft,
                    existing: r.existing,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;
        let ports = self
            .ports
            .into_iter()
            .map(|p| PortSpec {
                name: p.name,
                relay: p.relay,
                direction: p.direction,
                asset: match p.asset {
                    AssetConfig::Existing { existing } => AssetSpec::Existing(existing),
                    AssetConfig::New {
                        name,
                        symbol,
                        decimals,
                    } => AssetSpec::New {
                        name,
                        symbol,
                        decimals,
                    },
                },
                existing: p.existing,
                token_owner: p.token_owner,
            })
            .collect();
        Ok(BridgeTopology {
            validators,
            bft,
            existing_registry: self.existing_registry,
            relays,
            ports,
        })
    }

    fn registry_set(&self) -> Result<(ValidatorSet, BftThreshold), ConfigError> {
        parse_set("registry", &self.validators, self.bft_coefficient)
    }
}

fn relay_set(
    relay: &RelayConfig,
    registry: &ValidatorSet,
    registry_bft: usize,
) -> Result<(ValidatorSet, BftThreshold), ConfigError> {
    let scope = format!("relay '{}'", relay.name);
    let threshold = relay.bft_coefficient.unwrap_or(registry_bft);
    match &relay.oracles {
        Some(keys) => parse_set(&scope, keys, threshold),
        None => threshold_of(&scope, registry, threshold).map(|bft| (registry.clone(), bft)),
    }
}

fn parse_set(
    scope: &str,
    keys: &[String],
    threshold: usize,
) -> Result<(ValidatorSet, BftThreshold), ConfigError> {
    if keys.is_empty() {
        return Err(ConfigError::NoValidators);
    }
    let mut parsed = Vec::with_capacity(keys.len());
    for (index, key) in keys.iter().enumerate() {
        let key = ValidatorKey::from_hex(key).map_err(|e| ConfigError::InvalidKey {
            scope: scope.to_string(),
            index,
            reason: e.to_string(),
        })?;
        parsed.push(key);
    }
    let set = ValidatorSet::new(parsed).map_err(|e| ConfigError::InvalidKey {
        scope: scope.to_string(),
        index: keys.len(),
        reason: e.to_string(),
    })?;
    let bft = threshold_of(scope, &set, threshold)?;
    Ok((set, bft))
}

fn threshold_of(
    scope: &str,
    set: &ValidatorSet,
    threshold: usize,
) -> Result<BftThreshold, ConfigError> {
    set.threshold(threshold)
        .map_err(|_| ConfigError::InvalidThreshold {
            scope: scope.to_string(),
            threshold,
            validators: set.len(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use gw_01_oracle_consensus::OracleSigner;

    fn keys(n: usize) -> Vec<String> {
        (0..n)
            .map(|_| OracleSigner::random().validator_key().to_hex())
            .collect()
    }

    fn sample() -> TopologyConfig {
        let json = serde_json::json!({
            "node_url": "devnet://evm",
            "backend": "evm",
            "validators": keys(3),
            "bft_coefficient": 2,
            "relays": [{ "name": "eth", "data_type": "bytes" }],
            "ports": [
                {
                    "name": "lock",
                    "relay": "eth",
                    "direction": "lock",
                    "asset": { "name": "Gravity", "symbol": "GRAV", "decimals": 8 }
                },
                {
                    "name": "mint",
                    "relay": "eth",
                    "direction": "mint",
                    "asset": { "existing": "0x0101010101010101010101010101010101010101" }
                }
            ]
        });
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_parse_and_convert() {
        let config = sample();
        assert_eq!(config.deployer_key_env, DEFAULT_KEY_ENV);
        assert_eq!(config.confirmations, 1);
        let topology = config.into_topology().unwrap();
        assert_eq!(topology.validators.len(), 3);
        assert_eq!(topology.bft.get(), 2);
        assert_eq!(topology.relays[0].oracles, topology.validators);
        assert!(matches!(topology.ports[0].asset, AssetSpec::New { decimals: 8, .. }));
        assert_eq!(
            topology.ports[1].asset.existing(),
            Some(OnchainId::new([1; 20]))
        );
    }

    #[test]
    fn test_rejects_empty_fields() {
        let mut config = sample();
        config.node_url = " ".into();
        assert!(matches!(config.validate(), Err(ConfigError::EmptyNodeUrl)));

        let mut config = sample();
        config.deployer_key_env.clear();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EmptyCredentialRef)
        ));

        let mut config = sample();
        config.validators.clear();
        assert!(matches!(config.validate(), Err(ConfigError::NoValidators)));

        let mut config = sample();
        config.ports.clear();
        assert!(matches!(config.validate(), Err(ConfigError::NoPorts)));
        assert!(config.into_topology().is_err());
    }

    #[test]
    fn test_threshold_bounds() {
        for bad in [0, 4] {
            let mut config = sample();
            config.bft_coefficient = bad;
            assert!(matches!(
                config.validate(),
                Err(ConfigError::InvalidThreshold { .. })
            ));
        }
        let mut config = sample();
        config.relays[0].bft_coefficient = Some(5);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidThreshold { .. })
        ));
    }

    #[test]
    fn test_rejects_bad_references() {
        let mut config = sample();
        config.ports[1].relay = "sol".into();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::UnknownRelay { .. })
        ));

        let mut config = sample();
        config.ports[1].name = "lock".into();
        assert!(matches!(config.validate(), Err(ConfigError::DuplicateName(_))));
    }

    #[test]
    fn test_rejects_malformed_keys() {
        let mut config = sample();
        config.validators[1] = "0xzz".into();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidKey { index: 1, .. })
        ));

        let mut config = sample();
        config.validators[2] = config.validators[0].clone();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidKey { .. })
        ));
    }

    #[test]
    fn test_malformed_id_fails_parse() {
        let json = r#"{
            "node_url": "devnet://x", "backend": "evm", "validators": [],
            "bft_coefficient": 1, "relays": [], "existing_registry": "0x12"
        }"#;
        assert!(serde_json::from_str::<TopologyConfig>(json).is_err());
    }

    #[test]
    fn test_load_from_missing_file() {
        let err = TopologyConfig::load_from_file("/nonexistent/bridge.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("gw-topology-{}.json", std::process::id()));
        std::fs::write(&path, serde_json::to_string(&sample()).unwrap()).unwrap();
        let config = TopologyConfig::load_from_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(config.ports.len(), 2);
    }
}
