//! # Deployment Flows
//!
//! JSON configuration → validated topology → deployed bridge, on both
//! backend families, followed by a second run that reuses every role.

#[cfg(test)]
mod tests {
    use crate::integration::fixtures::{devnet, oracles, DEPLOYER, USER};
    use gw_03_chain_adapter::{ChainAdapter, EvmDevnet, StateKey, StateValue};
    use gw_04_deploy_pipeline::{
        AssetConfig, ConfigError, DeploymentContext, DeploymentPipeline, DeploymentReport, Role,
        TopologyConfig,
    };
    use shared_types::{BackendKind, OnchainId};
    use std::sync::Arc;

    fn config(backend: BackendKind) -> TopologyConfig {
        let keys: Vec<String> = oracles(4)
            .iter()
            .map(|o| o.validator_key().to_hex())
            .collect();
        let json = serde_json::json!({
            "node_url": format!("devnet://{backend}"),
            "backend": backend,
            "validators": keys,
            "bft_coefficient": 3,
            "relays": [{ "name": "eth", "data_type": "bytes" }],
            "ports": [
                {
                    "name": "lock",
                    "relay": "eth",
                    "direction": "lock",
                    "asset": { "name": "Gravity", "symbol": "GRAV", "decimals": 8 },
                    "token_owner": OnchainId::new(USER).to_string()
                },
                {
                    "name": "mint",
                    "relay": "eth",
                    "direction": "mint",
                    "asset": { "name": "Wrapped ETH", "symbol": "gETH", "decimals": 18 }
                }
            ]
        });
        serde_json::from_value(json).unwrap()
    }

    /// Same configuration pointing at everything `report` recorded.
    fn reusing(mut config: TopologyConfig, report: &DeploymentReport) -> TopologyConfig {
        let ids = &report.addresses;
        config.existing_registry = ids.get(&Role::Registry);
        for relay in &mut config.relays {
            relay.existing = ids.get(&Role::Relay(relay.name.clone()));
        }
        for port in &mut config.ports {
            port.existing = ids.get(&Role::Port(port.name.clone()));
            if let Some(existing) = ids.get(&Role::Asset(port.name.clone())) {
                port.asset = AssetConfig::Existing { existing };
            }
        }
        config
    }

    async fn deploy(
        adapter: &Arc<dyn ChainAdapter>,
        config: TopologyConfig,
    ) -> DeploymentReport {
        let topology = config.into_topology().unwrap();
        let mut ctx = DeploymentContext::new(adapter.clone(), DEPLOYER);
        DeploymentPipeline::new(topology).run(&mut ctx).await.unwrap()
    }

    async fn deploy_and_reuse(backend: BackendKind) {
        let adapter = devnet(backend);
        let config = config(backend);
        let first = deploy(&adapter, config.clone()).await;

        assert_eq!(first.installs, 6);
        assert_eq!(first.addresses.len(), 6);
        assert!(first.addresses.entries().iter().all(|e| !e.reused));
        let lock = Role::Port("lock".into());
        let mint = Role::Port("mint".into());
        assert_eq!(first.addresses.subscription(&lock), Some(1));
        assert_eq!(first.addresses.subscription(&mint), Some(2));

        // Lock token: installer + configured owner. Mint token: installer + port.
        let lock_token = first.addresses.get(&Role::Asset("lock".into())).unwrap();
        let minters = adapter
            .read_state(&lock_token, &StateKey::Minters)
            .await
            .unwrap();
        assert_eq!(
            minters,
            StateValue::Ids({
                let mut ids = vec![OnchainId::new(DEPLOYER), OnchainId::new(USER)];
                ids.sort();
                ids
            })
        );
        let mint_token = first.addresses.get(&Role::Asset("mint".into())).unwrap();
        let minters = adapter
            .read_state(&mint_token, &StateKey::Minters)
            .await
            .unwrap();
        let mint_port = first.addresses.get(&mint).unwrap();
        assert!(matches!(minters, StateValue::Ids(ids) if ids.contains(&mint_port)));

        let json = first.to_json();
        assert_eq!(json["installs"], 6);
        assert!(json["transactions"].as_array().is_some_and(|t| !t.is_empty()));

        // Everything existing: only wiring runs, ids and subscriptions unchanged
        let second = deploy(&adapter, reusing(config, &first)).await;
        assert_eq!(second.installs, 0);
        assert!(second.addresses.entries().iter().all(|e| e.reused));
        assert_eq!(second.addresses.pairs(), first.addresses.pairs());
        assert_eq!(second.addresses.subscription(&lock), Some(1));
        assert_eq!(second.addresses.subscription(&mint), Some(2));
        assert!(second.transactions.iter().all(|t| !t.step.starts_with("install")));
    }

    #[tokio::test]
    async fn test_deploy_and_reuse_evm() {
        deploy_and_reuse(BackendKind::Evm).await;
    }

    #[tokio::test]
    async fn test_deploy_and_reuse_account_state() {
        deploy_and_reuse(BackendKind::AccountState).await;
    }

    #[tokio::test]
    async fn test_invalid_config_never_touches_chain() {
        let chain = Arc::new(EvmDevnet::default());
        let mut config = config(BackendKind::Evm);
        config.bft_coefficient = 5;

        let path = std::env::temp_dir().join(format!("gw-e2e-{}.json", std::process::id()));
        std::fs::write(&path, serde_json::to_string(&config).unwrap()).unwrap();
        let loaded = TopologyConfig::load_from_file(&path);
        std::fs::remove_file(&path).unwrap();

        assert!(matches!(
            loaded,
            Err(ConfigError::InvalidThreshold {
                threshold: 5,
                validators: 4,
                ..
            })
        ));
        assert!(config.into_topology().is_err());
        assert_eq!(chain.height(), 0);
    }

    #[test]
    fn test_unknown_relay_rejected() {
        let mut config = config(BackendKind::AccountState);
        config.ports[1].relay = "sol".into();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::UnknownRelay { ref relay, .. }) if relay == "sol"
        ));
    }
}
