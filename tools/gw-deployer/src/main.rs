//! GW-Deployer: bridge deployment CLI
//!
//! Deploys a bridge topology onto an in-process devnet and prints the
//! resulting role → id map.
//!
//! ```text
//! gw-deployer evm deploy --config bridge.json
//! gw-deployer evm faucet --config bridge.json <port> <receiver> <amount>
//! gw-deployer account deploy --config bridge.json
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use gw_01_oracle_consensus::OracleSigner;
use gw_03_chain_adapter::{AccountStateDevnet, ChainAdapter, DevnetConfig, EvmDevnet};
use gw_04_deploy_pipeline::{
    BridgeClient, ConfigError, DeploymentContext, DeploymentPipeline, DeploymentReport, Role,
    TopologyConfig,
};
use shared_types::{Address, BackendKind, OnchainId};

/// GW-Deployer: deploy and wire a cross-chain bridge
#[derive(Parser, Debug)]
#[command(name = "gw-deployer")]
#[command(about = "Deploy registry, relays and ports of a bridge topology")]
struct Cli {
    #[command(subcommand)]
    backend: BackendCommand,
}

#[derive(Subcommand, Debug)]
enum BackendCommand {
    /// EVM-style backend
    Evm {
        #[command(subcommand)]
        action: EvmAction,
    },
    /// Account-state backend
    Account {
        #[command(subcommand)]
        action: AccountAction,
    },
}

#[derive(Subcommand, Debug)]
enum EvmAction {
    /// Deploy the topology
    Deploy(ConfigArgs),
    /// Deploy, then mint whole tokens of a port's asset to a receiver
    Faucet(FaucetArgs),
}

#[derive(Subcommand, Debug)]
enum AccountAction {
    /// Deploy the topology
    Deploy(ConfigArgs),
}

#[derive(Args, Debug)]
struct ConfigArgs {
    /// Topology config file (JSON)
    #[arg(short, long, default_value = "bridge.json")]
    config: PathBuf,
}

#[derive(Args, Debug)]
struct FaucetArgs {
    #[command(flatten)]
    config: ConfigArgs,

    /// Port whose asset is minted
    port: String,

    /// Receiving account (hex)
    receiver: String,

    /// Whole tokens; scaled by the token's decimals
    amount: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    match Cli::parse().backend {
        BackendCommand::Evm { action } => match action {
            EvmAction::Deploy(args) => {
                let run = prepare(&args.config, BackendKind::Evm)?;
                print_report(&run.deploy().await?)
            }
            EvmAction::Faucet(args) => faucet(args).await,
        },
        BackendCommand::Account { action } => match action {
            AccountAction::Deploy(args) => {
                let run = prepare(&args.config, BackendKind::AccountState)?;
                print_report(&run.deploy().await?)
            }
        },
    }
}

/// Validated inputs of one run. Built before any chain call.
struct Run {
    config: TopologyConfig,
    adapter: Arc<dyn ChainAdapter>,
    deployer: Address,
}

impl Run {
    async fn deploy(&self) -> Result<DeploymentReport> {
        let topology = self.config.clone().into_topology()?;
        let mut ctx = DeploymentContext::new(self.adapter.clone(), self.deployer);
        let report = DeploymentPipeline::new(topology)
            .run(&mut ctx)
            .await
            .context("deployment halted")?;
        Ok(report)
    }
}

fn prepare(path: &Path, backend: BackendKind) -> Result<Run> {
    let config = TopologyConfig::load_from_file(path)
        .with_context(|| format!("loading {}", path.display()))?;
    if config.backend != backend {
        bail!(
            "{} targets the {} backend, not {}",
            path.display(),
            config.backend,
            backend
        );
    }
    let deployer = deployer_address(&config.deployer_key_env)?;

    let devnet = DevnetConfig {
        confirmations: config.confirmations,
        ..DevnetConfig::default()
    };
    let adapter: Arc<dyn ChainAdapter> = match backend {
        BackendKind::Evm => Arc::new(EvmDevnet::connect(&config.node_url, devnet)?),
        BackendKind::AccountState => {
            Arc::new(AccountStateDevnet::connect(&config.node_url, devnet)?)
        }
    };
    info!(
        %backend,
        deployer = %OnchainId::new(deployer),
        "[gw-deployer] configuration loaded"
    );
    Ok(Run {
        config,
        adapter,
        deployer,
    })
}

fn deployer_address(var: &str) -> Result<Address> {
    let secret = std::env::var(var).map_err(|e| ConfigError::Credential {
        var: var.to_string(),
        reason: e.to_string(),
    })?;
    let signer = OracleSigner::from_hex(&secret).map_err(|e| ConfigError::Credential {
        var: var.to_string(),
        reason: e.to_string(),
    })?;
    Ok(signer.validator_key().address())
}

async fn faucet(args: FaucetArgs) -> Result<()> {
    let receiver: OnchainId = args
        .receiver
        .parse()
        .with_context(|| format!("receiver {}", args.receiver))?;
    let run = prepare(&args.config.config, BackendKind::Evm)?;
    let report = run.deploy().await?;
    let token = report
        .addresses
        .get(&Role::Asset(args.port.clone()))
        .with_context(|| format!("no port named '{}'", args.port))?;

    let client = BridgeClient::new(run.adapter.clone(), run.deployer);
    let tx = client
        .faucet(token, *receiver.as_bytes(), args.amount)
        .await
        .context("faucet")?;
    let balance = client.balance(token, *receiver.as_bytes()).await?;
    print_report(&report)?;
    println!(
        "{}",
        serde_json::to_string_pretty(&serde_json::json!({
            "faucet": {
                "token": token,
                "receiver": receiver,
                "tx": format!("0x{}", hex::encode(tx)),
                "balance": balance.to_string(),
            }
        }))?
    );
    Ok(())
}

fn print_report(report: &DeploymentReport) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&report.to_json())?);
    Ok(())
}
