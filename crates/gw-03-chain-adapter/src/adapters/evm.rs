//! EVM-style devnet.
//!
//! Programs are created with constructor arguments. Receipts report the
//! created address and the structured event log.

use super::devnet::{check_endpoint, Devnet, DevnetConfig, IdScheme};
use crate::domain::{
    AdapterError, Operation, PendingHandle, Receipt, StateKey, StateValue, Transaction,
};
use crate::ports::{ChainAdapter, DeploymentModel};
use async_trait::async_trait;
use shared_types::{keccak256, Address, BackendKind, OnchainId, TxId};
use tracing::info;

/// `keccak(sender ‖ nonce)` tail, the address a contract creation yields.
fn create_address(sender: &Address, nonce: u64) -> OnchainId {
    let mut preimage = Vec::with_capacity(28);
    preimage.extend_from_slice(sender);
    preimage.extend_from_slice(&nonce.to_be_bytes());
    OnchainId::from_hash_tail(&keccak256(&preimage))
}

fn tx_hash(sender: &Address, nonce: u64) -> TxId {
    let mut preimage = Vec::with_capacity(31);
    preimage.extend_from_slice(b"evm");
    preimage.extend_from_slice(sender);
    preimage.extend_from_slice(&nonce.to_be_bytes());
    keccak256(&preimage)
}

/// In-process EVM-style chain.
pub struct EvmDevnet {
    chain: Devnet,
}

impl EvmDevnet {
    /// Devnet with the given parameters.
    pub fn new(config: DevnetConfig) -> Self {
        Self {
            chain: Devnet::new(
                "evm",
                config,
                IdScheme {
                    tx_id: tx_hash,
                    program_id: create_address,
                },
            ),
        }
    }

    /// Open the devnet behind `url`. Only in-process endpoints are served.
    pub fn connect(url: &str, config: DevnetConfig) -> Result<Self, AdapterError> {
        check_endpoint(url)?;
        info!(url, "[gw-03] evm devnet ready");
        Ok(Self::new(config))
    }

    /// Current block height.
    pub fn height(&self) -> u64 {
        self.chain.height()
    }
}

impl Default for EvmDevnet {
    fn default() -> Self {
        Self::new(DevnetConfig::default())
    }
}

#[async_trait]
impl ChainAdapter for EvmDevnet {
    fn backend(&self) -> BackendKind {
        BackendKind::Evm
    }

    fn deployment_model(&self) -> DeploymentModel {
        DeploymentModel::ConstructorArgs
    }

    async fn submit(&self, tx: Transaction) -> Result<PendingHandle, AdapterError> {
        let unsupported = match &tx.op {
            Operation::Install { init: None, .. } => Some("install without constructor arguments"),
            Operation::InitializeStorage { .. } => Some(tx.op.name()),
            _ => None,
        };
        if let Some(operation) = unsupported {
            return Err(AdapterError::UnsupportedOperation {
                backend: BackendKind::Evm,
                operation,
            });
        }
        Ok(self.chain.enqueue(tx))
    }

    async fn await_finality(&self, handle: &PendingHandle) -> Result<Receipt, AdapterError> {
        let executed = self.chain.await_final(handle).await?;
        Ok(Receipt {
            tx_id: handle.tx_id,
            height: executed.height,
            created: executed.created,
            events: executed.events,
        })
    }

    async fn read_state(
        &self,
        id: &OnchainId,
        key: &StateKey,
    ) -> Result<StateValue, AdapterError> {
        self.chain.read(id, key)
    }

    fn derive_created_id(&self, _handle: &PendingHandle) -> Option<OnchainId> {
        None
    }
}
