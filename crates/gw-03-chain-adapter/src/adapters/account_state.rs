//! Account-state devnet.
//!
//! Installing attaches a bare script to a fresh account; a data transaction
//! then writes the entries the script is configured from. Receipts carry no
//! events, so created ids and subscription ids come from derivation and
//! state reads.

use super::devnet::{check_endpoint, Devnet, DevnetConfig, IdScheme};
use crate::domain::{
    AdapterError, Operation, PendingHandle, Receipt, StateKey, StateValue, Transaction,
};
use crate::ports::{ChainAdapter, DeploymentModel};
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use shared_types::{Address, BackendKind, OnchainId, TxId};
use tracing::info;

fn sha256(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}

/// Fresh script account: `sha256(sender ‖ nonce)` tail.
pub fn script_account(sender: &Address, nonce: u64) -> OnchainId {
    OnchainId::from_hash_tail(&sha256(&[sender.as_slice(), &nonce.to_be_bytes()[..]]))
}

fn tx_hash(sender: &Address, nonce: u64) -> TxId {
    sha256(&[&b"account"[..], sender.as_slice(), &nonce.to_be_bytes()[..]])
}

/// In-process account-state chain.
pub struct AccountStateDevnet {
    chain: Devnet,
}

impl AccountStateDevnet {
    /// Devnet with the given parameters.
    pub fn new(config: DevnetConfig) -> Self {
        Self {
            chain: Devnet::new(
                "account-state",
                config,
                IdScheme {
                    tx_id: tx_hash,
                    program_id: script_account,
                },
            ),
        }
    }

    /// Open the devnet behind `url`. Only in-process endpoints are served.
    pub fn connect(url: &str, config: DevnetConfig) -> Result<Self, AdapterError> {
        check_endpoint(url)?;
        info!(url, "[gw-03] account-state devnet ready");
        Ok(Self::new(config))
    }

    /// Current block height.
    pub fn height(&self) -> u64 {
        self.chain.height()
    }
}

impl Default for AccountStateDevnet {
    fn default() -> Self {
        Self::new(DevnetConfig::default())
    }
}

#[async_trait]
impl ChainAdapter for AccountStateDevnet {
    fn backend(&self) -> BackendKind {
        BackendKind::AccountState
    }

    fn deployment_model(&self) -> DeploymentModel {
        DeploymentModel::ScriptThenData
    }

    async fn submit(&self, tx: Transaction) -> Result<PendingHandle, AdapterError> {
        if let Operation::Install { init: Some(_), .. } = &tx.op {
            return Err(AdapterError::UnsupportedOperation {
                backend: BackendKind::AccountState,
                operation: "install with constructor arguments",
            });
        }
        Ok(self.chain.enqueue(tx))
    }

    async fn await_finality(&self, handle: &PendingHandle) -> Result<Receipt, AdapterError> {
        let executed = self.chain.await_final(handle).await?;
        Ok(Receipt {
            tx_id: handle.tx_id,
            height: executed.height,
            created: None,
            events: Vec::new(),
        })
    }

    async fn read_state(
        &self,
        id: &OnchainId,
        key: &StateKey,
    ) -> Result<StateValue, AdapterError> {
        self.chain.read(id, key)
    }

    fn derive_created_id(&self, handle: &PendingHandle) -> Option<OnchainId> {
        Some(self.chain.program_id(&handle.sender, handle.nonce))
    }
}
