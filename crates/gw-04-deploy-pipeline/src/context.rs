//! # Deployment Context
//!
//! Everything one run owns: the adapter handle, the deployer account, the
//! address set and the transaction log. Independent runs use separate
//! contexts and share nothing mutable.

use crate::domain::{DeployedAddressSet, PipelineError, Role};
use gw_03_chain_adapter::{
    AdapterError, ChainAdapter, Operation, PendingHandle, Receipt, StateKey, StateValue,
    Transaction,
};
use shared_types::{Address, OnchainId, TxId};
use std::sync::Arc;
use tracing::{debug, info};

/// Finalized transaction of one step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StepRecord {
    /// Step name
    pub step: String,
    /// Transaction id
    pub tx_id: TxId,
    /// Inclusion height
    pub height: u64,
}

/// Outcome of a completed run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeploymentReport {
    /// Role → id map
    pub addresses: DeployedAddressSet,
    /// Finalized transactions in order
    pub transactions: Vec<StepRecord>,
    /// Programs created by this run
    pub installs: usize,
}

impl DeploymentReport {
    /// JSON rendering for operators.
    pub fn to_json(&self) -> serde_json::Value {
        let transactions: Vec<_> = self
            .transactions
            .iter()
            .map(|t| {
                serde_json::json!({
                    "step": t.step,
                    "tx": format!("0x{}", hex::encode(t.tx_id)),
                    "height": t.height,
                })
            })
            .collect();
        serde_json::json!({
            "addresses": self.addresses,
            "transactions": transactions,
            "installs": self.installs,
        })
    }
}

/// Per-run state.
pub struct DeploymentContext {
    adapter: Arc<dyn ChainAdapter>,
    deployer: Address,
    addresses: DeployedAddressSet,
    transactions: Vec<StepRecord>,
    installs: usize,
}

impl DeploymentContext {
    /// Fresh context for one run.
    pub fn new(adapter: Arc<dyn ChainAdapter>, deployer: Address) -> Self {
        Self {
            adapter,
            deployer,
            addresses: DeployedAddressSet::new(),
            transactions: Vec::new(),
            installs: 0,
        }
    }

    /// Adapter the run drives.
    pub fn adapter(&self) -> &Arc<dyn ChainAdapter> {
        &self.adapter
    }

    /// Sending account.
    pub fn deployer(&self) -> Address {
        self.deployer
    }

    /// Roles recorded so far, including after a failed run.
    pub fn addresses(&self) -> &DeployedAddressSet {
        &self.addresses
    }

    pub(crate) fn addresses_mut(&mut self) -> &mut DeployedAddressSet {
        &mut self.addresses
    }

    /// Transactions finalized so far.
    pub fn transactions(&self) -> &[StepRecord] {
        &self.transactions
    }

    /// Id recorded for `role`, or a missing-dependency error naming `step`.
    pub(crate) fn require(&self, step: &str, role: &Role) -> Result<OnchainId, PipelineError> {
        self.addresses
            .get(role)
            .ok_or_else(|| PipelineError::MissingDependency {
                step: step.to_string(),
                dependency: role.clone(),
            })
    }

    /// Submit, await finality, log the transaction.
    pub(crate) async fn execute(
        &mut self,
        step: &str,
        role: &Role,
        op: Operation,
    ) -> Result<(PendingHandle, Receipt), PipelineError> {
        let fail = |source: AdapterError| PipelineError::Step {
            step: step.to_string(),
            role: role.clone(),
            source,
        };
        let handle = self
            .adapter
            .submit(Transaction::new(self.deployer, op))
            .await
            .map_err(fail)?;
        debug!(step, nonce = handle.nonce, "[gw-04] submitted");
        let receipt = self.adapter.await_finality(&handle).await.map_err(fail)?;
        info!(
            step,
            tx = %hex::encode(receipt.tx_id),
            height = receipt.height,
            "[gw-04] step finalized"
        );
        self.transactions.push(StepRecord {
            step: step.to_string(),
            tx_id: receipt.tx_id,
            height: receipt.height,
        });
        Ok((handle, receipt))
    }

    pub(crate) fn count_install(&mut self) {
        self.installs += 1;
    }

    /// Read state on behalf of `step`.
    pub(crate) async fn read(
        &self,
        step: &str,
        role: &Role,
        id: &OnchainId,
        key: &StateKey,
    ) -> Result<StateValue, PipelineError> {
        self.adapter
            .read_state(id, key)
            .await
            .map_err(|source| PipelineError::Step {
                step: step.to_string(),
                role: role.clone(),
                source,
            })
    }

    /// Snapshot of the run so far.
    pub fn report(&self) -> DeploymentReport {
        DeploymentReport {
            addresses: self.addresses.clone(),
            transactions: self.transactions.clone(),
            installs: self.installs,
        }
    }
}
