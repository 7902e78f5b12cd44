//! # Outbound Ports
//!
//! The capability interface the deployment pipeline and the runtime client
//! drive. No automatic retries: a handle is finalized at most once and the
//! adapter never re-submits.

use crate::domain::{AdapterError, PendingHandle, Receipt, StateKey, StateValue, Transaction};
use async_trait::async_trait;
use shared_types::{BackendKind, OnchainId};

/// How a backend creates and configures programs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeploymentModel {
    /// Install carries constructor arguments; receipts report the created
    /// address and structured events.
    ConstructorArgs,
    /// Install attaches a bare script to a fresh account, then a separate
    /// data write configures it. Receipts carry no events; created ids are
    /// derived from sender and nonce.
    ScriptThenData,
}

/// Chain adapter - outbound port.
#[async_trait]
pub trait ChainAdapter: Send + Sync {
    /// Backend family.
    fn backend(&self) -> BackendKind;

    /// Transaction model.
    fn deployment_model(&self) -> DeploymentModel;

    /// Submit a transaction. Returns once the node accepted it.
    async fn submit(&self, tx: Transaction) -> Result<PendingHandle, AdapterError>;

    /// Block until the transaction is final. A failed transaction surfaces
    /// as `AdapterError::Rejected`.
    async fn await_finality(&self, handle: &PendingHandle) -> Result<Receipt, AdapterError>;

    /// Read program state.
    async fn read_state(&self, id: &OnchainId, key: &StateKey)
        -> Result<StateValue, AdapterError>;

    /// Id of the program an install created, computed from the handle.
    /// `None` on backends that report it in the receipt instead.
    fn derive_created_id(&self, handle: &PendingHandle) -> Option<OnchainId>;
}
