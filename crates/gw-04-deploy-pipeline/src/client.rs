//! # Bridge Client
//!
//! Runtime calls against a deployed bridge through the same adapter the
//! pipeline used. Every call submits one transaction and waits for it.
//!
//! A pulse submission below threshold reverts on chain; the client reports
//! it as [`PulseOutcome::NotConfirmed`] so callers can collect more
//! signatures and resubmit.

use crate::domain::ClientError;
use gw_01_oracle_consensus::{DigestState, PulseRecord, SignatureSet, ValidatorSet};
use gw_02_port_lifecycle::TransferRequest;
use gw_03_chain_adapter::{
    AdapterError, Call, ChainAdapter, Operation, ProgramError, Receipt, StateKey, StateValue,
    Transaction,
};
use shared_types::{Address, ForeignAddress, Hash, OnchainId, TxId, U256};
use std::sync::Arc;
use tracing::{debug, info};

/// Result of a phase-1 submission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PulseOutcome {
    /// The digest holds a pulse, created now or earlier.
    Confirmed {
        /// Pulse id
        pulse_id: u64,
        /// Transaction id
        tx_id: TxId,
    },
    /// Too few valid signatures; nothing changed.
    NotConfirmed {
        /// Valid slots counted
        valid: usize,
        /// Threshold
        required: usize,
    },
}

impl PulseOutcome {
    /// Pulse id when confirmed.
    pub fn pulse_id(&self) -> Option<u64> {
        match self {
            PulseOutcome::Confirmed { pulse_id, .. } => Some(*pulse_id),
            PulseOutcome::NotConfirmed { .. } => None,
        }
    }
}

/// Runtime client bound to one sender.
#[derive(Clone)]
pub struct BridgeClient {
    adapter: Arc<dyn ChainAdapter>,
    sender: Address,
}

impl BridgeClient {
    /// Client sending as `sender`.
    pub fn new(adapter: Arc<dyn ChainAdapter>, sender: Address) -> Self {
        Self { adapter, sender }
    }

    /// Same adapter, different sender.
    pub fn with_sender(&self, sender: Address) -> Self {
        Self {
            adapter: self.adapter.clone(),
            sender,
        }
    }

    /// Sending account.
    pub fn sender(&self) -> Address {
        self.sender
    }

    async fn send(
        &self,
        action: &'static str,
        target: OnchainId,
        call: Call,
    ) -> Result<Receipt, ClientError> {
        let fail = |source: AdapterError| ClientError::Adapter {
            action,
            target,
            source,
        };
        let tx = Transaction::new(self.sender, Operation::Invoke { target, call });
        let handle = self.adapter.submit(tx).await.map_err(fail)?;
        let receipt = self.adapter.await_finality(&handle).await.map_err(fail)?;
        debug!(action, %target, tx = %hex::encode(receipt.tx_id), "[gw-04] call finalized");
        Ok(receipt)
    }

    async fn read(
        &self,
        action: &'static str,
        target: OnchainId,
        key: StateKey,
    ) -> Result<StateValue, ClientError> {
        self.adapter
            .read_state(&target, &key)
            .await
            .map_err(|source| ClientError::Adapter {
                action,
                target,
                source,
            })
    }

    /// Phase 1: commit `digest` with one slot per oracle.
    pub async fn submit_pulse(
        &self,
        relay: OnchainId,
        digest: Hash,
        signatures: SignatureSet,
    ) -> Result<PulseOutcome, ClientError> {
        const ACTION: &str = "submit-pulse";
        let receipt = match self
            .send(ACTION, relay, Call::SendHashValue { digest, signatures })
            .await
        {
            Ok(receipt) => receipt,
            Err(e) => {
                let below_threshold = e.adapter_error().and_then(|a| match a.program_error() {
                    Some(ProgramError::QuorumNotReached { valid, required }) => {
                        Some((*valid, *required))
                    }
                    _ => None,
                });
                return match below_threshold {
                    Some((valid, required)) => {
                        info!(%relay, valid, required, "[gw-04] pulse not confirmed");
                        Ok(PulseOutcome::NotConfirmed { valid, required })
                    }
                    None => Err(e),
                };
            }
        };

        let pulse_id = match receipt.pulse_id() {
            Some(id) => id,
            None => match self.read(ACTION, relay, StateKey::Digest(digest)).await? {
                StateValue::Digest(DigestState::Confirmed { pulse_id }) => pulse_id,
                other => {
                    return Err(ClientError::UnexpectedState {
                        action: ACTION,
                        target: relay,
                        found: format!("{other:?}"),
                    })
                }
            },
        };
        info!(%relay, pulse_id, "[gw-04] pulse confirmed");
        Ok(PulseOutcome::Confirmed {
            pulse_id,
            tx_id: receipt.tx_id,
        })
    }

    /// Phase 2: attach the payload of a confirmed pulse and deliver it to
    /// one subscription.
    pub async fn attach_value(
        &self,
        relay: OnchainId,
        subscription: u64,
        pulse_id: u64,
        payload: Vec<u8>,
    ) -> Result<TxId, ClientError> {
        let call = Call::SendValueToSub {
            payload,
            pulse_id,
            subscription,
        };
        Ok(self.send("attach-value", relay, call).await?.tx_id)
    }

    /// Subscribe a program to a relay.
    pub async fn subscribe(
        &self,
        relay: OnchainId,
        subscriber: OnchainId,
    ) -> Result<u64, ClientError> {
        const ACTION: &str = "subscribe";
        let receipt = self.send(ACTION, relay, Call::Subscribe { subscriber }).await?;
        if let Some(id) = receipt.subscription_id() {
            return Ok(id);
        }
        let value = self
            .read(ACTION, relay, StateKey::SubscriptionOf(subscriber))
            .await?;
        value.as_int().ok_or_else(|| ClientError::UnexpectedState {
            action: ACTION,
            target: relay,
            found: format!("{value:?}"),
        })
    }

    /// Open a transfer request for the sender's tokens.
    pub async fn create_transfer_request(
        &self,
        port: OnchainId,
        amount: U256,
        destination: ForeignAddress,
    ) -> Result<TransferRequest, ClientError> {
        const ACTION: &str = "create-transfer-request";
        let call = Call::CreateTransferRequest {
            amount,
            destination,
        };
        let receipt = self.send(ACTION, port, call).await?;
        if let Some(request) = receipt.created_request() {
            return Ok(request.clone());
        }
        // No events: the newest pending request of this sender is ours.
        self.pending_requests(port)
            .await?
            .into_iter()
            .filter(|r| r.origin == self.sender)
            .max_by_key(|r| r.id)
            .ok_or_else(|| ClientError::UnexpectedState {
                action: ACTION,
                target: port,
                found: "no pending request from sender".into(),
            })
    }

    /// Requests still pending on a port, by id.
    pub async fn pending_requests(
        &self,
        port: OnchainId,
    ) -> Result<Vec<TransferRequest>, ClientError> {
        const ACTION: &str = "pending-requests";
        match self.read(ACTION, port, StateKey::PendingRequests).await? {
            StateValue::Requests(requests) => Ok(requests),
            StateValue::Absent => Ok(Vec::new()),
            other => Err(ClientError::UnexpectedState {
                action: ACTION,
                target: port,
                found: format!("{other:?}"),
            }),
        }
    }

    /// One request in any status.
    pub async fn request(
        &self,
        port: OnchainId,
        id: U256,
    ) -> Result<Option<TransferRequest>, ClientError> {
        match self.read("request", port, StateKey::Request(id)).await? {
            StateValue::Request(request) => Ok(Some(request)),
            _ => Ok(None),
        }
    }

    /// Most recent pulse id, 0 before the first pulse.
    pub async fn last_pulse_id(&self, relay: OnchainId) -> Result<u64, ClientError> {
        const ACTION: &str = "last-pulse-id";
        let value = self.read(ACTION, relay, StateKey::LastPulseId).await?;
        value.as_int().ok_or_else(|| ClientError::UnexpectedState {
            action: ACTION,
            target: relay,
            found: format!("{value:?}"),
        })
    }

    /// Pulse by id.
    pub async fn pulse(
        &self,
        relay: OnchainId,
        pulse_id: u64,
    ) -> Result<Option<PulseRecord>, ClientError> {
        match self.read("pulse", relay, StateKey::Pulse(pulse_id)).await? {
            StateValue::Pulse(pulse) => Ok(Some(pulse)),
            _ => Ok(None),
        }
    }

    /// Payload attached to a pulse.
    pub async fn attached_value(
        &self,
        relay: OnchainId,
        pulse_id: u64,
    ) -> Result<Option<Vec<u8>>, ClientError> {
        match self.read("attached-value", relay, StateKey::Value(pulse_id)).await? {
            StateValue::Bytes(payload) => Ok(Some(payload)),
            _ => Ok(None),
        }
    }

    /// Token balance in base units.
    pub async fn balance(&self, token: OnchainId, account: Address) -> Result<U256, ClientError> {
        const ACTION: &str = "balance";
        let value = self.read(ACTION, token, StateKey::Balance(account)).await?;
        value.as_amount().ok_or_else(|| ClientError::UnexpectedState {
            action: ACTION,
            target: token,
            found: format!("{value:?}"),
        })
    }

    /// Mint `amount` whole tokens (`amount * 10^decimals` base units) to
    /// `receiver`. The sender must be a minter.
    pub async fn faucet(
        &self,
        token: OnchainId,
        receiver: Address,
        amount: u64,
    ) -> Result<TxId, ClientError> {
        const ACTION: &str = "faucet";
        let value = self.read(ACTION, token, StateKey::Decimals).await?;
        let decimals = value.as_int().ok_or_else(|| ClientError::UnexpectedState {
            action: ACTION,
            target: token,
            found: format!("{value:?}"),
        })?;
        let scaled = scale(amount, decimals)?;
        let tx_id = self
            .send(
                ACTION,
                token,
                Call::Mint {
                    receiver,
                    amount: scaled,
                },
            )
            .await?
            .tx_id;
        info!(%token, amount, decimals, "[gw-04] faucet minted");
        Ok(tx_id)
    }

    /// Rotate the registry's validator set.
    pub async fn update_consuls(
        &self,
        registry: OnchainId,
        consuls: ValidatorSet,
        round: u64,
        signatures: SignatureSet,
    ) -> Result<TxId, ClientError> {
        let call = Call::UpdateConsuls {
            consuls,
            round,
            signatures,
        };
        Ok(self.send("update-consuls", registry, call).await?.tx_id)
    }
}

/// `amount * 10^decimals`, checked.
fn scale(amount: u64, decimals: u64) -> Result<U256, ClientError> {
    let overflow = || ClientError::AmountOverflow { amount, decimals };
    let mut factor = U256::one();
    for _ in 0..decimals {
        factor = factor.checked_mul(U256::from(10u8)).ok_or_else(overflow)?;
    }
    U256::from(amount).checked_mul(factor).ok_or_else(overflow)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale() {
        assert_eq!(scale(5, 0).unwrap(), U256::from(5u64));
        assert_eq!(scale(5, 8).unwrap(), U256::from(500_000_000u64));
        assert!(matches!(
            scale(2, 77),
            Err(ClientError::AmountOverflow { .. })
        ));
        assert!(scale(u64::MAX, 200).is_err());
    }
}
