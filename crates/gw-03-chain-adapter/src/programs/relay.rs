//! Oracle relay: pulses, subscriptions, attached values.

use crate::domain::{ProgramError, StateKey, StateValue};
use gw_01_oracle_consensus::{
    BftThreshold, PulseLedger, PulseRecord, SignatureSet, SubmissionOutcome, ValidatorSet,
};
use shared_types::{DataType, Hash, OnchainId};
use std::collections::{BTreeMap, HashMap};

/// Relay storage.
#[derive(Clone, Debug)]
pub struct RelayProgram {
    registry: OnchainId,
    data_type: DataType,
    ledger: PulseLedger,
    subscriptions: BTreeMap<u64, OnchainId>,
    values: HashMap<u64, Vec<u8>>,
}

impl RelayProgram {
    /// Fresh relay with no pulses.
    pub fn new(
        registry: OnchainId,
        data_type: DataType,
        oracles: ValidatorSet,
        bft: BftThreshold,
    ) -> Self {
        Self {
            registry,
            data_type,
            ledger: PulseLedger::new(oracles, bft),
            subscriptions: BTreeMap::new(),
            values: HashMap::new(),
        }
    }

    /// Value tag.
    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    /// Subscribe; an existing subscriber keeps its id. Returns the id and
    /// whether it was newly assigned.
    pub fn subscribe(&mut self, subscriber: OnchainId) -> (u64, bool) {
        if let Some(id) = self.subscription_of(&subscriber) {
            return (id, false);
        }
        let id = self.subscriptions.keys().next_back().map_or(1, |last| last + 1);
        self.subscriptions.insert(id, subscriber);
        (id, true)
    }

    fn subscription_of(&self, subscriber: &OnchainId) -> Option<u64> {
        self.subscriptions
            .iter()
            .find(|(_, s)| *s == subscriber)
            .map(|(id, _)| *id)
    }

    /// Phase 1. Below threshold reverts with `QuorumNotReached`.
    pub fn send_hash_value(
        &mut self,
        digest: Hash,
        signatures: &SignatureSet,
    ) -> Result<(PulseRecord, bool), ProgramError> {
        match self.ledger.submit_hash(digest, signatures)? {
            SubmissionOutcome::Confirmed {
                pulse,
                newly_created,
            } => Ok((pulse, newly_created)),
            SubmissionOutcome::NotConfirmed { valid, required } => {
                Err(ProgramError::QuorumNotReached { valid, required })
            }
        }
    }

    /// Phase 2 precheck. Returns the subscriber to deliver to.
    pub fn check_value(
        &self,
        payload: &[u8],
        pulse_id: u64,
        subscription: u64,
    ) -> Result<OnchainId, ProgramError> {
        self.ledger.check_attach(pulse_id, payload)?;
        self.check_data_type(payload)?;
        self.subscriptions
            .get(&subscription)
            .copied()
            .ok_or(ProgramError::NoSuchSubscription(subscription))
    }

    /// Phase 2 commit after delivery succeeded.
    pub fn commit_value(&mut self, payload: Vec<u8>, pulse_id: u64) -> Result<(), ProgramError> {
        self.ledger.mark_consumed(pulse_id)?;
        self.values.insert(pulse_id, payload);
        Ok(())
    }

    fn check_data_type(&self, payload: &[u8]) -> Result<(), ProgramError> {
        match self.data_type {
            DataType::Int if payload.len() != 8 => Err(ProgramError::DataTypeMismatch {
                data_type: DataType::Int,
                reason: format!("expected 8 bytes, got {}", payload.len()),
            }),
            DataType::String => std::str::from_utf8(payload).map(|_| ()).map_err(|e| {
                ProgramError::DataTypeMismatch {
                    data_type: DataType::String,
                    reason: e.to_string(),
                }
            }),
            _ => Ok(()),
        }
    }

    pub(crate) fn read(&self, key: &StateKey) -> Option<StateValue> {
        Some(match key {
            StateKey::Validators => StateValue::Keys(self.ledger.validators().to_hex()),
            StateKey::BftCoefficient => StateValue::Int(self.ledger.threshold().get() as u64),
            StateKey::Registry => StateValue::Id(self.registry),
            StateKey::DataType => StateValue::DataType(self.data_type),
            StateKey::LastPulseId => StateValue::Int(self.ledger.last_pulse_id()),
            StateKey::Pulse(id) => self
                .ledger
                .pulse(*id)
                .cloned()
                .map_or(StateValue::Absent, StateValue::Pulse),
            StateKey::Digest(digest) => StateValue::Digest(self.ledger.digest_state(digest)),
            StateKey::Value(id) => self
                .values
                .get(id)
                .cloned()
                .map_or(StateValue::Absent, StateValue::Bytes),
            StateKey::SubscriptionOf(subscriber) => self
                .subscription_of(subscriber)
                .map_or(StateValue::Absent, StateValue::Int),
            _ => return None,
        })
    }
}
