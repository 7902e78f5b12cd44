//! Validator-set registry.

use crate::domain::{ProgramError, StateKey, StateValue};
use gw_01_oracle_consensus::{verify_rotation, BftThreshold, SignatureSet, ValidatorSet};

/// Registry storage.
#[derive(Clone, Debug)]
pub struct RegistryProgram {
    consuls: ValidatorSet,
    bft: BftThreshold,
    last_round: u64,
}

impl RegistryProgram {
    /// Registry whose next rotation must exceed `last_round`.
    pub fn new(consuls: ValidatorSet, bft: BftThreshold, last_round: u64) -> Self {
        Self {
            consuls,
            bft,
            last_round,
        }
    }

    /// Current validator set.
    pub fn consuls(&self) -> &ValidatorSet {
        &self.consuls
    }

    /// Replace the set under a quorum of the current one.
    pub fn update_consuls(
        &mut self,
        consuls: ValidatorSet,
        round: u64,
        signatures: &SignatureSet,
    ) -> Result<(), ProgramError> {
        verify_rotation(
            &self.consuls,
            self.bft,
            self.last_round,
            &consuls,
            round,
            signatures,
        )?;
        self.consuls = consuls;
        self.last_round = round;
        Ok(())
    }

    pub(crate) fn read(&self, key: &StateKey) -> Option<StateValue> {
        Some(match key {
            StateKey::Validators => StateValue::Keys(self.consuls.to_hex()),
            StateKey::BftCoefficient => StateValue::Int(self.bft.get() as u64),
            StateKey::LastRound => StateValue::Int(self.last_round),
            _ => return None,
        })
    }
}
