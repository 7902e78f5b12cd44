//! # Validator Rotation
//!
//! The registry replaces its validator set only when a quorum of the current
//! set signs `keccak256(new_key_0 ‖ … ‖ new_key_{N-1} ‖ round_be8)` and the
//! round strictly increases. Cardinality never changes.

use super::quorum::verify_quorum;
use crate::domain::{BftThreshold, ConsensusError, QuorumOutcome, SignatureSet, ValidatorSet};
use shared_types::{keccak256, Hash};

/// Digest the current set must sign to install `new_set` at `round`.
pub fn consul_rotation_digest(new_set: &ValidatorSet, round: u64) -> Hash {
    let mut message = Vec::with_capacity(new_set.len() * 33 + 8);
    for key in new_set.keys() {
        message.extend_from_slice(key.compressed());
    }
    message.extend_from_slice(&round.to_be_bytes());
    keccak256(&message)
}

/// Check a proposed rotation.
pub fn verify_rotation(
    current: &ValidatorSet,
    threshold: BftThreshold,
    last_round: u64,
    new_set: &ValidatorSet,
    round: u64,
    signatures: &SignatureSet,
) -> Result<(), ConsensusError> {
    if new_set.len() != current.len() {
        return Err(ConsensusError::ValidatorSetSizeChanged {
            expected: current.len(),
            actual: new_set.len(),
        });
    }
    if round <= last_round {
        return Err(ConsensusError::RoundNotIncreasing { round, last_round });
    }
    let digest = consul_rotation_digest(new_set, round);
    match verify_quorum(&digest, signatures, current, threshold)? {
        QuorumOutcome::Confirmed { .. } => Ok(()),
        QuorumOutcome::NoQuorum { valid, required } => {
            Err(ConsensusError::InsufficientRotationSignatures { valid, required })
        }
    }
}
