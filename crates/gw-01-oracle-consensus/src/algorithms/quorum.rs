//! # Quorum Counting
//!
//! Slot `i` counts iff it verifies against validator `i`. A valid signature
//! placed in another validator's slot counts for nothing.

use super::ecdsa::verify_slot;
use crate::domain::{BftThreshold, ConsensusError, QuorumOutcome, SignatureSet, ValidatorSet};
use shared_types::Hash;

/// Count slots that verify against their positional key.
pub fn count_valid_slots(
    digest: &Hash,
    signatures: &SignatureSet,
    validators: &ValidatorSet,
) -> Result<usize, ConsensusError> {
    signatures.check_shape(validators)?;
    Ok(signatures
        .slots()
        .iter()
        .zip(validators.keys())
        .filter(|(slot, key)| verify_slot(digest, slot, key))
        .count())
}

/// Evaluate a submission against the threshold.
///
/// A wrong slot count is an error (malformed submission); too few valid
/// slots is the non-terminal `NoQuorum` outcome.
pub fn verify_quorum(
    digest: &Hash,
    signatures: &SignatureSet,
    validators: &ValidatorSet,
    threshold: BftThreshold,
) -> Result<QuorumOutcome, ConsensusError> {
    let valid = count_valid_slots(digest, signatures, validators)?;
    if valid >= threshold.get() {
        Ok(QuorumOutcome::Confirmed { valid })
    } else {
        Ok(QuorumOutcome::NoQuorum {
            valid,
            required: threshold.get(),
        })
    }
}
