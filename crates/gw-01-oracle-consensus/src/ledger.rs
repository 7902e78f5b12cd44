//! # Pulse Ledger
//!
//! Runtime state of one relay: the validator set, the threshold, confirmed
//! pulses and which of them have had their value attached.
//!
//! ## Invariants
//!
//! - Pulse ids start at 1 and increase by one per newly confirmed digest.
//! - A digest is confirmed at most once; resubmitting it never creates a
//!   second pulse.
//! - Each pulse is consumed at most once, and only by a payload whose
//!   keccak256 equals the pulse digest.

use crate::algorithms::verify_quorum;
use crate::domain::{
    BftThreshold, ConsensusError, DigestState, PulseRecord, QuorumOutcome, SignatureSet,
    ValidatorSet,
};
use shared_types::{keccak256, Hash};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::debug;

/// Result of `submit_hash`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// Digest is (now) committed.
    Confirmed {
        /// The pulse holding the digest
        pulse: PulseRecord,
        /// False when the digest had already been confirmed earlier
        newly_created: bool,
    },
    /// Quorum not reached; state unchanged.
    NotConfirmed {
        /// Valid slots
        valid: usize,
        /// Threshold
        required: usize,
    },
}

/// Relay-side consensus state.
#[derive(Clone, Debug)]
pub struct PulseLedger {
    validators: ValidatorSet,
    threshold: BftThreshold,
    pulses: BTreeMap<u64, PulseRecord>,
    by_digest: HashMap<Hash, u64>,
    consumed: HashSet<u64>,
    last_pulse_id: u64,
}

impl PulseLedger {
    /// Create an empty ledger.
    pub fn new(validators: ValidatorSet, threshold: BftThreshold) -> Self {
        Self {
            validators,
            threshold,
            pulses: BTreeMap::new(),
            by_digest: HashMap::new(),
            consumed: HashSet::new(),
            last_pulse_id: 0,
        }
    }

    /// Validator set in force.
    pub fn validators(&self) -> &ValidatorSet {
        &self.validators
    }

    /// Threshold in force.
    pub fn threshold(&self) -> BftThreshold {
        self.threshold
    }

    /// Id of the most recent pulse, 0 if none.
    pub fn last_pulse_id(&self) -> u64 {
        self.last_pulse_id
    }

    /// Phase 1: submit a digest with one slot per validator.
    pub fn submit_hash(
        &mut self,
        digest: Hash,
        signatures: &SignatureSet,
    ) -> Result<SubmissionOutcome, ConsensusError> {
        let outcome = verify_quorum(&digest, signatures, &self.validators, self.threshold)?;
        let valid = match outcome {
            QuorumOutcome::NoQuorum { valid, required } => {
                debug!(valid, required, "[gw-01] submission below threshold");
                return Ok(SubmissionOutcome::NotConfirmed { valid, required });
            }
            QuorumOutcome::Confirmed { valid } => valid,
        };

        if let Some(existing) = self.by_digest.get(&digest).and_then(|id| self.pulses.get(id)) {
            return Ok(SubmissionOutcome::Confirmed {
                pulse: existing.clone(),
                newly_created: false,
            });
        }

        self.last_pulse_id += 1;
        let pulse = PulseRecord {
            id: self.last_pulse_id,
            digest,
            signers: valid,
        };
        self.pulses.insert(pulse.id, pulse.clone());
        self.by_digest.insert(digest, pulse.id);
        debug!(pulse_id = pulse.id, valid, "[gw-01] pulse confirmed");
        Ok(SubmissionOutcome::Confirmed {
            pulse,
            newly_created: true,
        })
    }

    /// Consensus state of a digest.
    pub fn digest_state(&self, digest: &Hash) -> DigestState {
        match self.by_digest.get(digest) {
            Some(pulse_id) => DigestState::Confirmed {
                pulse_id: *pulse_id,
            },
            None => DigestState::NoQuorum,
        }
    }

    /// Look up a pulse.
    pub fn pulse(&self, pulse_id: u64) -> Option<&PulseRecord> {
        self.pulses.get(&pulse_id)
    }

    /// Whether a pulse's value has been attached.
    pub fn is_consumed(&self, pulse_id: u64) -> bool {
        self.consumed.contains(&pulse_id)
    }

    /// Phase 2 precheck: the payload may be attached to `pulse_id`.
    ///
    /// Read-only so that callers can run side effects before committing
    /// with [`mark_consumed`](Self::mark_consumed).
    pub fn check_attach(&self, pulse_id: u64, payload: &[u8]) -> Result<(), ConsensusError> {
        let pulse = self
            .pulses
            .get(&pulse_id)
            .ok_or(ConsensusError::NoSuchPulse(pulse_id))?;
        let actual = keccak256(payload);
        if actual != pulse.digest {
            return Err(ConsensusError::DigestMismatch {
                pulse_id,
                expected: pulse.digest,
                actual,
            });
        }
        if self.consumed.contains(&pulse_id) {
            return Err(ConsensusError::PulseAlreadyConsumed(pulse_id));
        }
        Ok(())
    }

    /// Commit consumption of a checked pulse.
    pub fn mark_consumed(&mut self, pulse_id: u64) -> Result<(), ConsensusError> {
        if !self.pulses.contains_key(&pulse_id) {
            return Err(ConsensusError::NoSuchPulse(pulse_id));
        }
        if !self.consumed.insert(pulse_id) {
            return Err(ConsensusError::PulseAlreadyConsumed(pulse_id));
        }
        Ok(())
    }

    /// Check and consume in one call.
    pub fn attach(&mut self, pulse_id: u64, payload: &[u8]) -> Result<(), ConsensusError> {
        self.check_attach(pulse_id, payload)?;
        self.mark_consumed(pulse_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::OracleSigner;
    use crate::domain::ValidatorKey;
    use proptest::prelude::*;

    fn setup(n: usize, t: usize) -> (Vec<OracleSigner>, PulseLedger) {
        let signers: Vec<_> = (0..n).map(|_| OracleSigner::random()).collect();
        let keys: Vec<ValidatorKey> = signers.iter().map(OracleSigner::validator_key).collect();
        let set = ValidatorSet::new(keys).unwrap();
        let threshold = set.threshold(t).unwrap();
        (signers, PulseLedger::new(set, threshold))
    }

    fn signed_by(signers: &[OracleSigner], slots: &[usize], digest: &Hash) -> SignatureSet {
        let mut set = SignatureSet::empty(signers.len());
        for &i in slots {
            set.set(i, &signers[i].sign(digest).unwrap());
        }
        set
    }

    #[test]
    fn test_confirm_then_attach() {
        let (signers, mut ledger) = setup(5, 3);
        let payload = b"hello".to_vec();
        let digest = keccak256(&payload);

        let outcome = ledger
            .submit_hash(digest, &signed_by(&signers, &[0, 1, 2], &digest))
            .unwrap();
        let pulse = match outcome {
            SubmissionOutcome::Confirmed {
                pulse,
                newly_created: true,
            } => pulse,
            other => panic!("unexpected {other:?}"),
        };
        assert_eq!(pulse.id, 1);
        assert_eq!(ledger.digest_state(&digest), DigestState::Confirmed { pulse_id: 1 });

        ledger.attach(pulse.id, &payload).unwrap();
        assert!(ledger.is_consumed(1));
        assert_eq!(
            ledger.attach(pulse.id, &payload).unwrap_err(),
            ConsensusError::PulseAlreadyConsumed(1)
        );
    }

    #[test]
    fn test_below_threshold_leaves_state() {
        let (signers, mut ledger) = setup(5, 3);
        let digest = keccak256(b"x");
        let outcome = ledger
            .submit_hash(digest, &signed_by(&signers, &[3, 4], &digest))
            .unwrap();
        assert_eq!(
            outcome,
            SubmissionOutcome::NotConfirmed {
                valid: 2,
                required: 3
            }
        );
        assert_eq!(ledger.last_pulse_id(), 0);
        assert_eq!(ledger.digest_state(&digest), DigestState::NoQuorum);
    }

    #[test]
    fn test_resubmission_does_not_create_pulse() {
        let (signers, mut ledger) = setup(5, 3);
        let digest = keccak256(b"again");
        ledger
            .submit_hash(digest, &signed_by(&signers, &[0, 1, 2], &digest))
            .unwrap();
        let again = ledger
            .submit_hash(digest, &signed_by(&signers, &[2, 3, 4], &digest))
            .unwrap();
        assert!(matches!(
            again,
            SubmissionOutcome::Confirmed {
                newly_created: false,
                ..
            }
        ));
        assert_eq!(ledger.last_pulse_id(), 1);

        let short = ledger
            .submit_hash(digest, &signed_by(&signers, &[0, 4], &digest))
            .unwrap();
        assert_eq!(
            short,
            SubmissionOutcome::NotConfirmed {
                valid: 2,
                required: 3
            }
        );
        assert_eq!(ledger.last_pulse_id(), 1);
        assert_eq!(ledger.digest_state(&digest), DigestState::Confirmed { pulse_id: 1 });
        ledger.attach(1, b"again").unwrap();
    }

    #[test]
    fn test_attach_errors_are_distinct() {
        let (signers, mut ledger) = setup(3, 2);
        let digest = keccak256(b"real");
        ledger
            .submit_hash(digest, &signed_by(&signers, &[0, 1], &digest))
            .unwrap();

        assert_eq!(
            ledger.check_attach(7, b"real").unwrap_err(),
            ConsensusError::NoSuchPulse(7)
        );
        assert!(matches!(
            ledger.check_attach(1, b"fake").unwrap_err(),
            ConsensusError::DigestMismatch { pulse_id: 1, .. }
        ));
    }

    #[test]
    fn test_malformed_submission_rejected() {
        let (_, mut ledger) = setup(3, 2);
        let err = ledger
            .submit_hash([1u8; 32], &SignatureSet::empty(4))
            .unwrap_err();
        assert!(err.is_malformed());
        assert_eq!(ledger.last_pulse_id(), 0);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_never_confirmed_pulse_rejects_any_payload(
            pulse_id in 1u64..1000,
            payload in proptest::collection::vec(any::<u8>(), 0..128),
        ) {
            let (_, ledger) = setup(3, 2);
            prop_assert_eq!(
                ledger.check_attach(pulse_id, &payload).unwrap_err(),
                ConsensusError::NoSuchPulse(pulse_id)
            );
        }
    }
}
