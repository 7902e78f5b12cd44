//! # Pulses
//!
//! A pulse is the relay's record of a digest that reached quorum.

use shared_types::Hash;

/// Result of counting valid slots against the threshold.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuorumOutcome {
    /// At least `T` slots verified.
    Confirmed {
        /// Number of verifying slots
        valid: usize,
    },
    /// Fewer than `T` slots verified. Not terminal; may be resubmitted.
    NoQuorum {
        /// Number of verifying slots
        valid: usize,
        /// Threshold
        required: usize,
    },
}

impl QuorumOutcome {
    /// Whether quorum was reached.
    pub fn is_confirmed(&self) -> bool {
        matches!(self, QuorumOutcome::Confirmed { .. })
    }

    /// Number of verifying slots.
    pub fn valid(&self) -> usize {
        match self {
            QuorumOutcome::Confirmed { valid } | QuorumOutcome::NoQuorum { valid, .. } => *valid,
        }
    }
}

/// Per-digest consensus state as seen by the relay.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DigestState {
    /// No submission for this digest has reached quorum yet.
    NoQuorum,
    /// Digest committed as pulse `pulse_id`.
    Confirmed {
        /// Pulse sequence number
        pulse_id: u64,
    },
}

/// A confirmed digest.
///
/// Records are immutable once created; the only later transition is the
/// one-shot consumption by an attach step, tracked by the ledger.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PulseRecord {
    /// Monotonically increasing sequence number, starting at 1
    pub id: u64,
    /// Committed digest
    pub digest: Hash,
    /// Number of valid slots in the confirming submission
    pub signers: usize,
}
