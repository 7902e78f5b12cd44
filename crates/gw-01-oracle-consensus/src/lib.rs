//! # GW-01 Oracle Consensus
//!
//! Threshold multi-signature validation over a fixed validator set.
//!
//! **Subsystem ID:** 01
//! **Architecture:** Hexagonal (DDD), pure domain logic, no I/O
//!
//! ## Protocol
//!
//! Phase 1 commits a 32-byte digest once at least `T` of the `N` positional
//! signature slots verify. Phase 2 commits a payload only if its keccak256
//! equals the digest of a previously confirmed pulse.
//!
//! ```text
//!   submit_hash(digest, slots[N]) ──≥T valid──→ PulseRecord{id, digest}
//!                                 ──<T valid──→ NotConfirmed (resubmit later)
//!                                 ──malformed─→ Rejected
//!
//!   attach_value(pulse_id, payload) ──keccak(payload) == digest──→ consumed
//! ```
//!
//! ## Module Structure
//!
//! ```text
//! gw-01-oracle-consensus/
//! ├── domain/          # ValidatorSet, signatures, pulses, instructions, errors
//! ├── algorithms/      # ECDSA recovery, quorum counting, signer, rotation
//! └── ledger           # PulseLedger (relay runtime state)
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algorithms;
pub mod domain;
pub mod ledger;

// Re-exports
pub use algorithms::{
    consul_rotation_digest, count_valid_slots, recover_signer, verify_quorum, verify_rotation,
    verify_slot, OracleSigner,
};
pub use domain::{
    BftThreshold, ConsensusError, DigestState, Instruction, PulseRecord, QuorumOutcome,
    RecoverableSignature, SignatureDecodeError, SignatureSet, SignatureSlot, ValidatorKey,
    ValidatorSet,
};
pub use ledger::{PulseLedger, SubmissionOutcome};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
