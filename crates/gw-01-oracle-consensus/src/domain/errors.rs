//! # Domain Errors
//!
//! Error types for the oracle consensus protocol.
//!
//! Insufficient signatures are deliberately absent: a submission below the
//! threshold is an outcome (`QuorumOutcome::NoQuorum`), not an error.

use shared_types::Hash;
use thiserror::Error;

/// Oracle consensus error types.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConsensusError {
    /// Validator set has no members.
    #[error("Validator set is empty")]
    EmptyValidatorSet,

    /// Same key registered twice.
    #[error("Duplicate validator key at slot {slot}")]
    DuplicateValidator {
        /// Slot of the second occurrence
        slot: usize,
    },

    /// Threshold outside `1..=N`.
    #[error("Invalid BFT threshold {threshold} for {validators} validators")]
    InvalidThreshold {
        /// Requested threshold
        threshold: usize,
        /// Validator count
        validators: usize,
    },

    /// Validator key could not be parsed.
    #[error("Invalid validator key: {0}")]
    InvalidValidatorKey(String),

    /// Submission carries the wrong number of slots.
    #[error("Malformed submission: expected {expected} signature slots, got {actual}")]
    SlotCountMismatch {
        /// Validator count
        expected: usize,
        /// Slots supplied
        actual: usize,
    },

    /// Signature slot bytes could not be decoded.
    #[error("Malformed signature in slot {slot}: {reason}")]
    MalformedSignature {
        /// Offending slot
        slot: usize,
        /// Decoder message
        reason: String,
    },

    /// Signing failed.
    #[error("Signing failed: {0}")]
    SigningFailed(String),

    /// Attach referenced a pulse that was never confirmed.
    #[error("No such pulse: {0}")]
    NoSuchPulse(u64),

    /// Attach payload hashes to a different digest than the pulse.
    #[error(
        "Invalid keccak256(value) for pulse {pulse_id}: expected {}, got {}",
        hex::encode(expected),
        hex::encode(actual)
    )]
    DigestMismatch {
        /// Referenced pulse
        pulse_id: u64,
        /// Digest committed by the pulse
        expected: Hash,
        /// Digest of the supplied payload
        actual: Hash,
    },

    /// Pulse value was already attached.
    #[error("Pulse {0} already consumed")]
    PulseAlreadyConsumed(u64),

    /// Payload is empty.
    #[error("Empty payload")]
    EmptyPayload,

    /// Payload opcode is unknown.
    #[error("Unknown opcode: 0x{0:02x}")]
    UnknownOpcode(u8),

    /// Payload length does not match the opcode layout.
    #[error("Invalid payload length for opcode '{opcode}': expected {expected}, got {actual}")]
    PayloadLength {
        /// Opcode character
        opcode: char,
        /// Required length
        expected: usize,
        /// Supplied length
        actual: usize,
    },

    /// Rotation would change the validator-set cardinality.
    #[error("Validator set size is immutable: expected {expected}, got {actual}")]
    ValidatorSetSizeChanged {
        /// Current N
        expected: usize,
        /// Proposed N
        actual: usize,
    },

    /// Rotation round does not advance.
    #[error("Round {round} must be greater than last round {last_round}")]
    RoundNotIncreasing {
        /// Proposed round
        round: u64,
        /// Last recorded round
        last_round: u64,
    },

    /// Rotation lacked a quorum of the current set.
    #[error("Invalid bft count: {valid}/{required} valid signatures")]
    InsufficientRotationSignatures {
        /// Valid signatures
        valid: usize,
        /// Threshold
        required: usize,
    },
}

/// Why 65 signature bytes do not decode.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum SignatureDecodeError {
    /// `r` or `s` is zero or not below the curve order.
    #[error("r || s is not a valid scalar pair")]
    InvalidScalars,

    /// `v` is none of 0, 1, 27, 28.
    #[error("invalid recovery byte {0}")]
    InvalidRecoveryByte(u8),
}

impl ConsensusError {
    /// Whether the error stems from a malformed submission (terminal rejection).
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            ConsensusError::SlotCountMismatch { .. } | ConsensusError::MalformedSignature { .. }
        )
    }
}
