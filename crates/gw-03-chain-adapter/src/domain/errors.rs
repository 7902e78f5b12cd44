//! # Domain Errors
//!
//! `ProgramError` is what an on-chain program reverts with; `AdapterError` is
//! what a caller of the adapter sees.

use gw_01_oracle_consensus::ConsensusError;
use gw_02_port_lifecycle::PortError;
use shared_types::{BackendKind, DataType, OnchainId, ProgramKind, TxId, U256};
use thiserror::Error;

/// Revert reasons of the hosted programs.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProgramError {
    /// Consensus rule violated (bad digest, unknown pulse, ...).
    #[error(transparent)]
    Consensus(#[from] ConsensusError),

    /// Transfer-request rule violated.
    #[error(transparent)]
    Port(#[from] PortError),

    /// Fewer than `required` slots verified; nothing was recorded.
    #[error("Invalid bft count: {valid}/{required} valid signatures")]
    QuorumNotReached {
        /// Valid slots
        valid: usize,
        /// Threshold
        required: usize,
    },

    /// Target id holds no program.
    #[error("No program at {0}")]
    NoSuchProgram(OnchainId),

    /// Target holds a different kind of program.
    #[error("Program at {id} is a {actual}, expected {expected}")]
    WrongProgram {
        /// Target
        id: OnchainId,
        /// Kind the call needs
        expected: ProgramKind,
        /// Kind installed
        actual: ProgramKind,
    },

    /// Script installed but its storage was never initialized.
    #[error("Program at {0} is not initialized")]
    NotInitialized(OnchainId),

    /// Storage initialization attempted twice.
    #[error("Program at {0} is already initialized")]
    AlreadyInitialized(OnchainId),

    /// A data entry is missing or has the wrong type.
    #[error("Invalid storage entry '{key}': {reason}")]
    InvalidStorage {
        /// Entry key
        key: String,
        /// What was wrong
        reason: String,
    },

    /// Caller lacks minting rights on the token.
    #[error("{account} is not a minter of token {token}")]
    NotMinter {
        /// Token
        token: OnchainId,
        /// Caller
        account: OnchainId,
    },

    /// Only the installer of a program may configure it.
    #[error("{caller} is not the owner of {id}")]
    NotOwner {
        /// Target
        id: OnchainId,
        /// Caller
        caller: OnchainId,
    },

    /// Balance too small for a burn, custody or release.
    #[error("Insufficient balance of {account} in token {token}: need {needed}, have {available}")]
    InsufficientBalance {
        /// Token
        token: OnchainId,
        /// Account
        account: OnchainId,
        /// Requested amount
        needed: U256,
        /// Current balance
        available: U256,
    },

    /// Attach referenced an unknown subscription.
    #[error("No such subscription: {0}")]
    NoSuchSubscription(u64),

    /// Payload does not match the relay's data-type tag.
    #[error("Value does not match relay data type {data_type:?}: {reason}")]
    DataTypeMismatch {
        /// Relay tag
        data_type: DataType,
        /// What was wrong
        reason: String,
    },

    /// Ports can only subscribe to relays carrying raw bytes.
    #[error("Port {port} cannot subscribe to {data_type:?} relay {relay}")]
    PortRequiresBytesRelay {
        /// Relay
        relay: OnchainId,
        /// Subscriber port
        port: OnchainId,
        /// Relay tag
        data_type: DataType,
    },

    /// A port only takes subscriptions and values from the relay it was
    /// installed with.
    #[error("Port {port} is bound to relay {bound}, not {relay}")]
    ForeignRelay {
        /// Port
        port: OnchainId,
        /// Relay that tried to drive the port
        relay: OnchainId,
        /// Relay the port was installed with
        bound: OnchainId,
    },

    /// Amount arithmetic overflowed.
    #[error("Amount overflow")]
    Overflow,
}

/// Chain adapter error types.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AdapterError {
    /// Endpoint could not be reached or is not supported.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Operation shape not valid for this backend.
    #[error("Operation {operation} not supported by {backend} backend")]
    UnsupportedOperation {
        /// Backend
        backend: BackendKind,
        /// Operation name
        operation: &'static str,
    },

    /// Transaction was finalized as failed.
    #[error("Transaction 0x{} rejected by {target}: {reason}", hex::encode(.tx))]
    Rejected {
        /// Transaction id
        tx: TxId,
        /// Program (or created id) the transaction addressed
        target: OnchainId,
        /// Revert reason
        reason: ProgramError,
    },

    /// Handle does not belong to this adapter.
    #[error("Unknown transaction 0x{}", hex::encode(.0))]
    UnknownTransaction(TxId),

    /// Finality not reached within the adapter's timeout.
    #[error("Transaction 0x{} not final after {waited_ms} ms", hex::encode(.tx))]
    Timeout {
        /// Transaction id
        tx: TxId,
        /// Time waited
        waited_ms: u64,
    },

    /// State read against an empty id.
    #[error("No program at {0}")]
    NoSuchProgram(OnchainId),

    /// Key not defined for this program kind.
    #[error("Key '{key}' not readable on {kind} {id}")]
    UnsupportedKey {
        /// Program
        id: OnchainId,
        /// Program kind
        kind: ProgramKind,
        /// Key as text
        key: String,
    },
}

impl AdapterError {
    /// Revert reason, if the transaction was finalized as failed.
    pub fn program_error(&self) -> Option<&ProgramError> {
        match self {
            AdapterError::Rejected { reason, .. } => Some(reason),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quorum_message_matches_revert_text() {
        let err = ProgramError::QuorumNotReached {
            valid: 2,
            required: 3,
        };
        assert!(err.to_string().starts_with("Invalid bft count"));
    }

    #[test]
    fn test_rejected_carries_reason() {
        let err = AdapterError::Rejected {
            tx: [0xAB; 32],
            target: OnchainId::new([1; 20]),
            reason: ProgramError::NoSuchSubscription(4),
        };
        assert_eq!(
            err.program_error(),
            Some(&ProgramError::NoSuchSubscription(4))
        );
        assert!(err.to_string().contains("abab"));
    }
}
