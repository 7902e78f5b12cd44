//! # Domain Errors
//!
//! Error types for the port transfer lifecycle.

use shared_types::{PortDirection, U256};
use thiserror::Error;

/// Port error types.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PortError {
    /// No request with this id exists.
    #[error("Unknown request: {0}")]
    UnknownRequest(U256),

    /// Request already left Pending.
    #[error("Request {id} is not pending (status code {status})")]
    NotPending {
        /// Request id
        id: U256,
        /// Current status code
        status: u8,
    },

    /// A pending request can only move to a settled status.
    #[error("Request {0} is already pending; target status must be settled")]
    AlreadyPending(U256),

    /// Status code outside the known set.
    #[error("Invalid status code: {0}")]
    InvalidStatusCode(u8),

    /// Instruction does not apply to this port direction.
    #[error("Instruction '{opcode}' not supported by {direction} port")]
    UnsupportedInstruction {
        /// Opcode character
        opcode: char,
        /// Port direction
        direction: PortDirection,
    },

    /// Mint or unlock for a request id that was already processed.
    #[error("Request {0} already processed")]
    AlreadyProcessed(U256),

    /// Transfer amount must be positive.
    #[error("Transfer amount must be greater than zero")]
    ZeroAmount,
}
