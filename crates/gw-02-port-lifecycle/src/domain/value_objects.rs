//! # Domain Value Objects

use super::errors::PortError;
use serde::{Deserialize, Serialize};

/// Transfer request state machine.
///
/// ```text
/// Pending ──approve / change-status 2──→ Approved
///         ──change-status 3────────────→ Removed
/// ```
///
/// Both exits are terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestStatus {
    /// Awaiting an oracle instruction.
    Pending,
    /// Processed on the other chain.
    Approved,
    /// Dropped by the oracles.
    Removed,
}

impl RequestStatus {
    /// On-chain status code.
    pub fn code(self) -> u8 {
        match self {
            RequestStatus::Pending => 1,
            RequestStatus::Approved => 2,
            RequestStatus::Removed => 3,
        }
    }

    /// Parse an on-chain status code.
    pub fn from_code(code: u8) -> Result<Self, PortError> {
        match code {
            1 => Ok(RequestStatus::Pending),
            2 => Ok(RequestStatus::Approved),
            3 => Ok(RequestStatus::Removed),
            other => Err(PortError::InvalidStatusCode(other)),
        }
    }

    /// Only `Pending` may move, and only to a different status.
    pub fn can_transition_to(self, next: RequestStatus) -> bool {
        self == RequestStatus::Pending && next != RequestStatus::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(RequestStatus::Pending.code(), 1);
        assert_eq!(RequestStatus::from_code(2).unwrap(), RequestStatus::Approved);
        assert_eq!(
            RequestStatus::from_code(0).unwrap_err(),
            PortError::InvalidStatusCode(0)
        );
    }

    #[test]
    fn test_terminal_states() {
        assert!(RequestStatus::Pending.can_transition_to(RequestStatus::Removed));
        assert!(!RequestStatus::Pending.can_transition_to(RequestStatus::Pending));
        assert!(!RequestStatus::Approved.can_transition_to(RequestStatus::Removed));
        assert!(!RequestStatus::Removed.can_transition_to(RequestStatus::Approved));
    }
}
