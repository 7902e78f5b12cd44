//! # Domain Entities

use super::errors::PortError;
use super::value_objects::RequestStatus;
use serde::{Deserialize, Serialize};
use shared_types::{Address, ForeignAddress, U256};

/// A user's request to move value to the other chain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRequest {
    /// Port-local id
    pub id: U256,
    /// Account that created the request
    pub origin: Address,
    /// Receiver on the other chain
    pub destination: ForeignAddress,
    /// Amount in token base units
    pub amount: U256,
    /// Current status
    pub status: RequestStatus,
}

impl TransferRequest {
    /// New pending request.
    pub fn new(id: U256, origin: Address, destination: ForeignAddress, amount: U256) -> Self {
        Self {
            id,
            origin,
            destination,
            amount,
            status: RequestStatus::Pending,
        }
    }

    /// Whether the request is still in the pending queue.
    pub fn is_pending(&self) -> bool {
        self.status == RequestStatus::Pending
    }

    /// Move out of Pending.
    pub fn transition_to(&mut self, next: RequestStatus) -> Result<(), PortError> {
        if self.is_pending() && next == RequestStatus::Pending {
            return Err(PortError::AlreadyPending(self.id));
        }
        if !self.status.can_transition_to(next) {
            return Err(PortError::NotPending {
                id: self.id,
                status: self.status.code(),
            });
        }
        self.status = next;
        Ok(())
    }
}
