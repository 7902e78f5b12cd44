//! # Port Ledger
//!
//! Request bookkeeping for one port. The ledger never touches balances; it
//! returns the [`AssetEffect`] the hosting program must apply to the token.
//!
//! | Direction | create_request         | accepted instructions            |
//! |-----------|------------------------|----------------------------------|
//! | Lock      | custody origin's funds | unlock, approve, change-status   |
//! | Mint      | burn origin's funds    | mint, approve, change-status     |

use crate::domain::{PortError, RequestStatus, TransferRequest};
use gw_01_oracle_consensus::Instruction;
use shared_types::{Address, ForeignAddress, PortDirection, U256};
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

/// Token movement the hosting program must perform.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AssetEffect {
    /// Move `amount` from `from` into the port's custody.
    Custody {
        /// Depositor
        from: Address,
        /// Amount
        amount: U256,
    },
    /// Destroy `amount` held by `from`.
    Burn {
        /// Holder
        from: Address,
        /// Amount
        amount: U256,
    },
    /// Create `amount` for `to`.
    Mint {
        /// Receiver
        to: Address,
        /// Amount
        amount: U256,
    },
    /// Pay `amount` out of custody to `to`.
    Release {
        /// Receiver
        to: Address,
        /// Amount
        amount: U256,
    },
    /// Bookkeeping only.
    None,
}

/// Transfer requests and processed instruction ids of one port.
#[derive(Clone, Debug)]
pub struct PortLedger {
    direction: PortDirection,
    next_id: U256,
    requests: BTreeMap<U256, TransferRequest>,
    processed: HashSet<U256>,
}

impl PortLedger {
    /// Empty ledger for a port of `direction`.
    pub fn new(direction: PortDirection) -> Self {
        Self {
            direction,
            next_id: U256::one(),
            requests: BTreeMap::new(),
            processed: HashSet::new(),
        }
    }

    /// Port direction.
    pub fn direction(&self) -> PortDirection {
        self.direction
    }

    /// Record a new pending request and report the token movement it needs.
    pub fn create_request(
        &mut self,
        origin: Address,
        destination: ForeignAddress,
        amount: U256,
    ) -> Result<(TransferRequest, AssetEffect), PortError> {
        if amount.is_zero() {
            return Err(PortError::ZeroAmount);
        }
        let id = self.next_id;
        self.next_id = id + U256::one();

        let request = TransferRequest::new(id, origin, destination, amount);
        self.requests.insert(id, request.clone());
        debug!(%id, %amount, direction = %self.direction, "[gw-02] request created");

        let effect = match self.direction {
            PortDirection::Lock => AssetEffect::Custody {
                from: origin,
                amount,
            },
            PortDirection::Mint => AssetEffect::Burn {
                from: origin,
                amount,
            },
        };
        Ok((request, effect))
    }

    /// Apply a consensus-validated instruction.
    ///
    /// The ledger is unchanged when an error is returned.
    pub fn apply(&mut self, instruction: &Instruction) -> Result<AssetEffect, PortError> {
        match (self.direction, instruction) {
            (
                PortDirection::Mint,
                Instruction::Mint {
                    request_id,
                    amount,
                    receiver,
                },
            ) => {
                self.mark_processed(*request_id)?;
                Ok(AssetEffect::Mint {
                    to: *receiver,
                    amount: *amount,
                })
            }
            (
                PortDirection::Lock,
                Instruction::Unlock {
                    request_id,
                    amount,
                    receiver,
                },
            ) => {
                self.mark_processed(*request_id)?;
                Ok(AssetEffect::Release {
                    to: *receiver,
                    amount: *amount,
                })
            }
            (_, Instruction::Approve { request_id }) => {
                self.transition(*request_id, RequestStatus::Approved)?;
                Ok(AssetEffect::None)
            }
            (_, Instruction::ChangeStatus { request_id, status }) => {
                let next = RequestStatus::from_code(*status)?;
                self.transition(*request_id, next)?;
                Ok(AssetEffect::None)
            }
            (direction, other) => Err(PortError::UnsupportedInstruction {
                opcode: other.opcode() as char,
                direction,
            }),
        }
    }

    /// Requests still pending, in id order.
    pub fn pending_requests(&self) -> Vec<TransferRequest> {
        self.requests
            .values()
            .filter(|r| r.is_pending())
            .cloned()
            .collect()
    }

    /// Look up a request regardless of status.
    pub fn request(&self, id: &U256) -> Option<&TransferRequest> {
        self.requests.get(id)
    }

    /// Whether a mint/unlock id has been processed.
    pub fn is_processed(&self, id: &U256) -> bool {
        self.processed.contains(id)
    }

    fn mark_processed(&mut self, id: U256) -> Result<(), PortError> {
        if !self.processed.insert(id) {
            return Err(PortError::AlreadyProcessed(id));
        }
        Ok(())
    }

    fn transition(&mut self, id: U256, next: RequestStatus) -> Result<(), PortError> {
        let request = self
            .requests
            .get_mut(&id)
            .ok_or(PortError::UnknownRequest(id))?;
        request.transition_to(next)?;
        debug!(%id, status = ?next, "[gw-02] request left pending");
        Ok(())
    }
}
