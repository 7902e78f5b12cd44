//! Lock-style and mint-style ports.

use crate::domain::{StateKey, StateValue};
use gw_02_port_lifecycle::PortLedger;
use shared_types::{OnchainId, PortDirection};

/// Port storage.
#[derive(Clone, Debug)]
pub struct PortProgram {
    relay: OnchainId,
    token: OnchainId,
    ledger: PortLedger,
}

impl PortProgram {
    /// Fresh port.
    pub fn new(direction: PortDirection, relay: OnchainId, token: OnchainId) -> Self {
        Self {
            relay,
            token,
            ledger: PortLedger::new(direction),
        }
    }

    /// Relay whose pulses drive this port.
    pub fn relay(&self) -> OnchainId {
        self.relay
    }

    /// Token moved by this port.
    pub fn token(&self) -> OnchainId {
        self.token
    }

    /// Request ledger.
    pub fn ledger(&self) -> &PortLedger {
        &self.ledger
    }

    /// Mutable request ledger.
    pub fn ledger_mut(&mut self) -> &mut PortLedger {
        &mut self.ledger
    }

    pub(crate) fn read(&self, key: &StateKey) -> Option<StateValue> {
        Some(match key {
            StateKey::Direction => StateValue::Direction(self.ledger.direction()),
            StateKey::Relay => StateValue::Id(self.relay),
            StateKey::Token => StateValue::Id(self.token),
            StateKey::PendingRequests => StateValue::Requests(self.ledger.pending_requests()),
            StateKey::Request(id) => self
                .ledger
                .request(id)
                .cloned()
                .map_or(StateValue::Absent, StateValue::Request),
            _ => return None,
        })
    }
}
