//! # Handles, Receipts, Events

use gw_02_port_lifecycle::{RequestStatus, TransferRequest};
use shared_types::{Address, Hash, OnchainId, ProgramKind, TxId, U256};

/// Reference to a submitted, not yet final, transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingHandle {
    /// Transaction id
    pub tx_id: TxId,
    /// Sender account
    pub sender: Address,
    /// Sender nonce the transaction consumed
    pub nonce: u64,
}

/// Outcome of a successful, finalized transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Receipt {
    /// Transaction id
    pub tx_id: TxId,
    /// Inclusion height
    pub height: u64,
    /// Id of a program created by the transaction, when the backend reports it
    pub created: Option<OnchainId>,
    /// Structured events; always empty on the account-state backend
    pub events: Vec<Event>,
}

impl Receipt {
    /// Subscription id from a `Subscribed` event.
    pub fn subscription_id(&self) -> Option<u64> {
        self.events.iter().find_map(|e| match e {
            Event::Subscribed { subscription, .. } => Some(*subscription),
            _ => None,
        })
    }

    /// Pulse id from a `PulseConfirmed` event.
    pub fn pulse_id(&self) -> Option<u64> {
        self.events.iter().find_map(|e| match e {
            Event::PulseConfirmed { pulse_id, .. } => Some(*pulse_id),
            _ => None,
        })
    }

    /// Request from a `RequestCreated` event.
    pub fn created_request(&self) -> Option<&TransferRequest> {
        self.events.iter().find_map(|e| match e {
            Event::RequestCreated { request, .. } => Some(request),
            _ => None,
        })
    }
}

/// Program event log entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// A program was installed.
    ProgramCreated {
        /// New program
        id: OnchainId,
        /// Its kind
        kind: ProgramKind,
    },
    /// Minting rights granted.
    MinterAdded {
        /// Token
        token: OnchainId,
        /// New minter
        minter: OnchainId,
    },
    /// Tokens created.
    Minted {
        /// Token
        token: OnchainId,
        /// Receiver
        to: Address,
        /// Amount
        amount: U256,
    },
    /// Tokens moved or destroyed (`to == None`).
    Transferred {
        /// Token
        token: OnchainId,
        /// Sender
        from: Address,
        /// Receiver, `None` for a burn
        to: Option<Address>,
        /// Amount
        amount: U256,
    },
    /// Subscriber registered on a relay.
    Subscribed {
        /// Relay
        relay: OnchainId,
        /// Subscriber
        subscriber: OnchainId,
        /// Assigned id
        subscription: u64,
    },
    /// Digest reached quorum.
    PulseConfirmed {
        /// Relay
        relay: OnchainId,
        /// Pulse id
        pulse_id: u64,
        /// Committed digest
        digest: Hash,
    },
    /// Payload attached and delivered.
    ValueAttached {
        /// Relay
        relay: OnchainId,
        /// Consumed pulse
        pulse_id: u64,
        /// Receiving subscription
        subscription: u64,
    },
    /// Transfer request opened.
    RequestCreated {
        /// Port
        port: OnchainId,
        /// The new request
        request: TransferRequest,
    },
    /// Transfer request left Pending.
    RequestStatusChanged {
        /// Port
        port: OnchainId,
        /// Request id
        id: U256,
        /// New status
        status: RequestStatus,
    },
    /// Validator set replaced.
    ConsulsUpdated {
        /// Registry
        registry: OnchainId,
        /// New round
        round: u64,
    },
}
