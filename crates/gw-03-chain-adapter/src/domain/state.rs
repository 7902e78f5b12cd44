//! # State Keys
//!
//! Read-only views of program storage.

use gw_01_oracle_consensus::{DigestState, PulseRecord};
use gw_02_port_lifecycle::TransferRequest;
use shared_types::{Address, DataType, Hash, OnchainId, PortDirection, ProgramKind, U256};
use std::fmt;

/// Key of a program state read.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StateKey {
    /// Installed program kind (any program).
    Kind,
    /// Whether storage is initialized (any program).
    Initialized,
    /// Validator keys (registry) or oracle keys (relay).
    Validators,
    /// Threshold (registry, relay).
    BftCoefficient,
    /// Last rotation round (registry).
    LastRound,
    /// Registry a relay trusts.
    Registry,
    /// Relay data-type tag.
    DataType,
    /// Most recent pulse id, 0 if none (relay).
    LastPulseId,
    /// Pulse by id (relay).
    Pulse(u64),
    /// Consensus state of a digest (relay).
    Digest(Hash),
    /// Value attached to a pulse (relay).
    Value(u64),
    /// Subscription id of a subscriber (relay).
    SubscriptionOf(OnchainId),
    /// Port direction.
    Direction,
    /// Relay a port listens to.
    Relay,
    /// Token a port moves.
    Token,
    /// Pending transfer requests (port).
    PendingRequests,
    /// One transfer request by id (port).
    Request(U256),
    /// Token balance of an account.
    Balance(Address),
    /// Token name.
    Name,
    /// Token ticker.
    Symbol,
    /// Token decimals.
    Decimals,
    /// Token minters.
    Minters,
    /// Token supply.
    TotalSupply,
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateKey::Kind => f.write_str("kind"),
            StateKey::Initialized => f.write_str("initialized"),
            StateKey::Validators => f.write_str("validators"),
            StateKey::BftCoefficient => f.write_str("bft_coefficient"),
            StateKey::LastRound => f.write_str("last_round"),
            StateKey::Registry => f.write_str("registry"),
            StateKey::DataType => f.write_str("type"),
            StateKey::LastPulseId => f.write_str("last_pulse_id"),
            StateKey::Pulse(id) => write!(f, "pulse:{id}"),
            StateKey::Digest(d) => write!(f, "digest:0x{}", hex::encode(d)),
            StateKey::Value(id) => write!(f, "value:{id}"),
            StateKey::SubscriptionOf(id) => write!(f, "subscription:{id}"),
            StateKey::Direction => f.write_str("direction"),
            StateKey::Relay => f.write_str("relay"),
            StateKey::Token => f.write_str("token"),
            StateKey::PendingRequests => f.write_str("pending_requests"),
            StateKey::Request(id) => write!(f, "request:{id}"),
            StateKey::Balance(a) => write!(f, "balance:0x{}", hex::encode(a)),
            StateKey::Name => f.write_str("name"),
            StateKey::Symbol => f.write_str("symbol"),
            StateKey::Decimals => f.write_str("decimals"),
            StateKey::Minters => f.write_str("minters"),
            StateKey::TotalSupply => f.write_str("total_supply"),
        }
    }
}

/// Result of a state read.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StateValue {
    /// Key has no value (unknown pulse, unattached value, ...).
    Absent,
    /// Boolean flag
    Bool(bool),
    /// Small integer
    Int(u64),
    /// Token amount
    Amount(U256),
    /// Raw bytes
    Bytes(Vec<u8>),
    /// Text
    Text(String),
    /// Program kind
    Kind(ProgramKind),
    /// Data-type tag
    DataType(DataType),
    /// Port direction
    Direction(PortDirection),
    /// One on-chain id
    Id(OnchainId),
    /// Several on-chain ids
    Ids(Vec<OnchainId>),
    /// Hex-encoded keys
    Keys(Vec<String>),
    /// A pulse
    Pulse(PulseRecord),
    /// Digest consensus state
    Digest(DigestState),
    /// One transfer request
    Request(TransferRequest),
    /// Several transfer requests
    Requests(Vec<TransferRequest>),
}

impl StateValue {
    /// Integer payload.
    pub fn as_int(&self) -> Option<u64> {
        match self {
            StateValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Amount payload.
    pub fn as_amount(&self) -> Option<U256> {
        match self {
            StateValue::Amount(v) => Some(*v),
            _ => None,
        }
    }

    /// Request list payload.
    pub fn into_requests(self) -> Option<Vec<TransferRequest>> {
        match self {
            StateValue::Requests(v) => Some(v),
            _ => None,
        }
    }
}
