//! # Operations
//!
//! State mutations a caller can submit. The same vocabulary serves both
//! backends; each adapter rejects the shapes its transaction model lacks.

use super::storage::DataEntry;
use gw_01_oracle_consensus::{BftThreshold, SignatureSet, ValidatorSet};
use shared_types::{
    Address, DataType, ForeignAddress, Hash, OnchainId, PortDirection, ProgramKind, U256,
};

/// A signed state mutation.
#[derive(Clone, Debug)]
pub struct Transaction {
    /// Sending account
    pub sender: Address,
    /// What to do
    pub op: Operation,
}

impl Transaction {
    /// Build a transaction.
    pub fn new(sender: Address, op: Operation) -> Self {
        Self { sender, op }
    }
}

/// One state mutation.
#[derive(Clone, Debug)]
pub enum Operation {
    /// Create a program. Constructor arguments are mandatory on the EVM
    /// backend and forbidden on the account-state backend.
    Install {
        /// Program to create
        kind: ProgramKind,
        /// Constructor arguments
        init: Option<ProgramInit>,
    },
    /// Write the data entries a script-style program reads its
    /// configuration from. Account-state backend only.
    InitializeStorage {
        /// Program account
        target: OnchainId,
        /// Entries to write
        entries: Vec<DataEntry>,
    },
    /// Call a method of an existing program.
    Invoke {
        /// Program
        target: OnchainId,
        /// Method and arguments
        call: Call,
    },
}

impl Operation {
    /// Short name for logs and errors.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Install { .. } => "install",
            Operation::InitializeStorage { .. } => "initialize-storage",
            Operation::Invoke { call, .. } => call.name(),
        }
    }

    /// Program the operation addresses, if it already exists.
    pub fn target(&self) -> Option<OnchainId> {
        match self {
            Operation::Install { .. } => None,
            Operation::InitializeStorage { target, .. } | Operation::Invoke { target, .. } => {
                Some(*target)
            }
        }
    }
}

/// Program methods.
#[derive(Clone, Debug)]
pub enum Call {
    /// Token: grant minting rights. Owner only.
    AddMinter {
        /// New minter
        minter: OnchainId,
    },
    /// Token: mint to `receiver`. Minters only.
    Mint {
        /// Receiver
        receiver: Address,
        /// Amount in base units
        amount: U256,
    },
    /// Relay: register a subscriber, returning its subscription id.
    Subscribe {
        /// Subscriber program
        subscriber: OnchainId,
    },
    /// Relay: phase 1, commit a digest with one slot per oracle.
    SendHashValue {
        /// Digest
        digest: Hash,
        /// Positional slots
        signatures: SignatureSet,
    },
    /// Relay: phase 2, attach the payload of a confirmed pulse and deliver
    /// it to one subscription.
    SendValueToSub {
        /// Raw payload
        payload: Vec<u8>,
        /// Confirmed pulse
        pulse_id: u64,
        /// Target subscription
        subscription: u64,
    },
    /// Port: open a transfer request for the sender's funds.
    CreateTransferRequest {
        /// Amount in base units
        amount: U256,
        /// Receiver on the other chain
        destination: ForeignAddress,
    },
    /// Registry: replace the validator set.
    UpdateConsuls {
        /// New set, same cardinality
        consuls: ValidatorSet,
        /// Strictly increasing round
        round: u64,
        /// Slots signed by the current set
        signatures: SignatureSet,
    },
}

impl Call {
    /// Method name.
    pub fn name(&self) -> &'static str {
        match self {
            Call::AddMinter { .. } => "add-minter",
            Call::Mint { .. } => "mint",
            Call::Subscribe { .. } => "subscribe",
            Call::SendHashValue { .. } => "send-hash-value",
            Call::SendValueToSub { .. } => "send-value-to-sub",
            Call::CreateTransferRequest { .. } => "create-transfer-request",
            Call::UpdateConsuls { .. } => "update-consuls",
        }
    }
}

/// Program configuration, passed as constructor arguments or encoded as
/// data entries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProgramInit {
    /// Validator-set registry.
    Registry {
        /// Validator keys
        consuls: ValidatorSet,
        /// Threshold
        bft: BftThreshold,
        /// Rotation round the registry starts from
        last_round: u64,
    },
    /// Oracle relay bound to a registry.
    Relay {
        /// Registry the relay trusts
        registry: OnchainId,
        /// Value tag
        data_type: DataType,
        /// Oracles signing pulses
        oracles: ValidatorSet,
        /// Threshold
        bft: BftThreshold,
    },
    /// Port bound to one relay and one token.
    Port {
        /// Lock-style or mint-style
        direction: PortDirection,
        /// Relay delivering instructions
        relay: OnchainId,
        /// Asset moved
        token: OnchainId,
    },
    /// Fungible token.
    Token {
        /// Display name
        name: String,
        /// Ticker
        symbol: String,
        /// Decimal places
        decimals: u8,
    },
}

impl ProgramInit {
    /// Kind of program this configures.
    pub fn kind(&self) -> ProgramKind {
        match self {
            ProgramInit::Registry { .. } => ProgramKind::Registry,
            ProgramInit::Relay { .. } => ProgramKind::Relay,
            ProgramInit::Port { .. } => ProgramKind::Port,
            ProgramInit::Token { .. } => ProgramKind::Token,
        }
    }
}
