//! # Pipeline Errors

use super::roles::Role;
use gw_03_chain_adapter::AdapterError;
use shared_types::OnchainId;
use std::path::PathBuf;
use thiserror::Error;

/// Configuration errors. Raised before any chain call.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file unreadable
    #[error("cannot read config {path}: {source}")]
    Io {
        /// File path
        path: PathBuf,
        /// Cause
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid JSON for the schema
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),

    /// Node URL missing
    #[error("node_url is empty")]
    EmptyNodeUrl,

    /// Credential reference missing
    #[error("deployer_key_env is empty")]
    EmptyCredentialRef,

    /// No validators
    #[error("validator list is empty")]
    NoValidators,

    /// No relays
    #[error("topology declares no relays")]
    NoRelays,

    /// No ports
    #[error("topology declares no ports")]
    NoPorts,

    /// Threshold outside `1..=N`
    #[error("{scope}: bft_coefficient {threshold} outside 1..={validators}")]
    InvalidThreshold {
        /// Registry or relay name
        scope: String,
        /// Configured threshold
        threshold: usize,
        /// Validator count
        validators: usize,
    },

    /// A key failed to parse or repeats
    #[error("{scope}: invalid key #{index}: {reason}")]
    InvalidKey {
        /// Registry or relay name
        scope: String,
        /// Position in the list
        index: usize,
        /// Cause
        reason: String,
    },

    /// A port names a relay the topology lacks
    #[error("port '{port}' references unknown relay '{relay}'")]
    UnknownRelay {
        /// Port name
        port: String,
        /// Missing relay
        relay: String,
    },

    /// Two relays or two ports share a name
    #[error("duplicate name '{0}'")]
    DuplicateName(String),

    /// Credential variable unset or unusable
    #[error("credential {var}: {reason}")]
    Credential {
        /// Environment variable
        var: String,
        /// Cause
        reason: String,
    },
}

/// Pipeline failure. Steps that finalized before it stay on chain.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A step's submission or finality failed
    #[error("step '{step}' ({role}) failed: {source}")]
    Step {
        /// Step name
        step: String,
        /// Role the step serves
        role: Role,
        /// Adapter failure
        #[source]
        source: AdapterError,
    },

    /// A step needs an id no earlier step produced
    #[error("step '{step}' needs {dependency}, which is not deployed")]
    MissingDependency {
        /// Step name
        step: String,
        /// Missing role
        dependency: Role,
    },

    /// An install produced no id
    #[error("step '{step}' created no id for {role}")]
    MissingCreatedId {
        /// Step name
        step: String,
        /// Role
        role: Role,
    },

    /// A subscription left no id behind
    #[error("step '{step}': no subscription for {subscriber} on relay {relay}")]
    MissingSubscription {
        /// Step name
        step: String,
        /// Subscriber role
        subscriber: Role,
        /// Relay id
        relay: OnchainId,
    },

    /// A reused id holds a different program kind
    #[error("{role} at {id} is not a {expected}")]
    WrongKind {
        /// Role
        role: Role,
        /// Supplied id
        id: OnchainId,
        /// Kind the role needs
        expected: shared_types::ProgramKind,
    },

    /// Role recorded twice in one run
    #[error("role {0} recorded twice")]
    DuplicateRole(Role),

    /// Adapter failure outside a step
    #[error("{context}: {source}")]
    Adapter {
        /// What was being done
        context: String,
        /// Adapter failure
        #[source]
        source: AdapterError,
    },
}

impl PipelineError {
    /// Step name, when the failure belongs to one.
    pub fn step(&self) -> Option<&str> {
        match self {
            PipelineError::Step { step, .. }
            | PipelineError::MissingDependency { step, .. }
            | PipelineError::MissingCreatedId { step, .. }
            | PipelineError::MissingSubscription { step, .. } => Some(step),
            _ => None,
        }
    }
}

/// Runtime client failure.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transaction failed or state unreadable
    #[error("{action} on {target}: {source}")]
    Adapter {
        /// Client action
        action: &'static str,
        /// Program addressed
        target: OnchainId,
        /// Adapter failure
        #[source]
        source: AdapterError,
    },

    /// State read returned an unexpected shape
    #[error("{action} on {target}: unexpected state {found}")]
    UnexpectedState {
        /// Client action
        action: &'static str,
        /// Program addressed
        target: OnchainId,
        /// Rendered value
        found: String,
    },

    /// Amount does not fit 256 bits after scaling
    #[error("amount {amount} with {decimals} decimals overflows")]
    AmountOverflow {
        /// Whole units
        amount: u64,
        /// Token decimals
        decimals: u64,
    },
}

impl ClientError {
    /// Underlying adapter error.
    pub fn adapter_error(&self) -> Option<&AdapterError> {
        match self {
            ClientError::Adapter { source, .. } => Some(source),
            _ => None,
        }
    }
}
