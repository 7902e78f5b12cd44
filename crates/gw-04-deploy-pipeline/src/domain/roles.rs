//! # Roles and the Deployed Address Set
//!
//! Every program a run touches has a role. The address set maps roles to
//! on-chain ids and is append-only: recording a role twice is an error.

use super::errors::PipelineError;
use serde::Serialize;
use shared_types::{OnchainId, ProgramKind};
use std::collections::BTreeMap;
use std::fmt;

/// Position of a program in the bridge.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Role {
    /// The registry
    Registry,
    /// Relay by name
    Relay(String),
    /// Token of the named port
    Asset(String),
    /// Port by name
    Port(String),
}

impl Role {
    /// Program kind behind the role.
    pub fn kind(&self) -> ProgramKind {
        match self {
            Role::Registry => ProgramKind::Registry,
            Role::Relay(_) => ProgramKind::Relay,
            Role::Asset(_) => ProgramKind::Token,
            Role::Port(_) => ProgramKind::Port,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Registry => f.write_str("registry"),
            Role::Relay(name) => write!(f, "relay:{name}"),
            Role::Asset(port) => write!(f, "asset:{port}"),
            Role::Port(name) => write!(f, "port:{name}"),
        }
    }
}

impl Serialize for Role {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Recorded program.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RoleEntry {
    /// Role
    pub role: Role,
    /// On-chain id
    pub id: OnchainId,
    /// Supplied by configuration rather than deployed by this run
    pub reused: bool,
}

/// Role → id map of one run, plus relay subscriptions.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DeployedAddressSet {
    entries: Vec<RoleEntry>,
    subscriptions: BTreeMap<Role, u64>,
}

impl DeployedAddressSet {
    /// Empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a role. Fails if the role is already present.
    pub fn record(
        &mut self,
        role: Role,
        id: OnchainId,
        reused: bool,
    ) -> Result<(), PipelineError> {
        if self.get(&role).is_some() {
            return Err(PipelineError::DuplicateRole(role));
        }
        self.entries.push(RoleEntry { role, id, reused });
        Ok(())
    }

    /// Record the subscription id a subscriber holds on its relay.
    pub fn record_subscription(
        &mut self,
        subscriber: Role,
        id: u64,
    ) -> Result<(), PipelineError> {
        if self.subscriptions.contains_key(&subscriber) {
            return Err(PipelineError::DuplicateRole(subscriber));
        }
        self.subscriptions.insert(subscriber, id);
        Ok(())
    }

    /// Id of a role.
    pub fn get(&self, role: &Role) -> Option<OnchainId> {
        self.entries.iter().find(|e| &e.role == role).map(|e| e.id)
    }

    /// Subscription id of a subscriber.
    pub fn subscription(&self, subscriber: &Role) -> Option<u64> {
        self.subscriptions.get(subscriber).copied()
    }

    /// Entries in recording order.
    pub fn entries(&self) -> &[RoleEntry] {
        &self.entries
    }

    /// Number of recorded roles.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Role → id pairs, ignoring provenance.
    pub fn pairs(&self) -> BTreeMap<Role, OnchainId> {
        self.entries.iter().map(|e| (e.role.clone(), e.id)).collect()
    }
}
