//! # Deployment Plan
//!
//! Orders the steps of one run: registry, relays, then each port's asset
//! and the port itself, then wiring. Roles supplied as existing skip their
//! deploy steps; wiring that references them still runs.

use crate::domain::{BridgeTopology, Minter, Role};
use gw_03_chain_adapter::DeploymentModel;
use shared_types::OnchainId;
use std::fmt;

/// One unit of work. Finalizes before the next step starts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Step {
    /// Create the program for a role.
    Install {
        /// Role to deploy
        role: Role,
        /// Pass configuration as constructor arguments
        constructor: bool,
    },
    /// Write configuration entries into a freshly installed script.
    InitializeStorage(Role),
    /// Grant minting rights on a port's token.
    AddMinter {
        /// Port name
        port: String,
        /// Grantee
        minter: Minter,
    },
    /// Subscribe a port to its relay.
    Subscribe {
        /// Relay role
        relay: Role,
        /// Subscriber role
        subscriber: Role,
    },
}

impl Step {
    /// Role the step serves.
    pub fn role(&self) -> Role {
        match self {
            Step::Install { role, .. } | Step::InitializeStorage(role) => role.clone(),
            Step::AddMinter { port, .. } => Role::Asset(port.clone()),
            Step::Subscribe { subscriber, .. } => subscriber.clone(),
        }
    }

    /// Whether the step creates a program.
    pub fn is_install(&self) -> bool {
        matches!(self, Step::Install { .. })
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Install { role, .. } => write!(f, "install {role}"),
            Step::InitializeStorage(role) => write!(f, "initialize {role}"),
            Step::AddMinter { port, .. } => write!(f, "add-minter asset:{port}"),
            Step::Subscribe { relay, subscriber } => write!(f, "subscribe {subscriber} to {relay}"),
        }
    }
}

/// Steps for `topology` under `model`.
pub fn plan(topology: &BridgeTopology, model: DeploymentModel) -> Vec<Step> {
    let deploy = |role: Role| match model {
        DeploymentModel::ConstructorArgs => vec![Step::Install {
            role,
            constructor: true,
        }],
        DeploymentModel::ScriptThenData => vec![
            Step::Install {
                role: role.clone(),
                constructor: false,
            },
            Step::InitializeStorage(role),
        ],
    };

    let mut steps = Vec::new();
    if topology.existing_registry.is_none() {
        steps.extend(deploy(Role::Registry));
    }
    for relay in topology.relays.iter().filter(|r| r.existing.is_none()) {
        steps.extend(deploy(Role::Relay(relay.name.clone())));
    }
    for port in &topology.ports {
        if port.asset.existing().is_none() {
            steps.extend(deploy(Role::Asset(port.name.clone())));
        }
        if port.existing.is_none() {
            steps.extend(deploy(Role::Port(port.name.clone())));
        }
    }
    for port in &topology.ports {
        steps.extend(port.minters().into_iter().map(|minter| Step::AddMinter {
            port: port.name.clone(),
            minter,
        }));
        steps.push(Step::Subscribe {
            relay: Role::Relay(port.relay.clone()),
            subscriber: Role::Port(port.name.clone()),
        });
    }
    steps
}

/// Roles the configuration supplies ids for, in plan order.
pub fn existing_roles(topology: &BridgeTopology) -> Vec<(Role, OnchainId)> {
    let mut roles = Vec::new();
    if let Some(id) = topology.existing_registry {
        roles.push((Role::Registry, id));
    }
    for relay in &topology.relays {
        if let Some(id) = relay.existing {
            roles.push((Role::Relay(relay.name.clone()), id));
        }
    }
    for port in &topology.ports {
        if let Some(id) = port.asset.existing() {
            roles.push((Role::Asset(port.name.clone()), id));
        }
        if let Some(id) = port.existing {
            roles.push((Role::Port(port.name.clone()), id));
        }
    }
    roles
}
