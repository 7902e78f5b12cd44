//! # Programs
//!
//! Execution semantics of the bridge programs, shared by both devnet
//! backends. A [`World`] maps on-chain ids to installed programs and applies
//! one operation at a time.
//!
//! A failed call may leave partial writes behind. Callers treat it as a
//! revert: the devnet runs each transaction on a clone of the world and
//! keeps the clone only on success.

pub mod port;
pub mod registry;
pub mod relay;
pub mod token;

pub use port::PortProgram;
pub use registry::RegistryProgram;
pub use relay::RelayProgram;
pub use token::TokenProgram;

use crate::domain::{
    AdapterError, Call, DataEntry, Event, ProgramError, ProgramInit, StateKey, StateValue,
};
use gw_01_oracle_consensus::Instruction;
use gw_02_port_lifecycle::{AssetEffect, RequestStatus};
use shared_types::{Address, DataType, OnchainId, ProgramKind};
use std::collections::HashMap;

/// Installed program state.
#[derive(Clone, Debug)]
pub enum Program {
    /// Registry
    Registry(RegistryProgram),
    /// Relay
    Relay(RelayProgram),
    /// Port
    Port(PortProgram),
    /// Token
    Token(TokenProgram),
}

impl Program {
    fn from_init(id: OnchainId, init: ProgramInit, owner: Address) -> Self {
        match init {
            ProgramInit::Registry {
                consuls,
                bft,
                last_round,
            } => Program::Registry(RegistryProgram::new(consuls, bft, last_round)),
            ProgramInit::Relay {
                registry,
                data_type,
                oracles,
                bft,
            } => Program::Relay(RelayProgram::new(registry, data_type, oracles, bft)),
            ProgramInit::Port {
                direction,
                relay,
                token,
            } => Program::Port(PortProgram::new(direction, relay, token)),
            ProgramInit::Token {
                name,
                symbol,
                decimals,
            } => Program::Token(TokenProgram::new(id, name, symbol, decimals, owner)),
        }
    }

    fn read(&self, key: &StateKey) -> Option<StateValue> {
        match self {
            Program::Registry(p) => p.read(key),
            Program::Relay(p) => p.read(key),
            Program::Port(p) => p.read(key),
            Program::Token(p) => p.read(key),
        }
    }
}

#[derive(Clone, Debug)]
struct Slot {
    kind: ProgramKind,
    owner: Address,
    program: Option<Program>,
}

/// All programs hosted by one devnet.
#[derive(Clone, Debug, Default)]
pub struct World {
    slots: HashMap<OnchainId, Slot>,
}

macro_rules! program_mut {
    ($world:expr, $id:expr, $variant:ident, $kind:expr) => {{
        let id: OnchainId = $id;
        match $world.initialized_mut(&id, $kind)? {
            Program::$variant(p) => p,
            _ => {
                return Err(ProgramError::NotInitialized(id));
            }
        }
    }};
}

impl World {
    /// Empty world.
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a program at `id`. `init == None` leaves a bare script that
    /// must be initialized from data entries.
    pub fn install(
        &mut self,
        id: OnchainId,
        kind: ProgramKind,
        owner: Address,
        init: Option<ProgramInit>,
    ) -> Result<Vec<Event>, ProgramError> {
        if self.slots.contains_key(&id) {
            return Err(ProgramError::AlreadyInitialized(id));
        }
        let program = match init {
            Some(init) => {
                if init.kind() != kind {
                    return Err(ProgramError::WrongProgram {
                        id,
                        expected: kind,
                        actual: init.kind(),
                    });
                }
                self.validate_links(&init)?;
                Some(Program::from_init(id, init, owner))
            }
            None => None,
        };
        self.slots.insert(
            id,
            Slot {
                kind,
                owner,
                program,
            },
        );
        Ok(vec![Event::ProgramCreated { id, kind }])
    }

    /// Configure a bare script from data entries. Owner only, once.
    pub fn initialize(
        &mut self,
        id: OnchainId,
        sender: Address,
        entries: &[DataEntry],
    ) -> Result<Vec<Event>, ProgramError> {
        let (kind, owner, initialized) = {
            let slot = self.slots.get(&id).ok_or(ProgramError::NoSuchProgram(id))?;
            (slot.kind, slot.owner, slot.program.is_some())
        };
        if owner != sender {
            return Err(ProgramError::NotOwner {
                id,
                caller: OnchainId::new(sender),
            });
        }
        if initialized {
            return Err(ProgramError::AlreadyInitialized(id));
        }
        let init = ProgramInit::from_entries(kind, entries)?;
        self.validate_links(&init)?;
        let program = Program::from_init(id, init, owner);
        if let Some(slot) = self.slots.get_mut(&id) {
            slot.program = Some(program);
        }
        Ok(Vec::new())
    }

    /// Invoke a program method.
    pub fn invoke(
        &mut self,
        target: OnchainId,
        sender: Address,
        call: Call,
    ) -> Result<Vec<Event>, ProgramError> {
        let caller = OnchainId::new(sender);
        match call {
            Call::AddMinter { minter } => {
                self.require_owner(&target, sender)?;
                let token = program_mut!(self, target, Token, ProgramKind::Token);
                token.add_minter(minter);
                Ok(vec![Event::MinterAdded {
                    token: target,
                    minter,
                }])
            }
            Call::Mint { receiver, amount } => {
                let token = program_mut!(self, target, Token, ProgramKind::Token);
                token.mint(caller, receiver, amount)?;
                Ok(vec![Event::Minted {
                    token: target,
                    to: receiver,
                    amount,
                }])
            }
            Call::Subscribe { subscriber } => {
                let subscriber_kind = self
                    .slots
                    .get(&subscriber)
                    .map(|s| s.kind)
                    .ok_or(ProgramError::NoSuchProgram(subscriber))?;
                let data_type = program_mut!(self, target, Relay, ProgramKind::Relay).data_type();
                if subscriber_kind == ProgramKind::Port {
                    if data_type != DataType::Bytes {
                        return Err(ProgramError::PortRequiresBytesRelay {
                            relay: target,
                            port: subscriber,
                            data_type,
                        });
                    }
                    self.require_bound_relay(subscriber, target)?;
                }
                let relay = program_mut!(self, target, Relay, ProgramKind::Relay);
                let (subscription, _) = relay.subscribe(subscriber);
                Ok(vec![Event::Subscribed {
                    relay: target,
                    subscriber,
                    subscription,
                }])
            }
            Call::SendHashValue { digest, signatures } => {
                let relay = program_mut!(self, target, Relay, ProgramKind::Relay);
                let (pulse, newly_created) = relay.send_hash_value(digest, &signatures)?;
                if !newly_created {
                    return Ok(Vec::new());
                }
                Ok(vec![Event::PulseConfirmed {
                    relay: target,
                    pulse_id: pulse.id,
                    digest,
                }])
            }
            Call::SendValueToSub {
                payload,
                pulse_id,
                subscription,
            } => self.send_value_to_sub(target, payload, pulse_id, subscription),
            Call::CreateTransferRequest {
                amount,
                destination,
            } => {
                let port = program_mut!(self, target, Port, ProgramKind::Port);
                let token_id = port.token();
                let (request, effect) =
                    port.ledger_mut().create_request(sender, destination, amount)?;
                let mut events = vec![Event::RequestCreated {
                    port: target,
                    request,
                }];
                events.extend(self.apply_effect(token_id, target, effect)?);
                Ok(events)
            }
            Call::UpdateConsuls {
                consuls,
                round,
                signatures,
            } => {
                let registry = program_mut!(self, target, Registry, ProgramKind::Registry);
                registry.update_consuls(consuls, round, &signatures)?;
                Ok(vec![Event::ConsulsUpdated {
                    registry: target,
                    round,
                }])
            }
        }
    }

    fn send_value_to_sub(
        &mut self,
        relay_id: OnchainId,
        payload: Vec<u8>,
        pulse_id: u64,
        subscription: u64,
    ) -> Result<Vec<Event>, ProgramError> {
        let subscriber = {
            let relay = program_mut!(self, relay_id, Relay, ProgramKind::Relay);
            relay.check_value(&payload, pulse_id, subscription)?
        };

        let mut events = Vec::new();
        let is_port = self
            .slots
            .get(&subscriber)
            .is_some_and(|s| s.kind == ProgramKind::Port);
        if is_port {
            self.require_bound_relay(subscriber, relay_id)?;
            let instruction = Instruction::decode(&payload)?;
            let port = program_mut!(self, subscriber, Port, ProgramKind::Port);
            let token_id = port.token();
            let effect = port.ledger_mut().apply(&instruction)?;
            if let Some(status) = status_after(&instruction) {
                events.push(Event::RequestStatusChanged {
                    port: subscriber,
                    id: instruction.request_id(),
                    status,
                });
            }
            events.extend(self.apply_effect(token_id, subscriber, effect)?);
        }

        let relay = program_mut!(self, relay_id, Relay, ProgramKind::Relay);
        relay.commit_value(payload, pulse_id)?;
        events.push(Event::ValueAttached {
            relay: relay_id,
            pulse_id,
            subscription,
        });
        Ok(events)
    }

    fn apply_effect(
        &mut self,
        token_id: OnchainId,
        port_id: OnchainId,
        effect: AssetEffect,
    ) -> Result<Vec<Event>, ProgramError> {
        if effect == AssetEffect::None {
            return Ok(Vec::new());
        }
        let token = program_mut!(self, token_id, Token, ProgramKind::Token);
        let custody = *port_id.as_bytes();
        let event = match effect {
            AssetEffect::Custody { from, amount } => {
                token.transfer(from, custody, amount)?;
                Event::Transferred {
                    token: token_id,
                    from,
                    to: Some(custody),
                    amount,
                }
            }
            AssetEffect::Burn { from, amount } => {
                token.burn(from, amount)?;
                Event::Transferred {
                    token: token_id,
                    from,
                    to: None,
                    amount,
                }
            }
            AssetEffect::Mint { to, amount } => {
                token.mint(port_id, to, amount)?;
                Event::Minted {
                    token: token_id,
                    to,
                    amount,
                }
            }
            AssetEffect::Release { to, amount } => {
                token.transfer(custody, to, amount)?;
                Event::Transferred {
                    token: token_id,
                    from: custody,
                    to: Some(to),
                    amount,
                }
            }
            AssetEffect::None => return Ok(Vec::new()),
        };
        Ok(vec![event])
    }

    /// Read program state.
    pub fn read(&self, id: &OnchainId, key: &StateKey) -> Result<StateValue, AdapterError> {
        let slot = self.slots.get(id).ok_or(AdapterError::NoSuchProgram(*id))?;
        match key {
            StateKey::Kind => return Ok(StateValue::Kind(slot.kind)),
            StateKey::Initialized => return Ok(StateValue::Bool(slot.program.is_some())),
            _ => {}
        }
        let Some(program) = &slot.program else {
            return Ok(StateValue::Absent);
        };
        program.read(key).ok_or_else(|| AdapterError::UnsupportedKey {
            id: *id,
            kind: slot.kind,
            key: key.to_string(),
        })
    }

    fn initialized_mut(
        &mut self,
        id: &OnchainId,
        expected: ProgramKind,
    ) -> Result<&mut Program, ProgramError> {
        let slot = self
            .slots
            .get_mut(id)
            .ok_or(ProgramError::NoSuchProgram(*id))?;
        if slot.kind != expected {
            return Err(ProgramError::WrongProgram {
                id: *id,
                expected,
                actual: slot.kind,
            });
        }
        slot.program
            .as_mut()
            .ok_or(ProgramError::NotInitialized(*id))
    }

    fn require_owner(&self, id: &OnchainId, sender: Address) -> Result<(), ProgramError> {
        let slot = self.slots.get(id).ok_or(ProgramError::NoSuchProgram(*id))?;
        if slot.owner != sender {
            return Err(ProgramError::NotOwner {
                id: *id,
                caller: OnchainId::new(sender),
            });
        }
        Ok(())
    }

    /// `port` must have been installed with `relay`.
    fn require_bound_relay(&self, port: OnchainId, relay: OnchainId) -> Result<(), ProgramError> {
        let bound = match self.slots.get(&port).and_then(|s| s.program.as_ref()) {
            Some(Program::Port(p)) => p.relay(),
            Some(_) | None => return Err(ProgramError::NotInitialized(port)),
        };
        if bound != relay {
            return Err(ProgramError::ForeignRelay { port, relay, bound });
        }
        Ok(())
    }

    /// Referenced programs must exist with the right kind.
    fn validate_links(&self, init: &ProgramInit) -> Result<(), ProgramError> {
        let links = match init {
            ProgramInit::Relay { registry, .. } => vec![(*registry, ProgramKind::Registry)],
            ProgramInit::Port { relay, token, .. } => {
                vec![(*relay, ProgramKind::Relay), (*token, ProgramKind::Token)]
            }
            ProgramInit::Registry { .. } | ProgramInit::Token { .. } => Vec::new(),
        };
        for (id, expected) in links {
            let slot = self.slots.get(&id).ok_or(ProgramError::NoSuchProgram(id))?;
            if slot.kind != expected {
                return Err(ProgramError::WrongProgram {
                    id,
                    expected,
                    actual: slot.kind,
                });
            }
        }
        Ok(())
    }
}

fn status_after(instruction: &Instruction) -> Option<RequestStatus> {
    match instruction {
        Instruction::Approve { .. } => Some(RequestStatus::Approved),
        Instruction::ChangeStatus { status, .. } => RequestStatus::from_code(*status).ok(),
        Instruction::Mint { .. } | Instruction::Unlock { .. } => None,
    }
}
