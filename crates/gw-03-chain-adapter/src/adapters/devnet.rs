//! In-process devnet core shared by both backends.
//!
//! Submitted transactions wait in a mempool. Awaiting finality produces
//! blocks: each block executes the whole mempool in submission order, and a
//! transaction is final once `confirmations` blocks (its own included) exist
//! on top of the height it was included at.

use crate::domain::{
    AdapterError, Event, Operation, PendingHandle, ProgramError, StateKey, StateValue, Transaction,
};
use crate::programs::World;
use parking_lot::Mutex;
use shared_types::{Address, OnchainId, TxId};
use std::collections::{HashMap, VecDeque};
use std::time::Duration;
use tracing::debug;

/// Devnet parameters.
#[derive(Clone, Debug)]
pub struct DevnetConfig {
    /// Blocks (including the inclusion block) before a transaction is final.
    pub confirmations: u64,
    /// Give up waiting for finality after this long.
    pub finality_timeout: Duration,
    /// Pause between produced blocks.
    pub block_time: Duration,
}

impl Default for DevnetConfig {
    fn default() -> Self {
        Self {
            confirmations: 1,
            finality_timeout: Duration::from_secs(30),
            block_time: Duration::ZERO,
        }
    }
}

/// Accepted endpoint schemes.
const SCHEMES: [&str; 2] = ["devnet://", "memory://"];

/// Reject endpoints this process cannot serve.
pub fn check_endpoint(url: &str) -> Result<(), AdapterError> {
    if SCHEMES.iter().any(|scheme| url.starts_with(scheme)) {
        Ok(())
    } else {
        Err(AdapterError::Transport(format!(
            "cannot reach {url}: only in-process endpoints ({}) are served",
            SCHEMES.join(", ")
        )))
    }
}

/// Backend-specific id derivation.
#[derive(Clone, Copy)]
pub(crate) struct IdScheme {
    pub tx_id: fn(&Address, u64) -> TxId,
    pub program_id: fn(&Address, u64) -> OnchainId,
}

/// Effects of a successful transaction.
#[derive(Clone, Debug)]
pub(crate) struct Executed {
    pub height: u64,
    pub created: Option<OnchainId>,
    pub events: Vec<Event>,
}

struct Queued {
    tx_id: TxId,
    tx: Transaction,
    program_id: OnchainId,
}

#[derive(Clone)]
struct Included {
    height: u64,
    target: OnchainId,
    result: Result<(Option<OnchainId>, Vec<Event>), ProgramError>,
}

#[derive(Default)]
struct ChainState {
    world: World,
    height: u64,
    nonces: HashMap<Address, u64>,
    mempool: VecDeque<Queued>,
    included: HashMap<TxId, Included>,
}

impl ChainState {
    fn produce_block(&mut self, tag: &str) {
        self.height += 1;
        let height = self.height;
        let queued: Vec<Queued> = self.mempool.drain(..).collect();
        for q in queued {
            let target = q.tx.op.target().unwrap_or(q.program_id);
            let mut next = self.world.clone();
            let result = apply(&mut next, q.tx, q.program_id);
            match &result {
                Ok(_) => self.world = next,
                Err(reason) => {
                    debug!(
                        tx = %hex::encode(q.tx_id),
                        %reason,
                        "[gw-03] {tag} transaction reverted"
                    );
                }
            }
            self.included.insert(
                q.tx_id,
                Included {
                    height,
                    target,
                    result,
                },
            );
        }
    }
}

fn apply(
    world: &mut World,
    tx: Transaction,
    program_id: OnchainId,
) -> Result<(Option<OnchainId>, Vec<Event>), ProgramError> {
    match tx.op {
        Operation::Install { kind, init } => world
            .install(program_id, kind, tx.sender, init)
            .map(|events| (Some(program_id), events)),
        Operation::InitializeStorage { target, entries } => world
            .initialize(target, tx.sender, &entries)
            .map(|events| (None, events)),
        Operation::Invoke { target, call } => world
            .invoke(target, tx.sender, call)
            .map(|events| (None, events)),
    }
}

/// Chain state plus the backend's id scheme.
pub(crate) struct Devnet {
    tag: &'static str,
    config: DevnetConfig,
    ids: IdScheme,
    state: Mutex<ChainState>,
}

impl Devnet {
    pub(crate) fn new(tag: &'static str, config: DevnetConfig, ids: IdScheme) -> Self {
        Self {
            tag,
            config,
            ids,
            state: Mutex::new(ChainState::default()),
        }
    }

    /// Current height.
    pub(crate) fn height(&self) -> u64 {
        self.state.lock().height
    }

    /// Id an install from `sender` at `nonce` creates.
    pub(crate) fn program_id(&self, sender: &Address, nonce: u64) -> OnchainId {
        (self.ids.program_id)(sender, nonce)
    }

    /// Queue a transaction, consuming the sender's next nonce.
    pub(crate) fn enqueue(&self, tx: Transaction) -> PendingHandle {
        let mut state = self.state.lock();
        let nonce = {
            let next = state.nonces.entry(tx.sender).or_insert(0);
            let nonce = *next;
            *next += 1;
            nonce
        };
        let tx_id = (self.ids.tx_id)(&tx.sender, nonce);
        let program_id = self.program_id(&tx.sender, nonce);
        let sender = tx.sender;
        debug!(
            tx = %hex::encode(tx_id),
            op = tx.op.name(),
            nonce,
            "[gw-03] {} transaction queued",
            self.tag
        );
        state.mempool.push_back(Queued {
            tx_id,
            tx,
            program_id,
        });
        PendingHandle {
            tx_id,
            sender,
            nonce,
        }
    }

    /// Produce blocks until the transaction is final.
    pub(crate) async fn await_final(
        &self,
        handle: &PendingHandle,
    ) -> Result<Executed, AdapterError> {
        let wait = async {
            loop {
                {
                    let mut state = self.state.lock();
                    let depth = self.config.confirmations;
                    match state.included.get(&handle.tx_id).cloned() {
                        Some(inc) if state.height + 1 >= inc.height.saturating_add(depth) => {
                            return finish(handle.tx_id, inc)
                        }
                        Some(_) => state.produce_block(self.tag),
                        None if state.mempool.iter().any(|q| q.tx_id == handle.tx_id) => {
                            state.produce_block(self.tag)
                        }
                        None => return Err(AdapterError::UnknownTransaction(handle.tx_id)),
                    }
                }
                if self.config.block_time.is_zero() {
                    tokio::task::yield_now().await;
                } else {
                    tokio::time::sleep(self.config.block_time).await;
                }
            }
        };
        tokio::time::timeout(self.config.finality_timeout, wait)
            .await
            .map_err(|_| AdapterError::Timeout {
                tx: handle.tx_id,
                waited_ms: self.config.finality_timeout.as_millis() as u64,
            })?
    }

    /// Read program state at the current height.
    pub(crate) fn read(&self, id: &OnchainId, key: &StateKey) -> Result<StateValue, AdapterError> {
        self.state.lock().world.read(id, key)
    }
}

fn finish(tx: TxId, inc: Included) -> Result<Executed, AdapterError> {
    match inc.result {
        Ok((created, events)) => Ok(Executed {
            height: inc.height,
            created,
            events,
        }),
        Err(reason) => Err(AdapterError::Rejected {
            tx,
            target: inc.target,
            reason,
        }),
    }
}
