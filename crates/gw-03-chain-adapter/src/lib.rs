//! # GW-03 Chain Adapter
//!
//! Submit transactions, await finality and read program state on two
//! backend families behind one capability interface.
//!
//! **Subsystem ID:** 03
//! **Architecture:** Hexagonal (DDD)
//!
//! ## Backends
//!
//! | Backend       | Create program           | Created id            | Events |
//! |---------------|--------------------------|-----------------------|--------|
//! | EVM-style     | install + constructor    | reported in receipt   | yes    |
//! | account-state | bare script, then data   | `sha256(sender‖nonce)`| no     |
//!
//! Both backends host the same bridge programs (registry, relay, port,
//! token). Each transaction executes atomically: a revert leaves no writes.
//!
//! ## Module Structure
//!
//! ```text
//! gw-03-chain-adapter/
//! ├── domain/          # Transaction, Operation, Call, Receipt, StateKey, errors
//! ├── ports/           # ChainAdapter, DeploymentModel
//! ├── programs/        # World: registry, relay, port, token semantics
//! └── adapters/        # EvmDevnet, AccountStateDevnet
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod programs;

// Re-exports
pub use adapters::{AccountStateDevnet, DevnetConfig, EvmDevnet};
pub use domain::{
    AdapterError, Call, DataEntry, DataValue, Event, Operation, PendingHandle, ProgramError,
    ProgramInit, Receipt, StateKey, StateValue, Transaction,
};
pub use ports::{ChainAdapter, DeploymentModel};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
