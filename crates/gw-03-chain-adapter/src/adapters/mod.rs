//! # Adapters
//!
//! In-process devnets implementing [`ChainAdapter`](crate::ports::ChainAdapter).

pub mod account_state;
mod devnet;
pub mod evm;

pub use account_state::{script_account, AccountStateDevnet};
pub use devnet::{check_endpoint, DevnetConfig};
pub use evm::EvmDevnet;
