//! # GW-02 Port Lifecycle
//!
//! Transfer requests on lock-style and mint-style ports.
//!
//! **Subsystem ID:** 02
//! **Architecture:** Hexagonal (DDD), pure domain logic, no I/O
//!
//! A lock-style port custodies an existing asset on the source chain; a
//! mint-style port mints a wrapped asset on the destination chain. Users
//! open transfer requests; oracle instructions (already validated by
//! `gw-01`) move them out of the pending queue or release funds.
//!
//! ## Module Structure
//!
//! ```text
//! gw-02-port-lifecycle/
//! ├── domain/          # TransferRequest, RequestStatus, PortError
//! └── ledger           # PortLedger, AssetEffect
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod domain;
pub mod ledger;

// Re-exports
pub use domain::{PortError, RequestStatus, TransferRequest};
pub use ledger::{AssetEffect, PortLedger};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
