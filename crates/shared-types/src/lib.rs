//! # Shared Types Crate
//!
//! Primitive identifiers shared by the bridge subsystems.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: identifiers that cross crate boundaries
//!   (`OnchainId`, `Hash`, tags) are defined once here.
//! - **Backend neutral**: nothing in this crate knows whether an identifier
//!   came from the EVM-style or the account-state backend.

pub mod entities;
pub mod errors;

pub use entities::*;
pub use errors::*;
