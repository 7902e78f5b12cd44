//! # Domain Module
//!
//! Core domain types for the oracle consensus protocol.

pub mod errors;
pub mod instruction;
pub mod pulse;
pub mod signatures;
pub mod validator_set;

pub use errors::*;
pub use instruction::*;
pub use pulse::*;
pub use signatures::*;
pub use validator_set::*;
