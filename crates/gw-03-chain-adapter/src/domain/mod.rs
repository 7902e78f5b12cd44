//! # Domain Module
//!
//! Operations, receipts, state keys and errors shared by both backends.

pub mod errors;
pub mod operations;
pub mod receipts;
pub mod state;
pub mod storage;

pub use errors::*;
pub use operations::*;
pub use receipts::*;
pub use state::*;
pub use storage::*;
