//! # Algorithms
//!
//! - `ecdsa`: public-key recovery for one slot
//! - `quorum`: positional slot counting against the threshold
//! - `signer`: oracle-side signing
//! - `rotation`: validator-set replacement digest and check

pub mod ecdsa;
pub mod quorum;
pub mod rotation;
pub mod signer;

pub use ecdsa::{recover_signer, verify_slot};
pub use quorum::{count_valid_slots, verify_quorum};
pub use rotation::{consul_rotation_digest, verify_rotation};
pub use signer::OracleSigner;
