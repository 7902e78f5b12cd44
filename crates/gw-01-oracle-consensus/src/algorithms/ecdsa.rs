//! # Slot Recovery (secp256k1)
//!
//! - Recovery id `v` accepted as 0/1 or 27/28
//! - High-S signatures are rejected (EIP-2)
//! - A slot verifies only against its own validator key

use crate::domain::{RecoverableSignature, SignatureSlot, ValidatorKey};
use k256::ecdsa::VerifyingKey;
use shared_types::Hash;

/// Recover the signing key of `signature` over `digest`.
///
/// Returns `None` for malleable or unrecoverable signatures.
pub fn recover_signer(digest: &Hash, signature: &RecoverableSignature) -> Option<ValidatorKey> {
    if signature.signature.normalize_s().is_some() {
        return None;
    }
    VerifyingKey::recover_from_prehash(digest, &signature.signature, signature.recovery_id)
        .ok()
        .map(ValidatorKey::new)
}

/// Whether `slot` holds a signature over `digest` by `expected`.
pub fn verify_slot(digest: &Hash, slot: &SignatureSlot, expected: &ValidatorKey) -> bool {
    slot.decode()
        .and_then(|sig| recover_signer(digest, &sig))
        .map(|recovered| &recovered == expected)
        .unwrap_or(false)
}
