//! # Oracle Signer
//!
//! Produces recoverable signatures over 32-byte digests.

use crate::domain::{ConsensusError, RecoverableSignature, ValidatorKey};
use k256::ecdsa::SigningKey;
use shared_types::{decode_hex, Hash};

/// An oracle's signing key.
#[derive(Clone)]
pub struct OracleSigner {
    key: SigningKey,
}

impl OracleSigner {
    /// Fresh random key.
    pub fn random() -> Self {
        Self {
            key: SigningKey::random(&mut rand::thread_rng()),
        }
    }

    /// Load a 32-byte secret from hex.
    pub fn from_hex(secret: &str) -> Result<Self, ConsensusError> {
        let bytes =
            decode_hex(secret).map_err(|e| ConsensusError::InvalidValidatorKey(e.to_string()))?;
        let key = SigningKey::from_slice(&bytes)
            .map_err(|e| ConsensusError::InvalidValidatorKey(e.to_string()))?;
        Ok(Self { key })
    }

    /// Public identity for the validator set.
    pub fn validator_key(&self) -> ValidatorKey {
        ValidatorKey::new(self.key.verifying_key().clone())
    }

    /// Sign a digest (low-S normalised by k256).
    pub fn sign(&self, digest: &Hash) -> Result<RecoverableSignature, ConsensusError> {
        let (signature, recovery_id) = self
            .key
            .sign_prehash_recoverable(digest)
            .map_err(|e| ConsensusError::SigningFailed(e.to_string()))?;
        Ok(RecoverableSignature {
            signature,
            recovery_id,
        })
    }
}

impl std::fmt::Debug for OracleSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OracleSigner")
            .field("key", &self.validator_key())
            .finish_non_exhaustive()
    }
}
