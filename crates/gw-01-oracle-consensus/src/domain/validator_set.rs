//! # Validator Set
//!
//! Ordered validator identities and the BFT threshold.
//!
//! Slot order is significant: slot `i` of every submission is checked
//! against `keys[i]` only.

use super::errors::ConsensusError;
use k256::ecdsa::VerifyingKey;
use shared_types::{decode_hex, keccak256, Address};
use std::fmt;

/// A validator's secp256k1 public key.
#[derive(Clone)]
pub struct ValidatorKey {
    key: VerifyingKey,
    compressed: [u8; 33],
}

impl ValidatorKey {
    /// Wrap a verifying key.
    pub fn new(key: VerifyingKey) -> Self {
        let point = key.to_encoded_point(true);
        let mut compressed = [0u8; 33];
        compressed.copy_from_slice(point.as_bytes());
        Self { key, compressed }
    }

    /// Parse SEC1 bytes (33-byte compressed or 65-byte uncompressed).
    pub fn from_sec1_bytes(bytes: &[u8]) -> Result<Self, ConsensusError> {
        VerifyingKey::from_sec1_bytes(bytes)
            .map(Self::new)
            .map_err(|e| ConsensusError::InvalidValidatorKey(e.to_string()))
    }

    /// Parse a hex SEC1 key, `0x` prefix optional.
    pub fn from_hex(s: &str) -> Result<Self, ConsensusError> {
        let bytes =
            decode_hex(s).map_err(|e| ConsensusError::InvalidValidatorKey(e.to_string()))?;
        Self::from_sec1_bytes(&bytes)
    }

    /// Compressed SEC1 encoding.
    pub fn compressed(&self) -> &[u8; 33] {
        &self.compressed
    }

    /// Compressed key as `0x`-prefixed hex.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.compressed))
    }

    /// Underlying verifying key.
    pub fn verifying_key(&self) -> &VerifyingKey {
        &self.key
    }

    /// Ethereum-style address: last 20 bytes of keccak256 of the
    /// uncompressed key without its 0x04 prefix.
    pub fn address(&self) -> Address {
        let point = self.key.to_encoded_point(false);
        let hash = keccak256(&point.as_bytes()[1..]);
        let mut address = [0u8; 20];
        address.copy_from_slice(&hash[12..]);
        address
    }
}

impl PartialEq for ValidatorKey {
    fn eq(&self, other: &Self) -> bool {
        self.compressed == other.compressed
    }
}

impl Eq for ValidatorKey {}

impl fmt::Debug for ValidatorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ValidatorKey({})", self.to_hex())
    }
}

/// Minimum count of valid slots required to confirm a digest.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BftThreshold(usize);

impl BftThreshold {
    /// Validate `1 <= threshold <= validators`.
    pub fn new(threshold: usize, validators: usize) -> Result<Self, ConsensusError> {
        if threshold == 0 || threshold > validators {
            return Err(ConsensusError::InvalidThreshold {
                threshold,
                validators,
            });
        }
        Ok(Self(threshold))
    }

    /// Threshold value.
    pub fn get(&self) -> usize {
        self.0
    }
}

/// Ordered, fixed-size validator set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidatorSet {
    keys: Vec<ValidatorKey>,
}

impl ValidatorSet {
    /// Build a set, rejecting empty and duplicate entries.
    pub fn new(keys: Vec<ValidatorKey>) -> Result<Self, ConsensusError> {
        if keys.is_empty() {
            return Err(ConsensusError::EmptyValidatorSet);
        }
        for (slot, key) in keys.iter().enumerate() {
            if keys[..slot].contains(key) {
                return Err(ConsensusError::DuplicateValidator { slot });
            }
        }
        Ok(Self { keys })
    }

    /// Parse hex keys in order.
    pub fn from_hex<S: AsRef<str>>(keys: &[S]) -> Result<Self, ConsensusError> {
        let keys = keys
            .iter()
            .map(|k| ValidatorKey::from_hex(k.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(keys)
    }

    /// Validator count `N`.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Always false for a constructed set.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Key registered at `slot`.
    pub fn key(&self, slot: usize) -> Option<&ValidatorKey> {
        self.keys.get(slot)
    }

    /// Keys in slot order.
    pub fn keys(&self) -> &[ValidatorKey] {
        &self.keys
    }

    /// Keys as hex strings in slot order.
    pub fn to_hex(&self) -> Vec<String> {
        self.keys.iter().map(ValidatorKey::to_hex).collect()
    }

    /// Build a threshold checked against this set's size.
    pub fn threshold(&self, threshold: usize) -> Result<BftThreshold, ConsensusError> {
        BftThreshold::new(threshold, self.len())
    }
}
