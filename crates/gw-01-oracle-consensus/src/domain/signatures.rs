//! # Signatures
//!
//! Positional signature slots. Each slot is 65 bytes `r ‖ s ‖ v`; a slot a
//! validator did not fill stays zeroed and simply fails verification.

use super::errors::{ConsensusError, SignatureDecodeError};
use super::validator_set::ValidatorSet;
use k256::ecdsa::{RecoveryId, Signature};

/// Length of a serialized recoverable signature.
pub const SIGNATURE_LEN: usize = 65;

/// A decoded secp256k1 signature with its recovery id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecoverableSignature {
    /// `r ‖ s` component
    pub signature: Signature,
    /// Recovery id (0 or 1)
    pub recovery_id: RecoveryId,
}

impl RecoverableSignature {
    /// Decode `r ‖ s ‖ v`, accepting `v` as 0/1 or 27/28.
    pub fn from_bytes(bytes: &[u8; SIGNATURE_LEN]) -> Result<Self, SignatureDecodeError> {
        let signature = Signature::from_slice(&bytes[..64])
            .map_err(|_| SignatureDecodeError::InvalidScalars)?;
        let v = match bytes[64] {
            0 | 1 => bytes[64],
            27 | 28 => bytes[64] - 27,
            other => return Err(SignatureDecodeError::InvalidRecoveryByte(other)),
        };
        let recovery_id =
            RecoveryId::try_from(v).map_err(|_| SignatureDecodeError::InvalidRecoveryByte(v))?;
        Ok(Self {
            signature,
            recovery_id,
        })
    }

    /// Encode as `r ‖ s ‖ v` with `v` in 27/28 form.
    pub fn to_bytes(&self) -> [u8; SIGNATURE_LEN] {
        let mut out = [0u8; SIGNATURE_LEN];
        out[..64].copy_from_slice(&self.signature.to_bytes());
        out[64] = self.recovery_id.to_byte() + 27;
        out
    }
}

/// One positional signature slot.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct SignatureSlot([u8; SIGNATURE_LEN]);

impl SignatureSlot {
    /// Zeroed slot for a validator that did not sign.
    pub const fn empty() -> Self {
        Self([0u8; SIGNATURE_LEN])
    }

    /// Wrap raw slot bytes.
    pub const fn from_raw(bytes: [u8; SIGNATURE_LEN]) -> Self {
        Self(bytes)
    }

    /// Slot carrying an encoded signature.
    pub fn signed(signature: &RecoverableSignature) -> Self {
        Self(signature.to_bytes())
    }

    /// Whether the slot is entirely zero.
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }

    /// Raw bytes.
    pub fn as_bytes(&self) -> &[u8; SIGNATURE_LEN] {
        &self.0
    }

    /// Decode the slot, if it holds a well-formed signature.
    pub fn decode(&self) -> Option<RecoverableSignature> {
        if self.is_empty() {
            return None;
        }
        RecoverableSignature::from_bytes(&self.0).ok()
    }
}

impl std::fmt::Debug for SignatureSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            f.write_str("SignatureSlot(empty)")
        } else {
            write!(f, "SignatureSlot(0x{}…)", hex::encode(&self.0[..8]))
        }
    }
}

/// A submission's full slot vector.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignatureSet {
    slots: Vec<SignatureSlot>,
}

impl SignatureSet {
    /// Wrap slots in order.
    pub fn new(slots: Vec<SignatureSlot>) -> Self {
        Self { slots }
    }

    /// `n` empty slots.
    pub fn empty(n: usize) -> Self {
        Self {
            slots: vec![SignatureSlot::empty(); n],
        }
    }

    /// Parse raw byte slots; any slot not exactly 65 bytes is malformed.
    pub fn from_raw_slots<B: AsRef<[u8]>>(raw: &[B]) -> Result<Self, ConsensusError> {
        let slots = raw
            .iter()
            .enumerate()
            .map(|(slot, bytes)| {
                let bytes = bytes.as_ref();
                <[u8; SIGNATURE_LEN]>::try_from(bytes)
                    .map(SignatureSlot::from_raw)
                    .map_err(|_| ConsensusError::MalformedSignature {
                        slot,
                        reason: format!("expected {SIGNATURE_LEN} bytes, got {}", bytes.len()),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { slots })
    }

    /// Fill `slot` with `signature`; out-of-range slots are ignored.
    pub fn set(&mut self, slot: usize, signature: &RecoverableSignature) {
        if let Some(entry) = self.slots.get_mut(slot) {
            *entry = SignatureSlot::signed(signature);
        }
    }

    /// Slot count.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether there are no slots.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Slots in order.
    pub fn slots(&self) -> &[SignatureSlot] {
        &self.slots
    }

    /// Reject a set whose length differs from the validator count.
    pub fn check_shape(&self, validators: &ValidatorSet) -> Result<(), ConsensusError> {
        if self.slots.len() != validators.len() {
            return Err(ConsensusError::SlotCountMismatch {
                expected: validators.len(),
                actual: self.slots.len(),
            });
        }
        Ok(())
    }
}
