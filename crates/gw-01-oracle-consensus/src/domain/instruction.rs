//! # Instruction Payloads
//!
//! Payloads attached to a confirmed pulse and dispatched to a port.
//!
//! ```text
//! 'm' | request_id[32] | amount[32] | receiver[20]   mint      (85 bytes)
//! 'u' | request_id[32] | amount[32] | receiver[20]   unlock    (85 bytes)
//! 'c' | request_id[32] | status[1]                   change    (34 bytes)
//! 'a' | request_id[32]                               approve   (33 bytes)
//! ```
//!
//! Integers are big-endian.

use super::errors::ConsensusError;
use shared_types::{keccak256, u256_from_word, u256_to_word, Address, Hash, U256};

const MINT: u8 = b'm';
const UNLOCK: u8 = b'u';
const CHANGE_STATUS: u8 = b'c';
const APPROVE: u8 = b'a';

const TRANSFER_LEN: usize = 1 + 32 + 32 + 20;
const CHANGE_STATUS_LEN: usize = 1 + 32 + 1;
const APPROVE_LEN: usize = 1 + 32;

/// Decoded port instruction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Instruction {
    /// Mint `amount` to `receiver` for request `request_id`.
    Mint {
        /// Source-side request id
        request_id: U256,
        /// Amount in token base units
        amount: U256,
        /// Recipient
        receiver: Address,
    },
    /// Release `amount` of the custodied asset to `receiver`.
    Unlock {
        /// Source-side request id
        request_id: U256,
        /// Amount in token base units
        amount: U256,
        /// Recipient
        receiver: Address,
    },
    /// Move a pending request to status code `status`.
    ChangeStatus {
        /// Local request id
        request_id: U256,
        /// Target status code
        status: u8,
    },
    /// Approve a pending request.
    Approve {
        /// Local request id
        request_id: U256,
    },
}

impl Instruction {
    /// Opcode byte.
    pub fn opcode(&self) -> u8 {
        match self {
            Instruction::Mint { .. } => MINT,
            Instruction::Unlock { .. } => UNLOCK,
            Instruction::ChangeStatus { .. } => CHANGE_STATUS,
            Instruction::Approve { .. } => APPROVE,
        }
    }

    /// Request id the instruction refers to.
    pub fn request_id(&self) -> U256 {
        match self {
            Instruction::Mint { request_id, .. }
            | Instruction::Unlock { request_id, .. }
            | Instruction::ChangeStatus { request_id, .. }
            | Instruction::Approve { request_id } => *request_id,
        }
    }

    /// Serialize to the wire layout.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = vec![self.opcode()];
        match self {
            Instruction::Mint {
                request_id,
                amount,
                receiver,
            }
            | Instruction::Unlock {
                request_id,
                amount,
                receiver,
            } => {
                out.extend_from_slice(&u256_to_word(request_id));
                out.extend_from_slice(&u256_to_word(amount));
                out.extend_from_slice(receiver);
            }
            Instruction::ChangeStatus { request_id, status } => {
                out.extend_from_slice(&u256_to_word(request_id));
                out.push(*status);
            }
            Instruction::Approve { request_id } => {
                out.extend_from_slice(&u256_to_word(request_id));
            }
        }
        out
    }

    /// Parse the wire layout.
    pub fn decode(payload: &[u8]) -> Result<Self, ConsensusError> {
        let opcode = *payload.first().ok_or(ConsensusError::EmptyPayload)?;
        let expected = match opcode {
            MINT | UNLOCK => TRANSFER_LEN,
            CHANGE_STATUS => CHANGE_STATUS_LEN,
            APPROVE => APPROVE_LEN,
            other => return Err(ConsensusError::UnknownOpcode(other)),
        };
        if payload.len() != expected {
            return Err(ConsensusError::PayloadLength {
                opcode: opcode as char,
                expected,
                actual: payload.len(),
            });
        }

        let request_id = u256_from_word(&payload[1..33]);
        let instruction = match opcode {
            MINT | UNLOCK => {
                let amount = u256_from_word(&payload[33..65]);
                let mut receiver = [0u8; 20];
                receiver.copy_from_slice(&payload[65..85]);
                if opcode == MINT {
                    Instruction::Mint {
                        request_id,
                        amount,
                        receiver,
                    }
                } else {
                    Instruction::Unlock {
                        request_id,
                        amount,
                        receiver,
                    }
                }
            }
            CHANGE_STATUS => Instruction::ChangeStatus {
                request_id,
                status: payload[33],
            },
            _ => Instruction::Approve { request_id },
        };
        Ok(instruction)
    }

    /// keccak256 of the encoded payload; what oracles sign.
    pub fn digest(&self) -> Hash {
        keccak256(&self.encode())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mint_layout() {
        let bytes = Instruction::Mint {
            request_id: U256::from(1u64),
            amount: U256::from(1000u64),
            receiver: [7u8; 20],
        }
        .encode();
        assert_eq!(bytes.len(), 85);
        assert_eq!(bytes[0], b'm');
        assert_eq!(bytes[32], 1);
        assert_eq!(&bytes[63..65], &1000u16.to_be_bytes());
        assert_eq!(&bytes[65..], &[7u8; 20]);
    }

    #[test]
    fn test_change_status_layout() {
        let bytes = Instruction::ChangeStatus {
            request_id: U256::from(5u64),
            status: 2,
        }
        .encode();
        assert_eq!(bytes.len(), 34);
        assert_eq!(bytes[0], b'c');
        assert_eq!(bytes[33], 2);
    }

    #[test]
    fn test_decode_approve() {
        let mut payload = vec![b'a'];
        payload.extend_from_slice(&u256_to_word(&U256::from(42u64)));
        assert_eq!(
            Instruction::decode(&payload).unwrap(),
            Instruction::Approve {
                request_id: U256::from(42u64)
            }
        );
    }

    #[test]
    fn test_decode_rejects_unknown_and_short() {
        assert_eq!(
            Instruction::decode(&[b'x', 0]).unwrap_err(),
            ConsensusError::UnknownOpcode(b'x')
        );
        assert_eq!(
            Instruction::decode(&[]).unwrap_err(),
            ConsensusError::EmptyPayload
        );
        assert!(matches!(
            Instruction::decode(&[b'u'; 40]).unwrap_err(),
            ConsensusError::PayloadLength {
                opcode: 'u',
                expected: 85,
                actual: 40
            }
        ));
    }

    #[test]
    fn test_digest_is_keccak_of_encoding() {
        let ins = Instruction::Approve {
            request_id: U256::one(),
        };
        assert_eq!(ins.digest(), keccak256(&ins.encode()));
    }
}
