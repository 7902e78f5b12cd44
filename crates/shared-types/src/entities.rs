//! # Core Entities
//!
//! Identifiers and tags used by every bridge subsystem.
//!
//! ## Clusters
//!
//! - **Bytes**: `Hash`, `Address`, `ForeignAddress`, keccak helper
//! - **Identity**: `OnchainId` (contract address or account reference)
//! - **Tags**: `BackendKind`, `ProgramKind`, `DataType`, `PortDirection`

use crate::errors::ParseError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha3::{Digest, Keccak256};
use std::fmt;
use std::str::FromStr;

// Re-export U256 from primitive-types for use across all subsystems
pub use primitive_types::U256;

// =============================================================================
// CLUSTER A: BYTES
// =============================================================================

/// A 32-byte hash (keccak256 unless stated otherwise).
pub type Hash = [u8; 32];

/// A 20-byte address.
pub type Address = [u8; 20];

/// Destination-chain account encoding carried by transfer requests.
pub type ForeignAddress = [u8; 32];

/// Transaction identifier assigned by a backend.
pub type TxId = Hash;

/// Keccak256 of arbitrary bytes.
pub fn keccak256(data: &[u8]) -> Hash {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Encode a U256 as a 32-byte big-endian word.
pub fn u256_to_word(value: &U256) -> [u8; 32] {
    let mut word = [0u8; 32];
    value.to_big_endian(&mut word);
    word
}

/// Decode a 32-byte big-endian word.
pub fn u256_from_word(word: &[u8]) -> U256 {
    U256::from_big_endian(word)
}

// =============================================================================
// CLUSTER B: IDENTITY
// =============================================================================

/// Durable on-chain identifier: a contract address on the EVM-style backend,
/// an account reference on the account-state backend.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct OnchainId(pub Address);

impl OnchainId {
    /// Wrap raw address bytes.
    pub const fn new(bytes: Address) -> Self {
        Self(bytes)
    }

    /// Take the trailing 20 bytes of a hash.
    pub fn from_hash_tail(hash: &Hash) -> Self {
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&hash[12..]);
        Self(bytes)
    }

    /// Raw bytes.
    pub fn as_bytes(&self) -> &Address {
        &self.0
    }
}

impl fmt::Display for OnchainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for OnchainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OnchainId({})", self)
    }
}

impl FromStr for OnchainId {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = decode_hex(s)?;
        let bytes: Address = bytes
            .as_slice()
            .try_into()
            .map_err(|_| ParseError::InvalidLength {
                expected: 20,
                actual: bytes.len(),
            })?;
        Ok(Self(bytes))
    }
}

impl Serialize for OnchainId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for OnchainId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Decode hex with or without a `0x` prefix.
pub fn decode_hex(s: &str) -> Result<Vec<u8>, ParseError> {
    let trimmed = s.trim();
    let trimmed = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    hex::decode(trimmed).map_err(|e| ParseError::InvalidHex(format!("{s}: {e}")))
}

// =============================================================================
// CLUSTER C: TAGS
// =============================================================================

/// Transaction model of a backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BackendKind {
    /// Contracts deployed with constructor arguments, receipts carry events.
    Evm,
    /// Scripts attached to accounts, configured through data entries.
    AccountState,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Evm => f.write_str("evm"),
            BackendKind::AccountState => f.write_str("account-state"),
        }
    }
}

/// Kind of on-chain program the pipeline installs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgramKind {
    /// Validator-set registry.
    Registry,
    /// Oracle relay.
    Relay,
    /// Lock-style or mint-style port.
    Port,
    /// Fungible token.
    Token,
}

impl fmt::Display for ProgramKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProgramKind::Registry => "registry",
            ProgramKind::Relay => "relay",
            ProgramKind::Port => "port",
            ProgramKind::Token => "token",
        };
        f.write_str(name)
    }
}

/// Data-type tag bound to a relay at deployment.
///
/// Discriminants follow the on-chain extractor encoding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    /// 8-byte big-endian integer values.
    Int = 0,
    /// UTF-8 string values.
    String = 1,
    /// Raw bytes.
    #[default]
    Bytes = 2,
}

impl DataType {
    /// On-chain integer code.
    pub fn code(self) -> i64 {
        self as i64
    }

    /// Parse an on-chain integer code.
    pub fn from_code(code: i64) -> Result<Self, ParseError> {
        match code {
            0 => Ok(DataType::Int),
            1 => Ok(DataType::String),
            2 => Ok(DataType::Bytes),
            other => Err(ParseError::UnknownTag {
                kind: "data type",
                value: other.to_string(),
            }),
        }
    }
}

/// Port role in the bridge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortDirection {
    /// Source-chain port custodying an existing asset.
    Lock,
    /// Destination-chain port minting a wrapped asset.
    Mint,
}

impl PortDirection {
    /// On-chain integer code.
    pub fn code(self) -> i64 {
        match self {
            PortDirection::Lock => 0,
            PortDirection::Mint => 1,
        }
    }

    /// Parse an on-chain integer code.
    pub fn from_code(code: i64) -> Result<Self, ParseError> {
        match code {
            0 => Ok(PortDirection::Lock),
            1 => Ok(PortDirection::Mint),
            other => Err(ParseError::UnknownTag {
                kind: "port direction",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for PortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortDirection::Lock => f.write_str("lock"),
            PortDirection::Mint => f.write_str("mint"),
        }
    }
}
