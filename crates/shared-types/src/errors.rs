//! # Error Types
//!
//! Parse errors for the textual forms of shared identifiers.

use thiserror::Error;

/// Errors raised while parsing identifiers and tags from text.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    /// Input was not valid hexadecimal.
    #[error("Invalid hex: {0}")]
    InvalidHex(String),

    /// Decoded bytes have the wrong length.
    #[error("Invalid length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    /// Unknown tag value.
    #[error("Unknown {kind}: {value}")]
    UnknownTag { kind: &'static str, value: String },
}
