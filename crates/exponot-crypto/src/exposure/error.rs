//! Error types for key schedule operations

use thiserror::Error;

/// Errors from key schedule primitives
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExposureKeyError {
    /// Requested HKDF output is longer than 255 hash blocks
    #[error("derivation length {requested} exceeds maximum of {max} bytes")]
    DerivationLength {
        /// Requested output length in bytes
        requested: usize,
        /// Largest output HKDF-SHA256 can produce
        max: usize,
    },

    /// Invalid key material length
    #[error("invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength {
        /// Expected key length
        expected: usize,
        /// Actual key length
        actual: usize,
    },

    /// Timestamp maps to an interval number that does not fit in 32 bits
    #[error("timestamp {unix_secs} is outside the representable interval range")]
    TimestampOutOfRange {
        /// The offending Unix timestamp in seconds
        unix_secs: u64,
    },
}

impl ExposureKeyError {
    /// Returns true if this error is fatal (unrecoverable)
    ///
    /// Fatal errors indicate a caller bug: retrying with the same input
    /// fails the same way. A timestamp out of range points at a broken clock
    /// source, which may be corrected before the next call.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::DerivationLength { .. } => true,
            Self::InvalidKeyLength { .. } => true,

            Self::TimestampOutOfRange { .. } => false,
        }
    }
}
