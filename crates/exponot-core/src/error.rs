//! Error types for the key rotation engine

use exponot_crypto::ExposureKeyError;
use thiserror::Error;

/// Errors from key rotation and broadcast operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RotationError {
    /// A key schedule primitive rejected its input
    #[error(transparent)]
    Key(#[from] ExposureKeyError),

    /// The secure random source could not produce bytes for a new TEK
    #[error("entropy unavailable: {reason}")]
    EntropyUnavailable {
        /// Description from the entropy source
        reason: String,
    },

    /// The clock moved back past the retention window
    ///
    /// A key for this day may have existed and been evicted. Minting a new
    /// one would leave two TEKs for the same key day.
    #[error("key day {requested} is outside the retention window ending at key day {newest}")]
    KeyDayExpired {
        /// Key day derived from the regressed clock
        requested: u32,
        /// Newest key day observed so far
        newest: u32,
    },
}

impl RotationError {
    /// Returns true if this error is fatal (unrecoverable)
    ///
    /// Entropy failures and clock problems come from the environment and may
    /// clear up before the next interval. Nothing is retried automatically.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::Key(err) => err.is_fatal(),

            Self::EntropyUnavailable { .. } => false,
            Self::KeyDayExpired { .. } => false,
        }
    }
}
