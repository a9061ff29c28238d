//! Production Environment implementation using system time and RNG.
//!
//! `SystemEnv` is the production implementation of the Environment trait using
//! the real wall clock and the OS cryptographic RNG (getrandom). Truly random,
//! not reproducible.

use crate::{env::Environment, error::RotationError};

/// Production environment using system time and cryptographic RNG.
///
/// # Security
///
/// The RNG uses getrandom which provides OS-level cryptographic randomness
/// (e.g., `getrandom(2)` or /dev/urandom on Linux, `BCryptGenRandom` on
/// Windows). RNG failure is surfaced as `EntropyUnavailable` so no TEK is ever
/// minted from a weaker source.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemEnv;

impl SystemEnv {
    /// Create a new system environment.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Environment for SystemEnv {
    #[allow(clippy::disallowed_methods)]
    fn wall_clock_secs(&self) -> u64 {
        // A clock set before 1970 reads as the epoch itself
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
    }

    fn random_bytes(&self, buffer: &mut [u8]) -> Result<(), RotationError> {
        getrandom::fill(buffer)
            .map_err(|err| RotationError::EntropyUnavailable { reason: err.to_string() })
    }
}
