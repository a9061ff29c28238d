//! Environment abstraction for deterministic testing.
//!
//! Decouples the key schedule from system resources (wall clock, entropy).
//! Enables deterministic simulation with a settable clock and seeded RNG, and
//! production use with real system resources.

use crate::error::RotationError;

/// Abstract environment providing wall-clock time and randomness.
///
/// # Safety
///
/// Implementations MUST guarantee:
///
/// - `random_bytes()` uses cryptographically secure entropy in production
/// - `random_bytes()` reports failure instead of substituting a weaker source
pub trait Environment: Clone + Send + Sync + 'static {
    /// Seconds since the Unix epoch (UTC).
    ///
    /// Unlike a monotonic clock this may move backwards when the device clock
    /// is corrected. Callers detect and tolerate regressions.
    fn wall_clock_secs(&self) -> u64;

    /// Fills the provided buffer with random bytes.
    ///
    /// # Errors
    ///
    /// - `EntropyUnavailable`: the secure random source failed
    fn random_bytes(&self, buffer: &mut [u8]) -> Result<(), RotationError>;
}
