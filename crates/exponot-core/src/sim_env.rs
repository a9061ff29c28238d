//! Simulation Environment with a settable clock and seeded RNG.
//!
//! Clones share the same clock and RNG, so a test can hold one handle to move
//! time while the notifier under test holds another.

use std::sync::{
    Arc, Mutex, PoisonError,
    atomic::{AtomicBool, AtomicU64, Ordering},
};

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;

use crate::{env::Environment, error::RotationError};

/// Seconds in one key day
const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

/// Deterministic environment for tests and simulations.
///
/// Given the same seed and the same sequence of calls, every TEK is
/// reproducible.
#[derive(Clone)]
pub struct SimEnv {
    /// Current wall-clock time in Unix seconds
    clock: Arc<AtomicU64>,
    /// Seeded RNG shared across clones
    rng: Arc<Mutex<ChaCha20Rng>>,
    /// When false, `random_bytes` fails as if the OS RNG were unavailable
    entropy_available: Arc<AtomicBool>,
}

impl SimEnv {
    /// Create a simulation starting at `start_secs` with a seeded RNG.
    pub fn new(seed: u64, start_secs: u64) -> Self {
        Self {
            clock: Arc::new(AtomicU64::new(start_secs)),
            rng: Arc::new(Mutex::new(ChaCha20Rng::seed_from_u64(seed))),
            entropy_available: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Jump the clock to `unix_secs` (backwards jumps are allowed).
    pub fn set_time(&self, unix_secs: u64) {
        self.clock.store(unix_secs, Ordering::SeqCst);
    }

    /// Move the clock forward by `secs`.
    pub fn advance_secs(&self, secs: u64) {
        self.clock.fetch_add(secs, Ordering::SeqCst);
    }

    /// Move the clock forward by whole days.
    pub fn advance_days(&self, days: u64) {
        self.advance_secs(days * SECONDS_PER_DAY);
    }

    /// Make the entropy source fail (or recover).
    pub fn set_entropy_available(&self, available: bool) {
        self.entropy_available.store(available, Ordering::SeqCst);
    }
}

impl Environment for SimEnv {
    fn wall_clock_secs(&self) -> u64 {
        self.clock.load(Ordering::SeqCst)
    }

    fn random_bytes(&self, buffer: &mut [u8]) -> Result<(), RotationError> {
        if !self.entropy_available.load(Ordering::SeqCst) {
            return Err(RotationError::EntropyUnavailable {
                reason: "simulated entropy failure".to_string(),
            });
        }

        self.rng.lock().unwrap_or_else(PoisonError::into_inner).fill_bytes(buffer);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_bytes() {
        let a = SimEnv::new(7, 0);
        let b = SimEnv::new(7, 0);

        let mut bytes_a = [0u8; 16];
        let mut bytes_b = [0u8; 16];
        a.random_bytes(&mut bytes_a).unwrap();
        b.random_bytes(&mut bytes_b).unwrap();

        assert_eq!(bytes_a, bytes_b);
    }

    #[test]
    fn clones_share_clock() {
        let env = SimEnv::new(0, 1000);
        let handle = env.clone();

        handle.advance_secs(600);
        assert_eq!(env.wall_clock_secs(), 1600);

        handle.set_time(10);
        assert_eq!(env.wall_clock_secs(), 10);
    }

    #[test]
    fn advance_days_moves_whole_days() {
        let env = SimEnv::new(0, 0);
        env.advance_days(15);
        assert_eq!(env.wall_clock_secs(), 15 * 86_400);
    }

    #[test]
    fn entropy_failure_is_reported() {
        let env = SimEnv::new(0, 0);
        env.set_entropy_available(false);

        let mut bytes = [0u8; 16];
        let result = env.random_bytes(&mut bytes);
        assert!(matches!(result, Err(RotationError::EntropyUnavailable { .. })));

        env.set_entropy_available(true);
        assert!(env.random_bytes(&mut bytes).is_ok());
    }
}
