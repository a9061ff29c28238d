//! Exposure Notification key rotation engine.
//!
//! Wraps the pure primitives of [`exponot_crypto`] with the state a
//! broadcasting device needs: one TEK per key day minted from secure entropy,
//! cached subkeys, and eviction once keys leave the retention window.
//!
//! # Architecture
//!
//! ```text
//! ExposureNotifier ── wall clock ──► interval number, key day
//!        │
//!        ▼
//! RotationManager (one lock)
//!   ├── KeyCache<TEK>   ◄── Environment::random_bytes
//!   ├── KeyCache<RPIK>  ◄── HKDF(TEK, "EN-RPIK")
//!   └── KeyCache<AEMK>  ◄── HKDF(TEK, "EN-AEMK")
//! ```
//!
//! # Components
//!
//! - [`Environment`]: wall clock and entropy, injectable for tests
//! - [`SystemEnv`]: production environment (OS clock, getrandom)
//! - [`SimEnv`]: settable clock and seeded RNG for deterministic tests
//! - [`RotationManager`]: owns the three caches, shareable across threads
//! - [`ExposureNotifier`]: current TEK, RPI and encrypted metadata
//!
//! # Invariants
//!
//! - At most one TEK per key day, even under concurrent first access
//! - No cached key is older than `retention_days` before the newest key day
//! - A regressed clock reuses cached keys and never mints a second TEK for a
//!   day whose key may have been evicted

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
pub mod env;
mod error;
pub mod key_cache;
mod notifier;
mod rotation;
mod sim_env;
mod system_env;

pub use config::NotifierConfig;
pub use env::Environment;
pub use error::RotationError;
pub use exponot_crypto;
pub use key_cache::KeyCache;
pub use notifier::{Advertisement, ExposureNotifier};
pub use rotation::RotationManager;
pub use sim_env::SimEnv;
pub use system_env::SystemEnv;
