//! Exposure Notification Cryptographic Primitives
//!
//! Cryptographic building blocks for the exposure notification key schedule.
//! Pure functions with deterministic outputs. Callers provide random bytes
//! for new Temporary Exposure Keys, which keeps every function here testable
//! without an entropy source.
//!
//! # Key Lifecycle
//!
//! One Temporary Exposure Key (TEK) exists per key day. Two subkeys are
//! derived from it with HKDF, and those subkeys produce the values that are
//! actually broadcast.
//!
//! ```text
//! 16 random bytes (per key day)
//!        │
//!        ▼
//! Temporary Exposure Key
//!        │
//!        ├── HKDF("EN-RPIK") → Rolling Proximity Identifier Key
//!        │                           │
//!        │                           ▼ AES-128 (one block, per interval)
//!        │                     Rolling Proximity Identifier ──┐
//!        │                                                    │ counter
//!        └── HKDF("EN-AEMK") → Associated Encrypted Metadata Key
//!                                    │                        │
//!                                    ▼ AES-128-CTR ◄──────────┘
//!                              Associated Encrypted Metadata
//! ```
//!
//! # Security
//!
//! Unlinkability:
//! - The identifier changes every 10-minute interval
//! - Without the TEK, consecutive identifiers cannot be linked
//!
//! Disclosure:
//! - Publishing a TEK lets anyone recompute every identifier and decrypt every
//!   metadata block broadcast on that key day, and nothing else
//!
//! Binding:
//! - Metadata keystream starts at the identifier it was broadcast with, so
//!   metadata cannot be replayed next to a different identifier
//!
//! Key material types zeroize their bytes on drop.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod exposure;

pub use exposure::{
    AssociatedEncryptedMetadataKey, ExposureKeyError, KEY_LENGTH, RollingProximityIdentifier,
    RollingProximityIdentifierKey, SECONDS_PER_INTERVAL, TEK_LIFETIME, TEK_ROLLING_PERIOD,
    TemporaryExposureKey, decrypt_metadata, derive_aemk, derive_rpik, encrypt_metadata,
    hkdf_sha256, interval_number, key_day, rolling_proximity_identifier,
    rolling_start_interval_number,
};
