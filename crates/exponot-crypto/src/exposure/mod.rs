//! Exposure Notification key schedule
//!
//! # Architecture
//!
//! ```text
//! Unix time
//!        │
//!        ▼ ÷ 600
//! Interval Number ──────────────────────────┐
//!        │                                  │
//!        ▼ ÷ 144                            │
//! Key Day → TEK                             │
//!        │                                  │
//!        ▼ HKDF-SHA256                      ▼
//! RPIK, AEMK ──► AES block ("EN-RPI" ‖ pad ‖ LE32) → RPI
//!                                                    │
//!                          AES-CTR(AEMK, iv = RPI) ◄─┘ → AEM
//! ```
//!
//! # Security Properties
//!
//! - Deterministic: the same TEK always yields the same subkeys, identifiers
//!   and metadata ciphertexts
//! - Domain separation: RPIK and AEMK use distinct HKDF info labels
//! - Length preserving: metadata ciphertext carries no tag or padding

pub mod derivation;
pub mod error;
pub mod identifier;
pub mod interval;
pub mod keys;
pub mod metadata;

pub use derivation::{derive_aemk, derive_rpik, hkdf_sha256};
pub use error::ExposureKeyError;
pub use identifier::{RollingProximityIdentifier, rolling_proximity_identifier};
pub use interval::{
    SECONDS_PER_INTERVAL, TEK_LIFETIME, TEK_ROLLING_PERIOD, interval_number, key_day,
    rolling_start_interval_number,
};
pub use keys::{
    AssociatedEncryptedMetadataKey, KEY_LENGTH, RollingProximityIdentifierKey,
    TemporaryExposureKey,
};
pub use metadata::{decrypt_metadata, encrypt_metadata};
