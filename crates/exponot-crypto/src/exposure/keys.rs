//! Key material for the exposure notification key schedule
//!
//! All keys are 16 bytes (AES-128). Each type zeroizes its bytes on drop and
//! redacts them from `Debug` output.

use std::fmt;

use zeroize::Zeroize;

use super::{
    error::ExposureKeyError,
    interval::{TEK_ROLLING_PERIOD, rolling_start_interval_number},
};

/// Length of every key in the schedule (AES-128)
pub const KEY_LENGTH: usize = 16;

/// The daily secret from which all other key material for a key day is
/// derived.
///
/// Disclosing a TEK (with its rolling start interval number) lets a verifier
/// recompute every identifier broadcast on that key day.
#[derive(Clone, PartialEq, Eq)]
pub struct TemporaryExposureKey {
    /// The 16 random key bytes
    key: [u8; KEY_LENGTH],
    /// The key day this key is valid for
    key_day: u32,
}

impl TemporaryExposureKey {
    /// Wrap 16 random bytes as the TEK for `key_day`.
    ///
    /// Caller MUST provide cryptographically secure random bytes in
    /// production.
    pub fn new(key: [u8; KEY_LENGTH], key_day: u32) -> Self {
        Self { key, key_day }
    }

    /// Build a TEK from a byte slice, e.g. a disclosed diagnosis key.
    pub fn from_slice(key: &[u8], key_day: u32) -> Result<Self, ExposureKeyError> {
        let key: [u8; KEY_LENGTH] = key.try_into().map_err(|_| {
            ExposureKeyError::InvalidKeyLength { expected: KEY_LENGTH, actual: key.len() }
        })?;
        Ok(Self { key, key_day })
    }

    /// The 16 key bytes.
    pub fn key(&self) -> &[u8; KEY_LENGTH] {
        &self.key
    }

    /// Key day this TEK is valid for.
    pub fn key_day(&self) -> u32 {
        self.key_day
    }

    /// First interval number in which this key was used.
    pub fn rolling_start_interval_number(&self) -> u32 {
        rolling_start_interval_number(self.key_day)
    }

    /// Number of intervals this key is valid for.
    pub fn rolling_period(&self) -> u32 {
        TEK_ROLLING_PERIOD
    }
}

impl fmt::Debug for TemporaryExposureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemporaryExposureKey")
            .field("key", &"<redacted>")
            .field("key_day", &self.key_day)
            .finish()
    }
}

impl Drop for TemporaryExposureKey {
    fn drop(&mut self) {
        self.key.zeroize();
    }
}

/// Subkey used to encrypt interval numbers into Rolling Proximity
/// Identifiers.
#[derive(Clone, PartialEq, Eq)]
pub struct RollingProximityIdentifierKey([u8; KEY_LENGTH]);

impl RollingProximityIdentifierKey {
    /// Wrap derived key bytes.
    pub fn new(key: [u8; KEY_LENGTH]) -> Self {
        Self(key)
    }

    /// The 16 key bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.0
    }
}

impl fmt::Debug for RollingProximityIdentifierKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RollingProximityIdentifierKey(<redacted>)")
    }
}

impl Drop for RollingProximityIdentifierKey {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

/// Subkey used to encrypt metadata broadcast alongside an identifier.
#[derive(Clone, PartialEq, Eq)]
pub struct AssociatedEncryptedMetadataKey([u8; KEY_LENGTH]);

impl AssociatedEncryptedMetadataKey {
    /// Wrap derived key bytes.
    pub fn new(key: [u8; KEY_LENGTH]) -> Self {
        Self(key)
    }

    /// The 16 key bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.0
    }
}

impl fmt::Debug for AssociatedEncryptedMetadataKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AssociatedEncryptedMetadataKey(<redacted>)")
    }
}

impl Drop for AssociatedEncryptedMetadataKey {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}
