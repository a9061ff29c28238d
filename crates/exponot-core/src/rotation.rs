//! Key rotation manager.
//!
//! Owns the TEK, RPIK and AEMK caches and performs the lazy
//! get-or-generate / get-or-derive step for each under one lock. The first
//! caller for a new key day mints the TEK; every concurrent caller observes
//! that same key.
//!
//! # Clock regression
//!
//! The wall clock can move backwards. A request for a key day older than the
//! newest one seen is logged and counted, then served from the cache. A
//! regressed key day that is still inside the retention window but has no
//! cached key never had one, so a key is minted for it. A regressed key day
//! outside the retention window is refused with `KeyDayExpired`: its key may
//! have been evicted, and minting another would create a second TEK for that
//! day.

#![allow(clippy::disallowed_types, reason = "Synchronous in-memory operations only")]

use std::sync::{Mutex, MutexGuard, PoisonError};

use exponot_crypto::{
    AssociatedEncryptedMetadataKey, KEY_LENGTH, RollingProximityIdentifierKey,
    TemporaryExposureKey, derive_aemk, derive_rpik,
};
use zeroize::Zeroize;

use crate::{config::NotifierConfig, env::Environment, error::RotationError, key_cache::KeyCache};

/// Thread-safe owner of all cached key material.
///
/// Construct once per device and share it (e.g. behind an `Arc`) with every
/// component that needs keys.
#[derive(Debug)]
pub struct RotationManager {
    state: Mutex<RotationState>,
}

#[derive(Debug)]
struct RotationState {
    teks: KeyCache<TemporaryExposureKey>,
    rpiks: KeyCache<RollingProximityIdentifierKey>,
    aemks: KeyCache<AssociatedEncryptedMetadataKey>,
    /// Newest key day any caller has asked for
    newest_key_day: Option<u32>,
    /// Number of requests that arrived with a regressed key day
    clock_regressions: u64,
    retention_days: u32,
}

impl RotationManager {
    /// Create a manager with empty caches.
    pub fn new(config: NotifierConfig) -> Self {
        let retention_days = config.retention_days;
        Self {
            state: Mutex::new(RotationState {
                teks: KeyCache::new(retention_days),
                rpiks: KeyCache::new(retention_days),
                aemks: KeyCache::new(retention_days),
                newest_key_day: None,
                clock_regressions: 0,
                retention_days,
            }),
        }
    }

    /// TEK for `key_day`, minting it from `env`'s entropy on first use.
    ///
    /// # Errors
    ///
    /// - `EntropyUnavailable`: no TEK cached and the RNG failed
    /// - `KeyDayExpired`: the key day regressed past the retention window
    pub fn temporary_exposure_key<E: Environment>(
        &self,
        key_day: u32,
        env: &E,
    ) -> Result<TemporaryExposureKey, RotationError> {
        let mut state = self.lock();
        let newest = state.observe(key_day)?;
        state.temporary_exposure_key(key_day, newest, env)
    }

    /// RPIK for `key_day`, derived from that day's TEK on first use.
    ///
    /// # Errors
    ///
    /// Same as [`Self::temporary_exposure_key`].
    pub fn rolling_proximity_identifier_key<E: Environment>(
        &self,
        key_day: u32,
        env: &E,
    ) -> Result<RollingProximityIdentifierKey, RotationError> {
        self.lock().derived(key_day, env, |state| &mut state.rpiks, derive_rpik)
    }

    /// AEMK for `key_day`, derived from that day's TEK on first use.
    ///
    /// # Errors
    ///
    /// Same as [`Self::temporary_exposure_key`].
    pub fn associated_encrypted_metadata_key<E: Environment>(
        &self,
        key_day: u32,
        env: &E,
    ) -> Result<AssociatedEncryptedMetadataKey, RotationError> {
        self.lock().derived(key_day, env, |state| &mut state.aemks, derive_aemk)
    }

    /// Every TEK still inside the retention window, oldest first.
    ///
    /// These are the keys a device discloses after a positive diagnosis.
    pub fn retained_temporary_exposure_keys(&self) -> Vec<TemporaryExposureKey> {
        self.lock().teks.values().cloned().collect()
    }

    /// Newest key day requested so far. `None` before the first request.
    pub fn newest_key_day(&self) -> Option<u32> {
        self.lock().newest_key_day
    }

    /// Number of requests whose key day was older than the newest seen.
    pub fn clock_regressions(&self) -> u64 {
        self.lock().clock_regressions
    }

    /// Number of past key days retained besides the newest.
    pub fn retention_days(&self) -> u32 {
        self.lock().retention_days
    }

    /// Key days with a cached TEK, RPIK and AEMK respectively.
    ///
    /// Useful for debugging and testing.
    pub fn cached_key_days(&self) -> (Vec<u32>, Vec<u32>, Vec<u32>) {
        let state = self.lock();
        (
            state.teks.key_days().collect(),
            state.rpiks.key_days().collect(),
            state.aemks.key_days().collect(),
        )
    }

    // Every mutation leaves the caches consistent, so a poisoned lock is
    // still safe to use.
    fn lock(&self) -> MutexGuard<'_, RotationState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for RotationManager {
    fn default() -> Self {
        Self::new(NotifierConfig::default())
    }
}

impl RotationState {
    /// Record a request for `key_day` and return the newest key day seen.
    fn observe(&mut self, key_day: u32) -> Result<u32, RotationError> {
        match self.newest_key_day {
            Some(newest) if key_day < newest => {
                self.clock_regressions += 1;
                tracing::warn!(observed = key_day, newest, "clock regressed to an earlier key day");

                if newest - key_day > self.retention_days {
                    return Err(RotationError::KeyDayExpired { requested: key_day, newest });
                }
                Ok(newest)
            },
            Some(newest) if key_day == newest => Ok(newest),
            _ => {
                self.newest_key_day = Some(key_day);
                self.evict_expired(key_day);
                Ok(key_day)
            },
        }
    }

    /// Eviction pass over all three caches.
    fn evict_expired(&mut self, newest: u32) {
        let evicted = self.teks.evict_expired(newest)
            + self.rpiks.evict_expired(newest)
            + self.aemks.evict_expired(newest);

        if evicted > 0 {
            tracing::debug!(newest_key_day = newest, evicted, "evicted expired keys");
        }
    }

    fn temporary_exposure_key<E: Environment>(
        &mut self,
        key_day: u32,
        newest: u32,
        env: &E,
    ) -> Result<TemporaryExposureKey, RotationError> {
        if let Some(tek) = self.teks.get(key_day) {
            return Ok(tek.clone());
        }

        let mut key = [0u8; KEY_LENGTH];
        if let Err(err) = env.random_bytes(&mut key) {
            key.zeroize();
            return Err(err);
        }
        let tek = TemporaryExposureKey::new(key, key_day);
        key.zeroize();

        self.teks.insert(key_day, tek.clone(), newest);
        tracing::debug!(key_day, "minted temporary exposure key");

        Ok(tek)
    }

    /// Get-or-derive for one subkey cache.
    fn derived<K, E>(
        &mut self,
        key_day: u32,
        env: &E,
        cache: fn(&mut Self) -> &mut KeyCache<K>,
        derive: fn(&TemporaryExposureKey) -> K,
    ) -> Result<K, RotationError>
    where
        K: Clone,
        E: Environment,
    {
        let newest = self.observe(key_day)?;
        if let Some(key) = cache(self).get(key_day) {
            return Ok(key.clone());
        }

        let tek = self.temporary_exposure_key(key_day, newest, env)?;
        let key = derive(&tek);

        cache(self).insert(key_day, key.clone(), newest);
        tracing::debug!(key_day, "derived subkey");

        Ok(key)
    }
}
