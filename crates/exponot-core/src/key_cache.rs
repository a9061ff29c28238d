//! Per-purpose key cache indexed by key day.
//!
//! One cache exists per key purpose (TEK, RPIK, AEMK). Each holds at most one
//! key per key day and forgets keys once they fall out of the retention
//! window. The cache itself is not synchronized; the rotation manager guards
//! all caches with a single lock.

use std::collections::BTreeMap;

/// Key day → key map with a retention window.
///
/// # Invariants
///
/// - At most one key per key day; an existing entry is never replaced
/// - After eviction relative to key day `newest`, no entry is older than
///   `newest - retention_days`
#[derive(Debug, Clone)]
pub struct KeyCache<K> {
    /// Keys ordered by key day, oldest first
    entries: BTreeMap<u32, K>,
    /// Number of past key days retained besides the newest
    retention_days: u32,
}

impl<K> KeyCache<K> {
    /// Create an empty cache retaining `retention_days` past key days.
    pub fn new(retention_days: u32) -> Self {
        Self { entries: BTreeMap::new(), retention_days }
    }

    /// Key cached for `key_day`, if any.
    pub fn get(&self, key_day: u32) -> Option<&K> {
        self.entries.get(&key_day)
    }

    /// Store the key for `key_day`, then evict relative to `newest_key_day`.
    ///
    /// Returns the number of evicted entries. If a key is already cached for
    /// `key_day` it is kept and `key` is dropped.
    pub fn insert(&mut self, key_day: u32, key: K, newest_key_day: u32) -> usize {
        self.entries.entry(key_day).or_insert(key);
        self.evict_expired(newest_key_day)
    }

    /// Drop every entry more than `retention_days` older than
    /// `newest_key_day`.
    ///
    /// The threshold is inclusive: an entry exactly `retention_days` old is
    /// kept. Entries newer than `newest_key_day` are never touched.
    pub fn evict_expired(&mut self, newest_key_day: u32) -> usize {
        let oldest_retained = newest_key_day.saturating_sub(self.retention_days);
        let before = self.entries.len();

        self.entries = self.entries.split_off(&oldest_retained);

        before - self.entries.len()
    }

    /// Key days currently cached, oldest first.
    pub fn key_days(&self) -> impl Iterator<Item = u32> + '_ {
        self.entries.keys().copied()
    }

    /// Cached keys, oldest key day first.
    pub fn values(&self) -> impl Iterator<Item = &K> {
        self.entries.values()
    }

    /// Number of cached keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of past key days retained besides the newest.
    pub fn retention_days(&self) -> u32 {
        self.retention_days
    }
}
