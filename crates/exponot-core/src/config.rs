//! Configuration for the rotation engine

use exponot_crypto::TEK_LIFETIME;

/// Rotation engine configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotifierConfig {
    /// Number of past key days whose keys stay cached (the current key day
    /// is always kept in addition).
    pub retention_days: u32,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self { retention_days: TEK_LIFETIME }
    }
}
