//! Time quantization for the key schedule
//!
//! Every device agrees on the same 10-minute windows because they are
//! derived from Unix time alone. A key day is 144 consecutive intervals.

use super::error::ExposureKeyError;

/// Length of one interval in seconds (10 minutes)
pub const SECONDS_PER_INTERVAL: u64 = 600;

/// Number of intervals a Temporary Exposure Key is valid for (24 hours)
pub const TEK_ROLLING_PERIOD: u32 = 144;

/// Number of past key days whose keys are retained for disclosure
pub const TEK_LIFETIME: u32 = 14;

/// Interval number for a Unix timestamp: `floor(unix_secs / 600)`.
///
/// The interval number is encoded as a 32-bit value inside every identifier,
/// so timestamps past interval `u32::MAX` are rejected.
pub fn interval_number(unix_secs: u64) -> Result<u32, ExposureKeyError> {
    u32::try_from(unix_secs / SECONDS_PER_INTERVAL)
        .map_err(|_| ExposureKeyError::TimestampOutOfRange { unix_secs })
}

/// Key day an interval belongs to: `floor(interval_number / 144)`.
pub fn key_day(interval_number: u32) -> u32 {
    interval_number / TEK_ROLLING_PERIOD
}

/// First interval number of a key day.
///
/// Saturates for key days no interval number maps to.
pub fn rolling_start_interval_number(key_day: u32) -> u32 {
    key_day.saturating_mul(TEK_ROLLING_PERIOD)
}
