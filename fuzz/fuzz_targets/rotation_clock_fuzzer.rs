//! Fuzz target for key rotation under an adversarial clock
//!
//! Drives a notifier with a simulated clock that jumps forward, backward and
//! past the representable interval range.
//!
//! # Invariants
//!
//! - No clock sequence panics
//! - Caches never hold a key older than the retention window
//! - A key day's TEK never changes while it stays cached
//! - Broadcasts always decrypt with the disclosed TEK

#![no_main]

use std::collections::HashMap;

use arbitrary::Arbitrary;
use exponot_core::{
    Environment, ExposureNotifier, NotifierConfig, SimEnv,
    exponot_crypto::{decrypt_metadata, derive_aemk, derive_rpik, rolling_proximity_identifier},
};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Clone, Arbitrary)]
struct ClockScenario {
    seed: u64,
    start_secs: u32,
    retention_days: u8,
    steps: Vec<ClockStep>,
}

#[derive(Debug, Clone, Arbitrary)]
enum ClockStep {
    /// Move forward by up to ~18 hours
    Forward(u16),
    /// Jump forward by whole days
    SkipDays(u8),
    /// Move backward by up to ~18 hours
    Backward(u16),
    /// Jump to an arbitrary moment
    SetTime(u64),
    /// Generate a broadcast with this metadata
    Broadcast(Vec<u8>),
}

fuzz_target!(|scenario: ClockScenario| {
    let env = SimEnv::new(scenario.seed, u64::from(scenario.start_secs));
    let config = NotifierConfig { retention_days: u32::from(scenario.retention_days % 32) };
    let notifier = ExposureNotifier::new(env.clone(), config);
    let mut seen = HashMap::new();

    for step in scenario.steps.into_iter().take(256) {
        match step {
            ClockStep::Forward(secs) => env.advance_secs(u64::from(secs)),
            ClockStep::SkipDays(days) => env.advance_days(u64::from(days)),
            ClockStep::Backward(secs) => {
                env.set_time(env.wall_clock_secs().saturating_sub(u64::from(secs)));
            },
            ClockStep::SetTime(secs) => env.set_time(secs),
            ClockStep::Broadcast(metadata) => {
                // Errors are expected for out-of-range or expired days
                let Ok(payload) = notifier.advertisement_payload(&metadata) else {
                    continue;
                };
                let Ok(tek) = notifier.current_temporary_exposure_key() else {
                    continue;
                };

                let rpi =
                    rolling_proximity_identifier(&derive_rpik(&tek), payload.interval_number);
                assert_eq!(rpi, payload.rpi, "identifier must follow from disclosed TEK");
                assert_eq!(
                    decrypt_metadata(&payload.aem, &derive_aemk(&tek), &rpi),
                    metadata,
                    "metadata must decrypt with disclosed TEK"
                );
            },
        }

        let rotation = notifier.rotation();
        if let Some(newest) = rotation.newest_key_day() {
            for tek in rotation.retained_temporary_exposure_keys() {
                assert!(
                    tek.key_day() >= newest.saturating_sub(config.retention_days),
                    "key day {} outlived window ending at {newest}",
                    tek.key_day()
                );
                let previous = seen.entry(tek.key_day()).or_insert_with(|| *tek.key());
                assert_eq!(*previous, *tek.key(), "cached TEK changed for day {}", tek.key_day());
            }
        }
    }
});
