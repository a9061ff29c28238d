//! Fuzz target for subkey derivation, identifiers and metadata encryption
//!
//! # Strategy
//!
//! - Arbitrary TEK bytes and key days
//! - Boundary interval values (0, MAX)
//! - Arbitrary metadata lengths, including empty and multi-block
//! - Arbitrary HKDF inputs and output lengths
//!
//! # Invariants
//!
//! - Derivation is deterministic (same TEK → same RPIK and AEMK)
//! - RPIK and AEMK never coincide for the same TEK
//! - Distinct intervals produce distinct identifiers under one RPIK
//! - Metadata encryption preserves length and round-trips
//! - HKDF errors exactly when the output length exceeds 255 blocks

#![no_main]

use arbitrary::Arbitrary;
use exponot_crypto::{
    ExposureKeyError, TemporaryExposureKey, decrypt_metadata, derive_aemk, derive_rpik,
    encrypt_metadata, hkdf_sha256, rolling_proximity_identifier,
};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Clone, Arbitrary)]
struct KeyScheduleScenario {
    /// Raw TEK bytes
    tek: [u8; 16],
    /// Key day the TEK belongs to
    key_day: u32,
    /// Interval to derive identifiers for
    interval: u32,
    /// Metadata to encrypt
    metadata: Vec<u8>,
    /// Extra HKDF exercise
    hkdf: HkdfInput,
}

#[derive(Debug, Clone, Arbitrary)]
struct HkdfInput {
    ikm: Vec<u8>,
    salt: Vec<u8>,
    info: Vec<u8>,
    /// Clamped to just past the maximum
    length: u16,
}

fuzz_target!(|scenario: KeyScheduleScenario| {
    let tek = TemporaryExposureKey::new(scenario.tek, scenario.key_day);

    // INVARIANT 1: Derivation is deterministic
    let rpik = derive_rpik(&tek);
    let aemk = derive_aemk(&tek);
    assert_eq!(rpik, derive_rpik(&tek), "RPIK derivation must be deterministic");
    assert_eq!(aemk, derive_aemk(&tek), "AEMK derivation must be deterministic");

    // INVARIANT 2: Distinct labels give distinct subkeys
    assert_ne!(rpik.as_bytes(), aemk.as_bytes(), "RPIK and AEMK must differ");

    // INVARIANT 3: Identifiers are unique per interval
    let rpi = rolling_proximity_identifier(&rpik, scenario.interval);
    let neighbour = rolling_proximity_identifier(&rpik, scenario.interval.wrapping_add(1));
    assert_ne!(rpi, neighbour, "adjacent intervals must produce different identifiers");
    assert_eq!(rpi, rolling_proximity_identifier(&rpik, scenario.interval));

    // INVARIANT 4: Metadata encryption keeps length and round-trips
    let aem = encrypt_metadata(&scenario.metadata, &aemk, &rpi);
    assert_eq!(aem.len(), scenario.metadata.len(), "AEM must match metadata length");
    assert_eq!(decrypt_metadata(&aem, &aemk, &rpi), scenario.metadata, "AEM must round-trip");

    // INVARIANT 5: HKDF length bound
    let length = usize::from(scenario.hkdf.length) % 8_200;
    let input = &scenario.hkdf;
    match hkdf_sha256(&input.ikm, &input.salt, &input.info, length) {
        Ok(okm) => {
            assert!(length <= 255 * 32, "HKDF accepted {length} bytes");
            assert_eq!(okm.len(), length);
        },
        Err(ExposureKeyError::DerivationLength { requested, .. }) => {
            assert!(length > 255 * 32, "HKDF rejected {length} bytes");
            assert_eq!(requested, length);
        },
        Err(other) => panic!("unexpected HKDF error: {other}"),
    }
});
