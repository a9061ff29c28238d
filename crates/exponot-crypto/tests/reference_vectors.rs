//! Pinned reference vectors for the key schedule
//!
//! Each vector was computed with an independent HKDF-SHA256 / AES-128-ECB /
//! AES-128-CTR implementation. Any change here breaks interoperability with
//! every other device.

#![allow(clippy::unwrap_used)]

use exponot_crypto::{
    TemporaryExposureKey, derive_aemk, derive_rpik, encrypt_metadata, key_day,
    rolling_proximity_identifier,
};

struct Vector {
    tek: [u8; 16],
    interval: u32,
    rpik: &'static str,
    aemk: &'static str,
    rpi: &'static str,
    aem: &'static str,
}

const METADATA: [u8; 4] = [0x40, 0x08, 0x00, 0x00];

const VECTORS: [Vector; 2] = [
    Vector {
        tek: [0u8; 16],
        interval: 0,
        rpik: "57e4c5f2ceeb86a849542209e846a4d9",
        aemk: "e8ccd234e1115b41c823f73e42f30375",
        rpi: "f252a8a76c6012a86337d54f914b53b5",
        aem: "ed1a161b",
    },
    Vector {
        tek: [
            0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d,
            0x0e, 0x0f,
        ],
        interval: 2_650_847,
        rpik: "4c3615250075e094e42e1b72e538ded2",
        aemk: "3454dd8d8c8c835029754c15df6d44d7",
        rpi: "a39e61b36036a900f0377fa43bbf13e4",
        aem: "5e830125",
    },
];

#[test]
fn subkeys_match_reference() {
    for vector in &VECTORS {
        let tek = TemporaryExposureKey::new(vector.tek, key_day(vector.interval));

        assert_eq!(hex::encode(derive_rpik(&tek).as_bytes()), vector.rpik);
        assert_eq!(hex::encode(derive_aemk(&tek).as_bytes()), vector.aemk);
    }
}

#[test]
fn identifier_matches_reference() {
    for vector in &VECTORS {
        let tek = TemporaryExposureKey::new(vector.tek, key_day(vector.interval));
        let rpi = rolling_proximity_identifier(&derive_rpik(&tek), vector.interval);

        assert_eq!(hex::encode(rpi.as_bytes()), vector.rpi, "interval {}", vector.interval);
    }
}

#[test]
fn metadata_matches_reference() {
    for vector in &VECTORS {
        let tek = TemporaryExposureKey::new(vector.tek, key_day(vector.interval));
        let rpi = rolling_proximity_identifier(&derive_rpik(&tek), vector.interval);
        let aem = encrypt_metadata(&METADATA, &derive_aemk(&tek), &rpi);

        assert_eq!(hex::encode(aem), vector.aem, "interval {}", vector.interval);
    }
}

#[test]
fn multi_block_metadata_matches_reference() {
    let tek = TemporaryExposureKey::new([0u8; 16], 0);
    let rpi = rolling_proximity_identifier(&derive_rpik(&tek), 0);
    let metadata: Vec<u8> = (0u8..32).collect();

    let aem = encrypt_metadata(&metadata, &derive_aemk(&tek), &rpi);

    assert_eq!(
        hex::encode(aem),
        "ad131418cc50c5b1b62f8a0ce6c526788ea97850bcd0a977c3ad310ce67a8087"
    );
}
