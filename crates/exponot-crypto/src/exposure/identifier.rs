//! Rolling Proximity Identifier construction
//!
//! The identifier is a single AES-128 block: a fixed label, zero padding and
//! the little-endian interval number, encrypted under the day's RPIK with no
//! chaining mode. The block is unique per (RPIK, interval), so no IV is
//! needed.

use aes::{
    Aes128, Block,
    cipher::{BlockEncrypt, KeyInit},
};

use super::keys::RollingProximityIdentifierKey;

/// Size of an identifier and of one AES block
pub const IDENTIFIER_SIZE: usize = 16;

/// Label at the start of every padded identifier block
const RPI_LABEL: &[u8; 6] = b"EN-RPI";

/// A 16-byte pseudorandom identifier broadcast for one interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RollingProximityIdentifier([u8; IDENTIFIER_SIZE]);

impl RollingProximityIdentifier {
    /// Wrap received identifier bytes.
    pub fn new(bytes: [u8; IDENTIFIER_SIZE]) -> Self {
        Self(bytes)
    }

    /// The 16 identifier bytes.
    pub fn as_bytes(&self) -> &[u8; IDENTIFIER_SIZE] {
        &self.0
    }
}

impl From<RollingProximityIdentifier> for [u8; IDENTIFIER_SIZE] {
    fn from(rpi: RollingProximityIdentifier) -> Self {
        rpi.0
    }
}

/// Compute the identifier broadcast during `interval_number`.
///
/// `RPI = AES128(RPIK, "EN-RPI" || 0x000000000000 || LE32(interval_number))`
pub fn rolling_proximity_identifier(
    rpik: &RollingProximityIdentifierKey,
    interval_number: u32,
) -> RollingProximityIdentifier {
    let cipher = Aes128::new(rpik.as_bytes().into());

    let mut block = Block::from(padded_data(interval_number));
    cipher.encrypt_block(&mut block);

    let mut rpi = [0u8; IDENTIFIER_SIZE];
    rpi.copy_from_slice(&block);
    RollingProximityIdentifier(rpi)
}

/// Build the 16-byte plaintext block.
///
/// Structure:
/// - bytes 0-5: "EN-RPI"
/// - bytes 6-11: zero
/// - bytes 12-15: interval number (little-endian)
fn padded_data(interval_number: u32) -> [u8; IDENTIFIER_SIZE] {
    let mut block = [0u8; IDENTIFIER_SIZE];

    block[0..6].copy_from_slice(RPI_LABEL);
    block[12..16].copy_from_slice(&interval_number.to_le_bytes());

    block
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_rpik() -> RollingProximityIdentifierKey {
        let mut key = [0u8; 16];
        for (i, byte) in key.iter_mut().enumerate() {
            *byte = i as u8;
        }
        RollingProximityIdentifierKey::new(key)
    }

    #[test]
    fn padded_data_structure() {
        let block = padded_data(0x0102_0304);

        // Check label (bytes 0-5)
        assert_eq!(&block[0..6], b"EN-RPI");

        // Check padding (bytes 6-11)
        assert_eq!(&block[6..12], &[0u8; 6]);

        // Check interval number (bytes 12-15)
        assert_eq!(&block[12..16], &[0x04, 0x03, 0x02, 0x01]);
    }

    #[test]
    fn identifier_is_deterministic() {
        let rpik = test_rpik();
        assert_eq!(
            rolling_proximity_identifier(&rpik, 2_650_847),
            rolling_proximity_identifier(&rpik, 2_650_847)
        );
    }

    #[test]
    fn identifier_changes_every_interval() {
        let rpik = test_rpik();
        let a = rolling_proximity_identifier(&rpik, 100);
        let b = rolling_proximity_identifier(&rpik, 101);
        assert_ne!(a, b);
    }

    #[test]
    fn identifier_depends_on_key() {
        let a = rolling_proximity_identifier(&test_rpik(), 7);
        let b = rolling_proximity_identifier(&RollingProximityIdentifierKey::new([0xFF; 16]), 7);
        assert_ne!(a, b);
    }

    #[test]
    fn identifier_is_not_plaintext() {
        let rpi = rolling_proximity_identifier(&test_rpik(), 0);
        assert_ne!(rpi.as_bytes(), &padded_data(0));
    }

    #[test]
    fn interval_boundary_values() {
        let rpik = test_rpik();
        assert_eq!(rolling_proximity_identifier(&rpik, 0).as_bytes().len(), IDENTIFIER_SIZE);
        assert_eq!(rolling_proximity_identifier(&rpik, u32::MAX).as_bytes().len(), IDENTIFIER_SIZE);
    }

    #[test]
    fn conversion_to_bytes() {
        let rpi = RollingProximityIdentifier::new([9u8; 16]);
        let bytes: [u8; 16] = rpi.into();
        assert_eq!(bytes, [9u8; 16]);
    }
}
