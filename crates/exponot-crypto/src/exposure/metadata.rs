//! Associated Encrypted Metadata using AES-128-CTR
//!
//! The keystream's initial counter block is the identifier broadcast in the
//! same interval, which binds metadata to that identifier. There is no
//! authentication tag and no padding: output length equals input length.

use aes::Aes128;
use ctr::cipher::{KeyIvInit, StreamCipher};

use super::{identifier::RollingProximityIdentifier, keys::AssociatedEncryptedMetadataKey};

/// AES-128 in counter mode with a full 128-bit big-endian counter
type Aes128Ctr = ctr::Ctr128BE<Aes128>;

/// Encrypt metadata to broadcast alongside `rpi`.
///
/// `AEM = AES128-CTR(AEMK, counter = RPI, metadata)`
pub fn encrypt_metadata(
    metadata: &[u8],
    aemk: &AssociatedEncryptedMetadataKey,
    rpi: &RollingProximityIdentifier,
) -> Vec<u8> {
    apply_keystream(metadata, aemk, rpi)
}

/// Decrypt metadata received with `rpi`.
///
/// Only possible once the broadcaster has disclosed the TEK the AEMK was
/// derived from. A wrong key or identifier yields garbage, not an error.
pub fn decrypt_metadata(
    encrypted: &[u8],
    aemk: &AssociatedEncryptedMetadataKey,
    rpi: &RollingProximityIdentifier,
) -> Vec<u8> {
    apply_keystream(encrypted, aemk, rpi)
}

fn apply_keystream(
    input: &[u8],
    aemk: &AssociatedEncryptedMetadataKey,
    rpi: &RollingProximityIdentifier,
) -> Vec<u8> {
    let mut cipher = Aes128Ctr::new(aemk.as_bytes().into(), rpi.as_bytes().into());

    let mut output = input.to_vec();
    cipher.apply_keystream(&mut output);
    output
}
