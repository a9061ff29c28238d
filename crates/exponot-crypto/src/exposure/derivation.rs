//! Subkey derivation using HKDF

use hkdf::Hkdf;
use sha2::Sha256;

use super::{
    error::ExposureKeyError,
    keys::{
        AssociatedEncryptedMetadataKey, KEY_LENGTH, RollingProximityIdentifierKey,
        TemporaryExposureKey,
    },
};

/// Info label for Rolling Proximity Identifier Key derivation
pub const RPIK_INFO: &[u8] = b"EN-RPIK";

/// Info label for Associated Encrypted Metadata Key derivation
pub const AEMK_INFO: &[u8] = b"EN-AEMK";

/// Largest output HKDF-SHA256 can produce (255 blocks of 32 bytes)
pub const MAX_DERIVATION_LENGTH: usize = 255 * 32;

/// HKDF-SHA256 extract-then-expand (RFC 5869).
///
/// An empty `salt` behaves as a salt of 32 zero bytes, as the RFC specifies.
///
/// # Errors
///
/// - `DerivationLength`: `output_length` exceeds [`MAX_DERIVATION_LENGTH`]
pub fn hkdf_sha256(
    input_key: &[u8],
    salt: &[u8],
    info: &[u8],
    output_length: usize,
) -> Result<Vec<u8>, ExposureKeyError> {
    let length_error =
        ExposureKeyError::DerivationLength { requested: output_length, max: MAX_DERIVATION_LENGTH };
    if output_length > MAX_DERIVATION_LENGTH {
        return Err(length_error);
    }

    let hkdf = Hkdf::<Sha256>::new(Some(salt), input_key);
    let mut okm = vec![0u8; output_length];
    hkdf.expand(info, &mut okm).map_err(|_| length_error)?;

    Ok(okm)
}

/// Derive the Rolling Proximity Identifier Key for a TEK.
///
/// `RPIK = HKDF(TEK, salt = "", info = "EN-RPIK", 16)`
pub fn derive_rpik(tek: &TemporaryExposureKey) -> RollingProximityIdentifierKey {
    RollingProximityIdentifierKey::new(derive_subkey(tek, RPIK_INFO))
}

/// Derive the Associated Encrypted Metadata Key for a TEK.
///
/// `AEMK = HKDF(TEK, salt = "", info = "EN-AEMK", 16)`
pub fn derive_aemk(tek: &TemporaryExposureKey) -> AssociatedEncryptedMetadataKey {
    AssociatedEncryptedMetadataKey::new(derive_subkey(tek, AEMK_INFO))
}

fn derive_subkey(tek: &TemporaryExposureKey, info: &[u8]) -> [u8; KEY_LENGTH] {
    // No salt: HKDF substitutes zeros, identical to an empty salt
    let hkdf = Hkdf::<Sha256>::new(None, tek.key());

    let mut key = [0u8; KEY_LENGTH];
    let Ok(()) = hkdf.expand(info, &mut key) else {
        unreachable!("16 bytes is a valid HKDF-SHA256 output length");
    };

    key
}
