//! Broadcast-facing facade over the rotation manager.
//!
//! `ExposureNotifier` reads the wall clock from its environment, maps it to an
//! interval and key day, and asks the shared [`RotationManager`] for keys.
//! Every `current_*` operation has an `*_at(unix_secs)` twin that takes an
//! explicit timestamp instead.

use std::sync::Arc;

use exponot_crypto::{
    AssociatedEncryptedMetadataKey, RollingProximityIdentifier, RollingProximityIdentifierKey,
    TemporaryExposureKey, encrypt_metadata, interval_number, key_day,
    rolling_proximity_identifier,
};

use crate::{
    config::NotifierConfig, env::Environment, error::RotationError, rotation::RotationManager,
};

/// Identifier and encrypted metadata for one broadcast.
///
/// Both values come from the same interval, so the metadata keystream always
/// starts at the identifier broadcast next to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Advertisement {
    /// Interval the payload was generated for
    pub interval_number: u32,
    /// The 16-byte broadcast identifier
    pub rpi: RollingProximityIdentifier,
    /// Metadata encrypted under the day's AEMK, same length as the input
    pub aem: Vec<u8>,
}

/// Generates the values a device broadcasts and discloses.
///
/// Cloning is cheap; clones share the same rotation manager.
#[derive(Clone)]
pub struct ExposureNotifier<E: Environment> {
    env: E,
    rotation: Arc<RotationManager>,
}

impl<E: Environment> ExposureNotifier<E> {
    /// Create a notifier with its own rotation manager.
    pub fn new(env: E, config: NotifierConfig) -> Self {
        Self { env, rotation: Arc::new(RotationManager::new(config)) }
    }

    /// Create a notifier over an existing, shared rotation manager.
    pub fn with_rotation(env: E, rotation: Arc<RotationManager>) -> Self {
        Self { env, rotation }
    }

    /// The shared rotation manager.
    pub fn rotation(&self) -> &Arc<RotationManager> {
        &self.rotation
    }

    /// The environment supplying time and entropy.
    pub fn env(&self) -> &E {
        &self.env
    }

    /// Interval number for the environment's current time.
    pub fn interval_number(&self) -> Result<u32, RotationError> {
        Ok(interval_number(self.env.wall_clock_secs())?)
    }

    /// TEK for the current key day, for diagnosis-key disclosure.
    pub fn current_temporary_exposure_key(&self) -> Result<TemporaryExposureKey, RotationError> {
        self.temporary_exposure_key_at(self.env.wall_clock_secs())
    }

    /// TEK for the key day containing `unix_secs`.
    pub fn temporary_exposure_key_at(
        &self,
        unix_secs: u64,
    ) -> Result<TemporaryExposureKey, RotationError> {
        let day = key_day(interval_number(unix_secs)?);
        self.rotation.temporary_exposure_key(day, &self.env)
    }

    /// RPIK for the current key day.
    pub fn current_rolling_proximity_identifier_key(
        &self,
    ) -> Result<RollingProximityIdentifierKey, RotationError> {
        self.rolling_proximity_identifier_key_at(self.env.wall_clock_secs())
    }

    /// RPIK for the key day containing `unix_secs`.
    pub fn rolling_proximity_identifier_key_at(
        &self,
        unix_secs: u64,
    ) -> Result<RollingProximityIdentifierKey, RotationError> {
        let day = key_day(interval_number(unix_secs)?);
        self.rotation.rolling_proximity_identifier_key(day, &self.env)
    }

    /// AEMK for the current key day.
    pub fn current_associated_encrypted_metadata_key(
        &self,
    ) -> Result<AssociatedEncryptedMetadataKey, RotationError> {
        self.associated_encrypted_metadata_key_at(self.env.wall_clock_secs())
    }

    /// AEMK for the key day containing `unix_secs`.
    pub fn associated_encrypted_metadata_key_at(
        &self,
        unix_secs: u64,
    ) -> Result<AssociatedEncryptedMetadataKey, RotationError> {
        let day = key_day(interval_number(unix_secs)?);
        self.rotation.associated_encrypted_metadata_key(day, &self.env)
    }

    /// Identifier to place in the outgoing broadcast for the current interval.
    pub fn current_rolling_proximity_identifier(
        &self,
    ) -> Result<RollingProximityIdentifier, RotationError> {
        self.rolling_proximity_identifier_at(self.env.wall_clock_secs())
    }

    /// Identifier for the interval containing `unix_secs`.
    pub fn rolling_proximity_identifier_at(
        &self,
        unix_secs: u64,
    ) -> Result<RollingProximityIdentifier, RotationError> {
        let interval = interval_number(unix_secs)?;
        let rpik = self.rotation.rolling_proximity_identifier_key(key_day(interval), &self.env)?;
        Ok(rolling_proximity_identifier(&rpik, interval))
    }

    /// Encrypt metadata for the current interval's broadcast.
    pub fn encrypt_metadata(&self, metadata: &[u8]) -> Result<Vec<u8>, RotationError> {
        self.encrypt_metadata_at(metadata, self.env.wall_clock_secs())
    }

    /// Encrypt metadata for the broadcast of the interval containing
    /// `unix_secs`.
    pub fn encrypt_metadata_at(
        &self,
        metadata: &[u8],
        unix_secs: u64,
    ) -> Result<Vec<u8>, RotationError> {
        Ok(self.advertisement_payload_at(metadata, unix_secs)?.aem)
    }

    /// Identifier and encrypted metadata for the current interval.
    ///
    /// The clock is read once, so both values belong to the same interval
    /// even if the call straddles an interval boundary.
    pub fn advertisement_payload(&self, metadata: &[u8]) -> Result<Advertisement, RotationError> {
        self.advertisement_payload_at(metadata, self.env.wall_clock_secs())
    }

    /// Identifier and encrypted metadata for the interval containing
    /// `unix_secs`.
    pub fn advertisement_payload_at(
        &self,
        metadata: &[u8],
        unix_secs: u64,
    ) -> Result<Advertisement, RotationError> {
        let interval = interval_number(unix_secs)?;
        let day = key_day(interval);

        let rpik = self.rotation.rolling_proximity_identifier_key(day, &self.env)?;
        let aemk = self.rotation.associated_encrypted_metadata_key(day, &self.env)?;

        let rpi = rolling_proximity_identifier(&rpik, interval);
        let aem = encrypt_metadata(metadata, &aemk, &rpi);

        Ok(Advertisement { interval_number: interval, rpi, aem })
    }

    /// Every TEK still inside the retention window, oldest first.
    pub fn retained_temporary_exposure_keys(&self) -> Vec<TemporaryExposureKey> {
        self.rotation.retained_temporary_exposure_keys()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use exponot_crypto::{ExposureKeyError, decrypt_metadata, derive_aemk, derive_rpik};

    use super::*;
    use crate::sim_env::SimEnv;

    /// 2020-05-27 00:00:00 UTC, the start of key day 18409
    const DAY_START: u64 = 1_590_537_600;

    fn notifier(seed: u64) -> (ExposureNotifier<SimEnv>, SimEnv) {
        let env = SimEnv::new(seed, DAY_START);
        (ExposureNotifier::new(env.clone(), NotifierConfig::default()), env)
    }

    #[test]
    fn interval_follows_clock() {
        let (notifier, env) = notifier(1);
        let first = notifier.interval_number().unwrap();

        env.advance_secs(600);
        assert_eq!(notifier.interval_number().unwrap(), first + 1);
    }

    #[test]
    fn current_matches_explicit_timestamp() {
        let (notifier, _env) = notifier(1);

        assert_eq!(
            notifier.current_rolling_proximity_identifier().unwrap(),
            notifier.rolling_proximity_identifier_at(DAY_START).unwrap()
        );
        assert_eq!(
            notifier.current_temporary_exposure_key().unwrap(),
            notifier.temporary_exposure_key_at(DAY_START + 86_399).unwrap()
        );
    }

    #[test]
    fn rpi_changes_every_interval() {
        let (notifier, env) = notifier(2);

        let first = notifier.current_rolling_proximity_identifier().unwrap();
        env.advance_secs(599);
        assert_eq!(notifier.current_rolling_proximity_identifier().unwrap(), first);

        env.advance_secs(1);
        assert_ne!(notifier.current_rolling_proximity_identifier().unwrap(), first);
    }

    #[test]
    fn rpik_is_stable_across_key_day() {
        let (notifier, env) = notifier(3);

        let morning = notifier.current_rolling_proximity_identifier_key().unwrap();
        env.advance_secs(86_399);
        assert_eq!(notifier.current_rolling_proximity_identifier_key().unwrap(), morning);

        env.advance_secs(1);
        assert_ne!(notifier.current_rolling_proximity_identifier_key().unwrap(), morning);
    }

    #[test]
    fn broadcast_is_recomputable_from_disclosed_tek() {
        let (notifier, _env) = notifier(4);
        let metadata = [0x40, 0x08, 0x00, 0x00];

        let payload = notifier.advertisement_payload(&metadata).unwrap();
        let tek = notifier.current_temporary_exposure_key().unwrap();

        let rpi = rolling_proximity_identifier(&derive_rpik(&tek), payload.interval_number);
        assert_eq!(rpi, payload.rpi);

        let decrypted = decrypt_metadata(&payload.aem, &derive_aemk(&tek), &rpi);
        assert_eq!(decrypted, metadata);
    }

    #[test]
    fn encrypt_metadata_matches_payload() {
        let (notifier, _env) = notifier(5);
        let metadata = b"metadata";

        let payload = notifier.advertisement_payload(metadata).unwrap();
        assert_eq!(notifier.encrypt_metadata(metadata).unwrap(), payload.aem);
    }

    #[test]
    fn metadata_length_is_preserved() {
        let (notifier, _env) = notifier(6);

        for len in [0usize, 1, 16, 257] {
            let aem = notifier.encrypt_metadata(&vec![0xAA; len]).unwrap();
            assert_eq!(aem.len(), len);
        }
    }

    #[test]
    fn clones_share_rotation_manager() {
        let (notifier, _env) = notifier(7);
        let clone = notifier.clone();

        assert_eq!(
            notifier.current_temporary_exposure_key().unwrap(),
            clone.current_temporary_exposure_key().unwrap()
        );
        assert!(Arc::ptr_eq(notifier.rotation(), clone.rotation()));
    }

    #[test]
    fn shared_manager_across_notifiers() {
        let env = SimEnv::new(8, DAY_START);
        let rotation = Arc::new(RotationManager::default());

        let a = ExposureNotifier::with_rotation(env.clone(), Arc::clone(&rotation));
        let b = ExposureNotifier::with_rotation(env, rotation);

        assert_eq!(
            a.current_rolling_proximity_identifier().unwrap(),
            b.current_rolling_proximity_identifier().unwrap()
        );
    }

    #[test]
    fn out_of_range_timestamp_is_rejected() {
        let (notifier, _env) = notifier(9);

        let result = notifier.rolling_proximity_identifier_at(u64::MAX);

        assert!(matches!(
            result,
            Err(RotationError::Key(ExposureKeyError::TimestampOutOfRange { .. }))
        ));
        assert!(notifier.retained_temporary_exposure_keys().is_empty());
    }

    #[test]
    fn clock_regression_reuses_keys() {
        let (notifier, env) = notifier(10);

        let today = notifier.current_temporary_exposure_key().unwrap();
        env.advance_days(1);
        notifier.current_temporary_exposure_key().unwrap();

        env.set_time(DAY_START + 60);
        assert_eq!(notifier.current_temporary_exposure_key().unwrap(), today);
        assert_eq!(notifier.rotation().clock_regressions(), 1);
        assert_eq!(notifier.env().wall_clock_secs(), DAY_START + 60);
    }
}
