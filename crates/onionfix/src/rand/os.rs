use crate::{Error, KeySource, Result};
use ed25519_dalek::{SECRET_KEY_LENGTH, SigningKey};
use rand::{TryRngCore, rngs::OsRng};
use zeroize::Zeroizing;

/// A [`KeySource`] backed by the operating system's CSPRNG (`getrandom`).
///
/// Each call reads 32 fresh bytes and expands them into an ed25519 signing
/// key. Failures of the OS source surface as [`Error::KeyGeneration`]; there is
/// no fallback generator.
///
/// This type stores no state and may be freely created per worker.
#[derive(Default, Clone, Copy, Debug)]
pub struct OsKeySource;

impl KeySource for OsKeySource {
    fn signing_key(&mut self) -> Result<SigningKey> {
        let mut secret = Zeroizing::new([0_u8; SECRET_KEY_LENGTH]);
        OsRng
            .try_fill_bytes(secret.as_mut_slice())
            .map_err(|e| Error::KeyGeneration(Box::new(e)))?;
        Ok(SigningKey::from_bytes(&secret))
    }
}
