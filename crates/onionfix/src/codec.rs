//! Address derivation for both onion address versions.
//!
//! ## v2
//!
//! Sixteen symbols, each drawn independently and uniformly from the 32-symbol
//! base32 alphabet. The symbols come from a caller-owned [`SymbolSource`],
//! which for fixtures is a seeded non-cryptographic PRNG.
//!
//! ## v3
//!
//! ```text
//! checksum = SHA3-256(".onion checksum" || pubkey || 0x03)[..2]
//! address  = base32(pubkey || checksum || 0x03)
//! ```
//!
//! The 35-byte body encodes to exactly 56 lower-case symbols with no padding.

use crate::{
    Address, AddressVersion, Error, KeySource, Result, SymbolSource,
    base32::{self, ALPHABET},
};
use ed25519_dalek::PUBLIC_KEY_LENGTH;
use sha3::{Digest, Sha3_256};

/// Characters in a v2 address.
pub const V2_LEN: usize = 16;
/// Characters in a v3 address.
pub const V3_LEN: usize = base32::encoded_len(V3_RAW_LEN);
/// Version byte embedded in every v3 address.
pub const V3_VERSION: u8 = 3;

/// Domain separation prefix for the v3 checksum.
pub const CHECKSUM_PREFIX: &[u8; 15] = b".onion checksum";
const CHECKSUM_LEN: usize = 2;
const CHECKSUM_INPUT_LEN: usize = CHECKSUM_PREFIX.len() + PUBLIC_KEY_LENGTH + 1;
const V3_RAW_LEN: usize = PUBLIC_KEY_LENGTH + CHECKSUM_LEN + 1;

/// Derives a v2 address from `symbols`. Infallible.
pub fn derive_v2<S: SymbolSource + ?Sized>(symbols: &mut S) -> Address {
    let mut buf = [0_u8; V2_LEN];
    for slot in &mut buf {
        *slot = ALPHABET[(symbols.next_symbol() & 0x1F) as usize];
    }
    Address::from_encoded(AddressVersion::V2, buf.into_iter().map(char::from).collect())
}

/// Derives a v3 address from a fresh key drawn from `keys`.
///
/// The signing key is dropped as soon as its public half has been read.
///
/// # Errors
///
/// Returns [`Error::KeyGeneration`] if `keys` cannot produce a key.
pub fn derive_v3<K: KeySource + ?Sized>(keys: &mut K) -> Result<Address> {
    let public_key = keys.signing_key()?.verifying_key().to_bytes();
    Ok(encode_v3(&public_key))
}

/// Encodes an ed25519 public key as a v3 address.
#[must_use]
pub fn encode_v3(public_key: &[u8; PUBLIC_KEY_LENGTH]) -> Address {
    let checksum = v3_checksum(public_key);

    let mut raw = [0_u8; V3_RAW_LEN];
    raw[..PUBLIC_KEY_LENGTH].copy_from_slice(public_key);
    raw[PUBLIC_KEY_LENGTH..PUBLIC_KEY_LENGTH + CHECKSUM_LEN].copy_from_slice(&checksum);
    raw[V3_RAW_LEN - 1] = V3_VERSION;

    Address::from_encoded(AddressVersion::V3, base32::encode_to_string(&raw))
}

/// The two-byte v3 checksum of `public_key`.
#[must_use]
pub fn v3_checksum(public_key: &[u8; PUBLIC_KEY_LENGTH]) -> [u8; CHECKSUM_LEN] {
    let mut input = [0_u8; CHECKSUM_INPUT_LEN];
    input[..CHECKSUM_PREFIX.len()].copy_from_slice(CHECKSUM_PREFIX);
    input[CHECKSUM_PREFIX.len()..CHECKSUM_INPUT_LEN - 1].copy_from_slice(public_key);
    input[CHECKSUM_INPUT_LEN - 1] = V3_VERSION;

    let digest = Sha3_256::digest(input);
    [digest[0], digest[1]]
}

/// Decodes a v3 address and returns its embedded public key.
///
/// # Errors
///
/// - [`Error::Base32`] if `encoded` is not 56 base32 symbols.
/// - [`Error::InvalidAddress`] if the version byte is not 3 or the checksum
///   does not match the public key.
pub fn decode_v3(encoded: &str) -> Result<[u8; PUBLIC_KEY_LENGTH]> {
    let mut raw = [0_u8; V3_RAW_LEN];
    base32::decode_base32(encoded.as_bytes(), &mut raw)?;

    let version = raw[V3_RAW_LEN - 1];
    if version != V3_VERSION {
        return Err(Error::invalid_address(format!(
            "version byte {version}, expected {V3_VERSION}"
        )));
    }

    let mut public_key = [0_u8; PUBLIC_KEY_LENGTH];
    public_key.copy_from_slice(&raw[..PUBLIC_KEY_LENGTH]);
    if v3_checksum(&public_key) != raw[PUBLIC_KEY_LENGTH..PUBLIC_KEY_LENGTH + CHECKSUM_LEN] {
        return Err(Error::invalid_address("checksum mismatch"));
    }
    Ok(public_key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FixtureRng, OsKeySource};
    use ed25519_dalek::SigningKey;

    struct Counter(u8);

    impl SymbolSource for Counter {
        fn next_symbol(&mut self) -> u8 {
            let s = self.0;
            self.0 = self.0.wrapping_add(1);
            s
        }
    }

    struct FixedKey([u8; 32]);

    impl KeySource for FixedKey {
        fn signing_key(&mut self) -> Result<SigningKey> {
            Ok(SigningKey::from_bytes(&self.0))
        }
    }

    fn assert_well_formed_v2(addr: &Address) {
        assert_eq!(addr.version(), AddressVersion::V2);
        assert_eq!(addr.as_str().len(), V2_LEN);
        assert!(addr.as_str().bytes().all(|b| ALPHABET.contains(&b)));
        assert_eq!(addr.as_str(), addr.as_str().to_ascii_lowercase());
    }

    #[test]
    fn v2_maps_symbols_onto_alphabet_in_order() {
        let addr = derive_v2(&mut Counter(0));
        assert_eq!(addr.as_str(), "abcdefghijklmnop");

        let addr = derive_v2(&mut Counter(16));
        assert_eq!(addr.as_str(), "qrstuvwxyz234567");
    }

    #[test]
    fn v2_masks_out_of_range_symbols() {
        let addr = derive_v2(&mut Counter(32));
        assert_eq!(addr.as_str(), "abcdefghijklmnop");
    }

    #[test]
    fn v2_addresses_are_well_formed() {
        let mut rng = FixtureRng::default();
        for _ in 0..1_000 {
            assert_well_formed_v2(&derive_v2(&mut rng));
        }
    }

    #[test]
    fn v2_is_deterministic_for_a_seed() {
        let mut a = FixtureRng::seed_from_u64(99);
        let mut b = FixtureRng::seed_from_u64(99);
        for _ in 0..100 {
            assert_eq!(derive_v2(&mut a), derive_v2(&mut b));
        }
    }

    #[test]
    fn v3_addresses_are_well_formed() {
        let mut keys = OsKeySource;
        for _ in 0..64 {
            let addr = derive_v3(&mut keys).unwrap();
            assert_eq!(addr.version(), AddressVersion::V3);
            assert_eq!(addr.as_str().len(), 56);
            assert!(addr.as_str().bytes().all(|b| ALPHABET.contains(&b)));
            assert_eq!(addr.as_str(), addr.as_str().to_ascii_lowercase());
            assert!(!addr.as_str().contains('='));
        }
    }

    #[test]
    fn v3_decodes_to_its_checksum_and_version() {
        let addr = derive_v3(&mut OsKeySource).unwrap();

        let mut raw = [0_u8; V3_RAW_LEN];
        base32::decode_base32(addr.as_str().as_bytes(), &mut raw).unwrap();
        assert_eq!(raw[34], V3_VERSION);

        let mut public_key = [0_u8; 32];
        public_key.copy_from_slice(&raw[..32]);
        let mut input = Vec::with_capacity(48);
        input.extend_from_slice(b".onion checksum");
        input.extend_from_slice(&public_key);
        input.push(3);
        assert_eq!(input.len(), 48);

        let digest = Sha3_256::digest(&input);
        assert_eq!(raw[32..34], digest[..2]);
    }

    #[test]
    fn v3_embeds_the_generated_public_key() {
        let secret = [0x42_u8; 32];
        let expected = SigningKey::from_bytes(&secret).verifying_key().to_bytes();

        let addr = derive_v3(&mut FixedKey(secret)).unwrap();
        assert_eq!(decode_v3(addr.as_str()).unwrap(), expected);
        assert_eq!(addr.public_key(), Some(expected));
    }

    #[test]
    fn v3_prefix_is_the_base32_public_key() {
        let public_key = [0_u8; 32];
        let addr = encode_v3(&public_key);
        // 32 zero bytes fill the first 51 symbols and 1 bit of the 52nd.
        assert!(addr.as_str().starts_with(&"a".repeat(51)));
    }

    #[test]
    fn key_generation_failure_propagates() {
        struct Exhausted;
        impl KeySource for Exhausted {
            fn signing_key(&mut self) -> Result<SigningKey> {
                Err(Error::KeyGeneration(Box::new(std::io::Error::other(
                    "entropy exhausted",
                ))))
            }
        }

        assert!(matches!(
            derive_v3(&mut Exhausted),
            Err(Error::KeyGeneration(_))
        ));
    }

    #[test]
    fn decode_rejects_corrupted_checksum() {
        let addr = encode_v3(&[7_u8; 32]);
        let mut raw = [0_u8; V3_RAW_LEN];
        base32::decode_base32(addr.as_str().as_bytes(), &mut raw).unwrap();
        raw[32] ^= 0xFF;
        let tampered = base32::encode_to_string(&raw);

        assert!(matches!(
            decode_v3(&tampered),
            Err(Error::InvalidAddress { .. })
        ));
    }

    #[test]
    fn decode_rejects_wrong_version_byte() {
        let public_key = [7_u8; 32];
        let mut raw = [0_u8; V3_RAW_LEN];
        raw[..32].copy_from_slice(&public_key);
        raw[32..34].copy_from_slice(&v3_checksum(&public_key));
        raw[34] = 2;

        let err = decode_v3(&base32::encode_to_string(&raw)).unwrap_err();
        assert!(matches!(err, Error::InvalidAddress { ref reason } if reason.contains("version")));
    }
}
