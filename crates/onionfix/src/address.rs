use crate::{Error, Result, base32, codec};
use core::{fmt, str::FromStr};

/// The onion address format an [`Address`] is encoded in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AddressVersion {
    /// 16 symbols drawn from the base32 alphabet.
    V2,
    /// 56 symbols encoding an ed25519 public key, checksum and version byte.
    V3,
}

impl AddressVersion {
    pub const ALL: [Self; 2] = [Self::V2, Self::V3];

    /// Number of characters in an encoded address of this version.
    #[must_use]
    pub const fn encoded_len(self) -> usize {
        match self {
            Self::V2 => codec::V2_LEN,
            Self::V3 => codec::V3_LEN,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::V2 => "v2",
            Self::V3 => "v3",
        }
    }
}

impl fmt::Display for AddressVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AddressVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "v2" | "2" => Ok(Self::V2),
            "v3" | "3" => Ok(Self::V3),
            other => Err(Error::configuration(format!(
                "unknown address version '{other}'"
            ))),
        }
    }
}

/// A lower-case, fixed-width onion address without the `.onion` suffix.
///
/// Addresses produced by [`crate::codec`] are well-formed by construction.
/// Strings from elsewhere go through [`Address::parse`], which checks length
/// and alphabet and, for v3, the embedded version byte and checksum.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address {
    version: AddressVersion,
    encoded: String,
}

impl Address {
    pub(crate) const fn from_encoded(version: AddressVersion, encoded: String) -> Self {
        Self { version, encoded }
    }

    /// Parses and validates an existing address, in either case.
    ///
    /// A trailing `.onion` suffix is accepted and stripped.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidAddress`] if the length matches neither version or a
    ///   v3 address carries the wrong version byte or checksum.
    /// - [`Error::Base32`] if a character falls outside the alphabet.
    pub fn parse(s: &str) -> Result<Self> {
        let mut encoded = s.to_ascii_lowercase();
        if encoded.ends_with(".onion") {
            encoded.truncate(encoded.len() - ".onion".len());
        }
        match encoded.len() {
            codec::V2_LEN => {
                if let Some(index) = encoded.bytes().position(|b| !base32::is_symbol(b)) {
                    return Err(base32::Base32Error::InvalidSymbol {
                        byte: encoded.as_bytes()[index],
                        index,
                    }
                    .into());
                }
                Ok(Self::from_encoded(AddressVersion::V2, encoded))
            }
            codec::V3_LEN => {
                codec::decode_v3(&encoded)?;
                Ok(Self::from_encoded(AddressVersion::V3, encoded))
            }
            len => Err(Error::invalid_address(format!(
                "length {len} matches no address version"
            ))),
        }
    }

    #[must_use]
    pub const fn version(&self) -> AddressVersion {
        self.version
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.encoded
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.encoded
    }

    /// The embedded ed25519 public key of a v3 address, `None` for v2.
    #[must_use]
    pub fn public_key(&self) -> Option<[u8; 32]> {
        match self.version {
            AddressVersion::V2 => None,
            AddressVersion::V3 => codec::decode_v3(&self.encoded).ok(),
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encoded)
    }
}

impl AsRef<str> for Address {
    fn as_ref(&self) -> &str {
        &self.encoded
    }
}

impl FromStr for Address {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
