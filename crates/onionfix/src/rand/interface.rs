use crate::Result;
use ed25519_dalek::SigningKey;

/// A source of base32 symbol indices for v2 address derivation.
///
/// This abstraction allows you to plug in the seeded fixture generator or a
/// mocked source in tests.
///
/// # Example
/// ```
/// use onionfix::SymbolSource;
///
/// struct FixedSymbol;
/// impl SymbolSource for FixedSymbol {
///     fn next_symbol(&mut self) -> u8 {
///         7
///     }
/// }
///
/// let mut source = FixedSymbol;
/// assert_eq!(source.next_symbol(), 7);
/// ```
pub trait SymbolSource {
    /// Returns a symbol index. Only the low five bits are used.
    fn next_symbol(&mut self) -> u8;
}

/// A source of fresh ed25519 signing keys for v3 address derivation.
///
/// Implementations must draw key material from a cryptographically secure
/// source and report exhaustion as [`crate::Error::KeyGeneration`] rather than
/// falling back to anything weaker.
pub trait KeySource {
    /// Returns a freshly generated signing key.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::KeyGeneration`] if secure randomness is
    /// unavailable.
    fn signing_key(&mut self) -> Result<SigningKey>;
}

impl<S: SymbolSource + ?Sized> SymbolSource for &mut S {
    fn next_symbol(&mut self) -> u8 {
        (**self).next_symbol()
    }
}

impl<K: KeySource + ?Sized> KeySource for &mut K {
    fn signing_key(&mut self) -> Result<SigningKey> {
        (**self).signing_key()
    }
}
