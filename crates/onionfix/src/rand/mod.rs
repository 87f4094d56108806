//! Randomness seams for address derivation.
//!
//! v2 addresses draw symbols from a [`SymbolSource`], normally a seeded
//! [`FixtureRng`]. v3 addresses draw signing keys from a fallible
//! [`KeySource`], normally the operating system's CSPRNG via [`OsKeySource`].

mod fixture;
mod interface;
mod os;

pub use fixture::*;
pub use interface::*;
pub use os::*;
