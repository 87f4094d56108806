//! Synthetic onion service address generation.
//!
//! `onionfix` derives fixed-format v2 and v3 onion addresses and fans batch
//! generation out across blocking workers. It is a fixture generator: v2
//! addresses come from a seeded, non-cryptographic PRNG and v3 addresses are
//! derived from throwaway ed25519 keys whose private halves are dropped as soon
//! as the public key has been extracted.

mod address;
pub mod base32;
pub mod codec;
mod dispatch;
mod error;
mod generator;
pub mod rand;
mod shard;

pub use crate::address::*;
pub use crate::dispatch::*;
pub use crate::error::*;
pub use crate::generator::*;
pub use crate::rand::{FixtureRng, KeySource, OsKeySource, SeedSequence, SymbolSource};
pub use crate::shard::*;
