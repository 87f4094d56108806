use crate::{
    AddressVersion, Batch, Error, FixtureRng, KeySource, OsKeySource, Result, SymbolSource,
    address::Address, codec,
};
use tokio_util::sync::CancellationToken;

/// Produces batches of addresses of one [`AddressVersion`].
///
/// The generator owns its randomness: a [`SymbolSource`] for v2 and a
/// [`KeySource`] for v3. Only the source matching `version` is ever drawn
/// from. It performs no I/O.
///
/// ## Features
///
/// - ❌ Not thread-safe (each worker owns its own generator)
/// - ✅ Deterministic v2 output for a given seeded source
/// - ✅ All-or-nothing: the first key generation failure aborts the batch
///
/// # Example
/// ```
/// use onionfix::{AddressVersion, BatchGenerator};
///
/// let mut generator = BatchGenerator::seeded(AddressVersion::V2, 42);
/// let batch = generator.generate(3).unwrap();
/// assert_eq!(batch.len(), 3);
/// assert!(batch.iter().all(|addr| addr.as_str().len() == 16));
/// ```
#[derive(Clone, Debug)]
pub struct BatchGenerator<S = FixtureRng, K = OsKeySource> {
    version: AddressVersion,
    symbols: S,
    keys: K,
}

impl BatchGenerator {
    /// A generator using a [`FixtureRng`] seeded with `seed` for v2 and the OS
    /// CSPRNG for v3.
    #[must_use]
    pub fn seeded(version: AddressVersion, seed: u64) -> Self {
        Self::new(version, FixtureRng::seed_from_u64(seed), OsKeySource)
    }
}

impl<S, K> BatchGenerator<S, K>
where
    S: SymbolSource,
    K: KeySource,
{
    pub const fn new(version: AddressVersion, symbols: S, keys: K) -> Self {
        Self {
            version,
            symbols,
            keys,
        }
    }

    pub const fn version(&self) -> AddressVersion {
        self.version
    }

    /// Derives a single address.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyGeneration`] if a v3 key cannot be generated.
    pub fn next_address(&mut self) -> Result<Address> {
        match self.version {
            AddressVersion::V2 => Ok(codec::derive_v2(&mut self.symbols)),
            AddressVersion::V3 => codec::derive_v3(&mut self.keys),
        }
    }

    /// Generates exactly `n` addresses in call order. `n == 0` yields an empty
    /// batch.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyGeneration`] on the first failed v3 key. No retry is
    /// attempted and the partial batch is discarded.
    pub fn generate(&mut self, n: usize) -> Result<Batch> {
        let mut addresses = Vec::with_capacity(n);
        for _ in 0..n {
            addresses.push(self.next_address()?);
        }
        Ok(Batch::new(self.version, addresses))
    }

    /// Like [`Self::generate`], but polls `token` before every address.
    ///
    /// # Errors
    ///
    /// - [`Error::Cancelled`] if `token` is cancelled before the batch
    ///   completes.
    /// - [`Error::KeyGeneration`] as for [`Self::generate`].
    pub fn generate_cancellable(&mut self, n: usize, token: &CancellationToken) -> Result<Batch> {
        let mut addresses = Vec::with_capacity(n);
        for _ in 0..n {
            if token.is_cancelled() {
                return Err(Error::Cancelled);
            }
            addresses.push(self.next_address()?);
        }
        Ok(Batch::new(self.version, addresses))
    }
}
