use crate::SymbolSource;
use rand::{Rng, SeedableRng, rngs::SmallRng};

/// The seed the fixture generator uses unless told otherwise.
pub const DEFAULT_SEED: u64 = 20_200_701;

/// A seeded, **non-cryptographic** [`SymbolSource`] for v2 fixtures.
///
/// ⚠️ The output is fully determined by the seed. It exists so that repeated
/// runs produce identical load-test fixtures and must never be used where
/// unpredictability matters.
///
/// Sequences are reproducible for a given seed on the same platform and `rand`
/// version; `SmallRng` makes no portability promise beyond that.
#[derive(Clone, Debug)]
pub struct FixtureRng {
    rng: SmallRng,
}

impl FixtureRng {
    #[must_use]
    pub fn seed_from_u64(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl Default for FixtureRng {
    fn default() -> Self {
        Self::seed_from_u64(DEFAULT_SEED)
    }
}

impl SymbolSource for FixtureRng {
    fn next_symbol(&mut self) -> u8 {
        self.rng.random_range(0..32)
    }
}

/// Derives independent per-worker [`FixtureRng`]s from one base seed.
///
/// Worker `i` is seeded with `base ^ i`. No generator is ever shared between
/// workers, so concurrent batches need no synchronization and a rerun with the
/// same base seed reproduces every worker's sequence regardless of scheduling.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SeedSequence {
    base: u64,
}

impl SeedSequence {
    #[must_use]
    pub const fn new(base: u64) -> Self {
        Self { base }
    }

    #[must_use]
    pub const fn base(&self) -> u64 {
        self.base
    }

    /// The sub-seed assigned to `worker_index`.
    #[must_use]
    pub const fn seed_for(&self, worker_index: usize) -> u64 {
        self.base ^ worker_index as u64
    }

    #[must_use]
    pub fn for_worker(&self, worker_index: usize) -> FixtureRng {
        FixtureRng::seed_from_u64(self.seed_for(worker_index))
    }
}

impl Default for SeedSequence {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}
