use crate::{
    AddressVersion, BatchGenerator, Error, FixtureRng, KeySource, OsKeySource, Result,
    SymbolSource, base32::ALPHABET, codec,
};
use ed25519_dalek::SigningKey;
use std::collections::HashSet;
use tokio_util::sync::CancellationToken;

/// Fails after handing out `remaining` keys.
struct FlakyKeys {
    remaining: usize,
    calls: usize,
}

impl KeySource for FlakyKeys {
    fn signing_key(&mut self) -> Result<SigningKey> {
        self.calls += 1;
        if self.remaining == 0 {
            return Err(Error::KeyGeneration(Box::new(std::io::Error::other(
                "getrandom unavailable",
            ))));
        }
        self.remaining -= 1;
        OsKeySource.signing_key()
    }
}

struct NoSymbols;

impl SymbolSource for NoSymbols {
    fn next_symbol(&mut self) -> u8 {
        unreachable!("v3 generation must not draw v2 symbols")
    }
}

fn run_generator_yields_exactly_n<S, K>(mut generator: BatchGenerator<S, K>, n: usize)
where
    S: SymbolSource,
    K: KeySource,
{
    let batch = generator.generate(n).unwrap();
    assert_eq!(batch.len(), n);
    assert_eq!(batch.version(), generator.version());
    assert!(
        batch
            .iter()
            .all(|addr| addr.version() == generator.version()
                && addr.as_str().len() == generator.version().encoded_len())
    );
}

fn run_generator_handles_empty_batch<S, K>(mut generator: BatchGenerator<S, K>)
where
    S: SymbolSource,
    K: KeySource,
{
    let batch = generator.generate(0).unwrap();
    assert!(batch.is_empty());
    assert_eq!(batch.version(), generator.version());
}

#[test]
fn v2_generator_yields_exactly_n() {
    for n in [1, 2, 17, 5000] {
        run_generator_yields_exactly_n(BatchGenerator::seeded(AddressVersion::V2, 1), n);
    }
}

#[test]
fn v3_generator_yields_exactly_n() {
    for n in [1, 3, 50] {
        run_generator_yields_exactly_n(BatchGenerator::seeded(AddressVersion::V3, 1), n);
    }
}

#[test]
fn empty_batches_are_not_errors() {
    run_generator_handles_empty_batch(BatchGenerator::seeded(AddressVersion::V2, 1));
    run_generator_handles_empty_batch(BatchGenerator::seeded(AddressVersion::V3, 1));
    run_generator_handles_empty_batch(BatchGenerator::new(
        AddressVersion::V3,
        NoSymbols,
        FlakyKeys {
            remaining: 0,
            calls: 0,
        },
    ));
}

#[test]
fn v2_batches_are_well_formed() {
    let batch = BatchGenerator::seeded(AddressVersion::V2, 20_200_701)
        .generate(5000)
        .unwrap();
    for addr in &batch {
        assert_eq!(addr.as_str().len(), 16);
        assert!(addr.as_str().bytes().all(|b| ALPHABET.contains(&b)));
    }
}

#[test]
fn v2_batches_are_deterministic_for_a_seed() {
    let a = BatchGenerator::seeded(AddressVersion::V2, 5).generate(5000).unwrap();
    let b = BatchGenerator::seeded(AddressVersion::V2, 5).generate(5000).unwrap();
    assert_eq!(a, b);

    let c = BatchGenerator::seeded(AddressVersion::V2, 6).generate(5000).unwrap();
    assert_ne!(a, c);
}

#[test]
fn consecutive_v2_batches_continue_the_sequence() {
    let whole = BatchGenerator::seeded(AddressVersion::V2, 3).generate(20).unwrap();

    let mut generator = BatchGenerator::seeded(AddressVersion::V2, 3);
    let mut halves = generator.generate(10).unwrap().into_addresses();
    halves.extend(generator.generate(10).unwrap());

    assert_eq!(whole.into_addresses(), halves);
}

#[test]
fn v3_batches_verify_and_do_not_collide() {
    let batch = BatchGenerator::seeded(AddressVersion::V3, 0).generate(200).unwrap();
    let mut seen = HashSet::with_capacity(batch.len());
    for addr in &batch {
        codec::decode_v3(addr.as_str()).unwrap();
        assert!(seen.insert(addr.clone()), "duplicate v3 address: {addr}");
    }
}

#[test]
fn v3_generator_never_draws_symbols() {
    let mut generator = BatchGenerator::new(AddressVersion::V3, NoSymbols, OsKeySource);
    assert_eq!(generator.generate(5).unwrap().len(), 5);
}

#[test]
fn key_failure_aborts_the_batch_without_retry() {
    let mut keys = FlakyKeys {
        remaining: 3,
        calls: 0,
    };
    let mut generator = BatchGenerator::new(AddressVersion::V3, FixtureRng::default(), &mut keys);

    let err = generator.generate(10).unwrap_err();
    assert!(matches!(err, Error::KeyGeneration(_)));
    assert_eq!(keys.calls, 4);
}

#[test]
fn cancellable_generation_completes_when_not_cancelled() {
    let token = CancellationToken::new();
    let batch = BatchGenerator::seeded(AddressVersion::V2, 1)
        .generate_cancellable(100, &token)
        .unwrap();
    assert_eq!(batch.len(), 100);
}

#[test]
fn cancellable_generation_stops_on_cancel() {
    let token = CancellationToken::new();
    token.cancel();
    let err = BatchGenerator::seeded(AddressVersion::V2, 1)
        .generate_cancellable(100, &token)
        .unwrap_err();
    assert!(matches!(err, Error::Cancelled));

    // An empty batch never polls the token.
    assert!(
        BatchGenerator::seeded(AddressVersion::V2, 1)
            .generate_cancellable(0, &token)
            .unwrap()
            .is_empty()
    );
}
