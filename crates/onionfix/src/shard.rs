use crate::{AddressVersion, Batch};
use core::convert::Infallible;
use parking_lot::Mutex;

/// One worker's [`Batch`] together with the worker that produced it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Shard {
    worker_index: usize,
    batch: Batch,
}

impl Shard {
    #[must_use]
    pub const fn new(worker_index: usize, batch: Batch) -> Self {
        Self {
            worker_index,
            batch,
        }
    }

    #[must_use]
    pub const fn version(&self) -> AddressVersion {
        self.batch.version()
    }

    /// 0-based index of the worker within its version. Only used for naming.
    #[must_use]
    pub const fn worker_index(&self) -> usize {
        self.worker_index
    }

    #[must_use]
    pub const fn batch(&self) -> &Batch {
        &self.batch
    }

    #[must_use]
    pub fn into_batch(self) -> Batch {
        self.batch
    }

    /// Suggested identifier, `{v2|v3}_{worker_index:04}`.
    ///
    /// ```
    /// use onionfix::{AddressVersion, BatchGenerator, Shard};
    ///
    /// let batch = BatchGenerator::seeded(AddressVersion::V3, 0).generate(0).unwrap();
    /// assert_eq!(Shard::new(7, batch).id(), "v3_0007");
    /// ```
    #[must_use]
    pub fn id(&self) -> String {
        format!("{}_{:04}", self.version(), self.worker_index)
    }

    /// The addresses joined by `\n`, without a trailing newline.
    #[must_use]
    pub fn to_text(&self) -> String {
        let len = self.version().encoded_len();
        let mut out = String::with_capacity(self.batch.len() * (len + 1));
        for (i, addr) in self.batch.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            out.push_str(addr.as_str());
        }
        out
    }
}

/// Destination for finished shards.
///
/// The dispatcher calls [`ShardSink::persist`] from worker threads, once per
/// shard and only for complete shards, so implementations must be
/// `Send + Sync`. No ordering between shards is guaranteed.
pub trait ShardSink: Send + Sync {
    type Error: core::error::Error + Send + Sync + 'static;

    /// Persists a complete shard.
    ///
    /// # Errors
    ///
    /// Implementation defined. Any error aborts the run.
    fn persist(&self, shard: Shard) -> Result<(), Self::Error>;
}

/// A [`ShardSink`] that keeps every shard in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    shards: Mutex<Vec<Shard>>,
}

impl MemorySink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.shards.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shards.lock().is_empty()
    }

    /// Takes the collected shards, sorted by version then worker index.
    #[must_use]
    pub fn take_sorted(&self) -> Vec<Shard> {
        let mut shards = core::mem::take(&mut *self.shards.lock());
        shards.sort_by_key(|s| (s.version(), s.worker_index()));
        shards
    }
}

impl ShardSink for MemorySink {
    type Error = Infallible;

    fn persist(&self, shard: Shard) -> Result<(), Self::Error> {
        self.shards.lock().push(shard);
        Ok(())
    }
}
